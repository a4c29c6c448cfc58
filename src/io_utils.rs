//! I/O utilities for CSV discovery, reading, and writing.
//!
//! All file I/O in csv-combine flows through this module. It provides:
//!
//! - **Discovery**: sorted, case-insensitive `*.csv` enumeration of a
//!   directory.
//! - **Reader construction**: BOM-transparent readers configured with a
//!   sniffed [`Dialect`], flexible so that short rows surface as short
//!   records rather than errors.
//! - **Writer construction**: the merge output writer (comma-delimited,
//!   minimal quoting, parent directories created) and a dialect-preserving
//!   writer used by the in-place column stripper.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use encoding_rs_io::DecodeReaderBytesBuilder;

use crate::dialect::Dialect;

/// Lists regular files in `dir` with a `.csv` extension (case-insensitive),
/// sorted by filename so that discovery order is deterministic.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Reading directory {dir:?}"))? {
        let entry = entry.with_context(|| format!("Reading directory {dir:?}"))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            files.push(path);
        }
    }
    files.sort_by_key(|path| path.file_name().map(|name| name.to_os_string()));
    Ok(files)
}

/// Opens a CSV reader over `path` using the given dialect. A UTF-8 byte-order
/// mark at the start of the file is stripped before parsing.
pub fn open_csv_reader(path: &Path, dialect: &Dialect) -> Result<csv::Reader<Box<dyn Read>>> {
    let file = File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
    let decoded = DecodeReaderBytesBuilder::new().build(file);
    let reader: Box<dyn Read> = Box::new(BufReader::new(decoded));
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(dialect.delimiter)
        .quote(dialect.quote)
        .double_quote(true)
        .flexible(true);
    Ok(builder.from_reader(reader))
}

/// Creates the merge output writer at `path`, creating parent directories as
/// needed. Output is always comma-delimited with quoting only where values
/// require it, independent of the input dialects.
pub fn open_csv_writer(path: &Path) -> Result<csv::Writer<BufWriter<File>>> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Creating output directory {parent:?}"))?;
    }
    let file = File::create(path).with_context(|| format!("Creating output file {path:?}"))?;
    let mut builder = csv::WriterBuilder::new();
    builder.double_quote(true);
    Ok(builder.from_writer(BufWriter::new(file)))
}

/// Wraps `writer` in a CSV writer that preserves the given input dialect.
pub fn csv_writer_on<W: Write>(writer: W, dialect: &Dialect) -> csv::Writer<W> {
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(dialect.delimiter)
        .quote(dialect.quote)
        .double_quote(true);
    builder.from_writer(writer)
}
