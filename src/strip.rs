//! In-place removal of placeholder "Unnamed" columns.
//!
//! Spreadsheet exports leave behind index columns named `Unnamed: 0`,
//! `Unnamed: 1`, and so on. For every CSV file in a directory this pass drops
//! each column whose header starts with that prefix, rewriting the file
//! through a temporary sibling that is atomically renamed over the original.
//! Files with no placeholder columns are left untouched.

use std::{io::BufWriter, path::Path};

use anyhow::{Context, Result, anyhow};
use log::info;
use tempfile::Builder;

use crate::{cli::StripArgs, dialect::Dialect, io_utils};

/// Header prefix identifying a placeholder column.
pub const PLACEHOLDER_PREFIX: &str = "Unnamed";

pub fn execute(args: &StripArgs) -> Result<()> {
    if !args.directory.is_dir() {
        return Err(anyhow!("Not a directory: {}", args.directory.display()));
    }
    let files = io_utils::list_csv_files(&args.directory)?;
    let mut total_removed = 0usize;
    for path in &files {
        let removed = strip_placeholder_columns(path)
            .with_context(|| format!("Stripping columns from {path:?}"))?;
        total_removed += removed;
        info!(
            "{}: removed {} placeholder column(s)",
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            removed
        );
    }
    info!(
        "Removed {} column(s) across {} file(s)",
        total_removed,
        files.len()
    );
    Ok(())
}

/// Removes placeholder columns from a single file, returning how many were
/// dropped. The rewrite preserves the file's sniffed dialect and replaces
/// the original atomically; a file without placeholder columns (or without a
/// header) is not rewritten at all.
pub fn strip_placeholder_columns(path: &Path) -> Result<usize> {
    let dialect = Dialect::sniff_path(path)?;
    let mut reader = io_utils::open_csv_reader(path, &dialect)?;
    let header = reader
        .headers()
        .with_context(|| format!("Reading header of {path:?}"))?
        .clone();
    if header.is_empty() {
        return Ok(0);
    }

    let keep: Vec<usize> = header
        .iter()
        .enumerate()
        .filter(|(_, name)| !name.trim().starts_with(PLACEHOLDER_PREFIX))
        .map(|(index, _)| index)
        .collect();
    let removed = header.len() - keep.len();
    if removed == 0 {
        return Ok(0);
    }

    let dir = path.parent().filter(|parent| !parent.as_os_str().is_empty());
    let mut tmp = Builder::new()
        .suffix(".csv")
        .tempfile_in(dir.unwrap_or_else(|| Path::new(".")))
        .with_context(|| format!("Creating temporary file beside {path:?}"))?;
    {
        let mut writer = io_utils::csv_writer_on(BufWriter::new(&mut tmp), &dialect);
        let kept_header: Vec<&str> = keep
            .iter()
            .map(|&index| header.get(index).unwrap_or(""))
            .collect();
        writer
            .write_record(&kept_header)
            .context("Writing filtered header")?;
        for (row_idx, record) in reader.records().enumerate() {
            let record =
                record.with_context(|| format!("Reading row {} in {path:?}", row_idx + 2))?;
            // Short rows pad with empty cells instead of failing.
            let kept_row: Vec<&str> = keep
                .iter()
                .map(|&index| record.get(index).unwrap_or(""))
                .collect();
            writer
                .write_record(&kept_row)
                .with_context(|| format!("Writing row {} of {path:?}", row_idx + 2))?;
        }
        writer.flush().context("Flushing temporary file")?;
    }
    // The source handle must be closed before the rename on Windows.
    drop(reader);
    tmp.persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("Replacing {path:?}"))?;

    Ok(removed)
}
