//! Merge a directory of CSV files into one deduplicated output.
//!
//! Files are processed strictly sequentially in filename order. The first
//! non-empty file's header becomes the canonical header for the whole run;
//! every other file is reconciled against it column-by-name, and rows whose
//! dedup key was already seen are skipped. Output is comma-delimited
//! regardless of the input dialects.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use thiserror::Error;

use crate::{cli::MergeArgs, dedup::Deduper, dialect::Dialect, io_utils, mapping};

/// Columns that identify a record when present in the canonical header.
pub const KEY_COLUMNS: &[&str] = &["game_id", "play_id"];

/// Fatal input conditions detected before any output file is created.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("no CSV files found in {}", .0.display())]
    NoInputFiles(PathBuf),
    #[error("all CSV files are empty; nothing to combine")]
    EmptyInputSet,
}

/// Counters accumulated across one merge run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeSummary {
    pub files: usize,
    pub rows_in: usize,
    pub duplicates_skipped: usize,
    pub rows_out: usize,
}

pub fn execute(args: &MergeArgs) -> Result<()> {
    if !args.input_dir.is_dir() {
        return Err(anyhow!("Not a directory: {}", args.input_dir.display()));
    }
    let summary = merge(&args.input_dir, &args.output)?;
    info!("Processed {} file(s)", summary.files);
    info!("Rows read: {}", summary.rows_in);
    info!("Duplicates removed: {}", summary.duplicates_skipped);
    info!("Rows written: {}", summary.rows_out);
    Ok(())
}

/// Merges every `*.csv` file under `input_dir` into `output`, dropping
/// duplicate rows. Always satisfies
/// `rows_in == rows_out + duplicates_skipped`.
pub fn merge(input_dir: &Path, output: &Path) -> Result<MergeSummary> {
    let files = io_utils::list_csv_files(input_dir)?;
    if files.is_empty() {
        return Err(MergeError::NoInputFiles(input_dir.to_path_buf()).into());
    }

    let canonical = canonical_header(&files)?.ok_or(MergeError::EmptyInputSet)?;
    let mut deduper = Deduper::for_header(&canonical, KEY_COLUMNS);

    let mut writer = io_utils::open_csv_writer(output)?;
    writer
        .write_record(&canonical)
        .context("Writing output header")?;

    let mut summary = MergeSummary::default();
    for path in &files {
        summary.files += 1;
        let dialect = Dialect::sniff_path(path)?;
        let mut reader = io_utils::open_csv_reader(path, &dialect)?;
        let source_header: Vec<String> = reader
            .headers()
            .with_context(|| format!("Reading header of {path:?}"))?
            .iter()
            .map(str::to_string)
            .collect();
        if source_header.is_empty() {
            debug!("Skipping empty file {:?}", path);
            continue;
        }

        let mapping = mapping::build_mapping(&source_header, &canonical);
        for (row_idx, record) in reader.records().enumerate() {
            let record =
                record.with_context(|| format!("Reading row {} in {path:?}", row_idx + 2))?;
            summary.rows_in += 1;
            let out_row = mapping::map_row(&record, &mapping);
            if deduper.is_duplicate(&out_row) {
                summary.duplicates_skipped += 1;
                continue;
            }
            writer
                .write_record(&out_row)
                .with_context(|| format!("Writing row {} from {path:?}", row_idx + 2))?;
            summary.rows_out += 1;
        }
        info!("✓ Merged {:?}", path);
    }
    writer.flush().context("Flushing output writer")?;

    Ok(summary)
}

/// Returns the header of the first non-empty file in discovery order, or
/// `None` when every file is empty.
fn canonical_header(files: &[PathBuf]) -> Result<Option<Vec<String>>> {
    for path in files {
        let dialect = Dialect::sniff_path(path)?;
        let mut reader = io_utils::open_csv_reader(path, &dialect)?;
        let header = reader
            .headers()
            .with_context(|| format!("Reading header of {path:?}"))?;
        if !header.is_empty() {
            return Ok(Some(header.iter().map(str::to_string).collect()));
        }
    }
    Ok(None)
}
