//! Best-effort CSV dialect detection.
//!
//! Spreadsheet exports arrive with inconsistent delimiters, so each input is
//! sniffed from a bounded prefix before it is parsed. Detection is a soft
//! capability: an ambiguous or empty sample falls back to the default
//! comma/double-quote dialect and never aborts a run.

use std::{
    fs::File,
    io::{self, Read, Seek, SeekFrom},
    path::Path,
};

use anyhow::{Context, Result};

/// Number of bytes sampled from the head of a file during sniffing.
pub const SAMPLE_BYTES: usize = 8192;

/// Number of sample lines scored per candidate delimiter.
const SAMPLE_LINES: usize = 10;

const CANDIDATE_DELIMITERS: &[u8] = &[b',', b';', b'\t', b'|'];

/// Syntactic conventions used to parse a CSV file's bytes into rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: u8,
    pub quote: u8,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
        }
    }
}

impl Dialect {
    /// Sniffs the dialect of the file at `path`. Only the open can fail;
    /// ambiguous content yields the default dialect.
    pub fn sniff_path(path: &Path) -> Result<Dialect> {
        let mut file =
            File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
        Self::sniff_reader(&mut file).with_context(|| format!("Sampling {path:?}"))
    }

    /// Reads at most [`SAMPLE_BYTES`] from `source`, restores the read
    /// position, and detects the dialect from the sample.
    pub fn sniff_reader<R: Read + Seek>(source: &mut R) -> io::Result<Dialect> {
        let start = source.stream_position()?;
        let mut sample = Vec::with_capacity(SAMPLE_BYTES);
        (&mut *source)
            .take(SAMPLE_BYTES as u64)
            .read_to_end(&mut sample)?;
        source.seek(SeekFrom::Start(start))?;
        Ok(Self::detect(&sample))
    }

    /// Scores each candidate delimiter by how consistently it splits the
    /// sample lines into more than one field. For a candidate to be viable
    /// the first line must split into at least two fields; the score is the
    /// number of lines matching the first line's field count, weighted by
    /// that count so wider tables win ties. No viable candidate means the
    /// default dialect.
    pub fn detect(sample: &[u8]) -> Dialect {
        let text = String::from_utf8_lossy(sample);
        let text = text.trim_start_matches('\u{feff}');
        let lines: Vec<&str> = text.lines().take(SAMPLE_LINES).collect();
        if lines.is_empty() {
            return Dialect::default();
        }

        let mut best = Dialect::default();
        let mut best_score = 0u64;
        for &delimiter in CANDIDATE_DELIMITERS {
            let counts: Vec<usize> = lines
                .iter()
                .map(|line| field_count(line, delimiter))
                .collect();
            let target = counts[0];
            if target <= 1 {
                continue;
            }
            let consistent = counts.iter().filter(|&&count| count == target).count() as u64;
            let score = consistent * target as u64;
            if score > best_score {
                best_score = score;
                best = Dialect {
                    delimiter,
                    quote: b'"',
                };
            }
        }
        best
    }
}

fn field_count(line: &str, delimiter: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(|record| record.ok())
        .map(|record| record.len())
        .unwrap_or(1)
}
