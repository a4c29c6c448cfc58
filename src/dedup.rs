//! Duplicate-row detection with key normalization.
//!
//! A [`Deduper`] owns the set of keys seen during one merge run. The key
//! strategy is fixed once from the canonical header: when every configured
//! key column is present, rows are keyed by the normalized values at those
//! positions; otherwise the whole mapped row is hashed. The first row to
//! claim a key wins, every later row with an equal key is a duplicate,
//! regardless of which file it came from.

use std::collections::HashSet;

use sha2::{Digest, Sha256};

// NUL does not occur in well-formed CSV cell text; a cell that does contain
// one can alias two different rows in hash mode (known limitation).
const HASH_SEPARATOR: u8 = 0;

/// Canonicalizes a cell value for key comparison only; written output is
/// never altered. Trims whitespace, collapses float-like renderings of whole
/// numbers ("7.0" -> "7"), and lowercases everything else, so that the id
/// `7` exported as `"7"`, `"7.0"`, or `" 7.00 "` keys identically.
pub fn normalize_key(value: &str) -> String {
    let trimmed = value.trim();
    if looks_numeric(trimmed) {
        if let Ok(parsed) = trimmed.parse::<f64>() {
            if parsed.fract() == 0.0 {
                return format!("{parsed:.0}");
            }
        }
    }
    trimmed.to_lowercase()
}

/// True for values made of digits and at most one decimal point.
fn looks_numeric(value: &str) -> bool {
    let mut digits = 0usize;
    let mut dots = 0usize;
    for ch in value.chars() {
        match ch {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}

/// Run-scoped duplicate tracker. The variant is chosen once per run from the
/// canonical header, never per row.
#[derive(Debug)]
pub enum Deduper {
    /// Key rows by the normalized values at fixed canonical positions.
    SemanticKey {
        positions: Vec<usize>,
        seen: HashSet<Vec<String>>,
    },
    /// Key rows by a SHA-256 digest of the full mapped row.
    ContentHash { seen: HashSet<[u8; 32]> },
}

impl Deduper {
    /// Selects the key strategy for a run: semantic keys when every name in
    /// `key_columns` occurs in `canonical_header`, full-row hashing
    /// otherwise.
    pub fn for_header(canonical_header: &[String], key_columns: &[&str]) -> Self {
        let positions: Option<Vec<usize>> = key_columns
            .iter()
            .map(|name| canonical_header.iter().position(|header| header == name))
            .collect();
        match positions {
            Some(positions) => Deduper::SemanticKey {
                positions,
                seen: HashSet::new(),
            },
            None => Deduper::ContentHash {
                seen: HashSet::new(),
            },
        }
    }

    /// Tests `row` against the seen set, registering its key when unseen.
    pub fn is_duplicate(&mut self, row: &[String]) -> bool {
        match self {
            Deduper::SemanticKey { positions, seen } => {
                let key: Vec<String> = positions
                    .iter()
                    .map(|&index| {
                        normalize_key(row.get(index).map(String::as_str).unwrap_or(""))
                    })
                    .collect();
                !seen.insert(key)
            }
            Deduper::ContentHash { seen } => !seen.insert(hash_row(row)),
        }
    }
}

fn hash_row(row: &[String]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for (index, cell) in row.iter().enumerate() {
        if index > 0 {
            hasher.update([HASH_SEPARATOR]);
        }
        hasher.update(cell.as_bytes());
    }
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| cell.to_string()).collect()
    }

    const KEYS: &[&str] = &["game_id", "play_id"];

    #[test]
    fn normalize_key_collapses_whole_floats() {
        assert_eq!(normalize_key("7"), "7");
        assert_eq!(normalize_key("7.0"), "7");
        assert_eq!(normalize_key(" 7.00 "), "7");
    }

    #[test]
    fn normalize_key_lowercases_text() {
        assert_eq!(normalize_key("ABC"), "abc");
        assert_eq!(normalize_key(" MiXeD "), "mixed");
    }

    #[test]
    fn normalize_key_leaves_fractional_and_malformed_numbers() {
        assert_eq!(normalize_key("7.5"), "7.5");
        assert_eq!(normalize_key(".5"), ".5");
        assert_eq!(normalize_key("1.2.3"), "1.2.3");
        assert_eq!(normalize_key("-7.0"), "-7.0");
        assert_eq!(normalize_key(""), "");
    }

    #[test]
    fn for_header_uses_semantic_keys_when_columns_present() {
        let deduper = Deduper::for_header(&header(&["game_id", "play_id", "yards"]), KEYS);
        assert!(matches!(
            deduper,
            Deduper::SemanticKey { ref positions, .. } if positions == &[0, 1]
        ));
    }

    #[test]
    fn for_header_falls_back_to_hashing_when_a_key_column_is_missing() {
        let deduper = Deduper::for_header(&header(&["game_id", "yards"]), KEYS);
        assert!(matches!(deduper, Deduper::ContentHash { .. }));
    }

    #[test]
    fn semantic_mode_treats_normalized_keys_as_equal() {
        let mut deduper = Deduper::for_header(&header(&["game_id", "play_id"]), KEYS);
        assert!(!deduper.is_duplicate(&row(&["7", "1"])));
        assert!(deduper.is_duplicate(&row(&["7.0", "1.0"])));
        assert!(deduper.is_duplicate(&row(&[" 7.00 ", " 1 "])));
        assert!(!deduper.is_duplicate(&row(&["7", "2"])));
    }

    #[test]
    fn hash_mode_requires_exact_row_equality() {
        let mut deduper = Deduper::for_header(&header(&["a", "b"]), KEYS);
        assert!(!deduper.is_duplicate(&row(&["x", "y"])));
        assert!(deduper.is_duplicate(&row(&["x", "y"])));
        assert!(!deduper.is_duplicate(&row(&["x", "Y"])));
    }

    #[test]
    fn hash_mode_distinguishes_cell_boundaries() {
        let mut deduper = Deduper::for_header(&header(&["a", "b"]), KEYS);
        assert!(!deduper.is_duplicate(&row(&["a,b", "c"])));
        assert!(!deduper.is_duplicate(&row(&["a", "b,c"])));
    }

    proptest! {
        #[test]
        fn integer_and_float_renderings_normalize_identically(n in 0u32..1_000_000u32) {
            prop_assert_eq!(
                normalize_key(&n.to_string()),
                normalize_key(&format!("{n}.0"))
            );
        }
    }
}
