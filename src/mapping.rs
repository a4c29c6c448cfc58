//! Header reconciliation between a source file and the canonical output.
//!
//! Each input file carries its own column order and may miss columns the
//! canonical header names. [`build_mapping()`] computes, once per file, where
//! each canonical column lives in the source header; [`map_row()`] projects a
//! source row into canonical shape, filling gaps with empty strings.

use csv::StringRecord;

/// For each canonical column name, the index of its first occurrence in the
/// source header, or `None` when the source file does not carry the column.
/// Name matching is exact and case-sensitive; duplicate source names resolve
/// to the first occurrence.
pub fn build_mapping(source_header: &[String], canonical_header: &[String]) -> Vec<Option<usize>> {
    canonical_header
        .iter()
        .map(|name| source_header.iter().position(|header| header == name))
        .collect()
}

/// Projects `record` into canonical column order. Unmapped columns and
/// indices beyond the record's length (short rows) yield empty strings, so
/// malformed rows degrade instead of failing.
pub fn map_row(record: &StringRecord, mapping: &[Option<usize>]) -> Vec<String> {
    mapping
        .iter()
        .map(|slot| {
            slot.and_then(|index| record.get(index))
                .unwrap_or("")
                .to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn build_mapping_locates_reordered_columns() {
        let mapping = build_mapping(&header(&["val", "id"]), &header(&["id", "val"]));
        assert_eq!(mapping, vec![Some(1), Some(0)]);
    }

    #[test]
    fn build_mapping_marks_missing_columns() {
        let mapping = build_mapping(&header(&["id"]), &header(&["id", "val"]));
        assert_eq!(mapping, vec![Some(0), None]);
    }

    #[test]
    fn build_mapping_is_case_sensitive() {
        let mapping = build_mapping(&header(&["ID"]), &header(&["id"]));
        assert_eq!(mapping, vec![None]);
    }

    #[test]
    fn build_mapping_prefers_first_duplicate_occurrence() {
        let mapping = build_mapping(&header(&["id", "val", "id"]), &header(&["id"]));
        assert_eq!(mapping, vec![Some(0)]);
    }

    #[test]
    fn map_row_fills_missing_and_out_of_range_with_empty() {
        let record = StringRecord::from(vec!["1"]);
        let mapping = vec![Some(0), Some(5), None];
        assert_eq!(map_row(&record, &mapping), vec!["1", "", ""]);
    }

    #[test]
    fn map_row_reorders_cells() {
        let record = StringRecord::from(vec!["y", "2"]);
        let mapping = vec![Some(1), Some(0)];
        assert_eq!(map_row(&record, &mapping), vec!["2", "y"]);
    }
}
