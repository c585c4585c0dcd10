//! Cross-run merge of per-query artifacts.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::naming::normalize_query;
use crate::ExportError;

/// Merge every per-run CSV for `query` in `dir` into one de-duplicated
/// artifact named `merged_<timestamp>_<normalized-query>.csv`.
///
/// Inputs are matched by the `_<normalized-query>.csv` suffix; earlier
/// merged artifacts are skipped so the operation stays idempotent. Exact
/// duplicate rows are dropped, first-seen order wins. Returns `None` when
/// no per-run artifact exists for the query.
///
/// # Errors
///
/// [`ExportError::Io`] when the directory cannot be listed and
/// [`ExportError::Csv`] when an input cannot be read or the output cannot
/// be written.
pub fn merge_runs(
    dir: &Path,
    timestamp: &str,
    query: &str,
) -> Result<Option<PathBuf>, ExportError> {
    let normalized = normalize_query(query);
    let suffix = format!("_{normalized}.csv");

    let mut inputs: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.ends_with(&suffix) && !name.starts_with("merged_") {
            inputs.push(entry.path());
        }
    }
    if inputs.is_empty() {
        return Ok(None);
    }
    // Timestamped names make lexical order chronological.
    inputs.sort();

    let mut header: Option<csv::StringRecord> = None;
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut rows: Vec<csv::StringRecord> = Vec::new();

    for input in &inputs {
        let mut reader = csv::Reader::from_path(input)?;
        let file_header = reader.headers()?.clone();
        if header.is_none() && !file_header.is_empty() {
            header = Some(file_header);
        }
        for row in reader.records() {
            let row = row?;
            let key: Vec<String> = row.iter().map(str::to_owned).collect();
            if seen.insert(key) {
                rows.push(row);
            }
        }
    }

    let out = dir.join(format!("merged_{timestamp}_{normalized}.csv"));
    let mut writer = csv::Writer::from_path(&out)?;
    if let Some(header) = &header {
        writer.write_record(header)?;
    }
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    tracing::info!(
        path = %out.display(),
        inputs = inputs.len(),
        rows = rows.len(),
        "merged per-run artifacts"
    );
    Ok(Some(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::write_batch;
    use mapscout_core::BusinessRecord;

    fn record(name: &str) -> BusinessRecord {
        BusinessRecord {
            name: Some(name.to_owned()),
            ..BusinessRecord::default()
        }
    }

    #[test]
    fn merges_runs_and_drops_duplicate_rows() {
        let dir = tempfile::tempdir().unwrap();
        write_batch(
            dir.path(),
            "20260101_000000_bakeries_in_reno.csv",
            &[record("Alpha"), record("Bravo")],
        )
        .unwrap();
        write_batch(
            dir.path(),
            "20260102_000000_bakeries_in_reno.csv",
            &[record("Bravo"), record("Charlie")],
        )
        .unwrap();

        let merged = merge_runs(dir.path(), "20260102_000000", "bakeries in reno")
            .unwrap()
            .unwrap();
        assert_eq!(
            merged.file_name().and_then(|n| n.to_str()),
            Some("merged_20260102_000000_bakeries_in_reno.csv")
        );

        let contents = fs::read_to_string(&merged).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 4, "header plus three unique rows");
        assert!(lines[1].starts_with("Alpha,"));
        assert!(lines[2].starts_with("Bravo,"));
        assert!(lines[3].starts_with("Charlie,"));
    }

    #[test]
    fn ignores_artifacts_of_other_queries() {
        let dir = tempfile::tempdir().unwrap();
        write_batch(
            dir.path(),
            "20260101_000000_bakeries_in_reno.csv",
            &[record("Alpha")],
        )
        .unwrap();
        write_batch(
            dir.path(),
            "20260101_000000_bars_in_tampa.csv",
            &[record("Zulu")],
        )
        .unwrap();

        let merged = merge_runs(dir.path(), "20260101_000000", "bakeries in reno")
            .unwrap()
            .unwrap();
        let contents = fs::read_to_string(&merged).unwrap();
        assert!(contents.contains("Alpha"));
        assert!(!contents.contains("Zulu"));
    }

    #[test]
    fn skips_prior_merged_artifacts_for_idempotence() {
        let dir = tempfile::tempdir().unwrap();
        write_batch(
            dir.path(),
            "20260101_000000_bakeries_in_reno.csv",
            &[record("Alpha")],
        )
        .unwrap();

        merge_runs(dir.path(), "20260101_000000", "bakeries in reno").unwrap();
        // A second merge sees the prior merged file in the directory but
        // must not treat it as an input.
        let merged = merge_runs(dir.path(), "20260102_000000", "bakeries in reno")
            .unwrap()
            .unwrap();

        let contents = fs::read_to_string(&merged).unwrap();
        assert_eq!(contents.lines().count(), 2, "header plus one row");
    }

    #[test]
    fn returns_none_when_no_artifacts_match() {
        let dir = tempfile::tempdir().unwrap();
        let merged = merge_runs(dir.path(), "20260101_000000", "bakeries in reno").unwrap();
        assert!(merged.is_none());
    }
}
