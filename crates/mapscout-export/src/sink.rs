use std::fs;
use std::path::{Path, PathBuf};

use mapscout_core::BusinessRecord;

use crate::ExportError;

/// Write one batch to `<dir>/<file_name>`, creating the directory if
/// missing. The header row comes from the record's field names; absent
/// fields serialize as empty cells.
///
/// # Errors
///
/// [`ExportError::Io`] when the directory cannot be created and
/// [`ExportError::Csv`] when a row fails to serialize or write.
pub fn write_batch(
    dir: &Path,
    file_name: &str,
    batch: &[BusinessRecord],
) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);

    let mut writer = csv::Writer::from_path(&path)?;
    for record in batch {
        writer.serialize(record)?;
    }
    writer.flush()?;

    tracing::debug!(path = %path.display(), rows = batch.len(), "batch written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BusinessRecord {
        BusinessRecord {
            name: Some("Sierra Bakehouse".to_owned()),
            address: Some("10 Main St".to_owned()),
            website: None,
            phone_number: Some("(775) 555-0100".to_owned()),
            reviews_count: Some(1234),
            reviews_average: Some(4.5),
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_batch(dir.path(), "run.csv", &[sample()]).unwrap();

        let contents = fs::read_to_string(path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next(),
            Some("name,address,website,phone_number,reviews_count,reviews_average")
        );
        assert_eq!(
            lines.next(),
            Some("Sierra Bakehouse,10 Main St,,(775) 555-0100,1234,4.5")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn absent_fields_serialize_as_empty_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_batch(dir.path(), "run.csv", &[BusinessRecord::default()]).unwrap();

        let contents = fs::read_to_string(path).unwrap();
        assert_eq!(contents.lines().nth(1), Some(",,,,,"));
    }

    #[test]
    fn creates_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("output").join("deep");
        let path = write_batch(&nested, "run.csv", &[sample()]).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn empty_batch_still_produces_an_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_batch(dir.path(), "run.csv", &[]).unwrap();
        assert!(path.exists());
    }
}
