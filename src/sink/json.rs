use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::app::Result;
use crate::domain::MasterRecord;
use crate::sink::RecordSink;

/// Pretty-printed UTF-8 JSON array of records.
pub struct JsonSink {
    path: PathBuf,
}

impl JsonSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSink for JsonSink {
    fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, records: &[MasterRecord]) -> Result<()> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        info!(path = %self.path.display(), count = records.len(), "Data saved to {}", self.path.display());
        Ok(())
    }
}

pub fn read_json(path: &Path) -> Result<Vec<MasterRecord>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::fixtures::record;

    #[test]
    fn test_round_trip_preserves_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("masters.json");

        let mut sparse = record();
        sparse.id = "102".into();
        sparse.rating = None;
        sparse.experience_years = None;
        sparse.date_added = None;
        sparse.phone_numbers.clear();
        let records = vec![record(), sparse];

        let sink = JsonSink::new(&path);
        sink.write(&records).unwrap();

        assert_eq!(read_json(&path).unwrap(), records);
    }

    #[test]
    fn test_output_keeps_non_ascii_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("masters.json");

        JsonSink::new(&path).write(&[record()]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();

        assert!(text.contains("Elvin Məmmədov"));
        assert!(text.contains("\"phone_numbers\""));
        assert!(text.contains("\"experience_years\": 12"));
    }

    #[test]
    fn test_empty_crawl_writes_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("masters.json");

        JsonSink::new(&path).write(&[]).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "[]");
        assert!(read_json(&path).unwrap().is_empty());
    }
}
