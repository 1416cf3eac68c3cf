use std::path::{Path, PathBuf};

use tracing::info;

use crate::app::Result;
use crate::domain::MasterRecord;
use crate::sink::{join_list, RecordSink};

pub const CSV_HEADER: [&str; 17] = [
    "id",
    "name",
    "position",
    "car_brands",
    "city",
    "district",
    "rating",
    "votes",
    "experience_years",
    "views",
    "date_added",
    "address",
    "phone_numbers",
    "services",
    "description",
    "images",
    "url",
];

/// One row per record; list fields joined into single cells.
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSink for CsvSink {
    fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, records: &[MasterRecord]) -> Result<()> {
        let mut writer = ::csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)?;

        writer.write_record(CSV_HEADER)?;
        for record in records {
            writer.write_record(flatten(record))?;
        }
        writer.flush()?;

        info!(path = %self.path.display(), count = records.len(), "Data saved to {}", self.path.display());
        Ok(())
    }
}

/// Cells for one record, in [`CSV_HEADER`] order.
pub fn flatten(record: &MasterRecord) -> [String; 17] {
    let services: Vec<String> = record
        .services
        .iter()
        .map(|s| format!("{} ({})", s.position, s.car))
        .collect();

    [
        record.id.clone(),
        record.name.clone(),
        record.position.clone(),
        record.car_brands.clone(),
        record.city.clone(),
        record.district.clone(),
        record.rating.map(|r| r.to_string()).unwrap_or_default(),
        record.votes.to_string(),
        record.experience_years.map(|y| y.to_string()).unwrap_or_default(),
        record.views.to_string(),
        record.date_added.clone().unwrap_or_default(),
        record.address.clone(),
        join_list(&record.phone_numbers),
        join_list(&services),
        record.description.clone(),
        join_list(&record.images),
        record.url.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::fixtures::record;

    fn column(name: &str) -> usize {
        CSV_HEADER.iter().position(|h| *h == name).unwrap()
    }

    #[test]
    fn test_phone_numbers_flatten_into_one_cell() {
        let row = flatten(&record());
        assert_eq!(row[column("phone_numbers")], "051 605-04-44; 070 618-04-44");
    }

    #[test]
    fn test_services_and_images_flatten() {
        let row = flatten(&record());
        assert_eq!(
            row[column("services")],
            "Mühərrik ustası (BMW); Diaqnostika (Mercedes)"
        );
        assert_eq!(
            row[column("images")],
            "https://avtotemir.az/uploads/1.jpg; https://avtotemir.az/uploads/2.jpg"
        );
    }

    #[test]
    fn test_absent_values_are_blank_cells() {
        let mut sparse = record();
        sparse.rating = None;
        sparse.experience_years = None;
        sparse.date_added = None;
        sparse.phone_numbers.clear();

        let row = flatten(&sparse);
        assert_eq!(row[column("rating")], "");
        assert_eq!(row[column("experience_years")], "");
        assert_eq!(row[column("date_added")], "");
        assert_eq!(row[column("phone_numbers")], "");
        assert_eq!(row[column("votes")], "9");
    }

    #[test]
    fn test_written_file_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("masters.csv");

        CsvSink::new(&path).write(&[record()]).unwrap();

        let mut reader = ::csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, CSV_HEADER);

        let rows: Vec<::csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][column("id")], "101");
        assert_eq!(&rows[0][column("rating")], "4.6");
        assert_eq!(
            &rows[0][column("description")],
            "Mühərrik təmiri, \"orijinal\" hissələr."
        );
    }

    #[test]
    fn test_empty_crawl_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("masters.csv");

        CsvSink::new(&path).write(&[]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim_end(), CSV_HEADER.join(","));
    }
}
