//! Record sinks: where a finished crawl's records are written.

mod csv;
mod json;

pub use self::csv::{flatten, CsvSink, CSV_HEADER};
pub use self::json::{read_json, JsonSink};

use std::path::Path;

use crate::app::Result;
use crate::domain::MasterRecord;

/// Separator for list-valued fields in flat output.
pub const LIST_DELIMITER: &str = "; ";

pub trait RecordSink {
    fn path(&self) -> &Path;
    fn write(&self, records: &[MasterRecord]) -> Result<()>;
}

pub fn join_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(LIST_DELIMITER)
}
