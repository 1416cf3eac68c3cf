pub mod master;

pub use master::{ListingRef, MalformedRecord, MasterRecord, MasterRecordBuilder, Service};
