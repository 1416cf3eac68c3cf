pub mod context;
pub mod error;

pub use context::ScrapeContext;
pub use error::{Result, UstaError};
