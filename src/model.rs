//! Catalog data transfer types: beer records, paginated envelopes, and list filters.

pub mod beer;
pub mod page;
pub mod query;

pub use beer::*;
pub use page::*;
pub use query::*;
