//! # svcstore
//!
//! Record model and catalog loading for svcfind.
//!
//! - [`ServiceRecord`]: one catalog entry (name, description, category, subcategory)
//! - [`Searchable`]: the fixed field list a record contributes to a search index
//! - [`load_catalog`]: JSON or tabular catalog files

#![warn(missing_docs)]

mod catalog;
mod error;
mod record;

pub use catalog::{load_catalog, parse_header, parse_json, parse_table, TableHeader};
pub use error::{Error, Result};
pub use record::{Searchable, ServiceRecord};
