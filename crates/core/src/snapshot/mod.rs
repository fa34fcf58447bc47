//! Snapshot records - the raw JSON shape of one yearly snapshot file and
//! its normalization into a book ready for the library.
//!
//! A snapshot file is a JSON array of book objects harvested from Libris,
//! optionally enriched with Goodreads metadata.

mod filter;
mod record;

pub use filter::presumed_living;
pub use record::{image_id, GoodreadsMeta, NewBook, RawBook};
