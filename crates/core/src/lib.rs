//! `workforce-core` — shared building blocks with no IO.
//!
//! Error taxonomy, identifiers, the partial-update merge engine and query
//! normalization helpers used by every other crate.

pub mod error;
pub mod id;
pub mod merge;
pub mod query;

pub use error::{AppError, AppResult, ErrorKind};
pub use id::{DepartmentId, UserId};
pub use merge::{Blank, Merge, merge_field, merge_optional, present};
pub use query::{Filter, Page, parse_filter, parse_pagination, parse_text_filter, parse_uri, validate_uri};
