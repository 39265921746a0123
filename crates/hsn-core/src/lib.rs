//! # HSN Core
//!
//! Lookup and resolution of HSN (Harmonized System of Nomenclature)
//! classification codes.
//!
//! This crate holds everything that does not touch the network or the
//! filesystem: turning loosely shaped tabular rows into an immutable
//! [`CodeIndex`], and walking a query code's 2-digit hierarchy against it.
//!
//! ## Key Types
//!
//! - [`RawRecord`]: One spreadsheet row as header/value pairs, untrusted
//! - [`CodeRecord`]: A normalized `{code, description}` row
//! - [`CodeIndex`]: Immutable code -> description map, built once at startup
//! - [`Outcome`]: Result of resolving one candidate (`Found`, `NotFound`, `NoValidCode`)
//!
//! ## Example
//!
//! ```
//! use hsn_core::{CodeIndex, IndexColumns, Outcome, RawRecord};
//!
//! let rows = vec![
//!     RawRecord::from_iter([(" HSNCode\r\n", "01"), ("Description", "Live animals")]),
//!     RawRecord::from_iter([("HSNCode", "0101"), ("Description", "Horses")]),
//! ];
//! let index = CodeIndex::build(rows, &IndexColumns::default());
//!
//! match index.resolve("0101") {
//!     Outcome::Found { matches, .. } => assert_eq!(matches.len(), 2),
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! ```

pub mod code;
pub mod extract;
pub mod index;
pub mod resolve;

pub use code::digits_only;
pub use extract::{extract_candidates, MAX_CANDIDATE_DIGITS, MIN_CANDIDATE_DIGITS};
pub use index::{normalize_header, CodeIndex, CodeRecord, IndexColumns, RawRecord};
pub use resolve::{resolve, resolve_all, HierarchyMatch, Outcome, SEGMENT_WIDTH};
