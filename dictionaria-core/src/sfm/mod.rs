//! Standard Format Marker (SFM) example records.
//!
//! An SFM record is a block of backslash-prefixed fields such as
//!
//! ```text
//! \ref d48204ced7d012dd071d0ec402e58d20
//! \tx A beiko.
//! \mb a beiko
//! \gl DET child
//! \ft The child.
//! ```
//!
//! [`ExampleRecord`] holds one such block with a named slot per recognised
//! [`Marker`]. Parsing files into records lives in `dictionaria-data`.

mod marker;
mod normalize;
mod record;

use thiserror::Error;

pub use marker::Marker;
pub use normalize::{collapse_whitespace, normalize_alignment};
pub use record::{ExampleRecord, IdPolicy, MULTI_VALUE_SEPARATOR};

/// Errors raised while building an example record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The marker is not part of the example record schema.
    #[error("unknown marker \\{marker}")]
    UnknownMarker {
        /// The offending marker code, without the backslash.
        marker: String,
    },
}
