//! Error type for the comparison core

use thiserror::Error;

/// Errors returned by [`crate::pixelmatch`] and [`crate::compare`].
///
/// Comparison itself is total over valid buffers; the only failure is a
/// caller passing buffers whose sizes disagree with the stated layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PixelmatchError {
    /// Buffer length, stride or dimensions are inconsistent
    #[error("{0}")]
    InvalidInput(String),
}
