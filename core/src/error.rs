use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Failures reported by [`aggregate`](crate::iter::ext::IteratorExt::aggregate).
///
/// `index` is the 1-based position of the accumulator in the tuple.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("accumulator #{index} finished without producing a result")]
    NoResult { index: usize },

    #[error("accumulator #{index} produced more than one result")]
    MultipleResults { index: usize },
}

