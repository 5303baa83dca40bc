use thiserror::Error;

/// Errors returned by the checked table and map operations.
///
/// A failed operation never leaves partial state behind: a rejected `put`
/// neither resizes the table nor touches any entry.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A key, value, or configuration parameter was rejected before the
    /// operation touched the table.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// A computed bucket index fell outside the slot array. This indicates a
    /// bug in index computation or a capacity that is not a power of two.
    #[error("bucket index {index} out of bounds for capacity {capacity}")]
    InvariantViolation {
        /// The offending bucket index.
        index: usize,
        /// The slot array length at the time of the failure.
        capacity: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            Error::InvalidArgument("key cannot be null").to_string(),
            "invalid argument: key cannot be null"
        );
        assert_eq!(
            Error::InvariantViolation {
                index: 17,
                capacity: 16
            }
            .to_string(),
            "bucket index 17 out of bounds for capacity 16"
        );
    }
}
