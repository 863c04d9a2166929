/// Result type used by fallible tree operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors reported by [`BPlusTree`](crate::BPlusTree) and [`Order`](crate::Order).
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// The requested order is below [`Order::MIN`](crate::Order::MIN).
    #[error("order must be greater than or equal to 2, got {order}")]
    InvalidOrder {
        /// The rejected order.
        order: usize,
    },

    /// [`lookup`](crate::BPlusTree::lookup) found no entry for the key.
    #[error("key not found")]
    KeyNotFound,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(
            Error::InvalidOrder { order: 1 }.to_string(),
            "order must be greater than or equal to 2, got 1"
        );
        assert_eq!(Error::KeyNotFound.to_string(), "key not found");
    }

    #[test]
    fn errors_are_core_errors() {
        fn assert_error<E: core::error::Error>(_: &E) {}
        assert_error(&Error::KeyNotFound);
    }
}
