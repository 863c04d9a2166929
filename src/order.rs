use crate::error::{Error, Result};

/// Order used by [`BPlusTree::new`](crate::BPlusTree::new).
pub const DEFAULT_ORDER: usize = 3;

/// The maximum fanout of every node in a tree.
///
/// A node holds at most `order - 1` keys and an internal node at most `order`
/// children. The order is fixed when the tree is built and is validated here,
/// once, so nodes never see an order below [`Order::MIN`].
///
/// # Examples
///
/// ```
/// use linked_bptree::{Error, Order};
///
/// let order = Order::new(4).unwrap();
/// assert_eq!(order.max_keys(), 3);
/// assert_eq!(order.max_children(), 4);
///
/// assert_eq!(Order::new(1), Err(Error::InvalidOrder { order: 1 }));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Order(usize);

impl Order {
    /// Smallest order a tree accepts.
    pub const MIN: usize = 2;

    /// Validates `order`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOrder`] if `order < Order::MIN`.
    pub const fn new(order: usize) -> Result<Self> {
        if order < Self::MIN {
            Err(Error::InvalidOrder { order })
        } else {
            Ok(Self(order))
        }
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Capacity of a node in keys.
    #[must_use]
    pub const fn max_keys(self) -> usize {
        self.0 - 1
    }

    /// Capacity of an internal node in children.
    #[must_use]
    pub const fn max_children(self) -> usize {
        self.0
    }

    /// Number of keys an overflowing node keeps when it splits.
    ///
    /// Order 2 would otherwise keep nothing.
    pub(crate) const fn split_point(self) -> usize {
        let middle = (self.0 - 1) / 2;
        if middle == 0 { 1 } else { middle }
    }
}

impl Default for Order {
    fn default() -> Self {
        Self(DEFAULT_ORDER)
    }
}

impl TryFrom<usize> for Order {
    type Error = Error;

    fn try_from(order: usize) -> Result<Self> {
        Self::new(order)
    }
}

impl From<Order> for usize {
    fn from(order: Order) -> Self {
        order.0
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn rejects_orders_below_two() {
        assert_eq!(Order::new(0), Err(Error::InvalidOrder { order: 0 }));
        assert_eq!(Order::try_from(1), Err(Error::InvalidOrder { order: 1 }));
        assert!(Order::new(2).is_ok());
    }

    #[test]
    fn default_is_three() {
        assert_eq!(Order::default().get(), DEFAULT_ORDER);
        assert_eq!(usize::from(Order::default()), 3);
    }

    #[test]
    fn split_point_never_empties_the_left_node() {
        let points: [(usize, usize); 6] = [(2, 1), (3, 1), (4, 1), (5, 2), (6, 2), (9, 4)];
        for (order, expected) in points {
            assert_eq!(Order::new(order).unwrap().split_point(), expected, "order {order}");
        }
    }
}
