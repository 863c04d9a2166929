use core::borrow::Borrow;
use core::fmt;

use crate::error::{Error, Result};
use crate::order::Order;
use crate::raw::RawBPlusTree;

/// An ordered map stored as a B+tree.
///
/// Internal nodes route by separator keys; leaves hold the entries and are
/// chained left to right. Every node holds at most `order - 1` keys and every
/// internal node at most `order` children, where the [`Order`] is fixed at
/// construction.
///
/// A leaf that overflows splits in two and registers the new half with its
/// parent, which may split in turn; when the root splits a new root is put
/// above it. After a removal, a node whose right sibling is the last child of
/// their shared parent absorbs that sibling if both fit in one node, and the
/// parent drops the separator between them. The root never shrinks.
///
/// # Examples
///
/// ```
/// use linked_bptree::{BPlusTree, Error};
///
/// let mut index = BPlusTree::new();
/// index.insert(15, "fifteen");
/// index.insert(16, "sixteen");
/// index.insert(20, "twenty");
///
/// assert_eq!(index.lookup(&16), Ok(&"sixteen"));
/// assert_eq!(index.lookup(&17), Err(Error::KeyNotFound));
///
/// assert_eq!(index.delete(&16), Some("sixteen"));
/// assert_eq!(index.delete(&16), None);
/// assert_eq!(index.len(), 2);
/// ```
#[derive(Clone)]
pub struct BPlusTree<K, V> {
    raw: RawBPlusTree<K, V>,
}

impl<K, V> BPlusTree<K, V> {
    /// Creates an empty tree of the default order (3).
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bptree::{BPlusTree, DEFAULT_ORDER};
    ///
    /// let tree: BPlusTree<i32, i32> = BPlusTree::new();
    /// assert_eq!(tree.order().get(), DEFAULT_ORDER);
    /// assert!(tree.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::from_order(Order::default())
    }

    /// Creates an empty tree whose nodes hold at most `order - 1` keys.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOrder`] if `order < 2`.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bptree::{BPlusTree, Error};
    ///
    /// assert!(BPlusTree::<u8, u8>::with_order(16).is_ok());
    /// assert_eq!(
    ///     BPlusTree::<u8, u8>::with_order(1).err(),
    ///     Some(Error::InvalidOrder { order: 1 })
    /// );
    /// ```
    pub fn with_order(order: usize) -> Result<Self> {
        Ok(Self::from_order(Order::new(order)?))
    }

    /// Creates an empty tree from an already validated order.
    #[must_use]
    pub fn from_order(order: Order) -> Self {
        BPlusTree {
            raw: RawBPlusTree::new(order),
        }
    }

    #[must_use]
    pub fn order(&self) -> Order {
        self.raw.order()
    }

    /// Returns the number of entries in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// Returns the number of levels, leaves included. An empty tree has height 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bptree::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new();
    /// tree.insert(1, ());
    /// tree.insert(2, ());
    /// assert_eq!(tree.height(), 1);
    ///
    /// tree.insert(3, ());
    /// assert_eq!(tree.height(), 2);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Removes all entries, keeping the order.
    pub fn clear(&mut self) {
        self.raw.clear();
    }
}

impl<K: Clone + Ord, V> BPlusTree<K, V> {
    /// Inserts a key-value pair.
    ///
    /// If the key was already present its value is replaced and the old value
    /// is returned; otherwise `None` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bptree::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new();
    /// assert_eq!(tree.insert(37, "a"), None);
    /// assert_eq!(tree.insert(37, "b"), Some("a"));
    /// assert_eq!(tree.lookup(&37), Ok(&"b"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.raw.insert(key, value)
    }

    /// Removes a key, returning its value.
    ///
    /// Deleting a key that is not present does nothing and returns `None`.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(key)
    }

    /// Returns the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if no entry has this key.
    pub fn lookup<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a reference to the value stored under `key`, if any.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key)
    }

    /// Returns a mutable reference to the value stored under `key`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bptree::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new();
    /// tree.insert("hits", 1);
    /// if let Some(hits) = tree.get_mut("hits") {
    ///     *hits += 1;
    /// }
    /// assert_eq!(tree.get("hits"), Some(&2));
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get_mut(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key).is_some()
    }
}

impl<K, V> Default for BPlusTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for BPlusTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.raw.entries()).finish()
    }
}

impl<K: Clone + Ord, V> Extend<(K, V)> for BPlusTree<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Clone + Ord, V> FromIterator<(K, V)> for BPlusTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}
