use core::borrow::Borrow;

use smallvec::SmallVec;

use super::handle::Handle;

/// Slots held inline before a node spills to the heap; covers orders up to 8.
/// One extra slot absorbs the overflowing entry until the node splits.
pub(crate) const INLINE_SLOTS: usize = 8;

pub(crate) type Children = SmallVec<[Handle; INLINE_SLOTS + 1]>;

#[allow(clippy::large_enum_variant)]
#[derive(Clone)]
pub(crate) enum Node<K, V> {
    Internal(InternalNode<K>),
    Leaf(LeafNode<K, V>),
}

// B+Tree: internal nodes only route.
#[derive(Clone)]
pub(crate) struct InternalNode<K> {
    parent: Option<Handle>,
    // Right neighbour on the same level.
    next: Option<Handle>,
    // Keys under children[i] are < keys[i]; keys under children[i + 1] are >= keys[i].
    keys: SmallVec<[K; INLINE_SLOTS]>,
    children: Children,
}

// B+Tree: leaves own the entries and form a forward chain.
#[derive(Clone)]
pub(crate) struct LeafNode<K, V> {
    parent: Option<Handle>,
    next: Option<Handle>,
    keys: SmallVec<[K; INLINE_SLOTS]>,
    values: SmallVec<[V; INLINE_SLOTS]>,
}

/// Result of searching for a key in a leaf.
pub(crate) enum SearchResult {
    /// Key was found at the given index.
    Found(usize),
    /// Key was not found; index is where it would be inserted.
    NotFound(usize),
}

impl<K, V> Node<K, V> {
    pub(crate) fn parent(&self) -> Option<Handle> {
        match self {
            Node::Internal(internal) => internal.parent,
            Node::Leaf(leaf) => leaf.parent,
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        match self {
            Node::Internal(internal) => internal.parent = parent,
            Node::Leaf(leaf) => leaf.parent = parent,
        }
    }

    /// Returns the right sibling on the same level.
    pub(crate) fn next(&self) -> Option<Handle> {
        match self {
            Node::Internal(internal) => internal.next,
            Node::Leaf(leaf) => leaf.next,
        }
    }

    pub(crate) fn set_next(&mut self, next: Option<Handle>) {
        match self {
            Node::Internal(internal) => internal.next = next,
            Node::Leaf(leaf) => leaf.next = next,
        }
    }

    /// Returns the leaf node, panicking if this is not a leaf.
    pub(crate) fn as_leaf(&self) -> &LeafNode<K, V> {
        match self {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => panic!("expected leaf node"),
        }
    }

    /// Returns the leaf node mutably, panicking if this is not a leaf.
    pub(crate) fn as_leaf_mut(&mut self) -> &mut LeafNode<K, V> {
        match self {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => panic!("expected leaf node"),
        }
    }

    /// Returns the internal node, panicking if this is not internal.
    pub(crate) fn as_internal(&self) -> &InternalNode<K> {
        match self {
            Node::Internal(internal) => internal,
            Node::Leaf(_) => panic!("expected internal node"),
        }
    }

    /// Returns the internal node mutably, panicking if this is not internal.
    pub(crate) fn as_internal_mut(&mut self) -> &mut InternalNode<K> {
        match self {
            Node::Internal(internal) => internal,
            Node::Leaf(_) => panic!("expected internal node"),
        }
    }
}

impl<K> InternalNode<K> {
    /// Creates a root above a node that just split.
    pub(crate) fn new_root(left: Handle, separator: K, right: Handle) -> Self {
        let mut keys = SmallVec::new();
        keys.push(separator);
        let mut children = SmallVec::new();
        children.push(left);
        children.push(right);
        Self {
            parent: None,
            next: None,
            keys,
            children,
        }
    }

    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn child_count(&self) -> usize {
        self.children.len()
    }

    pub(crate) fn keys(&self) -> &[K] {
        &self.keys
    }

    #[inline]
    pub(crate) fn child(&self, index: usize) -> Handle {
        self.children[index]
    }

    pub(crate) fn children(&self) -> &[Handle] {
        &self.children
    }

    /// Returns the index of the child to descend into for `key`.
    /// Equal keys route right.
    #[inline]
    pub(crate) fn search_child<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.keys.partition_point(|k| k.borrow() <= key)
    }

    pub(crate) fn position_of(&self, child: Handle) -> Option<usize> {
        self.children.iter().position(|&c| c == child)
    }

    /// Registers `child` as the right neighbour of `children[index]`,
    /// separated from it by `key`.
    pub(crate) fn insert_child(&mut self, index: usize, key: K, child: Handle) {
        self.keys.insert(index, key);
        self.children.insert(index + 1, child);
    }

    /// Deletes `key` together with the child to its right.
    ///
    /// Returns the detached child, or `None` when `key` is not a separator here.
    ///
    /// # Panics
    ///
    /// Panics if `key` is present but is not the last key of the node.
    pub(crate) fn delete(&mut self, key: &K) -> Option<Handle>
    where
        K: PartialEq,
    {
        let index = self.keys.iter().position(|k| k == key)?;
        assert!(
            index + 1 == self.keys.len(),
            "only the last key of an internal node can be deleted"
        );
        self.keys.pop();
        self.children.pop()
    }

    /// Splits off everything right of `keys[at]` and returns the promoted
    /// key with the new right sibling. The sibling inherits this node's
    /// parent and `next` link; its children still point at this node.
    pub(crate) fn split(&mut self, at: usize) -> (K, InternalNode<K>) {
        let keys = self.keys.drain(at + 1..).collect();
        let children = self.children.drain(at + 1..).collect();
        let median = self.keys.pop().expect("split point lies within the keys");

        let right = InternalNode {
            parent: self.parent,
            next: self.next,
            keys,
            children,
        };
        (median, right)
    }

    /// Folds the right sibling in, pulling the parent's separator down
    /// between the two key runs.
    pub(crate) fn merge_with_right(&mut self, separator: K, mut right: InternalNode<K>) {
        self.keys.push(separator);
        self.keys.append(&mut right.keys);
        self.children.append(&mut right.children);
        self.next = right.next;
    }
}

impl<K, V> LeafNode<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            parent: None,
            next: None,
            keys: SmallVec::new(),
            values: SmallVec::new(),
        }
    }

    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn keys(&self) -> &[K] {
        &self.keys
    }

    pub(crate) fn values(&self) -> &[V] {
        &self.values
    }

    #[inline]
    pub(crate) fn value(&self, index: usize) -> &V {
        &self.values[index]
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, index: usize) -> &mut V {
        &mut self.values[index]
    }

    /// Searches for a key in this leaf.
    #[inline]
    pub(crate) fn search<Q>(&self, key: &Q) -> SearchResult
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.keys.binary_search_by(|k| k.borrow().cmp(key)) {
            Ok(idx) => SearchResult::Found(idx),
            Err(idx) => SearchResult::NotFound(idx),
        }
    }

    /// Inserts a key and value at the given position.
    pub(crate) fn insert(&mut self, index: usize, key: K, value: V) {
        self.keys.insert(index, key);
        self.values.insert(index, value);
    }

    /// Removes the entry at `index`, shifting later entries left.
    pub(crate) fn remove(&mut self, index: usize) -> (K, V) {
        let key = self.keys.remove(index);
        let value = self.values.remove(index);
        (key, value)
    }

    /// Moves `keys[at..]` into a new leaf that takes over this leaf's
    /// parent and `next` link. The caller links this leaf to the new one.
    pub(crate) fn split(&mut self, at: usize) -> LeafNode<K, V> {
        LeafNode {
            parent: self.parent,
            next: self.next,
            keys: self.keys.drain(at..).collect(),
            values: self.values.drain(at..).collect(),
        }
    }

    /// Appends the right sibling's entries and skips it in the chain.
    pub(crate) fn merge_with_right(&mut self, mut right: LeafNode<K, V>) {
        self.keys.append(&mut right.keys);
        self.values.append(&mut right.values);
        self.next = right.next;
    }
}
