use alloc::vec::Vec;
use core::borrow::Borrow;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Children, InternalNode, LeafNode, Node, SearchResult};
use crate::order::Order;
use crate::tracing_helpers::{debug_log, trace_log};

/// The core B+Tree implementation backing `BPlusTree`.
#[derive(Clone)]
pub(crate) struct RawBPlusTree<K, V> {
    /// Arena storing all tree nodes; parent and sibling links are handles into it.
    nodes: Arena<Node<K, V>>,
    /// Handle to the root node. A fresh tree has an empty leaf as its root.
    root: Handle,
    order: Order,
    /// Total number of key-value pairs in the tree.
    len: usize,
}

impl<K, V> RawBPlusTree<K, V> {
    /// Creates a tree whose root is a single empty leaf.
    pub(crate) fn new(order: Order) -> Self {
        let mut nodes = Arena::new();
        let root = nodes.alloc(Node::Leaf(LeafNode::new()));
        Self {
            nodes,
            root,
            order,
            len: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn order(&self) -> Order {
        self.order
    }

    /// Drops every entry and starts over from an empty leaf root.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = self.nodes.alloc(Node::Leaf(LeafNode::new()));
        self.len = 0;
    }

    /// Number of levels, counting the leaf level.
    pub(crate) fn height(&self) -> usize {
        let mut height = 1;
        let mut current = self.root;
        while let Node::Internal(internal) = self.nodes.get(current) {
            current = internal.child(0);
            height += 1;
        }
        height
    }

    fn first_leaf(&self) -> Handle {
        let mut current = self.root;
        while let Node::Internal(internal) = self.nodes.get(current) {
            current = internal.child(0);
        }
        current
    }

    /// Collects all entries in key order by following the leaf chain.
    pub(crate) fn entries(&self) -> Vec<(&K, &V)> {
        let mut entries = Vec::with_capacity(self.len);
        let mut current = Some(self.first_leaf());

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let leaf = node.as_leaf();
            entries.extend(leaf.keys().iter().zip(leaf.values()));
            current = node.next();
        }

        entries
    }
}

impl<K: Clone + Ord, V> RawBPlusTree<K, V> {
    /// Descends from the root to the leaf responsible for `key`.
    fn target_leaf<Q>(&self, key: &Q) -> Handle
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Node::Internal(internal) = self.nodes.get(current) {
            current = internal.child(internal.search_child(key));
        }
        current
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let leaf = self.nodes.get(self.target_leaf(key)).as_leaf();
        match leaf.search(key) {
            SearchResult::Found(idx) => Some(leaf.value(idx)),
            SearchResult::NotFound(_) => None,
        }
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let leaf_handle = self.target_leaf(key);
        let leaf = self.nodes.get_mut(leaf_handle).as_leaf_mut();
        match leaf.search(key) {
            SearchResult::Found(idx) => Some(leaf.value_mut(idx)),
            SearchResult::NotFound(_) => None,
        }
    }

    /// Inserts a key-value pair into the tree.
    /// Returns the old value if the key was already present.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        let leaf_handle = self.target_leaf(&key);
        let leaf = self.nodes.get_mut(leaf_handle).as_leaf_mut();

        match leaf.search(&key) {
            SearchResult::Found(idx) => Some(core::mem::replace(leaf.value_mut(idx), value)),
            SearchResult::NotFound(idx) => {
                leaf.insert(idx, key, value);
                self.len += 1;

                if leaf.key_count() > self.order.max_keys()
                    && let Some(new_root) = self.split_leaf(leaf_handle)
                {
                    self.root = new_root;
                }
                None
            }
        }
    }

    /// Splits an overflowing leaf. Returns the new root if one was created.
    fn split_leaf(&mut self, leaf_handle: Handle) -> Option<Handle> {
        let right = self.nodes.get_mut(leaf_handle).as_leaf_mut().split(self.order.split_point());
        let separator = right.keys()[0].clone();

        let right_handle = self.nodes.alloc(Node::Leaf(right));
        self.nodes.get_mut(leaf_handle).set_next(Some(right_handle));
        trace_log!(left = ?leaf_handle, right = ?right_handle, "split leaf");

        self.register_split(leaf_handle, separator, right_handle)
    }

    /// Registers `right`, freshly split off `left`, with their parent.
    ///
    /// Parents that overflow split in turn, so this walks up until a parent
    /// has room or the old root splits. Returns the new root in that case.
    fn register_split(&mut self, mut left: Handle, mut separator: K, mut right: Handle) -> Option<Handle> {
        loop {
            let Some(parent) = self.nodes.get(left).parent() else {
                let root = self.nodes.alloc(Node::Internal(InternalNode::new_root(left, separator, right)));
                self.nodes.get_mut(left).set_parent(Some(root));
                self.nodes.get_mut(right).set_parent(Some(root));
                debug_log!(root = ?root, "promoted new root");
                return Some(root);
            };

            self.nodes.get_mut(right).set_parent(Some(parent));
            let node = self.nodes.get_mut(parent).as_internal_mut();
            let index = node.position_of(left).expect("split node is registered with its parent");
            node.insert_child(index, separator, right);

            if node.key_count() <= self.order.max_keys() {
                return None;
            }

            let (median, sibling) = node.split(self.order.split_point());
            let moved = Children::from_slice(sibling.children());
            let sibling_handle = self.nodes.alloc(Node::Internal(sibling));
            self.nodes.get_mut(parent).set_next(Some(sibling_handle));
            for child in moved {
                self.nodes.get_mut(child).set_parent(Some(sibling_handle));
            }
            trace_log!(left = ?parent, right = ?sibling_handle, "split internal node");

            left = parent;
            separator = median;
            right = sibling_handle;
        }
    }

    /// Removes a key from the tree and returns its value.
    /// A missing key leaves the tree untouched.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let leaf_handle = self.target_leaf(key);
        let leaf = self.nodes.get_mut(leaf_handle).as_leaf_mut();
        let SearchResult::Found(idx) = leaf.search(key) else {
            return None;
        };

        let (_, value) = leaf.remove(idx);
        self.len -= 1;
        self.fold_right_sibling(leaf_handle);

        Some(value)
    }

    /// Returns `(parent, sibling)` when the right sibling of `handle` can be
    /// folded into it.
    ///
    /// A parent only ever gives up its last separator, so the two nodes must
    /// be the parent's last two children, and their contents must fit in one
    /// node.
    fn foldable_sibling(&self, handle: Handle) -> Option<(Handle, Handle)> {
        let node = self.nodes.get(handle);
        let sibling = node.next()?;
        let parent = node.parent()?;

        let [.., left, right] = self.nodes.get(parent).as_internal().children() else {
            return None;
        };
        if (*left, *right) != (handle, sibling) {
            return None;
        }

        let max_keys = self.order.max_keys();
        let fits = match (node, self.nodes.get(sibling)) {
            (Node::Leaf(leaf), Node::Leaf(next)) => leaf.key_count() + next.key_count() <= max_keys,
            // The parent's separator comes down between the two key runs.
            (Node::Internal(internal), Node::Internal(next)) => {
                internal.key_count() + 1 + next.key_count() <= max_keys
                    && internal.child_count() + next.child_count() <= self.order.max_children()
            }
            _ => false,
        };

        fits.then_some((parent, sibling))
    }

    /// Folds the right sibling into `handle` when they fit together, then
    /// removes the obsolete separator from the parent, which may fold in turn.
    fn fold_right_sibling(&mut self, handle: Handle) {
        let Some((parent, sibling)) = self.foldable_sibling(handle) else {
            return;
        };

        let separator = self
            .nodes
            .get(parent)
            .as_internal()
            .keys()
            .last()
            .cloned()
            .expect("a parent of two children holds a separator");

        let absorbed = self.nodes.take(sibling);
        let moved = match &absorbed {
            Node::Internal(right) => Children::from_slice(right.children()),
            Node::Leaf(_) => Children::new(),
        };
        match (self.nodes.get_mut(handle), absorbed) {
            (Node::Leaf(leaf), Node::Leaf(right)) => leaf.merge_with_right(right),
            (Node::Internal(internal), Node::Internal(right)) => internal.merge_with_right(separator.clone(), right),
            _ => unreachable!("siblings live on the same level"),
        }
        for child in moved {
            self.nodes.get_mut(child).set_parent(Some(handle));
        }
        trace_log!(node = ?handle, absorbed = ?sibling, "folded right sibling");

        self.delete_separator(parent, &separator);
    }

    fn delete_separator(&mut self, handle: Handle, separator: &K) {
        if self.nodes.get_mut(handle).as_internal_mut().delete(separator).is_some() {
            self.fold_right_sibling(handle);
        }
    }
}
