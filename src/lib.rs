//! An in-memory B+tree index for Rust.
//!
//! [`BPlusTree`] is an ordered key-value index built from internal nodes that
//! route by separator keys and leaves that hold the entries. Leaves are linked
//! to their right neighbour, and every node knows its parent, so splits and
//! merges propagate upward without a recorded descent path.
//!
//! # Example
//!
//! ```
//! use linked_bptree::{BPlusTree, Error};
//!
//! let mut tree = BPlusTree::with_order(4)?;
//! for (key, value) in [(7, "g"), (3, "c"), (9, "i"), (1, "a")] {
//!     tree.insert(key, value);
//! }
//!
//! assert_eq!(tree.lookup(&3)?, &"c");
//! assert_eq!(tree.lookup(&4), Err(Error::KeyNotFound));
//!
//! tree.delete(&3);
//! assert_eq!(tree.len(), 3);
//! # Ok::<(), Error>(())
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`
//! - **Configurable fanout** - Any [`Order`] of 2 or more, 3 by default
//! - **`tracing`** - Optional feature that logs splits, merges and root promotions
//!
//! # Implementation
//!
//! Nodes live in an arena and refer to each other by handle: internal nodes
//! hold child handles, every node holds an optional parent handle and a handle
//! to its right sibling on the same level. Nodes store up to eight slots
//! inline.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod bplus_tree;
mod error;
mod order;
mod raw;
mod tracing_helpers;

pub use bplus_tree::BPlusTree;
pub use error::{Error, Result};
pub use order::{DEFAULT_ORDER, Order};
