mod arena;
mod handle;
mod node;
mod raw_bplus_tree;

pub(crate) use raw_bplus_tree::RawBPlusTree;
