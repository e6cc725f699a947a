//! Threaded comments.
//!
//! The backend returns comments as a flat list with `parent_id` links;
//! [`build_tree`] turns that into a reply forest for display.

mod tree;

pub use tree::{CommentNode, build_tree, count_nodes, find, max_depth};
