//! Hierarchical namespace tree for dotted schema paths.
//!
//! A [`Root`] resolves paths such as `client.as.organization.name` into
//! nodes, creating missing ancestors on the way, and keeps a flat index
//! of every node by absolute path. Children are always enumerated in
//! ascending name order.
//!
//! ```
//! use ecstree::Root;
//!
//! let mut root = Root::new();
//! let name = root.branch("client.as.organization.name");
//! root.branch("client.as.number");
//!
//! assert_eq!(root.node(name).path(), "client.as.organization.name");
//! assert_eq!(root.len(), 5);
//!
//! let children: Vec<_> = root
//!     .get("client.as")
//!     .unwrap()
//!     .list_children()
//!     .map(|node| node.name())
//!     .collect();
//! assert_eq!(children, ["number", "organization"]);
//! ```

pub mod arena;
pub mod builder;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exitcode;
pub mod tree_traits;
pub mod util;

pub use arena::{Children, NodeId, NodeMut, NodeRef, Root, Walk};
pub use builder::TreeBuilder;
pub use errors::{TreeError, TreeResult};
