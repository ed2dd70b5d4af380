//! Data model types.
//!
//! This module contains the core types for representing a resource graph:
//! - Identifiers
//! - Values (flat data and node handles)
//! - Nodes and shared node handles
//! - Construction options

pub mod id;
pub mod node;
pub mod options;
pub mod value;

pub use id::{is_anonymous, is_blank, Identifier, BLANK_PREFIX};
pub use node::{Node, NodeRef};
pub use options::NodeOptions;
pub use value::{Attributes, Shape, Value};
