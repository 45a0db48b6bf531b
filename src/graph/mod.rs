//! Graph-node adapter for the string model.
//!
//! Lets a plucked string sit behind the same `note_on` / `render_block`
//! interface any other voice uses, so drivers that already speak `GraphNode`
//! can pull string samples block by block.

/// Core traits shared by all graph nodes.
pub mod node;
/// Plucked string exposed as a graph node.
pub mod string;

pub use node::{GraphNode, RenderCtx};
pub use string::StringNode;
