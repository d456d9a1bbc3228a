//! Relationship graph loading, editing and diffing
//!
//! Graphs are loaded lazily from the partner-side listing, edited in place
//! under an [`EditSession`], and committed as a per-user diff.

pub mod diff;
pub mod graph;
pub mod session;

// Re-export key types for convenience
pub use diff::{UserRelationshipDiff, compute_diff};
pub use graph::{LoadReport, build_graph, ensure_loaded};
pub use session::{EditSession, SelectionState, ToggleOutcome};
