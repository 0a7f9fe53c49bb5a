//! Demographics document builders.
//!
//! Produces the `{ Metadata, Defaults, Nodes }` demographics JSON the
//! external simulator consumes, from an explicit node, a synthetic
//! urban/rural grid, or a CSV of node records. Individual properties with
//! heterogeneous-transmission (HINT) matrices attach to the shared defaults
//! block; the matrices are plain rate data evaluated downstream, never here.

mod builder;
mod hint;
mod node;

pub use builder::Demographics;
pub use hint::HintProperty;
pub use node::Node;
