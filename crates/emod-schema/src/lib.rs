//! Schema-backed configuration nodes.
//!
//! The external simulator publishes a JSON schema describing every
//! intervention and event class it understands. This crate loads that schema
//! once and hands out [`ConfigNode`] values pre-populated with the declared
//! defaults; assigning a field the schema does not declare fails at
//! assignment time rather than surfacing as a silently dropped key.

mod node;
mod schema;

pub use node::ConfigNode;
pub use schema::{FieldSpec, Schema};
