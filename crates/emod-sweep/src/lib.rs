//! Parameter-sweep expansion and run materialization.
//!
//! A sweep is the Cartesian product of independent parameter axes; each
//! combination becomes a deferred variant that, when applied by the
//! experiment driver, mutates one simulation's artifacts and returns a tag
//! map for result bookkeeping. Materialization writes one directory of JSON
//! artifacts per variant plus a deterministic runbook, and can append to an
//! append-only CSV run registry.

mod grid;
mod materialize;
mod registry;
mod runbook;
mod task;
mod variant;

pub use grid::{grid, GridAxis};
pub use materialize::{materialize, RunArtifacts};
pub use registry::registry_append;
pub use runbook::{build_runbook, JobReport, RunBook};
pub use task::SimTask;
pub use variant::{sweep, Params, SweepVariant, Tags};
