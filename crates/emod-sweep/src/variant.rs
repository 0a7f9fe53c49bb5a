use std::collections::BTreeMap;
use std::sync::Arc;

use emod_core::errors::EmodError;
use serde_json::Value;

use crate::grid::{grid, GridAxis};

/// One combination of axis values, parameter name to chosen value.
pub type Params = BTreeMap<String, Value>;

/// Result-bookkeeping tags returned by a mutator, parameter name to the
/// value it applied.
pub type Tags = BTreeMap<String, Value>;

/// A deferred simulation variant: one parameter combination paired with the
/// mutator that will apply it when the experiment driver materializes the
/// run. Nothing is evaluated at combinator time.
pub struct SweepVariant<T> {
    params: Params,
    mutator: Arc<dyn Fn(&mut T, &Params) -> Result<Tags, EmodError> + Send + Sync>,
}

impl<T> Clone for SweepVariant<T> {
    fn clone(&self) -> Self {
        Self {
            params: self.params.clone(),
            mutator: Arc::clone(&self.mutator),
        }
    }
}

impl<T> std::fmt::Debug for SweepVariant<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SweepVariant")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl<T> SweepVariant<T> {
    /// The parameter combination this variant will apply.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Applies the combination to one simulation's artifacts, returning the
    /// tag map describing what was changed.
    pub fn apply(&self, target: &mut T) -> Result<Tags, EmodError> {
        (self.mutator)(target, &self.params)
    }
}

/// Expands the axes into one deferred variant per combination, leftmost
/// axis varying slowest. The mutator is shared; each variant carries its own
/// parameter map.
pub fn sweep<T, F>(axes: &[GridAxis], mutator: F) -> Vec<SweepVariant<T>>
where
    F: Fn(&mut T, &Params) -> Result<Tags, EmodError> + Send + Sync + 'static,
{
    let mutator: Arc<dyn Fn(&mut T, &Params) -> Result<Tags, EmodError> + Send + Sync> =
        Arc::new(mutator);
    grid(axes)
        .into_iter()
        .map(|params| SweepVariant {
            params,
            mutator: Arc::clone(&mutator),
        })
        .collect()
}
