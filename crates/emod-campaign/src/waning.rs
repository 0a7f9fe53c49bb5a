use emod_core::errors::{EmodError, ErrorInfo};
use emod_schema::{ConfigNode, Schema};
use serde::{Deserialize, Serialize};

/// Parameters selecting the waning-effect curve attached to a vaccine.
///
/// Exactly one decay shape may be requested: a nonzero `decay_constant`
/// selects `WaningEffectBoxExponential` (with `constant_period` as the box
/// duration), a nonzero `expected_expiration` selects
/// `WaningEffectRandomBox`. Supplying both is ambiguous and rejected; the
/// historical Python builders disagreed on which parameter won, so the
/// caller must state one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaningParams {
    /// Days of full efficacy before decay begins (box-exponential only).
    #[serde(default)]
    pub constant_period: f64,
    /// Exponential decay time constant in days; nonzero selects
    /// box-exponential decay.
    #[serde(default)]
    pub decay_constant: f64,
    /// Mean days until the effect is discarded outright; nonzero selects
    /// random-box decay.
    #[serde(default)]
    pub expected_expiration: f64,
}

impl Default for WaningParams {
    fn default() -> Self {
        Self {
            constant_period: 0.0,
            decay_constant: 0.0,
            expected_expiration: 0.0,
        }
    }
}

impl WaningParams {
    /// Box-exponential decay: full efficacy for `constant_period` days, then
    /// exponential decay with the given time constant.
    pub fn box_exponential(constant_period: f64, decay_constant: f64) -> Self {
        Self {
            constant_period,
            decay_constant,
            expected_expiration: 0.0,
        }
    }

    /// Random-box decay: efficacy drops to zero after a random duration with
    /// the given mean.
    pub fn random_box(expected_expiration: f64) -> Self {
        Self {
            constant_period: 0.0,
            decay_constant: 0.0,
            expected_expiration,
        }
    }
}

/// Builds the waning sub-node for an intervention, with `Initial_Effect`
/// set to `initial_effect` exactly.
pub fn waning_config(
    schema: &Schema,
    params: &WaningParams,
    initial_effect: f64,
) -> Result<ConfigNode, EmodError> {
    if params.decay_constant > 0.0 && params.expected_expiration > 0.0 {
        return Err(EmodError::Argument(
            ErrorInfo::new(
                "waning-ambiguous",
                "both decay_constant and expected_expiration are nonzero",
            )
            .with_context("decay_constant", params.decay_constant.to_string())
            .with_context(
                "expected_expiration",
                params.expected_expiration.to_string(),
            )
            .with_hint("set exactly one of the two decay parameters"),
        ));
    }
    let mut node = if params.decay_constant > 0.0 {
        let mut node = schema.class_with_defaults("WaningEffectBoxExponential")?;
        node.set("Box_Duration", params.constant_period)?;
        node.set("Decay_Time_Constant", params.decay_constant)?;
        node
    } else {
        let mut node = schema.class_with_defaults("WaningEffectRandomBox")?;
        node.set("Expected_Discard_Time", params.expected_expiration)?;
        node
    };
    node.set("Initial_Effect", initial_effect)?;
    Ok(node)
}
