//! Intervention builders and campaign event composers.
//!
//! Builders return detached [`emod_schema::ConfigNode`] values; composers
//! wrap them in scheduled or triggered campaign events; a [`CampaignBuilder`]
//! accumulates events and serializes the campaign document the simulator
//! consumes. All field names are dictated by the external schema and are
//! reproduced verbatim.

mod builder;
mod events;
mod interventions;
mod waning;

pub use builder::CampaignBuilder;
pub use events::{
    delayed_intervention, routine_immunization, routine_plus_catchup, scheduled_campaign_event,
    triggered_campaign_event, EventTargeting, Repetition, RoutineImmunizationOpts,
    RoutinePlusCatchupOpts,
};
pub use interventions::{
    broadcast_event, node_infectivity_multiplier, outbreak_seed, simple_vaccine, typhoid_vaccine,
    OutbreakOpts, VaccineOpts,
};
pub use waning::{waning_config, WaningParams};
