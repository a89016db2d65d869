//! Configuration options recognized by the planner.

use serde::{Deserialize, Serialize};

/// Configuration recognized by the core. Carries no I/O of
/// its own: an embedder deserializes this out of whatever configuration
/// format it already owns and passes the value in.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PlannerConfig {
    /// Additive inflation applied to obstacle discs. The core never inflates
    /// discs itself (`BoardCollaborator::obstacle_discs` already returns
    /// discs inflated by piece radius plus clearance already); this
    /// field exists so an embedder's board collaborator can read it out of
    /// the same config value the rest of the planner uses.
    pub piece_clearance_radius: f64,
    /// Numeric feedrate literal emitted on every move line.
    pub feedrate_sentinel: f64,
    /// Tolerance used for on-boundary and equality checks.
    pub tolerance: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            piece_clearance_radius: 2.0,
            feedrate_sentinel: 99_999_999.0,
            tolerance: 1e-6,
        }
    }
}
