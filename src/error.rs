//! Result and error types for the crate.

use miette::Diagnostic;
use thiserror::Error;

use crate::graph::{DiscId, NodeId};
use crate::geometry::Point;

/// Which bitangent construction a precondition violation occurred in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BitangentKind {
    /// The two internal (crossing) bitangents.
    Internal,
    /// The two external (same-side) bitangents.
    External,
    /// The point-to-circle tangent used when inserting a zero-radius disc.
    PointToCircle,
}

impl std::fmt::Display for BitangentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BitangentKind::Internal => "internal bitangent",
            BitangentKind::External => "external bitangent",
            BitangentKind::PointToCircle => "point-to-circle tangent",
        };
        f.write_str(name)
    }
}

/// Errors raised while constructing tangent/arc geometry between discs.
#[derive(Error, Debug, Diagnostic, Copy, Clone, PartialEq)]
pub enum GeometryError {
    /// The two disc centers are too close (or too far inside one another) for the
    /// requested bitangent construction to exist: the `arccos` argument would fall
    /// outside `[-1, 1]`.
    #[error("{kind} between disc {disc_a:?} and disc {disc_b:?} does not exist")]
    PreconditionViolation {
        disc_a: DiscId,
        disc_b: DiscId,
        kind: BitangentKind,
    },
}

/// Errors raised while planning a path through a graph.
#[derive(Error, Debug, Diagnostic)]
pub enum PlanningError {
    /// A bitangent construction failed while building or extending the graph.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Geometry(#[from] GeometryError),

    /// The A* search exhausted its open set without reaching the goal.
    #[error("no path exists from node {start:?} to node {goal:?}")]
    Unreachable { start: NodeId, goal: NodeId },

    /// The requested start or goal point lies within the interior of an obstacle disc.
    #[error("point ({:.3}, {:.3}) lies inside obstacle disc {disc:?}", point.x, point.y)]
    StartOrGoalObstructed { point: Point, disc: DiscId },
}

/// Result alias carrying a [`PlanningError`].
pub type Result<T> = std::result::Result<T, PlanningError>;
