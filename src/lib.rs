//! Tangent-and-arc visibility graph motion planner for a gantry chess robot.
//!
//! Given the current board state and a requested move, builds a fresh
//! visibility graph around the stationary pieces, searches it with A*, and
//! emits a linear-and-arc toolpath for a CNC-style motion controller. See
//! [`orchestrator::MoveOrchestrator`] for the entry point an embedder drives.

pub mod config;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod orchestrator;
pub mod search;
pub mod toolpath;

pub use config::PlannerConfig;
pub use error::{GeometryError, PlanningError};
pub use graph::{Disc, DiscId, Edge, EdgeId, EdgeKind, Graph, Node, NodeId};
pub use orchestrator::{BoardCollaborator, ChessEngineCollaborator, Move, MoveOrchestrator, MovePlan, Square};
pub use search::{shortest_path, Path};
pub use toolpath::{emit, render, Instruction};
