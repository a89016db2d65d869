//! Wires graph construction, search, and toolpath emission into one
//! planning request per chess move, and the collaborator interfaces the
//! orchestrator consumes.

use tracing::warn;

use crate::config::PlannerConfig;
use crate::error::PlanningError;
use crate::geometry::{dist, Point};
use crate::graph::{Disc, Graph};
use crate::search::shortest_path;
use crate::toolpath::{emit, render};

/// A board square named by its UCI two-character coordinate (e.g. `e2`).
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Square([u8; 2]);

impl Square {
    #[must_use]
    pub fn new(name: &str) -> Self {
        let bytes = name.as_bytes();
        Self([bytes[0], bytes[1]])
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl std::fmt::Debug for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chess move parsed from a UCI move string: the four- or five-character
/// form (`e2e4`, `e7e8q`) the chess-engine collaborator returns.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Move {
    pub source: Square,
    pub destination: Square,
    pub promotion: Option<char>,
}

impl Move {
    /// Parses a 4- or 5-character UCI move string. A trailing fifth
    /// (promotion) character is kept but never required.
    #[must_use]
    pub fn parse(uci: &str) -> Self {
        Self {
            source: Square::new(&uci[0..2]),
            destination: Square::new(&uci[2..4]),
            promotion: uci.chars().nth(4),
        }
    }
}

/// Supplies board state to the orchestrator: stationary-piece obstacles,
/// square-to-world-coordinate lookup, capture bookkeeping, and move
/// application.
pub trait BoardCollaborator {
    /// Every stationary piece except `excluded`, as inflated obstacle discs.
    fn obstacle_discs(&self, excluded: &[Square]) -> Vec<Disc>;
    /// World coordinates of a square's center.
    fn square_to_position(&self, square: Square) -> Point;
    /// Whether `mv` captures a piece on `destination`.
    fn is_capture(&self, mv: Move) -> bool;
    /// A free off-board staging position for a captured piece.
    fn next_capture_slot(&self) -> Point;
    /// Commits `mv` to the board's internal chess state.
    fn apply_move(&mut self, mv: Move);
}

/// Supplies the next move to play for the current board state.
pub trait ChessEngineCollaborator {
    fn best_move(&self, board_state: &str) -> Move;
}

/// The toolpaths produced by one planning request: an optional capture
/// relocation (the captured piece to its staging square), followed by the
/// moving piece's own path.
#[derive(Debug, Clone, PartialEq)]
pub struct MovePlan {
    pub capture_relocation: Option<String>,
    pub move_toolpath: String,
}

/// Plans one move at a time against a board collaborator: builds a fresh
/// graph around the current obstacles, inserts start and goal, searches,
/// and emits. Owns nothing across calls besides the board and config.
pub struct MoveOrchestrator<B: BoardCollaborator> {
    board: B,
    config: PlannerConfig,
}

impl<B: BoardCollaborator> MoveOrchestrator<B> {
    #[must_use]
    pub fn new(board: B, config: PlannerConfig) -> Self {
        Self { board, config }
    }

    /// Plans (and, on success, commits) the engine's chosen move.
    ///
    /// Capture moves plan two legs: first the captured piece from the
    /// destination square to its staging slot, then the moving piece from
    /// source to destination. The board is only updated once both legs
    /// succeed.
    pub fn plan_move(
        &mut self,
        engine: &impl ChessEngineCollaborator,
        board_state: &str,
    ) -> Result<MovePlan, PlanningError> {
        let mv = engine.best_move(board_state);
        let excluded = [mv.source, mv.destination];

        let capture_relocation = if self.board.is_capture(mv) {
            let destination = self.board.square_to_position(mv.destination);
            let staging = self.board.next_capture_slot();
            Some(self.plan_leg(&excluded, destination, staging)?)
        } else {
            None
        };

        let source = self.board.square_to_position(mv.source);
        let destination = self.board.square_to_position(mv.destination);
        let move_toolpath = self.plan_leg(&excluded, source, destination)?;

        self.board.apply_move(mv);

        Ok(MovePlan {
            capture_relocation,
            move_toolpath,
        })
    }

    /// Builds a fresh graph around the current obstacles and plans one
    /// start-to-goal leg, returning its rendered toolpath text.
    fn plan_leg(&self, excluded: &[Square], start: Point, goal: Point) -> Result<String, PlanningError> {
        let obstacles = self.board.obstacle_discs(excluded);
        let graph = Graph::new(&obstacles)?;

        ensure_clear(&graph, start, self.config.tolerance)?;
        ensure_clear(&graph, goal, self.config.tolerance)?;

        let mut graph = graph;
        let start_node = graph.insert_point(start)?;
        let goal_node = graph.insert_point(goal)?;

        let path = shortest_path(&graph, start_node, goal_node).inspect_err(|_| {
            warn!(?start, ?goal, "move is unreachable given current obstacles");
        })?;

        let instructions = emit(&graph, &path, self.config.feedrate_sentinel);
        Ok(render(&instructions))
    }
}

/// Returns [`PlanningError::StartOrGoalObstructed`] if `point` lies strictly
/// inside any disc already in `graph`. Checked ahead of `insert_point` so an
/// obstructed start or goal is reported with the specific offending
/// obstacle, rather than surfacing as a generic tangent-construction
/// precondition violation.
fn ensure_clear(graph: &Graph, point: Point, tolerance: f64) -> Result<(), PlanningError> {
    for (id, disc) in graph.discs() {
        if dist(point, disc.center) < disc.radius - tolerance {
            return Err(PlanningError::StartOrGoalObstructed { point, disc: id });
        }
    }
    Ok(())
}
