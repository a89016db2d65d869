//! Translates a [`Path`] into a stream of linear and arc motion instructions.

use std::f64::consts::PI;

use crate::geometry::{normalize_angle_0_2pi, v2v_angle};
use crate::graph::{Graph, NodeId};
use crate::search::Path;

/// A single motion-controller instruction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Instruction {
    /// A straight move to `(x, y)`.
    Linear { x: f64, y: f64, feedrate: f64 },
    /// A circular move to `(x, y)`, with `(i, j)` the offset from the arc's
    /// start to its center, in the given direction.
    Arc {
        x: f64,
        y: f64,
        i: f64,
        j: f64,
        clockwise: bool,
        feedrate: f64,
    },
}

impl Instruction {
    /// Renders this instruction as one line of the controller's grammar.
    #[must_use]
    pub fn to_gcode_line(self) -> String {
        match self {
            Instruction::Linear { x, y, feedrate } => format!("G1 X{x} Y{y} F{feedrate}"),
            Instruction::Arc {
                x,
                y,
                i,
                j,
                clockwise,
                feedrate,
            } => {
                let opcode = if clockwise { "G2" } else { "G3" };
                format!("{opcode} X{x} Y{y} I{i} J{j} F{feedrate}")
            }
        }
    }
}

/// Joins a prefix "absolute positioning" directive and the instruction
/// stream into the newline-separated text a motion controller consumes.
#[must_use]
pub fn render(instructions: &[Instruction]) -> String {
    let mut lines = vec!["G90".to_string()];
    lines.extend(instructions.iter().map(|i| i.to_gcode_line()));
    lines.join("\n")
}

/// Translates a path into linear and arc instructions.
///
/// Consecutive hugging hops on the same disc are collapsed into a single arc
/// instruction spanning from the run's first node to its last; surfing hops
/// (and disc changes) emit a linear instruction. A hop whose endpoint is
/// coincident with its start (duplicate node) is skipped without breaking an
/// in-progress arc run.
#[must_use]
pub fn emit(graph: &Graph, path: &Path, feedrate: f64) -> Vec<Instruction> {
    let mut instructions = Vec::new();

    let Some(&first) = path.nodes.first() else {
        return instructions;
    };

    let first_pos = graph.node(first).position;
    instructions.push(Instruction::Linear {
        x: first_pos.x,
        y: first_pos.y,
        feedrate,
    });

    // The arc run in progress, if any: (first node of the run, last node reached so far).
    let mut pending_arc: Option<(NodeId, NodeId)> = None;

    for window in path.nodes.windows(2) {
        let (prev, curr) = (window[0], window[1]);
        let prev_node = graph.node(prev);
        let curr_node = graph.node(curr);

        if prev_node.disc == curr_node.disc {
            if curr_node.position == prev_node.position {
                continue;
            }

            pending_arc = Some(match pending_arc {
                Some((arc_start, _)) => (arc_start, curr),
                None => (prev, curr),
            });
        } else {
            if let Some((arc_start, arc_end)) = pending_arc.take() {
                instructions.extend(arc_instruction(graph, arc_start, arc_end, feedrate));
            }

            instructions.push(Instruction::Linear {
                x: curr_node.position.x,
                y: curr_node.position.y,
                feedrate,
            });
        }
    }

    if let Some((arc_start, arc_end)) = pending_arc.take() {
        instructions.extend(arc_instruction(graph, arc_start, arc_end, feedrate));
    }

    instructions
}

/// Builds the arc instruction from `start` to `end` on their shared disc, or
/// `None` if the arc is degenerate (start and end coincide).
fn arc_instruction(graph: &Graph, start: NodeId, end: NodeId, feedrate: f64) -> Option<Instruction> {
    let start_node = graph.node(start);
    let end_node = graph.node(end);

    if start_node.position == end_node.position {
        return None;
    }

    let center = graph.disc(start_node.disc).center;

    let mut alpha_start = normalize_angle_0_2pi(v2v_angle(center, start_node.position));
    let mut alpha_end = normalize_angle_0_2pi(v2v_angle(center, end_node.position));

    // Selects the minor-arc direction: swapping which angle plays which role
    // in the comparison below corrects the CW/CCW call when the raw angular
    // gap wraps through 0/2*pi, without moving the instruction's actual
    // (unswapped) start/end coordinates.
    if (alpha_start - alpha_end).abs() > PI {
        std::mem::swap(&mut alpha_start, &mut alpha_end);
    }

    let clockwise = alpha_end <= alpha_start;

    let i = center.x - start_node.position.x;
    let j = center.y - start_node.position.y;

    Some(Instruction::Arc {
        x: end_node.position.x,
        y: end_node.position.y,
        i,
        j,
        clockwise,
        feedrate,
    })
}
