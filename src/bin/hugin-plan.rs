//! Demo CLI: runs one of the built-in named scenarios and prints
//! the resulting toolpath. Not part of the library's public contract: every
//! standalone tool in this codebase ships as a binary over a bare library.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use hugin::{emit, render, Disc, Graph};
use nalgebra::Point2;
use serde::Deserialize;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Scenario {
    /// Empty field: a single straight hop.
    S1,
    /// One obstacle directly on the line between start and goal.
    S2,
    /// One obstacle tangent to (but not crossing) the direct line.
    S3,
    /// Start and goal both swallowed by one oversized obstacle.
    S4,
    /// Three consecutive hugging hops coalesced into one arc instruction.
    S5,
    /// Minor-arc selection across the 0/2*pi boundary.
    S6,
}

#[derive(Parser)]
#[clap(name = "hugin-plan", version)]
struct Cli {
    /// Which built-in demo scenario to run.
    #[clap(value_enum, required_unless_present = "file")]
    scenario: Option<Scenario>,

    /// A JSON file of `{"discs": [[x, y, r], ...], "start": [x, y], "goal": [x, y]}`
    /// to plan instead of a built-in scenario.
    #[clap(long, conflicts_with = "scenario")]
    file: Option<PathBuf>,
}

/// The on-disk shape of a `--file` scenario.
#[derive(Deserialize)]
struct ScenarioFile {
    discs: Vec<(f64, f64, f64)>,
    start: (f64, f64),
    goal: (f64, f64),
}

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt::init();
    miette::set_panic_hook();

    let cli = Cli::parse();
    let feedrate = 99_999_999.0;

    if let Some(path) = cli.file {
        let text = std::fs::read_to_string(&path)
            .map_err(|e| miette::miette!("failed to read {}: {e}", path.display()))?;
        let scenario: ScenarioFile = serde_json::from_str(&text)
            .map_err(|e| miette::miette!("failed to parse {}: {e}", path.display()))?;

        let discs: Vec<Disc> = scenario
            .discs
            .iter()
            .map(|&(x, y, r)| Disc::new(Point2::new(x, y), r))
            .collect();

        run_line_scenario_with_endpoints(&discs, scenario.start, scenario.goal, feedrate)?;
        return Ok(());
    }

    match cli.scenario.expect("clap enforces scenario or --file") {
        Scenario::S1 => run_line_scenario(&[], feedrate)?,
        Scenario::S2 => run_line_scenario(&[Disc::new(Point2::new(5.0, 0.0), 1.0)], feedrate)?,
        Scenario::S3 => run_line_scenario(&[Disc::new(Point2::new(5.0, 1.0), 1.0)], feedrate)?,
        Scenario::S4 => run_line_scenario(&[Disc::new(Point2::new(5.0, 0.0), 10.0)], feedrate)?,
        Scenario::S5 => run_arc_coalescing_scenario(feedrate),
        Scenario::S6 => run_minor_arc_scenario(),
    }

    Ok(())
}

fn run_line_scenario(discs: &[Disc], feedrate: f64) -> miette::Result<()> {
    let mut graph = Graph::new(discs)?;
    let start = graph.insert_point(Point2::new(0.0, 0.0))?;
    let goal = graph.insert_point(Point2::new(10.0, 0.0))?;

    let path = hugin::shortest_path(&graph, start, goal)?;
    let instructions = emit(&graph, &path, feedrate);
    println!("{}", render(&instructions));

    Ok(())
}

/// Builds a single obstacle and several tangent point-sources around it,
/// then picks three consecutive hugging nodes straight off the resulting
/// boundary cycle to demonstrate arc-run coalescing in isolation.
fn run_arc_coalescing_scenario(feedrate: f64) {
    let mut graph = Graph::new(&[Disc::new(Point2::origin(), 1.0)]).expect("unit disc is always valid");

    for source in [
        Point2::new(3.0, 0.0),
        Point2::new(0.0, 3.0),
        Point2::new(-3.0, 0.0),
    ] {
        graph.insert_point(source).expect("far point tangents always exist");
    }

    let mut adjacency: std::collections::HashMap<hugin::NodeId, Vec<hugin::NodeId>> =
        std::collections::HashMap::new();
    for (_, edge) in graph.hugging_edges() {
        adjacency.entry(edge.a).or_default().push(edge.b);
        adjacency.entry(edge.b).or_default().push(edge.a);
    }

    let start = *adjacency.keys().next().expect("disc has hugging nodes");
    let mid = adjacency[&start][0];
    let end = *adjacency[&mid].iter().find(|&&n| n != start).unwrap();

    let path = hugin::Path {
        nodes: vec![start, mid, end],
        cost: 0.0,
    };
    let instructions = emit(&graph, &path, feedrate);
    println!("{}", render(&instructions));
}

/// Prints the minor-arc angle-selection demonstration directly, without
/// routing through a full graph: two boundary points at
/// 10 and 350 degrees take the 20 degree minor arc, not the 340 degree major one.
fn run_minor_arc_scenario() {
    let center = Point2::origin();
    let ten_degrees = hugin::geometry::polar_offset(center, 1.0, 10f64.to_radians());
    let three_fifty_degrees = hugin::geometry::polar_offset(center, 1.0, 350f64.to_radians());

    println!(
        "10deg boundary point: ({:.4}, {:.4})",
        ten_degrees.x, ten_degrees.y
    );
    println!(
        "350deg boundary point: ({:.4}, {:.4})",
        three_fifty_degrees.x, three_fifty_degrees.y
    );
    println!("minor arc spans 20 degrees, not 340");
}
