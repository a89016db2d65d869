//! Discs, nodes, and edges, and the tangent-and-arc visibility graph builder.
//!
//! Nodes and discs are keyed by stable integer handles assigned on insertion,
//! never by floating-point position equality: a disc or node may coincide
//! exactly with another in space and still be a distinct entity.

use tracing::debug;

use crate::error::{BitangentKind, GeometryError};
use crate::geometry::{dist, normalize_angle_0_2pi, polar_offset, segment_circle_intersects, v2v_angle, Point, Segment};

/// Handle to a [`Disc`] stored in a [`Graph`]'s arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiscId(u32);

/// Handle to a [`Node`] stored in a [`Graph`]'s arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

/// Handle to an [`Edge`] stored in a [`Graph`]'s arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(u32);

/// A disc obstacle (or zero-radius point) in the plane.
///
/// Immutable after construction. Radius zero denotes a "point disc"
/// representing a start or goal location.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Disc {
    pub center: Point,
    pub radius: f64,
}

impl Disc {
    #[must_use]
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    #[must_use]
    pub fn point(position: Point) -> Self {
        Self::new(position, 0.0)
    }

    #[must_use]
    pub fn is_point(self) -> bool {
        self.radius == 0.0
    }
}

/// A point on (or coincident with) the boundary of exactly one disc.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Node {
    pub disc: DiscId,
    pub position: Point,
}

/// Whether an edge is a straight bitangent ("surfing") or a boundary arc
/// ("hugging").
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EdgeKind {
    Surfing,
    Hugging,
}

/// An unordered pair of nodes connected either by a bitangent segment or by
/// an arc along their shared disc's boundary.
#[derive(Copy, Clone, Debug)]
pub struct Edge {
    pub a: NodeId,
    pub b: NodeId,
    pub kind: EdgeKind,
}

impl Edge {
    /// Returns the other endpoint of this edge, given one of its endpoints.
    #[must_use]
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if self.a == node {
            Some(self.b)
        } else if self.b == node {
            Some(self.a)
        } else {
            None
        }
    }
}

/// A collection of discs, nodes, and edges built fresh for one planning
/// request.
#[derive(Default)]
pub struct Graph {
    discs: Vec<Disc>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Builds a graph from an initial set of (typically inflated, nonzero
    /// radius) obstacle discs: all internal and external bitangents between
    /// every pair, hugging edges around each disc, then pruning of any
    /// surfing edge that pierces a third disc.
    pub fn new(discs: &[Disc]) -> Result<Self, GeometryError> {
        let mut graph = Self::default();

        let ids: Vec<DiscId> = discs.iter().map(|&disc| graph.add_disc(disc)).collect();

        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                graph.add_internal_bitangents(ids[i], ids[j])?;
                graph.add_external_bitangents(ids[i], ids[j])?;
            }
        }

        graph.rebuild_hugging_edges();
        graph.prune_surfing_edges();

        debug!(
            discs = graph.discs.len(),
            nodes = graph.nodes.len(),
            surfing = graph.edges.iter().filter(|e| e.kind == EdgeKind::Surfing).count(),
            hugging = graph.edges.iter().filter(|e| e.kind == EdgeKind::Hugging).count(),
            "built visibility graph"
        );

        Ok(graph)
    }

    #[must_use]
    pub fn disc(&self, id: DiscId) -> Disc {
        self.discs[id.0 as usize]
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Node {
        self.nodes[id.0 as usize]
    }

    #[must_use]
    pub fn edge(&self, id: EdgeId) -> Edge {
        self.edges[id.0 as usize]
    }

    #[must_use]
    pub fn discs(&self) -> impl Iterator<Item = (DiscId, Disc)> + '_ {
        self.discs
            .iter()
            .enumerate()
            .map(|(i, &disc)| (DiscId(i as u32), disc))
    }

    #[must_use]
    pub fn surfing_edges(&self) -> impl Iterator<Item = (EdgeId, Edge)> + '_ {
        self.all_edges().filter(|(_, e)| e.kind == EdgeKind::Surfing)
    }

    #[must_use]
    pub fn hugging_edges(&self) -> impl Iterator<Item = (EdgeId, Edge)> + '_ {
        self.all_edges().filter(|(_, e)| e.kind == EdgeKind::Hugging)
    }

    fn all_edges(&self) -> impl Iterator<Item = (EdgeId, Edge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, &edge)| (EdgeId(i as u32), edge))
    }

    /// Returns every `(neighbor, edge)` pair where `edge` has `node` as one endpoint.
    #[must_use]
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, EdgeId)> + '_ {
        self.all_edges()
            .filter_map(move |(id, edge)| edge.other(node).map(|other| (other, id)))
    }

    /// The geometric length of an edge: Euclidean distance for a surfing
    /// edge, arc length `r * phi` for a hugging edge (with `phi` the angle
    /// between the endpoint vectors from the disc center, clamped into its
    /// valid domain to absorb floating-point drift).
    #[must_use]
    pub fn edge_length(&self, edge: Edge) -> f64 {
        let a = self.node(edge.a);
        let b = self.node(edge.b);

        match edge.kind {
            EdgeKind::Surfing => dist(a.position, b.position),
            EdgeKind::Hugging => {
                let disc = self.disc(a.disc);
                let u = a.position - disc.center;
                let v = b.position - disc.center;
                let cos_angle = (u.dot(&v) / (u.norm() * v.norm())).clamp(-1.0, 1.0);
                disc.radius * cos_angle.acos()
            }
        }
    }

    /// Inserts a zero-radius "point" disc (used for a move's start or goal)
    /// into the graph: tangents to every existing nonzero disc, a direct
    /// edge to every existing point disc, then a full hugging-edge rebuild
    /// and surfing-edge prune since new nodes were added to existing discs.
    pub fn insert_point(&mut self, position: Point) -> Result<NodeId, GeometryError> {
        let point_disc = self.add_disc(Disc::point(position));
        let point_node = self.add_node(Node {
            disc: point_disc,
            position,
        });

        let existing: Vec<(DiscId, Disc)> = self
            .discs()
            .filter(|&(id, _)| id != point_disc)
            .collect();

        for (disc_id, disc) in existing {
            if disc.is_point() {
                let other_node = self
                    .nodes
                    .iter()
                    .position(|n| n.disc == disc_id)
                    .map(|i| NodeId(i as u32))
                    .expect("every disc owns at least one node");

                self.add_edge(point_node, other_node, EdgeKind::Surfing);
            } else {
                self.add_point_tangents(point_node, position, disc_id, disc)?;
            }
        }

        self.rebuild_hugging_edges();
        self.prune_surfing_edges();

        Ok(point_node)
    }

    fn add_disc(&mut self, disc: Disc) -> DiscId {
        self.discs.push(disc);
        DiscId((self.discs.len() - 1) as u32)
    }

    fn add_node(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId((self.nodes.len() - 1) as u32)
    }

    fn add_edge(&mut self, a: NodeId, b: NodeId, kind: EdgeKind) -> EdgeId {
        self.edges.push(Edge { a, b, kind });
        EdgeId((self.edges.len() - 1) as u32)
    }

    /// The two point-to-circle tangents from a point disc to an existing
    /// nonzero disc.
    fn add_point_tangents(
        &mut self,
        point_node: NodeId,
        point: Point,
        disc_id: DiscId,
        disc: Disc,
    ) -> Result<(), GeometryError> {
        let d = dist(point, disc.center);

        if d < disc.radius {
            return Err(GeometryError::PreconditionViolation {
                disc_a: disc_id,
                disc_b: disc_id,
                kind: BitangentKind::PointToCircle,
            });
        }

        let theta = (disc.radius / d).acos();
        let base = v2v_angle(disc.center, point);

        for angle in [base + theta, base - theta] {
            let contact = polar_offset(disc.center, disc.radius, angle);
            let contact_node = self.add_node(Node {
                disc: disc_id,
                position: contact,
            });
            self.add_edge(point_node, contact_node, EdgeKind::Surfing);
        }

        Ok(())
    }

    /// The two internal (crossing) bitangents between discs `a` and `b`.
    fn add_internal_bitangents(&mut self, a: DiscId, b: DiscId) -> Result<(), GeometryError> {
        let disc_a = self.disc(a);
        let disc_b = self.disc(b);

        let d = dist(disc_a.center, disc_b.center);
        let ratio = (disc_a.radius + disc_b.radius) / d;

        if !(-1.0..=1.0).contains(&ratio) {
            return Err(GeometryError::PreconditionViolation {
                disc_a: a,
                disc_b: b,
                kind: BitangentKind::Internal,
            });
        }

        let theta = ratio.acos();
        let angle_ab = v2v_angle(disc_a.center, disc_b.center);
        let angle_ba = v2v_angle(disc_b.center, disc_a.center);

        let c = polar_offset(disc_a.center, disc_a.radius, angle_ab + theta);
        let d_pt = polar_offset(disc_a.center, disc_a.radius, angle_ab - theta);
        let e = polar_offset(disc_b.center, disc_b.radius, angle_ba - theta);
        let f = polar_offset(disc_b.center, disc_b.radius, angle_ba + theta);

        let c_node = self.add_node(Node { disc: a, position: c });
        let d_node = self.add_node(Node { disc: a, position: d_pt });
        let e_node = self.add_node(Node { disc: b, position: e });
        let f_node = self.add_node(Node { disc: b, position: f });

        self.add_edge(d_node, e_node, EdgeKind::Surfing);
        self.add_edge(c_node, f_node, EdgeKind::Surfing);

        Ok(())
    }

    /// The two external (same-side) bitangents between discs `a` and `b`.
    fn add_external_bitangents(&mut self, a: DiscId, b: DiscId) -> Result<(), GeometryError> {
        let disc_a = self.disc(a);
        let disc_b = self.disc(b);

        let d = dist(disc_a.center, disc_b.center);
        let ratio = (disc_a.radius - disc_b.radius).abs() / d;

        if !(-1.0..=1.0).contains(&ratio) {
            return Err(GeometryError::PreconditionViolation {
                disc_a: a,
                disc_b: b,
                kind: BitangentKind::External,
            });
        }

        let theta = ratio.acos();
        let angle_ab = v2v_angle(disc_a.center, disc_b.center);
        let angle_ba = v2v_angle(disc_b.center, disc_a.center);

        let c = polar_offset(disc_a.center, disc_a.radius, angle_ab + theta);
        let d_pt = polar_offset(disc_a.center, disc_a.radius, angle_ab - theta);
        let e = polar_offset(disc_b.center, disc_b.radius, (angle_ba + std::f64::consts::PI) - theta);
        let f = polar_offset(disc_b.center, disc_b.radius, (angle_ba + std::f64::consts::PI) + theta);

        let c_node = self.add_node(Node { disc: a, position: c });
        let d_node = self.add_node(Node { disc: a, position: d_pt });
        let e_node = self.add_node(Node { disc: b, position: e });
        let f_node = self.add_node(Node { disc: b, position: f });

        self.add_edge(d_node, e_node, EdgeKind::Surfing);
        self.add_edge(c_node, f_node, EdgeKind::Surfing);

        Ok(())
    }

    /// Regenerates every hugging edge from scratch: nodes on each nonzero
    /// disc, sorted by angle about the disc center, connected into one
    /// cycle per disc.
    fn rebuild_hugging_edges(&mut self) {
        self.edges.retain(|e| e.kind != EdgeKind::Hugging);

        for (disc_id, disc) in self.discs() {
            if disc.is_point() {
                continue;
            }

            let mut on_disc: Vec<NodeId> = self
                .nodes
                .iter()
                .enumerate()
                .filter(|(_, n)| n.disc == disc_id)
                .map(|(i, _)| NodeId(i as u32))
                .collect();

            if on_disc.len() < 2 {
                continue;
            }

            on_disc.sort_by(|&x, &y| {
                let angle_x = normalize_angle_0_2pi(v2v_angle(disc.center, self.node(x).position));
                let angle_y = normalize_angle_0_2pi(v2v_angle(disc.center, self.node(y).position));
                angle_x.partial_cmp(&angle_y).unwrap()
            });

            let n = on_disc.len();
            let new_edges: Vec<Edge> = (0..n)
                .map(|i| Edge {
                    a: on_disc[i],
                    b: on_disc[(i + 1) % n],
                    kind: EdgeKind::Hugging,
                })
                .collect();

            self.edges.extend(new_edges);
        }
    }

    /// Drops every surfing edge whose segment pierces the interior of a
    /// disc other than its own two endpoint discs.
    fn prune_surfing_edges(&mut self) {
        let nonzero: Vec<(DiscId, Disc)> = self.discs().filter(|&(_, d)| !d.is_point()).collect();

        self.edges.retain(|edge| {
            if edge.kind != EdgeKind::Surfing {
                return true;
            }

            let a = self.node(edge.a);
            let b = self.node(edge.b);
            let segment = Segment::new(a.position, b.position);

            !nonzero
                .iter()
                .any(|&(id, disc)| id != a.disc && id != b.disc && segment_circle_intersects(segment, disc.center, disc.radius))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_obstacle_between_start_and_goal_produces_four_tangents() {
        let discs = vec![Disc::new(Point::new(5.0, 0.0), 1.0)];
        let mut graph = Graph::new(&discs).unwrap();

        graph.insert_point(Point::new(0.0, 0.0)).unwrap();
        graph.insert_point(Point::new(10.0, 0.0)).unwrap();

        // Two tangent points from each of start and goal: four nodes on the obstacle disc.
        assert_eq!(graph.surfing_edges().count(), 4);
        assert_eq!(graph.hugging_edges().count(), 4);
    }

    #[test]
    fn hugging_cycle_visits_nodes_in_angular_order() {
        let discs = vec![Disc::new(Point::origin(), 1.0)];
        let mut graph = Graph::new(&discs).unwrap();

        // Manually add three nodes on the disc at known angles, then rebuild.
        let disc_id = graph.discs().next().unwrap().0;
        graph.add_node(Node { disc: disc_id, position: polar_offset(Point::origin(), 1.0, 0.0) });
        graph.add_node(Node { disc: disc_id, position: polar_offset(Point::origin(), 1.0, 2.0) });
        graph.add_node(Node { disc: disc_id, position: polar_offset(Point::origin(), 1.0, 4.0) });
        graph.rebuild_hugging_edges();

        let hugging: Vec<Edge> = graph.hugging_edges().map(|(_, e)| e).collect();
        assert_eq!(hugging.len(), 3);

        // Every node appears in exactly two hugging edges (a single cycle).
        let mut degree = std::collections::HashMap::new();
        for edge in &hugging {
            *degree.entry(edge.a).or_insert(0) += 1;
            *degree.entry(edge.b).or_insert(0) += 1;
        }
        assert!(degree.values().all(|&d| d == 2));
    }

    #[test]
    fn pruned_surfing_edge_never_crosses_a_third_disc() {
        let discs = vec![
            Disc::new(Point::new(0.0, 0.0), 1.0),
            Disc::new(Point::new(10.0, 0.0), 1.0),
            Disc::new(Point::new(5.0, 0.0), 1.0),
        ];
        let graph = Graph::new(&discs).unwrap();

        for (_, edge) in graph.surfing_edges() {
            let a = graph.node(edge.a);
            let b = graph.node(edge.b);
            let segment = Segment::new(a.position, b.position);

            for (id, disc) in graph.discs() {
                if id == a.disc || id == b.disc || disc.is_point() {
                    continue;
                }
                assert!(!segment_circle_intersects(segment, disc.center, disc.radius));
            }
        }
    }

    #[test]
    fn inserting_point_inside_obstacle_is_rejected() {
        let discs = vec![Disc::new(Point::origin(), 5.0)];
        let mut graph = Graph::new(&discs).unwrap();

        let err = graph.insert_point(Point::new(1.0, 0.0)).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::PreconditionViolation {
                kind: BitangentKind::PointToCircle,
                ..
            }
        ));
    }

    #[test]
    fn empty_field_links_start_and_goal_directly() {
        let mut graph = Graph::new(&[]).unwrap();
        let start = graph.insert_point(Point::new(0.0, 0.0)).unwrap();
        let goal = graph.insert_point(Point::new(10.0, 0.0)).unwrap();

        let neighbors: Vec<NodeId> = graph.neighbors(start).map(|(n, _)| n).collect();
        assert_eq!(neighbors, vec![goal]);
    }
}
