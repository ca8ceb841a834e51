//! Weighted graph store shared by every solver.
//!
//! Vertices are kept sorted by id and own lists of edge ids into a single
//! edge arena. Undirected links are stored as two directed edges pointing at
//! each other through `reverse`.

pub mod scratch;

use crate::{Tour, geo::GeoPoint};

pub use scratch::Scratch;

/// Index of an edge in [`Graph`]'s edge arena.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct EdgeId(usize);

impl EdgeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    orig: usize,
    dest: usize,
    weight: f64,
    reverse: Option<EdgeId>,
}

impl Edge {
    pub fn orig(&self) -> usize {
        self.orig
    }

    pub fn dest(&self) -> usize {
        self.dest
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn reverse(&self) -> Option<EdgeId> {
        self.reverse
    }
}

#[derive(Clone, Debug)]
pub struct Vertex {
    id: usize,
    point: GeoPoint,
    label: Option<String>,
    adj: Vec<EdgeId>,
    incoming: Vec<EdgeId>,
}

impl Vertex {
    fn new(id: usize, point: GeoPoint) -> Self {
        Self {
            id,
            point,
            label: None,
            adj: Vec::new(),
            incoming: Vec::new(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn point(&self) -> GeoPoint {
        self.point
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Outgoing edges, in insertion order.
    pub fn adj(&self) -> &[EdgeId] {
        &self.adj
    }

    pub fn incoming(&self) -> &[EdgeId] {
        &self.incoming
    }
}

#[derive(Clone, Debug)]
pub struct Graph {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    best_path: Vec<usize>,
    best_cost: f64,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            best_path: Vec::new(),
            best_cost: f64::INFINITY,
        }
    }

    pub fn num_vertex(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    fn position(&self, id: usize) -> Option<usize> {
        self.vertices.binary_search_by_key(&id, Vertex::id).ok()
    }

    pub fn find_vertex(&self, id: usize) -> Option<&Vertex> {
        self.position(id).map(|pos| &self.vertices[pos])
    }

    /// Returns `false` when `id` is already taken.
    pub fn add_vertex(&mut self, id: usize, lon: f64, lat: f64) -> bool {
        match self.vertices.binary_search_by_key(&id, Vertex::id) {
            Ok(_) => false,
            Err(pos) => {
                self.vertices
                    .insert(pos, Vertex::new(id, GeoPoint::new(lon, lat)));
                true
            }
        }
    }

    pub fn set_label(&mut self, id: usize, label: impl Into<String>) -> bool {
        match self.position(id) {
            Some(pos) => {
                self.vertices[pos].label = Some(label.into());
                true
            }
            None => false,
        }
    }

    /// Returns `false` when either endpoint is missing.
    pub fn add_edge(&mut self, src: usize, dst: usize, weight: f64) -> bool {
        let (Some(src_pos), Some(dst_pos)) = (self.position(src), self.position(dst)) else {
            return false;
        };
        self.push_edge(src_pos, dst_pos, weight);
        true
    }

    /// Adds `src -> dst` and `dst -> src` and links them as each other's
    /// reverse. Returns `false` when either endpoint is missing.
    pub fn add_bidirectional_edge(&mut self, src: usize, dst: usize, weight: f64) -> bool {
        let (Some(src_pos), Some(dst_pos)) = (self.position(src), self.position(dst)) else {
            return false;
        };
        let forward = self.push_edge(src_pos, dst_pos, weight);
        let backward = self.push_edge(dst_pos, src_pos, weight);
        self.edges[forward.0].reverse = Some(backward);
        self.edges[backward.0].reverse = Some(forward);
        true
    }

    fn push_edge(&mut self, src_pos: usize, dst_pos: usize, weight: f64) -> EdgeId {
        let id = EdgeId(self.edges.len());
        self.edges.push(Edge {
            orig: self.vertices[src_pos].id,
            dest: self.vertices[dst_pos].id,
            weight,
            reverse: None,
        });
        self.vertices[src_pos].adj.push(id);
        self.vertices[dst_pos].incoming.push(id);
        id
    }

    /// Outgoing edges of `id`; empty when the vertex does not exist.
    pub fn adjacent(&self, id: usize) -> impl Iterator<Item = &Edge> + '_ {
        self.find_vertex(id)
            .into_iter()
            .flat_map(|v| v.adj.iter().map(|e| &self.edges[e.0]))
    }

    pub fn find_edge(&self, src: usize, dst: usize) -> Option<&Edge> {
        self.adjacent(src).find(|e| e.dest == dst)
    }

    /// Weight of the first `src -> dst` edge, or `f64::INFINITY` if there is none.
    pub fn edge_weight(&self, src: usize, dst: usize) -> f64 {
        self.find_edge(src, dst)
            .map(Edge::weight)
            .unwrap_or(f64::INFINITY)
    }

    pub fn are_connected(&self, src: usize, dst: usize) -> bool {
        self.find_edge(src, dst).is_some()
    }

    /// Index-based algorithms address scratch arrays by vertex id.
    pub fn has_contiguous_ids(&self) -> bool {
        self.vertices.iter().enumerate().all(|(idx, v)| v.id == idx)
    }

    /// Every ordered pair of distinct vertices has a direct edge.
    pub fn is_complete(&self) -> bool {
        self.vertices.iter().all(|v| {
            let mut seen = vec![false; self.vertices.len()];
            for e in &v.adj {
                if let Some(pos) = self.position(self.edges[e.0].dest) {
                    seen[pos] = true;
                }
            }
            seen.iter()
                .enumerate()
                .all(|(pos, hit)| *hit || self.vertices[pos].id == v.id)
        })
    }

    pub fn best_path(&self) -> &[usize] {
        &self.best_path
    }

    pub fn best_cost(&self) -> f64 {
        self.best_cost
    }

    pub fn record(&mut self, tour: &Tour) {
        self.best_path.clone_from(&tour.path);
        self.best_cost = tour.cost;
    }

    pub fn clear_solution(&mut self) {
        self.best_path.clear();
        self.best_cost = f64::INFINITY;
    }

    /// Graph built from `(src, dst, weight)` triples over vertices `0..n`,
    /// all placed at the origin.
    pub fn from_edges(n: usize, edges: &[(usize, usize, f64)]) -> Self {
        let mut graph = Self::new();
        for id in 0..n {
            graph.add_vertex(id, 0.0, 0.0);
        }
        for &(src, dst, weight) in edges {
            graph.add_bidirectional_edge(src, dst, weight);
        }
        graph
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::Graph;

    /// Unit square 0-1-2-3 with sqrt(2) diagonals.
    pub(crate) fn unit_square() -> Graph {
        let d = 2f64.sqrt();
        Graph::from_edges(
            4,
            &[
                (0, 1, 1.0),
                (1, 2, 1.0),
                (2, 3, 1.0),
                (3, 0, 1.0),
                (0, 2, d),
                (1, 3, d),
            ],
        )
    }

    /// Complete graph over points on the plane, weighted by euclidean distance.
    pub(crate) fn euclidean(points: &[(f64, f64)]) -> Graph {
        let mut edges = Vec::new();
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                let (dx, dy) = (points[i].0 - points[j].0, points[i].1 - points[j].1);
                edges.push((i, j, (dx * dx + dy * dy).sqrt()));
            }
        }
        Graph::from_edges(points.len(), &edges)
    }

    #[test]
    fn add_vertex_keeps_ids_sorted_and_rejects_duplicates() {
        let mut graph = Graph::new();
        assert!(graph.add_vertex(2, 0.0, 0.0));
        assert!(graph.add_vertex(0, 1.0, 2.0));
        assert!(graph.add_vertex(1, 0.0, 0.0));
        assert!(!graph.add_vertex(1, 5.0, 5.0));

        let ids: Vec<usize> = graph.vertices().iter().map(|v| v.id()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert!(graph.has_contiguous_ids());
        assert_eq!(graph.find_vertex(0).expect("vertex 0").point().lat, 2.0);
    }

    #[test]
    fn add_edge_fails_for_missing_endpoints() {
        let mut graph = Graph::new();
        graph.add_vertex(0, 0.0, 0.0);
        assert!(!graph.add_edge(0, 7, 1.0));
        assert!(!graph.add_bidirectional_edge(7, 0, 1.0));
        assert_eq!(graph.num_edges(), 0);
    }

    #[test]
    fn bidirectional_edges_link_reverses() {
        let mut graph = Graph::new();
        graph.add_vertex(0, 0.0, 0.0);
        graph.add_vertex(1, 0.0, 0.0);
        assert!(graph.add_bidirectional_edge(0, 1, 3.5));

        let forward = graph.find_edge(0, 1).expect("forward edge");
        let backward = graph.edge(forward.reverse().expect("reverse link"));
        assert_eq!((backward.orig(), backward.dest()), (1, 0));
        assert_eq!(backward.weight(), 3.5);
        assert_eq!(graph.find_vertex(1).expect("vertex 1").incoming().len(), 1);
    }

    #[test]
    fn directed_edge_has_no_reverse() {
        let mut graph = Graph::new();
        graph.add_vertex(0, 0.0, 0.0);
        graph.add_vertex(1, 0.0, 0.0);
        assert!(graph.add_edge(0, 1, 2.0));

        assert_eq!(graph.edge_weight(0, 1), 2.0);
        assert_eq!(graph.edge_weight(1, 0), f64::INFINITY);
        assert!(graph.find_edge(0, 1).expect("edge").reverse().is_none());
    }

    #[test]
    fn edge_weight_is_infinite_when_absent() {
        let graph = Graph::from_edges(3, &[(0, 1, 1.0)]);
        assert_eq!(graph.edge_weight(0, 1), 1.0);
        assert_eq!(graph.edge_weight(0, 2), f64::INFINITY);
        assert_eq!(graph.edge_weight(9, 0), f64::INFINITY);
        assert!(!graph.are_connected(1, 2));
    }

    #[test]
    fn completeness_and_contiguity_checks() {
        assert!(unit_square().is_complete());
        assert!(!Graph::from_edges(3, &[(0, 1, 1.0), (1, 2, 1.0)]).is_complete());

        let mut sparse_ids = Graph::new();
        sparse_ids.add_vertex(0, 0.0, 0.0);
        sparse_ids.add_vertex(5, 0.0, 0.0);
        assert!(!sparse_ids.has_contiguous_ids());
    }

    #[test]
    fn best_solution_starts_unset() {
        let graph = unit_square();
        assert!(graph.best_path().is_empty());
        assert_eq!(graph.best_cost(), f64::INFINITY);
    }

    #[test]
    fn labels_attach_to_existing_vertices() {
        let mut graph = Graph::from_edges(2, &[]);
        assert!(graph.set_label(1, "Porto"));
        assert!(!graph.set_label(4, "nowhere"));
        assert_eq!(graph.find_vertex(1).and_then(|v| v.label()), Some("Porto"));
    }
}
