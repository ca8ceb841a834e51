//! Prim's minimum spanning tree rooted at [`START_VERTEX`].

use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

use super::{START_VERTEX, ensure_indexable};
use crate::{Error, Graph, Result, Scratch};

/// Heap entry ordered by tentative distance, then vertex id.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    dist: f64,
    vertex: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist
            .total_cmp(&other.dist)
            .then_with(|| self.vertex.cmp(&other.vertex))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpanningTree {
    parent: Vec<Option<usize>>,
    edges: Vec<(usize, usize, f64)>,
}

impl SpanningTree {
    /// MST predecessor of `vertex`; `None` for the root.
    pub fn parent(&self, vertex: usize) -> Option<usize> {
        self.parent.get(vertex).copied().flatten()
    }

    pub fn parents(&self) -> &[Option<usize>] {
        &self.parent
    }

    /// `(parent, child, weight)` for every non-root vertex, by child id.
    pub fn edges(&self) -> &[(usize, usize, f64)] {
        &self.edges
    }

    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(|e| e.2).sum()
    }

    pub fn num_vertex(&self) -> usize {
        self.parent.len()
    }

    /// Children of every vertex, each list in ascending id order.
    pub fn children(&self) -> Vec<Vec<usize>> {
        let mut children = vec![Vec::new(); self.parent.len()];
        for &(parent, child, _) in &self.edges {
            children[parent].push(child);
        }
        children
    }
}

/// Runs Prim's algorithm from vertex 0 with a lazily pruned binary heap:
/// a decreased key is pushed again and stale entries are skipped on pop.
pub fn minimum_spanning_tree(graph: &Graph) -> Result<SpanningTree> {
    ensure_indexable(graph)?;

    let n = graph.num_vertex();
    let mut scratch = Scratch::new(n);
    let mut heap = BinaryHeap::new();

    scratch.dist[START_VERTEX] = 0.0;
    heap.push(Reverse(Candidate {
        dist: 0.0,
        vertex: START_VERTEX,
    }));

    while let Some(Reverse(Candidate { dist, vertex })) = heap.pop() {
        if scratch.visited[vertex] || dist > scratch.dist[vertex] {
            continue;
        }
        scratch.visited[vertex] = true;

        for &edge_id in graph.vertices()[vertex].adj() {
            let edge = graph.edge(edge_id);
            let next = edge.dest();
            if !scratch.visited[next] && edge.weight() < scratch.dist[next] {
                scratch.dist[next] = edge.weight();
                scratch.path[next] = Some(edge_id);
                heap.push(Reverse(Candidate {
                    dist: edge.weight(),
                    vertex: next,
                }));
            }
        }
    }

    if let Some(unreached) = scratch.first_unvisited() {
        return Err(Error::Unreachable(unreached));
    }

    let parent: Vec<Option<usize>> = scratch
        .path
        .iter()
        .map(|edge| edge.map(|id| graph.edge(id).orig()))
        .collect();
    let edges = (0..n)
        .filter_map(|child| {
            scratch.path[child].map(|id| {
                let edge = graph.edge(id);
                (edge.orig(), child, edge.weight())
            })
        })
        .collect::<Vec<_>>();

    log::debug!(
        "mst: n={n} edges={} weight={:.2}",
        edges.len(),
        edges.iter().map(|e| e.2).sum::<f64>()
    );

    Ok(SpanningTree { parent, edges })
}

#[cfg(test)]
mod tests {
    use super::minimum_spanning_tree;
    use crate::{
        Error, Graph,
        graph::tests::{euclidean, unit_square},
    };

    #[test]
    fn unit_square_tree_prefers_lower_ids_on_ties() {
        let tree = minimum_spanning_tree(&unit_square()).expect("mst");

        assert_eq!(tree.parents(), &[None, Some(0), Some(1), Some(0)]);
        assert_eq!(tree.edges().len(), 3);
        assert!((tree.total_weight() - 3.0).abs() < 1e-12);
        assert_eq!(tree.children(), vec![vec![1, 3], vec![2], vec![], vec![]]);
    }

    #[test]
    fn decrease_key_replaces_heavier_parent_edge() {
        // 0-2 is heavy but seen first; 1-2 is lighter once 1 is settled.
        let graph = Graph::from_edges(3, &[(0, 1, 1.0), (0, 2, 10.0), (1, 2, 2.0)]);
        let tree = minimum_spanning_tree(&graph).expect("mst");

        assert_eq!(tree.parent(2), Some(1));
        assert!((tree.total_weight() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn tree_spans_every_vertex_with_n_minus_one_edges() {
        let graph = euclidean(&[(0.0, 0.0), (3.0, 1.0), (1.0, 4.0), (5.0, 5.0), (2.0, 2.0)]);
        let tree = minimum_spanning_tree(&graph).expect("mst");

        assert_eq!(tree.num_vertex(), 5);
        assert_eq!(tree.edges().len(), 4);
        assert!(tree.parent(0).is_none());
        assert!((1..5).all(|v| tree.parent(v).is_some()));
    }

    #[test]
    fn disconnected_graph_reports_unreachable_vertex() {
        let graph = Graph::from_edges(4, &[(0, 1, 1.0), (2, 3, 1.0)]);
        assert!(matches!(
            minimum_spanning_tree(&graph),
            Err(Error::Unreachable(2))
        ));
    }

    #[test]
    fn single_vertex_tree_is_empty() {
        let tree = minimum_spanning_tree(&Graph::from_edges(1, &[])).expect("mst");
        assert!(tree.edges().is_empty());
        assert_eq!(tree.total_weight(), 0.0);
    }
}
