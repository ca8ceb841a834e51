//! Exhaustive depth-first search over every Hamiltonian circuit.
//!
//! Worst case `O((n-1)!)`: only usable on toy graphs.

use super::{START_VERTEX, ensure_indexable, single_vertex_tour};
use crate::{Error, Graph, Result, Scratch, Tour};

struct Search<'g> {
    graph: &'g Graph,
    scratch: Scratch,
    path: Vec<usize>,
    best_path: Vec<usize>,
    best_cost: f64,
}

impl Search<'_> {
    fn visit(&mut self, current: usize, cost: f64) {
        // Weights are non-negative, so a partial path that already costs as
        // much as the best circuit cannot end up strictly cheaper.
        if cost >= self.best_cost {
            return;
        }

        let n = self.graph.num_vertex();
        let graph = self.graph;

        for &edge_id in graph.vertices()[current].adj() {
            let edge = graph.edge(edge_id);
            let next = edge.dest();
            // Parallel edges: only the first `current -> next` edge counts, as
            // in every other cost lookup.
            if !graph
                .find_edge(current, next)
                .is_some_and(|first| std::ptr::eq(first, edge))
            {
                continue;
            }
            let next_cost = cost + edge.weight();

            if self.path.len() == n {
                if next == START_VERTEX && next_cost < self.best_cost {
                    self.best_cost = next_cost;
                    self.best_path.clone_from(&self.path);
                    self.best_path.push(START_VERTEX);
                    log::trace!("backtracking: improved cost={next_cost:.2}");
                }
                continue;
            }

            if self.scratch.visited[next] {
                continue;
            }

            self.scratch.visited[next] = true;
            self.path.push(next);
            self.visit(next, next_cost);
            self.path.pop();
            self.scratch.visited[next] = false;
        }
    }
}

/// Optimal circuit from vertex 0 by backtracking. A completed circuit only
/// replaces the incumbent when strictly cheaper, so the first optimum found
/// in adjacency order wins ties.
pub fn backtracking(graph: &Graph) -> Result<Tour> {
    ensure_indexable(graph)?;
    if let Some(tour) = single_vertex_tour(graph) {
        return Ok(tour);
    }

    let n = graph.num_vertex();
    let mut search = Search {
        graph,
        scratch: Scratch::new(n),
        path: Vec::with_capacity(n + 1),
        best_path: Vec::new(),
        best_cost: f64::INFINITY,
    };

    search.scratch.visited[START_VERTEX] = true;
    search.path.push(START_VERTEX);
    search.visit(START_VERTEX, 0.0);

    if search.best_path.is_empty() {
        return Err(Error::NoCircuit);
    }

    log::debug!("backtracking: n={n} cost={:.2}", search.best_cost);
    Ok(Tour::new(search.best_path, search.best_cost))
}
