//! Christofides: MST, perfect matching over odd-degree vertices, Eulerian
//! circuit of the union, then shortcut to a Hamiltonian circuit.

use tsp_circuit_derive::CliValue;

use super::{
    START_VERTEX,
    heuristics::evaluate_solution,
    mst::{SpanningTree, minimum_spanning_tree},
    single_vertex_tour,
};
use crate::{Error, Graph, Result, Scratch, Tour};

/// Largest odd set matched exactly; the subset table holds `2^k` entries.
pub const MAX_OPTIMAL_ODD: usize = 20;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, CliValue)]
#[cli_value(option = "matching")]
pub enum MatchingStrategy {
    /// Nearest unmatched successor; no 3/2 guarantee.
    Greedy,
    /// Minimum-weight perfect matching.
    #[default]
    Optimal,
}

/// `(a, b, weight)` pairs covering every odd vertex once.
pub type Matching = Vec<(usize, usize, f64)>;

/// Vertices with odd degree in `tree`, ascending.
pub fn odd_degree_vertices(tree: &SpanningTree) -> Vec<usize> {
    let mut scratch = Scratch::new(tree.num_vertex());
    for &(parent, child, _) in tree.edges() {
        scratch.indegree[parent] += 1;
        scratch.indegree[child] += 1;
    }
    scratch
        .indegree
        .iter()
        .enumerate()
        .filter_map(|(vertex, degree)| (degree % 2 == 1).then_some(vertex))
        .collect()
}

pub fn greedy_matching(graph: &Graph, odd: &[usize]) -> Result<Matching> {
    let mut matched = vec![false; odd.len()];
    let mut matching = Vec::with_capacity(odd.len() / 2);

    for i in 0..odd.len() {
        if matched[i] {
            continue;
        }
        matched[i] = true;

        let mut nearest: Option<(usize, f64)> = None;
        let mut first_free = None;
        for j in (i + 1)..odd.len() {
            if matched[j] {
                continue;
            }
            if first_free.is_none() {
                first_free = Some(j);
            }
            let weight = graph.edge_weight(odd[i], odd[j]);
            if weight.is_finite() && nearest.is_none_or(|(_, best)| weight < best) {
                nearest = Some((j, weight));
            }
        }

        match (nearest, first_free) {
            (Some((j, weight)), _) => {
                matched[j] = true;
                matching.push((odd[i], odd[j], weight));
            }
            (None, Some(j)) => {
                return Err(Error::IncompleteGraph {
                    from: odd[i],
                    to: odd[j],
                });
            }
            (None, None) => {
                return Err(Error::other(format!(
                    "odd-degree vertex {} has no partner",
                    odd[i]
                )));
            }
        }
    }

    Ok(matching)
}

/// Exact matching by DP over subsets of `odd`, always completing the lowest
/// unmatched index first. Falls back to [`greedy_matching`] above
/// [`MAX_OPTIMAL_ODD`] vertices.
pub fn optimal_matching(graph: &Graph, odd: &[usize]) -> Result<Matching> {
    let k = odd.len();
    if k > MAX_OPTIMAL_ODD {
        log::warn!(
            "christofides: odd={k} exceeds {MAX_OPTIMAL_ODD}, falling back to greedy matching"
        );
        return greedy_matching(graph, odd);
    }

    let weights: Vec<Vec<f64>> = odd
        .iter()
        .map(|&a| odd.iter().map(|&b| graph.edge_weight(a, b)).collect())
        .collect();

    let full = (1usize << k) - 1;
    let mut cost = vec![f64::INFINITY; full + 1];
    let mut choice: Vec<Option<(u8, u8)>> = vec![None; full + 1];
    cost[0] = 0.0;

    for mask in 0..full {
        if !cost[mask].is_finite() {
            continue;
        }
        let i = (!mask).trailing_zeros() as usize;
        for j in (i + 1)..k {
            if mask & (1 << j) != 0 || !weights[i][j].is_finite() {
                continue;
            }
            let next = mask | (1 << i) | (1 << j);
            let candidate = cost[mask] + weights[i][j];
            if candidate < cost[next] {
                cost[next] = candidate;
                choice[next] = Some((i as u8, j as u8));
            }
        }
    }

    if !cost[full].is_finite() {
        let (from, to) = first_missing_pair(graph, odd).unwrap_or((odd[0], odd[0]));
        return Err(Error::IncompleteGraph { from, to });
    }

    let mut matching = Vec::with_capacity(k / 2);
    let mut mask = full;
    while let Some((i, j)) = choice[mask] {
        let (i, j) = (usize::from(i), usize::from(j));
        matching.push((odd[i], odd[j], weights[i][j]));
        mask &= !((1 << i) | (1 << j));
    }
    matching.reverse();

    log::debug!("christofides: matched odd={k} weight={:.2}", cost[full]);
    Ok(matching)
}

fn first_missing_pair(graph: &Graph, odd: &[usize]) -> Option<(usize, usize)> {
    odd.iter().enumerate().find_map(|(i, &a)| {
        odd[i + 1..]
            .iter()
            .find(|&&b| !graph.are_connected(a, b))
            .map(|&b| (a, b))
    })
}

/// Undirected multigraph snapshot; parallel edges are kept.
#[derive(Clone, Debug)]
pub struct Multigraph {
    ends: Vec<(usize, usize)>,
    adj: Vec<Vec<usize>>,
}

impl Multigraph {
    pub fn new(n: usize) -> Self {
        Self {
            ends: Vec::new(),
            adj: vec![Vec::new(); n],
        }
    }

    pub fn add_edge(&mut self, a: usize, b: usize) {
        let id = self.ends.len();
        self.ends.push((a, b));
        self.adj[a].push(id);
        self.adj[b].push(id);
    }

    pub fn num_edges(&self) -> usize {
        self.ends.len()
    }

    pub fn degree(&self, vertex: usize) -> usize {
        self.adj[vertex].len()
    }

    /// Stack walk that consumes each edge once; the circuit is read off in
    /// reverse pop order. Every degree must be even.
    pub fn eulerian_circuit(&self, start: usize) -> Vec<usize> {
        let mut used = vec![false; self.ends.len()];
        let mut cursor = vec![0usize; self.adj.len()];
        let mut stack = vec![start];
        let mut circuit = Vec::with_capacity(self.ends.len() + 1);

        while let Some(&vertex) = stack.last() {
            let edges = &self.adj[vertex];
            while cursor[vertex] < edges.len() && used[edges[cursor[vertex]]] {
                cursor[vertex] += 1;
            }

            match edges.get(cursor[vertex]) {
                Some(&edge) => {
                    used[edge] = true;
                    let (a, b) = self.ends[edge];
                    stack.push(if a == vertex { b } else { a });
                }
                None => {
                    stack.pop();
                    circuit.push(vertex);
                }
            }
        }

        circuit.reverse();
        circuit
    }
}

/// Keeps first occurrences of `walk` and closes the circuit at its start.
pub fn shortcut(walk: &[usize], n: usize) -> Vec<usize> {
    let mut seen = vec![false; n];
    let mut path = Vec::with_capacity(n + 1);
    for &vertex in walk {
        if !seen[vertex] {
            seen[vertex] = true;
            path.push(vertex);
        }
    }
    if let Some(&start) = path.first() {
        path.push(start);
    }
    path
}

pub fn christofides(graph: &Graph, strategy: MatchingStrategy) -> Result<Tour> {
    let tree = minimum_spanning_tree(graph)?;
    if let Some(tour) = single_vertex_tour(graph) {
        return Ok(tour);
    }

    let n = graph.num_vertex();
    let odd = odd_degree_vertices(&tree);
    let matching = match strategy {
        MatchingStrategy::Greedy => greedy_matching(graph, &odd)?,
        MatchingStrategy::Optimal => optimal_matching(graph, &odd)?,
    };

    let mut multigraph = Multigraph::new(n);
    for &(a, b, _) in tree.edges().iter().chain(&matching) {
        multigraph.add_edge(a, b);
    }

    let walk = multigraph.eulerian_circuit(START_VERTEX);
    let path = shortcut(&walk, n);
    if path.len() != n + 1 {
        return Err(Error::other(format!(
            "eulerian walk covered {} of {n} vertices",
            path.len().saturating_sub(1)
        )));
    }
    let cost = evaluate_solution(graph, &path)?;

    log::debug!(
        "christofides: n={n} odd={} matching={strategy} multigraph_edges={} walk={} cost={cost:.2}",
        odd.len(),
        multigraph.num_edges(),
        walk.len()
    );
    Ok(Tour::new(path, cost))
}
