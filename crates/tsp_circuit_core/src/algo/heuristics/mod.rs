//! Constructive and local-search heuristics. All of them assume the working
//! graph is complete: every consecutive pair of a candidate circuit must be
//! joined by a direct edge, otherwise evaluation fails with
//! [`Error::IncompleteGraph`].

pub mod annealing;
pub mod nearest_neighbor;
pub mod neighbor;
pub mod tabu;

use rand::{Rng, seq::SliceRandom};

use super::{START_VERTEX, ensure_indexable};
use crate::{Error, Graph, Result, Tour};

pub use annealing::{
    AnnealingParams, SimulatedAnnealing, acceptance_probability, simulated_annealing,
};
pub use nearest_neighbor::nearest_neighbor;
pub use neighbor::{Mutation, generate_neighbor};
pub use tabu::{TabuList, TabuParams, TabuSearch, tabu_search};

/// Sum of direct edge weights between consecutive ids of `solution`.
pub fn evaluate_solution(graph: &Graph, solution: &[usize]) -> Result<f64> {
    solution.windows(2).try_fold(0.0, |total, pair| {
        let (from, to) = (pair[0], pair[1]);
        if graph.find_vertex(from).is_none() {
            return Err(Error::VertexNotFound(from));
        }
        graph
            .find_edge(from, to)
            .map(|edge| total + edge.weight())
            .ok_or(Error::IncompleteGraph { from, to })
    })
}

/// `[0, shuffle(1..n), 0]` with its evaluated cost.
pub fn random_solution<R: Rng + ?Sized>(graph: &Graph, rng: &mut R) -> Result<Tour> {
    ensure_indexable(graph)?;

    let mut path = Vec::with_capacity(graph.num_vertex() + 1);
    path.push(START_VERTEX);
    let mut rest: Vec<usize> = (1..graph.num_vertex()).collect();
    rest.shuffle(rng);
    path.extend(rest);
    path.push(START_VERTEX);

    if graph.num_vertex() == 1 {
        return Ok(Tour::new(path, 0.0));
    }
    let cost = evaluate_solution(graph, &path)?;
    Ok(Tour::new(path, cost))
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::{evaluate_solution, random_solution};
    use crate::{Error, Graph, graph::tests::unit_square};

    #[test]
    fn evaluate_sums_consecutive_edges() {
        let graph = unit_square();
        let cost = evaluate_solution(&graph, &[0, 2, 1, 3, 0]).expect("complete graph");
        assert!((cost - (2.0 + 2.0 * 2f64.sqrt())).abs() < 1e-12);
    }

    #[test]
    fn evaluate_reports_missing_edge() {
        let graph = Graph::from_edges(3, &[(0, 1, 1.0), (1, 2, 1.0)]);
        let err = evaluate_solution(&graph, &[0, 1, 2, 0]).expect_err("2-0 is missing");
        assert!(matches!(err, Error::IncompleteGraph { from: 2, to: 0 }));
    }

    #[test]
    fn evaluate_reports_unknown_vertex() {
        let graph = unit_square();
        let err = evaluate_solution(&graph, &[0, 8, 0]).expect_err("8 does not exist");
        assert!(matches!(err, Error::IncompleteGraph { from: 0, to: 8 }));
        let err = evaluate_solution(&graph, &[8, 0]).expect_err("8 does not exist");
        assert!(matches!(err, Error::VertexNotFound(8)));
    }

    #[test]
    fn random_solution_is_a_closed_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let graph = unit_square();
        for _ in 0..20 {
            let tour = random_solution(&graph, &mut rng).expect("complete graph");
            assert!(tour.is_circuit_over(4));
            let cost = evaluate_solution(&graph, &tour.path).expect("cost");
            assert!((tour.cost - cost).abs() < 1e-12);
        }
    }
}
