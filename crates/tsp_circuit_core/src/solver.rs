use rand::Rng;

use crate::{
    Graph, Result, Tour,
    algo::{
        approx::triangular_approximation,
        christofides::christofides,
        exact::backtracking,
        heuristics::{nearest_neighbor, random_solution, simulated_annealing, tabu_search},
    },
    options::{Algorithm, InitialSolution, SolverOptions},
};

/// Runs the algorithm selected in `options` and stores the resulting circuit
/// on `graph` (see [`Graph::best_path`] / [`Graph::best_cost`]).
#[tsp_circuit_derive::timer("solver")]
pub fn solve<R: Rng + ?Sized>(
    graph: &mut Graph,
    options: &SolverOptions,
    rng: &mut R,
) -> Result<Tour> {
    options.validate()?;
    log::info!(
        "solver: start algorithm={} n={} edges={}",
        options.algorithm,
        graph.num_vertex(),
        graph.num_edges()
    );

    let tour = run(graph, options, rng)?;
    graph.record(&tour);

    log::info!(
        "solver: complete algorithm={} legs={} cost={:.2}",
        options.algorithm,
        tour.legs(),
        tour.cost
    );
    Ok(tour)
}

/// Same dispatch as [`solve`] without touching the graph.
pub fn run<R: Rng + ?Sized>(graph: &Graph, options: &SolverOptions, rng: &mut R) -> Result<Tour> {
    match options.algorithm {
        Algorithm::Backtracking => backtracking(graph),
        Algorithm::Triangular => triangular_approximation(graph),
        Algorithm::Christofides => christofides(graph, options.matching),
        Algorithm::NearestNeighbor => nearest_neighbor(graph),
        Algorithm::Tabu => {
            let initial = initial_solution(graph, options.initial, rng)?;
            tabu_search(graph, initial.path, &options.tabu_params(), rng)
        }
        Algorithm::Annealing => {
            let initial = initial_solution(graph, options.initial, rng)?;
            simulated_annealing(graph, initial.path, &options.annealing_params(), rng)
        }
    }
}

/// Starting circuit for local search: a circuit already stored on the graph
/// wins, otherwise one is built as requested.
pub fn initial_solution<R: Rng + ?Sized>(
    graph: &Graph,
    strategy: InitialSolution,
    rng: &mut R,
) -> Result<Tour> {
    let stored = Tour::new(graph.best_path().to_vec(), graph.best_cost());
    if stored.is_circuit_over(graph.num_vertex()) {
        log::debug!("solver: reusing stored circuit cost={:.2}", stored.cost);
        return Ok(stored);
    }

    match strategy {
        InitialSolution::NearestNeighbor => nearest_neighbor(graph),
        InitialSolution::Random => random_solution(graph, rng),
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::{initial_solution, run, solve};
    use crate::{
        Error, Graph, Tour,
        algo::christofides::MatchingStrategy,
        graph::tests::{euclidean, unit_square},
        options::{Algorithm, InitialSolution, SolverOptions},
    };

    fn options(algorithm: Algorithm) -> SolverOptions {
        SolverOptions {
            algorithm,
            tabu_iterations: 5_000,
            tabu_stagnation: 1_000,
            anneal_iterations: 5_000,
            ..SolverOptions::default()
        }
    }

    fn plane() -> Graph {
        euclidean(&[
            (0.0, 0.0),
            (6.0, 1.0),
            (3.0, 7.0),
            (9.0, 5.0),
            (1.0, 4.0),
            (5.0, 3.0),
            (7.0, 9.0),
            (2.0, 8.0),
        ])
    }

    #[test]
    fn exact_is_never_beaten_on_complete_graph() {
        let graph = plane();
        let mut rng = StdRng::seed_from_u64(3);
        let optimum = run(&graph, &options(Algorithm::Backtracking), &mut rng).expect("exact");

        for algorithm in Algorithm::ALL {
            let tour = run(&graph, &options(*algorithm), &mut rng).expect("tour");
            assert!(tour.is_circuit_over(graph.num_vertex()), "{algorithm}");
            assert!(tour.cost >= optimum.cost - 1e-9, "{algorithm}");
        }
    }

    #[test]
    fn greedy_matching_christofides_is_still_a_circuit() {
        let graph = plane();
        let mut rng = StdRng::seed_from_u64(4);
        let tour = run(
            &graph,
            &SolverOptions {
                matching: MatchingStrategy::Greedy,
                ..options(Algorithm::Christofides)
            },
            &mut rng,
        )
        .expect("tour");
        assert!(tour.is_circuit_over(graph.num_vertex()));
    }

    #[test]
    fn unit_square_costs_four_for_deterministic_solvers() {
        let mut rng = StdRng::seed_from_u64(0);
        for algorithm in [
            Algorithm::Backtracking,
            Algorithm::Triangular,
            Algorithm::Christofides,
        ] {
            let tour = run(&unit_square(), &options(algorithm), &mut rng).expect("tour");
            assert!((tour.cost - 4.0).abs() < 1e-12, "{algorithm}");
        }
    }

    #[test]
    fn solve_records_result_on_graph() {
        let mut graph = unit_square();
        let mut rng = StdRng::seed_from_u64(1);
        let tour = solve(&mut graph, &options(Algorithm::Backtracking), &mut rng).expect("tour");

        assert_eq!(graph.best_path(), tour.path.as_slice());
        assert_eq!(graph.best_cost(), tour.cost);
    }

    #[test]
    fn local_search_starts_from_stored_circuit() {
        let mut graph = plane();
        let mut rng = StdRng::seed_from_u64(8);
        let seeded = solve(&mut graph, &options(Algorithm::Christofides), &mut rng).expect("seed");

        let initial =
            initial_solution(&graph, InitialSolution::Random, &mut rng).expect("initial");
        assert_eq!(initial, seeded);

        let improved = solve(&mut graph, &options(Algorithm::Tabu), &mut rng).expect("tabu");
        assert!(improved.cost <= seeded.cost);
        let annealed =
            solve(&mut graph, &options(Algorithm::Annealing), &mut rng).expect("annealing");
        assert!(annealed.cost <= improved.cost);
    }

    #[test]
    fn random_initial_solution_when_nothing_is_stored() {
        let graph = plane();
        let mut rng = StdRng::seed_from_u64(2);
        let initial =
            initial_solution(&graph, InitialSolution::Random, &mut rng).expect("initial");
        assert!(initial.is_circuit_over(graph.num_vertex()));
        assert_ne!(initial, Tour::default());
    }

    #[test]
    fn single_vertex_graph_is_a_trivial_circuit() {
        let mut rng = StdRng::seed_from_u64(0);
        for algorithm in Algorithm::ALL {
            let tour =
                run(&Graph::from_edges(1, &[]), &options(*algorithm), &mut rng).expect("tour");
            assert_eq!(tour.path, vec![0, 0]);
            assert_eq!(tour.cost, 0.0);
        }
    }

    #[test]
    fn empty_graph_is_rejected_by_every_solver() {
        let mut rng = StdRng::seed_from_u64(0);
        for algorithm in Algorithm::ALL {
            let err = run(&Graph::new(), &options(*algorithm), &mut rng).expect_err("empty");
            assert!(matches!(err, Error::EmptyGraph), "{algorithm}");
        }
    }

    #[test]
    fn invalid_options_are_rejected_before_solving() {
        let mut graph = unit_square();
        let mut rng = StdRng::seed_from_u64(0);
        let err = solve(
            &mut graph,
            &SolverOptions {
                cooling_rate: 0.0,
                ..SolverOptions::default()
            },
            &mut rng,
        )
        .expect_err("invalid cooling rate");
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(graph.best_path().is_empty());
    }
}
