use std::collections::VecDeque;

use rand::Rng;

use super::{evaluate_solution, generate_neighbor};
use crate::{
    Error, Graph, Result, Tour,
    algo::{ensure_indexable, single_vertex_tour},
};

/// Bounded memory of recently accepted circuits. Newest entries sit at the
/// front; the oldest is evicted from the back once `capacity` is exceeded.
#[derive(Clone, Debug)]
pub struct TabuList {
    entries: VecDeque<Vec<usize>>,
    capacity: usize,
}

impl TabuList {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn push(&mut self, solution: Vec<usize>) {
        self.entries.push_front(solution);
        while self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    pub fn contains(&self, solution: &[usize]) -> bool {
        self.entries.iter().any(|entry| entry.as_slice() == solution)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.entries.iter().map(Vec::as_slice)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TabuParams {
    pub max_iterations: usize,
    pub tabu_list_size: usize,
    /// Consecutive rejected candidates before giving up.
    pub max_stagnation: usize,
}

impl Default for TabuParams {
    fn default() -> Self {
        Self {
            max_iterations: 100_000,
            tabu_list_size: 3,
            max_stagnation: 5_000,
        }
    }
}

/// Single-candidate tabu search state over a complete graph.
#[derive(Debug)]
pub struct TabuSearch<'g> {
    graph: &'g Graph,
    current: Tour,
    tabu: TabuList,
    stagnation: usize,
    accepted: usize,
}

impl<'g> TabuSearch<'g> {
    /// Evaluates `initial` and records it as the first tabu entry.
    pub fn new(graph: &'g Graph, initial: Vec<usize>, tabu_list_size: usize) -> Result<Self> {
        if !Tour::new(initial.clone(), 0.0).is_circuit_over(graph.num_vertex()) {
            return Err(Error::invalid_input(format!(
                "tabu: initial solution is not a circuit over {} vertices",
                graph.num_vertex()
            )));
        }
        let cost = evaluate_solution(graph, &initial)?;
        let mut tabu = TabuList::new(tabu_list_size);
        tabu.push(initial.clone());

        Ok(Self {
            graph,
            current: Tour::new(initial, cost),
            tabu,
            stagnation: 0,
            accepted: 0,
        })
    }

    /// Moves to `candidate` only when it is strictly cheaper than the
    /// current circuit and not in the tabu list.
    pub fn consider(&mut self, candidate: Vec<usize>) -> Result<bool> {
        let cost = evaluate_solution(self.graph, &candidate)?;
        if cost < self.current.cost && !self.tabu.contains(&candidate) {
            self.tabu.push(candidate.clone());
            self.current = Tour::new(candidate, cost);
            self.stagnation = 0;
            self.accepted += 1;
            return Ok(true);
        }
        self.stagnation += 1;
        Ok(false)
    }

    pub fn current(&self) -> &Tour {
        &self.current
    }

    pub fn stagnation(&self) -> usize {
        self.stagnation
    }

    pub fn accepted(&self) -> usize {
        self.accepted
    }

    pub fn tabu_list(&self) -> &TabuList {
        &self.tabu
    }

    pub fn tabu_list_mut(&mut self) -> &mut TabuList {
        &mut self.tabu
    }

    pub fn into_best(self) -> Tour {
        self.current
    }
}

pub fn tabu_search<R: Rng + ?Sized>(
    graph: &Graph,
    initial: Vec<usize>,
    params: &TabuParams,
    rng: &mut R,
) -> Result<Tour> {
    ensure_indexable(graph)?;
    if let Some(tour) = single_vertex_tour(graph) {
        return Ok(tour);
    }

    let mut search = TabuSearch::new(graph, initial, params.tabu_list_size)?;
    let start_cost = search.current().cost;
    let mut iterations = 0;

    while iterations < params.max_iterations {
        if search.stagnation() >= params.max_stagnation {
            log::debug!("tabu: stagnated after {iterations} iterations");
            break;
        }
        let candidate = generate_neighbor(&search.current().path, rng);
        search.consider(candidate)?;
        iterations += 1;
    }

    log::debug!(
        "tabu: iterations={iterations} accepted={} start_cost={start_cost:.2} cost={:.2}",
        search.accepted(),
        search.current().cost
    );
    Ok(search.into_best())
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::{TabuList, TabuParams, TabuSearch, tabu_search};
    use crate::{
        Error, Graph,
        graph::tests::{euclidean, unit_square},
    };

    fn hexagon() -> Graph {
        euclidean(&[
            (2.0, 0.0),
            (1.0, 1.7),
            (-1.0, 1.7),
            (-2.0, 0.0),
            (-1.0, -1.7),
            (1.0, -1.7),
        ])
    }

    #[test]
    fn list_evicts_oldest_beyond_capacity() {
        let mut list = TabuList::new(2);
        list.push(vec![0, 1, 0]);
        list.push(vec![0, 2, 0]);
        list.push(vec![0, 3, 0]);

        assert_eq!(list.len(), 2);
        assert!(!list.contains(&[0, 1, 0]));
        let expected: Vec<&[usize]> = vec![&[0, 3, 0], &[0, 2, 0]];
        assert_eq!(list.iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn initial_solution_is_tabu() {
        let graph = unit_square();
        let search = TabuSearch::new(&graph, vec![0, 2, 1, 3, 0], 3).expect("search");
        assert!(search.tabu_list().contains(&[0, 2, 1, 3, 0]));
        assert_eq!(search.tabu_list().len(), 1);
    }

    #[test]
    fn cheaper_tabu_candidate_is_rejected() {
        let graph = unit_square();
        let mut search = TabuSearch::new(&graph, vec![0, 2, 1, 3, 0], 3).expect("search");
        search.tabu_list_mut().push(vec![0, 1, 2, 3, 0]);

        assert!(!search.consider(vec![0, 1, 2, 3, 0]).expect("evaluated"));
        assert_eq!(search.current().path, vec![0, 2, 1, 3, 0]);
        assert_eq!(search.stagnation(), 1);

        assert!(search.consider(vec![0, 3, 2, 1, 0]).expect("evaluated"));
        assert!((search.current().cost - 4.0).abs() < 1e-12);
        assert_eq!(search.stagnation(), 0);
    }

    #[test]
    fn equal_cost_candidate_is_rejected() {
        let graph = unit_square();
        let mut search = TabuSearch::new(&graph, vec![0, 1, 2, 3, 0], 3).expect("search");
        assert!(!search.consider(vec![0, 3, 2, 1, 0]).expect("evaluated"));
    }

    #[test]
    fn rejects_initial_that_is_not_a_circuit() {
        let graph = unit_square();
        let err = TabuSearch::new(&graph, vec![0, 1, 1, 3, 0], 3).expect_err("duplicate 1");
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn search_never_worsens_the_initial_solution() {
        let graph = hexagon();
        let mut rng = StdRng::seed_from_u64(11);
        let initial = vec![0, 3, 1, 4, 2, 5, 0];
        let search = TabuSearch::new(&graph, initial.clone(), 3).expect("search");
        let start = search.current().cost;

        let params = TabuParams {
            max_iterations: 2_000,
            ..TabuParams::default()
        };
        let tour = tabu_search(&graph, initial, &params, &mut rng).expect("tour");

        assert!(tour.is_circuit_over(6));
        assert!(tour.cost <= start);
    }

    #[test]
    fn zero_stagnation_threshold_returns_initial() {
        let graph = hexagon();
        let mut rng = StdRng::seed_from_u64(1);
        let initial = vec![0, 3, 1, 4, 2, 5, 0];
        let params = TabuParams {
            max_stagnation: 0,
            ..TabuParams::default()
        };
        let tour = tabu_search(&graph, initial.clone(), &params, &mut rng).expect("tour");
        assert_eq!(tour.path, initial);
    }
}
