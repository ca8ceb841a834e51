use rand::Rng;

use super::{evaluate_solution, generate_neighbor};
use crate::{
    Error, Graph, Result, Tour,
    algo::{ensure_indexable, single_vertex_tour},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnnealingParams {
    pub max_iterations: usize,
    pub initial_temperature: f64,
    /// Multiplier applied to the temperature after every iteration.
    pub cooling_rate: f64,
}

impl Default for AnnealingParams {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            initial_temperature: 1_000.0,
            cooling_rate: 0.99,
        }
    }
}

/// Metropolis criterion: certain for strict improvements, otherwise
/// `exp((current - candidate) / temperature)`.
pub fn acceptance_probability(current: f64, candidate: f64, temperature: f64) -> f64 {
    if candidate < current {
        return 1.0;
    }
    if temperature <= 0.0 {
        return 0.0;
    }
    ((current - candidate) / temperature).exp()
}

#[derive(Debug)]
pub struct SimulatedAnnealing<'g> {
    graph: &'g Graph,
    current: Tour,
    best: Tour,
    temperature: f64,
    cooling_rate: f64,
}

impl<'g> SimulatedAnnealing<'g> {
    pub fn new(graph: &'g Graph, initial: Vec<usize>, params: &AnnealingParams) -> Result<Self> {
        if !Tour::new(initial.clone(), 0.0).is_circuit_over(graph.num_vertex()) {
            return Err(Error::invalid_input(format!(
                "annealing: initial solution is not a circuit over {} vertices",
                graph.num_vertex()
            )));
        }
        let cost = evaluate_solution(graph, &initial)?;
        let current = Tour::new(initial, cost);

        Ok(Self {
            graph,
            best: current.clone(),
            current,
            temperature: params.initial_temperature,
            cooling_rate: params.cooling_rate,
        })
    }

    /// One neighbour draw, acceptance test and cooling step. Returns whether
    /// the candidate replaced the current circuit.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<bool> {
        let candidate = generate_neighbor(&self.current.path, rng);
        let cost = evaluate_solution(self.graph, &candidate)?;

        let probability = acceptance_probability(self.current.cost, cost, self.temperature);
        let accepted = rng.random::<f64>() < probability;
        if cost < self.best.cost {
            self.best = Tour::new(candidate.clone(), cost);
        }
        if accepted {
            self.current = Tour::new(candidate, cost);
        }

        self.temperature *= self.cooling_rate;
        Ok(accepted)
    }

    pub fn current(&self) -> &Tour {
        &self.current
    }

    pub fn best(&self) -> &Tour {
        &self.best
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn into_best(self) -> Tour {
        self.best
    }
}

pub fn simulated_annealing<R: Rng + ?Sized>(
    graph: &Graph,
    initial: Vec<usize>,
    params: &AnnealingParams,
    rng: &mut R,
) -> Result<Tour> {
    ensure_indexable(graph)?;
    if let Some(tour) = single_vertex_tour(graph) {
        return Ok(tour);
    }

    let mut annealing = SimulatedAnnealing::new(graph, initial, params)?;
    let start_cost = annealing.current().cost;
    let mut accepted = 0usize;

    for _ in 0..params.max_iterations {
        if annealing.step(rng)? {
            accepted += 1;
        }
    }

    log::debug!(
        "annealing: iterations={} accepted={accepted} start_cost={start_cost:.2} cost={:.2} final_temperature={:.4}",
        params.max_iterations,
        annealing.best().cost,
        annealing.temperature()
    );
    Ok(annealing.into_best())
}
