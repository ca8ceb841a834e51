use std::fmt;

use crate::Graph;

/// A closed circuit: `path[0] == path[len - 1]`, every other id exactly once.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tour {
    pub path: Vec<usize>,
    pub cost: f64,
}

impl Tour {
    pub fn new(path: Vec<usize>, cost: f64) -> Self {
        Self { path, cost }
    }

    /// Number of legs in the circuit.
    pub fn legs(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// True when `path` visits each of `0..n` exactly once and returns to
    /// its start.
    pub fn is_circuit_over(&self, n: usize) -> bool {
        if n == 0 || self.path.len() != n + 1 || self.path.first() != self.path.last() {
            return false;
        }
        let mut seen = vec![false; n];
        for &id in &self.path[..n] {
            if id >= n || seen[id] {
                return false;
            }
            seen[id] = true;
        }
        true
    }

    pub fn metrics(&self, graph: &Graph) -> TourMetrics {
        if self.path.len() < 2 {
            log::info!("metrics: n < 2 so there's nothing to report");
            return TourMetrics::default();
        }

        let legs: Vec<f64> = self
            .path
            .windows(2)
            .map(|pair| graph.edge_weight(pair[0], pair[1]))
            .collect();
        let direct = legs.iter().filter(|w| w.is_finite()).count();
        let total = legs.iter().filter(|w| w.is_finite()).sum::<f64>();
        let longest = legs
            .iter()
            .copied()
            .filter(|w| w.is_finite())
            .fold(0.0_f64, f64::max);
        let average = if direct == 0 {
            0.0
        } else {
            total / direct as f64
        };

        log::info!(
            "metrics: legs={} direct={direct} total={total:.2} longest={longest:.2} avg={average:.2}",
            legs.len()
        );

        TourMetrics {
            legs: legs.len(),
            direct,
            total,
            longest,
            average,
        }
    }
}

impl fmt::Display for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, id) in self.path.iter().enumerate() {
            if idx > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{id}")?;
        }
        Ok(())
    }
}

/// Leg statistics over the graph's direct edges. Legs without a direct edge
/// (possible for the MST preorder tour) are left out of the sums.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TourMetrics {
    pub legs: usize,
    pub direct: usize,
    pub total: f64,
    pub longest: f64,
    pub average: f64,
}
