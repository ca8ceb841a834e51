//! Travelling-salesperson circuits over weighted undirected graphs: exact
//! backtracking, MST-based approximations, Christofides and local-search
//! metaheuristics behind one solver entry point.

pub mod algo;
mod error;
pub mod geo;
pub mod graph;
mod io;
pub mod logging;
pub mod solver;
mod tour;

pub use io::{input, options};

pub use error::{Error, Result};
pub use geo::GeoPoint;
pub use graph::{Edge, EdgeId, Graph, Scratch, Vertex};
pub use io::input::GraphInput;
pub use io::options::{Algorithm, InitialSolution, SolverOptions};
pub use solver::solve;
pub use tour::{Tour, TourMetrics};
