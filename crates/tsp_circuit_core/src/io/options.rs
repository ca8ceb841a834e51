use std::{env, path::Path};

use log::LevelFilter;
use tsp_circuit_derive::{CliOptions, CliValue, KvDisplay};

use crate::{
    Error, Result,
    algo::{
        christofides::MatchingStrategy,
        heuristics::{AnnealingParams, TabuParams},
    },
};

const ERR_TABU_LIST_SIZE: &str = "tabu-list-size must be >= 1";
const ERR_INITIAL_TEMPERATURE: &str = "initial-temperature must be a finite value > 0";
const ERR_COOLING_RATE: &str = "cooling-rate must be within (0, 1]";

/// Runtime options for solving and reporting.
#[derive(Clone, Debug, CliOptions, KvDisplay)]
pub struct SolverOptions {
    /// Algorithm to run.
    #[cli(
        long = "algorithm",
        parse_with = "Algorithm::parse",
        value = "backtracking|triangular|christofides|nearest-neighbor|tabu|annealing"
    )]
    pub algorithm: Algorithm,
    /// Matching used by Christofides.
    #[cli(
        long = "matching",
        parse_with = "MatchingStrategy::parse",
        value = "greedy|optimal"
    )]
    pub matching: MatchingStrategy,
    /// Starting circuit for tabu search and simulated annealing.
    #[cli(
        long = "initial",
        parse_with = "InitialSolution::parse",
        value = "nearest-neighbor|random"
    )]
    pub initial: InitialSolution,
    /// Iteration cap for tabu search.
    #[cli(long = "tabu-iterations")]
    pub tabu_iterations: usize,
    /// Number of recent circuits kept in the tabu list.
    #[cli(long = "tabu-list-size")]
    pub tabu_list_size: usize,
    /// Consecutive rejected neighbours before tabu search stops.
    #[cli(long = "tabu-stagnation")]
    pub tabu_stagnation: usize,
    /// Iteration budget for simulated annealing.
    #[cli(long = "anneal-iterations")]
    pub anneal_iterations: usize,
    #[cli(long = "initial-temperature")]
    pub initial_temperature: f64,
    /// Geometric cooling factor applied every annealing iteration.
    #[cli(long = "cooling-rate")]
    pub cooling_rate: f64,
    /// RNG seed; unset means OS entropy.
    #[cli(long = "seed")]
    #[kv(fmt = "opt")]
    pub seed: Option<u64>,
    /// Structured logging level.
    #[cli(
        long = "log-level",
        parse_with = "LogLevel::parse",
        value = "error|warn|info|debug|trace|off"
    )]
    pub log_level: LogLevel,
    /// Logging output format.
    #[cli(long = "log-format", parse_with = "LogFormat::parse", value = "compact|pretty")]
    pub log_format: LogFormat,
    /// Include timestamps in log lines.
    #[cli(long = "log-timestamp", flag)]
    pub log_timestamp: bool,
    /// Optional output file path for logs. Empty means stderr.
    #[cli(long = "log-output")]
    #[kv(fmt = "text")]
    pub log_output: String,
    /// Edge list CSV: `origin,destination,distance[,origin label,destination label]`.
    #[cli(long = "edges")]
    #[kv(fmt = "text")]
    pub edges: String,
    /// Optional node CSV: `id,longitude,latitude`.
    #[cli(long = "nodes")]
    #[kv(fmt = "text")]
    pub nodes: String,
    /// Optional output file for the circuit. Empty means stdout.
    #[cli(long = "output")]
    #[kv(fmt = "text")]
    pub output: String,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, CliValue)]
#[cli_value(option = "algorithm")]
pub enum Algorithm {
    #[cli(alias = "exact")]
    Backtracking,
    #[cli(alias = "2-approx")]
    Triangular,
    #[default]
    Christofides,
    #[cli(alias = "nn")]
    NearestNeighbor,
    #[cli(alias = "tabu-search")]
    Tabu,
    #[cli(alias = "simulated-annealing", alias = "sa")]
    Annealing,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, CliValue)]
#[cli_value(option = "initial")]
pub enum InitialSolution {
    #[default]
    #[cli(alias = "nn")]
    NearestNeighbor,
    Random,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-level")]
pub enum LogLevel {
    Error,
    #[cli(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-format")]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl Default for SolverOptions {
    fn default() -> Self {
        let tabu = TabuParams::default();
        let annealing = AnnealingParams::default();
        Self {
            algorithm: Algorithm::default(),
            matching: MatchingStrategy::default(),
            initial: InitialSolution::default(),
            tabu_iterations: tabu.max_iterations,
            tabu_list_size: tabu.tabu_list_size,
            tabu_stagnation: tabu.max_stagnation,
            anneal_iterations: annealing.max_iterations,
            initial_temperature: annealing.initial_temperature,
            cooling_rate: annealing.cooling_rate,
            seed: None,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Compact,
            log_timestamp: true,
            log_output: String::new(),
            edges: String::new(),
            nodes: String::new(),
            output: String::new(),
        }
    }
}

impl SolverOptions {
    pub fn from_args() -> Result<Self> {
        let options = Self::parse_from_iter(env::args().skip(1))?;
        options.validate()?;
        Ok(options)
    }

    pub fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::invalid_input(Self::usage()));
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                return Err(Error::invalid_input(format!(
                    "Unexpected argument: {arg}\n\n{}",
                    Self::usage()
                )));
            };

            if raw_name.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, value) = Self::split_arg(raw_name, &mut args);
            if !options.apply_cli_option(&name, value)? {
                return Err(Error::invalid_input(format!(
                    "Unknown option: --{name}\n\n{}",
                    Self::usage()
                )));
            }
        }

        Ok(options)
    }

    pub fn usage() -> String {
        let mut usage = String::from(concat!(
            "Usage:\n",
            "  tsp-circuit --edges edges.csv [--nodes nodes.csv] [options]\n\n",
            "Options:\n",
        ));
        for (name, hint) in Self::CLI_OPTION_HINTS {
            if hint.is_empty() {
                usage.push_str(&format!("  --{name}\n"));
            } else {
                usage.push_str(&format!("  --{name} {hint}\n"));
            }
        }
        usage.push_str(concat!(
            "  --help\n",
            "\n",
            "Examples:\n",
            "  tsp-circuit --edges tourism.csv --algorithm backtracking\n",
            "  tsp-circuit --edges edges.csv --nodes nodes.csv --algorithm christofides --matching greedy\n",
            "  tsp-circuit --edges edges.csv --algorithm tabu --tabu-iterations 20000 --seed 7\n",
            "  tsp-circuit --edges edges.csv --algorithm annealing --cooling-rate 0.995 --log-level info\n",
        ));
        usage
    }

    pub fn validate(&self) -> Result<()> {
        if self.tabu_list_size == 0 {
            return Err(Error::invalid_input(ERR_TABU_LIST_SIZE));
        }
        if !self.initial_temperature.is_finite() || self.initial_temperature <= 0.0 {
            return Err(Error::invalid_input(ERR_INITIAL_TEMPERATURE));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate <= 1.0) {
            return Err(Error::invalid_input(ERR_COOLING_RATE));
        }
        Ok(())
    }

    pub fn tabu_params(&self) -> TabuParams {
        TabuParams {
            max_iterations: self.tabu_iterations,
            tabu_list_size: self.tabu_list_size,
            max_stagnation: self.tabu_stagnation,
        }
    }

    pub fn annealing_params(&self) -> AnnealingParams {
        AnnealingParams {
            max_iterations: self.anneal_iterations,
            initial_temperature: self.initial_temperature,
            cooling_rate: self.cooling_rate,
        }
    }

    pub fn log_output_path(&self) -> Option<&Path> {
        optional_path(&self.log_output)
    }

    pub fn output_path(&self) -> Option<&Path> {
        optional_path(&self.output)
    }

    pub fn edges_path(&self) -> Option<&Path> {
        optional_path(&self.edges)
    }

    pub fn nodes_path(&self) -> Option<&Path> {
        optional_path(&self.nodes)
    }
}

/// Empty and `-` mean "not a file".
fn optional_path(raw: &str) -> Option<&Path> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "-" {
        None
    } else {
        Some(Path::new(raw))
    }
}
