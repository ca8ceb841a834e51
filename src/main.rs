use std::{
    fs::File,
    io::{self, BufWriter, Write},
    time::Instant,
};

use log::info;
use rand::{SeedableRng, rngs::StdRng};

use tsp_circuit_core::{Graph, GraphInput, Result, SolverOptions, Tour, logging, solve};

fn main() -> Result<()> {
    let now = Instant::now();
    let options = SolverOptions::from_args()?;
    logging::init_logger(&options)?;
    let input = GraphInput::from_options(&options)?;

    info!("input: {input}");
    info!("options: {options}");

    let mut graph = input.into_graph();
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let tour = solve(&mut graph, &options, &mut rng)?;
    write_circuit(&options, &graph, &tour)?;

    info!(
        "output: n={} time={:.2}s",
        graph.num_vertex(),
        now.elapsed().as_secs_f32()
    );

    tour.metrics(&graph);

    Ok(())
}

fn write_circuit(options: &SolverOptions, graph: &Graph, tour: &Tour) -> Result<()> {
    let mut out: Box<dyn Write> = match options.output_path() {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    writeln!(out, "{tour}")?;

    let labels: Vec<&str> = tour
        .path
        .iter()
        .filter_map(|&id| graph.find_vertex(id).and_then(|v| v.label()))
        .collect();
    if labels.len() == tour.path.len() {
        writeln!(out, "{}", labels.join(" -> "))?;
    }

    writeln!(out, "cost: {:.2}", tour.cost)?;
    out.flush()?;
    Ok(())
}
