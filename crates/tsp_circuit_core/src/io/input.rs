use std::{
    fs,
    path::{Path, PathBuf},
};

use tsp_circuit_derive::KvDisplay;

use crate::{Error, GeoPoint, Graph, Result, SolverOptions};

const ERR_MISSING_EDGES: &str = "--edges <path> is required";

/// Graph loaded from CSV files, with the paths it came from.
#[derive(Clone, Debug, KvDisplay)]
pub struct GraphInput {
    #[kv(fmt = "path")]
    pub edges_file: PathBuf,
    #[kv(fmt = "text")]
    pub nodes_file: String,
    pub vertices: usize,
    pub links: usize,
    #[kv(skip)]
    pub graph: Graph,
}

impl GraphInput {
    pub fn from_options(options: &SolverOptions) -> Result<Self> {
        let edges_file = options
            .edges_path()
            .ok_or_else(|| Error::invalid_input(ERR_MISSING_EDGES))?;
        let nodes_file = options.nodes_path();
        let graph = load_graph(edges_file, nodes_file)?;

        Ok(Self {
            edges_file: edges_file.to_path_buf(),
            nodes_file: nodes_file
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            vertices: graph.num_vertex(),
            links: graph.num_edges() / 2,
            graph,
        })
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }
}

/// Reads an edge list and, when given, a node file placed first so that
/// vertices carry real coordinates. Vertex ids must end up as `0..n`.
pub fn load_graph(edges: &Path, nodes: Option<&Path>) -> Result<Graph> {
    let mut graph = Graph::new();

    if let Some(nodes) = nodes {
        let text = read_file(nodes)?;
        let added = parse_nodes(&text, &mut graph)?;
        log::debug!("input: nodes={added} file={}", nodes.display());
    }

    let text = read_file(edges)?;
    let added = parse_edges(&text, &mut graph, nodes.is_none())?;
    log::debug!("input: edges={added} file={}", edges.display());

    if graph.is_empty() {
        return Err(Error::EmptyGraph);
    }
    if !graph.has_contiguous_ids() {
        return Err(Error::invalid_data(format!(
            "vertex ids must be contiguous from 0, got {} vertices up to id {}",
            graph.num_vertex(),
            graph.vertices().last().map(|v| v.id()).unwrap_or_default()
        )));
    }

    Ok(graph)
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        Error::invalid_input(format!("failed to read {}: {e}", path.display()))
    })
}

/// Header-tolerant CSV rows: blank lines are skipped and a first row whose
/// leading field is not numeric is taken as a header.
fn rows(text: &str) -> impl Iterator<Item = (usize, Vec<&str>)> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .enumerate()
        .filter(|(row, (_, line))| {
            let first = line.split(',').next().unwrap_or_default().trim();
            *row > 0 || first.parse::<f64>().is_ok()
        })
        .map(|(_, (line_no, line))| (line_no, line.split(',').map(str::trim).collect()))
}

fn parse_field<T: std::str::FromStr>(
    file: &str,
    line_no: usize,
    column: &str,
    raw: &str,
) -> Result<T> {
    raw.parse::<T>().map_err(|_| {
        Error::invalid_data(format!("{file} line {line_no}: invalid {column}: {raw}"))
    })
}

/// `id,longitude,latitude` rows. Returns the number of vertices added.
pub fn parse_nodes(text: &str, graph: &mut Graph) -> Result<usize> {
    let mut added = 0;
    for (line_no, fields) in rows(text) {
        if fields.len() < 3 {
            return Err(Error::invalid_data(format!(
                "nodes line {line_no}: expected 'id,longitude,latitude'"
            )));
        }
        let id: usize = parse_field("nodes", line_no, "id", fields[0])?;
        let lon: f64 = parse_field("nodes", line_no, "longitude", fields[1])?;
        let lat: f64 = parse_field("nodes", line_no, "latitude", fields[2])?;

        let point = GeoPoint::new(lon, lat);
        if !point.is_valid() {
            return Err(Error::invalid_data(format!(
                "nodes line {line_no}: coordinates out of range: {point}"
            )));
        }
        if !graph.add_vertex(id, lon, lat) {
            return Err(Error::invalid_data(format!(
                "nodes line {line_no}: duplicate id {id}"
            )));
        }
        added += 1;
    }
    Ok(added)
}

/// `origin,destination,distance[,origin label,destination label]` rows,
/// each added as a bidirectional edge. Unknown endpoints are created at the
/// origin when `create_missing` is set and rejected otherwise.
pub fn parse_edges(text: &str, graph: &mut Graph, create_missing: bool) -> Result<usize> {
    let mut added = 0;
    for (line_no, fields) in rows(text) {
        if fields.len() < 3 {
            return Err(Error::invalid_data(format!(
                "edges line {line_no}: expected 'origin,destination,distance'"
            )));
        }
        let orig: usize = parse_field("edges", line_no, "origin", fields[0])?;
        let dest: usize = parse_field("edges", line_no, "destination", fields[1])?;
        let weight: f64 = parse_field("edges", line_no, "distance", fields[2])?;
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::invalid_data(format!(
                "edges line {line_no}: distance must be finite and >= 0, got {weight}"
            )));
        }

        if create_missing {
            graph.add_vertex(orig, 0.0, 0.0);
            graph.add_vertex(dest, 0.0, 0.0);
        }
        if !graph.add_bidirectional_edge(orig, dest, weight) {
            let missing = if graph.find_vertex(orig).is_none() {
                orig
            } else {
                dest
            };
            return Err(Error::invalid_data(format!(
                "edges line {line_no}: unknown vertex {missing}"
            )));
        }

        if let (Some(orig_label), Some(dest_label)) = (fields.get(3), fields.get(4)) {
            if !orig_label.is_empty() {
                graph.set_label(orig, *orig_label);
            }
            if !dest_label.is_empty() {
                graph.set_label(dest, *dest_label);
            }
        }
        added += 1;
    }
    Ok(added)
}
