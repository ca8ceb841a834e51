pub mod approx;
pub mod christofides;
pub mod exact;
pub mod heuristics;
pub mod mst;

use crate::{Error, Graph, Result, Tour};

/// Every circuit starts and ends here.
pub const START_VERTEX: usize = 0;

/// Preconditions shared by all solvers: a non-empty graph whose ids are
/// `0..n`, so scratch arrays can be indexed by id.
pub(crate) fn ensure_indexable(graph: &Graph) -> Result<()> {
    if graph.is_empty() {
        return Err(Error::EmptyGraph);
    }
    if graph.find_vertex(START_VERTEX).is_none() {
        return Err(Error::VertexNotFound(START_VERTEX));
    }
    if !graph.has_contiguous_ids() {
        let last = graph.vertices().last().map(|v| v.id()).unwrap_or_default();
        return Err(Error::invalid_data(format!(
            "vertex ids must be contiguous from 0 (n={} max_id={last})",
            graph.num_vertex()
        )));
    }
    Ok(())
}

/// A lone vertex is its own circuit.
pub(crate) fn single_vertex_tour(graph: &Graph) -> Option<Tour> {
    (graph.num_vertex() == 1).then(|| Tour::new(vec![START_VERTEX, START_VERTEX], 0.0))
}

#[cfg(test)]
mod tests {
    use super::{ensure_indexable, single_vertex_tour};
    use crate::{Error, Graph};

    #[test]
    fn empty_graph_is_rejected() {
        assert!(matches!(ensure_indexable(&Graph::new()), Err(Error::EmptyGraph)));
    }

    #[test]
    fn missing_start_vertex_is_rejected() {
        let mut graph = Graph::new();
        graph.add_vertex(1, 0.0, 0.0);
        assert!(matches!(
            ensure_indexable(&graph),
            Err(Error::VertexNotFound(0))
        ));
    }

    #[test]
    fn gaps_in_ids_are_rejected() {
        let mut graph = Graph::new();
        graph.add_vertex(0, 0.0, 0.0);
        graph.add_vertex(2, 0.0, 0.0);
        let err = ensure_indexable(&graph).expect_err("ids 0,2 are not contiguous");
        assert!(err.to_string().contains("contiguous"));
    }

    #[test]
    fn single_vertex_circuit_has_zero_cost() {
        let tour = single_vertex_tour(&Graph::from_edges(1, &[])).expect("one vertex");
        assert_eq!(tour.path, vec![0, 0]);
        assert_eq!(tour.cost, 0.0);
        assert!(single_vertex_tour(&Graph::from_edges(2, &[])).is_none());
    }
}
