use crate::{
    Error, Graph, Result, Scratch, Tour,
    algo::{START_VERTEX, ensure_indexable, single_vertex_tour},
};

/// Greedy construction: from the start vertex always take the cheapest
/// edge to an unvisited vertex, then close the circuit.
pub fn nearest_neighbor(graph: &Graph) -> Result<Tour> {
    ensure_indexable(graph)?;
    if let Some(tour) = single_vertex_tour(graph) {
        return Ok(tour);
    }

    let n = graph.num_vertex();
    let mut scratch = Scratch::new(n);
    let mut path = Vec::with_capacity(n + 1);
    let mut cost = 0.0;
    let mut current = START_VERTEX;

    scratch.visited[current] = true;
    path.push(current);

    while path.len() < n {
        let next = graph
            .adjacent(current)
            .filter(|edge| !scratch.visited[edge.dest()])
            .min_by(|a, b| {
                a.weight()
                    .total_cmp(&b.weight())
                    .then_with(|| a.dest().cmp(&b.dest()))
            })
            .map(|edge| (edge.dest(), edge.weight()));

        let Some((next, weight)) = next else {
            let to = scratch.first_unvisited().unwrap_or(START_VERTEX);
            return Err(Error::IncompleteGraph { from: current, to });
        };

        scratch.visited[next] = true;
        path.push(next);
        cost += weight;
        current = next;
    }

    let closing = graph
        .find_edge(current, START_VERTEX)
        .ok_or(Error::IncompleteGraph {
            from: current,
            to: START_VERTEX,
        })?;
    cost += closing.weight();
    path.push(START_VERTEX);

    log::debug!("nearest_neighbor: n={n} cost={cost:.2}");
    Ok(Tour::new(path, cost))
}
