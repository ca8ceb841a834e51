//! 2-approximation: preorder walk of the minimum spanning tree.
//!
//! The factor-2 bound only holds when weights satisfy the triangle
//! inequality; that is not checked.

use super::{START_VERTEX, mst::minimum_spanning_tree, single_vertex_tour};
use crate::{Graph, Result, Tour};

/// Preorder over parent -> child links, smaller child ids first.
pub fn preorder(children: &[Vec<usize>], root: usize) -> Vec<usize> {
    let mut route = Vec::with_capacity(children.len());
    let mut stack = vec![root];

    while let Some(vertex) = stack.pop() {
        route.push(vertex);
        stack.extend(children[vertex].iter().rev());
    }

    route
}

/// Length of the closed route `route[0] -> ... -> route[last] -> route[0]`.
/// Pairs without a direct edge fall back to the great-circle distance
/// between their stored coordinates.
pub fn route_distance(graph: &Graph, route: &[usize]) -> f64 {
    if route.len() < 2 {
        return 0.0;
    }

    let leg = |a: usize, b: usize| match graph.find_edge(a, b) {
        Some(edge) => edge.weight(),
        None => {
            let (Some(va), Some(vb)) = (graph.find_vertex(a), graph.find_vertex(b)) else {
                return f64::INFINITY;
            };
            log::trace!("triangular: no edge {a}->{b}, using haversine");
            va.point().haversine(vb.point())
        }
    };

    let open: f64 = route.windows(2).map(|pair| leg(pair[0], pair[1])).sum();
    open + leg(route[route.len() - 1], route[0])
}

/// MST preorder tour, a.k.a. the triangular approximation.
pub fn triangular_approximation(graph: &Graph) -> Result<Tour> {
    let tree = minimum_spanning_tree(graph)?;
    if let Some(tour) = single_vertex_tour(graph) {
        return Ok(tour);
    }

    let mut route = preorder(&tree.children(), START_VERTEX);
    let cost = route_distance(graph, &route);
    route.push(START_VERTEX);

    log::debug!(
        "triangular: n={} mst_weight={:.2} cost={cost:.2}",
        graph.num_vertex(),
        tree.total_weight()
    );
    Ok(Tour::new(route, cost))
}

#[cfg(test)]
mod tests {
    use super::{preorder, route_distance, triangular_approximation};
    use crate::{
        Graph,
        algo::exact::backtracking,
        graph::tests::{euclidean, unit_square},
    };

    #[test]
    fn preorder_visits_children_in_ascending_order() {
        let children = vec![vec![1, 3], vec![2], vec![], vec![4], vec![]];
        assert_eq!(preorder(&children, 0), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn unit_square_tour_is_the_perimeter() {
        let tour = triangular_approximation(&unit_square()).expect("tour");
        assert_eq!(tour.path, vec![0, 1, 2, 3, 0]);
        assert!((tour.cost - 4.0).abs() < 1e-12);
    }

    #[test]
    fn metric_instance_stays_within_twice_the_optimum() {
        let graph = euclidean(&[
            (0.0, 0.0),
            (7.0, 1.0),
            (3.0, 6.0),
            (8.0, 7.0),
            (1.0, 4.0),
            (5.0, 3.0),
            (2.0, 9.0),
        ]);
        let optimum = backtracking(&graph).expect("optimum");
        let tour = triangular_approximation(&graph).expect("tour");

        assert!(tour.is_circuit_over(graph.num_vertex()));
        assert!(tour.cost <= 2.0 * optimum.cost + 1e-9);
        assert!(tour.cost >= optimum.cost - 1e-9);
    }

    #[test]
    fn missing_edges_fall_back_to_haversine() {
        let mut graph = Graph::new();
        graph.add_vertex(0, 0.0, 0.0);
        graph.add_vertex(1, 0.0, 1.0);
        graph.add_vertex(2, 1.0, 1.0);
        graph.add_bidirectional_edge(0, 1, 5.0);
        graph.add_bidirectional_edge(1, 2, 5.0);

        let expected = 10.0
            + graph
                .find_vertex(2)
                .expect("vertex 2")
                .point()
                .haversine(graph.find_vertex(0).expect("vertex 0").point());
        assert!((route_distance(&graph, &[0, 1, 2]) - expected).abs() < 1e-6);
    }

    #[test]
    fn missing_edges_between_origin_points_cost_nothing() {
        let graph = Graph::from_edges(3, &[(0, 1, 2.0), (1, 2, 3.0)]);
        let tour = triangular_approximation(&graph).expect("tour");

        assert_eq!(tour.path, vec![0, 1, 2, 0]);
        assert!((tour.cost - 5.0).abs() < 1e-12);
    }
}
