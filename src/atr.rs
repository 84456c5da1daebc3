//! Recursive, exact computation of all-terminal reliability.
//!
//! `calculate_atr` factors the graph down via Moskowitz's identity
//! (`ATR(G) = p*ATR(G/e) + (1-p)*ATR(G-e)`), short-circuiting on trees,
//! cycles, bridges, hanging vertices, resolving chains, and — below a fixed
//! vertex count — closed-form polynomials, so the full #P-hard recursion
//! only ever runs on genuinely irreducible instances.
use std::collections::{HashSet, VecDeque};

use crate::atr_forms;
use crate::chain::Chain;
use crate::degrees::DegreesVector;
use crate::graph::UndirectedRandomGraph;
use crate::matrix::{vertex_not_found, AdjacencyMatrix};

/// Above this vertex count there is no closed form; below or at it,
/// `atr_forms` has an exact formula.
const MAX_COMPUTABLE_DIMENSION: usize = 5;

/// Computes the all-terminal reliability of `adjacency_matrix`: the
/// probability that every vertex remains mutually reachable when each edge
/// survives independently with its given probability.
pub fn calculate_atr(adjacency_matrix: &AdjacencyMatrix<f64>) -> f64 {
    let mut graph = UndirectedRandomGraph::new(adjacency_matrix.clone());

    if graph.is_tree() {
        return graph.calculate_tree_atr();
    }

    let component = bfs_component(graph.matrix());
    if !is_connected_graph(&graph, &component) {
        return 0.0;
    }

    if graph.is_cycle() {
        return graph.calculate_cycle_atr();
    }

    if graph.num_vertexes() <= MAX_COMPUTABLE_DIMENSION {
        return atr_forms::calculate_computable_dimension_graph(&graph);
    }

    let r = prepare_for_reduction(&mut graph);
    if graph.num_vertexes() <= MAX_COMPUTABLE_DIMENSION {
        return r * atr_forms::calculate_computable_dimension_graph(&graph);
    }

    r * remove_edge_atr_step(&mut graph)
}

/// Walks outward from the first degree-2 vertex (by index) in both
/// directions, stopping each side as soon as it hits a vertex whose degree
/// isn't 2. Returns [`Chain::empty`] if no degree-2 vertex exists.
pub fn find_resolving_chain(graph: &UndirectedRandomGraph) -> Chain {
    let begin = graph.degrees().find_first_vertex_that_degree_equal_two();
    if begin == vertex_not_found() {
        return Chain::empty();
    }

    let mut found_chain: VecDeque<usize> = VecDeque::new();
    let mut sum_inverse_p = 0.0;
    let mut p_product = 1.0;

    let mut prev_vertex = begin;
    let mut cur_vertex = begin;
    loop {
        let next = graph.matrix().find_neighbor_with_lowest_num_for(cur_vertex, &[prev_vertex]);
        found_chain.push_front(next);
        prev_vertex = cur_vertex;
        cur_vertex = next;

        let edge_value = graph.at(prev_vertex, cur_vertex);
        sum_inverse_p += 1.0 / edge_value;
        p_product *= edge_value;

        if graph.vertex_degree(cur_vertex) != 2 {
            break;
        }
    }

    let mut prev_vertex = begin;
    let mut cur_vertex = begin;
    loop {
        let next = graph.matrix().find_neighbor_with_biggest_num_for(cur_vertex, &[prev_vertex]);
        found_chain.push_back(next);
        prev_vertex = cur_vertex;
        cur_vertex = next;

        let edge_value = graph.at(prev_vertex, cur_vertex);
        sum_inverse_p += 1.0 / edge_value;
        p_product *= edge_value;

        if graph.vertex_degree(cur_vertex) != 2 {
            break;
        }
    }

    Chain::new(found_chain.into_iter().collect(), sum_inverse_p, p_product, begin)
}

fn remove_edge_atr_step(graph: &mut UndirectedRandomGraph) -> f64 {
    let (edge, probability, remove_handle) = graph.remove_random_edge();

    let component = bfs_component(graph.matrix());
    let is_removed_edge_bridge = !is_connected_graph(graph, &component);

    let r = if is_removed_edge_bridge {
        let inverse_component = graph.inverse_component(&component);
        probability * calculate_component_atr(graph, &component) * calculate_component_atr(graph, &inverse_component)
    } else {
        let mut r = (1.0 - probability) * calculate_internal_atr(graph);

        let pull_handle = graph.pull_edge(edge.min_vertex(), edge.max_vertex());
        r += probability * calculate_internal_atr(graph);
        graph.rollback(pull_handle);

        r
    };

    graph.rollback(remove_handle);
    r
}

fn prepare_for_reduction(graph: &mut UndirectedRandomGraph) -> f64 {
    let mut r = remove_hanging_vertexes(graph);

    loop {
        if graph.num_vertexes() <= MAX_COMPUTABLE_DIMENSION {
            break;
        }
        let chain = find_resolving_chain(graph);
        if chain.is_empty() {
            break;
        }
        r *= graph.remove_chain(&chain);

        assert!(!graph.contains_hanging_vertex(), "prepare_for_reduction - reduction produced a hanging vertex");
    }

    r
}

fn remove_hanging_vertexes(graph: &mut UndirectedRandomGraph) -> f64 {
    let mut r = 1.0;
    while graph.contains_hanging_vertex() {
        let (probability, _handle) = graph.remove_hanging_vertex_with_lowest_index();
        r *= probability;
    }
    r
}

/// BFS over `matrix` from vertex 0, returning the set of vertices reachable
/// from it. On a disconnected graph this is a proper subset; on a connected
/// one it's every vertex.
pub fn bfs_component(matrix: &AdjacencyMatrix<f64>) -> HashSet<usize> {
    if matrix.dimension() == 0 {
        return HashSet::new();
    }

    let mut component = HashSet::new();
    let mut processed = vec![false; matrix.dimension()];
    let mut to_process = VecDeque::new();

    component.insert(0);
    to_process.push_back(0);
    while let Some(cur) = to_process.pop_front() {
        for vertex in 0..matrix.dimension() {
            if !processed[vertex] && matrix.is_connected(cur, vertex) {
                component.insert(vertex);
                to_process.push_back(vertex);
            }
        }
        processed[cur] = true;
    }

    component
}

fn calculate_component_atr(graph: &mut UndirectedRandomGraph, component: &HashSet<usize>) -> f64 {
    let prev_matrix = graph.matrix().clone();
    let prev_degrees = graph.degrees().clone();

    let sub_matrix = graph.subgraph_adjacency_matrix(component);
    let sub_degrees = DegreesVector::from_matrix(&sub_matrix);

    graph.set_matrix_and_degrees(sub_matrix, sub_degrees);
    let r = calculate_internal_atr(graph);
    graph.set_matrix_and_degrees(prev_matrix, prev_degrees);

    r
}

fn calculate_internal_atr(graph: &mut UndirectedRandomGraph) -> f64 {
    if graph.num_vertexes() <= MAX_COMPUTABLE_DIMENSION {
        return atr_forms::calculate_computable_dimension_graph(graph);
    }

    let chain = find_resolving_chain(graph);
    if !chain.is_empty() {
        let handle = graph.remove_trivial_chain(&chain);
        let r = chain.chain_factor() * calculate_internal_atr(graph);
        graph.rollback(handle);
        r
    } else {
        remove_edge_atr_step(graph)
    }
}

fn is_connected_graph(graph: &UndirectedRandomGraph, component: &HashSet<usize>) -> bool {
    graph.num_vertexes() == component.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::AdjacencyMatrix;

    fn complete_graph(n: usize, p: f64) -> AdjacencyMatrix<f64> {
        let mut m = AdjacencyMatrix::<f64>::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                m.add_edge(i, j, p);
            }
        }
        m
    }

    #[test]
    fn empty_and_singleton_graphs_are_fully_reliable() {
        assert_eq!(calculate_atr(&AdjacencyMatrix::<f64>::new(0)), 1.0);
        assert_eq!(calculate_atr(&AdjacencyMatrix::<f64>::new(1)), 1.0);
    }

    #[test]
    fn single_edge_atr_is_its_probability() {
        let mut m = AdjacencyMatrix::<f64>::new(2);
        m.add_edge(0, 1, 0.37);
        assert!((calculate_atr(&m) - 0.37).abs() < 1e-12);
    }

    #[test]
    fn disconnected_graph_has_zero_reliability() {
        let mut m = AdjacencyMatrix::<f64>::new(4);
        m.add_edge(0, 1, 0.9);
        m.add_edge(2, 3, 0.9);
        assert_eq!(calculate_atr(&m), 0.0);
    }

    #[test]
    fn tree_atr_matches_edge_product() {
        // star with 4 leaves
        let mut m = AdjacencyMatrix::<f64>::new(5);
        m.add_edge(0, 1, 0.4);
        m.add_edge(0, 2, 0.5);
        m.add_edge(0, 3, 0.6);
        m.add_edge(0, 4, 0.7);
        let expected = 0.4 * 0.5 * 0.6 * 0.7;
        assert!((calculate_atr(&m) - expected).abs() < 1e-12);
    }

    #[test]
    fn cycle_atr_matches_closed_form() {
        let mut m = AdjacencyMatrix::<f64>::new(4);
        m.add_edge(0, 1, 0.6);
        m.add_edge(1, 2, 0.6);
        m.add_edge(2, 3, 0.6);
        m.add_edge(3, 0, 0.6);
        let mut g = UndirectedRandomGraph::new(m.clone());
        let expected = g.calculate_cycle_atr();
        assert!((calculate_atr(&m) - expected).abs() < 1e-12);
    }

    #[test]
    fn bridge_splits_into_independent_components() {
        // two triangles joined by a bridge edge
        let mut m = AdjacencyMatrix::<f64>::new(6);
        m.add_edge(0, 1, 0.8);
        m.add_edge(1, 2, 0.8);
        m.add_edge(2, 0, 0.8);
        m.add_edge(3, 4, 0.8);
        m.add_edge(4, 5, 0.8);
        m.add_edge(5, 3, 0.8);
        m.add_edge(2, 3, 0.5);

        let left = {
            let mut t = AdjacencyMatrix::<f64>::new(3);
            t.add_edge(0, 1, 0.8);
            t.add_edge(1, 2, 0.8);
            t.add_edge(2, 0, 0.8);
            calculate_atr(&t)
        };
        let expected = 0.5 * left * left;
        assert!((calculate_atr(&m) - expected).abs() < 1e-9);
    }

    #[test]
    fn moskowitz_identity_holds_on_a_six_vertex_graph() {
        // hexagon plus one diagonal: small enough to factor directly,
        // large enough to force the general recursive path.
        let mut m = AdjacencyMatrix::<f64>::new(6);
        m.add_edge(0, 1, 0.7);
        m.add_edge(1, 2, 0.7);
        m.add_edge(2, 3, 0.7);
        m.add_edge(3, 4, 0.7);
        m.add_edge(4, 5, 0.7);
        m.add_edge(5, 0, 0.7);
        m.add_edge(0, 3, 0.6);

        let mut g_minus_e = m.clone();
        let _ = g_minus_e.remove_edge(crate::matrix::Edge::new(0, 3));

        let mut g_over_e = UndirectedRandomGraph::new(m.clone());
        let handle = g_over_e.pull_edge(0, 3);
        let contracted_matrix = g_over_e.matrix().clone();
        g_over_e.rollback(handle);

        let expected = 0.6 * calculate_atr(&contracted_matrix) + 0.4 * calculate_atr(&g_minus_e);
        assert!((calculate_atr(&m) - expected).abs() < 1e-9);
    }

    #[test]
    fn reliability_is_invariant_under_relabeling() {
        let mut m = AdjacencyMatrix::<f64>::new(5);
        m.add_edge(0, 1, 0.5);
        m.add_edge(1, 2, 0.6);
        m.add_edge(2, 3, 0.7);
        m.add_edge(3, 4, 0.5);
        m.add_edge(4, 0, 0.6);
        m.add_edge(0, 2, 0.4);

        let mut relabeled = AdjacencyMatrix::<f64>::new(5);
        // reverse the vertex order
        let perm = [4usize, 3, 2, 1, 0];
        for i in 0..5 {
            for j in (i + 1)..5 {
                let v = m.at(i, j);
                if v != 0.0 {
                    relabeled.add_edge(perm[i], perm[j], v);
                }
            }
        }

        assert!((calculate_atr(&m) - calculate_atr(&relabeled)).abs() < 1e-9);
    }
}
