use atr_reliability::AdjacencyMatrix;
use rand::Rng;
use rand_pcg::Pcg64;

/// The six-vertex graph used as this crate's regression anchor: a
/// triangle (0,1,2), a triangle (3,4,5) joined by a bridge (2,3), plus one
/// extra chord (0,2) inside the first triangle so the reduction pipeline
/// exercises chain-finding, hanging-vertex pruning and the bridge split all
/// in one graph.
pub fn regression_anchor() -> AdjacencyMatrix<f64> {
    let mut m = AdjacencyMatrix::<f64>::new(6);
    m.add_edge(0, 1, 0.9);
    m.add_edge(1, 2, 0.8);
    m.add_edge(2, 0, 0.7);
    m.add_edge(2, 3, 0.5);
    m.add_edge(3, 4, 0.9);
    m.add_edge(4, 5, 0.8);
    m.add_edge(5, 3, 0.7);
    m
}

/// Builds a random sparse connected graph on `n` vertices: a random
/// spanning tree (guaranteeing connectivity) plus a handful of extra
/// chords, every edge probability drawn uniformly from `(0, 1]`.
pub fn random_connected_graph(rng: &mut Pcg64, n: usize, extra_edges: usize) -> AdjacencyMatrix<f64> {
    let mut m = AdjacencyMatrix::<f64>::new(n);
    let mut connected = vec![0usize];
    for v in 1..n {
        let attach_to = connected[rng.gen_range(0..connected.len())];
        m.add_edge(attach_to, v, rng.gen_range(0.05..=1.0));
        connected.push(v);
    }

    for _ in 0..extra_edges {
        let a = rng.gen_range(0..n);
        let b = rng.gen_range(0..n);
        if a != b && !m.is_connected(a, b) {
            m.add_edge(a, b, rng.gen_range(0.05..=1.0));
        }
    }

    m
}

/// Returns a relabeling of `matrix` under the given permutation (`perm[i]`
/// is where vertex `i` is sent).
pub fn relabel(matrix: &AdjacencyMatrix<f64>, perm: &[usize]) -> AdjacencyMatrix<f64> {
    let n = matrix.dimension();
    let mut relabeled = AdjacencyMatrix::<f64>::new(n);
    for i in 0..n {
        for j in (i + 1)..n {
            let v = matrix.at(i, j);
            if v != 0.0 {
                relabeled.add_edge(perm[i], perm[j], v);
            }
        }
    }
    relabeled
}
