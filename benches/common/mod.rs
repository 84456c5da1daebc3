use atr_reliability::AdjacencyMatrix;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

/// A random sparse connected graph on `n` vertices: a random spanning tree
/// plus `extra_edges` extra chords, seeded so benchmark runs are
/// reproducible across invocations.
pub fn random_connected_graph(seed: u64, n: usize, extra_edges: usize) -> AdjacencyMatrix<f64> {
    let mut rng = Pcg64::seed_from_u64(seed);
    let mut m = AdjacencyMatrix::<f64>::new(n);
    let mut connected = vec![0usize];
    for v in 1..n {
        let attach_to = connected[rng.gen_range(0..connected.len())];
        m.add_edge(attach_to, v, rng.gen_range(0.5..=1.0));
        connected.push(v);
    }

    for _ in 0..extra_edges {
        let a = rng.gen_range(0..n);
        let b = rng.gen_range(0..n);
        if a != b && !m.is_connected(a, b) {
            m.add_edge(a, b, rng.gen_range(0.5..=1.0));
        }
    }

    m
}
