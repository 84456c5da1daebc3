//! Immutable descriptor of a maximal degree-2 path ("resolving chain").
//!
//! Discovered by [`crate::atr`] walking outward from a degree-2 vertex in
//! both directions. Carries its reliability coefficients precomputed so the
//! engine can fold a whole chain into a single equivalent edge (or, for a
//! closed cycle, a bare multiplicative factor) in one step.

const VERTEX_NOT_FOUND: usize = usize::MAX;
/// A chain spanning this many vertices or fewer reduces to exactly one
/// interior "middle" vertex — cheap enough to splice out directly instead
/// of falling through to general edge factoring.
pub const TRIVIAL_CHAIN_VERTEX_LENGTH: usize = 3;

/// A maximal run of degree-2 vertices `v_0, v_1, ..., v_k`, plus the
/// reliability coefficients derived from its edge probabilities.
///
/// For a chain of `m` edges with probabilities `p_1..p_m`: let
/// `S = sum(1/p_i)` and `Pi = product(p_i)`. Then the chain factor is
/// `F = Pi * (S - m + 1)`, and — unless the chain closes into a cycle — the
/// single edge that replaces it has probability `P* = 1 / (S - m + 1)`.
#[derive(Debug, Clone)]
pub struct Chain {
    vertexes: Vec<usize>,
    vertexes_to_remove: Vec<usize>,
    middle_vertex: usize,
    chain_factor: f64,
    reduced_chain_value: f64,
}

impl Chain {
    /// `vertexes` is the full walk `v_0..v_k` in traversal order (head to
    /// tail); for a closed cycle `v_0 == v_k`. `sum_inverse_p`/`p_product`
    /// are the `S`/`Pi` accumulated while walking. `middle_vertex` is the
    /// degree-2 vertex the walk started from.
    ///
    /// # Panics
    /// If `vertexes` is empty.
    pub fn new(vertexes: Vec<usize>, sum_inverse_p: f64, p_product: f64, middle_vertex: usize) -> Self {
        assert!(!vertexes.is_empty(), "Chain::new - invalid chain creation");

        let is_cycle = vertexes.first() == vertexes.last();
        let num_chain_edges = (vertexes.len() - 1) as f64;
        let chain_factor = p_product * (sum_inverse_p - num_chain_edges + 1.0);
        let reduced_chain_value = if is_cycle {
            0.0
        } else {
            1.0 / (sum_inverse_p - num_chain_edges + 1.0)
        };

        let head = vertexes[0];
        let tail = *vertexes.last().unwrap();
        let vertexes_to_remove: Vec<usize> = vertexes
            .iter()
            .copied()
            .enumerate()
            .filter(|&(i, v)| {
                // Exclude one occurrence of head and one of tail; for a
                // cycle these are the same vertex appearing twice (at the
                // walk's start and end), so only the duplicate end is kept
                // out, matching the reference's "erase endpoints once" rule.
                !((i == 0 && v == head) || (i == vertexes.len() - 1 && v == tail))
            })
            .map(|(_, v)| v)
            .collect();

        Chain {
            vertexes,
            vertexes_to_remove,
            middle_vertex,
            chain_factor,
            reduced_chain_value,
        }
    }

    /// A placeholder for "no chain was found".
    pub fn empty() -> Self {
        Chain {
            vertexes: Vec::new(),
            vertexes_to_remove: Vec::new(),
            middle_vertex: VERTEX_NOT_FOUND,
            chain_factor: 0.0,
            reduced_chain_value: 0.0,
        }
    }

    /// Number of distinct vertices: a closed cycle counts its single
    /// repeated endpoint once.
    pub fn size(&self) -> usize {
        if self.is_cycle() {
            self.vertexes.len() - 1
        } else {
            self.vertexes.len()
        }
    }

    /// `true` iff `size() <= `[`TRIVIAL_CHAIN_VERTEX_LENGTH`].
    pub fn is_trivial_chain(&self) -> bool {
        self.size() <= TRIVIAL_CHAIN_VERTEX_LENGTH
    }

    /// `true` iff this descriptor carries no chain at all.
    pub fn is_empty(&self) -> bool {
        self.vertexes.is_empty()
    }

    /// `F = Pi * (S - m + 1)`.
    pub fn chain_factor(&self) -> f64 {
        self.chain_factor
    }

    /// `P* = 1 / (S - m + 1)` for a non-cycle chain, `0` for a cycle.
    pub fn reduced_chain_value(&self) -> f64 {
        self.reduced_chain_value
    }

    /// First vertex of the walk.
    pub fn head(&self) -> usize {
        self.vertexes[0]
    }

    /// Last vertex of the walk.
    pub fn tail(&self) -> usize {
        *self.vertexes.last().unwrap()
    }

    /// The degree-2 vertex the walk was discovered from.
    pub fn middle_vertex(&self) -> usize {
        self.middle_vertex
    }

    /// Interior vertices (the chain minus its two endpoints) — the set that
    /// gets spliced out of the graph when the chain is reduced.
    pub fn vertexes_to_remove(&self) -> &[usize] {
        &self.vertexes_to_remove
    }

    /// `true` iff the walk closed on itself (head == tail).
    pub fn is_cycle(&self) -> bool {
        !self.vertexes.is_empty() && self.vertexes[0] == *self.vertexes.last().unwrap()
    }
}
