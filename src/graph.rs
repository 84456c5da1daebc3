//! Orchestrates the matrix and degree index behind four reversible
//! mutations, each returning a [`RollbackHandle`] that undoes it exactly.
//!
//! Two different rollback strategies are used, chosen per mutation:
//!
//! - `remove_hanging_vertex_with_lowest_index` and `remove_random_edge` keep
//!   mutating the *same* [`DegreesVector`] in place (the renumbering and
//!   degree deltas involved are local and cheap to invert), so their handles
//!   carry only the small bit of local state needed to run the inverse
//!   steps.
//! - `pull_edge` and `remove_trivial_chain` change degrees non-locally (a
//!   contraction or splice can touch an unbounded number of neighbors), so
//!   instead of patching the index in place they swap in a freshly rebuilt
//!   one and stash the untouched pre-mutation index in the handle — an O(1)
//!   reinstall on rollback instead of an O(V) rebuild. For this to be safe,
//!   every matrix edit these two mutations perform uses the *matrix*
//!   renumber directly, never the combined matrix+index helper, so the
//!   stashed index stays byte-identical to what it was before the call.
use std::collections::{HashMap, HashSet};

use crate::chain::Chain;
use crate::degrees::DegreesVector;
use crate::matrix::{AdjacencyMatrix, Edge, EdgeNode};

/// Tagged record describing exactly how to undo one mutation. One variant
/// per mutation kind; each carries the minimal state its own rollback needs.
/// Handles are single-use and must be rolled back in LIFO order relative to
/// the mutations that produced them.
pub enum RollbackHandle {
    /// Produced by [`UndirectedRandomGraph::remove_hanging_vertex_with_lowest_index`].
    RemoveHangingVertex { original_vertex: usize, neighbor: usize },
    /// Produced by [`UndirectedRandomGraph::remove_random_edge`].
    RemoveRandomEdge { edge: Edge, probability: f64 },
    /// Produced by [`UndirectedRandomGraph::pull_edge`].
    PullEdge {
        keep: usize,
        drop: usize,
        removed_edge_value: f64,
        keep_snapshot: Vec<EdgeNode<f64>>,
        old_degrees: DegreesVector,
    },
    /// Produced by [`UndirectedRandomGraph::remove_trivial_chain`].
    RemoveTrivialChain {
        middle_vertex: usize,
        head: usize,
        tail: usize,
        prior_st_value: f64,
        old_degrees: DegreesVector,
    },
}

/// The working graph the ATR engine mutates in place. Owns both the dense
/// matrix and its degree index and keeps them in lockstep.
pub struct UndirectedRandomGraph {
    matrix: AdjacencyMatrix<f64>,
    degrees: DegreesVector,
}

impl UndirectedRandomGraph {
    /// Takes ownership of `matrix`, building a fresh degree index for it.
    pub fn new(matrix: AdjacencyMatrix<f64>) -> Self {
        let degrees = DegreesVector::from_matrix(&matrix);
        UndirectedRandomGraph { matrix, degrees }
    }

    /// Number of vertices currently visible.
    pub fn num_vertexes(&self) -> usize {
        self.matrix.dimension()
    }

    /// Number of edges currently visible.
    pub fn num_edges(&self) -> usize {
        self.degrees.get_num_edges()
    }

    /// Degree of `vertex`.
    pub fn vertex_degree(&self, vertex: usize) -> usize {
        self.degrees.get_vertex_degree(vertex)
    }

    /// Read-only access to the backing matrix, e.g. for BFS in the engine.
    pub fn matrix(&self) -> &AdjacencyMatrix<f64> {
        &self.matrix
    }

    /// Read-only access to the degree index.
    pub fn degrees(&self) -> &DegreesVector {
        &self.degrees
    }

    /// `P(i, j)`.
    pub fn at(&self, i: usize, j: usize) -> f64 {
        self.matrix.at(i, j)
    }

    /// `true` iff the minimum-degree vertex has degree 1.
    pub fn contains_hanging_vertex(&self) -> bool {
        self.degrees.contains_hanging_vertex()
    }

    /// `num_edges == num_vertexes - 1`.
    pub fn is_tree(&self) -> bool {
        self.num_vertexes() > 0 && self.num_edges() == self.num_vertexes() - 1
    }

    /// `true` iff every vertex has degree 2 (meaningful only once the graph
    /// is already known to be connected).
    pub fn is_cycle(&self) -> bool {
        self.degrees.is_cycle()
    }

    /// Product of every edge probability. Valid only when the graph is a
    /// tree (every edge is a cut edge, so the whole-graph reliability is
    /// the product of all of them surviving).
    pub fn calculate_tree_atr(&self) -> f64 {
        let mut product = 1.0;
        for i in 0..self.num_vertexes() {
            for j in 0..i {
                if self.matrix.is_connected(i, j) {
                    product *= self.matrix.at(i, j);
                }
            }
        }
        product
    }

    /// Closed form for a simple cycle: `Pi * (1 + sum((1-p_i)/p_i))`.
    pub fn calculate_cycle_atr(&self) -> f64 {
        let mut product = 1.0;
        let mut sum = 0.0;
        for i in 0..self.num_vertexes() {
            for j in 0..i {
                if self.matrix.is_connected(i, j) {
                    let p = self.matrix.at(i, j);
                    product *= p;
                    sum += (1.0 - p) / p;
                }
            }
        }
        product * (1.0 + sum)
    }

    fn renumber_matrix_and_degrees(&mut self, a: usize, b: usize) {
        self.matrix.renumber_pair_of_vertices(a, b);
        self.degrees.renumber_pair_of_vertexes(a, b);
    }

    fn last_vertex(&self) -> usize {
        self.matrix.dimension() - 1
    }

    fn find_neighbor(&self, vertex: usize) -> usize {
        self.matrix.find_neighbor_with_lowest_num_for(vertex, &[])
    }

    /// Removes the lowest-indexed degree-1 vertex and its single incident
    /// edge, returning that edge's probability (the factor the caller
    /// multiplies into its running product) and a handle to undo it.
    ///
    /// # Panics
    /// If there is no hanging vertex.
    pub fn remove_hanging_vertex_with_lowest_index(&mut self) -> (f64, RollbackHandle) {
        let hanging = self.degrees.get_hanging_vertex_with_lowest_index();
        let last = self.last_vertex();
        self.renumber_matrix_and_degrees(hanging, last);

        let hanging_now = last;
        let neighbor = self.find_neighbor(hanging_now);

        self.degrees.remove_hanging_vertex_with_lowest_index(neighbor);
        let (_, edge_value) = self.matrix.remove_hanging_vertex(hanging_now, neighbor);

        (edge_value, RollbackHandle::RemoveHangingVertex { original_vertex: hanging, neighbor })
    }

    fn rollback_remove_hanging_vertex(&mut self, original_vertex: usize, neighbor: usize) {
        self.matrix.restore_last_vertex();
        let last = self.last_vertex();
        self.renumber_matrix_and_degrees(last, original_vertex);
        self.degrees.restore_hanging_vertex_with_lowest_index(neighbor);
    }

    /// Removes the deterministic "random" edge: the highest-indexed
    /// neighbor of the minimum-degree vertex. Returns the removed edge and
    /// its probability (the factored edge Moskowitz's identity branches on)
    /// plus a rollback handle.
    pub fn remove_random_edge(&mut self) -> (Edge, f64, RollbackHandle) {
        let v = self.degrees.get_vertex_with_lowest_degree();
        let w = self.matrix.find_neighbor_with_biggest_num_for(v, &[]);
        let edge = Edge::new(v, w);

        let probability = self.matrix.remove_edge(edge);
        self.degrees.remove_edge(edge.min_vertex(), edge.max_vertex());

        (edge, probability, RollbackHandle::RemoveRandomEdge { edge, probability })
    }

    fn rollback_remove_random_edge(&mut self, edge: Edge, probability: f64) {
        self.matrix.restore_edge(edge, probability);
        self.degrees.restore_edge(edge.min_vertex(), edge.max_vertex());
    }

    /// Contracts the edge `{keep, drop}`: `drop`'s remaining edges are
    /// merged into `keep` (parallel edges compose via `p ⊕ q`), and `drop`
    /// is removed from the graph.
    ///
    /// # Panics
    /// If `keep >= drop`.
    pub fn pull_edge(&mut self, keep: usize, drop: usize) -> RollbackHandle {
        assert!(keep < drop, "pull_edge - precondition violated: keep ({keep}) must be < drop ({drop})");

        let removed_edge_value = self.matrix.at(drop, keep);
        self.matrix.remove_edge(Edge::new(keep, drop));

        let keep_snapshot = self.matrix.outgoing_edges(keep);

        let last = self.last_vertex();
        if drop != last {
            self.matrix.renumber_pair_of_vertices(drop, last);
        }

        let drop_edges = self.matrix.outgoing_edges(last);
        for edge_node in drop_edges {
            let opposite = edge_node.opposite_end(last);
            if self.matrix.is_connected(keep, opposite) {
                self.matrix.replace_multi_edge(keep, opposite, edge_node.value());
            } else {
                self.matrix.add_edge(keep, opposite, edge_node.value());
            }
        }
        self.matrix.remove_last_vertex();

        let old_degrees = std::mem::replace(&mut self.degrees, DegreesVector::from_matrix(&self.matrix));

        RollbackHandle::PullEdge { keep, drop, removed_edge_value, keep_snapshot, old_degrees }
    }

    fn rollback_pull_edge(
        &mut self,
        keep: usize,
        drop: usize,
        removed_edge_value: f64,
        keep_snapshot: Vec<EdgeNode<f64>>,
        old_degrees: DegreesVector,
    ) {
        // Must reveal the hidden last row/column and undo the forward
        // renumber before writing `keep_snapshot` back: it holds the
        // original, pre-renumber vertex labels.
        self.matrix.restore_last_vertex();
        let last = self.last_vertex();
        self.matrix.renumber_pair_of_vertices(drop, last);

        self.matrix.zero_line(keep);
        self.matrix.zero_column(keep);
        for edge_node in &keep_snapshot {
            self.matrix.add_edge(keep, edge_node.opposite_end(keep), edge_node.value());
        }
        self.matrix.add_edge(keep, drop, removed_edge_value);

        self.degrees = old_degrees;
    }

    /// Splices a trivial chain (at most three vertices) out of the graph:
    /// its interior is removed and, unless the chain is a closed cycle, the
    /// head and tail get a single equivalent edge of probability
    /// `chain.reduced_chain_value()` (composed in parallel with any
    /// existing head-tail edge).
    ///
    /// # Panics
    /// If `chain` is not trivial.
    pub fn remove_trivial_chain(&mut self, chain: &Chain) -> RollbackHandle {
        assert!(chain.is_trivial_chain(), "remove_trivial_chain - precondition violated: chain is not trivial");

        let head = chain.head();
        let tail = chain.tail();
        let prior_st_value = self.matrix.at(head, tail);
        let middle = chain.middle_vertex();

        if !chain.is_cycle() {
            if prior_st_value != 0.0 {
                self.matrix.replace_multi_edge(head, tail, chain.reduced_chain_value());
            } else {
                self.matrix.add_edge(head, tail, chain.reduced_chain_value());
            }
        }

        let last = self.last_vertex();
        self.matrix.renumber_pair_of_vertices(middle, last);
        self.matrix.remove_last_vertex();

        let old_degrees = std::mem::replace(&mut self.degrees, DegreesVector::from_matrix(&self.matrix));

        RollbackHandle::RemoveTrivialChain { middle_vertex: middle, head, tail, prior_st_value, old_degrees }
    }

    fn rollback_remove_trivial_chain(
        &mut self,
        middle_vertex: usize,
        head: usize,
        tail: usize,
        prior_st_value: f64,
        old_degrees: DegreesVector,
    ) {
        self.matrix.restore_last_vertex();
        let last = self.last_vertex();
        self.matrix.renumber_pair_of_vertices(last, middle_vertex);
        self.matrix.add_edge(head, tail, prior_st_value);

        self.degrees = old_degrees;
    }

    /// Consumes a handle, restoring the graph to exactly its pre-mutation
    /// state. Handles must be rolled back in LIFO order.
    pub fn rollback(&mut self, handle: RollbackHandle) {
        match handle {
            RollbackHandle::RemoveHangingVertex { original_vertex, neighbor } => {
                self.rollback_remove_hanging_vertex(original_vertex, neighbor);
            }
            RollbackHandle::RemoveRandomEdge { edge, probability } => {
                self.rollback_remove_random_edge(edge, probability);
            }
            RollbackHandle::PullEdge { keep, drop, removed_edge_value, keep_snapshot, old_degrees } => {
                self.rollback_pull_edge(keep, drop, removed_edge_value, keep_snapshot, old_degrees);
            }
            RollbackHandle::RemoveTrivialChain { middle_vertex, head, tail, prior_st_value, old_degrees } => {
                self.rollback_remove_trivial_chain(middle_vertex, head, tail, prior_st_value, old_degrees);
            }
        }
    }

    /// Builds a new, freshly-indexed matrix over exactly `vertices`,
    /// mapping each to a new index by iteration order.
    pub fn subgraph_adjacency_matrix(&self, vertices: &HashSet<usize>) -> AdjacencyMatrix<f64> {
        let mapping: HashMap<usize, usize> =
            vertices.iter().copied().enumerate().map(|(new_idx, old)| (old, new_idx)).collect();

        let mut sub = AdjacencyMatrix::<f64>::new(vertices.len());
        for &v in vertices {
            for &w in vertices {
                if v != w {
                    let value = self.matrix.at(v, w);
                    if value != 0.0 {
                        sub.set_at(value, mapping[&v], mapping[&w]);
                    }
                }
            }
        }
        sub
    }

    /// Vertices of the current graph not in `component`.
    pub fn inverse_component(&self, component: &HashSet<usize>) -> HashSet<usize> {
        (0..self.num_vertexes()).filter(|v| !component.contains(v)).collect()
    }

    /// Replaces both the matrix and degree index in one shot — used by the
    /// engine when descending into a bridge-split subgraph and restoring
    /// the parent afterward.
    pub fn set_matrix_and_degrees(&mut self, matrix: AdjacencyMatrix<f64>, degrees: DegreesVector) {
        self.matrix = matrix;
        self.degrees = degrees;
    }

    /// Splices `chain` out of the graph irreversibly — used by the
    /// reduction pass that runs once before the recursive factoring, which
    /// never needs to undo it. A trivial chain is removed via
    /// [`Self::remove_trivial_chain`] (its handle is simply dropped); a
    /// longer chain is removed by rebuilding the matrix over every vertex
    /// except the chain's interior. Returns `chain.chain_factor()`, the
    /// multiplicative factor the caller folds into its running product.
    ///
    /// # Panics
    /// If `chain` is empty.
    pub fn remove_chain(&mut self, chain: &Chain) -> f64 {
        assert!(!chain.is_empty(), "remove_chain - precondition violated: chain is empty");

        if chain.is_trivial_chain() {
            let _handle = self.remove_trivial_chain(chain);
            return chain.chain_factor();
        }

        let to_remove: HashSet<usize> = chain.vertexes_to_remove().iter().copied().collect();
        let remaining: Vec<usize> = (0..self.num_vertexes()).filter(|v| !to_remove.contains(v)).collect();
        let mapping: HashMap<usize, usize> =
            remaining.iter().copied().enumerate().map(|(new_idx, old)| (old, new_idx)).collect();

        let mut sub = AdjacencyMatrix::<f64>::new(remaining.len());
        for &v in &remaining {
            for &w in &remaining {
                if v != w {
                    let value = self.matrix.at(v, w);
                    if value != 0.0 {
                        sub.set_at(value, mapping[&v], mapping[&w]);
                    }
                }
            }
        }

        if !chain.is_cycle() {
            let head = chain.head();
            let tail = chain.tail();
            let mapped_head = mapping[&head];
            let mapped_tail = mapping[&tail];
            if self.matrix.at(head, tail) != 0.0 {
                sub.replace_multi_edge(mapped_head, mapped_tail, chain.reduced_chain_value());
            } else {
                sub.add_edge(mapped_head, mapped_tail, chain.reduced_chain_value());
            }
        }

        self.degrees = DegreesVector::from_matrix(&sub);
        self.matrix = sub;
        chain.chain_factor()
    }
}
