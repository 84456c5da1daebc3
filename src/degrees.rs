//! Degree-sorted index over the current vertex set.
//!
//! Maintains, for every active vertex, its degree — kept sorted ascending by
//! `(degree, vertex_id)` via local sift chains after each ±1 degree change,
//! so "what's the minimum degree vertex" and "is every vertex degree 2"
//! are O(1) queries instead of O(V) scans.
use crate::matrix::AdjacencyMatrix;
use num_traits::Zero;

const VERTEX_NOT_FOUND: usize = usize::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DegreeNode {
    vertex: usize,
    degree: usize,
}

impl DegreeNode {
    fn is_less(&self, other: &Self) -> bool {
        (self.degree, self.vertex) < (other.degree, other.vertex)
    }

    fn is_more(&self, other: &Self) -> bool {
        (self.degree, self.vertex) > (other.degree, other.vertex)
    }
}

/// Sorted degree index, tied to one specific [`AdjacencyMatrix`] state.
///
/// `nodes` is sorted ascending by `(degree, vertex)`; `position[v]` maps a
/// vertex id to its slot in `nodes`. `[begin, end]` is the active window —
/// hanging-vertex removal advances `begin` instead of physically shrinking
/// the vector, so the discarded tail stays around for a cheap rollback.
#[derive(Debug, Clone)]
pub struct DegreesVector {
    nodes: Vec<DegreeNode>,
    position: Vec<usize>,
    begin: usize,
    end: usize,
}

impl DegreesVector {
    /// Builds a fresh index from the current state of `matrix`. Rebuilding
    /// is O(V^2) (it recomputes every degree from scratch) — used whenever a
    /// mutation changes degrees non-locally (`pull_edge`, trivial chain
    /// removal, subgraph extraction).
    pub fn from_matrix<T: Copy + Default + PartialEq + Zero>(matrix: &AdjacencyMatrix<T>) -> Self {
        let dimension = matrix.dimension();
        let mut nodes: Vec<DegreeNode> = (0..dimension)
            .map(|vertex| {
                let degree = (0..dimension)
                    .filter(|&col| matrix.is_connected(vertex, col))
                    .count();
                DegreeNode { vertex, degree }
            })
            .collect();

        nodes.sort_by_key(|n| (n.degree, n.vertex));

        let mut position = vec![0usize; dimension];
        for (idx, node) in nodes.iter().enumerate() {
            position[node.vertex] = idx;
        }

        DegreesVector {
            nodes,
            position,
            begin: 0,
            end: dimension.saturating_sub(1),
        }
    }

    fn window_len(&self) -> usize {
        if self.nodes.is_empty() {
            0
        } else {
            self.end + 1 - self.begin
        }
    }

    /// First vertex of degree 2, scanning from `begin` upward; stops (and
    /// returns "not found") as soon as a degree exceeds 2, relying on the
    /// ascending sort.
    pub fn find_first_vertex_that_degree_equal_two(&self) -> usize {
        if self.window_len() == 0 {
            return VERTEX_NOT_FOUND;
        }
        for idx in self.begin..=self.end {
            match self.nodes[idx].degree.cmp(&2) {
                std::cmp::Ordering::Equal => return self.nodes[idx].vertex,
                std::cmp::Ordering::Greater => return VERTEX_NOT_FOUND,
                std::cmp::Ordering::Less => {}
            }
        }
        VERTEX_NOT_FOUND
    }

    /// `true` iff the minimum-degree vertex has degree 1.
    pub fn contains_hanging_vertex(&self) -> bool {
        self.window_len() > 0 && self.nodes[self.begin].degree == 1
    }

    /// The degree-1 vertex at `begin`.
    ///
    /// # Panics
    /// If there is no hanging vertex.
    pub fn get_hanging_vertex_with_lowest_index(&self) -> usize {
        assert!(self.contains_hanging_vertex(), "DegreesVector::get_hanging_vertex_with_lowest_index - none present");
        self.nodes[self.begin].vertex
    }

    /// Advances `begin` past the hanging vertex and decrements `neighbor`'s
    /// degree, sifting it to keep the sort order.
    pub fn remove_hanging_vertex_with_lowest_index(&mut self, neighbor: usize) {
        self.begin += 1;
        let idx = self.position[neighbor];
        self.nodes[idx].degree -= 1;
        self.sift_left(idx);
    }

    /// Inverse of [`Self::remove_hanging_vertex_with_lowest_index`].
    pub fn restore_hanging_vertex_with_lowest_index(&mut self, neighbor: usize) {
        assert!(self.begin > 0, "DegreesVector::restore_hanging_vertex_with_lowest_index - begin already 0");
        self.begin -= 1;
        let idx = self.position[neighbor];
        self.nodes[idx].degree += 1;
        self.sift_right(idx);
    }

    /// Degree of `vertex` under the current matrix state.
    pub fn get_vertex_degree(&self, vertex: usize) -> usize {
        self.nodes[self.position[vertex]].degree
    }

    /// Vertex id at `begin`.
    pub fn get_vertex_with_lowest_degree(&self) -> usize {
        self.nodes[self.begin].vertex
    }

    /// Sum of active degrees, halved.
    pub fn get_num_edges(&self) -> usize {
        if self.window_len() == 0 {
            return 0;
        }
        let sum: usize = self.nodes[self.begin..=self.end].iter().map(|n| n.degree).sum();
        sum / 2
    }

    /// `true` iff both window extremes have degree 2 — on a connected
    /// graph, by the ascending sort, this means *every* vertex has degree 2.
    pub fn is_cycle(&self) -> bool {
        self.window_len() > 0 && self.nodes[self.begin].degree == 2 && self.nodes[self.end].degree == 2
    }

    /// Decrements both endpoints' degrees, sifting each left.
    pub fn remove_edge(&mut self, from: usize, to: usize) {
        let idx_from = self.position[from];
        self.nodes[idx_from].degree -= 1;
        self.sift_left(idx_from);

        let idx_to = self.position[to];
        self.nodes[idx_to].degree -= 1;
        self.sift_left(idx_to);
    }

    /// Increments both endpoints' degrees, sifting each right.
    pub fn restore_edge(&mut self, from: usize, to: usize) {
        let idx_from = self.position[from];
        self.nodes[idx_from].degree += 1;
        self.sift_right(idx_from);

        let idx_to = self.position[to];
        self.nodes[idx_to].degree += 1;
        self.sift_right(idx_to);
    }

    /// Swaps the vertex labels stored at the two positions (degrees
    /// unaffected, so the sort order does not change).
    pub fn renumber_pair_of_vertexes(&mut self, v1: usize, v2: usize) {
        if v1 == v2 {
            return;
        }
        let idx1 = self.position[v1];
        let idx2 = self.position[v2];
        self.nodes[idx1].vertex = v2;
        self.nodes[idx2].vertex = v1;
        self.position.swap(v1, v2);
    }

    /// Deep equality (window bounds, position map, and every node).
    pub fn is_equal(&self, other: &Self) -> bool {
        self.begin == other.begin && self.end == other.end && self.position == other.position && self.nodes == other.nodes
    }

    fn sift_left(&mut self, node_index: usize) {
        let mut cur = node_index;
        while cur > self.begin && self.nodes[cur].is_less(&self.nodes[cur - 1]) {
            self.swap_nodes(cur, cur - 1);
            cur -= 1;
        }
    }

    fn sift_right(&mut self, node_index: usize) {
        let mut cur = node_index;
        while cur < self.end && self.nodes[cur].is_more(&self.nodes[cur + 1]) {
            self.swap_nodes(cur, cur + 1);
            cur += 1;
        }
    }

    fn swap_nodes(&mut self, i: usize, j: usize) {
        self.position.swap(self.nodes[i].vertex, self.nodes[j].vertex);
        self.nodes.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_matrix(n: usize) -> AdjacencyMatrix<f64> {
        let mut m = AdjacencyMatrix::<f64>::new(n);
        for i in 0..n - 1 {
            m.add_edge(i, i + 1, 0.5);
        }
        m
    }

    #[test]
    fn path_endpoints_are_hanging() {
        let m = path_matrix(5);
        let dv = DegreesVector::from_matrix(&m);
        assert!(dv.contains_hanging_vertex());
        assert_eq!(dv.get_hanging_vertex_with_lowest_index(), 0);
    }

    #[test]
    fn interior_path_vertices_have_degree_two() {
        let m = path_matrix(5);
        let dv = DegreesVector::from_matrix(&m);
        assert_eq!(dv.find_first_vertex_that_degree_equal_two(), 1);
    }

    #[test]
    fn cycle_is_detected() {
        let mut m = AdjacencyMatrix::<f64>::new(4);
        m.add_edge(0, 1, 0.5);
        m.add_edge(1, 2, 0.5);
        m.add_edge(2, 3, 0.5);
        m.add_edge(3, 0, 0.5);
        let dv = DegreesVector::from_matrix(&m);
        assert!(dv.is_cycle());
        assert_eq!(dv.get_num_edges(), 4);
    }

    #[test]
    fn remove_hanging_vertex_advances_begin_and_sifts_neighbor() {
        let m = path_matrix(5);
        let mut dv = DegreesVector::from_matrix(&m);
        dv.remove_hanging_vertex_with_lowest_index(1);
        assert_eq!(dv.get_vertex_degree(1), 1);
        assert!(dv.contains_hanging_vertex());
    }

    #[test]
    fn remove_then_restore_hanging_vertex_round_trips() {
        let m = path_matrix(5);
        let original = DegreesVector::from_matrix(&m);
        let mut dv = original.clone();
        dv.remove_hanging_vertex_with_lowest_index(1);
        dv.restore_hanging_vertex_with_lowest_index(1);
        assert!(dv.is_equal(&original));
    }

    #[test]
    fn remove_then_restore_edge_round_trips() {
        let mut m = AdjacencyMatrix::<f64>::new(4);
        m.add_edge(0, 1, 0.5);
        m.add_edge(1, 2, 0.5);
        m.add_edge(2, 3, 0.5);
        m.add_edge(0, 3, 0.5);
        let original = DegreesVector::from_matrix(&m);
        let mut dv = original.clone();
        dv.remove_edge(0, 1);
        dv.restore_edge(0, 1);
        assert!(dv.is_equal(&original));
    }

    #[test]
    fn renumber_pair_preserves_sort_order() {
        let m = path_matrix(5);
        let mut dv = DegreesVector::from_matrix(&m);
        dv.renumber_pair_of_vertexes(0, 4);
        assert_eq!(dv.get_vertex_degree(4), 1);
        assert_eq!(dv.get_vertex_degree(0), 1);
        assert!(dv.contains_hanging_vertex());
    }

    #[test]
    fn renumber_pair_noop_for_equal_indices() {
        let m = path_matrix(3);
        let original = DegreesVector::from_matrix(&m);
        let mut dv = original.clone();
        dv.renumber_pair_of_vertexes(1, 1);
        assert!(dv.is_equal(&original));
    }
}
