//! Minimum spanning tree over the complete stroke graph (Kruskal).
//!
//! Edge weights arrive in upper-triangular, row-major order: for `n`
//! vertices the weight of edge `(i, j)`, `i < j`, sits at
//! `upper_triangular_to_vector_index(n, i, j)`.

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;

// ─── Upper-triangular indexing ────────────────────────────────────────────────

/// Number of entries strictly above the diagonal of an `n × n` matrix.
pub fn upper_triangular_len(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Map a flat index back to `(row, column)` with `row < column`.
pub fn vector_index_to_upper_triangular(n: usize, mut index: usize) -> (usize, usize) {
    let mut row = 0;
    while row + 1 < n && index >= n - 1 - row {
        index -= n - 1 - row;
        row += 1;
    }
    (row, row + 1 + index)
}

/// Flat index of `(row, column)`; the pair is swapped if given as `row > column`.
pub fn upper_triangular_to_vector_index(n: usize, row: usize, column: usize) -> usize {
    let (row, column) = if row < column { (row, column) } else { (column, row) };
    let before: usize = (0..row).map(|i| n - 1 - i).sum();
    before + (column - row - 1)
}

// ─── SpanningTree ─────────────────────────────────────────────────────────────

/// Edges chosen by Kruskal's algorithm. A forest when the input graph is
/// disconnected.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanningTree {
    vertex_count: usize,
    edges: Vec<(usize, usize, f64)>,
}

impl SpanningTree {
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Chosen edges `(from, to, weight)` in the order they were accepted.
    pub fn edges(&self) -> &[(usize, usize, f64)] {
        &self.edges
    }

    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(|(_, _, w)| w).sum()
    }

    /// Symmetric adjacency matrix of the tree.
    #[cfg(test)]
    pub(crate) fn connections(&self) -> Vec<Vec<bool>> {
        let mut m = vec![vec![false; self.vertex_count]; self.vertex_count];
        for &(a, b, _) in &self.edges {
            m[a][b] = true;
            m[b][a] = true;
        }
        m
    }

    /// The tree as a petgraph graph whose node `i` is stroke `i`.
    pub fn to_graph(&self) -> UnGraph<usize, f64> {
        let mut g = UnGraph::with_capacity(self.vertex_count, self.edges.len());
        for i in 0..self.vertex_count {
            g.add_node(i);
        }
        for &(a, b, w) in &self.edges {
            g.add_edge(NodeIndex::new(a), NodeIndex::new(b), w);
        }
        g
    }
}

/// Kruskal over a complete graph given as upper-triangular weights.
///
/// Missing trailing weights (a slice shorter than `n(n-1)/2`) leave the
/// corresponding edges out of the graph.
pub fn kruskal(n: usize, weights: &[f64]) -> SpanningTree {
    let total = upper_triangular_len(n).min(weights.len());
    let edges: Vec<(usize, usize, f64)> = (0..total)
        .map(|k| {
            let (i, j) = vector_index_to_upper_triangular(n, k);
            (i, j, weights[k])
        })
        .collect();
    kruskal_edges(n, &edges)
}

/// Kruskal over an arbitrary edge list. Ties keep input order; edges whose
/// endpoints are already connected are skipped; stops once `n - 1` edges
/// have been accepted.
pub fn kruskal_edges(n: usize, edges: &[(usize, usize, f64)]) -> SpanningTree {
    let mut sorted: Vec<&(usize, usize, f64)> =
        edges.iter().filter(|(a, b, _)| *a < n && *b < n).collect();
    sorted.sort_by(|x, y| x.2.total_cmp(&y.2));

    let mut components: UnionFind<usize> = UnionFind::new(n);
    let mut chosen = Vec::with_capacity(n.saturating_sub(1));

    for &&(a, b, w) in &sorted {
        if chosen.len() + 1 >= n.max(1) {
            break;
        }
        if components.union(a, b) {
            chosen.push((a, b, w));
        }
    }

    SpanningTree {
        vertex_count: n,
        edges: chosen,
    }
}
