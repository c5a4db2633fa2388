//! Unique-path enumeration: every distinct connected vertex set up to a
//! length bound, grown breadth-first from singletons.
//!
//! Used twice by the partitioner: over the stroke MST to list candidate
//! symbols, and over the path-combinability graph to list partitions.

use std::collections::{BTreeSet, HashSet};

use petgraph::graph::{NodeIndex, UnGraph};

// ─── PathKey ──────────────────────────────────────────────────────────────────

/// Canonical membership key: a growable bitmask with bit `v` set for every
/// vertex `v` of the path. Paths with the same members share a key
/// whatever their order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PathKey(Vec<u64>);

impl PathKey {
    pub fn from_path(path: &[usize]) -> Self {
        let mut key = PathKey::default();
        for &v in path {
            key.insert(v);
        }
        key
    }

    pub fn insert(&mut self, v: usize) {
        let word = v / 64;
        if self.0.len() <= word {
            self.0.resize(word + 1, 0);
        }
        self.0[word] |= 1u64 << (v % 64);
    }

    pub fn contains(&self, v: usize) -> bool {
        self.0
            .get(v / 64)
            .is_some_and(|w| w & (1u64 << (v % 64)) != 0)
    }
}

// ─── Checks ───────────────────────────────────────────────────────────────────

/// Predicate an extended path must satisfy to be kept.
pub trait PathCheck {
    fn check(&self, path: &[usize]) -> bool;
}

impl<F> PathCheck for F
where
    F: Fn(&[usize]) -> bool,
{
    fn check(&self, path: &[usize]) -> bool {
        self(path)
    }
}

// ─── Enumeration ──────────────────────────────────────────────────────────────

/// Vertices adjacent to any member of `path` that are not members themselves,
/// in ascending order.
pub fn context<N, E>(graph: &UnGraph<N, E>, path: &[usize]) -> Vec<usize> {
    let members: HashSet<usize> = path.iter().copied().collect();
    let mut ctx = BTreeSet::new();
    for &v in path {
        if v >= graph.node_count() {
            continue;
        }
        for n in graph.neighbors(NodeIndex::new(v)) {
            let n = n.index();
            if !members.contains(&n) {
                ctx.insert(n);
            }
        }
    }
    ctx.into_iter().collect()
}

/// Every distinct connected vertex set of `graph` with at most `max_len`
/// members, singletons included.
///
/// Each round extends the paths found in the previous round by one context
/// vertex; an extension is kept only if all `checks` accept it and its
/// member set is new. Enumeration stops when a round adds nothing or the
/// length bound is reached. Paths come out in discovery order, members in
/// the order they were added.
pub fn find_unique_paths<N, E>(
    graph: &UnGraph<N, E>,
    max_len: usize,
    checks: &[&dyn PathCheck],
) -> Vec<Vec<usize>> {
    let n = graph.node_count();
    let mut paths: Vec<Vec<usize>> = (0..n).map(|v| vec![v]).collect();
    let mut seen: HashSet<PathKey> = paths.iter().map(|p| PathKey::from_path(p)).collect();

    let mut frontier: Vec<usize> = (0..n).collect();
    let mut current_len = 1;

    while current_len < max_len && !frontier.is_empty() {
        let mut added = Vec::new();
        for &pi in &frontier {
            let base = paths[pi].clone();
            for v in context(graph, &base) {
                let mut extended = base.clone();
                extended.push(v);
                if !checks.iter().all(|c| c.check(&extended)) {
                    continue;
                }
                if seen.insert(PathKey::from_path(&extended)) {
                    paths.push(extended);
                    added.push(paths.len() - 1);
                }
            }
        }
        current_len += 1;
        frontier = added;
    }

    paths
}

/// Undirected graph over `0..n` with an edge wherever `connected(i, j)` holds.
pub fn graph_from_predicate<F>(n: usize, connected: F) -> UnGraph<(), ()>
where
    F: Fn(usize, usize) -> bool,
{
    let mut g = UnGraph::with_capacity(n, 0);
    for _ in 0..n {
        g.add_node(());
    }
    for i in 0..n {
        for j in i + 1..n {
            if connected(i, j) {
                g.add_edge(NodeIndex::new(i), NodeIndex::new(j), ());
            }
        }
    }
    g
}
