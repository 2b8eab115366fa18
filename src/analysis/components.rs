//! Connected components via Union-Find

use ndarray::{Array2, Axis};

struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]); // path compression
        }
        self.parent[x]
    }

    fn union(&mut self, x: usize, y: usize) {
        let rx = self.find(x);
        let ry = self.find(y);
        if rx == ry {
            return;
        }
        // union by rank
        if self.rank[rx] < self.rank[ry] {
            self.parent[rx] = ry;
        } else if self.rank[rx] > self.rank[ry] {
            self.parent[ry] = rx;
        } else {
            self.parent[ry] = rx;
            self.rank[rx] += 1;
        }
    }
}

/// Connected components as sorted node lists, ordered by smallest member.
pub fn connected_components(adjacency: &Array2<u8>) -> Vec<Vec<usize>> {
    let n = adjacency.nrows();
    let mut uf = UnionFind::new(n);

    for i in 0..n {
        for j in i + 1..n {
            if adjacency[[i, j]] != 0 {
                uf.union(i, j);
            }
        }
    }

    // Root -> slot in output, assigned in order of first appearance
    let mut slot = vec![usize::MAX; n];
    let mut components: Vec<Vec<usize>> = Vec::new();
    for i in 0..n {
        let root = uf.find(i);
        if slot[root] == usize::MAX {
            slot[root] = components.len();
            components.push(Vec::new());
        }
        components[slot[root]].push(i);
    }

    components
}

/// Node indices of the largest component; ties go to the earliest one.
pub fn largest_component(adjacency: &Array2<u8>) -> Vec<usize> {
    connected_components(adjacency)
        .into_iter()
        .fold(Vec::new(), |best, c| if c.len() > best.len() { c } else { best })
}

/// Induced subgraph on the largest component
pub fn largest_component_subgraph(adjacency: &Array2<u8>) -> Array2<u8> {
    let nodes = largest_component(adjacency);
    if nodes.len() == adjacency.nrows() {
        return adjacency.clone();
    }
    adjacency.select(Axis(0), &nodes).select(Axis(1), &nodes)
}

pub fn is_connected(adjacency: &Array2<u8>) -> bool {
    connected_components(adjacency).len() == 1
}
