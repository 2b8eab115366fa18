//! Network aggregate: adjacency, degree and state under a shrinking node count
//!
//! The three arrays are co-indexed: index i refers to the same node in all
//! of them. They are only ever compacted together, through
//! [`Network::retain`], so the correspondence survives pruning.

use ndarray::{Array1, Array2, Axis};

use crate::error::{CmlError, CmlResult};

/// Undirected simple graph with one scalar state per node.
///
/// Invariants (checked by [`Network::is_consistent`]):
/// - `adjacency` is binary, symmetric, with zero diagonal
/// - `degree[i] == sum(adjacency[i])`
/// - `state.len() == degree.len() == adjacency.nrows()`
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    adjacency: Array2<u8>,
    degree: Array1<usize>,
    state: Array1<f64>,
}

impl Network {
    /// Build from an adjacency matrix and a state vector; degrees are derived.
    pub fn new(adjacency: Array2<u8>, state: Array1<f64>) -> CmlResult<Self> {
        let (rows, cols) = adjacency.dim();
        if rows != cols {
            return Err(CmlError::InvalidNetwork(format!(
                "adjacency must be square, got {}x{}",
                rows, cols
            )));
        }
        if state.len() != rows {
            return Err(CmlError::InvalidNetwork(format!(
                "state has {} entries for {} nodes",
                state.len(),
                rows
            )));
        }

        for i in 0..rows {
            if adjacency[[i, i]] != 0 {
                return Err(CmlError::InvalidNetwork(format!("self-loop at node {}", i)));
            }
            for j in i + 1..rows {
                let (aij, aji) = (adjacency[[i, j]], adjacency[[j, i]]);
                if aij > 1 || aji > 1 {
                    return Err(CmlError::InvalidNetwork(format!(
                        "non-binary entry at ({}, {})",
                        i, j
                    )));
                }
                if aij != aji {
                    return Err(CmlError::InvalidNetwork(format!(
                        "asymmetric entry at ({}, {})",
                        i, j
                    )));
                }
            }
        }

        let degree = row_sums(&adjacency);
        Ok(Self {
            adjacency,
            degree,
            state,
        })
    }

    /// Build from an undirected edge list over `state.len()` nodes
    pub fn from_edges(edges: &[(usize, usize)], state: Array1<f64>) -> CmlResult<Self> {
        let n = state.len();
        let mut adjacency = Array2::zeros((n, n));

        for &(i, j) in edges {
            if i >= n || j >= n {
                return Err(CmlError::InvalidNetwork(format!(
                    "edge ({}, {}) out of range for {} nodes",
                    i, j, n
                )));
            }
            if i == j {
                return Err(CmlError::InvalidNetwork(format!("self-loop at node {}", i)));
            }
            adjacency[[i, j]] = 1;
            adjacency[[j, i]] = 1;
        }

        Self::new(adjacency, state)
    }

    /// Current number of nodes n
    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    pub fn adjacency(&self) -> &Array2<u8> {
        &self.adjacency
    }

    pub fn degree(&self) -> &Array1<usize> {
        &self.degree
    }

    pub fn state(&self) -> &Array1<f64> {
        &self.state
    }

    /// Replace the state vector (same length required)
    pub fn set_state(&mut self, state: Array1<f64>) -> CmlResult<()> {
        if state.len() != self.len() {
            return Err(CmlError::InvalidNetwork(format!(
                "state has {} entries for {} nodes",
                state.len(),
                self.len()
            )));
        }
        self.state = state;
        Ok(())
    }

    pub fn has_edge(&self, i: usize, j: usize) -> bool {
        self.adjacency[[i, j]] != 0
    }

    /// Neighbours of `i` in ascending index order
    pub fn neighbors(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency
            .row(i)
            .into_iter()
            .enumerate()
            .filter(|(_, edge)| **edge != 0)
            .map(|(j, _)| j)
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.degree.sum() / 2
    }

    pub fn mean_degree(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.degree.sum() as f64 / self.len() as f64
    }

    /// Add the undirected edge i–j. Returns false if it already existed.
    pub fn connect(&mut self, i: usize, j: usize) -> bool {
        if i == j || self.has_edge(i, j) {
            return false;
        }
        self.adjacency[[i, j]] = 1;
        self.adjacency[[j, i]] = 1;
        self.degree[i] += 1;
        self.degree[j] += 1;
        true
    }

    /// Remove the undirected edge i–j. Returns false if it was absent.
    pub fn disconnect(&mut self, i: usize, j: usize) -> bool {
        if !self.has_edge(i, j) {
            return false;
        }
        self.adjacency[[i, j]] = 0;
        self.adjacency[[j, i]] = 0;
        self.degree[i] -= 1;
        self.degree[j] -= 1;
        true
    }

    /// Keep only nodes whose mask entry is true, compacting indices.
    ///
    /// Rows and columns of the adjacency, the degree vector and the state
    /// vector are reindexed in one step. Degrees are recomputed because
    /// removed nodes may have had edges into the kept set.
    pub fn retain(&mut self, keep: &[bool]) -> CmlResult<usize> {
        if keep.len() != self.len() {
            return Err(CmlError::InvalidNetwork(format!(
                "keep-mask has {} entries for {} nodes",
                keep.len(),
                self.len()
            )));
        }

        Ok(self.compact(keep))
    }

    /// Remove every node of degree zero. Returns how many were removed.
    pub fn prune_isolated(&mut self) -> usize {
        let keep: Vec<bool> = self.degree.iter().map(|&k| k > 0).collect();
        self.compact(&keep)
    }

    /// Keep-mask compaction; `keep.len()` must equal `self.len()`.
    fn compact(&mut self, keep: &[bool]) -> usize {
        debug_assert_eq!(keep.len(), self.len());

        let kept: Vec<usize> = keep
            .iter()
            .enumerate()
            .filter(|(_, k)| **k)
            .map(|(i, _)| i)
            .collect();
        let removed = self.len() - kept.len();
        if removed == 0 {
            return 0;
        }

        let adjacency = self
            .adjacency
            .select(Axis(0), &kept)
            .select(Axis(1), &kept);
        self.state = self.state.select(Axis(0), &kept);
        self.degree = row_sums(&adjacency);
        self.adjacency = adjacency;

        removed
    }

    /// Check every structural invariant
    pub fn is_consistent(&self) -> bool {
        let n = self.len();
        if self.adjacency.dim() != (n, n) || self.degree.len() != n {
            return false;
        }
        for i in 0..n {
            if self.adjacency[[i, i]] != 0 {
                return false;
            }
            for j in 0..n {
                let v = self.adjacency[[i, j]];
                if v > 1 || v != self.adjacency[[j, i]] {
                    return false;
                }
            }
        }
        row_sums(&self.adjacency) == self.degree
    }
}

fn row_sums(adjacency: &Array2<u8>) -> Array1<usize> {
    adjacency
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|&v| v as usize).sum())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn ring4() -> Network {
        Network::from_edges(&[(0, 1), (1, 2), (2, 3), (3, 0)], Array1::zeros(4)).unwrap()
    }

    #[test]
    fn test_degrees_derived() {
        let net = ring4();
        assert_eq!(net.degree(), &array![2usize, 2, 2, 2]);
        assert_eq!(net.edge_count(), 4);
        assert!(net.is_consistent());
    }

    #[test]
    fn test_rejects_malformed_input() {
        let asymmetric = array![[0u8, 1], [0, 0]];
        assert!(Network::new(asymmetric, Array1::zeros(2)).is_err());

        let looped = array![[1u8, 0], [0, 0]];
        assert!(Network::new(looped, Array1::zeros(2)).is_err());

        let square = array![[0u8, 1], [1, 0]];
        assert!(Network::new(square, Array1::zeros(3)).is_err());

        assert!(Network::from_edges(&[(0, 0)], Array1::zeros(2)).is_err());
        assert!(Network::from_edges(&[(0, 5)], Array1::zeros(2)).is_err());
    }

    #[test]
    fn test_connect_disconnect_keep_degrees() {
        let mut net = ring4();

        assert!(net.connect(0, 2));
        assert!(!net.connect(0, 2));
        assert_eq!(net.degree()[0], 3);
        assert_eq!(net.degree()[2], 3);

        assert!(net.disconnect(0, 1));
        assert!(!net.disconnect(0, 1));
        assert_eq!(net.degree()[0], 2);
        assert_eq!(net.degree()[1], 1);

        assert!(!net.connect(3, 3));
        assert!(net.is_consistent());
    }

    #[test]
    fn test_neighbors_ascending() {
        let net = ring4();
        assert_eq!(net.neighbors(0).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(net.neighbors(2).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_retain_compacts_all_arrays() {
        // 0-1, 1-2, node 3 isolated
        let net_state = array![10.0, 11.0, 12.0, 13.0];
        let mut net = Network::from_edges(&[(0, 1), (1, 2)], net_state).unwrap();

        let removed = net.retain(&[false, true, true, true]).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(net.len(), 3);
        assert_eq!(net.state(), &array![11.0, 12.0, 13.0]);
        assert_eq!(net.adjacency(), &array![[0u8, 1, 0], [1, 0, 0], [0, 0, 0]]);
        assert_eq!(net.degree(), &array![1usize, 1, 0]);
        assert!(net.is_consistent());

        assert!(net.retain(&[true]).is_err());
        assert_eq!(net.len(), 3);
    }

    #[test]
    fn test_prune_isolated() {
        let mut net =
            Network::from_edges(&[(1, 3)], array![0.0, 1.0, 2.0, 3.0, 4.0]).unwrap();

        assert_eq!(net.prune_isolated(), 3);
        assert_eq!(net.state(), &array![1.0, 3.0]);
        assert_eq!(net.adjacency(), &array![[0u8, 1], [1, 0]]);
        assert_eq!(net.prune_isolated(), 0);
    }

    #[test]
    fn test_prune_everything() {
        let mut net = Network::from_edges(&[], Array1::zeros(3)).unwrap();

        assert_eq!(net.prune_isolated(), 3);
        assert!(net.is_empty());
        assert_eq!(net.adjacency().dim(), (0, 0));
        assert!(net.is_consistent());
    }
}
