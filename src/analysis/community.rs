//! Community detection: multi-level Louvain modularity optimisation
//!
//! Level pass: every node moves greedily to the neighbouring community with
//! the best modularity gain
//!
//!   ΔQ(i → c) ∝ k_{i,c} - γ · Σ_tot(c) · kᵢ / 2m
//!
//! until a full sweep moves nothing. Communities are then collapsed into
//! super-nodes (internal weight kept as self-loops) and the pass repeats on
//! the aggregated graph until no node moves.
//!
//! Node order is ascending index, so partitions are deterministic.

use std::collections::BTreeMap;

use ndarray::Array2;

use crate::error::{CmlError, CmlResult};

/// Louvain tuning
#[derive(Debug, Clone, Copy)]
pub struct LouvainConfig {
    /// Resolution γ (1.0 = standard modularity)
    pub resolution: f64,
    /// Maximum aggregation levels
    pub max_levels: usize,
    /// Maximum sweeps per level
    pub max_passes: usize,
    /// Minimum modularity gain for another sweep
    pub min_gain: f64,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            max_levels: 32,
            max_passes: 100,
            min_gain: 1e-7,
        }
    }
}

/// Node → community assignment with its modularity
#[derive(Debug, Clone)]
pub struct Partition {
    /// Community label per node, contiguous from 0 in order of first appearance
    pub membership: Vec<usize>,
    pub modularity: f64,
    /// Aggregation levels performed
    pub levels: usize,
}

impl Partition {
    pub fn community_count(&self) -> usize {
        self.membership.iter().max().map_or(0, |&c| c + 1)
    }

    /// Community sizes, largest first
    pub fn community_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.community_count()];
        for &c in &self.membership {
            sizes[c] += 1;
        }
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes
    }
}

/// Size statistics of a partition: (s1, s2, mean, std, count)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommunityStats {
    /// Largest community size s1
    pub largest: usize,
    /// Second largest community size s2 (0 if only one)
    pub second: usize,
    pub mean_size: f64,
    /// Population standard deviation of sizes
    pub std_size: f64,
    pub count: usize,
}

impl CommunityStats {
    /// All-zero sentinel for edgeless graphs and failed detection
    pub fn zero() -> Self {
        Self {
            largest: 0,
            second: 0,
            mean_size: 0.0,
            std_size: 0.0,
            count: 0,
        }
    }

    /// Statistics from sizes sorted in descending order
    pub fn from_sizes(sizes: &[usize]) -> Self {
        if sizes.is_empty() {
            return Self::zero();
        }

        let count = sizes.len();
        let mean = sizes.iter().sum::<usize>() as f64 / count as f64;
        let variance = sizes
            .iter()
            .map(|&s| (s as f64 - mean).powi(2))
            .sum::<f64>()
            / count as f64;

        Self {
            largest: sizes[0],
            second: sizes.get(1).copied().unwrap_or(0),
            mean_size: mean,
            std_size: variance.sqrt(),
            count,
        }
    }
}

/// Weighted undirected graph with explicit self-loop weights
#[derive(Debug, Clone)]
struct WeightedGraph {
    /// Neighbour lists without self-loops
    adj: Vec<Vec<(usize, f64)>>,
    self_loops: Vec<f64>,
    /// Node strength, self-loops counted twice
    strength: Vec<f64>,
    /// Total edge weight m
    total_weight: f64,
}

impl WeightedGraph {
    fn from_adjacency(adjacency: &Array2<u8>) -> CmlResult<Self> {
        let (rows, cols) = adjacency.dim();
        if rows != cols {
            return Err(CmlError::Community(format!(
                "adjacency must be square, got {}x{}",
                rows, cols
            )));
        }

        let mut adj = vec![Vec::new(); rows];
        for i in 0..rows {
            for j in 0..rows {
                if adjacency[[i, j]] != adjacency[[j, i]] {
                    return Err(CmlError::Community(format!(
                        "adjacency is not symmetric at ({}, {})",
                        i, j
                    )));
                }
                if i != j && adjacency[[i, j]] != 0 {
                    adj[i].push((j, 1.0));
                }
            }
        }

        Ok(Self::build(adj, vec![0.0; rows]))
    }

    fn build(adj: Vec<Vec<(usize, f64)>>, self_loops: Vec<f64>) -> Self {
        let strength: Vec<f64> = adj
            .iter()
            .zip(&self_loops)
            .map(|(nbrs, &loop_w)| nbrs.iter().map(|&(_, w)| w).sum::<f64>() + 2.0 * loop_w)
            .collect();
        let total_weight = strength.iter().sum::<f64>() / 2.0;

        Self {
            adj,
            self_loops,
            strength,
            total_weight,
        }
    }

    fn len(&self) -> usize {
        self.adj.len()
    }

    fn modularity(&self, community: &[usize], resolution: f64) -> f64 {
        let m = self.total_weight;
        let n_comm = community.iter().max().map_or(0, |&c| c + 1);
        let mut internal = vec![0.0; n_comm];
        let mut tot = vec![0.0; n_comm];

        for i in 0..self.len() {
            let c = community[i];
            tot[c] += self.strength[i];
            internal[c] += self.self_loops[i];
            for &(j, w) in &self.adj[i] {
                if j > i && community[j] == c {
                    internal[c] += w;
                }
            }
        }

        internal
            .iter()
            .zip(&tot)
            .map(|(&in_c, &tot_c)| in_c / m - resolution * (tot_c / (2.0 * m)).powi(2))
            .sum()
    }

    /// Greedy local moves. Returns the community per node and whether any node moved.
    fn one_level(&self, config: &LouvainConfig) -> (Vec<usize>, bool) {
        let n = self.len();
        let two_m = 2.0 * self.total_weight;
        let mut community: Vec<usize> = (0..n).collect();
        let mut tot = self.strength.clone();
        let mut moved_any = false;
        let mut current_q = self.modularity(&community, config.resolution);

        for _ in 0..config.max_passes {
            let mut moved = false;

            for i in 0..n {
                let home = community[i];
                let k_i = self.strength[i];

                let mut links: BTreeMap<usize, f64> = BTreeMap::new();
                for &(j, w) in &self.adj[i] {
                    *links.entry(community[j]).or_default() += w;
                }

                tot[home] -= k_i;

                let mut best = home;
                let mut best_gain = links.get(&home).copied().unwrap_or(0.0)
                    - config.resolution * tot[home] * k_i / two_m;
                for (&c, &w_ic) in &links {
                    if c == home {
                        continue;
                    }
                    let gain = w_ic - config.resolution * tot[c] * k_i / two_m;
                    if gain > best_gain {
                        best = c;
                        best_gain = gain;
                    }
                }

                tot[best] += k_i;
                if best != home {
                    community[i] = best;
                    moved = true;
                    moved_any = true;
                }
            }

            if !moved {
                break;
            }
            let q = self.modularity(&relabel(&community).0, config.resolution);
            if q - current_q < config.min_gain {
                break;
            }
            current_q = q;
        }

        (community, moved_any)
    }

    /// Collapse communities into super-nodes
    fn aggregate(&self, labels: &[usize], count: usize) -> Self {
        let mut self_loops = vec![0.0; count];
        let mut links: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); count];

        for i in 0..self.len() {
            let ci = labels[i];
            self_loops[ci] += self.self_loops[i];
            for &(j, w) in &self.adj[i] {
                if j <= i {
                    continue;
                }
                let cj = labels[j];
                if ci == cj {
                    self_loops[ci] += w;
                } else {
                    *links[ci].entry(cj).or_default() += w;
                    *links[cj].entry(ci).or_default() += w;
                }
            }
        }

        let adj: Vec<Vec<(usize, f64)>> = links
            .into_iter()
            .map(|m| m.into_iter().collect())
            .collect();
        Self::build(adj, self_loops)
    }
}

/// Contiguous labels in order of first appearance, plus the label count
fn relabel(community: &[usize]) -> (Vec<usize>, usize) {
    let mut map: BTreeMap<usize, usize> = BTreeMap::new();
    let labels = community
        .iter()
        .map(|&c| {
            let next = map.len();
            *map.entry(c).or_insert(next)
        })
        .collect();
    (labels, map.len())
}

/// Louvain partition of an undirected binary graph.
///
/// Fails on malformed input, on a graph without edges, or if the resulting
/// modularity is not finite.
pub fn louvain(adjacency: &Array2<u8>, config: &LouvainConfig) -> CmlResult<Partition> {
    let original = WeightedGraph::from_adjacency(adjacency)?;
    if original.total_weight == 0.0 {
        return Err(CmlError::Community("graph has no edges".to_string()));
    }

    let mut graph = original.clone();
    let mut membership: Vec<usize> = (0..original.len()).collect();
    let mut levels = 0;

    while levels < config.max_levels {
        let (community, moved) = graph.one_level(config);
        if !moved {
            break;
        }
        let (labels, count) = relabel(&community);
        for node in membership.iter_mut() {
            *node = labels[*node];
        }
        graph = graph.aggregate(&labels, count);
        levels += 1;
    }

    let (membership, _) = relabel(&membership);
    let modularity = original.modularity(&membership, config.resolution);
    if !modularity.is_finite() {
        return Err(CmlError::Community(format!(
            "non-finite modularity {}",
            modularity
        )));
    }

    Ok(Partition {
        membership,
        modularity,
        levels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    /// Two 4-cliques {0..3} and {4..7} joined by the bridge 3-4
    fn two_cliques() -> Array2<u8> {
        let mut adjacency = Array2::zeros((8, 8));
        for block in [0..4, 4..8] {
            for i in block.clone() {
                for j in block.clone() {
                    if i != j {
                        adjacency[[i, j]] = 1;
                    }
                }
            }
        }
        adjacency[[3, 4]] = 1;
        adjacency[[4, 3]] = 1;
        adjacency
    }

    #[test]
    fn test_two_cliques_split() {
        let partition = louvain(&two_cliques(), &LouvainConfig::default()).unwrap();

        assert_eq!(partition.community_count(), 2);
        assert_eq!(partition.community_sizes(), vec![4, 4]);
        assert!(partition.levels >= 1);
        let m = &partition.membership;
        assert!(m[..4].iter().all(|&c| c == m[0]));
        assert!(m[4..].iter().all(|&c| c == m[4]));
        assert_ne!(m[0], m[4]);
        // Q = 2 * (6/13 - (13/26)^2)
        assert_relative_eq!(partition.modularity, 2.0 * (6.0 / 13.0 - 0.25), epsilon = 1e-12);
    }

    #[test]
    fn test_isolated_nodes_are_singletons() {
        // Triangle plus two isolated nodes
        let adjacency = array![
            [0u8, 1, 1, 0, 0],
            [1, 0, 1, 0, 0],
            [1, 1, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
        ];

        let partition = louvain(&adjacency, &LouvainConfig::default()).unwrap();
        assert_eq!(partition.community_sizes(), vec![3, 1, 1]);
    }

    #[test]
    fn test_failures() {
        let config = LouvainConfig::default();

        let edgeless = Array2::<u8>::zeros((3, 3));
        assert!(louvain(&edgeless, &config).is_err());

        let asymmetric = array![[0u8, 1], [0, 0]];
        assert!(louvain(&asymmetric, &config).is_err());
    }

    #[test]
    fn test_stats_from_sizes() {
        let stats = CommunityStats::from_sizes(&[5, 3, 1]);

        assert_eq!(stats.largest, 5);
        assert_eq!(stats.second, 3);
        assert_eq!(stats.count, 3);
        assert_relative_eq!(stats.mean_size, 3.0);
        assert_relative_eq!(stats.std_size, (8.0f64 / 3.0).sqrt());

        let single = CommunityStats::from_sizes(&[4]);
        assert_eq!(single.second, 0);
        assert_relative_eq!(single.std_size, 0.0);

        assert_eq!(CommunityStats::from_sizes(&[]), CommunityStats::zero());
    }
}
