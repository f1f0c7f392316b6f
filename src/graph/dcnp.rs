//! Hop-limited connectivity graph for the distance-bounded CNP.
//!
//! For every present node a breadth-first tree truncated at
//! `hop_distance` levels is kept as a row of a dense reachability matrix.
//! Removing or restoring a node rebuilds exactly the trees that contain it.
//! The objective counts unordered node pairs within the hop limit.

use std::collections::VecDeque;

use rand::seq::index;
use rand::Rng;

use super::problem_data::ProblemData;
use super::types::{Node, Solution};
use crate::random::pick;

/// DCNP graph state.
#[derive(Debug, Clone)]
pub struct DcnpGraph {
    adjacency: Vec<Vec<Node>>,
    active: Vec<bool>,
    num_active: usize,
    budget: usize,
    hop_distance: usize,
    removed: Solution,
    is_removed: Vec<bool>,
    age: Vec<u64>,
    /// Row `v` marks the nodes within `hop_distance` of `v`.
    reach: Vec<bool>,
    tree_size: Vec<usize>,
    // BFS scratch
    level: Vec<usize>,
    queue: Vec<Node>,
}

impl DcnpGraph {
    /// Builds the graph with nothing removed.
    pub fn new(data: &ProblemData, budget: usize, hop_distance: usize) -> Self {
        let n = data.id_space();
        let mut active = vec![false; n];
        for v in data.nodes() {
            active[v] = true;
        }
        let adjacency = (0..n).map(|v| data.neighbors(v).collect()).collect();
        let mut graph = Self {
            adjacency,
            active,
            num_active: data.num_nodes(),
            budget,
            hop_distance,
            removed: Solution::new(),
            is_removed: vec![false; n],
            age: vec![0; n],
            reach: vec![false; n * n],
            tree_size: vec![0; n],
            level: vec![usize::MAX; n],
            queue: Vec::with_capacity(n),
        };
        graph.build_trees();
        graph
    }

    /// Number of nodes still part of the instance.
    pub fn num_nodes(&self) -> usize {
        self.num_active
    }

    /// Size of the node id space.
    pub fn id_space(&self) -> usize {
        self.adjacency.len()
    }

    /// Removal budget.
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Hop limit.
    pub fn hop_distance(&self) -> usize {
        self.hop_distance
    }

    /// Currently removed nodes.
    pub fn removed_nodes(&self) -> &Solution {
        &self.removed
    }

    /// Returns `true` if `node` is currently removed.
    pub fn is_removed(&self, node: Node) -> bool {
        self.is_removed.get(node).copied().unwrap_or(false)
    }

    /// Returns `true` if `node` belongs to the instance (removed or not).
    pub fn is_active(&self, node: Node) -> bool {
        self.active.get(node).copied().unwrap_or(false)
    }

    /// Records the step at which `node` moved.
    pub fn set_node_age(&mut self, node: Node, age: u64) {
        if let Some(slot) = self.age.get_mut(node) {
            *slot = age;
        }
    }

    /// Number of unordered pairs within `hop_distance` hops.
    pub fn objective_value(&self) -> u64 {
        let total: usize = (0..self.id_space())
            .filter(|&v| self.is_present(v))
            .map(|v| self.tree_size[v])
            .sum();
        (total / 2) as u64
    }

    fn is_present(&self, node: Node) -> bool {
        self.is_active(node) && !self.is_removed[node]
    }

    fn row(&self, v: Node) -> std::ops::Range<usize> {
        let n = self.id_space();
        v * n..(v + 1) * n
    }

    // ---- Reachability trees ----

    fn build_trees(&mut self) {
        for v in 0..self.id_space() {
            self.bfs_tree(v);
        }
    }

    fn bfs_tree(&mut self, v: Node) {
        let row = self.row(v);
        self.reach[row.clone()].fill(false);
        if !self.is_present(v) {
            self.tree_size[v] = 0;
            return;
        }

        self.queue.clear();
        self.queue.push(v);
        self.level[v] = 0;
        let mut head = 0;
        while head < self.queue.len() {
            let u = self.queue[head];
            head += 1;
            self.reach[row.start + u] = true;
            if self.level[u] >= self.hop_distance {
                continue;
            }
            for i in 0..self.adjacency[u].len() {
                let w = self.adjacency[u][i];
                if self.is_removed[w] || self.level[w] != usize::MAX {
                    continue;
                }
                self.level[w] = self.level[u] + 1;
                self.queue.push(w);
            }
        }
        for &u in &self.queue {
            self.level[u] = usize::MAX;
        }
        self.tree_size[v] = self.queue.len() - 1;
    }

    /// Removes `node` from the residual graph. No-op if already removed.
    pub fn remove_node(&mut self, node: Node) {
        if !self.is_present(node) {
            return;
        }
        self.is_removed[node] = true;
        self.removed.insert(node);
        let n = self.id_space();
        for v in 0..n {
            if self.reach[v * n + node] {
                self.bfs_tree(v);
            }
        }
    }

    /// Restores a removed `node`. No-op if not removed.
    pub fn add_node(&mut self, node: Node) {
        if !self.is_active(node) || !self.is_removed[node] {
            return;
        }
        self.is_removed[node] = false;
        self.removed.remove(&node);
        self.bfs_tree(node);
        let n = self.id_space();
        for v in 0..n {
            if v != node && self.reach[node * n + v] {
                self.bfs_tree(v);
            }
        }
    }

    /// Resets the removed set to `nodes` and rebuilds all trees.
    pub fn update_by_removed_nodes(&mut self, nodes: &Solution) {
        self.is_removed.iter_mut().for_each(|r| *r = false);
        self.removed.clear();
        for &v in nodes {
            if self.is_active(v) {
                self.is_removed[v] = true;
                self.removed.insert(v);
            }
        }
        self.build_trees();
    }

    /// Deletes `nodes` from the instance and lowers the budget by the
    /// number actually deleted. The removed set is cleared.
    pub fn reduce_by_removed_nodes(&mut self, nodes: &Solution) {
        let mut deleted = 0;
        for &v in nodes {
            if self.is_active(v) {
                self.active[v] = false;
                deleted += 1;
            }
        }
        self.num_active -= deleted;
        self.budget = self.budget.saturating_sub(deleted);

        let active = &self.active;
        for (v, neighbors) in self.adjacency.iter_mut().enumerate() {
            if active[v] {
                neighbors.retain(|&w| active[w]);
            } else {
                neighbors.clear();
            }
        }
        self.update_by_removed_nodes(&Solution::new());
    }

    /// Copy of this graph with exactly `budget` random nodes removed.
    pub fn random_feasible_graph<R: Rng>(&self, rng: &mut R) -> Self {
        let mut graph = self.clone();
        let candidates: Vec<Node> = (0..self.id_space()).filter(|&v| self.is_active(v)).collect();
        let amount = self.budget.min(candidates.len());
        let chosen: Solution = index::sample(rng, candidates.len(), amount)
            .into_iter()
            .map(|i| candidates[i])
            .collect();
        graph.update_by_removed_nodes(&chosen);
        graph
    }

    // ---- Move evaluation ----

    /// Present node whose removal lowers the objective most; ties broken
    /// uniformly. The graph is restored before returning.
    pub fn best_node_to_remove<R: Rng>(&mut self, rng: &mut R) -> Option<Node> {
        let current = self.objective_value();
        let mut best = Vec::new();
        let mut max_gain = 0u64;
        for v in 0..self.id_space() {
            if !self.is_present(v) {
                continue;
            }
            self.remove_node(v);
            let gain = current - self.objective_value();
            self.add_node(v);
            if best.is_empty() || gain > max_gain {
                max_gain = gain;
                best.clear();
                best.push(v);
            } else if gain == max_gain {
                best.push(v);
            }
        }
        pick(&best, rng)
    }

    /// Removed node whose restoration raises the objective least; ties
    /// broken uniformly. The graph is restored before returning.
    pub fn best_node_to_add<R: Rng>(&mut self, rng: &mut R) -> Option<Node> {
        let current = self.objective_value();
        let candidates: Vec<Node> = self.removed.iter().copied().collect();
        let mut best = Vec::new();
        let mut min_loss = u64::MAX;
        for v in candidates {
            self.add_node(v);
            let loss = self.objective_value() - current;
            self.remove_node(v);
            if loss < min_loss {
                min_loss = loss;
                best.clear();
                best.push(v);
            } else if loss == min_loss {
                best.push(v);
            }
        }
        pick(&best, rng)
    }

    /// Uniformly random present node.
    pub fn random_node_to_remove<R: Rng>(&self, rng: &mut R) -> Option<Node> {
        let present: Vec<Node> = (0..self.id_space()).filter(|&v| self.is_present(v)).collect();
        pick(&present, rng)
    }

    /// Brandes betweenness centrality over the residual graph (shortest
    /// paths are not hop-limited). Removed and deleted nodes score zero.
    pub fn betweenness_centrality(&self) -> Vec<f64> {
        let n = self.id_space();
        let mut centrality = vec![0.0; n];
        let mut dist = vec![usize::MAX; n];
        let mut sigma = vec![0.0f64; n];
        let mut delta = vec![0.0f64; n];
        let mut preds: Vec<Vec<Node>> = vec![Vec::new(); n];
        let mut order: Vec<Node> = Vec::with_capacity(n);
        let mut queue: VecDeque<Node> = VecDeque::with_capacity(n);

        for s in (0..n).filter(|&s| self.is_present(s)) {
            for &v in &order {
                dist[v] = usize::MAX;
                sigma[v] = 0.0;
                delta[v] = 0.0;
                preds[v].clear();
            }
            order.clear();

            dist[s] = 0;
            sigma[s] = 1.0;
            queue.push_back(s);
            while let Some(v) = queue.pop_front() {
                order.push(v);
                for &w in &self.adjacency[v] {
                    if self.is_removed[w] {
                        continue;
                    }
                    if dist[w] == usize::MAX {
                        dist[w] = dist[v] + 1;
                        queue.push_back(w);
                    }
                    if dist[w] == dist[v] + 1 {
                        sigma[w] += sigma[v];
                        preds[w].push(v);
                    }
                }
            }

            for &w in order.iter().rev() {
                for &v in &preds[w] {
                    delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
                }
                if w != s {
                    centrality[w] += delta[w];
                }
            }
        }
        centrality
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn path(n: usize) -> ProblemData {
        ProblemData::from_edges((0..n - 1).map(|i| (i, i + 1)))
    }

    #[test]
    fn test_hop_limited_objective() {
        // path of 5: pairs at distance 1 = 4, distance 2 = 3
        assert_eq!(DcnpGraph::new(&path(5), 1, 1).objective_value(), 4);
        assert_eq!(DcnpGraph::new(&path(5), 1, 2).objective_value(), 7);
        assert_eq!(DcnpGraph::new(&path(5), 1, 100).objective_value(), 10);
    }

    #[test]
    fn test_remove_and_add() {
        let mut g = DcnpGraph::new(&path(5), 1, 2);
        g.remove_node(2);
        assert_eq!(g.objective_value(), 2);
        g.add_node(2);
        assert_eq!(g.objective_value(), 7);
    }

    #[test]
    fn test_incremental_matches_rebuild() {
        let data = ProblemData::from_edges([(0, 1), (1, 2), (2, 3), (3, 0), (3, 4), (4, 5), (5, 6)]);
        let mut g = DcnpGraph::new(&data, 2, 2);
        g.remove_node(3);
        g.remove_node(5);
        g.add_node(3);
        let mut fresh = DcnpGraph::new(&data, 2, 2);
        fresh.update_by_removed_nodes(g.removed_nodes());
        assert_eq!(g.objective_value(), fresh.objective_value());
    }

    #[test]
    fn test_best_node_to_remove_on_star() {
        let data = ProblemData::from_edges((1..6).map(|i| (0, i)));
        let mut g = DcnpGraph::new(&data, 1, 2);
        let before = g.objective_value();
        let mut rng = create_rng(2);
        assert_eq!(g.best_node_to_remove(&mut rng), Some(0));
        assert_eq!(g.objective_value(), before);
    }

    #[test]
    fn test_best_node_to_add() {
        let mut g = DcnpGraph::new(&path(5), 2, 3);
        g.update_by_removed_nodes(&[0, 2].into_iter().collect());
        let mut rng = create_rng(2);
        assert_eq!(g.best_node_to_add(&mut rng), Some(0));
        assert_eq!(g.removed_nodes().len(), 2);
    }

    #[test]
    fn test_betweenness_on_path() {
        let g = DcnpGraph::new(&path(3), 1, 2);
        let bc = g.betweenness_centrality();
        // ordered pairs through the middle node: (0,2) and (2,0)
        assert!((bc[1] - 2.0).abs() < 1e-12);
        assert!(bc[0].abs() < 1e-12);
    }

    #[test]
    fn test_reduce() {
        let mut g = DcnpGraph::new(&path(5), 2, 2);
        g.reduce_by_removed_nodes(&[2].into_iter().collect());
        assert_eq!(g.budget(), 1);
        assert_eq!(g.num_nodes(), 4);
        assert_eq!(g.objective_value(), 2);
    }
}
