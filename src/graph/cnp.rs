//! Pairwise-connectivity graph for the Critical Node Problem.
//!
//! Connected components are maintained incrementally: removing a node
//! re-floods only the component it belonged to, adding a node merges the
//! components of its neighbours. The objective is
//! `Σ s·(s−1)/2` over component sizes `s`.

use rand::seq::index;
use rand::Rng;

use super::problem_data::ProblemData;
use super::types::{Node, Solution};
use crate::random::pick;

/// Above this many components the removal target is drawn from the
/// larger-than-average ones, weighted by size.
const LARGE_COMPONENT_COUNT: usize = 50;

fn pairs(size: usize) -> u64 {
    let s = size as u64;
    s * s.saturating_sub(1) / 2
}

/// CNP graph state: removed nodes, components, node ages.
#[derive(Debug, Clone)]
pub struct CnpGraph {
    adjacency: Vec<Vec<Node>>,
    active: Vec<bool>,
    num_active: usize,
    budget: usize,
    removed: Solution,
    is_removed: Vec<bool>,
    age: Vec<u64>,
    component_of: Vec<Option<usize>>,
    components: Vec<Vec<Node>>,
    connected_pairs: u64,
}

impl CnpGraph {
    /// Builds the graph with nothing removed.
    pub fn new(data: &ProblemData, budget: usize) -> Self {
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
            removed: Solution::new(),
            is_removed: vec![false; n],
            age: vec![0; n],
            component_of: vec![None; n],
            components: Vec::new(),
            connected_pairs: 0,
        };
        graph.rebuild_components();
        graph
    }

    // ---- Accessors ----

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

    /// Residual pairwise connectivity.
    pub fn objective_value(&self) -> u64 {
        self.connected_pairs
    }

    /// Current connected components.
    pub fn components(&self) -> &[Vec<Node>] {
        &self.components
    }

    /// Step at which `node` last moved.
    pub fn node_age(&self, node: Node) -> u64 {
        self.age[node]
    }

    /// Records the step at which `node` moved.
    pub fn set_node_age(&mut self, node: Node, age: u64) {
        if let Some(slot) = self.age.get_mut(node) {
            *slot = age;
        }
    }

    fn is_present(&self, node: Node) -> bool {
        self.is_active(node) && !self.is_removed[node]
    }

    // ---- Component maintenance ----

    fn rebuild_components(&mut self) {
        self.components.clear();
        self.component_of.iter_mut().for_each(|c| *c = None);
        self.connected_pairs = 0;
        for v in 0..self.adjacency.len() {
            if self.is_present(v) && self.component_of[v].is_none() {
                self.push_component_from(v);
            }
        }
    }

    /// Floods the component containing `start` and appends it.
    fn push_component_from(&mut self, start: Node) {
        let index = self.components.len();
        let mut members = vec![start];
        self.component_of[start] = Some(index);
        let mut head = 0;
        while head < members.len() {
            let u = members[head];
            head += 1;
            for &w in &self.adjacency[u] {
                if !self.is_removed[w] && self.component_of[w].is_none() {
                    self.component_of[w] = Some(index);
                    members.push(w);
                }
            }
        }
        self.connected_pairs += pairs(members.len());
        self.components.push(members);
    }

    /// Takes component `index` out of the list, keeping indices dense.
    fn detach_component(&mut self, index: usize) -> Vec<Node> {
        let members = self.components.swap_remove(index);
        if index < self.components.len() {
            for &u in &self.components[index] {
                self.component_of[u] = Some(index);
            }
        }
        self.connected_pairs -= pairs(members.len());
        members
    }

    /// Removes `node` from the residual graph. No-op if already removed.
    pub fn remove_node(&mut self, node: Node) {
        if !self.is_present(node) {
            return;
        }
        self.is_removed[node] = true;
        self.removed.insert(node);

        let Some(index) = self.component_of[node] else {
            return;
        };
        let members = self.detach_component(index);
        for &u in &members {
            self.component_of[u] = None;
        }
        for &u in &members {
            if u != node && self.component_of[u].is_none() {
                self.push_component_from(u);
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

        let mut touched: Vec<usize> = self.adjacency[node]
            .iter()
            .filter_map(|&w| self.component_of[w])
            .collect();
        touched.sort_unstable();
        touched.dedup();

        let mut merged = vec![node];
        for &index in touched.iter().rev() {
            merged.extend(self.detach_component(index));
        }
        let index = self.components.len();
        for &u in &merged {
            self.component_of[u] = Some(index);
        }
        self.connected_pairs += pairs(merged.len());
        self.components.push(merged);
    }

    /// Resets the removed set to `nodes` (ids outside the instance are
    /// ignored) and recomputes components.
    pub fn update_by_removed_nodes(&mut self, nodes: &Solution) {
        self.is_removed.iter_mut().for_each(|r| *r = false);
        self.removed.clear();
        for &v in nodes {
            if self.is_active(v) {
                self.is_removed[v] = true;
                self.removed.insert(v);
            }
        }
        self.rebuild_components();
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

    // ---- Move selection ----

    /// Objective increase caused by restoring the removed `node`.
    pub fn connection_gain(&self, node: Node) -> u64 {
        let mut seen: Vec<usize> = self.adjacency[node]
            .iter()
            .filter_map(|&w| self.component_of[w])
            .collect();
        seen.sort_unstable();
        seen.dedup();
        let mut total = 1;
        let mut old = 0;
        for index in seen {
            let size = self.components[index].len();
            total += size;
            old += pairs(size);
        }
        pairs(total) - old
    }

    /// Removed node whose restoration increases the objective least;
    /// ties broken uniformly.
    pub fn greedy_node_to_add<R: Rng>(&self, rng: &mut R) -> Option<Node> {
        let mut best = Vec::new();
        let mut min_gain = u64::MAX;
        for &v in &self.removed {
            let gain = self.connection_gain(v);
            if gain < min_gain {
                min_gain = gain;
                best.clear();
                best.push(v);
            } else if gain == min_gain {
                best.push(v);
            }
        }
        pick(&best, rng)
    }

    /// Chooses a component to remove a node from.
    ///
    /// Components whose size reaches a randomly jittered threshold halfway
    /// between the smallest and largest non-trivial component are eligible.
    /// With more than 50 components the choice is size-weighted among the
    /// larger-than-average ones instead. Falls back to the largest
    /// component; `None` only when nothing is left.
    pub fn select_removed_component<R: Rng>(&self, rng: &mut R) -> Option<usize> {
        if self.components.is_empty() {
            return None;
        }
        if self.components.len() > LARGE_COMPONENT_COUNT {
            return self.select_larger_component(rng);
        }

        let mut min_size = self.num_active;
        let mut max_size = 0;
        for comp in self.components.iter().filter(|c| c.len() > 2) {
            min_size = min_size.min(comp.len());
            max_size = max_size.max(comp.len());
        }
        let threshold = max_size as f64
            - (max_size as f64 - min_size as f64) * 0.5
            - rng.random_range(0..3) as f64;

        let eligible: Vec<usize> = (0..self.components.len())
            .filter(|&i| self.components[i].len() as f64 >= threshold)
            .collect();
        pick(&eligible, rng).or_else(|| self.largest_component())
    }

    fn select_larger_component<R: Rng>(&self, rng: &mut R) -> Option<usize> {
        let residual = self.num_active - self.removed.len();
        let average =
            ((residual as f64 / self.components.len() as f64).round() as usize).max(2);
        let large: Vec<usize> = (0..self.components.len())
            .filter(|&i| self.components[i].len() > average)
            .collect();
        if large.is_empty() {
            return self.largest_component();
        }

        let total: usize = large.iter().map(|&i| self.components[i].len()).sum();
        let mut target = rng.random_range(0..total);
        for &i in &large {
            let size = self.components[i].len();
            if target < size {
                return Some(i);
            }
            target -= size;
        }
        large.last().copied()
    }

    fn largest_component(&self) -> Option<usize> {
        self.components
            .iter()
            .enumerate()
            .max_by_key(|(i, c)| (c.len(), std::cmp::Reverse(*i)))
            .map(|(i, _)| i)
    }

    /// Uniformly random node of a component.
    pub fn random_node_from_component<R: Rng>(&self, component: usize, rng: &mut R) -> Option<Node> {
        pick(self.components.get(component)?, rng)
    }

    /// Node of a component that has gone longest without moving.
    pub fn age_node_from_component<R: Rng>(&self, component: usize, rng: &mut R) -> Option<Node> {
        let members = self.components.get(component)?;
        let oldest = members.iter().map(|&v| self.age[v]).min()?;
        let ties: Vec<Node> = members.iter().copied().filter(|&v| self.age[v] == oldest).collect();
        pick(&ties, rng)
    }

    /// Node of a component whose removal leaves the fewest connected pairs
    /// inside it.
    ///
    /// Uses a single iterative articulation-point pass: a child subtree
    /// whose low-link does not reach above its parent is cut off when the
    /// parent is removed.
    pub fn impact_node_from_component<R: Rng>(&self, component: usize, rng: &mut R) -> Option<Node> {
        let members = self.components.get(component)?;
        let root = *members.first()?;
        let n = self.id_space();
        let size = members.len();

        let mut dfn = vec![0usize; n];
        let mut low = vec![0usize; n];
        let mut parent: Vec<Option<Node>> = vec![None; n];
        let mut subtree = vec![1usize; n];
        let mut separated = vec![0usize; n];
        let mut separated_pairs = vec![0u64; n];

        let mut time = 1;
        dfn[root] = time;
        low[root] = time;
        let mut stack: Vec<(Node, usize)> = vec![(root, 0)];

        while let Some(top) = stack.last_mut() {
            let u = top.0;
            if top.1 < self.adjacency[u].len() {
                let w = self.adjacency[u][top.1];
                top.1 += 1;
                if self.is_removed[w] {
                    continue;
                }
                if dfn[w] == 0 {
                    time += 1;
                    dfn[w] = time;
                    low[w] = time;
                    parent[w] = Some(u);
                    stack.push((w, 0));
                } else if parent[u] != Some(w) {
                    low[u] = low[u].min(dfn[w]);
                }
            } else {
                stack.pop();
                if let Some(p) = parent[u] {
                    low[p] = low[p].min(low[u]);
                    subtree[p] += subtree[u];
                    if low[u] >= dfn[p] {
                        separated[p] += subtree[u];
                        separated_pairs[p] += pairs(subtree[u]);
                    }
                }
            }
        }

        let mut best = Vec::new();
        let mut min_impact = u64::MAX;
        for &v in members {
            let rest = size - 1 - separated[v];
            let impact = separated_pairs[v] + pairs(rest);
            if impact < min_impact {
                min_impact = impact;
                best.clear();
                best.push(v);
            } else if impact == min_impact {
                best.push(v);
            }
        }
        pick(&best, rng)
    }

    /// Random node of a random component.
    pub fn random_node_to_remove<R: Rng>(&self, rng: &mut R) -> Option<Node> {
        if self.components.is_empty() {
            return None;
        }
        let component = rng.random_range(0..self.components.len());
        self.random_node_from_component(component, rng)
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

    fn set(nodes: &[Node]) -> Solution {
        nodes.iter().copied().collect()
    }

    // ---- Objective ----

    #[test]
    fn test_initial_objective() {
        let g = CnpGraph::new(&path(5), 1);
        assert_eq!(g.objective_value(), 10);
        assert_eq!(g.components().len(), 1);
    }

    #[test]
    fn test_remove_and_add_restore_objective() {
        let mut g = CnpGraph::new(&path(5), 1);
        g.remove_node(2);
        assert_eq!(g.objective_value(), 2);
        assert_eq!(g.components().len(), 2);
        assert!(g.is_removed(2));

        g.add_node(2);
        assert_eq!(g.objective_value(), 10);
        assert!(g.removed_nodes().is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut g = CnpGraph::new(&path(4), 2);
        g.remove_node(1);
        g.remove_node(1);
        assert_eq!(g.removed_nodes().len(), 1);
        assert_eq!(g.objective_value(), 1);
    }

    #[test]
    fn test_incremental_matches_rebuild() {
        let data = ProblemData::from_edges([(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 5), (5, 3), (6, 7)]);
        let mut g = CnpGraph::new(&data, 3);
        for &v in &[2, 4, 7] {
            g.remove_node(v);
        }
        g.add_node(4);
        let mut fresh = CnpGraph::new(&data, 3);
        fresh.update_by_removed_nodes(g.removed_nodes());
        assert_eq!(g.objective_value(), fresh.objective_value());
    }

    // ---- Reduction ----

    #[test]
    fn test_reduce_shrinks_budget_and_instance() {
        let mut g = CnpGraph::new(&path(5), 2);
        g.reduce_by_removed_nodes(&set(&[2]));
        assert_eq!(g.budget(), 1);
        assert_eq!(g.num_nodes(), 4);
        assert_eq!(g.objective_value(), 2);
        assert!(g.removed_nodes().is_empty());
        assert!(!g.is_active(2));
    }

    #[test]
    fn test_random_feasible_graph_uses_full_budget() {
        let g = CnpGraph::new(&path(10), 3);
        let mut rng = create_rng(11);
        let f = g.random_feasible_graph(&mut rng);
        assert_eq!(f.removed_nodes().len(), 3);
        assert!(g.removed_nodes().is_empty());
    }

    // ---- Selection ----

    #[test]
    fn test_connection_gain() {
        let mut g = CnpGraph::new(&path(5), 2);
        g.update_by_removed_nodes(&set(&[0, 2]));
        assert_eq!(g.connection_gain(0), 1);
        assert_eq!(g.connection_gain(2), 5);

        let mut rng = create_rng(3);
        assert_eq!(g.greedy_node_to_add(&mut rng), Some(0));
    }

    #[test]
    fn test_impact_picks_middle_of_path() {
        let g = CnpGraph::new(&path(5), 1);
        let mut rng = create_rng(5);
        assert_eq!(g.impact_node_from_component(0, &mut rng), Some(2));
    }

    #[test]
    fn test_impact_on_star_picks_center() {
        let data = ProblemData::from_edges((1..6).map(|i| (0, i)));
        let g = CnpGraph::new(&data, 1);
        let mut rng = create_rng(5);
        assert_eq!(g.impact_node_from_component(0, &mut rng), Some(0));
    }

    #[test]
    fn test_age_selection_prefers_oldest() {
        let mut g = CnpGraph::new(&path(3), 1);
        g.set_node_age(0, 4);
        g.set_node_age(1, 2);
        g.set_node_age(2, 9);
        let mut rng = create_rng(1);
        assert_eq!(g.age_node_from_component(0, &mut rng), Some(1));
    }

    #[test]
    fn test_select_component_prefers_large() {
        // one big component and several pairs
        let mut data = path(8);
        for i in 0..4 {
            data.add_edge(10 + 2 * i, 11 + 2 * i);
        }
        let g = CnpGraph::new(&data, 1);
        let big = g
            .components()
            .iter()
            .position(|c| c.len() == 8)
            .unwrap();
        let mut rng = create_rng(9);
        for _ in 0..20 {
            assert_eq!(g.select_removed_component(&mut rng), Some(big));
        }
    }

    #[test]
    fn test_select_component_none_when_empty() {
        let mut g = CnpGraph::new(&path(2), 2);
        g.update_by_removed_nodes(&set(&[0, 1]));
        let mut rng = create_rng(0);
        assert_eq!(g.select_removed_component(&mut rng), None);
        assert_eq!(g.random_node_to_remove(&mut rng), None);
    }
}
