use std::collections::{HashMap, VecDeque};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::dedup::{dedup_edges, dedup_nodes};
use crate::graph_ast::*;

pub const NODE_WIDTH: f64 = 160.0;
pub const NODE_HEIGHT: f64 = 48.0;
pub const H_GAP: f64 = 32.0;
pub const V_GAP: f64 = 64.0;
pub const MARGIN: f64 = 40.0;

/// Box size and spacing used for placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    pub h_gap: f64,
    pub v_gap: f64,
    pub margin: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: NODE_WIDTH,
            node_height: NODE_HEIGHT,
            h_gap: H_GAP,
            v_gap: V_GAP,
            margin: MARGIN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutNode {
    pub node: GraphNode,
    pub x: f64,
    pub y: f64,
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LayoutResult {
    pub positions: Vec<LayoutNode>,
    /// Deduplicated edges whose endpoints both appear in `positions`.
    pub edges: Vec<GraphEdge>,
    pub width: f64,
    pub height: f64,
}

impl LayoutResult {
    pub fn position(&self, id: &str) -> Option<&LayoutNode> {
        self.positions.iter().find(|p| p.node.id == id)
    }

    pub fn rank_count(&self) -> usize {
        self.positions.iter().map(|p| p.rank + 1).max().unwrap_or(0)
    }
}

pub fn layout(nodes: &[GraphNode], edges: &[GraphEdge]) -> LayoutResult {
    layout_with_config(nodes, edges, &LayoutConfig::default())
}

pub fn layout_with_config(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    config: &LayoutConfig,
) -> LayoutResult {
    if nodes.is_empty() {
        return LayoutResult::default();
    }

    let nodes = dedup_nodes(nodes);
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    let (edges, dangling): (Vec<GraphEdge>, Vec<GraphEdge>) = dedup_edges(edges)
        .into_iter()
        .partition(|e| index.contains_key(e.from.as_str()) && index.contains_key(e.to.as_str()));
    for e in &dangling {
        debug!("layout: dropping dangling edge {} -> {}", e.from, e.to);
    }

    let levels = assign_levels(&nodes, &edges, &index);
    let max_rank = levels.iter().copied().max().unwrap_or(0);

    let mut ranks_nodes: Vec<Vec<&GraphNode>> = vec![Vec::new(); max_rank + 1];
    for (i, node) in nodes.iter().enumerate() {
        ranks_nodes[levels[i]].push(node);
    }

    let (positions, max_row_width) = place_ranks(&ranks_nodes, config);
    let rank_count = ranks_nodes.len() as f64;

    LayoutResult {
        positions,
        edges,
        width: max_row_width + config.margin,
        height: rank_count * (config.node_height + config.v_gap) + config.margin,
    }
}

/// Longest-path level of every node, indexed like `nodes`.
///
/// Kahn's algorithm seeded from the root only: a node is fixed once all of
/// its validated parents are, at one below the deepest of them. Nodes the
/// root cannot reach share one extra level under the deepest fixed one.
/// Nodes the root does reach but the walk could not fix (a parent among
/// those unreachable nodes, or a cycle) are leveled afterwards by
/// [`level_blocked`].
fn assign_levels(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    index: &HashMap<&str, usize>,
) -> Vec<usize> {
    let n = nodes.len();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut parents: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut in_degree = vec![0usize; n];
    for edge in edges {
        let (from, to) = (index[edge.from.as_str()], index[edge.to.as_str()]);
        children[from].push(to);
        parents[to].push(from);
        in_degree[to] += 1;
    }

    let root = pick_root(nodes, &in_degree);
    debug!("layout: rooting at {:?}", nodes[root].id);

    let mut longest = vec![0usize; n];
    let mut level: Vec<Option<usize>> = vec![None; n];
    let mut queue = VecDeque::from([root]);

    while let Some(current) = queue.pop_front() {
        if level[current].is_some() {
            continue;
        }
        level[current] = Some(longest[current]);

        for &child in &children[current] {
            if level[child].is_some() {
                continue;
            }
            longest[child] = longest[child].max(longest[current] + 1);
            in_degree[child] -= 1;
            if in_degree[child] == 0 {
                queue.push_back(child);
            }
        }
    }

    let deepest = level.iter().flatten().copied().max().unwrap_or(0);
    let reachable = reachable_from(root, &children);
    let mut unreachable = 0;
    for (i, slot) in level.iter_mut().enumerate() {
        if !reachable[i] {
            *slot = Some(deepest + 1);
            unreachable += 1;
        }
    }
    if unreachable > 0 {
        debug!(
            "layout: {unreachable} node(s) unreachable from root, placed on level {}",
            deepest + 1
        );
    }

    let blocked: Vec<usize> = (0..n).filter(|&i| level[i].is_none()).collect();
    if !blocked.is_empty() {
        debug!("layout: {} node(s) behind unreachable or cyclic parents", blocked.len());
        level_blocked(&blocked, &parents, &children, &mut level);
    }

    level.into_iter().map(|l| l.unwrap_or(0)).collect()
}

fn reachable_from(root: usize, children: &[Vec<usize>]) -> Vec<bool> {
    let mut seen = vec![false; children.len()];
    let mut stack = vec![root];
    while let Some(current) = stack.pop() {
        if seen[current] {
            continue;
        }
        seen[current] = true;
        stack.extend(children[current].iter().copied().filter(|&c| !seen[c]));
    }
    seen
}

/// Second longest-path pass over nodes left unleveled by the root walk.
/// Every already-leveled parent counts toward depth; nodes still waiting on
/// each other after the pass (cycles) go one level below everything else.
fn level_blocked(
    blocked: &[usize],
    parents: &[Vec<usize>],
    children: &[Vec<usize>],
    level: &mut [Option<usize>],
) {
    let mut pending = vec![0usize; level.len()];
    for &node in blocked {
        pending[node] = parents[node].iter().filter(|&&p| level[p].is_none()).count();
    }

    let mut queue: VecDeque<usize> = blocked
        .iter()
        .copied()
        .filter(|&b| pending[b] == 0)
        .collect();
    while let Some(current) = queue.pop_front() {
        if level[current].is_some() {
            continue;
        }
        let depth = parents[current]
            .iter()
            .filter_map(|&p| level[p])
            .map(|l| l + 1)
            .max()
            .unwrap_or(0);
        level[current] = Some(depth);

        for &child in &children[current] {
            if level[child].is_some() {
                continue;
            }
            pending[child] -= 1;
            if pending[child] == 0 {
                queue.push_back(child);
            }
        }
    }

    let bottom = level.iter().flatten().copied().max().unwrap_or(0) + 1;
    for &node in blocked {
        if level[node].is_none() {
            level[node] = Some(bottom);
        }
    }
}

/// The flagged root, else the only node without parents, else the first node.
fn pick_root(nodes: &[GraphNode], in_degree: &[usize]) -> usize {
    if let Some(i) = nodes.iter().position(|n| n.is_root) {
        return i;
    }

    let mut parentless = in_degree.iter().enumerate().filter(|&(_, d)| *d == 0);
    match (parentless.next(), parentless.next()) {
        (Some((i, _)), None) => i,
        _ => 0,
    }
}

fn row_width(count: usize, config: &LayoutConfig) -> f64 {
    if count == 0 {
        return 0.0;
    }
    count as f64 * config.node_width + (count - 1) as f64 * config.h_gap
}

fn place_ranks(ranks_nodes: &[Vec<&GraphNode>], config: &LayoutConfig) -> (Vec<LayoutNode>, f64) {
    let mut layouts = Vec::new();
    let mut max_width: f64 = 0.0;

    for (rank, rank_nodes) in ranks_nodes.iter().enumerate() {
        max_width = max_width.max(row_width(rank_nodes.len(), config));

        let y = rank as f64 * (config.node_height + config.v_gap);
        for (i, node) in rank_nodes.iter().enumerate() {
            layouts.push(LayoutNode {
                node: (*node).clone(),
                x: i as f64 * (config.node_width + config.h_gap),
                y,
                rank,
            });
        }
    }

    let rank_widths: Vec<f64> = ranks_nodes
        .iter()
        .map(|r| row_width(r.len(), config))
        .collect();
    for placed in &mut layouts {
        placed.x += (max_width - rank_widths[placed.rank]) / 2.0;
    }

    (layouts, max_width)
}
