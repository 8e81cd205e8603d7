// src/region/graph.rs
use crate::region::{RegionId, RegionIndex};
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::{HashMap, HashSet};

/// Граф смежности зон: вершина — зона, ребро — общая граница
#[derive(Debug, Clone, Default)]
pub struct RegionGraph {
    pub graph: UnGraph<RegionId, ()>,
    nodes: HashMap<RegionId, NodeIndex>,
}

impl RegionGraph {
    /// Строит граф по спискам соседей зон.
    ///
    /// Списки должны быть свежими: вызовите [`RegionIndex::compute_neighbors`] перед этим.
    #[must_use]
    pub fn from_neighbors(index: &RegionIndex) -> Self {
        let mut graph = UnGraph::new_undirected();
        let mut nodes = HashMap::new();
        for region in index.iter() {
            nodes.insert(region.handle(), graph.add_node(region.handle()));
        }

        let mut edges = HashSet::new();
        for region in index.iter() {
            for &nbor in region.neighbors() {
                let Some(&b_node) = nodes.get(&nbor) else {
                    continue;
                };
                let (a, b) = if region.handle() < nbor {
                    (region.handle(), nbor)
                } else {
                    (nbor, region.handle())
                };
                if edges.insert((a, b)) {
                    graph.add_edge(nodes[&region.handle()], b_node, ());
                }
            }
        }
        Self { graph, nodes }
    }

    #[must_use]
    pub fn node(&self, handle: RegionId) -> Option<NodeIndex> {
        self.nodes.get(&handle).copied()
    }

    /// Соседи зоны в графе
    pub fn neighbors(&self, handle: RegionId) -> impl Iterator<Item = RegionId> + '_ {
        self.node(handle)
            .into_iter()
            .flat_map(|n| self.graph.neighbors(n))
            .map(|n| self.graph[n])
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
