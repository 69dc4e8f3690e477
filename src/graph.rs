use crate::data::{DemandId, SlotId};
use crate::demand::DemandSet;
use crate::inventory::SlotInventory;
use itertools::iproduct;
use log::trace;
use petgraph::graph::{NodeIndex, UnGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateNode {
    Slot(SlotId),
    Demand(DemandId),
}

/// Bipartite compatibility graph between slots and demands.
///
/// Every slot is connected to every demand; scheduling constraints are
/// enforced later by the repair pass.
#[derive(Debug, Clone)]
pub struct CandidateGraph {
    graph: UnGraph<CandidateNode, ()>,
    slot_nodes: Vec<NodeIndex>,
    demand_nodes: Vec<NodeIndex>,
}

impl CandidateGraph {
    pub fn build(inventory: &SlotInventory, demands: &DemandSet) -> Self {
        let mut graph = UnGraph::<CandidateNode, ()>::with_capacity(
            inventory.len() + demands.len(),
            inventory.len() * demands.len(),
        );

        let slot_nodes: Vec<NodeIndex> = (0..inventory.len())
            .map(|slot| graph.add_node(CandidateNode::Slot(slot)))
            .collect();
        let demand_nodes: Vec<NodeIndex> = (0..demands.len())
            .map(|demand| graph.add_node(CandidateNode::Demand(demand)))
            .collect();

        for (&slot, &demand) in iproduct!(slot_nodes.iter(), demand_nodes.iter()) {
            graph.add_edge(slot, demand, ());
        }

        trace!(
            "Candidate graph: {} slot nodes, {} demand nodes, {} edges",
            slot_nodes.len(),
            demand_nodes.len(),
            graph.edge_count()
        );

        Self {
            graph,
            slot_nodes,
            demand_nodes,
        }
    }

    pub fn graph(&self) -> &UnGraph<CandidateNode, ()> {
        &self.graph
    }

    pub fn slot_node(&self, slot: SlotId) -> NodeIndex {
        self.slot_nodes[slot]
    }

    pub fn slot_nodes(&self) -> &[NodeIndex] {
        &self.slot_nodes
    }

    pub fn demand_node(&self, demand: DemandId) -> NodeIndex {
        self.demand_nodes[demand]
    }

    pub fn node(&self, node: NodeIndex) -> CandidateNode {
        self.graph[node]
    }
}
