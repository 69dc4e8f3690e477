use crate::data::{DemandId, SlotId};
use crate::graph::{CandidateGraph, CandidateNode};
use log::debug;
use petgraph::algo::maximum_matching;

/// Structural slot -> demand pairing produced by the matcher.
///
/// Each slot and each demand appears in at most one pair. Section and
/// course constraints are not considered here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionalMatching {
    pairs: Vec<(SlotId, DemandId)>,
}

impl ProvisionalMatching {
    /// Wraps pairs that are already known to be a matching, sorted by slot.
    pub fn from_pairs(mut pairs: Vec<(SlotId, DemandId)>) -> Self {
        pairs.sort_by_key(|&(slot, _)| slot);
        Self { pairs }
    }

    /// Pairs in slot inventory order.
    pub fn pairs(&self) -> &[(SlotId, DemandId)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Maximum-cardinality matching over the candidate graph.
///
/// Ties between maximum matchings are left to the underlying algorithm,
/// which is deterministic for a given graph.
pub fn maximum_slot_matching(candidates: &CandidateGraph) -> ProvisionalMatching {
    let matching = maximum_matching(candidates.graph());

    let pairs: Vec<(SlotId, DemandId)> = candidates
        .slot_nodes()
        .iter()
        .enumerate()
        .filter_map(|(slot, &node)| {
            matching
                .mate(node)
                .and_then(|mate| match candidates.node(mate) {
                    CandidateNode::Demand(demand) => Some((slot, demand)),
                    CandidateNode::Slot(_) => None,
                })
        })
        .collect();

    debug!(
        "Maximum matching pairs {} of {} slots",
        pairs.len(),
        candidates.slot_nodes().len()
    );

    ProvisionalMatching { pairs }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Demand;
    use crate::demand::DemandSet;
    use crate::inventory::SlotInventory;
    use std::collections::HashSet;

    fn setup(rooms: usize, timeslots: usize, demands: usize) -> CandidateGraph {
        let rooms: Vec<String> = (0..rooms).map(|r| format!("R{}", r)).collect();
        let timeslots: Vec<String> = (0..timeslots).map(|t| format!("{}-{}", t + 8, t + 9)).collect();
        let inventory = SlotInventory::new(&rooms, &timeslots).unwrap();
        let demands = DemandSet::from_demands(
            (0..demands).map(|d| Demand::new(format!("S{}", d % 3), format!("C{}", d))),
        )
        .unwrap();
        CandidateGraph::build(&inventory, &demands)
    }

    fn assert_structural(matching: &ProvisionalMatching) {
        let slots: HashSet<SlotId> = matching.pairs().iter().map(|&(s, _)| s).collect();
        let demands: HashSet<DemandId> = matching.pairs().iter().map(|&(_, d)| d).collect();
        assert_eq!(slots.len(), matching.len());
        assert_eq!(demands.len(), matching.len());
    }

    #[test]
    fn test_more_demands_than_slots_fills_every_slot() {
        let matching = maximum_slot_matching(&setup(2, 3, 10));
        assert_eq!(matching.len(), 6);
        assert_structural(&matching);
    }

    #[test]
    fn test_more_slots_than_demands_places_every_demand() {
        let matching = maximum_slot_matching(&setup(3, 4, 5));
        assert_eq!(matching.len(), 5);
        assert_structural(&matching);
    }

    #[test]
    fn test_pairs_follow_slot_order() {
        let matching = maximum_slot_matching(&setup(2, 2, 4));
        let slots: Vec<SlotId> = matching.pairs().iter().map(|&(s, _)| s).collect();
        assert_eq!(slots, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_matching_is_deterministic() {
        let first = maximum_slot_matching(&setup(3, 3, 7));
        let second = maximum_slot_matching(&setup(3, 3, 7));
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_demand_set_yields_empty_matching() {
        let matching = maximum_slot_matching(&setup(2, 2, 0));
        assert!(matching.is_empty());
    }

    #[test]
    fn test_from_pairs_sorts_by_slot() {
        let matching = ProvisionalMatching::from_pairs(vec![(2, 0), (0, 1)]);
        assert_eq!(matching.pairs(), &[(0, 1), (2, 0)]);
    }
}
