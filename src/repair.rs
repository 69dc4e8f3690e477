use crate::data::{DemandId, SlotId};
use crate::demand::DemandSet;
use crate::inventory::SlotInventory;
use crate::matcher::ProvisionalMatching;
use log::{debug, trace, warn};
use std::collections::{HashSet, VecDeque};

/// Running bookkeeping of one day's placements, by interned index.
///
/// Owned by a single weekday run and threaded explicitly through the
/// repair and backfill stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairState {
    timeslot_sections: Vec<HashSet<usize>>,
    assigned_courses: Vec<HashSet<usize>>,
}

impl RepairState {
    pub fn new(timeslots: usize, sections: usize) -> Self {
        Self {
            timeslot_sections: vec![HashSet::new(); timeslots],
            assigned_courses: vec![HashSet::new(); sections],
        }
    }

    pub fn for_day(inventory: &SlotInventory, demands: &DemandSet) -> Self {
        Self::new(inventory.timeslots().len(), demands.section_count())
    }

    /// Whether `section` may take `course` at `timeslot` without breaking an invariant.
    pub fn admits(&self, timeslot: usize, section: usize, course: usize) -> bool {
        !self.timeslot_sections[timeslot].contains(&section)
            && !self.assigned_courses[section].contains(&course)
    }

    pub fn section_at(&self, timeslot: usize, section: usize) -> bool {
        self.timeslot_sections[timeslot].contains(&section)
    }

    pub fn course_assigned(&self, section: usize, course: usize) -> bool {
        self.assigned_courses[section].contains(&course)
    }

    fn record(&mut self, timeslot: usize, section: usize, course: usize) {
        self.timeslot_sections[timeslot].insert(section);
        self.assigned_courses[section].insert(course);
    }

    fn move_section(&mut self, section: usize, from: usize, to: usize) {
        self.timeslot_sections[from].remove(&section);
        self.timeslot_sections[to].insert(section);
    }
}

/// Slot-indexed placements after the repair pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairOutcome {
    pub placements: Vec<Option<DemandId>>,
    /// Slots whose matched demand was replaced by a substitute.
    pub substituted: Vec<SlotId>,
    /// Matched slots for which no substitute existed.
    pub dropped: Vec<SlotId>,
}

/// Turns the provisional matching into placements that respect the
/// section-per-timeslot and course-per-section rules.
///
/// Pairs are visited in matching order. A conflicting pair is replaced by
/// the first demand, in demand set order, the slot's timeslot still admits;
/// if there is none the slot stays empty.
pub fn repair(
    matching: &ProvisionalMatching,
    inventory: &SlotInventory,
    demands: &DemandSet,
    state: &mut RepairState,
) -> RepairOutcome {
    let mut outcome = RepairOutcome {
        placements: vec![None; inventory.len()],
        substituted: Vec::new(),
        dropped: Vec::new(),
    };

    for &(slot, demand) in matching.pairs() {
        let timeslot = inventory.timeslot_of(slot);
        let (section, course) = demands.key(demand);

        if state.admits(timeslot, section, course) {
            state.record(timeslot, section, course);
            outcome.placements[slot] = Some(demand);
            continue;
        }

        let substitute = (0..demands.len()).find(|&candidate| {
            let (section, course) = demands.key(candidate);
            state.admits(timeslot, section, course)
        });

        match substitute {
            Some(candidate) => {
                let (section, course) = demands.key(candidate);
                state.record(timeslot, section, course);
                outcome.placements[slot] = Some(candidate);
                outcome.substituted.push(slot);
                trace!(
                    "Slot {} conflicts with {}, substituted {}",
                    inventory.slots()[slot],
                    demands.get(demand),
                    demands.get(candidate)
                );
            }
            None => {
                outcome.dropped.push(slot);
                warn!(
                    "Slot {} dropped: no demand fits after {} conflicted",
                    inventory.slots()[slot],
                    demands.get(demand)
                );
            }
        }
    }

    debug!(
        "Repair kept {} pairs, substituted {}, dropped {}",
        matching.len() - outcome.substituted.len() - outcome.dropped.len(),
        outcome.substituted.len(),
        outcome.dropped.len()
    );
    outcome
}

/// Fills empty slots along augmenting paths until no further demand fits.
///
/// A path starts at a timeslot with an empty room, enters a section not yet
/// sitting in that timeslot, and either ends at a section with an
/// unscheduled demand or continues through another timeslot that section
/// occupies, whose placement is then moved into the previous timeslot.
/// Returns the number of slots filled.
pub fn backfill(
    placements: &mut [Option<DemandId>],
    inventory: &SlotInventory,
    demands: &DemandSet,
    state: &mut RepairState,
) -> usize {
    let mut filled = 0;
    while let Some(path) = augmenting_path(placements, inventory, demands, state) {
        if !apply_path(&path, placements, inventory, demands, state) {
            warn!("Backfill stopped on an augmenting path it could not apply");
            break;
        }
        filled += 1;
    }
    if filled > 0 {
        debug!("Backfill filled {} more slots", filled);
    }
    filled
}

fn free_slot(
    placements: &[Option<DemandId>],
    inventory: &SlotInventory,
    timeslot: usize,
) -> Option<SlotId> {
    (0..inventory.rooms().len())
        .map(|room| inventory.slot_id(room, timeslot))
        .find(|&slot| placements[slot].is_none())
}

fn pending_demand(demands: &DemandSet, state: &RepairState, section: usize) -> Option<DemandId> {
    demands
        .demands_of_section(section)
        .iter()
        .copied()
        .find(|&demand| !state.course_assigned(section, demands.key(demand).1))
}

/// Steps `(section, timeslot)`: the section enters the timeslot.
fn augmenting_path(
    placements: &[Option<DemandId>],
    inventory: &SlotInventory,
    demands: &DemandSet,
    state: &RepairState,
) -> Option<Vec<(usize, usize)>> {
    let timeslots = inventory.timeslots().len();
    let sections = demands.section_count();

    let mut entered_from: Vec<Option<usize>> = vec![None; sections];
    let mut left_by: Vec<Option<usize>> = vec![None; timeslots];
    let mut visited = vec![false; timeslots];
    let mut queue = VecDeque::new();

    for timeslot in 0..timeslots {
        if free_slot(placements, inventory, timeslot).is_some() {
            visited[timeslot] = true;
            queue.push_back(timeslot);
        }
    }

    while let Some(timeslot) = queue.pop_front() {
        for section in 0..sections {
            if entered_from[section].is_some() || state.section_at(timeslot, section) {
                continue;
            }
            entered_from[section] = Some(timeslot);

            if pending_demand(demands, state, section).is_some() {
                let mut path = Vec::new();
                let mut current = section;
                loop {
                    let into = entered_from[current]?;
                    path.push((current, into));
                    match left_by[into] {
                        Some(previous) => current = previous,
                        None => break,
                    }
                }
                path.reverse();
                return Some(path);
            }

            for next in 0..timeslots {
                if !visited[next] && state.section_at(next, section) {
                    visited[next] = true;
                    left_by[next] = Some(section);
                    queue.push_back(next);
                }
            }
        }
    }

    None
}

fn apply_path(
    path: &[(usize, usize)],
    placements: &mut [Option<DemandId>],
    inventory: &SlotInventory,
    demands: &DemandSet,
    state: &mut RepairState,
) -> bool {
    let Some(&(_, start)) = path.first() else {
        return false;
    };
    let Some(mut target) = free_slot(placements, inventory, start) else {
        return false;
    };

    for (step, &(section, into)) in path.iter().enumerate() {
        match path.get(step + 1) {
            Some(&(_, from)) => {
                let Some(source) = slot_of_section(placements, inventory, demands, section, from)
                else {
                    return false;
                };
                placements[target] = placements[source].take();
                state.move_section(section, from, into);
                trace!(
                    "Backfill moved section {} from {} to {}",
                    demands.section_name(section),
                    inventory.slots()[source],
                    inventory.slots()[target]
                );
                target = source;
            }
            None => {
                let Some(demand) = pending_demand(demands, state, section) else {
                    return false;
                };
                let (_, course) = demands.key(demand);
                state.record(into, section, course);
                placements[target] = Some(demand);
                trace!(
                    "Backfill placed {} in {}",
                    demands.get(demand),
                    inventory.slots()[target]
                );
            }
        }
    }
    true
}

fn slot_of_section(
    placements: &[Option<DemandId>],
    inventory: &SlotInventory,
    demands: &DemandSet,
    section: usize,
    timeslot: usize,
) -> Option<SlotId> {
    (0..inventory.rooms().len())
        .map(|room| inventory.slot_id(room, timeslot))
        .find(|&slot| placements[slot].is_some_and(|demand| demands.key(demand).0 == section))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Demand;

    fn inventory(rooms: &[&str], timeslots: &[&str]) -> SlotInventory {
        let rooms: Vec<String> = rooms.iter().map(|r| r.to_string()).collect();
        let timeslots: Vec<String> = timeslots.iter().map(|t| t.to_string()).collect();
        SlotInventory::new(&rooms, &timeslots).unwrap()
    }

    fn demand_set(pairs: &[(&str, &str)]) -> DemandSet {
        DemandSet::from_demands(pairs.iter().map(|&(s, c)| Demand::new(s, c))).unwrap()
    }

    #[test]
    fn test_admissible_pairs_are_kept() {
        let inventory = inventory(&["R1", "R2"], &["9-10"]);
        let demands = demand_set(&[("X", "Math"), ("Y", "Math")]);
        let matching = ProvisionalMatching::from_pairs(vec![(0, 1), (1, 0)]);
        let mut state = RepairState::for_day(&inventory, &demands);

        let outcome = repair(&matching, &inventory, &demands, &mut state);

        assert_eq!(outcome.placements, vec![Some(1), Some(0)]);
        assert!(outcome.substituted.is_empty());
        assert!(outcome.dropped.is_empty());
    }

    #[test]
    fn test_section_conflict_takes_first_admissible_substitute() {
        // R1 and R2 share the timeslot, both matched to section X.
        let inventory = inventory(&["R1", "R2"], &["9-10"]);
        let demands = demand_set(&[("X", "Math"), ("X", "Phys"), ("Y", "Chem")]);
        let matching = ProvisionalMatching::from_pairs(vec![(0, 0), (1, 1)]);
        let mut state = RepairState::for_day(&inventory, &demands);

        let outcome = repair(&matching, &inventory, &demands, &mut state);

        assert_eq!(outcome.placements, vec![Some(0), Some(2)]);
        assert_eq!(outcome.substituted, vec![1]);
    }

    #[test]
    fn test_conflict_without_substitute_drops_slot() {
        let inventory = inventory(&["R1", "R2"], &["9-10"]);
        let demands = demand_set(&[("X", "Math"), ("X", "Phys")]);
        let matching = ProvisionalMatching::from_pairs(vec![(0, 0), (1, 1)]);
        let mut state = RepairState::for_day(&inventory, &demands);

        let outcome = repair(&matching, &inventory, &demands, &mut state);

        assert_eq!(outcome.placements, vec![Some(0), None]);
        assert_eq!(outcome.dropped, vec![1]);
    }

    #[test]
    fn test_substitute_never_reuses_a_scheduled_demand() {
        // Slots: 0 = R1@8-9, 1 = R1@9-10, 2 = R2@8-9, 3 = R2@9-10.
        let inventory = inventory(&["R1", "R2"], &["8-9", "9-10"]);
        let demands = demand_set(&[("X", "Math"), ("Y", "Math"), ("Y", "Phys")]);
        let matching = ProvisionalMatching::from_pairs(vec![(0, 0), (1, 1), (3, 2)]);
        let mut state = RepairState::for_day(&inventory, &demands);

        let outcome = repair(&matching, &inventory, &demands, &mut state);

        // (X, Math) is free of 9-10 but already scheduled, so it is skipped.
        assert_eq!(outcome.placements, vec![Some(0), Some(1), None, None]);
        assert_eq!(outcome.dropped, vec![3]);
        assert!(outcome.substituted.is_empty());
    }

    #[test]
    fn test_backfill_fills_unmatched_slots() {
        let inventory = inventory(&["R1"], &["8-9", "9-10"]);
        let demands = demand_set(&[("X", "Math"), ("X", "Phys")]);
        let mut state = RepairState::for_day(&inventory, &demands);
        let mut placements = vec![None, None];

        let filled = backfill(&mut placements, &inventory, &demands, &mut state);

        assert_eq!(filled, 2);
        assert_eq!(placements, vec![Some(0), Some(1)]);
        assert!(state.section_at(0, 0) && state.section_at(1, 0));
    }

    #[test]
    fn test_backfill_recovers_dropped_slot() {
        // Both matched slots share 8-9; repair drops R2@8-9 and backfill uses R1@9-10.
        let inventory = inventory(&["R1", "R2"], &["8-9", "9-10"]);
        let demands = demand_set(&[("X", "Math"), ("X", "Phys")]);
        let matching = ProvisionalMatching::from_pairs(vec![(0, 0), (2, 1)]);
        let mut state = RepairState::for_day(&inventory, &demands);

        let mut outcome = repair(&matching, &inventory, &demands, &mut state);
        assert_eq!(outcome.dropped, vec![2]);

        let filled = backfill(&mut outcome.placements, &inventory, &demands, &mut state);

        assert_eq!(filled, 1);
        assert_eq!(outcome.placements, vec![Some(0), Some(1), None, None]);
    }

    #[test]
    fn test_backfill_moves_section_to_free_a_timeslot() {
        // R1@8-9 = (Y, Art), R1@9-10 = (X, Math), R2@8-9 empty, R2@9-10 = (W, Chem).
        // Y still needs Bio but already sits in 8-9 and 9-10 is full, so X
        // moves into R2@8-9 and Y takes its room at 9-10.
        let inventory = inventory(&["R1", "R2"], &["8-9", "9-10"]);
        let demands = demand_set(&[("X", "Math"), ("Y", "Art"), ("Y", "Bio"), ("W", "Chem")]);
        let mut state = RepairState::for_day(&inventory, &demands);
        state.record(0, 1, 1);
        state.record(1, 0, 0);
        state.record(1, 2, 3);
        let mut placements = vec![Some(1), Some(0), None, Some(3)];

        let filled = backfill(&mut placements, &inventory, &demands, &mut state);

        assert_eq!(filled, 1);
        assert_eq!(placements, vec![Some(1), Some(2), Some(0), Some(3)]);
        assert!(state.section_at(0, 0));
        assert!(!state.section_at(1, 0));
        assert!(state.section_at(1, 1));
        assert!(state.course_assigned(1, 2));
    }

    #[test]
    fn test_backfill_without_pending_demand_is_a_no_op() {
        let inventory = inventory(&["R1", "R2"], &["8-9"]);
        let demands = demand_set(&[("X", "Math")]);
        let mut state = RepairState::for_day(&inventory, &demands);
        state.record(0, 0, 0);
        let mut placements = vec![Some(0), None];

        let filled = backfill(&mut placements, &inventory, &demands, &mut state);

        assert_eq!(filled, 0);
        assert_eq!(placements, vec![Some(0), None]);
    }
}
