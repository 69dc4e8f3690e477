use crate::allocation::Allocation;
use crate::data::{DemandId, Diagnostic, DiagnosticKind, TimetableInput, TimetableOutput};
use crate::demand::DemandSet;
use crate::graph::CandidateGraph;
use crate::inventory::{InventoryError, SlotInventory};
use crate::matcher::maximum_slot_matching;
use crate::repair::{RepairState, backfill, repair};
use itertools::Itertools;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::fmt;
use std::time::Instant;

/// Input that cannot produce a meaningful timetable at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    Inventory(InventoryError),
    DuplicateWeekDay(String),
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::Inventory(err) => write!(f, "{}", err),
            SolveError::DuplicateWeekDay(day) => write!(f, "Week day {} is declared twice", day),
        }
    }
}

impl std::error::Error for SolveError {}

impl From<InventoryError> for SolveError {
    fn from(err: InventoryError) -> Self {
        SolveError::Inventory(err)
    }
}

/// Runs graph build, matching, repair and backfill for one weekday.
pub fn solve_day(day: &str, inventory: &SlotInventory, demands: &DemandSet) -> Allocation {
    let start_time = Instant::now();
    info!(
        "Allocating {}: {} slots, {} demands",
        day,
        inventory.len(),
        demands.len()
    );

    let candidates = CandidateGraph::build(inventory, demands);
    let matching = maximum_slot_matching(&candidates);

    let mut state = RepairState::for_day(inventory, demands);
    let mut outcome = repair(&matching, inventory, demands, &mut state);
    let recovered = backfill(&mut outcome.placements, inventory, demands, &mut state);

    let mut diagnostics = Vec::new();
    for (slot, placed) in outcome.placements.iter().enumerate() {
        if placed.is_none() {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::InfeasibleSlot,
                format!(
                    "{}: no (section, course) pair fits slot {}",
                    day,
                    inventory.slots()[slot]
                ),
            ));
        }
    }

    let scheduled: HashSet<DemandId> = outcome.placements.iter().flatten().copied().collect();
    for demand in (0..demands.len()).filter(|id| !scheduled.contains(id)) {
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::UnscheduledDemand,
            format!("{}: demand {} was not scheduled", day, demands.get(demand)),
        ));
    }

    let allocation =
        Allocation::from_placements(day, inventory, demands, &outcome.placements, diagnostics);

    for violation in allocation.violations() {
        warn!("{}: {}", day, violation);
    }
    if !allocation.unscheduled_demands().is_empty() {
        warn!(
            "{}: {} demands left unscheduled",
            day,
            allocation.unscheduled_demands().len()
        );
    }
    debug!(
        "{}: matched {}, substituted {}, dropped {}, backfilled {}",
        day,
        matching.len(),
        outcome.substituted.len(),
        outcome.dropped.len(),
        recovered
    );
    info!(
        "{} allocated {} of {} slots in {:.2?}",
        day,
        allocation.filled_count(),
        inventory.len(),
        start_time.elapsed()
    );

    allocation
}

/// Builds the demand set and slot inventory once and allocates every weekday independently.
pub fn solve_week(input: &TimetableInput) -> Result<TimetableOutput, SolveError> {
    if let Some(day) = input.week_days.iter().duplicates().next() {
        return Err(SolveError::DuplicateWeekDay(day.clone()));
    }

    let (demands, duplicates) = DemandSet::from_semesters(&input.semesters, &input.extra_demands);
    let mut diagnostics: Vec<Diagnostic> = duplicates
        .iter()
        .map(|dup| {
            warn!("{}", dup);
            Diagnostic::new(DiagnosticKind::DuplicateDemand, dup.to_string())
        })
        .collect();

    let inventory = match SlotInventory::new(&input.rooms, &input.timeslots) {
        Ok(inventory) => Some(inventory),
        Err(err) if err.is_empty_inventory() => {
            warn!("{}; every demand stays unscheduled", err);
            diagnostics.push(Diagnostic::new(DiagnosticKind::EmptyInventory, err.to_string()));
            None
        }
        Err(err) => return Err(err.into()),
    };

    let days = input
        .week_days
        .iter()
        .map(|day| {
            let allocation = match &inventory {
                Some(inventory) => solve_day(day, inventory, &demands),
                None => Allocation::without_capacity(
                    day,
                    &input.rooms,
                    &input.timeslots,
                    &demands,
                    vec![Diagnostic::new(
                        DiagnosticKind::EmptyInventory,
                        format!("{}: no slots to allocate", day),
                    )],
                ),
            };
            allocation.to_day_timetable(&input.semester_colors)
        })
        .collect();

    Ok(TimetableOutput { days, diagnostics })
}
