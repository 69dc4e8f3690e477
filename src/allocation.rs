use crate::data::{
    Assignment, DayTimetable, Demand, DemandId, Diagnostic, Room, Slot, TimetableCell,
    TimetableRow, Timeslot,
};
use crate::demand::DemandSet;
use crate::inventory::SlotInventory;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// Cell fill used when a section's semester has no configured color.
pub const DEFAULT_CELL_COLOR: &str = "FFFFFF";

/// Looks up the color of the semester a section belongs to (its first character).
pub fn semester_color(section: &str, colors: &BTreeMap<String, String>) -> String {
    let marker: String = section.chars().take(1).collect();
    colors
        .get(&marker)
        .cloned()
        .unwrap_or_else(|| DEFAULT_CELL_COLOR.to_string())
}

/// A broken scheduling invariant found in an allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    SectionDoubleBooked { timeslot: Timeslot, section: String },
    CourseRepeated { section: String, course: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::SectionDoubleBooked { timeslot, section } => {
                write!(f, "Section {} is booked twice at {}", section, timeslot)
            }
            Violation::CourseRepeated { section, course } => {
                write!(f, "Section {} takes {} twice", section, course)
            }
        }
    }
}

/// The frozen slot -> demand mapping of one weekday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    day: String,
    rooms: Vec<Room>,
    timeslots: Vec<Timeslot>,
    entries: Vec<(Slot, Option<Demand>)>,
    unscheduled: Vec<Demand>,
    diagnostics: Vec<Diagnostic>,
}

impl Allocation {
    pub(crate) fn from_placements(
        day: &str,
        inventory: &SlotInventory,
        demands: &DemandSet,
        placements: &[Option<DemandId>],
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        let entries = inventory
            .slots()
            .iter()
            .zip(placements)
            .map(|(slot, placed)| (slot.clone(), placed.map(|id| demands.get(id).clone())))
            .collect();

        let scheduled: HashSet<DemandId> = placements.iter().flatten().copied().collect();
        let unscheduled = (0..demands.len())
            .filter(|id| !scheduled.contains(id))
            .map(|id| demands.get(id).clone())
            .collect();

        Self {
            day: day.to_string(),
            rooms: inventory.rooms().to_vec(),
            timeslots: inventory.timeslots().to_vec(),
            entries,
            unscheduled,
            diagnostics,
        }
    }

    /// An allocation with no usable capacity: every demand stays unscheduled.
    pub(crate) fn without_capacity(
        day: &str,
        rooms: &[Room],
        timeslots: &[Timeslot],
        demands: &DemandSet,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        Self {
            day: day.to_string(),
            rooms: rooms.to_vec(),
            timeslots: timeslots.to_vec(),
            entries: Vec::new(),
            unscheduled: demands.demands().to_vec(),
            diagnostics,
        }
    }

    pub fn day(&self) -> &str {
        &self.day
    }

    /// Filled slots in inventory order.
    pub fn filled(&self) -> impl Iterator<Item = (&Slot, &Demand)> {
        self.entries
            .iter()
            .filter_map(|(slot, demand)| demand.as_ref().map(|demand| (slot, demand)))
    }

    pub fn filled_count(&self) -> usize {
        self.filled().count()
    }

    pub fn unfilled_slots(&self) -> impl Iterator<Item = &Slot> {
        self.entries
            .iter()
            .filter(|(_, demand)| demand.is_none())
            .map(|(slot, _)| slot)
    }

    pub fn unscheduled_demands(&self) -> &[Demand] {
        &self.unscheduled
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn get(&self, slot: &Slot) -> Option<&Demand> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == slot)
            .and_then(|(_, demand)| demand.as_ref())
    }

    /// Re-checks the section-per-timeslot and course-per-section invariants.
    ///
    /// One slot per demand follows from the second: demands are unique pairs.
    pub fn violations(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut at_timeslot: HashSet<(&str, &str)> = HashSet::new();
        let mut taken: HashSet<(&str, &str)> = HashSet::new();

        for (slot, demand) in self.filled() {
            if !at_timeslot.insert((slot.timeslot.as_str(), demand.section.as_str())) {
                violations.push(Violation::SectionDoubleBooked {
                    timeslot: slot.timeslot.clone(),
                    section: demand.section.clone(),
                });
            }
            if !taken.insert((demand.section.as_str(), demand.course.as_str())) {
                violations.push(Violation::CourseRepeated {
                    section: demand.section.clone(),
                    course: demand.course.clone(),
                });
            }
        }
        violations
    }

    /// Timeslot rows x room columns, cells reading `"<Course> <Section>"`.
    pub fn table(&self, colors: &BTreeMap<String, String>) -> Vec<TimetableRow> {
        let by_slot: HashMap<(&str, &str), &Demand> = self
            .filled()
            .map(|(slot, demand)| ((slot.room.as_str(), slot.timeslot.as_str()), demand))
            .collect();

        self.timeslots
            .iter()
            .map(|timeslot| TimetableRow {
                timeslot: timeslot.clone(),
                cells: self
                    .rooms
                    .iter()
                    .map(|room| match by_slot.get(&(room.as_str(), timeslot.as_str())) {
                        Some(demand) => TimetableCell {
                            text: format!("{} {}", demand.course, demand.section),
                            color: Some(semester_color(&demand.section, colors)),
                        },
                        None => TimetableCell {
                            text: String::new(),
                            color: None,
                        },
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn to_day_timetable(&self, colors: &BTreeMap<String, String>) -> DayTimetable {
        DayTimetable {
            day: self.day.clone(),
            rooms: self.rooms.clone(),
            rows: self.table(colors),
            assignments: self
                .filled()
                .map(|(slot, demand)| Assignment {
                    room: slot.room.clone(),
                    timeslot: slot.timeslot.clone(),
                    section: demand.section.clone(),
                    course: demand.course.clone(),
                })
                .collect(),
            unfilled_slots: self.unfilled_slots().cloned().collect(),
            unscheduled_demands: self.unscheduled.clone(),
            diagnostics: self.diagnostics.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("1".to_string(), "CCE5FF".to_string()),
            ("3".to_string(), "FFCCCB".to_string()),
        ])
    }

    fn allocation(placements: &[Option<DemandId>]) -> Allocation {
        let rooms = vec!["A1".to_string(), "A2".to_string()];
        let timeslots = vec!["8-9".to_string(), "9-10".to_string()];
        let inventory = SlotInventory::new(&rooms, &timeslots).unwrap();
        let demands = DemandSet::from_demands(vec![
            Demand::new("1A", "PF"),
            Demand::new("3A", "DSA"),
            Demand::new("1A", "ICT"),
        ])
        .unwrap();
        Allocation::from_placements("Monday", &inventory, &demands, placements, Vec::new())
    }

    #[test]
    fn test_semester_color_lookup() {
        assert_eq!(semester_color("1A", &colors()), "CCE5FF");
        assert_eq!(semester_color("7AS", &colors()), DEFAULT_CELL_COLOR);
        assert_eq!(semester_color("", &colors()), DEFAULT_CELL_COLOR);
    }

    #[test]
    fn test_filled_and_unfilled_views() {
        // Slots: A1@8-9, A1@9-10, A2@8-9, A2@9-10.
        let allocation = allocation(&[Some(0), None, Some(1), None]);

        assert_eq!(allocation.filled_count(), 2);
        assert_eq!(
            allocation.unfilled_slots().cloned().collect::<Vec<_>>(),
            vec![Slot::new("A1", "9-10"), Slot::new("A2", "9-10")]
        );
        assert_eq!(allocation.unscheduled_demands(), &[Demand::new("1A", "ICT")]);
        assert_eq!(
            allocation.get(&Slot::new("A2", "8-9")),
            Some(&Demand::new("3A", "DSA"))
        );
        assert!(allocation.violations().is_empty());
    }

    #[test]
    fn test_table_layout_and_colors() {
        let allocation = allocation(&[Some(0), Some(1), None, Some(2)]);
        let rows = allocation.table(&colors());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].timeslot, "8-9");
        assert_eq!(rows[0].cells[0].text, "PF 1A");
        assert_eq!(rows[0].cells[0].color.as_deref(), Some("CCE5FF"));
        assert_eq!(rows[0].cells[1].text, "");
        assert_eq!(rows[0].cells[1].color, None);
        assert_eq!(rows[1].cells[0].text, "DSA 3A");
        assert_eq!(rows[1].cells[0].color.as_deref(), Some("FFCCCB"));
        assert_eq!(rows[1].cells[1].text, "ICT 1A");
    }

    #[test]
    fn test_violations_are_detected() {
        // 1A twice at 8-9, and the same demand placed twice.
        let allocation = allocation(&[Some(0), Some(0), Some(2), None]);
        let violations = allocation.violations();

        assert!(violations.contains(&Violation::SectionDoubleBooked {
            timeslot: "8-9".to_string(),
            section: "1A".to_string(),
        }));
        assert!(violations.contains(&Violation::CourseRepeated {
            section: "1A".to_string(),
            course: "PF".to_string(),
        }));
    }

    #[test]
    fn test_day_timetable_projection() {
        let allocation = allocation(&[Some(0), None, None, None]);
        let day = allocation.to_day_timetable(&colors());

        assert_eq!(day.day, "Monday");
        assert_eq!(day.rooms, vec!["A1".to_string(), "A2".to_string()]);
        assert_eq!(day.assignments.len(), 1);
        assert_eq!(day.assignments[0].course, "PF");
        assert_eq!(day.unfilled_slots.len(), 3);
        assert_eq!(day.unscheduled_demands.len(), 2);
    }
}
