use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// Type aliases for clarity
pub type Section = String;
pub type Course = String;
pub type Room = String;
pub type Timeslot = String;

/// Position of a demand inside its `DemandSet`.
pub type DemandId = usize;
/// Position of a slot inside its `SlotInventory`.
pub type SlotId = usize;

/// A section's obligation to attend one session of a course.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Demand {
    pub section: Section,
    pub course: Course,
}

impl Demand {
    pub fn new(section: impl Into<Section>, course: impl Into<Course>) -> Self {
        Self {
            section: section.into(),
            course: course.into(),
        }
    }
}

impl fmt::Display for Demand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.section, self.course)
    }
}

/// One bookable room for one timeslot of a day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Slot {
    pub room: Room,
    pub timeslot: Timeslot,
}

impl Slot {
    pub fn new(room: impl Into<Room>, timeslot: impl Into<Timeslot>) -> Self {
        Self {
            room: room.into(),
            timeslot: timeslot.into(),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.room, self.timeslot)
    }
}

/// The sections of one academic semester and the courses they all take.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Semester {
    pub sections: Vec<Section>,
    pub courses: Vec<Course>,
}

/// The complete input for one weekly timetable.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableInput {
    pub semesters: Vec<Semester>,
    #[serde(default)]
    pub extra_demands: Vec<Demand>,
    pub rooms: Vec<Room>,
    pub timeslots: Vec<Timeslot>,
    pub week_days: Vec<String>,
    /// Semester marker (first character of a section) to RGB hex color.
    #[serde(default)]
    pub semester_colors: BTreeMap<String, String>,
}

/// A filled slot of a day's timetable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub room: Room,
    pub timeslot: Timeslot,
    pub section: Section,
    pub course: Course,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableCell {
    /// `"<Course> <Section>"`, or empty.
    pub text: String,
    pub color: Option<String>,
}

/// One timeslot row of a day's timetable, one cell per room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableRow {
    pub timeslot: Timeslot,
    pub cells: Vec<TimetableCell>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    DuplicateDemand,
    EmptyInventory,
    InfeasibleSlot,
    UnscheduledDemand,
}

/// A non-fatal problem detected while building a timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)
    }
}

/// The timetable of a single weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTimetable {
    pub day: String,
    pub rooms: Vec<Room>,
    pub rows: Vec<TimetableRow>,
    pub assignments: Vec<Assignment>,
    pub unfilled_slots: Vec<Slot>,
    pub unscheduled_demands: Vec<Demand>,
    pub diagnostics: Vec<Diagnostic>,
}

/// The final output of the solver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableOutput {
    pub days: Vec<DayTimetable>,
    pub diagnostics: Vec<Diagnostic>,
}
