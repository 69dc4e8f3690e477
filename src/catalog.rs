use crate::data::{Semester, TimetableInput};
use std::collections::BTreeMap;

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn semester(sections: &[&str], courses: &[&str]) -> Semester {
    Semester {
        sections: names(sections),
        courses: names(courses),
    }
}

/// The department's standing weekly catalogue: semesters 1, 3, 5 and both
/// semester 7 tracks, 17 rooms and eight one-hour periods.
pub fn builtin() -> TimetableInput {
    TimetableInput {
        semesters: vec![
            semester(&["1A", "1B", "1C", "1D", "1E"], &["PF", "ICT", "IRS", "CAL", "PS", "AP"]),
            semester(&["3A", "3B", "3C", "3D", "3E"], &["COAL", "DSA", "DS", "LA", "POE"]),
            semester(&["5A", "5B", "5C", "5D", "5E"], &["PDC", "DB", "ALGO", "GT", "SDA"]),
            semester(&["7A", "7B", "7C", "7D", "7E"], &["FYP-1", "IR", "PSYC", "DLP", "FSPM"]),
            semester(&["7AS", "7BS", "7CS", "7DS", "7ES"], &["FY-1", "PPIT", "SE", "RS", "MM"]),
        ],
        extra_demands: Vec::new(),
        rooms: names(&[
            "A1", "A2", "A3", "A4", "A5", "A6", "A7", "A8", "E1", "E2", "E3", "E4", "E5", "E6",
            "R11", "R12", "R109",
        ]),
        timeslots: names(&["8-9", "9-10", "10-11", "11-12", "12-1", "1-2", "2-3", "3-4"]),
        week_days: names(&["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]),
        semester_colors: BTreeMap::from([
            ("7".to_string(), "FFFF00".to_string()),
            ("5".to_string(), "FF00FF".to_string()),
            ("3".to_string(), "FFCCCB".to_string()),
            ("1".to_string(), "CCE5FF".to_string()),
        ]),
    }
}
