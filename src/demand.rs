use crate::data::{Demand, DemandId, Semester};
use itertools::Itertools;
use std::collections::HashMap;
use std::fmt;

/// The same (section, course) pair was declared more than once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateDemandError {
    demand: Demand,
    first_position: usize,
    position: usize,
}

impl DuplicateDemandError {
    pub fn demand(&self) -> &Demand {
        &self.demand
    }

    /// Declaration position of the occurrence that was kept.
    pub fn first_position(&self) -> usize {
        self.first_position
    }

    /// Declaration position of the rejected repeat.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl fmt::Display for DuplicateDemandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Demand {} declared at position {} repeats position {}",
            self.demand, self.position, self.first_position
        )
    }
}

impl std::error::Error for DuplicateDemandError {}

/// Expands every semester into its sections x courses obligations, in declaration order.
pub fn semester_demands(semesters: &[Semester]) -> impl Iterator<Item = Demand> + '_ {
    semesters.iter().flat_map(|semester| {
        semester
            .sections
            .iter()
            .cartesian_product(semester.courses.iter())
            .map(|(section, course)| Demand::new(section.clone(), course.clone()))
    })
}

/// Ordered, duplicate-free list of obligations for one day.
///
/// Sections and courses are interned so the repair bookkeeping can work on
/// indices; `DemandId`s follow declaration order.
#[derive(Debug, Clone, Default)]
pub struct DemandSet {
    demands: Vec<Demand>,
    sections: Vec<String>,
    courses: Vec<String>,
    keys: Vec<(usize, usize)>,
    by_section: Vec<Vec<DemandId>>,
}

impl DemandSet {
    /// Builds the set, rejecting the first duplicate pair.
    pub fn from_demands<I>(demands: I) -> Result<Self, DuplicateDemandError>
    where
        I: IntoIterator<Item = Demand>,
    {
        let (set, mut duplicates) = Self::from_demands_dedup(demands);
        if duplicates.is_empty() {
            Ok(set)
        } else {
            Err(duplicates.swap_remove(0))
        }
    }

    /// Builds the set keeping the first occurrence of every pair; repeats are returned.
    pub fn from_demands_dedup<I>(demands: I) -> (Self, Vec<DuplicateDemandError>)
    where
        I: IntoIterator<Item = Demand>,
    {
        let mut set = Self::default();
        let mut section_ids: HashMap<String, usize> = HashMap::new();
        let mut course_ids: HashMap<String, usize> = HashMap::new();
        let mut seen: HashMap<(usize, usize), usize> = HashMap::new();
        let mut duplicates = Vec::new();

        for (position, demand) in demands.into_iter().enumerate() {
            let section = intern(&mut section_ids, &mut set.sections, &demand.section);
            let course = intern(&mut course_ids, &mut set.courses, &demand.course);
            if set.by_section.len() < set.sections.len() {
                set.by_section.push(Vec::new());
            }

            if let Some(&first_position) = seen.get(&(section, course)) {
                duplicates.push(DuplicateDemandError {
                    demand,
                    first_position,
                    position,
                });
                continue;
            }
            seen.insert((section, course), position);

            let id = set.demands.len();
            set.demands.push(demand);
            set.keys.push((section, course));
            set.by_section[section].push(id);
        }

        (set, duplicates)
    }

    pub fn from_semesters(
        semesters: &[Semester],
        extra: &[Demand],
    ) -> (Self, Vec<DuplicateDemandError>) {
        Self::from_demands_dedup(semester_demands(semesters).chain(extra.iter().cloned()))
    }

    pub fn len(&self) -> usize {
        self.demands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.demands.is_empty()
    }

    pub fn get(&self, id: DemandId) -> &Demand {
        &self.demands[id]
    }

    pub fn demands(&self) -> &[Demand] {
        &self.demands
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn section_name(&self, section: usize) -> &str {
        &self.sections[section]
    }

    /// Interned (section, course) of a demand.
    pub fn key(&self, id: DemandId) -> (usize, usize) {
        self.keys[id]
    }

    /// Demands of one interned section, in declaration order.
    pub fn demands_of_section(&self, section: usize) -> &[DemandId] {
        &self.by_section[section]
    }
}

fn intern(ids: &mut HashMap<String, usize>, names: &mut Vec<String>, name: &str) -> usize {
    if let Some(&id) = ids.get(name) {
        return id;
    }
    let id = names.len();
    names.push(name.to_string());
    ids.insert(name.to_string(), id);
    id
}
