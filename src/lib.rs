//! Weekly classroom allocation.
//!
//! Each weekday, every (section, course) demand competes for a (room,
//! timeslot) slot. A maximum matching over the complete slot/demand graph
//! gives a provisional pairing; the repair pass then enforces that a section
//! sits in one room per timeslot and takes each course at most once a day,
//! and the backfill stage fills whatever the repair left empty.

pub mod allocation;
pub mod catalog;
pub mod config;
pub mod data;
pub mod demand;
pub mod graph;
pub mod inventory;
pub mod matcher;
pub mod repair;
pub mod server;
pub mod solver;
