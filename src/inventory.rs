use crate::data::{Room, Slot, SlotId, Timeslot};
use itertools::iproduct;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    NoRooms,
    NoTimeslots,
    DuplicateRoom(Room),
    DuplicateTimeslot(Timeslot),
}

impl InventoryError {
    /// Whether the inventory has no capacity at all, as opposed to being malformed.
    pub fn is_empty_inventory(&self) -> bool {
        matches!(self, InventoryError::NoRooms | InventoryError::NoTimeslots)
    }
}

impl fmt::Display for InventoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InventoryError::NoRooms => write!(f, "No rooms configured"),
            InventoryError::NoTimeslots => write!(f, "No timeslots configured"),
            InventoryError::DuplicateRoom(room) => write!(f, "Room {} is declared twice", room),
            InventoryError::DuplicateTimeslot(timeslot) => {
                write!(f, "Timeslot {} is declared twice", timeslot)
            }
        }
    }
}

impl std::error::Error for InventoryError {}

/// Rooms x timeslots for a single day.
///
/// Slots are laid out room-major: `SlotId = room * timeslots + timeslot`.
#[derive(Debug, Clone)]
pub struct SlotInventory {
    rooms: Vec<Room>,
    timeslots: Vec<Timeslot>,
    slots: Vec<Slot>,
}

impl SlotInventory {
    pub fn new(rooms: &[Room], timeslots: &[Timeslot]) -> Result<Self, InventoryError> {
        if rooms.is_empty() {
            return Err(InventoryError::NoRooms);
        }
        if timeslots.is_empty() {
            return Err(InventoryError::NoTimeslots);
        }
        if let Some(room) = first_repeat(rooms) {
            return Err(InventoryError::DuplicateRoom(room.clone()));
        }
        if let Some(timeslot) = first_repeat(timeslots) {
            return Err(InventoryError::DuplicateTimeslot(timeslot.clone()));
        }

        let slots = iproduct!(rooms.iter(), timeslots.iter())
            .map(|(room, timeslot)| Slot::new(room.clone(), timeslot.clone()))
            .collect();

        Ok(Self {
            rooms: rooms.to_vec(),
            timeslots: timeslots.to_vec(),
            slots,
        })
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn timeslots(&self) -> &[Timeslot] {
        &self.timeslots
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot_id(&self, room: usize, timeslot: usize) -> SlotId {
        room * self.timeslots.len() + timeslot
    }

    pub fn room_of(&self, slot: SlotId) -> usize {
        slot / self.timeslots.len()
    }

    pub fn timeslot_of(&self, slot: SlotId) -> usize {
        slot % self.timeslots.len()
    }
}

fn first_repeat(names: &[String]) -> Option<&String> {
    let mut seen = HashSet::new();
    names.iter().find(|name| !seen.insert(name.as_str()))
}
