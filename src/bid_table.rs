use std::{
    io::{self, Write},
    mem,
    slice,
};

use log::{debug, trace, warn};

use crate::{
    bid::{Bid, parse_key},
    config::{TableConfig, clamp_load_factor},
    error::TableError,
    utils::next_prime,
};

/// State of a single slot in the table
#[derive(Debug, Clone, Default)]
enum Slot {
    /// Never used since the table was built or last resized
    #[default]
    Empty,
    /// Tombstone left behind by a removal
    Released,
    /// Holds a live record
    Occupied {
        /// The stored record
        bid: Bid,
        /// Numeric form of the record id
        key: u64,
        /// Slot the key hashed to before any probing
        home: usize,
    },
}

impl Slot {
    /// Returns the record if the slot is occupied
    fn bid(&self) -> Option<&Bid> {
        match self {
            Self::Occupied { bid, .. } => Some(bid),
            Self::Empty | Self::Released => None,
        }
    }
}

/// Result of trying to place a record into the current slot array
#[derive(Debug)]
enum Placement {
    /// The record took a previously open slot
    Inserted {
        /// Slot the record landed in
        index: usize,
    },
    /// A record with the same id was replaced, the old one is returned
    Replaced(Bid),
    /// A full probe cycle found no open slot, the record is handed back
    Full(Bid),
}

/// Snapshot of how well the table is laid out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeStats {
    /// Number of slots
    pub capacity: usize,
    /// Number of live records
    pub occupancy: usize,
    /// Number of released slots
    pub tombstones: usize,
    /// Live records divided by slots
    pub load_factor: f64,
    /// Mean distance between a record's home slot and its actual slot
    pub mean_displacement: f64,
    /// Largest distance between a record's home slot and its actual slot
    pub max_displacement: usize,
}

/// An open-addressing hash table of bids keyed by their numeric id.
///
/// Collisions are resolved with linear probing. Removed records leave a tombstone behind so
/// that lookups keep walking past them, and inserts reuse the first tombstone they meet. The
/// table grows to the first prime at least twice its capacity whenever the load factor exceeds
/// the configured threshold, or when a probe cycle finds no room at all.
///
/// Note: This implementation is not thread-safe. Wrap the whole table in a `Mutex` to share it.
#[derive(Debug, Clone)]
pub struct BidTable {
    /// The slot array
    slots: Vec<Slot>,
    /// Number of occupied slots
    occupancy: usize,
    /// Load factor above which the next insert grows the table first
    max_load_factor: f64,
}

impl Default for BidTable {
    fn default() -> Self {
        Self::new()
    }
}

impl BidTable {
    /// Creates a table with the default capacity of 179 slots
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    /// Creates a table with the given number of slots (at least one)
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(TableConfig::default().with_capacity(capacity))
    }

    /// Creates a table from a full configuration
    #[must_use]
    pub fn with_config(config: TableConfig) -> Self {
        let config = config.normalized();
        Self {
            slots: vec![Slot::Empty; config.initial_capacity],
            occupancy: 0,
            max_load_factor: config.max_load_factor,
        }
    }

    /// Maps a key onto its home slot
    #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
    fn get_index(&self, key: u64) -> usize {
        let capacity = self.slots.len().max(1) as u64;
        // the remainder is below the slot count, so it fits in usize
        (key % capacity) as usize
    }

    /// Returns the slot after `index`, wrapping around at the end of the array
    fn next_index(&self, index: usize) -> usize {
        let next = index.saturating_add(1);
        if next >= self.slots.len() { 0 } else { next }
    }

    /// Inserts a bid.
    ///
    /// If a bid with the same id is already stored it is replaced and returned.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::MalformedKey`] if the bid id is not a non-negative integer, or
    /// [`TableError::NonCanonicalKey`] if it has a sign or leading zeros. The table is left
    /// untouched in either case.
    pub fn insert(&mut self, bid: Bid) -> Result<Option<Bid>, TableError> {
        let key = bid.key()?;

        if self.load_factor() > self.max_load_factor {
            self.resize();
        }

        Ok(self.insert_keyed(key, bid))
    }

    /// Places a bid whose key is already parsed, growing the table until it fits
    fn insert_keyed(&mut self, key: u64, bid: Bid) -> Option<Bid> {
        let mut pending = bid;
        loop {
            match self.place(key, pending) {
                Placement::Inserted { index } => {
                    trace!("placed key {key} at slot {index}");
                    return None;
                }
                Placement::Replaced(previous) => return Some(previous),
                Placement::Full(bid) => {
                    debug!("no open slot for key {key} in {} slots", self.slots.len());
                    pending = bid;
                    self.resize();
                }
            }
        }
    }

    /// Walks the probe sequence from the key's home slot and stores the bid.
    ///
    /// The bid lands in the first released or empty slot. The walk continues past released
    /// slots up to the first empty one so that an existing record with the same id is found
    /// and updated instead of duplicated.
    fn place(&mut self, key: u64, bid: Bid) -> Placement {
        let home = self.get_index(key);
        let mut index = home;
        let mut open = None;

        for _ in 0..self.slots.len() {
            match self.slots.get_mut(index) {
                None => break,
                Some(Slot::Empty) => {
                    if open.is_none() {
                        open = Some(index);
                    }
                    break;
                }
                Some(Slot::Released) => {
                    if open.is_none() {
                        open = Some(index);
                    }
                }
                Some(Slot::Occupied { bid: existing, .. }) if existing.id() == bid.id() => {
                    return Placement::Replaced(mem::replace(existing, bid));
                }
                Some(Slot::Occupied { .. }) => {}
            }
            index = self.next_index(index);
        }

        let Some(index) = open else {
            return Placement::Full(bid);
        };
        let Some(slot) = self.slots.get_mut(index) else {
            return Placement::Full(bid);
        };
        *slot = Slot::Occupied { bid, key, home };
        self.occupancy = self.occupancy.saturating_add(1);
        Placement::Inserted { index }
    }

    /// Finds the slot holding `id`.
    ///
    /// Stops at the first empty slot or after visiting every slot once.
    fn find_index(&self, id: &str, key: u64) -> Option<usize> {
        let mut index = self.get_index(key);

        for _ in 0..self.slots.len() {
            match self.slots.get(index)? {
                Slot::Empty => return None,
                Slot::Occupied { bid, .. } if bid.id() == id => return Some(index),
                Slot::Released | Slot::Occupied { .. } => {}
            }
            index = self.next_index(index);
        }

        None
    }

    /// Returns a copy of the bid stored under `id`
    ///
    /// # Errors
    ///
    /// Returns [`TableError::MalformedKey`] or [`TableError::NonCanonicalKey`] for an id that is
    /// not a non-negative integer in canonical form, and
    /// [`TableError::NotFound`] if no bid carries it.
    pub fn search(&self, id: &str) -> Result<Bid, TableError> {
        let key = parse_key(id)?;
        self.find_index(id, key)
            .and_then(|index| self.slots.get(index))
            .and_then(Slot::bid)
            .cloned()
            .ok_or_else(|| TableError::NotFound { id: id.to_string() })
    }

    /// Returns true if a bid with this id is stored
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        parse_key(id).is_ok_and(|key| self.find_index(id, key).is_some())
    }

    /// Removes the bid stored under `id` and returns it, leaving a tombstone in its slot
    ///
    /// # Errors
    ///
    /// Returns [`TableError::MalformedKey`] or [`TableError::NonCanonicalKey`] for an id that is
    /// not a non-negative integer in canonical form, and
    /// [`TableError::NotFound`] if no bid carries it. Neither case modifies the table.
    pub fn remove(&mut self, id: &str) -> Result<Bid, TableError> {
        let key = parse_key(id)?;

        let Some(slot) = self.find_index(id, key).and_then(|index| self.slots.get_mut(index))
        else {
            warn!("removal failed, bid id {id} not found");
            return Err(TableError::NotFound { id: id.to_string() });
        };

        match mem::replace(slot, Slot::Released) {
            Slot::Occupied { bid, .. } => {
                self.occupancy = self.occupancy.saturating_sub(1);
                debug!("removed bid {id}");
                Ok(bid)
            }
            other => {
                *slot = other;
                Err(TableError::NotFound { id: id.to_string() })
            }
        }
    }

    /// Rebuilds the table with the first prime capacity at least twice the current one.
    ///
    /// Live records are re-placed from scratch under the new capacity; tombstones are dropped.
    fn resize(&mut self) {
        let old_capacity = self.slots.len();
        let new_capacity = next_prime(old_capacity.saturating_mul(2));
        let old_slots = mem::replace(&mut self.slots, vec![Slot::Empty; new_capacity]);
        self.occupancy = 0;

        for slot in old_slots {
            if let Slot::Occupied { bid, key, .. } = slot {
                if let Some(duplicate) = self.insert_keyed(key, bid) {
                    warn!("bid {} was stored twice, keeping the later copy", duplicate.id());
                }
            }
        }

        debug!(
            "resized bid table from {old_capacity} to {new_capacity} slots, moved {} bids",
            self.occupancy
        );
    }

    /// Returns the number of stored bids
    #[must_use]
    pub fn len(&self) -> usize {
        self.occupancy
    }

    /// Returns true if no bids are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occupancy == 0
    }

    /// Returns the number of slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of tombstones
    #[must_use]
    pub fn tombstones(&self) -> usize {
        self.slots.iter().filter(|slot| matches!(slot, Slot::Released)).count()
    }

    /// Returns the current load factor
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.occupancy as f64 / self.slots.len().max(1) as f64
    }

    /// Returns the proactive growth threshold
    #[must_use]
    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    /// Sets the proactive growth threshold, clamped to `[0.05, 1.0]`
    pub fn set_max_load_factor(&mut self, load_factor: f64) {
        self.max_load_factor = clamp_load_factor(load_factor);
    }

    /// Drops every bid and tombstone, keeping the capacity
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = Slot::Empty;
        }
        self.occupancy = 0;
    }

    /// Returns an iterator over `(home slot, bid)` pairs in slot order
    ///
    /// The bids are borrowed from the table, which stays immutably borrowed while the iterator
    /// lives, so no insert can resize the slots out from under it.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter { slots: self.slots.iter() }
    }

    /// Writes every stored bid to `out`, one line each, in slot order
    ///
    /// # Errors
    ///
    /// Returns any error raised by the writer.
    pub fn print_all<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (home, bid) in self {
            writeln!(
                out,
                "Key: {home} || bidID: {} || title: {} || amount: {} || fund: {}",
                bid.id(),
                bid.title(),
                bid.amount(),
                bid.fund()
            )?;
        }
        Ok(())
    }

    /// Measures tombstones and probe displacement across the table
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn stats(&self) -> ProbeStats {
        let capacity = self.slots.len();
        let mut tombstones: usize = 0;
        let mut total_displacement: usize = 0;
        let mut max_displacement: usize = 0;

        for (index, slot) in self.slots.iter().enumerate() {
            match slot {
                Slot::Released => tombstones = tombstones.saturating_add(1),
                Slot::Occupied { home, .. } => {
                    let displacement = if index >= *home {
                        index.saturating_sub(*home)
                    } else {
                        capacity.saturating_sub(*home).saturating_add(index)
                    };
                    total_displacement = total_displacement.saturating_add(displacement);
                    max_displacement = max_displacement.max(displacement);
                }
                Slot::Empty => {}
            }
        }

        let mean_displacement = if self.occupancy == 0 {
            0.0
        } else {
            total_displacement as f64 / self.occupancy as f64
        };

        ProbeStats {
            capacity,
            occupancy: self.occupancy,
            tombstones,
            load_factor: self.load_factor(),
            mean_displacement,
            max_displacement,
        }
    }

    /// Returns `(slot index, home slot)` of a stored id
    #[cfg(test)]
    fn position(&self, id: &str) -> Option<(usize, usize)> {
        let key = parse_key(id).ok()?;
        let index = self.find_index(id, key)?;
        match self.slots.get(index)? {
            Slot::Occupied { home, .. } => Some((index, *home)),
            Slot::Empty | Slot::Released => None,
        }
    }

    /// Returns true if the slot at `index` is a tombstone
    #[cfg(test)]
    fn is_released(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Slot::Released))
    }
}

/// Iterator over the bids of a [`BidTable`] in slot order
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    /// Remaining slots
    slots: slice::Iter<'a, Slot>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (usize, &'a Bid);

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.find_map(|slot| match slot {
            Slot::Occupied { bid, home, .. } => Some((*home, bid)),
            Slot::Empty | Slot::Released => None,
        })
    }
}

impl<'a> IntoIterator for &'a BidTable {
    type Item = (usize, &'a Bid);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
