// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Per-call reference tables.
//!
//! Reference ids resolve shared and cyclic record identity within exactly one
//! encode or decode pass; no id is meaningful across messages. The decode-side
//! table maps wire ids to arena slots and is populated at record-header time,
//! before fields are read, so a record can reference itself. The encode-side
//! table assigns ids in encounter order, keyed by record identity (the arena
//! slot), never by value.

use std::collections::HashMap;

use crate::core::RecordId;

/// Decode-side table: wire reference id -> record slot.
#[derive(Debug, Default)]
pub struct ReferenceTable {
    entries: HashMap<i32, RecordId>,
}

impl ReferenceTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a slot under a wire id. Called exactly once per record, at
    /// header-read time; a repeated id overwrites (last write wins).
    pub fn insert(&mut self, reference: i32, id: RecordId) {
        self.entries.insert(reference, id);
    }

    /// Look up a wire id. Never mutates the table.
    pub fn resolve(&self, reference: i32) -> Option<RecordId> {
        self.entries.get(&reference).copied()
    }

    /// Number of registered references.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Encode-side table: record slot -> wire reference id, assigned in encounter
/// order during the graph walk.
#[derive(Debug, Default)]
pub struct ReferenceAssigner {
    assigned: HashMap<RecordId, i32>,
    next: i32,
}

impl ReferenceAssigner {
    /// Create an empty assigner; the first record gets id 1.
    pub fn new() -> Self {
        Self {
            assigned: HashMap::new(),
            next: 1,
        }
    }

    /// The wire id already assigned to a slot, if any.
    pub fn existing(&self, id: RecordId) -> Option<i32> {
        self.assigned.get(&id).copied()
    }

    /// Assign the next wire id to a slot. The slot must not already have one.
    pub fn assign(&mut self, id: RecordId) -> i32 {
        let reference = self.next;
        self.next += 1;
        self.assigned.insert(id, reference);
        reference
    }

    /// Number of assigned references.
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    /// Check whether nothing has been assigned yet.
    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}
