//! Ordered event table with id and name indices.
//!
//! Rows keep insertion order. Both indices are rebuilt after every structural
//! change, so they can never disagree with `rows`.

use std::collections::HashMap;

use m2l_common::{Error, EventId, EventRecord, Result};

/// Outcome of an upsert.
#[derive(Debug, Clone, PartialEq)]
pub enum Insertion<R> {
    /// Appended as a new row.
    Inserted,
    /// Replaced the row with the same name, which is returned.
    Replaced { previous: R },
}

impl<R> Insertion<R> {
    pub fn is_replaced(&self) -> bool {
        matches!(self, Insertion::Replaced { .. })
    }
}

/// Rows of one record type plus lookup indices.
#[derive(Debug, Clone)]
pub struct EventTable<R> {
    rows: Vec<R>,
    by_id: HashMap<EventId, usize>,
    by_name: HashMap<String, usize>,
}

impl<R> Default for EventTable<R> {
    fn default() -> Self {
        EventTable {
            rows: Vec::new(),
            by_id: HashMap::new(),
            by_name: HashMap::new(),
        }
    }
}

impl<R: EventRecord> EventTable<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    pub fn contains_id(&self, id: EventId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn get_by_id(&self, id: EventId) -> Option<&R> {
        self.by_id.get(&id).map(|&i| &self.rows[i])
    }

    pub fn get_by_name(&self, name: &str) -> Option<&R> {
        self.by_name.get(name).map(|&i| &self.rows[i])
    }

    /// Insert, or replace the row with the same name.
    ///
    /// Fails without touching the table if the record breaks a column
    /// invariant or its id belongs to a row with a different name.
    pub fn upsert(&mut self, record: R) -> Result<Insertion<R>> {
        record.validate()?;
        let name_slot = self.by_name.get(record.name()).copied();
        if let Some(&id_slot) = self.by_id.get(&record.event_id()) {
            if Some(id_slot) != name_slot {
                return Err(Error::DuplicateEventId {
                    table: R::TABLE,
                    event_id: record.event_id(),
                });
            }
        }

        match name_slot {
            Some(i) => {
                let previous = std::mem::replace(&mut self.rows[i], record);
                self.reindex();
                Ok(Insertion::Replaced { previous })
            }
            None => {
                let i = self.rows.len();
                self.by_id.insert(record.event_id(), i);
                self.by_name.insert(record.name().to_string(), i);
                self.rows.push(record);
                Ok(Insertion::Inserted)
            }
        }
    }

    /// Remove every row matching `pred`, returning them in table order.
    pub fn remove_where<F>(&mut self, mut pred: F) -> Vec<R>
    where
        F: FnMut(&R) -> bool,
    {
        if !self.rows.iter().any(&mut pred) {
            return Vec::new();
        }
        let (removed, kept): (Vec<R>, Vec<R>) = self.rows.drain(..).partition(|r| pred(r));
        self.rows = kept;
        self.reindex();
        removed
    }

    pub fn remove_by_name(&mut self, name: &str) -> Vec<R> {
        self.remove_where(|r| r.name() == name)
    }

    pub fn remove_by_id(&mut self, id: EventId) -> Vec<R> {
        self.remove_where(|r| r.event_id() == id)
    }

    /// Apply `f` to every row. Key columns must not be changed by `f`.
    pub(crate) fn update_each<F>(&mut self, f: F)
    where
        F: FnMut(&mut R),
    {
        self.rows.iter_mut().for_each(f);
        debug_assert!(self.indices_consistent());
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.by_id.clear();
        self.by_name.clear();
    }

    fn reindex(&mut self) {
        self.by_id.clear();
        self.by_name.clear();
        for (i, row) in self.rows.iter().enumerate() {
            self.by_id.insert(row.event_id(), i);
            self.by_name.insert(row.name().to_string(), i);
        }
    }

    fn indices_consistent(&self) -> bool {
        self.by_id.len() == self.rows.len()
            && self.by_name.len() == self.rows.len()
            && self
                .rows
                .iter()
                .enumerate()
                .all(|(i, r)| self.by_id.get(&r.event_id()) == Some(&i))
    }
}

impl<'a, R> IntoIterator for &'a EventTable<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
