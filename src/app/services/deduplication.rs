//! Duplicate suppression over parsed records
//!
//! [`SeenValues`] remembers, per field, every value it has let through. The
//! cache belongs to the caller: one cache per logical session, shared by as
//! many filtering passes as needed, and never reset behind the caller's back.

use std::collections::{HashMap, HashSet};
use tracing::trace;

use crate::app::models::{Field, Record, Value};

/// Values already yielded, per field
#[derive(Debug, Clone, Default)]
pub struct SeenValues {
    seen: HashMap<Field, HashSet<Value>>,
}

impl SeenValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lazily yield only records whose value at `field` is new to this cache
    ///
    /// Records that have no value at `field` pass through unchanged.
    pub fn filter<I>(
        &mut self,
        records: I,
        field: impl Into<Field>,
    ) -> UniqueRecords<'_, I::IntoIter>
    where
        I: IntoIterator<Item = Record>,
    {
        let field = field.into();
        let seen = self.seen.entry(field.clone()).or_default();
        UniqueRecords {
            records: records.into_iter(),
            field,
            seen,
        }
    }

    /// Remember `value` for `field`; true if it had not been seen before
    pub fn insert(&mut self, field: &Field, value: &Value) -> bool {
        self.seen
            .entry(field.clone())
            .or_default()
            .insert(value.clone())
    }

    pub fn contains(&self, field: &Field, value: &Value) -> bool {
        self.seen
            .get(field)
            .is_some_and(|values| values.contains(value))
    }

    /// Number of distinct values seen for `field`
    pub fn seen_count(&self, field: &Field) -> usize {
        self.seen.get(field).map_or(0, HashSet::len)
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.seen.clear();
    }
}

/// Iterator returned by [`SeenValues::filter`]
#[derive(Debug)]
pub struct UniqueRecords<'a, I> {
    records: I,
    field: Field,
    seen: &'a mut HashSet<Value>,
}

impl<I> Iterator for UniqueRecords<'_, I>
where
    I: Iterator<Item = Record>,
{
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        loop {
            let record = self.records.next()?;
            match record.get_field(&self.field) {
                None => return Some(record),
                Some(value) if self.seen.insert(value.clone()) => return Some(record),
                Some(value) => trace!("Dropping duplicate {} = {}", self.field, value),
            }
        }
    }
}
