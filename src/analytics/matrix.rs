//! Time-series assembly
//!
//! Turns a flat list of `(date, entity, value)` observations into a dense
//! [`ValueMatrix`]: one row per date actually present, one column per entity,
//! every cell defined. A (date, entity) pair with no observation is 0, not
//! the previous value: no record means no holding on that day.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// A single recorded value of one entity on one day
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub entity: String,
    pub value: Decimal,
}

impl Observation {
    pub fn new(date: NaiveDate, entity: impl Into<String>, value: Decimal) -> Self {
        Self {
            date,
            entity: entity.into(),
            value,
        }
    }
}

/// Dense date × entity table.
///
/// Dates are ascending and unique, entities are sorted by identifier, and
/// `values[row][col]` is always defined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueMatrix {
    dates: Vec<NaiveDate>,
    entities: Vec<String>,
    values: Vec<Vec<Decimal>>,
}

impl ValueMatrix {
    /// Build a matrix sharing the row/column axes of `self` with new cells.
    pub(crate) fn with_values(&self, values: Vec<Vec<Decimal>>) -> Self {
        debug_assert_eq!(values.len(), self.dates.len());
        Self {
            dates: self.dates.clone(),
            entities: self.entities.clone(),
            values,
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    pub fn rows(&self) -> &[Vec<Decimal>] {
        &self.values
    }

    pub fn row(&self, idx: usize) -> Option<&[Decimal]> {
        self.values.get(idx).map(|r| r.as_slice())
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn entity_index(&self, entity: &str) -> Option<usize> {
        self.entities.binary_search_by(|e| e.as_str().cmp(entity)).ok()
    }

    pub fn value(&self, date: NaiveDate, entity: &str) -> Option<Decimal> {
        let row = self.dates.binary_search(&date).ok()?;
        let col = self.entity_index(entity)?;
        Some(self.values[row][col])
    }

    /// All values of one entity, in date order
    pub fn column(&self, entity: &str) -> Option<Vec<Decimal>> {
        let col = self.entity_index(entity)?;
        Some(self.values.iter().map(|row| row[col]).collect())
    }

    /// Sum of every row, as a date-indexed series. A sum that overflows is 0.
    pub fn row_totals(&self) -> DailySeries {
        self.dates
            .iter()
            .zip(&self.values)
            .map(|(date, row)| {
                let total = row
                    .iter()
                    .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
                    .unwrap_or(Decimal::ZERO);
                (*date, total)
            })
            .collect()
    }
}

/// Values keyed by date, ascending
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailySeries(BTreeMap<NaiveDate, Decimal>);

impl DailySeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(dates: &[NaiveDate], values: &[Decimal]) -> Self {
        dates.iter().copied().zip(values.iter().copied()).collect()
    }

    pub fn insert(&mut self, date: NaiveDate, value: Decimal) {
        self.0.insert(date, value);
    }

    pub fn get(&self, date: &NaiveDate) -> Option<Decimal> {
        self.0.get(date).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = &NaiveDate> {
        self.0.keys()
    }

    pub fn values(&self) -> Vec<Decimal> {
        self.0.values().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, Decimal)> + '_ {
        self.0.iter().map(|(d, v)| (*d, *v))
    }
}

impl FromIterator<(NaiveDate, Decimal)> for DailySeries {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, Decimal)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Assemble observations within `[start, end]` into a dense matrix.
///
/// Returns `None` when no observation falls in the range.
pub fn assemble(
    observations: &[Observation],
    start: NaiveDate,
    end: NaiveDate,
) -> Option<ValueMatrix> {
    assemble_with_columns(observations, start, end, &[])
}

/// Like [`assemble`], but `columns` are always present even when they have
/// no observation in the range (full zero column).
pub fn assemble_with_columns(
    observations: &[Observation],
    start: NaiveDate,
    end: NaiveDate,
    columns: &[&str],
) -> Option<ValueMatrix> {
    let in_range: Vec<&Observation> = observations
        .iter()
        .filter(|o| o.date >= start && o.date <= end)
        .collect();

    if in_range.is_empty() {
        return None;
    }

    let dates: Vec<NaiveDate> = in_range
        .iter()
        .map(|o| o.date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let entities: Vec<String> = in_range
        .iter()
        .map(|o| o.entity.as_str())
        .chain(columns.iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut values = vec![vec![Decimal::ZERO; entities.len()]; dates.len()];
    let mut seen: BTreeSet<(usize, usize)> = BTreeSet::new();

    for obs in in_range {
        // Both lookups hit: the axes were built from these observations
        let (Ok(row), Ok(col)) = (
            dates.binary_search(&obs.date),
            entities.binary_search_by(|e| e.as_str().cmp(obs.entity.as_str())),
        ) else {
            continue;
        };

        if !seen.insert((row, col)) {
            warn!(
                "Duplicate value for {} on {}; keeping the later one",
                obs.entity, obs.date
            );
        }
        values[row][col] = obs.value;
    }

    Some(ValueMatrix {
        dates,
        entities,
        values,
    })
}
