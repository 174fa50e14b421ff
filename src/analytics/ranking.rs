//! Top/bottom ranking of entities by period change.
//!
//! Ordering rule shared by every ranking: the top order sorts by value
//! descending with a stable sort, so ties keep the input (entity identifier)
//! order; the bottom order is the exact reverse of the full top order.

use rust_decimal::Decimal;
use serde::Serialize;

use super::matrix::ValueMatrix;
use super::summary::PeriodSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub entity: String,
    pub value: Decimal,
}

/// Period change of a single entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityChange {
    pub entity: String,
    pub summary: PeriodSummary,
}

/// Rank `values` and keep at most `n` entries.
pub fn rank(values: &[(String, Decimal)], n: usize, direction: Direction) -> Vec<RankedEntry> {
    let mut ordered: Vec<&(String, Decimal)> = values.iter().collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1));
    if direction == Direction::Bottom {
        ordered.reverse();
    }

    ordered
        .into_iter()
        .take(n)
        .map(|(entity, value)| RankedEntry {
            entity: entity.clone(),
            value: *value,
        })
        .collect()
}

/// First-row to last-row change of every entity, in column order
pub fn entity_changes(matrix: &ValueMatrix) -> Vec<EntityChange> {
    let (Some(first), Some(last)) = (matrix.rows().first(), matrix.rows().last()) else {
        return Vec::new();
    };

    matrix
        .entities()
        .iter()
        .zip(first.iter().zip(last))
        .map(|(entity, (start, end))| EntityChange {
            entity: entity.clone(),
            summary: PeriodSummary::between(*start, *end),
        })
        .collect()
}

/// The four top/bottom lists of a family
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Rankings {
    pub top_by_amount: Vec<RankedEntry>,
    pub bottom_by_amount: Vec<RankedEntry>,
    pub top_by_percent: Vec<RankedEntry>,
    pub bottom_by_percent: Vec<RankedEntry>,
}

impl Rankings {
    /// Entities with a zero starting value are left out of the percentage
    /// lists; they still rank by amount.
    pub fn from_changes(changes: &[EntityChange], n: usize) -> Self {
        let by_amount: Vec<(String, Decimal)> = changes
            .iter()
            .map(|c| (c.entity.clone(), c.summary.change_absolute))
            .collect();
        let by_percent: Vec<(String, Decimal)> = changes
            .iter()
            .filter_map(|c| {
                c.summary
                    .percent_if_defined()
                    .map(|pct| (c.entity.clone(), pct))
            })
            .collect();

        Self {
            top_by_amount: rank(&by_amount, n, Direction::Top),
            bottom_by_amount: rank(&by_amount, n, Direction::Bottom),
            top_by_percent: rank(&by_percent, n, Direction::Top),
            bottom_by_percent: rank(&by_percent, n, Direction::Bottom),
        }
    }
}
