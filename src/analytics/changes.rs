//! Daily change computation over an assembled [`ValueMatrix`].
//!
//! Deltas are first differences with the first row defined as 0. Percentage
//! deltas use the previous row as baseline; the first row, a zero baseline,
//! and a division or multiplication that overflows `Decimal` all yield 0.

use rust_decimal::Decimal;
use serde::Serialize;

use super::matrix::{DailySeries, ValueMatrix};

/// Derived change series for one entity family
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeSet {
    /// `entity_delta[i][e] = matrix[i][e] - matrix[i-1][e]`, row 0 is 0
    pub entity_delta: ValueMatrix,
    /// Daily percentage change per entity, guarded
    pub entity_pct_delta: ValueMatrix,
    /// Sum of every entity per date
    pub row_total: DailySeries,
    pub row_total_delta: DailySeries,
    pub row_total_pct_delta: DailySeries,
}

/// `delta / base * 100`, or 0 when the baseline is zero or the result
/// cannot be represented.
pub fn percent_change(delta: Decimal, base: Decimal) -> Decimal {
    if base.is_zero() {
        return Decimal::ZERO;
    }
    delta
        .checked_div(base)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

/// Same-length first differences, first element 0
pub fn first_differences(series: &[Decimal]) -> Vec<Decimal> {
    let mut out = Vec::with_capacity(series.len());
    if let Some(first) = series.first() {
        out.push(Decimal::ZERO);
        let mut prev = *first;
        for value in &series[1..] {
            out.push(value.checked_sub(prev).unwrap_or(Decimal::ZERO));
            prev = *value;
        }
    }
    out
}

/// Same-length guarded percentage changes against the previous element
pub fn percent_changes(series: &[Decimal]) -> Vec<Decimal> {
    let mut out = Vec::with_capacity(series.len());
    if !series.is_empty() {
        out.push(Decimal::ZERO);
        for pair in series.windows(2) {
            let delta = pair[1].checked_sub(pair[0]).unwrap_or(Decimal::ZERO);
            out.push(percent_change(delta, pair[0]));
        }
    }
    out
}

/// Compute per-entity and total daily changes for a matrix
pub fn compute_changes(matrix: &ValueMatrix) -> ChangeSet {
    let rows = matrix.rows();
    let width = matrix.entities().len();

    let mut deltas = Vec::with_capacity(rows.len());
    let mut pcts = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        if i == 0 {
            deltas.push(vec![Decimal::ZERO; width]);
            pcts.push(vec![Decimal::ZERO; width]);
            continue;
        }
        let prev = &rows[i - 1];
        let delta_row: Vec<Decimal> = row
            .iter()
            .zip(prev)
            .map(|(cur, base)| cur.checked_sub(*base).unwrap_or(Decimal::ZERO))
            .collect();
        let pct_row: Vec<Decimal> = delta_row
            .iter()
            .zip(prev)
            .map(|(delta, base)| percent_change(*delta, *base))
            .collect();
        deltas.push(delta_row);
        pcts.push(pct_row);
    }

    let row_total = matrix.row_totals();
    let totals = row_total.values();
    let row_total_delta = DailySeries::from_parts(matrix.dates(), &first_differences(&totals));
    let row_total_pct_delta = DailySeries::from_parts(matrix.dates(), &percent_changes(&totals));

    ChangeSet {
        entity_delta: matrix.with_values(deltas),
        entity_pct_delta: matrix.with_values(pcts),
        row_total,
        row_total_delta,
        row_total_pct_delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::matrix::{assemble, Observation};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn two_fund_matrix() -> ValueMatrix {
        let records = vec![
            Observation::new(d(1), "A", dec!(100)),
            Observation::new(d(2), "A", dec!(110)),
            Observation::new(d(1), "B", dec!(50)),
            Observation::new(d(2), "B", dec!(45)),
        ];
        assemble(&records, d(1), d(2)).unwrap()
    }

    #[test]
    fn test_two_fund_daily_changes() {
        let changes = compute_changes(&two_fund_matrix());

        assert_eq!(changes.row_total.values(), vec![dec!(150), dec!(155)]);
        assert_eq!(changes.row_total_delta.values(), vec![dec!(0), dec!(5)]);
        assert_eq!(
            changes.entity_pct_delta.value(d(2), "A"),
            Some(dec!(10))
        );
        assert_eq!(
            changes.entity_pct_delta.value(d(2), "B"),
            Some(dec!(-10))
        );
        assert_eq!(changes.entity_delta.value(d(2), "B"), Some(dec!(-5)));
    }

    #[test]
    fn test_first_row_is_zero() {
        let changes = compute_changes(&two_fund_matrix());
        assert!(changes.entity_delta.rows()[0].iter().all(|v| v.is_zero()));
        assert!(changes.entity_pct_delta.rows()[0].iter().all(|v| v.is_zero()));
        assert_eq!(changes.row_total_pct_delta.values()[0], Decimal::ZERO);
    }

    #[test]
    fn test_zero_baseline_yields_zero_percent() {
        let records = vec![
            Observation::new(d(1), "A", dec!(10)),
            Observation::new(d(2), "A", dec!(10)),
            Observation::new(d(2), "N", dec!(500)),
            Observation::new(d(3), "N", dec!(0)),
        ];
        let matrix = assemble(&records, d(1), d(3)).unwrap();
        let changes = compute_changes(&matrix);

        // N goes 0 -> 500: absolute change recorded, percentage stays 0
        assert_eq!(changes.entity_delta.value(d(2), "N"), Some(dec!(500)));
        assert_eq!(changes.entity_pct_delta.value(d(2), "N"), Some(dec!(0)));
        // A disappears on day 3 (zero-filled): full loss
        assert_eq!(changes.entity_pct_delta.value(d(3), "A"), Some(dec!(-100)));
    }

    #[test]
    fn test_row_total_matches_row_sums() {
        let matrix = two_fund_matrix();
        let changes = compute_changes(&matrix);
        for (row, total) in matrix.rows().iter().zip(changes.row_total.values()) {
            assert_eq!(row.iter().copied().sum::<Decimal>(), total);
        }
    }

    #[test]
    fn test_percent_change_overflow_collapses_to_zero() {
        assert_eq!(percent_change(Decimal::MAX, dec!(0.0000001)), Decimal::ZERO);
        assert_eq!(percent_change(dec!(5), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(percent_change(dec!(1), dec!(4)), dec!(25));
    }

    #[test]
    fn test_huge_values_do_not_panic() {
        let records = vec![
            Observation::new(d(1), "A", Decimal::MAX),
            Observation::new(d(1), "B", Decimal::MAX),
            Observation::new(d(2), "A", -Decimal::MAX),
            Observation::new(d(2), "B", dec!(0)),
        ];
        let changes = compute_changes(&assemble(&records, d(1), d(2)).unwrap());

        assert_eq!(changes.row_total.values(), vec![dec!(0), -Decimal::MAX]);
        // MAX -> -MAX cannot be represented
        assert_eq!(changes.entity_delta.value(d(2), "A"), Some(dec!(0)));
        assert_eq!(changes.entity_delta.value(d(2), "B"), Some(-Decimal::MAX));
    }

    #[test]
    fn test_series_helpers_on_short_input() {
        assert!(first_differences(&[]).is_empty());
        assert!(percent_changes(&[]).is_empty());
        assert_eq!(first_differences(&[dec!(7)]), vec![dec!(0)]);
        assert_eq!(
            percent_changes(&[dec!(0), dec!(3), dec!(6)]),
            vec![dec!(0), dec!(0), dec!(100)]
        );
    }
}
