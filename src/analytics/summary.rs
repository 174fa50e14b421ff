//! Period summaries from the first and last value of a series.

use rust_decimal::Decimal;
use serde::Serialize;

use super::changes::percent_change;

/// Net change over a period.
///
/// Computed from the first and last rows only, never by summing daily
/// deltas, so intermediate volatility does not affect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    pub start_value: Decimal,
    pub end_value: Decimal,
    pub change_absolute: Decimal,
    /// 0 when `start_value` is 0
    pub change_percent: Decimal,
}

impl PeriodSummary {
    pub fn between(start_value: Decimal, end_value: Decimal) -> Self {
        let change_absolute = end_value.checked_sub(start_value).unwrap_or(Decimal::ZERO);
        Self {
            start_value,
            end_value,
            change_absolute,
            change_percent: percent_change(change_absolute, start_value),
        }
    }

    /// The percentage change, or `None` when the baseline is zero and the
    /// percentage is therefore undefined.
    pub fn percent_if_defined(&self) -> Option<Decimal> {
        (!self.start_value.is_zero()).then_some(self.change_percent)
    }
}

/// Summarize a series; `None` for an empty series.
pub fn summarize(series: &[Decimal]) -> Option<PeriodSummary> {
    let start = *series.first()?;
    let end = *series.last()?;
    Some(PeriodSummary::between(start, end))
}
