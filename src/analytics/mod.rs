// Analytics module - dense time series, daily changes, period summaries, rankings
//
// Everything here is a pure function of its inputs. The only I/O seam is the
// `RecordStore` trait consumed by `report::build_report`.

pub mod changes;
pub mod combine;
pub mod matrix;
pub mod ranking;
pub mod report;
pub mod summary;

pub use changes::{compute_changes, first_differences, percent_change, percent_changes, ChangeSet};
pub use combine::{combine, CombinedPortfolio, CombinedRow};
pub use matrix::{assemble, assemble_with_columns, DailySeries, Observation, ValueMatrix};
pub use ranking::{entity_changes, rank, Direction, EntityChange, RankedEntry, Rankings};
pub use report::{analyze_family, build_report, FamilyAnalysis, PortfolioReport};
pub use summary::{summarize, PeriodSummary};
