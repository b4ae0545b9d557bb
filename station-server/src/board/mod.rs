//! The day-scoped arrivals board.
//!
//! Owns the working set of today's trains, derived from the master
//! schedule and replaced wholesale on day rollover. Enrichment results
//! merge into the working set; consumers read time-windowed projections
//! computed on demand.

mod project;
mod roster;

pub use project::{ProjectedTrain, project_window};
pub use roster::TodayBoard;
