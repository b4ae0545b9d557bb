//! Master schedule access.
//!
//! The master schedule holds every train the station knows about, keyed
//! by the weekdays each train runs. The day roster pulls the rows for
//! the current weekday from here at startup and on day rollover.

mod error;
mod source;
mod sqlite;

pub use error::ScheduleError;
pub use source::{InMemorySchedule, ScheduleSource};
pub use sqlite::SqliteSchedule;
