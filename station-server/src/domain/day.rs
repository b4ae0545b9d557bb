//! Weekday tags and run-day sets.
//!
//! The master schedule records which days a train runs as text built from
//! the literal tokens Sun, Mon, Tue, Wed, Thu, Fri, Sat (possibly
//! comma-joined). These types give that field a validated representation.

use std::fmt;

use chrono::{Datelike, Weekday};

/// Error returned when parsing an invalid weekday token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid weekday token: {token}")]
pub struct InvalidRunDay {
    token: String,
}

/// A weekday tag, Sun..Sat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RunDay {
    Sun = 0,
    Mon = 1,
    Tue = 2,
    Wed = 3,
    Thu = 4,
    Fri = 5,
    Sat = 6,
}

/// All weekdays in token order (Sun first, matching the schedule format).
pub const ALL_DAYS: [RunDay; 7] = [
    RunDay::Sun,
    RunDay::Mon,
    RunDay::Tue,
    RunDay::Wed,
    RunDay::Thu,
    RunDay::Fri,
    RunDay::Sat,
];

impl RunDay {
    /// The literal token used by the master schedule.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunDay::Sun => "Sun",
            RunDay::Mon => "Mon",
            RunDay::Tue => "Tue",
            RunDay::Wed => "Wed",
            RunDay::Thu => "Thu",
            RunDay::Fri => "Fri",
            RunDay::Sat => "Sat",
        }
    }

    /// Parse an exact weekday token.
    pub fn parse(s: &str) -> Result<Self, InvalidRunDay> {
        ALL_DAYS
            .iter()
            .copied()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| InvalidRunDay {
                token: s.to_string(),
            })
    }

    /// Convert from a chrono weekday.
    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sun => RunDay::Sun,
            Weekday::Mon => RunDay::Mon,
            Weekday::Tue => RunDay::Tue,
            Weekday::Wed => RunDay::Wed,
            Weekday::Thu => RunDay::Thu,
            Weekday::Fri => RunDay::Fri,
            Weekday::Sat => RunDay::Sat,
        }
    }

    /// The current weekday from the wall-clock date (local timezone).
    pub fn today() -> Self {
        Self::from_weekday(chrono::Local::now().weekday())
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for RunDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of weekdays on which a train runs.
///
/// Parsed from the schedule's textual `days` field by scanning for each
/// weekday token, so "Mon,Wed,Fri", "MonWedFri" and "Monday" all yield
/// the days they mention.
///
/// # Examples
///
/// ```
/// use station_server::domain::{DaySet, RunDay};
///
/// let days = DaySet::parse("Mon,Wed,Fri");
/// assert!(days.contains(RunDay::Wed));
/// assert!(!days.contains(RunDay::Sun));
/// assert_eq!(days.len(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DaySet(u8);

impl DaySet {
    /// The empty set.
    pub const EMPTY: DaySet = DaySet(0);

    /// The set containing every weekday.
    pub fn all() -> Self {
        ALL_DAYS.iter().copied().collect()
    }

    /// Parse a textual weekday-set field by token containment.
    ///
    /// Unknown text contributes nothing; a field mentioning no weekday
    /// token parses to the empty set (which callers reject).
    pub fn parse(text: &str) -> Self {
        let mut set = DaySet::EMPTY;
        for day in ALL_DAYS {
            if text.contains(day.as_str()) {
                set.insert(day);
            }
        }
        set
    }

    /// Add a day to the set.
    pub fn insert(&mut self, day: RunDay) {
        self.0 |= day.bit();
    }

    /// Whether the set contains the given day.
    pub fn contains(&self, day: RunDay) -> bool {
        self.0 & day.bit() != 0
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of days in the set.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate the days in token order.
    pub fn iter(&self) -> impl Iterator<Item = RunDay> + '_ {
        ALL_DAYS.into_iter().filter(|d| self.contains(*d))
    }
}

impl FromIterator<RunDay> for DaySet {
    fn from_iter<I: IntoIterator<Item = RunDay>>(iter: I) -> Self {
        let mut set = DaySet::EMPTY;
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl fmt::Display for DaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for day in self.iter() {
            if !first {
                f.write_str(",")?;
            }
            f.write_str(day.as_str())?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_exact_tokens() {
        assert_eq!(RunDay::parse("Sun").unwrap(), RunDay::Sun);
        assert_eq!(RunDay::parse("Sat").unwrap(), RunDay::Sat);
        assert!(RunDay::parse("sun").is_err());
        assert!(RunDay::parse("Sunday").is_err());
        assert!(RunDay::parse("").is_err());
    }

    #[test]
    fn from_weekday_matches_tokens() {
        assert_eq!(RunDay::from_weekday(Weekday::Sun), RunDay::Sun);
        assert_eq!(RunDay::from_weekday(Weekday::Mon), RunDay::Mon);
        assert_eq!(RunDay::from_weekday(Weekday::Sat), RunDay::Sat);
    }

    #[test]
    fn day_set_parse_comma_joined() {
        let set = DaySet::parse("Mon,Wed,Fri");
        assert_eq!(set.len(), 3);
        assert!(set.contains(RunDay::Mon));
        assert!(set.contains(RunDay::Wed));
        assert!(set.contains(RunDay::Fri));
        assert!(!set.contains(RunDay::Tue));
    }

    #[test]
    fn day_set_parse_substring_joined() {
        // The schedule sometimes stores day names without separators or as
        // full names; token containment covers both.
        assert_eq!(DaySet::parse("MonTueWed").len(), 3);
        assert!(DaySet::parse("Saturday").contains(RunDay::Sat));
    }

    #[test]
    fn day_set_parse_single_day() {
        let set = DaySet::parse("Sun");
        assert_eq!(set.len(), 1);
        assert!(set.contains(RunDay::Sun));
    }

    #[test]
    fn day_set_parse_unknown_text_is_empty() {
        assert!(DaySet::parse("never").is_empty());
        assert!(DaySet::parse("").is_empty());
    }

    #[test]
    fn day_set_all_and_display() {
        let all = DaySet::all();
        assert_eq!(all.len(), 7);
        assert_eq!(all.to_string(), "Sun,Mon,Tue,Wed,Thu,Fri,Sat");
        assert_eq!(DaySet::EMPTY.to_string(), "");
    }

    #[test]
    fn day_set_insert_and_iter() {
        let mut set = DaySet::EMPTY;
        set.insert(RunDay::Fri);
        set.insert(RunDay::Mon);
        let days: Vec<RunDay> = set.iter().collect();
        assert_eq!(days, vec![RunDay::Mon, RunDay::Fri]);
    }
}
