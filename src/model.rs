use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use uuid::Uuid;

/// Wire format for times of day.
pub const TIME_FORMAT: &str = "%H:%M";

/// Minute-resolution time of day, stored as minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const fn from_hm(hour: u8, minute: u8) -> Self {
        debug_assert!(hour < 24 && minute < 60);
        Self(hour as u16 * 60 + minute as u16)
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u8 {
        (self.0 / 60) as u8
    }

    pub fn minute(self) -> u8 {
        (self.0 % 60) as u8
    }

    /// Exclusive end of the window anchored here. May run past midnight;
    /// it is only ever compared, never wrapped back into a `TimeOfDay`.
    pub fn window_end(self, window_minutes: u16) -> u16 {
        self.0 + window_minutes
    }

    /// True if `other` falls in `[self, self + window_minutes)`.
    pub fn window_contains(self, window_minutes: u16, other: TimeOfDay) -> bool {
        self <= other && other.0 < self.window_end(window_minutes)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl From<NaiveTime> for TimeOfDay {
    /// Seconds and below are dropped.
    fn from(t: NaiveTime) -> Self {
        Self::from_hm(t.hour() as u8, t.minute() as u8)
    }
}

/// Parses exactly `HH:MM` (24-hour, zero-padded).
impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(TimeParseError::Empty);
        }
        // chrono accepts single-digit fields for %H/%M; the wire format doesn't.
        let b = s.as_bytes();
        let shape_ok = b.len() == 5
            && b[2] == b':'
            && [b[0], b[1], b[3], b[4]].iter().all(u8::is_ascii_digit);
        if !shape_ok {
            return Err(TimeParseError::Format(s.to_string()));
        }
        NaiveTime::parse_from_str(s, TIME_FORMAT)
            .map(TimeOfDay::from)
            .map_err(|_| TimeParseError::Format(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    Empty,
    Format(String),
}

impl fmt::Display for TimeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeParseError::Empty => write!(f, "Booking time cannot be empty."),
            TimeParseError::Format(_) => write!(
                f,
                "Invalid time format. Expected format is 'HH:mm' (e.g., '09:30')."
            ),
        }
    }
}

impl std::error::Error for TimeParseError {}

/// A requested reservation. Built per request, consumed by admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub time: TimeOfDay,
    pub name: String,
}

impl Booking {
    pub fn new(time: TimeOfDay, name: impl Into<String>) -> Self {
        Self {
            time,
            name: name.into(),
        }
    }
}

/// A booking that passed admission, with the id assigned at that moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedBooking {
    pub id: Uuid,
    pub booking: Booking,
}

impl AcceptedBooking {
    pub fn time(&self) -> TimeOfDay {
        self.booking.time
    }

    pub fn name(&self) -> &str {
        &self.booking.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_of_day_basics() {
        let t = TimeOfDay::from_hm(10, 30);
        assert_eq!(t.minutes(), 630);
        assert_eq!(t.hour(), 10);
        assert_eq!(t.minute(), 30);
        assert_eq!(t.to_string(), "10:30");
        assert_eq!(TimeOfDay::from_hm(9, 5).to_string(), "09:05");
    }

    #[test]
    fn window_is_half_open() {
        let ten = TimeOfDay::from_hm(10, 0);
        assert!(ten.window_contains(60, ten));
        assert!(ten.window_contains(60, TimeOfDay::from_hm(10, 59)));
        assert!(!ten.window_contains(60, TimeOfDay::from_hm(11, 0))); // end exclusive
        assert!(!ten.window_contains(60, TimeOfDay::from_hm(9, 59)));
    }

    #[test]
    fn window_end_does_not_wrap() {
        let late = TimeOfDay::from_hm(23, 30);
        assert_eq!(late.window_end(60), 24 * 60 + 30);
        assert!(late.window_contains(60, TimeOfDay::from_hm(23, 59)));
        assert!(!late.window_contains(60, TimeOfDay::from_hm(0, 10)));
    }

    #[test]
    fn parse_valid_times() {
        assert_eq!("09:30".parse::<TimeOfDay>().unwrap(), TimeOfDay::from_hm(9, 30));
        assert_eq!("16:00".parse::<TimeOfDay>().unwrap(), TimeOfDay::from_hm(16, 0));
        assert_eq!("00:00".parse::<TimeOfDay>().unwrap(), TimeOfDay::from_hm(0, 0));
        assert_eq!("23:59".parse::<TimeOfDay>().unwrap(), TimeOfDay::from_hm(23, 59));
    }

    #[test]
    fn parse_rejects_empty() {
        assert_eq!("".parse::<TimeOfDay>(), Err(TimeParseError::Empty));
        assert_eq!("   ".parse::<TimeOfDay>(), Err(TimeParseError::Empty));
    }

    #[test]
    fn parse_rejects_bad_shapes() {
        for bad in ["9:30", "09:3", "0930", "09:30:00", "24:00", "12:60", "ab:cd", "09-30", " 09:30"] {
            assert!(
                matches!(bad.parse::<TimeOfDay>(), Err(TimeParseError::Format(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn parse_error_messages() {
        assert_eq!(TimeParseError::Empty.to_string(), "Booking time cannot be empty.");
        assert_eq!(
            TimeParseError::Format("x".into()).to_string(),
            "Invalid time format. Expected format is 'HH:mm' (e.g., '09:30')."
        );
    }

    #[test]
    fn from_naive_time_truncates_seconds() {
        let t = NaiveTime::from_hms_opt(10, 15, 42).unwrap();
        assert_eq!(TimeOfDay::from(t), TimeOfDay::from_hm(10, 15));
    }

    #[test]
    fn accepted_booking_accessors() {
        let accepted = AcceptedBooking {
            id: Uuid::new_v4(),
            booking: Booking::new(TimeOfDay::from_hm(11, 0), "Alice"),
        };
        assert_eq!(accepted.time(), TimeOfDay::from_hm(11, 0));
        assert_eq!(accepted.name(), "Alice");
        assert_ne!(accepted.id, Uuid::nil());
    }
}
