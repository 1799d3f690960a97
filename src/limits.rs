use crate::model::TimeOfDay;

/// Max bookings allowed inside any one-hour window. A 4th is accepted, a 5th rejected.
pub const MAX_SIMULTANEOUS_BOOKINGS: usize = 4;

/// Length of the sliding window `[t, t + WINDOW_MINUTES)`.
pub const WINDOW_MINUTES: u16 = 60;

/// Earliest bookable time (inclusive).
pub const OPENING_TIME: TimeOfDay = TimeOfDay::from_hm(9, 0);

/// Latest bookable time (inclusive).
pub const CLOSING_TIME: TimeOfDay = TimeOfDay::from_hm(16, 0);

pub const MAX_NAME_LEN: usize = 256;
