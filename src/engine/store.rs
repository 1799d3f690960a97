use crate::model::*;

/// Accepted bookings, kept sorted by time; equal times stay in insertion order.
///
/// Not synchronized. `Engine` holds it behind a lock and is the only writer.
#[derive(Debug, Default)]
pub struct BookingStore {
    bookings: Vec<AcceptedBooking>,
}

impl BookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    /// Snapshot of all bookings, ascending by time.
    pub fn list(&self) -> Vec<AcceptedBooking> {
        self.bookings.clone()
    }

    /// Booking times in store order (already sorted).
    pub fn times(&self) -> Vec<TimeOfDay> {
        self.bookings.iter().map(AcceptedBooking::time).collect()
    }

    /// Unconditional insert. Capacity is the caller's concern.
    pub fn insert(&mut self, booking: AcceptedBooking) {
        // After every existing entry with the same time, so ties keep arrival order.
        let pos = self
            .bookings
            .partition_point(|b| b.time() <= booking.time());
        self.bookings.insert(pos, booking);
    }
}
