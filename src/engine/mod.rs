mod conflict;
mod error;
mod store;

pub use conflict::peak_window_load;
pub use error::EngineError;
pub(crate) use store::BookingStore;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::limits::*;
use crate::model::*;
use crate::observability;

use conflict::check_capacity;

/// Admission controller. Owns the booking store and serializes every
/// read-check-insert behind the store's write lock.
///
/// Inputs are assumed validated (time in range, non-empty name); that happens
/// at the boundary. The engine does not log; it only publishes the
/// active-bookings gauge.
pub struct Engine {
    store: RwLock<BookingStore>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// An engine with no bookings. Bookings only ever enter through
    /// [`Engine::create_booking`].
    pub fn new() -> Self {
        Self {
            store: RwLock::new(BookingStore::new()),
        }
    }

    /// Admit `booking` if no one-hour window would exceed
    /// [`MAX_SIMULTANEOUS_BOOKINGS`], and commit it with a fresh id.
    /// On conflict nothing is stored.
    pub fn create_booking(&self, booking: Booking) -> Result<AcceptedBooking, EngineError> {
        // Held across read, check and insert so concurrent admissions can't
        // both pass against the same stale view.
        let mut store = self.store.write();
        check_capacity(
            &store.times(),
            booking.time,
            MAX_SIMULTANEOUS_BOOKINGS,
            WINDOW_MINUTES,
        )?;
        let accepted = AcceptedBooking {
            id: Uuid::new_v4(),
            booking,
        };
        store.insert(accepted.clone());
        // Set under the lock so concurrent admissions publish in commit order.
        observability::set_active_bookings(store.len());
        Ok(accepted)
    }

    /// All accepted bookings, ascending by time (ties in admission order).
    pub fn list_bookings(&self) -> Vec<AcceptedBooking> {
        self.store.read().list()
    }

    pub fn booking_count(&self) -> usize {
        self.store.read().len()
    }
}
