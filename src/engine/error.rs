#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Admitting the booking would put more than `limit` bookings in some one-hour window.
    CapacityConflict { limit: usize },
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::CapacityConflict { limit } => write!(
                f,
                "Cannot create booking due to maximum ({limit}) simultaneous bookings reached."
            ),
        }
    }
}

impl std::error::Error for EngineError {}
