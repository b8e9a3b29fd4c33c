//! Configuration for the flight demo.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// Default seat capacity when `FLIGHT_SEAT_CAPACITY` is unset or invalid
pub const DEFAULT_SEAT_CAPACITY: u32 = 150;

/// Log filter used when `RUST_LOG` is unset or cannot be parsed
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Upper bound on the passengers the demo spawns for its booking race
pub const MAX_RACING_PASSENGERS: u32 = 1_000;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Seats on the flight the demo opens
    pub seat_capacity: u32,
    /// Log filter (trace, debug, info, warn, error, or a full `EnvFilter` directive)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `FLIGHT_SEAT_CAPACITY` must be a positive integer; anything else falls
    /// back to [`DEFAULT_SEAT_CAPACITY`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            seat_capacity: lookup("FLIGHT_SEAT_CAPACITY")
                .and_then(|s| s.trim().parse().ok())
                .filter(|capacity: &u32| *capacity > 0)
                .unwrap_or(DEFAULT_SEAT_CAPACITY),
            log_level: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }

    /// Seats the demo's opening booking asks for
    ///
    /// Never more than the flight holds, so the booking and its later
    /// cancellation both go through on small flights.
    #[must_use]
    pub fn opening_booking_seats(&self) -> u32 {
        self.seat_capacity.min(4)
    }

    /// Passengers racing for one seat each
    ///
    /// Enough to sell the flight out, capped at [`MAX_RACING_PASSENGERS`].
    #[must_use]
    pub fn racing_passengers(&self) -> u32 {
        self.seat_capacity
            .saturating_add(10)
            .min(MAX_RACING_PASSENGERS)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
