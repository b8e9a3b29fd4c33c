//! Error types for the flight seat inventory.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a booking or cancellation was refused.
///
/// A refused operation never changes the flight.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingError {
    /// More seats were requested than remain on the flight
    #[error("Cannot book {requested} seats: only {remaining} remaining")]
    Overbooking {
        /// Seats asked for
        requested: u32,
        /// Seats still available at the time of the request
        remaining: u32,
    },

    /// No booking matches the passenger and seat count being cancelled
    #[error("No booking of {number_of_seats} seats found for {passenger_email}")]
    BookingNotFound {
        /// Passenger the cancellation was requested for
        passenger_email: String,
        /// Seat count the cancellation asked for
        number_of_seats: u32,
    },

    /// A booking or cancellation must cover at least one seat
    #[error("Number of seats must be at least 1")]
    InvalidSeatCount,

    /// Bookings are keyed by passenger email, which cannot be empty
    #[error("Passenger email cannot be empty")]
    MissingPassengerEmail,
}

impl BookingError {
    /// Whether this error is a domain outcome rather than a malformed request
    #[must_use]
    pub const fn is_domain_error(&self) -> bool {
        matches!(self, Self::Overbooking { .. } | Self::BookingNotFound { .. })
    }
}

/// Errors raised while constructing a flight.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightError {
    /// A flight must have at least one seat
    #[error("Seat capacity must be at least 1")]
    InvalidCapacity,
}

/// Errors raised while handing an accepted event to a publisher.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishError {
    /// Nobody is listening for flight events any more
    #[error("Event subscriber has gone away")]
    SubscriberClosed,
}
