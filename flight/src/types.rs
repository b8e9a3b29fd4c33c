//! State and action types for driving a [`Flight`] through a reducer.

use crate::error::{BookingError, FlightError};
use crate::inventory::Flight;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// State owned by a flight store
#[derive(Clone, Debug, Serialize)]
pub struct FlightState {
    /// The seat inventory
    pub flight: Flight,
    /// Why the most recent command was refused, if it was
    pub last_error: Option<BookingError>,
    /// Accepted `SeatsBooked` and `BookingCancelled` events, oldest first
    pub history: Vec<FlightAction>,
}

impl FlightState {
    /// Wraps an existing flight
    #[must_use]
    pub const fn new(flight: Flight) -> Self {
        Self {
            flight,
            last_error: None,
            history: Vec::new(),
        }
    }

    /// State for an empty flight with `seat_capacity` seats
    ///
    /// # Errors
    ///
    /// Returns [`FlightError::InvalidCapacity`] if `seat_capacity` is zero.
    pub fn with_capacity(seat_capacity: u32) -> Result<Self, FlightError> {
        Flight::new(seat_capacity).map(Self::new)
    }
}

/// Actions representing commands and events for a flight
///
/// Commands are requests that may be refused. Events are facts: each
/// accepted command produces one, and replaying events rebuilds the
/// flight's bookings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightAction {
    // ========== Commands ==========
    /// Command: Book seats for a passenger
    Book {
        /// Passenger requesting the seats
        passenger_email: String,
        /// Seats requested
        number_of_seats: u32,
    },

    /// Command: Cancel a passenger's booking
    CancelBooking {
        /// Passenger whose booking is cancelled
        passenger_email: String,
        /// Seat count of the booking to cancel
        number_of_seats: u32,
    },

    // ========== Events ==========
    /// Event: Seats were booked
    SeatsBooked {
        /// Passenger holding the booking
        passenger_email: String,
        /// Seats reserved
        number_of_seats: u32,
        /// When the booking was accepted
        booked_at: DateTime<Utc>,
    },

    /// Event: A booking was cancelled and its seats freed
    BookingCancelled {
        /// Passenger who held the booking
        passenger_email: String,
        /// Seats released
        number_of_seats: u32,
        /// When the cancellation was accepted
        cancelled_at: DateTime<Utc>,
    },

    /// Event: A command was refused; the flight is unchanged
    BookingRejected {
        /// Reason for the refusal
        error: BookingError,
    },
}

impl FlightAction {
    /// Shorthand for a `Book` command
    #[must_use]
    pub fn book(passenger_email: impl Into<String>, number_of_seats: u32) -> Self {
        Self::Book {
            passenger_email: passenger_email.into(),
            number_of_seats,
        }
    }

    /// Shorthand for a `CancelBooking` command
    #[must_use]
    pub fn cancel_booking(passenger_email: impl Into<String>, number_of_seats: u32) -> Self {
        Self::CancelBooking {
            passenger_email: passenger_email.into(),
            number_of_seats,
        }
    }

    /// Whether this action is a command
    #[must_use]
    pub const fn is_command(&self) -> bool {
        matches!(self, Self::Book { .. } | Self::CancelBooking { .. })
    }

    /// Whether this action is an event
    #[must_use]
    pub const fn is_event(&self) -> bool {
        !self.is_command()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn commands_and_events_are_classified() {
        let command = FlightAction::book("a@b.com", 1);
        assert!(command.is_command());
        assert!(!command.is_event());

        let event = FlightAction::BookingRejected {
            error: BookingError::InvalidSeatCount,
        };
        assert!(event.is_event());
        assert!(!event.is_command());
    }

    #[test]
    fn with_capacity_rejects_zero() {
        assert!(matches!(
            FlightState::with_capacity(0),
            Err(FlightError::InvalidCapacity)
        ));
        let state = FlightState::with_capacity(1).unwrap();
        assert!(state.last_error.is_none());
        assert!(state.history.is_empty());
    }

    #[test]
    fn events_serialize_with_their_fields() {
        let event = FlightAction::BookingRejected {
            error: BookingError::Overbooking {
                requested: 4,
                remaining: 3,
            },
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["BookingRejected"]["error"]["Overbooking"]["requested"], 4);
    }
}
