//! Seat inventory for a single flight.
//!
//! [`Flight`] is the aggregate: it owns its capacity, the remaining seat
//! count and the ordered list of [`Booking`]s, and only changes through
//! [`Flight::book`] and [`Flight::cancel_booking`]. Both operations are
//! all-or-nothing: a refused request leaves every field untouched.
//!
//! The flight is a plain single-threaded value. Callers that share one
//! flight between tasks wrap it in a store (see [`crate::FlightStore`]).

use crate::error::{BookingError, FlightError};
use serde::{Deserialize, Serialize};

/// Seats reserved by one passenger in one booking call.
///
/// Two bookings are equal when both the passenger and the seat count match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Booking {
    passenger_email: String,
    number_of_seats: u32,
}

impl Booking {
    /// Creates a booking record
    #[must_use]
    pub fn new(passenger_email: impl Into<String>, number_of_seats: u32) -> Self {
        Self {
            passenger_email: passenger_email.into(),
            number_of_seats,
        }
    }

    /// Passenger who holds the booking
    #[must_use]
    pub fn passenger_email(&self) -> &str {
        &self.passenger_email
    }

    /// Seats reserved by this booking
    #[must_use]
    pub const fn number_of_seats(&self) -> u32 {
        self.number_of_seats
    }
}

/// A flight's seat inventory.
///
/// Invariants, held before and after every call:
/// - `remaining_number_of_seats <= seat_capacity`
/// - `remaining_number_of_seats + sum(booking seats) == seat_capacity`
/// - every booking reserves at least one seat
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Flight {
    seat_capacity: u32,
    remaining_number_of_seats: u32,
    booking_list: Vec<Booking>,
}

impl Flight {
    /// Creates an empty flight with `seat_capacity` seats.
    ///
    /// # Errors
    ///
    /// Returns [`FlightError::InvalidCapacity`] if `seat_capacity` is zero.
    pub const fn new(seat_capacity: u32) -> Result<Self, FlightError> {
        if seat_capacity == 0 {
            return Err(FlightError::InvalidCapacity);
        }

        Ok(Self {
            seat_capacity,
            remaining_number_of_seats: seat_capacity,
            booking_list: Vec::new(),
        })
    }

    /// Books `number_of_seats` seats for `passenger_email`.
    ///
    /// Every successful call appends its own booking, even when the same
    /// passenger already holds one.
    ///
    /// # Errors
    ///
    /// - [`BookingError::InvalidSeatCount`] if `number_of_seats` is zero
    /// - [`BookingError::MissingPassengerEmail`] if `passenger_email` is empty
    /// - [`BookingError::Overbooking`] if fewer than `number_of_seats` seats remain
    pub fn book(
        &mut self,
        passenger_email: impl Into<String>,
        number_of_seats: u32,
    ) -> Result<(), BookingError> {
        let passenger_email = passenger_email.into();
        Self::validate_request(&passenger_email, number_of_seats)?;

        if number_of_seats > self.remaining_number_of_seats {
            return Err(BookingError::Overbooking {
                requested: number_of_seats,
                remaining: self.remaining_number_of_seats,
            });
        }

        self.booking_list
            .push(Booking::new(passenger_email, number_of_seats));
        self.remaining_number_of_seats -= number_of_seats;
        Ok(())
    }

    /// Cancels a booking of exactly `number_of_seats` seats held by
    /// `passenger_email`, freeing its seats.
    ///
    /// When the passenger holds several matching bookings the earliest one
    /// is removed.
    ///
    /// # Errors
    ///
    /// - [`BookingError::InvalidSeatCount`] if `number_of_seats` is zero
    /// - [`BookingError::MissingPassengerEmail`] if `passenger_email` is empty
    /// - [`BookingError::BookingNotFound`] if the passenger holds no booking
    ///   of that size
    pub fn cancel_booking(
        &mut self,
        passenger_email: &str,
        number_of_seats: u32,
    ) -> Result<(), BookingError> {
        Self::validate_request(passenger_email, number_of_seats)?;

        let Some(index) = self.booking_list.iter().position(|booking| {
            booking.passenger_email == passenger_email
                && booking.number_of_seats == number_of_seats
        }) else {
            return Err(BookingError::BookingNotFound {
                passenger_email: passenger_email.to_string(),
                number_of_seats,
            });
        };

        let cancelled = self.booking_list.remove(index);
        self.remaining_number_of_seats += cancelled.number_of_seats;
        Ok(())
    }

    fn validate_request(passenger_email: &str, number_of_seats: u32) -> Result<(), BookingError> {
        if number_of_seats == 0 {
            return Err(BookingError::InvalidSeatCount);
        }

        if passenger_email.is_empty() {
            return Err(BookingError::MissingPassengerEmail);
        }

        Ok(())
    }

    /// Total seats on the flight
    #[must_use]
    pub const fn seat_capacity(&self) -> u32 {
        self.seat_capacity
    }

    /// Seats not yet booked
    #[must_use]
    pub const fn remaining_number_of_seats(&self) -> u32 {
        self.remaining_number_of_seats
    }

    /// Seats held by active bookings
    #[must_use]
    pub const fn booked_seats(&self) -> u32 {
        self.seat_capacity - self.remaining_number_of_seats
    }

    /// Whether every seat is booked
    #[must_use]
    pub const fn is_sold_out(&self) -> bool {
        self.remaining_number_of_seats == 0
    }

    /// Active bookings in the order they were made
    #[must_use]
    pub fn booking_list(&self) -> &[Booking] {
        &self.booking_list
    }

    /// Active bookings held by one passenger, oldest first
    pub fn bookings_for<'a>(
        &'a self,
        passenger_email: &'a str,
    ) -> impl Iterator<Item = &'a Booking> + 'a {
        self.booking_list
            .iter()
            .filter(move |booking| booking.passenger_email == passenger_email)
    }
}
