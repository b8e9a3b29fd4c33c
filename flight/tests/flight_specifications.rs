//! Behaviour of a single flight's seat inventory.
//!
//! Run with: `cargo test -p flight --test flight_specifications`

#![allow(clippy::unwrap_used)]

use flight::{Booking, BookingError, Flight};

fn flight(seat_capacity: u32) -> Flight {
    Flight::new(seat_capacity).unwrap()
}

#[test]
fn booking_reduces_the_number_of_seats() {
    for (seat_capacity, number_of_seats, remaining) in [(3, 1, 2), (6, 3, 3), (10, 10, 0)] {
        let mut flight = flight(seat_capacity);

        flight.book("johnfranklin@tutorials.com", number_of_seats).unwrap();

        assert_eq!(flight.remaining_number_of_seats(), remaining);
    }
}

#[test]
fn avoids_overbooking() {
    let mut flight = flight(3);

    let error = flight.book("x@y.com", 4);

    assert!(matches!(error, Err(BookingError::Overbooking { .. })));
    assert_eq!(flight.remaining_number_of_seats(), 3);
    assert!(flight.booking_list().is_empty());
}

#[test]
fn books_flights_successfully() {
    let mut flight = flight(3);

    assert_eq!(flight.book("johnfranklin@tutorial.com", 1), Ok(()));
}

#[test]
fn remembers_bookings() {
    let mut flight = flight(150);

    flight.book("a@b.com", 4).unwrap();

    assert_eq!(flight.booking_list(), &[Booking::new("a@b.com", 4)]);
}

#[test]
fn canceling_bookings_frees_up_the_seats() {
    for (initial_capacity, to_book, to_cancel, remaining) in [(3, 1, 1, 3), (5, 2, 2, 5)] {
        let mut flight = flight(initial_capacity);
        flight.book("a@b.com", to_book).unwrap();

        flight.cancel_booking("a@b.com", to_cancel).unwrap();

        assert_eq!(flight.remaining_number_of_seats(), remaining);
    }
}

#[test]
fn doesnt_cancel_bookings_for_passengers_who_have_not_booked() {
    let mut flight = flight(3);

    let error = flight.cancel_booking("a@b.com", 2);

    assert_eq!(
        error,
        Err(BookingError::BookingNotFound {
            passenger_email: "a@b.com".to_string(),
            number_of_seats: 2,
        })
    );
    assert_eq!(flight.remaining_number_of_seats(), 3);
}

#[test]
fn returns_ok_when_successfully_cancelling_a_booking() {
    let mut flight = flight(3);
    flight.book("a@b.com", 1).unwrap();

    assert_eq!(flight.cancel_booking("a@b.com", 1), Ok(()));
    assert!(flight.booking_list().is_empty());
}

#[test]
fn cancelled_seats_can_be_booked_again() {
    let mut flight = flight(2);
    flight.book("a@b.com", 2).unwrap();
    assert!(flight.book("c@d.com", 1).is_err());

    flight.cancel_booking("a@b.com", 2).unwrap();
    flight.book("c@d.com", 2).unwrap();

    assert!(flight.is_sold_out());
    assert_eq!(flight.booking_list(), &[Booking::new("c@d.com", 2)]);
}

#[test]
fn cancelling_twice_only_succeeds_once() {
    let mut flight = flight(3);
    flight.book("a@b.com", 1).unwrap();

    assert_eq!(flight.cancel_booking("a@b.com", 1), Ok(()));
    assert!(matches!(
        flight.cancel_booking("a@b.com", 1),
        Err(BookingError::BookingNotFound { .. })
    ));
    assert_eq!(flight.remaining_number_of_seats(), 3);
}

#[test]
fn flight_serializes_its_bookings() {
    let mut flight = flight(5);
    flight.book("a@b.com", 2).unwrap();

    let json = serde_json::to_value(&flight).unwrap();

    assert_eq!(json["seat_capacity"], 5);
    assert_eq!(json["remaining_number_of_seats"], 3);
    assert_eq!(json["booking_list"][0]["passenger_email"], "a@b.com");
    assert_eq!(json["booking_list"][0]["number_of_seats"], 2);
}
