//! Flight seat inventory.
//!
//! A [`Flight`] tracks its seat capacity, the seats still available and the
//! ordered list of passenger [`Booking`]s. It refuses to overbook, and a
//! passenger's booking can be cancelled to free its seats. Every refused
//! operation returns a [`BookingError`] and leaves the flight unchanged.
//!
//! The entity is a plain single-threaded value. When several callers share
//! one flight, drive it through a [`FlightStore`], which serializes commands
//! through the [`FlightReducer`].
//!
//! # Quick Start
//!
//! ```
//! use flight::{BookingError, Flight};
//!
//! let mut flight = Flight::new(3)?;
//! flight.book("a@b.com", 1)?;
//! assert_eq!(flight.remaining_number_of_seats(), 2);
//!
//! assert!(matches!(
//!     flight.book("x@y.com", 4),
//!     Err(BookingError::Overbooking { .. })
//! ));
//!
//! flight.cancel_booking("a@b.com", 1)?;
//! assert_eq!(flight.remaining_number_of_seats(), 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod inventory;
pub mod reducer;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{BookingError, FlightError, PublishError};
pub use events::{ChannelPublisher, EventPublisher, NoopPublisher};
pub use inventory::{Booking, Flight};
pub use reducer::{FlightEnvironment, FlightReducer};
pub use types::{FlightAction, FlightState};

use airseat_runtime::Store;

/// Store serializing access to one flight
pub type FlightStore = Store<FlightState, FlightAction, FlightEnvironment, FlightReducer>;

/// Opens a store around an empty flight with `seat_capacity` seats
///
/// # Errors
///
/// Returns [`FlightError::InvalidCapacity`] if `seat_capacity` is zero.
pub fn open_flight(
    seat_capacity: u32,
    environment: FlightEnvironment,
) -> Result<FlightStore, FlightError> {
    let state = FlightState::with_capacity(seat_capacity)?;
    Ok(Store::new(state, FlightReducer::new(), environment))
}
