//! Reducer logic for the flight aggregate.
//!
//! Commands are handed to the [`Flight`](crate::inventory::Flight) entity,
//! which owns the seat accounting. An accepted command is recorded as the
//! matching event and published; a refused one becomes `BookingRejected`
//! and leaves the flight as it was.

use crate::error::BookingError;
use crate::events::{EventPublisher, NoopPublisher};
use crate::types::{FlightAction, FlightState};
use airseat_core::{effect::Effect, environment::Clock, reducer::Reducer, smallvec, SmallVec};
use std::sync::Arc;

/// Environment dependencies for the flight reducer
#[derive(Clone)]
pub struct FlightEnvironment {
    /// Clock for event timestamps
    pub clock: Arc<dyn Clock>,
    /// Where accepted events are published
    pub publisher: Arc<dyn EventPublisher>,
}

impl FlightEnvironment {
    /// Creates a new `FlightEnvironment` that discards published events
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            publisher: Arc::new(NoopPublisher),
        }
    }

    /// Replaces the event publisher
    #[must_use]
    pub fn with_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = publisher;
        self
    }
}

/// Reducer for the flight aggregate
#[derive(Clone, Debug, Default)]
pub struct FlightReducer;

impl FlightReducer {
    /// Creates a new `FlightReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Applies an event to state
    ///
    /// Seat-changing events go through the flight's own operations, so a
    /// replayed event that no longer fits the inventory is refused rather
    /// than breaking the seat count. Applied ones are appended to history.
    fn apply_event(state: &mut FlightState, action: &FlightAction) -> Result<(), BookingError> {
        match action {
            FlightAction::SeatsBooked {
                passenger_email,
                number_of_seats,
                ..
            } => {
                state.flight.book(passenger_email.as_str(), *number_of_seats)?;
                state.last_error = None;
                state.history.push(action.clone());
            }
            FlightAction::BookingCancelled {
                passenger_email,
                number_of_seats,
                ..
            } => {
                state.flight.cancel_booking(passenger_email, *number_of_seats)?;
                state.last_error = None;
                state.history.push(action.clone());
            }
            FlightAction::BookingRejected { error } => {
                state.last_error = Some(error.clone());
            }
            // Commands are not applied to state
            FlightAction::Book { .. } | FlightAction::CancelBooking { .. } => {}
        }
        Ok(())
    }

    /// Records a refusal without touching the flight
    fn reject(state: &mut FlightState, error: BookingError) {
        tracing::warn!(
            %error,
            remaining = state.flight.remaining_number_of_seats(),
            "Flight command rejected"
        );
        state.last_error = Some(error);
    }

    /// Applies `event`, turning a refusal into `BookingRejected`
    ///
    /// Returns whether the event was applied.
    fn commit(state: &mut FlightState, event: &FlightAction) -> bool {
        match Self::apply_event(state, event) {
            Ok(()) => {
                tracing::debug!(
                    ?event,
                    remaining = state.flight.remaining_number_of_seats(),
                    "Flight event applied"
                );
                true
            }
            Err(error) => {
                Self::reject(state, error);
                false
            }
        }
    }

    /// Effect handing an accepted event to the environment's publisher
    fn publish(event: FlightAction, env: &FlightEnvironment) -> Effect<FlightAction> {
        let publisher = Arc::clone(&env.publisher);
        Effect::future(async move {
            if let Err(error) = publisher.publish(event).await {
                tracing::warn!(%error, "Failed to publish flight event");
            }
            None
        })
    }
}

impl Reducer for FlightReducer {
    type State = FlightState;
    type Action = FlightAction;
    type Environment = FlightEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            FlightAction::Book {
                passenger_email,
                number_of_seats,
            } => {
                let event = FlightAction::SeatsBooked {
                    passenger_email,
                    number_of_seats,
                    booked_at: env.clock.now(),
                };
                if Self::commit(state, &event) {
                    return smallvec![Self::publish(event, env)];
                }
            }

            FlightAction::CancelBooking {
                passenger_email,
                number_of_seats,
            } => {
                let event = FlightAction::BookingCancelled {
                    passenger_email,
                    number_of_seats,
                    cancelled_at: env.clock.now(),
                };
                if Self::commit(state, &event) {
                    return smallvec![Self::publish(event, env)];
                }
            }

            // ========== Events ==========
            FlightAction::SeatsBooked { .. }
            | FlightAction::BookingCancelled { .. }
            | FlightAction::BookingRejected { .. } => {
                // Replayed from history; already published when first accepted
                Self::commit(state, &action);
            }
        }

        SmallVec::new()
    }
}
