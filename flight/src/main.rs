//! Flight booking demo binary
//!
//! Opens one flight, books and cancels seats through a store, and lets a
//! crowd of concurrent passengers race for whatever is left.

use airseat_core::environment::SystemClock;
use flight::config::DEFAULT_LOG_FILTER;
use flight::{open_flight, ChannelPublisher, Config, FlightAction, FlightEnvironment};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(&config.log_level)
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Flight Booking Demo ===\n");
    println!("Seat capacity: {}", config.seat_capacity);

    let (publisher, mut events) = ChannelPublisher::new();
    let env = FlightEnvironment::new(Arc::new(SystemClock)).with_publisher(Arc::new(publisher));
    let store = open_flight(config.seat_capacity, env)?;

    let seats = config.opening_booking_seats();
    println!("\n>>> a@b.com books {seats} seats");
    store.send(FlightAction::book("a@b.com", seats)).await?;
    report(&store).await;

    let remaining = store.state(|s| s.flight.remaining_number_of_seats()).await;
    println!("\n>>> x@y.com asks for more seats than remain");
    store
        .send(FlightAction::book("x@y.com", remaining.saturating_add(1)))
        .await?;
    report(&store).await;

    println!("\n>>> a@b.com cancels the {seats}-seat booking");
    store
        .send(FlightAction::cancel_booking("a@b.com", seats))
        .await?;
    report(&store).await;

    println!("\n>>> nobody@b.com cancels a booking they never made");
    store
        .send(FlightAction::cancel_booking("nobody@b.com", 2))
        .await?;
    report(&store).await;

    let passengers = config.racing_passengers();
    println!("\n>>> {passengers} passengers race for one seat each");
    let handles: Vec<_> = (0..passengers)
        .map(|n| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .send(FlightAction::book(format!("p{n}@race.com"), 1))
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await??;
    }
    report(&store).await;

    let snapshot = store
        .state(|s| serde_json::to_string_pretty(&s.flight))
        .await?;
    let booking_count = store.state(|s| s.flight.booking_list().len()).await;
    println!("\nFinal booking count: {booking_count}");
    tracing::debug!(flight = %snapshot, "Final flight state");

    store.shutdown(Duration::from_secs(5)).await?;

    let mut published = 0_usize;
    while events.try_recv().is_ok() {
        published += 1;
    }
    println!("Events published: {published}");
    println!("\n=== Demo Complete ===");
    Ok(())
}

async fn report(store: &flight::FlightStore) {
    let (remaining, capacity, last_error) = store
        .state(|s| {
            (
                s.flight.remaining_number_of_seats(),
                s.flight.seat_capacity(),
                s.last_error.clone(),
            )
        })
        .await;

    println!("Remaining seats: {remaining}/{capacity}");
    if let Some(error) = last_error {
        println!("Refused: {error}");
    }
}
