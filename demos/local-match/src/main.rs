//! Scripted two-player match run entirely in-process.
//!
//! Useful for eyeballing the event stream without a transport layer:
//! `RUST_LOG=debug cargo run -p local-match`

use std::time::Duration;

use drawdash_protocol::ServerEvent;
use drawdash_room::{RoomConfig, RoomRegistry};
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// Prints everything a client's connection received, prefixed by name.
fn spawn_printer(name: &'static str, mut rx: UnboundedReceiver<ServerEvent>) {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => println!("[{name}] {json}"),
                Err(e) => tracing::warn!(error = %e, "failed to render event"),
            }
        }
        println!("[{name}] connection closed");
    });
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Short rounds so the timeout path shows up in the output.
    let registry = RoomRegistry::new(RoomConfig {
        round_duration: Duration::from_secs(5),
        ..RoomConfig::default()
    });

    let code = registry.create_room().await?;
    println!("room code: {code}");

    let (tx_alice, rx_alice) = mpsc::unbounded_channel();
    let (tx_bob, rx_bob) = mpsc::unbounded_channel();
    spawn_printer("alice", rx_alice);
    spawn_printer("bob  ", rx_bob);

    let (alice, alice_conn) = registry.join_room(&code, "alice", tx_alice).await?;
    let (bob, _) = registry.join_room(&code, "bob", tx_bob).await?;

    registry.start_game(&code).await?;

    // Alice draws round 1; she sends a few strokes while Bob guesses.
    for (x, y) in [(10, 10), (12, 14), (15, 19)] {
        registry
            .relay_draw(
                &code,
                alice_conn,
                serde_json::json!({"x": x, "y": y, "color": "#222222"}),
            )
            .await?;
    }

    let wrong = registry.submit_guess(&code, bob.clone(), "airplane").await?;
    println!("bob guessed 'airplane': correct = {wrong}");

    // Guess every word in the default list; exactly one will match.
    for word in RoomConfig::default().words {
        if registry.submit_guess(&code, bob.clone(), word.clone()).await? {
            println!("bob guessed '{word}': correct = true");
            break;
        }
    }

    // Let the next round run out on the clock.
    tokio::time::sleep(Duration::from_secs(6)).await;

    let snapshot = registry.room_snapshot(&code).await?;
    println!("final snapshot: {}", serde_json::to_string_pretty(&snapshot)?);

    registry.leave_room(&code, alice).await?;
    registry.leave_room(&code, bob).await?;
    assert_eq!(registry.room_count().await, 0);
    println!("room destroyed");

    // Give the printers a beat to flush the close notices.
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
