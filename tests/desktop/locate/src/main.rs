//! Desktop harness for the location controller.
//!
//! Run with: cargo run -p pinpoint-desktop
//!
//! Set `RUST_LOG=debug` to follow the controller's stage transitions.
//! Pass `--open` to hand a displayed fix to the system map handler.

use std::sync::Arc;

use pinpoint::{Config, LocationController, Platform, Screen, Stage, View};

/// Prints every render to stdout.
#[derive(Debug)]
struct ConsoleView;

impl View for ConsoleView {
    fn render(&self, screen: &Screen) {
        println!("  {}", screen.latitude);
        println!("  {}", screen.longitude);
        println!("  {}", screen.provider);
        if screen.open_map_visible {
            println!("  [Open map]");
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let open = std::env::args().any(|arg| arg == "--open");

    println!("=== pinpoint (desktop) ===\n");

    let platform = Platform::native(Arc::new(ConsoleView));
    let mut controller = LocationController::new(platform, Config::default());

    let stage = controller.request_location().await;
    println!("\nAttempt finished at {stage:?}");
    println!("Stored coordinate: {}", controller.session().coordinate);

    if stage == Stage::Displayed && open {
        match controller.open_map() {
            Ok(()) => println!("Map handed off"),
            Err(err) => log::error!("hand-off failed: {err}"),
        }
    }
}
