//! Headless lamp demo — builds the scene on a recording backend and runs
//! a few seconds of simulated frames.
//!
//! Usage:
//! ```text
//! cargo run --example headless                  # 3 seconds at 30 fps
//! cargo run --example headless -- 10 60         # 10 seconds at 60 fps
//! RUST_LOG=enginelet=trace cargo run --example headless
//! ```

use enginelet::render::RecordingBackend;
use enginelet::scene::{FrameClock, Scene, SceneConfig};
use enginelet::EngineError;

fn main() -> Result<(), EngineError> {
    // Default: WARN for everything, INFO for enginelet and this demo.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("headless=info".parse().unwrap_or_default())
        .add_directive("enginelet=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut args = std::env::args().skip(1);
    let seconds: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(3.0);
    let fps: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(30).max(1);

    let config = SceneConfig::default();
    let mut backend = RecordingBackend::new();
    let mut scene = Scene::build(&mut backend, &config)?;
    let mut clock = FrameClock::new(config.max_step);

    let mut frame = 0u32;
    loop {
        let now = f64::from(frame) / f64::from(fps);
        if now > seconds {
            break;
        }
        for (t0, t1) in clock.advance(now) {
            scene.animate(t0, t1)?;
        }
        backend.clear_commands();
        let draws = scene.render(&mut backend)?;
        if frame % fps == 0 {
            let bulb = scene.lights()[0].position;
            tracing::info!(
                frame,
                time = now,
                draws,
                commands = backend.commands().len(),
                bulb = ?[bulb.x, bulb.y, bulb.z],
                "rendered frame"
            );
        }
        frame += 1;
    }

    scene.release(&mut backend);
    tracing::info!(
        frames = frame,
        leaked = backend.live_resources(),
        invalid_releases = backend.invalid_releases(),
        "done"
    );
    Ok(())
}
