//! Headless driver: runs a scripted session at a fixed 60 Hz tick rate and
//! logs JSON snapshots, so the core can be exercised without a renderer.
//!
//! Usage: `RUST_LOG=info marble-run-headless`

use marble_run::{CourseConfig, GameSession, InputState, RunPhase};

const DT: f32 = 1.0 / 60.0;
const MAX_TICKS: u32 = 3600;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = CourseConfig::default();
    let mut session = GameSession::new(config)?;

    let listener = session.subscribe_phase(Box::new(|change| {
        log::info!(
            "phase transition {:?} -> {:?} at {:.2}s",
            change.from,
            change.to,
            change.at
        );
    }));

    for tick in 0..MAX_TICKS {
        let input = scripted_input(tick);
        session.update(&input, DT);

        if tick % 120 == 0 {
            let snapshot = session.snapshot();
            log::info!("tick {tick}: {}", serde_json::to_string(&snapshot)?);
        }

        if session.phase() == RunPhase::Ended {
            break;
        }
    }

    let snapshot = session.snapshot();
    log::info!(
        "final phase {:?}, elapsed {:.2}s",
        snapshot.phase,
        snapshot.elapsed_seconds
    );
    println!("{}", serde_json::to_string(&snapshot)?);

    session.unsubscribe_phase(listener);
    Ok(())
}

/// Hold forward after a short idle lead-in, with a periodic jump.
fn scripted_input(tick: u32) -> InputState {
    InputState {
        forward: tick >= 60,
        jump: tick >= 60 && tick % 180 == 0,
        ..InputState::default()
    }
}
