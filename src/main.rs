//! Wave Invaders headless driver
//!
//! Provisions the simulation, plays a scripted keyboard session at a fixed
//! frame rate, tessellates every frame, and logs a summary.
//!
//! Usage: `wave-invaders [config.json] [frames]`

use wave_invaders::SimConfig;
use wave_invaders::platform::{Key, Keyboard};
use wave_invaders::renderer::{Frame, VertexCanvas};
use wave_invaders::sim::{SimulationState, WavePhase, displayed, enemies_hit_by, tick};

const FRAME_DT: f32 = 1.0 / 60.0;
const DEFAULT_FRAMES: u32 = 1200;

/// Keys held on a given frame of the scripted session
fn scripted_keys(frame: u32, keyboard: &mut Keyboard) {
    let sweep = frame % 240;
    let (go, stop) = if sweep < 120 { (Key::D, Key::A) } else { (Key::A, Key::D) };
    keyboard.press(go);
    keyboard.release(stop);

    if frame % 8 < 4 {
        keyboard.press(Key::Space);
    } else {
        keyboard.release(Key::Space);
    }

    // Short pause in the middle of the run
    if frame == 600 || frame == 660 {
        keyboard.press(Key::Escape);
    } else {
        keyboard.release(Key::Escape);
    }
}

fn run(config: SimConfig, frames: u32) -> Result<(), wave_invaders::SimError> {
    let mut state = SimulationState::new(config)?;
    let mut keyboard = Keyboard::new();
    let mut frame = Frame::new();
    let mut canvas = VertexCanvas::new();

    let mut traversals = 0u32;
    let mut contacts = 0usize;
    let mut peak_bullets = 0u32;
    let mut peak_triangles = 0usize;
    let mut last_phase = state.wave().phase();

    for n in 0..frames {
        scripted_keys(n, &mut keyboard);
        let input = keyboard.snapshot();
        tick(&mut state, &input, FRAME_DT);

        let phase = state.wave().phase();
        if last_phase == WavePhase::Traversing && phase == WavePhase::Idle {
            traversals += 1;
        }
        last_phase = phase;

        contacts += displayed(&state)
            .map(|bullet| enemies_hit_by(bullet, state.enemies()).count())
            .sum::<usize>();
        peak_bullets = peak_bullets.max(state.bullet_count);

        frame.capture(&state);
        canvas.clear();
        frame.draw(&mut canvas);
        peak_triangles = peak_triangles.max(canvas.triangle_count());
    }

    let player = state.player().position;
    log::info!(
        "Ran {} frames: {} traversals, {} bullet contacts, peak {} bullets, peak {} triangles",
        frames,
        traversals,
        contacts,
        peak_bullets,
        peak_triangles
    );
    log::info!(
        "Final player ({:.1}, {:.1}), wave origin ({:.1}, {:.1}), mode {:?}",
        player.x,
        player.y,
        state.wave().origin.x,
        state.wave().origin.y,
        state.mode
    );

    state.restart_level()?;
    log::info!(
        "Level restarted, per-level region using {} bytes",
        state.memory().per_level.used()
    );
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Wave Invaders (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load config {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => SimConfig::default(),
    };
    let frames = match args.next().map(|s| s.parse::<u32>()) {
        Some(Ok(frames)) => frames,
        Some(Err(e)) => {
            log::error!("Invalid frame count: {}", e);
            std::process::exit(1);
        }
        None => DEFAULT_FRAMES,
    };

    if let Err(e) = run(config, frames) {
        log::error!("Simulation setup failed: {}", e);
        std::process::exit(1);
    }
}
