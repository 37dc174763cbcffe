/// Entry point and session controller.
///
/// Session flow: WaitingToStart → Playing → Ended → (reset) → WaitingToStart.
/// The control loop owns the world and the display; the collision oracle
/// runs on its own fixed-period thread and only ever touches the shared
/// `HazardBoard`. One loop iteration while playing = read the axis, advance
/// the rex one animation phase, publish it, redraw, one scroll step, frame
/// sleep — so world time keeps flowing through every jump and duck.

mod config;
mod domain;
mod sim;
mod ui;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use config::GameConfig;
use domain::lanes::LaneKind;
use domain::rex::{RexPhase, StickCmd};
use sim::event::GameEvent;
use sim::oracle::{self, HazardBoard};
use sim::step::scroll_step;
use sim::world::{SessionPhase, WorldState};
use ui::display::PageDisplay;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;
use ui::sprites;

fn main() {
    let cfg = GameConfig::load();
    let seed = cfg.seed.unwrap_or_else(clock_seed);

    let mut world = WorldState::new(seed);
    let hazards = Arc::new(HazardBoard::new());
    let oracle_running = Arc::new(AtomicBool::new(true));
    let watchdog = oracle::spawn_watchdog(
        Arc::clone(&hazards),
        Duration::from_micros(cfg.timing.oracle_period_us),
        Arc::clone(&oracle_running),
    );

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        oracle_running.store(false, Ordering::Release);
        let _ = watchdog.join();
        return;
    }

    let sound = SoundEngine::new();

    let result = session_loop(&mut world, &mut renderer, sound.as_ref(), &hazards, &cfg);

    oracle_running.store(false, Ordering::Release);
    if watchdog.join().is_err() {
        eprintln!("Collision watchdog panicked");
    }
    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Final score: {}", world.score);
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn session_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    hazards: &HazardBoard,
    cfg: &GameConfig,
) -> std::io::Result<()> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    let frame = Duration::from_millis(cfg.timing.frame_ms);

    renderer.draw_boot_screen();
    renderer.present()?;

    loop {
        kb.drain_events();
        gp.update();

        if kb.quit_requested() {
            break;
        }

        match world.phase {
            SessionPhase::WaitingToStart => {
                // Center-press edge only — a held press must not retrigger.
                if kb.start_pressed() || gp.start_pressed() {
                    renderer.clear_banner();
                    renderer.draw_score_header();
                    world.phase = SessionPhase::Playing;
                }
            }

            SessionPhase::Playing => {
                let axis = gp.read_axis().unwrap_or_else(|| kb.read_axis());
                let cmd = if axis < cfg.input.up_threshold {
                    StickCmd::Up
                } else if axis > cfg.input.down_threshold {
                    StickCmd::Down
                } else {
                    StickCmd::Neutral
                };

                let step = world.rex.advance(cmd);
                hazards.publish_rex(step.phase.code());
                if step.jump_started {
                    if let Some(sfx) = sound {
                        sfx.play_jump();
                    }
                }
                renderer.set_led(world.rex.is_jumping());

                // Eat pixels about to wrap, then draw the current phase.
                sprites::clear_wrap_guard(renderer.display_mut());
                draw_rex_phase(renderer.display_mut(), step.phase);

                let mut events = Vec::new();
                scroll_step(world, renderer.display_mut(), hazards, &mut events);
                for event in &events {
                    match *event {
                        GameEvent::ObstacleSpawned { slot } => match slot.kind {
                            LaneKind::Ground => sprites::draw_cactus(renderer.display_mut()),
                            LaneKind::Air => sprites::draw_pterodactyl(renderer.display_mut()),
                        },
                        GameEvent::ScoreChanged { score } => renderer.draw_score(score),
                    }
                }

                // The oracle can halt at any point, including mid-jump.
                if hazards.is_halted() {
                    enter_end_screen(world, renderer, sound);
                }
            }

            SessionPhase::Ended => {
                // Joystick is dead here; only the reset sensor acts.
                if kb.reset_pressed() || gp.reset_pressed() {
                    world.reset();
                    hazards.reset();
                    renderer.draw_boot_screen();
                }
            }
        }

        renderer.present()?;
        std::thread::sleep(frame);
    }

    Ok(())
}

/// One render call per phase transition: sprite plus its two (or three)
/// vertical pages.
fn draw_rex_phase(display: &mut dyn PageDisplay, phase: RexPhase) {
    match phase {
        RexPhase::Idle => sprites::draw_rex(display),
        RexPhase::Duck { frame } => sprites::draw_duck_frame(display, frame),
        RexPhase::Jump { .. } => sprites::draw_rex_lifted(display, phase.lift()),
    }
}

/// The one-shot end sequence: freeze the field, swap the header for the
/// reset banner, show the final score, buzz.
fn enter_end_screen(world: &mut WorldState, renderer: &mut Renderer, sound: Option<&SoundEngine>) {
    world.phase = SessionPhase::Ended;
    renderer.set_led(false);
    renderer.clear_banner();
    renderer.draw_end_banner();
    renderer.draw_final_score(world.score);
    if let Some(sfx) = sound {
        sfx.play_game_over();
    }
}
