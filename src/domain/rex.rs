/// Rex phase state machine and clearance windows — table driven.
///
/// Every animation frame of the rex is one numbered *phase*. The `u8` phase
/// code is the wire form shared with the collision oracle, so the animation
/// driver and the oracle can never drift apart on what "jumping high enough"
/// means.
///
/// ## Phase codes
/// ┌──────────────┬─────────────────────────────────────────────┐
/// │ 0            │ Idle (grounded run pose)                    │
/// │ 1 ..= 24     │ Jump: 3 height tiers × 8 frames,            │
/// │              │ code = tier·8 + frame                       │
/// │ 25 ..= 28    │ Duck 1..4 (4 = full duck, held)             │
/// └──────────────┴─────────────────────────────────────────────┘
///
/// ## Jump script
/// A jump plays codes 1..=24 ascending, then mirrors 23..=1 descending —
/// 47 frames, one per control-loop iteration, uninterruptible. Ascent frame N
/// and descent frame N share a code and therefore render with matching
/// geometry.
///
/// ## Clearance
/// Whether the rex's hitbox clears an obstacle depends on the phase code and
/// on how deep the obstacle already is (`Proximity`):
/// ┌─────────┬────────────────────┬──────────────────────────────┐
/// │ Kind    │ Approach           │ Overlap (one band tighter)   │
/// ├─────────┼────────────────────┼──────────────────────────────┤
/// │ Ground  │ jump 10..=24       │ jump 11..=24                 │
/// │ Air     │ jump 10..=24,      │ jump 11..=24,                │
/// │         │ or duck >= 27      │ or duck == 28                │
/// └─────────┴────────────────────┴──────────────────────────────┘
/// A deep duck slips *under* an air obstacle; only a full duck stays under
/// one that is already overlapping.

pub const JUMP_FRAMES_PER_TIER: u8 = 8;
pub const JUMP_TIERS: u8 = 3;
pub const JUMP_CODE_MIN: u8 = 1;
pub const JUMP_CODE_MAX: u8 = JUMP_TIERS * JUMP_FRAMES_PER_TIER;
pub const DUCK_FRAMES: u8 = 4;
pub const DUCK_CODE_MIN: u8 = JUMP_CODE_MAX + 1;
pub const DUCK_CODE_MAX: u8 = JUMP_CODE_MAX + DUCK_FRAMES;

/// Ascent frames plus the mirrored descent (the apex frame is not repeated).
pub const JUMP_SCRIPT_LEN: u8 = 2 * JUMP_CODE_MAX - 1;

// Clearance windows. The overlap window starts one phase later than the
// approach window: once inside the hitbox zone only near-peak phases clear.
const JUMP_CLEAR_APPROACH_MIN: u8 = 10;
const JUMP_CLEAR_OVERLAP_MIN: u8 = 11;
const JUMP_CLEAR_MAX: u8 = JUMP_CODE_MAX;
const DUCK_CLEAR_APPROACH_MIN: u8 = 27;
const DUCK_CLEAR_OVERLAP: u8 = 28;

/// How deep the winning obstacle is into the rex's column band.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Proximity {
    /// One pixel-column before the hitboxes touch.
    Approach,
    /// Hitboxes actively overlapping.
    Overlap,
}

/// One discrete animation phase of the rex.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RexPhase {
    Idle,
    /// frame in 1..=4; 4 is the held full duck.
    Duck { frame: u8 },
    /// tier in 0..=2, frame in 1..=8.
    Jump { tier: u8, frame: u8 },
}

impl RexPhase {
    /// The wire form read by the collision oracle.
    pub fn code(self) -> u8 {
        match self {
            RexPhase::Idle => 0,
            RexPhase::Jump { tier, frame } => tier * JUMP_FRAMES_PER_TIER + frame,
            RexPhase::Duck { frame } => JUMP_CODE_MAX + frame,
        }
    }

    pub fn from_code(code: u8) -> Option<RexPhase> {
        match code {
            0 => Some(RexPhase::Idle),
            JUMP_CODE_MIN..=JUMP_CODE_MAX => Some(RexPhase::Jump {
                tier: (code - 1) / JUMP_FRAMES_PER_TIER,
                frame: (code - 1) % JUMP_FRAMES_PER_TIER + 1,
            }),
            DUCK_CODE_MIN..=DUCK_CODE_MAX => Some(RexPhase::Duck {
                frame: code - JUMP_CODE_MAX,
            }),
            _ => None,
        }
    }

    /// Vertical pixel lift of the sprite above its grounded position.
    /// Ascent frame N and descent frame N share a code, hence a lift.
    pub fn lift(self) -> u8 {
        match self {
            RexPhase::Jump { .. } => self.code(),
            _ => 0,
        }
    }

    /// Does the hitbox currently occupy the low collision band?
    /// True while grounded, ducking, or in the near-ground jump phases —
    /// everything outside the ground-clearance window.
    pub fn is_low_band(self) -> bool {
        !clears_ground(self.code(), Proximity::Approach)
    }
}

/// Does this phase clear a ground obstacle at the given proximity?
pub fn clears_ground(code: u8, prox: Proximity) -> bool {
    let min = match prox {
        Proximity::Approach => JUMP_CLEAR_APPROACH_MIN,
        Proximity::Overlap => JUMP_CLEAR_OVERLAP_MIN,
    };
    (min..=JUMP_CLEAR_MAX).contains(&code)
}

/// Does this phase clear an air obstacle at the given proximity?
/// Air obstacles are also cleared by ducking under them.
pub fn clears_air(code: u8, prox: Proximity) -> bool {
    if clears_ground(code, prox) {
        return true;
    }
    match prox {
        Proximity::Approach => code >= DUCK_CLEAR_APPROACH_MIN && code <= DUCK_CODE_MAX,
        Proximity::Overlap => code == DUCK_CLEAR_OVERLAP,
    }
}

/// Phase code at a given step of the jump script (step in 0..JUMP_SCRIPT_LEN):
/// codes 1..=24 up, then 23..=1 mirrored down.
pub fn jump_code_at(step: u8) -> u8 {
    debug_assert!(step < JUMP_SCRIPT_LEN);
    if step < JUMP_CODE_MAX {
        step + 1
    } else {
        JUMP_SCRIPT_LEN - step
    }
}

/// Joystick command for one control-loop iteration.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StickCmd {
    Up,
    Down,
    Neutral,
}

#[derive(Clone, Copy, Debug)]
enum Motion {
    Grounded,
    Jumping { step: u8 },
    Ducking { frame: u8 },
}

/// What one `advance` produced.
#[derive(Clone, Copy, Debug)]
pub struct RexStep {
    pub phase: RexPhase,
    /// True on the iteration that launched a jump (buzzer cue).
    pub jump_started: bool,
}

/// The rex animation rig: consumes one stick command per control-loop
/// iteration and yields the phase to render. A jump runs to completion
/// uninterruptible; a duck ramps in, holds while the axis stays deflected,
/// and ramps back out on release. Both start only from idle.
#[derive(Clone, Copy, Debug)]
pub struct RexRig {
    motion: Motion,
}

impl RexRig {
    pub fn new() -> Self {
        RexRig { motion: Motion::Grounded }
    }

    pub fn phase(&self) -> RexPhase {
        match self.motion {
            Motion::Grounded => RexPhase::Idle,
            Motion::Jumping { step } => phase_of(jump_code_at(step)),
            Motion::Ducking { frame } => RexPhase::Duck { frame },
        }
    }

    pub fn is_jumping(&self) -> bool {
        matches!(self.motion, Motion::Jumping { .. })
    }

    /// Advance one animation frame. Exactly one render and one scroll tick
    /// follow each call, so world time and phase time stay interleaved.
    pub fn advance(&mut self, cmd: StickCmd) -> RexStep {
        let mut jump_started = false;
        self.motion = match (self.motion, cmd) {
            (Motion::Grounded, StickCmd::Up) => {
                jump_started = true;
                Motion::Jumping { step: 0 }
            }
            (Motion::Grounded, StickCmd::Down) => Motion::Ducking { frame: 1 },
            (Motion::Grounded, StickCmd::Neutral) => Motion::Grounded,
            // A jump in progress ignores further input.
            (Motion::Jumping { step }, _) => {
                if step + 1 < JUMP_SCRIPT_LEN {
                    Motion::Jumping { step: step + 1 }
                } else {
                    Motion::Grounded
                }
            }
            (Motion::Ducking { frame }, StickCmd::Down) => Motion::Ducking {
                frame: (frame + 1).min(DUCK_FRAMES),
            },
            // Axis released: reverse the ramp from wherever it is.
            (Motion::Ducking { frame }, _) => {
                if frame > 1 {
                    Motion::Ducking { frame: frame - 1 }
                } else {
                    Motion::Grounded
                }
            }
        };
        RexStep { phase: self.phase(), jump_started }
    }
}

fn phase_of(code: u8) -> RexPhase {
    // Codes produced by the rig are always in range.
    RexPhase::from_code(code).unwrap_or(RexPhase::Idle)
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
