/// Collision oracle: a fixed-period watchdog over shared hazard state.
///
/// The control loop and the oracle are independent time bases — variable
/// animation frames vs. a fixed short tick — sharing the four lane distance
/// counters and the rex phase code. Everything the oracle reads lives here
/// as a single-word atomic; the control loop publishes each field with one
/// store, and the oracle takes a per-field snapshot. The oracle never
/// assumes two fields are mutually consistent across one store: the
/// approach/overlap double threshold exists precisely to absorb that
/// tolerance (obstacle position moves in whole pixels every scroll, rex
/// clearance changes only at the much coarser animation-frame rate).
///
/// ## Verdict
/// Let `d` be the largest active distance and classify the winning lane by
/// the fixed precedence scan (ground A, ground B, air A, air B).
/// ┌─────────┬───────────────┬──────────────────────────────────┐
/// │ Kind    │ `d` ==        │ collision unless phase clears at │
/// ├─────────┼───────────────┼──────────────────────────────────┤
/// │ Ground  │ 98 (approach) │ Proximity::Approach              │
/// │ Ground  │ > 98          │ Proximity::Overlap               │
/// │ Air     │ 92 (approach) │ Proximity::Approach              │
/// │ Air     │ > 92          │ Proximity::Overlap               │
/// └─────────┴───────────────┴──────────────────────────────────┘
/// Below the approach threshold nothing happens. A collision latches the
/// halt flag exactly once (compare-and-swap); post-halt checks are no-ops.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::domain::lanes::LaneKind;
use crate::domain::rex::{clears_air, clears_ground, Proximity};

/// One pixel-column before a ground obstacle's hitbox touches the rex.
pub const GROUND_APPROACH_DISTANCE: u8 = 98;
/// One pixel-column before an air obstacle's hitbox touches the rex.
pub const AIR_APPROACH_DISTANCE: u8 = 92;

/// Shared words the oracle reads. Lane order matches
/// `LaneBoard::distances()`: ground A, ground B, air A, air B.
pub struct HazardBoard {
    lanes: [AtomicU8; 4],
    rex_code: AtomicU8,
    halted: AtomicBool,
}

/// A per-field-atomic copy of the board, taken once per check.
#[derive(Clone, Copy, Debug)]
pub struct HazardSnapshot {
    pub lanes: [u8; 4],
    pub rex_code: u8,
}

impl HazardBoard {
    pub fn new() -> Self {
        HazardBoard {
            lanes: [
                AtomicU8::new(0),
                AtomicU8::new(0),
                AtomicU8::new(0),
                AtomicU8::new(0),
            ],
            rex_code: AtomicU8::new(0),
            halted: AtomicBool::new(false),
        }
    }

    /// Publish the lane distances, one single-word store per lane.
    pub fn publish_lanes(&self, distances: [u8; 4]) {
        for (slot, d) in self.lanes.iter().zip(distances) {
            slot.store(d, Ordering::Relaxed);
        }
    }

    /// Publish the rex phase code.
    pub fn publish_rex(&self, code: u8) {
        self.rex_code.store(code, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> HazardSnapshot {
        HazardSnapshot {
            lanes: [
                self.lanes[0].load(Ordering::Relaxed),
                self.lanes[1].load(Ordering::Relaxed),
                self.lanes[2].load(Ordering::Relaxed),
                self.lanes[3].load(Ordering::Relaxed),
            ],
            rex_code: self.rex_code.load(Ordering::Relaxed),
        }
    }

    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Acquire)
    }

    /// Latch the halt. Returns true only for the caller that flipped it.
    pub fn try_halt(&self) -> bool {
        self.halted
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Back to a fresh session (external reset only).
    pub fn reset(&self) {
        self.publish_lanes([0; 4]);
        self.publish_rex(0);
        self.halted.store(false, Ordering::Release);
    }
}

fn lane_kind(index: usize) -> LaneKind {
    if index < 2 {
        LaneKind::Ground
    } else {
        LaneKind::Air
    }
}

/// Pure collision test over one snapshot.
pub fn collision_verdict(snap: &HazardSnapshot) -> bool {
    let max = snap.lanes.into_iter().fold(0, u8::max);
    if max == 0 {
        return false;
    }
    // Precedence scan: the first lane at the max wins ties.
    let winner = snap.lanes.iter().position(|&d| d == max).unwrap_or(0);
    let approach = match lane_kind(winner) {
        LaneKind::Ground => GROUND_APPROACH_DISTANCE,
        LaneKind::Air => AIR_APPROACH_DISTANCE,
    };
    let prox = if max == approach {
        Proximity::Approach
    } else if max > approach {
        Proximity::Overlap
    } else {
        return false;
    };
    let clears = match lane_kind(winner) {
        LaneKind::Ground => clears_ground(snap.rex_code, prox),
        LaneKind::Air => clears_air(snap.rex_code, prox),
    };
    !clears
}

/// One oracle tick: snapshot, verdict, latch. Returns true only on the tick
/// that latched the halt; every post-halt tick is a no-op.
pub fn check(board: &HazardBoard) -> bool {
    if board.is_halted() {
        return false;
    }
    collision_verdict(&board.snapshot()) && board.try_halt()
}

/// The fixed-period execution context. Period is independent of (and much
/// shorter than) one animation frame. Ticks after the halt latches are
/// no-ops; the thread exits when `running` is cleared.
pub fn spawn_watchdog(
    board: Arc<HazardBoard>,
    period: Duration,
    running: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while running.load(Ordering::Acquire) {
            check(&board);
            thread::sleep(period);
        }
    })
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(lanes: [u8; 4], rex_code: u8) -> HazardSnapshot {
        HazardSnapshot { lanes, rex_code }
    }

    // Scenario A: ground obstacle reaches the approach threshold while the
    // rex is idle.
    #[test]
    fn ground_approach_hits_idle_rex() {
        assert!(collision_verdict(&snap([98, 0, 0, 0], 0)));
    }

    // Scenario B: inside the clearance window at 98, out of it at 99.
    #[test]
    fn ground_approach_cleared_then_lost() {
        // Jump tier 2 phase (code 12) clears the approach...
        assert!(!collision_verdict(&snap([98, 0, 0, 0], 12)));
        // ...but a phase that has left the window does not clear overlap.
        assert!(collision_verdict(&snap([99, 0, 0, 0], 9)));
    }

    #[test]
    fn ground_overlap_window_is_one_band_tighter() {
        // Code 10 clears the approach but not the overlap.
        assert!(!collision_verdict(&snap([98, 0, 0, 0], 10)));
        assert!(collision_verdict(&snap([99, 0, 0, 0], 10)));
        assert!(!collision_verdict(&snap([99, 0, 0, 0], 11)));
    }

    #[test]
    fn nothing_happens_before_the_approach() {
        assert!(!collision_verdict(&snap([97, 0, 0, 0], 0)));
        assert!(!collision_verdict(&snap([0, 0, 91, 0], 0)));
        assert!(!collision_verdict(&snap([0, 0, 0, 0], 0)));
    }

    #[test]
    fn air_obstacle_uses_the_shorter_threshold() {
        assert!(collision_verdict(&snap([0, 0, 92, 0], 0)));
        // Deep duck slips under at approach; only full duck inside overlap.
        assert!(!collision_verdict(&snap([0, 0, 92, 0], 27)));
        assert!(collision_verdict(&snap([0, 0, 93, 0], 27)));
        assert!(!collision_verdict(&snap([0, 0, 93, 0], 28)));
        // High jump clears both.
        assert!(!collision_verdict(&snap([0, 0, 92, 0], 12)));
    }

    // Ties resolve to the ground lane: at a shared distance of 92 the
    // ground slot wins, and 92 is below the ground approach threshold.
    #[test]
    fn tie_precedence_shields_the_air_threshold() {
        assert!(!collision_verdict(&snap([92, 0, 92, 0], 0)));
        assert!(collision_verdict(&snap([0, 0, 92, 0], 0)));
    }

    #[test]
    fn check_latches_exactly_once() {
        let board = HazardBoard::new();
        board.publish_lanes([99, 0, 0, 0]);
        board.publish_rex(0);
        assert!(check(&board));
        assert!(board.is_halted());
        // Idempotent after halt: no second latch, no state change.
        assert!(!check(&board));
        assert!(!check(&board));
        assert!(board.is_halted());
    }

    #[test]
    fn reset_rearms_the_board() {
        let board = HazardBoard::new();
        board.publish_lanes([99, 0, 0, 0]);
        assert!(check(&board));
        board.reset();
        assert!(!board.is_halted());
        assert_eq!(board.snapshot().lanes, [0; 4]);
        assert!(!check(&board));
    }

    #[test]
    fn watchdog_thread_halts_a_doomed_board() {
        let board = Arc::new(HazardBoard::new());
        let running = Arc::new(AtomicBool::new(true));
        let handle = spawn_watchdog(
            Arc::clone(&board),
            Duration::from_micros(200),
            Arc::clone(&running),
        );
        board.publish_lanes([98, 0, 0, 0]);
        // Give the watchdog a few periods to notice.
        let deadline = std::time::Instant::now() + Duration::from_millis(500);
        while !board.is_halted() && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(board.is_halted());
        running.store(false, Ordering::Release);
        handle.join().expect("watchdog join");
    }
}
