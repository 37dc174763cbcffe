/// Spawn scheduler: one random spawn attempt every `SPAWN_INTERVAL` scroll
/// ticks.
///
/// This is process-wide pacing, not per-obstacle scheduling — spacing between
/// obstacles is emergent from travel distance and from activation attempts
/// that find both lanes of a kind busy (those are dropped on the floor).
/// The RNG is a seeded Pcg32 so a session replays exactly under a fixed seed.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::lanes::{LaneBoard, LaneKind, SlotId};

/// Scroll ticks between spawn decisions.
pub const SPAWN_INTERVAL: u8 = 128;

pub struct SpawnScheduler {
    ticks: u8,
    rng: Pcg32,
}

impl SpawnScheduler {
    pub fn new(seed: u64) -> Self {
        SpawnScheduler {
            ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Count one scroll tick; on the 128th, make one uniform Ground/Air
    /// choice and try to activate that lane. A full lane drops the attempt
    /// silently — the counter resets either way.
    pub fn on_scroll_tick(&mut self, lanes: &mut LaneBoard) -> Option<SlotId> {
        self.ticks += 1;
        if self.ticks < SPAWN_INTERVAL {
            return None;
        }
        self.ticks = 0;
        let kind = if self.rng.random_range(0..2) == 0 {
            LaneKind::Ground
        } else {
            LaneKind::Air
        };
        lanes.activate(kind)
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_exactly_once_per_interval() {
        let mut lanes = LaneBoard::new();
        let mut sched = SpawnScheduler::new(7);
        let mut spawns = 0;
        for tick in 1..=(4 * SPAWN_INTERVAL as u32) {
            if sched.on_scroll_tick(&mut lanes).is_some() {
                spawns += 1;
                assert_eq!(tick % SPAWN_INTERVAL as u32, 0, "spawn off-cadence at {tick}");
            }
            // Age and reap so a slot is always free for the next decision.
            lanes.tick();
            lanes.reap_expired();
        }
        assert_eq!(spawns, 4);
    }

    #[test]
    fn deterministic_under_a_fixed_seed() {
        let run = |seed: u64| {
            let mut lanes = LaneBoard::new();
            let mut sched = SpawnScheduler::new(seed);
            let mut kinds = Vec::new();
            for _ in 0..(8 * SPAWN_INTERVAL as u32) {
                if let Some(slot) = sched.on_scroll_tick(&mut lanes) {
                    kinds.push(slot.kind);
                }
                lanes.tick();
                lanes.reap_expired();
            }
            kinds
        };
        assert_eq!(run(42), run(42));
        // Not a fixed constant sequence: some seed disagrees with 42 within
        // eight decisions.
        assert!((0..16).any(|s| run(s) != run(42)));
    }

    #[test]
    fn full_lanes_drop_the_attempt_but_reset_the_counter() {
        let mut lanes = LaneBoard::new();
        // Jam every lane so no decision can land.
        lanes.activate(LaneKind::Ground);
        lanes.activate(LaneKind::Ground);
        lanes.activate(LaneKind::Air);
        lanes.activate(LaneKind::Air);
        let mut sched = SpawnScheduler::new(1);
        for _ in 0..SPAWN_INTERVAL {
            assert_eq!(sched.on_scroll_tick(&mut lanes), None);
        }
        // Counter reset: the next decision happens a full interval later,
        // and succeeds once a slot has been freed.
        lanes = LaneBoard::new();
        for tick in 1..=SPAWN_INTERVAL {
            let spawned = sched.on_scroll_tick(&mut lanes).is_some();
            assert_eq!(spawned, tick == SPAWN_INTERVAL);
        }
    }
}
