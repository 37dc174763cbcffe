/// The scroll step: advances the world by one pixel-column.
///
/// Processing order (fixed — aging must precede reaping, spawning must
/// follow both so a slot freed this step is only ever reused by the spawn
/// decision that runs after the reap, never the reap that freed it):
///   1. Scroll command to the display
///   2. Lane aging (`tick`)
///   3. Reap exited obstacles, apply the score delta
///   4. Spawn scheduler decision
///   5. Publish lane distances to the hazard board
///
/// Called exactly once per control-loop iteration while playing, whatever
/// the animation branch — the world keeps scrolling through a whole jump or
/// duck.

use super::event::GameEvent;
use super::oracle::HazardBoard;
use super::world::WorldState;
use crate::ui::display::PageDisplay;

pub fn scroll_step(
    world: &mut WorldState,
    display: &mut dyn PageDisplay,
    hazards: &HazardBoard,
    events: &mut Vec<GameEvent>,
) {
    display.scroll_one_column();

    world.lanes.tick();
    let reaped = world.lanes.reap_expired();
    if reaped > 0 {
        world.score = world.score.saturating_add(reaped);
        events.push(GameEvent::ScoreChanged { score: world.score });
    }
    if let Some(slot) = world.spawner.on_scroll_tick(&mut world.lanes) {
        events.push(GameEvent::ObstacleSpawned { slot });
    }

    hazards.publish_lanes(world.lanes.distances());
    world.tick += 1;
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lanes::{LaneKind, DESPAWN_DISTANCE};
    use crate::domain::spawn::SPAWN_INTERVAL;
    use crate::ui::display::PageBuffer;

    fn run_steps(world: &mut WorldState, n: u32) -> Vec<GameEvent> {
        let mut display = PageBuffer::new();
        let hazards = HazardBoard::new();
        let mut events = Vec::new();
        for _ in 0..n {
            scroll_step(world, &mut display, &hazards, &mut events);
        }
        events
    }

    #[test]
    fn obstacle_lifecycle_scores_one_point() {
        let mut world = WorldState::new(9);
        world.lanes.activate(LaneKind::Ground);
        // Activated at distance 1; DESPAWN - 1 steps age it to the exact
        // despawn point, where the same step reaps it.
        let events = run_steps(&mut world, DESPAWN_DISTANCE as u32 - 1);
        assert_eq!(world.score, 1);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::ScoreChanged { score: 1 })));
    }

    #[test]
    fn aging_precedes_reaping() {
        let mut world = WorldState::new(9);
        world.lanes.activate(LaneKind::Air);
        run_steps(&mut world, DESPAWN_DISTANCE as u32 - 2);
        // One short of the threshold: still active.
        assert_eq!(world.lanes.max_active_distance(), DESPAWN_DISTANCE - 1);
        assert_eq!(world.score, 0);
        run_steps(&mut world, 1);
        // The step that reached 119 also reaped it — never skipping the
        // exact deactivation point.
        assert_eq!(world.lanes.max_active_distance(), 0);
        assert_eq!(world.score, 1);
    }

    #[test]
    fn spawns_arrive_on_the_scheduler_cadence() {
        let mut world = WorldState::new(5);
        let events = run_steps(&mut world, 4 * SPAWN_INTERVAL as u32);
        let spawns = events
            .iter()
            .filter(|e| matches!(e, GameEvent::ObstacleSpawned { .. }))
            .count();
        assert_eq!(spawns, 4);
        assert_eq!(world.tick, 4 * SPAWN_INTERVAL as u64);
    }

    #[test]
    fn hazard_board_sees_published_distances() {
        let mut display = PageBuffer::new();
        let hazards = HazardBoard::new();
        let mut events = Vec::new();
        let mut world = WorldState::new(9);
        world.lanes.activate(LaneKind::Ground);
        scroll_step(&mut world, &mut display, &hazards, &mut events);
        assert_eq!(hazards.snapshot().lanes, [2, 0, 0, 0]);
    }

    #[test]
    fn scroll_command_reaches_the_display() {
        let mut display = PageBuffer::new();
        display.set_cursor(10, 6);
        display.write_byte(0xFF);
        let hazards = HazardBoard::new();
        let mut world = WorldState::new(9);
        scroll_step(&mut world, &mut display, &hazards, &mut Vec::new());
        assert_eq!(display.byte(9, 6), 0xFF);
        assert_eq!(display.byte(10, 6), 0);
    }
}
