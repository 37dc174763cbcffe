/// WorldState: the complete snapshot of a running session.
///
/// Created at session start (lanes vacant, score 0, rex idle), mutated only
/// by the control loop during play, frozen once the collision oracle halts
/// the session, and rebuilt from scratch on the external reset signal.
///
/// The fields the oracle reads concurrently are *published* out of this
/// struct into the `HazardBoard` of single-word atomics after every
/// mutation; the oracle never touches `WorldState` itself.

use crate::domain::lanes::LaneBoard;
use crate::domain::rex::RexRig;
use crate::domain::spawn::SpawnScheduler;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionPhase {
    WaitingToStart,
    Playing,
    Ended,
}

pub struct WorldState {
    pub lanes: LaneBoard,
    pub rex: RexRig,
    pub spawner: SpawnScheduler,
    pub score: u32,
    pub phase: SessionPhase,
    /// Scroll steps since session start.
    pub tick: u64,
    seed: u64,
}

impl WorldState {
    pub fn new(seed: u64) -> Self {
        WorldState {
            lanes: LaneBoard::new(),
            rex: RexRig::new(),
            spawner: SpawnScheduler::new(seed),
            score: 0,
            phase: SessionPhase::WaitingToStart,
            tick: 0,
            seed,
        }
    }

    /// Full reinitialization, as the hardware reset line would do. The seed
    /// is kept: a hardware reset restarted the RNG sequence as well.
    pub fn reset(&mut self) {
        *self = WorldState::new(self.seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lanes::LaneKind;
    use crate::domain::rex::StickCmd;

    #[test]
    fn reset_rebuilds_everything() {
        let mut world = WorldState::new(3);
        world.lanes.activate(LaneKind::Ground);
        world.rex.advance(StickCmd::Up);
        world.score = 12;
        world.phase = SessionPhase::Ended;
        world.tick = 400;

        world.reset();
        assert_eq!(world.score, 0);
        assert_eq!(world.phase, SessionPhase::WaitingToStart);
        assert_eq!(world.tick, 0);
        assert_eq!(world.lanes.max_active_distance(), 0);
        assert!(!world.rex.is_jumping());
    }
}
