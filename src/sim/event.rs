/// Events emitted during a scroll step.
/// The presentation layer consumes these for drawing and feedback.

use crate::domain::lanes::SlotId;

#[derive(Clone, Copy, Debug)]
pub enum GameEvent {
    /// A lane slot was activated; the renderer draws the obstacle at its
    /// spawn column.
    ObstacleSpawned { slot: SlotId },
    /// One or more obstacles left the field; the score already includes them.
    ScoreChanged { score: u32 },
}
