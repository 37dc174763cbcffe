/// Obstacle lane tracker: four independent travel-distance slots.
///
/// Two "ground" slots (cacti) and two "air" slots (pterodactyls). A slot is
/// either vacant (`distance == 0`) or active, counting the pixel-columns the
/// obstacle has traveled since spawn. A slot frees up only when its obstacle
/// leaves the visible field at `DESPAWN_DISTANCE`.
///
/// Precedence is fixed everywhere: ground A, ground B, air A, air B.
/// `nearest_threat` resolves distance ties in that order, which keeps the
/// collision rules deterministic when two lanes line up.

/// Pixel-columns traveled at which an obstacle has left the field.
pub const DESPAWN_DISTANCE: u8 = 119;

/// Obstacle band a lane belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LaneKind {
    Ground,
    Air,
}

/// One of the four slots, in precedence order.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SlotId {
    pub kind: LaneKind,
    /// 0 = slot A, 1 = slot B within the kind.
    pub index: usize,
}

#[derive(Clone, Copy, Default, Debug)]
struct Slot {
    /// 0 = vacant; >= 1 = pixel-columns traveled since spawn.
    distance: u8,
}

#[derive(Clone, Debug)]
pub struct LaneBoard {
    ground: [Slot; 2],
    air: [Slot; 2],
}

impl LaneBoard {
    pub fn new() -> Self {
        LaneBoard {
            ground: [Slot::default(); 2],
            air: [Slot::default(); 2],
        }
    }

    /// Claim the first vacant slot of the requested kind (A before B) and
    /// start it at distance 1. Both slots busy → `None`: the spawn attempt is
    /// dropped, which is a game event, not an error.
    pub fn activate(&mut self, kind: LaneKind) -> Option<SlotId> {
        let slots = match kind {
            LaneKind::Ground => &mut self.ground,
            LaneKind::Air => &mut self.air,
        };
        for (index, slot) in slots.iter_mut().enumerate() {
            if slot.distance == 0 {
                slot.distance = 1;
                return Some(SlotId { kind, index });
            }
        }
        None
    }

    /// Age every active slot by one pixel-column. Exactly once per scroll
    /// step, before `reap_expired`.
    pub fn tick(&mut self) {
        for slot in self.ground.iter_mut().chain(self.air.iter_mut()) {
            if slot.distance > 0 {
                slot.distance += 1;
            }
        }
    }

    /// Free every slot that has reached `DESPAWN_DISTANCE`; returns +1 per
    /// slot freed (the score delta). Exactly once per scroll step, after
    /// `tick`.
    pub fn reap_expired(&mut self) -> u32 {
        let mut reaped = 0;
        for slot in self.ground.iter_mut().chain(self.air.iter_mut()) {
            if slot.distance >= DESPAWN_DISTANCE {
                slot.distance = 0;
                reaped += 1;
            }
        }
        reaped
    }

    /// Largest active distance, 0 when all lanes are vacant.
    pub fn max_active_distance(&self) -> u8 {
        self.distances().into_iter().fold(0, u8::max)
    }

    /// The winning slot: kind and distance of the obstacle nearest the
    /// collision point. Ties resolve by the fixed precedence scan, so a
    /// ground obstacle at the same distance as an air one wins.
    pub fn nearest_threat(&self) -> Option<(LaneKind, u8)> {
        let max = self.max_active_distance();
        if max == 0 {
            return None;
        }
        let kind = if self.ground.iter().any(|s| s.distance == max) {
            LaneKind::Ground
        } else {
            LaneKind::Air
        };
        Some((kind, max))
    }

    /// All four distances in precedence order (ground A, ground B, air A,
    /// air B) — the form published to the hazard board.
    pub fn distances(&self) -> [u8; 4] {
        [
            self.ground[0].distance,
            self.ground[1].distance,
            self.air[0].distance,
            self.air[1].distance,
        ]
    }

    #[cfg(test)]
    fn set_distance(&mut self, id: SlotId, distance: u8) {
        match id.kind {
            LaneKind::Ground => self.ground[id.index].distance = distance,
            LaneKind::Air => self.air[id.index].distance = distance,
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(kind: LaneKind, index: usize) -> SlotId {
        SlotId { kind, index }
    }

    #[test]
    fn activate_prefers_slot_a_then_b_then_drops() {
        let mut board = LaneBoard::new();
        assert_eq!(board.activate(LaneKind::Ground), Some(slot(LaneKind::Ground, 0)));
        assert_eq!(board.activate(LaneKind::Ground), Some(slot(LaneKind::Ground, 1)));
        // Both ground slots busy: the attempt is silently dropped.
        assert_eq!(board.activate(LaneKind::Ground), None);
        // Air lanes are independent.
        assert_eq!(board.activate(LaneKind::Air), Some(slot(LaneKind::Air, 0)));
    }

    #[test]
    fn tick_ages_active_slots_only() {
        let mut board = LaneBoard::new();
        board.activate(LaneKind::Ground);
        board.tick();
        board.tick();
        assert_eq!(board.distances(), [3, 0, 0, 0]);
    }

    #[test]
    fn distance_is_monotonic_while_active() {
        let mut board = LaneBoard::new();
        board.activate(LaneKind::Air);
        let mut last = 0;
        for _ in 0..(DESPAWN_DISTANCE - 1) {
            board.tick();
            let d = board.distances()[2];
            assert!(d > last);
            last = d;
        }
        assert_eq!(last, DESPAWN_DISTANCE);
    }

    #[test]
    fn reap_fires_at_exactly_the_despawn_distance() {
        let mut board = LaneBoard::new();
        board.activate(LaneKind::Ground);
        for _ in 0..(DESPAWN_DISTANCE - 2) {
            board.tick();
            assert_eq!(board.reap_expired(), 0);
        }
        assert_eq!(board.distances()[0], DESPAWN_DISTANCE - 1);
        board.tick();
        assert_eq!(board.distances()[0], DESPAWN_DISTANCE);
        assert_eq!(board.reap_expired(), 1);
        assert_eq!(board.distances()[0], 0);
    }

    #[test]
    fn reap_frees_every_expired_slot_in_one_call() {
        let mut board = LaneBoard::new();
        board.set_distance(slot(LaneKind::Ground, 0), DESPAWN_DISTANCE);
        board.set_distance(slot(LaneKind::Air, 1), DESPAWN_DISTANCE);
        assert_eq!(board.reap_expired(), 2);
        assert_eq!(board.distances(), [0, 0, 0, 0]);
    }

    #[test]
    fn freed_slot_is_reusable() {
        let mut board = LaneBoard::new();
        board.set_distance(slot(LaneKind::Ground, 0), DESPAWN_DISTANCE);
        board.set_distance(slot(LaneKind::Ground, 1), 40);
        board.reap_expired();
        assert_eq!(board.activate(LaneKind::Ground), Some(slot(LaneKind::Ground, 0)));
        assert_eq!(board.distances(), [1, 40, 0, 0]);
    }

    // Scenario C from the collision test plan: two ground obstacles at 98
    // and 119; reaping frees the far one, scores +1, and the threat query
    // then reports 98.
    #[test]
    fn reap_then_nearest_threat() {
        let mut board = LaneBoard::new();
        board.set_distance(slot(LaneKind::Ground, 0), 98);
        board.set_distance(slot(LaneKind::Ground, 1), DESPAWN_DISTANCE);
        assert_eq!(board.reap_expired(), 1);
        assert_eq!(board.max_active_distance(), 98);
        assert_eq!(board.nearest_threat(), Some((LaneKind::Ground, 98)));
    }

    #[test]
    fn nearest_threat_tie_favors_ground() {
        let mut board = LaneBoard::new();
        board.set_distance(slot(LaneKind::Ground, 1), 92);
        board.set_distance(slot(LaneKind::Air, 0), 92);
        assert_eq!(board.nearest_threat(), Some((LaneKind::Ground, 92)));
    }

    #[test]
    fn nearest_threat_none_when_vacant() {
        let board = LaneBoard::new();
        assert_eq!(board.nearest_threat(), None);
        assert_eq!(board.max_active_distance(), 0);
    }
}
