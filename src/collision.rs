//! Turns one tick of movement into overlap events.

use std::collections::HashSet;

use log::debug;

use crate::food::Target;
use crate::grid::GridPosition;
use crate::motion::TileCrossing;
use crate::pathfinding::WalkableSet;
use crate::session::ParticipantId;
use crate::snake::Snake;

/// What a head ran into.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OverlapKind {
    TargetConsumed,
    BodyOverlap,
    WallOverlap,
}

/// One overlap, applied by the arena after every snake has moved.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct OverlapEvent {
    pub snake: ParticipantId,
    pub kind: OverlapKind,
    pub tile: GridPosition,
}

/// Checks every tile each head completed this tick.
///
/// `crossings[i]` holds the tiles `snakes[i]` completed. The first tile
/// outside the walkable set, or the first tile holding a body or another
/// head, stops the scan for that snake. A target is consumed by the first
/// head to reach it, even on the tile where that head then crashes. Body checks only apply to grounded heads that left
/// their tile, and ignore segments still in their grace period.
#[must_use]
pub fn detect_overlaps(
    snakes: &[Snake],
    crossings: &[Vec<TileCrossing>],
    walkable: &WalkableSet,
    targets: &[Target],
) -> Vec<OverlapEvent> {
    let mut events = Vec::new();
    let mut consumed: HashSet<GridPosition> = HashSet::new();

    for (snake, completed) in snakes.iter().zip(crossings) {
        let participant = snake.participant();
        let grounded = !snake.motion().is_airborne();
        let mut moves_left = completed
            .iter()
            .filter(|crossing| crossing.vacated != crossing.reached)
            .count();

        for crossing in completed {
            let tile = crossing.reached_tile();
            let overlap = |kind| OverlapEvent {
                snake: participant,
                kind,
                tile,
            };

            if !walkable.contains(&tile) {
                debug!("{participant:?} hit a wall at {tile:?}");
                events.push(overlap(OverlapKind::WallOverlap));
                break;
            }

            let holds_target = targets.iter().any(|target| target.position == tile);
            if holds_target && consumed.insert(tile) {
                events.push(overlap(OverlapKind::TargetConsumed));
            }

            if crossing.vacated != crossing.reached {
                moves_left -= 1;
                // The newest `moves_left` own segments trail over tiles the
                // head reached after this one.
                if grounded && head_hits_body(snake, tile, moves_left, snakes) {
                    debug!("{participant:?} ran into a body at {tile:?}");
                    events.push(overlap(OverlapKind::BodyOverlap));
                    break;
                }
            }
        }
    }

    events
}

fn head_hits_body(snake: &Snake, tile: GridPosition, own_skip: usize, snakes: &[Snake]) -> bool {
    snakes.iter().any(|other| {
        if other.participant() != snake.participant() {
            return other.head_tile() == tile
                || other.body().collidable_tiles().any(|trail| trail == tile);
        }
        other
            .body()
            .segments()
            .iter()
            .skip(own_skip)
            .any(|segment| segment.can_collide() && segment.trail_tile() == tile)
    })
}

#[cfg(test)]
mod tests {
    use super::{OverlapEvent, OverlapKind, detect_overlaps};
    use crate::config::GameConfig;
    use crate::food::Target;
    use crate::grid::{Direction, GridPosition};
    use crate::pathfinding::WalkableSet;
    use crate::session::{ParticipantId, ParticipantKind};
    use crate::snake::Snake;

    fn open_row(length: i32) -> WalkableSet {
        (0..length).map(|y| GridPosition::new(0, y)).collect()
    }

    fn snake_at(id: usize, y: i32) -> Snake {
        let config = GameConfig {
            speed: 400.0,
            grace_period_secs: 0.0,
            ..GameConfig::default()
        };
        Snake::new(
            ParticipantId(id),
            ParticipantKind::Human { player: id },
            GridPosition::new(0, y),
            &config,
        )
    }

    fn start_moving(snake: &mut Snake, direction: Direction) {
        assert!(snake.steer(direction));
        let _ = snake.tick(0.25);
    }

    #[test]
    fn reaching_a_target_consumes_it() {
        let walkable = open_row(5);
        let mut snakes = vec![snake_at(0, 0)];
        start_moving(&mut snakes[0], Direction::Right);
        let crossings = vec![snakes[0].tick(0.25)];

        let events = detect_overlaps(
            &snakes,
            &crossings,
            &walkable,
            &[Target::new(GridPosition::new(0, 1))],
        );

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, OverlapKind::TargetConsumed);
        assert_eq!(events[0].tile, GridPosition::new(0, 1));
    }

    #[test]
    fn leaving_the_walkable_set_is_a_wall_overlap() {
        let walkable = open_row(2);
        let mut snakes = vec![snake_at(0, 1)];
        start_moving(&mut snakes[0], Direction::Right);
        let crossings = vec![snakes[0].tick(0.25)];

        let events = detect_overlaps(&snakes, &crossings, &walkable, &[]);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, OverlapKind::WallOverlap);
        assert_eq!(events[0].tile, GridPosition::new(0, 2));
    }

    #[test]
    fn head_entering_another_head_is_a_body_overlap() {
        let walkable = open_row(4);
        let mut snakes = vec![snake_at(0, 0), snake_at(1, 1)];
        start_moving(&mut snakes[0], Direction::Right);
        let _ = snakes[1].tick(0.25);
        let crossings = vec![snakes[0].tick(0.25), Vec::new()];

        let events = detect_overlaps(&snakes, &crossings, &walkable, &[]);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].snake, ParticipantId(0));
        assert_eq!(events[0].kind, OverlapKind::BodyOverlap);
    }

    fn run_into_fresh_segment(grace_period_secs: f32) -> Vec<OverlapEvent> {
        let walkable = open_row(6);
        let config = GameConfig {
            speed: 400.0,
            grace_period_secs,
            ..GameConfig::default()
        };
        let mut runner = Snake::new(
            ParticipantId(0),
            ParticipantKind::Human { player: 0 },
            GridPosition::new(0, 2),
            &config,
        );
        let mut blocker = Snake::new(
            ParticipantId(1),
            ParticipantKind::Human { player: 1 },
            GridPosition::new(0, 3),
            &config,
        );
        start_moving(&mut blocker, Direction::Right);
        let _ = blocker.tick(0.25);
        blocker.grow();
        let _ = blocker.tick(0.25);
        start_moving(&mut runner, Direction::Right);
        let _ = runner.tick(0.25);

        let mut snakes = vec![runner, blocker];
        let crossings = vec![snakes[0].tick(0.25), Vec::new()];
        assert_eq!(snakes[0].head_tile(), GridPosition::new(0, 4));
        assert_eq!(
            snakes[1].body().segments()[0].trail_tile(),
            GridPosition::new(0, 4)
        );

        detect_overlaps(&snakes, &crossings, &walkable, &[])
    }

    #[test]
    fn segments_in_grace_do_not_collide() {
        assert!(run_into_fresh_segment(0.5).is_empty());
    }

    #[test]
    fn segments_past_grace_collide() {
        let events = run_into_fresh_segment(0.0);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].snake, ParticipantId(0));
        assert_eq!(events[0].kind, OverlapKind::BodyOverlap);
    }

    #[test]
    fn lag_spike_through_a_body_still_collides() {
        let walkable: WalkableSet = (0..3)
            .flat_map(|x| (0..4).map(move |y| GridPosition::new(x, y)))
            .collect();
        let mut blocker = snake_at(1, 1);
        start_moving(&mut blocker, Direction::Up);
        blocker.grow();
        let _ = blocker.tick(0.25);
        assert_eq!(blocker.head_tile(), GridPosition::new(1, 1));
        assert_eq!(
            blocker.body().segments()[0].trail_tile(),
            GridPosition::new(0, 1)
        );

        let mut runner = snake_at(0, 0);
        start_moving(&mut runner, Direction::Right);
        let mut snakes = vec![runner, blocker];
        let crossings = vec![snakes[0].tick(0.5), Vec::new()];
        assert_eq!(crossings[0].len(), 2);
        assert_eq!(snakes[0].head_tile(), GridPosition::new(0, 2));

        let events = detect_overlaps(&snakes, &crossings, &walkable, &[]);

        assert_eq!(
            events,
            vec![OverlapEvent {
                snake: ParticipantId(0),
                kind: OverlapKind::BodyOverlap,
                tile: GridPosition::new(0, 1),
            }]
        );
    }

    #[test]
    fn fast_head_does_not_collide_with_its_own_fresh_trail() {
        let walkable = open_row(6);
        let mut snakes = vec![snake_at(0, 0)];
        start_moving(&mut snakes[0], Direction::Right);
        snakes[0].grow();
        snakes[0].grow();
        let crossings = vec![snakes[0].tick(0.75)];
        assert_eq!(crossings[0].len(), 3);

        assert!(detect_overlaps(&snakes, &crossings, &walkable, &[]).is_empty());
    }

    #[test]
    fn only_the_first_head_consumes_a_shared_target() {
        let walkable = open_row(3);
        let mut snakes = vec![snake_at(0, 0), snake_at(1, 2)];
        start_moving(&mut snakes[0], Direction::Right);
        start_moving(&mut snakes[1], Direction::Left);
        let crossings = vec![snakes[0].tick(0.25), snakes[1].tick(0.25)];

        let events = detect_overlaps(
            &snakes,
            &crossings,
            &walkable,
            &[Target::new(GridPosition::new(0, 1))],
        );

        let consumed: Vec<_> = events
            .iter()
            .filter(|event| event.kind == OverlapKind::TargetConsumed)
            .collect();
        assert_eq!(consumed.len(), 1);
        assert_eq!(consumed[0].snake, ParticipantId(0));
        assert!(events.iter().any(|event| event.kind == OverlapKind::BodyOverlap));
    }
}
