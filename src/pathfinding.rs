//! Breadth-first path planning over the walkable tiles of a level.

use std::collections::{HashMap, HashSet, VecDeque};

use glam::Vec3;

use crate::grid::{Direction, GridPosition};

/// Tiles an agent may occupy or path through.
pub type WalkableSet = HashSet<GridPosition>;

/// Ordered tiles from start to goal, both inclusive.
pub type GamePath = Vec<GridPosition>;

/// Neighbour visitation order: +X, -X, +Y, -Y.
///
/// Among equally short paths the planner returns the one this order
/// discovers first, so the order is part of the planner's contract.
pub const NEIGHBOUR_ORDER: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Right,
    Direction::Left,
];

/// Plans a shortest path between two world positions.
///
/// Both positions are snapped to their tiles first. Returns `None` when the
/// goal is not walkable or cannot be reached from the start.
#[must_use]
pub fn find_path(start: Vec3, goal: Vec3, walkable: &WalkableSet) -> Option<GamePath> {
    find_tile_path(
        GridPosition::from_world(start),
        GridPosition::from_world(goal),
        walkable,
    )
}

/// Plans a shortest path between two tiles.
///
/// The start tile itself does not need to be walkable; every other tile on
/// the path does.
#[must_use]
pub fn find_tile_path(
    start: GridPosition,
    goal: GridPosition,
    walkable: &WalkableSet,
) -> Option<GamePath> {
    if !walkable.contains(&goal) {
        return None;
    }

    if start == goal {
        return Some(vec![start]);
    }

    let mut came_from: HashMap<GridPosition, GridPosition> =
        HashMap::with_capacity(walkable.len() + 1);
    let mut queue = VecDeque::new();
    let _ = came_from.insert(start, start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if current == goal {
            break;
        }

        for direction in NEIGHBOUR_ORDER {
            let next = current.step(direction);
            if !walkable.contains(&next) || came_from.contains_key(&next) {
                continue;
            }

            let _ = came_from.insert(next, current);
            queue.push_back(next);
        }
    }

    if !came_from.contains_key(&goal) {
        return None;
    }

    let mut path = vec![goal];
    let mut at = goal;
    while at != start {
        at = *came_from.get(&at)?;
        path.push(at);
    }
    path.reverse();

    Some(path)
}

#[cfg(test)]
mod tests {
    use super::{WalkableSet, find_path, find_tile_path};
    use crate::grid::GridPosition;

    fn open_grid(width: i32, height: i32) -> WalkableSet {
        let mut walkable = WalkableSet::new();
        for x in 0..width {
            for y in 0..height {
                let _ = walkable.insert(GridPosition::new(x, y));
            }
        }
        walkable
    }

    fn assert_contiguous(path: &[GridPosition]) {
        for pair in path.windows(2) {
            let dx = (pair[0].x - pair[1].x).abs();
            let dy = (pair[0].y - pair[1].y).abs();
            assert_eq!(dx + dy, 1, "path must move one tile per step: {pair:?}");
        }
    }

    #[test]
    fn open_five_by_five_corner_to_corner() {
        let walkable = open_grid(5, 5);

        let path = find_tile_path(GridPosition::new(0, 0), GridPosition::new(4, 4), &walkable)
            .expect("open grid must be solvable");

        assert_eq!(path.len(), 9);
        assert_eq!(path[0], GridPosition::new(0, 0));
        assert_eq!(path[1], GridPosition::new(1, 0));
        assert_eq!(path[8], GridPosition::new(4, 4));
        assert_contiguous(&path);
    }

    #[test]
    fn path_length_matches_manhattan_distance_on_open_grid() {
        let walkable = open_grid(7, 6);
        let start = GridPosition::new(3, 2);

        for goal in walkable.iter().copied() {
            let path = find_tile_path(start, goal, &walkable).expect("open grid is connected");
            let manhattan = (goal.x - start.x).abs() + (goal.y - start.y).abs();
            assert_eq!(path.len(), manhattan as usize + 1);
            assert_contiguous(&path);
        }
    }

    #[test]
    fn start_equal_to_goal_is_a_single_tile_path() {
        let walkable = open_grid(3, 3);

        let path = find_tile_path(GridPosition::new(1, 1), GridPosition::new(1, 1), &walkable);

        assert_eq!(path, Some(vec![GridPosition::new(1, 1)]));
    }

    #[test]
    fn goal_outside_walkable_set_has_no_path() {
        let walkable = open_grid(3, 3);

        assert!(find_tile_path(GridPosition::new(0, 0), GridPosition::new(5, 5), &walkable).is_none());
    }

    #[test]
    fn walled_off_goal_has_no_path() {
        let mut walkable = open_grid(5, 5);
        for x in 0..5 {
            let _ = walkable.remove(&GridPosition::new(x, 2));
        }

        assert!(find_tile_path(GridPosition::new(0, 0), GridPosition::new(0, 4), &walkable).is_none());
    }

    #[test]
    fn path_detours_around_walls() {
        let mut walkable = open_grid(5, 5);
        for y in 0..4 {
            let _ = walkable.remove(&GridPosition::new(2, y));
        }

        let path = find_tile_path(GridPosition::new(0, 0), GridPosition::new(4, 0), &walkable)
            .expect("gap at y = 4 keeps the grid connected");

        assert_eq!(path.len(), 13);
        assert!(path.contains(&GridPosition::new(2, 4)));
        assert_contiguous(&path);
    }

    #[test]
    fn empty_walkable_set_degrades_to_no_path() {
        let walkable = WalkableSet::new();

        assert!(find_tile_path(GridPosition::new(0, 0), GridPosition::new(0, 0), &walkable).is_none());
        assert!(find_tile_path(GridPosition::new(0, 0), GridPosition::new(1, 0), &walkable).is_none());
    }

    #[test]
    fn world_positions_are_snapped_before_planning() {
        let walkable = open_grid(3, 3);
        let start = GridPosition::new(0, 0).to_world() + glam::Vec3::new(30.0, -20.0, 12.0);
        let goal = GridPosition::new(2, 1).to_world() + glam::Vec3::new(-45.0, 10.0, 0.0);

        let path = find_path(start, goal, &walkable).expect("snapped goal is walkable");

        assert_eq!(path.first(), Some(&GridPosition::new(0, 0)));
        assert_eq!(path.last(), Some(&GridPosition::new(2, 1)));
        assert_eq!(path.len(), 4);
    }
}
