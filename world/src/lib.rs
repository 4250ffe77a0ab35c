#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative robot state for the toy robot table.

use toy_robot_core::{Action, Event, Facing, GridSize, Pose, Report};

/// Represents the table and the single robot that may stand on it.
///
/// The robot is either fully placed or absent. Position and facing live in
/// one `Option<Pose>`, so "placed" is derived from its presence rather than
/// tracked separately.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct World {
    grid: GridSize,
    pose: Option<Pose>,
}

impl World {
    /// Creates a world with the default 5x5 table and no robot on it.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a world with a table of the provided dimensions.
    #[must_use]
    pub const fn with_grid(grid: GridSize) -> Self {
        Self { grid, pose: None }
    }

    /// Places the robot, replacing any previous placement.
    ///
    /// Returns `false` and leaves the world untouched when the coordinates
    /// fall outside the table.
    pub fn place(&mut self, x: i64, y: i64, facing: Facing) -> bool {
        match self.grid.position(x, y) {
            Some(position) => {
                self.pose = Some(Pose::new(position, facing));
                true
            }
            None => false,
        }
    }

    /// Advances one cell in the current facing, stopping at the table edge.
    ///
    /// Does nothing while the robot is unplaced.
    pub fn move_forward(&mut self) {
        if let Some(pose) = self.pose {
            let next = self.grid.step(pose.position(), pose.facing());
            self.pose = Some(pose.with_position(next));
        }
    }

    /// Turns 90 degrees counter-clockwise. Does nothing while unplaced.
    pub fn rotate_left(&mut self) {
        if let Some(pose) = self.pose {
            self.pose = Some(pose.with_facing(pose.facing().rotated_left()));
        }
    }

    /// Turns 90 degrees clockwise. Does nothing while unplaced.
    pub fn rotate_right(&mut self) {
        if let Some(pose) = self.pose {
            self.pose = Some(pose.with_facing(pose.facing().rotated_right()));
        }
    }

    /// Current placement summary, or `None` while unplaced.
    #[must_use]
    pub fn report(&self) -> Option<Report> {
        self.pose.map(Report::new)
    }

    /// Whether the robot stands on the table.
    #[must_use]
    pub const fn is_placed(&self) -> bool {
        self.pose.is_some()
    }
}

/// Applies the provided action to the world and records what happened.
///
/// Movement and rotation against an unplaced robot are silent no-ops; callers
/// that need to refuse them must check placement first.
pub fn apply(world: &mut World, action: Action, out_events: &mut Vec<Event>) {
    match action {
        Action::Place { x, y, facing } => {
            if world.place(x, y, facing) {
                if let Some(pose) = world.pose {
                    out_events.push(Event::Placed { pose });
                }
            } else {
                out_events.push(Event::PlacementRejected { x, y, facing });
            }
        }
        Action::Move => {
            let Some(before) = world.pose else {
                return;
            };
            world.move_forward();
            let after = world.pose.map_or(before.position(), |pose| pose.position());
            if after == before.position() {
                out_events.push(Event::MoveBlocked {
                    at: after,
                    facing: before.facing(),
                });
            } else {
                out_events.push(Event::Moved {
                    from: before.position(),
                    to: after,
                });
            }
        }
        Action::RotateLeft => rotate(world, World::rotate_left, out_events),
        Action::RotateRight => rotate(world, World::rotate_right, out_events),
    }
}

fn rotate(world: &mut World, turn: fn(&mut World), out_events: &mut Vec<Event>) {
    let Some(before) = world.pose else {
        return;
    };
    turn(world);
    if let Some(after) = world.pose {
        out_events.push(Event::Rotated {
            from: before.facing(),
            to: after.facing(),
        });
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use toy_robot_core::{GridSize, Pose, Report, RobotState};

    /// Dimensions of the table.
    #[must_use]
    pub fn grid(world: &World) -> GridSize {
        world.grid
    }

    /// Current pose of the robot, if it is placed.
    #[must_use]
    pub fn pose(world: &World) -> Option<Pose> {
        world.pose
    }

    /// Whether the robot stands on the table.
    #[must_use]
    pub fn is_placed(world: &World) -> bool {
        world.is_placed()
    }

    /// Current placement summary, if any.
    #[must_use]
    pub fn report(world: &World) -> Option<Report> {
        world.report()
    }

    /// Flattened snapshot for transports.
    #[must_use]
    pub fn state(world: &World) -> RobotState {
        RobotState::from(world.pose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toy_robot_core::Position;

    fn placed_at(x: i64, y: i64, facing: Facing) -> World {
        let mut world = World::new();
        assert!(world.place(x, y, facing), "fixture placement must succeed");
        world
    }

    #[test]
    fn new_world_is_unplaced() {
        let world = World::new();
        assert!(!world.is_placed());
        assert_eq!(world.report(), None);
        assert_eq!(query::grid(&world), GridSize::new(5, 5));
    }

    #[test]
    fn unplaced_movement_is_a_no_op() {
        let mut world = World::new();
        world.move_forward();
        world.rotate_left();
        world.rotate_right();
        assert_eq!(world, World::new());
    }

    #[test]
    fn rejected_placement_keeps_previous_pose() {
        let mut world = placed_at(2, 3, Facing::South);
        assert!(!world.place(5, 0, Facing::North));
        assert!(!world.place(0, -1, Facing::North));
        assert_eq!(world.report().map(|r| r.to_string()).as_deref(), Some("2,3,SOUTH"));
    }

    #[test]
    fn placement_overwrites_every_field() {
        let mut world = placed_at(2, 3, Facing::South);
        assert!(world.place(0, 4, Facing::West));
        assert_eq!(
            query::pose(&world),
            Some(Pose::new(Position::new(0, 4), Facing::West))
        );
    }

    #[test]
    fn move_changes_only_the_facing_axis() {
        let mut world = placed_at(2, 2, Facing::East);
        world.move_forward();
        assert_eq!(query::pose(&world).map(|p| p.position()), Some(Position::new(3, 2)));

        let mut world = placed_at(2, 2, Facing::South);
        world.move_forward();
        assert_eq!(query::pose(&world).map(|p| p.position()), Some(Position::new(2, 1)));
    }

    #[test]
    fn custom_grid_bounds_are_respected() {
        let mut world = World::with_grid(GridSize::new(3, 7));
        assert!(!world.place(3, 0, Facing::North));
        assert!(world.place(2, 6, Facing::North));
        world.move_forward();
        world.rotate_right();
        world.move_forward();
        assert_eq!(world.report().map(|r| r.to_string()).as_deref(), Some("2,6,EAST"));
    }

    #[test]
    fn apply_reports_placement_outcomes() {
        let mut world = World::new();
        let mut events = Vec::new();

        apply(
            &mut world,
            Action::Place {
                x: 9,
                y: 9,
                facing: Facing::North,
            },
            &mut events,
        );
        apply(
            &mut world,
            Action::Place {
                x: 1,
                y: 1,
                facing: Facing::North,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::PlacementRejected {
                    x: 9,
                    y: 9,
                    facing: Facing::North,
                },
                Event::Placed {
                    pose: Pose::new(Position::new(1, 1), Facing::North),
                },
            ]
        );
    }

    #[test]
    fn apply_distinguishes_moves_from_blocked_moves() {
        let mut world = placed_at(0, 3, Facing::North);
        let mut events = Vec::new();

        apply(&mut world, Action::Move, &mut events);
        apply(&mut world, Action::Move, &mut events);

        assert_eq!(
            events,
            vec![
                Event::Moved {
                    from: Position::new(0, 3),
                    to: Position::new(0, 4),
                },
                Event::MoveBlocked {
                    at: Position::new(0, 4),
                    facing: Facing::North,
                },
            ]
        );
    }

    #[test]
    fn apply_records_rotations() {
        let mut world = placed_at(0, 0, Facing::North);
        let mut events = Vec::new();

        apply(&mut world, Action::RotateLeft, &mut events);
        apply(&mut world, Action::RotateRight, &mut events);

        assert_eq!(
            events,
            vec![
                Event::Rotated {
                    from: Facing::North,
                    to: Facing::West,
                },
                Event::Rotated {
                    from: Facing::West,
                    to: Facing::North,
                },
            ]
        );
    }

    #[test]
    fn apply_is_silent_while_unplaced() {
        let mut world = World::new();
        let mut events = Vec::new();

        apply(&mut world, Action::Move, &mut events);
        apply(&mut world, Action::RotateLeft, &mut events);
        apply(&mut world, Action::RotateRight, &mut events);

        assert!(events.is_empty());
        assert!(!query::is_placed(&world));
    }
}
