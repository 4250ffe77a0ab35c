#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command processor that guards every write to the robot.
//!
//! Transports hold a single [`CommandProcessor`] for the lifetime of the
//! process and route all requests through it. The processor decodes command
//! names, refuses movement before the robot is placed, applies the resulting
//! [`Action`] to the world, and hands back the observable result.

use toy_robot_core::{
    Action, Command, CommandError, Event, Facing, GridSize, Pose, Report, RobotState,
};
use toy_robot_world::{self as world, query, World};
use tracing::{debug, info, warn};

/// Single owner and sole writer of the robot state.
#[derive(Debug)]
pub struct CommandProcessor {
    world: World,
    events: Vec<Event>,
}

impl CommandProcessor {
    /// Creates a processor for a table of the provided dimensions.
    #[must_use]
    pub fn new(grid: GridSize) -> Self {
        Self {
            world: World::with_grid(grid),
            events: Vec::new(),
        }
    }

    /// Places the robot. Returns `false` and keeps the previous state when the
    /// coordinates fall outside the table.
    pub fn place(&mut self, x: i64, y: i64, facing: Facing) -> bool {
        self.try_place(x, y, facing).is_ok()
    }

    /// Places the robot, surfacing the rejected request on failure.
    pub fn try_place(&mut self, x: i64, y: i64, facing: Facing) -> Result<(), CommandError> {
        self.dispatch(Action::Place { x, y, facing });
        if self
            .events
            .iter()
            .any(|event| matches!(event, Event::Placed { .. }))
        {
            Ok(())
        } else {
            Err(CommandError::InvalidPlacement { x, y, facing })
        }
    }

    /// Decodes a command name (case-insensitive) and executes it.
    ///
    /// Returns the report for `REPORT` and `None` for every other command.
    pub fn execute(&mut self, name: &str) -> Result<Option<Report>, CommandError> {
        let command = name.parse::<Command>().map_err(|error| {
            warn!(input = name, "rejected unknown command");
            error
        })?;
        self.execute_command(command)
    }

    /// Executes an already decoded command.
    pub fn execute_command(&mut self, command: Command) -> Result<Option<Report>, CommandError> {
        if command.requires_placement() && !query::is_placed(&self.world) {
            warn!(%command, "rejected command before placement");
            return Err(CommandError::NotPlaced { command });
        }

        match command {
            Command::Move => self.dispatch(Action::Move),
            Command::Left => self.dispatch(Action::RotateLeft),
            Command::Right => self.dispatch(Action::RotateRight),
            Command::Report => {
                let report = query::report(&self.world);
                debug!(report = %Report::describe(report), "reported");
                return Ok(report);
            }
        }
        Ok(None)
    }

    /// Removes the robot from the table by replacing the world outright.
    pub fn reset(&mut self) {
        self.world = World::with_grid(query::grid(&self.world));
        self.events.clear();
        info!("robot reset");
    }

    /// Current placement summary, if any.
    #[must_use]
    pub fn report(&self) -> Option<Report> {
        query::report(&self.world)
    }

    /// Current pose of the robot, if any.
    #[must_use]
    pub fn pose(&self) -> Option<Pose> {
        query::pose(&self.world)
    }

    /// Whether the robot stands on the table.
    #[must_use]
    pub fn is_placed(&self) -> bool {
        query::is_placed(&self.world)
    }

    /// Flattened snapshot for transports.
    #[must_use]
    pub fn state(&self) -> RobotState {
        query::state(&self.world)
    }

    /// Dimensions of the table.
    #[must_use]
    pub fn grid(&self) -> GridSize {
        query::grid(&self.world)
    }

    fn dispatch(&mut self, action: Action) {
        self.events.clear();
        world::apply(&mut self.world, action, &mut self.events);
        for event in &self.events {
            log_event(event);
        }
    }
}

impl Default for CommandProcessor {
    fn default() -> Self {
        Self::new(GridSize::default())
    }
}

fn log_event(event: &Event) {
    match *event {
        Event::Placed { pose } => info!(
            x = pose.position().x(),
            y = pose.position().y(),
            facing = %pose.facing(),
            "robot placed"
        ),
        Event::PlacementRejected { x, y, facing } => {
            warn!(x, y, %facing, "placement outside the table rejected");
        }
        Event::Moved { from, to } => debug!(
            from_x = from.x(),
            from_y = from.y(),
            to_x = to.x(),
            to_y = to.y(),
            "robot moved"
        ),
        Event::MoveBlocked { at, facing } => {
            debug!(x = at.x(), y = at.y(), %facing, "move blocked by table edge");
        }
        Event::Rotated { from, to } => debug!(%from, %to, "robot rotated"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_placement_reports_offending_values() {
        let mut processor = CommandProcessor::default();
        assert_eq!(
            processor.try_place(-1, 2, Facing::East),
            Err(CommandError::InvalidPlacement {
                x: -1,
                y: 2,
                facing: Facing::East,
            })
        );
        assert!(!processor.is_placed());
    }

    #[test]
    fn reset_keeps_configured_grid() {
        let mut processor = CommandProcessor::new(GridSize::new(8, 2));
        assert!(processor.place(7, 1, Facing::North));
        processor.reset();
        assert_eq!(processor.grid(), GridSize::new(8, 2));
        assert_eq!(processor.pose(), None);
        assert!(processor.place(7, 1, Facing::South));
    }

    #[test]
    fn movement_commands_return_no_report() {
        let mut processor = CommandProcessor::default();
        assert!(processor.place(2, 2, Facing::North));
        for name in ["MOVE", "LEFT", "RIGHT"] {
            assert_eq!(processor.execute(name), Ok(None), "{name} should not report");
        }
    }
}
