#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the toy robot workspace.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the command processor. Adapters decode wire-level
//! input into [`Command`] values exactly once, the processor translates them
//! into [`Action`] values that the world executes via its `apply` entry
//! point, and the world reports what happened as [`Event`] values.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of columns on the table when no configuration overrides it.
pub const DEFAULT_GRID_WIDTH: u32 = 5;

/// Number of rows on the table when no configuration overrides it.
pub const DEFAULT_GRID_HEIGHT: u32 = 5;

/// Text reported in place of a position while the robot is off the table.
pub const NOT_PLACED_REPORT: &str = "Not placed";

/// Cardinal orientations the robot may face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Facing {
    /// Facing toward increasing `y`.
    North,
    /// Facing toward increasing `x`.
    East,
    /// Facing toward decreasing `y`.
    South,
    /// Facing toward decreasing `x`.
    West,
}

impl Facing {
    /// Every facing in clockwise order starting from north.
    pub const ALL: [Facing; 4] = [Facing::North, Facing::East, Facing::South, Facing::West];

    /// Facing obtained by turning 90 degrees counter-clockwise.
    #[must_use]
    pub const fn rotated_left(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
            Self::East => Self::North,
        }
    }

    /// Facing obtained by turning 90 degrees clockwise.
    #[must_use]
    pub const fn rotated_right(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// Upper-case name used in reports and on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::North => "NORTH",
            Self::East => "EAST",
            Self::South => "SOUTH",
            Self::West => "WEST",
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Facing {
    type Err = ParseFacingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|facing| facing.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseFacingError(value.to_owned()))
    }
}

/// Error produced when text does not name one of the four facings.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown facing `{0}`, expected one of NORTH, EAST, SOUTH or WEST")]
pub struct ParseFacingError(String);

impl ParseFacingError {
    /// The rejected input, verbatim.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.0
    }
}

/// Dimensions of the table measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    width: u32,
    height: u32,
}

impl GridSize {
    /// Creates a grid description with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of columns on the table.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows on the table.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Resolves signed coordinates into a position, or `None` when they fall
    /// outside `[0, width) x [0, height)`.
    #[must_use]
    pub fn position(&self, x: i64, y: i64) -> Option<Position> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        (x < self.width && y < self.height).then_some(Position::new(x, y))
    }

    /// Reports whether the position lies on the table.
    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.x < self.width && position.y < self.height
    }

    /// Position one cell ahead in the provided direction, clamped to the
    /// table edges.
    #[must_use]
    pub fn step(&self, from: Position, facing: Facing) -> Position {
        let max_x = self.width.saturating_sub(1);
        let max_y = self.height.saturating_sub(1);
        match facing {
            Facing::North => Position::new(from.x, from.y.saturating_add(1).min(max_y)),
            Facing::East => Position::new(from.x.saturating_add(1).min(max_x), from.y),
            Facing::South => Position::new(from.x, from.y.saturating_sub(1)),
            Facing::West => Position::new(from.x.saturating_sub(1), from.y),
        }
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_WIDTH, DEFAULT_GRID_HEIGHT)
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Cell on the table expressed as zero-based column and row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    x: u32,
    y: u32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row, growing northward.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }
}

/// Complete placement of the robot: where it stands and where it looks.
///
/// Position and facing only ever change together through a new `Pose`, which
/// keeps a placed robot from being observed half-updated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pose {
    position: Position,
    facing: Facing,
}

impl Pose {
    /// Creates a pose from its parts.
    #[must_use]
    pub const fn new(position: Position, facing: Facing) -> Self {
        Self { position, facing }
    }

    /// Cell the robot occupies.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Direction the robot faces.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Copy of the pose standing on another cell.
    #[must_use]
    pub const fn with_position(self, position: Position) -> Self {
        Self { position, ..self }
    }

    /// Copy of the pose facing another direction.
    #[must_use]
    pub const fn with_facing(self, facing: Facing) -> Self {
        Self { facing, ..self }
    }
}

/// Externally visible summary of a placed robot.
///
/// Formats as `"{x},{y},{FACING}"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Report {
    pose: Pose,
}

impl Report {
    /// Captures a report for the provided pose.
    #[must_use]
    pub const fn new(pose: Pose) -> Self {
        Self { pose }
    }

    /// Pose the report describes.
    #[must_use]
    pub const fn pose(&self) -> Pose {
        self.pose
    }

    /// Renders an optional report, substituting [`NOT_PLACED_REPORT`] for
    /// `None`.
    #[must_use]
    pub fn describe(report: Option<Report>) -> String {
        report.map_or_else(|| NOT_PLACED_REPORT.to_owned(), |report| report.to_string())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let position = self.pose.position();
        write!(f, "{},{},{}", position.x(), position.y(), self.pose.facing())
    }
}

/// Flattened snapshot of the robot used by transports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotState {
    /// Current column, absent while unplaced.
    pub x: Option<u32>,
    /// Current row, absent while unplaced.
    pub y: Option<u32>,
    /// Current facing, absent while unplaced.
    pub facing: Option<Facing>,
    /// Whether the robot stands on the table.
    pub placed: bool,
}

impl From<Option<Pose>> for RobotState {
    fn from(pose: Option<Pose>) -> Self {
        match pose {
            Some(pose) => Self {
                x: Some(pose.position().x()),
                y: Some(pose.position().y()),
                facing: Some(pose.facing()),
                placed: true,
            },
            None => Self::default(),
        }
    }
}

/// Closed set of named commands accepted from the outside world.
///
/// Placement and reset carry arguments or act on the processor itself, so
/// they are separate operations rather than variants here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Advance one cell in the current facing.
    Move,
    /// Rotate 90 degrees counter-clockwise.
    Left,
    /// Rotate 90 degrees clockwise.
    Right,
    /// Describe the current placement.
    Report,
}

impl Command {
    /// Every command in its canonical order.
    pub const ALL: [Command; 4] = [Command::Move, Command::Left, Command::Right, Command::Report];

    /// Canonical upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Move => "MOVE",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Report => "REPORT",
        }
    }

    /// Whether the command is only legal once the robot is placed.
    ///
    /// `REPORT` is the one command that is always legal.
    #[must_use]
    pub const fn requires_placement(self) -> bool {
        !matches!(self, Self::Report)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|command| command.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CommandError::UnknownCommand(value.to_owned()))
    }
}

/// Mutations the world knows how to perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Put the robot on the table, replacing any previous placement.
    Place {
        /// Requested column.
        x: i64,
        /// Requested row.
        y: i64,
        /// Requested facing.
        facing: Facing,
    },
    /// Advance one cell in the current facing.
    Move,
    /// Rotate 90 degrees counter-clockwise.
    RotateLeft,
    /// Rotate 90 degrees clockwise.
    RotateRight,
}

/// Events broadcast by the world after applying an [`Action`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// The robot now stands at the provided pose.
    Placed {
        /// Pose that became current.
        pose: Pose,
    },
    /// A placement request fell outside the table and was ignored.
    PlacementRejected {
        /// Requested column.
        x: i64,
        /// Requested row.
        y: i64,
        /// Requested facing.
        facing: Facing,
    },
    /// The robot advanced between two cells.
    Moved {
        /// Cell occupied before the move.
        from: Position,
        /// Cell occupied after the move.
        to: Position,
    },
    /// The robot stood at an edge and stayed put.
    MoveBlocked {
        /// Cell the robot remains on.
        at: Position,
        /// Facing that pointed off the table.
        facing: Facing,
    },
    /// The robot turned in place.
    Rotated {
        /// Facing before the turn.
        from: Facing,
        /// Facing after the turn.
        to: Facing,
    },
}

/// Reasons a request against the robot can fail.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Coordinates fell outside the table.
    #[error("cannot place robot at position ({x}, {y}) facing {facing}")]
    InvalidPlacement {
        /// Requested column.
        x: i64,
        /// Requested row.
        y: i64,
        /// Requested facing.
        facing: Facing,
    },
    /// A movement command arrived before any successful placement.
    #[error("robot has not been placed on the table yet")]
    NotPlaced {
        /// Command that was refused.
        command: Command,
    },
    /// The command name did not match any known command.
    #[error("invalid or unknown command: {0}")]
    UnknownCommand(String),
}

impl CommandError {
    /// Stable machine-readable code for the error kind.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidPlacement { .. } => "invalid_placement",
            Self::NotPlaced { .. } => "robot_not_placed",
            Self::UnknownCommand(_) => "invalid_command",
        }
    }
}
