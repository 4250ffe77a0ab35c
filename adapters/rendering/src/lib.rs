#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Text rendering of the table for terminal adapters.

use std::fmt::{self, Write as _};

use toy_robot_core::{Facing, GridSize, Pose};

/// Width of a single cell's interior in characters.
const CELL_WIDTH: usize = 3;

/// Snapshot of everything needed to draw one frame of the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableView {
    grid: GridSize,
    robot: Option<Pose>,
}

impl TableView {
    /// Captures a view of the table and the robot standing on it, if any.
    #[must_use]
    pub const fn new(grid: GridSize, robot: Option<Pose>) -> Self {
        Self { grid, robot }
    }

    fn glyph_at(&self, x: u32, y: u32) -> char {
        match self.robot {
            Some(pose) if pose.position().x() == x && pose.position().y() == y => {
                facing_glyph(pose.facing())
            }
            _ => ' ',
        }
    }
}

impl fmt::Display for TableView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns = self.grid.width();
        let mut rule = String::from("+");
        for _ in 0..columns {
            rule.push_str(&"-".repeat(CELL_WIDTH));
            rule.push('+');
        }

        writeln!(f, "{rule}")?;
        // Row zero is the southern edge, so draw from the top row down.
        for y in (0..self.grid.height()).rev() {
            let mut row = String::from("|");
            for x in 0..columns {
                write!(row, " {} |", self.glyph_at(x, y))?;
            }
            writeln!(f, "{row}")?;
            writeln!(f, "{rule}")?;
        }
        Ok(())
    }
}

/// Arrow drawn for a robot facing the provided direction.
#[must_use]
pub const fn facing_glyph(facing: Facing) -> char {
    match facing {
        Facing::North => '^',
        Facing::East => '>',
        Facing::South => 'v',
        Facing::West => '<',
    }
}

/// Renders the table with the robot drawn as an arrow.
#[must_use]
pub fn render_table(grid: GridSize, robot: Option<Pose>) -> String {
    TableView::new(grid, robot).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use toy_robot_core::Position;

    #[test]
    fn empty_table_has_bordered_rows() {
        let rendered = render_table(GridSize::new(2, 1), None);
        assert_eq!(rendered, "+---+---+\n|   |   |\n+---+---+\n");
    }

    #[test]
    fn robot_is_drawn_with_north_at_the_top() {
        let pose = Pose::new(Position::new(1, 1), Facing::East);
        let rendered = render_table(GridSize::new(2, 2), Some(pose));
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "|   | > |", "top row holds y = 1");
        assert_eq!(lines[3], "|   |   |");
    }

    #[test]
    fn every_facing_has_a_distinct_glyph() {
        let glyphs: Vec<char> = Facing::ALL.into_iter().map(facing_glyph).collect();
        assert_eq!(glyphs, vec!['^', '>', 'v', '<']);
    }
}
