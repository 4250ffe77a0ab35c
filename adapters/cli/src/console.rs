//! Interactive and scripted console front ends.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use toy_robot_rendering::render_table;
use toy_robot_system_processor::CommandProcessor;
use tracing::warn;

use crate::protocol;

const HELP: &str = "\
Commands:
  PLACE X,Y,FACING   put the robot on the table (FACING is NORTH, EAST, SOUTH or WEST)
  MOVE               advance one cell
  LEFT | RIGHT       turn 90 degrees
  REPORT             print position and facing
  STATE              print the full robot state
  RESET              take the robot off the table
  HEALTH             print service status and table size
  HELP               show this text
  QUIT               leave";

/// How script responses are printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Reads requests until `QUIT` or end of input, drawing the table after each
/// one.
pub(crate) fn run_repl<R, W>(processor: &mut CommandProcessor, mut input: R, mut output: W) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(
        output,
        "Toy robot on a {} table. Type HELP for commands, QUIT to leave.",
        processor.grid()
    )?;

    let mut line = String::new();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line).context("failed to read from stdin")? == 0 {
            break;
        }
        let request = line.trim();
        if request.is_empty() {
            continue;
        }
        if request.eq_ignore_ascii_case("QUIT") || request.eq_ignore_ascii_case("EXIT") {
            break;
        }
        if request.eq_ignore_ascii_case("HELP") {
            writeln!(output, "{HELP}")?;
            continue;
        }

        let response = protocol::handle_line(processor, request);
        writeln!(output, "{}", response.message())?;
        write!(output, "{}", render_table(processor.grid(), processor.pose()))?;
    }
    Ok(())
}

/// Executes every request line in `input`, skipping blanks and `#` comments.
///
/// Returns the number of requests that were rejected.
pub(crate) fn run_script<R, W>(
    processor: &mut CommandProcessor,
    input: R,
    mut output: W,
    format: OutputFormat,
) -> Result<usize>
where
    R: BufRead,
    W: Write,
{
    let mut rejected = 0;
    for (index, line) in input.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read script line {}", index + 1))?;
        let request = line.trim();
        if request.is_empty() || request.starts_with('#') {
            continue;
        }

        let response = protocol::handle_line(processor, request);
        if response.is_error() {
            rejected += 1;
            warn!(line = index + 1, request, "request rejected");
        }
        match format {
            OutputFormat::Text => writeln!(output, "{}", response.message())?,
            OutputFormat::Json => writeln!(
                output,
                "{}",
                response.to_json().context("failed to encode response")?
            )?,
        }
    }
    output.flush()?;
    Ok(rejected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_text_script(script: &str) -> (String, usize) {
        let mut processor = CommandProcessor::default();
        let mut output = Vec::new();
        let rejected = run_script(&mut processor, script.as_bytes(), &mut output, OutputFormat::Text)
            .expect("script runs");
        (String::from_utf8(output).expect("utf8"), rejected)
    }

    #[test]
    fn script_reports_each_response() {
        let (output, rejected) = run_text_script(
            "# east then north\nPLACE 1,2,EAST\nMOVE\nMOVE\n\nLEFT\nMOVE\nREPORT\n",
        );
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(rejected, 0);
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[5], "Report: 3,3,NORTH");
    }

    #[test]
    fn script_counts_rejected_requests() {
        let (output, rejected) = run_text_script("MOVE\nPLACE 9,9,NORTH\nJUMP\nREPORT\n");

        assert_eq!(rejected, 3);
        assert!(output.lines().next().is_some_and(|line| line.starts_with("Error:")));
        assert_eq!(output.lines().last(), Some("Robot has not been placed on the table"));
    }

    #[test]
    fn json_script_emits_one_object_per_request() {
        let mut processor = CommandProcessor::default();
        let mut output = Vec::new();
        let _ = run_script(
            &mut processor,
            "PLACE 0,0,NORTH\nREPORT\n".as_bytes(),
            &mut output,
            OutputFormat::Json,
        )
        .expect("script runs");

        let text = String::from_utf8(output).expect("utf8");
        let values: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).expect("json"))
            .collect();
        assert_eq!(values.len(), 2);
        assert_eq!(values[1]["message"], serde_json::Value::from("Report: 0,0,NORTH"));
    }

    #[test]
    fn repl_draws_the_table_and_stops_at_quit() {
        let mut processor = CommandProcessor::default();
        let mut output = Vec::new();
        run_repl(
            &mut processor,
            "place 0,0,north\nmove\nquit\nREPORT\n".as_bytes(),
            &mut output,
        )
        .expect("repl runs");

        let text = String::from_utf8(output).expect("utf8");
        assert!(text.contains("Robot moved to (0, 1)"));
        assert!(text.contains("| ^ |   |   |   |   |"));
        assert!(!text.contains("Report:"), "input after QUIT must be ignored");
        assert_eq!(processor.report().map(|r| r.to_string()).as_deref(), Some("0,1,NORTH"));
    }

    #[test]
    fn help_lists_every_keyword() {
        let mut processor = CommandProcessor::default();
        let mut output = Vec::new();
        run_repl(&mut processor, "help\n".as_bytes(), &mut output).expect("repl runs");

        let text = String::from_utf8(output).expect("utf8");
        for keyword in ["PLACE", "MOVE", "LEFT", "RIGHT", "REPORT", "STATE", "RESET", "HEALTH", "QUIT"] {
            assert!(text.contains(keyword), "help is missing {keyword}");
        }
    }
}
