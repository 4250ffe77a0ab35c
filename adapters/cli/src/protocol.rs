//! Line-oriented request protocol shared by the console and the TCP server.
//!
//! Every request is a single line such as `PLACE 1,2,EAST` or `move`. Every
//! response carries the robot's state plus a human-readable message, or an
//! error with a machine-readable `error_type`.

use serde::Serialize;
use thiserror::Error;
use toy_robot_core::{Command, CommandError, Facing, ParseFacingError, RobotState};
use toy_robot_system_processor::CommandProcessor;

const NOT_PLACED_MESSAGE: &str = "Robot has not been placed on the table";

/// Decoded form of a single request line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Request {
    /// Puts the robot on the table at the given coordinates.
    Place {
        /// Requested column, possibly off the table.
        x: i64,
        /// Requested row, possibly off the table.
        y: i64,
        /// Direction the robot should face.
        facing: Facing,
    },
    /// Runs one of the named robot commands.
    Execute(Command),
    /// Describes the full robot state.
    State,
    /// Takes the robot off the table.
    Reset,
    /// Reports liveness and the table size.
    Health,
}

/// Reasons a request line could not be decoded or executed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum RequestError {
    /// The line held nothing but whitespace.
    #[error("empty request")]
    Empty,
    /// The request bytes were not valid UTF-8.
    #[error("request is not valid UTF-8")]
    InvalidEncoding,
    /// The request line exceeded the accepted length.
    #[error("request exceeds {limit} bytes")]
    TooLong {
        /// Maximum accepted line length in bytes.
        limit: usize,
    },
    /// `PLACE` did not carry exactly three fields.
    #[error("PLACE expects X,Y,FACING")]
    MalformedPlacement,
    /// A placement coordinate was not an integer.
    #[error("invalid coordinate `{0}`, expected an integer")]
    InvalidCoordinate(String),
    /// A placement facing was not a cardinal direction.
    #[error(transparent)]
    InvalidFacing(#[from] ParseFacingError),
    /// A keyword that takes no arguments was given some.
    #[error("{keyword} takes no arguments")]
    UnexpectedArguments {
        /// Upper-cased keyword that was followed by arguments.
        keyword: String,
    },
    /// The processor refused or did not recognise the command.
    #[error(transparent)]
    Command(#[from] CommandError),
}

impl RequestError {
    fn error_type(&self) -> &'static str {
        match self {
            Self::Command(error) => error.error_type(),
            _ => "validation_error",
        }
    }
}

/// Decodes a request line. Keywords are case-insensitive.
pub(crate) fn parse_request(line: &str) -> Result<Request, RequestError> {
    let mut parts = line.trim().splitn(2, char::is_whitespace);
    let keyword = parts.next().unwrap_or_default();
    if keyword.is_empty() {
        return Err(RequestError::Empty);
    }
    let arguments = parts.next().unwrap_or_default().trim();

    if keyword.eq_ignore_ascii_case("PLACE") {
        return parse_placement(arguments);
    }

    let canonical = keyword.to_ascii_uppercase();
    let request = match canonical.as_str() {
        "STATE" => Request::State,
        "RESET" => Request::Reset,
        "HEALTH" => Request::Health,
        _ => Request::Execute(keyword.parse::<Command>()?),
    };
    if !arguments.is_empty() {
        return Err(RequestError::UnexpectedArguments { keyword: canonical });
    }
    Ok(request)
}

fn parse_placement(arguments: &str) -> Result<Request, RequestError> {
    let fields: Vec<&str> = arguments
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|field| !field.is_empty())
        .collect();
    let [x, y, facing] = fields.as_slice() else {
        return Err(RequestError::MalformedPlacement);
    };

    Ok(Request::Place {
        x: parse_coordinate(x)?,
        y: parse_coordinate(y)?,
        facing: facing.parse()?,
    })
}

fn parse_coordinate(field: &str) -> Result<i64, RequestError> {
    field
        .parse()
        .map_err(|_| RequestError::InvalidCoordinate(field.to_owned()))
}

/// Outcome of a single request, serialised as one JSON object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub(crate) enum Response {
    /// Robot state after an accepted request.
    Robot(RobotBody),
    /// Liveness report.
    Health(HealthBody),
    /// Rejected request.
    Error(ErrorBody),
}

/// Robot state plus a human-readable message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct RobotBody {
    /// Column, absent while unplaced.
    pub(crate) x: Option<u32>,
    /// Row, absent while unplaced.
    pub(crate) y: Option<u32>,
    /// Facing, absent while unplaced.
    pub(crate) facing: Option<Facing>,
    /// Whether the robot is on the table.
    pub(crate) is_placed: bool,
    /// Summary of what the request did.
    pub(crate) message: String,
}

/// Body answering a `HEALTH` request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct HealthBody {
    /// Always `healthy` while the process answers.
    pub(crate) status: &'static str,
    /// Table dimensions as `WIDTHxHEIGHT`.
    pub(crate) table_size: String,
}

/// Body describing why a request was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct ErrorBody {
    /// Human-readable reason.
    pub(crate) error: String,
    /// Machine-readable classification and context.
    pub(crate) details: ErrorDetails,
}

/// Machine-readable part of an [`ErrorBody`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct ErrorDetails {
    /// Stable error code such as `invalid_placement`.
    pub(crate) error_type: &'static str,
    /// Command that was refused or not recognised.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) command: Option<String>,
    /// Rejected placement column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) x: Option<i64>,
    /// Rejected placement row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) y: Option<i64>,
}

impl Response {
    fn robot(state: RobotState, message: String) -> Self {
        Self::Robot(RobotBody {
            x: state.x,
            y: state.y,
            facing: state.facing,
            is_placed: state.placed,
            message,
        })
    }

    /// Error response for a request that could not be served.
    pub(crate) fn rejected(error: &RequestError) -> Self {
        let mut details = ErrorDetails {
            error_type: error.error_type(),
            command: None,
            x: None,
            y: None,
        };
        match error {
            RequestError::Command(CommandError::InvalidPlacement { x, y, .. }) => {
                details.x = Some(*x);
                details.y = Some(*y);
            }
            RequestError::Command(CommandError::NotPlaced { command }) => {
                details.command = Some(command.to_string());
            }
            RequestError::Command(CommandError::UnknownCommand(input)) => {
                details.command = Some(input.clone());
            }
            _ => {}
        }
        Self::Error(ErrorBody {
            error: error.to_string(),
            details,
        })
    }

    /// Human-readable summary used by the console.
    pub(crate) fn message(&self) -> String {
        match self {
            Self::Robot(body) => body.message.clone(),
            Self::Health(body) => format!("{} ({} table)", body.status, body.table_size),
            Self::Error(body) => format!("Error: {}", body.error),
        }
    }

    /// Whether the request was rejected.
    pub(crate) fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Encodes the response as a single-line JSON object.
    pub(crate) fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Decodes and executes a request line against the processor.
pub(crate) fn handle_line(processor: &mut CommandProcessor, line: &str) -> Response {
    match parse_request(line) {
        Ok(request) => handle_request(processor, request),
        Err(error) => Response::rejected(&error),
    }
}

/// Executes an already decoded request against the processor.
pub(crate) fn handle_request(processor: &mut CommandProcessor, request: Request) -> Response {
    match request {
        Request::Place { x, y, facing } => match processor.try_place(x, y, facing) {
            Ok(()) => Response::robot(
                processor.state(),
                format!("Robot placed at ({x}, {y}) facing {facing}"),
            ),
            Err(error) => Response::rejected(&RequestError::from(error)),
        },
        Request::Execute(command) => match processor.execute_command(command) {
            Ok(report) => {
                let message = match (command, report) {
                    (Command::Report, Some(report)) => format!("Report: {report}"),
                    (Command::Report, None) => NOT_PLACED_MESSAGE.to_owned(),
                    (Command::Move, _) => describe_position(processor.state(), "Robot moved to"),
                    (Command::Left | Command::Right, _) => match processor.state().facing {
                        Some(facing) => format!(
                            "Robot rotated {}, now facing {facing}",
                            command.as_str().to_ascii_lowercase()
                        ),
                        None => NOT_PLACED_MESSAGE.to_owned(),
                    },
                };
                Response::robot(processor.state(), message)
            }
            Err(error) => Response::rejected(&RequestError::from(error)),
        },
        Request::State => {
            let state = processor.state();
            let message = match state.facing {
                Some(facing) => format!("{} facing {facing}", describe_position(state, "Robot is at")),
                None => NOT_PLACED_MESSAGE.to_owned(),
            };
            Response::robot(state, message)
        }
        Request::Reset => {
            processor.reset();
            Response::robot(processor.state(), "Robot has been reset".to_owned())
        }
        Request::Health => Response::Health(HealthBody {
            status: "healthy",
            table_size: processor.grid().to_string(),
        }),
    }
}

fn describe_position(state: RobotState, prefix: &str) -> String {
    match (state.x, state.y) {
        (Some(x), Some(y)) => format!("{prefix} ({x}, {y})"),
        _ => NOT_PLACED_MESSAGE.to_owned(),
    }
}
