use serde::{Deserialize, Serialize};

use crate::engine::board::{Board, Cell};
use crate::engine::moves::MoveLog;
use crate::error::ForfeitReason;

/// The board and move log as they cross the wire (§6.1): a flat character
/// array for the board, and `[[a, b], r]` per entry for the log.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WireState {
    pub board: Vec<char>,
    pub moves: Vec<((usize, usize), i8)>,
}

impl WireState {
    pub fn capture(board: &Board, log: &MoveLog) -> WireState {
        WireState {
            board: board.notate(),
            moves: log.to_wire(),
        }
    }
}

/// The four cell-marker characters, sent only with `init` so a solver never
/// has to hardcode them (§6.1).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CellMarkers {
    pub black: char,
    pub white: char,
    pub quantum: char,
    pub empty: char,
}

impl CellMarkers {
    pub fn standard() -> CellMarkers {
        CellMarkers {
            black: Cell::Black.notate(),
            white: Cell::White.notate(),
            quantum: Cell::Quantum.notate(),
            empty: Cell::Empty.notate(),
        }
    }
}

/// A request sent to a solver process, one per line of its stdin.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Request {
    Init {
        index: usize,
        names: (String, String),
        size: (usize, usize),
        #[serde(flatten)]
        markers: CellMarkers,
        #[serde(flatten)]
        state: WireState,
    },
    Play {
        #[serde(flatten)]
        state: WireState,
    },
    Select {
        entanglement: (usize, usize),
        #[serde(flatten)]
        state: WireState,
    },
    Quit,
}

/// A reply read back from a solver process, one per line of its stdout.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    Ack,
    Move { positions: (usize, usize) },
    Pick { select: i64 },
}

/// Parses a raw `play` reply, checking that the two positions are in range
/// before the engine ever sees them (§6.1 "out-of-range position is a
/// protocol error").
pub fn parse_play_reply(line: &str, board_size: usize) -> Result<(usize, usize), ForfeitReason> {
    let reply: Reply = serde_json::from_str(line)
        .map_err(|e| ForfeitReason::Protocol(format!("malformed play reply: {e}")))?;
    match reply {
        Reply::Move { positions } => {
            if positions.0 >= board_size || positions.1 >= board_size {
                return Err(ForfeitReason::Protocol(format!(
                    "position out of range: {positions:?}"
                )));
            }
            Ok(positions)
        }
        _ => Err(ForfeitReason::Protocol(
            "expected a move reply with two positions".into(),
        )),
    }
}

/// Parses a raw `select` reply: `{"select": p}` (§6.1).
pub fn parse_select_reply(line: &str) -> Result<i64, ForfeitReason> {
    let reply: Reply = serde_json::from_str(line)
        .map_err(|e| ForfeitReason::Protocol(format!("malformed select reply: {e}")))?;
    match reply {
        Reply::Pick { select } => Ok(select),
        _ => Err(ForfeitReason::Protocol(
            "expected a select reply with a single position".into(),
        )),
    }
}

/// Confirms an `init`/`quit` acknowledgement, tolerating any JSON value as
/// long as it parses - the referee does not interpret an ack's payload.
pub fn parse_ack_reply(line: &str) -> Result<(), ForfeitReason> {
    serde_json::from_str::<serde_json::Value>(line)
        .map(|_| ())
        .map_err(|e| ForfeitReason::Protocol(format!("malformed acknowledgement: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_reply_round_trips_through_json() {
        let line = serde_json::to_string(&Reply::Move { positions: (5, 6) }).unwrap();
        assert_eq!(parse_play_reply(&line, 36).unwrap(), (5, 6));
    }

    #[test]
    fn play_reply_out_of_range_is_a_protocol_error() {
        let line = serde_json::to_string(&Reply::Move { positions: (5, 99) }).unwrap();
        assert!(parse_play_reply(&line, 36).is_err());
    }

    #[test]
    fn select_reply_round_trips_through_json() {
        let line = serde_json::to_string(&Reply::Pick { select: 13 }).unwrap();
        assert_eq!(parse_select_reply(&line).unwrap(), 13);
    }

    #[test]
    fn select_reply_matches_the_wire_shape_sent_by_a_real_solver() {
        assert_eq!(parse_select_reply(r#"{"select":13}"#).unwrap(), 13);
    }

    #[test]
    fn garbage_is_a_protocol_error_not_a_panic() {
        assert!(parse_play_reply("not json", 36).is_err());
        assert!(parse_select_reply("not json").is_err());
    }

    #[test]
    fn init_request_serializes_with_tagged_action() {
        let board = Board::new(6, 6);
        let mut log_board = board.clone();
        let log = MoveLog::seed_initial(&mut log_board);
        let req = Request::Init {
            index: 0,
            names: ("black".into(), "white".into()),
            size: (board.width(), board.height()),
            markers: CellMarkers::standard(),
            state: WireState::capture(&log_board, &log),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"action\":\"init\""));
    }
}
