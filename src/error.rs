use std::fmt;

/// A reason the referee declared a forfeit. Distinct from `anyhow::Error`,
/// which covers ambient IO/process failures: a `ForfeitReason` is a game
/// outcome, not a bug, and is always attached to the player who caused it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ForfeitReason {
    /// A solver's response did not arrive within its remaining time budget.
    Timeout,
    /// The response was unparseable, missing fields, or had positions out of range.
    Protocol(String),
    /// The positions offered for a `play` failed move validation.
    InvalidMove { a: usize, b: usize },
    /// The position returned for a `select` was not one of the offered pair.
    InvalidSelect { offered: (usize, usize), got: i64 },
    /// The solver's pipe closed or the process could not be spawned.
    ProcessFailure(String),
}

impl fmt::Display for ForfeitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForfeitReason::Timeout => write!(f, "time limit exceeded"),
            ForfeitReason::Protocol(msg) => write!(f, "protocol error: {msg}"),
            ForfeitReason::InvalidMove { a, b } => {
                write!(f, "invalid position: ({a}, {b})")
            }
            ForfeitReason::InvalidSelect { offered, got } => write!(
                f,
                "invalid select: {got} is not one of ({}, {})",
                offered.0, offered.1
            ),
            ForfeitReason::ProcessFailure(msg) => write!(f, "process failure: {msg}"),
        }
    }
}

impl std::error::Error for ForfeitReason {}

/// A forfeit, tagged with the offending player's index (0 or 1). Not a
/// `std::error::Error` itself - it is a declared game outcome, not a bug,
/// and formatting it needs the player names, which live on `Referee`, not
/// on the forfeit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Forfeit {
    pub offender: usize,
    pub reason: ForfeitReason,
}

impl Forfeit {
    pub fn new(offender: usize, reason: ForfeitReason) -> Forfeit {
        Forfeit { offender, reason }
    }

    /// The player who wins as a consequence of this forfeit.
    pub fn winner(&self) -> usize {
        self.offender ^ 1
    }

    /// A human-readable message naming the offending solver by its given
    /// name rather than its numeric index, matching the reference's own
    /// `"%s's program got time limit exceeded" % names[idx]`.
    pub fn message(&self, names: (&str, &str)) -> String {
        let name = if self.offender == 0 { names.0 } else { names.1 };
        format!("{name}'s program: {}", self.reason)
    }
}
