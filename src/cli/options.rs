use clap::Parser;

/// Runs a single game between two solver programs (§6.2). Each solver is
/// launched via its own shell command line, not parsed as an argv array -
/// this matches how the reference implementation expects to be invoked.
#[derive(Clone, Debug, Parser)]
pub struct RefereeOptions {
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Print a per-step board banner as the game progresses.
    #[arg(short, long, default_value_t = false)]
    pub display: bool,

    /// Name of player 0 (moves first, Black).
    pub name1: String,

    /// Shell command line that launches player 0's solver.
    pub command1: String,

    /// Name of player 1 (moves second, White).
    pub name2: String,

    /// Shell command line that launches player 1's solver.
    pub command2: String,
}
