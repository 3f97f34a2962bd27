use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::engine::board::Board;
use crate::engine::moves::MoveLog;
use crate::engine::turnloop::Solver;
use crate::error::ForfeitReason;

use super::wire::{self, Request, WireState};

/// One line read from a solver's stdout, or the reason none arrived.
enum Line {
    Read(String),
    Eof,
    Err(std::io::Error),
}

/// Drives one solver subprocess over line-delimited JSON on stdio (§6.2),
/// enforcing each call's remaining time budget with a dedicated reader
/// thread so a hung process can never block the referee past its budget.
pub struct ProcessSolver {
    name: String,
    child: Child,
    stdin: ChildStdin,
    lines: mpsc::Receiver<Line>,
}

impl ProcessSolver {
    /// Spawns `command` through the shell, matching the reference's own
    /// invocation convention (§6.2: each CLI argument is a shell command
    /// line, not an argv array).
    pub fn spawn(name: &str, command: &str) -> anyhow::Result<ProcessSolver> {
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        let stdin = child.stdin.take().expect("piped stdin");
        let stdout = child.stdout.take().expect("piped stdout");

        let (tx, rx) = mpsc::channel();
        spawn_reader(stdout, tx);

        Ok(ProcessSolver {
            name: name.to_owned(),
            child,
            stdin,
            lines: rx,
        })
    }

    /// Writes one JSON request line and reads one reply line back, charging
    /// the elapsed wall-clock time against `budget`. A reply that doesn't
    /// arrive within `budget` is reported as a `Timeout`, not blocked on
    /// forever - the reader thread keeps running and is simply abandoned.
    fn exchange(&mut self, request: &Request, budget: Duration) -> (Result<String, ForfeitReason>, Duration) {
        let started = Instant::now();
        let outcome = self.write_and_wait(request, budget);
        (outcome, started.elapsed())
    }

    fn write_and_wait(&mut self, request: &Request, budget: Duration) -> Result<String, ForfeitReason> {
        let mut payload = serde_json::to_string(request)
            .map_err(|e| ForfeitReason::Protocol(format!("failed to encode request: {e}")))?;
        payload.push('\n');

        self.stdin
            .write_all(payload.as_bytes())
            .map_err(|e| ForfeitReason::ProcessFailure(format!("{}: write failed: {e}", self.name)))?;
        self.stdin
            .flush()
            .map_err(|e| ForfeitReason::ProcessFailure(format!("{}: flush failed: {e}", self.name)))?;

        match self.lines.recv_timeout(budget) {
            Ok(Line::Read(line)) => {
                debug!("{}: {line}", self.name);
                Ok(line)
            }
            Ok(Line::Eof) => Err(ForfeitReason::ProcessFailure(format!(
                "{}: stdout closed before a reply arrived",
                self.name
            ))),
            Ok(Line::Err(e)) => Err(ForfeitReason::ProcessFailure(format!(
                "{}: read error: {e}",
                self.name
            ))),
            Err(mpsc::RecvTimeoutError::Timeout) => Err(ForfeitReason::Timeout),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(ForfeitReason::ProcessFailure(format!(
                "{}: reader thread exited unexpectedly",
                self.name
            ))),
        }
    }
}

fn spawn_reader(stdout: ChildStdout, tx: mpsc::Sender<Line>) {
    thread::spawn(move || {
        let mut reader = BufReader::new(stdout);
        loop {
            let mut line = String::new();
            let sent = match reader.read_line(&mut line) {
                Ok(0) => tx.send(Line::Eof),
                Ok(_) => tx.send(Line::Read(line.trim_end().to_owned())),
                Err(e) => tx.send(Line::Err(e)),
            };
            if sent.is_err() {
                return;
            }
        }
    });
}

impl Solver for ProcessSolver {
    fn init(
        &mut self,
        index: usize,
        names: (&str, &str),
        board: &Board,
        log: &MoveLog,
        budget: Duration,
    ) -> (Result<(), ForfeitReason>, Duration) {
        let request = Request::Init {
            index,
            names: (names.0.to_owned(), names.1.to_owned()),
            size: (board.width(), board.height()),
            markers: wire::CellMarkers::standard(),
            state: WireState::capture(board, log),
        };
        let (reply, elapsed) = self.exchange(&request, budget);
        let result = reply.and_then(|line| wire::parse_ack_reply(&line));
        (result, elapsed)
    }

    fn play(
        &mut self,
        board: &Board,
        log: &MoveLog,
        budget: Duration,
    ) -> (Result<(usize, usize), ForfeitReason>, Duration) {
        let request = Request::Play {
            state: WireState::capture(board, log),
        };
        let (reply, elapsed) = self.exchange(&request, budget);
        let result = reply.and_then(|line| wire::parse_play_reply(&line, board.size()));
        (result, elapsed)
    }

    fn select(
        &mut self,
        entanglement: (usize, usize),
        board: &Board,
        log: &MoveLog,
        budget: Duration,
    ) -> (Result<i64, ForfeitReason>, Duration) {
        let request = Request::Select {
            entanglement,
            state: WireState::capture(board, log),
        };
        let (reply, elapsed) = self.exchange(&request, budget);
        let result = reply.and_then(|line| wire::parse_select_reply(&line));
        (result, elapsed)
    }

    fn quit(&mut self, budget: Duration) {
        let (_, _) = self.exchange(&Request::Quit, budget);
        if let Err(e) = self.child.kill() {
            if e.kind() != std::io::ErrorKind::InvalidInput {
                warn!("{}: failed to terminate process cleanly: {e}", self.name);
            }
        }
        let _ = self.child.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawned_echo_solver_acknowledges_init() {
        // `cat` bounces each request line back; since init only needs valid
        // JSON to acknowledge, the request itself serves as the reply.
        let mut solver = ProcessSolver::spawn("cat-solver", "cat").expect("spawn cat");
        let board = Board::new(6, 6);
        let mut seed_board = board.clone();
        let log = MoveLog::seed_initial(&mut seed_board);
        let (result, _elapsed) = solver.init(0, ("a", "b"), &seed_board, &log, Duration::from_secs(2));
        assert!(result.is_ok());
        solver.quit(Duration::from_secs(1));
    }
}
