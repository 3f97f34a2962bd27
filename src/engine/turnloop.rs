use std::time::Duration;

use itertools::Itertools;

use crate::error::{Forfeit, ForfeitReason};

use super::board::{Board, Cell, Color};
use super::collapse::CollapseResolver;
use super::entanglement::EntanglementGraph;
use super::flip;
use super::moves::MoveLog;
use super::validate;

/// A player's time budget at game start (§3). The Python reference calls
/// this `TIME_LIMIT`; the name is kept the same for anyone cross-checking
/// against it.
pub const TIME_LIMIT: Duration = Duration::from_millis(1_000_000);

pub const BOARD_WIDTH: usize = 6;
pub const BOARD_HEIGHT: usize = 6;

/// The channel to one external solver process. Implemented by the
/// transport (`protocol::transport`); the turn loop only knows about this
/// trait, never about subprocesses, pipes, or JSON (§2 "pure engine API
/// that the transport drives").
///
/// Every exchange returns the wall-clock time spent waiting, so the turn
/// loop can charge it against the solver's remaining budget exactly as
/// §5 describes, regardless of how the transport chooses to measure it.
pub trait Solver {
    fn init(
        &mut self,
        index: usize,
        names: (&str, &str),
        board: &Board,
        log: &MoveLog,
        budget: Duration,
    ) -> (Result<(), ForfeitReason>, Duration);

    fn play(
        &mut self,
        board: &Board,
        log: &MoveLog,
        budget: Duration,
    ) -> (Result<(usize, usize), ForfeitReason>, Duration);

    fn select(
        &mut self,
        entanglement: (usize, usize),
        board: &Board,
        log: &MoveLog,
        budget: Duration,
    ) -> (Result<i64, ForfeitReason>, Duration);

    /// Best-effort `quit`; failures here never change the outcome (§5, §7).
    fn quit(&mut self, budget: Duration);
}

/// The result of a completed game.
#[derive(Debug)]
pub enum Outcome {
    Forfeit(Forfeit),
    Decided { winner: usize, black: usize, white: usize },
    Draw { black: usize, white: usize },
}

/// Orchestrates a single game between two solvers: init, alternating
/// play/select exchanges, time budgets, and the final score (§4.6).
pub struct Referee {
    board: Board,
    log: MoveLog,
    names: (String, String),
    solvers: [Box<dyn Solver>; 2],
    budgets: [Duration; 2],
    resolver: CollapseResolver,
    display: bool,
    last_cycle: Option<Vec<usize>>,
}

impl Referee {
    pub fn new(names: (String, String), solvers: [Box<dyn Solver>; 2], display: bool) -> Referee {
        let mut board = Board::new(BOARD_WIDTH, BOARD_HEIGHT);
        let log = MoveLog::seed_initial(&mut board);
        Referee {
            board,
            log,
            names,
            solvers,
            budgets: [TIME_LIMIT, TIME_LIMIT],
            resolver: CollapseResolver::new(),
            display,
            last_cycle: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn log(&self) -> &MoveLog {
        &self.log
    }

    pub fn names(&self) -> (&str, &str) {
        (&self.names.0, &self.names.1)
    }

    /// Runs the game to completion: init, then the main loop, then a
    /// best-effort shutdown on every exit path (§5 "Cancellation").
    pub fn run(&mut self) -> Outcome {
        if let Err(forfeit) = self.initialize() {
            self.shutdown();
            return Outcome::Forfeit(forfeit);
        }

        let mut mover = 0usize;
        while !self.board.full_of_classical() {
            if let Err(forfeit) = self.take_turn(mover) {
                self.shutdown();
                return Outcome::Forfeit(forfeit);
            }
            if self.display {
                self.print_step_banner(mover);
            }
            mover ^= 1;
        }

        self.shutdown();
        let black = self.board.black_count();
        let white = self.board.white_count();
        match black.cmp(&white) {
            std::cmp::Ordering::Greater => Outcome::Decided { winner: 0, black, white },
            std::cmp::Ordering::Less => Outcome::Decided { winner: 1, black, white },
            std::cmp::Ordering::Equal => Outcome::Draw { black, white },
        }
    }

    fn initialize(&mut self) -> Result<(), Forfeit> {
        for idx in 0..2 {
            let budget = self.budgets[idx];
            let names = (self.names.0.as_str(), self.names.1.as_str());
            let (result, elapsed) = self.solvers[idx].init(idx, names, &self.board, &self.log, budget);
            self.charge(idx, elapsed)?;
            result.map_err(|reason| Forfeit::new(idx, reason))?;
        }
        Ok(())
    }

    /// Deducts `elapsed` from a solver's remaining budget and forfeits it
    /// if that exhausts the budget, mirroring the reference's `check_TLE`
    /// called after every exchange.
    fn charge(&mut self, idx: usize, elapsed: Duration) -> Result<(), Forfeit> {
        self.budgets[idx] = self.budgets[idx].saturating_sub(elapsed);
        if self.budgets[idx].is_zero() {
            return Err(Forfeit::new(idx, ForfeitReason::Timeout));
        }
        Ok(())
    }

    fn take_turn(&mut self, mover: usize) -> Result<(), Forfeit> {
        self.last_cycle = None;
        let budget = self.budgets[mover];
        let (result, elapsed) = self.solvers[mover].play(&self.board, &self.log, budget);
        self.charge(mover, elapsed)?;
        let (p1, p2) = result.map_err(|r| Forfeit::new(mover, r))?;

        let (a, b) = if p1 <= p2 { (p1, p2) } else { (p2, p1) };
        validate::validate_move(&self.board, a, b).map_err(|r| Forfeit::new(mover, r))?;

        if a == b {
            // Trivial resolution: the last empty cell never participates
            // in the entanglement graph (§4.4, §8).
            let i = self.log.push_unresolved(a, b);
            self.log.resolve(i, a);
            let color = self.log.color_of(i);
            self.board.set(a, color.cell());
            flip::flip(&mut self.board, a, color);
            return Ok(());
        }

        self.board.set(a, Cell::Quantum);
        self.board.set(b, Cell::Quantum);
        self.log.push_unresolved(a, b);

        let mut graph = EntanglementGraph::build(&self.log, self.board.size());
        if let Some(cycle) = graph.find_cycle_from(a.min(b)) {
            self.resolve_entanglement(mover, &cycle)?;
            self.last_cycle = Some(cycle);
        }
        Ok(())
    }

    /// Builds the pending collapse set and solicits the explicit choice
    /// from the opponent of whoever just closed the cycle - the turn
    /// counter must already reflect that toggle before this is called
    /// (§9 "Sentinel for opposite player in select").
    fn resolve_entanglement(&mut self, mover: usize, cycle: &[usize]) -> Result<(), Forfeit> {
        self.resolver.build(cycle, &self.log);
        let opponent = mover ^ 1;
        let pair = self
            .resolver
            .head_pair()
            .expect("a detected cycle always yields a pending head");

        let budget = self.budgets[opponent];
        let (result, elapsed) = self.solvers[opponent].select(pair, &self.board, &self.log, budget);
        self.charge(opponent, elapsed)?;
        let raw = result.map_err(|r| Forfeit::new(opponent, r))?;
        let choice = self
            .resolver
            .validate_choice(raw)
            .map_err(|r| Forfeit::new(opponent, r))?;

        self.resolver.apply(&mut self.log, &mut self.board, choice);
        Ok(())
    }

    /// Best-effort `quit` to both solvers, time-bounded by whatever budget
    /// they have left (§5, §7). Never fails the game.
    fn shutdown(&mut self) {
        for idx in 0..2 {
            self.solvers[idx].quit(self.budgets[idx]);
        }
    }

    fn print_step_banner(&self, last_mover: usize) {
        let n = self.log.len();
        let color = Color::of_move(n - 1);
        let disc = color.cell().notate();
        let last = self.log.get(n - 1);
        println!(
            "Step {:03}: {} [{}]  move: {}, {}",
            n, self.names_ref(last_mover), disc, last.a, last.b
        );
        if let Some(cycle) = &self.last_cycle {
            println!(
                "  entanglement: {}",
                cycle.iter().map(|pos| pos.to_string()).join(" -> ")
            );
        }
        print!("{}", self.board.render());
        println!(
            "State  o: {}, x: {}",
            self.board.black_count(),
            self.board.white_count()
        );
    }

    fn names_ref(&self, idx: usize) -> &str {
        if idx == 0 {
            &self.names.0
        } else {
            &self.names.1
        }
    }
}
