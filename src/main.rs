use clap::Parser;
use flexi_logger::{AdaptiveFormat, Logger, WriteMode};
use lib_quantum_reversi::prelude::*;

fn main() -> Result<()> {
    // Initialize program options and environment.
    let _ = dotenvy::dotenv();
    let options = match RefereeOptions::try_parse() {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    let _logger = Logger::try_with_env_or_str(options.log_level.clone().unwrap_or("info".into()).as_str())?
        .write_mode(WriteMode::BufferAndFlush)
        .log_to_stderr()
        .adaptive_format_for_stderr(
            match cfg!(debug_assertions) {
                true => AdaptiveFormat::WithThread,
                _    => AdaptiveFormat::Default
            })
        .set_palette("b196;208;195;111;67".to_owned())
        .start()?;

    let black = ProcessSolver::spawn(&options.name1, &options.command1)
        .with_context(|| format!("failed to launch {}", options.name1))?;
    let white = ProcessSolver::spawn(&options.name2, &options.command2)
        .with_context(|| format!("failed to launch {}", options.name2))?;

    let mut referee = Referee::new(
        (options.name1.clone(), options.name2.clone()),
        [Box::new(black), Box::new(white)],
        options.display,
    );

    let outcome = referee.run();
    print_move_log(referee.log());
    print_result(&outcome, referee.names());

    if matches!(outcome, Outcome::Forfeit(_)) {
        std::process::exit(1);
    }
    Ok(())
}
