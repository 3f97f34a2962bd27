use crate::engine::moves::MoveLog;
use crate::engine::turnloop::Outcome;

/// Prints the full move log to stdout, one line per move as `i (a,b) r`
/// (§6.3), before the result banner.
pub fn print_move_log(log: &MoveLog) {
    for (i, mv) in log.iter().enumerate() {
        println!("{} ({},{}) {}", i, mv.a, mv.b, mv.r);
    }
}

/// Prints the final result banner to stdout (§6.3): a forfeit reports no
/// score and names the winner by the forfeiting player's opponent; a
/// completed game reports the final stone counts and either a winner or a
/// draw.
pub fn print_result(outcome: &Outcome, names: (&str, &str)) {
    match outcome {
        Outcome::Forfeit(forfeit) => {
            eprintln!("{}", forfeit.message(names));
            println!("### No score");
            println!("### Winner: {}", name_of(names, forfeit.winner()));
        }
        Outcome::Decided { winner, black, white } => {
            println!("### Score: {}: {}, {}: {}", names.0, black, names.1, white);
            println!("### Winner: {}", name_of(names, *winner));
        }
        Outcome::Draw { black, white } => {
            println!("### Score: {}: {}, {}: {}", names.0, black, names.1, white);
            println!("### Draw game");
        }
    }
}

fn name_of(names: (&str, &str), idx: usize) -> String {
    if idx == 0 {
        names.0.to_owned()
    } else {
        names.1.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Forfeit, ForfeitReason};

    #[test]
    fn winner_index_follows_the_forfeiting_player() {
        let forfeit = Forfeit::new(0, ForfeitReason::Timeout);
        assert_eq!(name_of(("black", "white"), forfeit.winner()), "white");
    }

    #[test]
    fn forfeit_message_names_the_offending_solver() {
        let forfeit = Forfeit::new(1, ForfeitReason::Timeout);
        assert_eq!(
            forfeit.message(("black", "white")),
            "white's program: time limit exceeded"
        );
    }
}
