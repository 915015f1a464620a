use std::time::Duration;

use common::games::candy::{CandySession, Outcome};
use common::log;
use common::progress::ProgressStore;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use crate::commands::{HELP, PlayerCommand, parse_command};
use crate::render::{
    describe_events, render_level_table, render_selection_hint, render_snapshot,
    should_announce_time,
};

enum Flow {
    Continue,
    Quit,
}

/// Drives one session from stdin commands and a fixed-period countdown.
/// Both arms call into the engine synchronously, so a tap is fully resolved
/// before the next tick or command is looked at.
pub async fn run_session<S: ProgressStore>(
    mut session: CandySession<S>,
    tick_interval: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut ticker = tokio::time::interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick completes immediately
    ticker.tick().await;

    if let Some(score) = session.last_score() {
        println!("Last saved score: {}", score);
    }
    println!("{}", HELP);
    print!("{}", render_snapshot(&session.snapshot()));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                on_tick(&mut session);
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    log!("Input closed, leaving");
                    break;
                };
                match parse_command(&line, session.snapshot().grid_size) {
                    Ok(command) => {
                        if let Flow::Quit = apply_command(&mut session, command) {
                            break;
                        }
                    }
                    Err(e) => println!("{}", e),
                }
            }
        }
    }

    log!("Session over at level {} (seed {})", session.level_id(), session.seed());
    Ok(())
}

fn on_tick<S: ProgressStore>(session: &mut CandySession<S>) {
    if session.snapshot().outcome != Outcome::InProgress {
        return;
    }

    match session.tick() {
        Some(_) => {
            session.take_events();
            print!("{}", render_snapshot(&session.snapshot()));
        }
        None => {
            let time_left = session.snapshot().time_left;
            if should_announce_time(time_left) {
                println!("{}s left", time_left);
            }
        }
    }
}

fn apply_command<S: ProgressStore>(session: &mut CandySession<S>, command: PlayerCommand) -> Flow {
    match command {
        PlayerCommand::Tap(index) => {
            if !session.tap(index) {
                println!("The level is over. Type 'retry' or 'next'.");
                return Flow::Continue;
            }
            for line in describe_events(&session.take_events()) {
                println!("{}", line);
            }
            let snapshot = session.snapshot();
            print!("{}", render_snapshot(&snapshot));
            if let Some(hint) = render_selection_hint(snapshot.selection) {
                println!("{}", hint);
            }
        }
        PlayerCommand::Retry => {
            session.retry_current_level();
            print!("{}", render_snapshot(&session.snapshot()));
        }
        PlayerCommand::Next => match session.advance_to_next_level() {
            Ok(_) => print!("{}", render_snapshot(&session.snapshot())),
            Err(e) => println!("{}", e),
        },
        PlayerCommand::Level(id) => match session.start_level(id) {
            Ok(()) => print!("{}", render_snapshot(&session.snapshot())),
            Err(e) => println!("{}", e),
        },
        PlayerCommand::Show => print!("{}", render_snapshot(&session.snapshot())),
        PlayerCommand::Levels => print!("{}", render_level_table(session.levels())),
        PlayerCommand::Help => println!("{}", HELP),
        PlayerCommand::Quit => return Flow::Quit,
    }
    Flow::Continue
}
