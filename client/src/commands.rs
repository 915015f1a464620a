#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PlayerCommand {
    Tap(usize),
    Retry,
    Next,
    Level(u32),
    Show,
    Levels,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  tap <index> | tap <row> <col>   tap a cell (t)
  retry                           restart the current level (r)
  next                            go to the next level after completing one (n)
  level <id>                      jump to a level (l)
  show                            print the board again (s)
  levels                          list all levels
  help                            this text (h)
  quit                            leave (q)";

pub fn parse_command(line: &str, grid_size: usize) -> Result<PlayerCommand, String> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(PlayerCommand::Show);
    };
    let args: Vec<&str> = parts.collect();

    let command = match head.to_ascii_lowercase().as_str() {
        "tap" | "t" => parse_tap(&args, grid_size)?,
        "retry" | "r" => PlayerCommand::Retry,
        "next" | "n" => PlayerCommand::Next,
        "level" | "l" => {
            let [id] = args.as_slice() else {
                return Err("Usage: level <id>".to_string());
            };
            PlayerCommand::Level(parse_number(id)?)
        }
        "show" | "s" => PlayerCommand::Show,
        "levels" => PlayerCommand::Levels,
        "help" | "h" | "?" => PlayerCommand::Help,
        "quit" | "q" | "exit" => PlayerCommand::Quit,
        other => return Err(format!("Unknown command '{}', type 'help'", other)),
    };

    Ok(command)
}

fn parse_tap(args: &[&str], grid_size: usize) -> Result<PlayerCommand, String> {
    match args {
        [index] => {
            let index: usize = parse_number(index)?;
            if index >= grid_size * grid_size {
                return Err(format!(
                    "Cell {} is off the board (0..{})",
                    index,
                    grid_size * grid_size
                ));
            }
            Ok(PlayerCommand::Tap(index))
        }
        [row, col] => {
            let row: usize = parse_number(row)?;
            let col: usize = parse_number(col)?;
            if row >= grid_size || col >= grid_size {
                return Err(format!(
                    "Row and column must be below {}, got {} {}",
                    grid_size, row, col
                ));
            }
            Ok(PlayerCommand::Tap(row * grid_size + col))
        }
        _ => Err("Usage: tap <index> or tap <row> <col>".to_string()),
    }
}

fn parse_number<T: std::str::FromStr>(value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))
}
