//! # 2048 (until 128) CLI
//!
//! Play the 128 variant of 2048 in the terminal. The game is saved after
//! every move and resumed on the next launch.

mod store;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use game_128_core::{Direction, Persistence, Session, Status, Store, WIN_TILE};
use log::info;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use store::FileStore;

#[derive(Parser, Debug)]
#[command(name = "game-128")]
#[command(author, version, about = "Play 2048 until the 128 tile in the terminal")]
struct Args {
    /// Random seed for tile spawns (random if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Directory holding the saved game
    #[arg(long, value_name = "DIR", default_value = ".2048-save")]
    save_dir: PathBuf,

    /// Play without reading or writing a saved game
    #[arg(long)]
    no_save: bool,

    /// Discard any saved game and start fresh
    #[arg(long, conflicts_with = "no_save")]
    fresh: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Using seed {}", seed);

    if args.no_save {
        run_interactive(Session::new(seed))
    } else {
        let store = FileStore::open(&args.save_dir)
            .with_context(|| format!("cannot open save directory {}", args.save_dir.display()))?;
        let store = if args.fresh {
            let mut persistence = Persistence::new(store);
            persistence.clear().context("cannot clear saved game")?;
            persistence.into_store()
        } else {
            store
        };
        run_interactive(Session::with_persistence(seed, store))
    }
}

/// Run interactive mode where user plays with keyboard.
fn run_interactive<S: Store>(mut session: Session<S>) -> Result<()> {
    // Set terminal to raw mode for single-key input
    let _raw = RawMode::enable();

    let mut stdin = io::stdin();
    let mut buffer = [0u8; 3];

    redraw(&session, None)?;

    loop {
        let bytes_read = stdin.read(&mut buffer).context("failed to read input")?;
        if bytes_read == 0 {
            break;
        }

        match parse_input(&buffer[..bytes_read]) {
            InputAction::Move(direction) => {
                // Directional input is disabled once the game is won or over.
                if session.status() != Status::Playing {
                    continue;
                }
                let result = session.step(direction);
                if result.changed {
                    redraw(&session, Some(result.reward))?;
                }
            }
            InputAction::Undo => {
                if session.undo() {
                    redraw(&session, None)?;
                }
            }
            InputAction::NewGame => {
                session.new_game();
                redraw(&session, None)?;
            }
            InputAction::Quit => break,
            InputAction::None => {}
        }
    }

    println!("\nGoodbye!");
    Ok(())
}

enum InputAction {
    Move(Direction),
    Undo,
    NewGame,
    Quit,
    None,
}

fn parse_input(bytes: &[u8]) -> InputAction {
    match bytes {
        // Arrow keys (escape sequences)
        [27, 91, 65] => InputAction::Move(Direction::Up),
        [27, 91, 66] => InputAction::Move(Direction::Down),
        [27, 91, 67] => InputAction::Move(Direction::Right),
        [27, 91, 68] => InputAction::Move(Direction::Left),

        // WASD keys
        [b'w'] | [b'W'] => InputAction::Move(Direction::Up),
        [b's'] | [b'S'] => InputAction::Move(Direction::Down),
        [b'a'] | [b'A'] => InputAction::Move(Direction::Left),
        [b'd'] | [b'D'] => InputAction::Move(Direction::Right),

        // Control keys
        [b'u'] | [b'U'] => InputAction::Undo,
        [b'n'] | [b'N'] | [b'r'] | [b'R'] => InputAction::NewGame,
        [b'q'] | [b'Q'] | [3] | [27] => InputAction::Quit, // q, Q, Ctrl+C, Esc

        _ => InputAction::None,
    }
}

fn redraw<S: Store>(session: &Session<S>, reward: Option<u32>) -> Result<()> {
    let mut out = io::stdout().lock();
    write!(out, "{}", render(session, reward))?;
    out.flush()?;
    Ok(())
}

/// Full screen contents for the current session.
fn render<S: Store>(session: &Session<S>, reward: Option<u32>) -> String {
    let mut screen = String::from("\x1b[2J\x1b[H"); // Clear screen
    screen.push_str(&format!("=== 2048 (until {}) ===\n", WIN_TILE));
    screen.push_str("Controls: WASD or Arrow Keys | U undo | N new game | Q quit\n\n");
    screen.push_str(&format!("Score: {}\n", session.score()));
    screen.push_str(&session.board().to_string());

    if let Some(points) = reward.filter(|&points| points > 0) {
        screen.push_str(&format!("  +{} points!\n", points));
    }

    match session.status() {
        Status::Won => {
            screen.push_str(&format!("\n  *** YOU WIN! You made the {} tile! ***\n", WIN_TILE));
            screen.push_str(&format!("  Final Score: {}\n", session.score()));
        }
        Status::Over => {
            screen.push_str("\n  *** GAME OVER ***\n");
            screen.push_str("  No more moves are possible.\n");
            screen.push_str(&format!("  Final Score: {}\n", session.score()));
            screen.push_str(&format!("  Max Tile: {}\n", session.board().max_tile()));
        }
        Status::Playing => {}
    }

    if session.status() != Status::Playing {
        if session.can_undo() {
            screen.push_str("\n  Press N for a new game, U to undo, or Q to quit\n");
        } else {
            screen.push_str("\n  Press N for a new game or Q to quit\n");
        }
    }

    screen
}

/// Puts the terminal in raw mode and restores it when dropped.
struct RawMode;

impl RawMode {
    fn enable() -> Self {
        enable_raw_mode();
        RawMode
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        disable_raw_mode();
    }
}

// Platform-specific terminal raw mode handling
#[cfg(unix)]
fn enable_raw_mode() {
    use std::os::unix::io::AsRawFd;
    unsafe {
        let fd = io::stdin().as_raw_fd();
        let mut termios: libc::termios = std::mem::zeroed();
        libc::tcgetattr(fd, &mut termios);
        termios.c_lflag &= !(libc::ICANON | libc::ECHO);
        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 0;
        libc::tcsetattr(fd, libc::TCSANOW, &termios);
    }
}

#[cfg(unix)]
fn disable_raw_mode() {
    use std::os::unix::io::AsRawFd;
    unsafe {
        let fd = io::stdin().as_raw_fd();
        let mut termios: libc::termios = std::mem::zeroed();
        libc::tcgetattr(fd, &mut termios);
        termios.c_lflag |= libc::ICANON | libc::ECHO;
        libc::tcsetattr(fd, libc::TCSANOW, &termios);
    }
}

#[cfg(not(unix))]
fn enable_raw_mode() {
    // On non-Unix systems, just continue without raw mode
    // Interactive mode will require Enter after each key
}

#[cfg(not(unix))]
fn disable_raw_mode() {}
