//! 端末で動作する最小 UI。

use std::collections::HashMap;
use std::io::{self, BufRead as _, Write as _};

use clap::{Parser, ValueEnum};
use tictactoe_core::ai::negamax::{DEFAULT_MAX_SEARCH_DEPTH, SearchConfig};
use tictactoe_core::ai::random;
use tictactoe_core::engine;
use tictactoe_core::session::{Match, MatchConfig, MatchError, MatchObserver};

/// 操作主体の指定。
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum Side {
    Engine,
    Human,
    Random,
}

impl Side {
    const fn kind(self) -> engine::PlayerKind {
        match self {
            Self::Human => engine::PlayerKind::Human,
            Self::Engine | Self::Random => engine::PlayerKind::Engine,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum MarkArg {
    O,
    X,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Json,
    Pretty,
}

/// Play tic-tac-toe against the negamax engine in the terminal.
#[derive(Debug, Parser)]
#[command(name = "tictactoe", version, about)]
struct Args {
    /// Search depth of the engine (1 looks at the move itself only)
    #[arg(long, default_value_t = DEFAULT_MAX_SEARCH_DEPTH)]
    depth: u8,

    /// Who plays the first seat
    #[arg(long, value_enum, default_value_t = Side::Human)]
    first: Side,

    /// Mark used by the first seat
    #[arg(long, value_enum, default_value_t = MarkArg::X)]
    first_mark: MarkArg,

    /// Number of games; seats swap between games
    #[arg(long, default_value_t = 1)]
    games: u32,

    /// Log format written to stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Let the engine evaluate positions with a single legal move
    #[arg(long)]
    no_single_move_shortcut: bool,

    /// Who plays the second seat
    #[arg(long, value_enum, default_value_t = Side::Engine)]
    second: Side,

    /// Seed for random players
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

impl Args {
    fn match_config(&self) -> MatchConfig {
        let search = SearchConfig::new(self.depth);
        MatchConfig {
            first_mark: match self.first_mark {
                MarkArg::O => engine::Mark::O,
                MarkArg::X => engine::Mark::X,
            },
            first: self.first.kind(),
            search: if self.no_single_move_shortcut {
                search.without_single_move_shortcut()
            } else {
                search
            },
            second: self.second.kind(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("input closed before the game finished")]
    InputClosed,
    #[error("failed to read or write the terminal: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Match(#[from] MatchError),
    #[error("failed to install the log subscriber: {0}")]
    Tracing(#[from] tracing_subscriber::util::TryInitError),
}

#[derive(Debug)]
enum Controller {
    Engine,
    Human,
    Random { seed: u64 },
}

impl Controller {
    const fn new(side: Side, seed: u64) -> Self {
        match side {
            Side::Engine => Self::Engine,
            Side::Human => Self::Human,
            Side::Random => Self::Random { seed },
        }
    }
}

/// 盤面と結果を標準出力へ描く。
#[derive(Debug, Default)]
struct TerminalObserver {
    ties: u32,
    wins: HashMap<engine::PlayerId, u32>,
}

impl MatchObserver for TerminalObserver {
    fn on_game_over(&mut self, state: engine::TurnState) {
        match state {
            engine::TurnState::Winner(player) => {
                *self.wins.entry(player.id()).or_default() += 1;
                println!("{} wins!", player.mark());
            }
            engine::TurnState::TieGame => {
                self.ties += 1;
                println!("Tie game.");
            }
            engine::TurnState::PreGame | engine::TurnState::PlayerTurn(_) => {}
        }
    }

    fn on_refresh(&mut self, board: &engine::Board) {
        println!("\n{board}");
    }
}

fn init_tracing(level: &str, format: LogFormat) -> Result<(), CliError> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .try_init()?,
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(io::stderr))
            .try_init()?,
    }
    Ok(())
}

/// `1`-`9`（テンキー配置）またはラベル（`NW`, `center` など）を解釈する。
fn parse_cell(input: &str) -> Option<engine::Cell> {
    let trimmed = input.trim();
    trimmed
        .parse::<u8>()
        .ok()
        .and_then(engine::Cell::from_keypad)
        .or_else(|| engine::Cell::from_label(trimmed))
}

/// 人間の手番で1手入力させる。
fn read_human_move(
    game: &mut Match<TerminalObserver>,
    player: engine::Player,
    input: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<(), CliError> {
    loop {
        print!("{} to move [1-9 or NW..SE]: ", player.mark());
        io::stdout().flush()?;

        let line = input.next().ok_or(CliError::InputClosed)??;
        let Some(cell) = parse_cell(&line) else {
            println!("'{}' is not a cell.", line.trim());
            continue;
        };
        match game.play(cell) {
            Ok(_) => return Ok(()),
            Err(MatchError::CellTaken(taken)) => println!("{taken} is already taken."),
            Err(err) => return Err(err.into()),
        }
    }
}

fn play_one_game(
    game: &mut Match<TerminalObserver>,
    controllers: &mut HashMap<engine::PlayerId, Controller>,
    input: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<(), CliError> {
    while let engine::TurnState::PlayerTurn(player) = game.state() {
        let pending = match controllers.get_mut(&player.id()) {
            Some(Controller::Human) => {
                read_human_move(game, player, input)?;
                continue;
            }
            Some(Controller::Random { seed }) => {
                *seed = seed.wrapping_add(1);
                game.request_move_with(random::Agent::new(*seed))?
            }
            Some(Controller::Engine) | None => game.request_engine_move()?,
        };
        let mv = pending.wait()?;
        if let Some(cell) = mv.cell() {
            println!("{} plays {cell}.", player.mark());
        }
        game.apply_engine_move(mv)?;
    }
    Ok(())
}

fn main() -> Result<(), CliError> {
    let args = Args::parse();
    init_tracing(&args.log_level, args.log_format)?;

    let mut game = Match::new(args.match_config(), TerminalObserver::default());
    let [first, second] = game.players();
    let mut controllers = HashMap::from([
        (first.id(), Controller::new(args.first, args.seed)),
        (second.id(), Controller::new(args.second, args.seed.wrapping_add(1 << 32))),
    ]);
    tracing::info!(
        first = ?args.first,
        second = ?args.second,
        depth = args.depth,
        games = args.games,
        "tictactoe starting"
    );

    let stdin = io::stdin();
    let mut input = stdin.lock().lines();

    game.start()?;
    for round in 1..=args.games {
        play_one_game(&mut game, &mut controllers, &mut input)?;
        if round < args.games {
            println!("\n-- game {} --", round + 1);
            game.replay()?;
        }
    }

    if args.games > 1 {
        let observer = game.observer();
        for player in [first, second] {
            let wins = observer.wins.get(&player.id()).copied().unwrap_or_default();
            println!("{} ({:?}): {wins} wins", player.mark(), player.kind());
        }
        println!("ties: {}", observer.ties);
    }
    Ok(())
}
