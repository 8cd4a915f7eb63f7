use std::{
    fmt,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use blockfall_engine::{Game, GameSeed};
use rand::Rng as _;
use serde::Serialize;
use tracing_appender::non_blocking::WorkerGuard;

use crate::tui;

use self::app::PlayApp;

mod app;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for the piece sequence (32 hex characters); random when omitted
    #[clap(long)]
    seed: Option<GameSeed>,
    /// Hide the landing preview under the falling piece
    #[clap(long)]
    no_ghost: bool,
    /// Print the end-of-session summary as JSON
    #[clap(long)]
    json_summary: bool,
    /// Append tracing output to this file (the terminal stays clean)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        seed,
        no_ghost,
        json_summary,
        log_file,
    } = arg;

    // The appender guard must outlive the session or buffered lines are lost.
    let _log_guard = log_file.as_deref().map(init_tracing).transpose()?;

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    tracing::info!(%seed, "session starting");

    let mut app = PlayApp::new(Game::with_seed(seed), !*no_ghost);
    tui::run(&mut app, PlayApp::TICK)?;

    let summary = SessionSummary::from_game(&app.into_game());
    tracing::info!(score = summary.score, lines = summary.lines, "session ended");

    if *json_summary {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{summary}");
    }
    Ok(())
}

fn init_tracing(path: &Path) -> anyhow::Result<WorkerGuard> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let file = path
        .file_name()
        .context("log file path has no file name")?;
    let appender = tracing_appender::rolling::never(dir.unwrap_or(Path::new(".")), file);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("blockfall=debug".parse()?),
        )
        .with_ansi(false)
        .init();
    Ok(guard)
}

/// End-of-session report, printed after the terminal is restored.
#[derive(Debug, Serialize)]
pub(crate) struct SessionSummary {
    seed: String,
    score: usize,
    lines: usize,
    level: usize,
    pieces: usize,
    singles: usize,
    doubles: usize,
    triples: usize,
    quads: usize,
    duration_secs: u64,
}

impl SessionSummary {
    fn from_game(game: &Game) -> Self {
        let stats = game.stats();
        let counter = stats.clear_counter();
        Self {
            seed: game.seed().to_string(),
            score: stats.score(),
            lines: stats.lines(),
            level: stats.level(),
            pieces: stats.pieces(),
            singles: counter[1],
            doubles: counter[2],
            triples: counter[3],
            quads: counter[4],
            duration_secs: game.elapsed().as_secs(),
        }
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "seed:   {}", self.seed)?;
        writeln!(f, "score:  {}", self.score)?;
        writeln!(f, "lines:  {} (level {})", self.lines, self.level)?;
        writeln!(
            f,
            "clears: {} single / {} double / {} triple / {} quad",
            self.singles, self.doubles, self.triples, self.quads
        )?;
        write!(
            f,
            "time:   {}:{:02} ({} pieces)",
            self.duration_secs / 60,
            self.duration_secs % 60,
            self.pieces
        )
    }
}
