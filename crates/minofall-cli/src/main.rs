use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Arc,
    thread,
};

use anyhow::Context as _;
use clap::Parser;
use minofall_ai::GreedyAdvisor;
use minofall_board::{GridBoard, GridEditor};
use minofall_engine::{Advisor, Engine, run_polling_loop};

mod ranking;
mod source;
mod view;

/// Terminal falling-block game with an optional built-in move advisor.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Start with the move advisor enabled
    #[arg(long)]
    ai: bool,

    /// Seed for a reproducible piece sequence
    #[arg(long)]
    seed: Option<u64>,

    /// Path of the high-score file
    #[arg(long, default_value = "minofall-ranking.json")]
    ranking: PathBuf,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let board = match args.seed {
        Some(seed) => GridBoard::with_seed(seed),
        None => GridBoard::new(),
    };
    let ranking = ranking::FileRanking::load_or_default(&args.ranking);
    let advisor: Arc<dyn Advisor<GridBoard>> = Arc::new(GreedyAdvisor::new());

    let terminal = ratatui::init();
    let view = view::TerminalView::new(terminal);

    let mut engine = Engine::new(board, view, ranking, advisor, GridEditor::new());
    if args.ai {
        engine.enable_ai();
    }

    let handle = engine.handle();
    let poller = thread::spawn(move || run_polling_loop(source::CrosstermSource, &handle));

    let engine = engine.run();
    drop(engine);
    ratatui::restore();

    poller
        .join()
        .map_err(|_| anyhow::anyhow!("polling thread panicked"))?;
    Ok(())
}

/// Routes logs to a file when requested so they never corrupt the TUI;
/// without a file, logging stays off unless `RUST_LOG` asks for it.
fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let default_filter = if log_file.is_some() { "info" } else { "off" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("cannot create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}
