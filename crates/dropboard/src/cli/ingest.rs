//! The `dropboard ingest` command: drop files onto a board, replay drags, print the board.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use clap::{Args, ValueEnum};
use dropboard_core::output::OutputFormat as CoreOutputFormat;
use dropboard_core::{
    BoardError, Config, DragSession, Dropboard, FileDiscovery, IngestEvent, IngestReport,
    OutputWriter,
};

/// Arguments for the `ingest` command.
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Image files or directories to drop onto the board
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Accept filter in HTML `accept` syntax (overrides config), e.g. "image/png,.webp"
    #[arg(long)]
    pub accept: Option<String>,

    /// Drag an item after ingestion: FROM:TO, or FROM:H1,H2,... to hover several slots in turn.
    /// Repeat to perform several drags in order.
    #[arg(short = 'm', long = "move", value_name = "FROM:TO[,TO...]")]
    pub moves: Vec<DragPlan>,

    /// Output file for the board (default: stdout, or `output.path` from config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (default: `output.format` from config)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Skip thumbnail generation
    #[arg(long)]
    pub no_thumbnail: bool,

    /// Maximum number of files decoded at once (overrides config)
    #[arg(short, long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub parallel: Option<usize>,

    /// Include hidden files and directories when walking directories
    #[arg(long)]
    pub include_hidden: bool,
}

/// Output format for the printed board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// One drag gesture: pick up `origin`, then hover each slot in `hovers` in turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPlan {
    pub origin: usize,
    pub hovers: Vec<usize>,
}

impl FromStr for DragPlan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, rest) = s
            .split_once(':')
            .ok_or_else(|| format!("expected FROM:TO, got {s:?}"))?;
        let origin = parse_index(from)?;
        let hovers = rest
            .split(',')
            .map(parse_index)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { origin, hovers })
    }
}

fn parse_index(s: &str) -> Result<usize, String> {
    s.trim()
        .parse()
        .map_err(|_| format!("invalid index {:?}", s.trim()))
}

/// Counts from replaying drag plans.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct DragStats {
    moves: usize,
    rejected: usize,
}

/// Execute the ingest command.
pub async fn execute(args: IngestArgs, mut config: Config) -> anyhow::Result<()> {
    apply_overrides(&args, &mut config);

    let format: CoreOutputFormat = match args.format {
        Some(format) => format.into(),
        None => CoreOutputFormat::parse(&config.output.format).unwrap_or(CoreOutputFormat::Json),
    };
    let pretty = args.pretty || config.output.pretty;
    let output_path = args.output.clone().or_else(|| config.output_path());

    let handles = FileDiscovery::new()
        .include_hidden(args.include_hidden)
        .discover(&args.paths);
    if handles.is_empty() {
        tracing::warn!("No files found at the given paths");
    }

    let board = Dropboard::new(config);
    let accepted = handles
        .iter()
        .filter(|h| board.accept_filter().accepts(h))
        .count();

    let start = Instant::now();
    let progress = create_progress_bar(accepted as u64)?;
    let report = board
        .drop_files_with(handles, |event| match event {
            IngestEvent::Appended { name, .. } => {
                progress.inc(1);
                progress.set_message(name.clone());
            }
            IngestEvent::Failed { name, .. } => {
                progress.inc(1);
                progress.set_message(format!("failed: {name}"));
            }
        })
        .await?;
    progress.finish_and_clear();

    let stats = replay_drags(&board, &args.moves).await?;
    let records = board.snapshot().await?;

    match output_path {
        Some(path) => {
            let file = File::create(&path)?;
            let mut writer = OutputWriter::new(BufWriter::new(file), format, pretty);
            writer.write_board(&records)?;
            writer.flush()?;
            tracing::info!("Board written to {:?}", path);
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = OutputWriter::new(stdout.lock(), format, pretty);
            writer.write_board(&records)?;
            writer.flush()?;
        }
    }

    print_summary(&report, stats, records.len(), start.elapsed());
    board.into_store().await?;
    Ok(())
}

/// Fold command-line overrides into the loaded config.
fn apply_overrides(args: &IngestArgs, config: &mut Config) {
    if let Some(accept) = &args.accept {
        config.ingest.accept = accept.clone();
    }
    if let Some(parallel) = args.parallel {
        config.ingest.max_concurrent_decodes = parallel;
    }
    if args.no_thumbnail {
        config.thumbnail.enabled = false;
    }
}

/// Replay each drag plan against the board in order.
///
/// A hover outside the board is logged and ends that drag; later plans still run.
async fn replay_drags(board: &Dropboard, plans: &[DragPlan]) -> anyhow::Result<DragStats> {
    let mut stats = DragStats::default();

    for plan in plans {
        let mut session = DragSession::start(plan.origin);
        for &hover in &plan.hovers {
            match board.hover(&mut session, hover).await {
                Ok(true) => stats.moves += 1,
                Ok(false) => {}
                Err(BoardError::Reorder(e)) => {
                    tracing::warn!("Drag from {} rejected: {}", plan.origin, e);
                    stats.rejected += 1;
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }
        let (origin, settled) = session.finish();
        tracing::debug!("Drag {} -> {} finished", origin, settled);
    }

    Ok(stats)
}

fn create_progress_bar(total: u64) -> anyhow::Result<indicatif::ProgressBar> {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )?
            .progress_chars("##-"),
    );
    pb.set_message("dropping...");
    Ok(pb)
}

/// Print a formatted summary table after the board is written.
fn print_summary(
    report: &IngestReport,
    drags: DragStats,
    board_len: usize,
    elapsed: std::time::Duration,
) {
    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Appended:     {:>8}", report.appended_count());
    if report.failed > 0 {
        eprintln!("    Failed:       {:>8}", report.failed);
    }
    if !report.rejected.is_empty() {
        eprintln!("    Rejected:     {:>8}", report.rejected.len());
    }
    if drags.moves > 0 || drags.rejected > 0 {
        eprintln!("    Moves:        {:>8}", drags.moves);
    }
    if drags.rejected > 0 {
        eprintln!("    Bad drags:    {:>8}", drags.rejected);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    On board:     {:>8}", board_len);
    eprintln!("    Duration:     {:>7.1}s", elapsed.as_secs_f64());
    eprintln!("  ====================================");
}
