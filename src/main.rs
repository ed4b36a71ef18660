use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::info;

use lrc_match::apply::FsRenamer;
use lrc_match::config::{
    MatchConfig, DEFAULT_LYRIC_EXTENSION, DEFAULT_MAX_ATTEMPTS, DEFAULT_THRESHOLD,
};
use lrc_match::directory::load_batch;
use lrc_match::Error;
use lrc_match::models::{PlanExport, Round, RoundSummary};
use lrc_match::normalize::CleanOptions;
use lrc_match::progress::{format_duration, init_logging, spinner_visible};
use lrc_match::prompt::{AutoAccept, DecisionSource, LinePrompt};
use lrc_match::session::{Session, SessionOutcome};

#[derive(Parser)]
#[command(name = "lrc-match")]
#[command(about = "Pair lyric files with the audio tracks in a directory and rename both to match")]
struct Args {
    /// Minimum similarity for a lyric file to be matched
    #[arg(short = 's', long, env = "LRC_MATCH_THRESHOLD", default_value_t = DEFAULT_THRESHOLD)]
    similarity_threshold: f64,

    /// Threshold adjustments allowed before giving up
    #[arg(short = 'a', long, env = "LRC_MATCH_ATTEMPTS", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    attempts: u32,

    /// Extension of the lyric files
    #[arg(short = 'l', long, env = "LRC_MATCH_EXTENSION", default_value = DEFAULT_LYRIC_EXTENSION)]
    lyric_extension: String,

    /// Accept the first proposed plan without asking
    #[arg(short = 'r', long)]
    auto_rename: bool,

    /// Directory holding the audio and lyric files
    #[arg(short = 'd', long, default_value = ".")]
    directory: PathBuf,

    /// Keep separators before the extension
    #[arg(short = 'p', long)]
    keep_punctuation: bool,

    /// Keep bracketed tags such as [a1b2]
    #[arg(short = 't', long)]
    keep_tags: bool,

    /// Show the accepted plan without renaming anything
    #[arg(long)]
    dry_run: bool,

    /// Refuse to start if any song rename would collide
    #[arg(long)]
    preflight: bool,

    /// Print the accepted plan as JSON
    #[arg(long)]
    json: bool,

    #[arg(short = 'v', long)]
    verbose: bool,

    /// Hide the spinner
    #[arg(short = 'q', long)]
    quiet: bool,
}

impl Args {
    fn config(&self) -> MatchConfig {
        MatchConfig {
            similarity_threshold: self.similarity_threshold,
            max_attempts: self.attempts,
            clean: CleanOptions {
                strip_tags: !self.keep_tags,
                strip_punctuation: !self.keep_punctuation,
            },
            auto_accept: self.auto_rename,
            dry_run: self.dry_run,
            preflight: self.preflight,
            ..MatchConfig::default()
        }
        .with_target_extension(&self.lyric_extension)
    }
}

fn print_plan(args: &Args, round: &Round, summary: &RoundSummary) -> Result<()> {
    let export = PlanExport {
        directory: args.directory.display().to_string(),
        dry_run: args.dry_run,
        summary,
        round,
    };
    println!("{}", export.to_json().context("Failed to serialize plan")?);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = args.config();
    let start = Instant::now();

    let batch = load_batch(&args.directory, &config.target_extension)
        .with_context(|| format!("Failed to read directory {:?}", args.directory))?;
    info!(
        directory = %args.directory.display(),
        audio = batch.audio.len(),
        lyrics = batch.lyrics.len(),
        "Loaded batch"
    );

    let mut auto = AutoAccept;
    let mut prompt;
    let decisions: &mut dyn DecisionSource = if config.auto_accept {
        &mut auto
    } else {
        prompt = LinePrompt::stdin();
        &mut prompt
    };
    let mut renamer = FsRenamer;

    let outcome = Session::new(
        &args.directory,
        &config,
        decisions,
        &mut renamer,
        io::stdout().lock(),
    )
    .show_spinner(spinner_visible(args.quiet))
    .run(&batch);

    let outcome = match outcome {
        Err(Error::Preflight(conflicts)) => {
            for conflict in &conflicts {
                eprintln!(
                    "{} -> {} ({:?})",
                    conflict.from.red(),
                    conflict.to.yellow(),
                    conflict.kind
                );
            }
            bail!("Preflight found {} conflicting rename(s); nothing was renamed", conflicts.len());
        }
        other => other.context("Rename session failed")?,
    };

    match &outcome {
        SessionOutcome::Applied { round, summary, .. } | SessionOutcome::DryRun { round, summary }
            if args.json =>
        {
            print_plan(&args, round, summary)?;
        }
        _ => {}
    }

    info!(elapsed = %format_duration(start.elapsed()), "Done");
    Ok(())
}
