//! Show how every audio file in a directory scores against the lyric files.
//! Read-only: nothing is renamed.
//! Usage: cargo run --release --bin lrc-score -- -d <dir> [--top N]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use lrc_match::artist::{extract_artist, strip_artist};
use lrc_match::config::{DEFAULT_LYRIC_EXTENSION, DEFAULT_THRESHOLD};
use lrc_match::directory::load_batch;
use lrc_match::normalize::{clean_filename, normalize_extension, CleanOptions};
use lrc_match::progress::init_logging;
use lrc_match::scoring::rank_candidates;

#[derive(Parser)]
#[command(name = "lrc-score")]
#[command(about = "Print the best lyric candidates for each audio file without renaming")]
struct Args {
    #[arg(short = 'd', long, default_value = ".")]
    directory: PathBuf,

    #[arg(short = 'l', long, env = "LRC_MATCH_EXTENSION", default_value = DEFAULT_LYRIC_EXTENSION)]
    lyric_extension: String,

    /// Scores at or above this are highlighted
    #[arg(short = 's', long, env = "LRC_MATCH_THRESHOLD", default_value_t = DEFAULT_THRESHOLD)]
    similarity_threshold: f64,

    /// Candidates shown per audio file
    #[arg(long, default_value_t = 3)]
    top: usize,

    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let extension = normalize_extension(&args.lyric_extension);
    let batch = load_batch(&args.directory, &extension)
        .with_context(|| format!("Failed to read directory {:?}", args.directory))?;

    let options = CleanOptions::default();
    let cleaned: Vec<String> = batch
        .audio
        .iter()
        .map(|name| clean_filename(name, &options))
        .collect();
    let artist = extract_artist(&cleaned);

    println!("Artist: {}", artist.yellow());
    println!(
        "{} audio files, {} {} files\n",
        batch.audio.len(),
        batch.lyrics.len(),
        extension
    );

    for (raw, name) in batch.audio.iter().zip(&cleaned) {
        let query = strip_artist(name, &artist);
        println!("{}", raw.bold());
        println!("  query: \"{}\"", query);

        let ranked = rank_candidates(&query, &batch.lyrics);
        if ranked.is_empty() {
            println!("  (no lyric files)");
        }
        for candidate in ranked.into_iter().take(args.top) {
            let score = format!("{:.3}", candidate.score);
            let score = if candidate.score >= args.similarity_threshold {
                score.green()
            } else {
                score.red()
            };
            println!("  {} {}", score, candidate.lyric);
        }
        println!();
    }

    Ok(())
}
