//! Interactive shell around the threshold search.
//!
//! Drives [`ThresholdSearch`] through its states, printing each round,
//! asking for decisions and applying the accepted plan: song renames first,
//! then lyric renames.

use std::io::Write;
use std::path::Path;
use std::time::Instant;

use colored::Colorize;
use tracing::{debug, info};

use crate::apply::{apply_renames, ApplyReport, Renamer};
use crate::config::MatchConfig;
use crate::error::Result;
use crate::models::{Batch, Round, RoundSummary};
use crate::progress::{create_spinner, format_duration};
use crate::prompt::DecisionSource;
use crate::report::{write_adjusting, write_round};
use crate::safety::preflight;
use crate::search::{AbortReason, Decision, SearchState, ThresholdSearch};

#[derive(Debug)]
pub enum SessionOutcome {
    Applied {
        round: Round,
        summary: RoundSummary,
        songs: ApplyReport,
        lyrics: ApplyReport,
    },
    /// Accepted with `dry_run` set; nothing was renamed
    DryRun { round: Round, summary: RoundSummary },
    Aborted(AbortReason),
}

pub struct Session<'a, D: ?Sized, R: ?Sized, W> {
    dir: &'a Path,
    config: &'a MatchConfig,
    decisions: &'a mut D,
    renamer: &'a mut R,
    out: W,
    show_spinner: bool,
}

impl<'a, D, R, W> Session<'a, D, R, W>
where
    D: DecisionSource + ?Sized,
    R: Renamer + ?Sized,
    W: Write,
{
    pub fn new(
        dir: &'a Path,
        config: &'a MatchConfig,
        decisions: &'a mut D,
        renamer: &'a mut R,
        out: W,
    ) -> Self {
        Self {
            dir,
            config,
            decisions,
            renamer,
            out,
            show_spinner: false,
        }
    }

    pub fn show_spinner(mut self, visible: bool) -> Self {
        self.show_spinner = visible;
        self
    }

    pub fn run(mut self, batch: &Batch) -> Result<SessionOutcome> {
        let mut search = ThresholdSearch::new(self.config);
        let ext = self.config.target_extension.as_str();
        let accepted = loop {
            let spinner = create_spinner("Scoring", self.show_spinner);
            let started = Instant::now();
            search.score(batch)?;
            spinner.finish_and_clear();
            debug!(elapsed = %format_duration(started.elapsed()), "Round scored");

            search.report()?;
            let (decision, summary) = match search.state() {
                SearchState::AwaitingDecision { round, summary } => {
                    write_round(&mut self.out, round, summary, ext)?;
                    (self.decisions.decide(summary)?, summary.clone())
                }
                _ => unreachable!("report() always ends awaiting a decision"),
            };

            match decision {
                Decision::RaiseThreshold => write_adjusting(&mut self.out, true)?,
                Decision::LowerThreshold => write_adjusting(&mut self.out, false)?,
                Decision::Accept | Decision::Abort => {}
            }

            match search.decide(decision)? {
                SearchState::Scoring => continue,
                SearchState::Aborted(reason) => {
                    let reason = *reason;
                    let message = match reason {
                        AbortReason::AttemptsExhausted => {
                            "Reached maximum number of attempts. Quitting..."
                        }
                        AbortReason::UserAbort => "Exiting...",
                    };
                    writeln!(self.out, "{}", message.red())?;
                    info!(%reason, "Search ended without renaming");
                    return Ok(SessionOutcome::Aborted(reason));
                }
                _ => break summary,
            }
        };

        let Some(round) = search.into_accepted() else {
            unreachable!("search left the loop in the applying state")
        };
        self.apply(round, accepted, batch)
    }

    fn apply(mut self, round: Round, summary: RoundSummary, batch: &Batch) -> Result<SessionOutcome> {
        let ext = self.config.target_extension.as_str();

        if self.config.dry_run {
            writeln!(self.out, "{}", "Dry run: no files renamed".yellow())?;
            return Ok(SessionOutcome::DryRun { round, summary });
        }
        if self.config.preflight {
            preflight(&round.song_renames, &batch.existing)?;
        }

        let songs = apply_renames(self.dir, &round.song_renames, &mut *self.renamer)?;
        writeln!(self.out, "{}", "All song files renamed successfully".green())?;

        let lyrics = apply_renames(self.dir, &round.lyric_renames, &mut *self.renamer)?;
        writeln!(
            self.out,
            "{} {} {}",
            "All".green(),
            ext.cyan(),
            "files renamed successfully".green()
        )?;

        info!(
            renamed = songs.merge(lyrics).renamed,
            threshold = round.threshold,
            "Applied rename plan"
        );
        Ok(SessionOutcome::Applied {
            round,
            summary,
            songs,
            lyrics,
        })
    }
}
