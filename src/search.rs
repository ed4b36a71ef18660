//! Threshold search as a pure state machine.
//!
//! ```text
//! Scoring -> Reporting -> AwaitingDecision -> Applying
//!    ^                          |          -> Aborted
//!    +---- raise / lower -------+
//! ```
//!
//! The machine never prints, prompts or touches the filesystem; the session
//! shell does that between transitions.

use std::fmt;
use std::mem;

use tracing::{debug, info};

use crate::artist::{strip_artist, ArtistCache};
use crate::config::{MatchConfig, THRESHOLD_STEP};
use crate::error::{Error, Result};
use crate::models::{Batch, Round, RoundSummary};
use crate::normalize::{clean_filename, CleanOptions};
use crate::planner::{song_renames, LyricClaims, RenamePlanner};
use crate::scoring::best_match;

// ============================================================================
// Decisions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    RaiseThreshold,
    LowerThreshold,
    Abort,
}

impl Decision {
    /// `y` accepts, `i` raises, `l` lowers, anything else aborts.
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_lowercase().as_str() {
            "y" => Decision::Accept,
            "i" => Decision::RaiseThreshold,
            "l" => Decision::LowerThreshold,
            _ => Decision::Abort,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    UserAbort,
    AttemptsExhausted,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::UserAbort => write!(f, "aborted by user"),
            AbortReason::AttemptsExhausted => write!(f, "reached maximum number of attempts"),
        }
    }
}

// ============================================================================
// States
// ============================================================================

#[derive(Debug)]
pub enum SearchState {
    Scoring,
    Reporting(Round),
    AwaitingDecision { round: Round, summary: RoundSummary },
    Applying(Round),
    Aborted(AbortReason),
}

impl SearchState {
    fn name(&self) -> &'static str {
        match self {
            SearchState::Scoring => "scoring",
            SearchState::Reporting(_) => "reporting",
            SearchState::AwaitingDecision { .. } => "awaiting a decision",
            SearchState::Applying(_) => "applying",
            SearchState::Aborted(_) => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SearchState::Applying(_) | SearchState::Aborted(_))
    }
}

pub struct ThresholdSearch {
    threshold: f64,
    attempts: u32,
    max_attempts: u32,
    clean: CleanOptions,
    target_extension: String,
    artist: ArtistCache,
    totals: (usize, usize),
    state: SearchState,
}

impl ThresholdSearch {
    pub fn new(config: &MatchConfig) -> Self {
        Self {
            threshold: config.similarity_threshold,
            attempts: 0,
            max_attempts: config.max_attempts,
            clean: config.clean,
            target_extension: config.target_extension.clone(),
            artist: ArtistCache::new(),
            totals: (0, 0),
            state: SearchState::Scoring,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Scoring → Reporting: run one full matching pass over the batch.
    pub fn score(&mut self, batch: &Batch) -> Result<&Round> {
        self.require("score", |s| matches!(s, SearchState::Scoring))?;

        let round = score_round(
            batch,
            self.threshold,
            &self.clean,
            &self.target_extension,
            &mut self.artist,
        );
        self.totals = (batch.audio.len(), batch.lyrics.len());
        self.state = SearchState::Reporting(round);

        match &self.state {
            SearchState::Reporting(round) => Ok(round),
            _ => unreachable!(),
        }
    }

    /// Reporting → AwaitingDecision: compute the summary shown to the user.
    pub fn report(&mut self) -> Result<&RoundSummary> {
        self.require("report", |s| matches!(s, SearchState::Reporting(_)))?;

        let SearchState::Reporting(round) = mem::replace(&mut self.state, SearchState::Scoring)
        else {
            unreachable!()
        };
        let summary = round.summary(self.totals.0, self.totals.1, self.attempts + 1);
        self.state = SearchState::AwaitingDecision { round, summary };

        match &self.state {
            SearchState::AwaitingDecision { summary, .. } => Ok(summary),
            _ => unreachable!(),
        }
    }

    /// AwaitingDecision → Applying | Scoring | Aborted.
    pub fn decide(&mut self, decision: Decision) -> Result<&SearchState> {
        self.require("decide", |s| matches!(s, SearchState::AwaitingDecision { .. }))?;

        let SearchState::AwaitingDecision { round, .. } =
            mem::replace(&mut self.state, SearchState::Scoring)
        else {
            unreachable!()
        };

        self.state = match decision {
            Decision::Accept => SearchState::Applying(round),
            Decision::RaiseThreshold => self.adjust(THRESHOLD_STEP),
            Decision::LowerThreshold => self.adjust(-THRESHOLD_STEP),
            Decision::Abort => SearchState::Aborted(AbortReason::UserAbort),
        };
        debug!(?decision, state = self.state.name(), threshold = self.threshold, "Decision applied");
        Ok(&self.state)
    }

    /// Accepted round, if the search ended in `Applying`.
    pub fn into_accepted(self) -> Option<Round> {
        match self.state {
            SearchState::Applying(round) => Some(round),
            _ => None,
        }
    }

    fn adjust(&mut self, delta: f64) -> SearchState {
        self.attempts += 1;
        self.threshold += delta;
        if self.attempts < self.max_attempts {
            SearchState::Scoring
        } else {
            info!(attempts = self.attempts, "Attempt budget exhausted");
            SearchState::Aborted(AbortReason::AttemptsExhausted)
        }
    }

    fn require(&self, action: &'static str, valid: impl Fn(&SearchState) -> bool) -> Result<()> {
        if valid(&self.state) {
            Ok(())
        } else {
            Err(Error::InvalidTransition {
                action,
                state: self.state.name(),
            })
        }
    }
}

// ============================================================================
// Scoring Pass
// ============================================================================

/// One matching pass: clean, extract artist, match, plan.
pub fn score_round(
    batch: &Batch,
    threshold: f64,
    clean: &CleanOptions,
    target_extension: &str,
    artist_cache: &mut ArtistCache,
) -> Round {
    let cleaned: Vec<String> = batch
        .audio
        .iter()
        .map(|name| clean_filename(name, clean))
        .collect();
    let artist = artist_cache.token_for(&cleaned).to_string();

    let mut claims = LyricClaims::new();
    let mut unmatched_audio = Vec::new();

    for (raw, cleaned_name) in batch.audio.iter().zip(&cleaned) {
        let query = strip_artist(cleaned_name, &artist);
        match best_match(&query, &batch.lyrics) {
            Some(candidate) if candidate.score >= threshold => {
                debug!(audio = %raw, lyric = %candidate.lyric, score = candidate.score, "Matched");
                claims.claim(&candidate.lyric, cleaned_name);
            }
            best => {
                debug!(
                    audio = %raw,
                    best_score = best.map(|c| c.score),
                    "No lyric candidate above threshold"
                );
                unmatched_audio.push(raw.clone());
            }
        }
    }

    let mut planner = RenamePlanner::new(batch.existing.iter().cloned(), target_extension);
    for (lyric, cleaned_name) in claims.iter() {
        planner.plan(lyric, cleaned_name);
    }

    let round = Round {
        threshold,
        artist,
        song_renames: song_renames(&batch.audio, &cleaned),
        lyric_renames: planner.finish(),
        unmatched_audio,
    };
    info!(
        threshold = %format!("{:.2}", threshold),
        matches = round.lyric_renames.len(),
        lyrics = batch.lyrics.len(),
        "Scored round"
    );
    round
}
