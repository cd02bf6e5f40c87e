mod pool;
mod reveal;

use crate::roster::Roster;
use rand::{Rng, SeedableRng};
use rand_chacha::{ChaCha8Rng, ChaChaRng};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub use pool::eligibility_pool;
pub use reveal::{Draw, NoPacing, Pacer, Paced, Reveal, ThreadPacer};

pub type Seed = <ChaChaRng as SeedableRng>::Seed;

pub const MAX_DRAWS: usize = 50;
pub const REVEAL_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("at least 1 draw is required")]
    NoDraws,

    #[error("{requested} draws requested, at most {max} allowed")]
    TooManyDraws { requested: usize, max: usize },

    #[error("unknown participation mode {0}, expected `unique` or `per-meetup`")]
    UnknownMode(String),
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ParticipationMode {
    /// One entry per active participant.
    #[default]
    Unique,
    /// One entry per meetup attended by each active participant.
    PerMeetup,
}

impl FromStr for ParticipationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unique" => Ok(Self::Unique),
            "per-meetup" => Ok(Self::PerMeetup),
            other => Err(Error::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for ParticipationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unique => f.write_str("unique"),
            Self::PerMeetup => f.write_str("per-meetup"),
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", tag = "state", content = "name")]
pub enum Slot {
    Pending,
    Winner(String),
    NoMoreParticipants,
    NoEligibleParticipants,
}

impl Slot {
    pub fn winner(&self) -> Option<&str> {
        match self {
            Self::Winner(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("..."),
            Self::Winner(name) => f.write_str(name),
            Self::NoMoreParticipants => f.write_str("No more participants available"),
            Self::NoEligibleParticipants => f.write_str("No eligible participants"),
        }
    }
}

/// Snapshot of a draw as shown to the audience, filled from the first slot.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct DrawResult(Vec<Slot>);

impl DrawResult {
    pub fn slots(&self) -> &[Slot] {
        &self.0
    }

    pub fn winners(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter_map(Slot::winner)
    }

    pub fn pending(&self) -> usize {
        self.0.iter().filter(|slot| **slot == Slot::Pending).count()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Slot>> for DrawResult {
    fn from(slots: Vec<Slot>) -> Self {
        Self(slots)
    }
}

/// Draw limits and pacing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawSettings {
    pub max_draws: usize,
    pub reveal_delay: Duration,
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            max_draws: MAX_DRAWS,
            reveal_delay: REVEAL_DELAY,
        }
    }
}

impl DrawSettings {
    /// Largest draw count allowed with `active_players` eligible people.
    pub fn max_draw_count(&self, active_players: u64) -> usize {
        usize::try_from(active_players)
            .unwrap_or(usize::MAX)
            .min(self.max_draws)
    }
}

pub fn validate_draw_count(requested: usize, max: usize) -> Result<usize, Error> {
    match requested {
        0 => Err(Error::NoDraws),
        n if n > max => Err(Error::TooManyDraws { requested, max }),
        n => Ok(n),
    }
}

pub fn seeded_rng(seed: Seed) -> ChaCha8Rng {
    ChaCha8Rng::from_seed(seed)
}

/// Starts a draw of `draw_count` distinct winners over `roster`.
///
/// The pool is built right away, so later changes to the roster do not
/// affect a draw that already started.
pub fn run_draw<R: Rng>(
    roster: &Roster,
    draw_count: usize,
    mode: ParticipationMode,
    rng: R,
    reveal_delay: Duration,
) -> Draw<R> {
    Draw::new(eligibility_pool(roster, mode), draw_count, rng, reveal_delay)
}
