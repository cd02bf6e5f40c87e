//! The whole state of one organizer session.
//!
//! Every user action goes through a [`Session`] method; derived state
//! (roster, statistics, draw count bounds) is recomputed right after each
//! change to the meetups or to a participant.

use crate::draw::{
    self, run_draw, seeded_rng, Draw, DrawResult, DrawSettings, ParticipationMode, Reveal, Seed,
};
use crate::registry::{self, MeetupRegistry};
use crate::roster::{Participant, Roster, Statistics};
use meetup_lib::{link, lookup, MeetupLookup, MeetupRecord, ShortLink};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    InvalidLink(#[from] link::Error),

    #[error("unable to fetch meetup details")]
    Lookup(#[from] lookup::Error),

    #[error(transparent)]
    Registry(#[from] registry::Error),

    #[error(transparent)]
    InvalidDraw(#[from] draw::Error),

    #[error("per-meetup participation needs at least 2 meetups")]
    PerMeetupUnavailable,

    #[error("a draw is in progress")]
    DrawInProgress,
}

pub struct Session {
    settings: DrawSettings,
    registry: MeetupRegistry,
    roster: Roster,
    statistics: Statistics,
    mode: ParticipationMode,
    draw_count: usize,
    draw: Option<Draw<ChaCha8Rng>>,
    result: Option<DrawResult>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DrawSettings::default())
    }
}

impl Session {
    pub fn new(settings: DrawSettings) -> Self {
        Self {
            settings,
            registry: MeetupRegistry::new(),
            roster: Roster::default(),
            statistics: Statistics::default(),
            mode: ParticipationMode::Unique,
            draw_count: 0,
            draw: None,
            result: None,
        }
    }

    pub fn settings(&self) -> &DrawSettings {
        &self.settings
    }

    pub fn meetups(&self) -> &[MeetupRecord] {
        self.registry.meetups()
    }

    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.roster.participants()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn statistics(&self) -> Statistics {
        self.statistics
    }

    pub fn mode(&self) -> ParticipationMode {
        self.mode
    }

    pub fn draw_count(&self) -> usize {
        self.draw_count
    }

    pub fn max_draw_count(&self) -> usize {
        self.settings.max_draw_count(self.statistics.players.active)
    }

    pub fn is_drawing(&self) -> bool {
        self.draw.is_some()
    }

    /// Latest snapshot of the current or last draw.
    pub fn result(&self) -> Option<&DrawResult> {
        self.result.as_ref()
    }

    /// Validates the link, resolves it and registers the meetup. Nothing is
    /// added when any of these steps fails.
    pub fn add_from_link<L: MeetupLookup + ?Sized>(
        &mut self,
        lookup: &L,
        input: &str,
    ) -> Result<&MeetupRecord, Error> {
        self.ensure_idle()?;
        let link = ShortLink::parse(input)?;
        let record = lookup.resolve(&link)?;
        self.add_meetup(record)
    }

    pub fn add_meetup(&mut self, record: MeetupRecord) -> Result<&MeetupRecord, Error> {
        self.ensure_idle()?;
        if self.registry.contains(&record.id) {
            return Err(registry::Error::DuplicateMeetup(record.id).into());
        }
        if self.draw_count < 1 {
            self.draw_count = 1;
        }
        self.registry.add(record)?;
        self.refresh();
        Ok(&self.registry.meetups()[self.registry.len() - 1])
    }

    pub fn remove_meetup(&mut self, id: &str) -> Result<Option<MeetupRecord>, Error> {
        self.ensure_idle()?;
        let removed = self.registry.remove(id);
        if removed.is_some() {
            self.refresh();
        }
        Ok(removed)
    }

    /// Flips a participant between active and inactive. Unknown ids, and any
    /// toggle while a draw is in progress, are ignored.
    pub fn toggle_participant(&mut self, id: &str) -> Option<bool> {
        if self.is_drawing() {
            debug!(id, "toggle ignored during a draw");
            return None;
        }
        let active = self.roster.toggle(id)?;
        self.refresh_statistics();
        Some(active)
    }

    pub fn set_mode(&mut self, mode: ParticipationMode) -> Result<(), Error> {
        self.ensure_idle()?;
        if mode == ParticipationMode::PerMeetup && self.registry.len() < 2 {
            return Err(Error::PerMeetupUnavailable);
        }
        self.mode = mode;
        Ok(())
    }

    pub fn set_draw_count(&mut self, draw_count: usize) -> Result<(), Error> {
        self.ensure_idle()?;
        self.draw_count = draw::validate_draw_count(draw_count, self.max_draw_count())?;
        Ok(())
    }

    /// Arms a draw over the current roster. Until it finishes, every other
    /// action is refused or ignored.
    pub fn start_draw(&mut self, seed: Seed) -> Result<(), Error> {
        self.ensure_idle()?;
        let max = self.max_draw_count();
        if max > 0 {
            draw::validate_draw_count(self.draw_count, max)?;
        }
        info!(
            mode = %self.mode,
            draw_count = self.draw_count,
            seed = %hex::encode(seed),
            "draw started"
        );
        self.result = None;
        self.draw = Some(run_draw(
            &self.roster,
            self.draw_count,
            self.mode,
            seeded_rng(seed),
            self.settings.reveal_delay,
        ));
        Ok(())
    }

    /// Advances the draw by one reveal. Returns `None` when no draw is in
    /// progress; the draw is released as soon as its last reveal is handed
    /// out.
    pub fn next_reveal(&mut self) -> Option<Reveal> {
        let draw = self.draw.as_mut()?;
        let reveal = draw.next();
        if draw.is_finished() || reveal.is_none() {
            self.draw = None;
        }
        let reveal = reveal?;
        self.result = Some(reveal.result.clone());
        Some(reveal)
    }

    fn ensure_idle(&self) -> Result<(), Error> {
        if self.is_drawing() {
            Err(Error::DrawInProgress)
        } else {
            Ok(())
        }
    }

    fn refresh(&mut self) {
        self.roster = self.roster.rederive(self.registry.meetups());
        if self.registry.len() < 2 {
            self.mode = ParticipationMode::Unique;
        }
        self.refresh_statistics();
    }

    fn refresh_statistics(&mut self) {
        self.statistics = self.roster.statistics();
        let max = self.max_draw_count();
        self.draw_count = if max == 0 {
            0
        } else {
            self.draw_count.clamp(1, max)
        };
        debug!(
            players = self.statistics.players.total,
            active = self.statistics.players.active,
            draw_count = self.draw_count,
            max,
            "statistics updated"
        );
    }
}
