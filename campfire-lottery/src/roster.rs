use meetup_lib::{AttendeeId, MeetupRecord};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Participant {
    pub id: AttendeeId,
    pub name: String,
    pub meetup_count: u64,
    pub active: bool,
}

#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub active: u64,
    pub total: u64,
}

#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    pub players: Tally,
    pub participations: Tally,
}

/// Participants merged from every registered meetup, keyed by attendee id.
///
/// Iteration follows the attendee ids so that a seeded draw over the same
/// meetups always sees the same pool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Roster {
    participants: BTreeMap<AttendeeId, Participant>,
}

impl Roster {
    /// Builds the roster from scratch: everyone is active and counted once
    /// per meetup that lists them.
    pub fn derive(meetups: &[MeetupRecord]) -> Self {
        let mut participants = BTreeMap::<AttendeeId, Participant>::new();
        for meetup in meetups {
            let mut seen = HashSet::new();
            for attendee in &meetup.attendees {
                if !seen.insert(attendee.id.as_str()) {
                    continue;
                }
                participants
                    .entry(attendee.id.clone())
                    .and_modify(|p| p.meetup_count += 1)
                    .or_insert_with(|| Participant {
                        id: attendee.id.clone(),
                        name: attendee.name.clone(),
                        meetup_count: 1,
                        active: true,
                    });
            }
        }
        debug!(
            meetups = meetups.len(),
            participants = participants.len(),
            "roster derived"
        );
        Self { participants }
    }

    /// Same as [`Roster::derive`], but participants that are still present
    /// keep the `active` flag they had in `self`.
    pub fn rederive(&self, meetups: &[MeetupRecord]) -> Self {
        let mut roster = Self::derive(meetups);
        for (id, participant) in roster.participants.iter_mut() {
            if let Some(previous) = self.participants.get(id) {
                participant.active = previous.active;
            }
        }
        roster
    }

    pub fn get(&self, id: &str) -> Option<&Participant> {
        self.participants.get(id)
    }

    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    pub fn active(&self) -> impl Iterator<Item = &Participant> {
        self.participants().filter(|p| p.active)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Flips the `active` flag; returns the new value, or `None` for an
    /// unknown id.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        self.participants.get_mut(id).map(|p| {
            p.active = !p.active;
            p.active
        })
    }

    pub fn statistics(&self) -> Statistics {
        self.participants()
            .fold(Statistics::default(), |mut stats, participant| {
                stats.players.total += 1;
                stats.participations.total += participant.meetup_count;
                if participant.active {
                    stats.players.active += 1;
                    stats.participations.active += participant.meetup_count;
                }
                stats
            })
    }
}
