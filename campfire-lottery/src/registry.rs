use meetup_lib::{MeetupId, MeetupRecord};
use tracing::info;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("meetup {0} has already been added")]
    DuplicateMeetup(MeetupId),
}

/// Meetups in the order they were added. Ids are unique.
#[derive(Clone, Debug, Default)]
pub struct MeetupRegistry {
    meetups: Vec<MeetupRecord>,
}

impl MeetupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: MeetupRecord) -> Result<&MeetupRecord, Error> {
        if self.contains(&record.id) {
            return Err(Error::DuplicateMeetup(record.id));
        }
        info!(
            id = %record.id,
            title = %record.title,
            attendees = record.attendees.len(),
            "meetup added"
        );
        self.meetups.push(record);
        Ok(&self.meetups[self.meetups.len() - 1])
    }

    /// Removing an id that is not registered is not an error.
    pub fn remove(&mut self, id: &str) -> Option<MeetupRecord> {
        let position = self.meetups.iter().position(|m| m.id == id)?;
        let removed = self.meetups.remove(position);
        info!(id = %removed.id, title = %removed.title, "meetup removed");
        Some(removed)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.meetups.iter().any(|m| m.id == id)
    }

    pub fn meetups(&self) -> &[MeetupRecord] {
        &self.meetups
    }

    pub fn len(&self) -> usize {
        self.meetups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meetups.is_empty()
    }
}
