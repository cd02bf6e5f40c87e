use chrono::DateTime;
use meetup_lib::{Attendee, MeetupRecord};

/// A meetup whose attendees use their id as display name.
pub fn meetup(id: &str, attendees: &[&str]) -> MeetupRecord {
    MeetupRecord::new(
        id.to_string(),
        id,
        DateTime::parse_from_rfc3339("2024-06-01T10:00:00Z").unwrap(),
        format!("https://cmpf.re/{}", id),
        attendees
            .iter()
            .map(|a| Attendee {
                id: a.to_string(),
                name: a.to_string(),
            })
            .collect(),
    )
}
