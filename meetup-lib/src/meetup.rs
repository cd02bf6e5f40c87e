use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

pub type MeetupId = String;
pub type AttendeeId = String;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Attendee {
    pub id: AttendeeId,
    pub name: String,
}

/// A meetup as resolved by the event lookup.
///
/// The attendee list is the set of members that were checked in when the
/// meetup was fetched; it is never refreshed afterwards.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MeetupRecord {
    pub id: MeetupId,
    pub title: String,
    pub link: String,
    pub event_time: DateTime<FixedOffset>,
    pub attendees: Vec<Attendee>,
}

impl MeetupRecord {
    pub fn new(
        id: MeetupId,
        name: &str,
        event_time: DateTime<FixedOffset>,
        link: String,
        attendees: Vec<Attendee>,
    ) -> Self {
        Self {
            id,
            title: title_for(name, &event_time),
            link,
            event_time,
            attendees,
        }
    }
}

/// Display title of a meetup: the event name followed by its day, in the
/// event's own timezone.
pub fn title_for(name: &str, event_time: &DateTime<FixedOffset>) -> String {
    format!("{} - {}", name, event_time.format("%d/%m/%Y"))
}

#[cfg(any(test, feature = "proptest"))]
mod arbitrary {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    // ids are drawn from a small alphabet so that generated meetups share
    // attendees often enough to be interesting
    impl Arbitrary for Attendee {
        type Parameters = ();
        type Strategy = BoxedStrategy<Attendee>;

        fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
            "[a-l]"
                .prop_map(|id| Attendee {
                    name: format!("player-{}", id),
                    id,
                })
                .boxed()
        }
    }

    impl Arbitrary for MeetupRecord {
        type Parameters = ();
        type Strategy = BoxedStrategy<MeetupRecord>;

        fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
            (
                any::<u128>(),
                "[A-Za-z ]{1,20}",
                0..4_000_000_000i64,
                prop::collection::btree_set("[a-l]", 0..10),
            )
                .prop_map(|(id, name, timestamp, attendee_ids)| {
                    let event_time = FixedOffset::east_opt(0)
                        .unwrap()
                        .timestamp_opt(timestamp, 0)
                        .unwrap();
                    let id = uuid::Uuid::from_u128(id).to_string();
                    let attendees = attendee_ids
                        .into_iter()
                        .map(|attendee| Attendee {
                            name: format!("player-{}", attendee),
                            id: attendee,
                        })
                        .collect();
                    MeetupRecord::new(
                        id.clone(),
                        &name,
                        event_time,
                        format!("https://cmpf.re/{}", &id[..8]),
                        attendees,
                    )
                })
                .boxed()
        }
    }
}
