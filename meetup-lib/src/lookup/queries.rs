use super::Error;
use crate::link::ShortLink;
use crate::meetup::{Attendee, MeetupRecord};
use chrono::DateTime;
use graphql_client::GraphQLQuery;
use std::collections::HashSet;

pub const CHECKED_IN: &str = "CHECKED_IN";

#[derive(GraphQLQuery)]
#[graphql(
    query_path = "resources/campfire/public_meetup_page.graphql",
    schema_path = "resources/campfire/schema.graphql",
    response_derives = "Debug"
)]
pub struct PublicMeetupPage;

#[derive(GraphQLQuery)]
#[graphql(
    query_path = "resources/campfire/meetup_details.graphql",
    schema_path = "resources/campfire/schema.graphql",
    response_derives = "Debug"
)]
pub struct MeetupDetails;

/// Event id behind a public meetup page, if the page points to an event.
pub fn event_id(page: public_meetup_page::ResponseData) -> Option<String> {
    page.public_map_objects_by_id
        .into_iter()
        .find_map(|object| object.event)
        .map(|event| event.id)
}

/// Builds the meetup record out of the event details, keeping only the
/// members that actually checked in.
pub fn into_record(
    event: meetup_details::MeetupDetailsEvent,
    link: &ShortLink,
) -> Result<MeetupRecord, Error> {
    let event_time =
        DateTime::parse_from_rfc3339(&event.event_time).map_err(|source| {
            Error::InvalidEventTime {
                value: event.event_time.clone(),
                source,
            }
        })?;

    let checked_in: HashSet<&str> = event
        .rsvp_statuses
        .iter()
        .filter(|status| status.rsvp_status == CHECKED_IN)
        .map(|status| status.user_id.as_str())
        .collect();

    let attendees = event
        .members
        .edges
        .iter()
        .filter(|edge| checked_in.contains(edge.node.id.as_str()))
        .map(|edge| Attendee {
            id: edge.node.id.clone(),
            name: edge.node.display_name.clone(),
        })
        .collect();

    Ok(MeetupRecord::new(
        event.id,
        &event.name,
        event_time,
        link.to_string(),
        attendees,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(json: &str) -> meetup_details::MeetupDetailsEvent {
        let response: graphql_client::Response<meetup_details::ResponseData> =
            serde_json::from_str(json).unwrap();
        response.data.unwrap().event.unwrap()
    }

    const DETAILS: &str = r#"{
        "data": {
            "event": {
                "id": "evt-1",
                "name": "Spotlight Hour",
                "eventTime": "2024-05-14T18:00:00+02:00",
                "members": {
                    "totalCount": 3,
                    "edges": [
                        { "node": { "id": "u1", "displayName": "Alice" } },
                        { "node": { "id": "u2", "displayName": "Bob" } },
                        { "node": { "id": "u3", "displayName": "Carol" } }
                    ]
                },
                "rsvpStatuses": [
                    { "userId": "u1", "rsvpStatus": "CHECKED_IN" },
                    { "userId": "u2", "rsvpStatus": "ACCEPTED" },
                    { "userId": "u3", "rsvpStatus": "CHECKED_IN" },
                    { "userId": "u9", "rsvpStatus": "CHECKED_IN" }
                ]
            }
        }
    }"#;

    #[test]
    fn keeps_checked_in_members_only() {
        let link = ShortLink::parse("https://cmpf.re/abc").unwrap();
        let record = into_record(details(DETAILS), &link).unwrap();

        assert_eq!(record.id, "evt-1");
        assert_eq!(record.title, "Spotlight Hour - 14/05/2024");
        assert_eq!(record.link, "https://cmpf.re/abc");
        assert_eq!(
            record.attendees,
            vec![
                Attendee {
                    id: "u1".to_string(),
                    name: "Alice".to_string()
                },
                Attendee {
                    id: "u3".to_string(),
                    name: "Carol".to_string()
                },
            ]
        );
    }

    #[test]
    fn rejects_bad_event_time() {
        let link = ShortLink::parse("https://cmpf.re/abc").unwrap();
        let json = DETAILS.replace("2024-05-14T18:00:00+02:00", "yesterday");
        assert!(matches!(
            into_record(details(&json), &link),
            Err(Error::InvalidEventTime { .. })
        ));
    }

    #[test]
    fn event_id_from_public_page() {
        let response: graphql_client::Response<public_meetup_page::ResponseData> =
            serde_json::from_str(
                r#"{ "data": { "publicMapObjectsById": [
                    { "id": "p0", "event": null },
                    { "id": "p1", "event": { "id": "evt-7", "name": "Raid", "eventTime": "2024-01-01T10:00:00Z" } }
                ] } }"#,
            )
            .unwrap();
        assert_eq!(event_id(response.data.unwrap()).as_deref(), Some("evt-7"));
    }

    #[test]
    fn event_id_missing() {
        let response: graphql_client::Response<public_meetup_page::ResponseData> =
            serde_json::from_str(r#"{ "data": { "publicMapObjectsById": [] } }"#).unwrap();
        assert_eq!(event_id(response.data.unwrap()), None);
    }
}
