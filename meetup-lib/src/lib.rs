pub mod link;
pub mod lookup;
mod meetup;

pub use link::ShortLink;
pub use lookup::{CampfireClient, LookupConfig, MeetupLookup};
pub use meetup::{title_for, Attendee, AttendeeId, MeetupId, MeetupRecord};
