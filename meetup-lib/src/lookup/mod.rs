mod config;
mod page;
pub mod queries;

use crate::link::{self, ShortLink};
use crate::meetup::MeetupRecord;
use graphql_client::GraphQLQuery;
use queries::{meetup_details, public_meetup_page, MeetupDetails, PublicMeetupPage};
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use tracing::{debug, warn};

pub use config::{LookupConfig, DEFAULT_GRAPHQL_URL, DEFAULT_SHORTLINK_BASE};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Link(#[from] link::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Pattern(#[from] regex::Error),

    #[error("no meetup found behind short link {0}")]
    MeetupIdNotFound(String),

    #[error("no event found for id {0}")]
    EventNotFound(String),

    #[error("graphql request failed: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error("graphql response carries no data")]
    MissingData,

    #[error("invalid event time {value}")]
    InvalidEventTime {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Resolves a short link into a meetup and its checked-in attendees.
pub trait MeetupLookup {
    fn resolve(&self, link: &ShortLink) -> Result<MeetupRecord, Error>;
}

pub struct CampfireClient {
    http: Client,
    config: LookupConfig,
    public_meetup_pattern: Regex,
}

impl CampfireClient {
    pub fn new(config: LookupConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            config,
            public_meetup_pattern: page::public_meetup_pattern()?,
        })
    }

    fn public_meetup_id(&self, link: &ShortLink) -> Result<String, Error> {
        let url = link.with_base(&self.config.shortlink_base)?;
        debug!(%url, "fetching short link page");
        let html = self.http.get(url).send()?.error_for_status()?.text()?;
        page::public_meetup_id(&self.public_meetup_pattern, &html)
            .ok_or_else(|| Error::MeetupIdNotFound(link.to_string()))
    }

    fn query<Q: GraphQLQuery>(&self, variables: Q::Variables) -> Result<Q::ResponseData, Error> {
        let body = Q::build_query(variables);
        debug!(operation = body.operation_name, "graphql request");
        let response: graphql_client::Response<Q::ResponseData> = self
            .http
            .post(&self.config.graphql_url)
            .header(ACCEPT, "application/json, text/plain, */*")
            .header(ACCEPT_LANGUAGE, &self.config.accept_language)
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;

        match response.errors {
            Some(errors) if !errors.is_empty() => Err(Error::GraphQl(
                errors.into_iter().map(|e| e.message).collect(),
            )),
            _ => response.data.ok_or(Error::MissingData),
        }
    }

    fn fetch(&self, link: &ShortLink) -> Result<MeetupRecord, Error> {
        let public_id = self.public_meetup_id(link)?;

        let page = self.query::<PublicMeetupPage>(public_meetup_page::Variables {
            ids: vec![public_id.clone()],
        })?;
        let event_id = queries::event_id(page).ok_or(Error::EventNotFound(public_id))?;

        let details = self.query::<MeetupDetails>(meetup_details::Variables {
            id: event_id.clone(),
            page_size: self.config.members_page_size,
        })?;
        let event = details.event.ok_or(Error::EventNotFound(event_id))?;

        queries::into_record(event, link)
    }
}

impl MeetupLookup for CampfireClient {
    fn resolve(&self, link: &ShortLink) -> Result<MeetupRecord, Error> {
        self.fetch(link).map_err(|e| {
            warn!(%link, error = %e, "unable to fetch meetup");
            e
        })
    }
}
