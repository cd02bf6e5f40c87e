use super::Error;
use campfire_lottery::registry;
use campfire_lottery::session::{self, Session};
use meetup_lib::{CampfireClient, LookupConfig, MeetupRecord};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use structopt::StructOpt;
use tracing::warn;

/// Where the meetups of a session come from.
#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct MeetupSource {
    /// Meetup short link (https://cmpf.re/...). Can be repeated.
    #[structopt(long = "link")]
    links: Vec<String>,

    /// Json file of meetups, as written by `fetch`
    #[structopt(long)]
    meetups: Option<PathBuf>,

    #[structopt(flatten)]
    lookup: LookupArgs,
}

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct LookupArgs {
    /// Json file with the lookup configuration; flags below take precedence
    #[structopt(long)]
    lookup_config: Option<PathBuf>,

    /// Base short links are fetched from, e.g. a local proxy
    #[structopt(long, env = "CAMPFIRE_SHORTLINK_BASE")]
    shortlink_base: Option<String>,

    /// GraphQL endpoint of the meetup service
    #[structopt(long, env = "CAMPFIRE_GRAPHQL_URL")]
    graphql_url: Option<String>,
}

impl LookupArgs {
    fn config(&self) -> Result<LookupConfig, Error> {
        let mut config = match &self.lookup_config {
            Some(path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
            None => LookupConfig::default(),
        };
        if let Some(base) = &self.shortlink_base {
            config.shortlink_base = base.clone();
        }
        if let Some(url) = &self.graphql_url {
            config.graphql_url = url.clone();
        }
        Ok(config)
    }
}

impl MeetupSource {
    /// Registers every meetup into `session`. Meetups given twice are
    /// reported and skipped.
    pub fn load(&self, session: &mut Session) -> Result<(), Error> {
        if self.links.is_empty() && self.meetups.is_none() {
            return Err(Error::NoMeetups);
        }

        if let Some(path) = &self.meetups {
            let records: Vec<MeetupRecord> =
                serde_json::from_reader(BufReader::new(File::open(path)?))?;
            for record in records {
                skip_duplicate(session.add_meetup(record).map(|_| ()))?;
            }
        }

        if !self.links.is_empty() {
            let client = CampfireClient::new(self.lookup.config()?)?;
            for link in &self.links {
                skip_duplicate(session.add_from_link(&client, link).map(|_| ()))?;
            }
        }
        Ok(())
    }
}

fn skip_duplicate(added: Result<(), session::Error>) -> Result<(), Error> {
    match added {
        Err(session::Error::Registry(registry::Error::DuplicateMeetup(id))) => {
            warn!(%id, "this meetup has already been added");
            Ok(())
        }
        other => Ok(other?),
    }
}
