mod draw;
mod fetch;
mod roster;
mod source;

use color_eyre::Report;
use structopt::StructOpt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "campfire_lottery=info,meetup_lib=info";

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case", about = "Prize draws among meetup attendees")]
pub enum CampfireLottery {
    /// Resolve meetup short links and save the meetups as json
    Fetch(fetch::Fetch),
    /// Print the participants merged from the given meetups
    Roster(roster::Roster),
    /// Draw winners among the participants of the given meetups
    Draw(draw::Draw),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Session(#[from] campfire_lottery::session::Error),

    #[error(transparent)]
    Lookup(#[from] meetup_lib::lookup::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("invalid seed, expected 64 hex characters: {0}")]
    InvalidSeed(#[from] hex::FromHexError),

    #[error("no meetups given, use --link or --meetups")]
    NoMeetups,
}

impl CampfireLottery {
    pub fn exec(self) -> Result<(), Error> {
        match self {
            Self::Fetch(cmd) => cmd.exec(),
            Self::Roster(cmd) => cmd.exec(),
            Self::Draw(cmd) => cmd.exec(),
        }
    }
}

fn main() -> Result<(), Report> {
    color_eyre::install()?;
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    CampfireLottery::from_args().exec()?;
    Ok(())
}
