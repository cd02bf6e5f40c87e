use super::source::MeetupSource;
use super::Error;
use campfire_lottery::Session;
use structopt::StructOpt;
use tracing::warn;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct Roster {
    #[structopt(flatten)]
    source: MeetupSource,

    /// Attendee id to mark inactive. Can be repeated.
    #[structopt(long)]
    exclude: Vec<String>,
}

impl Roster {
    pub fn exec(self) -> Result<(), Error> {
        let Roster { source, exclude } = self;
        let mut session = Session::default();
        source.load(&mut session)?;
        super::draw::exclude_participants(&mut session, &exclude);

        for meetup in session.meetups() {
            println!("{} ({} participants)", meetup.title, meetup.attendees.len());
        }
        println!();
        for participant in session.participants() {
            println!(
                "{} {:<32} {:>3}  {}",
                if participant.active { "+" } else { "-" },
                participant.name,
                participant.meetup_count,
                participant.id
            );
        }
        let stats = session.statistics();
        println!();
        println!(
            "players: {}/{} active, participations: {}/{} active",
            stats.players.active,
            stats.players.total,
            stats.participations.active,
            stats.participations.total
        );
        if stats.players.total == 0 {
            warn!("none of the meetups has checked-in participants");
        }
        Ok(())
    }
}
