use super::source::MeetupSource;
use super::Error;
use campfire_lottery::draw::{
    DrawResult, NoPacing, Pacer, ParticipationMode, Seed, Slot, ThreadPacer,
};
use campfire_lottery::session::{self, Session};
use serde::Serialize;
use std::path::PathBuf;
use structopt::StructOpt;
use tracing::warn;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct Draw {
    #[structopt(flatten)]
    source: MeetupSource,

    /// Number of winners to draw
    #[structopt(long, short, default_value = "1")]
    count: usize,

    /// `unique`: one ticket per participant, `per-meetup`: one ticket per
    /// meetup attended (needs at least 2 meetups)
    #[structopt(long, default_value = "unique")]
    mode: ParticipationMode,

    /// Attendee id to leave out of the draw. Can be repeated.
    #[structopt(long)]
    exclude: Vec<String>,

    /// Hex encoded 32 bytes seed, to replay a previous draw
    #[structopt(long)]
    seed: Option<String>,

    /// Reveal all winners at once
    #[structopt(long)]
    no_delay: bool,

    /// Write the final result as csv
    #[structopt(long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct ResultRow<'a> {
    position: usize,
    outcome: &'a str,
    winner: bool,
}

pub(super) fn exclude_participants(session: &mut Session, ids: &[String]) {
    for id in ids {
        if session.toggle_participant(id).is_none() {
            warn!(%id, "no participant with this id");
        }
    }
}

fn parse_seed(seed: Option<&str>) -> Result<Seed, Error> {
    match seed {
        Some(hex_seed) => {
            let mut seed = Seed::default();
            hex::decode_to_slice(hex_seed.trim_start_matches("0x"), &mut seed)?;
            Ok(seed)
        }
        None => Ok(rand::random()),
    }
}

fn announce(previous: Option<&DrawResult>, current: &DrawResult) {
    if previous.is_none() && current.pending() == current.len() {
        println!("Drawing {} winner(s)...", current.len());
        return;
    }
    for (position, slot) in current.slots().iter().enumerate() {
        let changed = previous
            .and_then(|previous| previous.slots().get(position))
            .map_or(true, |before| before != slot);
        if changed && *slot != Slot::Pending {
            println!("{:>3}. {}", position + 1, slot);
        }
    }
}

fn write_result(path: PathBuf, result: &DrawResult) -> Result<(), Error> {
    let mut writer = csv::Writer::from_path(path)?;
    for (position, slot) in result.slots().iter().enumerate() {
        let outcome = slot.to_string();
        writer.serialize(ResultRow {
            position: position + 1,
            outcome: &outcome,
            winner: slot.winner().is_some(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

impl Draw {
    pub fn exec(self) -> Result<(), Error> {
        let Draw {
            source,
            count,
            mode,
            exclude,
            seed,
            no_delay,
            output,
        } = self;

        let mut session = Session::default();
        source.load(&mut session)?;
        exclude_participants(&mut session, &exclude);
        match session.set_mode(mode) {
            Err(session::Error::PerMeetupUnavailable) => {
                warn!("per-meetup participation needs at least 2 meetups, drawing in unique mode")
            }
            other => other?,
        }
        if session.max_draw_count() > 0 {
            session.set_draw_count(count)?;
        }

        let seed = parse_seed(seed.as_deref())?;
        let mut pacer: Box<dyn Pacer> = if no_delay {
            Box::new(NoPacing)
        } else {
            Box::new(ThreadPacer)
        };

        session.start_draw(seed)?;
        let mut previous: Option<DrawResult> = None;
        while let Some(reveal) = session.next_reveal() {
            pacer.wait(reveal.delay);
            announce(previous.as_ref(), &reveal.result);
            previous = Some(reveal.result);
        }
        println!("seed: {}", hex::encode(seed));

        if let (Some(path), Some(result)) = (output, session.result()) {
            write_result(path, result)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_roundtrips_through_hex() {
        let seed: Seed = [0xab; 32];
        assert_eq!(parse_seed(Some(&hex::encode(seed))).unwrap(), seed);
        assert_eq!(
            parse_seed(Some(&format!("0x{}", hex::encode(seed)))).unwrap(),
            seed
        );
    }

    #[test]
    fn short_seed_is_rejected() {
        assert!(matches!(
            parse_seed(Some("abcd")),
            Err(Error::InvalidSeed(_))
        ));
    }
}
