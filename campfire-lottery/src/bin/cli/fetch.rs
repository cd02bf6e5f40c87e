use super::source::MeetupSource;
use super::Error;
use campfire_lottery::Session;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct Fetch {
    #[structopt(flatten)]
    source: MeetupSource,

    /// Output file, stdout when missing
    #[structopt(long, short)]
    output: Option<PathBuf>,
}

impl Fetch {
    pub fn exec(self) -> Result<(), Error> {
        let Fetch { source, output } = self;
        let mut session = Session::default();
        source.load(&mut session)?;

        let mut writer: Box<dyn Write> = match output {
            Some(path) => Box::new(BufWriter::new(File::create(path)?)),
            None => Box::new(io::stdout()),
        };
        serde_json::to_writer_pretty(&mut writer, session.meetups())?;
        writeln!(writer)?;
        Ok(())
    }
}
