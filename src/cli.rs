use clap::Parser;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "nrg2iso")]
#[command(version)]
#[command(about = "Converts NERO image files (.nrg) to ISO image format (.iso)", long_about = None)]
#[command(after_help = "Examples:\n  \
  nrg2iso disc.nrg disc.iso      extract the data track of disc.nrg\n  \
  nrg2iso -l disc.nrg            list the chunks of disc.nrg\n  \
  nrg2iso -vv disc.nrg disc.iso  extract with debug logging")]
pub struct Cli {
    /// Source NRG image
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Target ISO image
    #[arg(value_name = "TARGET", required_unless_present = "list")]
    pub target: Option<String>,

    /// List chunks instead of extracting
    #[arg(short = 'l')]
    pub list: bool,

    /// Quiet mode, no completion message
    #[arg(short = 'q')]
    pub quiet: bool,

    /// Verbose logging (-vv => debug, -vvv => trace)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
