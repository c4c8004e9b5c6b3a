use clap::Parser;
use tracing::level_filters::LevelFilter;

use crate::tar::CorruptionPolicy;

#[derive(Parser, Debug)]
#[command(name = "tarpick")]
#[command(version)]
#[command(about = "Extract the largest regular file from a tar archive", long_about = None)]
#[command(after_help = "Examples:\n  \
  tarpick backup.tar data.zip      extract the largest file in backup.tar to data.zip\n  \
  tarpick -v backup.tar            list entries with offsets and sizes\n  \
  cat backup.tar | tarpick -p - | head   stream the largest file to stdout")]
pub struct Cli {
    /// Tar archive path, or - to read it from stdin
    #[arg(value_name = "ARCHIVE")]
    pub archive: String,

    /// Destination file for the extracted bytes
    #[arg(
        value_name = "OUTPUT",
        required_unless_present_any = ["list", "verbose", "pipe"]
    )]
    pub output: Option<String>,

    /// List entries (short format)
    #[arg(short = 'l')]
    pub list: bool,

    /// List entries verbosely
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Extract to stdout
    #[arg(short = 'p')]
    pub pipe: bool,

    /// Never overwrite an existing OUTPUT
    #[arg(short = 'n')]
    pub never_overwrite: bool,

    /// Refuse to extract from a corrupt archive
    #[arg(long)]
    pub strict: bool,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_stdin(&self) -> bool {
        self.archive == "-"
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet > 0
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }

    /// Default log level when `RUST_LOG` is not set.
    pub fn log_level(&self) -> LevelFilter {
        if self.is_very_quiet() {
            LevelFilter::ERROR
        } else if self.is_quiet() {
            LevelFilter::WARN
        } else {
            LevelFilter::INFO
        }
    }

    pub fn corruption_policy(&self) -> CorruptionPolicy {
        if self.strict {
            CorruptionPolicy::Abort
        } else {
            CorruptionPolicy::KeepPartial
        }
    }
}
