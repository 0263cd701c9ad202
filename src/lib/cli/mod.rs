//! Command line options shared by the generator binaries: the program envelope, the controller
//! dialect, the output file and logging.

use std::fs::{File, OpenOptions};
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use crate::dialect::{Dialect, LineEnding, NumberFormat, ProgramEnd, ProgramInfo, Units};

#[derive(Debug, StructOpt)]
pub struct ProgramArgs {
    /// Spindle RPM
    #[structopt(short = "r", long)]
    pub spindle_speed: Option<u32>,

    /// Name for the job
    #[structopt(short, long)]
    pub name: Option<String>,

    /// Tool number to load before cutting
    #[structopt(long)]
    pub tool: Option<u32>,

    /// Dimensions are in mm rather than inches
    #[structopt(long)]
    pub metric: bool,

    #[structopt(long)]
    pub coolant: bool,

    /// Leave out spindle start and stop
    #[structopt(long)]
    pub no_spindle: bool,

    /// Windows line endings
    #[structopt(long)]
    pub crlf: bool,

    /// End the program with M2 instead of M30
    #[structopt(long)]
    pub m2: bool,

    /// Print whole numbers in their minimal form
    #[structopt(long)]
    pub compact: bool,

    /// Replace the output file if it exists
    #[structopt(long)]
    pub overwrite: bool,

    /// Log each pass
    #[structopt(short, long)]
    pub verbose: bool,
}

impl ProgramArgs {
    /// Log to stderr. `RUST_LOG` is honoured unless `--verbose` asks for everything.
    pub fn init_logging(&self) {
        let filter = if self.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        };
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    pub fn dialect(&self) -> Dialect {
        Dialect {
            line_ending: if self.crlf {
                LineEnding::CrLf
            } else {
                LineEnding::Lf
            },
            include_spindle_commands: !self.no_spindle,
            program_end: if self.m2 {
                ProgramEnd::M2
            } else {
                ProgramEnd::M30
            },
            number_format: if self.compact {
                NumberFormat::Compact
            } else {
                NumberFormat::default()
            },
            ..Dialect::default()
        }
    }

    /// Program header for a job, titled `default_title` unless `--name` was given
    pub fn program_info(&self, default_title: &str, notes: Vec<String>) -> ProgramInfo {
        let defaults = ProgramInfo::default();
        ProgramInfo {
            title: self
                .name
                .clone()
                .unwrap_or_else(|| default_title.to_string()),
            notes,
            units: if self.metric {
                Units::Millimeters
            } else {
                Units::Inches
            },
            spindle_rpm: self.spindle_speed.unwrap_or(defaults.spindle_rpm),
            tool: self.tool,
            coolant: self.coolant,
            ..defaults
        }
    }

    /// Open `path` for the program. An existing file is only replaced with `--overwrite`.
    pub fn open_output(&self, path: &Path) -> Result<BufWriter<File>> {
        let mut options = OpenOptions::new();
        options.write(true);
        if self.overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }
        let file = options
            .open(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        Ok(BufWriter::new(file))
    }
}
