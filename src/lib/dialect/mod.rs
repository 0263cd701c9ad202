//! Controller dialect and program settings for the G-code emitter.
//!
//! None of this affects geometry: two programs rendered from the same toolpath in different
//! dialects move the machine identically.

use std::fmt;

use crate::config::{DEFAULT_DWELL_SECONDS, DEFAULT_SPINDLE_RPM};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgramEnd {
    /// End and rewind
    #[default]
    M30,
    M2,
}

impl ProgramEnd {
    pub fn code(&self) -> &'static str {
        match self {
            ProgramEnd::M30 => "M30",
            ProgramEnd::M2 => "M2",
        }
    }
}

/// How coordinates and feeds are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    /// Always this many decimal places
    Fixed(usize),
    /// Whole numbers in their minimal form (`12.`), everything else to 4 decimal places
    Compact,
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat::Fixed(4)
    }
}

impl NumberFormat {
    pub fn format(&self, v: f64) -> String {
        let s = match *self {
            NumberFormat::Fixed(decimals) => format!("{v:.decimals$}"),
            NumberFormat::Compact => {
                if (v - v.round()).abs() < f64::EPSILON {
                    format!("{}.", v.round())
                } else {
                    format!("{v:.4}")
                }
            }
        };
        // Don't print negative zero
        match s.strip_prefix('-') {
            Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
            _ => s,
        }
    }
}

/// Textual options of the target controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    pub line_ending: LineEnding,
    /// Emit spindle start, spin-up dwell and spindle stop
    pub include_spindle_commands: bool,
    pub program_end: ProgramEnd,
    pub number_format: NumberFormat,
    /// Wrap the program in `%` lines, as `.tap` files are
    pub percent_delimiters: bool,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            line_ending: LineEnding::Lf,
            include_spindle_commands: true,
            program_end: ProgramEnd::M30,
            number_format: NumberFormat::default(),
            percent_delimiters: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    #[default]
    Inches,
    Millimeters,
}

impl Units {
    pub fn gcode(&self) -> &'static str {
        match self {
            Units::Inches => "G20",
            Units::Millimeters => "G21",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Units::Inches => write!(f, "Inches"),
            Units::Millimeters => write!(f, "Metric"),
        }
    }
}

/// Everything about a program that isn't the toolpath itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramInfo {
    /// First comment line of the program
    pub title: String,
    /// Further header comments, e.g. the parameters used
    pub notes: Vec<String>,
    pub units: Units,
    /// Passed through to the controller untouched
    pub spindle_rpm: u32,
    pub dwell_seconds: f64,
    /// Tool to load before starting, if any
    pub tool: Option<u32>,
    pub coolant: bool,
}

impl Default for ProgramInfo {
    fn default() -> Self {
        Self {
            title: String::new(),
            notes: Vec::new(),
            units: Units::Inches,
            spindle_rpm: DEFAULT_SPINDLE_RPM,
            dwell_seconds: DEFAULT_DWELL_SECONDS,
            tool: None,
            coolant: false,
        }
    }
}
