//! Toolpath planning for a 4th (rotary) axis, and the G-code emitter for it.
//!
//! Planning ([`faceted`], [`helical`]) is pure: geometry in, [`Toolpath`] out. Writing G-code is
//! a separate step, done by the functions in this module, which only format what the planner
//! produced.
use std::io::{Result, Write};

pub mod cli;
pub mod config;
pub mod dialect;
pub mod error;
pub mod faceted;
pub mod geometry;
pub mod helical;
pub mod planner;
pub mod toolpath;

pub use cli::ProgramArgs;
pub use config::{FacetedParams, HelicalParams};
pub use dialect::{Dialect, LineEnding, NumberFormat, ProgramEnd, ProgramInfo, Units};
pub use error::{Error, Fault};
pub use faceted::{generate_faceted, plan_faceted};
pub use geometry::StockGeometry;
pub use helical::{generate_helical, plan_helical, HelicalPlan};
pub use planner::{plan, CutPlan, DepthPolicy};
pub use toolpath::{Axes, Feed, Motion, Step, Toolpath, Waypoint};

/// Writes G-code lines in a given dialect, counting them as it goes.
pub struct GcodeWriter<'a> {
    out: &'a mut dyn Write,
    dialect: &'a Dialect,
    lines: usize,
}

impl<'a> GcodeWriter<'a> {
    pub fn new(out: &'a mut dyn Write, dialect: &'a Dialect) -> Self {
        GcodeWriter {
            out,
            dialect,
            lines: 0,
        }
    }

    /// Number of lines written so far
    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn line(&mut self, s: &str) -> Result<()> {
        write!(self.out, "{s}{}", self.dialect.line_ending.as_str())?;
        self.lines += 1;
        Ok(())
    }

    pub fn blank(&mut self) -> Result<()> {
        self.line("")
    }

    pub fn comment(&mut self, s: &str) -> Result<()> {
        self.line(&format!("({})", gcode_comment_text(s)))
    }

    /// Emit one waypoint as a G0 or G1 move. Inverse-time moves are bracketed by G93/G94.
    pub fn waypoint(&mut self, w: &Waypoint) -> Result<()> {
        let mut s = String::from(if w.is_rapid() { "G0" } else { "G1" });
        self.g_val(&mut s, "X", w.axes.x);
        self.g_val(&mut s, "Y", w.axes.y);
        self.g_val(&mut s, "Z", w.axes.z);
        self.g_val(&mut s, "A", w.axes.a);
        self.g_val(&mut s, "F", w.feed().map(|f| f.value()));

        if let Some(Feed::InverseTime(_)) = w.feed() {
            self.line("G93 (Inverse time feed)")?;
            self.line(&s)?;
            self.line("G94 (Feed per minute)")
        } else {
            self.line(&s)
        }
    }

    /// Append a G-code parameter word to `s`, if `ov` is `Some`.
    fn g_val(&self, s: &mut String, name: &str, ov: Option<f64>) {
        if let Some(v) = ov {
            s.push(' ');
            s.push_str(name);
            s.push_str(&self.dialect.number_format.format(v));
        }
    }
}

/// Parentheses would end a comment early
fn gcode_comment_text(s: &str) -> String {
    s.replace('(', "[").replace(')', "]")
}

pub fn preamble(w: &mut GcodeWriter, info: &ProgramInfo) -> Result<()> {
    if w.dialect.percent_delimiters {
        w.line("%")?;
    }
    // Print out the title as a comment on the first line, if set
    if !info.title.is_empty() {
        w.comment(&info.title)?;
    }
    for note in &info.notes {
        w.comment(note)?;
    }

    // Set the machine into a reasonable mode
    w.line("G90 (Absolute)")?;
    w.line("G54 (G54 Datum)")?;
    w.line("G17 (X-Y Plane)")?;
    w.line("G94 (Feed per minute)")?;
    w.line(&format!("{} ({})", info.units.gcode(), info.units))?;

    if let Some(tool) = info.tool {
        // Choose the tool, enable length compensation, and run the tool change cycle
        w.line(&format!("T{tool} G43 H{tool} M6"))?;
    }
    if w.dialect.include_spindle_commands {
        w.line(&format!("M3 S{} (Spindle on)", info.spindle_rpm))?;
        w.line(&format!("G4 P{:.1} (Wait for spindle)", info.dwell_seconds))?;
    }
    if info.coolant {
        w.line("M8 (Coolant on)")?;
    }
    w.blank()
}

pub fn trailer(w: &mut GcodeWriter, info: &ProgramInfo) -> Result<()> {
    w.blank()?;
    if info.coolant {
        w.line("M9 (Coolant off)")?;
    }
    if w.dialect.include_spindle_commands {
        w.line("M5 (Spindle off)")?;
    }
    w.line(w.dialect.program_end.code())?;
    if w.dialect.percent_delimiters {
        w.line("%")?;
    }
    Ok(())
}

/// Emit every step of `tp`, in order. Notes become comments.
pub fn write_toolpath(w: &mut GcodeWriter, tp: &Toolpath) -> Result<()> {
    for step in tp.steps() {
        match step {
            Step::Move(m) => w.waypoint(m)?,
            Step::Note(n) => w.comment(n)?,
        }
    }
    Ok(())
}

/// Write a complete program: preamble, toolpath, trailer. Returns the number of lines written.
pub fn write_program(
    out: &mut dyn Write,
    info: &ProgramInfo,
    tp: &Toolpath,
    dialect: &Dialect,
) -> Result<usize> {
    let mut w = GcodeWriter::new(out, dialect);
    preamble(&mut w, info)?;
    write_toolpath(&mut w, tp)?;
    trailer(&mut w, info)?;
    Ok(w.lines())
}

pub fn render_program(info: &ProgramInfo, tp: &Toolpath, dialect: &Dialect) -> Result<String> {
    let mut buf = Vec::new();
    write_program(&mut buf, info, tp, dialect)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
