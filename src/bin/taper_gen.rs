///! G-Code generator for tapered cylinders on a rotary (4th) axis
///! Each pass is one continuous spiral: Y advances along the work while A turns at the rate the
///! pitch calls for, with a cleanup circle at either end.
use anyhow::Result;
use rotary::{
    generate_helical, plan_helical, write_program, HelicalParams, ProgramArgs, StockGeometry,
};
use std::io::Write;
use std::path::PathBuf;
use structopt::StructOpt;
use tracing::info;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "taper_gen",
    about = "Generates a continuous spiral cut for tapered cylinders on a 4th axis"
)]
struct Opt {
    /// Starting diameter
    start_diameter: f64,

    /// Ending diameter
    end_diameter: f64,

    /// Length of the cylinder
    length: f64,

    /// Axial advance per turn of the rotary axis
    pitch: Option<f64>,

    /// Feed rate, in units per minute
    feed_rate: Option<f64>,

    /// Max radial depth of cut per pass
    #[structopt(long)]
    max_depth: Option<f64>,

    /// Safe Z height for rapid moves
    #[structopt(long)]
    safe_z: Option<f64>,

    /// Feed the spiral in inverse time mode (G93), so the surface feed is right
    #[structopt(long)]
    inverse_time: bool,

    /// Output file for the resulting G code [default: taper_<start>to<end>_<length>L.tap]
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    #[structopt(flatten)]
    program: ProgramArgs,
}

impl Opt {
    /// Cutting parameters, with anything not given on the command line left at its default
    fn params(&self) -> HelicalParams {
        let defaults = HelicalParams::default();
        HelicalParams {
            pitch: self.pitch.unwrap_or(defaults.pitch),
            feed: self.feed_rate.unwrap_or(defaults.feed),
            safe_z: self.safe_z.unwrap_or(defaults.safe_z),
            max_depth_per_pass: self.max_depth.unwrap_or(defaults.max_depth_per_pass),
            inverse_time_feed: self.inverse_time,
        }
    }
}

fn default_output(opt: &Opt) -> PathBuf {
    PathBuf::from(format!(
        "taper_{:?}to{:?}_{:?}L.tap",
        opt.start_diameter, opt.end_diameter, opt.length
    ))
}

fn notes(opt: &Opt, params: &HelicalParams, passes: usize) -> Vec<String> {
    vec![
        format!("Start Diameter: {}", opt.start_diameter),
        format!("End Diameter: {}", opt.end_diameter),
        format!("Length: {}", opt.length),
        format!("Pitch: {} per turn", params.pitch),
        format!("Feed Rate: {}", params.feed),
        format!("Passes: {passes}"),
    ]
}

fn help_text(opt: &Opt) {
    println!(
        "Before cut:
        - Create stock with OD {}
        - Set Y0 at the start of the taper, Z0 on top of the stock, A0 anywhere",
        opt.start_diameter.max(opt.end_diameter)
    )
}

fn main() -> Result<()> {
    let opt = Opt::from_args();
    opt.program.init_logging();

    let stock = StockGeometry::new(opt.start_diameter, opt.end_diameter, opt.length);
    let params = opt.params();
    let plan = plan_helical(&stock, &params)?;
    let toolpath = generate_helical(&stock, &params)?;

    help_text(&opt);
    info!("Total radial depth: {:.4}", plan.total_radial_depth());
    info!("Number of passes: {}", plan.pass_count());
    info!("Depth per pass: {:.4}", plan.depth_per_pass());
    info!("Number of turns: {:.2}", plan.turns);

    let output = opt.output.clone().unwrap_or_else(|| default_output(&opt));
    let mut file = opt.program.open_output(&output)?;
    let info = opt.program.program_info(
        "Tapered Cylinder G-code",
        notes(&opt, &params, plan.pass_count()),
    );
    let lines = write_program(&mut file, &info, &toolpath, &opt.program.dialect())?;
    file.flush()?;

    info!("G-code generated successfully: {}", output.display());
    info!("Total lines: {lines}");
    Ok(())
}
