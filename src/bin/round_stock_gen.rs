///! G-Code generator for rounding square stock on a rotary (4th) axis
///! Takes faceted roughing passes from the flats of the stock in towards the finished diameter, at
///! a set of angular stations per pass, then a finishing pass with twice as many stations.
use anyhow::Result;
use rotary::config::DEFAULT_STEPOVER;
use rotary::{
    generate_faceted, plan_faceted, write_program, DepthPolicy, FacetedParams, ProgramArgs,
    StockGeometry,
};
use std::io::Write;
use std::path::PathBuf;
use structopt::StructOpt;
use tracing::info;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "round_stock_gen",
    about = "Generates tool paths to round square stock on a 4th axis"
)]
struct Opt {
    /// Side dimension of the square stock
    #[structopt(short, long)]
    stock_size: f64,

    /// Target diameter of the round stock
    #[structopt(short, long)]
    diameter: f64,

    /// Length of stock to round
    #[structopt(short, long)]
    length: f64,

    /// Cutting feed rate, in units per minute
    #[structopt(short, long)]
    feedrate: Option<f64>,

    /// Max depth of cut per roughing pass
    #[structopt(long)]
    stepover: Option<f64>,

    /// How depth is shared between roughing passes: 'capped' takes full-depth passes and a
    /// shallower last one, 'equal' makes every pass the same depth
    #[structopt(long, default_value = "capped")]
    policy: DepthPolicy,

    /// Safe Z height for rapid moves
    #[structopt(long)]
    safe_z: Option<f64>,

    /// How far to plunge past the end of the stock before cutting along it
    #[structopt(long)]
    engage_depth: Option<f64>,

    /// Angular stations per roughing pass
    #[structopt(long)]
    stations: Option<u32>,

    /// Angular stations for the finishing pass
    #[structopt(long)]
    finish_stations: Option<u32>,

    /// Output file for the resulting G code. `.tap` is appended if missing
    #[structopt(short, long, parse(from_os_str), default_value = "round_stock.tap")]
    output: PathBuf,

    #[structopt(flatten)]
    program: ProgramArgs,
}

impl Opt {
    fn stepover(&self) -> f64 {
        self.stepover.unwrap_or(DEFAULT_STEPOVER)
    }

    /// Cutting parameters, with anything not given on the command line left at its default
    fn params(&self) -> FacetedParams {
        let defaults = FacetedParams::default();
        FacetedParams {
            feed: self.feedrate.unwrap_or(defaults.feed),
            safe_z: self.safe_z.unwrap_or(defaults.safe_z),
            engage_depth: self.engage_depth.unwrap_or(defaults.engage_depth),
            stations: self.stations.unwrap_or(defaults.stations),
            finish_stations: self.finish_stations.unwrap_or(defaults.finish_stations),
        }
    }
}

fn with_tap_extension(path: PathBuf) -> PathBuf {
    if path.extension().map_or(false, |e| e == "tap") {
        path
    } else {
        let mut s = path.into_os_string();
        s.push(".tap");
        s.into()
    }
}

fn notes(opt: &Opt) -> Vec<String> {
    vec![
        format!("Square Stock: {}", opt.stock_size),
        format!("Finished Diameter: {}", opt.diameter),
        format!("Length: {}", opt.length),
    ]
}

fn help_text(opt: &Opt) {
    println!(
        "Before cut:
        - Mount {} square stock on the rotary axis, at least {} long
        - Set X0 on the rotary axis centerline, Z0 at the end of the stock
        - Set A0 with a flat of the stock square to the tool",
        opt.stock_size, opt.length
    )
}

fn main() -> Result<()> {
    let opt = Opt::from_args();
    opt.program.init_logging();

    let stock = StockGeometry::new(opt.stock_size, opt.diameter, opt.length);
    let plan = plan_faceted(&stock, opt.stepover(), opt.policy)?;
    let toolpath = generate_faceted(&stock, &plan, &opt.params())?;

    help_text(&opt);
    info!("Square stock size: {}", opt.stock_size);
    info!("Finished diameter: {}", opt.diameter);
    info!("Length: {}", opt.length);
    info!("Material to remove: {:.4}", stock.rounding_depth());
    info!(
        "Roughing passes: {} ({:?})",
        plan.pass_count(),
        plan.policy()
    );

    let output = with_tap_extension(opt.output.clone());
    let mut file = opt.program.open_output(&output)?;
    let info = opt
        .program
        .program_info("CNC Round Stock Generator", notes(&opt));
    let lines = write_program(&mut file, &info, &toolpath, &opt.program.dialect())?;
    file.flush()?;

    info!("G-code saved to: {}", output.display());
    info!("Total lines: {lines}");
    Ok(())
}
