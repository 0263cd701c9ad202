//! Default machining parameters.
//!
//! Every constant here is only a default: the generators take their values from
//! [`FacetedParams`] and [`HelicalParams`], which callers are free to change.

/// Default depth of cut per roughing pass for stock rounding.
pub const DEFAULT_STEPOVER: f64 = 0.1;

/// Angular stations per roughing pass.
pub const DEFAULT_ROUGHING_STATIONS: u32 = 16;

/// Angular stations for the finishing pass. Double the roughing count gives a smoother finish.
pub const DEFAULT_FINISH_STATIONS: u32 = 32;

/// How far the tool plunges below the start of the stock before the axial cut.
pub const DEFAULT_ENGAGE_DEPTH: f64 = 0.1;

pub const DEFAULT_FACETED_SAFE_Z: f64 = 1.0;

pub const DEFAULT_FACETED_FEED: f64 = 100.0;

pub const DEFAULT_SPINDLE_RPM: u32 = 1000;

/// Spindle spin-up dwell, in seconds.
pub const DEFAULT_DWELL_SECONDS: f64 = 2.0;

/// Max radial depth per helical pass (1/4").
pub const HELICAL_MAX_DEPTH_PER_PASS: f64 = 0.25;

/// Axial advance per revolution for helical cuts (1/8").
pub const DEFAULT_PITCH: f64 = 0.125;

pub const DEFAULT_HELICAL_FEED: f64 = 40.0;

pub const DEFAULT_HELICAL_SAFE_Z: f64 = 0.5;

/// Most passes a single cut may be planned with. Anything beyond this is a mistyped depth of cut.
pub const MAX_PASSES: usize = 10_000;

/// Tolerance used when comparing accumulated depths.
pub const DEPTH_TOLERANCE: f64 = 1e-9;

/// Parameters for rounding square stock with faceted passes.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetedParams {
    /// Cutting feed rate, in units per minute
    pub feed: f64,
    /// Z height for rapid moves
    pub safe_z: f64,
    /// Plunge below the stock end before feeding along its length
    pub engage_depth: f64,
    /// Stations per roughing pass
    pub stations: u32,
    /// Stations for the finishing pass (one extra closes the circle)
    pub finish_stations: u32,
}

impl Default for FacetedParams {
    fn default() -> Self {
        Self {
            feed: DEFAULT_FACETED_FEED,
            safe_z: DEFAULT_FACETED_SAFE_Z,
            engage_depth: DEFAULT_ENGAGE_DEPTH,
            stations: DEFAULT_ROUGHING_STATIONS,
            finish_stations: DEFAULT_FINISH_STATIONS,
        }
    }
}

/// Parameters for helical (spiral) taper cuts.
#[derive(Debug, Clone, PartialEq)]
pub struct HelicalParams {
    /// Axial advance per turn of the rotary axis
    pub pitch: f64,
    /// Cutting feed rate, in units per minute
    pub feed: f64,
    pub safe_z: f64,
    pub max_depth_per_pass: f64,
    /// Use G93 inverse-time feed for the simultaneous linear and rotary move
    pub inverse_time_feed: bool,
}

impl Default for HelicalParams {
    fn default() -> Self {
        Self {
            pitch: DEFAULT_PITCH,
            feed: DEFAULT_HELICAL_FEED,
            safe_z: DEFAULT_HELICAL_SAFE_Z,
            max_depth_per_pass: HELICAL_MAX_DEPTH_PER_PASS,
            inverse_time_feed: false,
        }
    }
}
