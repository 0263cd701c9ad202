//! Continuous helical (spiral) cuts for tapering.
//!
//! Each pass is a single coordinated move: `Y` travels the length of the work while `A` turns
//! through `length / pitch` revolutions, with the tool held at the pass depth on `Z`. Both axes
//! start and stop together, which is what gives the spiral its constant pitch. A full turn in
//! place before and after the spiral cleans up the step the helix would otherwise leave at each
//! end.

use tracing::{debug, info};

use crate::config::HelicalParams;
use crate::error::{require_positive, Fault, Result};
use crate::geometry::{helix_path_length, StockGeometry};
use crate::planner::{plan, CutPlan, DepthPolicy};
use crate::toolpath::{a, ya, z, Toolpath};

/// Pass plan for a helical taper cut.
#[derive(Debug, Clone, PartialEq)]
pub struct HelicalPlan {
    /// Always equal division: one continuous helix can't change its depth part way along.
    pub cut: CutPlan,
    /// Revolutions of the rotary axis over the length of the work. Not an integer in general.
    pub turns: f64,
    /// Rotation of the helical move itself, in degrees
    pub total_rotation: f64,
}

impl HelicalPlan {
    pub fn total_radial_depth(&self) -> f64 {
        self.cut.total_depth()
    }

    pub fn pass_count(&self) -> usize {
        self.cut.pass_count()
    }

    pub fn depth_per_pass(&self) -> f64 {
        self.cut.depth_per_pass()
    }

    /// Z of each pass, in order. Depth grows pass over pass and is negative (into the work).
    pub fn pass_depths(&self) -> Vec<f64> {
        self.cut.cumulative_depths().iter().map(|d| -d).collect()
    }
}

/// Diameter the tool cuts at `depth` below Z0. Z0 is the top of stock turned to the larger of
/// the two taper diameters.
pub fn cutting_diameter(stock: &StockGeometry, depth: f64) -> f64 {
    stock.raw_size.max(stock.target_size) - 2.0 * depth
}

/// Inverse-time feed for one helical pass, so that the tool moves over the surface it is
/// cutting at `params.feed`
fn inverse_time_feed(
    stock: &StockGeometry,
    plan: &HelicalPlan,
    params: &HelicalParams,
    depth: f64,
) -> f64 {
    let diameter = cutting_diameter(stock, depth);
    params.feed / helix_path_length(stock.length, plan.turns, diameter)
}

fn check_params(stock: &StockGeometry, params: &HelicalParams) -> Result<()> {
    stock.check_taper()?;
    require_positive("pitch", params.pitch)?;
    require_positive("max depth per pass", params.max_depth_per_pass)?;
    require_positive("feed rate", params.feed)?;
    if params.safe_z.is_infinite() {
        return Err(Fault::NotFinite {
            name: "safe Z",
            value: params.safe_z,
        }
        .into());
    }
    if !(params.safe_z > 0.0) {
        return Err(Fault::ClearanceNotAboveStock {
            safe_z: params.safe_z,
        }
        .into());
    }
    Ok(())
}

/// Work out the passes, turns and rotation for a taper from `stock.raw_size` to
/// `stock.target_size` diameter.
pub fn plan_helical(stock: &StockGeometry, params: &HelicalParams) -> Result<HelicalPlan> {
    check_params(stock, params)?;

    let cut = plan(
        stock.taper_depth(),
        params.max_depth_per_pass,
        DepthPolicy::EqualDivision,
    )?;
    let turns = stock.length / params.pitch;
    if !turns.is_finite() {
        return Err(Fault::NotFinite {
            name: "turns",
            value: turns,
        }
        .into());
    }
    Ok(HelicalPlan {
        cut,
        turns,
        total_rotation: turns * 360.0,
    })
}

/// Generate the taper toolpath: one continuous helical pass per planned depth, each wrapped in
/// cleanup circles, then retract and return to the start.
pub fn generate_helical(stock: &StockGeometry, params: &HelicalParams) -> Result<Toolpath> {
    let plan = plan_helical(stock, params)?;

    let start_a = 360.0;
    let helix_end_a = start_a + plan.total_rotation;
    let end_a = helix_end_a + 360.0;

    let mut tp = Toolpath::new();
    tp.rapid(z(params.safe_z));
    tp.rapid(ya(0.0, 0.0));

    let passes = plan.pass_count();
    for (i, z_depth) in plan.pass_depths().into_iter().enumerate() {
        let depth = -z_depth;
        debug!(
            "Helical pass {} of {passes}: Z {z_depth:.4}, diameter {:.4}",
            i + 1,
            cutting_diameter(stock, depth)
        );
        tp.note(format!("Pass {} of {passes}", i + 1));

        tp.rapid(ya(0.0, 0.0));
        tp.note("Engage at depth");
        tp.feed(z(z_depth), params.feed);
        tp.note("Cleanup circle at start");
        tp.feed(a(start_a), params.feed);
        tp.note("Helical cut");
        if params.inverse_time_feed {
            let f = inverse_time_feed(stock, &plan, params, depth);
            tp.inverse_time(ya(stock.length, helix_end_a), f);
        } else {
            tp.feed(ya(stock.length, helix_end_a), params.feed);
        }
        tp.note("Cleanup circle at end");
        tp.feed(a(end_a), params.feed);
        tp.note("Retract");
        tp.rapid(z(params.safe_z));
    }

    tp.note("Cleanup");
    tp.rapid(z(params.safe_z));
    tp.rapid(ya(0.0, 0.0));

    info!(
        "Helical toolpath: {passes} passes of {:.4}, {:.2} turns, {} moves",
        plan.depth_per_pass(),
        plan.turns,
        tp.waypoint_count()
    );
    Ok(tp)
}
