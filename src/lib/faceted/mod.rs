//! Faceted rounding of square stock.
//!
//! Each pass turns the stock to a series of angular stations and takes one straight axial cut at
//! each, so every pass leaves a polygon. Passes work inward from the flats of the square to the
//! finished radius, then a finishing pass with denser stations cleans up the facets.
//!
//! Axes: the rotary axis is `A`, the tool's distance from the rotary axis is `X`, and the cut runs
//! along `Z`, from just past the end of the stock (`-engage_depth`) down to `-length`.

use tracing::{debug, info};

use crate::config::{FacetedParams, DEPTH_TOLERANCE};
use crate::error::{require_positive, Fault, Result};
use crate::geometry::StockGeometry;
use crate::planner::{plan, CutPlan, DepthPolicy};
use crate::toolpath::{a, xy, xz, z, Toolpath};

/// Evenly spaced station angles for a roughing pass, starting at 0 and strictly increasing.
pub fn station_angles(stations: u32) -> Vec<f64> {
    (0..stations)
        .map(|i| 360.0 * i as f64 / stations as f64)
        .collect()
}

/// Station angles for the finishing pass. One extra station at 360 degrees closes the circle, so
/// the first and last facet coincide and no witness mark is left at the seam.
pub fn finish_station_angles(stations: u32) -> Vec<f64> {
    (0..=stations)
        .map(|i| 360.0 * i as f64 / stations as f64)
        .collect()
}

/// Validate `stock` and plan the roughing passes that take it from its flats to the finished
/// radius.
pub fn plan_faceted(
    stock: &StockGeometry,
    max_depth_per_pass: f64,
    policy: DepthPolicy,
) -> Result<CutPlan> {
    stock.check_square()?;
    plan(stock.rounding_depth(), max_depth_per_pass, policy)
}

/// Cutting radius (distance from the rotary axis) at the end of each roughing pass
pub fn pass_radii(stock: &StockGeometry, plan: &CutPlan) -> Vec<f64> {
    plan.cumulative_depths()
        .iter()
        .map(|d| stock.half_width() - d)
        .collect()
}

fn check_params(stock: &StockGeometry, plan: &CutPlan, params: &FacetedParams) -> Result<()> {
    stock.check_square()?;
    require_positive("feed rate", params.feed)?;
    require_positive("engage depth", params.engage_depth)?;
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
    if params.engage_depth >= stock.length {
        return Err(Fault::EngageBeyondLength {
            engage: params.engage_depth,
            length: stock.length,
        }
        .into());
    }
    if params.stations == 0 {
        return Err(Fault::NoStations { name: "stations" }.into());
    }
    if params.finish_stations == 0 {
        return Err(Fault::NoStations {
            name: "finish stations",
        }
        .into());
    }
    if (plan.total_depth() - stock.rounding_depth()).abs() > DEPTH_TOLERANCE {
        return Err(Fault::PlanMismatch {
            expected: stock.rounding_depth(),
            actual: plan.total_depth(),
        }
        .into());
    }
    Ok(())
}

/// One facet: rotate to `angle` clear of the work, then cut the full length at `radius`.
fn cut_station(
    tp: &mut Toolpath,
    stock: &StockGeometry,
    params: &FacetedParams,
    angle: f64,
    radius: f64,
) {
    tp.rapid(z(params.safe_z));
    tp.rapid(a(angle));
    tp.rapid(xz(radius, params.safe_z));
    tp.feed(z(-params.engage_depth), params.feed);
    tp.feed(z(-stock.length), params.feed);
    tp.rapid(z(params.safe_z));
}

/// Generate the complete rounding toolpath: header move, roughing passes from the flats inward,
/// the finishing pass at the finished radius, and the move home.
///
/// All parameters are checked before the first waypoint is generated.
pub fn generate_faceted(
    stock: &StockGeometry,
    plan: &CutPlan,
    params: &FacetedParams,
) -> Result<Toolpath> {
    check_params(stock, plan, params)?;

    let mut tp = Toolpath::new();
    tp.rapid(z(params.safe_z));

    tp.note("Roughing passes");
    let angles = station_angles(params.stations);
    let passes = plan.pass_count();
    for (i, (depth, radius)) in plan
        .cumulative_depths()
        .iter()
        .zip(pass_radii(stock, plan))
        .enumerate()
    {
        debug!("Roughing pass {} of {passes}: depth {depth:.4}, radius {radius:.4}", i + 1);
        tp.note(format!("Pass {} of {passes}, depth {depth:.4}", i + 1));
        for &angle in &angles {
            cut_station(&mut tp, stock, params, angle, radius);
        }
    }

    tp.note("Finishing pass");
    let finish_radius = stock.finished_radius();
    debug!("Finishing pass: radius {finish_radius:.4}");
    for angle in finish_station_angles(params.finish_stations) {
        cut_station(&mut tp, stock, params, angle, finish_radius);
    }

    tp.note("Return home");
    tp.rapid(z(params.safe_z));
    tp.rapid(a(0.0));
    tp.rapid(xy(0.0, 0.0));

    info!(
        "Faceted toolpath: {passes} roughing passes of {} stations, {} finishing stations, {} moves",
        params.stations,
        params.finish_stations + 1,
        tp.waypoint_count()
    );
    Ok(tp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::toolpath::{Axes, Feed, Step, Waypoint};
    use pretty_assertions::assert_eq;

    fn stock() -> StockGeometry {
        StockGeometry::new(1.0, 0.75, 6.0)
    }

    fn capped(stock: &StockGeometry) -> CutPlan {
        plan_faceted(stock, 0.1, DepthPolicy::CappedIncrement).unwrap()
    }

    /// X positions of every move that sets X, in order
    fn x_moves(tp: &Toolpath) -> Vec<f64> {
        tp.waypoints().filter_map(|w| w.axes.x).collect()
    }

    fn a_moves(tp: &Toolpath) -> Vec<f64> {
        tp.waypoints().filter_map(|w| w.axes.a).collect()
    }

    #[test]
    fn test_station_angles() {
        let expected: Vec<f64> = (0..16).map(|i| i as f64 * 22.5).collect();
        assert_eq!(station_angles(16), expected);
        assert_eq!(station_angles(16)[15], 337.5);
        for w in station_angles(16).windows(2) {
            assert!(w[1] > w[0]);
        }
        assert_eq!(station_angles(1), vec![0.0]);
    }

    #[test]
    fn test_finish_angles_close_the_circle() {
        let angles = finish_station_angles(32);
        assert_eq!(angles.len(), 33);
        assert_eq!(angles[0], 0.0);
        assert_eq!(angles[1], 11.25);
        assert_eq!(angles[32], 360.0);
        assert_eq!(*finish_station_angles(7).last().unwrap(), 360.0);
    }

    #[test]
    fn test_pass_radii_converge() {
        let stock = StockGeometry::new(1.0, 0.5, 6.0);
        let plan = capped(&stock);
        let radii = pass_radii(&stock, &plan);
        assert_eq!(radii.len(), 3);
        for w in radii.windows(2) {
            assert!(w[1] < w[0], "radii must shrink pass over pass: {radii:?}");
        }
        assert_eq!(*radii.last().unwrap(), 0.25);
    }

    #[test]
    fn test_station_sequence() {
        let stock = stock();
        let plan = capped(&stock);
        let params = FacetedParams::default();
        let tp = generate_faceted(&stock, &plan, &params).unwrap();

        let w: Vec<Waypoint> = tp.waypoints().copied().collect();
        // Header, then the first station of the first pass
        let expected = vec![
            (true, z(1.0)),
            (true, z(1.0)),
            (true, a(0.0)),
            (true, xz(0.4, 1.0)),
            (false, z(-0.1)),
            (false, z(-6.0)),
            (true, z(1.0)),
        ];
        let got: Vec<(bool, Axes)> = w[..7].iter().map(|w| (w.is_rapid(), w.axes)).collect();
        assert_eq!(got, expected);
        assert_eq!(w[4].feed(), Some(Feed::PerMinute(100.0)));
        assert_eq!(w[8].axes, a(22.5));
    }

    #[test]
    fn test_pass_and_station_counts() {
        let stock = stock();
        let plan = capped(&stock);
        let tp = generate_faceted(&stock, &plan, &FacetedParams::default()).unwrap();

        // 2 roughing passes x 16 stations + 33 finishing stations, 6 moves each, plus header and footer
        assert_eq!(tp.waypoint_count(), 1 + (2 * 16 + 33) * 6 + 3);

        let xs = x_moves(&tp);
        // Footer returns X to 0
        assert_eq!(*xs.last().unwrap(), 0.0);
        let xs = &xs[..xs.len() - 1];
        assert!(xs[..16].iter().all(|&x| (x - 0.4).abs() < 1e-12));
        assert!(xs[16..].iter().all(|&x| x == 0.375));
    }

    #[test]
    fn test_finishing_pass_at_finished_radius() {
        let stock = StockGeometry::new(25.4, 19.0, 150.0);
        let plan = plan_faceted(&stock, 1.0, DepthPolicy::EqualDivision).unwrap();
        let params = FacetedParams {
            stations: 8,
            finish_stations: 16,
            ..FacetedParams::default()
        };
        let tp = generate_faceted(&stock, &plan, &params).unwrap();

        let xs = x_moves(&tp);
        let roughing = plan.pass_count() * 8;
        let finishing = &xs[roughing..xs.len() - 1];
        assert_eq!(finishing.len(), 17);
        assert!(finishing.iter().all(|&x| x == 9.5));

        let rough_radii: Vec<f64> = xs[..roughing].iter().step_by(8).copied().collect();
        for w in rough_radii.windows(2) {
            assert!(w[1] < w[0]);
        }
    }

    #[test]
    fn test_angles_within_passes() {
        let stock = stock();
        let plan = capped(&stock);
        let params = FacetedParams {
            stations: 4,
            finish_stations: 8,
            ..FacetedParams::default()
        };
        let tp = generate_faceted(&stock, &plan, &params).unwrap();
        let angles = a_moves(&tp);
        let mut expected = vec![0.0, 90.0, 180.0, 270.0, 0.0, 90.0, 180.0, 270.0];
        expected.extend(finish_station_angles(8));
        expected.push(0.0);
        assert_eq!(angles, expected);
    }

    #[test]
    fn test_notes() {
        let stock = stock();
        let tp = generate_faceted(&stock, &capped(&stock), &FacetedParams::default()).unwrap();
        let notes: Vec<&str> = tp
            .steps()
            .iter()
            .filter_map(|s| match s {
                Step::Note(n) => Some(n.as_str()),
                Step::Move(_) => None,
            })
            .collect();
        assert_eq!(
            notes,
            vec![
                "Roughing passes",
                "Pass 1 of 2, depth 0.1000",
                "Pass 2 of 2, depth 0.1250",
                "Finishing pass",
                "Return home"
            ]
        );
    }

    #[test]
    fn test_rapids_stay_clear() {
        let stock = stock();
        let tp = generate_faceted(&stock, &capped(&stock), &FacetedParams::default()).unwrap();
        for w in tp.waypoints().filter(|w| w.is_rapid()) {
            if let Some(z) = w.axes.z {
                assert!(z > 0.0, "Rapid move at negative z");
            }
        }
    }

    #[test]
    fn test_rejects_before_generating() {
        let good = stock();
        let plan = capped(&good);
        let params = FacetedParams::default();

        let too_big = StockGeometry::new(1.0, 1.0, 6.0);
        assert!(plan_faceted(&too_big, 0.1, DepthPolicy::CappedIncrement).is_err());
        assert!(matches!(
            generate_faceted(&too_big, &plan, &params),
            Err(Error::InvalidGeometry(Fault::NotSmallerThanStock { .. }))
        ));

        let other = StockGeometry::new(1.0, 0.5, 6.0);
        assert!(matches!(
            generate_faceted(&other, &plan, &params),
            Err(Error::InvalidGeometry(Fault::PlanMismatch { .. }))
        ));

        let no_stations = FacetedParams {
            stations: 0,
            ..FacetedParams::default()
        };
        assert_eq!(
            generate_faceted(&good, &plan, &no_stations),
            Err(Error::InvalidGeometry(Fault::NoStations { name: "stations" }))
        );

        let low_clearance = FacetedParams {
            safe_z: 0.0,
            ..FacetedParams::default()
        };
        assert!(generate_faceted(&good, &plan, &low_clearance).is_err());

        let short = StockGeometry::new(1.0, 0.75, 0.05);
        let short_plan = capped(&short);
        assert!(matches!(
            generate_faceted(&short, &short_plan, &params),
            Err(Error::InvalidGeometry(Fault::EngageBeyondLength { .. }))
        ));
    }

    #[test]
    fn test_idempotent() {
        let stock = stock();
        let plan = capped(&stock);
        let params = FacetedParams::default();
        assert_eq!(
            generate_faceted(&stock, &plan, &params).unwrap(),
            generate_faceted(&stock, &plan, &params).unwrap()
        );
    }
}
