//! Pass planning: how many passes a cut needs and how deep each one goes.

use crate::config::MAX_PASSES;
use crate::error::{require_positive, Fault, Result};

/// How the total depth is shared out between passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthPolicy {
    /// Every pass removes the same amount, so the last pass is never a thin skim.
    EqualDivision,
    /// Every pass removes the maximum allowed depth, except possibly the last.
    CappedIncrement,
}

impl std::str::FromStr for DepthPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "equal" | "equal-division" => Ok(DepthPolicy::EqualDivision),
            "capped" | "capped-increment" => Ok(DepthPolicy::CappedIncrement),
            other => Err(format!(
                "unknown depth policy '{other}', expected 'equal' or 'capped'"
            )),
        }
    }
}

/// The depth reached after each pass of a cut.
#[derive(Debug, Clone, PartialEq)]
pub struct CutPlan {
    policy: DepthPolicy,
    total_depth: f64,
    max_depth_per_pass: f64,
    /// Cumulative depth after each pass. The last entry is exactly `total_depth`.
    depths: Vec<f64>,
}

impl CutPlan {
    pub fn policy(&self) -> DepthPolicy {
        self.policy
    }

    pub fn total_depth(&self) -> f64 {
        self.total_depth
    }

    pub fn max_depth_per_pass(&self) -> f64 {
        self.max_depth_per_pass
    }

    pub fn pass_count(&self) -> usize {
        self.depths.len()
    }

    /// Cumulative depth at the end of each pass, shallowest first
    pub fn cumulative_depths(&self) -> &[f64] {
        &self.depths
    }

    /// Material removed by each pass on its own
    pub fn increments(&self) -> Vec<f64> {
        let mut prev = 0.0;
        self.depths
            .iter()
            .map(|&d| {
                let inc = d - prev;
                prev = d;
                inc
            })
            .collect()
    }

    /// Depth of the first (and, for equal division, every) pass
    pub fn depth_per_pass(&self) -> f64 {
        self.depths.first().copied().unwrap_or(0.0)
    }
}

/// Plan the passes needed to remove `total_depth` without exceeding `max_depth_per_pass` in
/// any one of them.
///
/// The pass count is `ceil(total_depth / max_depth_per_pass)`, never less than one, so a cut
/// with no depth still gets a single pass. Plans needing more than [`MAX_PASSES`] are refused.
pub fn plan(total_depth: f64, max_depth_per_pass: f64, policy: DepthPolicy) -> Result<CutPlan> {
    if total_depth < 0.0 || total_depth.is_nan() {
        return Err(Fault::NegativeDepth { value: total_depth }.into());
    }
    if total_depth.is_infinite() {
        return Err(Fault::NotFinite {
            name: "total depth",
            value: total_depth,
        }
        .into());
    }
    require_positive("max depth per pass", max_depth_per_pass)?;

    let needed = (total_depth / max_depth_per_pass).ceil();
    if needed > MAX_PASSES as f64 {
        return Err(Fault::TooManyPasses {
            passes: needed,
            limit: MAX_PASSES,
        }
        .into());
    }
    let passes = (needed as usize).max(1);

    let mut depths: Vec<f64> = match policy {
        DepthPolicy::EqualDivision => {
            let step = total_depth / passes as f64;
            (1..=passes).map(|i| step * i as f64).collect()
        }
        DepthPolicy::CappedIncrement => (1..=passes)
            .map(|i| (max_depth_per_pass * i as f64).min(total_depth))
            .collect(),
    };
    // Land exactly on the target, whatever rounding did along the way
    if let Some(last) = depths.last_mut() {
        *last = total_depth;
    }

    Ok(CutPlan {
        policy,
        total_depth,
        max_depth_per_pass,
        depths,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;

    const EPSILON: f64 = 1e-9;

    fn check_invariants(p: &CutPlan) {
        let expected_passes = ((p.total_depth() / p.max_depth_per_pass()).ceil() as usize).max(1);
        assert_eq!(p.pass_count(), expected_passes);
        let sum: f64 = p.increments().iter().sum();
        assert!((sum - p.total_depth()).abs() < EPSILON);
        assert_eq!(
            *p.cumulative_depths().last().unwrap(),
            p.total_depth(),
            "final pass must land on the total depth"
        );
        for w in p.cumulative_depths().windows(2) {
            assert!(w[1] >= w[0]);
        }
        for inc in p.increments() {
            assert!(inc <= p.max_depth_per_pass() + EPSILON);
        }
    }

    #[test]
    fn test_capped_increment() {
        let p = plan(0.125, 0.1, DepthPolicy::CappedIncrement).unwrap();
        assert_eq!(p.pass_count(), 2);
        assert_eq!(p.cumulative_depths(), &[0.1, 0.125]);
        let inc = p.increments();
        assert!((inc[0] - 0.1).abs() < EPSILON);
        assert!((inc[1] - 0.025).abs() < EPSILON);
        check_invariants(&p);
    }

    #[test]
    fn test_equal_division() {
        let p = plan(0.125, 0.1, DepthPolicy::EqualDivision).unwrap();
        assert_eq!(p.pass_count(), 2);
        assert_eq!(p.depth_per_pass(), 0.0625);
        assert_eq!(p.cumulative_depths(), &[0.0625, 0.125]);
        check_invariants(&p);
    }

    #[test]
    fn test_invariants_over_a_range_of_inputs() {
        for policy in [DepthPolicy::EqualDivision, DepthPolicy::CappedIncrement] {
            for total in [0.001, 0.1, 0.3, 0.7, 1.0, 2.375, 12.7] {
                for max in [0.01, 0.1, 0.25, 0.3, 1.0, 5.0] {
                    check_invariants(&plan(total, max, policy).unwrap());
                }
            }
        }
    }

    #[test]
    fn test_exact_multiple() {
        let p = plan(0.5, 0.25, DepthPolicy::CappedIncrement).unwrap();
        assert_eq!(p.cumulative_depths(), &[0.25, 0.5]);
        let q = plan(0.5, 0.25, DepthPolicy::EqualDivision).unwrap();
        assert_eq!(p, CutPlan { policy: DepthPolicy::CappedIncrement, ..q });
    }

    #[test]
    fn test_zero_depth_still_gets_one_pass() {
        let p = plan(0.0, 0.25, DepthPolicy::EqualDivision).unwrap();
        assert_eq!(p.pass_count(), 1);
        assert_eq!(p.cumulative_depths(), &[0.0]);
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(
            plan(-0.1, 0.25, DepthPolicy::EqualDivision),
            Err(Error::InvalidGeometry(Fault::NegativeDepth { value: -0.1 }))
        );
        assert!(plan(1.0, 0.0, DepthPolicy::EqualDivision).is_err());
        assert!(plan(1.0, -0.25, DepthPolicy::CappedIncrement).is_err());
        assert!(plan(f64::NAN, 0.25, DepthPolicy::CappedIncrement).is_err());
        assert!(matches!(
            plan(f64::INFINITY, 0.25, DepthPolicy::EqualDivision),
            Err(Error::InvalidGeometry(Fault::NotFinite { .. }))
        ));
    }

    #[test]
    fn test_tiny_depth_of_cut_is_refused() {
        for policy in [DepthPolicy::EqualDivision, DepthPolicy::CappedIncrement] {
            assert!(matches!(
                plan(1.0, 1e-300, policy),
                Err(Error::InvalidGeometry(Fault::TooManyPasses {
                    limit: MAX_PASSES,
                    ..
                }))
            ));
        }
        assert!(plan(1.0, 1e-12, DepthPolicy::CappedIncrement).is_err());
    }

    #[test]
    fn test_pass_limit_is_inclusive() {
        let p = plan(MAX_PASSES as f64, 1.0, DepthPolicy::EqualDivision).unwrap();
        assert_eq!(p.pass_count(), MAX_PASSES);
        assert!(plan(MAX_PASSES as f64 + 1.0, 1.0, DepthPolicy::EqualDivision).is_err());
    }

    #[test]
    fn test_parse_policy() {
        assert_eq!("equal".parse::<DepthPolicy>(), Ok(DepthPolicy::EqualDivision));
        assert_eq!("Capped".parse::<DepthPolicy>(), Ok(DepthPolicy::CappedIncrement));
        assert!("deepest".parse::<DepthPolicy>().is_err());
    }
}
