use nalgebra::Vector2;
use std::f64::consts::{PI, SQRT_2};

use crate::error::{require_positive, Fault, Result};

/// Stock dimensions, supplied once and never changed.
///
/// For rounding, `raw_size` is the side of the square cross-section and `target_size` the
/// finished diameter. For tapering, they are the start and end diameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StockGeometry {
    pub raw_size: f64,
    pub target_size: f64,
    pub length: f64,
}

impl StockGeometry {
    pub fn new(raw_size: f64, target_size: f64, length: f64) -> Self {
        StockGeometry {
            raw_size,
            target_size,
            length,
        }
    }

    /// Check that square stock of side `raw_size` can be turned into a cylinder of diameter
    /// `target_size`
    pub fn check_square(&self) -> Result<()> {
        require_positive("stock size", self.raw_size)?;
        require_positive("finished diameter", self.target_size)?;
        require_positive("length", self.length)?;

        let limit = self.raw_size * SQRT_2;
        if self.target_size > limit {
            return Err(Fault::ExceedsDiagonal {
                target: self.target_size,
                limit,
            }
            .into());
        }
        if self.target_size >= self.raw_size {
            return Err(Fault::NotSmallerThanStock {
                target: self.target_size,
                stock: self.raw_size,
            }
            .into());
        }
        Ok(())
    }

    /// Check the dimensions of a taper. The diameter may grow or shrink along the length.
    pub fn check_taper(&self) -> Result<()> {
        require_positive("start diameter", self.raw_size)?;
        require_positive("end diameter", self.target_size)?;
        require_positive("length", self.length)?;
        Ok(())
    }

    /// Distance from the axis to a flat of the square stock
    pub fn half_width(&self) -> f64 {
        self.raw_size / 2.0
    }

    pub fn finished_radius(&self) -> f64 {
        self.target_size / 2.0
    }

    /// Radial material to remove from the flats to reach the finished radius
    pub fn rounding_depth(&self) -> f64 {
        self.half_width() - self.finished_radius()
    }

    /// Unsigned radial difference between the two ends of a taper
    pub fn taper_depth(&self) -> f64 {
        (self.raw_size / 2.0 - self.target_size / 2.0).abs()
    }
}

/// Length of the path the tool tip traces over the work surface during a helical move.
/// The helix unrolls into a straight line: `axial` along the work, `turns` circumferences around it.
pub fn helix_path_length(axial: f64, turns: f64, diameter: f64) -> f64 {
    Vector2::new(axial, turns * PI * diameter).norm()
}
