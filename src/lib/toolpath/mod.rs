//! Toolpaths as ordered sequences of waypoints.
//!
//! The order of a toolpath is the order the machine moves in: each waypoint starts from wherever
//! the previous one left the tool, so steps are only ever appended.

/// Target position of a move. Axes that are `None` don't move.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Axes {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub a: Option<f64>,
}

impl Axes {
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.z.is_none() && self.a.is_none()
    }
}

pub fn z(z: f64) -> Axes {
    Axes {
        z: Some(z),
        ..Axes::default()
    }
}

pub fn a(a: f64) -> Axes {
    Axes {
        a: Some(a),
        ..Axes::default()
    }
}

pub fn xy(x: f64, y: f64) -> Axes {
    Axes {
        x: Some(x),
        y: Some(y),
        ..Axes::default()
    }
}

pub fn xz(x: f64, z: f64) -> Axes {
    Axes {
        x: Some(x),
        z: Some(z),
        ..Axes::default()
    }
}

pub fn ya(y: f64, a: f64) -> Axes {
    Axes {
        y: Some(y),
        a: Some(a),
        ..Axes::default()
    }
}

/// Feed rate carried by a cutting move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Feed {
    /// Units per minute (G94)
    PerMinute(f64),
    /// Inverse of the move time in minutes (G93). `F3.0` means "complete this move in 20 seconds".
    InverseTime(f64),
}

impl Feed {
    pub fn value(&self) -> f64 {
        match *self {
            Feed::PerMinute(f) | Feed::InverseTime(f) => f,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    /// Non-cutting move at the machine's rapid rate
    Rapid,
    /// Cutting move at a controlled feed
    Feed(Feed),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Waypoint {
    pub motion: Motion,
    pub axes: Axes,
}

impl Waypoint {
    pub fn is_rapid(&self) -> bool {
        self.motion == Motion::Rapid
    }

    pub fn feed(&self) -> Option<Feed> {
        match self.motion {
            Motion::Rapid => None,
            Motion::Feed(f) => Some(f),
        }
    }
}

/// One entry of a toolpath: either a move, or an annotation that carries no geometry.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    Move(Waypoint),
    Note(String),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Toolpath {
    steps: Vec<Step>,
}

impl Toolpath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rapid(&mut self, axes: Axes) {
        self.push(Waypoint {
            motion: Motion::Rapid,
            axes,
        });
    }

    pub fn feed(&mut self, axes: Axes, feed: f64) {
        self.push(Waypoint {
            motion: Motion::Feed(Feed::PerMinute(feed)),
            axes,
        });
    }

    pub fn inverse_time(&mut self, axes: Axes, feed: f64) {
        self.push(Waypoint {
            motion: Motion::Feed(Feed::InverseTime(feed)),
            axes,
        });
    }

    pub fn note(&mut self, s: impl Into<String>) {
        self.steps.push(Step::Note(s.into()));
    }

    fn push(&mut self, w: Waypoint) {
        debug_assert!(!w.axes.is_empty(), "Refusing to make a move with no axes");
        self.steps.push(Step::Move(w));
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The moves of the toolpath, in order, without annotations
    pub fn waypoints(&self) -> impl Iterator<Item = &Waypoint> + '_ {
        self.steps.iter().filter_map(|s| match s {
            Step::Move(w) => Some(w),
            Step::Note(_) => None,
        })
    }

    pub fn waypoint_count(&self) -> usize {
        self.waypoints().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builders() {
        assert_eq!(
            xz(0.5, 1.0),
            Axes {
                x: Some(0.5),
                y: None,
                z: Some(1.0),
                a: None
            }
        );
        assert_eq!(ya(6.0, 720.0).a, Some(720.0));
        assert!(Axes::default().is_empty());
        assert!(!a(0.0).is_empty());
    }

    #[test]
    fn test_waypoints_skip_notes_and_keep_order() {
        let mut tp = Toolpath::new();
        tp.note("start");
        tp.rapid(z(1.0));
        tp.feed(z(-0.1), 100.0);
        tp.note("middle");
        tp.inverse_time(ya(6.0, 360.0), 2.5);

        assert_eq!(tp.steps().len(), 5);
        assert_eq!(tp.waypoint_count(), 3);
        let w: Vec<_> = tp.waypoints().collect();
        assert!(w[0].is_rapid());
        assert_eq!(w[0].feed(), None);
        assert_eq!(w[1].feed(), Some(Feed::PerMinute(100.0)));
        assert_eq!(w[2].feed(), Some(Feed::InverseTime(2.5)));
        assert_eq!(w[2].feed().map(|f| f.value()), Some(2.5));
    }
}
