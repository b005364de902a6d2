//! Middlegame/endgame score pair used by the static evaluator.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// A pair of middlegame and endgame centipawn values.
///
/// Material and square tables carry one value for each end of the game;
/// [`Score::taper`] blends them by the current phase.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Score {
    mg: i32,
    eg: i32,
}

impl Score {
    pub const ZERO: Score = Score { mg: 0, eg: 0 };

    #[inline]
    pub const fn new(mg: i32, eg: i32) -> Score {
        Score { mg, eg }
    }

    #[inline]
    pub const fn mg(self) -> i32 {
        self.mg
    }

    #[inline]
    pub const fn eg(self) -> i32 {
        self.eg
    }

    /// Blend the pair by `phase`, where 0.0 is the opening and 1.0 a bare
    /// endgame. The result is rounded to the nearest centipawn.
    pub fn taper(self, phase: f32) -> i32 {
        let phase = phase.clamp(0.0, 1.0);
        let blended = self.mg as f32 * (1.0 - phase) + self.eg as f32 * phase;
        blended.round() as i32
    }
}

/// Shorthand constructor, `S(mg, eg)`.
#[allow(non_snake_case)]
#[inline]
pub const fn S(mg: i32, eg: i32) -> Score {
    Score::new(mg, eg)
}

impl Add for Score {
    type Output = Score;

    #[inline]
    fn add(self, rhs: Score) -> Score {
        S(self.mg + rhs.mg, self.eg + rhs.eg)
    }
}

impl AddAssign for Score {
    #[inline]
    fn add_assign(&mut self, rhs: Score) {
        *self = *self + rhs;
    }
}

impl Sub for Score {
    type Output = Score;

    #[inline]
    fn sub(self, rhs: Score) -> Score {
        S(self.mg - rhs.mg, self.eg - rhs.eg)
    }
}

impl SubAssign for Score {
    #[inline]
    fn sub_assign(&mut self, rhs: Score) {
        *self = *self - rhs;
    }
}

impl Neg for Score {
    type Output = Score;

    #[inline]
    fn neg(self) -> Score {
        S(-self.mg, -self.eg)
    }
}

impl Mul<i32> for Score {
    type Output = Score;

    #[inline]
    fn mul(self, rhs: i32) -> Score {
        S(self.mg * rhs, self.eg * rhs)
    }
}

impl fmt::Debug for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S({}, {})", self.mg, self.eg)
    }
}
