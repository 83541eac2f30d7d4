//! # Affine Matrix
//!
//! A 2×3 affine matrix in the SVG layout `(a, b, c, d, e, f)`:
//!
//! ```text
//! ┌ a  c  e ┐   ┌ x ┐     x' = a·x + c·y + e
//! │ b  d  f │ · │ y │     y' = b·x + d·y + f
//! └ 0  0  1 ┘   └ 1 ┘
//! ```
//!
//! ## Composition
//!
//! Composition is spelled in application order: `m.then(&n)` maps a point
//! through `m` first and `n` second. The two helpers [`Matrix::prepend`] and
//! [`Matrix::append`] mirror the classic "matrix order" vocabulary:
//!
//! | Call | Applies |
//! |------|---------|
//! | `m.prepend(t)` | `t` first, then `m` |
//! | `m.append(t)` | `m` first, then `t` |
//!
//! Quarter-turn rotations are built from exact `0/±1` coefficients so that
//! device coordinates truncated to integers do not drift by one dot.

use serde::{Deserialize, Serialize};

/// 2D affine transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    /// Vertical mirror (`y' = -y`), the base matrix of bottom-left origin devices.
    pub const FLIP_Y: Self = Self::new(1.0, 0.0, 0.0, -1.0, 0.0, 0.0);

    pub const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub const fn translate(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub const fn scale(sx: f32, sy: f32) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation by `degrees`, clockwise on a y-down canvas.
    pub fn rotate(degrees: f32) -> Self {
        let (sin, cos) = match quarter_turns(degrees) {
            Some(0) => (0.0, 1.0),
            Some(1) => (1.0, 0.0),
            Some(2) => (0.0, -1.0),
            Some(3) => (-1.0, 0.0),
            _ => {
                let rad = degrees.to_radians();
                (rad.sin(), rad.cos())
            }
        };
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Rotation by `degrees` around the point `(cx, cy)`.
    pub fn rotate_around(degrees: f32, cx: f32, cy: f32) -> Self {
        Self::translate(-cx, -cy)
            .then(&Self::rotate(degrees))
            .then(&Self::translate(cx, cy))
    }

    pub fn skew_x(degrees: f32) -> Self {
        Self::new(1.0, 0.0, degrees.to_radians().tan(), 1.0, 0.0, 0.0)
    }

    pub fn skew_y(degrees: f32) -> Self {
        Self::new(1.0, degrees.to_radians().tan(), 0.0, 1.0, 0.0, 0.0)
    }

    /// The matrix that applies `self` and then `next`.
    pub fn then(&self, next: &Matrix) -> Matrix {
        Matrix {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            e: next.a * self.e + next.c * self.f + next.e,
            f: next.b * self.e + next.d * self.f + next.f,
        }
    }

    /// `first` is applied before `self`.
    #[inline]
    pub fn prepend(&self, first: &Matrix) -> Matrix {
        first.then(self)
    }

    /// `last` is applied after `self`.
    #[inline]
    pub fn append(&self, last: &Matrix) -> Matrix {
        self.then(last)
    }

    /// Map a point (translation included).
    #[inline]
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Map a vector (translation ignored).
    #[inline]
    pub fn apply_vector(&self, x: f32, y: f32) -> (f32, f32) {
        (self.a * x + self.c * y, self.b * x + self.d * y)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

/// Number of whole quarter turns in `degrees`, if it is an exact multiple of 90.
fn quarter_turns(degrees: f32) -> Option<u8> {
    let turns = degrees / 90.0;
    if turns.is_finite() && turns.fract() == 0.0 {
        Some(turns.rem_euclid(4.0) as u8)
    } else {
        None
    }
}
