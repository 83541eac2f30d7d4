//! # Device Font Selection
//!
//! Bitmap-font printers only offer a handful of cell heights, each of which
//! can be multiplied by a small integer. Given a target height in dots, the
//! heuristic looks for the closest achievable `height × multiplier`.
//!
//! ## Algorithm
//!
//! Candidates are visited multiplier-major (`1, 2, 3, 4, 5, 6, 8`), and for
//! each multiplier in ascending cell height:
//!
//! 1. a candidate within 0.5 dots of the target wins immediately
//! 2. candidates below the target compete for **lower** (largest wins)
//! 3. candidates above the target but within `max_upper_overlap` compete for
//!    **upper** (smallest wins); the first one found ends that multiplier
//!
//! The closer of lower and upper is returned, ties going to lower. With
//! neither, the size is out of range.
//!
//! ## EPL Table (203 dpi)
//!
//! | Font | Cell height |
//! |------|-------------|
//! | 1 | 12 |
//! | 2 | 16 |
//! | 3 | 20 |
//! | 4 | 24 |

use crate::error::{RenderError, Result};

/// A font cell and the multiplier applied to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSelection {
    /// Device font index.
    pub font: u32,
    pub horizontal_multiplier: u32,
    pub vertical_multiplier: u32,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    font: u32,
    height: u32,
    multiplier: u32,
}

impl From<Candidate> for FontSelection {
    fn from(c: Candidate) -> Self {
        FontSelection {
            font: c.font,
            horizontal_multiplier: c.multiplier,
            vertical_multiplier: c.multiplier,
        }
    }
}

/// Fixed cell-height table of a bitmap-font printer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontTable {
    /// `(cell height, font index)`, ascending by height.
    pub cells: &'static [(u32, u32)],
    pub multipliers: &'static [u32],
    /// How far above the target an upper candidate may be.
    pub max_upper_overlap: f32,
}

/// Default upper overlap in dots.
pub const DEFAULT_MAX_UPPER_OVERLAP: f32 = 2.0;

impl FontTable {
    /// The four resident EPL fonts.
    pub const EPL: Self = Self {
        cells: &[(12, 1), (16, 2), (20, 3), (24, 4)],
        multipliers: &[1, 2, 3, 4, 5, 6, 8],
        max_upper_overlap: DEFAULT_MAX_UPPER_OVERLAP,
    };

    pub fn with_max_upper_overlap(mut self, overlap: f32) -> Self {
        self.max_upper_overlap = overlap;
        self
    }

    fn minimum_height(&self) -> u32 {
        self.cells.iter().map(|&(height, _)| height).min().unwrap_or(0)
    }

    /// Pick the font and multiplier closest to `font_size` dots.
    ///
    /// ## Example
    ///
    /// ```
    /// use labelrender::render::font::FontTable;
    ///
    /// // 36 is exactly 12×3
    /// let pick = FontTable::EPL.select(36.0).unwrap();
    /// assert_eq!((pick.font, pick.horizontal_multiplier), (1, 3));
    /// ```
    pub fn select(&self, font_size: f32) -> Result<FontSelection> {
        let mut lower: Option<Candidate> = None;
        let mut upper: Option<Candidate> = None;

        for &multiplier in self.multipliers {
            for &(height, font) in self.cells {
                let actual = height * multiplier;
                let candidate = Candidate { font, height: actual, multiplier };

                if (actual as f32 - font_size).abs() < 0.5 {
                    return Ok(candidate.into());
                }

                if (actual as f32) < font_size {
                    if lower.is_none_or(|l| actual > l.height) {
                        lower = Some(candidate);
                    }
                } else if actual as f32 <= font_size + self.max_upper_overlap {
                    if upper.is_none_or(|u| actual < u.height) {
                        upper = Some(candidate);
                    }
                    break;
                }
            }
        }

        match (lower, upper) {
            (None, None) => Err(RenderError::FontSizeOutOfRange {
                size: font_size,
                minimum: self.minimum_height(),
            }),
            (Some(l), None) => Ok(l.into()),
            (None, Some(u)) => Ok(u.into()),
            (Some(l), Some(u)) => {
                let below = font_size - l.height as f32;
                let above = u.height as f32 - font_size;
                Ok(if below <= above { l.into() } else { u.into() })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick(size: f32) -> (u32, u32) {
        let s = FontTable::EPL.select(size).unwrap();
        assert_eq!(s.horizontal_multiplier, s.vertical_multiplier);
        (s.font, s.horizontal_multiplier)
    }

    #[test]
    fn test_exact_matches() {
        assert_eq!(pick(12.0), (1, 1));
        assert_eq!(pick(16.2), (2, 1));
        // 24 is both 24×1 and 12×2; multiplier 1 is visited first
        assert_eq!(pick(24.0), (4, 1));
        assert_eq!(pick(48.0), (4, 2));
        assert_eq!(pick(192.0), (4, 8));
    }

    #[test]
    fn test_tie_goes_to_lower() {
        // 14 is midway between 12 and 16
        assert_eq!(pick(14.0), (1, 1));
        // 18 between 16 and 20
        assert_eq!(pick(18.0), (2, 1));
    }

    #[test]
    fn test_closer_upper_wins() {
        // lower 16, upper 20 within overlap 2 of 19
        assert_eq!(pick(19.0), (3, 1));
    }

    #[test]
    fn test_upper_respects_overlap() {
        // 21: lower 20, nothing in (21, 23], lower wins
        assert_eq!(pick(21.0), (3, 1));
        // with a tiny overlap the lower candidate is used at 23 even though 24 is closer
        let table = FontTable::EPL.with_max_upper_overlap(0.5);
        assert_eq!(table.select(23.0).unwrap().font, 3);
    }

    #[test]
    fn test_too_small() {
        match FontTable::EPL.select(9.0) {
            Err(RenderError::FontSizeOutOfRange { size, minimum }) => {
                assert_eq!(size, 9.0);
                assert_eq!(minimum, 12);
            }
            other => panic!("expected out of range, got {:?}", other),
        }
    }

    #[test]
    fn test_just_below_minimum_uses_upper() {
        // 10.5: no lower, 12 is within the overlap
        assert_eq!(pick(10.5), (1, 1));
    }

    #[test]
    fn test_huge_sizes_take_largest_lower() {
        assert_eq!(pick(500.0), (4, 8));
    }
}
