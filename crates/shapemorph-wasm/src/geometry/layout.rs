//! Fitting rings into rectangular extents and laying out scaled clones.
//!
//! A morph chain goes from one full-size shape to several small copies of
//! it and back. The copies sit in a dice pattern of 2 to 6 cells.

use crate::error::MorphError;
use crate::random::RandomSource;

use super::types::{BoundingBox, Point, Ring};

/// Inset applied to every dice cell before fitting a clone into it.
pub const CELL_MARGIN: f64 = 5.0;

/// Smallest and largest supported clone counts.
pub const MIN_CLONES: usize = 2;
/// See [`MIN_CLONES`].
pub const MAX_CLONES: usize = 6;

/// Rectangle given by two corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    /// Top-left corner.
    pub min: Point,
    /// Bottom-right corner.
    pub max: Point,
}

impl Extent {
    /// Creates an extent from its corner coordinates.
    pub const fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            min: Point::new(x0, y0),
            max: Point::new(x1, y1),
        }
    }

    /// Same extent shrunk by `margin` on every side.
    pub fn inset(self, margin: f64) -> Self {
        Self::new(
            self.min.x + margin,
            self.min.y + margin,
            self.max.x - margin,
            self.max.y - margin,
        )
    }

    /// Horizontal size.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Vertical size.
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// Uniform scale plus translation that centers `bounds` inside `extent`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitTransform {
    scale: f64,
    dx: f64,
    dy: f64,
}

impl FitTransform {
    /// Computes the largest uniform scale that fits `bounds` in `extent`,
    /// centering the result along the slack axis.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidArgument`] if the extent has no area, or
    /// [`MorphError::Geometry`] if the bounds are empty or zero-sized.
    pub fn new(extent: Extent, bounds: &BoundingBox) -> Result<Self, MorphError> {
        let w = extent.width();
        let h = extent.height();
        if w <= 0.0 || h <= 0.0 {
            return Err(MorphError::InvalidArgument(format!(
                "extent must have positive size, got {w}x{h}"
            )));
        }

        let bw = bounds.width();
        let bh = bounds.height();
        if bounds.is_empty() || (bw <= 0.0 && bh <= 0.0) {
            return Err(MorphError::Geometry(
                "cannot fit a ring with zero-sized bounds".to_string(),
            ));
        }

        let scale = 1.0 / (bw / w).max(bh / h);
        let dx = scale.mul_add(-bounds.min_x, extent.min.x) + bw.mul_add(-scale, w) / 2.0;
        let dy = scale.mul_add(-bounds.min_y, extent.min.y) + bh.mul_add(-scale, h) / 2.0;
        Ok(Self { scale, dx, dy })
    }

    /// Maps one point.
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.scale.mul_add(p.x, self.dx),
            self.scale.mul_add(p.y, self.dy),
        )
    }

    /// Maps every vertex of a ring.
    pub fn apply_ring(&self, ring: &Ring) -> Ring {
        ring.points().iter().map(|p| self.apply(*p)).collect()
    }
}

/// Scales and centers `ring` inside `extent`, preserving aspect ratio.
///
/// # Errors
///
/// See [`FitTransform::new`].
pub fn fit_ring(ring: &Ring, extent: Extent) -> Result<Ring, MorphError> {
    let transform = FitTransform::new(extent, &ring.bounds())?;
    Ok(transform.apply_ring(ring))
}

/// Dice-pattern cells for `count` clones inside a `width` x `height` viewport.
///
/// # Errors
///
/// Returns [`MorphError::InvalidArgument`] if `count` is outside
/// `MIN_CLONES..=MAX_CLONES`.
#[allow(clippy::cast_precision_loss)]
pub fn dice_cells(count: usize, width: f64, height: f64) -> Result<Vec<Extent>, MorphError> {
    const FIVE_ROWS: [f64; 5] = [0.0, 1.0, 0.5, 0.0, 1.0];

    if !(MIN_CLONES..=MAX_CLONES).contains(&count) {
        return Err(MorphError::InvalidArgument(format!(
            "clone count must be between {MIN_CLONES} and {MAX_CLONES}, got {count}"
        )));
    }

    let cells = (0..count)
        .map(|d| {
            let df = d as f64;
            let (x0, w, y0, h) = match count {
                2 => (df * width / 2.0, width / 2.0, 0.0, height),
                3 => (df * width / 3.0, width / 3.0, df * height / 3.0, height / 3.0),
                4 => (
                    (d % 2) as f64 * width / 2.0,
                    width / 2.0,
                    if d < 2 { 0.0 } else { height / 2.0 },
                    height / 2.0,
                ),
                5 => {
                    let column = match d {
                        0 | 1 => 0.0,
                        2 => 1.0,
                        _ => 2.0,
                    };
                    let row = FIVE_ROWS.get(d).copied().unwrap_or(0.0);
                    (column * width / 3.0, width / 3.0, row * height / 2.0, height / 2.0)
                }
                _ => (
                    (d % 3) as f64 * width / 3.0,
                    width / 3.0,
                    if d < 3 { 0.0 } else { height / 2.0 },
                    height / 2.0,
                ),
            };
            Extent::new(x0, y0, x0 + w, y0 + h)
        })
        .collect();
    Ok(cells)
}

/// Places `count` scaled copies of `ring` in dice-pattern cells.
///
/// # Errors
///
/// Fails if `count` is unsupported, the viewport is too small for the cell
/// margin, or the ring has no extent.
pub fn scatter_clones(
    ring: &Ring,
    count: usize,
    width: f64,
    height: f64,
) -> Result<Vec<Ring>, MorphError> {
    dice_cells(count, width, height)?
        .into_iter()
        .map(|cell| fit_ring(ring, cell.inset(CELL_MARGIN)))
        .collect()
}

/// Random clone count in `MIN_CLONES..=MAX_CLONES`.
pub fn random_clone_count<R: RandomSource + ?Sized>(rng: &mut R) -> usize {
    MIN_CLONES + rng.pick(MAX_CLONES - MIN_CLONES + 1)
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn unit_square() -> Ring {
        Ring::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ])
    }

    #[test]
    fn fit_ring_scales_uniformly_and_centers() {
        let wide = Ring::new(vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 1.0),
            Point::new(0.0, 1.0),
        ]);
        let fitted = fit_ring(&wide, Extent::new(0.0, 0.0, 10.0, 10.0));
        assert!(fitted.is_ok());
        let b = fitted.unwrap_or_default().bounds();
        assert!((b.min_x - 0.0).abs() < 1e-9);
        assert!((b.max_x - 10.0).abs() < 1e-9);
        assert!((b.min_y - 2.5).abs() < 1e-9);
        assert!((b.max_y - 7.5).abs() < 1e-9);
    }

    #[test]
    fn fit_ring_rejects_point_like_ring() {
        let dot = Ring::new(vec![Point::new(1.0, 1.0); 3]);
        let result = fit_ring(&dot, Extent::new(0.0, 0.0, 10.0, 10.0));
        assert!(matches!(result, Err(MorphError::Geometry(_))));
    }

    #[test]
    fn fit_ring_rejects_empty_extent() {
        let result = fit_ring(&unit_square(), Extent::new(5.0, 5.0, 5.0, 10.0));
        assert!(matches!(result, Err(MorphError::InvalidArgument(_))));
    }

    #[test]
    fn dice_cells_cover_supported_counts() {
        for count in MIN_CLONES..=MAX_CLONES {
            let cells = dice_cells(count, 820.0, 570.0);
            assert_eq!(cells.map(|c| c.len()).ok(), Some(count));
        }
    }

    #[test]
    fn dice_cells_five_uses_staggered_middle_column() {
        let cells = dice_cells(5, 900.0, 600.0).unwrap_or_default();
        assert!((cells[2].min.x - 300.0).abs() < 1e-9);
        assert!((cells[2].min.y - 150.0).abs() < 1e-9);
        assert!((cells[4].min.x - 600.0).abs() < 1e-9);
        assert!((cells[4].min.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn dice_cells_rejects_out_of_range_counts() {
        assert!(matches!(
            dice_cells(1, 100.0, 100.0),
            Err(MorphError::InvalidArgument(_))
        ));
        assert!(matches!(
            dice_cells(7, 100.0, 100.0),
            Err(MorphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn scatter_clones_stay_inside_their_cells() {
        let clones = scatter_clones(&unit_square(), 4, 200.0, 100.0).unwrap_or_default();
        assert_eq!(clones.len(), 4);
        let cells = dice_cells(4, 200.0, 100.0).unwrap_or_default();
        for (clone, cell) in clones.iter().zip(&cells) {
            let b = clone.bounds();
            assert!(b.min_x >= cell.min.x + CELL_MARGIN - 1e-9);
            assert!(b.max_x <= cell.max.x - CELL_MARGIN + 1e-9);
            assert!(b.min_y >= cell.min.y + CELL_MARGIN - 1e-9);
            assert!(b.max_y <= cell.max.y - CELL_MARGIN + 1e-9);
        }
    }

    #[test]
    fn random_clone_count_stays_in_range() {
        struct Max;
        impl RandomSource for Max {
            fn pick(&mut self, len: usize) -> usize {
                len - 1
            }
        }
        assert_eq!(random_clone_count(&mut Max), MAX_CLONES);
    }
}
