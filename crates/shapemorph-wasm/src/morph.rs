//! Morph pipeline: cut a ring into pieces and pair pieces across shapes.
//!
//! This is the surface an animation layer calls once per transition. It
//! does no timing or rendering; it only decides which outline moves to
//! which and with which vertex order.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;

use crate::error::MorphError;
use crate::geometry::{saturate_u32, BoundingBox, Ring};
use crate::matcher::{align, closest_ring_centroids, equalize, AlignOptions};
use crate::mesh::{build_topology, collapse, prepare_ring, triangulate};
use crate::random::RandomSource;

/// Caller-tunable settings. Every field has a default, so `{}` is valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MorphOptions {
    /// Seed for neighbour selection while collapsing. `None` draws from
    /// system entropy.
    pub seed: Option<u64>,
    /// Let ring alignment walk a ring backwards if that moves less.
    pub allow_reverse: bool,
}

impl MorphOptions {
    /// Random source for collapsing: seeded if a seed was given.
    pub fn rng(&self) -> StdRng {
        self.seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
    }

    /// Alignment settings derived from these options.
    pub const fn align_options(&self) -> AlignOptions {
        AlignOptions {
            allow_reverse: self.allow_reverse,
        }
    }
}

/// Result of cutting one ring into pieces.
#[derive(Debug, Clone, PartialEq)]
pub struct CutResult {
    /// Piece outlines, ascending by area.
    pub rings: Vec<Ring>,
    /// Piece areas, same order as `rings`.
    pub areas: Vec<f64>,
    /// Number of triangles before collapsing.
    pub triangle_count: u32,
    /// Bounds of the prepared input ring.
    pub bounds: BoundingBox,
    /// Notes about fixes applied to the input ring.
    pub warnings: Vec<String>,
}

/// Triangulates `ring` and merges triangles until `piece_count` pieces remain.
///
/// # Errors
///
/// Returns [`MorphError::Geometry`] for degenerate or self-intersecting
/// rings, [`MorphError::InvalidArgument`] if `piece_count` is zero or
/// exceeds the triangle count, and [`MorphError::InvariantViolation`] if
/// collapsing hits a corrupted mesh.
pub fn triangulate_and_collapse<R: RandomSource + ?Sized>(
    ring: &Ring,
    piece_count: usize,
    rng: &mut R,
) -> Result<CutResult, MorphError> {
    if piece_count == 0 {
        return Err(MorphError::InvalidArgument(
            "piece count must be at least 1".to_string(),
        ));
    }

    let prepared = prepare_ring(ring);
    let triangles = triangulate(&prepared.ring)?;
    let mesh = build_topology(&triangles, &prepared.ring)?;
    let pieces = collapse(mesh, piece_count, rng)?;

    Ok(CutResult {
        rings: pieces.rings()?,
        areas: pieces.areas(),
        triangle_count: saturate_u32(triangles.len()),
        bounds: prepared.ring.bounds(),
        warnings: prepared.warnings,
    })
}

/// Pairs every ring of `a` with the ring of `b` whose centroid is nearest
/// (greedy, in `a` order), then equalizes vertex counts and aligns the `b`
/// side so the `a` side keeps its vertex order.
///
/// # Errors
///
/// Returns [`MorphError::InvalidArgument`] if the lists differ in length or
/// contain an empty ring.
pub fn match_and_align(
    a: &[Ring],
    b: &[Ring],
    options: AlignOptions,
) -> Result<Vec<(Ring, Ring)>, MorphError> {
    let perm = closest_ring_centroids(a, b)?;
    a.iter()
        .zip(perm)
        .map(|(from, j)| {
            let to = b.get(j).ok_or_else(|| {
                MorphError::InvariantViolation(format!("correspondence index {j} out of range"))
            })?;
            let (from, to) = equalize(from, to);
            let to = align(&from, &to, options)?;
            Ok((from, to))
        })
        .collect()
}

/// Interpolation-ready pairs for one step of a morph chain.
///
/// One side must be a single ring. If `to` is the single ring, it is cut
/// into `from.len()` pieces which are matched against `from`. Otherwise
/// `from` is cut into `to.len()` pieces and each target picks its nearest
/// piece.
///
/// # Errors
///
/// Returns [`MorphError::InvalidArgument`] if neither side is a single
/// ring, plus any error from cutting or matching.
pub fn tween_pairs<R: RandomSource + ?Sized>(
    from: &[Ring],
    to: &[Ring],
    options: &MorphOptions,
    rng: &mut R,
) -> Result<Vec<(Ring, Ring)>, MorphError> {
    match (from, to) {
        (_, [single]) => {
            let pieces = triangulate_and_collapse(single, from.len(), rng)?;
            match_and_align(from, &pieces.rings, options.align_options())
        }
        ([single], _) => {
            let pieces = triangulate_and_collapse(single, to.len(), rng)?;
            let pairs = match_and_align(to, &pieces.rings, options.align_options())?;
            Ok(pairs.into_iter().map(|(target, piece)| (piece, target)).collect())
        }
        _ => Err(MorphError::InvalidArgument(format!(
            "one side of a tween must be a single ring, got {} -> {}",
            from.len(),
            to.len()
        ))),
    }
}
