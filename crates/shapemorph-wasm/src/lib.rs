#![deny(warnings)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::indexing_slicing)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! `ShapeMorph` WASM module: cuts polygons into pieces and pairs pieces
//! between shapes so an animation layer can interpolate them.

pub mod error;
pub mod geometry;
pub mod matcher;
pub mod mesh;
pub mod morph;
pub mod random;

use std::cell::RefCell;

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::geometry::{saturate_u32, BoundingBox, Ring};
use crate::morph::MorphOptions;

thread_local! {
    static LAST_PIECES: RefCell<Option<PieceBuffers>> = const { RefCell::new(None) };
}

/// Flat buffers for the last piece set, ready for a typed-array upload.
#[derive(Debug, Clone, Default, PartialEq)]
struct PieceBuffers {
    positions: Vec<f64>,
    ring_offsets: Vec<u32>,
}

impl PieceBuffers {
    fn from_rings(rings: &[Ring]) -> Self {
        let vertex_total: usize = rings.iter().map(Ring::len).sum();
        let mut positions = Vec::with_capacity(vertex_total * 2);
        let mut ring_offsets = Vec::with_capacity(rings.len() + 1);
        for ring in rings {
            ring_offsets.push(saturate_u32(positions.len() / 2));
            for p in ring.points() {
                positions.push(p.x);
                positions.push(p.y);
            }
        }
        ring_offsets.push(saturate_u32(positions.len() / 2));
        Self {
            positions,
            ring_offsets,
        }
    }
}

fn store_pieces(rings: &[Ring]) {
    LAST_PIECES.with(|p| {
        *p.borrow_mut() = Some(PieceBuffers::from_rings(rings));
    });
}

/// Summary of a cut, returned to JS.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PiecesMeta {
    /// Number of pieces produced.
    pub piece_count: u32,
    /// Total number of vertices across all piece outlines.
    pub vertex_count: u32,
    /// Number of triangles before collapsing.
    pub triangle_count: u32,
    /// Piece areas, ascending.
    pub areas: Vec<f64>,
    /// Bounds of the input ring after preparation.
    pub bounds: BoundingBox,
    /// Number of warnings.
    pub warning_count: u32,
    /// Fixes applied to the input ring.
    pub warnings: Vec<String>,
    /// Piece outlines, in the same order as `areas`.
    pub rings: Vec<Ring>,
}

/// Initialize the WASM module. Sets up the panic hook for debugging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn from_js<T: DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("invalid {what}: {e}")))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn options_from_js(options: JsValue) -> Result<MorphOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(MorphOptions::default());
    }
    from_js(options, "options")
}

/// Triangulate a ring and merge its triangles into `piece_count` pieces.
///
/// `ring` is an array of `[x, y]` pairs. `options` may be `undefined` or an
/// object with `seed` and `allowReverse`. Returns [`PiecesMeta`] as a
/// `JsValue`; flat buffers are stored internally and can be retrieved with
/// [`get_positions`] and [`get_ring_offsets`].
///
/// # Errors
///
/// Returns a descriptive error string for malformed input, degenerate or
/// self-intersecting rings, and unsupported piece counts.
#[wasm_bindgen]
pub fn triangulate_and_collapse(
    ring: JsValue,
    piece_count: u32,
    options: JsValue,
) -> Result<JsValue, JsValue> {
    let ring: Ring = from_js(ring, "ring")?;
    let options = options_from_js(options)?;
    let meta = triangulate_and_collapse_internal(&ring, piece_count, &options)
        .map_err(|e| JsValue::from_str(&e))?;
    to_js(&meta)
}

/// Internal cut logic shared between the wasm export and native tests.
#[doc(hidden)]
pub fn triangulate_and_collapse_internal(
    ring: &Ring,
    piece_count: u32,
    options: &MorphOptions,
) -> Result<PiecesMeta, String> {
    let piece_count = usize::try_from(piece_count).map_err(|e| e.to_string())?;
    let mut rng = options.rng();
    let cut = morph::triangulate_and_collapse(ring, piece_count, &mut rng)
        .map_err(|e| e.to_string())?;

    store_pieces(&cut.rings);

    Ok(PiecesMeta {
        piece_count: saturate_u32(cut.rings.len()),
        vertex_count: saturate_u32(cut.rings.iter().map(Ring::len).sum()),
        triangle_count: cut.triangle_count,
        areas: cut.areas,
        bounds: cut.bounds,
        warning_count: saturate_u32(cut.warnings.len()),
        warnings: cut.warnings,
        rings: cut.rings,
    })
}

/// Retrieve the position buffer for the last cut.
///
/// Returns a copy of the interleaved `[x0, y0, x1, y1, ...]` positions of
/// every piece outline, piece after piece.
/// Returns an empty array if nothing has been cut yet.
#[wasm_bindgen]
pub fn get_positions() -> Vec<f64> {
    LAST_PIECES.with(|p| {
        p.borrow()
            .as_ref()
            .map_or_else(Vec::new, |buffers| buffers.positions.clone())
    })
}

/// Retrieve the ring offsets for the last cut.
///
/// Entry `i` is the first vertex of piece `i`; a final entry holds the
/// total vertex count, so piece `i` spans `offsets[i]..offsets[i + 1]`.
/// Returns an empty array if nothing has been cut yet.
#[wasm_bindgen]
pub fn get_ring_offsets() -> Vec<u32> {
    LAST_PIECES.with(|p| {
        p.borrow()
            .as_ref()
            .map_or_else(Vec::new, |buffers| buffers.ring_offsets.clone())
    })
}

/// Pair each ring of `rings_a` with its nearest ring of `rings_b`.
///
/// Returns an array of `[ringA, ringB]` pairs with equal vertex counts,
/// the B side rotated to line up with the A side.
///
/// # Errors
///
/// Returns a descriptive error string for malformed input or lists of
/// different lengths.
#[wasm_bindgen]
pub fn match_and_align(
    rings_a: JsValue,
    rings_b: JsValue,
    options: JsValue,
) -> Result<JsValue, JsValue> {
    let rings_a: Vec<Ring> = from_js(rings_a, "rings_a")?;
    let rings_b: Vec<Ring> = from_js(rings_b, "rings_b")?;
    let options = options_from_js(options)?;
    let pairs =
        match_and_align_internal(&rings_a, &rings_b, &options).map_err(|e| JsValue::from_str(&e))?;
    to_js(&pairs)
}

/// Internal matching logic shared between the wasm export and native tests.
#[doc(hidden)]
pub fn match_and_align_internal(
    rings_a: &[Ring],
    rings_b: &[Ring],
    options: &MorphOptions,
) -> Result<Vec<(Ring, Ring)>, String> {
    morph::match_and_align(rings_a, rings_b, options.align_options()).map_err(|e| e.to_string())
}

/// Interpolation-ready pairs for one step of a morph chain.
///
/// One of `from` and `to` must hold a single ring; that ring is cut into as
/// many pieces as the other side has rings.
///
/// # Errors
///
/// Returns a descriptive error string for malformed input, unsupported
/// shape combinations, or rings that cannot be cut.
#[wasm_bindgen]
pub fn tween_pairs(from: JsValue, to: JsValue, options: JsValue) -> Result<JsValue, JsValue> {
    let from: Vec<Ring> = from_js(from, "from")?;
    let to: Vec<Ring> = from_js(to, "to")?;
    let options = options_from_js(options)?;
    let pairs = tween_pairs_internal(&from, &to, &options).map_err(|e| JsValue::from_str(&e))?;
    to_js(&pairs)
}

/// Internal tween logic shared between the wasm export and native tests.
#[doc(hidden)]
pub fn tween_pairs_internal(
    from: &[Ring],
    to: &[Ring],
    options: &MorphOptions,
) -> Result<Vec<(Ring, Ring)>, String> {
    let mut rng = options.rng();
    morph::tween_pairs(from, to, options, &mut rng).map_err(|e| e.to_string())
}

/// Lay out `count` scaled copies of `ring` in a `width` x `height` viewport.
///
/// A `count` of 0 draws a random count between 2 and 6 from the options'
/// random source, so a seeded call always picks the same count.
///
/// # Errors
///
/// Returns a descriptive error string for malformed input, a count outside
/// 2..=6, or a ring with no extent.
#[wasm_bindgen]
pub fn scatter_clones(
    ring: JsValue,
    count: u32,
    width: f64,
    height: f64,
    options: JsValue,
) -> Result<JsValue, JsValue> {
    let ring: Ring = from_js(ring, "ring")?;
    let options = options_from_js(options)?;
    let clones = scatter_clones_internal(&ring, count, width, height, &options)
        .map_err(|e| JsValue::from_str(&e))?;
    to_js(&clones)
}

/// Internal layout logic shared between the wasm export and native tests.
#[doc(hidden)]
pub fn scatter_clones_internal(
    ring: &Ring,
    count: u32,
    width: f64,
    height: f64,
    options: &MorphOptions,
) -> Result<Vec<Ring>, String> {
    let count = match count {
        0 => geometry::random_clone_count(&mut options.rng()),
        n => usize::try_from(n).map_err(|e| e.to_string())?,
    };
    geometry::scatter_clones(ring, count, width, height).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn ring(coords: &[(f64, f64)]) -> Ring {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn square() -> Ring {
        ring(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)])
    }

    fn seeded(seed: u64) -> MorphOptions {
        MorphOptions {
            seed: Some(seed),
            allow_reverse: false,
        }
    }

    fn clear_pieces() {
        LAST_PIECES.with(|p| {
            *p.borrow_mut() = None;
        });
    }

    #[test]
    fn cut_square_reports_meta() {
        let result = triangulate_and_collapse_internal(&square(), 2, &seeded(1));
        assert!(
            result.is_ok(),
            "expected Ok, got Err: {:?}",
            result.as_ref().err()
        );
        let Some(meta) = result.ok() else {
            return;
        };
        assert_eq!(meta.piece_count, 2);
        assert_eq!(meta.triangle_count, 2);
        assert_eq!(meta.vertex_count, 6, "two triangles of three vertices");
        assert_eq!(meta.warning_count, 0);
        let total: f64 = meta.areas.iter().sum();
        assert!((total - 16.0).abs() < 1e-9, "areas must cover the square");
    }

    #[test]
    fn cut_fills_buffers() {
        clear_pieces();
        let result = triangulate_and_collapse_internal(&square(), 2, &seeded(1));
        assert!(result.is_ok());
        let positions = get_positions();
        let offsets = get_ring_offsets();
        assert_eq!(positions.len(), 12);
        assert_eq!(offsets, vec![0, 3, 6]);
    }

    #[test]
    fn failed_cut_keeps_previous_buffers() {
        clear_pieces();
        assert!(triangulate_and_collapse_internal(&square(), 1, &seeded(1)).is_ok());
        let before = get_ring_offsets();
        let result = triangulate_and_collapse_internal(&square(), 0, &seeded(1));
        assert!(result.is_err(), "zero pieces should return Err");
        assert_eq!(get_ring_offsets(), before);
    }

    #[test]
    fn degenerate_ring_is_err() {
        let line = ring(&[(0.0, 0.0), (1.0, 1.0)]);
        let result = triangulate_and_collapse_internal(&line, 1, &MorphOptions::default());
        assert!(result.is_err(), "two-point ring should return Err");
    }

    #[test]
    fn get_buffers_empty_without_cut() {
        clear_pieces();
        assert!(get_positions().is_empty(), "no cut yet => empty positions");
        assert!(get_ring_offsets().is_empty(), "no cut yet => empty offsets");
    }

    #[test]
    fn buffers_flatten_rings_in_order() {
        let rings = vec![
            ring(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]),
            ring(&[(5.0, 5.0), (6.0, 5.0), (6.0, 6.0), (5.0, 6.0)]),
        ];
        let buffers = PieceBuffers::from_rings(&rings);
        assert_eq!(buffers.ring_offsets, vec![0, 3, 7]);
        assert_eq!(buffers.positions.len(), 14);
        assert_eq!(buffers.positions.get(6..8), Some(&[5.0, 5.0][..]));
    }

    #[test]
    fn match_and_align_pairs_by_position() {
        let left = ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let right = ring(&[(9.0, 0.0), (10.0, 0.0), (10.0, 1.0), (9.0, 1.0)]);
        let result = match_and_align_internal(
            &[left.clone(), right.clone()],
            &[right.clone(), left.clone()],
            &MorphOptions::default(),
        );
        assert_eq!(result, Ok(vec![(left.clone(), left), (right.clone(), right)]));
    }

    #[test]
    fn match_and_align_length_mismatch_is_err() {
        let result = match_and_align_internal(&[square()], &[], &MorphOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn tween_pairs_with_seed_is_reproducible() {
        let sources = vec![
            ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]),
            ring(&[(3.0, 3.0), (4.0, 3.0), (4.0, 4.0), (3.0, 4.0)]),
        ];
        let first = tween_pairs_internal(&sources, &[square()], &seeded(5));
        let second = tween_pairs_internal(&sources, &[square()], &seeded(5));
        assert!(first.is_ok());
        assert_eq!(first, second);
    }

    #[test]
    fn scatter_clones_rejects_unsupported_count() {
        let options = MorphOptions::default();
        assert!(scatter_clones_internal(&square(), 7, 600.0, 400.0, &options).is_err());
        assert!(scatter_clones_internal(&square(), 1, 600.0, 400.0, &options).is_err());
    }

    #[test]
    fn scatter_clones_returns_one_ring_per_clone() {
        let result = scatter_clones_internal(&square(), 4, 600.0, 400.0, &MorphOptions::default());
        assert_eq!(result.as_ref().map(Vec::len), Ok(4));
    }

    #[test]
    fn scatter_clones_zero_count_draws_a_seeded_count() {
        for seed in 0..20 {
            let first = scatter_clones_internal(&square(), 0, 600.0, 400.0, &seeded(seed));
            let second = scatter_clones_internal(&square(), 0, 600.0, 400.0, &seeded(seed));
            assert!(first.is_ok(), "seed {seed}: {:?}", first.as_ref().err());
            let count = first.as_ref().map_or(0, Vec::len);
            assert!((2..=6).contains(&count), "seed {seed} drew {count}");
            assert_eq!(first, second);
        }
    }
}
