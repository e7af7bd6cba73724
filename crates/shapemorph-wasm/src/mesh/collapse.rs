//! Merging mesh faces down to a target piece count.
//!
//! The piece list is kept sorted ascending by area. Each step merges the
//! smallest piece with one of its neighbours, chosen at random so the cut
//! pattern does not look mechanical, and re-inserts the result at its sorted
//! position. Each step removes exactly one piece, so collapsing from `F`
//! faces to `N` pieces takes exactly `F - N` steps.

use crate::error::MorphError;
use crate::geometry::Ring;
use crate::random::RandomSource;

use super::topology::Mesh;
use super::types::FaceId;

/// Owns a mesh and its area-sorted piece list while collapsing.
#[derive(Debug, Clone)]
pub struct Collapser {
    mesh: Mesh,
    pieces: Vec<FaceId>,
}

impl Collapser {
    /// Takes every live face of `mesh` as a piece, smallest first.
    ///
    /// Faces of equal area keep their id order.
    pub fn new(mesh: Mesh) -> Self {
        let mut by_area: Vec<(FaceId, f64)> = mesh.faces().map(|(id, f)| (id, f.area())).collect();
        by_area.sort_by(|(_, x), (_, y)| x.total_cmp(y));
        let pieces = by_area.into_iter().map(|(id, _)| id).collect();
        Self { mesh, pieces }
    }

    /// Current pieces, ascending by area.
    pub fn pieces(&self) -> &[FaceId] {
        &self.pieces
    }

    /// The mesh being collapsed.
    pub const fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Merges the smallest piece with a random neighbour and returns the id
    /// of the merged face.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvariantViolation`] if no pieces remain, the
    /// smallest piece has no neighbours, or the random source returns an
    /// index outside the neighbour list.
    pub fn step<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Result<FaceId, MorphError> {
        let smallest = *self.pieces.first().ok_or_else(|| {
            MorphError::InvariantViolation("no pieces left to merge".to_string())
        })?;

        let neighbors = self.mesh.neighbors(smallest)?;
        if neighbors.is_empty() {
            return Err(MorphError::InvariantViolation(format!(
                "face {} has no neighbours to merge with",
                smallest.0
            )));
        }

        let choice = rng.pick(neighbors.len());
        let neighbor = *neighbors.get(choice).ok_or_else(|| {
            MorphError::InvariantViolation(format!(
                "random source picked {choice} of {} neighbours",
                neighbors.len()
            ))
        })?;

        let merged = self.mesh.merge(smallest, neighbor)?;
        self.pieces.retain(|id| *id != smallest && *id != neighbor);

        let area = self.mesh.face(merged).map_or(0.0, |f| f.area());
        let at = self
            .pieces
            .partition_point(|id| self.mesh.face(*id).is_some_and(|f| f.area() < area));
        self.pieces.insert(at, merged);

        Ok(merged)
    }

    /// Merges until exactly `target` pieces remain.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidArgument`] if `target` is zero or larger
    /// than the current piece count, and propagates any
    /// [`MorphError::InvariantViolation`] raised while merging.
    pub fn collapse_to<R: RandomSource + ?Sized>(
        mut self,
        target: usize,
        rng: &mut R,
    ) -> Result<Pieces, MorphError> {
        if target == 0 || target > self.pieces.len() {
            return Err(MorphError::InvalidArgument(format!(
                "piece count must be between 1 and {}, got {target}",
                self.pieces.len()
            )));
        }

        let mut merges = 0;
        while self.pieces.len() > target {
            self.step(rng)?;
            merges += 1;
        }

        Ok(Pieces {
            mesh: self.mesh,
            order: self.pieces,
            merges,
        })
    }
}

/// Final piece set of a collapse, ascending by area.
#[derive(Debug, Clone)]
pub struct Pieces {
    mesh: Mesh,
    order: Vec<FaceId>,
    merges: usize,
}

impl Pieces {
    /// Face ids in ascending area order.
    pub fn ids(&self) -> &[FaceId] {
        &self.order
    }

    /// Number of pieces.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if there are no pieces.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of merge steps that were performed.
    pub const fn merges(&self) -> usize {
        self.merges
    }

    /// The collapsed mesh.
    pub const fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Piece areas in list order.
    pub fn areas(&self) -> Vec<f64> {
        self.order
            .iter()
            .map(|id| self.mesh.face(*id).map_or(0.0, |f| f.area()))
            .collect()
    }

    /// Outer outline of every piece, in list order.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvariantViolation`] if a piece can no longer be
    /// resolved against the mesh.
    pub fn rings(&self) -> Result<Vec<Ring>, MorphError> {
        self.order
            .iter()
            .map(|id| self.mesh.face_ring(*id))
            .collect()
    }
}

/// Collapses `mesh` to exactly `target` pieces.
///
/// # Errors
///
/// See [`Collapser::collapse_to`].
pub fn collapse<R: RandomSource + ?Sized>(
    mesh: Mesh,
    target: usize,
    rng: &mut R,
) -> Result<Pieces, MorphError> {
    Collapser::new(mesh).collapse_to(target, rng)
}
