//! Mesh building blocks: directed arcs, triangles and faces.

/// Index of a face in a [`super::Mesh`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub usize);

/// Directed edge between two ring vertex indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Arc {
    /// Start vertex index.
    pub from: usize,
    /// End vertex index.
    pub to: usize,
}

impl Arc {
    /// Creates a directed edge.
    pub const fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    /// Undirected key: `(a, b)` and `(b, a)` map to the same key.
    pub const fn key(self) -> EdgeKey {
        if self.from <= self.to {
            EdgeKey(self.from, self.to)
        } else {
            EdgeKey(self.to, self.from)
        }
    }

    /// Same edge walked the other way.
    pub const fn reversed(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }
}

/// Undirected edge key, smaller vertex index first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(pub usize, pub usize);

/// Faces incident to one undirected edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeFaces {
    /// Edge on the outer ring, owned by a single face.
    Boundary(FaceId),
    /// Edge between two adjacent faces.
    Interior(FaceId, FaceId),
}

impl EdgeFaces {
    /// The face across this edge from `id`, if any.
    pub fn other(self, id: FaceId) -> Option<FaceId> {
        match self {
            Self::Interior(a, b) if a == id => Some(b),
            Self::Interior(a, b) if b == id => Some(a),
            _ => None,
        }
    }

    /// Returns `true` if this edge separates exactly `a` and `b`.
    pub fn separates(self, a: FaceId, b: FaceId) -> bool {
        matches!(self, Self::Interior(x, y) if (x == a && y == b) || (x == b && y == a))
    }

    /// Same incidence with `old` renamed to `new`.
    #[must_use]
    pub fn renamed(self, old: FaceId, new: FaceId) -> Self {
        let rename = |id: FaceId| if id == old { new } else { id };
        match self {
            Self::Boundary(a) => Self::Boundary(rename(a)),
            Self::Interior(a, b) => Self::Interior(rename(a), rename(b)),
        }
    }
}

/// One triangle of a ring triangulation, stored as three directed edges
/// `[a, b]`, `[b, c]`, `[c, a]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    edges: [Arc; 3],
}

impl Triangle {
    pub(crate) const fn new(a: usize, b: usize, c: usize) -> Self {
        Self {
            edges: [Arc::new(a, b), Arc::new(b, c), Arc::new(c, a)],
        }
    }

    /// The three directed edges in order.
    pub const fn edges(&self) -> &[Arc; 3] {
        &self.edges
    }

    /// Corner vertex indices `[a, b, c]`.
    pub const fn vertices(&self) -> [usize; 3] {
        let [ab, bc, _] = self.edges;
        [ab.from, bc.from, bc.to]
    }
}

/// Whether a face is still an original triangle or the result of merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceKind {
    /// Face produced directly by triangulation.
    Triangle,
    /// Face produced by merging two faces.
    Polygon,
}

/// A unit of the mesh partition.
///
/// The boundary is a list of closed loops of directed arcs. The first loop
/// is the outer outline; any further loops run around faces the piece has
/// grown to enclose.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub(crate) loops: Vec<Vec<Arc>>,
    pub(crate) area: f64,
    pub(crate) kind: FaceKind,
}

impl Face {
    /// Face area. For merged faces this is the exact sum of the parts.
    pub const fn area(&self) -> f64 {
        self.area
    }

    /// Triangle or merged polygon.
    pub const fn kind(&self) -> FaceKind {
        self.kind
    }

    /// All boundary loops, outer loop first.
    pub fn loops(&self) -> &[Vec<Arc>] {
        &self.loops
    }

    /// Outer boundary loop.
    pub fn outer(&self) -> &[Arc] {
        self.loops.first().map(Vec::as_slice).unwrap_or_default()
    }

    /// Every boundary arc across all loops.
    pub fn arcs(&self) -> impl Iterator<Item = &Arc> + '_ {
        self.loops.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_key_is_undirected() {
        assert_eq!(Arc::new(3, 1).key(), Arc::new(1, 3).key());
        assert_eq!(Arc::new(3, 1).key(), EdgeKey(1, 3));
        assert_eq!(Arc::new(3, 1).reversed(), Arc::new(1, 3));
    }

    #[test]
    fn triangle_edges_close_the_loop() {
        let tri = Triangle::new(4, 7, 2);
        assert_eq!(tri.vertices(), [4, 7, 2]);
        let [ab, bc, ca] = *tri.edges();
        assert_eq!(ab.to, bc.from);
        assert_eq!(bc.to, ca.from);
        assert_eq!(ca.to, ab.from);
    }

    #[test]
    fn edge_faces_other_side() {
        let edge = EdgeFaces::Interior(FaceId(1), FaceId(2));
        assert_eq!(edge.other(FaceId(1)), Some(FaceId(2)));
        assert_eq!(edge.other(FaceId(2)), Some(FaceId(1)));
        assert_eq!(edge.other(FaceId(3)), None);
        assert_eq!(EdgeFaces::Boundary(FaceId(1)).other(FaceId(1)), None);
    }

    #[test]
    fn edge_faces_rename() {
        let edge = EdgeFaces::Interior(FaceId(1), FaceId(2)).renamed(FaceId(2), FaceId(9));
        assert!(edge.separates(FaceId(9), FaceId(1)));
        assert!(!edge.separates(FaceId(2), FaceId(1)));
    }
}
