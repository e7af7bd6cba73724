//! Adjacency-aware mesh over a ring triangulation.
//!
//! Faces live in an arena indexed by [`FaceId`]. Adjacency is an explicit
//! map from undirected edge key to the one or two faces on either side, so
//! merging two faces only has to drop their shared edges and rename the
//! rest.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::error::MorphError;
use crate::geometry::{Point, Ring};

use super::types::{Arc, EdgeFaces, EdgeKey, Face, FaceId, FaceKind, Triangle};

/// Shared-edge graph over a partition of a ring into faces.
#[derive(Debug, Clone)]
pub struct Mesh {
    points: Vec<Point>,
    faces: Vec<Option<Face>>,
    edges: HashMap<EdgeKey, EdgeFaces>,
    live: usize,
}

/// Builds a mesh with one face per triangle.
///
/// Every triangle is stored with positive signed area so that an edge shared
/// by two triangles is walked in opposite directions by each of them.
///
/// # Errors
///
/// Returns [`MorphError::Geometry`] if a triangle references a vertex outside
/// the ring, or if the triangles overlap (an edge walked twice in the same
/// direction, or claimed by more than two triangles).
pub fn build_topology(triangles: &[Triangle], ring: &Ring) -> Result<Mesh, MorphError> {
    let points = ring.points().to_vec();
    let mut faces = Vec::with_capacity(triangles.len());
    let mut edges: HashMap<EdgeKey, EdgeFaces> = HashMap::with_capacity(triangles.len() * 2);
    let mut directed: HashSet<Arc> = HashSet::with_capacity(triangles.len() * 3);

    for tri in triangles {
        let [a, b, c] = tri.vertices();
        let (Some(pa), Some(pb), Some(pc)) = (points.get(a), points.get(b), points.get(c)) else {
            return Err(MorphError::Geometry(format!(
                "triangle ({a}, {b}, {c}) references a vertex outside the ring"
            )));
        };

        let twice_area = pa.cross(*pb, *pc);
        let arcs = if twice_area < 0.0 {
            vec![Arc::new(a, c), Arc::new(c, b), Arc::new(b, a)]
        } else {
            tri.edges().to_vec()
        };

        let id = FaceId(faces.len());
        for arc in &arcs {
            if !directed.insert(*arc) {
                return Err(MorphError::Geometry(format!(
                    "triangles overlap along edge {} -> {}",
                    arc.from, arc.to
                )));
            }
            match edges.entry(arc.key()) {
                Entry::Vacant(slot) => {
                    slot.insert(EdgeFaces::Boundary(id));
                }
                Entry::Occupied(mut slot) => match *slot.get() {
                    EdgeFaces::Boundary(other) => {
                        slot.insert(EdgeFaces::Interior(other, id));
                    }
                    EdgeFaces::Interior(..) => {
                        return Err(MorphError::Geometry(format!(
                            "edge {} -- {} is shared by more than two triangles",
                            arc.from, arc.to
                        )));
                    }
                },
            }
        }

        faces.push(Some(Face {
            loops: vec![arcs],
            area: twice_area.abs() / 2.0,
            kind: FaceKind::Triangle,
        }));
    }

    let live = faces.len();
    Ok(Mesh {
        points,
        faces,
        edges,
        live,
    })
}

impl Mesh {
    /// The ring vertices that arcs index into.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of faces that have not been merged away.
    pub const fn face_count(&self) -> usize {
        self.live
    }

    /// Looks up a live face.
    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id.0).and_then(Option::as_ref)
    }

    /// Iterates over live faces in id order.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &Face)> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.as_ref().map(|f| (FaceId(i), f)))
    }

    /// Faces on either side of an undirected edge.
    pub fn edge(&self, key: EdgeKey) -> Option<EdgeFaces> {
        self.edges.get(&key).copied()
    }

    /// Iterates over every edge and its incident faces.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeKey, EdgeFaces)> + '_ {
        self.edges.iter().map(|(k, v)| (*k, *v))
    }

    /// Sum of all live face areas.
    pub fn total_area(&self) -> f64 {
        self.faces().map(|(_, f)| f.area).sum()
    }

    /// Faces sharing at least one boundary edge with `id`, in order of first
    /// appearance along its boundary.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvariantViolation`] if `id` is not a live face
    /// or one of its arcs is missing from the edge map.
    pub fn neighbors(&self, id: FaceId) -> Result<Vec<FaceId>, MorphError> {
        let face = self.live_face(id)?;
        let mut neighbors = Vec::new();
        for arc in face.arcs() {
            let edge = self.edges.get(&arc.key()).ok_or_else(|| {
                MorphError::InvariantViolation(format!(
                    "arc {} -> {} of face {} is not in the edge map",
                    arc.from, arc.to, id.0
                ))
            })?;
            if let Some(other) = edge.other(id) {
                if !neighbors.contains(&other) {
                    neighbors.push(other);
                }
            }
        }
        Ok(neighbors)
    }

    /// Merges two adjacent faces into a new face and returns its id.
    ///
    /// Shared edges are dropped and the remaining arcs are chained into
    /// closed loops. The merged area is the exact sum of both areas. Both
    /// input ids stop being live.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvariantViolation`] if either face is not live,
    /// the faces are not adjacent, or the remaining arcs do not form closed
    /// loops.
    pub fn merge(&mut self, a: FaceId, b: FaceId) -> Result<FaceId, MorphError> {
        if a == b {
            return Err(MorphError::InvariantViolation(format!(
                "cannot merge face {} with itself",
                a.0
            )));
        }

        let fa = self.live_face(a)?;
        let fb = self.live_face(b)?;

        let shared: HashSet<EdgeKey> = fa
            .arcs()
            .map(|arc| arc.key())
            .filter(|key| self.edges.get(key).is_some_and(|e| e.separates(a, b)))
            .collect();
        if shared.is_empty() {
            return Err(MorphError::InvariantViolation(format!(
                "faces {} and {} share no edge",
                a.0, b.0
            )));
        }

        let remaining: Vec<Arc> = fa
            .arcs()
            .chain(fb.arcs())
            .filter(|arc| !shared.contains(&arc.key()))
            .copied()
            .collect();
        let area = fa.area + fb.area;
        let loops = chain_loops(&remaining, &self.points)?;

        let id = FaceId(self.faces.len());
        for key in &shared {
            self.edges.remove(key);
        }
        for arc in &remaining {
            let edge = self.edges.get_mut(&arc.key()).ok_or_else(|| {
                MorphError::InvariantViolation(format!(
                    "arc {} -> {} vanished from the edge map",
                    arc.from, arc.to
                ))
            })?;
            *edge = edge.renamed(a, id).renamed(b, id);
        }

        for old in [a, b] {
            if let Some(slot) = self.faces.get_mut(old.0) {
                *slot = None;
            }
        }
        self.faces.push(Some(Face {
            loops,
            area,
            kind: FaceKind::Polygon,
        }));
        self.live -= 1;

        Ok(id)
    }

    /// Resolves a face's outer loop to coordinates, in boundary order.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvariantViolation`] if the face is not live or
    /// references a missing vertex.
    pub fn face_ring(&self, id: FaceId) -> Result<Ring, MorphError> {
        let face = self.live_face(id)?;
        face.outer()
            .iter()
            .map(|arc| self.vertex(arc.from))
            .collect::<Result<Vec<_>, _>>()
            .map(Ring::new)
    }

    fn live_face(&self, id: FaceId) -> Result<&Face, MorphError> {
        self.face(id).ok_or_else(|| {
            MorphError::InvariantViolation(format!("face {} is not part of the mesh", id.0))
        })
    }

    fn vertex(&self, index: usize) -> Result<Point, MorphError> {
        self.points.get(index).copied().ok_or_else(|| {
            MorphError::InvariantViolation(format!("vertex {index} is outside the ring"))
        })
    }
}

/// Chains directed arcs into closed loops, largest enclosed area first.
///
/// Where the outline touches itself at a vertex the loops through that
/// vertex are spliced into one walk, so a pinched outline still comes out
/// as a single loop.
fn chain_loops(arcs: &[Arc], points: &[Point]) -> Result<Vec<Vec<Arc>>, MorphError> {
    if arcs.is_empty() {
        return Err(MorphError::InvariantViolation(
            "merged face has no boundary".to_string(),
        ));
    }

    let mut balance: HashMap<usize, i64> = HashMap::new();
    let mut outgoing: HashMap<usize, Vec<usize>> = HashMap::new();
    for arc in arcs.iter().rev() {
        *balance.entry(arc.from).or_default() += 1;
        *balance.entry(arc.to).or_default() -= 1;
        outgoing.entry(arc.from).or_default().push(arc.to);
    }
    if let Some((vertex, _)) = balance.iter().find(|(_, b)| **b != 0) {
        return Err(MorphError::InvariantViolation(format!(
            "boundary does not close at vertex {vertex}"
        )));
    }

    let mut loops = Vec::new();
    for start in arcs.iter().map(|arc| arc.from) {
        let mut stack = vec![start];
        let mut circuit = Vec::new();
        while let Some(&v) = stack.last() {
            if let Some(next) = outgoing.get_mut(&v).and_then(Vec::pop) {
                stack.push(next);
            } else {
                circuit.push(v);
                stack.pop();
            }
        }
        if circuit.len() < 2 {
            continue;
        }
        circuit.reverse();
        let walk: Vec<Arc> = circuit
            .windows(2)
            .filter_map(|w| match *w {
                [from, to] => Some(Arc::new(from, to)),
                _ => None,
            })
            .collect();
        let area = loop_area(&walk, points)?;
        loops.push((area, walk));
    }

    loops.sort_by(|(x, _), (y, _)| y.abs().total_cmp(&x.abs()));
    Ok(loops.into_iter().map(|(_, walk)| walk).collect())
}

fn loop_area(arcs: &[Arc], points: &[Point]) -> Result<f64, MorphError> {
    let mut twice_area = 0.0;
    for arc in arcs {
        let (Some(a), Some(b)) = (points.get(arc.from), points.get(arc.to)) else {
            return Err(MorphError::InvariantViolation(format!(
                "arc {} -> {} references a vertex outside the ring",
                arc.from, arc.to
            )));
        };
        twice_area += a.x.mul_add(b.y, -(b.x * a.y));
    }
    Ok(twice_area / 2.0)
}
