use nalgebra::Vector3;

/// Identifier of a stable basin a trajectory can commit to, as defined by the
/// committor analysis of the external engine.
pub type BasinId = i64;

/// An ordered n×3 array of per-particle vectors.
///
/// A `Frame` holds one vector per particle, indexed identically to the
/// particle-identity list held by the engine. The same shape is used for
/// positions (Å) and velocities (Å/fs). A frame captured as a starting
/// configuration is never mutated in place; advancing the sampler always
/// produces a new frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    rows: Vec<Vector3<f64>>,
}

impl Frame {
    pub fn new(rows: Vec<Vector3<f64>>) -> Self {
        Self { rows }
    }

    /// Builds a frame from raw `[x, y, z]` triples.
    pub fn from_rows(rows: &[[f64; 3]]) -> Self {
        Self {
            rows: rows.iter().map(|r| Vector3::new(r[0], r[1], r[2])).collect(),
        }
    }

    pub fn n_particles(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vector3<f64>] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vector3<f64>> {
        self.rows.iter()
    }
}

impl std::ops::Index<usize> for Frame {
    type Output = Vector3<f64>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.rows[index]
    }
}
