//! Summary statistics over observation coordinates.

/// Arithmetic mean. `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Running per-axis mean of 3D points.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Centroid3 {
    sum: [f64; 3],
    count: usize,
}

impl Centroid3 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, x: f64, y: f64, z: f64) {
        self.sum[0] += x;
        self.sum[1] += y;
        self.sum[2] += z;
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Mean (x, y, z), or `None` if nothing was pushed.
    pub fn mean(&self) -> Option<[f64; 3]> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some([self.sum[0] / n, self.sum[1] / n, self.sum[2] / n])
    }
}
