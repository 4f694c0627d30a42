//! Feature table and cosine similarity
//!
//! Feature vectors are stored flat (`frames × dims`) and L2-normalized once,
//! so cosine similarity between two frames is a plain dot product.
//!
//! # Example
//!
//! ```
//! use loop_finder::matching::similarity::FeatureTable;
//!
//! let table = FeatureTable::from_frames(vec![vec![3.0, 4.0], vec![4.0, 3.0]])?;
//! assert!((table.similarity(0, 0) - 1.0).abs() < 1e-6);
//! assert!((table.similarity(0, 1) - 0.96).abs() < 1e-6);
//! # Ok::<(), loop_finder::AnalysisError>(())
//! ```

use crate::error::AnalysisError;

/// Numerical stability epsilon added to every norm
const EPSILON: f64 = 1e-10;

/// Unit-norm feature vectors, one per analysis frame
#[derive(Debug, Clone)]
pub struct FeatureTable {
    data: Vec<f32>,
    frames: usize,
    dims: usize,
}

impl FeatureTable {
    /// Build a table from per-frame vectors and L2-normalize every row
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the vectors differ in length.
    pub fn from_frames(frames: Vec<Vec<f32>>) -> Result<Self, AnalysisError> {
        let dims = frames.first().map(|f| f.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(frames.len() * dims);

        for (index, frame) in frames.iter().enumerate() {
            if frame.len() != dims {
                return Err(AnalysisError::InvalidInput(format!(
                    "Feature frame {} has {} values, expected {}",
                    index,
                    frame.len(),
                    dims
                )));
            }
            data.extend_from_slice(frame);
        }

        let mut table = Self {
            data,
            frames: frames.len(),
            dims,
        };
        table.normalize();
        Ok(table)
    }

    fn normalize(&mut self) {
        if self.dims == 0 {
            return;
        }
        for row in self.data.chunks_exact_mut(self.dims) {
            let norm = row
                .iter()
                .map(|&x| x as f64 * x as f64)
                .sum::<f64>()
                .sqrt()
                + EPSILON;
            for x in row.iter_mut() {
                *x = (*x as f64 / norm) as f32;
            }
        }
    }

    /// Number of frames `T`
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Feature dimension
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Normalized feature vector of frame `index`
    pub fn row(&self, index: usize) -> &[f32] {
        &self.data[index * self.dims..(index + 1) * self.dims]
    }

    /// Cosine similarity between frames `i` and `j`, in [-1, 1]
    ///
    /// Panics if either index is out of range.
    pub fn similarity(&self, i: usize, j: usize) -> f64 {
        self.row(i)
            .iter()
            .zip(self.row(j))
            .map(|(&a, &b)| a as f64 * b as f64)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_similarity_is_one() {
        let table = FeatureTable::from_frames(vec![
            vec![0.3, -1.2, 4.5, 0.01],
            vec![-7.0, 2.0, 0.5, 3.3],
            vec![1e-3, 2e-3, -5e-4, 1e-4],
        ])
        .unwrap();

        for i in 0..table.frames() {
            let sim = table.similarity(i, i);
            assert!((sim - 1.0).abs() < 1e-6, "frame {} self-similarity {}", i, sim);
        }
    }

    #[test]
    fn test_rows_are_unit_norm() {
        let table =
            FeatureTable::from_frames(vec![vec![10.0, 0.0, 0.0], vec![1.0, 1.0, 1.0]]).unwrap();
        for i in 0..table.frames() {
            let norm: f32 = table.row(i).iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_opposite_and_orthogonal() {
        let table = FeatureTable::from_frames(vec![
            vec![1.0, 0.0],
            vec![-2.0, 0.0],
            vec![0.0, 5.0],
        ])
        .unwrap();
        assert!((table.similarity(0, 1) + 1.0).abs() < 1e-6);
        assert!(table.similarity(0, 2).abs() < 1e-6);
        assert!((table.similarity(1, 2) - table.similarity(2, 1)).abs() < 1e-12);
    }

    #[test]
    fn test_zero_vector_stays_finite() {
        let table = FeatureTable::from_frames(vec![vec![0.0, 0.0], vec![1.0, 0.0]]).unwrap();
        assert_eq!(table.similarity(0, 1), 0.0);
        assert!(table.similarity(0, 0).is_finite());
    }

    #[test]
    fn test_ragged_frames_rejected() {
        let result = FeatureTable::from_frames(vec![vec![1.0, 2.0], vec![1.0]]);
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
    }

    #[test]
    fn test_empty_table() {
        let table = FeatureTable::from_frames(vec![]).unwrap();
        assert_eq!(table.frames(), 0);
        assert_eq!(table.dims(), 0);
    }
}
