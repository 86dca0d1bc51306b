use std::ops::Deref;

/// Fixed-length, L2-normalised embedding.
///
/// Construction normalises; a zero vector stays zero and scores `0.0` against
/// everything.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingVector(Vec<f32>);

impl EmbeddingVector {
    /// Normalises `values` to unit length.
    pub fn normalized(mut values: Vec<f32>) -> Self {
        let norm = values.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut values {
                *x /= norm;
            }
        }
        Self(values)
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Dot product, which is the cosine similarity for two unit vectors.
    ///
    /// Callers check dimensions first; mismatched lengths are a bug upstream.
    #[inline]
    pub fn dot(&self, other: &EmbeddingVector) -> f32 {
        debug_assert_eq!(self.dim(), other.dim());
        self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
    }

    pub fn norm(&self) -> f32 {
        self.0.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }
}

impl Deref for EmbeddingVector {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_has_unit_length() {
        let v = EmbeddingVector::normalized(vec![3.0, 4.0]);
        assert!((v.norm() - 1.0).abs() < 1e-6);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_stays_zero() {
        let v = EmbeddingVector::normalized(vec![0.0; 4]);
        assert_eq!(v.as_slice(), &[0.0; 4]);
        assert_eq!(v.dot(&EmbeddingVector::normalized(vec![1.0, 0.0, 0.0, 0.0])), 0.0);
    }

    #[test]
    fn test_dot_identical_orthogonal_opposite() {
        let a = EmbeddingVector::normalized(vec![1.0, 2.0, 3.0]);
        let b = EmbeddingVector::normalized(vec![2.0, 4.0, 6.0]);
        assert!((a.dot(&b) - 1.0).abs() < 1e-6);

        let x = EmbeddingVector::normalized(vec![1.0, 0.0]);
        let y = EmbeddingVector::normalized(vec![0.0, 1.0]);
        assert!(x.dot(&y).abs() < 1e-6);

        let neg = EmbeddingVector::normalized(vec![-1.0, 0.0]);
        assert!((x.dot(&neg) + 1.0).abs() < 1e-6);
    }
}
