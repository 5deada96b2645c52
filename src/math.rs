//! Vector math shared by the scoring engine and providers.

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if the vectors have different lengths, are empty, or have
/// zero magnitude. The result is in [-1.0, 1.0].
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Element-wise arithmetic mean of a set of equal-length vectors.
///
/// Vectors whose length differs from the first are ignored. Returns `None`
/// when no usable vector remains.
pub fn mean_vector<'a, I>(vectors: I) -> Option<Vec<f32>>
where
    I: IntoIterator<Item = &'a [f32]>,
{
    let mut iter = vectors.into_iter();
    let first = iter.next()?;
    if first.is_empty() {
        return None;
    }

    let mut sum: Vec<f32> = first.to_vec();
    let mut count = 1usize;

    for v in iter {
        if v.len() != sum.len() {
            continue;
        }
        for (acc, x) in sum.iter_mut().zip(v.iter()) {
            *acc += x;
        }
        count += 1;
    }

    let n = count as f32;
    for acc in sum.iter_mut() {
        *acc /= n;
    }
    Some(sum)
}
