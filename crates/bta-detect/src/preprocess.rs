//! Channel preprocessing ahead of tone detection

use bta_core::error::BtaResult;
use bta_core::invalid_input;

/// Remove the mean from a channel
///
/// Biosignal channels carry electrode DC offsets that would leak into the
/// quadrature envelope; detection always runs on demeaned data.
pub fn demean(samples: &[f64]) -> Vec<f64> {
    if samples.is_empty() {
        return Vec::new();
    }

    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    samples.iter().map(|x| x - mean).collect()
}

/// Element-wise weighted sum of two equal-length channels: `a + weight * b`
///
/// Used to probe linear combinations of electrode channels for a shared
/// tone.
pub fn mix(a: &[f64], b: &[f64], weight: f64) -> BtaResult<Vec<f64>> {
    if a.len() != b.len() {
        return Err(invalid_input!(
            "cannot mix channels of different lengths ({} vs {})",
            a.len(),
            b.len()
        ));
    }

    Ok(a.iter().zip(b.iter()).map(|(x, y)| x + weight * y).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demean_removes_offset() {
        let samples = vec![101.0, 99.0, 101.0, 99.0];
        let centered = demean(&samples);

        assert_eq!(centered, vec![1.0, -1.0, 1.0, -1.0]);
        let residual: f64 = centered.iter().sum();
        assert!(residual.abs() < 1e-12);
    }

    #[test]
    fn test_demean_empty() {
        assert!(demean(&[]).is_empty());
    }

    #[test]
    fn test_mix_weighted_sum() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![10.0, 20.0, 30.0];

        let mixed = mix(&a, &b, 2.0).unwrap();
        assert_eq!(mixed, vec![21.0, 42.0, 63.0]);
    }

    #[test]
    fn test_mix_length_mismatch() {
        let result = mix(&[1.0, 2.0], &[1.0], 2.0);
        assert!(result.is_err());
    }
}
