//! Slot usage smoothing and traffic accounting

/// Weight given to the previous smoothed value
pub const SMOOTHING_FACTOR: f64 = 0.8;

/// Fold one slot usage sample into a smoothed vector
///
/// An empty vector is seeded with the sample. Otherwise every overlapping
/// index becomes `s[i] * alpha + (1 - alpha) * x[i]`; indices the sample has
/// beyond the current length are seeded directly.
pub fn smooth(smoothed: &mut Vec<f64>, sample: &[u64], alpha: f64) {
    let overlap = smoothed.len().min(sample.len());
    for (s, &x) in smoothed.iter_mut().zip(&sample[..overlap]) {
        *s = *s * alpha + (1.0 - alpha) * x as f64;
    }
    smoothed.extend(sample[overlap..].iter().map(|&x| x as f64));
}

/// Add every value of a sample to the running traffic total
pub fn accumulate_traffic(total: &mut u64, sample: &[u64]) {
    let sum = sample.iter().fold(0u64, |acc, &v| acc.saturating_add(v));
    *total = total.saturating_add(sum);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_first_sample_seeds() {
        let mut smoothed = Vec::new();
        smooth(&mut smoothed, &[4, 0, 10], SMOOTHING_FACTOR);
        assert_eq!(smoothed, vec![4.0, 0.0, 10.0]);
    }

    #[test]
    fn test_second_sample_weighted() {
        let mut smoothed = Vec::new();
        smooth(&mut smoothed, &[10, 20, 30], SMOOTHING_FACTOR);
        smooth(&mut smoothed, &[0, 40, 30], SMOOTHING_FACTOR);

        assert!(approx_eq(smoothed[0], 0.8 * 10.0 + 0.2 * 0.0));
        assert!(approx_eq(smoothed[1], 0.8 * 20.0 + 0.2 * 40.0));
        assert!(approx_eq(smoothed[2], 30.0));
    }

    #[test]
    fn test_converges_towards_repeated_sample() {
        let mut smoothed = Vec::new();
        smooth(&mut smoothed, &[0], SMOOTHING_FACTOR);

        let mut previous_error = 100.0;
        for _ in 0..20 {
            smooth(&mut smoothed, &[100], SMOOTHING_FACTOR);
            let error = 100.0 - smoothed[0];
            assert!(approx_eq(error, previous_error * 0.8));
            previous_error = error;
        }
        assert!(previous_error < 1.2);
    }

    #[test]
    fn test_longer_sample_extends_vector() {
        let mut smoothed = vec![10.0];
        smooth(&mut smoothed, &[20, 7], SMOOTHING_FACTOR);
        assert!(approx_eq(smoothed[0], 12.0));
        assert_eq!(smoothed[1], 7.0);

        // shorter samples leave the tail alone
        smooth(&mut smoothed, &[12], SMOOTHING_FACTOR);
        assert!(approx_eq(smoothed[0], 12.0));
        assert_eq!(smoothed[1], 7.0);
    }

    #[test]
    fn test_accumulate_traffic() {
        let mut total = 0;
        accumulate_traffic(&mut total, &[1, 2, 3]);
        accumulate_traffic(&mut total, &[]);
        accumulate_traffic(&mut total, &[4]);
        assert_eq!(total, 10);

        let mut total = u64::MAX - 1;
        accumulate_traffic(&mut total, &[5]);
        assert_eq!(total, u64::MAX);
    }
}
