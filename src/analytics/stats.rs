//! Descriptive statistics over finite float slices.
//!
//! All functions take non-null values only; callers drop nulls first.
//! Empty input yields `None` rather than an error.

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median (average of the two middle values for even counts).
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Sample standard deviation (ddof = 1). `None` with fewer than two values.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Pearson correlation between a series and its position index,
/// clamped to [-1, 1]. `None` when undefined (fewer than two values,
/// or a constant series with zero variance).
pub fn index_correlation(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let mean_x = (n - 1) as f64 / 2.0;
    let mean_y = mean(values)?;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[5.0]), Some(5.0));
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_std_dev() {
        assert_eq!(std_dev(&[]), None);
        assert_eq!(std_dev(&[5.0]), None);

        // Sample std of [2, 4, 4, 4, 5, 5, 7, 9] is ~2.138
        let s = std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((s - 2.13809).abs() < 1e-4);
    }

    #[test]
    fn test_index_correlation_monotone() {
        let up = index_correlation(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((up - 1.0).abs() < 1e-9);

        let down = index_correlation(&[9.0, 6.0, 3.0]).unwrap();
        assert!((down + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_index_correlation_undefined() {
        assert_eq!(index_correlation(&[]), None);
        assert_eq!(index_correlation(&[1.0]), None);
        // Zero variance in y: correlation is undefined, not zero.
        assert_eq!(index_correlation(&[5.0, 5.0, 5.0]), None);
    }

    #[test]
    fn test_index_correlation_in_range() {
        let r = index_correlation(&[3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0]).unwrap();
        assert!((-1.0..=1.0).contains(&r));
    }
}
