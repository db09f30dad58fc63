
// small numeric helpers shared by the evaluation and plotting code

/// Evenly spaced grid of `num_values` points covering [start, end].
pub fn linspace(start: f64, end: f64, num_values: usize) -> Vec<f64> {
    if num_values == 0 {
        return Vec::new();
    }
    if num_values == 1 {
        return vec![start];
    }
    let mut values = Vec::with_capacity(num_values);
    let step = (end - start) / (num_values as f64 - 1.0);

    for i in 0..num_values {
        let value = start + (i as f64 * step);
        values.push(value);
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linspace_endpoints_and_spacing() {
        let grid = linspace(-1.0, 1.0, 5);
        assert_eq!(grid.len(), 5);
        assert_relative_eq!(grid[0], -1.0, epsilon = 1e-12);
        assert_relative_eq!(grid[2], 0.0, epsilon = 1e-12);
        assert_relative_eq!(grid[4], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_linspace_degenerate_counts() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
    }
}
