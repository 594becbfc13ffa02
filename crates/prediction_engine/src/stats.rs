/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by n). One value → 0.0.
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_std_dev() {
        let xs = [25.0, 23.0, 27.0, 22.0, 24.0];
        assert!((mean(&xs).unwrap() - 24.2).abs() < 1e-12);
        assert!((population_std_dev(&xs).unwrap() - 2.96f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(mean(&[]), None);
        assert_eq!(population_std_dev(&[]), None);
        assert_eq!(population_std_dev(&[20.0]), Some(0.0));
    }
}
