//! Orthonormal DCT-II for the cepstral projection.

use std::f64::consts::PI;

/// Precomputes the DCT-II matrix with orthonormal scaling.
///
/// Returns `[num_ceps][num_inputs]`; multiplying a log mel energy vector by
/// row `k` yields cepstral coefficient `k`.
pub fn dct_matrix(num_ceps: usize, num_inputs: usize) -> Vec<Vec<f64>> {
    let n = num_inputs as f64;
    let mut rows = Vec::with_capacity(num_ceps);
    for k in 0..num_ceps {
        let scale = if k == 0 {
            (1.0 / n).sqrt()
        } else {
            (2.0 / n).sqrt()
        };
        let row = (0..num_inputs)
            .map(|m| scale * (PI * k as f64 * (m as f64 + 0.5) / n).cos())
            .collect();
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_input_maps_to_first_coefficient() {
        let dct = dct_matrix(4, 8);
        let input = vec![3.0; 8];

        let coeffs: Vec<f64> = dct
            .iter()
            .map(|row| row.iter().zip(&input).map(|(w, x)| w * x).sum())
            .collect();

        // c0 = 3 * sqrt(8), all higher coefficients vanish.
        assert!((coeffs[0] - 3.0 * 8.0f64.sqrt()).abs() < 1e-12);
        for &c in &coeffs[1..] {
            assert!(c.abs() < 1e-12);
        }
    }

    #[test]
    fn rows_are_orthonormal() {
        let dct = dct_matrix(5, 16);
        for (i, a) in dct.iter().enumerate() {
            for (j, b) in dct.iter().enumerate() {
                let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!(
                    (dot - expected).abs() < 1e-12,
                    "rows {i},{j}: dot = {dot}"
                );
            }
        }
    }
}
