//! In-place radix-2 Cooley-Tukey FFT over split real/imaginary buffers.

use std::f64::consts::PI;

/// Performs an in-place FFT. `real` and `imag` must share the same
/// power-of-2 length.
pub fn fft(real: &mut [f64], imag: &mut [f64]) {
    let n = real.len();
    debug_assert_eq!(n, imag.len());
    debug_assert!(n.is_power_of_two() || n <= 1);
    if n <= 1 {
        return;
    }

    // Bit-reversal permutation.
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            real.swap(i, j);
            imag.swap(i, j);
        }
    }

    // Butterflies.
    let mut size = 2;
    while size <= n {
        let half = size >> 1;
        let angle = -2.0 * PI / size as f64;
        let (step_re, step_im) = (angle.cos(), angle.sin());

        let mut start = 0;
        while start < n {
            let (mut w_re, mut w_im) = (1.0f64, 0.0f64);
            for k in 0..half {
                let lo = start + k;
                let hi = lo + half;

                let t_re = w_re * real[hi] - w_im * imag[hi];
                let t_im = w_re * imag[hi] + w_im * real[hi];

                real[hi] = real[lo] - t_re;
                imag[hi] = imag[lo] - t_im;
                real[lo] += t_re;
                imag[lo] += t_im;

                let next_re = w_re * step_re - w_im * step_im;
                let next_im = w_re * step_im + w_im * step_re;
                w_re = next_re;
                w_im = next_im;
            }
            start += size;
        }
        size <<= 1;
    }
}

/// Next power of two >= `n`.
pub fn next_pow2(n: usize) -> usize {
    let mut p = 1;
    while p < n {
        p <<= 1;
    }
    p
}
