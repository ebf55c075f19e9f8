//! Savitzky-Golay smoothing.
//!
//! Least-squares polynomial smoothing via Gram-polynomial convolution
//! weights. Interior samples use the central weights; the first and last
//! half-windows evaluate the polynomial fitted to the first/last full
//! window, so the output has the same length as the input and no edge
//! artifacts from padding. The filter is pure: the same input always
//! produces the same output.

use throng_core::config::{ConfigError, SavgolConfig};

/// Precomputed Savitzky-Golay convolution weights.
///
/// `weights[t + m][i]` is the contribution of window sample `i` (0-based
/// within the window) to the polynomial evaluated at offset `t` from the
/// window center, for `t` in `[-m, m]`.
#[derive(Clone, Debug)]
pub struct SavgolFilter {
    window: usize,
    half: usize,
    weights: Vec<Vec<f64>>,
}

/// Gram polynomial of order `k` evaluated at integer offset `i`, for a
/// window of half-width `m` (zeroth derivative).
fn gram_poly(i: f64, m: f64, k: usize) -> f64 {
    let mut prev = 0.0; // P_{k-2}
    let mut curr = 1.0; // P_{k-1}, starting from P_0 = 1
    if k == 0 {
        return curr;
    }
    for order in 1..=k {
        let kf = order as f64;
        let a = (4.0 * kf - 2.0) / (kf * (2.0 * m - kf + 1.0));
        let b = ((kf - 1.0) * (2.0 * m + kf)) / (kf * (2.0 * m - kf + 1.0));
        let next = a * i * curr - b * prev;
        prev = curr;
        curr = next;
    }
    curr
}

/// Generalized factorial: `a * (a-1) * ... * (a-b+1)`, with
/// `gen_fact(a, 0) = 1`.
fn gen_fact(a: usize, b: usize) -> f64 {
    let mut product = 1.0;
    for j in (a - b + 1)..=a {
        product *= j as f64;
    }
    product
}

impl SavgolFilter {
    /// Build the weight table for the given window and polynomial order.
    pub fn new(cfg: SavgolConfig) -> Result<Self, ConfigError> {
        if cfg.window % 2 == 0 || cfg.window < 3 {
            return Err(ConfigError::InvalidSmoothing {
                reason: format!("window {} must be odd and at least 3", cfg.window),
            });
        }
        if cfg.poly_order >= cfg.window {
            return Err(ConfigError::InvalidSmoothing {
                reason: format!(
                    "poly_order {} must be less than window {}",
                    cfg.poly_order, cfg.window
                ),
            });
        }

        let half = cfg.window / 2;
        let m = half as f64;
        // Normalization factors per polynomial order, shared by every
        // (i, t) pair.
        let factors: Vec<f64> = (0..=cfg.poly_order)
            .map(|k| {
                (2.0 * k as f64 + 1.0) * gen_fact(2 * half, k) / gen_fact(2 * half + k + 1, k + 1)
            })
            .collect();

        let mut weights = Vec::with_capacity(cfg.window);
        for t_idx in 0..cfg.window {
            let t = t_idx as f64 - m;
            let mut row = Vec::with_capacity(cfg.window);
            for i_idx in 0..cfg.window {
                let i = i_idx as f64 - m;
                let mut w = 0.0;
                for (k, factor) in factors.iter().enumerate() {
                    w += factor * gram_poly(i, m, k) * gram_poly(t, m, k);
                }
                row.push(w);
            }
            weights.push(row);
        }

        Ok(Self {
            window: cfg.window,
            half,
            weights,
        })
    }

    /// Smooth one series.
    ///
    /// Series shorter than the window pass through unchanged.
    pub fn smooth(&self, series: &[f64]) -> Vec<f64> {
        let n = series.len();
        if n < self.window {
            return series.to_vec();
        }

        let m = self.half;
        let center = &self.weights[m];
        let mut out = vec![0.0; n];

        // Leading half-window: evaluate the polynomial fitted to the
        // first full window at offsets -m..-1.
        for (j, out_j) in out.iter_mut().enumerate().take(m) {
            let row = &self.weights[j];
            *out_j = row
                .iter()
                .zip(&series[..self.window])
                .map(|(w, y)| w * y)
                .sum();
        }

        // Interior: plain convolution with the central weights.
        for j in m..(n - m) {
            out[j] = center
                .iter()
                .zip(&series[j - m..j + m + 1])
                .map(|(w, y)| w * y)
                .sum();
        }

        // Trailing half-window, from the last full window.
        let last_window = &series[n - self.window..];
        for j in (n - m)..n {
            let t_idx = j + self.window - n;
            let row = &self.weights[t_idx];
            out[j] = row.iter().zip(last_window).map(|(w, y)| w * y).sum();
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(window: usize, poly_order: usize) -> SavgolFilter {
        SavgolFilter::new(SavgolConfig { window, poly_order }).unwrap()
    }

    #[test]
    fn rejects_even_window() {
        assert!(SavgolFilter::new(SavgolConfig {
            window: 4,
            poly_order: 2
        })
        .is_err());
    }

    #[test]
    fn rejects_order_not_below_window() {
        assert!(SavgolFilter::new(SavgolConfig {
            window: 5,
            poly_order: 5
        })
        .is_err());
    }

    #[test]
    fn central_weights_match_classic_quadratic_kernel() {
        // The window-5, order-2 smoothing kernel is (-3, 12, 17, 12, -3)/35.
        let f = filter(5, 2);
        let expected = [-3.0 / 35.0, 12.0 / 35.0, 17.0 / 35.0, 12.0 / 35.0, -3.0 / 35.0];
        for (w, e) in f.weights[2].iter().zip(expected) {
            assert!((w - e).abs() < 1e-12, "got {w}, expected {e}");
        }
    }

    #[test]
    fn short_series_pass_through() {
        let f = filter(5, 2);
        let series = [1.0, 2.0, 3.0];
        assert_eq!(f.smooth(&series), series.to_vec());
    }

    #[test]
    fn polynomial_data_is_reproduced_exactly() {
        // A quadratic is inside the order-2 model space, so smoothing
        // must reproduce it everywhere, edges included.
        let f = filter(7, 2);
        let series: Vec<f64> = (0..30).map(|i| {
            let x = i as f64;
            0.5 * x * x - 3.0 * x + 2.0
        }).collect();
        let smoothed = f.smooth(&series);
        for (a, b) in series.iter().zip(&smoothed) {
            assert!((a - b).abs() < 1e-8, "expected {a}, got {b}");
        }
    }

    #[test]
    fn constant_series_unchanged() {
        let f = filter(9, 4);
        let series = vec![2.5; 40];
        let smoothed = f.smooth(&series);
        for v in smoothed {
            assert!((v - 2.5).abs() < 1e-10);
        }
    }

    #[test]
    fn noise_amplitude_is_reduced() {
        let f = filter(11, 2);
        // Alternating spikes around a ramp.
        let series: Vec<f64> = (0..60)
            .map(|i| i as f64 * 0.1 + if i % 2 == 0 { 0.5 } else { -0.5 })
            .collect();
        let smoothed = f.smooth(&series);
        let ramp = |i: usize| i as f64 * 0.1;
        let rough: f64 = (20..40).map(|i| (series[i] - ramp(i)).abs()).sum();
        let smooth: f64 = (20..40).map(|i| (smoothed[i] - ramp(i)).abs()).sum();
        assert!(smooth < rough);
    }

    proptest::proptest! {
        /// Any line is inside the polynomial model space, so smoothing
        /// must preserve it up to float noise.
        #[test]
        fn lines_pass_through(slope in -5.0f64..5.0, intercept in -10.0f64..10.0) {
            let f = filter(11, 2);
            let series: Vec<f64> = (0..40).map(|i| slope * i as f64 + intercept).collect();
            let smoothed = f.smooth(&series);
            for (a, b) in series.iter().zip(&smoothed) {
                proptest::prop_assert!((a - b).abs() < 1e-7, "{a} vs {b}");
            }
        }
    }

    #[test]
    fn smoothing_is_deterministic() {
        let f = filter(191, 4);
        let series: Vec<f64> = (0..400).map(|i| (i as f64 * 0.05).sin()).collect();
        assert_eq!(f.smooth(&series), f.smooth(&series));
    }
}
