//! Associated Legendre functions
//!
//! Unnormalized associated Legendre functions $P_n^m(\cos\theta)$ and their
//! derivatives with respect to colatitude, evaluated by recurrence in degree.
//!
//! For $n \ge 1$:
//!
//! $$ P_n^n = \sin\theta \, P_{n-1}^{n-1} $$
//! $$ P_n^m = \frac{(2n-1)\cos\theta \, P_{n-1}^m - (n+m-1) P_{n-2}^m}{n-m}, \quad m < n $$
//!
//! with $P_0^0 = 1$ and terms whose indices fall outside the triangle $m \le n$ taken as zero.
//! The zonal case $m = 0$ is the general recurrence with denominator $n$.

use crate::FloatValue;
use ndarray::Array2;

/// `P[n][m]` and `dP[n][m]` for a single colatitude
///
/// Only the lower triangle `m <= n` is populated.
#[derive(Debug, Clone)]
pub struct LegendreTable {
    p: Array2<FloatValue>,
    dp: Array2<FloatValue>,
}

impl LegendreTable {
    /// Evaluate the table at geocentric colatitude `theta` (radians)
    pub fn compute(theta: FloatValue, max_degree: usize) -> Self {
        let size = max_degree + 1;
        let mut p = Array2::<FloatValue>::zeros((size, size));
        let mut dp = Array2::<FloatValue>::zeros((size, size));

        let (st, ct) = theta.sin_cos();

        p[[0, 0]] = 1.0;
        dp[[0, 0]] = 0.0;

        for n in 1..=max_degree {
            for m in 0..=n {
                if m == n {
                    p[[n, n]] = st * p[[n - 1, n - 1]];
                    dp[[n, n]] = st * dp[[n - 1, n - 1]] + ct * p[[n - 1, n - 1]];
                    continue;
                }

                // P[n-2][m] is outside the triangle when n < 2 or m > n - 2
                let (p2, dp2) = if n >= 2 && m <= n - 2 {
                    (p[[n - 2, m]], dp[[n - 2, m]])
                } else {
                    (0.0, 0.0)
                };

                let a = (2 * n - 1) as FloatValue;
                let b = (n + m - 1) as FloatValue;
                let denominator = (n - m) as FloatValue;

                p[[n, m]] = (a * ct * p[[n - 1, m]] - b * p2) / denominator;
                dp[[n, m]] =
                    (a * (ct * dp[[n - 1, m]] - st * p[[n - 1, m]]) - b * dp2) / denominator;
            }
        }

        Self { p, dp }
    }

    pub fn max_degree(&self) -> usize {
        self.p.nrows() - 1
    }

    /// $P_n^m(\cos\theta)$
    pub fn p(&self, n: usize, m: usize) -> FloatValue {
        self.p[[n, m]]
    }

    /// $\partial P_n^m / \partial\theta$
    pub fn dp(&self, n: usize, m: usize) -> FloatValue {
        self.dp[[n, m]]
    }
}
