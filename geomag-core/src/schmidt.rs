//! Schmidt semi-normalization of associated Legendre functions

use crate::FloatValue;
use ndarray::Array2;

/// Schmidt semi-normalization factor for degree `n` and order `m`
///
/// $$ S_n^0 = 1, \qquad S_n^m = \sqrt{2 \frac{(n-m)!}{(n+m)!}} \quad (m > 0) $$
///
/// The factorial ratio is accumulated as a product of reciprocals so that it
/// stays representable for any degree. There is no term with `m > n`; its
/// factor is zero.
pub fn schmidt(n: usize, m: usize) -> FloatValue {
    if m > n {
        return 0.0;
    }
    if m == 0 {
        return 1.0;
    }

    // (n-m)! / (n+m)! = 1 / ((n-m+1) (n-m+2) ... (n+m))
    let ratio = ((n - m + 1)..=(n + m)).fold(1.0, |acc, k| acc / k as FloatValue);
    (2.0 * ratio).sqrt()
}

/// Memoized Schmidt factors for every `(n, m)` with `m <= n <= max_degree`
#[derive(Debug, Clone)]
pub struct SchmidtTable {
    factors: Array2<FloatValue>,
}

impl SchmidtTable {
    pub fn new(max_degree: usize) -> Self {
        let mut factors = Array2::zeros((max_degree + 1, max_degree + 1));
        for n in 0..=max_degree {
            for m in 0..=n {
                factors[[n, m]] = schmidt(n, m);
            }
        }
        Self { factors }
    }

    pub fn max_degree(&self) -> usize {
        self.factors.nrows() - 1
    }

    /// Factor for `(n, m)`
    ///
    /// # Panics
    /// Panics if `n` exceeds the degree the table was built for.
    pub fn get(&self, n: usize, m: usize) -> FloatValue {
        self.factors[[n, m]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn factorial(n: usize) -> FloatValue {
        (1..=n).fold(1.0, |acc, k| acc * k as FloatValue)
    }

    #[test]
    fn test_zonal_factor_is_one() {
        for n in 0..=13 {
            assert_eq!(schmidt(n, 0), 1.0);
        }
    }

    #[test]
    fn test_diagonal_factor() {
        for n in 1..=13 {
            let expected = (2.0 / factorial(2 * n)).sqrt();
            assert_relative_eq!(schmidt(n, n), expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_known_values() {
        // S_1^1 = sqrt(2 * 0! / 2!) = 1
        assert_relative_eq!(schmidt(1, 1), 1.0, max_relative = 1e-15);
        // S_2^1 = sqrt(2 * 1! / 3!) = sqrt(1/3)
        assert_relative_eq!(schmidt(2, 1), (1.0_f64 / 3.0).sqrt(), max_relative = 1e-15);
        // S_3^2 = sqrt(2 * 1! / 5!) = sqrt(1/60)
        assert_relative_eq!(schmidt(3, 2), (1.0_f64 / 60.0).sqrt(), max_relative = 1e-15);
    }

    #[test]
    fn test_order_above_degree_is_zero() {
        assert_eq!(schmidt(2, 5), 0.0);
        assert_eq!(schmidt(0, 1), 0.0);
        assert_eq!(schmidt(3, usize::MAX), 0.0);
    }

    #[test]
    fn test_table_matches_function() {
        let table = SchmidtTable::new(13);
        assert_eq!(table.max_degree(), 13);
        for n in 0..=13 {
            for m in 0..=n {
                assert_eq!(table.get(n, m), schmidt(n, m));
            }
        }
    }
}
