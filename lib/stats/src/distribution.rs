//! Distribution tails used for p-values
//!
//! Thin wrappers over `statrs`. A distribution that cannot be built (zero or
//! non-finite degrees of freedom) has no p-value; callers get `NaN`, which
//! `MeasureResult::new` turns into the not-applicable sentinel.

use statrs::distribution::{ChiSquared, ContinuousCDF, Normal, StudentsT};

/// Standard normal CDF
pub fn normal_cdf(z: f64) -> f64 {
    Normal::new(0.0, 1.0).map(|n| n.cdf(z)).unwrap_or(f64::NAN)
}

/// Two-tailed p-value of a standard normal z-score
pub fn normal_two_tailed(z: f64) -> f64 {
    Normal::new(0.0, 1.0)
        .map(|n| (2.0 * n.sf(z.abs())).min(1.0))
        .unwrap_or(f64::NAN)
}

/// Student's t CDF with `df` degrees of freedom
pub fn student_t_cdf(t: f64, df: f64) -> f64 {
    StudentsT::new(0.0, 1.0, df).map(|d| d.cdf(t)).unwrap_or(f64::NAN)
}

/// Two-tailed p-value of a t statistic
pub fn student_t_two_tailed(t: f64, df: f64) -> f64 {
    if t.is_infinite() {
        return 0.0;
    }
    StudentsT::new(0.0, 1.0, df)
        .map(|d| (2.0 * d.sf(t.abs())).clamp(0.0, 1.0))
        .unwrap_or(f64::NAN)
}

/// Upper tail of the chi-square distribution
pub fn chi_square_sf(x: f64, df: f64) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    ChiSquared::new(df)
        .map(|d| d.sf(x).clamp(0.0, 1.0))
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_normal() {
        assert!(close(normal_cdf(0.0), 0.5, 1e-14));
        assert!(close(normal_cdf(1.959_963_984_540_054), 0.975, 1e-10));
        assert!(close(normal_two_tailed(-2.835_324_055_553_439), 0.004_577_922_357_685_61, 1e-10));
        assert!(close(normal_two_tailed(0.0), 1.0, 1e-14));
    }

    #[test]
    fn test_student_t() {
        // t = 2.228 at df = 10 is the 97.5% quantile
        assert!(close(student_t_two_tailed(2.228_138_851_986_274, 10.0), 0.05, 1e-9));
        assert!(close(student_t_two_tailed(-2.228_138_851_986_274, 10.0), 0.05, 1e-9));
        assert!(close(student_t_cdf(0.0, 7.0), 0.5, 1e-14));
        assert!(close(student_t_cdf(-1.0, 1.0), 0.25, 1e-12));
        assert_eq!(student_t_two_tailed(f64::INFINITY, 4.0), 0.0);
    }

    #[test]
    fn test_chi_square() {
        assert!(close(chi_square_sf(3.841_458_820_694_124, 1.0), 0.05, 1e-9));
        assert!(close(chi_square_sf(5.622_857_142_857_143, 2.0), 0.060_119_046_664_806_46, 1e-10));
        assert_eq!(chi_square_sf(0.0, 3.0), 1.0);
    }

    #[test]
    fn test_invalid_degrees_of_freedom() {
        assert!(student_t_two_tailed(1.0, 0.0).is_nan());
        assert!(chi_square_sf(1.0, f64::NAN).is_nan());
    }
}
