//! # 最小二乘与差分工具
//!
//! 一元线性最小二乘拟合（含参数标准误差）、离散梯度和
//! 总体统计量。梯度约定：内部点用中心差分，端点用单侧差分，
//! 输出长度与输入一致。
//!
//! ## 依赖关系
//! - 被 `analysis/diffusion.rs`、`analysis/equilibration.rs` 使用
//! - 无外部模块依赖

use crate::error::{RaspaFlowError, Result};

/// 线性拟合结果 y = slope·x + intercept
#[derive(Debug, Clone, Copy)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

/// 含标准误差的线性拟合结果
///
/// 标准误差来自参数协方差矩阵 s²(XᵀX)⁻¹，s² = RSS/(n−2)。
/// n = 2 时自由度为零，误差为无穷大。
#[derive(Debug, Clone, Copy)]
pub struct LinearFitWithError {
    pub slope: f64,
    pub intercept: f64,
    pub slope_err: f64,
    pub intercept_err: f64,
}

/// 普通最小二乘拟合
pub fn linear_fit(x: &[f64], y: &[f64]) -> Result<LinearFit> {
    validate_xy(x, y)?;

    let n = x.len() as f64;
    let x_mean = mean(x);
    let y_mean = mean(y);

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        sxx += (xi - x_mean) * (xi - x_mean);
        sxy += (xi - x_mean) * (yi - y_mean);
    }

    if sxx == 0.0 {
        return Err(RaspaFlowError::InvalidSeries {
            reason: format!("all {} x values are identical, fit is singular", n),
        });
    }

    let slope = sxy / sxx;
    Ok(LinearFit {
        slope,
        intercept: y_mean - slope * x_mean,
    })
}

/// 普通最小二乘拟合，附参数标准误差
pub fn linear_fit_with_error(x: &[f64], y: &[f64]) -> Result<LinearFitWithError> {
    let fit = linear_fit(x, y)?;

    let n = x.len() as f64;
    let x_mean = mean(x);

    let mut sxx = 0.0;
    let mut rss = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        sxx += (xi - x_mean) * (xi - x_mean);
        let residual = yi - (fit.slope * xi + fit.intercept);
        rss += residual * residual;
    }

    let (slope_err, intercept_err) = if x.len() > 2 {
        let s2 = rss / (n - 2.0);
        (
            (s2 / sxx).sqrt(),
            (s2 * (1.0 / n + x_mean * x_mean / sxx)).sqrt(),
        )
    } else {
        (f64::INFINITY, f64::INFINITY)
    };

    Ok(LinearFitWithError {
        slope: fit.slope,
        intercept: fit.intercept,
        slope_err,
        intercept_err,
    })
}

/// 离散梯度，单位步长；端点单侧差分，内部中心差分
pub fn gradient(y: &[f64]) -> Vec<f64> {
    let n = y.len();
    if n < 2 {
        return vec![0.0; n];
    }

    let mut out = Vec::with_capacity(n);
    out.push(y[1] - y[0]);
    for i in 1..n - 1 {
        out.push((y[i + 1] - y[i - 1]) / 2.0);
    }
    out.push(y[n - 1] - y[n - 2]);
    out
}

/// 算术平均
pub fn mean(x: &[f64]) -> f64 {
    x.iter().sum::<f64>() / x.len() as f64
}

/// 总体标准差（除以 n，不是 n−1）
pub fn population_std(x: &[f64]) -> f64 {
    let m = mean(x);
    (x.iter().map(|&v| (v - m) * (v - m)).sum::<f64>() / x.len() as f64).sqrt()
}

fn validate_xy(x: &[f64], y: &[f64]) -> Result<()> {
    if x.len() != y.len() {
        return Err(RaspaFlowError::InvalidSeries {
            reason: format!("x and y have different lengths ({} vs {})", x.len(), y.len()),
        });
    }
    if x.len() < 2 {
        return Err(RaspaFlowError::InvalidSeries {
            reason: format!("need at least 2 points for a linear fit, got {}", x.len()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_line_is_recovered() {
        let x: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|&v| 3.5 * v - 2.0).collect();

        let fit = linear_fit_with_error(&x, &y).unwrap();
        assert!((fit.slope - 3.5).abs() < 1e-12);
        assert!((fit.intercept + 2.0).abs() < 1e-10);
        assert!(fit.slope_err < 1e-10);
    }

    #[test]
    fn test_noisy_line_has_finite_errors() {
        let x: Vec<f64> = (1..=100).map(|i| i as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, &v)| 2.0 * v + 0.3 * (i as f64).sin())
            .collect();

        let fit = linear_fit_with_error(&x, &y).unwrap();
        assert!((fit.slope - 2.0).abs() < 0.01);
        assert!(fit.slope_err.is_finite());
        assert!(fit.slope_err > 0.0);
    }

    #[test]
    fn test_two_point_fit_has_infinite_errors() {
        let fit = linear_fit_with_error(&[0.0, 1.0], &[0.0, 2.0]).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!(fit.slope_err.is_infinite());
    }

    #[test]
    fn test_degenerate_fit_is_rejected() {
        assert!(linear_fit(&[1.0], &[1.0]).is_err());
        assert!(linear_fit(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]).is_err());
        assert!(linear_fit(&[1.0, 2.0], &[1.0]).is_err());
    }

    #[test]
    fn test_gradient_edge_handling() {
        let y = [0.0, 1.0, 4.0, 9.0, 16.0];
        let g = gradient(&y);

        assert_eq!(g.len(), 5);
        assert!((g[0] - 1.0).abs() < 1e-12); // one-sided
        assert!((g[1] - 2.0).abs() < 1e-12); // central
        assert!((g[2] - 4.0).abs() < 1e-12);
        assert!((g[4] - 7.0).abs() < 1e-12); // one-sided
    }

    #[test]
    fn test_population_std() {
        let x = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((population_std(&x) - 2.0).abs() < 1e-12);
        assert!((mean(&x) - 5.0).abs() < 1e-12);
    }
}
