//! # MSER 平衡检测
//!
//! 用边际标准误差准则 (Marginal Standard Error Rule) 定位 GCMC
//! 时间序列的平衡起点，并给出平衡段平均值、积分自相关时间和
//! 可选口径的不确定度。
//!
//! MSER 截断点取批均值序列上 g(d) = Σ(bᵢ − b̄_d)² / (n−d)² 的
//! 最小值位置：截断过早残留漂移推高分子，截断过晚样本数下降推高
//! 分母，最小值即漂移与统计噪声的折中点。
//!
//! ## 依赖关系
//! - 使用 `analysis/regression.rs` 的统计量
//! - 被 `commands/analyze/equilibration.rs` 使用

use crate::analysis::regression::{mean, population_std};

/// 平衡段不确定度口径
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uncertainty {
    /// 总体标准差
    Sd,
    /// 标准误差 SD/√n
    Se,
    /// 去相关子采样后的标准差
    USd,
    /// 去相关标准误差 SD/√n_uncorr
    USe,
}

/// 一个观测量的平衡分析结果
#[derive(Debug, Clone, Copy)]
pub struct Equilibration {
    /// 平衡起点（原始序列下标）
    pub t0: usize,
    /// 平衡段平均值
    pub average: f64,
    /// 所选口径的不确定度
    pub uncertainty: f64,
    /// 积分自相关时间（帧）
    pub ac_time: f64,
    /// 去相关样本数
    pub uncorrelated_samples: f64,
}

/// MSER 截断点，返回原始序列下标
///
/// 序列先压缩为大小 `batch_size` 的批均值（尾部不足一批丢弃），
/// 在批均值上扫描截断点；至少保留两个批。
pub fn mser_t0(data: &[f64], batch_size: usize) -> usize {
    let batch_size = batch_size.max(1);
    let n_batches = data.len() / batch_size;
    if n_batches < 3 {
        return 0;
    }

    let batch_means: Vec<f64> = (0..n_batches)
        .map(|i| mean(&data[i * batch_size..(i + 1) * batch_size]))
        .collect();

    let mut best_d = 0;
    let mut best_g = f64::INFINITY;
    for d in 0..=n_batches - 2 {
        let tail = &batch_means[d..];
        let tail_mean = mean(tail);
        let sum_sq: f64 = tail.iter().map(|&b| (b - tail_mean) * (b - tail_mean)).sum();
        let g = sum_sq / ((tail.len() * tail.len()) as f64);

        if g < best_g {
            best_g = g;
            best_d = d;
        }
    }

    best_d * batch_size
}

/// 积分自相关时间与去相关样本数
///
/// τ = 1 + 2·Σρ(k)，自相关函数在首个非正值处截断。
/// 去相关样本数为 n/τ。
pub fn autocorrelation_time(data: &[f64]) -> (f64, f64) {
    let n = data.len();
    if n < 2 {
        return (1.0, n as f64);
    }

    let data_mean = mean(data);
    let centered: Vec<f64> = data.iter().map(|&v| v - data_mean).collect();
    let variance: f64 = centered.iter().map(|&v| v * v).sum::<f64>() / n as f64;

    if variance == 0.0 {
        // 常数序列没有可测的相关
        return (1.0, n as f64);
    }

    let mut tau = 1.0;
    for k in 1..n {
        let covariance: f64 = centered[..n - k]
            .iter()
            .zip(&centered[k..])
            .map(|(&a, &b)| a * b)
            .sum::<f64>()
            / n as f64;
        let rho = covariance / variance;
        if rho <= 0.0 {
            break;
        }
        tau += 2.0 * rho;
    }

    (tau, n as f64 / tau)
}

/// 平衡段平均值与所选口径的不确定度
pub fn equilibrated_average(
    data: &[f64],
    t0: usize,
    uncertainty: Uncertainty,
    ac_time: f64,
) -> (f64, f64) {
    let equilibrated = &data[t0.min(data.len())..];
    if equilibrated.is_empty() {
        return (f64::NAN, f64::NAN);
    }

    let average = mean(equilibrated);
    let sd = population_std(equilibrated);
    let n = equilibrated.len() as f64;
    let n_uncorr = (n / ac_time.max(1.0)).max(1.0);

    let value = match uncertainty {
        Uncertainty::Sd => sd,
        Uncertainty::Se => sd / n.sqrt(),
        Uncertainty::USd => {
            let stride = ac_time.max(1.0).ceil() as usize;
            let subsampled: Vec<f64> = equilibrated.iter().step_by(stride).copied().collect();
            if subsampled.len() > 1 {
                population_std(&subsampled)
            } else {
                sd
            }
        }
        Uncertainty::USe => sd / n_uncorr.sqrt(),
    };

    (average, value)
}

/// 对单个观测量执行完整平衡分析
pub fn equilibrate(data: &[f64], batch_size: usize, uncertainty: Uncertainty) -> Equilibration {
    let t0 = mser_t0(data, batch_size);
    let (ac_time, uncorrelated_samples) = autocorrelation_time(&data[t0..]);
    let (average, uncertainty) = equilibrated_average(data, t0, uncertainty, ac_time);

    Equilibration {
        t0,
        average,
        uncertainty,
        ac_time,
        uncorrelated_samples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noisy_constant(n: usize, level: f64) -> Vec<f64> {
        (0..n)
            .map(|i| level + 0.1 * ((i as f64) * 0.7).sin())
            .collect()
    }

    #[test]
    fn test_stationary_series_starts_at_zero() {
        let data = noisy_constant(500, 40.0);
        assert_eq!(mser_t0(&data, 5), 0);
    }

    #[test]
    fn test_initial_transient_is_truncated() {
        // 前 100 帧从 0 线性爬升到 40，之后平稳
        let mut data: Vec<f64> = (0..100).map(|i| 0.4 * i as f64).collect();
        data.extend(noisy_constant(400, 40.0));

        let t0 = mser_t0(&data, 5);
        assert!(t0 >= 80);
        assert!(t0 <= 120);

        let result = equilibrate(&data, 5, Uncertainty::Sd);
        assert!((result.average - 40.0).abs() < 0.5);
    }

    #[test]
    fn test_constant_series_has_unit_correlation_time() {
        let data = vec![7.0; 200];
        let (tau, n_uncorr) = autocorrelation_time(&data);
        assert!((tau - 1.0).abs() < 1e-12);
        assert!((n_uncorr - 200.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlated_series_has_fewer_uncorrelated_samples() {
        // 慢变正弦：强相关
        let data: Vec<f64> = (0..400).map(|i| (i as f64 * 0.02).sin()).collect();
        let (tau, n_uncorr) = autocorrelation_time(&data);
        assert!(tau > 5.0);
        assert!(n_uncorr < 100.0);
    }

    #[test]
    fn test_uncertainty_kinds_are_ordered() {
        let data = noisy_constant(1000, 10.0);
        let (_, sd) = equilibrated_average(&data, 0, Uncertainty::Sd, 4.0);
        let (_, se) = equilibrated_average(&data, 0, Uncertainty::Se, 4.0);
        let (_, use_) = equilibrated_average(&data, 0, Uncertainty::USe, 4.0);

        assert!(se < use_);
        assert!(use_ < sd);
    }
}
