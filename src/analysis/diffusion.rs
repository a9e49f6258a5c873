//! # 扩散区间检测与自扩散系数估计
//!
//! 在 log-log 坐标下定位 MSD 曲线的扩散区间并拟合 Einstein 关系。
//!
//! 模拟得到的 MSD 曲线两端有伪影：起始段是弹道运动（log-log 斜率
//! 约 2），末端受轨迹长度限制而饱和。通过 log(MSD) 对下标的二阶
//! 差分峰将曲线切分为分段，再选出斜率最接近目标幂指数的分段
//! （1.0 = 正常扩散，0.0 = 受限/平台扩散），即可稳健地隔离
//! 线性响应区。
//!
//! 固定常数（15 点峰间隔、0.4 斜率接受容差、1e-8 / 1e-20 单位换算）
//! 是上游科学工作流的经验值，按原样保留以保证数值兼容。
//!
//! ## 依赖关系
//! - 使用 `analysis/regression.rs`
//! - 被 `commands/analyze/diffusion.rs` 使用

use crate::analysis::regression::{self, linear_fit, linear_fit_with_error};
use crate::error::{RaspaFlowError, Result};

/// 二阶差分峰的最小下标间隔
const PEAK_SEPARATION: usize = 15;

/// 分段斜率偏离目标值的接受容差
const SLOPE_TOLERANCE: f64 = 0.4;

/// Å²/ps → m²/s
const ANGSTROM2_PER_PS_TO_M2_PER_S: f64 = 1e-8;

/// Å² → m²
const ANGSTROM2_TO_M2: f64 = 1e-20;

/// 支持二阶差分所需的最少采样点数
const MIN_SERIES_LEN: usize = 30;

/// log-log 曲线的一个分段及其线性拟合
#[derive(Debug, Clone)]
pub struct Segment {
    /// 起始下标（含）
    pub start: usize,
    /// 结束下标（不含）
    pub end: usize,
    /// log-log 斜率
    pub slope: f64,
    /// log-log 截距
    pub intercept: f64,
    /// 分段内原始 MSD 最大值是否超过孔宽平方
    pub exceeds_pore_width: bool,
}

/// 选中的扩散区间
#[derive(Debug, Clone, Copy)]
pub struct Regime {
    pub start: usize,
    pub end: usize,
    pub slope: f64,
    pub intercept: f64,
}

/// 自扩散系数估计结果
#[derive(Debug, Clone, Copy)]
pub enum DiffusivityEstimate {
    /// 正常（Fickian）扩散：D = slope/2，m²/s
    Diffusive { d: f64, d_err: f64 },
    /// 受限扩散：D 为 MSD 渐近平台值，m²
    Confined { d: f64, d_err: f64 },
    /// 未找到满足斜率容差的分段
    Undetermined {
        target_slope: f64,
        closest_slope: f64,
    },
}

impl DiffusivityEstimate {
    /// (值, 不确定度)，未确定时为 (None, None)
    pub fn into_pair(self) -> (Option<f64>, Option<f64>) {
        match self {
            DiffusivityEstimate::Diffusive { d, d_err }
            | DiffusivityEstimate::Confined { d, d_err } => (Some(d), Some(d_err)),
            DiffusivityEstimate::Undetermined { .. } => (None, None),
        }
    }
}

/// 将 log-log MSD 曲线切分为分段并逐段拟合
///
/// 对 log(MSD) 的二阶差分做最小间隔 15 点的峰检测，峰下标为
/// 分段边界；最后一个峰之后若剩余超过 15 点，尾段单独成段。
/// 没有检测到任何峰时整条曲线视为单一分段。
pub fn log_log_segments(
    time: &[f64],
    msd: &[f64],
    pore_limiting_diameter: f64,
) -> Result<Vec<Segment>> {
    validate_series(time, msd)?;

    let time_log: Vec<f64> = time.iter().map(|t| t.log10()).collect();
    let msd_log: Vec<f64> = msd.iter().map(|m| m.log10()).collect();

    // log(MSD) 对下标的二阶差分
    let second_d = regression::gradient(&regression::gradient(&msd_log));

    let mut boundaries = find_peaks(&second_d, PEAK_SEPARATION);

    // 尾段超过 15 点时补上末端边界；无峰时整条曲线为一段
    match boundaries.last() {
        Some(&last) if msd_log.len() - last > PEAK_SEPARATION => boundaries.push(msd_log.len()),
        Some(_) => {}
        None => boundaries.push(msd_log.len()),
    }

    let pld_sq = pore_limiting_diameter * pore_limiting_diameter;

    let mut segments = Vec::with_capacity(boundaries.len());
    let mut start = 0;
    for &end in &boundaries {
        let segment = match linear_fit(&time_log[start..end], &msd_log[start..end]) {
            Ok(fit) => Segment {
                start,
                end,
                slope: fit.slope,
                intercept: fit.intercept,
                exceeds_pore_width: max_value(&msd[start..end]) > pld_sq,
            },
            // 少于两点的分段无法拟合，给无穷斜率使其永不中选
            Err(_) => Segment {
                start,
                end,
                slope: f64::INFINITY,
                intercept: f64::NAN,
                exceeds_pore_width: false,
            },
        };
        segments.push(segment);
        start = end;
    }

    Ok(segments)
}

/// 定位斜率最接近目标幂指数的分段
pub fn find_diffusion_regime(
    time: &[f64],
    msd: &[f64],
    slope_target: f64,
    pore_limiting_diameter: f64,
) -> Result<Regime> {
    let segments = log_log_segments(time, msd, pore_limiting_diameter)?;

    let best = segments
        .iter()
        .min_by(|a, b| {
            (a.slope - slope_target)
                .abs()
                .total_cmp(&(b.slope - slope_target).abs())
        })
        .ok_or_else(|| RaspaFlowError::InvalidSeries {
            reason: "no segments produced by peak detection".to_string(),
        })?;

    Ok(Regime {
        start: best.start,
        end: best.end,
        slope: best.slope,
        intercept: best.intercept,
    })
}

/// 估计某一方向的自扩散系数
///
/// MSD 最大值超过孔宽平方时分子未受限：在目标斜率 1.0 的分段上
/// 用原始数据拟合 MSD = slope·t + intercept，D = slope/2 换算为
/// m²/s。否则分子受限：目标斜率 0.0，D 为分段 MSD 均值（Å² → m²），
/// 不确定度为总体标准差。斜率偏离目标超过 0.4 时返回
/// `Undetermined`，由调用方决定是否增加模拟周期。
pub fn estimate_self_diffusivity(
    time: &[f64],
    msd: &[f64],
    pore_limiting_diameter: f64,
) -> Result<DiffusivityEstimate> {
    validate_series(time, msd)?;

    let pld_sq = pore_limiting_diameter * pore_limiting_diameter;

    if max_value(msd) > pld_sq {
        let regime = find_diffusion_regime(time, msd, 1.0, pore_limiting_diameter)?;

        if (regime.slope - 1.0).abs() < SLOPE_TOLERANCE {
            let fit = linear_fit_with_error(
                &time[regime.start..regime.end],
                &msd[regime.start..regime.end],
            )?;
            Ok(DiffusivityEstimate::Diffusive {
                d: fit.slope / 2.0 * ANGSTROM2_PER_PS_TO_M2_PER_S,
                d_err: fit.slope_err * ANGSTROM2_PER_PS_TO_M2_PER_S,
            })
        } else {
            Ok(DiffusivityEstimate::Undetermined {
                target_slope: 1.0,
                closest_slope: regime.slope,
            })
        }
    } else {
        let regime = find_diffusion_regime(time, msd, 0.0, pore_limiting_diameter)?;

        if regime.slope.abs() < SLOPE_TOLERANCE {
            let segment = &msd[regime.start..regime.end];
            Ok(DiffusivityEstimate::Confined {
                d: regression::mean(segment) * ANGSTROM2_TO_M2,
                d_err: regression::population_std(segment) * ANGSTROM2_TO_M2,
            })
        } else {
            Ok(DiffusivityEstimate::Undetermined {
                target_slope: 0.0,
                closest_slope: regime.slope,
            })
        }
    }
}

/// 局部极大值检测，带最小下标间隔
///
/// 先收集严格高于两侧近邻的候选点，再按高度从高到低贪心保留、
/// 剔除与已保留峰间隔不足的较低峰。返回升序峰下标。
fn find_peaks(y: &[f64], distance: usize) -> Vec<usize> {
    let mut candidates: Vec<usize> = (1..y.len().saturating_sub(1))
        .filter(|&i| y[i] > y[i - 1] && y[i] > y[i + 1])
        .collect();

    candidates.sort_by(|&a, &b| y[b].total_cmp(&y[a]));

    let mut kept: Vec<usize> = Vec::new();
    for i in candidates {
        if kept.iter().all(|&j| i.abs_diff(j) >= distance) {
            kept.push(i);
        }
    }

    kept.sort_unstable();
    kept
}

fn max_value(x: &[f64]) -> f64 {
    x.iter().fold(f64::NEG_INFINITY, |m, &v| m.max(v))
}

fn validate_series(time: &[f64], msd: &[f64]) -> Result<()> {
    if time.len() != msd.len() {
        return Err(RaspaFlowError::InvalidSeries {
            reason: format!(
                "time and msd have different lengths ({} vs {})",
                time.len(),
                msd.len()
            ),
        });
    }
    if time.len() < MIN_SERIES_LEN {
        return Err(RaspaFlowError::InvalidSeries {
            reason: format!(
                "need at least {} samples for regime detection, got {}",
                MIN_SERIES_LEN,
                time.len()
            ),
        });
    }
    if time.windows(2).any(|w| w[1] <= w[0]) {
        return Err(RaspaFlowError::InvalidSeries {
            reason: "time values must be strictly increasing".to_string(),
        });
    }
    if time[0] <= 0.0 {
        return Err(RaspaFlowError::InvalidSeries {
            reason: "time values must be positive for the log transform".to_string(),
        });
    }
    if msd.iter().any(|&m| m <= 0.0) {
        return Err(RaspaFlowError::InvalidSeries {
            reason: "msd values must be positive for the log transform".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time_axis(n: usize, dt: f64) -> Vec<f64> {
        (1..=n).map(|i| i as f64 * dt).collect()
    }

    #[test]
    fn test_perfect_power_law_yields_unit_slope() {
        // msd = 0.2·t: log-log 斜率处处为 1，无二阶差分峰
        let time = time_axis(200, 1.0);
        let msd: Vec<f64> = time.iter().map(|t| 0.2 * t).collect();

        let regime = find_diffusion_regime(&time, &msd, 1.0, 100.0).unwrap();
        assert_eq!(regime.start, 0);
        assert_eq!(regime.end, 200);
        assert!((regime.slope - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_msd_recovers_diffusivity() {
        // msd = 2·D·t（一维），D = 0.1 Å²/ps = 1e-9 m²/s
        let time = time_axis(300, 0.5);
        let msd: Vec<f64> = time
            .iter()
            .enumerate()
            .map(|(i, &t)| 0.2 * t * (1.0 + 0.01 * (i as f64).sin()))
            .collect();

        // max(msd) = 30 > pld² = 25: 未受限
        match estimate_self_diffusivity(&time, &msd, 5.0).unwrap() {
            DiffusivityEstimate::Diffusive { d, d_err } => {
                assert!((d - 1.0e-9).abs() / 1.0e-9 < 0.05);
                assert!(d_err.is_finite());
                assert!(d_err > 0.0);
            }
            other => panic!("expected diffusive estimate, got {:?}", other),
        }
    }

    #[test]
    fn test_plateau_msd_is_confined() {
        // msd 饱和到 25 Å²，远低于 pld² = 400
        let time = time_axis(300, 1.0);
        let msd: Vec<f64> = time.iter().map(|&t| 25.0 * (1.0 - (-t / 5.0).exp())).collect();

        match estimate_self_diffusivity(&time, &msd, 20.0).unwrap() {
            DiffusivityEstimate::Confined { d, d_err } => {
                assert!((d - 25.0e-20).abs() / 25.0e-20 < 0.1);
                assert!(d_err >= 0.0);
            }
            other => panic!("expected confined estimate, got {:?}", other),
        }
    }

    #[test]
    fn test_ballistic_only_curve_is_undetermined() {
        // 纯弹道: msd = c·t²，log-log 斜率 2，远离目标 1
        let time = time_axis(100, 1.0);
        let msd: Vec<f64> = time.iter().map(|&t| 0.5 * t * t).collect();

        match estimate_self_diffusivity(&time, &msd, 1.0).unwrap() {
            DiffusivityEstimate::Undetermined {
                target_slope,
                closest_slope,
            } => {
                assert!((target_slope - 1.0).abs() < 1e-12);
                assert!((closest_slope - 2.0).abs() < 1e-6);
            }
            other => panic!("expected undetermined estimate, got {:?}", other),
        }
    }

    #[test]
    fn test_non_positive_msd_is_a_domain_error() {
        let time = time_axis(50, 1.0);
        let mut msd: Vec<f64> = time.iter().map(|&t| 0.2 * t).collect();
        msd[10] = 0.0;

        assert!(matches!(
            find_diffusion_regime(&time, &msd, 1.0, 10.0),
            Err(RaspaFlowError::InvalidSeries { .. })
        ));
    }

    #[test]
    fn test_short_series_is_rejected() {
        let time = time_axis(10, 1.0);
        let msd: Vec<f64> = time.iter().map(|&t| 0.2 * t).collect();

        assert!(estimate_self_diffusivity(&time, &msd, 10.0).is_err());
    }

    #[test]
    fn test_non_monotonic_time_is_rejected() {
        let mut time = time_axis(50, 1.0);
        time[20] = time[19];
        let msd: Vec<f64> = (0..50).map(|i| 1.0 + i as f64).collect();

        assert!(find_diffusion_regime(&time, &msd, 1.0, 10.0).is_err());
    }

    #[test]
    fn test_find_peaks_enforces_minimum_separation() {
        // 40 点序列，在 10 和 18 处有峰（间隔 8 < 15），30 处有峰
        let mut y = vec![0.0; 40];
        y[10] = 3.0;
        y[18] = 2.0;
        y[30] = 1.5;

        let peaks = find_peaks(&y, 15);
        assert_eq!(peaks, vec![10, 30]);
    }

    #[test]
    fn test_segments_record_pore_width_flag() {
        let time = time_axis(100, 1.0);
        let msd: Vec<f64> = time.iter().map(|&t| 0.5 * t).collect();

        // max(msd) = 50: 超过 pld² = 36
        let segments = log_log_segments(&time, &msd, 6.0).unwrap();
        assert!(segments.iter().any(|s| s.exceeds_pore_width));

        // pld² = 100 > 50: 不超过
        let segments = log_log_segments(&time, &msd, 10.0).unwrap();
        assert!(segments.iter().all(|s| !s.exceeds_pore_width));
    }
}
