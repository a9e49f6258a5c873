//! # 晶胞几何模块
//!
//! 从 CIF 晶胞参数计算垂直宽度、超胞重复数和分子数估计。
//!
//! RASPA 的垂直方向定义为垂直于 `ab`、`bc`、`ca` 晶面的方向，
//! 各方向长度等于晶胞体积除以另外两个晶格向量叉积的模
//! （`a` 方向宽度 = V / |b×c|，依此类推）。超胞在每个方向上的
//! 垂直宽度必须大于两倍截断半径，否则最小镜像约定会重复计数
//! 周期镜像间的相互作用。
//!
//! ## 依赖关系
//! - 被 `parsers/cif.rs` 构造
//! - 被 `commands/prepare/`、`commands/analyze/diffusion.rs` 使用

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{RaspaFlowError, Result};

/// sin(gamma) 视为数值退化的容差
const DEGENERATE_EPS: f64 = 1e-12;

/// 晶胞参数表示
///
/// 长度单位 Å，角度单位度（CIF 惯例），内部计算转换为弧度。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitCell {
    /// 晶格长度 a (Å)
    pub a: f64,
    /// 晶格长度 b (Å)
    pub b: f64,
    /// 晶格长度 c (Å)
    pub c: f64,
    /// 晶格角 alpha (度)
    pub alpha: f64,
    /// 晶格角 beta (度)
    pub beta: f64,
    /// 晶格角 gamma (度)
    pub gamma: f64,
}

impl UnitCell {
    pub fn new(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        UnitCell {
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
        }
    }

    /// 构建晶体学-笛卡尔变换矩阵，行向量为 a, b, c
    ///
    /// 向量 a 沿 x 轴，向量 b 在 xy 平面内，向量 c 由剪切参数
    /// nu = (cos α − cos γ·cos β) / sin γ 和竖直分量
    /// c·sqrt(1 − cos²β − ν²) 补全。退化或非物理角度组合返回
    /// `NonPhysicalCell` 而不是产生 NaN。
    pub fn basis_matrix(&self) -> Result<[[f64; 3]; 3]> {
        if self.a <= 0.0 || self.b <= 0.0 || self.c <= 0.0 {
            return Err(RaspaFlowError::NonPhysicalCell {
                reason: format!(
                    "non-positive cell length (a={}, b={}, c={})",
                    self.a, self.b, self.c
                ),
            });
        }

        let cos_alpha = self.alpha.to_radians().cos();
        let cos_beta = self.beta.to_radians().cos();
        let cos_gamma = self.gamma.to_radians().cos();
        let sin_gamma = self.gamma.to_radians().sin();

        if sin_gamma.abs() < DEGENERATE_EPS {
            return Err(RaspaFlowError::NonPhysicalCell {
                reason: format!("sin(gamma) vanishes for gamma = {} degrees", self.gamma),
            });
        }

        let nu = (cos_alpha - cos_gamma * cos_beta) / sin_gamma;
        let height_sq = 1.0 - cos_beta * cos_beta - nu * nu;
        if height_sq < 0.0 {
            return Err(RaspaFlowError::NonPhysicalCell {
                reason: format!(
                    "angles alpha={}, beta={}, gamma={} do not span a parallelepiped",
                    self.alpha, self.beta, self.gamma
                ),
            });
        }

        Ok([
            [self.a, 0.0, 0.0],
            [self.b * cos_gamma, self.b * sin_gamma, 0.0],
            [self.c * cos_beta, self.c * nu, self.c * height_sq.sqrt()],
        ])
    }

    /// 晶胞体积 (Å³)，三个基向量的混合积
    pub fn volume(&self) -> Result<f64> {
        let m = self.basis_matrix()?;
        Ok(dot(cross(m[0], m[1]), m[2]))
    }

    /// 三个垂直宽度 `[V/|b×c|, V/|c×a|, V/|a×b|]` (Å)
    ///
    /// 对任何物理有效的晶胞严格为正。
    pub fn perpendicular_widths(&self) -> Result<[f64; 3]> {
        let m = self.basis_matrix()?;

        let axb = cross(m[0], m[1]);
        let bxc = cross(m[1], m[2]);
        let cxa = cross(m[2], m[0]);

        let volume = dot(axb, m[2]);

        Ok([
            volume / norm(bxc),
            volume / norm(cxa),
            volume / norm(axb),
        ])
    }

    /// 最大垂直宽度，作为孔道限制直径的上界估计 (Å)
    pub fn max_perpendicular_width(&self) -> Result<f64> {
        let widths = self.perpendicular_widths()?;
        Ok(widths.iter().fold(f64::NEG_INFINITY, |m, w| m.max(*w)))
    }

    /// 超胞重复数：每方向 ceil(2·cutoff / w)
    ///
    /// 保证重复后每个垂直宽度不小于 2·cutoff，且为满足该条件的
    /// 最小整数。
    pub fn replication(&self, cutoff: f64) -> Result<Replication> {
        if cutoff <= 0.0 {
            return Err(RaspaFlowError::InvalidCutoff { value: cutoff });
        }

        let widths = self.perpendicular_widths()?;
        let counts = widths.map(|w| (2.0 * cutoff / w).ceil() as u32);
        Ok(Replication(counts))
    }

    /// 估计超胞中的分子数：round(超胞体积 / cutoff³)
    ///
    /// 保证截断半径球内平均落有若干分子。这是规模估计，
    /// 不是堆积算法。
    pub fn molecule_count(&self, cutoff: f64, replication: Replication) -> Result<u64> {
        if cutoff <= 0.0 {
            return Err(RaspaFlowError::InvalidCutoff { value: cutoff });
        }

        let volume = self.volume()?;
        Ok((replication.total() as f64 * volume / cutoff.powi(3)).round() as u64)
    }
}

/// 超胞重复数三元组 (nx, ny, nz)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replication(pub [u32; 3]);

impl Replication {
    /// 超胞中晶胞总数
    pub fn total(&self) -> u64 {
        self.0.iter().map(|&n| n as u64).product()
    }
}

impl fmt::Display for Replication {
    /// RASPA `UnitCells` 关键字格式: "nx ny nz"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.0[0], self.0[1], self.0[2])
    }
}

impl FromStr for Replication {
    type Err = RaspaFlowError;

    /// 解析命令行覆盖值，逗号或空格分隔 (e.g. "2,2,3")
    fn from_str(s: &str) -> Result<Self> {
        let counts: Vec<u32> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(|t| t.parse::<u32>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| {
                RaspaFlowError::InvalidArgument(format!("Error parsing unit cells: {}", s))
            })?;

        if counts.len() != 3 || counts.contains(&0) {
            return Err(RaspaFlowError::InvalidArgument(format!(
                "Error parsing unit cells: {} (expected three positive integers)",
                s
            )));
        }

        Ok(Replication([counts[0], counts[1], counts[2]]))
    }
}

fn cross(u: [f64; 3], v: [f64; 3]) -> [f64; 3] {
    [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ]
}

fn dot(u: [f64; 3], v: [f64; 3]) -> f64 {
    u[0] * v[0] + u[1] * v[1] + u[2] * v[2]
}

fn norm(u: [f64; 3]) -> f64 {
    dot(u, u).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cubic_widths_equal_edge_length() {
        let cell = UnitCell::new(10.0, 10.0, 10.0, 90.0, 90.0, 90.0);
        let widths = cell.perpendicular_widths().unwrap();

        for w in widths {
            assert!((w - 10.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_cubic_volume() {
        let cell = UnitCell::new(5.0, 5.0, 5.0, 90.0, 90.0, 90.0);
        assert!((cell.volume().unwrap() - 125.0).abs() < 1e-10);
    }

    #[test]
    fn test_triclinic_volume_matches_closed_form() {
        let cell = UnitCell::new(5.0, 6.0, 7.0, 80.0, 95.0, 105.0);

        let (ca, cb, cg) = (
            80.0_f64.to_radians().cos(),
            95.0_f64.to_radians().cos(),
            105.0_f64.to_radians().cos(),
        );
        let expected = 5.0
            * 6.0
            * 7.0
            * (1.0 - ca * ca - cb * cb - cg * cg + 2.0 * ca * cb * cg).sqrt();

        assert!((cell.volume().unwrap() - expected).abs() < 1e-8);
    }

    #[test]
    fn test_hexagonal_widths() {
        let cell = UnitCell::new(3.0, 3.0, 5.0, 90.0, 90.0, 120.0);
        let widths = cell.perpendicular_widths().unwrap();

        let in_plane = 3.0 * 120.0_f64.to_radians().sin();
        assert!((widths[0] - in_plane).abs() < 1e-10);
        assert!((widths[1] - in_plane).abs() < 1e-10);
        assert!((widths[2] - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_degenerate_gamma_is_rejected() {
        let cell = UnitCell::new(5.0, 5.0, 5.0, 90.0, 90.0, 0.0);
        assert!(matches!(
            cell.perpendicular_widths(),
            Err(RaspaFlowError::NonPhysicalCell { .. })
        ));

        let cell = UnitCell::new(5.0, 5.0, 5.0, 90.0, 90.0, 180.0);
        assert!(cell.basis_matrix().is_err());
    }

    #[test]
    fn test_non_physical_angle_combination_is_rejected() {
        // 1 − cos²β − ν² < 0 for this combination
        let cell = UnitCell::new(5.0, 5.0, 5.0, 120.0, 30.0, 30.0);
        assert!(matches!(
            cell.basis_matrix(),
            Err(RaspaFlowError::NonPhysicalCell { .. })
        ));
    }

    #[test]
    fn test_non_positive_length_is_rejected() {
        let cell = UnitCell::new(-1.0, 5.0, 5.0, 90.0, 90.0, 90.0);
        assert!(cell.basis_matrix().is_err());
    }

    #[test]
    fn test_replication_covers_twice_the_cutoff_minimally() {
        let cell = UnitCell::new(10.0, 14.0, 27.0, 90.0, 90.0, 90.0);
        let cutoff = 12.8;
        let Replication(counts) = cell.replication(cutoff).unwrap();
        let widths = cell.perpendicular_widths().unwrap();

        for (n, w) in counts.iter().zip(widths.iter()) {
            assert!(*n as f64 * w >= 2.0 * cutoff);
            assert!((*n as f64 - 1.0) * w < 2.0 * cutoff);
        }
        assert_eq!(counts, [3, 2, 1]);
    }

    #[test]
    fn test_replication_rejects_non_positive_cutoff() {
        let cell = UnitCell::new(10.0, 10.0, 10.0, 90.0, 90.0, 90.0);
        assert!(matches!(
            cell.replication(0.0),
            Err(RaspaFlowError::InvalidCutoff { .. })
        ));
    }

    #[test]
    fn test_molecule_count_scales_with_replication() {
        // V = 1000 Å³, cutoff = 10 Å: exactly one molecule per unit cell
        let cell = UnitCell::new(10.0, 10.0, 10.0, 90.0, 90.0, 90.0);

        let single = cell.molecule_count(10.0, Replication([1, 1, 1])).unwrap();
        let eightfold = cell.molecule_count(10.0, Replication([2, 2, 2])).unwrap();

        assert_eq!(single, 1);
        assert_eq!(eightfold, 8 * single);
    }

    #[test]
    fn test_replication_display_and_parse() {
        let replication = Replication([2, 3, 1]);
        assert_eq!(replication.to_string(), "2 3 1");

        assert_eq!("2,3,1".parse::<Replication>().unwrap(), replication);
        assert_eq!("2 3 1".parse::<Replication>().unwrap(), replication);
        assert!("2,3".parse::<Replication>().is_err());
        assert!("2,0,1".parse::<Replication>().is_err());
    }
}
