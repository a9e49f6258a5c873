//! # 烟道气组分数据模型
//!
//! 定义支持的气体分子、对应的 InChIKey 以及能量网格原子类型。
//! 组分配比以保持插入顺序的 JSON 对象形式从命令行传入，
//! 顺序决定 RASPA 输入文件中的组分编号。
//!
//! ## 依赖关系
//! - 被 `commands/prepare/`、`commands/analyze/` 使用
//! - 使用 `serde_json` (preserve_order) 解析配比参数

use std::fmt;
use std::str::FromStr;

use crate::error::{RaspaFlowError, Result};

/// 支持的气体组分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gas {
    Co2,
    N2,
    O2,
    So2,
    H2o,
    Ar,
    Cf4,
    C2h2,
}

impl Gas {
    /// RASPA 分子定义文件使用的名称
    pub fn name(&self) -> &'static str {
        match self {
            Gas::Co2 => "CO2",
            Gas::N2 => "N2",
            Gas::O2 => "O2",
            Gas::So2 => "SO2",
            Gas::H2o => "H2O",
            Gas::Ar => "Ar",
            Gas::Cf4 => "CF4",
            Gas::C2h2 => "C2H2",
        }
    }

    /// 标准 InChIKey，数据库记录用
    pub fn inchikey(&self) -> &'static str {
        match self {
            Gas::Co2 => "CURLTUGMZLYLDI-UHFFFAOYSA-N",
            Gas::N2 => "IJGRMHOSHXDMSA-UHFFFAOYSA-N",
            Gas::O2 => "MYMOFIZGZYHOMD-UHFFFAOYSA-N",
            Gas::So2 => "RAHZWNYVWXNFOC-UHFFFAOYSA-N",
            Gas::H2o => "XLYOFNOQVPJJNP-UHFFFAOYSA-N",
            Gas::Ar => "XKRFYHLGVUSROY-UHFFFAOYSA-N",
            Gas::Cf4 => "TXEYQDLBPFQVAA-UHFFFAOYSA-N",
            Gas::C2h2 => "HSFWRNGVRCDJHI-UHFFFAOYSA-N",
        }
    }

    /// 力场中该分子的原子类型，能量网格按原子类型预计算
    pub fn grid_atom_types(&self) -> &'static [&'static str] {
        match self {
            Gas::Co2 => &["C_co2", "O_co2"],
            Gas::N2 => &["N_n2"],
            Gas::O2 => &["O_o2"],
            Gas::So2 => &["S_so2", "O_so2"],
            Gas::H2o => &["Ow", "Hw", "Lw"],
            Gas::Ar => &["Ar"],
            Gas::Cf4 => &["C_cf4", "F_cf4"],
            Gas::C2h2 => &["H_c2h2", "C_c2h2"],
        }
    }
}

impl FromStr for Gas {
    type Err = RaspaFlowError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "CO2" => Ok(Gas::Co2),
            "N2" => Ok(Gas::N2),
            "O2" => Ok(Gas::O2),
            "SO2" => Ok(Gas::So2),
            "H2O" => Ok(Gas::H2o),
            "Ar" => Ok(Gas::Ar),
            "CF4" => Ok(Gas::Cf4),
            "C2H2" => Ok(Gas::C2h2),
            other => Err(RaspaFlowError::UnknownGas(other.to_string())),
        }
    }
}

impl fmt::Display for Gas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 有序气体组分配比
///
/// JSON 对象的键顺序即组分编号。
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    components: Vec<(Gas, f64)>,
}

impl Composition {
    /// 组分列表 (气体, 摩尔分数)，顺序即组分编号
    pub fn components(&self) -> &[(Gas, f64)] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// 能量网格类型串与网格数量
    pub fn grid_types(&self) -> (String, usize) {
        let atoms: Vec<&str> = self
            .components
            .iter()
            .flat_map(|(gas, _)| gas.grid_atom_types().iter().copied())
            .collect();
        (atoms.join(" "), atoms.len())
    }
}

impl FromStr for Composition {
    type Err = RaspaFlowError;

    /// 解析 JSON 对象参数 (e.g. `{"CO2": 0.85, "N2": 0.15}`)
    fn from_str(s: &str) -> Result<Self> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(s)?;

        let mut components = Vec::with_capacity(map.len());
        for (name, value) in &map {
            let gas: Gas = name.parse()?;
            let fraction = value.as_f64().ok_or_else(|| {
                RaspaFlowError::InvalidArgument(format!(
                    "Fraction of component {} is not a number: {}",
                    name, value
                ))
            })?;
            if fraction <= 0.0 {
                return Err(RaspaFlowError::InvalidArgument(format!(
                    "Fraction of component {} must be positive: {}",
                    name, fraction
                )));
            }
            components.push((gas, fraction));
        }

        if components.is_empty() {
            return Err(RaspaFlowError::InvalidArgument(
                "Gas composition is empty".to_string(),
            ));
        }

        Ok(Composition { components })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_composition_preserves_order() {
        let composition: Composition = r#"{"N2": 0.79, "CO2": 0.15, "O2": 0.06}"#.parse().unwrap();

        let gases: Vec<Gas> = composition.components().iter().map(|(g, _)| *g).collect();
        assert_eq!(gases, vec![Gas::N2, Gas::Co2, Gas::O2]);
        assert!((composition.components()[0].1 - 0.79).abs() < 1e-12);
    }

    #[test]
    fn test_parse_composition_rejects_unknown_gas() {
        let result = r#"{"CH4": 1.0}"#.parse::<Composition>();
        assert!(matches!(result, Err(RaspaFlowError::UnknownGas(_))));
    }

    #[test]
    fn test_parse_composition_rejects_non_positive_fraction() {
        assert!(r#"{"CO2": 0.0}"#.parse::<Composition>().is_err());
        assert!(r#"{}"#.parse::<Composition>().is_err());
    }

    #[test]
    fn test_grid_types_flue_gas() {
        let composition: Composition = r#"{"CO2": 0.9, "H2O": 0.1}"#.parse().unwrap();
        let (types, count) = composition.grid_types();

        assert_eq!(types, "C_co2 O_co2 Ow Hw Lw");
        assert_eq!(count, 5);
    }

    #[test]
    fn test_inchikey_lookup() {
        assert_eq!(Gas::Co2.inchikey(), "CURLTUGMZLYLDI-UHFFFAOYSA-N");
        assert_eq!("Ar".parse::<Gas>().unwrap(), Gas::Ar);
    }
}
