//! # CIF 晶胞参数解析器
//!
//! 只提取 `_cell_length_*` / `_cell_angle_*` 六个标签，原子坐标等
//! 其余内容由 RASPA 自己读取，这里不需要。
//!
//! ## CIF 格式说明
//! ```text
//! _cell_length_a    25.832(5)
//! _cell_length_b    25.832(5)
//! _cell_length_c    25.832(5)
//! _cell_angle_alpha 90.0
//! _cell_angle_beta  90.0
//! _cell_angle_gamma 90.0
//! ```
//! 数值后括号内是实验不确定度，解析时剥离。
//!
//! ## 依赖关系
//! - 被 `commands/prepare/`、`commands/analyze/diffusion.rs` 使用
//! - 使用 `models/cell.rs`

use crate::error::{RaspaFlowError, Result};
use crate::models::UnitCell;
use std::fs;
use std::path::Path;

/// 解析 CIF 文件的晶胞参数
pub fn parse_cif_cell(path: &Path) -> Result<UnitCell> {
    let content = fs::read_to_string(path).map_err(|e| RaspaFlowError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_cif_cell_content(&content, &path.display().to_string())
}

/// 从字符串内容解析晶胞参数
pub fn parse_cif_cell_content(content: &str, path: &str) -> Result<UnitCell> {
    let a = find_numeric_tag(content, "_cell_length_a", path)?;
    let b = find_numeric_tag(content, "_cell_length_b", path)?;
    let c = find_numeric_tag(content, "_cell_length_c", path)?;
    let alpha = find_numeric_tag(content, "_cell_angle_alpha", path)?;
    let beta = find_numeric_tag(content, "_cell_angle_beta", path)?;
    let gamma = find_numeric_tag(content, "_cell_angle_gamma", path)?;

    Ok(UnitCell::new(a, b, c, alpha, beta, gamma))
}

/// 查找标签并解析数值，剥离不确定度括号
fn find_numeric_tag(content: &str, tag: &str, path: &str) -> Result<f64> {
    for line in content.lines() {
        let line = line.trim();
        let mut tokens = line.split_whitespace();

        if tokens.next() == Some(tag) {
            let raw = tokens.next().ok_or_else(|| RaspaFlowError::ParseError {
                format: "cif".to_string(),
                path: path.to_string(),
                reason: format!("Tag {} has no value", tag),
            })?;

            // "25.832(5)" -> "25.832"
            let numeric = raw.split('(').next().unwrap_or(raw);
            return numeric.parse::<f64>().map_err(|_| RaspaFlowError::ParseError {
                format: "cif".to_string(),
                path: path.to_string(),
                reason: format!("Cannot parse value of {}: {}", tag, raw),
            });
        }
    }

    Err(RaspaFlowError::ParseError {
        format: "cif".to_string(),
        path: path.to_string(),
        reason: format!("Missing tag: {}", tag),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const IRMOF: &str = r#"
data_IRMOF-1
_symmetry_space_group_name_H-M   'P 1'
_cell_length_a    25.832(5)
_cell_length_b    25.832(5)
_cell_length_c    25.832(5)
_cell_angle_alpha 90.0
_cell_angle_beta  90.0
_cell_angle_gamma 90.0
loop_
_atom_site_label
_atom_site_fract_x
Zn1 0.2934
"#;

    #[test]
    fn test_parse_cell_parameters() {
        let cell = parse_cif_cell_content(IRMOF, "IRMOF-1.cif").unwrap();

        assert!((cell.a - 25.832).abs() < 1e-10);
        assert!((cell.b - 25.832).abs() < 1e-10);
        assert!((cell.gamma - 90.0).abs() < 1e-10);
    }

    #[test]
    fn test_uncertainty_parentheses_are_stripped() {
        let content = "_cell_length_a 10.5(3)\n_cell_length_b 11.0\n_cell_length_c 12.0\n\
                       _cell_angle_alpha 90.0\n_cell_angle_beta 95.5(12)\n_cell_angle_gamma 90.0\n";
        let cell = parse_cif_cell_content(content, "test.cif").unwrap();

        assert!((cell.a - 10.5).abs() < 1e-10);
        assert!((cell.beta - 95.5).abs() < 1e-10);
    }

    #[test]
    fn test_missing_tag_is_an_error() {
        let content = "_cell_length_a 10.0\n_cell_length_b 10.0\n";
        let result = parse_cif_cell_content(content, "broken.cif");

        assert!(matches!(result, Err(RaspaFlowError::ParseError { .. })));
    }
}
