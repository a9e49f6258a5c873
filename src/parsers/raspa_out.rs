//! # RASPA 输出文件解析器
//!
//! 解析 RASPA 的 `output_*.data` 文本输出。只提取工作流需要的
//! 内容：单位换算因子、超胞晶胞数、逐周期吸附量快照和结束状态。
//!
//! ## 格式片段
//! ```text
//! Number of unitcells [a]: 2
//! Conversion factor molecules/unit cell -> mol/kg:    0.0521650 [-]
//!
//! Current cycle: 1000 out of 10000
//! ...
//! Number of Adsorbates: 64 (64 integer, 0 fractional)
//! Component 0 (CO2), current number of integer/fractional molecules: 48/0
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/analyze/`、`commands/check.rs` 使用
//! - 使用 `regex` 匹配松散格式的行

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RaspaFlowError, Result};

/// 一个打印周期的吸附量快照
#[derive(Debug, Clone)]
pub struct CycleSnapshot {
    /// 周期编号
    pub cycle: u64,
    /// 吸附质分子总数
    pub adsorbate_count: u64,
    /// 各组分分子数，下标即组分编号
    pub component_counts: Vec<u64>,
}

/// 模拟结束状态，取自输出文件最后一个报告块
#[derive(Debug, Clone, Default)]
pub struct RunStatus {
    /// 是否打印了 "Simulation finished"
    pub finished: bool,
    /// 最后报告块中的警告行
    pub warnings: Vec<String>,
    /// 最后报告块中的错误行
    pub errors: Vec<String>,
    /// 守恒能量是否出现 NaN
    pub nan_conserved_energy: bool,
}

/// 解析后的 RASPA 输出
#[derive(Debug, Clone)]
pub struct RaspaOutput {
    /// 各方向晶胞数
    pub unit_cells: Vec<u32>,
    /// 分子数/晶胞 → mol/kg 换算因子（单晶胞）
    pub mol_kg_conversion: Option<f64>,
    /// 组分名称，下标即组分编号
    pub components: Vec<String>,
    /// 逐周期快照
    pub snapshots: Vec<CycleSnapshot>,
    /// 结束状态
    pub status: RunStatus,
}

impl RaspaOutput {
    /// 超胞的 mol/kg 换算因子：单晶胞因子除以晶胞总数
    pub fn supercell_mol_kg_conversion(&self, path: &str) -> Result<f64> {
        let conversion = self.mol_kg_conversion.ok_or_else(|| RaspaFlowError::ParseError {
            format: "raspa output".to_string(),
            path: path.to_string(),
            reason: "Missing molecules/unit cell -> mol/kg conversion factor".to_string(),
        })?;

        if self.unit_cells.is_empty() {
            return Err(RaspaFlowError::ParseError {
                format: "raspa output".to_string(),
                path: path.to_string(),
                reason: "Missing 'Number of unitcells' lines".to_string(),
            });
        }

        let total: u64 = self.unit_cells.iter().map(|&n| n as u64).product();
        Ok(conversion / total as f64)
    }
}

/// 用 glob 定位输出文件 `output_<framework>_*_<T:.6>_<P>.data`
pub fn find_output_file(
    folder: &Path,
    framework_name: &str,
    temperature: f64,
    pressure: &str,
) -> Result<PathBuf> {
    let pattern = folder
        .join(format!(
            "output_{}_*_{:.6}_{}.data",
            framework_name, temperature, pressure
        ))
        .display()
        .to_string();

    let first = glob::glob(&pattern)
        .map_err(|e| RaspaFlowError::InvalidArgument(format!("Bad glob pattern {}: {}", pattern, e)))?
        .filter_map(|entry| entry.ok())
        .next();

    first.ok_or(RaspaFlowError::NoFilesFound { pattern })
}

/// 读取并解析 RASPA 输出文件
pub fn parse_output_file(path: &Path) -> Result<RaspaOutput> {
    let content = fs::read_to_string(path).map_err(|e| RaspaFlowError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(parse_output(&content))
}

/// 解析 RASPA 输出文本
pub fn parse_output(content: &str) -> RaspaOutput {
    let conversion_re =
        Regex::new(r"Conversion factor molecules/unit cell -> mol/kg:\s*([0-9.eE+\-]+)").unwrap();
    let cycle_re = Regex::new(r"Current cycle:\s*(\d+)\s+out of\s+(\d+)").unwrap();
    let adsorbates_re = Regex::new(r"Number of [Aa]dsorbates:\s*(\d+)").unwrap();
    let component_re = Regex::new(
        r"Component\s+(\d+)\s+\(([^)]+)\),\s*current number of integer/fractional(?:/reaction)? molecules:\s*(\d+)",
    )
    .unwrap();

    let lines: Vec<&str> = content.lines().collect();

    let mut unit_cells = Vec::new();
    let mut mol_kg_conversion = None;
    let mut components: Vec<String> = Vec::new();
    let mut snapshots: Vec<CycleSnapshot> = Vec::new();
    let mut nan_conserved_energy = false;

    for line in &lines {
        if line.contains("Number of unitcells") {
            if let Some(value) = line.split(':').nth(1) {
                if let Ok(n) = value.trim().parse::<u32>() {
                    unit_cells.push(n);
                }
            }
        }

        if mol_kg_conversion.is_none() {
            if let Some(caps) = conversion_re.captures(line) {
                mol_kg_conversion = caps[1].parse::<f64>().ok();
            }
        }

        if line.contains("Conserved energy") && line.to_lowercase().contains("nan") {
            nan_conserved_energy = true;
        }

        if let Some(caps) = cycle_re.captures(line) {
            snapshots.push(CycleSnapshot {
                cycle: caps[1].parse().unwrap_or(0),
                adsorbate_count: 0,
                component_counts: Vec::new(),
            });
        } else if let Some(snapshot) = snapshots.last_mut() {
            if let Some(caps) = adsorbates_re.captures(line) {
                snapshot.adsorbate_count = caps[1].parse().unwrap_or(0);
            } else if let Some(caps) = component_re.captures(line) {
                let index: usize = caps[1].parse().unwrap_or(0);
                let name = caps[2].to_string();
                let count: u64 = caps[3].parse().unwrap_or(0);

                if snapshot.component_counts.len() <= index {
                    snapshot.component_counts.resize(index + 1, 0);
                }
                snapshot.component_counts[index] = count;

                if components.len() <= index {
                    components.resize(index + 1, String::new());
                }
                if components[index].is_empty() {
                    components[index] = name;
                }
            }
        }
    }

    RaspaOutput {
        unit_cells,
        mol_kg_conversion,
        components,
        snapshots,
        status: parse_status(&lines, nan_conserved_energy),
    }
}

/// 取最后一个报告块（最后一条 `=` 分隔线之后）分析结束状态
fn parse_status(lines: &[&str], nan_conserved_energy: bool) -> RunStatus {
    let last_separator = lines
        .iter()
        .rposition(|line| line.contains('='))
        .unwrap_or(0);
    let last_block = &lines[last_separator..];

    RunStatus {
        finished: last_block
            .iter()
            .any(|line| line.contains("Simulation finished")),
        warnings: last_block
            .iter()
            .filter(|line| line.contains("WARNING"))
            .map(|line| line.trim().to_string())
            .collect(),
        errors: last_block
            .iter()
            .filter(|line| line.contains("ERROR"))
            .map(|line| line.trim().to_string())
            .collect(),
        nan_conserved_energy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Number of unitcells [a]: 2
Number of unitcells [b]: 2
Number of unitcells [c]: 3

MoleculeDefinitions:
===========================================================================
Conversion factor molecules/unit cell -> mol/kg:    0.0521650 [-]

Current cycle: 0 out of 100

Number of Adsorbates: 40 (40 integer, 0 fractional)
Component 0 (CO2), current number of integer/fractional molecules: 30/0
Component 1 (N2), current number of integer/fractional molecules: 10/0

Current cycle: 50 out of 100

Number of Adsorbates: 52 (52 integer, 0 fractional)
Component 0 (CO2), current number of integer/fractional molecules: 40/0
Component 1 (N2), current number of integer/fractional molecules: 12/0

Conserved energy:   -1204.55 [K]
===========================================================================
Simulation finished on Tuesday, May 2.
";

    #[test]
    fn test_parse_unit_cells_and_conversion() {
        let output = parse_output(SAMPLE);

        assert_eq!(output.unit_cells, vec![2, 2, 3]);
        let per_supercell = output.supercell_mol_kg_conversion("test").unwrap();
        assert!((per_supercell - 0.0521650 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_cycle_snapshots() {
        let output = parse_output(SAMPLE);

        assert_eq!(output.components, vec!["CO2", "N2"]);
        assert_eq!(output.snapshots.len(), 2);
        assert_eq!(output.snapshots[0].cycle, 0);
        assert_eq!(output.snapshots[0].adsorbate_count, 40);
        assert_eq!(output.snapshots[1].component_counts, vec![40, 12]);
    }

    #[test]
    fn test_status_of_finished_run() {
        let output = parse_output(SAMPLE);

        assert!(output.status.finished);
        assert!(output.status.warnings.is_empty());
        assert!(!output.status.nan_conserved_energy);
    }

    #[test]
    fn test_status_detects_nan_and_warnings() {
        let content = "\
Conserved energy: nan [K]
===========================================================================
WARNING: net charge is not zero
Simulation finished on a rainy day.
";
        let output = parse_output(content);

        assert!(output.status.finished);
        assert!(output.status.nan_conserved_energy);
        assert_eq!(output.status.warnings.len(), 1);
    }

    #[test]
    fn test_unfinished_run() {
        let content = "\
Current cycle: 0 out of 100
Number of Adsorbates: 1 (1 integer, 0 fractional)
===========================================================================
ERROR: segmentation fault
";
        let output = parse_output(content);

        assert!(!output.status.finished);
        assert_eq!(output.status.errors.len(), 1);
    }

    #[test]
    fn test_missing_conversion_factor_is_an_error() {
        let output = parse_output("Current cycle: 0 out of 10\n");
        assert!(output.supercell_mol_kg_conversion("test").is_err());
    }
}
