//! # MSD 数据文件解析器
//!
//! 解析 RASPA MSDOrderN 模块输出的 `msd_self_<gas>_<i>.dat` 表格。
//! 前 6 行是注释头，数据列依次为时间 (ps)、总 MSD、x/y/z 方向
//! MSD (Å²)，其余列忽略。
//!
//! ## 依赖关系
//! - 被 `commands/analyze/diffusion.rs` 使用
//! - 使用 `models` 无；纯数值表格

use std::fs;
use std::path::Path;

use crate::error::{RaspaFlowError, Result};

/// 跳过的注释头行数
const HEADER_LINES: usize = 6;

/// 一个组分的 MSD 时间序列
#[derive(Debug, Clone)]
pub struct MsdSeries {
    /// 模拟时间 (ps)
    pub time: Vec<f64>,
    /// 总 MSD (Å²)
    pub total: Vec<f64>,
    /// x 方向 MSD (Å²)
    pub x: Vec<f64>,
    /// y 方向 MSD (Å²)
    pub y: Vec<f64>,
    /// z 方向 MSD (Å²)
    pub z: Vec<f64>,
}

impl MsdSeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// 解析 MSD 数据文件
pub fn parse_msd_file(path: &Path) -> Result<MsdSeries> {
    let content = fs::read_to_string(path).map_err(|e| RaspaFlowError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_msd_content(&content, &path.display().to_string())
}

/// 从字符串内容解析 MSD 表格
pub fn parse_msd_content(content: &str, path: &str) -> Result<MsdSeries> {
    let mut series = MsdSeries {
        time: Vec::new(),
        total: Vec::new(),
        x: Vec::new(),
        y: Vec::new(),
        z: Vec::new(),
    };

    for (line_no, line) in content.lines().enumerate().skip(HEADER_LINES) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<f64> = line
            .split_whitespace()
            .map(|token| token.parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| RaspaFlowError::ParseError {
                format: "msd".to_string(),
                path: path.to_string(),
                reason: format!("Non-numeric field on line {}", line_no + 1),
            })?;

        if fields.len() < 5 {
            return Err(RaspaFlowError::ParseError {
                format: "msd".to_string(),
                path: path.to_string(),
                reason: format!(
                    "Expected at least 5 columns on line {}, got {}",
                    line_no + 1,
                    fields.len()
                ),
            });
        }

        series.time.push(fields[0]);
        series.total.push(fields[1]);
        series.x.push(fields[2]);
        series.y.push(fields[3]);
        series.z.push(fields[4]);
    }

    if series.is_empty() {
        return Err(RaspaFlowError::ParseError {
            format: "msd".to_string(),
            path: path.to_string(),
            reason: "No data rows found".to_string(),
        });
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(rows: usize) -> String {
        let mut content = String::from(
            "# column 1: time [ps]\n# column 2: msd total [A^2]\n# column 3: msd x\n\
             # column 4: msd y\n# column 5: msd z\n# number of samples\n",
        );
        for i in 1..=rows {
            let t = i as f64 * 0.5;
            content.push_str(&format!(
                "{} {} {} {} {} 1000 1000\n",
                t,
                0.6 * t,
                0.2 * t,
                0.2 * t,
                0.2 * t
            ));
        }
        content
    }

    #[test]
    fn test_parse_skips_header_and_reads_columns() {
        let series = parse_msd_content(&sample(40), "msd_self_CO2_0.dat").unwrap();

        assert_eq!(series.len(), 40);
        assert!((series.time[0] - 0.5).abs() < 1e-12);
        assert!((series.total[1] - 0.6).abs() < 1e-12);
        assert!((series.z[39] - 0.2 * 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_short_rows_are_rejected() {
        let content = "h\nh\nh\nh\nh\nh\n1.0 2.0 3.0\n";
        assert!(parse_msd_content(content, "broken.dat").is_err());
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let content = "h\nh\nh\nh\nh\nh\n";
        assert!(parse_msd_content(content, "empty.dat").is_err());
    }
}
