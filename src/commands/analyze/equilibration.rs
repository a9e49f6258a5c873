//! # analyze equilibration 子命令实现
//!
//! 对逐周期 CSV 的每个观测量做 MSER 平衡分析，多组分混合气
//! 附加两两选择性，结果写入 `stats_<T>_<P>.csv` 并打印表格。
//! 多个压力点并行处理。
//!
//! ## 依赖关系
//! - 使用 `cli/analyze.rs::EquilibrationArgs`
//! - 使用 `analysis/equilibration.rs`
//! - 使用 `rayon` 并行、`tabled` 显示结果

use rayon::prelude::*;
use std::fs;
use std::path::Path;
use tabled::{Table, Tabled};

use crate::analysis::equilibration::{self, Uncertainty};
use crate::cli::analyze::{EquilibrationArgs, EquilibrationRule};
use crate::error::{RaspaFlowError, Result};
use crate::models::Composition;
use crate::utils::output;

/// 一个观测量的平衡统计
///
/// 选择性行没有平衡点和自相关时间，相应字段为 None。
#[derive(Debug, Clone)]
struct ObservableStats {
    average: f64,
    uncertainty: f64,
    equilibrated_frames: Option<u64>,
    ac_time: Option<f64>,
    uncorrelated_samples: Option<f64>,
}

/// 终端表格行
#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Observable")]
    observable: String,
    #[tabled(rename = "Mean")]
    mean: String,
    #[tabled(rename = "Uncertainty")]
    uncertainty: String,
    #[tabled(rename = "Eq. frames")]
    frames: String,
    #[tabled(rename = "AC time")]
    ac_time: String,
    #[tabled(rename = "N uncorr.")]
    uncorrelated: String,
}

/// 执行 equilibration 子命令
pub fn execute(args: EquilibrationArgs) -> Result<()> {
    output::print_header("Analyzing Equilibration");

    let pressures = parse_pressures(&args.pressures)?;

    let jobs = if args.jobs == 0 {
        num_cpus::get()
    } else {
        args.jobs
    };
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| RaspaFlowError::Other(e.to_string()))?;

    let results: Result<Vec<(f64, Vec<(String, ObservableStats)>)>> = pool.install(|| {
        pressures
            .par_iter()
            .map(|&pressure| process_pressure(&args, pressure).map(|stats| (pressure, stats)))
            .collect()
    });

    for (pressure, stats) in results? {
        output::print_info(&format!(
            "T = {} K, P = {} Pa ({} observables)",
            args.temperature,
            pressure,
            stats.len()
        ));

        let rows: Vec<StatRow> = stats
            .iter()
            .map(|(name, s)| StatRow {
                observable: name.clone(),
                mean: format!("{:.7}", s.average),
                uncertainty: format!("{:.7}", s.uncertainty),
                frames: format_option(s.equilibrated_frames.map(|v| v.to_string())),
                ac_time: format_option(s.ac_time.map(|v| format!("{:.3}", v))),
                uncorrelated: format_option(
                    s.uncorrelated_samples.map(|v| format!("{:.1}", v)),
                ),
            })
            .collect();
        println!("{}", Table::new(&rows));
    }

    output::print_done(&format!(
        "Equilibration statistics written for {} pressure point(s)",
        pressures.len()
    ));
    Ok(())
}

fn format_option(value: Option<String>) -> String {
    value.unwrap_or_else(|| "NaN".to_string())
}

/// 处理单个压力点：读取 CSV、平衡分析、写统计文件
fn process_pressure(
    args: &EquilibrationArgs,
    pressure: f64,
) -> Result<Vec<(String, ObservableStats)>> {
    let csv_path = args
        .output_folder
        .join(format!("raspa_{:.6}_{:.0}.csv", args.temperature, pressure));
    let (names, columns) = read_cycle_csv(&csv_path)?;
    let n_cycles = columns.first().map(|c| c.len()).unwrap_or(0) as u64;

    let uncertainty: Uncertainty = args.uncertainty.into();
    let mut stats: Vec<(String, ObservableStats)> = Vec::new();

    match args.equilibration_rule {
        // global: 以总吸附量的平衡点截断所有观测量
        EquilibrationRule::Global => {
            let total = names
                .iter()
                .position(|name| name == "N_ads")
                .ok_or_else(|| RaspaFlowError::ParseError {
                    format: "csv".to_string(),
                    path: csv_path.display().to_string(),
                    reason: "Missing N_ads column".to_string(),
                })?;
            let t0 = equilibration::mser_t0(&columns[total], args.batch_size);

            for (name, column) in names.iter().zip(columns.iter()) {
                let (ac_time, uncorrelated) =
                    equilibration::autocorrelation_time(&column[t0.min(column.len())..]);
                let (average, unc) =
                    equilibration::equilibrated_average(column, t0, uncertainty, ac_time);

                stats.push((
                    name.clone(),
                    ObservableStats {
                        average,
                        uncertainty: unc,
                        equilibrated_frames: Some(n_cycles - t0 as u64),
                        ac_time: Some(ac_time),
                        uncorrelated_samples: Some(uncorrelated),
                    },
                ));
            }
        }
        // individual: 每个观测量用自己的平衡点
        EquilibrationRule::Individual => {
            for (name, column) in names.iter().zip(columns.iter()) {
                let result = equilibration::equilibrate(column, args.batch_size, uncertainty);
                stats.push((
                    name.clone(),
                    ObservableStats {
                        average: result.average,
                        uncertainty: result.uncertainty,
                        equilibrated_frames: Some(n_cycles - result.t0 as u64),
                        ac_time: Some(result.ac_time),
                        uncorrelated_samples: Some(result.uncorrelated_samples),
                    },
                ));
            }
        }
    }

    if args.composition.len() > 1 {
        append_selectivities(&args.composition, &mut stats)?;
    }

    write_stats_csv(&args.output_folder, args.temperature, pressure, &stats)?;
    Ok(stats)
}

/// 读取逐周期 CSV，返回观测量名称和数据列
///
/// `cycle` 列是行号，`step` 列是累计步数，都不参与平衡分析。
fn read_cycle_csv(path: &Path) -> Result<(Vec<String>, Vec<Vec<f64>>)> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(RaspaFlowError::CsvError)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(RaspaFlowError::CsvError)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let keep: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(i, name)| *i != 0 && name.as_str() != "step")
        .map(|(i, _)| i)
        .collect();

    let names: Vec<String> = keep.iter().map(|&i| headers[i].clone()).collect();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); keep.len()];

    for record in reader.records() {
        let record = record.map_err(RaspaFlowError::CsvError)?;
        for (slot, &i) in keep.iter().enumerate() {
            let field = record.get(i).unwrap_or("");
            let value = field.parse::<f64>().map_err(|_| RaspaFlowError::ParseError {
                format: "csv".to_string(),
                path: path.display().to_string(),
                reason: format!("Non-numeric field '{}' in column {}", field, names[slot]),
            })?;
            columns[slot].push(value);
        }
    }

    if columns.first().map(|c| c.is_empty()).unwrap_or(true) {
        return Err(RaspaFlowError::ParseError {
            format: "csv".to_string(),
            path: path.display().to_string(),
            reason: "No data rows found".to_string(),
        });
    }

    Ok((names, columns))
}

/// 计算两两选择性并附加到统计列表
///
/// CO2 存在时作为默认分子，其余组分两两组合。不确定度按相对
/// 误差平方和传播。
fn append_selectivities(
    composition: &Composition,
    stats: &mut Vec<(String, ObservableStats)>,
) -> Result<()> {
    let names: Vec<&str> = composition
        .components()
        .iter()
        .map(|(gas, _)| gas.name())
        .collect();

    let pairs: Vec<(&str, &str)> = if names.contains(&"CO2") {
        names
            .iter()
            .filter(|&&name| name != "CO2")
            .map(|&name| ("CO2", name))
            .collect()
    } else {
        let mut pairs = Vec::new();
        for i in 0..names.len() {
            for j in i + 1..names.len() {
                pairs.push((names[i], names[j]));
            }
        }
        pairs
    };

    let fraction_of = |name: &str| {
        composition
            .components()
            .iter()
            .find(|(gas, _)| gas.name() == name)
            .map(|(_, fraction)| *fraction)
            .expect("selectivity pairs are built from the composition")
    };
    let stats_of = |stats: &[(String, ObservableStats)], name: &str| {
        let key = format!("{}_[mol/kg]", name);
        stats
            .iter()
            .find(|(observable, _)| observable == &key)
            .map(|(_, s)| (s.average, s.uncertainty))
            .ok_or_else(|| RaspaFlowError::ParseError {
                format: "csv".to_string(),
                path: key.clone(),
                reason: format!("Missing {} column for selectivity", key),
            })
    };

    let mut selectivities = Vec::new();
    for (numerator, denominator) in pairs {
        let (ads_1, unc_1) = stats_of(stats, numerator)?;
        let (ads_2, unc_2) = stats_of(stats, denominator)?;
        let (frac_1, frac_2) = (fraction_of(numerator), fraction_of(denominator));

        let selectivity = (ads_1 / ads_2) / (frac_1 / frac_2);
        let uncertainty =
            selectivity * ((unc_1 / ads_1).powi(2) + (unc_2 / ads_2).powi(2)).sqrt();

        selectivities.push((
            format!("{}/{}_selectivity", numerator, denominator),
            ObservableStats {
                average: selectivity,
                uncertainty,
                equilibrated_frames: None,
                ac_time: None,
                uncorrelated_samples: None,
            },
        ));
    }

    stats.extend(selectivities);
    Ok(())
}

/// 写统计 CSV 文件
fn write_stats_csv(
    folder: &Path,
    temperature: f64,
    pressure: f64,
    stats: &[(String, ObservableStats)],
) -> Result<()> {
    let mut csv =
        String::from("observable, mean, mean-error, number-equilibrated-frames, correlation-time, ratio\n");

    for (name, s) in stats {
        csv.push_str(&format!(
            "{}, {:.7}, {:.7}, {}, {}, {}\n",
            name,
            s.average,
            s.uncertainty,
            format_option(s.equilibrated_frames.map(|v| v.to_string())),
            format_option(s.ac_time.map(|v| v.to_string())),
            format_option(s.uncorrelated_samples.map(|v| v.to_string())),
        ));
    }

    let path = folder.join(format!("stats_{:.6}_{:.0}.csv", temperature, pressure));
    fs::write(&path, csv).map_err(|e| RaspaFlowError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

/// 解析逗号分隔的压力列表
fn parse_pressures(input: &str) -> Result<Vec<f64>> {
    input
        .split(',')
        .map(|token| {
            token.trim().parse::<f64>().map_err(|_| {
                RaspaFlowError::InvalidArgument(format!("Invalid pressure value: {}", token))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pressures() {
        assert_eq!(parse_pressures("101325").unwrap(), vec![101_325.0]);
        assert_eq!(
            parse_pressures("1000, 2000,3000").unwrap(),
            vec![1000.0, 2000.0, 3000.0]
        );
        assert!(parse_pressures("1000,abc").is_err());
    }

    #[test]
    fn test_selectivity_prefers_co2_numerator() {
        let composition: Composition = r#"{"CO2": 0.5, "N2": 0.5}"#.parse().unwrap();
        let mut stats = vec![
            (
                "CO2_[mol/kg]".to_string(),
                ObservableStats {
                    average: 4.0,
                    uncertainty: 0.4,
                    equilibrated_frames: Some(100),
                    ac_time: Some(2.0),
                    uncorrelated_samples: Some(50.0),
                },
            ),
            (
                "N2_[mol/kg]".to_string(),
                ObservableStats {
                    average: 1.0,
                    uncertainty: 0.1,
                    equilibrated_frames: Some(100),
                    ac_time: Some(2.0),
                    uncorrelated_samples: Some(50.0),
                },
            ),
        ];

        append_selectivities(&composition, &mut stats).unwrap();

        let (name, s) = stats.last().unwrap();
        assert_eq!(name, "CO2/N2_selectivity");
        // (4/1) / (0.5/0.5) = 4，相对误差 sqrt(0.01 + 0.01)
        assert!((s.average - 4.0).abs() < 1e-12);
        assert!((s.uncertainty - 4.0 * 0.02_f64.sqrt()).abs() < 1e-12);
        assert!(s.ac_time.is_none());
    }
}
