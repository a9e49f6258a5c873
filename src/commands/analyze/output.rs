//! # analyze output 子命令实现
//!
//! 把 RASPA 输出文件中的逐周期吸附量快照展开为 CSV 时间序列，
//! 供后续平衡分析使用。列分隔符是 `,\t`，与下游工具的
//! 读取约定一致。
//!
//! ## 依赖关系
//! - 使用 `cli/analyze.rs::OutputArgs`
//! - 使用 `parsers/raspa_out.rs`

use std::collections::HashMap;
use std::fs;

use crate::cli::analyze::OutputArgs;
use crate::error::{RaspaFlowError, Result};
use crate::parsers::raspa_out::{self, RaspaOutput};
use crate::utils::output;

/// 执行 output 子命令
pub fn execute(args: OutputArgs) -> Result<()> {
    output::print_header("Parsing RASPA Output");

    let data_path = raspa_out::find_output_file(
        &args.output_folder,
        &args.framework_name,
        args.temperature,
        &args.pressure.to_string(),
    )?;
    output::print_info(&format!("Reading '{}'", data_path.display()));

    let parsed = raspa_out::parse_output_file(&data_path)?;
    let to_mol_kg = parsed.supercell_mol_kg_conversion(&data_path.display().to_string())?;

    let csv = build_cycle_csv(
        &parsed,
        args.composition.len(),
        args.cycles,
        args.print_every,
        to_mol_kg,
        &data_path.display().to_string(),
    )?;

    let csv_path = args
        .output_folder
        .join(format!("raspa_{:.6}_{}.csv", args.temperature, args.pressure));
    fs::write(&csv_path, csv).map_err(|e| RaspaFlowError::FileWriteError {
        path: csv_path.display().to_string(),
        source: e,
    })?;

    output::print_success(&format!("Loading series saved to '{}'", csv_path.display()));
    Ok(())
}

/// 构建逐周期 CSV
///
/// 步数计数器每个打印周期前进 max(20, 吸附质数)，与 RASPA 的
/// 每周期移动次数下限一致。
fn build_cycle_csv(
    parsed: &RaspaOutput,
    n_components: usize,
    cycles: u64,
    print_every: u64,
    to_mol_kg: f64,
    path: &str,
) -> Result<String> {
    let missing_component = |index: usize| RaspaFlowError::ParseError {
        format: "raspa output".to_string(),
        path: path.to_string(),
        reason: format!("Missing data for component {}", index),
    };

    let mut header = String::from("cycle,\tstep,\tN_ads");
    for index in 0..n_components {
        let name = parsed
            .components
            .get(index)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| missing_component(index))?;
        header.push_str(&format!(",\t{}_[molecules/uc],\t{}_[mol/kg]", name, name));
    }

    let by_cycle: HashMap<u64, usize> = parsed
        .snapshots
        .iter()
        .enumerate()
        .map(|(i, snapshot)| (snapshot.cycle, i))
        .collect();

    let mut csv = header + "\n";
    let mut steps: u64 = 0;

    for cycle in (0..cycles).step_by(print_every.max(1) as usize) {
        let snapshot = by_cycle
            .get(&cycle)
            .map(|&i| &parsed.snapshots[i])
            .ok_or_else(|| RaspaFlowError::ParseError {
                format: "raspa output".to_string(),
                path: path.to_string(),
                reason: format!("Missing cycle {} block", cycle),
            })?;

        steps += snapshot.adsorbate_count.max(20);
        let mut line = format!("{},\t{},\t{}", cycle, steps, snapshot.adsorbate_count);

        for index in 0..n_components {
            let count = *snapshot
                .component_counts
                .get(index)
                .ok_or_else(|| missing_component(index))?;
            line.push_str(&format!(
                ",\t{:7},\t{:.7}",
                count,
                count as f64 * to_mol_kg
            ));
        }

        csv.push_str(&line);
        csv.push('\n');
    }

    Ok(csv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::raspa_out::parse_output;

    fn sample_output() -> RaspaOutput {
        parse_output(
            "\
Number of unitcells [a]: 2
Number of unitcells [b]: 1
Number of unitcells [c]: 1
Conversion factor molecules/unit cell -> mol/kg:    0.5 [-]

Current cycle: 0 out of 4
Number of Adsorbates: 10 (10 integer, 0 fractional)
Component 0 (CO2), current number of integer/fractional molecules: 10/0

Current cycle: 2 out of 4
Number of Adsorbates: 30 (30 integer, 0 fractional)
Component 0 (CO2), current number of integer/fractional molecules: 30/0
",
        )
    }

    #[test]
    fn test_cycle_csv_layout() {
        let parsed = sample_output();
        let to_mol_kg = parsed.supercell_mol_kg_conversion("test").unwrap();
        let csv = build_cycle_csv(&parsed, 1, 4, 2, to_mol_kg, "test").unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "cycle,\tstep,\tN_ads,\tCO2_[molecules/uc],\tCO2_[mol/kg]");
        // 周期 0: steps = max(20, 10) = 20; 10 molecules * 0.25 mol/kg
        assert_eq!(lines[1], "0,\t20,\t10,\t     10,\t2.5000000");
        // 周期 2: steps = 20 + max(20, 30) = 50
        assert_eq!(lines[2], "2,\t50,\t30,\t     30,\t7.5000000");
    }

    #[test]
    fn test_missing_cycle_is_an_error() {
        let parsed = sample_output();
        let result = build_cycle_csv(&parsed, 1, 4, 1, 0.5, "test");
        assert!(result.is_err());
    }
}
