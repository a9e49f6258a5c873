//! # prepare supercell 子命令实现
//!
//! 复制框架 CIF 文件并生成 P1 超胞构建输入
//! `simulation-CreateSupercell.input`（零周期 MonteCarlo 运行，
//! RASPA 只展开超胞并写出 P1 对称性的结构文件）。
//!
//! ## 依赖关系
//! - 使用 `cli/prepare.rs::SupercellArgs`
//! - 使用 `parsers/cif.rs`, `models/cell.rs`, `utils/files.rs`

use crate::cli::prepare::SupercellArgs;
use crate::commands::prepare::{write_input_file, yes_no};
use crate::error::Result;
use crate::models::Replication;
use crate::parsers::cif;
use crate::utils::{files, output};

/// 执行 supercell 子命令
pub fn execute(args: SupercellArgs) -> Result<()> {
    output::print_header("Preparing Supercell Input");

    files::copy_cif_file(
        &args.framework_folder,
        args.framework_source,
        &args.framework_name,
        &args.output_folder,
    )?;

    let cif_path = args.output_folder.join(format!("{}.cif", args.framework_name));

    // 超胞尺寸由最大的截断半径决定，命令行可显式覆盖
    let unit_cells = match args.unit_cells {
        Some(replication) => replication,
        None => cif::parse_cif_cell(&cif_path)?.replication(args.cutoffs.largest())?,
    };
    output::print_info(&format!("Unit cell replication: {}", unit_cells));

    let content = build_input(&args, unit_cells);
    write_input_file(&args.output_folder, "simulation-CreateSupercell.input", &content)?;

    output::print_success(&format!(
        "Wrote simulation-CreateSupercell.input to '{}'",
        args.output_folder.display()
    ));
    Ok(())
}

/// 构建输入文件内容
fn build_input(args: &SupercellArgs, unit_cells: Replication) -> String {
    format!(
        "\
SimulationType                  MonteCarlo
NumberOfCycles                  0                               # int

CutOffVDW                       {cutoff_vdw}                    # float
CutOffChargeCharge              {cutoff_charge_charge}          # float
CutOffChargeBondDipole          {cutoff_charge_bonddipole}     # float
CutOffBondDipoleBondDipole      {cutoff_bonddipole_bonddipole} # float

Framework                       0                               # int
FrameworkName                   {framework_name}                # string
UseChargesFromCIFFile           yes                             # yes / no
RemoveAtomNumberCodeFromLabel   {remove_atom_number_code}       # yes / no
UnitCells                       {unit_cells}                    # int int int
",
        cutoff_vdw = args.cutoffs.cutoff_vdw,
        cutoff_charge_charge = args.cutoffs.cutoff_charge_charge,
        cutoff_charge_bonddipole = args.cutoffs.cutoff_charge_bonddipole,
        cutoff_bonddipole_bonddipole = args.cutoffs.cutoff_bonddipole_bonddipole,
        framework_name = args.framework_name,
        remove_atom_number_code = yes_no(args.remove_atom_number_code),
        unit_cells = unit_cells,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{CutoffArgs, FrameworkSource};
    use std::path::PathBuf;

    fn sample_args() -> SupercellArgs {
        SupercellArgs {
            output_folder: PathBuf::from("out"),
            framework_name: "IRMOF-1".to_string(),
            framework_source: FrameworkSource::Core2019,
            framework_folder: PathBuf::from("frameworks"),
            remove_atom_number_code: false,
            cutoffs: CutoffArgs {
                cutoff_vdw: 12.8,
                cutoff_charge_charge: 12.8,
                cutoff_charge_bonddipole: 12.8,
                cutoff_bonddipole_bonddipole: 12.8,
            },
            unit_cells: None,
        }
    }

    #[test]
    fn test_input_contains_raspa_keywords() {
        let content = build_input(&sample_args(), Replication([2, 2, 3]));

        assert!(content.starts_with("SimulationType                  MonteCarlo\n"));
        assert!(content.contains("NumberOfCycles                  0"));
        assert!(content.contains("FrameworkName                   IRMOF-1"));
        assert!(content.contains("UnitCells                       2 2 3"));
        assert!(content.contains("RemoveAtomNumberCodeFromLabel   no"));
        assert!(content.contains("CutOffVDW                       12.8"));
    }

    #[test]
    fn test_atom_number_code_flag() {
        let mut args = sample_args();
        args.remove_atom_number_code = true;

        let content = build_input(&args, Replication([1, 1, 1]));
        assert!(content.contains("RemoveAtomNumberCodeFromLabel   yes"));
    }
}
