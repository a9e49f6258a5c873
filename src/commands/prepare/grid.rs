//! # prepare grid 子命令实现
//!
//! 复制力场定义文件并生成能量网格预计算输入
//! `simulation-MakeGrid.input`。网格原子类型由气体组分决定。
//!
//! ## 依赖关系
//! - 使用 `cli/prepare.rs::GridArgs`
//! - 使用 `parsers/cif.rs`, `models/`, `utils/files.rs`

use crate::cli::prepare::GridArgs;
use crate::commands::prepare::write_input_file;
use crate::error::Result;
use crate::models::Replication;
use crate::parsers::cif;
use crate::utils::{files, output};

/// 执行 grid 子命令
pub fn execute(args: GridArgs) -> Result<()> {
    output::print_header("Preparing Energy Grid Input");

    files::copy_def_files(&args.output_folder, &args.forcefield_folder)?;

    let cif_path = args.output_folder.join(format!("{}.cif", args.framework_name));
    let unit_cells = cif::parse_cif_cell(&cif_path)?.replication(args.cutoffs.largest())?;

    let content = build_input(&args, unit_cells);
    write_input_file(&args.output_folder, "simulation-MakeGrid.input", &content)?;

    output::print_success(&format!(
        "Wrote simulation-MakeGrid.input to '{}'",
        args.output_folder.display()
    ));
    Ok(())
}

/// 构建输入文件内容
fn build_input(args: &GridArgs, unit_cells: Replication) -> String {
    let (grid_types, number_of_grids) = args.composition.grid_types();

    format!(
        "\
SimulationType                  MakeGrid

Forcefield                      Local                           # string
CutOffVDW                       {cutoff_vdw}                    # float
CutOffChargeCharge              {cutoff_charge_charge}          # float
CutOffChargeBondDipole          {cutoff_charge_bonddipole}     # float
CutOffBondDipoleBondDipole      {cutoff_bonddipole_bonddipole} # float
ChargeMethod                    Ewald                           # string
EwaldPrecision                  {ewald_precision}               # float

Framework                       0                               # int
FrameworkName                   {framework_name}                # string
UseChargesFromCIFFile           yes                             # yes / no
UnitCells                       {unit_cells}                    # int int int

NumberOfGrids                   {number_of_grids}               # int
GridTypes                       {grid_types}                    # string
SpacingVDWGrid                  {spacing_vdw_grid}              # float
SpacingCoulombGrid              {spacing_coulomb_grid}          # float
",
        cutoff_vdw = args.cutoffs.cutoff_vdw,
        cutoff_charge_charge = args.cutoffs.cutoff_charge_charge,
        cutoff_charge_bonddipole = args.cutoffs.cutoff_charge_bonddipole,
        cutoff_bonddipole_bonddipole = args.cutoffs.cutoff_bonddipole_bonddipole,
        ewald_precision = args.ewald_precision,
        framework_name = args.framework_name,
        unit_cells = unit_cells,
        number_of_grids = number_of_grids,
        grid_types = grid_types,
        spacing_vdw_grid = args.spacing.spacing_vdw_grid,
        spacing_coulomb_grid = args.spacing.spacing_coulomb_grid,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{CutoffArgs, GridSpacingArgs};
    use std::path::PathBuf;

    #[test]
    fn test_grid_types_follow_composition() {
        let args = GridArgs {
            output_folder: PathBuf::from("out"),
            framework_name: "MFI".to_string(),
            forcefield_folder: PathBuf::from("forcefield"),
            composition: r#"{"CO2": 0.9, "N2": 0.1}"#.parse().unwrap(),
            cutoffs: CutoffArgs {
                cutoff_vdw: 12.8,
                cutoff_charge_charge: 12.8,
                cutoff_charge_bonddipole: 12.8,
                cutoff_bonddipole_bonddipole: 12.8,
            },
            ewald_precision: 1.0e-6,
            spacing: GridSpacingArgs {
                spacing_vdw_grid: 0.1,
                spacing_coulomb_grid: 0.1,
            },
        };

        let content = build_input(&args, Replication([2, 2, 2]));

        assert!(content.starts_with("SimulationType                  MakeGrid\n"));
        assert!(content.contains("NumberOfGrids                   3"));
        assert!(content.contains("GridTypes                       C_co2 O_co2 N_n2"));
        assert!(content.contains("SpacingVDWGrid                  0.1"));
        assert!(content.contains("UnitCells                       2 2 2"));
    }
}
