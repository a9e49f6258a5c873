//! # prepare gcmc 子命令实现
//!
//! 生成巨正则蒙特卡洛吸附模拟输入 `simulation-MonteCarlo.input`。
//! 多组分混合气为每个组分启用恒等变换移动，列表排除自身编号。
//!
//! ## 依赖关系
//! - 使用 `cli/prepare.rs::GcmcArgs`
//! - 使用 `parsers/cif.rs`, `models/`, `utils/files.rs`

use crate::cli::prepare::GcmcArgs;
use crate::commands::prepare::{write_input_file, yes_no};
use crate::error::Result;
use crate::models::{Composition, Replication};
use crate::parsers::cif;
use crate::utils::{files, output};

/// 执行 gcmc 子命令
pub fn execute(args: GcmcArgs) -> Result<()> {
    output::print_header("Preparing GCMC Input");

    files::copy_def_files(&args.output_folder, &args.forcefield_folder)?;

    let cif_path = args.output_folder.join(format!("{}.cif", args.framework_name));
    let unit_cells = cif::parse_cif_cell(&cif_path)?.replication(args.cutoffs.largest())?;

    let content = build_input(&args, unit_cells);
    write_input_file(&args.output_folder, "simulation-MonteCarlo.input", &content)?;

    output::print_success(&format!(
        "Wrote simulation-MonteCarlo.input to '{}'",
        args.output_folder.display()
    ));
    Ok(())
}

/// 构建输入文件内容
fn build_input(args: &GcmcArgs, unit_cells: Replication) -> String {
    let (grid_types, number_of_grids) = args.composition.grid_types();

    // RASPA 接受空格分隔的压力列表
    let pressures = args.pressure.replace(',', " ");

    let mut content = format!(
        "\
SimulationType                      MonteCarlo
NumberOfCycles                      {cycles}                        # int
NumberOfInitializationCycles        {init_cycles}                   # int
PrintEvery                          {print_every}                   # int

ContinueAfterCrash                  yes                             # yes / no
Movies                              {movies}                        # yes / no
WriteMoviesEvery                    {movies_every}                  # int
WriteBinaryRestartFileEvery         {restart_file_every}            # int

ForceField                          Local                           # string
CutOffVDW                           {cutoff_vdw}                    # float
CutOffChargeCharge                  {cutoff_charge_charge}          # float
CutOffChargeBondDipole              {cutoff_charge_bonddipole}     # float
CutOffBondDipoleBondDipole          {cutoff_bonddipole_bonddipole} # float
ChargeMethod                        Ewald                           # string
EwaldPrecision                      {ewald_precision}               # float

Framework                           0                               # int
FrameworkName                       {framework_name}                # string
HeliumVoidFraction                  {helium_void_fraction}          # float
ExternalTemperature                 {temperature}                   # float
ExternalPressure                    {pressures}                     # float
UseChargesFromCIFFile               {use_charges}                   # yes / no
UnitCells                           {unit_cells}                    # int int int

NumberOfGrids                       {number_of_grids}               # int
GridTypes                           {grid_types}                    # string
SpacingVDWGrid                      {spacing_vdw_grid}              # float
SpacingCoulombGrid                  {spacing_coulomb_grid}          # float
UseTabularGrid                      {use_tabular_grid}              # yes / no

",
        cycles = args.cycles,
        init_cycles = args.init_cycles,
        print_every = args.print_every,
        movies = yes_no(args.movies_every > 0),
        movies_every = args.movies_every,
        restart_file_every = args.restart_file_every,
        cutoff_vdw = args.cutoffs.cutoff_vdw,
        cutoff_charge_charge = args.cutoffs.cutoff_charge_charge,
        cutoff_charge_bonddipole = args.cutoffs.cutoff_charge_bonddipole,
        cutoff_bonddipole_bonddipole = args.cutoffs.cutoff_bonddipole_bonddipole,
        ewald_precision = args.ewald_precision,
        framework_name = args.framework_name,
        helium_void_fraction = args.helium_void_fraction,
        temperature = args.temperature,
        pressures = pressures,
        use_charges = yes_no(!args.ignore_charges_from_cif),
        unit_cells = unit_cells,
        number_of_grids = number_of_grids,
        grid_types = grid_types,
        spacing_vdw_grid = args.spacing.spacing_vdw_grid,
        spacing_coulomb_grid = args.spacing.spacing_coulomb_grid,
        use_tabular_grid = yes_no(args.use_tabular_grid),
    );

    content.push_str(&component_blocks(&args.composition));
    content
}

/// 构建组分块
///
/// 多组分时启用恒等变换移动，单组分用稍高的平移概率。
fn component_blocks(composition: &Composition) -> String {
    let n = composition.len();
    let mut blocks = String::new();

    for (index, (gas, fraction)) in composition.components().iter().enumerate() {
        if n > 1 {
            let identity_changes: Vec<String> = (0..n)
                .filter(|&other| other != index)
                .map(|other| other.to_string())
                .collect();

            blocks.push_str(&format!(
                "\
Component {index} MoleculeName                  {name}
            MolFraction                   {fraction}
            MoleculeDefinition            Local
            SwapProbability               0.5
            TranslationProbability        0.2
            RotationProbability           0.1
            ReinsertionProbability        0.1
            IdentityChangeProbability     0.1
                NumberOfIdentityChanges   {changes}
                IdentityChangesList       {list}
            CreateNumberOfMolecules       0

",
                index = index,
                name = gas.name(),
                fraction = fraction,
                changes = n - 1,
                list = identity_changes.join(" "),
            ));
        } else {
            blocks.push_str(&format!(
                "\
Component {index} MoleculeName                  {name}
            MolFraction                   {fraction}
            MoleculeDefinition            Local
            SwapProbability               0.5
            TranslationProbability        0.3
            RotationProbability           0.1
            ReinsertionProbability        0.1
            CreateNumberOfMolecules       0

",
                index = index,
                name = gas.name(),
                fraction = fraction,
            ));
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_component_block() {
        let composition: Composition = r#"{"CO2": 1.0}"#.parse().unwrap();
        let blocks = component_blocks(&composition);

        assert!(blocks.contains("Component 0 MoleculeName                  CO2"));
        assert!(blocks.contains("TranslationProbability        0.3"));
        assert!(!blocks.contains("IdentityChangeProbability"));
    }

    #[test]
    fn test_multi_component_identity_changes() {
        let composition: Composition =
            r#"{"CO2": 0.7, "N2": 0.2, "O2": 0.1}"#.parse().unwrap();
        let blocks = component_blocks(&composition);

        assert!(blocks.contains("Component 0 MoleculeName                  CO2"));
        assert!(blocks.contains("Component 2 MoleculeName                  O2"));
        assert!(blocks.contains("NumberOfIdentityChanges   2"));
        // 组分 1 的恒等变换列表排除自身
        assert!(blocks.contains("IdentityChangesList       0 2"));
        assert!(blocks.contains("TranslationProbability        0.2"));
    }

    #[test]
    fn test_pressure_list_is_space_separated() {
        let args = GcmcArgs {
            output_folder: std::path::PathBuf::from("out"),
            framework_name: "MFI".to_string(),
            init_cycles: 0,
            cycles: 10_000,
            print_every: 1,
            restart_file_every: 1000,
            forcefield_folder: std::path::PathBuf::from("ff"),
            cutoffs: crate::cli::CutoffArgs {
                cutoff_vdw: 12.8,
                cutoff_charge_charge: 12.8,
                cutoff_charge_bonddipole: 12.8,
                cutoff_bonddipole_bonddipole: 12.8,
            },
            ewald_precision: 1.0e-6,
            ignore_charges_from_cif: false,
            helium_void_fraction: 0.0,
            temperature: 300.0,
            pressure: "101325,202650".to_string(),
            composition: r#"{"CO2": 1.0}"#.parse().unwrap(),
            use_tabular_grid: false,
            spacing: crate::cli::GridSpacingArgs {
                spacing_vdw_grid: 0.1,
                spacing_coulomb_grid: 0.1,
            },
            movies_every: 0,
        };

        let content = build_input(&args, Replication([2, 2, 2]));
        assert!(content.contains("ExternalPressure                    101325 202650"));
        assert!(content.contains("Movies                              no"));
        assert!(content.contains("UseChargesFromCIFFile               yes"));
    }
}
