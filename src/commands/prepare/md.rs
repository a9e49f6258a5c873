//! # prepare md 子命令实现
//!
//! 生成 NVT 分子动力学扩散模拟输入 `simulation-MolecularDynamics.input`。
//! MSD 采样开启，初始分子数按分子数估计（超胞体积 / cutoff³）
//! 和组分摩尔分数分配。
//!
//! ## 依赖关系
//! - 使用 `cli/prepare.rs::MdArgs`
//! - 使用 `parsers/cif.rs`, `models/cell.rs`, `utils/files.rs`

use crate::cli::prepare::MdArgs;
use crate::commands::prepare::{write_input_file, yes_no};
use crate::error::Result;
use crate::models::{Composition, Replication};
use crate::parsers::cif;
use crate::utils::{files, output};

/// 执行 md 子命令
pub fn execute(args: MdArgs) -> Result<()> {
    output::print_header("Preparing Molecular Dynamics Input");

    files::copy_def_files(&args.output_folder, &args.forcefield_folder)?;

    let cif_path = args.output_folder.join(format!("{}.cif", args.framework_name));
    let cell = cif::parse_cif_cell(&cif_path)?;

    let largest_cutoff = args.cutoffs.largest();
    let unit_cells = cell.replication(largest_cutoff)?;

    let molecules = match args.molecules {
        Some(n) => n,
        None => cell.molecule_count(largest_cutoff, unit_cells)?,
    };
    output::print_info(&format!(
        "Unit cell replication: {}, {} molecules",
        unit_cells, molecules
    ));

    let content = build_input(&args, unit_cells, molecules);
    write_input_file(
        &args.output_folder,
        "simulation-MolecularDynamics.input",
        &content,
    )?;

    output::print_success(&format!(
        "Wrote simulation-MolecularDynamics.input to '{}'",
        args.output_folder.display()
    ));
    Ok(())
}

/// 构建输入文件内容
fn build_input(args: &MdArgs, unit_cells: Replication, molecules: u64) -> String {
    let (grid_types, number_of_grids) = args.composition.grid_types();

    let mut content = format!(
        "\
SimulationType                      MolecularDynamics
NumberOfCycles                      {cycles}                        # int
NumberOfInitializationCycles        {init_cycles}                   # int
NumberOfEquilibrationCycles         {equilibration_cycles}          # int
PrintEvery                          {print_every}                   # int

ContinueAfterCrash                  yes                             # yes / no
WriteBinaryRestartFileEvery         {restart_file_every}            # int
Movies                              {movies}                        # yes / no
WriteMoviesEvery                    {movies_every}                  # int

Ensemble                            NVT
TimeStep                            {time_step}                     # float

ComputeMSD                          yes                             # yes / no
PrintMSDEvery                       {print_msd_every}               # int

ForceField                          Local                           # string
CutOffVDW                           {cutoff_vdw}                    # float
CutOffChargeCharge                  {cutoff_charge_charge}          # float
CutOffChargeBondDipole              {cutoff_charge_bonddipole}     # float
CutOffBondDipoleBondDipole          {cutoff_bonddipole_bonddipole} # float
ChargeMethod                        Ewald                           # string
EwaldPrecision                      {ewald_precision}               # float

Framework                           0                               # int
FrameworkName                       {framework_name}                # string
ExternalTemperature                 {temperature}                   # float
UseChargesFromCIFFile               {use_charges}                   # yes / no
UnitCells                           {unit_cells}                    # int int int

UseTabularGrid                      {use_tabular_grid}              # yes / no
NumberOfGrids                       {number_of_grids}               # int
GridTypes                           {grid_types}                    # string
SpacingVDWGrid                      {spacing_vdw_grid}              # float
SpacingCoulombGrid                  {spacing_coulomb_grid}          # float

",
        cycles = args.cycles,
        init_cycles = args.init_cycles,
        equilibration_cycles = args.equilibration_cycles,
        print_every = args.print_every,
        restart_file_every = args.restart_file_every,
        movies = yes_no(args.movies_every > 0),
        movies_every = args.movies_every,
        time_step = args.time_step,
        print_msd_every = args.print_msd_every,
        cutoff_vdw = args.cutoffs.cutoff_vdw,
        cutoff_charge_charge = args.cutoffs.cutoff_charge_charge,
        cutoff_charge_bonddipole = args.cutoffs.cutoff_charge_bonddipole,
        cutoff_bonddipole_bonddipole = args.cutoffs.cutoff_bonddipole_bonddipole,
        ewald_precision = args.ewald_precision,
        framework_name = args.framework_name,
        temperature = args.temperature,
        use_charges = yes_no(!args.ignore_charges_from_cif),
        unit_cells = unit_cells,
        use_tabular_grid = yes_no(args.use_tabular_grid),
        number_of_grids = number_of_grids,
        grid_types = grid_types,
        spacing_vdw_grid = args.spacing.spacing_vdw_grid,
        spacing_coulomb_grid = args.spacing.spacing_coulomb_grid,
    );

    content.push_str(&component_blocks(&args.composition, molecules));
    content
}

/// 构建组分块，初始分子数按摩尔分数截断分配
fn component_blocks(composition: &Composition, molecules: u64) -> String {
    let mut blocks = String::new();

    for (index, (gas, fraction)) in composition.components().iter().enumerate() {
        blocks.push_str(&format!(
            "\
Component {index} MoleculeName                  {name}
            MolFraction                   {fraction}
            MoleculeDefinition            Local
            TranslationProbability        0.6
            RotationProbability           0.2
            ReinsertionProbability        0.2
            ExtraFrameworkMolecule        no
            CreateNumberOfMolecules       {create}

",
            index = index,
            name = gas.name(),
            fraction = fraction,
            create = (molecules as f64 * fraction) as u64,
        ));
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_molecule_counts_are_truncated_fractions() {
        let composition: Composition = r#"{"CO2": 0.85, "N2": 0.15}"#.parse().unwrap();
        let blocks = component_blocks(&composition, 100);

        assert!(blocks.contains("Component 0 MoleculeName                  CO2"));
        assert!(blocks.contains("CreateNumberOfMolecules       85"));
        assert!(blocks.contains("Component 1 MoleculeName                  N2"));
        assert!(blocks.contains("CreateNumberOfMolecules       15"));
        assert!(blocks.contains("ExtraFrameworkMolecule        no"));
    }

    #[test]
    fn test_md_keywords_are_present() {
        let args = MdArgs {
            output_folder: std::path::PathBuf::from("out"),
            framework_name: "IRMOF-1".to_string(),
            init_cycles: 1000,
            equilibration_cycles: 1000,
            cycles: 5_000_000,
            print_every: 10_000,
            restart_file_every: 10_000,
            time_step: 1.0e-2,
            forcefield_folder: std::path::PathBuf::from("ff"),
            cutoffs: crate::cli::CutoffArgs {
                cutoff_vdw: 12.8,
                cutoff_charge_charge: 12.8,
                cutoff_charge_bonddipole: 12.8,
                cutoff_bonddipole_bonddipole: 12.8,
            },
            ewald_precision: 1.0e-6,
            ignore_charges_from_cif: true,
            temperature: 300.0,
            composition: r#"{"CO2": 1.0}"#.parse().unwrap(),
            use_tabular_grid: false,
            spacing: crate::cli::GridSpacingArgs {
                spacing_vdw_grid: 0.1,
                spacing_coulomb_grid: 0.1,
            },
            movies_every: 0,
            molecules: None,
            print_msd_every: 1000,
        };

        let content = build_input(&args, Replication([2, 2, 2]), 64);

        assert!(content.starts_with("SimulationType                      MolecularDynamics\n"));
        assert!(content.contains("Ensemble                            NVT"));
        assert!(content.contains("ComputeMSD                          yes"));
        assert!(content.contains("PrintMSDEvery                       1000"));
        assert!(content.contains("UseChargesFromCIFFile               no"));
        assert!(content.contains("TimeStep                            0.01"));
        assert!(content.contains("CreateNumberOfMolecules       64"));
    }
}
