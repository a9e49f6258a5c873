//! # analyze diffusion 子命令实现
//!
//! 读取 MD 输出和 MSD 数据文件，按方向估计自扩散系数并写出
//! `diffusion.json`。三维平均 MSD 的系数除以 3 折算到单方向。
//! 可选输出 log-log MSD 图并高亮拟合区间。
//!
//! ## 依赖关系
//! - 使用 `cli/analyze.rs::DiffusionArgs`
//! - 使用 `analysis/diffusion.rs`, `parsers/`, `models/`
//! - 使用 `plotters` 绘制可选的拟合区间图

use std::fs::File;
use std::path::Path;

use crate::analysis::diffusion::{self, DiffusivityEstimate};
use crate::cli::analyze::DiffusionArgs;
use crate::error::{RaspaFlowError, Result};
use crate::models::{ComponentFraction, DiffusionRecord, Measurement, ThermoProperty};
use crate::parsers::msd::MsdSeries;
use crate::parsers::{cif, msd, raspa_out};
use crate::utils::output;

/// 执行 diffusion 子命令
pub fn execute(args: DiffusionArgs) -> Result<()> {
    output::print_header("Estimating Self-Diffusivities");

    let cif_path = args.output_folder.join(format!("{}.cif", args.framework_name));
    let cell = cif::parse_cif_cell(&cif_path)?;

    let unit_cells = cell.replication(args.largest_cutoff)?;
    let molecules = match args.molecules {
        Some(n) => n,
        None => cell.molecule_count(args.largest_cutoff, unit_cells)?,
    };
    output::print_info(&format!(
        "Unit cell replication: {}, {} molecules",
        unit_cells, molecules
    ));

    // mol/kg 换算因子取自 MD 输出文件（压力字段固定为 0）
    let data_path = raspa_out::find_output_file(
        &args.output_folder,
        &args.framework_name,
        args.temperature,
        "0",
    )?;
    let parsed = raspa_out::parse_output_file(&data_path)?;
    let to_mol_kg = parsed.supercell_mol_kg_conversion(&data_path.display().to_string())?;

    // 最大垂直宽度作为孔道限制直径，区分受限与非受限扩散
    let pld = cell.max_perpendicular_width()?;

    let provenance = args
        .instance_dir
        .rsplit('/')
        .next()
        .unwrap_or(&args.instance_dir)
        .to_string();

    let mut record = DiffusionRecord::new(molecules);
    let mut composition = Vec::new();

    for (index, (gas, fraction)) in args.composition.components().iter().enumerate() {
        composition.push(ComponentFraction {
            fraction: *fraction,
            inchikey: gas.inchikey().to_string(),
        });

        let loading = (molecules as f64 * fraction).trunc() * to_mol_kg;
        record
            .loading
            .push(Measurement::new(Some(loading), Some(0.0), gas.inchikey()));

        let msd_path = args
            .output_folder
            .join(format!("msd_self_{}_{}.dat", gas.name(), index));
        let series = msd::parse_msd_file(&msd_path)?;
        output::print_info(&format!(
            "Read {} MSD samples from '{}'",
            series.len(),
            msd_path.display()
        ));

        let (dx, dx_err) = estimate_direction("x", &series.time, &series.x, pld)?;
        let (dy, dy_err) = estimate_direction("y", &series.time, &series.y, pld)?;
        let (dz, dz_err) = estimate_direction("z", &series.time, &series.z, pld)?;
        let (ds, ds_err) = estimate_direction("mean", &series.time, &series.total, pld)?;

        // 三维平均折算到单方向
        let (ds, ds_err) = (ds.map(|d| d / 3.0), ds_err.map(|e| e / 3.0));

        record
            .diffusion_coefficient_x
            .push(Measurement::new(dx, dx_err, gas.inchikey()));
        record
            .diffusion_coefficient_y
            .push(Measurement::new(dy, dy_err, gas.inchikey()));
        record
            .diffusion_coefficient_z
            .push(Measurement::new(dz, dz_err, gas.inchikey()));
        record
            .diffusion_coefficient_mean
            .push(Measurement::new(ds, ds_err, gas.inchikey()));

        if args.plot {
            let plot_path = args
                .output_folder
                .join(format!("msd_{}_{}.png", gas.name(), index));
            plot_msd(&series, pld, &plot_path)?;
            output::print_success(&format!("MSD plot saved to '{}'", plot_path.display()));
        }
    }

    let document = ThermoProperty {
        name: "diffusion".to_string(),
        provenance,
        temperature: args.temperature,
        composition,
        data: vec![record],
    };

    let json_path = args.output_folder.join("diffusion.json");
    let file = File::create(&json_path).map_err(|e| RaspaFlowError::FileWriteError {
        path: json_path.display().to_string(),
        source: e,
    })?;
    serde_json::to_writer_pretty(file, &document)?;

    output::print_success(&format!("Results saved to '{}'", json_path.display()));
    Ok(())
}

/// 估计单方向扩散系数，打印诊断信息
fn estimate_direction(
    label: &str,
    time: &[f64],
    msd: &[f64],
    pld: f64,
) -> Result<(Option<f64>, Option<f64>)> {
    let estimate = diffusion::estimate_self_diffusivity(time, msd, pld)?;

    match estimate {
        DiffusivityEstimate::Confined { .. } => {
            output::print_info(&format!(
                "Molecule is in confined diffusion regime along {} (Ds = Dc)",
                label
            ));
        }
        DiffusivityEstimate::Undetermined {
            target_slope,
            closest_slope,
        } => {
            output::print_warning(&format!(
                "Failed to find a diffusive regime along {}: closest slope to {} is {:.4}. \
                 You may need to increase the number of cycles.",
                label, target_slope, closest_slope
            ));
            for segment in diffusion::log_log_segments(time, msd, pld)? {
                output::print_info(&format!(
                    "  segment [{}, {}): slope {:.4}, exceeds pore width: {}",
                    segment.start, segment.end, segment.slope, segment.exceeds_pore_width
                ));
            }
        }
        DiffusivityEstimate::Diffusive { .. } => {}
    }

    Ok(estimate.into_pair())
}

/// 绘制 log-log MSD 曲线并高亮选中的拟合区间
fn plot_msd(series: &MsdSeries, pld: f64, path: &Path) -> Result<()> {
    use plotters::prelude::*;

    let slope_target = if series.total.iter().fold(f64::NEG_INFINITY, |m, &v| m.max(v)) > pld * pld
    {
        1.0
    } else {
        0.0
    };
    let regime = diffusion::find_diffusion_regime(&series.time, &series.total, slope_target, pld)?;

    let points: Vec<(f64, f64)> = series
        .time
        .iter()
        .zip(series.total.iter())
        .map(|(&t, &m)| (t.log10(), m.log10()))
        .collect();

    let x_range = bounds(points.iter().map(|p| p.0));
    let y_range = bounds(points.iter().map(|p| p.1));

    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| RaspaFlowError::Other(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Mean squared displacement", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)
        .map_err(|e| RaspaFlowError::Other(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc("log10 t [ps]")
        .y_desc("log10 MSD [A^2]")
        .draw()
        .map_err(|e| RaspaFlowError::Other(e.to_string()))?;

    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 2, BLUE.filled())),
        )
        .map_err(|e| RaspaFlowError::Other(e.to_string()))?
        .label("MSD")
        .legend(|(x, y)| Circle::new((x + 10, y), 3, BLUE.filled()));

    // 选中区间的拟合直线
    let fit_line: Vec<(f64, f64)> = points[regime.start..regime.end]
        .iter()
        .map(|&(x, _)| (x, regime.slope * x + regime.intercept))
        .collect();
    chart
        .draw_series(LineSeries::new(fit_line, RED.stroke_width(3)))
        .map_err(|e| RaspaFlowError::Other(e.to_string()))?
        .label(format!("fit region (slope {:.3})", regime.slope))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(3)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| RaspaFlowError::Other(e.to_string()))?;

    root.present()
        .map_err(|e| RaspaFlowError::Other(e.to_string()))?;

    Ok(())
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    let margin = (hi - lo).abs().max(1e-6) * 0.05;
    (lo - margin, hi + margin)
}
