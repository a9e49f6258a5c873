//! # upload 命令实现
//!
//! 把吸附等温线和扩散系数上传到材料数据库。ingress 子域名未配置
//! 时跳过 REST 调用，等温线文档仍写入本地 `isotherm.json`，
//! 便于离线运行同一条工作流。
//!
//! ## 依赖关系
//! - 使用 `cli/upload.rs` 定义的参数
//! - 使用 `db.rs` REST 客户端
//! - 使用 `models/thermo.rs` 文档结构

use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::cli::upload::{AdsorptionArgs, DiffusionUploadArgs, UploadArgs, UploadCommands};
use crate::db::{self, DatabaseClient};
use crate::error::{RaspaFlowError, Result};
use crate::models::{
    ComponentFraction, DiffusionRecord, Gas, IsothermPoint, Measurement, ThermoProperty,
};
use crate::utils::output;

/// 执行 upload 命令
pub fn execute(args: UploadArgs) -> Result<()> {
    match args.command {
        UploadCommands::Adsorption(args) => adsorption(args),
        UploadCommands::Diffusion(args) => diffusion(args),
    }
}

/// 上传吸附等温线
fn adsorption(args: AdsorptionArgs) -> Result<()> {
    output::print_header("Uploading Adsorption Results");

    let configured = db::ingress_configured(&args.ingress_subdomain);

    let pressures: Vec<f64> = args
        .pressures
        .split(',')
        .map(|token| {
            token.trim().parse::<f64>().map_err(|_| {
                RaspaFlowError::InvalidArgument(format!("Invalid pressure value: {}", token))
            })
        })
        .collect::<Result<_>>()?;
    output::print_info(&format!(
        "T = {} K, P = {:?} Pa",
        args.temperature, pressures
    ));

    let provenance = args
        .instance_dir
        .rsplit('/')
        .next()
        .unwrap_or(&args.instance_dir)
        .to_string();
    output::print_info(&format!("Provenance: {}", provenance));

    let composition: Vec<ComponentFraction> = args
        .composition
        .components()
        .iter()
        .map(|(gas, fraction)| ComponentFraction {
            fraction: *fraction,
            inchikey: gas.inchikey().to_string(),
        })
        .collect();

    let mut data = Vec::new();
    for pressure in &pressures {
        let csv_path = args
            .output_folder
            .join(format!("stats_{:.6}_{:.0}.csv", args.temperature, pressure));
        if !csv_path.exists() {
            output::print_skip(&format!("'{}' not found", csv_path.display()));
            continue;
        }

        let adsorption = read_loading_measurements(&csv_path)?;
        data.push(IsothermPoint {
            // Pa -> bar
            pressure: pressure / 100_000.0,
            adsorption,
        });
    }

    let document = ThermoProperty {
        name: "isotherm".to_string(),
        provenance,
        temperature: args.temperature,
        composition,
        data,
    };

    if configured {
        let client = DatabaseClient::new(args.ingress_subdomain.as_deref().unwrap_or_default());
        let object_id = client.get_object_id(&args.framework_name, &args.framework_source.to_string())?;
        output::print_info(&format!(
            "Name: {}, Source: {}, ObjectID: {}",
            args.framework_name, args.framework_source, object_id
        ));

        let response = client.post_t_dependent_property(&object_id, &document)?;
        output::print_success(&format!("Database response: {}", response));
    } else {
        output::print_skip("Ingress subdomain not configured, skipping database upload");
    }

    let json_path = args.output_folder.join("isotherm.json");
    fs::write(&json_path, serde_json::to_string(&document)?).map_err(|e| {
        RaspaFlowError::FileWriteError {
            path: json_path.display().to_string(),
            source: e,
        }
    })?;
    output::print_success(&format!("Results saved to '{}'", json_path.display()));

    Ok(())
}

/// 从统计 CSV 提取 mol/kg 观测量的平衡平均值
fn read_loading_measurements(path: &Path) -> Result<Vec<Measurement>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(RaspaFlowError::CsvError)?;

    let mut measurements = Vec::new();
    for record in reader.records() {
        let record = record.map_err(RaspaFlowError::CsvError)?;
        let observable = record.get(0).unwrap_or("");
        if !observable.contains("mol/kg") {
            continue;
        }

        let gas_name = observable.split('_').next().unwrap_or(observable);
        let gas = Gas::from_str(gas_name)?;

        let parse_field = |index: usize, label: &str| -> Result<f64> {
            record
                .get(index)
                .and_then(|field| field.parse::<f64>().ok())
                .ok_or_else(|| RaspaFlowError::ParseError {
                    format: "csv".to_string(),
                    path: path.display().to_string(),
                    reason: format!("Missing {} for observable {}", label, observable),
                })
        };

        measurements.push(Measurement::new(
            Some(parse_field(1, "mean")?),
            Some(parse_field(2, "mean-error")?),
            gas.inchikey(),
        ));
    }

    Ok(measurements)
}

/// 上传扩散系数
fn diffusion(args: DiffusionUploadArgs) -> Result<()> {
    output::print_header("Uploading Diffusion Results");

    let json_path = args.output_folder.join("diffusion.json");
    let content = fs::read_to_string(&json_path).map_err(|e| RaspaFlowError::FileReadError {
        path: json_path.display().to_string(),
        source: e,
    })?;
    let document: ThermoProperty<DiffusionRecord> = serde_json::from_str(&content)?;

    let client = DatabaseClient::new(&args.ingress_subdomain);
    let object_id = client.get_object_id(&args.framework_name, &args.framework_source.to_string())?;
    output::print_info(&format!(
        "Name: {}, Source: {}, ObjectID: {}",
        args.framework_name, args.framework_source, object_id
    ));

    let response = client.post_t_dependent_property(&object_id, &document)?;
    output::print_success(&format!("Database response: {}", response));

    Ok(())
}
