//! # 热力学性质数据模型
//!
//! 定义 `isotherm.json` / `diffusion.json` 与数据库 POST 负载共用的
//! 文档结构。未能确定的扩散系数序列化为 null，由调用方决定是否
//! 增加模拟周期后重试。
//!
//! ## 依赖关系
//! - 被 `commands/analyze/diffusion.rs`、`commands/upload.rs` 使用
//! - 被 `db.rs` 序列化为 POST 负载

use serde::{Deserialize, Serialize};

/// 组分摩尔分数记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentFraction {
    pub fraction: f64,
    #[serde(rename = "InChIKey")]
    pub inchikey: String,
}

/// 单个测量值（值 + 不确定度），值可为 null（未确定）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    pub value: Option<f64>,
    pub uncertainty: Option<f64>,
    #[serde(rename = "InChIKey")]
    pub inchikey: String,
}

impl Measurement {
    pub fn new(value: Option<f64>, uncertainty: Option<f64>, inchikey: &str) -> Self {
        Measurement {
            value,
            uncertainty,
            inchikey: inchikey.to_string(),
        }
    }
}

/// 等温线上的一个压力点
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsothermPoint {
    /// 压力 (bar)
    pub pressure: f64,
    pub adsorption: Vec<Measurement>,
}

/// 一次 MD 模拟的扩散系数记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffusionRecord {
    pub number_of_molecules: u64,
    pub loading: Vec<Measurement>,
    pub diffusion_coefficient_x: Vec<Measurement>,
    pub diffusion_coefficient_y: Vec<Measurement>,
    pub diffusion_coefficient_z: Vec<Measurement>,
    pub diffusion_coefficient_mean: Vec<Measurement>,
}

impl DiffusionRecord {
    pub fn new(number_of_molecules: u64) -> Self {
        DiffusionRecord {
            number_of_molecules,
            loading: Vec::new(),
            diffusion_coefficient_x: Vec::new(),
            diffusion_coefficient_y: Vec::new(),
            diffusion_coefficient_z: Vec::new(),
            diffusion_coefficient_mean: Vec::new(),
        }
    }
}

/// 温度依赖性质文档，数据库 t-dependent 端点的负载格式
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThermoProperty<T> {
    pub name: String,
    pub provenance: String,
    pub temperature: f64,
    pub composition: Vec<ComponentFraction>,
    pub data: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undetermined_measurement_serializes_to_null() {
        let measurement = Measurement::new(None, None, "CURLTUGMZLYLDI-UHFFFAOYSA-N");
        let json = serde_json::to_string(&measurement).unwrap();

        assert!(json.contains("\"value\":null"));
        assert!(json.contains("\"InChIKey\":\"CURLTUGMZLYLDI-UHFFFAOYSA-N\""));
    }

    #[test]
    fn test_diffusion_document_round_trip() {
        let mut record = DiffusionRecord::new(64);
        record
            .loading
            .push(Measurement::new(Some(1.5), Some(0.0), "IJGRMHOSHXDMSA-UHFFFAOYSA-N"));
        record
            .diffusion_coefficient_mean
            .push(Measurement::new(Some(2.0e-9), Some(1.0e-11), "IJGRMHOSHXDMSA-UHFFFAOYSA-N"));

        let document = ThermoProperty {
            name: "diffusion".to_string(),
            provenance: "instance-42".to_string(),
            temperature: 300.0,
            composition: vec![ComponentFraction {
                fraction: 1.0,
                inchikey: "IJGRMHOSHXDMSA-UHFFFAOYSA-N".to_string(),
            }],
            data: vec![record],
        };

        let json = serde_json::to_string_pretty(&document).unwrap();
        let parsed: ThermoProperty<DiffusionRecord> = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.name, "diffusion");
        assert_eq!(parsed.data[0].number_of_molecules, 64);
        assert_eq!(parsed.data[0].diffusion_coefficient_mean.len(), 1);
    }
}
