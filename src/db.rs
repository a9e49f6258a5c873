//! # 材料数据库 REST 客户端
//!
//! 封装 materials database API 的两类调用：按名称/来源查询材料的
//! ObjectID，以及插入温度依赖性质文档。基地址由 ingress 子域名
//! 拼出。调用失败直接上抛，不做重试。
//!
//! ## 依赖关系
//! - 被 `commands/upload.rs` 使用
//! - 使用 `ureq` 发送阻塞式 HTTP 请求

use serde::Serialize;

use crate::error::{RaspaFlowError, Result};

/// 数据库 API 客户端
pub struct DatabaseClient {
    base_url: String,
}

impl DatabaseClient {
    /// 由 ingress 子域名构造客户端
    pub fn new(ingress_subdomain: &str) -> Self {
        DatabaseClient {
            base_url: format!("http://database-api.{}", ingress_subdomain),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 查询材料的 ObjectID
    pub fn get_object_id(&self, material_name: &str, material_source: &str) -> Result<String> {
        let url = self.url(&format!(
            "/materials?name={}&source={}",
            material_name, material_source
        ));

        let response: serde_json::Value = ureq::get(&url)
            .call()
            .map_err(|e| RaspaFlowError::RequestFailed {
                url: url.clone(),
                reason: e.to_string(),
            })?
            .into_json()
            .map_err(|e| RaspaFlowError::RequestFailed {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        response["materials"][0]["_id"]
            .as_str()
            .map(|id| id.to_string())
            .ok_or_else(|| RaspaFlowError::RequestFailed {
                url,
                reason: format!(
                    "No material found for name={}, source={}",
                    material_name, material_source
                ),
            })
    }

    /// 插入温度依赖性质文档，返回数据库应答
    pub fn post_t_dependent_property<T: Serialize>(
        &self,
        object_id: &str,
        property: &T,
    ) -> Result<serde_json::Value> {
        let url = self.url(&format!(
            "/materials/{}/thermodynamic-properties/t-dependent",
            object_id
        ));

        let payload = serde_json::to_value(property)?;

        ureq::post(&url)
            .send_json(payload)
            .map_err(|e| RaspaFlowError::RequestFailed {
                url: url.clone(),
                reason: e.to_string(),
            })?
            .into_json()
            .map_err(|e| RaspaFlowError::RequestFailed {
                url,
                reason: e.to_string(),
            })
    }
}

/// ingress 子域名是否有效配置
///
/// 未展开的占位符 `${INGRESS}` 和空串都视为未配置。
pub fn ingress_configured(ingress_subdomain: &Option<String>) -> bool {
    match ingress_subdomain {
        Some(value) => !value.is_empty() && value != "${INGRESS}",
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingress_configured() {
        assert!(!ingress_configured(&None));
        assert!(!ingress_configured(&Some(String::new())));
        assert!(!ingress_configured(&Some("${INGRESS}".to_string())));
        assert!(ingress_configured(&Some("example.cloud".to_string())));
    }

    #[test]
    fn test_urls_are_composed_from_subdomain() {
        let client = DatabaseClient::new("example.cloud");
        assert_eq!(
            client.url("/materials?name=IRMOF-1&source=CoRE2019"),
            "http://database-api.example.cloud/materials?name=IRMOF-1&source=CoRE2019"
        );
    }
}
