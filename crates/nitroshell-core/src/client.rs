//! 本地 API 客户端
//!
//! NitroShare 的本地 API 以 `POST http://127.0.0.1:<端口>/<动作>` 形式
//! 调用，请求头携带 `X-Auth-Token`，请求体为 JSON 参数对象。
//!
//! 两类调用的成功判定不同：
//! - [`ApiClient::send_items`] 只要求请求送达，状态码和响应内容一概
//!   不检查 (菜单发送是 fire-and-forget)
//! - [`ApiClient::call`] 要求 2xx 且响应为合法 JSON (NMH 需要把
//!   动作的返回值转发给浏览器扩展)

use log::debug;
use serde_json::{Value, json};
use std::path::PathBuf;
use thiserror::Error;

use crate::credentials::Credentials;

/// 认证头名称
pub const AUTH_HEADER: &str = "X-Auth-Token";

/// API 调用错误
///
/// 只有 [`ApiError::Connect`] 对应「无法与 NitroShare 通信」弹窗；
/// 其余错误由调用方决定如何呈现。
#[derive(Debug, Error)]
pub enum ApiError {
    /// 无法建立连接 (NitroShare 没有监听该端口)
    #[error("unable to connect to 127.0.0.1:{port}: {source}")]
    Connect {
        port: u16,
        #[source]
        source: reqwest::Error,
    },

    /// 连接建立后请求失败 (HTTP 错误状态等)
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// 响应不是合法 JSON
    #[error("invalid response received: {0}")]
    InvalidResponse(#[source] reqwest::Error),
}

impl ApiError {
    /// 是否属于连接失败
    pub fn is_connect(&self) -> bool {
        matches!(self, ApiError::Connect { .. })
    }
}

/// 本地 API 客户端
///
/// 持有端口和令牌的拷贝；凭据文件变化后需要重新构造。
#[derive(Debug, Clone)]
pub struct ApiClient {
    port: u16,
    token: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// 用一组凭据创建客户端
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            port: credentials.port,
            token: credentials.token.clone(),
            // 不设置超时：请求要么完成要么连接失败
            http: reqwest::Client::new(),
        }
    }

    /// 发送文件列表 (fire-and-forget)
    ///
    /// 请求体为 `{"items": [<路径>...]}`。只要请求送达即视为成功，
    /// 不检查状态码，也不读取响应体。
    pub async fn send_items(&self, items: &[PathBuf]) -> Result<(), ApiError> {
        let items: Vec<String> = items.iter().map(|p| p.display().to_string()).collect();
        let response = self.post("sendItems", &json!({ "items": items })).await?;
        debug!("sendItems 已送达 (HTTP {})", response.status());
        Ok(())
    }

    /// 调用任意动作并返回响应 JSON
    ///
    /// 动作注册表会把返回值包装为 `{"return": ...}`。
    pub async fn call(&self, action: &str, params: &Value) -> Result<Value, ApiError> {
        let response = self.post(action, params).await?.error_for_status()?;
        response
            .json::<Value>()
            .await
            .map_err(ApiError::InvalidResponse)
    }

    /// 查询 NitroShare 版本
    pub async fn version(&self) -> Result<Value, ApiError> {
        self.call("version", &Value::Object(Default::default()))
            .await
    }

    /// 动作对应的 URL
    fn endpoint(&self, action: &str) -> String {
        format!("http://127.0.0.1:{}/{}", self.port, action)
    }

    async fn post(&self, action: &str, body: &Value) -> Result<reqwest::Response, ApiError> {
        self.http
            .post(self.endpoint(action))
            .header(AUTH_HEADER, &self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ApiError::Connect {
                        port: self.port,
                        source: e,
                    }
                } else {
                    ApiError::Request(e)
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(port: u16, token: &str) -> ApiClient {
        ApiClient::new(&Credentials {
            port,
            token: token.to_string(),
        })
    }

    #[test]
    fn test_endpoint_format() {
        let client = client(9943, "abc123");
        assert_eq!(
            client.endpoint("sendItems"),
            "http://127.0.0.1:9943/sendItems"
        );
        assert_eq!(client.endpoint("version"), "http://127.0.0.1:9943/version");
    }

    #[test]
    fn test_client_captures_credentials_by_value() {
        let mut credentials = Credentials {
            port: 9943,
            token: "abc123".to_string(),
        };
        let client = ApiClient::new(&credentials);

        // 构造后修改凭据不影响客户端
        credentials.token = "changed".to_string();
        assert_eq!(client.token, "abc123");
        assert_eq!(client.port, 9943);
    }
}
