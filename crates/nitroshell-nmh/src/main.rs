//! Nitroshell NMH
//!
//! 浏览器 Native Messaging Host：从 stdin 读取浏览器扩展发来的
//! 动作请求，转发给本机运行的 NitroShare，把响应原样写回 stdout。
//!
//! stdout 专用于分帧消息，日志一律走 stderr。

mod framing;

use anyhow::Result;
use nitroshell_core::{ApiClient, ApiError, Credentials};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

/// 扩展发来的请求信封
#[derive(Debug, Deserialize)]
struct Request {
    /// 动作名称
    name: String,
    /// 动作参数，缺省为空对象
    #[serde(default = "empty_object")]
    parameters: Value,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

#[tokio::main]
async fn main() -> Result<()> {
    // 桥接 log crate (nitroshell-core 使用) 到 tracing
    let _ = tracing_log::LogTracer::init();

    // stdout 是消息通道，日志只能写 stderr
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,nitroshell_core=debug")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    tracing::info!("Nitroshell NMH started");

    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();

    while let Some(message) = framing::read_message(&mut stdin)? {
        let reply = handle_message(&message).await;
        framing::write_message(&mut stdout, reply.to_string().as_bytes())?;
    }

    tracing::info!("stdin closed, exiting");
    Ok(())
}

/// 处理一条请求，总是产出一个 JSON 应答
async fn handle_message(message: &[u8]) -> Value {
    let request = match parse_request(message) {
        Ok(request) => request,
        Err(reply) => return reply,
    };

    // 每条消息都重新查找 NitroShare，运行状态可能随时变化
    let Some(credentials) = Credentials::load() else {
        return error_reply("NitroShare does not appear to be running");
    };

    dispatch(&request, &credentials).await
}

fn parse_request(message: &[u8]) -> Result<Request, Value> {
    match serde_json::from_slice::<Request>(message) {
        Ok(request) => Ok(request),
        Err(e) => {
            tracing::warn!("无法解析请求: {}", e);
            Err(error_reply("invalid request received"))
        }
    }
}

async fn dispatch(request: &Request, credentials: &Credentials) -> Value {
    let client = ApiClient::new(credentials);
    match client.call(&request.name, &request.parameters).await {
        Ok(response) => response,
        Err(ApiError::InvalidResponse(e)) => {
            tracing::warn!("动作 {} 的响应无效: {}", request.name, e);
            error_reply("invalid response received")
        }
        Err(e) => {
            tracing::warn!("动作 {} 失败: {}", request.name, e);
            error_reply("error communicating with NitroShare")
        }
    }
}

fn error_reply(message: &str) -> Value {
    json!({ "error": message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_with_parameters() {
        let request =
            parse_request(br#"{"name": "sendUrl", "parameters": {"url": "https://x"}}"#).unwrap();
        assert_eq!(request.name, "sendUrl");
        assert_eq!(request.parameters, json!({ "url": "https://x" }));
    }

    #[test]
    fn test_parse_request_defaults_parameters() {
        let request = parse_request(br#"{"name": "version"}"#).unwrap();
        assert_eq!(request.name, "version");
        assert_eq!(request.parameters, json!({}));
    }

    #[test]
    fn test_parse_request_without_name_is_invalid() {
        let reply = parse_request(br#"{"parameters": {}}"#).unwrap_err();
        assert_eq!(reply, json!({ "error": "invalid request received" }));
    }

    #[test]
    fn test_parse_request_non_json_is_invalid() {
        let reply = parse_request(b"garbage").unwrap_err();
        assert_eq!(reply, json!({ "error": "invalid request received" }));
    }
}
