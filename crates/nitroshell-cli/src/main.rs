//! Nitroshell CLI
//!
//! 命令行客户端，直接调用本机 NitroShare 的 HTTP API

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use nitroshell_core::{ApiClient, Credentials, SEND_FAILED_MESSAGE, credentials_path};
use serde_json::{Map, Value};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nitroshell", version, about = "NitroShare 本地 API 命令行客户端")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 发送文件或目录
    Send {
        /// 要发送的文件或目录路径
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// 调用任意动作
    Call {
        /// 动作名称
        action: String,
        /// 动作参数 (--名称 取值 形式，可重复)
        #[arg(allow_hyphen_values = true)]
        params: Vec<String>,
    },
    /// 查询 NitroShare 版本
    Version,
    /// 查看 NitroShare 运行状态
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Send { files } => send(files).await,
        Commands::Call { action, params } => call(action, &params).await,
        Commands::Version => version().await,
        Commands::Status => status(),
    }
}

/// 查找正在运行的 NitroShare；未运行时提示并退出
fn find_nitroshare() -> Result<Credentials> {
    match Credentials::load() {
        Some(credentials) => Ok(credentials),
        None => {
            eprintln!("❌ NitroShare does not appear to be running");
            eprintln!("   请先启动 NitroShare 并在设置中启用本地 API");
            std::process::exit(1);
        }
    }
}

async fn send(files: Vec<PathBuf>) -> Result<()> {
    let credentials = find_nitroshare()?;

    // 统一转成绝对路径，API 侧按本地绝对路径处理
    let mut items = Vec::new();
    for file in &files {
        match std::fs::canonicalize(file) {
            Ok(path) => items.push(path),
            Err(e) => {
                eprintln!("❌ 无法访问 {}: {}", file.display(), e);
                std::process::exit(1);
            }
        }
    }

    println!("📤 发送 {} 个项目", items.len());

    let client = ApiClient::new(&credentials);
    match client.send_items(&items).await {
        Ok(()) => {
            println!("✅ 已提交给 NitroShare");
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ {}", SEND_FAILED_MESSAGE);
            eprintln!("   {}", e);
            std::process::exit(1);
        }
    }
}

async fn call(action: String, params: &[String]) -> Result<()> {
    let params = parse_params(params)?;
    let credentials = find_nitroshare()?;

    let client = ApiClient::new(&credentials);
    match client.call(&action, &params).await {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}

async fn version() -> Result<()> {
    let credentials = find_nitroshare()?;

    let client = ApiClient::new(&credentials);
    match client.version().await {
        Ok(response) => {
            // 动作注册表包装为 {"return": ...}，老接口直接返回 {"version": ...}
            let version = response
                .get("version")
                .or_else(|| response.get("return"))
                .cloned()
                .unwrap_or(response);
            println!("NitroShare: {}", version);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}

fn status() -> Result<()> {
    match Credentials::load() {
        Some(credentials) => {
            println!("✅ NitroShare 正在运行 (端口 {})", credentials.port);
        }
        None => {
            let path = credentials_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| format!("~/{}", nitroshell_core::CREDENTIALS_FILE));
            println!("⭕ NitroShare 未运行 (未找到 {})", path);
        }
    }
    Ok(())
}

/// 把 `--名称 取值` 序列解析为 JSON 参数对象
fn parse_params(params: &[String]) -> Result<Value> {
    let mut map = Map::new();
    let mut iter = params.iter();

    while let Some(key) = iter.next() {
        let Some(name) = key.strip_prefix("--") else {
            bail!("参数必须以 \"--\" 开头: {}", key);
        };
        let Some(value) = iter.next() else {
            bail!("参数 \"{}\" 缺少取值", key);
        };
        map.insert(name.to_string(), Value::String(value.clone()));
    }

    Ok(Value::Object(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_params_pairs() {
        let params = vec![
            "--device".to_string(),
            "laptop".to_string(),
            "--url".to_string(),
            "https://example.com".to_string(),
        ];
        assert_eq!(
            parse_params(&params).unwrap(),
            json!({ "device": "laptop", "url": "https://example.com" })
        );
    }

    #[test]
    fn test_parse_params_empty() {
        assert_eq!(parse_params(&[]).unwrap(), json!({}));
    }

    #[test]
    fn test_parse_params_rejects_bare_key() {
        assert!(parse_params(&["device".to_string()]).is_err());
    }

    #[test]
    fn test_parse_params_rejects_missing_value() {
        assert!(parse_params(&["--device".to_string()]).is_err());
    }
}
