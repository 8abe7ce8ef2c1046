//! 凭据文件读取
//!
//! NitroShare 启动本地 API 时会在用户主目录写入 `.NitroShare` 文件，
//! 内容为 JSON 对象 `{"port": <端口>, "token": <令牌>}`，退出时删除。
//! 本模块按需读取该文件；文件缺失、内容非法或字段不全一律视为
//! 「NitroShare 未运行」，静默返回 None，不作为错误上报。

use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// 凭据文件名 (位于用户主目录下)
pub const CREDENTIALS_FILE: &str = ".NitroShare";

/// 本地 API 凭据
///
/// 由 NitroShare 主程序写入，本程序只读。文件中的未知字段忽略。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    /// 本地 API 监听的 TCP 端口
    pub port: u16,
    /// 共享密钥，随请求放入 X-Auth-Token 头
    pub token: String,
}

/// 凭据文件的完整路径
///
/// 主目录无法确定时返回 None。
pub fn credentials_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CREDENTIALS_FILE))
}

impl Credentials {
    /// 从默认路径读取凭据
    ///
    /// 每次调用都重新读取文件，不做缓存；两次菜单打开之间
    /// NitroShare 的启停会立即反映在返回值上。
    pub fn load() -> Option<Self> {
        Self::load_from(credentials_path()?)
    }

    /// 从指定路径读取凭据
    ///
    /// 读取失败、JSON 非法、字段缺失或端口为 0 都返回 None。
    pub fn load_from(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!("无法读取凭据文件 {}: {}", path.display(), e);
                return None;
            }
        };

        let credentials: Credentials = match serde_json::from_str(&content) {
            Ok(credentials) => credentials,
            Err(e) => {
                debug!("凭据文件内容无效 {}: {}", path.display(), e);
                return None;
            }
        };

        // 端口 0 说明文件是 NitroShare 写到一半或字段缺失
        if credentials.port == 0 {
            debug!("凭据文件缺少有效端口: {}", path.display());
            return None;
        }

        Some(credentials)
    }
}
