//! Nitroshell Core Library
//!
//! NitroShare 桌面端本地 API 的集成核心。NitroShare 运行时会在
//! 127.0.0.1 上监听一个 HTTP API，并把端口和令牌写入用户主目录的
//! `.NitroShare` 文件；本库负责读取凭据、解析文件管理器给出的
//! file:// URI、构造右键菜单项并发起发送请求。
//!
//! 供三个前端复用：文件管理器扩展适配层、命令行客户端 (nitroshell-cli)
//! 和浏览器 Native Messaging Host (nitroshell-nmh)。
//!
//! # 模块
//!
//! - **credentials**: `~/.NitroShare` 凭据文件读取
//! - **uri**: file:// URI 到本地路径的解析
//! - **client**: 本地 HTTP API 客户端 (sendItems 及通用动作调用)
//! - **menu**: 菜单项构造与激活逻辑，宿主集成 trait
//!
//! # 使用示例
//!
//! ```ignore
//! use nitroshell_core::build_menu_entry;
//!
//! // 文件管理器打开右键菜单时
//! let Some(entry) = build_menu_entry(&selection) else {
//!     return; // 空选择，不贡献菜单项
//! };
//!
//! // 用户点击菜单项后 (宿主的激活回调中)
//! entry.activate(&dialog).await?;
//! ```

pub mod client;
pub mod credentials;
pub mod menu;
pub mod uri;

// Client re-exports
pub use client::{ApiClient, ApiError, AUTH_HEADER};

// Credentials re-exports
pub use credentials::{CREDENTIALS_FILE, Credentials, credentials_path};

// Menu re-exports
pub use menu::{
    ErrorDialog, MENU_LABEL, MENU_NAME, MenuEntry, SEND_FAILED_MESSAGE, SelectedItem, SendAction,
    build_menu_entry, build_menu_entry_with,
};

// URI re-exports
pub use uri::uri_to_path;
