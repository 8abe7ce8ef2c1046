//! 上下文菜单集成
//!
//! 文件管理器打开右键菜单时调用 [`build_menu_entry`] 构造
//! 「Send with NitroShare...」菜单项；用户点击后由宿主适配层调用
//! [`MenuEntry::activate`] 完成实际发送。
//!
//! 宿主侧需要提供两样东西：
//! - 实现 [`SelectedItem`] 的选中项句柄 (暴露 URI)
//! - 实现 [`ErrorDialog`] 的模态错误弹窗
//!
//! 菜单项的可用状态只反映构造那一刻凭据文件的可用性，点击时不再
//! 重新检查；发送参数在构造时按值捕获。

use log::debug;
use std::path::PathBuf;

use crate::client::{ApiClient, ApiError};
use crate::credentials::Credentials;
use crate::uri::uri_to_path;

/// 菜单项动作标识
pub const MENU_NAME: &str = "NitroShare::SendFiles";

/// 菜单项显示文本
pub const MENU_LABEL: &str = "Send with NitroShare...";

/// 发送失败弹窗的主文本
pub const SEND_FAILED_MESSAGE: &str = "Unable to communicate with NitroShare.";

/// 文件管理器提供的选中项句柄
pub trait SelectedItem {
    /// 选中项的 URI (`file://...`)
    fn uri(&self) -> String;
}

/// 宿主提供的模态错误弹窗
///
/// 实现方应阻塞直到用户关闭弹窗。
pub trait ErrorDialog {
    /// 显示错误弹窗
    ///
    /// `summary` 为固定主文本，`detail` 为具体失败原因。
    fn show_error(&self, summary: &str, detail: &str);
}

/// 菜单构建时按值捕获的发送参数
///
/// 构建后不可变；构建与点击之间凭据文件的变化不影响已捕获的值。
#[derive(Debug, Clone)]
pub struct SendAction {
    items: Vec<PathBuf>,
    credentials: Credentials,
}

impl SendAction {
    /// 捕获的路径列表 (选中顺序)
    pub fn items(&self) -> &[PathBuf] {
        &self.items
    }

    /// 执行发送
    pub async fn send(&self) -> Result<(), ApiError> {
        ApiClient::new(&self.credentials)
            .send_items(&self.items)
            .await
    }
}

/// 上下文菜单项
///
/// 由 [`build_menu_entry`] 产出，再由宿主适配层映射到具体
/// 文件管理器的菜单对象。
#[derive(Debug, Clone)]
pub struct MenuEntry {
    action: Option<SendAction>,
}

impl MenuEntry {
    /// 动作标识
    pub fn name(&self) -> &'static str {
        MENU_NAME
    }

    /// 显示文本
    pub fn label(&self) -> &'static str {
        MENU_LABEL
    }

    /// 菜单项是否可点击
    ///
    /// 可用等价于构造时凭据存在且动作已绑定。
    pub fn enabled(&self) -> bool {
        self.action.is_some()
    }

    /// 绑定的发送动作 (不可用时为 None)
    pub fn action(&self) -> Option<&SendAction> {
        self.action.as_ref()
    }

    /// 用户点击菜单项
    ///
    /// 连接失败时弹出一次错误弹窗，弹窗关闭后操作结束，返回 Ok；
    /// 其余错误原样返回，由宿主适配层决定如何呈现，不得静默丢弃。
    /// 对不可用的菜单项调用是空操作。
    pub async fn activate<D: ErrorDialog>(&self, dialog: &D) -> Result<(), ApiError> {
        let Some(action) = &self.action else {
            return Ok(());
        };

        match action.send().await {
            Ok(()) => Ok(()),
            Err(e) if e.is_connect() => {
                dialog.show_error(SEND_FAILED_MESSAGE, &e.to_string());
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

/// 为当前选中项构造菜单项
///
/// 每次调用都重新读取凭据文件。
pub fn build_menu_entry<T: SelectedItem>(selection: &[T]) -> Option<MenuEntry> {
    build_menu_entry_with(selection, Credentials::load())
}

/// 用给定凭据构造菜单项 (测试与自定义宿主的入口)
///
/// 空选择不产生菜单项；凭据缺失时菜单项置灰且不绑定动作。
pub fn build_menu_entry_with<T: SelectedItem>(
    selection: &[T],
    credentials: Option<Credentials>,
) -> Option<MenuEntry> {
    if selection.is_empty() {
        return None;
    }

    let Some(credentials) = credentials else {
        debug!("凭据不可用，菜单项置灰");
        return Some(MenuEntry { action: None });
    };

    // 无法解析的 URI 跳过，其余保持选中顺序
    let items: Vec<PathBuf> = selection
        .iter()
        .filter_map(|item| uri_to_path(&item.uri()))
        .collect();

    Some(MenuEntry {
        action: Some(SendAction { items, credentials }),
    })
}
