//! 宿主平台识别。
//!
//! 识别规则（不区分大小写，按子串匹配）：
//! - 包含 `mac`：macOS
//! - 包含 `windows`：Windows
//! - 其他：按 Linux 处理
//!
//! 作者：小海智能助手项目组（自动生成）
//! 创建时间：2026-02-04
//! 修改时间：2026-10-19

use std::fmt;

use serde::{Deserialize, Serialize};

/// 平台族枚举（封闭集合）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// macOS。
    MacOs,
    /// Windows。
    Windows,
    /// 其他（Linux 及未识别系统）。
    Other,
}

impl Platform {
    /// 全部平台，按清单中的惯用顺序排列。
    pub const ALL: [Platform; 3] = [Platform::MacOs, Platform::Windows, Platform::Other];

    /// 根据操作系统名称识别平台。
    ///
    /// 参数：
    /// - `os_name`：操作系统名称（例如 `std::env::consts::OS` 或 `Mac OS X`）
    ///
    /// 返回值：
    /// - 识别出的 [`Platform`]；无法识别时返回 [`Platform::Other`]
    pub fn classify(os_name: &str) -> Self {
        let os = os_name.to_ascii_lowercase();
        if os.contains("mac") {
            Platform::MacOs
        } else if os.contains("windows") {
            Platform::Windows
        } else {
            Platform::Other
        }
    }

    /// 清单中的平台键，同时也是资源中该平台 payload 的目录名。
    pub fn manifest_key(self) -> &'static str {
        match self {
            Platform::MacOs => "macos",
            Platform::Windows => "windows",
            Platform::Other => "linux",
        }
    }

    pub fn is_windows(self) -> bool {
        matches!(self, Platform::Windows)
    }

    /// 由基础名称得到该平台上的可执行文件名（仅 Windows 追加 `.exe`）。
    pub fn executable_file_name(self, base: &str) -> String {
        if self.is_windows() {
            format!("{base}.exe")
        } else {
            base.to_string()
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.manifest_key())
    }
}
