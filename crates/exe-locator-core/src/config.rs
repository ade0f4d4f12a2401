//! 定位器配置。
//!
//! 说明：
//! - 除 `executable` 外的字段都通过 `#[serde(default)]` 提供默认值，配置文件可只写必要字段
//! - 该模块仅定义数据结构，不执行任何 IO
//!
//! 作者：小海智能助手项目组（自动生成）
//! 创建时间：2026-02-04
//! 修改时间：2026-10-19

use serde::{Deserialize, Serialize};

/// 内置可执行文件的版本计数器。
///
/// 注意：
/// - 每次更换打包的可执行文件内容都必须加 1，避免与旧版本导出目录冲突。
pub const EXECUTABLE_VERSION: u32 = 1;

/// 默认导出目录前缀（目录名为 `<前缀>-<版本>`）。
pub const DEFAULT_DIR_PREFIX: &str = "exe-locator";

/// 默认清单资源路径。
pub const DEFAULT_MANIFEST_NAME: &str = "manifest.properties";

/// 定位器配置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// 可执行文件基础名称（不含 `.exe`）。
    pub executable: String,
    #[serde(default = "default_dir_prefix")]
    /// 导出目录前缀。
    pub dir_prefix: String,
    #[serde(default = "default_version")]
    /// 版本计数器。
    pub version: u32,
    #[serde(default = "default_manifest_name")]
    /// 清单在打包资源中的路径。
    pub manifest_name: String,
    #[serde(default)]
    /// 导出目录清理策略。
    pub cleanup: CleanupPolicy,
}

impl LocatorConfig {
    /// 以默认值创建配置。
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            dir_prefix: default_dir_prefix(),
            version: default_version(),
            manifest_name: default_manifest_name(),
            cleanup: CleanupPolicy::default(),
        }
    }

    /// 导出目录名：`<dir_prefix>-<version>`。
    pub fn dir_name(&self) -> String {
        format!("{}-{}", self.dir_prefix, self.version)
    }
}

/// 导出目录清理策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupPolicy {
    #[default]
    /// 保留导出目录（后续启动可复用同版本目录）。
    Keep,
    /// 定位器析构（或构造失败）时尽力删除本实例创建的导出目录。
    RemoveOnDrop,
}

fn default_dir_prefix() -> String {
    DEFAULT_DIR_PREFIX.to_string()
}

fn default_version() -> u32 {
    EXECUTABLE_VERSION
}

fn default_manifest_name() -> String {
    DEFAULT_MANIFEST_NAME.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_from_minimal_json() {
        let c: LocatorConfig = serde_json::from_str(r#"{ "executable": "ffmpeg" }"#).unwrap();
        assert_eq!(c, LocatorConfig::new("ffmpeg"));
        assert_eq!(c.dir_name(), format!("exe-locator-{EXECUTABLE_VERSION}"));
    }

    #[test]
    fn config_cleanup_serde() {
        let c: LocatorConfig = serde_json::from_str(
            r#"{ "executable": "x", "version": 7, "cleanup": "remove_on_drop" }"#,
        )
        .unwrap();
        assert_eq!(c.cleanup, CleanupPolicy::RemoveOnDrop);
        assert_eq!(c.dir_name(), "exe-locator-7");
    }
}
