//! 错误类型定义。
//!
//! 分两类：
//! - [`LocatorError`]：导出失败（清单缺失/不可读、payload 缺失、目标写入失败），构造定位器时直接返回
//! - [`PermissionError`]：导出后设置执行权限失败，仅记录与告警，不中断构造
//!
//! 作者：小海智能助手项目组（自动生成）
//! 创建时间：2026-02-04
//! 修改时间：2026-10-19

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// 导出失败（致命）。
///
/// 用途：
/// - 任意变体都会中止 [`crate::ExecutableLocator::new`]；调用方无需区分即可统一处理。
#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("清单资源不存在: {resource}")]
    ManifestMissing { resource: String },
    #[error("读取清单资源失败: {resource}")]
    ManifestRead {
        resource: String,
        #[source]
        source: io::Error,
    },
    #[error("清单中没有平台 `{key}` 的文件列表")]
    PlatformNotListed { key: String },
    #[error("清单中平台 `{key}` 的文件列表为空")]
    EmptyFileList { key: String },
    #[error("清单中的文件名非法: {name}")]
    InvalidFileName { name: String },
    #[error("打包资源中缺少文件: {resource}")]
    SourceMissing { resource: String },
    #[error("读取打包资源失败: {resource}")]
    SourceRead {
        resource: String,
        #[source]
        source: io::Error,
    },
    #[error("创建目录失败: {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("写入文件失败: {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// 设置执行权限失败（非致命）。
///
/// 说明：
/// - 定位器仍返回可执行文件路径，但后续启动该文件可能失败。
#[derive(Debug, Error)]
#[error("设置执行权限失败: {}", path.display())]
pub struct PermissionError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}
