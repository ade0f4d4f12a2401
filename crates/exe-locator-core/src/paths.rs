//! 导出目录与路径约定。
//!
//! 目标：
//! - 将导出目录的命名规则集中管理（`<临时目录>/<前缀>-<版本>`）
//! - 保证清单中的文件名只能落在导出目录内部
//!
//! 作者：小海智能助手项目组（自动生成）
//! 创建时间：2026-02-04
//! 修改时间：2026-10-19

use std::path::{Component, Path, PathBuf};

use crate::config::LocatorConfig;
use crate::error::LocatorError;

/// 将临时目录转换为绝对路径。
///
/// 说明：
/// - `TMPDIR=tmp` 之类的相对值会以当前工作目录为基准展开
/// - 空路径（例如 `TMPDIR=""`）视为当前工作目录
///
/// 异常处理：
/// - 无法读取当前工作目录时返回 [`LocatorError::CreateDir`]，不会返回相对路径
pub fn absolute_temp_dir(temp_dir: &Path) -> Result<PathBuf, LocatorError> {
    let resolved = if temp_dir.as_os_str().is_empty() {
        std::env::current_dir()
    } else {
        std::path::absolute(temp_dir)
    };
    resolved.map_err(|e| LocatorError::CreateDir {
        path: temp_dir.to_path_buf(),
        source: e,
    })
}

/// 计算导出目录路径（不创建）。
///
/// 返回值：
/// - `<temp_dir 绝对路径>/<dir_prefix>-<version>`
pub fn extraction_dir(temp_dir: &Path, config: &LocatorConfig) -> Result<PathBuf, LocatorError> {
    Ok(absolute_temp_dir(temp_dir)?.join(config.dir_name()))
}

/// 确保目录存在（不存在则递归创建）。
///
/// 返回值：
/// - `Ok(true)`：本次调用新建了目录
/// - `Ok(false)`：目录已存在
///
/// 异常处理：
/// - 目录创建失败（权限、路径非法等）返回 [`LocatorError::CreateDir`]
pub fn ensure_dir(path: &Path) -> Result<bool, LocatorError> {
    if path.is_dir() {
        return Ok(false);
    }
    std::fs::create_dir_all(path).map_err(|e| LocatorError::CreateDir {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(true)
}

/// 将清单中的文件名解析为导出目录下的目标路径。
///
/// 参数：
/// - `dir`：导出目录
/// - `name`：清单中的相对文件名（允许 `/` 分隔的子目录）
///
/// 异常处理：
/// - 空文件名、绝对路径或包含 `..` 的文件名返回 [`LocatorError::InvalidFileName`]，
///   避免写出导出目录之外。
pub fn resolve_entry(dir: &Path, name: &str) -> Result<PathBuf, LocatorError> {
    let invalid = || LocatorError::InvalidFileName {
        name: name.to_string(),
    };
    if name.trim().is_empty() {
        return Err(invalid());
    }
    let mut out = dir.to_path_buf();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(seg) => out.push(seg),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(invalid())
            }
        }
    }
    if out == dir {
        return Err(invalid());
    }
    Ok(out)
}
