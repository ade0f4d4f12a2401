//! 可执行文件定位器：导出打包的可执行文件并给出其绝对路径。
//!
//! 主要步骤：
//! 1) 根据操作系统名称识别平台
//! 2) 计算并创建带版本号的导出目录
//! 3) 读取清单，得到当前平台需要导出的文件列表
//! 4) 逐个将打包资源复制到导出目录（有界缓冲区循环复制）
//! 5) 计算可执行文件路径（Windows 追加 `.exe`）
//! 6) 非 Windows 平台设置执行权限（失败仅告警，不中断）
//!
//! 并发说明：
//! - 同一版本号的多个实例并发运行时会相互覆盖写入同名文件，不做加锁
//!
//! 作者：小海智能助手项目组（自动生成）
//! 创建时间：2026-02-04
//! 修改时间：2026-10-19

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::config::{CleanupPolicy, LocatorConfig};
use crate::error::{LocatorError, PermissionError};
use crate::manifest::Manifest;
use crate::paths;
use crate::platform::Platform;
use crate::resources::ResourceSource;

/// 单次读写的缓冲区大小。
const COPY_BUFFER_SIZE: usize = 8 * 1024;

/// 导出后可执行文件的权限位（rwxr-xr-x）。
#[cfg(unix)]
const EXECUTABLE_MODE: u32 = 0o755;

/// 宿主环境输入（显式注入，便于测试）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnv {
    /// 操作系统名称。
    pub os_name: String,
    /// 临时目录。
    pub temp_dir: PathBuf,
}

impl HostEnv {
    pub fn new(os_name: impl Into<String>, temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            os_name: os_name.into(),
            temp_dir: temp_dir.into(),
        }
    }

    /// 从当前进程读取：`std::env::consts::OS` 与 `std::env::temp_dir()`。
    pub fn from_process() -> Self {
        Self::new(std::env::consts::OS, std::env::temp_dir())
    }
}

/// 已导出的单个文件。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedFile {
    /// 清单中的文件名。
    pub name: String,
    /// 导出后的绝对路径。
    pub path: PathBuf,
    /// 写入的字节数。
    pub bytes: u64,
}

/// 导出结果汇总（CLI `extract --json` 输出）。
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub platform: Platform,
    pub extraction_dir: PathBuf,
    pub executable_path: PathBuf,
    pub files: Vec<ExtractedFile>,
    /// 是否成功设置了执行权限（Windows 上恒为 `false`）。
    pub permissions_applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission_error: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub extracted_at: OffsetDateTime,
}

/// 可执行文件定位器。
///
/// 说明：
/// - 构造成功即代表清单中列出的文件均已导出
/// - 可执行文件路径在构造时确定，之后只读
#[derive(Debug)]
pub struct ExecutableLocator {
    platform: Platform,
    extraction_dir: PathBuf,
    executable_path: PathBuf,
    files: Vec<ExtractedFile>,
    permissions_applied: bool,
    permission_error: Option<PermissionError>,
    created_dir: bool,
    cleanup: CleanupPolicy,
    extracted_at: OffsetDateTime,
}

impl ExecutableLocator {
    /// 导出打包的可执行文件及其依赖文件。
    ///
    /// 参数：
    /// - `env`：宿主环境（操作系统名称、临时目录）
    /// - `config`：定位器配置（可执行文件名、目录前缀、版本号、清单路径）
    /// - `resources`：打包资源来源
    ///
    /// 返回值：
    /// - 成功：已完成导出的定位器
    ///
    /// 异常处理：
    /// - 清单缺失/不可读、平台未列出、payload 缺失、目录创建或文件写入失败均返回 [`LocatorError`]
    /// - 设置执行权限失败不返回错误，记录在 [`ExecutableLocator::permission_error`]
    pub fn new(
        env: &HostEnv,
        config: &LocatorConfig,
        resources: &dyn ResourceSource,
    ) -> Result<Self, LocatorError> {
        let platform = Platform::classify(&env.os_name);
        let extraction_dir = paths::extraction_dir(&env.temp_dir, config)?;
        let created_dir = paths::ensure_dir(&extraction_dir)?;
        if created_dir {
            info!("创建导出目录: {}", extraction_dir.display());
        }

        let files = match extract_files(resources, &config.manifest_name, platform, &extraction_dir) {
            Ok(files) => files,
            Err(e) => {
                // 构造失败时 Drop 不会执行，需在此处清理本实例创建的目录
                if created_dir && config.cleanup == CleanupPolicy::RemoveOnDrop {
                    remove_extraction_dir(&extraction_dir);
                }
                return Err(e);
            }
        };

        let executable_path =
            extraction_dir.join(platform.executable_file_name(&config.executable));

        let mut permissions_applied = false;
        let mut permission_error = None;
        if !platform.is_windows() {
            match make_executable(&executable_path) {
                Ok(()) => permissions_applied = true,
                Err(e) => {
                    let err = PermissionError {
                        path: executable_path.clone(),
                        source: e,
                    };
                    warn!("{}: {}", err, err.source);
                    permission_error = Some(err);
                }
            }
        }

        info!(
            "导出完成: {} 个文件, 可执行文件 {}",
            files.len(),
            executable_path.display()
        );

        Ok(Self {
            platform,
            extraction_dir,
            executable_path,
            files,
            permissions_applied,
            permission_error,
            created_dir,
            cleanup: config.cleanup,
            extracted_at: OffsetDateTime::now_utc(),
        })
    }

    /// 使用当前进程环境构造，等价于 `new(&HostEnv::from_process(), ..)`。
    pub fn from_process(
        config: &LocatorConfig,
        resources: &dyn ResourceSource,
    ) -> Result<Self, LocatorError> {
        Self::new(&HostEnv::from_process(), config, resources)
    }

    /// 可执行文件的绝对路径（构造时确定，无副作用）。
    pub fn executable_path(&self) -> &Path {
        &self.executable_path
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn extraction_dir(&self) -> &Path {
        &self.extraction_dir
    }

    pub fn files(&self) -> &[ExtractedFile] {
        &self.files
    }

    /// 设置执行权限失败时的错误（非致命）。
    pub fn permission_error(&self) -> Option<&PermissionError> {
        self.permission_error.as_ref()
    }

    pub fn report(&self) -> ExtractionReport {
        ExtractionReport {
            platform: self.platform,
            extraction_dir: self.extraction_dir.clone(),
            executable_path: self.executable_path.clone(),
            files: self.files.clone(),
            permissions_applied: self.permissions_applied,
            permission_error: self.permission_error.as_ref().map(|e| format!("{e}: {}", e.source)),
            extracted_at: self.extracted_at,
        }
    }
}

impl Drop for ExecutableLocator {
    fn drop(&mut self) {
        if self.cleanup == CleanupPolicy::RemoveOnDrop && self.created_dir {
            remove_extraction_dir(&self.extraction_dir);
        }
    }
}

fn remove_extraction_dir(dir: &Path) {
    if let Err(e) = std::fs::remove_dir_all(dir) {
        debug!("删除导出目录失败（忽略）: {}: {e}", dir.display());
    }
}

/// 读取清单并将当前平台列出的全部文件导出到 `dir`。
///
/// 异常处理：
/// - 任一文件导出失败立即返回，已导出的文件保留在目录中
fn extract_files(
    resources: &dyn ResourceSource,
    manifest_name: &str,
    platform: Platform,
    dir: &Path,
) -> Result<Vec<ExtractedFile>, LocatorError> {
    let manifest = Manifest::load(resources, manifest_name)?;
    let names = manifest.files_for(platform)?;

    let mut files = Vec::with_capacity(names.len());
    for name in names {
        let dest = paths::resolve_entry(dir, name)?;
        let resource = format!("{}/{}", platform.manifest_key(), name);
        let bytes = copy_resource(resources, &resource, &dest)?;
        debug!("已导出 {} -> {} ({} 字节)", resource, dest.display(), bytes);
        files.push(ExtractedFile {
            name: name.clone(),
            path: dest,
            bytes,
        });
    }
    Ok(files)
}

/// 将单个打包资源复制到目标文件。
///
/// 返回值：
/// - 写入的字节数
///
/// 异常处理：
/// - 资源不存在返回 [`LocatorError::SourceMissing`]，读取失败返回 [`LocatorError::SourceRead`]
/// - 创建/写入目标文件失败返回 [`LocatorError::Write`]
fn copy_resource(
    resources: &dyn ResourceSource,
    resource: &str,
    dest: &Path,
) -> Result<u64, LocatorError> {
    let mut input = resources.open(resource).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            LocatorError::SourceMissing {
                resource: resources.describe(resource),
            }
        } else {
            LocatorError::SourceRead {
                resource: resources.describe(resource),
                source: e,
            }
        }
    })?;

    if let Some(parent) = dest.parent() {
        paths::ensure_dir(parent)?;
    }
    let write_err = |e: io::Error| LocatorError::Write {
        path: dest.to_path_buf(),
        source: e,
    };
    let mut output = File::create(dest).map_err(write_err)?;

    let mut buf = [0u8; COPY_BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        let n = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(LocatorError::SourceRead {
                    resource: resources.describe(resource),
                    source: e,
                })
            }
        };
        output.write_all(&buf[..n]).map_err(write_err)?;
        total += n as u64;
    }
    output.flush().map_err(write_err)?;
    Ok(total)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(EXECUTABLE_MODE);
    std::fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "当前宿主不支持 unix 权限位",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::EmbeddedResources;

    const PAYLOAD: &[u8] = &[0u8; COPY_BUFFER_SIZE * 2 + 17];

    static TABLE: &[(&str, &[u8])] = &[
        ("manifest.properties", b"linux=tool;data/big.bin\nwindows=tool.exe\n"),
        ("linux/tool", b"#!/bin/sh\necho tool\n"),
        ("linux/data/big.bin", PAYLOAD),
        ("windows/tool.exe", b"MZ"),
    ];

    fn temp_root(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("exe-locator-unit-{tag}-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    /// 超过缓冲区大小的文件应被完整复制。
    fn copies_payload_larger_than_buffer() {
        let root = temp_root("big");
        let env = HostEnv::new("Linux", &root);
        let mut config = LocatorConfig::new("tool");
        config.cleanup = CleanupPolicy::RemoveOnDrop;

        let locator = ExecutableLocator::new(&env, &config, &EmbeddedResources::new(TABLE)).unwrap();
        let big = locator.extraction_dir().join("data").join("big.bin");
        assert_eq!(std::fs::read(&big).unwrap(), PAYLOAD);
        assert_eq!(locator.files()[1].bytes, PAYLOAD.len() as u64);

        drop(locator);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn windows_skips_permission_step() {
        let root = temp_root("win");
        let env = HostEnv::new("Windows 11", &root);
        let locator =
            ExecutableLocator::new(&env, &LocatorConfig::new("tool"), &EmbeddedResources::new(TABLE))
                .unwrap();
        assert!(locator.executable_path().ends_with("tool.exe"));
        assert!(locator.permission_error().is_none());
        assert!(!locator.report().permissions_applied);

        drop(locator);
        let _ = std::fs::remove_dir_all(&root);
    }
}
