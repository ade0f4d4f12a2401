//! 打包资源来源。
//!
//! 资源路径统一使用 `/` 分隔的相对路径，例如：
//! - `manifest.properties`
//! - `linux/ffmpeg`
//!
//! 提供两种实现：
//! - [`DirResources`]：磁盘上的资源目录（随安装包分发）
//! - [`EmbeddedResources`]：编译期通过 `include_bytes!` 内嵌的静态表
//!
//! 作者：小海智能助手项目组（自动生成）
//! 创建时间：2026-02-04
//! 修改时间：2026-10-19

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// 只读的打包资源来源。
pub trait ResourceSource {
    /// 打开资源。资源不存在时返回 `io::ErrorKind::NotFound`。
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + '_>>;

    /// 资源的可读描述（用于错误信息与日志）。
    fn describe(&self, path: &str) -> String;
}

/// 以磁盘目录作为资源根。
#[derive(Debug, Clone)]
pub struct DirResources {
    root: PathBuf,
}

impl DirResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        path.split('/')
            .filter(|seg| !seg.is_empty())
            .fold(self.root.clone(), |acc, seg| acc.join(seg))
    }
}

impl ResourceSource for DirResources {
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + '_>> {
        let full = self.resolve(path);
        // 目录也能被 File::open 打开（unix），需显式排除
        if full.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("不是文件: {}", full.display()),
            ));
        }
        Ok(Box::new(File::open(full)?))
    }

    fn describe(&self, path: &str) -> String {
        self.resolve(path).display().to_string()
    }
}

/// 编译期内嵌的资源表。
///
/// 示例：
/// ```
/// use exe_locator_core::{EmbeddedResources, ResourceSource};
///
/// static TABLE: &[(&str, &[u8])] = &[("manifest.properties", b"linux=tool\n")];
/// let res = EmbeddedResources::new(TABLE);
/// assert!(res.open("manifest.properties").is_ok());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedResources {
    entries: &'static [(&'static str, &'static [u8])],
}

impl EmbeddedResources {
    pub const fn new(entries: &'static [(&'static str, &'static [u8])]) -> Self {
        Self { entries }
    }

    fn get(&self, path: &str) -> Option<&'static [u8]> {
        let path = path.trim_start_matches('/');
        self.entries
            .iter()
            .find(|(name, _)| name.trim_start_matches('/') == path)
            .map(|(_, bytes)| *bytes)
    }
}

impl ResourceSource for EmbeddedResources {
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + '_>> {
        self.get(path)
            .map(|bytes| Box::new(bytes) as Box<dyn Read>)
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, format!("内嵌资源不存在: {path}"))
            })
    }

    fn describe(&self, path: &str) -> String {
        format!("embedded:{}", path.trim_start_matches('/'))
    }
}
