//! 内置可执行文件定位核心库（跨平台）。
//!
//! 功能：
//! - 识别宿主平台（macOS / Windows / 其他按 Linux 处理）
//! - 读取打包清单（manifest.properties），得到当前平台需要导出的文件列表
//! - 将可执行文件及其依赖文件导出到带版本号的临时目录
//! - 非 Windows 平台为导出的可执行文件设置执行权限
//! - 对外暴露可执行文件的绝对路径，供调用方启动外部进程
//!
//! 作者：小海智能助手项目组（自动生成）
//! 创建时间：2026-02-04
//! 修改时间：2026-10-19

pub mod config;
pub mod error;
pub mod locator;
pub mod manifest;
pub mod paths;
pub mod platform;
pub mod resources;

pub use config::{CleanupPolicy, LocatorConfig, EXECUTABLE_VERSION};
pub use error::{LocatorError, PermissionError};
pub use locator::{ExecutableLocator, ExtractedFile, ExtractionReport, HostEnv};
pub use manifest::Manifest;
pub use platform::Platform;
pub use resources::{DirResources, EmbeddedResources, ResourceSource};
