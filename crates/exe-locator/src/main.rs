//! 内置可执行文件导出工具（命令行入口）。
//!
//! 职责：
//! - 读取打包资源目录中的清单，按平台导出可执行文件及依赖文件
//! - 输出导出后的可执行文件路径（或 JSON 报告），供脚本/上层程序调用
//! - 提供检测与自检子命令，便于排障
//!
//! 作者：小海智能助手项目组（自动生成）
//! 创建时间：2026-02-04
//! 修改时间：2026-10-19

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use exe_locator_core::{
    paths, DirResources, ExecutableLocator, HostEnv, LocatorConfig, Manifest, Platform,
};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;

/// 命令行参数。
///
/// 说明：
/// - `resources` 指向打包资源根目录（包含清单与各平台 payload 目录），仅 extract/detect 需要
/// - `config` 为可选 JSON 配置；命令行参数优先级高于配置文件
/// - `os_name` / `temp_dir` 用于覆盖宿主环境（测试/交叉排障）
#[derive(Debug, Parser)]
#[command(name = "exe-locator", version)]
struct Cli {
    #[arg(long)]
    resources: Option<PathBuf>,

    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    executable: Option<String>,

    #[arg(long)]
    version_tag: Option<u32>,

    #[arg(long)]
    dir_prefix: Option<String>,

    #[arg(long)]
    manifest_name: Option<String>,

    #[arg(long)]
    os_name: Option<String>,

    #[arg(long)]
    temp_dir: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    silent: bool,

    #[command(subcommand)]
    command: Commands,
}

/// 支持的子命令。
#[derive(Debug, Subcommand)]
enum Commands {
    /// 导出并输出可执行文件路径。
    Extract {
        /// 以 JSON 输出完整导出报告。
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// 仅输出平台识别结果与清单文件列表（不写文件）。
    Detect,
    /// 环境自检（临时目录、导出目录、可执行文件状态）。
    Doctor,
}

/// 未指定 `--executable` 且配置文件也未提供时使用的名称。
const DEFAULT_EXECUTABLE: &str = "mediatool";

/// 程序入口：初始化日志、解析参数并分发子命令。
///
/// 异常处理：
/// - 任意子命令执行失败会返回 `Err`，由运行时输出错误链并以非零码退出。
fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.silent {
        LevelFilter::WARN
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Extract { json } => extract(&cli, json),
        Commands::Detect => detect(&cli),
        Commands::Doctor => doctor(&cli),
    }
}

/// 读取 JSON 配置文件。
///
/// 异常处理：
/// - 文件读取失败（不存在/权限/IO）返回错误
/// - JSON 解析失败返回错误
fn load_config(path: &Path) -> Result<LocatorConfig> {
    let bytes = std::fs::read(path).with_context(|| format!("读取配置失败: {}", path.display()))?;
    let config: LocatorConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("解析配置 JSON 失败: {}", path.display()))?;
    Ok(config)
}

/// 合并配置文件与命令行参数（命令行优先）。
fn resolve_config(cli: &Cli) -> Result<LocatorConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => LocatorConfig::new(DEFAULT_EXECUTABLE),
    };
    if let Some(executable) = &cli.executable {
        config.executable = executable.clone();
    }
    if let Some(version) = cli.version_tag {
        config.version = version;
    }
    if let Some(prefix) = &cli.dir_prefix {
        config.dir_prefix = prefix.clone();
    }
    if let Some(name) = &cli.manifest_name {
        config.manifest_name = name.clone();
    }
    Ok(config)
}

/// 打开 `--resources` 指定的资源目录。
///
/// 异常处理：
/// - 未指定 `--resources` 时返回错误
fn resolve_resources(cli: &Cli) -> Result<DirResources> {
    let root = cli
        .resources
        .as_ref()
        .ok_or_else(|| anyhow!("该子命令需要 --resources 参数"))?;
    Ok(DirResources::new(root))
}

/// 以进程环境为基础，应用命令行覆盖项。
fn resolve_env(cli: &Cli) -> HostEnv {
    let mut env = HostEnv::from_process();
    if let Some(os_name) = &cli.os_name {
        env.os_name = os_name.clone();
    }
    if let Some(temp_dir) = &cli.temp_dir {
        env.temp_dir = temp_dir.clone();
    }
    env
}

/// 执行导出并输出结果。
///
/// 输出：
/// - 默认：stdout 单行输出可执行文件绝对路径
/// - `--json`：stdout 输出 [`exe_locator_core::ExtractionReport`]
///
/// 异常处理：
/// - 导出失败（清单/payload 缺失、写入失败）返回错误
/// - 设置执行权限失败仅告警，仍输出路径
fn extract(cli: &Cli, json: bool) -> Result<()> {
    let config = resolve_config(cli)?;
    let env = resolve_env(cli);
    let resources = resolve_resources(cli)?;

    info!(
        "开始导出: {} (版本 {}) 资源目录 {}",
        config.executable,
        config.version,
        resources.root().display()
    );
    let locator = ExecutableLocator::new(&env, &config, &resources).context("导出可执行文件失败")?;

    if json {
        let report = serde_json::to_string_pretty(&locator.report()).context("序列化导出报告失败")?;
        println!("{report}");
    } else {
        println!("{}", locator.executable_path().display());
    }
    Ok(())
}

/// 输出平台识别结果与该平台的清单文件列表。
///
/// 异常处理：
/// - 清单读取失败或未列出当前平台时返回错误
fn detect(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    let env = resolve_env(cli);
    let resources = resolve_resources(cli)?;

    let platform = Platform::classify(&env.os_name);
    let manifest = Manifest::load(&resources, &config.manifest_name).context("读取清单失败")?;
    let files = manifest.files_for(platform).context("查询平台文件列表失败")?;

    println!("os_name = {}", env.os_name);
    println!("platform = {}", platform);
    println!(
        "executable = {}",
        platform.executable_file_name(&config.executable)
    );
    println!("files = {}", files.join(";"));
    Ok(())
}

/// 环境自检（用于排障）。
///
/// 输出：
/// - 操作系统名称与识别出的平台
/// - 临时目录与导出目录
/// - 可执行文件是否已导出、是否具备执行权限
fn doctor(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    let env = resolve_env(cli);
    let platform = Platform::classify(&env.os_name);
    let dir = paths::extraction_dir(&env.temp_dir, &config).context("计算导出目录失败")?;
    let exe = dir.join(platform.executable_file_name(&config.executable));

    println!("os_name = {}", env.os_name);
    println!("platform = {}", platform);
    println!("temp_dir = {}", env.temp_dir.display());
    println!("extraction_dir = {}", dir.display());
    println!("executable = {}", exe.display());
    println!("executable_exists = {}", exe.is_file());
    println!("executable_runnable = {}", is_runnable(&exe, platform));
    Ok(())
}

#[cfg(unix)]
fn is_runnable(path: &Path, platform: Platform) -> bool {
    use std::os::unix::fs::PermissionsExt;

    if platform.is_windows() {
        return path.is_file();
    }
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 == 0o111)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_runnable(path: &Path, _platform: Platform) -> bool {
    path.is_file()
}
