//! 打包清单（manifest.properties）。
//!
//! 格式（properties，每个逻辑行一条）：
//! - `平台键=文件1;文件2;...`，键与值之间可用 `=`、`:` 或空白分隔
//! - 行尾的 `\` 表示续行，下一行的前导空白被丢弃
//! - 空行以及首个非空白字符为 `#` / `!` 的行视为注释
//! - 支持 `\t`、`\uXXXX` 等转义，`\=`、`\:`、`\ ` 可出现在键中
//! - 文件名会去除首尾空白，空文件名被丢弃；重复的键以后出现者为准
//!
//! 约定：
//! - 清单加载后不可变；文件名按清单中的顺序导出
//!
//! 作者：小海智能助手项目组（自动生成）
//! 创建时间：2026-02-04
//! 修改时间：2026-10-19

use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::LocatorError;
use crate::platform::Platform;
use crate::resources::ResourceSource;

/// 文件列表分隔符。
pub const FILE_LIST_DELIMITER: char = ';';

/// 平台键到文件列表的映射。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    entries: BTreeMap<String, Vec<String>>,
}

impl Manifest {
    /// 解析 properties 文本。
    ///
    /// 该格式没有语法错误的概念：无法识别的行（缺少分隔符）按“键=空值”处理。
    pub fn parse(text: &str) -> Self {
        let mut entries = BTreeMap::new();
        for line in logical_lines(text) {
            let (key, value) = split_entry(&line);
            let files = value
                .split(FILE_LIST_DELIMITER)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            entries.insert(key, files);
        }
        Self { entries }
    }

    /// 从打包资源中读取并解析清单。
    ///
    /// 参数：
    /// - `resources`：打包资源来源
    /// - `name`：清单在资源中的路径
    ///
    /// 异常处理：
    /// - 资源不存在返回 [`LocatorError::ManifestMissing`]
    /// - 读取失败或内容不是 UTF-8 返回 [`LocatorError::ManifestRead`]
    pub fn load(resources: &dyn ResourceSource, name: &str) -> Result<Self, LocatorError> {
        let mut reader = resources.open(name).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LocatorError::ManifestMissing {
                    resource: resources.describe(name),
                }
            } else {
                LocatorError::ManifestRead {
                    resource: resources.describe(name),
                    source: e,
                }
            }
        })?;
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| LocatorError::ManifestRead {
                resource: resources.describe(name),
                source: e,
            })?;
        Ok(Self::parse(&text))
    }

    /// 按平台键查询文件列表。
    pub fn files(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// 查询指定平台需要导出的文件列表。
    ///
    /// 异常处理：
    /// - 清单未列出该平台返回 [`LocatorError::PlatformNotListed`]
    /// - 列表为空返回 [`LocatorError::EmptyFileList`]
    pub fn files_for(&self, platform: Platform) -> Result<&[String], LocatorError> {
        let key = platform.manifest_key();
        let files = self
            .files(key)
            .ok_or_else(|| LocatorError::PlatformNotListed {
                key: key.to_string(),
            })?;
        if files.is_empty() {
            return Err(LocatorError::EmptyFileList {
                key: key.to_string(),
            });
        }
        Ok(files)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// properties 中的空白字符（空格、制表符、换页符）。
fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// 将物理行合并为逻辑行。
///
/// 规则：
/// - 以奇数个 `\` 结尾的行与下一行相连，下一行的前导空白被丢弃
/// - 注释与空行只在逻辑行开头判断，续行内容不会被当作注释
fn logical_lines(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut continuing = false;
    for raw in text.lines() {
        let line = raw.trim_start_matches(is_blank);
        if !continuing && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
            continue;
        }
        let trailing = line.chars().rev().take_while(|&c| c == '\\').count();
        if trailing % 2 == 1 {
            current.push_str(&line[..line.len() - 1]);
            continuing = true;
        } else {
            current.push_str(line);
            out.push(std::mem::take(&mut current));
            continuing = false;
        }
    }
    if continuing {
        out.push(current);
    }
    out
}

/// 拆分逻辑行为（键, 值），键与值均已还原转义。
///
/// 键在第一个未转义的 `=`、`:` 或空白处结束；其后可选的一个 `=`/`:` 两侧空白被忽略。
fn split_entry(line: &str) -> (String, String) {
    let mut end = line.len();
    let mut escaped = false;
    for (idx, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || is_blank(c) {
            end = idx;
            break;
        }
    }
    let key = &line[..end];
    let mut rest = line[end..].trim_start_matches(is_blank);
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start_matches(is_blank);
    }
    (unescape(key), unescape(rest))
}

/// 还原 `\t`、`\n`、`\r`、`\f`、`\uXXXX` 转义；其他 `\x` 还原为 `x`。
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if hex.len() == 4 => out.push(decoded),
                    _ => {
                        out.push('u');
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
