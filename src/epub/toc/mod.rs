//! 目录（Table of Contents）解析模块
//!
//! EPUB存在两种互不兼容的目录格式：EPUB 2的NCX导航控制文件和
//! EPUB 3的XHTML导航文档。定位器负责嗅探格式并产出带标签的
//! [`TocFormat`]变体，两个解析器产出同一种扁平的条目序列。

pub mod locator;
pub mod nav_doc;
pub mod ncx;

pub use locator::{TocFormat, locate_toc};

use crate::epub::error::Result;

/// 目录原始条目：标题与未解析的目标引用
///
/// 目标引用是相对于目录文件的文档路径，可能带"#锚点"后缀，
/// 由锚点解析器进一步拆分和定位。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTocEntry {
    /// 条目标题
    pub title: String,
    /// 原始目标引用，如"ch1.html#s1"
    pub target: String,
}

/// 按给定格式解析目录描述文件
///
/// 格式由[`locate_toc`]嗅探一次后显式传入，解析时不再重新探测。
/// 空的条目序列是合法结果，不是错误。
///
/// # 参数
/// * `content` - 目录文件的内容
/// * `format` - 目录格式
///
/// # 返回值
/// * `Result<Vec<RawTocEntry>>` - 文档顺序的条目序列
pub fn parse_toc(content: &str, format: TocFormat) -> Result<Vec<RawTocEntry>> {
    match format {
        TocFormat::Ncx => ncx::parse_xml(content),
        TocFormat::NavDoc => Ok(nav_doc::parse_html(content)),
    }
}
