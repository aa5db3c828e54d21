//! EPUB 3导航文档解析模块
//!
//! 导航文档是普通的XHTML，用scraper按HTML解析，取第一个nav元素
//! 里有序列表中的链接作为目录条目。

use scraper::{ElementRef, Html, Selector};

use crate::epub::toc::RawTocEntry;

/// 解析EPUB 3导航文档
///
/// 按文档顺序收集第一个nav元素下有序列表中的链接，链接文本为
/// 标题、href为目标引用。没有nav元素或没有链接时返回空序列。
/// HTML解析本身不会失败，损坏的标记由scraper自行修复。
///
/// # 参数
/// * `html_content` - 导航文档的内容
///
/// # 返回值
/// * `Vec<RawTocEntry>` - 文档顺序的目录条目
pub fn parse_html(html_content: &str) -> Vec<RawTocEntry> {
    let document = Html::parse_document(html_content);
    let nav_selector = Selector::parse("nav").unwrap();
    let list_link_selector = Selector::parse("ol a[href]").unwrap();
    let any_link_selector = Selector::parse("a[href]").unwrap();

    let Some(nav) = document.select(&nav_selector).next() else {
        return Vec::new();
    };

    let entries = collect_links(nav, &list_link_selector);
    if !entries.is_empty() {
        return entries;
    }
    // 部分制作工具不用ol包裹链接，回退到nav下的全部链接
    collect_links(nav, &any_link_selector)
}

fn collect_links(nav: ElementRef, selector: &Selector) -> Vec<RawTocEntry> {
    nav.select(selector)
        .filter_map(|link| {
            let href = link.value().attr("href")?;
            let title = link.text().collect::<String>().trim().to_string();
            Some(RawTocEntry {
                title,
                target: href.to_string(),
            })
        })
        .collect()
}
