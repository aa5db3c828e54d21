//! NCX解析模块
//!
//! 解析EPUB 2的NCX（Navigation Control file for XML）目录文件。
//! navPoint的嵌套层级按文档顺序深度优先展平为一维序列，层级
//! 信息被丢弃——目录索引空间只关心顺序。

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::epub::error::{EpubError, Result};
use crate::epub::toc::RawTocEntry;

/// 解析NCX文件内容
///
/// 依次读取每个navPoint的navLabel/text文本与content/@src引用。
/// 嵌套的navPoint在父条目之后、按出现顺序进入结果序列。没有
/// 任何navPoint的文件产出空序列，不是错误。
///
/// # 参数
/// * `xml_content` - NCX文件的XML内容
///
/// # 返回值
/// * `Result<Vec<RawTocEntry>>` - 文档顺序的目录条目
pub fn parse_xml(xml_content: &str) -> Result<Vec<RawTocEntry>> {
    let mut reader = Reader::from_str(xml_content);
    reader.config_mut().trim_text(true);
    reader.config_mut().expand_empty_elements = true;

    let mut entries: Vec<RawTocEntry> = Vec::new();
    // navPoint嵌套栈，保存entries中的下标
    let mut open_points: Vec<usize> = Vec::new();
    let mut in_nav_map = false;
    let mut in_nav_label = false;
    let mut text_content = String::new();
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| EpubError::TocParseError(format!("XML解析错误: {}", e)))?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                b"navMap" => {
                    in_nav_map = true;
                }
                b"navPoint" if in_nav_map => {
                    entries.push(RawTocEntry {
                        title: String::new(),
                        target: String::new(),
                    });
                    open_points.push(entries.len() - 1);
                }
                b"navLabel" if in_nav_map && !open_points.is_empty() => {
                    in_nav_label = true;
                    text_content.clear();
                }
                b"content" if in_nav_map => {
                    let src = parse_content_src(e)?;
                    if let Some(&idx) = open_points.last() {
                        if entries[idx].target.is_empty() {
                            entries[idx].target = src;
                        }
                    }
                }
                _ => {}
            },
            Event::End(ref e) => match e.local_name().as_ref() {
                b"navMap" => {
                    in_nav_map = false;
                }
                b"navPoint" if in_nav_map => {
                    open_points.pop();
                }
                b"navLabel" if in_nav_label => {
                    if let Some(&idx) = open_points.last() {
                        if entries[idx].title.is_empty() {
                            entries[idx].title = text_content.trim().to_string();
                        }
                    }
                    in_nav_label = false;
                }
                _ => {}
            },
            Event::Text(e) => {
                let text = e
                    .unescape()
                    .map_err(|err| EpubError::TocParseError(format!("XML解析错误: {}", err)))?;
                text_content.push_str(&text);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(entries)
}

/// 解析content元素的src属性
fn parse_content_src(e: &quick_xml::events::BytesStart) -> Result<String> {
    for attr_result in e.attributes() {
        let attr =
            attr_result.map_err(|err| EpubError::TocParseError(format!("属性解析错误: {}", err)))?;
        if attr.key.local_name().as_ref() == b"src" {
            return Ok(String::from_utf8_lossy(&attr.value).to_string());
        }
    }
    Ok(String::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NESTED_NCX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head>
    <meta name="dtb:uid" content="test-book"/>
  </head>
  <docTitle><text>Test Book</text></docTitle>
  <navMap>
    <navPoint id="p1" playOrder="1">
      <navLabel><text>第一章</text></navLabel>
      <content src="ch1.html#s1"/>
      <navPoint id="p1-1" playOrder="2">
        <navLabel><text>第一节</text></navLabel>
        <content src="ch1.html#s2"/>
      </navPoint>
    </navPoint>
    <navPoint id="p2" playOrder="3">
      <navLabel><text>第二章</text></navLabel>
      <content src="ch2.html"/>
    </navPoint>
  </navMap>
</ncx>"#;

    #[test]
    fn test_nested_nav_points_flattened_in_document_order() {
        let entries = parse_xml(NESTED_NCX).unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].title, "第一章");
        assert_eq!(entries[0].target, "ch1.html#s1");
        assert_eq!(entries[1].title, "第一节");
        assert_eq!(entries[1].target, "ch1.html#s2");
        assert_eq!(entries[2].title, "第二章");
        assert_eq!(entries[2].target, "ch2.html");
    }

    #[test]
    fn test_doc_title_text_not_collected() {
        // docTitle下的text不在navMap内，不应被当作条目标题
        let entries = parse_xml(NESTED_NCX).unwrap();
        assert!(entries.iter().all(|e| e.title != "Test Book"));
    }

    #[test]
    fn test_empty_nav_map() {
        let xml = r#"<?xml version="1.0"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <navMap></navMap>
</ncx>"#;
        let entries = parse_xml(xml).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_malformed_ncx() {
        let xml = "<ncx><navMap></wrong></ncx>";
        let result = parse_xml(xml);
        assert!(matches!(result, Err(EpubError::TocParseError(_))));
    }
}
