//! 目录定位模块
//!
//! 在OPF清单中查找目录描述文件并识别其格式。

use std::path::{Path, PathBuf};

use crate::epub::opf::Opf;
use crate::epub::paths;

/// 目录描述文件的格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TocFormat {
    /// EPUB 2的NCX导航控制文件
    Ncx,
    /// EPUB 3的XHTML导航文档
    NavDoc,
}

/// 在清单中定位目录描述文件
///
/// 查找顺序：
/// 1. spine的toc属性指向的清单项(EPUB 2惯例)
/// 2. 任一媒体类型为NCX的清单项
/// 3. 任一properties含"nav"的清单项(EPUB 3)
///
/// 找不到目录不是错误，调用方应按空目录处理。
///
/// # 参数
/// * `opf` - 解析后的OPF信息
/// * `opf_dir` - OPF文件所在的目录
///
/// # 返回值
/// * `Option<(PathBuf, TocFormat)>` - 目录文件的完整路径及其格式
pub fn locate_toc(opf: &Opf, opf_dir: &Path) -> Option<(PathBuf, TocFormat)> {
    if let Some(toc_id) = &opf.spine_toc {
        if let Some(item) = opf.manifest.get(toc_id) {
            return Some((paths::resolve_href(opf_dir, &item.href), TocFormat::Ncx));
        }
    }

    if let Some(item) = opf.manifest.values().find(|item| item.is_ncx()) {
        return Some((paths::resolve_href(opf_dir, &item.href), TocFormat::Ncx));
    }

    opf.manifest
        .values()
        .find(|item| item.is_nav())
        .map(|item| (paths::resolve_href(opf_dir, &item.href), TocFormat::NavDoc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epub::opf::{ManifestItem, NCX_MEDIA_TYPE, SpineItem};
    use std::collections::HashMap;

    fn opf_with(items: Vec<ManifestItem>, spine_toc: Option<&str>) -> Opf {
        let mut manifest = HashMap::new();
        for item in items {
            manifest.insert(item.id.clone(), item);
        }
        Opf {
            version: "2.0".to_string(),
            manifest,
            spine: vec![SpineItem::new("ch1".to_string())],
            spine_toc: spine_toc.map(str::to_string),
        }
    }

    fn nav_item() -> ManifestItem {
        let mut item = ManifestItem::new(
            "nav".to_string(),
            "nav.xhtml".to_string(),
            "application/xhtml+xml".to_string(),
        );
        item.properties = Some("nav".to_string());
        item
    }

    fn ncx_item() -> ManifestItem {
        ManifestItem::new(
            "ncx".to_string(),
            "toc.ncx".to_string(),
            NCX_MEDIA_TYPE.to_string(),
        )
    }

    #[test]
    fn test_spine_toc_attribute_wins() {
        let opf = opf_with(vec![ncx_item(), nav_item()], Some("ncx"));
        let (path, format) = locate_toc(&opf, Path::new("cache")).unwrap();
        assert_eq!(path, PathBuf::from("cache/toc.ncx"));
        assert_eq!(format, TocFormat::Ncx);
    }

    #[test]
    fn test_ncx_media_type_preferred_over_nav() {
        let opf = opf_with(vec![ncx_item(), nav_item()], None);
        let (path, format) = locate_toc(&opf, Path::new("cache")).unwrap();
        assert_eq!(path, PathBuf::from("cache/toc.ncx"));
        assert_eq!(format, TocFormat::Ncx);
    }

    #[test]
    fn test_nav_property_fallback() {
        let opf = opf_with(vec![nav_item()], None);
        let (path, format) = locate_toc(&opf, Path::new("cache")).unwrap();
        assert_eq!(path, PathBuf::from("cache/nav.xhtml"));
        assert_eq!(format, TocFormat::NavDoc);
    }

    #[test]
    fn test_no_toc_is_none() {
        let opf = opf_with(
            vec![ManifestItem::new(
                "ch1".to_string(),
                "ch1.html".to_string(),
                "application/xhtml+xml".to_string(),
            )],
            None,
        );
        assert!(locate_toc(&opf, Path::new("cache")).is_none());
    }

    #[test]
    fn test_dangling_spine_toc_falls_back() {
        // toc属性指向不存在的清单项时回退到媒体类型查找
        let opf = opf_with(vec![ncx_item()], Some("ghost"));
        let (path, format) = locate_toc(&opf, Path::new("cache")).unwrap();
        assert_eq!(path, PathBuf::from("cache/toc.ncx"));
        assert_eq!(format, TocFormat::Ncx);
    }
}
