//! 路径处理模块
//!
//! 提供EPUB包内相对路径的解析与归一化。spine和目录文件中的href
//! 都是相对于各自描述文件所在目录的，必须归一化之后才能按
//! 逐字节相等的规则互相匹配。

use std::path::{Component, Path, PathBuf};

/// 将href解析为相对于base_dir的归一化路径
///
/// # 参数
/// * `base_dir` - 描述文件(OPF或目录文件)所在的目录
/// * `href` - 描述文件中声明的相对路径
///
/// # 返回值
/// * `PathBuf` - 归一化后的完整路径
pub fn resolve_href(base_dir: &Path, href: &str) -> PathBuf {
    normalize(&base_dir.join(href))
}

/// 归一化路径，消解其中的"."和".."组件
pub fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // 已经到达路径开头时保留".."
                if !result.pop() {
                    result.push("..");
                }
            }
            other => result.push(other.as_os_str()),
        }
    }
    result
}

/// 在首个'#'处拆分目录目标引用
///
/// # 参数
/// * `target` - 目录条目的原始目标引用，如"ch1.html#s1"
///
/// # 返回值
/// * `(&str, Option<&str>)` - (文档路径, 锚点)，没有锚点时为None
pub fn split_fragment(target: &str) -> (&str, Option<&str>) {
    match target.split_once('#') {
        Some((path, fragment)) if !fragment.is_empty() => (path, Some(fragment)),
        Some((path, _)) => (path, None),
        None => (target, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_href_simple() {
        let resolved = resolve_href(Path::new("cache/OEBPS"), "text/ch1.xhtml");
        assert_eq!(resolved, PathBuf::from("cache/OEBPS/text/ch1.xhtml"));
    }

    #[test]
    fn test_resolve_href_with_parent_dir() {
        let resolved = resolve_href(Path::new("cache/OEBPS/text"), "../images/cover.jpg");
        assert_eq!(resolved, PathBuf::from("cache/OEBPS/images/cover.jpg"));
    }

    #[test]
    fn test_normalize_cur_dir() {
        assert_eq!(
            normalize(Path::new("cache/./OEBPS/./ch1.xhtml")),
            PathBuf::from("cache/OEBPS/ch1.xhtml")
        );
    }

    #[test]
    fn test_normalize_leading_parent_dir() {
        assert_eq!(normalize(Path::new("../ch1.xhtml")), PathBuf::from("../ch1.xhtml"));
    }

    #[test]
    fn test_split_fragment() {
        assert_eq!(split_fragment("ch1.html#s1"), ("ch1.html", Some("s1")));
        assert_eq!(split_fragment("ch2.html"), ("ch2.html", None));
        assert_eq!(split_fragment("ch3.html#"), ("ch3.html", None));
    }

    #[test]
    fn test_split_fragment_only_first_hash() {
        assert_eq!(split_fragment("ch1.html#a#b"), ("ch1.html", Some("a#b")));
    }
}
