use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::epub::error::{EpubError, Result};
use crate::epub::paths;

/// container.xml在解压目录中的固定位置
const CONTAINER_PATH: &str = "META-INF/container.xml";

/// OPF包描述文件的媒体类型
const PACKAGE_MEDIA_TYPE: &str = "application/oebps-package+xml";

/// Container.xml中的rootfile信息
#[derive(Debug, Clone)]
pub struct RootFile {
    pub full_path: String,
    pub media_type: String,
}

/// Container.xml的解析结果
#[derive(Debug, Clone)]
pub struct Container {
    pub rootfiles: Vec<RootFile>,
}

impl Container {
    /// 解析container.xml内容
    ///
    /// # 参数
    /// * `xml_content` - container.xml的文件内容
    ///
    /// # 返回值
    /// * `Result<Container>` - 解析后的Container信息
    pub fn parse_xml(xml_content: &str) -> Result<Container> {
        let mut reader = Reader::from_str(xml_content);
        reader.config_mut().trim_text(true);
        reader.config_mut().expand_empty_elements = true;

        let mut rootfiles = Vec::new();
        let mut buf = Vec::new();
        let mut in_rootfiles = false;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    match e.local_name().as_ref() {
                        b"rootfiles" => {
                            in_rootfiles = true;
                        }
                        b"rootfile" if in_rootfiles => {
                            let mut full_path = String::new();
                            let mut media_type = String::new();

                            for attr_result in e.attributes() {
                                let attr = attr_result.map_err(|e| {
                                    EpubError::XmlError(quick_xml::Error::InvalidAttr(e))
                                })?;
                                match attr.key.local_name().as_ref() {
                                    b"full-path" => {
                                        full_path =
                                            String::from_utf8_lossy(&attr.value).to_string();
                                    }
                                    b"media-type" => {
                                        media_type =
                                            String::from_utf8_lossy(&attr.value).to_string();
                                    }
                                    _ => {}
                                }
                            }

                            if !full_path.is_empty() {
                                rootfiles.push(RootFile {
                                    full_path,
                                    media_type,
                                });
                            }
                        }
                        _ => {}
                    }
                }
                Event::End(ref e) => {
                    if e.local_name().as_ref() == b"rootfiles" {
                        in_rootfiles = false;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if rootfiles.is_empty() {
            return Err(EpubError::ContainerParseError(
                "没有找到任何rootfile条目".to_string(),
            ));
        }

        Ok(Container { rootfiles })
    }

    /// 获取主要的OPF文件路径
    ///
    /// 优先返回`application/oebps-package+xml`类型的rootfile，
    /// 没有时回退到第一个rootfile。
    pub fn opf_path(&self) -> Option<&str> {
        self.rootfiles
            .iter()
            .find(|rf| rf.media_type == PACKAGE_MEDIA_TYPE)
            .or_else(|| self.rootfiles.first())
            .map(|rf| rf.full_path.as_str())
    }
}

/// 在解压缓存中定位OPF包描述文件
///
/// 读取固定位置的`META-INF/container.xml`并取出首个有效rootfile的
/// full-path属性。文件缺失、XML损坏或没有rootfile条目都视为
/// container解析错误。
///
/// # 参数
/// * `cache_root` - 该书的缓存根目录
///
/// # 返回值
/// * `Result<PathBuf>` - OPF文件的完整路径
pub fn locate_package(cache_root: &Path) -> Result<PathBuf> {
    let container_file = cache_root.join(CONTAINER_PATH);
    let content = fs::read_to_string(&container_file).map_err(|e| {
        EpubError::ContainerParseError(format!("无法读取{}: {}", container_file.display(), e))
    })?;

    let container = Container::parse_xml(&content).map_err(|e| match e {
        EpubError::XmlError(xml_err) => {
            EpubError::ContainerParseError(format!("XML解析错误: {}", xml_err))
        }
        other => other,
    })?;

    let opf_path = container.opf_path().ok_or_else(|| {
        EpubError::ContainerParseError("container.xml中没有找到有效的rootfile".to_string())
    })?;

    Ok(paths::resolve_href(cache_root, opf_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CONTAINER_XML: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
    <rootfiles>
        <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
    </rootfiles>
</container>"#;

    #[test]
    fn test_parse_container_xml() {
        let container = Container::parse_xml(CONTAINER_XML).unwrap();
        assert_eq!(container.rootfiles.len(), 1);
        assert_eq!(container.rootfiles[0].full_path, "OEBPS/content.opf");
        assert_eq!(
            container.rootfiles[0].media_type,
            "application/oebps-package+xml"
        );
    }

    #[test]
    fn test_opf_path_prefers_package_media_type() {
        let container = Container {
            rootfiles: vec![
                RootFile {
                    full_path: "OEBPS/toc.ncx".to_string(),
                    media_type: "application/x-dtbncx+xml".to_string(),
                },
                RootFile {
                    full_path: "OEBPS/content.opf".to_string(),
                    media_type: "application/oebps-package+xml".to_string(),
                },
            ],
        };
        assert_eq!(container.opf_path(), Some("OEBPS/content.opf"));
    }

    #[test]
    fn test_parse_container_without_rootfile() {
        let xml = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
    <rootfiles></rootfiles>
</container>"#;
        let result = Container::parse_xml(xml);
        assert!(matches!(result, Err(EpubError::ContainerParseError(_))));
    }

    #[test]
    fn test_locate_package() {
        let dir = TempDir::new().unwrap();
        let meta_inf = dir.path().join("META-INF");
        fs::create_dir_all(&meta_inf).unwrap();
        fs::write(meta_inf.join("container.xml"), CONTAINER_XML).unwrap();

        let opf_path = locate_package(dir.path()).unwrap();
        assert_eq!(opf_path, dir.path().join("OEBPS/content.opf"));
    }

    #[test]
    fn test_locate_package_missing_container() {
        let dir = TempDir::new().unwrap();
        let result = locate_package(dir.path());
        assert!(matches!(result, Err(EpubError::ContainerParseError(_))));
    }

    #[test]
    fn test_locate_package_malformed_container() {
        let dir = TempDir::new().unwrap();
        let meta_inf = dir.path().join("META-INF");
        fs::create_dir_all(&meta_inf).unwrap();
        fs::write(
            meta_inf.join("container.xml"),
            "<container><rootfiles></bogus></container>",
        )
        .unwrap();

        let result = locate_package(dir.path());
        assert!(matches!(result, Err(EpubError::ContainerParseError(_))));
    }
}
