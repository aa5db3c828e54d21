//! OPF解析器模块
//!
//! 提供OPF（Open Packaging Format）包描述文件的XML解析功能，
//! 产出清单与脊柱两部分。

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::epub::error::{EpubError, Result};
use crate::epub::opf::{manifest::ManifestItem, spine::SpineItem};
use crate::epub::paths;

/// OPF文件解析结果
#[derive(Debug, Clone)]
pub struct Opf {
    /// EPUB版本
    pub version: String,
    /// 清单项(文件列表)
    pub manifest: HashMap<String, ManifestItem>,
    /// 脊柱(阅读顺序)
    pub spine: Vec<SpineItem>,
    /// 脊柱的目录引用(toc属性)
    pub spine_toc: Option<String>,
}

impl Opf {
    /// 解析OPF文件内容
    ///
    /// 完全缺少manifest或spine元素的描述文件视为损坏的包。
    ///
    /// # 参数
    /// * `xml_content` - OPF文件的XML内容
    ///
    /// # 返回值
    /// * `Result<Opf>` - 解析后的OPF信息
    pub fn parse_xml(xml_content: &str) -> Result<Opf> {
        let mut reader = Reader::from_str(xml_content);
        reader.config_mut().trim_text(true);
        reader.config_mut().expand_empty_elements = true;

        let mut version = String::new();
        let mut manifest = HashMap::new();
        let mut spine = Vec::new();
        let mut spine_toc = None;
        let mut has_manifest = false;
        let mut has_spine = false;

        let mut buf = Vec::new();
        let mut current_section = Section::None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    match e.local_name().as_ref() {
                        b"package" => {
                            version = Self::parse_package_version(e)?;
                        }
                        b"manifest" => {
                            current_section = Section::Manifest;
                            has_manifest = true;
                        }
                        b"spine" => {
                            current_section = Section::Spine;
                            has_spine = true;
                            spine_toc = Self::parse_spine_toc(e)?;
                        }
                        b"item" if current_section == Section::Manifest => {
                            Self::parse_manifest_item(e, &mut manifest)?;
                        }
                        b"itemref" if current_section == Section::Spine => {
                            Self::parse_spine_item(e, &mut spine)?;
                        }
                        _ => {}
                    }
                }
                Event::End(ref e) => match e.local_name().as_ref() {
                    b"manifest" | b"spine" => {
                        current_section = Section::None;
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !has_manifest {
            return Err(EpubError::OpfParseError(
                "OPF文件中没有manifest元素".to_string(),
            ));
        }
        if !has_spine {
            return Err(EpubError::OpfParseError(
                "OPF文件中没有spine元素".to_string(),
            ));
        }

        Ok(Opf {
            version,
            manifest,
            spine,
            spine_toc,
        })
    }

    /// 解析package元素的version属性
    fn parse_package_version(e: &quick_xml::events::BytesStart) -> Result<String> {
        for attr_result in e.attributes() {
            let attr = attr_result
                .map_err(|err| EpubError::XmlError(quick_xml::Error::InvalidAttr(err)))?;
            if attr.key.local_name().as_ref() == b"version" {
                return Ok(String::from_utf8_lossy(&attr.value).to_string());
            }
        }
        Ok(String::new())
    }

    /// 解析spine元素的toc属性
    fn parse_spine_toc(e: &quick_xml::events::BytesStart) -> Result<Option<String>> {
        for attr_result in e.attributes() {
            let attr = attr_result
                .map_err(|err| EpubError::XmlError(quick_xml::Error::InvalidAttr(err)))?;
            if attr.key.local_name().as_ref() == b"toc" {
                return Ok(Some(String::from_utf8_lossy(&attr.value).to_string()));
            }
        }
        Ok(None)
    }

    /// 解析清单项
    fn parse_manifest_item(
        e: &quick_xml::events::BytesStart,
        manifest: &mut HashMap<String, ManifestItem>,
    ) -> Result<()> {
        let mut item = ManifestItem {
            id: String::new(),
            href: String::new(),
            media_type: String::new(),
            properties: None,
        };

        for attr_result in e.attributes() {
            let attr = attr_result
                .map_err(|e| EpubError::XmlError(quick_xml::Error::InvalidAttr(e)))?;
            match attr.key.local_name().as_ref() {
                b"id" => {
                    item.id = String::from_utf8_lossy(&attr.value).to_string();
                }
                b"href" => {
                    item.href = String::from_utf8_lossy(&attr.value).to_string();
                }
                b"media-type" => {
                    item.media_type = String::from_utf8_lossy(&attr.value).to_string();
                }
                b"properties" => {
                    item.properties = Some(String::from_utf8_lossy(&attr.value).to_string());
                }
                _ => {}
            }
        }

        if !item.id.is_empty() && !item.href.is_empty() {
            manifest.insert(item.id.clone(), item);
        }

        Ok(())
    }

    /// 解析脊柱项
    fn parse_spine_item(
        e: &quick_xml::events::BytesStart,
        spine: &mut Vec<SpineItem>,
    ) -> Result<()> {
        let mut spine_item = SpineItem {
            idref: String::new(),
            linear: true,
        };

        for attr_result in e.attributes() {
            let attr = attr_result
                .map_err(|e| EpubError::XmlError(quick_xml::Error::InvalidAttr(e)))?;
            match attr.key.local_name().as_ref() {
                b"idref" => {
                    spine_item.idref = String::from_utf8_lossy(&attr.value).to_string();
                }
                b"linear" => {
                    let linear_value = String::from_utf8_lossy(&attr.value);
                    spine_item.linear = linear_value != "no";
                }
                _ => {}
            }
        }

        if !spine_item.idref.is_empty() {
            spine.push(spine_item);
        }

        Ok(())
    }

    /// 获取所有正文章节文件的完整路径(按阅读顺序)
    ///
    /// 按spine顺序在清单中查找idref，过滤出HTML族正文文档，并将
    /// href解析到OPF所在目录下。spine引用了清单中不存在的项时
    /// 记一条告警并跳过，不视为硬错误。
    ///
    /// # 参数
    /// * `opf_dir` - OPF文件所在的目录
    ///
    /// # 返回值
    /// * `Vec<PathBuf>` - 章节文件路径列表(章节索引空间)
    pub fn chapter_paths(&self, opf_dir: &Path) -> Vec<PathBuf> {
        let mut chapter_paths = Vec::new();

        for spine_item in &self.spine {
            if !spine_item.is_linear() {
                continue;
            }
            let Some(item) = self.manifest.get(&spine_item.idref) else {
                log::warn!("spine引用了清单中不存在的项: {}", spine_item.idref);
                continue;
            };
            if !item.is_document() {
                continue;
            }
            chapter_paths.push(paths::resolve_href(opf_dir, &item.href));
        }

        chapter_paths
    }
}

/// OPF文件的当前解析区段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Manifest,
    Spine,
}
