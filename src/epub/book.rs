//! 书籍实体模块
//!
//! [`Book`]是打开一本EPUB后的导航游标：持有spine章节列表、目录
//! 条目以及两者之间的索引映射，对外只暴露next/previous/goto/
//! current四个导航操作，当前位置不被外部直接访问。
//!
//! 打开流程：解压缓存 → 定位OPF → 解析清单与脊柱 → 定位并解析
//! 目录 → 锚点解析。全部解析在打开时一次完成，之后的导航操作
//! 不再访问磁盘。

use std::fs;
use std::path::{Path, PathBuf};

use crate::epub::error::{EpubError, Result};
use crate::epub::opf::Opf;
use crate::epub::toc::RawTocEntry;
use crate::epub::{cache, container, paths, toc};

/// 目录条目：标题与解析后的目标位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// 条目标题
    pub title: String,
    /// 目标文档在缓存中的完整路径
    pub path: PathBuf,
    /// 文档内锚点(目标引用中"#"之后的部分)
    pub anchor: Option<String>,
}

/// 一次导航操作返回的章节信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// 目录条目标题
    pub title: String,
    /// 章节文件在缓存中的完整路径(取自spine)
    pub path: PathBuf,
    /// 文档内锚点
    pub anchor: Option<String>,
}

/// 打开的一本书(导航游标)
#[derive(Debug)]
pub struct Book {
    epub_path: PathBuf,
    cache_root: PathBuf,
    /// 章节索引空间：spine中正文文档的完整路径，顺序即阅读顺序
    chapter_paths: Vec<PathBuf>,
    /// 目录索引空间：目录条目，与spine索引相互独立
    entries: Vec<TocEntry>,
    /// 目录索引到章节索引的稠密映射，None表示目标不在spine中
    toc_to_chapter: Vec<Option<usize>>,
    now_toc_idx: usize,
}

impl Book {
    /// 打开EPUB文件，从目录开头开始
    ///
    /// # 参数
    /// * `epub_path` - EPUB文件路径
    ///
    /// # 返回值
    /// * `Result<Book>` - 打开的书籍实例
    pub fn open<P: AsRef<Path>>(epub_path: P) -> Result<Book> {
        Self::open_in(epub_path, Path::new(cache::DEFAULT_CACHE_DIR), 0)
    }

    /// 打开EPUB文件并恢复记忆的目录位置
    ///
    /// 越界的位置(比如目录比上次阅读时变短了)回退到0而不是拒绝
    /// 打开。
    pub fn open_at<P: AsRef<Path>>(epub_path: P, now_toc_idx: usize) -> Result<Book> {
        Self::open_in(epub_path, Path::new(cache::DEFAULT_CACHE_DIR), now_toc_idx)
    }

    /// 在指定缓存目录中打开EPUB文件
    ///
    /// # 参数
    /// * `epub_path` - EPUB文件路径
    /// * `cache_dir` - 缓存根目录
    /// * `now_toc_idx` - 初始目录位置，越界时回退到0
    ///
    /// # 返回值
    /// * `Result<Book>` - 打开的书籍实例
    pub fn open_in<P: AsRef<Path>>(
        epub_path: P,
        cache_dir: &Path,
        now_toc_idx: usize,
    ) -> Result<Book> {
        let epub_path = epub_path.as_ref().to_path_buf();
        let cache_root = cache::materialize_into(&epub_path, cache_dir)?;
        let opf_path = container::locate_package(&cache_root)?;
        let opf_dir = opf_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let opf_content = fs::read_to_string(&opf_path).map_err(|e| {
            EpubError::OpfParseError(format!("无法读取{}: {}", opf_path.display(), e))
        })?;
        let opf = Opf::parse_xml(&opf_content).map_err(|e| match e {
            EpubError::XmlError(xml_err) => {
                EpubError::OpfParseError(format!("XML解析错误: {}", xml_err))
            }
            other => other,
        })?;

        let chapter_paths = opf.chapter_paths(&opf_dir);
        if chapter_paths.is_empty() {
            return Err(EpubError::OpfParseError(format!(
                "spine中没有任何正文文档: {}",
                opf_path.display()
            )));
        }

        let (entries, toc_to_chapter) = match toc::locate_toc(&opf, &opf_dir) {
            Some((toc_path, format)) => {
                let toc_content = fs::read_to_string(&toc_path).map_err(|e| {
                    EpubError::TocParseError(format!("无法读取{}: {}", toc_path.display(), e))
                })?;
                let raw_entries = toc::parse_toc(&toc_content, format)?;
                let toc_dir = toc_path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_default();
                let entries = build_entries(raw_entries, &toc_dir);
                let toc_to_chapter = resolve_targets(&chapter_paths, &entries);
                (entries, toc_to_chapter)
            }
            // 没有目录文件的书按空目录处理，不是错误
            None => (Vec::new(), Vec::new()),
        };

        let now_toc_idx = if now_toc_idx < entries.len() {
            now_toc_idx
        } else {
            0
        };

        Ok(Book {
            epub_path,
            cache_root,
            chapter_paths,
            entries,
            toc_to_chapter,
            now_toc_idx,
        })
    }

    /// 前进到下一个目录条目(循环)
    ///
    /// # 返回值
    /// * `Result<Chapter>` - 新位置的章节信息
    pub fn next(&mut self) -> Result<Chapter> {
        if self.entries.is_empty() {
            return Err(EpubError::EmptyToc);
        }
        self.now_toc_idx = (self.now_toc_idx + 1) % self.entries.len();
        self.current()
    }

    /// 后退到上一个目录条目(循环)
    ///
    /// # 返回值
    /// * `Result<Chapter>` - 新位置的章节信息
    pub fn previous(&mut self) -> Result<Chapter> {
        if self.entries.is_empty() {
            return Err(EpubError::EmptyToc);
        }
        self.now_toc_idx = (self.now_toc_idx + self.entries.len() - 1) % self.entries.len();
        self.current()
    }

    /// 跳转到指定目录条目
    ///
    /// # 参数
    /// * `toc_idx` - 目标目录索引，必须在[0, 条目数)内
    ///
    /// # 返回值
    /// * `Result<Chapter>` - 新位置的章节信息
    pub fn goto(&mut self, toc_idx: usize) -> Result<Chapter> {
        if toc_idx >= self.entries.len() {
            return Err(EpubError::IndexOutOfRange {
                index: toc_idx,
                count: self.entries.len(),
            });
        }
        self.now_toc_idx = toc_idx;
        self.current()
    }

    /// 获取当前目录位置的章节信息
    ///
    /// 章节路径经目录索引到章节索引的映射从spine取出。当前条目
    /// 未能解析到spine时返回[`EpubError::UnresolvedTocTarget`]，
    /// 游标位置保持不变。
    pub fn current(&self) -> Result<Chapter> {
        let entry = self.entries.get(self.now_toc_idx).ok_or(EpubError::EmptyToc)?;
        let chapter_idx =
            self.toc_to_chapter[self.now_toc_idx].ok_or_else(|| EpubError::UnresolvedTocTarget {
                title: entry.title.clone(),
            })?;
        Ok(Chapter {
            title: entry.title.clone(),
            path: self.chapter_paths[chapter_idx].clone(),
            anchor: entry.anchor.clone(),
        })
    }

    /// 目录条目数
    pub fn toc_len(&self) -> usize {
        self.entries.len()
    }

    /// 正文章节数
    pub fn chapter_count(&self) -> usize {
        self.chapter_paths.len()
    }

    /// 目录条目序列
    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    /// 章节路径序列(spine顺序)
    pub fn chapter_paths(&self) -> &[PathBuf] {
        &self.chapter_paths
    }

    /// 目录索引到章节索引的映射
    pub fn toc_to_chapter(&self) -> &[Option<usize>] {
        &self.toc_to_chapter
    }

    /// 当前目录位置
    pub fn position(&self) -> usize {
        self.now_toc_idx
    }

    /// 来源EPUB文件路径
    pub fn epub_path(&self) -> &Path {
        &self.epub_path
    }

    /// 缓存根目录
    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }
}

// 书籍按来源文件判同，与内存实例无关，用于"已打开"检测
impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.epub_path == other.epub_path
    }
}

impl Eq for Book {}

/// 把原始目录条目的目标引用拆分为文档路径与锚点
fn build_entries(raw_entries: Vec<RawTocEntry>, toc_dir: &Path) -> Vec<TocEntry> {
    raw_entries
        .into_iter()
        .map(|entry| {
            let (doc, anchor) = paths::split_fragment(&entry.target);
            TocEntry {
                title: entry.title,
                path: paths::resolve_href(toc_dir, doc),
                anchor: anchor.map(str::to_string),
            }
        })
        .collect()
}

/// 锚点解析：为每个目录条目求出spine中的章节索引
///
/// 打开时一次性求出全部映射，导航时即可O(1)取章节。解析不到的
/// 条目保留None占位而不是剔除，保证目录索引空间稳定。
fn resolve_targets(chapter_paths: &[PathBuf], entries: &[TocEntry]) -> Vec<Option<usize>> {
    entries
        .iter()
        .map(|entry| {
            let chapter_idx = chapter_paths.iter().position(|p| p == &entry.path);
            if chapter_idx.is_none() {
                log::warn!(
                    "目录项\"{}\"的目标{}不在spine中",
                    entry.title,
                    entry.path.display()
                );
            }
            chapter_idx
        })
        .collect()
}
