//! 阅读进度持久化模块
//!
//! 把"哪些书、各自读到哪"序列化为固定位置的JSON文件，启动时
//! 恢复、退出时保存。进度文件缺失或损坏都降级为"没有记忆的书"，
//! 绝不让启动失败。

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::epub::book::Book;
use crate::epub::cache::DEFAULT_CACHE_DIR;
use crate::epub::error::{EpubError, Result};

/// 进度文件名
const SESSION_FILE: &str = "last_read.json";

/// 一本书的阅读位置记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPosition {
    /// EPUB文件路径(书籍身份)
    pub epub_path: String,
    /// 当前目录索引
    pub now_toc_idx: usize,
}

/// 一次阅读会话：记忆的书籍列表与最后活跃的一本
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// 记忆的书籍位置列表
    #[serde(default)]
    pub books: Vec<BookPosition>,
    /// 最后活跃书籍在列表中的下标
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_idx: Option<usize>,
}

impl Session {
    /// 进度文件的默认位置
    pub fn default_path() -> PathBuf {
        Path::new(DEFAULT_CACHE_DIR).join(SESSION_FILE)
    }

    /// 从默认位置加载会话
    pub fn load() -> Session {
        Self::load_from(&Self::default_path())
    }

    /// 从指定位置加载会话
    ///
    /// 文件缺失返回空会话；内容损坏记一条告警后同样返回空会话。
    pub fn load_from(path: &Path) -> Session {
        let Ok(content) = fs::read_to_string(path) else {
            return Session::default();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("进度文件{}损坏，忽略: {}", path.display(), e);
            Session::default()
        })
    }

    /// 保存会话到默认位置
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    /// 保存会话到指定位置(一次性整体写入)
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| EpubError::SessionError(format!("序列化进度失败: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 从打开的书籍集合构建会话
    ///
    /// # 参数
    /// * `books` - 当前打开的书籍
    /// * `last_idx` - 最后活跃书籍的下标
    pub fn from_books(books: &[Book], last_idx: Option<usize>) -> Session {
        Session {
            books: books
                .iter()
                .map(|book| BookPosition {
                    epub_path: book.epub_path().to_string_lossy().to_string(),
                    now_toc_idx: book.position(),
                })
                .collect(),
            last_idx,
        }
    }

    /// 记录或更新一本书的位置(按epub_path判同)
    pub fn record(&mut self, epub_path: &Path, now_toc_idx: usize) {
        let key = epub_path.to_string_lossy();
        match self.books.iter_mut().find(|b| b.epub_path == key) {
            Some(existing) => existing.now_toc_idx = now_toc_idx,
            None => self.books.push(BookPosition {
                epub_path: key.to_string(),
                now_toc_idx,
            }),
        }
    }

    /// 查询一本书记忆的位置
    pub fn position_of(&self, epub_path: &Path) -> Option<usize> {
        let key = epub_path.to_string_lossy();
        self.books
            .iter()
            .find(|b| b.epub_path == key)
            .map(|b| b.now_toc_idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_session() -> Session {
        Session {
            books: vec![
                BookPosition {
                    epub_path: "eBooks/one.epub".to_string(),
                    now_toc_idx: 3,
                },
                BookPosition {
                    epub_path: "eBooks/two.epub".to_string(),
                    now_toc_idx: 0,
                },
            ],
            last_idx: Some(1),
        }
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("last_read.json");

        let session = sample_session();
        session.save_to(&path).unwrap();
        let loaded = Session::load_from(&path);

        assert_eq!(loaded, session);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let session = Session::load_from(&dir.path().join("nonexistent.json"));
        assert!(session.books.is_empty());
        assert_eq!(session.last_idx, None);
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("last_read.json");
        fs::write(&path, "not valid json{{{").unwrap();

        let session = Session::load_from(&path);
        assert!(session.books.is_empty());
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/cache/last_read.json");

        sample_session().save_to(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_record_updates_existing_entry() {
        let mut session = sample_session();
        session.record(Path::new("eBooks/one.epub"), 7);
        assert_eq!(session.books.len(), 2);
        assert_eq!(session.position_of(Path::new("eBooks/one.epub")), Some(7));

        session.record(Path::new("eBooks/three.epub"), 1);
        assert_eq!(session.books.len(), 3);
    }

    #[test]
    fn test_load_tolerates_missing_last_idx() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("last_read.json");
        fs::write(
            &path,
            r#"{"books": [{"epub_path": "a.epub", "now_toc_idx": 2}]}"#,
        )
        .unwrap();

        let session = Session::load_from(&path);
        assert_eq!(session.books.len(), 1);
        assert_eq!(session.last_idx, None);
    }
}
