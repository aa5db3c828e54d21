pub mod epub;

// === 核心API重新导出 ===

/// 书籍实体与导航游标（主要接口）
pub use epub::Book;

/// 错误处理
pub use epub::{EpubError, Result};

// === 数据结构 ===

/// 章节信息与目录条目
pub use epub::{Chapter, TocEntry};

/// 阅读进度持久化
pub use epub::{BookPosition, Session};

// === 底层组件（高级用法） ===

/// 缓存解压
pub use epub::{materialize, materialize_into};

/// 容器组件
pub use epub::{Container, RootFile, locate_package};

/// OPF组件
pub use epub::{ManifestItem, Opf, SpineItem};

/// 目录组件
pub use epub::{RawTocEntry, TocFormat, locate_toc, parse_toc};

// === 库信息 ===

/// BookNav库的版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// BookNav库的描述
pub const DESCRIPTION: &str = "EPUB包结构与目录导航解析库";

// === 便捷函数 ===

/// 快速打开EPUB文件
///
/// 这是 `Book::open` 的便捷包装函数。
///
/// # 参数
/// * `path` - EPUB文件路径
///
/// # 返回值
/// * `Result<Book>` - 打开的书籍实例
///
/// # 示例
///
/// ```no_run
/// let mut book = booknav::open("book.epub")?;
/// let chapter = book.next()?;
/// println!("章节: {}", chapter.title);
/// # Ok::<(), booknav::EpubError>(())
/// ```
pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Book> {
    Book::open(path)
}
