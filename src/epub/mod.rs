pub mod book;
pub mod cache;
pub mod container;
pub mod error;
pub mod opf;
pub mod paths;
pub mod session;
pub mod toc;

// 重新导出错误处理
pub use error::{EpubError, Result};

// 重新导出书籍实体(导航游标)
pub use book::{Book, Chapter, TocEntry};

// 重新导出缓存解压
pub use cache::{DEFAULT_CACHE_DIR, materialize, materialize_into};

// 重新导出容器相关
pub use container::{Container, RootFile, locate_package};

// 重新导出OPF相关
pub use opf::{ManifestItem, Opf, SpineItem};

// 重新导出目录相关
pub use toc::{RawTocEntry, TocFormat, locate_toc, parse_toc};

// 重新导出进度持久化
pub use session::{BookPosition, Session};
