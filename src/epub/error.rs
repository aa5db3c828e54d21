use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EpubError>;

/// Epub相关的错误类型
#[derive(Error, Debug)]
pub enum EpubError {
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),

    #[error("Zip文件错误: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML解析错误: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("container.xml解析错误: {0}")]
    ContainerParseError(String),

    #[error("OPF文件解析错误: {0}")]
    OpfParseError(String),

    #[error("目录文件解析错误: {0}")]
    TocParseError(String),

    #[error("目录项\"{title}\"无法定位到正文内容")]
    UnresolvedTocTarget { title: String },

    #[error("目录为空，无法导航")]
    EmptyToc,

    #[error("目录索引越界: {index}，共{count}项")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("进度文件错误: {0}")]
    SessionError(String),
}
