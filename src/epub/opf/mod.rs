//! OPF（Open Packaging Format）包描述文件解析模块
//!
//! 此模块提供EPUB包描述文件的解析功能，产出清单(manifest)与
//! 脊柱(spine)，并把spine解析为正文章节的路径列表。

mod manifest;
mod parser;
mod spine;

pub use manifest::{ManifestItem, NCX_MEDIA_TYPE};
pub use parser::Opf;
pub use spine::SpineItem;
