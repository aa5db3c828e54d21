//! 缓存解压模块
//!
//! 负责将EPUB压缩包解压到本地缓存目录。缓存目录以书名(去扩展名的
//! 文件名)命名，同一本书重复打开时直接复用已有缓存，不再解压。

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

use crate::epub::error::Result;

/// 默认缓存根目录
pub const DEFAULT_CACHE_DIR: &str = "eBookCache";

/// 解压完成标记文件名
///
/// 解压中断后目录中可能残留部分文件，仅凭目录存在无法区分缓存
/// 完整与否，因此以标记文件作为解压完成的依据；没有标记的目录
/// 会被重新解压。
const EXTRACT_MARKER: &str = ".extracted";

/// 将EPUB解压到默认缓存目录
///
/// # 参数
/// * `epub_path` - EPUB文件路径
///
/// # 返回值
/// * `Result<PathBuf>` - 该书的缓存根目录
pub fn materialize<P: AsRef<Path>>(epub_path: P) -> Result<PathBuf> {
    materialize_into(epub_path, Path::new(DEFAULT_CACHE_DIR))
}

/// 将EPUB解压到指定的缓存目录
///
/// 缓存根目录为`cache_dir/<书名>`。已带完成标记的缓存视为有效，
/// 直接返回；否则解压压缩包的全部条目(保留内部目录结构)，成功后
/// 写入完成标记。
///
/// # 参数
/// * `epub_path` - EPUB文件路径
/// * `cache_dir` - 缓存根目录
///
/// # 返回值
/// * `Result<PathBuf>` - 该书的缓存根目录
pub fn materialize_into<P: AsRef<Path>>(epub_path: P, cache_dir: &Path) -> Result<PathBuf> {
    let epub_path = epub_path.as_ref();
    let stem = epub_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("无效的EPUB文件名: {}", epub_path.display()),
            )
        })?;

    let cache_root = cache_dir.join(stem);
    let marker = cache_root.join(EXTRACT_MARKER);
    if marker.exists() {
        return Ok(cache_root);
    }

    fs::create_dir_all(&cache_root)?;
    let file = File::open(epub_path)?;
    let mut archive = ZipArchive::new(file)?;
    archive.extract(&cache_root)?;
    fs::write(&marker, b"")?;

    Ok(cache_root)
}
