use std::path::Path;

use booknav::{Book, EpubError, Result, Session};
use clap::{Parser, Subcommand};

/// 📚 BookNav - EPUB导航检查工具
#[derive(Parser)]
#[command(name = "booknav")]
#[command(about = "解析EPUB的spine与目录，并记忆阅读位置")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 显示spine（线性阅读顺序的章节列表）
    Spine {
        /// EPUB文件路径
        epub_file: String,
    },
    /// 显示目录及其到spine章节的映射
    Toc {
        /// EPUB文件路径
        epub_file: String,

        /// 详细输出模式（显示锚点与目标路径）
        #[arg(short, long, help = "显示详细信息")]
        verbose: bool,
    },
    /// 从记忆的位置继续阅读，并保存新位置
    Read {
        /// EPUB文件路径
        epub_file: String,

        /// 跳转到指定目录索引
        #[arg(long, help = "跳转到指定目录索引（从0开始）")]
        goto: Option<usize>,

        /// 前进一个目录条目
        #[arg(long, help = "前进一个目录条目")]
        next: bool,

        /// 后退一个目录条目
        #[arg(long, help = "后退一个目录条目")]
        prev: bool,
    },
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args.command) {
        eprintln!("❌ 错误: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Spine { epub_file } => show_spine(&epub_file),
        Command::Toc { epub_file, verbose } => show_toc(&epub_file, verbose),
        Command::Read {
            epub_file,
            goto,
            next,
            prev,
        } => read(&epub_file, goto, next, prev),
    }
}

/// 显示spine章节列表
fn show_spine(epub_file: &str) -> Result<()> {
    let book = Book::open(epub_file)?;

    println!("📖 共{}个正文章节:", book.chapter_count());
    for (i, path) in book.chapter_paths().iter().enumerate() {
        println!("  {}. {}", i + 1, path.display());
    }

    Ok(())
}

/// 显示目录条目与spine映射
fn show_toc(epub_file: &str, verbose: bool) -> Result<()> {
    let book = Book::open(epub_file)?;

    if book.toc_len() == 0 {
        println!("⚠️  这本书没有目录");
        return Ok(());
    }

    println!("🌳 共{}个目录条目:", book.toc_len());
    for (i, (entry, chapter_idx)) in book
        .entries()
        .iter()
        .zip(book.toc_to_chapter())
        .enumerate()
    {
        let mapping = match chapter_idx {
            Some(idx) => format!("第{}章", idx + 1),
            None => "未解析".to_string(),
        };
        println!("  {}. {} -> {}", i, entry.title, mapping);

        if verbose {
            println!("      目标: {}", entry.path.display());
            if let Some(anchor) = &entry.anchor {
                println!("      锚点: #{}", anchor);
            }
        }
    }

    Ok(())
}

/// 从记忆的位置继续阅读并保存新位置
fn read(epub_file: &str, goto: Option<usize>, next: bool, prev: bool) -> Result<()> {
    let mut session = Session::load();
    let saved = session.position_of(Path::new(epub_file)).unwrap_or(0);

    let mut book = Book::open_at(epub_file, saved)?;

    let result = if let Some(toc_idx) = goto {
        book.goto(toc_idx)
    } else if next {
        book.next()
    } else if prev {
        book.previous()
    } else {
        book.current()
    };

    match result {
        Ok(chapter) => {
            println!("📖 {} (目录位置 {})", chapter.title, book.position());
            println!("  章节文件: {}", chapter.path.display());
            if let Some(anchor) = &chapter.anchor {
                println!("  锚点: #{}", anchor);
            }
        }
        Err(EpubError::EmptyToc) => {
            println!("⚠️  这本书没有目录，无法按目录导航");
        }
        Err(EpubError::UnresolvedTocTarget { title }) => {
            println!("⚠️  目录项\"{}\"无法定位到正文内容", title);
        }
        Err(e) => return Err(e),
    }

    session.record(Path::new(epub_file), book.position());
    session.save()?;

    Ok(())
}
