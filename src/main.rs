use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use exam_indexer::utils::logging;
use exam_indexer::{App, Config, ExamJob};

/// 从考试 PDF 抽取结构化题库
#[derive(Debug, Parser)]
#[command(name = "exam-indexer", version, about)]
struct Cli {
    /// TOML 配置文件（环境变量优先）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 输出目录
    #[arg(long, global = true)]
    output_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 处理单份试卷
    Parse {
        /// 试卷 PDF
        exam: PathBuf,

        /// 官方答案 PDF
        #[arg(long)]
        gabarito: Option<PathBuf>,
    },
    /// 处理文件夹中的所有试卷
    Batch {
        /// 试卷所在文件夹
        folder: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::load(cli.config.as_deref()).context("加载配置失败")?;
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }

    let app = App::initialize(config).context("初始化失败")?;

    match cli.command {
        Command::Parse { exam, gabarito } => {
            let job = ExamJob::new(exam, gabarito);
            app.run_single(job).await.context("试卷处理失败")?;
        }
        Command::Batch { folder } => {
            app.run_batch(&folder)
                .await
                .with_context(|| format!("批量处理失败: {}", folder.display()))?;
        }
    }

    Ok(())
}
