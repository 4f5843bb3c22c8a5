// ==========================================
// 资产盘点系统 - 命令行入口
// ==========================================
// asset-inventory import --file F --campus C   导入资产文件（可多次 --file）
// asset-inventory batches [--limit N]         查看最近导入批次
// asset-inventory config set KEY VALUE        覆写导入配置
// asset-inventory config show                 查看配置快照
// asset-inventory init-db                     初始化数据库
// ==========================================

use anyhow::{Context, Result};
use asset_inventory::app::{get_default_db_path, AppState};
use asset_inventory::config::ConfigManager;
use asset_inventory::logging;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "asset-inventory")]
#[command(about = "资产盘点系统 - 资产批量导入", version, long_about = None)]
struct Cli {
    /// 数据库路径（默认: $ASSET_INVENTORY_DB_PATH 或用户数据目录）
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// 以 JSON 格式输出日志
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 导入旧系统导出的资产文件
    Import {
        /// 输入文件（可重复，多个文件并发导入）
        #[arg(short, long, required = true)]
        file: Vec<PathBuf>,

        /// 校区标识（24 位十六进制）
        #[arg(short, long)]
        campus: Option<String>,
    },

    /// 查看最近的导入批次
    Batches {
        /// 返回条数
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// 导入配置
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// 初始化数据库 schema
    InitDb,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// 覆写全局配置值
    Set { key: String, value: String },

    /// 输出全局配置快照（JSON）
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }

    let db_path = cli
        .db
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(get_default_db_path);
    tracing::info!(db_path = %db_path, version = asset_inventory::VERSION, "使用数据库");

    let state = AppState::new(db_path.clone()).context("初始化应用状态失败")?;

    match cli.command {
        Commands::Import { file, campus } => {
            let paths: Vec<String> = file
                .iter()
                .map(|p| p.to_string_lossy().to_string())
                .collect();

            if let [single] = paths.as_slice() {
                let response = state
                    .import_api
                    .import_file(single, campus.as_deref())
                    .await
                    .with_context(|| format!("导入文件失败: {}", single))?;
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                let results = state
                    .import_api
                    .import_files(&paths, campus.as_deref())
                    .await
                    .context("批量导入失败")?;

                let output: Vec<serde_json::Value> = paths
                    .iter()
                    .zip(results)
                    .map(|(path, result)| match result {
                        Ok(response) => serde_json::json!({ "file": path, "result": response }),
                        Err(e) => serde_json::json!({ "file": path, "error": e.to_string() }),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
        }
        Commands::Batches { limit } => {
            let batches = state.import_api.list_recent_batches(limit).await?;
            println!("{}", serde_json::to_string_pretty(&batches)?);
        }
        Commands::Config { action } => {
            let config = ConfigManager::new(&db_path)?;
            match action {
                ConfigAction::Set { key, value } => {
                    config.set_global_config_value(&key, &value)?;
                    tracing::info!(key = %key, value = %value, "配置已更新");
                }
                ConfigAction::Show => println!("{}", config.get_config_snapshot()?),
            }
        }
        Commands::InitDb => {
            println!("数据库已初始化: {}", state.db_path);
        }
    }

    Ok(())
}
