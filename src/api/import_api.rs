// ==========================================
// 资产盘点系统 - 资产导入API
// ==========================================
// 职责: 校区标识校验、文件读取、执行导入、错误列表截断
// 说明: 导入核心从不丢弃错误条目，截断只发生在这里
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, ImportConfigReader};
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::{CampusId, ImportBatch, ImportOutcome, ImportSummary};
use crate::importer::{AssetImporter, AssetImporterImpl, ImportError, ImportRequest};
use crate::repository::{AssetImportRepository, AssetImportRepositoryImpl};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// 导入API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportApiResponse {
    /// 导入汇总（errors 已按展示上限截断）
    #[serde(flatten)]
    pub summary: ImportSummary,
    /// 截断前的错误条目总数
    pub total_errors: usize,
    /// 错误列表是否被截断
    pub errors_truncated: bool,
    /// 导入批次ID
    pub batch_id: String,
    /// 本次新建的房间数
    pub rooms_created: usize,
    /// 导入耗时（毫秒）
    pub elapsed_ms: u64,
}

impl ImportApiResponse {
    /// 由导入结果构造响应，错误列表保留前 max_errors 条
    pub fn from_outcome(outcome: ImportOutcome, max_errors: usize) -> Self {
        let mut summary = outcome.summary;
        let total_errors = summary.errors.len();
        let errors_truncated = total_errors > max_errors;
        summary.errors.truncate(max_errors);

        Self {
            summary,
            total_errors,
            errors_truncated,
            batch_id: outcome.batch_id,
            rooms_created: outcome.rooms_created,
            elapsed_ms: outcome.elapsed_time.as_millis() as u64,
        }
    }
}

/// 校验校区标识
///
/// - 缺失或空白: 前置条件失败
/// - 非 24 位十六进制: 无效输入
pub fn validate_campus_id(raw: Option<&str>) -> ApiResult<CampusId> {
    let raw = raw
        .filter(|s| !s.trim().is_empty())
        .ok_or(ImportError::MissingCampusId)?;
    Ok(CampusId::parse(raw).map_err(ImportError::from)?)
}

/// 资产导入API
pub struct ImportApi {
    db_path: String,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// 从文件导入资产
    ///
    /// # 参数
    /// - file_path: 文件路径
    /// - campus_id: 校区标识（24 位十六进制）
    pub async fn import_file(
        &self,
        file_path: &str,
        campus_id: Option<&str>,
    ) -> ApiResult<ImportApiResponse> {
        // 校区校验先于文件读取
        let campus_id = validate_campus_id(campus_id)?;

        let path = Path::new(file_path);
        if !path.exists() {
            return Err(ImportError::FileNotFound(file_path.to_string()).into());
        }
        let content = tokio::fs::read(path).await.map_err(ImportError::from)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());

        self.run_import(ImportRequest {
            content,
            campus_id: Some(campus_id),
            file_name,
        })
        .await
    }

    /// 并发导入多个文件（同一校区）
    ///
    /// # 返回
    /// - 每个文件一个结果，顺序与输入一致；单个文件失败不影响其他文件
    pub async fn import_files(
        &self,
        file_paths: &[String],
        campus_id: Option<&str>,
    ) -> ApiResult<Vec<ApiResult<ImportApiResponse>>> {
        let campus_id = validate_campus_id(campus_id)?;
        let (repo, config) = self.open()?;
        let max_errors = config.get_max_display_errors().await?;

        // 读取失败的文件不参与导入，直接记为失败
        let mut slots: Vec<Option<ApiResult<ImportApiResponse>>> = Vec::new();
        let mut requests = Vec::new();
        for file_path in file_paths {
            let path = Path::new(file_path);
            match tokio::fs::read(path).await {
                Ok(content) => {
                    slots.push(None);
                    requests.push(ImportRequest {
                        content,
                        campus_id: Some(campus_id.clone()),
                        file_name: path.file_name().map(|n| n.to_string_lossy().into_owned()),
                    });
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    slots.push(Some(Err(ImportError::FileNotFound(file_path.clone()).into())));
                }
                Err(e) => slots.push(Some(Err(ImportError::from(e).into()))),
            }
        }

        let importer = AssetImporterImpl::new(repo, config);
        let mut outcomes = importer.batch_import(requests).await.into_iter();

        Ok(slots
            .into_iter()
            .map(|slot| match slot {
                Some(failed) => failed,
                None => match outcomes.next() {
                    Some(Ok(outcome)) => Ok(ImportApiResponse::from_outcome(outcome, max_errors)),
                    Some(Err(e)) => Err(e.into()),
                    None => Err(ApiError::InternalError("导入结果数量不匹配".to_string())),
                },
            })
            .collect())
    }

    /// 从内存缓冲导入资产
    pub async fn import_bytes(
        &self,
        content: Vec<u8>,
        campus_id: Option<&str>,
        file_name: Option<String>,
    ) -> ApiResult<ImportApiResponse> {
        let campus_id = validate_campus_id(campus_id)?;
        self.run_import(ImportRequest {
            content,
            campus_id: Some(campus_id),
            file_name,
        })
        .await
    }

    /// 查询最近的导入批次
    pub async fn list_recent_batches(&self, limit: usize) -> ApiResult<Vec<ImportBatch>> {
        let limit = limit.clamp(1, 100);
        let (repo, _) = self.open()?;
        Ok(repo.get_recent_batches(limit).await?)
    }

    async fn run_import(&self, request: ImportRequest) -> ApiResult<ImportApiResponse> {
        let (repo, config) = self.open()?;
        let max_errors = config.get_max_display_errors().await?;

        let importer = AssetImporterImpl::new(repo, config);
        let outcome = importer.import_assets(request).await?;

        let response = ImportApiResponse::from_outcome(outcome, max_errors);
        if response.errors_truncated {
            warn!(
                total_errors = response.total_errors,
                shown = max_errors,
                "错误列表已截断"
            );
        }
        info!(batch_id = %response.batch_id, "导入请求完成");
        Ok(response)
    }

    /// 打开数据库（幂等建表），仓储与配置共享同一连接
    fn open(&self) -> ApiResult<(AssetImportRepositoryImpl, ConfigManager)> {
        let conn = open_sqlite_connection(&self.db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn).map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let conn = Arc::new(Mutex::new(conn));
        let repo = AssetImportRepositoryImpl::from_connection(conn.clone());
        let config = ConfigManager::from_connection(conn)?;
        Ok((repo, config))
    }
}
