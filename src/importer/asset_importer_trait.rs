// ==========================================
// 资产盘点系统 - 资产导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 管道: 分词 → 字段映射 → 规范化 → 房间解析 → 查重 → 批量插入 → 汇总
// ==========================================

use crate::config::ImportSettings;
use crate::domain::{CampusId, ImportOutcome, NormalizedAsset, RawAssetRecord, RawRecord};
use crate::importer::error::{ImportResult, RecordError};
use async_trait::async_trait;

// ==========================================
// ImportRequest - 单个文件的导入请求
// ==========================================
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub content: Vec<u8>,
    pub campus_id: Option<CampusId>, // 缺失为前置条件失败
    pub file_name: Option<String>,   // 仅用于台账
}

impl ImportRequest {
    pub fn new(content: impl Into<Vec<u8>>, campus_id: CampusId) -> Self {
        Self {
            content: content.into(),
            campus_id: Some(campus_id),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

// ==========================================
// AssetImporter Trait
// ==========================================
// 用途: 资产导入主接口
// 实现者: AssetImporterImpl
#[async_trait]
pub trait AssetImporter: Send + Sync {
    /// 导入单个文件
    ///
    /// # 返回
    /// - Ok(ImportOutcome): 导入汇总（空输入也返回零值汇总）
    /// - Err: 仅前置条件/配置错误（缺少校区、配置值非法）
    ///
    /// # 导入流程
    /// 1. 分词
    /// 2. 字段映射与规范化（逐条）
    /// 3. 房间解析（批量查询 + 创建缺失房间）
    /// 4. 标签查重（批量）
    /// 5. 分批无序插入
    /// 6. 汇总 + 写入批次台账
    async fn import_assets(&self, request: ImportRequest) -> ImportResult<ImportOutcome>;

    /// 并发导入多个文件
    ///
    /// # 说明
    /// - 每个请求独立执行，单个失败不影响其他请求
    /// - 返回顺序与请求顺序一致
    async fn batch_import(&self, requests: Vec<ImportRequest>) -> Vec<ImportResult<ImportOutcome>>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 分词（阶段 0），纯同步
// 实现者: DelimitedParser
pub trait FileParser: Send + Sync {
    /// 将文本切分为按位置排列的字段记录（惰性）
    ///
    /// # 参数
    /// - content: 已解码的文件内容
    /// - separator: 单字节字段分隔符
    ///
    /// # 返回
    /// - 每个非空行一条 RawRecord；空内容返回空序列
    fn parse_records<'a>(
        &self,
        content: &'a str,
        separator: u8,
    ) -> Box<dyn Iterator<Item = RawRecord> + 'a>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 位置字段 → 命名字段（阶段 1）
// 实现者: FieldLayout
pub trait FieldMapper: Send + Sync {
    fn map_record(&self, record: &RawRecord) -> RawAssetRecord;
}

// ==========================================
// FieldNormalizer Trait
// ==========================================
// 用途: 命名字段 → 类型化资产（阶段 2）
// 实现者: DataCleaner
pub trait FieldNormalizer: Send + Sync {
    /// 规范化一条记录
    ///
    /// # 返回
    /// - Ok(Some): 数据行
    /// - Ok(None): 非数据行（表头/表尾等），不计入处理数
    /// - Err(RecordError): 单条校验失败
    fn normalize(
        &self,
        raw: &RawAssetRecord,
        campus_id: &CampusId,
        settings: &ImportSettings,
    ) -> Result<Option<NormalizedAsset>, RecordError>;
}
