// ==========================================
// 燃烧测试报告系统 - 记录存储 Trait
// ==========================================
// 职责: 定义测试记录的数据访问接口（不包含实现）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::{CanonicalRecord, OrderSummary};
use crate::repository::error::RepositoryResult;

// ==========================================
// RecordStore Trait
// ==========================================
// 用途: 导入管道写入、报告生成读取
// 实现者: SqliteRecordStore（使用 rusqlite）
pub trait RecordStore: Send + Sync {
    /// 批量 upsert（以 (order_no, product_code) 为键）
    ///
    /// # 参数
    /// - records: 待写入记录
    ///
    /// # 返回
    /// - Ok(usize): 写入后存储中的记录总数
    /// - Err: 数据库错误（整批回滚，无部分可见状态）
    fn upsert_batch(&self, records: &[CanonicalRecord]) -> RepositoryResult<usize>;

    /// 订单汇总（最近创建的记录所在订单在前）
    fn orders_summary(&self) -> RepositoryResult<Vec<OrderSummary>>;

    /// 查询订单明细（稳定键序；未知订单返回空列表）
    fn order_detail(&self, order_no: &str) -> RepositoryResult<Vec<CanonicalRecord>>;

    /// 记录总数
    fn total_count(&self) -> RepositoryResult<usize>;
}
