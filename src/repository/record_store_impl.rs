// ==========================================
// 燃烧测试报告系统 - 记录存储 SQLite 实现
// ==========================================
// 职责: 实现 RecordStore（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::{configure_sqlite_connection, init_schema, open_and_init};
use crate::domain::{CanonicalRecord, OrderSummary};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::record_store::RecordStore;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// 时间戳统一按 RFC3339（UTC，微秒）落库，保证字典序即时间序
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(raw: &str) -> RepositoryResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::FieldValueError {
            field: "created_at".to_string(),
            message: format!("{} ({})", e, raw),
        })
}

// ==========================================
// SqliteRecordStore
// ==========================================
pub struct SqliteRecordStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRecordStore {
    /// 创建新的存储实例（幂等建表）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_and_init(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 内存数据库（测试/临时用途）
    pub fn open_in_memory() -> RepositoryResult<Self> {
        let conn = Connection::open_in_memory()?;
        configure_sqlite_connection(&conn)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建存储实例
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA 与建表（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            init_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 不同订单数
    pub fn distinct_order_count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(DISTINCT order_no) FROM burn_test_record",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn count_with(conn: &Connection) -> RepositoryResult<usize> {
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM burn_test_record", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn map_record(row: &Row<'_>) -> rusqlite::Result<CanonicalRecord> {
        let created_raw: String = row.get(7)?;
        let created_at = DateTime::parse_from_rfc3339(&created_raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;

        Ok(CanonicalRecord {
            order_no: row.get(0)?,
            product_code: row.get(1)?,
            customer: row.get(2)?,
            size_spec: row.get(3)?,
            wick: row.get(4)?,
            color: row.get(5)?,
            fragrance: row.get(6)?,
            created_at,
        })
    }
}

impl RecordStore for SqliteRecordStore {
    /// 批量 upsert（事务化）
    ///
    /// # 说明
    /// - ON CONFLICT(order_no, product_code) DO UPDATE 覆盖全部非键字段
    /// - 同批次内重复键按出现顺序依次覆盖（后写胜出）
    /// - 任一行失败则事务随 drop 回滚
    fn upsert_batch(&self, records: &[CanonicalRecord]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO burn_test_record (
                    order_no, product_code, customer, size_spec,
                    wick, color, fragrance, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT(order_no, product_code) DO UPDATE SET
                    customer = excluded.customer,
                    size_spec = excluded.size_spec,
                    wick = excluded.wick,
                    color = excluded.color,
                    fragrance = excluded.fragrance,
                    created_at = excluded.created_at
                "#,
            )?;

            for record in records {
                stmt.execute(params![
                    record.order_no,
                    record.product_code,
                    record.customer,
                    record.size_spec,
                    record.wick,
                    record.color,
                    record.fragrance,
                    format_timestamp(&record.created_at),
                ])?;
            }
        }

        let total = Self::count_with(&tx)?;
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        info!(written = records.len(), total = total, "批量 upsert 完成");
        Ok(total)
    }

    fn orders_summary(&self) -> RepositoryResult<Vec<OrderSummary>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT order_no, COUNT(*) AS item_count, MAX(created_at) AS latest
            FROM burn_test_record
            GROUP BY order_no
            ORDER BY latest DESC, order_no ASC
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(order_no, count, latest)| {
                Ok(OrderSummary {
                    order_no,
                    item_count: count as usize,
                    latest_created_at: parse_timestamp(&latest)?,
                })
            })
            .collect()
    }

    fn order_detail(&self, order_no: &str) -> RepositoryResult<Vec<CanonicalRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT order_no, product_code, customer, size_spec,
                   wick, color, fragrance, created_at
            FROM burn_test_record
            WHERE order_no = ?1
            ORDER BY product_code ASC
            "#,
        )?;

        let records = stmt
            .query_map(params![order_no], Self::map_record)?
            .collect::<Result<Vec<_>, _>>()?;

        debug!(order_no = %order_no, count = records.len(), "订单明细查询完成");
        Ok(records)
    }

    fn total_count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Self::count_with(&conn)
    }
}
