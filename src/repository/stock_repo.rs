// ==========================================
// 陶瓷库存系统 - 库存数据仓储
// ==========================================
// 职责: stock_entry 表的读写 + 对账事务边界
// 红线: Repository 不含业务逻辑，只做数据 CRUD
// ==========================================

use crate::domain::import::MAX_QUANTITY;
use crate::domain::stock::{Product, StockEntry, Warehouse};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::warehouse_repo::list_warehouses;
use rusqlite::{params, Connection, Result as SqliteResult, Transaction, TransactionBehavior};
use std::sync::{Arc, Mutex};

/// 快照读取的原始行集（由聚合器组装为 StockSummary）
#[derive(Debug, Clone, Default)]
pub struct StockSnapshotRows {
    /// (商品, 总数量)，按规范名升序
    pub products: Vec<(Product, i64)>,
    pub warehouses: Vec<Warehouse>,
    pub entries: Vec<StockEntry>,
}

// ==========================================
// StockRepository - 库存仓储
// ==========================================
pub struct StockRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StockRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 在单个写事务内执行工作单元
    ///
    /// # 说明
    /// - BEGIN IMMEDIATE: 开始即持有写锁，跨进程的并发对账串行执行
    /// - 闭包返回 Ok → COMMIT；返回 Err 或 panic → ROLLBACK
    /// - 事务内创建的商品/仓库与数量写入共享同一回滚边界
    pub fn run_in_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let mut conn = self.get_conn().map_err(E::from)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| E::from(RepositoryError::DatabaseTransactionError(e.to_string())))?;

        match work(&tx) {
            Ok(value) => {
                tx.commit().map_err(|e| {
                    E::from(RepositoryError::DatabaseTransactionError(e.to_string()))
                })?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    tracing::error!(error = %rollback_err, "事务回滚失败");
                }
                Err(err)
            }
        }
    }

    /// 直接更新单品单仓数量（UPSERT）
    pub fn upsert_quantity(
        &self,
        product_id: i64,
        warehouse_id: i64,
        quantity: i64,
    ) -> RepositoryResult<StockEntry> {
        if quantity < 0 {
            return Err(RepositoryError::ValidationError(format!(
                "库存数量不能为负: {}",
                quantity
            )));
        }
        if quantity > MAX_QUANTITY {
            return Err(RepositoryError::ValidationError(format!(
                "库存数量超过上限 {}: {}",
                MAX_QUANTITY, quantity
            )));
        }
        let conn = self.get_conn()?;
        upsert_tx(&conn, product_id, warehouse_id, quantity)?;
        Ok(StockEntry {
            product_id,
            warehouse_id,
            quantity,
        })
    }

    /// 查询单品单仓数量（无记录返回 0）
    pub fn get_quantity(&self, product_id: i64, warehouse_id: i64) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let result = conn.query_row(
            "SELECT quantity FROM stock_entry WHERE product_id = ?1 AND warehouse_id = ?2",
            params![product_id, warehouse_id],
            |row| row.get::<_, i64>(0),
        );

        match result {
            Ok(quantity) => Ok(quantity),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询全部库存记录
    pub fn list_entries(&self) -> RepositoryResult<Vec<StockEntry>> {
        let conn = self.get_conn()?;
        list_entries(&conn)
    }

    /// 读取快照所需的三组行集
    ///
    /// 说明: 在一个只读事务内完成，三组结果彼此一致
    pub fn read_snapshot_rows(&self) -> RepositoryResult<StockSnapshotRows> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Deferred)
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let rows = StockSnapshotRows {
            products: list_product_totals(&tx)?,
            warehouses: list_warehouses(&tx)?,
            entries: list_entries(&tx)?,
        };

        // 只读事务，提交与回滚等价
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(rows)
    }
}

// ==========================================
// 事务内操作（供对账引擎在同一事务中组合调用）
// ==========================================

/// 将指定仓库的全部库存数量清零
///
/// # 返回
/// - 受影响的记录数
pub fn reset_warehouses_tx(conn: &Connection, warehouse_ids: &[i64]) -> RepositoryResult<usize> {
    let mut stmt = conn.prepare("UPDATE stock_entry SET quantity = 0 WHERE warehouse_id = ?1")?;
    let mut affected = 0;
    for warehouse_id in warehouse_ids {
        affected += stmt.execute(params![warehouse_id])?;
    }
    Ok(affected)
}

/// 写入单品单仓数量（存在则覆盖）
pub fn upsert_tx(
    conn: &Connection,
    product_id: i64,
    warehouse_id: i64,
    quantity: i64,
) -> RepositoryResult<()> {
    let mut stmt = conn.prepare_cached(
        r#"
        INSERT INTO stock_entry (product_id, warehouse_id, quantity)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(product_id, warehouse_id) DO UPDATE SET quantity = excluded.quantity
        "#,
    )?;
    stmt.execute(params![product_id, warehouse_id, quantity])?;
    Ok(())
}

/// 全部商品及其总数量（无库存记录的商品总数为 0）
pub fn list_product_totals(conn: &Connection) -> RepositoryResult<Vec<(Product, i64)>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT p.id, p.canonical_name, COALESCE(SUM(s.quantity), 0) AS total_quantity
        FROM product AS p
        LEFT JOIN stock_entry AS s ON p.id = s.product_id
        GROUP BY p.id, p.canonical_name
        ORDER BY p.canonical_name ASC
        "#,
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                Product {
                    id: row.get(0)?,
                    canonical_name: row.get(1)?,
                },
                row.get::<_, i64>(2)?,
            ))
        })?
        .collect::<SqliteResult<Vec<_>>>()?;
    Ok(rows)
}

pub fn list_entries(conn: &Connection) -> RepositoryResult<Vec<StockEntry>> {
    let mut stmt =
        conn.prepare("SELECT product_id, warehouse_id, quantity FROM stock_entry")?;
    let entries = stmt
        .query_map([], |row| {
            Ok(StockEntry {
                product_id: row.get(0)?,
                warehouse_id: row.get(1)?,
                quantity: row.get(2)?,
            })
        })?
        .collect::<SqliteResult<Vec<_>>>()?;
    Ok(entries)
}
