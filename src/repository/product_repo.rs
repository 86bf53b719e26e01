// ==========================================
// 陶瓷库存系统 - 商品数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑（规范化由调用方完成）
// ==========================================

use crate::domain::stock::Product;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// ProductRepository - 商品仓储
// ==========================================
/// 商品仓储
/// 职责: 管理 product 表的 CRUD 操作
pub struct ProductRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 显式新增商品
    ///
    /// # 返回
    /// - Ok(Product): 新建的商品
    /// - Err(UniqueConstraintViolation): 规范名已存在
    pub fn create(&self, canonical_name: &str) -> RepositoryResult<Product> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO product (canonical_name) VALUES (?1)",
            params![canonical_name],
        )?;
        Ok(Product {
            id: conn.last_insert_rowid(),
            canonical_name: canonical_name.to_string(),
        })
    }

    /// 按 ID 查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;
        let result = conn.query_row(
            "SELECT id, canonical_name FROM product WHERE id = ?1",
            params![id],
            map_product,
        );

        match result {
            Ok(product) => Ok(Some(product)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 按规范名查询
    pub fn find_by_name(&self, canonical_name: &str) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;
        let result = conn.query_row(
            "SELECT id, canonical_name FROM product WHERE canonical_name = ?1",
            params![canonical_name],
            map_product,
        );

        match result {
            Ok(product) => Ok(Some(product)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询全部商品（按规范名升序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Product>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT id, canonical_name FROM product ORDER BY canonical_name ASC")?;
        let products = stmt
            .query_map([], map_product)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(products)
    }

    /// 删除商品（库存记录级联删除）
    pub fn delete(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM product WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Product".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM product", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn map_product(row: &rusqlite::Row<'_>) -> SqliteResult<Product> {
    Ok(Product {
        id: row.get(0)?,
        canonical_name: row.get(1)?,
    })
}
