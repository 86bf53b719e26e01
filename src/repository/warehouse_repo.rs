// ==========================================
// 陶瓷库存系统 - 仓库数据仓储
// ==========================================

use crate::domain::stock::Warehouse;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

/// 仓库仓储
/// 职责: 管理 warehouse 表的 CRUD 操作
pub struct WarehouseRepository {
    conn: Arc<Mutex<Connection>>,
}

impl WarehouseRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 显式新增仓库（名称重复 → UniqueConstraintViolation）
    pub fn create(&self, name: &str) -> RepositoryResult<Warehouse> {
        let conn = self.get_conn()?;
        conn.execute("INSERT INTO warehouse (name) VALUES (?1)", params![name])?;
        Ok(Warehouse {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Warehouse>> {
        let conn = self.get_conn()?;
        let result = conn.query_row(
            "SELECT id, name FROM warehouse WHERE id = ?1",
            params![id],
            map_warehouse,
        );

        match result {
            Ok(warehouse) => Ok(Some(warehouse)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Warehouse>> {
        let conn = self.get_conn()?;
        let result = conn.query_row(
            "SELECT id, name FROM warehouse WHERE name = ?1",
            params![name],
            map_warehouse,
        );

        match result {
            Ok(warehouse) => Ok(Some(warehouse)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询全部仓库（按名称升序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Warehouse>> {
        let conn = self.get_conn()?;
        list_warehouses(&conn)
    }

    /// 删除仓库（库存记录级联删除）
    pub fn delete(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM warehouse WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Warehouse".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

/// 在给定连接内查询全部仓库（快照读取复用）
pub fn list_warehouses(conn: &Connection) -> RepositoryResult<Vec<Warehouse>> {
    let mut stmt = conn.prepare("SELECT id, name FROM warehouse ORDER BY name ASC")?;
    let warehouses = stmt
        .query_map([], map_warehouse)?
        .collect::<SqliteResult<Vec<_>>>()?;
    Ok(warehouses)
}

fn map_warehouse(row: &rusqlite::Row<'_>) -> SqliteResult<Warehouse> {
    Ok(Warehouse {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}
