// ==========================================
// 陶瓷库存系统 - 身份解析仓储（get-or-create）
// ==========================================
// 红线: 并发安全依赖唯一约束 + 冲突容忍插入，
//       禁止“先查后插”且无约束的写法
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

/// 可按名称解析的实体类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Product,
    Warehouse,
}

impl EntityKind {
    fn table(&self) -> &'static str {
        match self {
            EntityKind::Product => "product",
            EntityKind::Warehouse => "warehouse",
        }
    }

    fn name_column(&self) -> &'static str {
        match self {
            EntityKind::Product => "canonical_name",
            EntityKind::Warehouse => "name",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Product => "Product",
            EntityKind::Warehouse => "Warehouse",
        }
    }
}

/// 在给定连接（通常是事务）内按名称解析 ID，不存在则创建
///
/// # 说明
/// - INSERT ... ON CONFLICT DO NOTHING: 名称已存在时不报错
/// - 随后 SELECT 读回 ID（无论是本次插入还是并发方插入）
/// - 与调用方共享事务边界：事务回滚时本次创建的记录一并撤销
pub fn resolve_or_create_tx(
    conn: &Connection,
    kind: EntityKind,
    name: &str,
) -> RepositoryResult<i64> {
    if name.trim().is_empty() {
        return Err(RepositoryError::ValidationError(format!(
            "{} 名称不能为空",
            kind.label()
        )));
    }

    let insert_sql = format!(
        "INSERT INTO {table} ({col}) VALUES (?1) ON CONFLICT({col}) DO NOTHING",
        table = kind.table(),
        col = kind.name_column()
    );
    let inserted = conn.execute(&insert_sql, params![name])?;

    let select_sql = format!(
        "SELECT id FROM {table} WHERE {col} = ?1",
        table = kind.table(),
        col = kind.name_column()
    );
    let id: i64 = conn
        .query_row(&select_sql, params![name], |row| row.get(0))
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: kind.label().to_string(),
                id: name.to_string(),
            },
            other => other.into(),
        })?;

    if inserted > 0 {
        tracing::debug!(kind = kind.label(), name = %name, id = id, "新建实体");
    }

    Ok(id)
}

/// 按名称查找 ID（不创建）
pub fn find_id_by_name(
    conn: &Connection,
    kind: EntityKind,
    name: &str,
) -> RepositoryResult<Option<i64>> {
    let sql = format!(
        "SELECT id FROM {table} WHERE {col} = ?1",
        table = kind.table(),
        col = kind.name_column()
    );
    match conn.query_row(&sql, params![name], |row| row.get(0)) {
        Ok(id) => Ok(Some(id)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ==========================================
// IdentityResolver - 独立使用的解析器
// ==========================================
/// 每次调用即一个独立工作单元（自动提交）
pub struct IdentityResolver {
    conn: Arc<Mutex<Connection>>,
}

impl IdentityResolver {
    /// 从已有连接创建解析器
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn resolve_or_create(&self, kind: EntityKind, name: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        resolve_or_create_tx(&conn, kind, name)
    }
}
