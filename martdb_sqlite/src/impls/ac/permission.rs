use async_trait::async_trait;
use futures::TryStreamExt;
use martcore::{
    ac::{
        catalog::CatalogEntry,
        grant::PermissionGrant,
        permission::{
            Permission,
            PermissionCategory,
        },
        traits::PermissionBackend,
    },
    error::BackendError,
};
use sqlx::{
    Row,
    sqlite::SqliteRow,
};
use std::str::FromStr;

use crate::SqliteBackend;

async fn seed_permissions_sqlite(
    backend: &SqliteBackend,
    entries: &[CatalogEntry],
) -> Result<usize, BackendError> {
    let mut tx = backend.pool.begin().await?;
    let mut inserted = 0;
    for entry in entries.iter() {
        let category = <&'static str>::from(entry.category);
        inserted += sqlx::query(
            r#"
INSERT INTO permission (
    code,
    name,
    description,
    category
)
VALUES ( ?1, ?2, ?3, ?4 )
ON CONFLICT(code)
DO NOTHING
        "#,
        )
        .bind(entry.code)
        .bind(entry.name)
        .bind(entry.description)
        .bind(category)
        .execute(&mut *tx)
        .await?
        .rows_affected() as usize;
    }
    tx.commit().await?;
    Ok(inserted)
}

async fn list_permissions_sqlite(
    backend: &SqliteBackend,
) -> Result<Vec<Permission>, BackendError> {
    let mut rows = sqlx::query(r#"
SELECT
    id,
    code,
    name,
    description,
    category
FROM
    permission
ORDER BY
    category,
    name
        "#)
    .fetch(&*backend.pool);
    let mut result = Vec::new();
    while let Some(row) = rows.try_next().await? {
        let category: String = row.get("category");
        result.push(Permission {
            id: row.get("id"),
            code: row.get("code"),
            name: row.get("name"),
            description: row.get("description"),
            category: PermissionCategory::from_str(&category)
                .map_err(|e| BackendError::AppInvariantViolation(e.to_string()))?,
        });
    }
    Ok(result)
}

async fn get_permissions_by_ids_sqlite(
    backend: &SqliteBackend,
    ids: &[i64],
) -> Result<Vec<Permission>, BackendError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder = sqlx::QueryBuilder::new(r#"
SELECT
    id,
    code,
    name,
    description,
    category
FROM
    permission
WHERE
    id IN ("#);
    let mut ids_list = builder.separated(", ");
    for id in ids.iter() {
        ids_list.push_bind(*id);
    }
    ids_list.push_unseparated(")");
    builder.push(r#"
ORDER BY
    id
        "#);
    let mut rows = builder.build()
        .fetch(&*backend.pool);
    let mut result = Vec::new();
    while let Some(row) = rows.try_next().await? {
        let category: String = row.get("category");
        result.push(Permission {
            id: row.get("id"),
            code: row.get("code"),
            name: row.get("name"),
            description: row.get("description"),
            category: PermissionCategory::from_str(&category)
                .map_err(|e| BackendError::AppInvariantViolation(e.to_string()))?,
        });
    }
    Ok(result)
}

async fn get_permissions_for_role_sqlite(
    backend: &SqliteBackend,
    role_id: i64,
) -> Result<Vec<Permission>, BackendError> {
    let mut rows = sqlx::query(r#"
SELECT
    permission.id AS id,
    permission.code AS code,
    permission.name AS name,
    permission.description AS description,
    permission.category AS category
FROM
    permission
JOIN
    role_permission ON role_permission.permission_id == permission.id
WHERE
    role_permission.role_id = ?1
ORDER BY
    permission.category,
    permission.name
        "#)
    .bind(role_id)
    .fetch(&*backend.pool);
    let mut result = Vec::new();
    while let Some(row) = rows.try_next().await? {
        let category: String = row.get("category");
        result.push(Permission {
            id: row.get("id"),
            code: row.get("code"),
            name: row.get("name"),
            description: row.get("description"),
            category: PermissionCategory::from_str(&category)
                .map_err(|e| BackendError::AppInvariantViolation(e.to_string()))?,
        });
    }
    Ok(result)
}

async fn replace_role_permissions_sqlite(
    backend: &SqliteBackend,
    role_id: i64,
    permission_ids: &[i64],
) -> Result<(), BackendError> {
    let mut tx = backend.pool.begin().await?;
    sqlx::query(
        r#"
DELETE FROM
    role_permission
WHERE
    role_id = ?1
        "#,
    )
    .bind(role_id)
    .execute(&mut *tx)
    .await?;
    for permission_id in permission_ids.iter() {
        sqlx::query(
            r#"
INSERT INTO role_permission (
    role_id,
    permission_id
)
VALUES ( ?1, ?2 )
        "#,
        )
        .bind(role_id)
        .bind(*permission_id)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}

async fn get_grants_for_user_sqlite(
    backend: &SqliteBackend,
    user_id: i64,
) -> Result<Vec<PermissionGrant>, BackendError> {
    let mut rows = sqlx::query(r#"
SELECT
    permission.code AS code,
    permission.category AS category
FROM
    'user'
JOIN
    role_permission ON role_permission.role_id == 'user'.role_id
JOIN
    permission ON permission.id == role_permission.permission_id
WHERE
    'user'.id = ?1
ORDER BY
    permission.code
        "#)
    .bind(user_id)
    .fetch(&*backend.pool);
    let mut result = Vec::new();
    while let Some(row) = rows.try_next().await? {
        let category: String = row.get("category");
        result.push(PermissionGrant {
            code: row.get("code"),
            category: PermissionCategory::from_str(&category)
                .map_err(|e| BackendError::AppInvariantViolation(e.to_string()))?,
        });
    }
    Ok(result)
}

async fn user_has_permission_sqlite(
    backend: &SqliteBackend,
    user_id: i64,
    code: &str,
) -> Result<bool, BackendError> {
    let granted = sqlx::query(r#"
SELECT EXISTS (
    SELECT
        1
    FROM
        'user'
    JOIN
        role_permission ON role_permission.role_id == 'user'.role_id
    JOIN
        permission ON permission.id == role_permission.permission_id
    WHERE
        'user'.id = ?1 AND
        permission.code = ?2
) AS granted
        "#)
    .bind(user_id)
    .bind(code)
    .map(|row: SqliteRow| row.get::<i64, _>("granted") > 0)
    .fetch_one(&*backend.pool)
    .await?;
    Ok(granted)
}

#[async_trait]
impl PermissionBackend for SqliteBackend {
    async fn seed_permissions(
        &self,
        entries: &[CatalogEntry],
    ) -> Result<usize, BackendError> {
        seed_permissions_sqlite(
            &self,
            entries,
        ).await
    }

    async fn list_permissions(
        &self,
    ) -> Result<Vec<Permission>, BackendError> {
        list_permissions_sqlite(
            &self,
        ).await
    }

    async fn get_permissions_by_ids(
        &self,
        ids: &[i64],
    ) -> Result<Vec<Permission>, BackendError> {
        get_permissions_by_ids_sqlite(
            &self,
            ids,
        ).await
    }

    async fn get_permissions_for_role(
        &self,
        role_id: i64,
    ) -> Result<Vec<Permission>, BackendError> {
        get_permissions_for_role_sqlite(
            &self,
            role_id,
        ).await
    }

    async fn replace_role_permissions(
        &self,
        role_id: i64,
        permission_ids: &[i64],
    ) -> Result<(), BackendError> {
        replace_role_permissions_sqlite(
            &self,
            role_id,
            permission_ids,
        ).await
    }

    async fn get_grants_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<PermissionGrant>, BackendError> {
        get_grants_for_user_sqlite(
            &self,
            user_id,
        ).await
    }

    async fn user_has_permission(
        &self,
        user_id: i64,
        code: &str,
    ) -> Result<bool, BackendError> {
        user_has_permission_sqlite(
            &self,
            user_id,
            code,
        ).await
    }
}
