use async_trait::async_trait;
use martcore::{
    ac::{
        traits::UserBackend,
        user::User,
    },
    error::BackendError,
};
use sqlx::{
    Row,
    sqlite::SqliteRow,
};

use crate::{
    SqliteBackend,
    chrono::Utc,
};

async fn add_user_sqlite(
    backend: &SqliteBackend,
    name: &str,
) -> Result<Option<i64>, BackendError> {
    let ts = Utc::now().timestamp();
    match sqlx::query(
        r#"
INSERT INTO 'user' (
    name,
    created_ts
)
VALUES ( ?1, ?2 )
        "#,
    )
    .bind(name)
    .bind(ts)
    .execute(&*backend.pool)
    .await {
        Ok(result) => Ok(Some(result.last_insert_rowid())),
        Err(e) => {
            match e.as_database_error() {
                Some(db_e) if db_e.is_unique_violation() => Ok(None),
                _ => Err(e)?,
            }
        }
    }
}

async fn get_user_by_id_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<Option<User>, BackendError> {
    let recs = sqlx::query(r#"
SELECT
    id,
    name,
    role_id,
    created_ts
FROM
    'user'
WHERE
    id = ?1
        "#)
    .bind(id)
    .map(|row: SqliteRow| User {
        id: row.get("id"),
        name: row.get("name"),
        role_id: row.get("role_id"),
        created_ts: row.get("created_ts"),
    })
    .fetch_optional(&*backend.pool)
    .await?;
    Ok(recs)
}

async fn get_user_by_name_sqlite(
    backend: &SqliteBackend,
    name: &str,
) -> Result<Option<User>, BackendError> {
    let recs = sqlx::query(r#"
SELECT
    id,
    name,
    role_id,
    created_ts
FROM
    'user'
WHERE
    name = ?1
        "#)
    .bind(name)
    .map(|row: SqliteRow| User {
        id: row.get("id"),
        name: row.get("name"),
        role_id: row.get("role_id"),
        created_ts: row.get("created_ts"),
    })
    .fetch_optional(&*backend.pool)
    .await?;
    Ok(recs)
}

async fn set_user_role_sqlite(
    backend: &SqliteBackend,
    user_id: i64,
    role_id: Option<i64>,
) -> Result<bool, BackendError> {
    Ok(sqlx::query(
        r#"
UPDATE 'user'
SET
    role_id = ?2
WHERE
    id = ?1
        "#,
    )
    .bind(user_id)
    .bind(role_id)
    .execute(&*backend.pool)
    .await?
    .rows_affected() > 0)
}

#[async_trait]
impl UserBackend for SqliteBackend {
    async fn add_user(
        &self,
        name: &str,
    ) -> Result<Option<i64>, BackendError> {
        add_user_sqlite(
            &self,
            name,
        ).await
    }

    async fn get_user_by_id(
        &self,
        id: i64,
    ) -> Result<Option<User>, BackendError> {
        get_user_by_id_sqlite(
            &self,
            id,
        ).await
    }

    async fn get_user_by_name(
        &self,
        name: &str,
    ) -> Result<Option<User>, BackendError> {
        get_user_by_name_sqlite(
            &self,
            name,
        ).await
    }

    async fn set_user_role(
        &self,
        user_id: i64,
        role_id: Option<i64>,
    ) -> Result<bool, BackendError> {
        set_user_role_sqlite(
            &self,
            user_id,
            role_id,
        ).await
    }
}
