use async_trait::async_trait;
use martcore::{
    ac::{
        role::Role,
        traits::RoleBackend,
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

async fn add_role_sqlite(
    backend: &SqliteBackend,
    name: &str,
    description: &str,
) -> Result<Option<i64>, BackendError> {
    let ts = Utc::now().timestamp();
    match sqlx::query(
        r#"
INSERT INTO role (
    name,
    description,
    created_ts
)
VALUES ( ?1, ?2, ?3 )
        "#,
    )
    .bind(name)
    .bind(description)
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

async fn get_role_by_id_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<Option<Role>, BackendError> {
    let recs = sqlx::query(r#"
SELECT
    id,
    name,
    description,
    created_ts
FROM
    role
WHERE
    id = ?1
        "#)
    .bind(id)
    .map(|row: SqliteRow| Role {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        created_ts: row.get("created_ts"),
    })
    .fetch_optional(&*backend.pool)
    .await?;
    Ok(recs)
}

async fn get_role_by_name_sqlite(
    backend: &SqliteBackend,
    name: &str,
) -> Result<Option<Role>, BackendError> {
    let recs = sqlx::query(r#"
SELECT
    id,
    name,
    description,
    created_ts
FROM
    role
WHERE
    name = ?1
        "#)
    .bind(name)
    .map(|row: SqliteRow| Role {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        created_ts: row.get("created_ts"),
    })
    .fetch_optional(&*backend.pool)
    .await?;
    Ok(recs)
}

async fn list_roles_sqlite(
    backend: &SqliteBackend,
) -> Result<Vec<Role>, BackendError> {
    let recs = sqlx::query(r#"
SELECT
    id,
    name,
    description,
    created_ts
FROM
    role
ORDER BY
    name
        "#)
    .map(|row: SqliteRow| Role {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        created_ts: row.get("created_ts"),
    })
    .fetch_all(&*backend.pool)
    .await?;
    Ok(recs)
}

async fn delete_role_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<bool, BackendError> {
    // assignments go first to satisfy the foreign key; rolling back
    // restores them when the role is kept
    let mut tx = backend.pool.begin().await?;
    sqlx::query(
        r#"
DELETE FROM
    role_permission
WHERE
    role_id = ?1
        "#,
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;
    let removed = sqlx::query(
        r#"
DELETE FROM
    role
WHERE
    id = ?1 AND
    NOT EXISTS (
        SELECT 1 FROM 'user' WHERE role_id = ?1
    )
        "#,
    )
    .bind(id)
    .execute(&mut *tx)
    .await?
    .rows_affected() > 0;
    if removed {
        tx.commit().await?;
    } else {
        tx.rollback().await?;
    }
    Ok(removed)
}

async fn is_role_in_use_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<bool, BackendError> {
    let in_use = sqlx::query(r#"
SELECT EXISTS (
    SELECT
        1
    FROM
        'user'
    WHERE
        role_id = ?1
) AS in_use
        "#)
    .bind(id)
    .map(|row: SqliteRow| row.get::<i64, _>("in_use") > 0)
    .fetch_one(&*backend.pool)
    .await?;
    Ok(in_use)
}

#[async_trait]
impl RoleBackend for SqliteBackend {
    async fn add_role(
        &self,
        name: &str,
        description: &str,
    ) -> Result<Option<i64>, BackendError> {
        add_role_sqlite(
            &self,
            name,
            description,
        ).await
    }

    async fn get_role_by_id(
        &self,
        id: i64,
    ) -> Result<Option<Role>, BackendError> {
        get_role_by_id_sqlite(
            &self,
            id,
        ).await
    }

    async fn get_role_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Role>, BackendError> {
        get_role_by_name_sqlite(
            &self,
            name,
        ).await
    }

    async fn list_roles(
        &self,
    ) -> Result<Vec<Role>, BackendError> {
        list_roles_sqlite(
            &self,
        ).await
    }

    async fn delete_role(
        &self,
        id: i64,
    ) -> Result<bool, BackendError> {
        delete_role_sqlite(
            &self,
            id,
        ).await
    }

    async fn is_role_in_use(
        &self,
        id: i64,
    ) -> Result<bool, BackendError> {
        is_role_in_use_sqlite(
            &self,
            id,
        ).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use martcore::ac::{
        catalog::CATALOG,
        role::Role,
        traits::{
            PermissionBackend,
            RoleBackend,
            UserBackend,
        },
    };
    use crate::{
        MigrationProfile,
        SqliteBackend,
    };

    #[async_std::test]
    async fn test_basic() -> anyhow::Result<()> {
        let backend = SqliteBackend::from_url("sqlite::memory:")
            .await?
            .run_migration_profile(MigrationProfile::Martac)
            .await?;
        let role_id = RoleBackend::add_role(&backend, "manager", "runs the store").await?
            .expect("id expected for a fresh name");
        let role = RoleBackend::get_role_by_id(&backend, role_id).await?
            .expect("role is missing?");
        assert_eq!(
            role,
            Role {
                id: 1,
                name: "manager".to_string(),
                description: "runs the store".to_string(),
                created_ts: 1234567890,
            },
        );
        assert_eq!(
            Some(role),
            RoleBackend::get_role_by_name(&backend, "manager").await?,
        );

        assert!(RoleBackend::add_role(&backend, "manager", "again").await?.is_none());
        assert!(RoleBackend::get_role_by_id(&backend, 2).await?.is_none());

        RoleBackend::add_role(&backend, "auditor", "").await?
            .expect("id expected for a fresh name");
        let names = RoleBackend::list_roles(&backend).await?
            .into_iter()
            .map(|role| role.name)
            .collect::<Vec<_>>();
        assert_eq!(names, &["auditor", "manager"]);
        Ok(())
    }

    #[async_std::test]
    async fn test_delete() -> anyhow::Result<()> {
        let backend = SqliteBackend::from_url("sqlite::memory:")
            .await?
            .run_migration_profile(MigrationProfile::Martac)
            .await?;
        PermissionBackend::seed_permissions(&backend, CATALOG).await?;
        let role_id = RoleBackend::add_role(&backend, "seasonal", "").await?
            .expect("id expected for a fresh name");
        PermissionBackend::replace_role_permissions(&backend, role_id, &[1, 2]).await?;

        assert!(RoleBackend::delete_role(&backend, role_id).await?);
        assert!(RoleBackend::get_role_by_id(&backend, role_id).await?.is_none());
        assert!(!RoleBackend::delete_role(&backend, role_id).await?);
        Ok(())
    }

    #[async_std::test]
    async fn test_in_use() -> anyhow::Result<()> {
        let backend = SqliteBackend::from_url("sqlite::memory:")
            .await?
            .run_migration_profile(MigrationProfile::Martac)
            .await?;
        PermissionBackend::seed_permissions(&backend, CATALOG).await?;
        let role_id = RoleBackend::add_role(&backend, "cashier", "").await?
            .expect("id expected for a fresh name");
        PermissionBackend::replace_role_permissions(&backend, role_id, &[1]).await?;
        let user_id = UserBackend::add_user(&backend, "till_one").await?
            .expect("id expected for a fresh name");
        UserBackend::set_user_role(&backend, user_id, Some(role_id)).await?;

        assert!(RoleBackend::is_role_in_use(&backend, role_id).await?);
        assert!(!RoleBackend::delete_role(&backend, role_id).await?);
        assert!(RoleBackend::get_role_by_id(&backend, role_id).await?.is_some());
        // the refused delete also kept the assignments
        assert_eq!(
            1,
            PermissionBackend::get_permissions_for_role(&backend, role_id).await?.len(),
        );

        UserBackend::set_user_role(&backend, user_id, None).await?;
        assert!(!RoleBackend::is_role_in_use(&backend, role_id).await?);
        assert!(RoleBackend::delete_role(&backend, role_id).await?);
        Ok(())
    }
}
