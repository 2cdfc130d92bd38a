//! Employee Repository

use super::{RepoError, RepoResult};
use crate::db::models::{Employee, EmployeeCreate, EmployeeUpdate};
use crate::utils::now_millis;
use sqlx::SqlitePool;

const COLUMNS: &str = "id, name, profile, is_active, created_at, updated_at, deleted_at";

/// Find all live employees
pub async fn list(pool: &SqlitePool) -> RepoResult<Vec<Employee>> {
    let employees = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {COLUMNS} FROM employee WHERE deleted_at IS NULL ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(employees)
}

/// Find active (clock-in eligible) employees
pub async fn list_active(pool: &SqlitePool) -> RepoResult<Vec<Employee>> {
    let employees = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {COLUMNS} FROM employee WHERE is_active = 1 AND deleted_at IS NULL ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(employees)
}

/// Find employee by id
pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Option<Employee>> {
    let employee =
        sqlx::query_as::<_, Employee>(&format!("SELECT {COLUMNS} FROM employee WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(employee)
}

/// Create a new employee (active by default)
pub async fn create(pool: &SqlitePool, data: EmployeeCreate) -> RepoResult<Employee> {
    let now = now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO employee (name, profile, is_active, created_at, updated_at) VALUES (?1, ?2, 1, ?3, ?3) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.profile)
    .bind(now)
    .fetch_one(pool)
    .await?;

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create employee".into()))
}

/// Update an employee
pub async fn update(pool: &SqlitePool, id: i64, data: EmployeeUpdate) -> RepoResult<Employee> {
    let rows = sqlx::query(
        "UPDATE employee SET name = COALESCE(?1, name), profile = COALESCE(?2, profile), is_active = COALESCE(?3, is_active), updated_at = ?4 WHERE id = ?5",
    )
    .bind(&data.name)
    .bind(&data.profile)
    .bind(data.is_active)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {id} not found")));
    }

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))
}

/// Flip the active flag
pub async fn toggle_active(pool: &SqlitePool, id: i64) -> RepoResult<Employee> {
    let rows = sqlx::query(
        "UPDATE employee SET is_active = NOT is_active, updated_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
    )
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {id} not found")));
    }

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))
}

/// Soft delete an employee
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE employee SET deleted_at = ?1, updated_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {id} not found")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_toggle_and_soft_delete() {
        let pool = test_pool().await;
        let emp = create(
            &pool,
            EmployeeCreate {
                name: "Aki".into(),
                profile: None,
            },
        )
        .await
        .unwrap();
        assert!(emp.is_active);

        let emp = toggle_active(&pool, emp.id).await.unwrap();
        assert!(!emp.is_active);

        delete(&pool, emp.id).await.unwrap();
        assert!(list(&pool).await.unwrap().is_empty());

        // Deleting twice is NotFound
        let err = delete(&pool, emp.id).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}
