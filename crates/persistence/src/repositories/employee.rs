//! Employee repository for database operations.

use std::collections::HashSet;

use domain::models::UpsertEmployeeRequest;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::EmployeeEntity;
use crate::metrics::QueryTimer;

const EMPLOYEE_COLUMNS: &str =
    "id, employee_id, employee_name, email, role, department, created_at, updated_at";

/// Repository for employee reference records.
#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<EmployeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_employees");
        let sql = format!(
            "SELECT {} FROM employees ORDER BY employee_id",
            EMPLOYEE_COLUMNS
        );
        let result = sqlx::query_as::<_, EmployeeEntity>(&sql)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EmployeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_employee_by_id");
        let sql = format!("SELECT {} FROM employees WHERE id = $1", EMPLOYEE_COLUMNS);
        let result = sqlx::query_as::<_, EmployeeEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Every employee_id currently stored.
    pub async fn existing_ids(&self) -> Result<HashSet<String>, sqlx::Error> {
        let timer = QueryTimer::new("list_employee_ids");
        let result = sqlx::query_scalar::<_, String>("SELECT employee_id FROM employees")
            .fetch_all(&self.pool)
            .await;
        timer.record();
        Ok(result?.into_iter().collect())
    }

    pub async fn create(&self, req: &UpsertEmployeeRequest) -> Result<EmployeeEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_employee");
        let sql = format!(
            r#"
            INSERT INTO employees (employee_id, employee_name, email, role, department)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            EMPLOYEE_COLUMNS
        );
        let result = sqlx::query_as::<_, EmployeeEntity>(&sql)
            .bind(&req.employee_id)
            .bind(&req.employee_name)
            .bind(&req.email)
            .bind(&req.role)
            .bind(&req.department)
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Insert several employees in one transaction.
    pub async fn create_many(&self, reqs: &[UpsertEmployeeRequest]) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("create_employees_bulk");
        let mut tx = self.pool.begin().await?;
        for req in reqs {
            sqlx::query(
                r#"
                INSERT INTO employees (employee_id, employee_name, email, role, department)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(&req.employee_id)
            .bind(&req.employee_name)
            .bind(&req.email)
            .bind(&req.role)
            .bind(&req.department)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        timer.record();
        Ok(reqs.len() as u64)
    }

    pub async fn update(
        &self,
        id: Uuid,
        req: &UpsertEmployeeRequest,
    ) -> Result<Option<EmployeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_employee");
        let sql = format!(
            r#"
            UPDATE employees
            SET employee_id = $2, employee_name = $3, email = $4, role = $5, department = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            EMPLOYEE_COLUMNS
        );
        let result = sqlx::query_as::<_, EmployeeEntity>(&sql)
            .bind(id)
            .bind(&req.employee_id)
            .bind(&req.employee_name)
            .bind(&req.email)
            .bind(&req.role)
            .bind(&req.department)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_employee");
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}
