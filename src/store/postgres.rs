use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::{TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{NewTask, NewUser, Task, TaskFilter, TaskPatch, User};

const TASK_COLUMNS: &str =
    "id, user_id, title, description, due_date, priority, status, created_at, updated_at";

/// Postgres-backed store. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects and applies pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Migration failed: {}", e)))?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        // A unique index on email turns a racing duplicate into a Conflict.
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, email, password_hash, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(user.name)
        .bind(user.email)
        .bind(user.password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn create(&self, owner: Uuid, task: NewTask) -> Result<Task, AppError> {
        let task = Task::new(task, owner);
        let sql = format!(
            "INSERT INTO tasks ({TASK_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {TASK_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Task>(&sql)
            .bind(task.id)
            .bind(task.user_id)
            .bind(task.title)
            .bind(task.description)
            .bind(task.due_date)
            .bind(task.priority)
            .bind(task.status)
            .bind(task.created_at)
            .bind(task.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn list_by_owner(
        &self,
        owner: Uuid,
        filter: &TaskFilter,
    ) -> Result<Vec<Task>, AppError> {
        let sql = list_sql(filter);

        let mut query = sqlx::query_as::<_, Task>(&sql).bind(owner);
        if let Some(status) = filter.status {
            query = query.bind(status);
        }
        if let Some(priority) = filter.priority {
            query = query.bind(priority);
        }
        if let Some(search) = &filter.search {
            query = query.bind(format!("%{}%", escape_like(search)));
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn get_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Task>, AppError> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2");
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: TaskPatch,
    ) -> Result<Option<Task>, AppError> {
        let sql = format!(
            "UPDATE tasks
             SET title = COALESCE($1, title),
                 description = COALESCE($2, description),
                 due_date = COALESCE($3, due_date),
                 priority = COALESCE($4, priority),
                 status = COALESCE($5, status),
                 updated_at = NOW()
             WHERE id = $6 AND user_id = $7
             RETURNING {TASK_COLUMNS}"
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(patch.title)
            .bind(patch.description)
            .bind(patch.due_date)
            .bind(patch.priority)
            .bind(patch.status)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Builds the listing query. Placeholders are numbered in the order
/// owner, status, priority, search; absent filters are skipped.
fn list_sql(filter: &TaskFilter) -> String {
    let mut sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1");
    let mut param_count = 2;

    if filter.status.is_some() {
        sql.push_str(&format!(" AND status = ${}", param_count));
        param_count += 1;
    }
    if filter.priority.is_some() {
        sql.push_str(&format!(" AND priority = ${}", param_count));
        param_count += 1;
    }
    if filter.search.is_some() {
        sql.push_str(&format!(" AND title ILIKE ${} ESCAPE '\\'", param_count));
    }

    sql.push_str(" ORDER BY created_at DESC");
    sql
}

fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
