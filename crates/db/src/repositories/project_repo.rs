//! Repository for the `projects` table.

use ready4u_core::project::{ProjectCounter, PROJECT_STATUS_ACTIVE};
use ready4u_core::types::{DbId, Rupees};
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, ProjectFilter, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, category, subcategory, price, discounted_price, \
    short_description, description, synopsis, tech_stack, features, tags, difficulty, \
    how_to_run, youtube_link, trailer_link, repo_link, download_link, \
    learning_resources_link, viva_questions_link, status, views, requests, sales, revenue, \
    created_at, updated_at";

/// Provides CRUD operations and counter updates for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    ///
    /// If `status` is `None` in the input, defaults to `active`.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (
                name, category, subcategory, price, discounted_price,
                short_description, description, synopsis, tech_stack, features, tags,
                difficulty, how_to_run, youtube_link, trailer_link, repo_link, download_link,
                learning_resources_link, viva_questions_link, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                     $17, $18, $19, COALESCE($20, '{PROJECT_STATUS_ACTIVE}'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.category)
            .bind(&input.subcategory)
            .bind(input.price)
            .bind(input.discounted_price)
            .bind(&input.short_description)
            .bind(&input.description)
            .bind(&input.synopsis)
            .bind(&input.tech_stack)
            .bind(&input.features)
            .bind(&input.tags)
            .bind(&input.difficulty)
            .bind(&input.how_to_run)
            .bind(&input.youtube_link)
            .bind(&input.trailer_link)
            .bind(&input.repo_link)
            .bind(&input.download_link)
            .bind(&input.learning_resources_link)
            .bind(&input.viva_questions_link)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List projects newest first. Inactive listings are skipped unless
    /// `include_inactive` is set.
    pub async fn list(pool: &PgPool, filter: &ProjectFilter) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE ($1::TEXT IS NULL OR category = $1)
               AND ($2 OR status = '{PROJECT_STATUS_ACTIVE}')
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&filter.category)
            .bind(filter.include_inactive)
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied;
    /// `Some(None)` on a nullable column clears it.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                subcategory = CASE WHEN $4 THEN $5 ELSE subcategory END,
                price = COALESCE($6, price),
                discounted_price = CASE WHEN $7 THEN $8 ELSE discounted_price END,
                short_description = COALESCE($9, short_description),
                description = COALESCE($10, description),
                synopsis = COALESCE($11, synopsis),
                tech_stack = COALESCE($12, tech_stack),
                features = COALESCE($13, features),
                tags = COALESCE($14, tags),
                difficulty = CASE WHEN $15 THEN $16 ELSE difficulty END,
                how_to_run = CASE WHEN $17 THEN $18 ELSE how_to_run END,
                youtube_link = CASE WHEN $19 THEN $20 ELSE youtube_link END,
                trailer_link = CASE WHEN $21 THEN $22 ELSE trailer_link END,
                repo_link = CASE WHEN $23 THEN $24 ELSE repo_link END,
                download_link = CASE WHEN $25 THEN $26 ELSE download_link END,
                learning_resources_link = CASE WHEN $27 THEN $28 ELSE learning_resources_link END,
                viva_questions_link = CASE WHEN $29 THEN $30 ELSE viva_questions_link END,
                status = COALESCE($31, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        fn text(field: &Option<Option<String>>) -> Option<&str> {
            field.as_ref().and_then(|v| v.as_deref())
        }

        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.category)
            .bind(input.subcategory.is_some())
            .bind(text(&input.subcategory))
            .bind(input.price)
            .bind(input.discounted_price.is_some())
            .bind(input.discounted_price.flatten())
            .bind(&input.short_description)
            .bind(&input.description)
            .bind(&input.synopsis)
            .bind(&input.tech_stack)
            .bind(&input.features)
            .bind(&input.tags)
            .bind(input.difficulty.is_some())
            .bind(text(&input.difficulty))
            .bind(input.how_to_run.is_some())
            .bind(text(&input.how_to_run))
            .bind(input.youtube_link.is_some())
            .bind(text(&input.youtube_link))
            .bind(input.trailer_link.is_some())
            .bind(text(&input.trailer_link))
            .bind(input.repo_link.is_some())
            .bind(text(&input.repo_link))
            .bind(input.download_link.is_some())
            .bind(text(&input.download_link))
            .bind(input.learning_resources_link.is_some())
            .bind(text(&input.learning_resources_link))
            .bind(input.viva_questions_link.is_some())
            .bind(text(&input.viva_questions_link))
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a project by ID. Returns `true` if a row was removed.
    ///
    /// Requests keep their `project_id` and denormalised `project_name`.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically add `delta` to one counter. Returns `false` if the project
    /// does not exist.
    pub async fn increment_counter<'e, E>(
        executor: E,
        id: DbId,
        counter: ProjectCounter,
        delta: i64,
    ) -> Result<bool, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let column = counter.column();
        let query = format!("UPDATE projects SET {column} = {column} + $2 WHERE id = $1");
        let result = sqlx::query(&query)
            .bind(id)
            .bind(delta)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count one verified sale worth `amount`.
    pub async fn record_sale<'e, E>(executor: E, id: DbId, amount: Rupees) -> Result<bool, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE projects SET sales = sales + 1, revenue = revenue + $2 WHERE id = $1",
        )
        .bind(id)
        .bind(amount)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(pool)
            .await
    }
}
