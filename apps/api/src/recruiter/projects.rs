use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::project::ProjectRow;

const MAX_TITLE_CHARS: usize = 200;

pub async fn list_projects(pool: &PgPool, recruiter_id: Uuid) -> Result<Vec<ProjectRow>, AppError> {
    let rows = sqlx::query_as::<_, ProjectRow>(
        "SELECT * FROM projects WHERE recruiter_id = $1 ORDER BY created_at DESC",
    )
    .bind(recruiter_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// A project owned by another recruiter reads as not found.
pub async fn get_owned_project(
    pool: &PgPool,
    project_id: Uuid,
    recruiter_id: Uuid,
) -> Result<ProjectRow, AppError> {
    sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects WHERE id = $1 AND recruiter_id = $2")
        .bind(project_id)
        .bind(recruiter_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {project_id} not found")))
}

pub async fn create_project(
    pool: &PgPool,
    recruiter_id: Uuid,
    title: &str,
    description: &str,
) -> Result<ProjectRow, AppError> {
    let row = sqlx::query_as::<_, ProjectRow>(
        r#"
        INSERT INTO projects (id, recruiter_id, title, description)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(recruiter_id)
    .bind(title)
    .bind(description)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Applies the provided fields; `None` keeps the stored value.
pub async fn update_project(
    pool: &PgPool,
    project_id: Uuid,
    recruiter_id: Uuid,
    title: Option<&str>,
    description: Option<&str>,
) -> Result<ProjectRow, AppError> {
    sqlx::query_as::<_, ProjectRow>(
        r#"
        UPDATE projects
        SET title = COALESCE($3, title),
            description = COALESCE($4, description),
            updated_at = now()
        WHERE id = $1 AND recruiter_id = $2
        RETURNING *
        "#,
    )
    .bind(project_id)
    .bind(recruiter_id)
    .bind(title)
    .bind(description)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Project {project_id} not found")))
}

/// Deletes the row; candidate resume rows cascade.
pub async fn delete_project_row(
    pool: &PgPool,
    project_id: Uuid,
    recruiter_id: Uuid,
) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND recruiter_id = $2")
        .bind(project_id)
        .bind(recruiter_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Project {project_id} not found")));
    }
    Ok(())
}

/// Trims and checks a project title.
pub fn validate_title(title: &str) -> Result<String, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Project title cannot be empty".to_string()));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::Validation(format!(
            "Project title cannot exceed {MAX_TITLE_CHARS} characters"
        )));
    }
    Ok(title.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_trimmed() {
        assert_eq!(validate_title("  Backend Hiring  ").unwrap(), "Backend Hiring");
    }

    #[test]
    fn test_blank_title_is_rejected() {
        assert!(matches!(validate_title(" \t"), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_overlong_title_is_rejected() {
        assert!(validate_title(&"x".repeat(MAX_TITLE_CHARS + 1)).is_err());
        assert!(validate_title(&"x".repeat(MAX_TITLE_CHARS)).is_ok());
    }
}
