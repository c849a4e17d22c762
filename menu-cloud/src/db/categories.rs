use shared::models::{Category, CategoryFields};
use sqlx::PgPool;

pub async fn list(pool: &PgPool, scope: Option<i64>) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM categories
         WHERE ($1::BIGINT IS NULL OR restaurant_id = $1)
         ORDER BY restaurant_id, id",
    )
    .bind(scope)
    .fetch_all(pool)
    .await
}

/// Whether the category exists and belongs to `restaurant_id`
pub async fn belongs_to(
    pool: &PgPool,
    category_id: i64,
    restaurant_id: i64,
) -> Result<bool, sqlx::Error> {
    let (found,): (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1 AND restaurant_id = $2)",
    )
    .bind(category_id)
    .bind(restaurant_id)
    .fetch_one(pool)
    .await?;
    Ok(found)
}

pub async fn create(
    pool: &PgPool,
    restaurant_id: i64,
    fields: &CategoryFields,
    now: i64,
) -> Result<Category, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO categories
             (restaurant_id, name_ar, name_en, description_ar, description_en, image,
              created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
         RETURNING *",
    )
    .bind(restaurant_id)
    .bind(&fields.name_ar)
    .bind(&fields.name_en)
    .bind(&fields.description_ar)
    .bind(&fields.description_en)
    .bind(&fields.image)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// `None` when the row does not exist inside `scope`
pub async fn update(
    pool: &PgPool,
    id: i64,
    scope: Option<i64>,
    fields: &CategoryFields,
    now: i64,
) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE categories
         SET name_ar = $3, name_en = $4, description_ar = $5, description_en = $6,
             image = COALESCE($7, image), updated_at = $8
         WHERE id = $1 AND ($2::BIGINT IS NULL OR restaurant_id = $2)
         RETURNING *",
    )
    .bind(id)
    .bind(scope)
    .bind(&fields.name_ar)
    .bind(&fields.name_en)
    .bind(&fields.description_ar)
    .bind(&fields.description_en)
    .bind(&fields.image)
    .bind(now)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64, scope: Option<i64>) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query(
        "DELETE FROM categories WHERE id = $1 AND ($2::BIGINT IS NULL OR restaurant_id = $2)",
    )
    .bind(id)
    .bind(scope)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(rows > 0)
}
