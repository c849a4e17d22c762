use shared::models::{Item, ItemFields};
use sqlx::PgPool;

/// Items inside `scope`, optionally narrowed to one category
pub async fn list(
    pool: &PgPool,
    scope: Option<i64>,
    category_id: Option<i64>,
) -> Result<Vec<Item>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM items
         WHERE ($1::BIGINT IS NULL OR restaurant_id = $1)
           AND ($2::BIGINT IS NULL OR category_id = $2)
         ORDER BY restaurant_id, id",
    )
    .bind(scope)
    .bind(category_id)
    .fetch_all(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    restaurant_id: i64,
    fields: &ItemFields,
    now: i64,
) -> Result<Item, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO items
             (restaurant_id, category_id, name_ar, name_en, description_ar, description_en,
              price, image, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
         RETURNING *",
    )
    .bind(restaurant_id)
    .bind(fields.category_id)
    .bind(&fields.name_ar)
    .bind(&fields.name_en)
    .bind(&fields.description_ar)
    .bind(&fields.description_en)
    .bind(fields.price_or_zero())
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
    fields: &ItemFields,
    now: i64,
) -> Result<Option<Item>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE items
         SET category_id = $3, name_ar = $4, name_en = $5,
             description_ar = $6, description_en = $7, price = $8,
             image = COALESCE($9, image), updated_at = $10
         WHERE id = $1 AND ($2::BIGINT IS NULL OR restaurant_id = $2)
         RETURNING *",
    )
    .bind(id)
    .bind(scope)
    .bind(fields.category_id)
    .bind(&fields.name_ar)
    .bind(&fields.name_en)
    .bind(&fields.description_ar)
    .bind(&fields.description_en)
    .bind(fields.price_or_zero())
    .bind(&fields.image)
    .bind(now)
    .fetch_optional(pool)
    .await
}

/// Restaurant owning an item inside `scope`
pub async fn owner_of(
    pool: &PgPool,
    id: i64,
    scope: Option<i64>,
) -> Result<Option<i64>, sqlx::Error> {
    let row: Option<(i64,)> = sqlx::query_as(
        "SELECT restaurant_id FROM items
         WHERE id = $1 AND ($2::BIGINT IS NULL OR restaurant_id = $2)",
    )
    .bind(id)
    .bind(scope)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|(restaurant_id,)| restaurant_id))
}

pub async fn delete(pool: &PgPool, id: i64, scope: Option<i64>) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query(
        "DELETE FROM items WHERE id = $1 AND ($2::BIGINT IS NULL OR restaurant_id = $2)",
    )
    .bind(id)
    .bind(scope)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(rows > 0)
}
