use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};

use crate::error::{AppError, AppResult};
use crate::models::*;

fn not_found() -> AppError {
    AppError::NotFound("Producto no encontrado".to_string())
}

/// Wraps a search term for ILIKE, escaping `%`, `_` and `\` so they match literally.
pub fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

// ── Reads ─────────────────────────────────────────────────────────────────────

pub async fn fetch_products(pool: &PgPool, filters: &ProductFilters) -> AppResult<Vec<Product>> {
    let search = non_empty(&filters.search).map(like_pattern);

    let products = sqlx::query_as::<_, Product>(
        r#"
        SELECT id, nombre, categoria, deporte, color, marca, precio, stock,
               descripcion, imagen_url, disponible
        FROM producto
        WHERE ($1::text IS NULL OR categoria = $1)
          AND ($2::text IS NULL OR deporte = $2)
          AND ($3::text IS NULL OR marca = $3)
          AND ($4::numeric IS NULL OR precio >= $4)
          AND ($5::numeric IS NULL OR precio <= $5)
          AND ($6::boolean IS NULL OR disponible = $6)
          AND ($7::text IS NULL OR nombre ILIKE $7 OR descripcion ILIKE $7)
        ORDER BY id
        LIMIT $8 OFFSET $9
        "#,
    )
    .bind(non_empty(&filters.categoria))
    .bind(non_empty(&filters.deporte))
    .bind(non_empty(&filters.marca))
    .bind(filters.precio_min)
    .bind(filters.precio_max)
    .bind(filters.disponible)
    .bind(search)
    .bind(filters.limit())
    .bind(filters.skip())
    .fetch_all(pool)
    .await?;

    Ok(products)
}

pub async fn fetch_product_by_id(pool: &PgPool, id: i32) -> AppResult<Product> {
    sqlx::query_as::<_, Product>(
        "SELECT id, nombre, categoria, deporte, color, marca, precio, stock,
                descripcion, imagen_url, disponible
         FROM producto WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(not_found)
}

// ── Writes ────────────────────────────────────────────────────────────────────

pub async fn insert_product<'e, E>(executor: E, payload: &CreateProduct) -> AppResult<Product>
where
    E: PgExecutor<'e>,
{
    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO producto
            (nombre, categoria, deporte, color, marca, precio, stock, descripcion, imagen_url, disponible)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id, nombre, categoria, deporte, color, marca, precio, stock,
                  descripcion, imagen_url, disponible
        "#,
    )
    .bind(&payload.nombre)
    .bind(&payload.categoria)
    .bind(&payload.deporte)
    .bind(&payload.color)
    .bind(&payload.marca)
    .bind(payload.precio)
    .bind(payload.stock)
    .bind(&payload.descripcion)
    .bind(&payload.imagen_url)
    .bind(payload.disponible)
    .fetch_one(executor)
    .await?;

    Ok(product)
}

/// Applies only the fields present in `payload` in a single UPDATE.
pub async fn update_product(pool: &PgPool, id: i32, payload: &UpdateProduct) -> AppResult<Product> {
    if payload.is_empty() {
        return fetch_product_by_id(pool, id).await;
    }

    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE producto SET ");
    let mut set = qb.separated(", ");

    if let Some(v) = &payload.nombre {
        set.push("nombre = ").push_bind_unseparated(v.clone());
    }
    if let Some(v) = &payload.categoria {
        set.push("categoria = ").push_bind_unseparated(v.clone());
    }
    if let Some(v) = &payload.deporte {
        set.push("deporte = ").push_bind_unseparated(v.clone());
    }
    if let Some(v) = &payload.color {
        set.push("color = ").push_bind_unseparated(v.clone());
    }
    if let Some(v) = &payload.marca {
        set.push("marca = ").push_bind_unseparated(v.clone());
    }
    if let Some(v) = payload.precio {
        set.push("precio = ").push_bind_unseparated(v);
    }
    if let Some(v) = payload.stock {
        set.push("stock = ").push_bind_unseparated(v);
    }
    if let Some(v) = &payload.descripcion {
        set.push("descripcion = ").push_bind_unseparated(v.clone());
    }
    if let Some(v) = &payload.imagen_url {
        set.push("imagen_url = ").push_bind_unseparated(v.clone());
    }
    if let Some(v) = payload.disponible {
        set.push("disponible = ").push_bind_unseparated(v);
    }

    qb.push(" WHERE id = ")
        .push_bind(id)
        .push(
            " RETURNING id, nombre, categoria, deporte, color, marca, precio, stock, \
             descripcion, imagen_url, disponible",
        );

    qb.build_query_as::<Product>()
        .fetch_optional(pool)
        .await?
        .ok_or_else(not_found)
}

/// Marks the product unavailable. The row itself is kept.
pub async fn soft_delete_product(pool: &PgPool, id: i32) -> AppResult<Product> {
    sqlx::query_as::<_, Product>(
        r#"
        UPDATE producto
        SET disponible = FALSE
        WHERE id = $1
        RETURNING id, nombre, categoria, deporte, color, marca, precio, stock,
                  descripcion, imagen_url, disponible
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(not_found)
}

pub async fn update_stock(pool: &PgPool, id: i32, stock: i32) -> AppResult<Product> {
    sqlx::query_as::<_, Product>(
        r#"
        UPDATE producto
        SET stock = $1
        WHERE id = $2
        RETURNING id, nombre, categoria, deporte, color, marca, precio, stock,
                  descripcion, imagen_url, disponible
        "#,
    )
    .bind(stock)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(not_found)
}

// ── Seeding ───────────────────────────────────────────────────────────────────

/// Overwrites the rows matching (`nombre`, `marca`) or inserts a new one.
/// Returns the product and whether it was newly inserted.
pub async fn upsert_by_name_and_brand(
    conn: &mut sqlx::PgConnection,
    payload: &CreateProduct,
) -> AppResult<(Product, bool)> {
    let existing = sqlx::query_as::<_, Product>(
        r#"
        UPDATE producto
        SET categoria   = $3,
            deporte     = $4,
            color       = $5,
            precio      = $6,
            stock       = $7,
            descripcion = $8,
            imagen_url  = $9,
            disponible  = $10
        WHERE nombre = $1 AND marca IS NOT DISTINCT FROM $2
        RETURNING id, nombre, categoria, deporte, color, marca, precio, stock,
                  descripcion, imagen_url, disponible
        "#,
    )
    .bind(&payload.nombre)
    .bind(&payload.marca)
    .bind(&payload.categoria)
    .bind(&payload.deporte)
    .bind(&payload.color)
    .bind(payload.precio)
    .bind(payload.stock)
    .bind(&payload.descripcion)
    .bind(&payload.imagen_url)
    .bind(payload.disponible)
    .fetch_optional(&mut *conn)
    .await?;

    match existing {
        Some(product) => Ok((product, false)),
        None => Ok((insert_product(&mut *conn, payload).await?, true)),
    }
}

pub async fn count_products(pool: &PgPool) -> AppResult<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM producto")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_wraps_term() {
        assert_eq!(like_pattern("trail"), "%trail%");
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn not_found_message() {
        assert_eq!(not_found().to_string(), "Producto no encontrado");
    }
}
