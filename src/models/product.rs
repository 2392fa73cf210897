use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::assets::resolve_image_url;
use crate::error::{AppError, AppResult};

/// Row of the `producto` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub nombre: String,
    pub categoria: Option<String>,
    pub deporte: Option<String>,
    pub color: Option<String>,
    pub marca: Option<String>,
    /// NUMERIC(10, 2)
    pub precio: Decimal,
    pub stock: i32,
    pub descripcion: Option<String>,
    pub imagen_url: Option<String>,
    /// Soft-delete flag. Rows are never removed, only marked unavailable.
    pub disponible: bool,
}

// ── Column limits ────────────────────────────────────────────────────────────

pub const NOMBRE_MAX_LEN: usize = 255;
pub const CATEGORIA_MAX_LEN: usize = 100;
pub const DEPORTE_MAX_LEN: usize = 100;
pub const COLOR_MAX_LEN: usize = 60;
pub const MARCA_MAX_LEN: usize = 120;

/// NUMERIC(10, 2) leaves 8 digits before the decimal point.
const PRECIO_MAX_INTEGER: i64 = 100_000_000;
const PRECIO_MAX_SCALE: u32 = 2;

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

// ── Field validators ─────────────────────────────────────────────────────────

pub fn validate_nombre(nombre: &str) -> AppResult<()> {
    if nombre.trim().is_empty() {
        return Err(AppError::Validation("nombre must not be empty".to_string()));
    }
    validate_len("nombre", nombre, NOMBRE_MAX_LEN)
}

pub fn validate_precio(precio: &Decimal) -> AppResult<()> {
    if precio.is_sign_negative() && !precio.is_zero() {
        return Err(AppError::Validation("precio must be >= 0".to_string()));
    }
    if precio.normalize().scale() > PRECIO_MAX_SCALE {
        return Err(AppError::Validation(
            "precio must have at most 2 decimal places".to_string(),
        ));
    }
    if precio.trunc() >= Decimal::from(PRECIO_MAX_INTEGER) {
        return Err(AppError::Validation(
            "precio must have at most 10 digits".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_stock(stock: i32) -> AppResult<()> {
    if stock < 0 {
        return Err(AppError::Validation("stock must be >= 0".to_string()));
    }
    Ok(())
}

fn validate_len(field: &str, value: &str, max: usize) -> AppResult<()> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

fn validate_optional_len(field: &str, value: Option<&str>, max: usize) -> AppResult<()> {
    match value {
        Some(v) => validate_len(field, v, max),
        None => Ok(()),
    }
}

// ── Request payloads ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub nombre: String,
    pub categoria: Option<String>,
    pub deporte: Option<String>,
    pub color: Option<String>,
    pub marca: Option<String>,
    pub precio: Decimal,
    pub stock: i32,
    pub descripcion: Option<String>,
    pub imagen_url: Option<String>,
    #[serde(default = "default_disponible")]
    pub disponible: bool,
}

fn default_disponible() -> bool {
    true
}

impl CreateProduct {
    pub fn validate(&self) -> AppResult<()> {
        validate_nombre(&self.nombre)?;
        validate_precio(&self.precio)?;
        validate_stock(self.stock)?;
        validate_optional_len("categoria", self.categoria.as_deref(), CATEGORIA_MAX_LEN)?;
        validate_optional_len("deporte", self.deporte.as_deref(), DEPORTE_MAX_LEN)?;
        validate_optional_len("color", self.color.as_deref(), COLOR_MAX_LEN)?;
        validate_optional_len("marca", self.marca.as_deref(), MARCA_MAX_LEN)?;
        Ok(())
    }
}

/// Partial update. Absent fields are left untouched.
///
/// Nullable columns are `Option<Option<T>>`: the outer `None` means "not sent",
/// `Some(None)` means "set to NULL". Non-null columns reject an explicit `null`
/// at deserialization time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProduct {
    #[serde(default, deserialize_with = "present")]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub categoria: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub deporte: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub color: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub marca: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub precio: Option<Decimal>,
    #[serde(default, deserialize_with = "present")]
    pub stock: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub descripcion: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub imagen_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub disponible: Option<bool>,
}

fn present<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(de).map(Some)
}

fn nullable<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

impl UpdateProduct {
    pub fn is_empty(&self) -> bool {
        self.nombre.is_none()
            && self.categoria.is_none()
            && self.deporte.is_none()
            && self.color.is_none()
            && self.marca.is_none()
            && self.precio.is_none()
            && self.stock.is_none()
            && self.descripcion.is_none()
            && self.imagen_url.is_none()
            && self.disponible.is_none()
    }

    pub fn validate(&self) -> AppResult<()> {
        if let Some(nombre) = &self.nombre {
            validate_nombre(nombre)?;
        }
        if let Some(precio) = &self.precio {
            validate_precio(precio)?;
        }
        if let Some(stock) = self.stock {
            validate_stock(stock)?;
        }
        validate_optional_len("categoria", flatten(&self.categoria), CATEGORIA_MAX_LEN)?;
        validate_optional_len("deporte", flatten(&self.deporte), DEPORTE_MAX_LEN)?;
        validate_optional_len("color", flatten(&self.color), COLOR_MAX_LEN)?;
        validate_optional_len("marca", flatten(&self.marca), MARCA_MAX_LEN)?;
        Ok(())
    }
}

fn flatten(field: &Option<Option<String>>) -> Option<&str> {
    field.as_ref().and_then(|v| v.as_deref())
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StockUpdate {
    pub stock: i32,
}

impl StockUpdate {
    pub fn validate(&self) -> AppResult<()> {
        validate_stock(self.stock)
    }
}

// ── Query parameters ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilters {
    pub categoria: Option<String>,
    pub deporte: Option<String>,
    pub marca: Option<String>,
    pub precio_min: Option<Decimal>,
    pub precio_max: Option<Decimal>,
    pub disponible: Option<bool>,
    /// Case-insensitive substring over nombre and descripcion
    pub search: Option<String>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl ProductFilters {
    pub fn skip(&self) -> i64 {
        self.skip.unwrap_or(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.skip() < 0 {
            return Err(AppError::Validation("skip must be >= 0".to_string()));
        }
        let limit = self.limit();
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {}",
                MAX_LIMIT
            )));
        }
        for (name, bound) in [("precio_min", &self.precio_min), ("precio_max", &self.precio_max)] {
            if matches!(bound, Some(v) if v.is_sign_negative() && !v.is_zero()) {
                return Err(AppError::Validation(format!("{} must be >= 0", name)));
            }
        }
        Ok(())
    }
}

/// Empty text filters behave as if they were not supplied.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

// ── Response body ────────────────────────────────────────────────────────────

/// Product as returned to clients, with `imagen_url` made absolute.
#[derive(Debug, Clone, Serialize)]
pub struct ProductOut {
    pub id: i32,
    pub nombre: String,
    pub categoria: Option<String>,
    pub deporte: Option<String>,
    pub color: Option<String>,
    pub marca: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub precio: Decimal,
    pub stock: i32,
    pub descripcion: Option<String>,
    pub imagen_url: Option<String>,
    pub disponible: bool,
}

impl ProductOut {
    pub fn from_product(product: Product, static_base_url: &str) -> Self {
        let imagen_url = resolve_image_url(product.imagen_url.as_deref(), static_base_url);
        Self {
            id: product.id,
            nombre: product.nombre,
            categoria: product.categoria,
            deporte: product.deporte,
            color: product.color,
            marca: product.marca,
            precio: product.precio,
            stock: product.stock,
            descripcion: product.descripcion,
            imagen_url,
            disponible: product.disponible,
        }
    }
}
