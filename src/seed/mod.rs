use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use crate::db;
use crate::error::AppResult;
use crate::models::CreateProduct;

/// (nombre, categoria, deporte, color, marca, precio in cents, stock, descripcion, disponible)
type CatalogEntry = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    i64,
    i32,
    &'static str,
    bool,
);

static CATALOG: &[CatalogEntry] = &[
    ("Zapatillas Trail Falcon", "zapatillas", "montana", "negro", "AeroTrail", 129_99, 25,
     "Suela con agarre agresivo para terrenos humedos.", true),
    ("Zapatillas Running Vector", "zapatillas", "running", "gris", "Sport4Data", 119_90, 40,
     "Espuma reactiva y upper transpirable para asfalto.", true),
    ("Zapatillas Running AeroLite", "zapatillas", "running", "azul", "AeroTrail", 139_00, 28,
     "Modelo mixto para entrenos rapidos y competicion.", true),
    ("Camiseta Respirant Pro", "ropa", "running", "azul", "Sport4Data", 29_90, 80,
     "Tejido ligero y costuras planas.", true),
    ("Balon Pro Indoor", "accesorios", "baloncesto", "naranja", "JumpMaster", 45_50, 40,
     "Balon de alto agarre para pistas cubiertas.", true),
    ("Casco MTB Shield", "accesorios", "ciclismo", "rojo", "NorthPeak", 79_95, 33,
     "Casco con proteccion ampliada y visera desmontable.", true),
    ("Chaqueta Running Storm", "ropa", "running", "verde", "StormBeat", 99_00, 15,
     "Chaqueta impermeable plegable.", false),
    ("Botas Futbol Elite FG", "zapatillas", "futbol", "blanco", "GoalZone", 149_99, 22,
     "Placa rigida para campos secos.", true),
    ("Rodillera Reforce", "accesorios", "crossfit", "negro", "CorePlus", 34_90, 60,
     "Soporte firme para entrenamientos de fuerza.", true),
    ("Cinturon Hidratacion RunFlow", "accesorios", "running", "negro", "CorePlus", 32_50, 65,
     "Incluye bidones suaves y bolsillo impermeable.", true),
    ("Gorra Running Ultralight", "accesorios", "running", "blanco", "Sport4Data", 19_90, 85,
     "Tejido microperforado con proteccion UV.", true),
    ("Mallas Termicas BaseLayer", "ropa", "montana", "gris", "HighAltitude", 59_90, 35,
     "Compresion ligera y calor constante.", true),
    ("Guantes Grip Bike", "accesorios", "ciclismo", "negro", "NorthPeak", 25_00, 50,
     "Palma reforzada con gel.", true),
    ("Raqueta Tenis AeroSpin", "accesorios", "tenis", "azul", "AeroTrail", 179_99, 12,
     "Marco de carbono con patron 16x19.", true),
    ("Pantalon Corto DryFlex", "ropa", "running", "negro", "Sport4Data", 39_95, 70,
     "Bolsillos laterales con cremallera y tejido de secado rapido.", true),
    ("Mochila Trail 12L", "accesorios", "montana", "naranja", "HighAltitude", 89_50, 18,
     "Incluye bolsa de hidratacion y ajuste pectoral.", true),
    ("Gafas Natacion Wave", "accesorios", "natacion", "transparente", "OceanX", 27_99, 55,
     "Lentes antivaho y proteccion UV.", false),
    ("Short Basket AirFlow", "ropa", "baloncesto", "blanco", "JumpMaster", 44_90, 30,
     "Paneles perforados para ventilacion maxima.", true),
    ("Cuerda Saltos Speed", "accesorios", "crossfit", "verde", "CorePlus", 21_50, 75,
     "Cable ajustable con rodamientos metalicos.", true),
    ("Chaqueta Ciclista Reflect", "ropa", "ciclismo", "amarillo", "NorthPeak", 120_00, 14,
     "Paneles reflectantes 360 y proteccion contra viento.", true),
];

/// Builds the sample catalog. Images live under `products/<nombre>.jpg` in the static dir.
pub fn sample_products() -> Vec<CreateProduct> {
    CATALOG
        .iter()
        .map(
            |&(nombre, categoria, deporte, color, marca, cents, stock, descripcion, disponible)| {
                CreateProduct {
                    nombre: nombre.to_string(),
                    categoria: Some(categoria.to_string()),
                    deporte: Some(deporte.to_string()),
                    color: Some(color.to_string()),
                    marca: Some(marca.to_string()),
                    precio: Decimal::new(cents, 2),
                    stock,
                    descripcion: Some(descripcion.to_string()),
                    imagen_url: Some(format!("products/{}.jpg", nombre)),
                    disponible,
                }
            },
        )
        .collect()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub inserted: usize,
    pub updated: usize,
}

/// Upserts the sample catalog in one transaction, keyed on (nombre, marca).
pub async fn seed_products(pool: &PgPool) -> AppResult<SeedSummary> {
    let products = sample_products();
    info!("Seeding {} sample products...", products.len());

    let mut tx = pool.begin().await?;
    let mut summary = SeedSummary::default();

    for payload in &products {
        // Dropping `tx` on an early return rolls the whole batch back
        let (product, inserted) = db::upsert_by_name_and_brand(&mut tx, payload).await?;
        if inserted {
            summary.inserted += 1;
        } else {
            summary.updated += 1;
        }
        info!(id = product.id, nombre = %product.nombre, inserted, "Seeded product");
    }

    tx.commit().await?;

    info!(
        inserted = summary.inserted,
        updated = summary.updated,
        "Seeding complete"
    );
    Ok(summary)
}
