use super::{load_snapshot, read_document};
use anyhow::{Context, Result, anyhow};
use std::path::Path;
use storefront::StorefrontSettings;
use storefront::catalog::{CatalogSnapshot, InMemoryAttributeService};
use tracing::info;

/// Prints every attribute document of `product_id`, or the stored combination equal to
/// `find` when given.
///
/// # Errors
/// Returns an error when the catalog cannot be loaded, the product is unknown, no stored
/// combination matches or enumeration exceeds the combination limit.
pub fn handle(
    settings: &StorefrontSettings,
    catalog: &Path,
    product_id: i32,
    limit: Option<usize>,
    find: Option<String>,
) -> Result<()> {
    let snapshot: CatalogSnapshot = load_snapshot(catalog)?;
    let mut settings = settings.clone();
    if limit.is_some() {
        settings.catalog.max_combinations = limit;
    }

    let parser = storefront::attribute_parser(InMemoryAttributeService::from(snapshot), &settings);
    let product = parser
        .service()
        .product(product_id)
        .cloned()
        .ok_or_else(|| anyhow!("Product {product_id} is not in {}", catalog.display()))?;

    if let Some(xml) = find {
        let xml = read_document(&xml)?;
        let combination = parser
            .find_product_attribute_combination(&product, &xml)
            .ok_or_else(|| anyhow!("No stored combination of product {product_id} matches"))?;
        println!("{}\t{}", combination.id, combination.sku.unwrap_or_default());
        return Ok(());
    }

    let documents = parser.generate_all_combinations(&product).context("Failed to enumerate combinations")?;
    info!(product_id, count = documents.len(), "Combinations generated");
    for document in documents {
        println!("{document}");
    }
    Ok(())
}
