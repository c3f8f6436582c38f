use fxhash::FxHashMap;
use serde::Deserialize;
use std::sync::Arc;
use storefront_domain::catalog::{
    Product, ProductAttributeCombination, ProductAttributeMapping, ProductAttributeValue,
};

/// Read access to the product attribute store.
///
/// List lookups return rows in display order.
pub trait ProductAttributeService {
    fn mapping_by_id(&self, id: i32) -> Option<ProductAttributeMapping>;

    fn value_by_id(&self, id: i32) -> Option<ProductAttributeValue>;

    fn mappings_by_product_id(&self, product_id: i32) -> Vec<ProductAttributeMapping>;

    fn values_by_mapping_id(&self, mapping_id: i32) -> Vec<ProductAttributeValue>;

    fn combinations_by_product_id(&self, product_id: i32) -> Vec<ProductAttributeCombination>;
}

impl<S: ProductAttributeService + ?Sized> ProductAttributeService for Arc<S> {
    fn mapping_by_id(&self, id: i32) -> Option<ProductAttributeMapping> {
        (**self).mapping_by_id(id)
    }

    fn value_by_id(&self, id: i32) -> Option<ProductAttributeValue> {
        (**self).value_by_id(id)
    }

    fn mappings_by_product_id(&self, product_id: i32) -> Vec<ProductAttributeMapping> {
        (**self).mappings_by_product_id(product_id)
    }

    fn values_by_mapping_id(&self, mapping_id: i32) -> Vec<ProductAttributeValue> {
        (**self).values_by_mapping_id(mapping_id)
    }

    fn combinations_by_product_id(&self, product_id: i32) -> Vec<ProductAttributeCombination> {
        (**self).combinations_by_product_id(product_id)
    }
}

/// Serialized catalog content, e.g. a TOML fixture with `[[mappings]]` tables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
    pub mappings: Vec<ProductAttributeMapping>,
    pub values: Vec<ProductAttributeValue>,
    pub combinations: Vec<ProductAttributeCombination>,
}

/// Immutable in-memory attribute store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAttributeService {
    products: FxHashMap<i32, Product>,
    mappings: FxHashMap<i32, ProductAttributeMapping>,
    values: FxHashMap<i32, ProductAttributeValue>,
    mappings_by_product: FxHashMap<i32, Vec<i32>>,
    values_by_mapping: FxHashMap<i32, Vec<i32>>,
    combinations_by_product: FxHashMap<i32, Vec<ProductAttributeCombination>>,
}

impl InMemoryAttributeService {
    #[must_use]
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        let mut service = Self::default();

        let mut mappings = snapshot.mappings;
        mappings.sort_by_key(|m| (m.display_order, m.id));
        for mapping in mappings {
            service.mappings_by_product.entry(mapping.product_id).or_default().push(mapping.id);
            service.mappings.insert(mapping.id, mapping);
        }

        let mut values = snapshot.values;
        values.sort_by_key(|v| (v.display_order, v.id));
        for value in values {
            service.values_by_mapping.entry(value.mapping_id).or_default().push(value.id);
            service.values.insert(value.id, value);
        }

        for combination in snapshot.combinations {
            service.combinations_by_product.entry(combination.product_id).or_default().push(combination);
        }
        service.products = snapshot.products.into_iter().map(|p| (p.id, p)).collect();

        service
    }

    #[must_use]
    pub fn product(&self, id: i32) -> Option<&Product> {
        self.products.get(&id)
    }
}

impl From<CatalogSnapshot> for InMemoryAttributeService {
    fn from(snapshot: CatalogSnapshot) -> Self {
        Self::new(snapshot)
    }
}

impl ProductAttributeService for InMemoryAttributeService {
    fn mapping_by_id(&self, id: i32) -> Option<ProductAttributeMapping> {
        self.mappings.get(&id).cloned()
    }

    fn value_by_id(&self, id: i32) -> Option<ProductAttributeValue> {
        self.values.get(&id).cloned()
    }

    fn mappings_by_product_id(&self, product_id: i32) -> Vec<ProductAttributeMapping> {
        self.mappings_by_product
            .get(&product_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.mappings.get(id).cloned())
            .collect()
    }

    fn values_by_mapping_id(&self, mapping_id: i32) -> Vec<ProductAttributeValue> {
        self.values_by_mapping
            .get(&mapping_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.values.get(id).cloned())
            .collect()
    }

    fn combinations_by_product_id(&self, product_id: i32) -> Vec<ProductAttributeCombination> {
        self.combinations_by_product.get(&product_id).cloned().unwrap_or_default()
    }
}
