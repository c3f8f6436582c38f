use crate::codec::read_selection;
use crate::combinations::{CombinationGenerator, MappingValues};
use crate::error::{CatalogError, CatalogErrorExt};
use crate::gift_card;
use crate::service::ProductAttributeService;
use storefront_domain::catalog::{
    GiftCardInfo, Product, ProductAttributeCombination, ProductAttributeMapping, ProductAttributeValue,
};
use storefront_domain::settings::CatalogSettings;
use tracing::{debug, instrument};

/// Attribute codec operations resolved against a [`ProductAttributeService`].
#[derive(Debug, Clone)]
pub struct ProductAttributeParser<S> {
    service: S,
    settings: CatalogSettings,
}

impl<S: ProductAttributeService> ProductAttributeParser<S> {
    pub fn new(service: S) -> Self {
        Self::with_settings(service, CatalogSettings::default())
    }

    pub const fn with_settings(service: S, settings: CatalogSettings) -> Self {
        Self { service, settings }
    }

    pub const fn service(&self) -> &S {
        &self.service
    }

    /// Mappings referenced by the document, document order. Unknown ids are dropped.
    pub fn parse_product_attribute_mappings(&self, xml: &str) -> Vec<ProductAttributeMapping> {
        read_selection(xml)
            .mapping_ids()
            .into_iter()
            .filter_map(|id| self.service.mapping_by_id(id))
            .collect()
    }

    /// Values selected for value-backed mappings. Blank, non-numeric and unknown ids are
    /// dropped.
    pub fn parse_product_attribute_values(&self, xml: &str) -> Vec<ProductAttributeValue> {
        let selection = read_selection(xml);
        selection
            .mapping_ids()
            .into_iter()
            .filter_map(|id| self.service.mapping_by_id(id))
            .filter(ProductAttributeMapping::should_have_values)
            .flat_map(|mapping| selection.values(mapping.id))
            .filter_map(|raw| raw.parse::<i32>().ok())
            .filter_map(|id| self.service.value_by_id(id))
            .collect()
    }

    /// Equality over the mappings the service knows; the id count check still sees every id.
    pub fn are_product_attributes_equal(&self, a: &str, b: &str) -> bool {
        read_selection(a).matches_by(&read_selection(b), |id| self.service.mapping_by_id(id).is_some())
    }

    /// First stored combination of `product` equal to `xml`.
    #[instrument(skip(self, xml), fields(product_id = product.id))]
    pub fn find_product_attribute_combination(
        &self,
        product: &Product,
        xml: &str,
    ) -> Option<ProductAttributeCombination> {
        let found = self
            .service
            .combinations_by_product_id(product.id)
            .into_iter()
            .find(|combination| self.are_product_attributes_equal(&combination.attributes_xml, xml));
        debug!(combination_id = found.as_ref().map(|c| c.id), "Combination lookup finished");
        found
    }

    /// Lazy enumeration of every attributes document of `product`.
    ///
    /// # Errors
    /// Returns [`CatalogError::InvalidArgument`] when the product has too many mappings or
    /// checkbox values to enumerate.
    pub fn combinations(&self, product: &Product) -> Result<CombinationGenerator, CatalogError> {
        let mappings = self
            .service
            .mappings_by_product_id(product.id)
            .into_iter()
            .map(|mapping| {
                let values = self.service.values_by_mapping_id(mapping.id);
                MappingValues::new(mapping, values)
            })
            .collect();

        Ok(CombinationGenerator::new(mappings)?.with_limit(self.settings.max_combinations))
    }

    /// Every attributes document of `product`, bounded by `max_combinations`.
    ///
    /// # Errors
    /// * [`CatalogError::InvalidArgument`] when the product cannot be enumerated.
    /// * [`CatalogError::CombinationLimit`] when the configured limit is exceeded.
    #[instrument(skip(self), fields(product_id = product.id))]
    pub fn generate_all_combinations(&self, product: &Product) -> Result<Vec<String>, CatalogError> {
        let documents = self
            .combinations(product)?
            .collect_all()
            .context(format!("Generating combinations of product {}", product.id))?;
        debug!(count = documents.len(), "Generated attribute combinations");
        Ok(documents)
    }

    #[must_use]
    pub fn add_gift_card(&self, xml: &str, info: &GiftCardInfo) -> String {
        gift_card::add_gift_card(xml, info)
    }

    #[must_use]
    pub fn read_gift_card(&self, xml: &str) -> GiftCardInfo {
        gift_card::read_gift_card(xml)
    }
}
