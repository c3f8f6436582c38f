//! Enumeration of every attributes document a product can produce.
//!
//! The outer loop walks the power set of the product's mappings. Subset `counter` holds
//! mapping `i` when bit `i` of `counter` is **clear**, so the first subset holds every
//! mapping and the last one holds none. Checkbox values are expanded the same way, which
//! makes the empty tick set the last one of each checkbox power set.
//!
//! Within a subset documents are built mapping by mapping:
//!
//! * the first contributing mapping seeds the list, one document per value (single-select)
//!   or one per non-empty tick set (multi-select);
//! * later mappings extend it, values outermost for single-select and documents outermost
//!   for multi-select, where the empty tick set keeps the document unchanged.
//!
//! Every subset's list is emitted in order; the empty mapping subset contributes nothing.

use crate::error::CatalogError;
use crate::selection::AttributeSelection;
use std::collections::VecDeque;
use storefront_domain::catalog::{ProductAttributeMapping, ProductAttributeValue};
use tracing::trace;

/// Widest power set the `u64` subset counter can walk.
pub const MAX_SUBSET_BITS: usize = 63;

/// A mapping together with its values, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MappingValues {
    pub mapping: ProductAttributeMapping,
    pub values: Vec<ProductAttributeValue>,
}

impl MappingValues {
    #[must_use]
    pub const fn new(mapping: ProductAttributeMapping, values: Vec<ProductAttributeValue>) -> Self {
        Self { mapping, values }
    }

    fn contributes(&self) -> bool {
        self.mapping.should_have_values() && !self.values.is_empty()
    }

    fn value_ids(&self) -> impl Iterator<Item = String> + '_ {
        self.values.iter().map(|v| v.id.to_string())
    }

    /// Tick sets of a multi-select mapping in zero-bit order.
    fn tick_sets(&self) -> Vec<Vec<String>> {
        let ids: Vec<String> = self.value_ids().collect();
        (0..subset_count(ids.len())).map(|counter| clear_bits(&ids, counter).cloned().collect()).collect()
    }
}

/// Lazy generator of attribute combinations, one mapping subset at a time.
#[derive(Debug, Clone)]
pub struct CombinationGenerator {
    mappings: Vec<MappingValues>,
    counter: u64,
    subsets: u64,
    pending: VecDeque<String>,
    limit: Option<usize>,
}

impl CombinationGenerator {
    /// # Errors
    /// Returns [`CatalogError::InvalidArgument`] when the mappings, or the values of a
    /// multi-select mapping, exceed [`MAX_SUBSET_BITS`].
    pub fn new(mappings: Vec<MappingValues>) -> Result<Self, CatalogError> {
        if mappings.len() > MAX_SUBSET_BITS {
            return Err(CatalogError::InvalidArgument {
                message: format!("{} attribute mappings, at most {MAX_SUBSET_BITS} supported", mappings.len())
                    .into(),
                context: None,
            });
        }
        if let Some(wide) = mappings.iter().find(|m| {
            m.contributes() && m.mapping.control_type.is_multi_select() && m.values.len() > MAX_SUBSET_BITS
        }) {
            return Err(CatalogError::InvalidArgument {
                message: format!(
                    "mapping {} has {} checkbox values, at most {MAX_SUBSET_BITS} supported",
                    wide.mapping.id,
                    wide.values.len()
                )
                .into(),
                context: None,
            });
        }

        let subsets = subset_count(mappings.len());
        Ok(Self { mappings, counter: 0, subsets, pending: VecDeque::new(), limit: None })
    }

    /// Caps [`CombinationGenerator::collect_all`]. Plain iteration is not affected.
    #[must_use]
    pub const fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Number of mapping subsets walked, the empty one included.
    #[must_use]
    pub const fn subset_count(&self) -> u64 {
        self.subsets
    }

    /// Drains the generator.
    ///
    /// # Errors
    /// Returns [`CatalogError::CombinationLimit`] as soon as more documents than the
    /// configured limit are produced.
    pub fn collect_all(self) -> Result<Vec<String>, CatalogError> {
        let limit = self.limit;
        let mut out = Vec::new();
        for document in self {
            if let Some(limit) = limit
                && out.len() >= limit
            {
                return Err(CatalogError::CombinationLimit { limit, context: None });
            }
            out.push(document);
        }
        Ok(out)
    }

    fn expand_subset(&self, counter: u64) -> Vec<String> {
        let mut running: Vec<AttributeSelection> = Vec::new();

        for entry in clear_bits(&self.mappings, counter).filter(|m| m.contributes()) {
            let id = entry.mapping.id;
            running = if entry.mapping.control_type.is_multi_select() {
                let ticks = entry.tick_sets();
                if running.is_empty() {
                    ticks
                        .into_iter()
                        .filter(|tick| !tick.is_empty())
                        .map(|tick| extend(&AttributeSelection::new(), id, tick))
                        .collect()
                } else {
                    running
                        .iter()
                        .flat_map(|doc| ticks.iter().map(move |tick| extend(doc, id, tick.iter().cloned())))
                        .collect()
                }
            } else if running.is_empty() {
                entry.value_ids().map(|value| extend(&AttributeSelection::new(), id, [value])).collect()
            } else {
                entry
                    .value_ids()
                    .flat_map(|value| running.iter().map(move |doc| extend(doc, id, [value.clone()])))
                    .collect()
            };
        }

        trace!(counter, documents = running.len(), "Expanded mapping subset");
        running.iter().map(AttributeSelection::to_xml).collect()
    }
}

impl Iterator for CombinationGenerator {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(document) = self.pending.pop_front() {
                return Some(document);
            }
            if self.counter >= self.subsets {
                return None;
            }
            let batch = self.expand_subset(self.counter);
            self.counter += 1;
            self.pending.extend(batch);
        }
    }
}

fn extend(base: &AttributeSelection, mapping_id: i32, values: impl IntoIterator<Item = String>) -> AttributeSelection {
    let mut doc = base.clone();
    for value in values {
        doc.push_value(mapping_id, value);
    }
    doc
}

const fn subset_count(len: usize) -> u64 {
    1u64 << len
}

/// Items whose bit in `counter` is clear.
fn clear_bits<T>(items: &[T], counter: u64) -> impl Iterator<Item = &T> {
    items.iter().enumerate().filter(move |&(i, _)| counter & (1u64 << i) == 0).map(|(_, item)| item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{parse_mapping_ids, parse_values};
    use storefront_domain::catalog::AttributeControlType;

    fn mapping(id: i32, control_type: AttributeControlType, value_ids: &[i32]) -> MappingValues {
        MappingValues::new(
            ProductAttributeMapping { id, control_type, ..ProductAttributeMapping::default() },
            value_ids
                .iter()
                .map(|&v| ProductAttributeValue { id: v, mapping_id: id, ..ProductAttributeValue::default() })
                .collect(),
        )
    }

    #[test]
    fn single_dropdown_yields_one_document_per_value() {
        let docs = CombinationGenerator::new(vec![mapping(1, AttributeControlType::DropdownList, &[10, 11])])
            .unwrap()
            .collect_all()
            .unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(parse_values(&docs[0], 1), vec!["10"]);
        assert_eq!(parse_values(&docs[1], 1), vec!["11"]);
    }

    #[test]
    fn single_values_per_mapping_produce_all_non_empty_subsets() {
        let mappings = (1..=4).map(|id| mapping(id, AttributeControlType::RadioList, &[id * 10])).collect();
        let docs: Vec<_> = CombinationGenerator::new(mappings).unwrap().collect();

        assert_eq!(docs.len(), 15);
        assert_eq!(parse_mapping_ids(&docs[0]), vec![1, 2, 3, 4]);
        // Counter 14 clears bit 0 only.
        assert_eq!(parse_mapping_ids(docs.last().unwrap()), vec![1]);
    }

    #[test]
    fn single_select_extension_iterates_values_outermost() {
        let mappings = vec![
            mapping(1, AttributeControlType::DropdownList, &[10, 11]),
            mapping(2, AttributeControlType::DropdownList, &[20, 21]),
        ];
        let docs: Vec<_> = CombinationGenerator::new(mappings).unwrap().take(4).collect();
        let pairs: Vec<_> = docs.iter().map(|d| (parse_values(d, 1)[0].clone(), parse_values(d, 2)[0].clone())).collect();

        assert_eq!(
            pairs,
            vec![
                ("10".into(), "20".into()),
                ("11".into(), "20".into()),
                ("10".into(), "21".into()),
                ("11".into(), "21".into()),
            ]
        );
    }

    #[test]
    fn checkbox_seed_drops_the_empty_tick_set() {
        let docs: Vec<_> =
            CombinationGenerator::new(vec![mapping(3, AttributeControlType::Checkboxes, &[1, 2])]).unwrap().collect();

        let values: Vec<_> = docs.iter().map(|d| parse_values(d, 3)).collect();
        assert_eq!(values, vec![vec!["1", "2"], vec!["2"], vec!["1"]]);
    }

    #[test]
    fn checkbox_extension_keeps_documents_for_empty_tick_set() {
        let mappings = vec![
            mapping(1, AttributeControlType::DropdownList, &[10]),
            mapping(2, AttributeControlType::ReadonlyCheckboxes, &[20]),
        ];
        let docs: Vec<_> = CombinationGenerator::new(mappings).unwrap().collect();

        // {1,2}: 10+20, 10 | {2}: 20 | {1}: 10 | {}: nothing
        assert_eq!(docs.len(), 4);
        assert_eq!(parse_mapping_ids(&docs[0]), vec![1, 2]);
        assert_eq!(parse_mapping_ids(&docs[1]), vec![1]);
        assert_eq!(parse_mapping_ids(&docs[2]), vec![2]);
        assert_eq!(parse_mapping_ids(&docs[3]), vec![1]);
    }

    #[test]
    fn free_form_and_empty_mappings_are_skipped() {
        let mappings = vec![
            mapping(1, AttributeControlType::TextBox, &[10]),
            mapping(2, AttributeControlType::DropdownList, &[]),
            mapping(3, AttributeControlType::ColorSquares, &[30]),
        ];
        let generator = CombinationGenerator::new(mappings).unwrap();
        assert_eq!(generator.subset_count(), 8);

        let docs: Vec<_> = generator.collect();
        assert_eq!(docs.len(), 4);
        assert!(docs.iter().all(|d| parse_mapping_ids(d) == vec![3]));
    }

    #[test]
    fn limit_guard_rejects_oversized_output() {
        let mappings = (1..=3).map(|id| mapping(id, AttributeControlType::DropdownList, &[id])).collect();
        let err = CombinationGenerator::new(mappings).unwrap().with_limit(Some(6)).collect_all().unwrap_err();
        assert!(matches!(err, CatalogError::CombinationLimit { limit: 6, .. }));

        let mappings = (1..=3).map(|id| mapping(id, AttributeControlType::DropdownList, &[id])).collect();
        let docs = CombinationGenerator::new(mappings).unwrap().with_limit(Some(7)).collect_all().unwrap();
        assert_eq!(docs.len(), 7);
    }

    #[test]
    fn too_many_mappings_are_rejected() {
        let mappings = (0..64).map(|id| mapping(id, AttributeControlType::DropdownList, &[1])).collect();
        assert!(matches!(CombinationGenerator::new(mappings), Err(CatalogError::InvalidArgument { .. })));

        let wide: Vec<i32> = (0..64).collect();
        let checkbox = vec![mapping(1, AttributeControlType::Checkboxes, &wide)];
        assert!(matches!(CombinationGenerator::new(checkbox), Err(CatalogError::InvalidArgument { .. })));
    }

    #[test]
    fn no_mappings_no_documents() {
        assert_eq!(CombinationGenerator::new(Vec::new()).unwrap().count(), 0);
    }
}
