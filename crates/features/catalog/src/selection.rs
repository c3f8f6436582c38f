use crate::document::{
    ATTRIBUTES, AttributesDocument, Element, GIFT_CARD_INFO, ID, PRODUCT_ATTRIBUTE,
    PRODUCT_ATTRIBUTE_VALUE, VALUE,
};
use crate::error::CatalogError;
use crate::gift_card::{self, GiftCardField};
use storefront_domain::catalog::GiftCardInfo;

/// The in-memory view of an attributes document.
///
/// Entries keep document order. The XML text stays the only persisted form: a selection
/// is always rebuilt from it with [`AttributeSelection::from_xml`] and written back with
/// [`AttributeSelection::to_xml`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributeSelection {
    entries: Vec<(i32, Vec<String>)>,
    gift_card: Option<GiftCardInfo>,
}

impl AttributeSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every `ProductAttribute` block with a parsable id (values trimmed) and the
    /// first occurrence of each gift card field.
    ///
    /// Empty text is an empty selection.
    ///
    /// # Errors
    /// Returns [`CatalogError::Xml`] if the text is not well-formed XML and
    /// [`CatalogError::NestingTooDeep`] for overly nested documents.
    pub fn from_xml(xml: &str) -> Result<Self, CatalogError> {
        if xml.is_empty() {
            return Ok(Self::default());
        }
        let doc = AttributesDocument::parse(xml)?;

        let entries = doc
            .product_attributes()
            .into_iter()
            .filter_map(|block| block.mapping_id().map(|id| (id, block_values(block))))
            .collect();

        let gift_card = doc
            .root()
            .select_first(&[ATTRIBUTES, GIFT_CARD_INFO])
            .map(|_| gift_card::read_fields(doc.root()));

        Ok(Self { entries, gift_card })
    }

    /// Appends a value to the first entry of `mapping_id`, creating the entry if needed.
    pub fn push_value(&mut self, mapping_id: i32, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(id, _)| *id == mapping_id) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((mapping_id, vec![value])),
        }
    }

    pub fn set_gift_card(&mut self, info: GiftCardInfo) {
        self.gift_card = Some(info);
    }

    #[must_use]
    pub fn entries(&self) -> &[(i32, Vec<String>)] {
        &self.entries
    }

    #[must_use]
    pub const fn gift_card(&self) -> Option<&GiftCardInfo> {
        self.gift_card.as_ref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.gift_card.is_none()
    }

    /// Mapping ids in document order, duplicates included.
    #[must_use]
    pub fn mapping_ids(&self) -> Vec<i32> {
        self.entries.iter().map(|(id, _)| *id).collect()
    }

    /// Values of every entry with `mapping_id`, concatenated in document order.
    #[must_use]
    pub fn values(&self, mapping_id: i32) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(id, _)| *id == mapping_id)
            .flat_map(|(_, values)| values.iter().cloned())
            .collect()
    }

    /// Structural equality restricted to the mapping ids accepted by `resolves`.
    ///
    /// The id counts (all ids, not only resolved ones) must match. Then every resolved id
    /// of `self` must exist among the resolved ids of `other` with the same number of values,
    /// and each of its values must be found among the other's values. Values compare by
    /// exact, trimmed text.
    pub fn matches_by(&self, other: &Self, mut resolves: impl FnMut(i32) -> bool) -> bool {
        if self.entries.len() != other.entries.len() {
            return false;
        }
        let other_ids: Vec<i32> = other.mapping_ids().into_iter().filter(|id| resolves(*id)).collect();

        self.mapping_ids().into_iter().filter(|id| resolves(*id)).all(|id| {
            if !other_ids.contains(&id) {
                return false;
            }
            let ours = self.values(id);
            let theirs = other.values(id);
            ours.len() == theirs.len()
                && ours.iter().all(|a| theirs.iter().any(|b| a.trim() == b.trim()))
        })
    }

    /// Serializes the selection in the platform's attributes dialect.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut root = Element::new(ATTRIBUTES);
        for (id, values) in &self.entries {
            let block = root.push(Element::new(PRODUCT_ATTRIBUTE).with_attribute(ID, id.to_string()));
            for value in values {
                block.push(
                    Element::new(PRODUCT_ATTRIBUTE_VALUE).with_child(Element::with_text(VALUE, value.as_str())),
                );
            }
        }
        if let Some(info) = &self.gift_card {
            let block = root.push(Element::new(GIFT_CARD_INFO));
            for field in GiftCardField::ALL {
                block.push(Element::with_text(field.tag(), field.get(info)));
            }
        }
        AttributesDocument::from_root(root).to_xml()
    }
}

fn block_values(block: &Element) -> Vec<String> {
    block
        .elements()
        .filter(|e| e.name == PRODUCT_ATTRIBUTE_VALUE)
        .flat_map(|e| e.elements().filter(|v| v.name == VALUE))
        .map(|v| v.inner_text().trim().to_owned())
        .collect()
}
