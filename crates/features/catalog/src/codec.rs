//! Free functions over attributes XML text.
//!
//! Every operation comes in two flavours: `try_*` returns the underlying
//! [`CatalogError`], the plain name is fail-soft and collapses failures into the
//! documented empty result after logging them at `debug` level.

use crate::document::AttributesDocument;
use crate::error::CatalogError;
use crate::selection::AttributeSelection;
use tracing::debug;

/// Collapses `result` to `T::default()`, logging the error.
pub(crate) fn fail_soft<T: Default>(result: Result<T, CatalogError>, operation: &'static str) -> T {
    result.unwrap_or_else(|error| {
        debug!(operation, %error, "Attributes document rejected");
        T::default()
    })
}

/// Mapping ids of every `ProductAttribute` block, document order.
///
/// # Errors
/// Returns [`CatalogError::Xml`] for malformed input and [`CatalogError::NestingTooDeep`]
/// for documents nested past the reader's limit.
pub fn try_parse_mapping_ids(xml: &str) -> Result<Vec<i32>, CatalogError> {
    Ok(AttributeSelection::from_xml(xml)?.mapping_ids())
}

/// Fail-soft [`try_parse_mapping_ids`].
#[must_use]
pub fn parse_mapping_ids(xml: &str) -> Vec<i32> {
    fail_soft(try_parse_mapping_ids(xml), "parse mapping ids")
}

/// Trimmed values of every block with `mapping_id`, concatenated.
///
/// # Errors
/// Returns [`CatalogError::Xml`] for malformed input.
pub fn try_parse_values(xml: &str, mapping_id: i32) -> Result<Vec<String>, CatalogError> {
    Ok(AttributeSelection::from_xml(xml)?.values(mapping_id))
}

/// Fail-soft [`try_parse_values`].
#[must_use]
pub fn parse_values(xml: &str, mapping_id: i32) -> Vec<String> {
    fail_soft(try_parse_values(xml, mapping_id), "parse values")
}

/// Appends `value` to the first block of `mapping_id`, creating the block when needed.
///
/// # Errors
/// * [`CatalogError::Xml`] for malformed input.
/// * [`CatalogError::MissingRoot`] when there is no `Attributes` element to write into.
pub fn try_add_attribute(xml: &str, mapping_id: i32, value: &str) -> Result<String, CatalogError> {
    let mut doc = AttributesDocument::parse_or_new(xml)?;
    doc.append_value(mapping_id, value)?;
    Ok(doc.to_xml())
}

/// Fail-soft [`try_add_attribute`]: an unusable document yields `""`.
#[must_use]
pub fn add_attribute(xml: &str, mapping_id: i32, value: &str) -> String {
    fail_soft(try_add_attribute(xml, mapping_id, value), "add attribute")
}

/// Structural equality of two documents, see [`AttributeSelection::matches_by`].
///
/// # Errors
/// Returns [`CatalogError::Xml`] if either document is malformed.
pub fn try_attributes_equal(a: &str, b: &str) -> Result<bool, CatalogError> {
    let a = AttributeSelection::from_xml(a)?;
    let b = AttributeSelection::from_xml(b)?;
    Ok(a.matches_by(&b, |_| true))
}

/// Fail-soft [`try_attributes_equal`].
///
/// Each side is read fail-soft, so a malformed document compares as an empty one.
#[must_use]
pub fn attributes_equal(a: &str, b: &str) -> bool {
    read_selection(a).matches_by(&read_selection(b), |_| true)
}

/// Fail-soft [`AttributeSelection::from_xml`].
pub(crate) fn read_selection(xml: &str) -> AttributeSelection {
    fail_soft(AttributeSelection::from_xml(xml), "read attributes")
}
