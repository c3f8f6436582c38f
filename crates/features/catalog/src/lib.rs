//! # Product Attribute Codec
//!
//! Product attribute selections are persisted as a small XML document:
//!
//! ```text
//! <Attributes>
//!   <ProductAttribute ID="3"><ProductAttributeValue><Value>15</Value></ProductAttributeValue></ProductAttribute>
//!   <GiftCardInfo><RecipientName>..</RecipientName>..</GiftCardInfo>
//! </Attributes>
//! ```
//!
//! This crate reads and writes that document and answers the questions the storefront asks
//! of it:
//!
//! * **Codec ([`codec`]):** ids, values, appending a value, structural equality.
//! * **Gift cards ([`gift_card`]):** the optional `GiftCardInfo` block.
//! * **Combinations ([`combinations`]):** every document a product can produce.
//! * **Service-backed parsing ([`ProductAttributeParser`]):** the operations above resolved
//!   against a [`ProductAttributeService`], including stored combination lookup.
//!
//! The plain functions are fail-soft: malformed text never panics and yields an empty
//! result. Their `try_*` counterparts report a [`CatalogError`] instead.
//!
//! ```rust
//! use storefront_catalog::codec::{add_attribute, attributes_equal, parse_values};
//!
//! let a = add_attribute(&add_attribute("", 1, "10"), 1, "11");
//! let b = add_attribute(&add_attribute("", 1, "11"), 1, "10");
//!
//! assert_eq!(parse_values(&a, 1), vec!["10", "11"]);
//! assert!(attributes_equal(&a, &b));
//! ```

pub mod codec;
pub mod combinations;
mod document;
mod error;
pub mod gift_card;
mod parser;
mod selection;
mod service;

pub use crate::combinations::{CombinationGenerator, MappingValues};
pub use crate::error::{CatalogError, CatalogErrorExt};
pub use crate::parser::ProductAttributeParser;
pub use crate::selection::AttributeSelection;
pub use crate::service::{CatalogSnapshot, InMemoryAttributeService, ProductAttributeService};
