use super::read_document;
use crate::models::args::AttrsAction;
use anyhow::{Context, Result};
use storefront::catalog::codec;

/// Runs one `attrs` action against a raw document.
///
/// # Errors
/// Returns an error when the document is not well-formed XML or stdin cannot be read.
pub fn handle(action: AttrsAction) -> Result<()> {
    match action {
        AttrsAction::Ids { xml } => {
            let xml = read_document(&xml)?;
            for id in codec::try_parse_mapping_ids(&xml).context("Failed to read attribute ids")? {
                println!("{id}");
            }
        },
        AttrsAction::Values { xml, mapping } => {
            let xml = read_document(&xml)?;
            for value in codec::try_parse_values(&xml, mapping).context("Failed to read attribute values")? {
                println!("{value}");
            }
        },
        AttrsAction::Add { xml, mapping, value } => {
            let xml = read_document(&xml)?;
            println!("{}", codec::try_add_attribute(&xml, mapping, &value).context("Failed to add the attribute")?);
        },
        AttrsAction::Equal { first, second } => {
            let first = read_document(&first)?;
            let second = read_document(&second)?;
            println!("{}", codec::try_attributes_equal(&first, &second).context("Failed to compare documents")?);
        },
    }
    Ok(())
}
