use super::read_document;
use crate::models::args::GiftCardAction;
use anyhow::{Context, Result};
use storefront::catalog::gift_card;
use storefront::domain::catalog::GiftCardInfo;

/// Runs one `gift-card` action.
///
/// # Errors
/// Returns an error when the document is not well-formed XML.
pub fn handle(action: GiftCardAction) -> Result<()> {
    match action {
        GiftCardAction::Add { xml, recipient_name, recipient_email, sender_name, sender_email, message } => {
            let xml = read_document(&xml)?;
            let info = GiftCardInfo { recipient_name, recipient_email, sender_name, sender_email, message };
            println!("{}", gift_card::try_add_gift_card(&xml, &info).context("Failed to attach the gift card")?);
        },
        GiftCardAction::Read { xml } => {
            let xml = read_document(&xml)?;
            let info = gift_card::try_read_gift_card(&xml).context("Failed to read the gift card")?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        },
    }
    Ok(())
}
