//! Gift card block of an attributes document.
//!
//! ```text
//! <Attributes><GiftCardInfo><RecipientName>..</RecipientName><RecipientEmail>..</RecipientEmail>
//! <SenderName>..</SenderName><SenderEmail>..</SenderEmail><Message>..</Message></GiftCardInfo></Attributes>
//! ```
//!
//! Writing always appends a fresh set of the five fields, even when the block already has
//! some; readers only ever see the first occurrence of each field.

use crate::codec::fail_soft;
use crate::document::{ATTRIBUTES, AttributesDocument, Element, GIFT_CARD_INFO};
use crate::error::CatalogError;
use storefront_domain::catalog::GiftCardInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GiftCardField {
    RecipientName,
    RecipientEmail,
    SenderName,
    SenderEmail,
    Message,
}

impl GiftCardField {
    pub(crate) const ALL: [Self; 5] =
        [Self::RecipientName, Self::RecipientEmail, Self::SenderName, Self::SenderEmail, Self::Message];

    pub(crate) const fn tag(self) -> &'static str {
        match self {
            Self::RecipientName => "RecipientName",
            Self::RecipientEmail => "RecipientEmail",
            Self::SenderName => "SenderName",
            Self::SenderEmail => "SenderEmail",
            Self::Message => "Message",
        }
    }

    pub(crate) fn get(self, info: &GiftCardInfo) -> &str {
        match self {
            Self::RecipientName => &info.recipient_name,
            Self::RecipientEmail => &info.recipient_email,
            Self::SenderName => &info.sender_name,
            Self::SenderEmail => &info.sender_email,
            Self::Message => &info.message,
        }
    }

    fn slot(self, info: &mut GiftCardInfo) -> &mut String {
        match self {
            Self::RecipientName => &mut info.recipient_name,
            Self::RecipientEmail => &mut info.recipient_email,
            Self::SenderName => &mut info.sender_name,
            Self::SenderEmail => &mut info.sender_email,
            Self::Message => &mut info.message,
        }
    }
}

/// First occurrence of each field below `//Attributes/GiftCardInfo`; missing fields are empty.
pub(crate) fn read_fields(root: &Element) -> GiftCardInfo {
    let mut info = GiftCardInfo::default();
    for field in GiftCardField::ALL {
        if let Some(element) = root.select_first(&[ATTRIBUTES, GIFT_CARD_INFO, field.tag()]) {
            *field.slot(&mut info) = element.inner_text();
        }
    }
    info
}

/// Appends gift card fields to `xml`.
///
/// Names and e-mails are trimmed, the message is kept as given.
///
/// # Errors
/// * [`CatalogError::Xml`] for malformed input.
/// * [`CatalogError::MissingRoot`] when the document has no `Attributes` element.
pub fn try_add_gift_card(xml: &str, info: &GiftCardInfo) -> Result<String, CatalogError> {
    let mut doc = AttributesDocument::parse_or_new(xml)?;
    let block = doc.find_or_append(&[ATTRIBUTES, GIFT_CARD_INFO], || Element::new(GIFT_CARD_INFO))?;

    for field in GiftCardField::ALL {
        let raw = field.get(info);
        let text = if field == GiftCardField::Message { raw } else { raw.trim() };
        block.push(Element::with_text(field.tag(), text));
    }

    Ok(doc.to_xml())
}

/// Fail-soft [`try_add_gift_card`]: returns an empty string when the document is unusable.
#[must_use]
pub fn add_gift_card(xml: &str, info: &GiftCardInfo) -> String {
    fail_soft(try_add_gift_card(xml, info), "add gift card")
}

/// Reads gift card fields from `xml`.
///
/// # Errors
/// Returns [`CatalogError::Xml`] for malformed input.
pub fn try_read_gift_card(xml: &str) -> Result<GiftCardInfo, CatalogError> {
    let doc = AttributesDocument::parse(xml)?;
    Ok(read_fields(doc.root()))
}

/// Fail-soft [`try_read_gift_card`]: malformed or empty input yields all-empty fields.
#[must_use]
pub fn read_gift_card(xml: &str) -> GiftCardInfo {
    fail_soft(try_read_gift_card(xml), "read gift card")
}
