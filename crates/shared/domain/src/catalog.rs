use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, FromRepr, IntoStaticStr};

/// How a product attribute is presented to the customer.
///
/// Discriminants are the numeric codes stored by the platform.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
    FromRepr,
)]
#[repr(i32)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttributeControlType {
    #[default]
    DropdownList = 1,
    RadioList = 2,
    Checkboxes = 3,
    TextBox = 4,
    MultilineTextbox = 10,
    Datepicker = 20,
    FileUpload = 30,
    ColorSquares = 40,
    ReadonlyCheckboxes = 50,
}

impl AttributeControlType {
    /// Whether the attribute is backed by a list of predefined values.
    ///
    /// Free-form controls (text, date, file) carry the customer's input instead.
    #[must_use]
    pub const fn should_have_values(self) -> bool {
        !matches!(self, Self::TextBox | Self::MultilineTextbox | Self::Datepicker | Self::FileUpload)
    }

    /// Whether several values can be selected at once.
    #[must_use]
    pub const fn is_multi_select(self) -> bool {
        matches!(self, Self::Checkboxes | Self::ReadonlyCheckboxes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    #[serde(default)]
    pub name: String,
}

/// An attribute a product may carry (e.g. "Size"), together with its control type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductAttributeMapping {
    pub id: i32,
    pub product_id: i32,
    pub product_attribute_id: i32,
    pub text_prompt: Option<String>,
    pub is_required: bool,
    pub control_type: AttributeControlType,
    pub display_order: i32,
}

impl Default for ProductAttributeMapping {
    fn default() -> Self {
        Self {
            id: 0,
            product_id: 0,
            product_attribute_id: 0,
            text_prompt: None,
            is_required: false,
            control_type: AttributeControlType::default(),
            display_order: 0,
        }
    }
}

impl ProductAttributeMapping {
    #[must_use]
    pub const fn should_have_values(&self) -> bool {
        self.control_type.should_have_values()
    }
}

/// One selectable value of a [`ProductAttributeMapping`] (e.g. "Large").
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductAttributeValue {
    pub id: i32,
    pub mapping_id: i32,
    pub name: String,
    pub price_adjustment: Decimal,
    pub weight_adjustment: Decimal,
    pub is_pre_selected: bool,
    pub display_order: i32,
}

/// A stored attribute combination used for per-combination inventory.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductAttributeCombination {
    pub id: i32,
    pub product_id: i32,
    pub attributes_xml: String,
    pub stock_quantity: i32,
    pub allow_out_of_stock_orders: bool,
    pub sku: Option<String>,
}

/// Gift card details embedded in an attributes document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GiftCardInfo {
    pub recipient_name: String,
    pub recipient_email: String,
    pub sender_name: String,
    pub sender_email: String,
    pub message: String,
}
