use std::borrow::Cow;

/// Error types specific to the shipping-by-total provider.
#[storefront_derive::storefront_error]
pub enum ShippingError {
    /// A rate record failed validation on insert.
    #[error("Invalid shipping record {id}{}: {message}", format_context(.context))]
    InvalidRecord { id: i32, message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A charge or subtotal left the representable decimal range.
    #[error("Arithmetic overflow{}: {message}", format_context(.context))]
    Overflow { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal shipping error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
