use std::borrow::Cow;

/// Error types specific to the catalog feature.
#[storefront_derive::storefront_error]
pub enum CatalogError {
    /// The attributes text is not well-formed XML.
    #[error("Malformed attributes document{}: {source}", format_context(.context))]
    Xml { source: roxmltree::Error, context: Option<Cow<'static, str>> },

    /// The document parsed but has no `Attributes` element to write into.
    #[error("Attributes root element is missing{}: {message}", format_context(.context))]
    MissingRoot { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Elements are nested deeper than the reader accepts.
    #[error("Attributes document is nested deeper than {limit} elements{}", format_context(.context))]
    NestingTooDeep { limit: usize, context: Option<Cow<'static, str>> },

    /// Caller contract violation.
    #[error("Invalid argument{}: {message}", format_context(.context))]
    InvalidArgument { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Combination generation produced more documents than allowed.
    #[error("Attribute combination limit of {limit} exceeded{}", format_context(.context))]
    CombinationLimit { limit: usize, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal catalog error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
