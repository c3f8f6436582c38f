#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! Procedural macros of the storefront workspace.
//!
//! Crates using [`macro@storefront_error`] also depend on `thiserror`. The macro example is
//! not compiled here; `tests/ui` covers the real expansion.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Makes an enum of named-field variants the error type of a storefront crate.
///
/// The expansion adds `#[derive(Debug, thiserror::Error)]` (skipping derives already
/// listed) and these items:
///
/// * `<Name>Ext::context(..)`: attaches a message to the `context` field of any error
///   that converts into the enum. It is implemented for `Result<T, Name>` and for
///   `Result<T, Source>` of every wrapped source type.
/// * `From<Source>`: one per variant with a `source` field (or `#[source]`/`#[from]`).
/// * `From<&'static str>` and `From<String>`: only when an `Internal { message, .. }`
///   variant exists.
/// * `format_context(&Option<Cow<..>>)`: renders `" (context)"`. Use it inside `#[error]`.
///
/// Every variant that wraps a source also needs `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[storefront_derive::storefront_error]
/// pub enum CatalogError {
///     #[error("Malformed attributes document{}: {source}", format_context(.context))]
///     Xml { source: roxmltree::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal catalog error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn root(xml: &str) -> Result<roxmltree::Document<'_>, CatalogError> {
///     roxmltree::Document::parse(xml).context("Parsing attributes")
/// }
/// ```
#[proc_macro_attribute]
pub fn storefront_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}
