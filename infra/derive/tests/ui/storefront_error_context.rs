use std::borrow::Cow;
use storefront_derive::storefront_error;

#[storefront_error]
pub enum DemoError {
    #[error("Parse error{}: {source}", format_context(.context))]
    Parse { source: std::num::ParseIntError, context: Option<Cow<'static, str>> },

    #[error("Limit exceeded{}: {limit}", format_context(.context))]
    Limit { limit: usize, context: Option<Cow<'static, str>> },
}

fn parse(raw: &str) -> Result<i32, DemoError> {
    raw.parse::<i32>().context("Parsing attribute id")
}

fn check(limit: usize) -> Result<(), DemoError> {
    Err(DemoError::Limit { limit, context: None }).context("Combination guard")
}

fn main() {
    let err = parse("x").unwrap_err();
    assert!(err.to_string().starts_with("Parse error (Parsing attribute id)"));

    let err = check(3).unwrap_err();
    assert_eq!(err.to_string(), "Limit exceeded (Combination guard): 3");
}
