use std::borrow::Cow;
use storefront_derive::storefront_error;

#[storefront_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Parse error{}: {source}", format_context(.context))]
    Parse { source: std::num::ParseIntError, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn parse(raw: &str) -> Result<i32, DemoError> {
    Ok(raw.trim().parse::<i32>()?)
}

fn main() {
    let _ = parse("42");
    let _: DemoError = "boom".into();
    let _: DemoError = String::from("boom").into();
}
