use sos_derive::sos_error;
use std::borrow::Cow;

#[sos_error]
pub enum LookupError {
    #[error("Parse error{}: {source}", format_context(.context))]
    Parse { source: std::num::ParseIntError, context: Option<Cow<'static, str>> },
}

fn parse(raw: &str) -> Result<i64, LookupError> {
    raw.parse::<i64>().context("Parsing facility id")
}

fn main() {
    let err = parse("north").unwrap_err();
    assert!(err.to_string().starts_with("Parse error (Parsing facility id): "));

    let relabeled: Result<i64, LookupError> = Err(err);
    let err = relabeled.context("Second pass").unwrap_err();
    assert!(err.to_string().starts_with("Parse error (Second pass): "));
}
