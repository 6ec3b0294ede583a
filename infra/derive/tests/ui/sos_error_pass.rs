use sos_derive::sos_error;
use std::borrow::Cow;

#[sos_error]
pub enum StoreError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Record not found{}: {key}", format_context(.context))]
    NotFound { key: String, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let io: StoreError = std::io::Error::other("disk gone").into();
    assert_eq!(io.kind(), "io");

    let internal: StoreError = "boom".into();
    assert_eq!(internal.kind(), "internal");
    assert_eq!(internal.to_string(), "Internal error: boom");

    let missing = StoreError::NotFound { key: "alice".to_owned(), context: None };
    assert_eq!(missing.kind(), "not_found");
}
