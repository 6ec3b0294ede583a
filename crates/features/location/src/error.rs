use std::borrow::Cow;

/// Failures reported by a [`crate::LocationSource`].
#[sos_derive::sos_error]
pub enum LocationError {
    #[error("Location provider failed{}: {message}", format_context(.context))]
    Provider { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
