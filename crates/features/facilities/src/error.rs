use std::borrow::Cow;

#[sos_derive::sos_error]
pub enum FacilityError {
    /// Connection, TLS, timeout or body read failure.
    #[error("Facility directory request failed{}: {source}", format_context(.context))]
    Http { source: reqwest::Error, context: Option<Cow<'static, str>> },

    #[error("Facility directory answered {status}{}", format_context(.context))]
    Status { status: u16, context: Option<Cow<'static, str>> },

    #[error("Facility directory response is malformed{}: {source}", format_context(.context))]
    Decode { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// Category is not a plain OSM tag value.
    #[error("Invalid facility category{}: {message}", format_context(.context))]
    InvalidCategory { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
