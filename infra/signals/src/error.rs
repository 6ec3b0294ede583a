use std::borrow::Cow;

#[sos_derive::sos_error]
pub enum SignalError {
    /// A registered channel could not be downcast to the requested type.
    #[error("Type mismatch{}: {message}", format_context(.context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The type is already registered as the other channel kind (event vs state).
    #[error("Channel kind mismatch{}: {message}", format_context(.context))]
    KindMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid capacity{}: {message}", format_context(.context))]
    InvalidCapacity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
