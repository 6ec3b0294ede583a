use sos_signals::SignalError;
use std::borrow::Cow;

#[sos_derive::sos_error]
pub enum DispatchError {
    /// The message transport refused or failed a delivery.
    #[error("Message transport failed{}: {message}", format_context(.context))]
    Transport { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Voice call failed{}: {message}", format_context(.context))]
    Dialer { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Signal publishing failed{}: {source}", format_context(.context))]
    Signal { source: SignalError, context: Option<Cow<'static, str>> },
}
