use std::borrow::Cow;

#[sos_derive::sos_error]
pub enum StorageError {
    #[error("Storage root not found{}: {message}", format_context(.context))]
    DirectoryNotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Collection or document key outside the allowed alphabet.
    #[error("Invalid storage key{}: {message}", format_context(.context))]
    InvalidKey { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A conditional save observed a different revision than the caller expected.
    #[error("Revision conflict on {key}{}: expected {expected}, found {actual}", format_context(.context))]
    Conflict { key: String, expected: u64, actual: u64, context: Option<Cow<'static, str>> },

    #[error("Hardware I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Document encoding failure{}: {source}", format_context(.context))]
    Encoding { source: serde_json::Error, context: Option<Cow<'static, str>> },
}
