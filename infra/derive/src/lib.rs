#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the SOS crates.
//!
//! * [`macro@sos_error`] turns a plain enum into a context-aware error type.
//! * [`macro@main`] boots an async `main` on one of the `sos-runtime` profiles.
//!
//! Examples below are `ignore`d because a proc-macro crate cannot use its own
//! macros in doctests; the trybuild cases under `tests/ui` cover them instead.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, parse_macro_input};

/// Attribute macro that runs an `async fn main` on a profiled Tokio runtime.
///
/// # Arguments
///
/// * `memory_efficient` - Half the worker threads, small stacks. Suited to the CLI.
/// * `responsive` - Full worker pool with short keep-alive, for latency-bound dispatch hosts.
/// * `default` - Worker threads auto-detected from available parallelism.
///
/// # Examples
///
/// ```rust,ignore
/// #[sos_runtime::main(memory_efficient)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Attribute macro for defining slice error enums.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * `<ErrorName>Ext` trait adding `.context(...)` to `Result<T, ErrorName>` and to
///   `Result<T, SourceError>` for every variant with a source field.
/// * `From<SourceError>` for each variant with a `source` (or `#[source]`/`#[from]`) field.
/// * `From<&'static str>` and `From<String>` when an `Internal { message, context }` variant exists.
/// * `kind(&self) -> &'static str`, the `snake_case` variant name for log fields.
/// * A private `format_context` helper for `#[error(...)]` strings.
///
/// # Requirements
///
/// Only enums with named-field variants are accepted. A variant carrying a source
/// must also carry `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use sos_derive::sos_error;
/// use std::borrow::Cow;
///
/// #[sos_error]
/// pub enum ContactError {
///     #[error("Store error{}: {source}", format_context(.context))]
///     Store { source: sos_storage::StorageError, context: Option<Cow<'static, str>> },
///
///     #[error("Internal error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn load(store: &Storage) -> Result<Document, ContactError> {
///     store.read("alice").context("Loading contact list")
/// }
/// ```
#[proc_macro_attribute]
pub fn sos_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}
