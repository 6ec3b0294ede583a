use proc_macro2::TokenStream;
use quote::quote;
use syn::{Error, Ident, ItemFn, ReturnType, Type};

/// Expands `#[sos_runtime::main]` into a synchronous `main` that owns a profiled runtime.
#[must_use]
pub fn expand_main(args: TokenStream, input: ItemFn) -> TokenStream {
    if input.sig.asyncness.is_none() {
        return Error::new_spanned(
            &input.sig.fn_token,
            "#[sos_runtime::main] can only wrap an async fn",
        )
        .to_compile_error();
    }
    if !returns_result(&input.sig.output) {
        return Error::new_spanned(
            &input.sig.output,
            "#[sos_runtime::main] requires the function to return a Result",
        )
        .to_compile_error();
    }

    let profile = match profile_constructor(args) {
        Ok(profile) => profile,
        Err(err) => return err.to_compile_error(),
    };

    let ItemFn { attrs, vis, sig, block } = input;
    let name = &sig.ident;
    let output = &sig.output;

    quote! {
        #(#attrs)*
        #vis fn #name() #output {
            let profile = #profile;
            let runtime = ::sos_runtime::build_runtime_with_config(&profile)?;
            runtime.block_on(async move #block)
        }
    }
}

fn profile_constructor(args: TokenStream) -> syn::Result<TokenStream> {
    if args.is_empty() {
        return Ok(quote! { ::sos_runtime::RuntimeConfig::default() });
    }

    let ident: Ident = syn::parse2(args)?;
    match ident.to_string().as_str() {
        "default" => Ok(quote! { ::sos_runtime::RuntimeConfig::default() }),
        "memory_efficient" => Ok(quote! { ::sos_runtime::RuntimeConfig::memory_efficient() }),
        "responsive" => Ok(quote! { ::sos_runtime::RuntimeConfig::responsive() }),
        _ => Err(Error::new_spanned(
            ident,
            "unknown runtime profile, expected one of: default, memory_efficient, responsive",
        )),
    }
}

fn returns_result(output: &ReturnType) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return false;
    };
    matches!(&**ty, Type::Path(path) if path.path.segments.last().is_some_and(|s| s.ident == "Result"))
}
