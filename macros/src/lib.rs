use proc_macro::TokenStream;

mod alternative;
mod pat;

/// Matches a variant by the types of its alternatives.
///
/// Each arm names the alternative it handles through its pattern: a type name
/// (`String`, `i64`), a struct or tuple-struct pattern (`Point { x, .. }`), or
/// a suffixed literal (`0u8`). `name @ Type` binds the value. A trailing `_`
/// or a bare binding handles every remaining alternative; otherwise the arms
/// must cover the whole list, which is checked at compile time.
#[proc_macro]
pub fn match_variant(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as pat::VariantMatch);
    pat::expand_match(input).into()
}

/// Implements `Alternative` for a directly held type.
///
/// `#[alternative(nothrow_default, nothrow_clone, nothrow_take)]` declares
/// which constructions of the type never panic.
#[proc_macro_derive(Alternative, attributes(alternative))]
pub fn derive_alternative(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);
    alternative::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
