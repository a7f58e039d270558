use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, DeriveInput, Result};

#[derive(Default)]
struct Facts {
    nothrow_default: bool,
    nothrow_clone: bool,
    nothrow_take: Option<bool>,
    take: bool,
}

impl Facts {
    fn from_attrs(attrs: &[Attribute]) -> Result<Self> {
        let mut facts = Facts::default();

        for attr in attrs {
            if !attr.path().is_ident("alternative") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("nothrow_default") {
                    facts.nothrow_default = true;
                } else if meta.path.is_ident("nothrow_clone") {
                    facts.nothrow_clone = true;
                } else if meta.path.is_ident("nothrow_take") {
                    facts.nothrow_take = Some(true);
                } else if meta.path.is_ident("take") {
                    facts.take = true;
                } else {
                    return Err(meta.error(
                        "unknown alternative fact; expected `nothrow_default`, `nothrow_clone`, \
                         `nothrow_take` or `take`",
                    ));
                }
                Ok(())
            })?;
        }

        Ok(facts)
    }

    /// Every fact about taking presupposes `Default`.
    fn implements_take(&self) -> bool {
        self.take || self.nothrow_default || self.nothrow_take.is_some()
    }
}

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let facts = Facts::from_attrs(&input.attrs)?;
    let Facts {
        nothrow_default,
        nothrow_clone,
        nothrow_take,
        ..
    } = facts;

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let nothrow_take = nothrow_take.map(|value| quote!(const NOTHROW_TAKE: bool = #value;));

    let take = facts.implements_take().then(|| {
        quote! {
            impl #impl_generics ::tvariant::Take for #ident #ty_generics #where_clause {
                #[inline]
                fn take(&mut self) -> Self {
                    ::core::mem::take(self)
                }
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::tvariant::Alternative for #ident #ty_generics #where_clause {
            type Target = Self;

            const NOTHROW_DEFAULT: bool = #nothrow_default;
            const NOTHROW_CLONE: bool = #nothrow_clone;
            #nothrow_take

            #[inline]
            fn wrap(value: Self) -> Self {
                value
            }

            #[inline]
            fn unwrap(self) -> Self {
                self
            }

            #[inline]
            fn pierce(&self) -> &Self {
                self
            }

            #[inline]
            fn pierce_mut(&mut self) -> &mut Self {
                self
            }
        }

        #take
    })
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    #[test]
    fn reads_flags() {
        let input: DeriveInput = parse_quote! {
            #[derive(Alternative)]
            #[alternative(nothrow_default, nothrow_take)]
            struct Meters(f64);
        };
        let facts = Facts::from_attrs(&input.attrs).unwrap();
        assert!(facts.nothrow_default);
        assert!(!facts.nothrow_clone);
        assert_eq!(facts.nothrow_take, Some(true));
    }

    #[test]
    fn rejects_unknown_flag() {
        let input: DeriveInput = parse_quote! {
            #[alternative(nothrow_drop)]
            struct Meters(f64);
        };
        let err = Facts::from_attrs(&input.attrs).err().unwrap();
        assert!(err.to_string().contains("unknown alternative fact"));
    }

    #[test]
    fn expands_generic() {
        let input: DeriveInput = parse_quote! {
            struct Wrapper<T: Clone>(T);
        };
        let out = expand(input).unwrap().to_string();
        assert!(out.contains("Alternative for Wrapper"));
        assert!(out.contains("NOTHROW_DEFAULT"));
        assert!(!out.contains("NOTHROW_TAKE"));
        assert!(!out.contains("Take for"));
    }

    #[test]
    fn take_follows_default_facts() {
        let input: DeriveInput = parse_quote! {
            #[alternative(take)]
            struct Ledger(Vec<u64>);
        };
        let out = expand(input).unwrap().to_string();
        assert!(out.contains("Take for Ledger"));
        assert!(!out.contains("NOTHROW_TAKE"));

        let input: DeriveInput = parse_quote! {
            #[alternative(nothrow_default)]
            struct Count(u32);
        };
        assert!(expand(input).unwrap().to_string().contains("Take for Count"));
    }
}
