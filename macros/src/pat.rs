use std::iter;

use const_random::const_random;
use convert_case::{Case, Casing};
use either::Either::{Left, Right};
use proc_macro2::{Span, TokenStream};
use quote::{ToTokens, quote};
use syn::{parse::Parse, spanned::Spanned, visit::Visit, *};

const PRIMITIVES: &[&str] = &[
    "bool", "char", "f32", "f64", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32",
    "u64", "u128", "usize",
];

fn names_type(ident: &Ident) -> bool {
    let s = ident.to_string();
    s.is_case(Case::Pascal) || PRIMITIVES.contains(&s.as_str())
}

/// The alternatives one arm's pattern selects.
#[derive(Default)]
struct ArmPat {
    root_ident: Option<PatIdent>,
    /// `Some` for a catch-all arm, holding its binding if it has one.
    catch_all: Option<Option<PatIdent>>,
    types: Vec<Type>,
    type_pats: Vec<Pat>,
    refutable: bool,

    in_subpat: bool,
    err: Option<syn::Error>,
}

impl ArmPat {
    fn fail(&mut self, tokens: impl ToTokens, message: impl std::fmt::Display) {
        if self.err.is_none() {
            self.err = Some(syn::Error::new_spanned(tokens, message));
        }
    }

    fn push(&mut self, ty: Type, pat: Pat) {
        if self.types.contains(&ty) {
            self.fail(&ty, "the same alternative appears twice in one pattern");
            return;
        }
        let pat = match self.root_ident.take() {
            Some(mut root) => {
                root.subpat = Some((<Token![@]>::default(), Box::new(pat)));
                Pat::Ident(root)
            }
            None => pat,
        };
        self.types.push(ty);
        self.type_pats.push(pat);
    }

    fn conflicts_with(&self, other: &Self) -> Option<syn::Error> {
        if self.refutable || other.refutable {
            return None;
        }
        let ty = self.types.iter().find(|ty| other.types.contains(ty))?;
        Some(syn::Error::new_spanned(
            ty,
            "this alternative is already matched by an earlier arm",
        ))
    }

    fn literal_type(&mut self, pat: &Pat, lit: &Lit) -> Option<Type> {
        let suffix = match lit {
            Lit::Byte(_) => return Some(parse_quote!(u8)),
            Lit::Char(_) => return Some(parse_quote!(char)),
            Lit::Bool(_) => return Some(parse_quote!(bool)),
            Lit::Int(int) => int.suffix(),
            Lit::Float(float) => float.suffix(),
            _ => {
                self.fail(
                    pat,
                    "only numeric, byte, char and bool literals can select an alternative; \
                     bind the value and use a guard instead",
                );
                return None;
            }
        };
        if suffix.is_empty() {
            self.fail(pat, "add a type suffix to the literal to select an alternative");
            return None;
        }
        parse_str(suffix).ok()
    }
}

impl Visit<'_> for ArmPat {
    fn visit_pat(&mut self, i: &'_ Pat) {
        if self.in_subpat {
            match i {
                Pat::Lit(_)
                | Pat::Range(_)
                | Pat::Const(_)
                | Pat::Path(_)
                | Pat::Struct(_)
                | Pat::TupleStruct(_)
                | Pat::Slice(_) => self.refutable = true,
                Pat::Ident(pi) if pi.subpat.is_none() && names_type(&pi.ident) => {
                    // A constant, or a unit variant of an enum.
                    self.refutable = true
                }
                _ => {}
            }
            return visit::visit_pat(self, i);
        }

        match i {
            Pat::Ident(pi) if pi.subpat.is_none() && names_type(&pi.ident) => {
                let ty = Type::Path(TypePath {
                    qself: None,
                    path: Path::from(pi.ident.clone()),
                });
                self.push(ty, Pat::Wild(PatWild {
                    attrs: Vec::new(),
                    underscore_token: Default::default(),
                }));
            }
            Pat::Ident(pi) if pi.subpat.is_none() => match self.root_ident {
                Some(_) => self.fail(i, "nested bindings are not supported"),
                None => self.catch_all = Some(Some(pi.clone())),
            },
            Pat::Ident(pi) => {
                if self.root_ident.is_some() {
                    return self.fail(i, "nested bindings are not supported");
                }
                let mut root = pi.clone();
                root.subpat = None;
                self.root_ident = Some(root);
                visit::visit_pat(self, i);
            }

            Pat::Struct(PatStruct { qself, path, .. })
            | Pat::TupleStruct(PatTupleStruct { qself, path, .. })
            | Pat::Path(PatPath { qself, path, .. }) => {
                let ty = Type::Path(TypePath {
                    qself: qself.clone(),
                    path: path.clone(),
                });

                self.in_subpat = true;
                visit::visit_pat(self, i);
                self.in_subpat = false;

                self.push(ty, i.clone());
            }

            Pat::Paren(_) => visit::visit_pat(self, i),
            Pat::Or(_) => {
                if let Some(root) = self.root_ident.take() {
                    return self.fail(root, "a binding cannot span several alternatives");
                }
                visit::visit_pat(self, i)
            }

            Pat::Lit(lit) => {
                self.refutable = true;
                if let Some(ty) = self.literal_type(i, &lit.lit) {
                    self.push(ty, i.clone());
                }
            }

            Pat::Wild(_) | Pat::Rest(_) => match self.root_ident.take() {
                Some(root) => self.catch_all = Some(Some(root)),
                None => self.catch_all = Some(None),
            },

            _ => self.fail(
                i,
                format_args!("pattern `{}` cannot select an alternative", i.to_token_stream()),
            ),
        }
    }
}

pub struct VariantArm {
    pat: ArmPat,
    guard: Option<Box<Expr>>,
    body: Box<Expr>,
}

impl Parse for VariantArm {
    fn parse(input: parse::ParseStream<'_>) -> Result<Self> {
        let Arm {
            attrs,
            pat,
            guard,
            body,
            ..
        } = input.parse()?;

        if let Some(first) = attrs.first() {
            return Err(syn::Error::new(
                first.span(),
                "attributes are not supported on variant match arms",
            ));
        }

        let mut arm = ArmPat::default();
        arm.visit_pat(&pat);

        if let Some(err) = arm.err.take() {
            return Err(err);
        }
        if arm.catch_all.is_some() && !arm.types.is_empty() {
            return Err(syn::Error::new_spanned(
                pat,
                "a catch-all pattern cannot be combined with alternative patterns",
            ));
        }
        if arm.types.is_empty() && arm.catch_all.is_none() {
            return Err(syn::Error::new_spanned(
                pat,
                "cannot tell which alternative this pattern selects; name its type",
            ));
        }

        if guard.is_some() {
            arm.refutable = true;
        }

        Ok(VariantArm {
            pat: arm,
            guard: guard.map(|(_, guard)| guard),
            body,
        })
    }
}

pub struct VariantMatch {
    expr: Box<Expr>,
    attrs: Vec<Attribute>,
    arms: Vec<VariantArm>,
}

impl Parse for VariantMatch {
    fn parse(input: parse::ParseStream<'_>) -> Result<Self> {
        let expr = Box::new(Expr::parse_without_eager_brace(input)?);

        let content;
        syn::braced!(content in input);

        let attrs = Attribute::parse_inner(&content)?;

        let mut arms = Vec::new();
        while !content.is_empty() {
            arms.push(content.parse()?);
        }

        Ok(VariantMatch { expr, attrs, arms })
    }
}

fn expand_catch_all(
    base: &Ident,
    label: &Lifetime,
    binding: &Option<PatIdent>,
    guard: Option<&Expr>,
    body: &Expr,
) -> TokenStream {
    let binding = match binding {
        Some(binding) => binding.to_token_stream(),
        None => quote!(_),
    };
    match guard {
        Some(guard) => quote! {
            let #base = match #base.narrow::<(), _>() {
                #[allow(unreachable_code)]
                Err(#binding) if #guard => break #label { #body },
                Err(rest) => rest,
                Ok(empty) => empty.unreachable(),
            };
        },
        None => quote! {
            let #base = match #base.narrow::<(), _>() {
                #[allow(unreachable_code)]
                Err(#binding) => break #label { #body },
                Ok(empty) => empty,
            };
        },
    }
}

fn expand_alternative(
    base: &Ident,
    label: &Lifetime,
    ty: &Type,
    pat: &Pat,
    refutable: bool,
    guard: Option<&Expr>,
    body: &Expr,
) -> TokenStream {
    let guard = guard.map(|guard| quote!(if #guard));
    if refutable {
        quote! {
            let mut #base = #base;
            #base = match #base.try_unwrap::<#ty, _>() {
                #[allow(unreachable_code)]
                Ok(#pat) #guard => break #label { #body },
                #[allow(unreachable_patterns)]
                Ok(value) => ::tvariant::Variant::new(value),
                Err(rest) => rest.broaden(),
            };
        }
    } else {
        quote! {
            let #base = match #base.try_unwrap::<#ty, _>() {
                #[allow(unreachable_code)]
                Ok(#pat) => break #label { #body },
                Err(rest) => rest,
            };
        }
    }
}

pub fn expand_match(data: VariantMatch) -> TokenStream {
    let VariantMatch { expr, attrs, arms } = data;

    if let Some(err) = (arms.iter().enumerate())
        .flat_map(|(index, a)| arms.iter().take(index).map(move |b| (a, b)))
        .find_map(|(a, b)| a.pat.conflicts_with(&b.pat))
    {
        return err.to_compile_error();
    }

    let base = Ident::new(
        &format!("__variant_match_base{}", const_random!(u32)),
        Span::mixed_site(),
    );
    let label = Lifetime {
        apostrophe: Span::mixed_site(),
        ident: Ident::new(
            &format!("__variant_match_body{}", const_random!(u32)),
            Span::mixed_site(),
        ),
    };

    let (base, label) = (&base, &label);
    let steps = arms.iter().flat_map(|arm| {
        let VariantArm { pat, guard, body } = arm;
        let guard = guard.as_deref();

        match &pat.catch_all {
            Some(binding) => Left(iter::once(expand_catch_all(
                base, label, binding, guard, body,
            ))),
            None => Right(pat.types.iter().zip(&pat.type_pats).map(move |(ty, type_pat)| {
                expand_alternative(base, label, ty, type_pat, pat.refutable, guard, body)
            })),
        }
    });

    quote! {{
        let #base = #expr;
        #label: {
            #(#attrs)*
            #(#steps)*
            let #base: ::tvariant::Variant<()> = #base;
            #base.unreachable()
        }
    }}
}
