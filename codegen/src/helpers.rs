//! Common helper functions for directive macros.

use proc_macro::TokenStream;
use proc_macro2::{Ident, TokenStream as TokenStream2};
use quote::quote;
use syn::{FnArg, ItemFn, Pat, Type};

/// How the wrapped resolver receives its context.
pub enum ContextParam {
    /// `ctx: &mut ResolverContext`
    Context(Ident),
    /// `params: ResolveParams<'_>`
    Params(Ident),
}

impl ContextParam {
    /// Expression reborrowing the `ResolverContext` mutably.
    pub fn context_expr(&self) -> TokenStream2 {
        match self {
            ContextParam::Context(ident) => quote! { &mut *#ident },
            ContextParam::Params(ident) => quote! { &mut *#ident.ctx },
        }
    }

    /// Expression naming the guarded field: the resolved field when the
    /// resolver takes `ResolveParams`, else the function name.
    pub fn field_name_expr(&self, item_fn: &ItemFn) -> TokenStream2 {
        match self {
            ContextParam::Context(_) => {
                let name = item_fn.sig.ident.to_string();
                quote! { #name }
            }
            ContextParam::Params(ident) => quote! { #ident.info.field_name.as_str() },
        }
    }
}

/// Finds the `ResolverContext` or `ResolveParams` parameter of a resolver.
pub fn find_context_param(item_fn: &ItemFn) -> Option<ContextParam> {
    for arg in &item_fn.sig.inputs {
        if let FnArg::Typed(pat_type) = arg {
            let ident = match pat_type.pat.as_ref() {
                Pat::Ident(pat_ident) => pat_ident.ident.clone(),
                _ => continue,
            };

            match pat_type.ty.as_ref() {
                Type::Reference(reference) if reference.mutability.is_some() => {
                    if last_segment(&reference.elem).as_deref() == Some("ResolverContext") {
                        return Some(ContextParam::Context(ident));
                    }
                }
                ty => {
                    if last_segment(ty).as_deref() == Some("ResolveParams") {
                        return Some(ContextParam::Params(ident));
                    }
                }
            }
        }
    }
    None
}

fn last_segment(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(type_path) => type_path.path.segments.last().map(|s| s.ident.to_string()),
        _ => None,
    }
}

/// Generates a compile error for a missing context parameter.
pub fn missing_context_param_error(item_fn: &ItemFn, macro_name: &str) -> TokenStream {
    syn::Error::new_spanned(
        &item_fn.sig,
        format!(
            "{} requires a `ctx: &mut ResolverContext` or `params: ResolveParams<'_>` parameter.",
            macro_name
        ),
    )
    .to_compile_error()
    .into()
}

/// Path of the core crate in generated code.
pub fn core_crate_path() -> TokenStream2 {
    quote! { ::graphql_auth_core }
}
