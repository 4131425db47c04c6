//! The `#[is_authenticated]`, `#[has_role]` and `#[has_scope]` macros.
//!
//! Each macro inserts a gate check ahead of the resolver body. The
//! resolver must return a `Result` whose error converts from `AuthError`
//! (for example `FieldResult`), so a failed check returns early via `?`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::parse::{Parse, ParseStream, Parser};
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, Ident, ItemFn, LitStr, Token};

use crate::helpers::{core_crate_path, find_context_param, missing_context_param_error};

/// Requirement expansion for one directive.
enum Check {
    Authenticated,
    Roles(Vec<String>),
    Scopes(Vec<String>),
    DefaultScopes,
}

pub fn is_authenticated_impl(attrs: TokenStream, input: TokenStream) -> TokenStream {
    if !attrs.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "is_authenticated takes no arguments",
        )
        .to_compile_error()
        .into();
    }
    let item_fn = parse_macro_input!(input as ItemFn);
    expand(item_fn, "is_authenticated", "isAuthenticated", Check::Authenticated)
}

pub fn has_role_impl(attrs: TokenStream, input: TokenStream) -> TokenStream {
    let item_fn = parse_macro_input!(input as ItemFn);
    let roles = match parse_names(attrs.into()) {
        Ok(roles) => roles,
        Err(err) => return err.to_compile_error().into(),
    };

    if roles.is_empty() {
        return syn::Error::new_spanned(
            &item_fn.sig,
            r#"has_role requires at least one role, e.g. #[has_role("admin")]"#,
        )
        .to_compile_error()
        .into();
    }

    expand(item_fn, "has_role", "hasRole", Check::Roles(roles))
}

pub fn has_scope_impl(attrs: TokenStream, input: TokenStream) -> TokenStream {
    let item_fn = parse_macro_input!(input as ItemFn);
    let check = match parse_names(attrs.into()) {
        Ok(scopes) if scopes.is_empty() => Check::DefaultScopes,
        Ok(scopes) => Check::Scopes(scopes),
        Err(err) => return err.to_compile_error().into(),
    };

    expand(item_fn, "has_scope", "hasScope", check)
}

/// A role or scope name: `"User:Read"` or a bare identifier like `ADMIN`.
struct Name(String);

impl Parse for Name {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let lookahead = input.lookahead1();
        if lookahead.peek(LitStr) {
            let lit: LitStr = input.parse()?;
            if lit.value().trim().is_empty() {
                return Err(syn::Error::new(lit.span(), "names must not be empty"));
            }
            Ok(Name(lit.value()))
        } else if lookahead.peek(Ident) {
            let ident: Ident = input.parse()?;
            Ok(Name(ident.to_string()))
        } else {
            Err(lookahead.error())
        }
    }
}

/// Parses the comma-separated names of an attribute, dropping repeats.
fn parse_names(attrs: TokenStream2) -> syn::Result<Vec<String>> {
    let names = Punctuated::<Name, Token![,]>::parse_terminated.parse2(attrs)?;

    let mut unique: Vec<String> = Vec::new();
    for Name(name) in names {
        if !unique.contains(&name) {
            unique.push(name);
        }
    }
    Ok(unique)
}

fn expand(item_fn: ItemFn, macro_name: &str, directive: &str, check: Check) -> TokenStream {
    let param = match find_context_param(&item_fn) {
        Some(param) => param,
        None => return missing_context_param_error(&item_fn, macro_name),
    };

    let core_path = core_crate_path();
    let ctx_expr = param.context_expr();
    let field_name = param.field_name_expr(&item_fn);
    let requirement = requirement_tokens(&core_path, check);

    let attrs = &item_fn.attrs;
    let vis = &item_fn.vis;
    let sig = &item_fn.sig;
    let block = &item_fn.block;

    let expanded = quote! {
        #(#attrs)*
        #vis #sig {
            {
                let __field: &str = #field_name;
                let __ctx: &mut #core_path::security::ResolverContext = #ctx_expr;
                let __requirement = #requirement;
                #core_path::security::Gate::field(#directive, __requirement, __field)
                    .enforce(__ctx)?;
            }
            #block
        }
    };

    expanded.into()
}

fn requirement_tokens(core_path: &TokenStream2, check: Check) -> TokenStream2 {
    match check {
        Check::Authenticated => quote! {
            #core_path::security::Requirement::Authenticated
        },
        Check::Roles(roles) => quote! {
            #core_path::security::Requirement::Roles(
                ::std::vec![#(#roles.to_string()),*]
            )
        },
        Check::Scopes(scopes) => quote! {
            #core_path::security::Requirement::Scopes(
                ::std::vec![#(#scopes.to_string()),*]
            )
        },
        Check::DefaultScopes => quote! {
            #core_path::security::Requirement::Scopes(__ctx.default_scopes().to_vec())
        },
    }
}
