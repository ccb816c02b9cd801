//! Derive macro for `fieldcheck_shared::Validate`.

use fieldcheck_shared::MessageTemplate;
use proc_macro::TokenStream;
use quote::quote;
use syn::meta::ParseNestedMeta;
use syn::parse::Parse;
use syn::{
    Attribute, Data, DeriveInput, Fields, GenericArgument, Ident, LitStr, PathArguments, Type,
};

/// Derive `fieldcheck_shared::Validate` (and `FieldSource`) from field attributes.
///
/// ```ignore
/// #[derive(Validate)]
/// struct UpdateRequest {
///     #[validate(nullable_not_blank)]
///     title: Option<String>,
///     #[validate(nullable_not_blank(message = "must have content", groups("publish")))]
///     #[validate(nullable_not_blank)]
///     description: Option<String>,
/// }
/// ```
#[proc_macro_derive(Validate, attributes(validate))]
pub fn derive_validate(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand_validate(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_validate(input: &DeriveInput) -> Result<proc_macro2::TokenStream, syn::Error> {
    reject_container_attributes(&input.attrs)?;
    let Data::Struct(struct_data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "Validate can only be derived for structs",
        ));
    };

    let fields = match &struct_data.fields {
        Fields::Named(fields) => &fields.named,
        _ => {
            return Err(syn::Error::new_spanned(
                &struct_data.fields,
                "Validate requires named fields",
            ));
        },
    };

    let mut declarations = Vec::new();
    let mut accessors = Vec::new();
    let mut reported_names: Vec<String> = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let (field_name, rules) = parse_field_rules(&field.attrs, ident)?;
        if rules.is_empty() {
            continue;
        }
        if reported_names.contains(&field_name) {
            return Err(syn::Error::new_spanned(
                ident,
                format!("duplicate reported field name `{field_name}`"),
            ));
        }
        let (is_option, inner_ty) = unwrap_option(&field.ty);
        if !is_string_like(inner_ty) {
            return Err(syn::Error::new_spanned(
                inner_ty,
                "nullable_not_blank can only be used on string-like fields",
            ));
        }

        let name_lit = LitStr::new(&field_name, proc_macro2::Span::call_site());
        accessors.push(expand_accessor(ident, &name_lit, is_option));
        for rule in rules {
            let declaration = expand_declaration(&rule);
            declarations.push(quote! { .field(#name_lit, #declaration) });
        }
        reported_names.push(field_name);
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::fieldcheck_shared::FieldSource for #name #ty_generics #where_clause {
            fn text(&self, field: &str) -> ::core::option::Option<&str> {
                match field {
                    #(#accessors)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl #impl_generics ::fieldcheck_shared::Validate for #name #ty_generics #where_clause {
            fn schema() -> &'static ::fieldcheck_shared::Schema {
                static SCHEMA: ::std::sync::LazyLock<::fieldcheck_shared::Schema> =
                    ::std::sync::LazyLock::new(|| {
                        ::fieldcheck_shared::Schema::builder()
                            #(#declarations)*
                            .build()
                    });
                &SCHEMA
            }
        }
    })
}

fn reject_container_attributes(attrs: &[Attribute]) -> Result<(), syn::Error> {
    for attr in attrs {
        if attr.path().is_ident("validate") {
            return Err(syn::Error::new_spanned(
                attr,
                "validate attributes belong on fields",
            ));
        }
    }
    Ok(())
}

#[derive(Default)]
struct NullableNotBlankRule {
    message: Option<LitStr>,
    groups: Vec<LitStr>,
    payload: Vec<LitStr>,
}

fn parse_field_rules(
    attrs: &[Attribute],
    ident: &Ident,
) -> Result<(String, Vec<NullableNotBlankRule>), syn::Error> {
    let mut rules = Vec::new();
    let mut field_name_override: Option<String> = None;
    for attr in attrs {
        if !attr.path().is_ident("validate") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("field") {
                let value: LitStr = meta.value()?.parse()?;
                if field_name_override.is_some() {
                    return Err(meta.error("duplicate validate(field = ...)"));
                }
                field_name_override = Some(value.value());
                return Ok(());
            }
            if meta.path.is_ident("nullable_not_blank") {
                let mut rule = NullableNotBlankRule::default();
                if meta.input.is_empty() || meta.input.peek(syn::Token![,]) {
                    rules.push(rule);
                    return Ok(());
                }
                meta.parse_nested_meta(|nested| {
                    if nested.path.is_ident("message") {
                        let value: LitStr = nested.value()?.parse()?;
                        if rule.message.is_some() {
                            return Err(nested.error("duplicate message"));
                        }
                        check_template(&value)?;
                        rule.message = Some(value);
                        return Ok(());
                    }
                    if nested.path.is_ident("groups") {
                        rule.groups.extend(parse_string_list(&nested)?);
                        return Ok(());
                    }
                    if nested.path.is_ident("payload") {
                        rule.payload.extend(parse_string_list(&nested)?);
                        return Ok(());
                    }
                    Err(nested.error("unsupported nullable_not_blank attribute"))
                })?;
                rules.push(rule);
                return Ok(());
            }
            Err(meta.error("unsupported validate attribute on field"))
        })?;
    }
    let name = field_name_override.unwrap_or_else(|| ident.to_string());
    Ok((name, rules))
}

fn parse_string_list(meta: &ParseNestedMeta<'_>) -> Result<Vec<LitStr>, syn::Error> {
    let content;
    syn::parenthesized!(content in meta.input);
    let values = content.parse_terminated(<LitStr as Parse>::parse, syn::Token![,])?;
    Ok(values.into_iter().collect())
}

fn check_template(value: &LitStr) -> Result<(), syn::Error> {
    MessageTemplate::new(value.value())
        .check()
        .map_err(|error| syn::Error::new_spanned(value, format!("invalid message template: {error}")))
}

fn expand_declaration(rule: &NullableNotBlankRule) -> proc_macro2::TokenStream {
    let mut declaration = quote! { ::fieldcheck_shared::NullableNotBlank::new() };
    if let Some(message) = &rule.message {
        declaration = quote! { #declaration.with_message(#message) };
    }
    if !rule.groups.is_empty() {
        let groups = &rule.groups;
        declaration = quote! { #declaration.in_groups([#(#groups),*]) };
    }
    if !rule.payload.is_empty() {
        let payload = &rule.payload;
        declaration = quote! { #declaration.with_payload([#(#payload),*]) };
    }
    declaration
}

fn expand_accessor(ident: &Ident, name: &LitStr, is_option: bool) -> proc_macro2::TokenStream {
    if is_option {
        quote! {
            #name => self.#ident.as_ref().map(::core::convert::AsRef::<str>::as_ref),
        }
    } else {
        quote! {
            #name => ::core::option::Option::Some(::core::convert::AsRef::<str>::as_ref(&self.#ident)),
        }
    }
}

fn unwrap_option(ty: &Type) -> (bool, &Type) {
    option_inner(ty).map_or((false, ty), |inner| (true, inner))
}

fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    first_type_argument(&segment.arguments)
}

fn first_type_argument(arguments: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(args) = arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    })
}

fn is_string_like(ty: &Type) -> bool {
    match ty {
        Type::Reference(reference) => is_string_like(&reference.elem),
        Type::Path(type_path) => {
            let Some(segment) = type_path.path.segments.last() else {
                return false;
            };
            if segment.ident == "String" || segment.ident == "str" {
                return true;
            }
            if segment.ident == "Box" || segment.ident == "Cow" {
                return first_type_argument(&segment.arguments).is_some_and(is_str_type);
            }
            false
        },
        _ => false,
    }
}

fn is_str_type(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "str"),
        Type::Reference(reference) => is_str_type(&reference.elem),
        _ => false,
    }
}
