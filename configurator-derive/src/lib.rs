//! Derive macro implementation for configurator

use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Visibility};

mod attrs;

use attrs::FieldAttrs;

/// `Configure` derive macro
///
/// Implements `configurator::Configure` and `configurator::Bindable` so the
/// struct can be cataloged, either as the root or as a nested field.
///
/// Only fields with a `pub` (or restricted `pub(...)`) visibility are listed.
///
/// # Supported Attributes
///
/// **Field-level**:
/// - `#[config(tag = "env,flag,default=value")]`: directive string
/// - `#[config(embed)]`: flatten a struct field into the enclosing struct
/// - `#[config(skip)]`: never catalog this field
///
/// # Example
///
/// See the `configurator` crate documentation for usage examples.
#[proc_macro_derive(Configure, attributes(config))]
pub fn derive_configure(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;
    let type_name = struct_name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    if let Some(attr) = input.attrs.iter().find(|a| a.path().is_ident("config")) {
        return Err(syn::Error::new_spanned(
            attr,
            "Configure has no struct-level attributes; annotate fields instead",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            Fields::Unit => return Ok(empty_impls(input)),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Configure only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Configure only supports structs",
            ));
        }
    };

    let mut bindings = Vec::new();
    let mut slots = Vec::new();

    for field in fields {
        let attrs = FieldAttrs::from_field(field)?;
        if attrs.skip || matches!(field.vis, Visibility::Inherited) {
            continue;
        }

        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let name = ident.unraw().to_string();
        let tag = attrs.tag.unwrap_or_default();
        let embedded = attrs.embed;

        bindings.push(ident);
        slots.push(quote! {
            ::configurator::FieldSlot {
                name: #name,
                tag: #tag,
                embedded: #embedded,
                value: #ident,
            }
        });
    }

    let bindable = bindable_impl(input, &type_name);

    Ok(quote! {
        impl #impl_generics ::configurator::Configure for #struct_name #ty_generics #where_clause {
            fn fields(&mut self) -> ::std::vec::Vec<::configurator::FieldSlot<'_>> {
                let Self { #(#bindings,)* .. } = self;
                ::std::vec![#(#slots),*]
            }
        }

        #bindable
    })
}

fn bindable_impl(input: &DeriveInput, type_name: &str) -> proc_macro2::TokenStream {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    quote! {
        impl #impl_generics ::configurator::Bindable for #struct_name #ty_generics #where_clause {
            fn declared() -> ::configurator::DeclaredType {
                ::configurator::DeclaredType::Struct(#type_name)
            }

            fn declared_type(&self) -> ::configurator::DeclaredType {
                ::configurator::DeclaredType::Struct(#type_name)
            }

            fn shape(&mut self) -> ::configurator::Shape<'_> {
                ::configurator::Shape::Struct(self)
            }
        }
    }
}

fn empty_impls(input: &DeriveInput) -> proc_macro2::TokenStream {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let bindable = bindable_impl(input, &struct_name.to_string());

    quote! {
        impl #impl_generics ::configurator::Configure for #struct_name #ty_generics #where_clause {
            fn fields(&mut self) -> ::std::vec::Vec<::configurator::FieldSlot<'_>> {
                ::std::vec::Vec::new()
            }
        }

        #bindable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expand_err(input: DeriveInput) -> String {
        expand(&input).unwrap_err().to_string()
    }

    #[test]
    fn test_struct_level_attribute_rejected() {
        let input: DeriveInput = parse_quote! {
            #[config(tag = "env")]
            pub struct Config {
                pub host: String,
            }
        };

        assert_eq!(
            expand_err(input),
            "Configure has no struct-level attributes; annotate fields instead"
        );
    }

    #[test]
    fn test_tuple_struct_rejected() {
        let input: DeriveInput = parse_quote! {
            pub struct Port(pub u16);
        };

        assert_eq!(
            expand_err(input),
            "Configure only supports structs with named fields"
        );
    }

    #[test]
    fn test_enum_rejected() {
        let input: DeriveInput = parse_quote! {
            pub enum Mode {
                Fast,
                Slow,
            }
        };

        assert_eq!(expand_err(input), "Configure only supports structs");
    }

    #[test]
    fn test_unknown_field_attribute_rejected() {
        let input: DeriveInput = parse_quote! {
            pub struct Config {
                #[config(rename = "x")]
                pub host: String,
            }
        };

        assert!(expand_err(input).starts_with("unsupported config attribute"));
    }

    #[test]
    fn test_private_and_skipped_fields_get_no_slot() {
        let input: DeriveInput = parse_quote! {
            pub struct Config {
                #[config(tag = "env")]
                pub host: String,
                secret: String,
                #[config(skip)]
                pub cache: u8,
            }
        };

        let tokens = expand(&input).unwrap().to_string();
        assert!(tokens.contains("\"host\""));
        assert!(!tokens.contains("\"secret\""));
        assert!(!tokens.contains("\"cache\""));
    }
}
