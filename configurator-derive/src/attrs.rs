//! Attribute parsing for `#[config(...)]` annotations.

use syn::{Field, LitStr};

/// Parsed `#[config(...)]` attributes from a struct field.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// Raw directive string, handed to the runtime tag parser unchanged.
    pub tag: Option<String>,

    /// Flatten the field's members into the enclosing struct.
    pub embed: bool,

    /// Leave the field out of the catalog.
    pub skip: bool,
}

impl FieldAttrs {
    /// Extract and parse `#[config(...)]` attributes from a struct field.
    ///
    /// Attributes under other paths are left for other macros.
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let mut attrs = Self::default();

        for attr in &field.attrs {
            if !attr.path().is_ident("config") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                // tag = "env,flag,default=..."
                if meta.path.is_ident("tag") {
                    let value: LitStr = meta.value()?.parse()?;
                    attrs.tag = Some(value.value());
                    return Ok(());
                }

                if meta.path.is_ident("embed") {
                    attrs.embed = true;
                    return Ok(());
                }

                if meta.path.is_ident("skip") {
                    attrs.skip = true;
                    return Ok(());
                }

                Err(meta.error("unsupported config attribute, expected `tag = \"...\"`, `embed` or `skip`"))
            })?;
        }

        Ok(attrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_parse_tag_attribute() {
        let field: Field = parse_quote! {
            #[config(tag = "env=SERVICE_PORT,default=8080")]
            pub port: u16
        };

        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert_eq!(attrs.tag.as_deref(), Some("env=SERVICE_PORT,default=8080"));
        assert!(!attrs.embed);
        assert!(!attrs.skip);
    }

    #[test]
    fn test_parse_embed() {
        let field: Field = parse_quote! {
            #[config(embed)]
            pub common: Common
        };

        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert!(attrs.embed);
        assert_eq!(attrs.tag, None);
    }

    #[test]
    fn test_parse_multiple_attributes() {
        let field: Field = parse_quote! {
            #[config(tag = "env", embed)]
            pub inner: Inner
        };

        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert_eq!(attrs.tag.as_deref(), Some("env"));
        assert!(attrs.embed);
    }

    #[test]
    fn test_parse_skip() {
        let field: Field = parse_quote! {
            #[config(skip)]
            pub cache: u8
        };

        assert!(FieldAttrs::from_field(&field).unwrap().skip);
    }

    #[test]
    fn test_other_attributes_ignored() {
        let field: Field = parse_quote! {
            #[serde(rename = "h")]
            /// Listen host
            pub host: String
        };

        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert_eq!(attrs.tag, None);
    }

    #[test]
    fn test_unknown_config_attribute_rejected() {
        let field: Field = parse_quote! {
            #[config(name = "HOST")]
            pub host: String
        };

        let err = FieldAttrs::from_field(&field).unwrap_err();
        assert!(err.to_string().contains("unsupported config attribute"));
    }

    #[test]
    fn test_non_string_tag_rejected() {
        let field: Field = parse_quote! {
            #[config(tag = 42)]
            pub host: String
        };

        assert!(FieldAttrs::from_field(&field).is_err());
    }
}
