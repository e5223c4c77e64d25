//! Code generation for `#[derive(Record)]`.
//!
//! Emits field name constants, a `FIELDS` slice and the
//! `stockroom_query::Record` impl for a struct with named fields.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Ident, Result};

use super::attrs::{parse_record_attrs, FieldKind};

pub fn record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Record can only be derived for structs",
            ))
        }
    };

    let mut field_matches: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut query_names: Vec<String> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_record_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        let kind = match attrs.kind {
            Some(k) => k,
            None if attrs.optional || attrs.rename.is_some() => {
                return Err(Error::new(
                    field.span(),
                    "record field needs a kind: Text, Number, Date or Bool",
                ))
            }
            None => continue,
        };

        let query_name = attrs.rename.unwrap_or_else(|| field_name.to_string());
        if query_names.contains(&query_name) {
            return Err(Error::new(
                attrs.span,
                format!("duplicate record field name '{}'", query_name),
            ));
        }

        let const_name = format_ident!("{}", to_screaming_snake_case(&query_name));
        if const_name == "FIELDS" {
            return Err(Error::new(
                attrs.span,
                "record field name 'fields' collides with the generated FIELDS constant; use rename",
            ));
        }

        field_constants.push(quote! {
            /// Field name for list queries.
            pub const #const_name: &'static str = #query_name;
        });

        let value_expr = value_expr(field_name, kind, attrs.optional);
        field_matches.push(quote! {
            #query_name => #value_expr,
        });
        query_names.push(query_name);
    }

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*

            /// Every queryable field name, in declaration order.
            pub const FIELDS: &'static [&'static str] = &[#(#query_names),*];
        }

        impl #impl_generics ::stockroom_query::Record for #struct_name #ty_generics #where_clause {
            fn field_value(&self, field: &str) -> ::stockroom_query::Value<'_> {
                match field {
                    #(#field_matches)*
                    _ => ::stockroom_query::Value::None,
                }
            }

            fn field_names() -> ::core::option::Option<&'static [&'static str]> {
                ::core::option::Option::Some(Self::FIELDS)
            }
        }
    };

    Ok(expanded)
}

fn value_expr(field: &Ident, kind: FieldKind, optional: bool) -> TokenStream {
    match (kind, optional) {
        (FieldKind::Text, false) => quote! {
            ::stockroom_query::Value::Text(::core::convert::AsRef::<str>::as_ref(&self.#field))
        },
        (FieldKind::Text, true) => quote! {
            ::stockroom_query::Value::from(
                self.#field
                    .as_ref()
                    .map(|v| ::core::convert::AsRef::<str>::as_ref(v))
            )
        },
        (FieldKind::Number, false) => quote! {
            ::stockroom_query::Value::Number(::stockroom_query::Number::from(self.#field))
        },
        (FieldKind::Number, true) => quote! {
            ::stockroom_query::Value::from(self.#field.map(::stockroom_query::Number::from))
        },
        (FieldKind::Date, false) => quote! {
            ::stockroom_query::Value::from(
                ::stockroom_query::RecordDate::record_date(&self.#field)
            )
        },
        (FieldKind::Date, true) => quote! {
            ::stockroom_query::Value::from(
                self.#field
                    .as_ref()
                    .and_then(|v| ::stockroom_query::RecordDate::record_date(v))
            )
        },
        (FieldKind::Bool, false) => quote! {
            ::stockroom_query::Value::Bool(self.#field)
        },
        (FieldKind::Bool, true) => quote! {
            ::stockroom_query::Value::from(self.#field)
        },
    }
}

/// Convert a field name to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' || c == '.' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = c.is_alphanumeric();
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screaming_snake_case() {
        assert_eq!(to_screaming_snake_case("name"), "NAME");
        assert_eq!(to_screaming_snake_case("buying_price"), "BUYING_PRICE");
        assert_eq!(to_screaming_snake_case("buyingPrice"), "BUYING_PRICE");
        assert_eq!(to_screaming_snake_case("productId"), "PRODUCT_ID");
        assert_eq!(to_screaming_snake_case("seller.name"), "SELLER_NAME");
        assert_eq!(to_screaming_snake_case("my-field"), "MY_FIELD");
    }

    #[test]
    fn rejects_enums() {
        let input: DeriveInput = syn::parse_quote! {
            enum Status { Open, Closed }
        };
        let err = record_derive_impl(input).unwrap_err();
        assert!(err.to_string().contains("structs"));
    }

    #[test]
    fn rejects_duplicate_names() {
        let input: DeriveInput = syn::parse_quote! {
            struct Product {
                #[record(Text)]
                name: String,
                #[record(Text, rename = "name")]
                title: String,
            }
        };
        let err = record_derive_impl(input).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn rename_without_kind_is_an_error() {
        let input: DeriveInput = syn::parse_quote! {
            struct Product {
                #[record(rename = "productId")]
                product_id: String,
            }
        };
        assert!(record_derive_impl(input).is_err());
    }

    #[test]
    fn generates_constants_and_impl() {
        let input: DeriveInput = syn::parse_quote! {
            struct Product {
                #[record(Text, rename = "productId")]
                product_id: String,
                #[record(Number, optional)]
                quantity: Option<u32>,
                note: String,
            }
        };
        let out = record_derive_impl(input).unwrap().to_string();
        assert!(out.contains("PRODUCT_ID"));
        assert!(out.contains("QUANTITY"));
        assert!(!out.contains("NOTE"));
        assert!(out.contains("FIELDS"));
        assert!(out.contains("Record for Product"));
    }
}
