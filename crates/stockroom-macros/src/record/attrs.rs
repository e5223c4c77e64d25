//! Parsing of the `#[record(...)]` field attribute.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Ident, Lit, Meta, Result, Token,
};

/// How a field is exposed to the list pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `#[record(Text)]`
    Text,
    /// `#[record(Number)]`
    Number,
    /// `#[record(Date)]`
    Date,
    /// `#[record(Bool)]`
    Bool,
}

impl FieldKind {
    pub fn from_ident(ident: &Ident) -> Result<Self> {
        match ident.to_string().as_str() {
            "Text" | "text" | "String" => Ok(FieldKind::Text),
            "Number" | "number" => Ok(FieldKind::Number),
            "Date" | "date" => Ok(FieldKind::Date),
            "Bool" | "boolean" => Ok(FieldKind::Bool),
            other => Err(Error::new(
                ident.span(),
                format!(
                    "unknown record kind: '{}'. Expected one of: Text, Number, Date, Bool",
                    other
                ),
            )),
        }
    }
}

/// Field-level attributes from `#[record(...)]`.
#[derive(Debug, Clone)]
pub struct RecordAttr {
    pub kind: Option<FieldKind>,
    pub skip: bool,
    /// The field is `Option<_>`; `None` reads as a missing value.
    pub optional: bool,
    pub rename: Option<String>,
    pub span: Span,
}

impl Default for RecordAttr {
    fn default() -> Self {
        RecordAttr {
            kind: None,
            skip: false,
            optional: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

impl Parse for RecordAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = RecordAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) => {
                    if p.is_ident("skip") {
                        attr.skip = true;
                    } else if p.is_ident("optional") {
                        attr.optional = true;
                    } else if let Some(ident) = p.get_ident() {
                        if attr.kind.is_some() {
                            return Err(Error::new(ident.span(), "record kind given twice"));
                        }
                        attr.kind = Some(FieldKind::from_ident(ident)?);
                        attr.span = ident.span();
                    } else {
                        return Err(Error::new(
                            p.span(),
                            "expected record kind: Text, Number, Date, Bool, optional, or skip",
                        ));
                    }
                }

                Meta::NameValue(nv) => {
                    if !nv.path.is_ident("rename") {
                        return Err(Error::new(
                            nv.path.span(),
                            "unknown attribute. Expected: rename",
                        ));
                    }
                    match &nv.value {
                        syn::Expr::Lit(syn::ExprLit {
                            lit: Lit::Str(s), ..
                        }) if !s.value().is_empty() => attr.rename = Some(s.value()),
                        other => {
                            return Err(Error::new(
                                other.span(),
                                "rename must be a non-empty string literal",
                            ))
                        }
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown record attribute. Expected: Text, Number, Date, Bool, optional, skip, or rename = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Extract the `#[record(...)]` attribute from a field's attributes.
pub fn parse_record_attrs(attrs: &[Attribute]) -> Result<RecordAttr> {
    for attr in attrs {
        if attr.path().is_ident("record") {
            return attr.parse_args::<RecordAttr>();
        }
    }
    Ok(RecordAttr::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_record(tokens: &str) -> Result<RecordAttr> {
        syn::parse_str::<RecordAttr>(tokens)
    }

    #[test]
    fn test_record_text() {
        let attr = parse_record("Text").unwrap();
        assert_eq!(attr.kind, Some(FieldKind::Text));
        assert!(!attr.skip);
        assert!(!attr.optional);
    }

    #[test]
    fn test_record_lowercase_aliases() {
        assert_eq!(parse_record("text").unwrap().kind, Some(FieldKind::Text));
        assert_eq!(parse_record("number").unwrap().kind, Some(FieldKind::Number));
        assert_eq!(parse_record("date").unwrap().kind, Some(FieldKind::Date));
        // `bool` is a keyword, so the lowercase alias is spelled out
        assert_eq!(parse_record("boolean").unwrap().kind, Some(FieldKind::Bool));
    }

    #[test]
    fn test_record_date_optional() {
        let attr = parse_record("Date, optional").unwrap();
        assert_eq!(attr.kind, Some(FieldKind::Date));
        assert!(attr.optional);
    }

    #[test]
    fn test_record_skip() {
        let attr = parse_record("skip").unwrap();
        assert!(attr.skip);
        assert_eq!(attr.kind, None);
    }

    #[test]
    fn test_record_rename() {
        let attr = parse_record(r#"Number, rename = "buyingPrice""#).unwrap();
        assert_eq!(attr.kind, Some(FieldKind::Number));
        assert_eq!(attr.rename, Some("buyingPrice".to_string()));
    }

    #[test]
    fn test_record_empty_rename() {
        let err = parse_record(r#"Text, rename = """#).unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn test_record_invalid_kind() {
        let err = parse_record("Timestamp").unwrap_err();
        assert!(err.to_string().contains("unknown record kind"));
    }

    #[test]
    fn test_record_kind_twice() {
        let err = parse_record("Text, Number").unwrap_err();
        assert!(err.to_string().contains("twice"));
    }

    #[test]
    fn test_unknown_name_value() {
        assert!(parse_record(r#"Text, alias = "x""#).is_err());
    }
}
