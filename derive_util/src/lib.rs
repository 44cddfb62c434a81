#![recursion_limit = "128"]

extern crate quote;
extern crate syn;

use quote::ToTokens;

/////////////////////////////////////////// StructVisitor //////////////////////////////////////////

pub trait StructVisitor: Sized {
    type Output;

    fn visit_struct(&mut self, ty_name: &syn::Ident, ds: &syn::DataStruct) -> Self::Output {
        match ds.fields {
            syn::Fields::Named(ref fields) => self.visit_struct_named_fields(ty_name, ds, fields),
            syn::Fields::Unnamed(ref fields) => {
                self.visit_struct_unnamed_fields(ty_name, ds, fields)
            }
            syn::Fields::Unit => self.visit_struct_unit(ty_name, ds),
        }
    }

    fn visit_struct_named_fields(
        &mut self,
        _ty_name: &syn::Ident,
        _ds: &syn::DataStruct,
        _fields: &syn::FieldsNamed,
    ) -> Self::Output {
        panic!("{}", "structs with named fields are not supported");
    }

    fn visit_struct_unnamed_fields(
        &mut self,
        _ty_name: &syn::Ident,
        _ds: &syn::DataStruct,
        _fields: &syn::FieldsUnnamed,
    ) -> Self::Output {
        panic!("{}", "structs with unnamed fields are not supported");
    }

    fn visit_struct_unit(&mut self, _ty_name: &syn::Ident, _ds: &syn::DataStruct) -> Self::Output {
        panic!("{}", "unit structs are not supported");
    }
}

///////////////////////////////////////////// AttrArgs /////////////////////////////////////////////

/// AttrArgs holds the arguments of one list-style attribute such as
/// `#[path(word, key = "value", other)]`:  the bare words and the string-valued keys, each in the
/// order written.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AttrArgs {
    words: Vec<String>,
    pairs: Vec<(String, String)>,
}

impl AttrArgs {
    /// Find the first attribute named `path` among `attrs` and parse its arguments.  Returns
    /// `Ok(None)` when no attribute has that name.
    pub fn find(attrs: &[syn::Attribute], path: &str) -> Result<Option<Self>, String> {
        for attr in attrs.iter() {
            if attr.path.clone().into_token_stream().to_string() == path {
                return Self::parse(attr).map(Some);
            }
        }
        Ok(None)
    }

    /// Parse the arguments of `attr`.
    pub fn parse(attr: &syn::Attribute) -> Result<Self, String> {
        let meta = attr.parse_meta().map_err(|err| err.to_string())?;
        let meta_list = match meta {
            syn::Meta::List(ml) => ml,
            syn::Meta::Path(path) => {
                return Err(format!(
                    "expected arguments: #[{}(...)]",
                    path.into_token_stream()
                ));
            }
            syn::Meta::NameValue(nv) => {
                return Err(format!(
                    "expected arguments: #[{}(...)]",
                    nv.path.into_token_stream()
                ));
            }
        };
        let mut args = Self::default();
        for nested in meta_list.nested.iter() {
            match nested {
                syn::NestedMeta::Meta(syn::Meta::Path(path)) => {
                    args.words.push(path.into_token_stream().to_string());
                }
                syn::NestedMeta::Meta(syn::Meta::NameValue(nv)) => {
                    let key = nv.path.clone().into_token_stream().to_string();
                    let value = match &nv.lit {
                        syn::Lit::Str(s) => s.value(),
                        lit => {
                            return Err(format!(
                                "{} must be a string literal, not {}",
                                key,
                                lit.into_token_stream()
                            ));
                        }
                    };
                    if args.get(&key).is_some() {
                        return Err(format!("{} given more than once", key));
                    }
                    args.pairs.push((key, value));
                }
                other => {
                    return Err(format!("unexpected argument {}", other.into_token_stream()));
                }
            }
        }
        Ok(args)
    }

    /// True if `word` appeared bare.
    pub fn has(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// The value given for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Fail on any word or key not in the allowed lists.
    pub fn only(&self, words: &[&str], keys: &[&str]) -> Result<(), String> {
        for word in self.words.iter() {
            if !words.contains(&word.as_str()) {
                return Err(format!("unknown word {:?}", word));
            }
        }
        for (key, _) in self.pairs.iter() {
            if !keys.contains(&key.as_str()) {
                return Err(format!("unknown key {:?}", key));
            }
        }
        Ok(())
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////

#[cfg(test)]
mod structs {
    use std::str::FromStr;

    use proc_macro2::TokenStream;
    use syn::DeriveInput;

    use super::*;

    struct FieldNames {}

    impl StructVisitor for FieldNames {
        type Output = Vec<String>;

        fn visit_struct_named_fields(
            &mut self,
            _ty_name: &syn::Ident,
            _ds: &syn::DataStruct,
            fields: &syn::FieldsNamed,
        ) -> Self::Output {
            fields
                .named
                .iter()
                .map(|f| f.ident.as_ref().unwrap().to_string())
                .collect()
        }
    }

    fn visit(input: &str) -> Vec<String> {
        let token_stream = TokenStream::from_str(input).unwrap();
        let input: DeriveInput = syn::parse2(token_stream).unwrap();
        let mut visitor = FieldNames {};
        match input.data {
            syn::Data::Struct(ref ds) => visitor.visit_struct(&input.ident, ds),
            _ => {
                panic!("did not expect an enum or union");
            }
        }
    }

    #[test]
    fn named_fields() {
        assert_eq!(vec!["x", "y"], visit("struct NamedFields { x: u16, y: String }"));
    }

    #[test]
    #[should_panic]
    fn unnamed_fields() {
        visit("struct UnnamedFields(u16, u32, u64);");
    }

    #[test]
    #[should_panic]
    fn unit() {
        visit("struct Unit;");
    }
}
