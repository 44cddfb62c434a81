//! See bindarg for a description of this crate.

#![recursion_limit = "128"]

extern crate proc_macro;
#[macro_use]
extern crate quote;
extern crate syn;

use proc_macro2::TokenStream;
use syn::{parse_macro_input, DeriveInput};

use derive_util::{AttrArgs, StructVisitor};

////////////////////////////////////////// #[derive(Bind)] /////////////////////////////////////////

#[proc_macro_derive(Bind, attributes(bindarg))]
pub fn derive_bind(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    // `ty_name` holds the type's identifier.
    let ty_name = input.ident;
    // Break out for templating purposes.
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let data = match input.data {
        syn::Data::Struct(ref ds) => ds,
        syn::Data::Enum(_) => {
            panic!("enums are not supported");
        }
        syn::Data::Union(_) => {
            panic!("unions are not supported");
        }
    };

    let mut bv = BindVisitor {};
    let (fields, bind) = bv.visit_struct(&ty_name, data);

    let gen = quote! {
        impl #impl_generics ::bindarg::Bind for #ty_name #ty_generics #where_clause {
            fn bind<'__bindarg>(
                &'__bindarg mut self,
                __binder: &mut ::bindarg::Binder<'__bindarg>,
            ) {
                let Self { #(#fields,)* .. } = self;
                #bind
            }
        }
    };
    gen.into()
}

//////////////////////////////////////////// BindVisitor ///////////////////////////////////////////

struct BindVisitor {}

impl StructVisitor for BindVisitor {
    type Output = (Vec<syn::Ident>, TokenStream);

    fn visit_struct_named_fields(
        &mut self,
        _ty_name: &syn::Ident,
        _ds: &syn::DataStruct,
        fields: &syn::FieldsNamed,
    ) -> Self::Output {
        let mut idents = Vec::new();
        let mut bind = TokenStream::default();
        // Flattened declarations follow the struct's own.
        let mut nested = TokenStream::default();
        for field in fields.named.iter() {
            let field_ident = match &field.ident {
                Some(field_ident) => field_ident,
                None => continue,
            };
            let field_name = field_ident.to_string().trim_start_matches("r#").to_string();
            let field_meta = match parse_meta(&field_name, &field.attrs) {
                Some(field_meta) => field_meta,
                None => {
                    continue;
                }
            };
            idents.push(field_ident.clone());
            match field_meta {
                FieldMeta::Option {
                    name,
                    alias,
                    meta_name,
                    usage,
                    required,
                } => {
                    bind = quote! {
                        #bind
                        __binder.option(
                            #field_name,
                            ::bindarg::OptionSpec {
                                name: #name.to_string(),
                                alias: #alias.to_string(),
                                meta_name: #meta_name.to_string(),
                                usage: #usage.to_string(),
                                required: #required,
                            },
                            #field_ident,
                        );
                    };
                }
                FieldMeta::Arguments {
                    meta_name,
                    required,
                } => {
                    bind = quote! {
                        #bind
                        __binder.arguments(
                            #field_name,
                            ::bindarg::ArgumentsSpec {
                                meta_name: #meta_name.to_string(),
                                required: #required,
                            },
                            #field_ident,
                        );
                    };
                }
                FieldMeta::Flatten => {
                    nested = quote! {
                        #nested
                        __binder.nested(#field_ident);
                    };
                }
            }
        }
        (
            idents,
            quote! {
                #bind
                #nested
            },
        )
    }
}

//////////////////////////////////////////// attributes ////////////////////////////////////////////

const USAGE: &str = "must provide attributes of the form `bindarg(option, name = \"...\")`, \
                     `bindarg(arguments)`, or `bindarg(flatten)`";
const META_PATH: &str = "bindarg";

#[derive(Debug, Eq, PartialEq)]
enum FieldMeta {
    Option {
        name: String,
        alias: String,
        meta_name: String,
        usage: String,
        required: bool,
    },
    Arguments {
        meta_name: String,
        required: bool,
    },
    Flatten,
}

fn parse_meta(field_name: &str, attrs: &[syn::Attribute]) -> Option<FieldMeta> {
    let args = match AttrArgs::find(attrs, META_PATH) {
        Ok(Some(args)) => args,
        Ok(None) => {
            return None;
        }
        Err(err) => {
            panic!("field {}: {}; {}", field_name, err, USAGE);
        }
    };
    let kinds = ["option", "arguments", "flatten"];
    let found: Vec<&str> = kinds.iter().copied().filter(|k| args.has(k)).collect();
    if found.len() != 1 {
        panic!("field {}: {}", field_name, USAGE);
    }
    let checked = match found[0] {
        "option" => args.only(
            &["option", "required"],
            &["name", "alias", "meta_name", "usage"],
        ),
        "arguments" => args.only(&["arguments", "required"], &["meta_name"]),
        _ => args.only(&["flatten"], &[]),
    };
    if let Err(err) = checked {
        panic!("field {}: {}; {}", field_name, err, USAGE);
    }
    let text = |key: &str| args.get(key).unwrap_or("").to_string();
    let meta = match found[0] {
        "option" => {
            if args.get("name").is_none() {
                panic!("option name for field {} is required.", field_name);
            }
            FieldMeta::Option {
                name: text("name"),
                alias: text("alias"),
                meta_name: text("meta_name"),
                usage: text("usage"),
                required: args.has("required"),
            }
        }
        "arguments" => FieldMeta::Arguments {
            meta_name: text("meta_name"),
            required: args.has("required"),
        },
        _ => FieldMeta::Flatten,
    };
    Some(meta)
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn metas(input: &str) -> Vec<Option<FieldMeta>> {
        let token_stream = TokenStream::from_str(input).unwrap();
        let input: DeriveInput = syn::parse2(token_stream).unwrap();
        match input.data {
            syn::Data::Struct(syn::DataStruct {
                fields: syn::Fields::Named(fields),
                ..
            }) => fields
                .named
                .iter()
                .map(|f| parse_meta(&f.ident.as_ref().unwrap().to_string(), &f.attrs))
                .collect(),
            _ => panic!("expected a struct with named fields"),
        }
    }

    #[test]
    fn all_kinds() {
        let got = metas(
            r#"struct S {
                #[bindarg(option, name = "string", alias = "s", meta_name = "str",
                          usage = "string option.")]
                string: String,
                #[bindarg(option, name = "opti", required)]
                integer: i32,
                #[bindarg(arguments, meta_name = "args", required)]
                args: Vec<String>,
                #[bindarg(flatten)]
                base: Base,
                plain: u64,
            }"#,
        );
        assert_eq!(
            vec![
                Some(FieldMeta::Option {
                    name: "string".to_string(),
                    alias: "s".to_string(),
                    meta_name: "str".to_string(),
                    usage: "string option.".to_string(),
                    required: false,
                }),
                Some(FieldMeta::Option {
                    name: "opti".to_string(),
                    alias: String::new(),
                    meta_name: String::new(),
                    usage: String::new(),
                    required: true,
                }),
                Some(FieldMeta::Arguments {
                    meta_name: "args".to_string(),
                    required: true,
                }),
                Some(FieldMeta::Flatten),
                None,
            ],
            got
        );
    }

    #[test]
    fn empty_name_passes_through() {
        let got = metas(r#"struct S { #[bindarg(option, name = "")] a: String }"#);
        assert!(matches!(&got[0], Some(FieldMeta::Option { name, .. }) if name.is_empty()));
    }

    #[test]
    #[should_panic(expected = "option name for field a is required.")]
    fn missing_name() {
        metas(r#"struct S { #[bindarg(option, alias = "x")] a: String }"#);
    }

    #[test]
    #[should_panic]
    fn two_kinds() {
        metas(r#"struct S { #[bindarg(option, arguments, name = "a")] a: Vec<String> }"#);
    }

    #[test]
    #[should_panic]
    fn unknown_key() {
        metas(r#"struct S { #[bindarg(arguments, alias = "a")] a: Vec<String> }"#);
    }

    #[test]
    fn expansion_orders_flatten_last() {
        let input: DeriveInput = syn::parse2(
            TokenStream::from_str(
                r#"struct S {
                    #[bindarg(flatten)]
                    base: Base,
                    #[bindarg(option, name = "x")]
                    x: bool,
                }"#,
            )
            .unwrap(),
        )
        .unwrap();
        let ds = match input.data {
            syn::Data::Struct(ref ds) => ds,
            _ => panic!("expected a struct"),
        };
        let (idents, bind) = BindVisitor {}.visit_struct(&input.ident, ds);
        assert_eq!(
            vec!["base", "x"],
            idents.iter().map(|i| i.to_string()).collect::<Vec<_>>()
        );
        let bind = bind.to_string();
        let option = bind.find("__binder . option").unwrap();
        let nested = bind.find("__binder . nested").unwrap();
        assert!(option < nested);
    }
}
