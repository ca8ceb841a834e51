use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, LitStr, Variant, spanned::Spanned};

use crate::utils;

/// One unit variant with its canonical spelling first, then any aliases.
struct Spelled {
    ident: Ident,
    spellings: Vec<String>,
}

impl Spelled {
    fn canonical(&self) -> &str {
        &self.spellings[0]
    }
}

pub fn derive_cli_value_inner(item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as DeriveInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let enum_ident = input.ident;
    let Data::Enum(data_enum) = input.data else {
        return Err(syn::Error::new(
            enum_ident.span(),
            "CliValue can only be derived for enums",
        ));
    };

    let option = option_name(&input.attrs)?
        .unwrap_or_else(|| utils::to_kebab_case(&enum_ident.to_string()));
    let variants = data_enum
        .variants
        .into_iter()
        .map(spelled_variant)
        .collect::<syn::Result<Vec<_>>>()?;

    let idents: Vec<&Ident> = variants.iter().map(|v| &v.ident).collect();
    let canonicals: Vec<LitStr> = variants.iter().map(|v| lit(v.canonical())).collect();
    let (table_words, table_idents): (Vec<LitStr>, Vec<&Ident>) = variants
        .iter()
        .flat_map(|v| v.spellings.iter().map(move |s| (lit(s), &v.ident)))
        .unzip();

    let expected = lit(&variants
        .iter()
        .map(Spelled::canonical)
        .collect::<Vec<_>>()
        .join("|"));
    let option = lit(&option);

    Ok(quote! {
        impl #enum_ident {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[#(Self::#idents),*];

            const SPELLINGS: &'static [(&'static str, Self)] =
                &[#((#table_words, Self::#table_idents)),*];

            /// Case-insensitive lookup over canonical names and aliases.
            pub fn parse(raw: &str) -> crate::Result<Self> {
                Self::SPELLINGS
                    .iter()
                    .find(|(word, _)| word.eq_ignore_ascii_case(raw))
                    .map(|&(_, value)| value)
                    .ok_or_else(|| {
                        crate::Error::invalid_input(format!(
                            "Invalid value for --{}: {} (expected {})",
                            #option, raw, #expected
                        ))
                    })
            }

            pub const fn as_str(&self) -> &'static str {
                match self {
                    #(Self::#idents => #canonicals,)*
                }
            }
        }

        impl std::fmt::Display for #enum_ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    })
}

fn lit(value: &str) -> LitStr {
    LitStr::new(value, Span::call_site())
}

/// `#[cli_value(option = "...")]` on the enum, naming the flag in errors.
fn option_name(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut option = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("cli_value")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("option") {
                option = Some(meta.value()?.parse::<LitStr>()?.value());
                Ok(())
            } else {
                Err(meta.error("unsupported cli_value attribute; expected option = \"...\""))
            }
        })?;
    }
    Ok(option)
}

fn spelled_variant(variant: Variant) -> syn::Result<Spelled> {
    if !matches!(variant.fields, Fields::Unit) {
        return Err(syn::Error::new(
            variant.span(),
            "CliValue only supports enums with unit variants",
        ));
    }

    let mut name = None;
    let mut aliases = Vec::new();
    for attr in variant.attrs.iter().filter(|a| a.path().is_ident("cli")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                name = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("alias") {
                aliases.push(meta.value()?.parse::<LitStr>()?.value());
            } else {
                return Err(meta.error("unsupported cli attribute; expected name/alias"));
            }
            Ok(())
        })?;
    }

    let canonical = name.unwrap_or_else(|| utils::to_kebab_case(&variant.ident.to_string()));
    let mut spellings = vec![canonical];
    spellings.extend(aliases);
    Ok(Spelled {
        ident: variant.ident,
        spellings,
    })
}
