use quote::quote;
use syn::{AngleBracketedGenericArguments, GenericArgument, Path, PathArguments, Type, TypePath};

pub fn inner_of_option(ty: &Type) -> Option<&Type> {
    if let Type::Path(TypePath { path, .. }) = ty {
        let is_supported_option_path = match path.segments.len() {
            1 => path.segments[0].ident == "Option",
            3 => {
                (path.segments[0].ident == "std" || path.segments[0].ident == "core")
                    && path.segments[1].ident == "option"
                    && path.segments[2].ident == "Option"
            }
            _ => false,
        };
        if !is_supported_option_path {
            return None;
        }

        if let Some(seg) = path.segments.last()
            && let PathArguments::AngleBracketed(AngleBracketedGenericArguments { args, .. }) =
                &seg.arguments
            && let Some(GenericArgument::Type(t)) = args.first()
        {
            return Some(t);
        }
    }
    None
}

/// Parse expression for one option value. `raw` and `name` are in scope at
/// the expansion site; `Option<T>` fields parse `T` and wrap it.
pub fn build_cli_parse_expr(ty: &Type, parse_with: Option<&Path>) -> proc_macro2::TokenStream {
    let (target, wrap) = match inner_of_option(ty) {
        Some(inner) => (inner, true),
        None => (ty, false),
    };

    let parsed = if let Some(parse_with) = parse_with {
        quote! { #parse_with(&raw)? }
    } else {
        quote! {
            raw.parse::<#target>()
                .map_err(|e| crate::Error::invalid_input(format!(
                    "Invalid value for --{name}: {raw} ({e})"
                )))?
        }
    };

    if wrap {
        quote! { Some(#parsed) }
    } else {
        parsed
    }
}

/// Short placeholder shown next to an option in usage text, e.g. `<usize>`.
pub fn value_hint(ty: &Type) -> String {
    let target = inner_of_option(ty).unwrap_or(ty);
    match target {
        Type::Path(TypePath { path, .. }) => path
            .segments
            .last()
            .map(|seg| {
                let ident = seg.ident.to_string();
                match ident.as_str() {
                    "String" | "PathBuf" => "path".to_string(),
                    _ => ident,
                }
            })
            .unwrap_or_else(|| "value".to_string()),
        _ => "value".to_string(),
    }
}

pub fn to_kebab_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (idx, ch) in s.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if idx != 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::{inner_of_option, to_kebab_case, value_hint};

    #[test]
    fn inner_of_option_supports_short_std_and_core_paths() {
        let short_ty: syn::Type = parse_quote!(Option<String>);
        let std_ty: syn::Type = parse_quote!(std::option::Option<u8>);
        let core_ty: syn::Type = parse_quote!(core::option::Option<bool>);
        let non_opt: syn::Type = parse_quote!(Vec<String>);

        let short_inner = inner_of_option(&short_ty).expect("expected Option inner type");
        let std_inner = inner_of_option(&std_ty).expect("expected std Option inner type");
        let core_inner = inner_of_option(&core_ty).expect("expected core Option inner type");

        assert_eq!(quote::quote!(#short_inner).to_string(), "String");
        assert_eq!(quote::quote!(#std_inner).to_string(), "u8");
        assert_eq!(quote::quote!(#core_inner).to_string(), "bool");
        assert!(inner_of_option(&non_opt).is_none());
    }

    #[test]
    fn value_hint_unwraps_options_and_names_paths() {
        let seed: syn::Type = parse_quote!(Option<u64>);
        let rate: syn::Type = parse_quote!(f64);
        let file: syn::Type = parse_quote!(String);
        let tuple: syn::Type = parse_quote!((u8, u8));

        assert_eq!(value_hint(&seed), "u64");
        assert_eq!(value_hint(&rate), "f64");
        assert_eq!(value_hint(&file), "path");
        assert_eq!(value_hint(&tuple), "value");
    }

    #[test]
    fn to_kebab_case_inserts_dashes_before_ascii_uppercase() {
        assert_eq!(to_kebab_case("NearestNeighbor"), "nearest-neighbor");
        assert_eq!(to_kebab_case("already-kebab"), "already-kebab");
        assert_eq!(to_kebab_case("X"), "x");
    }
}
