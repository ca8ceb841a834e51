use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemFn, LitStr, ReturnType, parse_macro_input, spanned::Spanned};

/// `#[timer("scope")]` wraps the function body and emits
/// `scope: elapsed_s=<secs>` at info level once the body returns,
/// whether it succeeded or not.
pub fn timer_inner(attr: TokenStream, item: TokenStream) -> TokenStream {
    let func = parse_macro_input!(item as ItemFn);

    let label = if attr.is_empty() {
        func.sig.ident.to_string()
    } else {
        let lit = parse_macro_input!(attr as LitStr);
        lit.value()
    };

    if func.sig.asyncness.is_some() {
        return syn::Error::new(func.sig.span(), "timer does not support async functions")
            .to_compile_error()
            .into();
    }

    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = func;

    let ret = match &sig.output {
        ReturnType::Default => quote! { () },
        ReturnType::Type(_, ty) => quote! { #ty },
    };
    let label_lit = LitStr::new(&label, proc_macro2::Span::call_site());

    let expanded = quote! {
        #(#attrs)*
        #vis #sig {
            let __timer_start = std::time::Instant::now();
            #[allow(clippy::redundant_closure_call)]
            let __timer_result = (move || -> #ret #block)();
            log::info!(
                "{}: elapsed_s={:.3}",
                #label_lit,
                __timer_start.elapsed().as_secs_f64()
            );
            __timer_result
        }
    };

    TokenStream::from(expanded)
}
