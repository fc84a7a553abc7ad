use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, FnArg, ItemFn, PatType, ReturnType, Type};

fn formatted_arg_error_msg(arg_pos: usize, fn_name: &str) -> String {
    format!("Expected argument {} of {} to be f64", arg_pos, fn_name)
}

fn is_f64(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path.qself.is_none() && type_path.path.is_ident("f64"),
        _ => false,
    }
}

/// Declares a builtin math function.
///
/// Applied to `fn name(a: f64, ..) -> f64` with one to three parameters, keeps the
/// function as written and emits `name_entry() -> Function` wrapping it in the
/// `Function` variant matching its parameter count. `Function` must be in scope at
/// the call site.
#[proc_macro_attribute]
pub fn builtin(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &ItemFn) -> syn::Result<proc_macro2::TokenStream> {
    let fn_name = &input.sig.ident;
    let vis = &input.vis;

    for (i, arg) in input.sig.inputs.iter().enumerate() {
        match arg {
            FnArg::Typed(PatType { ty, .. }) if is_f64(ty) => {}
            _ => {
                return Err(syn::Error::new_spanned(
                    arg,
                    formatted_arg_error_msg(i, &fn_name.to_string()),
                ))
            }
        }
    }

    match &input.sig.output {
        ReturnType::Type(_, ty) if is_f64(ty) => {}
        _ => {
            return Err(syn::Error::new_spanned(
                &input.sig,
                format!("{} must return f64", fn_name),
            ))
        }
    }

    let variant = match input.sig.inputs.len() {
        1 => quote!(Unary),
        2 => quote!(Binary),
        3 => quote!(Ternary),
        n => {
            return Err(syn::Error::new_spanned(
                &input.sig,
                format!("{} takes {} arguments, builtins take 1 to 3", fn_name, n),
            ))
        }
    };

    let entry_name = format_ident!("{}_entry", fn_name);
    Ok(quote! {
        #input

        #vis fn #entry_name() -> Function {
            Function::#variant(::std::sync::Arc::new(#fn_name))
        }
    })
}
