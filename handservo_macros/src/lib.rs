use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, FnArg, ItemFn, PatType, Type};

fn unsupported(span: proc_macro2::Span, message: &str) -> TokenStream {
    syn::Error::new(span, message).to_compile_error().into()
}

/// Turns a built-in formula function into the positional form the evaluator calls.
///
/// The first parameter receives the evaluation context unchanged. Every other
/// parameter must be `f64` and is taken, in order, from the evaluated call
/// arguments. The generated function rejects calls with the wrong number of
/// arguments before the body runs:
///
/// ```ignore
/// #[formula_fn("distance")]
/// fn distance(ctx: &EvalContext<'_>, a: f64, b: f64) -> Result<f64, EvaluationError> { .. }
/// // becomes
/// pub fn distance(ctx: &EvalContext<'_>, args: &[f64]) -> Result<f64, EvaluationError>
/// ```
///
/// The optional string literal is the name the function is known by inside
/// formulas; it defaults to the Rust identifier.
#[proc_macro_attribute]
pub fn formula_fn(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    let fn_name = &input.sig.ident;
    let fn_attrs = &input.attrs;
    let fn_vis = &input.vis;
    let fn_body = &input.block;
    let fn_output = &input.sig.output;

    let formula_name = if attr.is_empty() {
        fn_name.to_string()
    } else {
        parse_macro_input!(attr as syn::LitStr).value()
    };

    let mut inputs = input.sig.inputs.iter();
    let context_arg = match inputs.next() {
        Some(FnArg::Typed(arg)) => arg.clone(),
        _ => {
            return unsupported(
                fn_name.span(),
                "formula functions take the evaluation context as their first argument",
            )
        }
    };

    let mut arg_extractions = Vec::new();
    for (i, arg) in inputs.enumerate() {
        let FnArg::Typed(PatType { pat, ty, .. }) = arg else {
            return unsupported(fn_name.span(), "methods cannot be formula functions");
        };
        let arg_name = match **pat {
            syn::Pat::Ident(ref ident) => &ident.ident,
            _ => return unsupported(fn_name.span(), "unsupported argument pattern"),
        };
        let is_f64 = match **ty {
            Type::Path(ref type_path) => type_path
                .path
                .segments
                .last()
                .map(|segment| segment.ident == "f64")
                .unwrap_or(false),
            _ => false,
        };
        if !is_f64 {
            return unsupported(arg_name.span(), "formula function arguments must be f64");
        }
        arg_extractions.push(quote! {
            let #arg_name: f64 = args[#i];
        });
    }

    let args_len = arg_extractions.len();
    let expanded = quote! {
        #(#fn_attrs)*
        #fn_vis fn #fn_name(#context_arg, args: &[f64]) #fn_output {
            if args.len() != #args_len {
                return Err(crate::error::EvaluationError::ArgumentCount {
                    function: #formula_name.to_string(),
                    expected: #args_len,
                    found: args.len(),
                });
            }

            #(#arg_extractions)*

            #fn_body
        }
    };

    TokenStream::from(expanded)
}
