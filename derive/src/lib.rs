use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod from_cell;

#[proc_macro_derive(FromCell, attributes(tlb))]
pub fn derive_from_cell(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match from_cell::expand_from_cell(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error().into(),
    }
}
