use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Data, DeriveInput, Error, Field, Fields, Ident, LitInt, Result, Token, Type,
    ext::IdentExt,
    parenthesized,
    parse::{Parse, ParseStream},
    spanned::Spanned,
    token::Paren,
};

pub(crate) fn expand_from_cell(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        return Err(Error::new(
            input.span(),
            "`FromCell` may only be derived on structs.",
        ));
    };

    let Fields::Named(fields) = &data.fields else {
        return Err(Error::new(
            input.span(),
            "`FromCell` may only be derived on structs with named fields.",
        ));
    };

    let tag = input
        .attrs
        .iter()
        .find(|a| a.path().is_ident("tlb"))
        .map(|a| a.parse_args::<TagAttribute>())
        .transpose()?;

    let fields = fields
        .named
        .iter()
        .map(FieldMetadata::parse)
        .collect::<Result<Vec<_>>>()?;

    let tag_check = tag.map(|TagAttribute { tag, bits }| {
        quote! {
            let found = cell.load_uint(#bits)?;
            if found != #tag {
                return ::core::result::Result::Err(::tvm_cell::Error::TagMismatch { expected: #tag, found });
            }
        }
    });

    let assignments = fields.iter().map(|field| {
        let name = &field.name;
        let expr = field.load_expr();
        quote! { #name: #expr }
    });

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::tvm_cell::tlb::FromCell for #name #ty_generics #where_clause {
            fn load_from(
                cell: &mut ::tvm_cell::LoadCell<'_>,
            ) -> ::core::result::Result<Self, ::tvm_cell::Error> {
                // Read through a copy so a failure leaves the caller's cursor untouched.
                let mut lookahead = cell.clone();

                let value = {
                    #[allow(unused_variables)]
                    let cell = &mut lookahead;
                    #tag_check
                    Self {
                        #(#assignments,)*
                    }
                };

                *cell = lookahead;

                ::core::result::Result::Ok(value)
            }
        }
    };

    Ok(expanded.into())
}

#[derive(Debug)]
struct FieldMetadata {
    name: Ident,
    ty: Type,
    kind: FieldKind,
}

#[derive(Debug)]
enum FieldKind {
    Uint(LitInt),
    Int(LitInt),
    BigUint(LitInt),
    Coins,
    BigCoins,
    Bool,
    Bits(LitInt),
    Inline,
    Ref,
    MaybeRef,
    Rest,
    Default,
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Self> {
        let name = field
            .ident
            .clone()
            .ok_or_else(|| Error::new(field.span(), "Field must be named."))?;

        let kind = match field.attrs.iter().find(|a| a.path().is_ident("tlb")) {
            Some(attr) => attr.parse_args::<FieldKind>()?,
            None => FieldKind::Default,
        };

        Ok(Self {
            name,
            ty: field.ty.clone(),
            kind,
        })
    }

    fn load_expr(&self) -> TokenStream2 {
        let ty = &self.ty;

        match &self.kind {
            FieldKind::Uint(n) => quote! { cell.load_uint(#n)? as #ty },
            FieldKind::Int(n) => quote! { cell.load_int(#n)? as #ty },
            FieldKind::BigUint(n) => quote! { cell.load_big_int(#n)? },
            FieldKind::Coins => quote! { cell.load_coins()? },
            FieldKind::BigCoins => quote! { cell.load_big_coins()? },
            FieldKind::Bool => quote! { cell.load_bool()? },
            FieldKind::Bits(n) => quote! { cell.load_slice(#n)? },
            FieldKind::Inline => quote! {
                <#ty as ::tvm_cell::tlb::FromCell>::load_from(cell)?
            },
            FieldKind::Ref => quote! {
                <#ty as ::tvm_cell::tlb::FromCell>::load_from(&mut cell.load_ref()?)?
            },
            FieldKind::MaybeRef => quote! {
                match cell.load_maybe_ref()? {
                    ::core::option::Option::Some(mut r) => ::core::option::Option::Some(
                        ::tvm_cell::tlb::FromCell::load_from(&mut r)?,
                    ),
                    ::core::option::Option::None => ::core::option::Option::None,
                }
            },
            FieldKind::Rest => quote! { cell.rest_bits() },
            FieldKind::Default => quote! { ::core::default::Default::default() },
        }
    }
}

impl Parse for FieldKind {
    fn parse(input: ParseStream) -> Result<Self> {
        // `ref` is a keyword, so accept any identifier.
        let ident = input.call(Ident::parse_any)?;

        let width = |max: usize| -> Result<LitInt> {
            if !input.peek(Paren) {
                return Err(Error::new_spanned(
                    &ident,
                    format!("`{ident}` requires a bit width, as in `{ident}(32)`."),
                ));
            }

            let content;
            parenthesized!(content in input);
            let width = content.parse::<LitInt>()?;

            if width.base10_parse::<usize>()? > max {
                return Err(Error::new_spanned(
                    &width,
                    format!("`{ident}` supports widths of at most {max} bits."),
                ));
            }

            Ok(width)
        };

        let kind = match ident.to_string().as_str() {
            "uint" => FieldKind::Uint(width(64)?),
            "int" => FieldKind::Int(width(64)?),
            "big_uint" => FieldKind::BigUint(width(256)?),
            "bits" => FieldKind::Bits(width(1023)?),
            "coins" => FieldKind::Coins,
            "big_coins" => FieldKind::BigCoins,
            "bool" => FieldKind::Bool,
            "inline" => FieldKind::Inline,
            "ref" => FieldKind::Ref,
            "maybe_ref" => FieldKind::MaybeRef,
            "rest" => FieldKind::Rest,
            _ => Err(Error::new_spanned(
                &ident,
                "Unknown field kind; expected one of `uint`, `int`, `big_uint`, `bits`, \
                 `coins`, `big_coins`, `bool`, `inline`, `ref`, `maybe_ref` or `rest`.",
            ))?,
        };

        if !input.is_empty() {
            Err(input.error("Unexpected tokens after field kind."))?;
        }

        Ok(kind)
    }
}

#[derive(Debug)]
struct TagAttribute {
    tag: LitInt,
    bits: LitInt,
}

impl Parse for TagAttribute {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut tag = None;
        let mut bits = None;

        while !input.is_empty() {
            let key = input.parse::<Ident>()?;
            input.parse::<Token![=]>()?;
            let value = input.parse::<LitInt>()?;

            let slot = match key.to_string().as_str() {
                "tag" => &mut tag,
                "bits" => &mut bits,
                _ => Err(Error::new_spanned(
                    &key,
                    "Struct attribute accepts only `tag` and `bits`.",
                ))?,
            };

            if slot.replace(value).is_some() {
                Err(Error::new_spanned(&key, "Duplicate key."))?;
            }

            if !input.is_empty() {
                input.parse::<Token![,]>()?;
            }
        }

        let (Some(tag), Some(bits)) = (tag, bits) else {
            return Err(input.error("Struct attribute requires both `tag` and `bits`."));
        };

        let width = bits.base10_parse::<u32>()?;
        if width > 64 {
            return Err(Error::new_spanned(
                &bits,
                "`bits` supports widths of at most 64 bits.",
            ));
        }

        if width < 64 && tag.base10_parse::<u64>()? >> width != 0 {
            return Err(Error::new_spanned(
                &tag,
                format!("`tag` does not fit in {width} bits."),
            ));
        }

        Ok(Self { tag, bits })
    }
}
