use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{Data, DeriveInput, Fields, LitStr, Token, parse_macro_input};

/// Derives the `NameTable` trait for enums.
///
/// Each variant may carry a `#[names(...)]` attribute listing the wire names
/// that resolve to it. The first name is the canonical one; the rest are
/// aliases. Variants without the attribute use their identifier as the only
/// name.
///
/// # Example
///
/// ```ignore
/// use x4_vcom_macros::NameTable;
///
/// #[derive(Copy, Clone, PartialEq, Eq, NameTable)]
/// pub enum Variable {
///     #[names("DACMin", "dac_min")]
///     DacMin,
///     #[names("prf_div")]
///     PrfDiv,
/// }
/// ```
///
/// This generates:
///
/// ```ignore
/// impl NameTable for Variable {
///     const ALL: &'static [Self] = &[Self::DacMin, Self::PrfDiv];
///     const NAMES: &'static [&'static str] = &["DACMin", "dac_min", "prf_div"];
///
///     fn from_name(name: &str) -> Option<Self> {
///         match name {
///             "DACMin" | "dac_min" => Some(Self::DacMin),
///             "prf_div" => Some(Self::PrfDiv),
///             _ => None,
///         }
///     }
///
///     fn names(&self) -> &'static [&'static str] {
///         match self {
///             Self::DacMin => &["DACMin", "dac_min"],
///             Self::PrfDiv => &["prf_div"],
///         }
///     }
/// }
/// ```
///
/// # Requirements
///
/// - The type must be an enum
/// - All variants must be unit variants (no fields)
/// - A name may appear only once across the whole enum
#[proc_macro_derive(NameTable, attributes(names))]
pub fn derive_name_table(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    let variants = match &input.data {
        Data::Enum(data_enum) => &data_enum.variants,
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "NameTable can only be derived for enums",
            ));
        }
    };

    // (variant ident, wire names) in declaration order
    let mut table = Vec::with_capacity(variants.len());
    let mut seen: Vec<String> = Vec::new();

    for variant in variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "NameTable can only be derived for enums with unit variants (no fields)",
            ));
        }

        let mut names: Vec<LitStr> = Vec::new();
        for attr in &variant.attrs {
            if attr.path().is_ident("names") {
                let list =
                    attr.parse_args_with(Punctuated::<LitStr, Token![,]>::parse_terminated)?;
                names.extend(list);
            }
        }

        if names.is_empty() {
            names.push(LitStr::new(&variant.ident.to_string(), variant.ident.span()));
        }

        for lit in &names {
            let value = lit.value();
            if seen.contains(&value) {
                return Err(syn::Error::new_spanned(
                    lit,
                    format!("duplicate name \"{}\" in NameTable", value),
                ));
            }
            seen.push(value);
        }

        table.push((&variant.ident, names));
    }

    let all = table.iter().map(|(ident, _)| quote! { Self::#ident });

    let every_name = table.iter().flat_map(|(_, names)| names.iter());

    let from_name_arms = table.iter().map(|(ident, names)| {
        quote! {
            #(#names)|* => Some(Self::#ident)
        }
    });

    let names_arms = table.iter().map(|(ident, names)| {
        quote! {
            Self::#ident => &[#(#names),*]
        }
    });

    let expanded = quote! {
        impl ::x4_vcom::names::NameTable for #name {
            const ALL: &'static [Self] = &[#(#all),*];

            const NAMES: &'static [&'static str] = &[#(#every_name),*];

            fn from_name(name: &str) -> Option<Self> {
                match name {
                    #(#from_name_arms,)*
                    _ => None,
                }
            }

            fn names(&self) -> &'static [&'static str] {
                match self {
                    #(#names_arms,)*
                }
            }
        }
    };

    Ok(expanded)
}
