use proc_macro::TokenStream;
use proc_macro2::Ident;
use quote::{format_ident, quote_spanned};
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, LitByteStr, Token};

struct ByteTableArm {
    name: Ident,
    array: LitByteStr,
}

impl Parse for ByteTableArm {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name = input.parse::<Ident>()?;
        input.parse::<Token![=>]>()?;
        let array = input.parse::<LitByteStr>()?;
        Ok(Self { name, array })
    }
}

struct GenerateByteLookupTableInput {
    table_name: Ident,
    enum_name: Ident,
    arms: Vec<ByteTableArm>,
}

impl Parse for GenerateByteLookupTableInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.is_empty() {
            panic!("At least a name must be specified for an ascii lookup table");
        }

        let table_name = input.parse::<Ident>()?;
        input.parse::<Token![,]>()?;
        let enum_name = input.parse::<Ident>()?;
        input.parse::<Token![,]>()?;
        let arms = Punctuated::<ByteTableArm, Token![,]>::parse_terminated(input)?
            .into_iter()
            .collect();

        Ok(GenerateByteLookupTableInput {
            table_name,
            enum_name,
            arms,
        })
    }
}

/// Generate an ASCII Lookup Table where each byte given to a category is
/// marked with that category's bit. The table is assigned to a new static
/// constant with the given name, alongside an enum of categories with an
/// `is_<category>(byte)` check for each.
///
/// ```ignore
/// generate_byte_lookup_table!(WHITESPACE_BYTES, WhitespaceByte, SPACE => b" \t");
/// ```
pub fn generate_byte_lookup_table_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as GenerateByteLookupTableInput);

    // Validate that no categories overlap
    let values = &mut [0u8; 256];
    let mut enum_fields = vec![Ident::new("PLAIN", proc_macro2::Span::mixed_site())];
    let mut enum_values = vec![0];
    let mut type_value = 1;
    for ByteTableArm { name, array } in input.arms {
        let name_span = name.span();
        enum_fields.push(name);
        enum_values.push(type_value);
        for byte in array.value() {
            if values[byte as usize] != 0 {
                let char_value = char::from(byte);
                return TokenStream::from(
                    syn::Error::new(
                        name_span,
                        format!(
                            "byte '{char_value}' ({byte}) was given for two different categories"
                        ),
                    )
                    .to_compile_error(),
                );
            }
            values[byte as usize] = type_value;
        }
        type_value *= 2;
    }
    enum_fields.push(Ident::new("UNICODE", proc_macro2::Span::mixed_site()));
    enum_values.push(type_value);
    for byte in 128u8..=255 {
        values[byte as usize] = type_value;
    }

    let table_name = input.table_name;
    let enum_name = input.enum_name;
    let method_names = enum_fields
        .iter()
        .map(|field| format_ident!("is_{}", field.to_string().to_lowercase()))
        .collect::<Vec<_>>();

    let expanded = quote_spanned! { proc_macro2::Span::call_site() =>
        pub(crate) static #table_name: [u8; 256] = [#(#values),*];

        #[repr(u8)]
        #[allow(non_camel_case_types)]
        pub(crate) enum #enum_name {
            #(#enum_fields = #enum_values),*
        }

        impl #enum_name {
            #(#[inline(always)] pub(crate) fn #method_names(byte: u8) -> bool {
                #table_name[byte as usize] & #enum_values > 0u8
            })*
        }
    };

    TokenStream::from(expanded)
}
