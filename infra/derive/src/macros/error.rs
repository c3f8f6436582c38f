use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    Attribute, Data, DeriveInput, Field, Fields, FieldsNamed, GenericArgument, Ident,
    PathArguments, PathSegment, Type, Variant,
};

const INTERNAL_VARIANT: &str = "Internal";

struct ErrorVariant<'a> {
    ident: &'a Ident,
    source: Option<(&'a Ident, &'a Type)>,
    has_context: bool,
    cfg: Vec<Attribute>,
}

struct ErrorModel<'a> {
    name: &'a Ident,
    ext: Ident,
    variants: Vec<ErrorVariant<'a>>,
}

pub fn expand(input: DeriveInput) -> TokenStream {
    let model = match ErrorModel::parse(&input) {
        Ok(model) => model,
        Err(err) => return err.to_compile_error(),
    };

    let derives = missing_derives(&input);
    let context_trait = model.context_trait();
    let source_impls = model.source_conversions();
    let internal_impls = model.internal_conversions();

    quote! {
        #[allow(non_shorthand_field_patterns)]
        #derives
        #input

        #context_trait
        #source_impls
        #internal_impls

        #[allow(dead_code)]
        fn format_context(context: &Option<std::borrow::Cow<'static, str>>) -> std::borrow::Cow<'static, str> {
            context.as_ref().map_or(std::borrow::Cow::Borrowed(""), |c| std::borrow::Cow::Owned(format!(" ({c})")))
        }
    }
}

impl<'a> ErrorModel<'a> {
    fn parse(input: &'a DeriveInput) -> syn::Result<Self> {
        let Data::Enum(data) = &input.data else {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "storefront_error can only be applied to enums",
            ));
        };

        let variants = data.variants.iter().map(ErrorVariant::parse).collect::<syn::Result<Vec<_>>>()?;

        if let Some(v) = variants.iter().find(|v| v.source.is_some() && !v.has_context) {
            return Err(syn::Error::new_spanned(
                v.ident,
                "storefront_error requires `context: Option<Cow<'static, str>>` on variants with a source",
            ));
        }

        Ok(Self { name: &input.ident, ext: format_ident!("{}Ext", input.ident), variants })
    }

    fn context_trait(&self) -> TokenStream {
        let name = self.name;
        let ext = &self.ext;
        let arms = self.variants.iter().filter(|v| v.has_context).map(|v| {
            let cfg = &v.cfg;
            let ident = v.ident;
            quote! { #(#cfg)* #name::#ident { context: c, .. } => *c = Some(context.into()), }
        });

        quote! {
            pub trait #ext<T> {
                fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Result<T, #name>;
            }

            #[automatically_derived]
            impl<T> #ext<T> for Result<T, #name> {
                #[inline]
                fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Self {
                    self.map_err(|mut e| {
                        match &mut e {
                            #( #arms )*
                            _ => {}
                        }
                        e
                    })
                }
            }
        }
    }

    fn source_conversions(&self) -> TokenStream {
        let name = self.name;
        let ext = &self.ext;
        let impls = self.variants.iter().filter(|v| v.ident != INTERNAL_VARIANT).filter_map(|v| {
            let (field, ty) = v.source?;
            let ident = v.ident;
            let cfg = &v.cfg;
            Some(quote! {
                #(#cfg)*
                #[automatically_derived]
                impl From<#ty> for #name {
                    #[inline]
                    fn from(#field: #ty) -> Self { Self::#ident { #field, context: None } }
                }

                #(#cfg)*
                impl<T> #ext<T> for std::result::Result<T, #ty> {
                    #[inline]
                    fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> std::result::Result<T, #name> {
                        self.map_err(|#field| #name::#ident { #field, context: Some(context.into()) })
                    }
                }
            })
        });

        quote! { #(#impls)* }
    }

    fn internal_conversions(&self) -> TokenStream {
        let Some(internal) = self.variants.iter().find(|v| v.ident == INTERNAL_VARIANT) else {
            return TokenStream::new();
        };
        let name = self.name;
        let cfg = &internal.cfg;

        quote! {
            #(#cfg)*
            impl From<&'static str> for #name {
                #[inline]
                fn from(s: &'static str) -> Self { Self::Internal { message: std::borrow::Cow::Borrowed(s), context: None } }
            }
            #(#cfg)*
            impl From<String> for #name {
                #[inline]
                fn from(s: String) -> Self { Self::Internal { message: std::borrow::Cow::Owned(s), context: None } }
            }
        }
    }
}

impl<'a> ErrorVariant<'a> {
    fn parse(v: &'a Variant) -> syn::Result<Self> {
        let Fields::Named(fields) = &v.fields else {
            return Err(syn::Error::new_spanned(
                v,
                "storefront_error requires named fields for source/context handling",
            ));
        };

        let has_context = context_field(fields)?.is_some();
        let source = source_field(fields).and_then(|f| f.ident.as_ref().map(|ident| (ident, &f.ty)));
        let cfg = v.attrs.iter().filter(|attr| attr.path().is_ident("cfg")).cloned().collect();

        Ok(Self { ident: &v.ident, source, has_context, cfg })
    }
}

fn context_field(fields: &FieldsNamed) -> syn::Result<Option<&Field>> {
    let Some(field) = fields.named.iter().find(|f| f.ident.as_ref().is_some_and(|i| i == "context"))
    else {
        return Ok(None);
    };
    if !is_optional_static_cow_str(&field.ty) {
        return Err(syn::Error::new_spanned(
            &field.ty,
            "context field must be Option<Cow<'static, str>>",
        ));
    }
    Ok(Some(field))
}

fn source_field(fields: &FieldsNamed) -> Option<&Field> {
    fields.named.iter().find(|field| {
        field.ident.as_ref().is_some_and(|ident| ident == "source")
            || field.attrs.iter().any(|a| a.path().is_ident("source") || a.path().is_ident("from"))
    })
}

fn missing_derives(input: &DeriveInput) -> TokenStream {
    let mut present = FxHashSet::default();
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(seg) = meta.path.segments.last() {
                present.insert(seg.ident.to_string());
            }
            Ok(())
        });
    }

    let mut derives = Vec::new();
    if !present.contains("Debug") {
        derives.push(quote! { Debug });
    }
    if !present.contains("Error") {
        derives.push(quote! { ::thiserror::Error });
    }

    if derives.is_empty() { TokenStream::new() } else { quote! { #[derive(#(#derives),*)] } }
}

fn last_segment(ty: &Type) -> Option<&PathSegment> {
    let Type::Path(path) = ty else { return None };
    path.path.segments.last()
}

fn is_optional_static_cow_str(ty: &Type) -> bool {
    let Some(option) = last_segment(ty).filter(|s| s.ident == "Option") else {
        return false;
    };
    let PathArguments::AngleBracketed(option_args) = &option.arguments else {
        return false;
    };
    let Some(GenericArgument::Type(cow_ty)) = option_args.args.first() else {
        return false;
    };
    let Some(cow) = last_segment(cow_ty).filter(|s| s.ident == "Cow") else {
        return false;
    };
    let PathArguments::AngleBracketed(cow_args) = &cow.arguments else {
        return false;
    };

    let mut args = cow_args.args.iter();
    let static_lifetime =
        matches!(args.next(), Some(GenericArgument::Lifetime(lt)) if lt.ident == "static");
    let str_target = matches!(
        args.next(),
        Some(GenericArgument::Type(t)) if last_segment(t).is_some_and(|s| s.ident == "str")
    );

    static_lifetime && str_target
}
