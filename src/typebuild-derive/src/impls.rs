use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{quote, quote_spanned};
use syn::spanned::Spanned;
use syn::visit_mut::{self, VisitMut};
use syn::{
    AngleBracketedGenericArguments, Attribute, Error as SynError, FnArg, GenericArgument, Ident,
    ImplItem, ImplItemFn, ItemImpl, PathArguments, Result as SynResult, ReturnType, Type,
    TypePath,
};

use crate::attrs::{
    self, AttributeData, DependencyData, InjectionData, LifetimeData, OverrideData,
};

#[derive(Debug)]
struct ConstructorData {
    identifier: Ident,
    dependency: DependencyData,
    arguments: Vec<ArgumentData>,
    return_type: ReturnTypeData,
}

#[derive(Debug)]
struct ArgumentData {
    span: Span,
    ty: Type,
    injection: InjectionData,
}

#[derive(Debug)]
enum ReturnTypeData {
    Infallible,
    Result,
}

struct AttributeRemovalVisitor;

impl AttributeRemovalVisitor {
    fn is_custom_attribute(attr: &Attribute) -> bool {
        attrs::is_dependency_attribute(attr) || attrs::is_injection_attribute(attr)
    }
}

impl VisitMut for AttributeRemovalVisitor {
    fn visit_attributes_mut(&mut self, attrs: &mut Vec<Attribute>) {
        attrs.retain(|attr| !Self::is_custom_attribute(attr));
        attrs
            .iter_mut()
            .for_each(|attr| visit_mut::visit_attribute_mut(self, attr));
    }
}

pub fn expand_implementation(
    impls: TokenStream,
    attr_data: AttributeData,
) -> SynResult<TokenStream2> {
    let mut impls = match syn::parse::<ItemImpl>(impls) {
        Ok(impls) => impls,
        Err(err) => {
            return Err(SynError::new(
                err.span(),
                "`#[injectable]` should be annotated on the `impl` block",
            ))
        }
    };
    if let Some((_, path, _)) = &impls.trait_ {
        return Err(SynError::new(
            path.span(),
            "`#[injectable]` should be annotated on an inherent `impl` block",
        ));
    }

    let self_type = get_self_type(&impls)?;
    let ctors = impls
        .items
        .iter()
        .filter_map(filter_and_map_item_fn)
        .filter(|item_fn| item_fn.attrs.iter().any(attrs::is_dependency_attribute))
        .map(|item_fn| parse_constructor(item_fn, &self_type))
        .collect::<SynResult<Vec<_>>>()?;
    if ctors.is_empty() {
        return Err(SynError::new(
            impls.span(),
            "no associated function is annotated with `#[dependency]`",
        ));
    }

    let expanded = expand_injectable_implementation(&impls, &ctors, &attr_data);

    let mut visitor = AttributeRemovalVisitor;
    visitor.visit_item_impl_mut(&mut impls);

    Ok(quote! {
        #impls
        #expanded
    })
}

fn get_self_type(impls: &ItemImpl) -> SynResult<TypePath> {
    if let Type::Path(ty) = impls.self_ty.as_ref() {
        Ok(ty.clone())
    } else {
        Err(SynError::new(impls.self_ty.span(), "invalid self type"))
    }
}

fn filter_and_map_item_fn(item: &ImplItem) -> Option<&ImplItemFn> {
    if let ImplItem::Fn(impl_fn) = item {
        Some(impl_fn)
    } else {
        None
    }
}

fn parse_constructor(item_fn: &ImplItemFn, self_type: &TypePath) -> SynResult<ConstructorData> {
    let signature = &item_fn.sig;
    if let Some(FnArg::Receiver(rec)) = signature.inputs.first() {
        return Err(SynError::new(
            rec.span(),
            "method is not allowed to be annotated with `#[dependency]`",
        ));
    }

    let mut dependency = None;
    for attr in item_fn.attrs.iter().filter(|a| attrs::is_dependency_attribute(a)) {
        if dependency.is_some() {
            return Err(SynError::new(
                attr.span(),
                "only one `#[dependency]` is allowed on a constructor",
            ));
        }
        dependency = Some(attrs::parse_dependency_attribute(attr)?);
    }

    let arguments = signature
        .inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(arg) => Some(arg),
            FnArg::Receiver(_) => None,
        })
        .map(|arg| {
            attrs::parse_injection_attributes(&arg.attrs).map(|injection| ArgumentData {
                span: arg.span(),
                ty: arg.ty.as_ref().clone(),
                injection,
            })
        })
        .collect::<SynResult<Vec<_>>>()?;

    Ok(ConstructorData {
        identifier: signature.ident.clone(),
        dependency: dependency.unwrap_or_default(),
        arguments,
        return_type: parse_constructor_return_type(&signature.output, self_type)?,
    })
}

fn return_type_error(span: Span) -> SynError {
    SynError::new(
        span,
        "a constructor's return type should be `Self` or `Result<Self, E>`",
    )
}

fn parse_constructor_return_type(
    output: &ReturnType,
    self_type: &TypePath,
) -> SynResult<ReturnTypeData> {
    let ReturnType::Type(_, return_type) = output else {
        return Err(return_type_error(output.span()));
    };
    let Type::Path(return_type) = return_type.as_ref() else {
        return Err(return_type_error(return_type.span()));
    };

    let segments = &return_type.path.segments;
    let is_ident = |index: usize, name: &str| segments.get(index).is_some_and(|s| s.ident == name);

    if return_type == self_type || (segments.len() == 1 && is_ident(0, "Self")) {
        Ok(ReturnTypeData::Infallible)
    } else if segments.len() == 1 && is_ident(0, "Result") {
        parse_result_return_type(&segments[0].arguments, self_type)
    } else if segments.len() == 3
        && is_ident(0, "std")
        && is_ident(1, "result")
        && is_ident(2, "Result")
    {
        parse_result_return_type(&segments[2].arguments, self_type)
    } else {
        Err(return_type_error(return_type.span()))
    }
}

fn parse_result_return_type(
    type_args: &PathArguments,
    self_type: &TypePath,
) -> SynResult<ReturnTypeData> {
    let PathArguments::AngleBracketed(AngleBracketedGenericArguments {
        args: type_args, ..
    }) = type_args
    else {
        return Err(return_type_error(type_args.span()));
    };

    match type_args.first() {
        Some(GenericArgument::Type(Type::Path(first_type)))
            if type_args.len() == 2
                && (first_type == self_type
                    || first_type.path.segments.first().is_some_and(|s| s.ident == "Self")) =>
        {
            Ok(ReturnTypeData::Result)
        }
        _ => Err(return_type_error(type_args.span())),
    }
}

fn expand_lifetime(lifetime: LifetimeData) -> TokenStream2 {
    match lifetime {
        LifetimeData::Singleton => quote! { ::typebuild::lifetime::Lifetime::Singleton },
        LifetimeData::Transient => quote! { ::typebuild::lifetime::Lifetime::Transient },
        LifetimeData::Lazy => quote! { ::typebuild::lifetime::Lifetime::Lazy },
    }
}

fn expand_parameter(arg: &ArgumentData) -> TokenStream2 {
    let ty = &arg.ty;
    let override_type = match &arg.injection.override_type {
        Some(OverrideData::Type(target)) => {
            quote! { .with_override(::std::any::type_name::<#target>()) }
        }
        Some(OverrideData::Name(name)) => quote! { .with_override(#name) },
        None => quote! {},
    };
    let lifetime = match arg.injection.lifetime {
        Some(lifetime) => {
            let lifetime = expand_lifetime(lifetime);
            quote! { .with_lifetime(#lifetime) }
        }
        None => quote! {},
    };

    quote_spanned! { arg.span=>
        .parameter(
            ::typebuild::descriptor::ParameterDescriptor::of::<#ty>()
                #override_type
                #lifetime
        )
    }
}

fn expand_constructor(ctor: &ConstructorData) -> TokenStream2 {
    let constructor = &ctor.identifier;

    let get_args = ctor.arguments.iter().map(|arg| {
        let ty = &arg.ty;
        quote_spanned! { arg.span=> args.next::<#ty>()? }
    });
    let call = quote! { Self::#constructor(#(#get_args),*) };
    // Bindings of a trait object contract hold an `Arc<dyn Trait>`.
    let body = match (&ctor.dependency.alias, &ctor.return_type) {
        (Some(alias @ Type::TraitObject(_)), ReturnTypeData::Infallible) => quote! {
            ::std::result::Result::Ok(::std::sync::Arc::new(#call) as ::std::sync::Arc<#alias>)
        },
        (Some(alias @ Type::TraitObject(_)), ReturnTypeData::Result) => quote! {
            #call
                .map(|value| ::std::sync::Arc::new(value) as ::std::sync::Arc<#alias>)
                .map_err(::std::convert::Into::into)
        },
        (_, ReturnTypeData::Infallible) => quote! { ::std::result::Result::Ok(#call) },
        (_, ReturnTypeData::Result) => quote! { #call.map_err(::std::convert::Into::into) },
    };
    let args_pattern = if ctor.arguments.is_empty() {
        quote! { _ }
    } else {
        quote! { args }
    };

    let parameters = ctor.arguments.iter().map(expand_parameter);
    let lifetime = ctor.dependency.lifetime.map(|lifetime| {
        let lifetime = expand_lifetime(lifetime);
        quote! { .lifetime(#lifetime) }
    });
    let alias = ctor.dependency.alias.as_ref().map(|alias| {
        quote! { .alias(::std::any::type_name::<#alias>()) }
    });

    quote! {
        .constructor(
            ::typebuild::descriptor::ConstructorDescriptor::new(
                |#args_pattern: &mut ::typebuild::descriptor::Arguments| { #body }
            )
            #(#parameters)*
            #lifetime
            #alias
        )
    }
}

fn expand_injectable_implementation(
    impls: &ItemImpl,
    ctors: &[ConstructorData],
    attr_data: &AttributeData,
) -> TokenStream2 {
    let self_type = &impls.self_ty;
    let (impl_generics, _, where_clause) = impls.generics.split_for_impl();

    let contracts = attr_data.contracts.iter().map(|contract| {
        quote! { .satisfies(::std::any::type_name::<#contract>()) }
    });
    let constructors = ctors.iter().map(expand_constructor);

    quote! {
        impl #impl_generics ::typebuild::descriptor::Injectable for #self_type #where_clause {
            fn describe() -> ::typebuild::descriptor::TypeDescriptor {
                ::typebuild::descriptor::TypeDescriptor::class::<Self>()
                    #(#contracts)*
                    #(#constructors)*
            }
        }
    }
}
