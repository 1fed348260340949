use proc_macro::TokenStream;
use syn::parse::{Parse, ParseStream, Parser};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::token::Comma;
use syn::{parenthesized, Attribute, Error as SynError, LitStr, Meta, Result as SynResult, Type};

#[derive(Debug, Default)]
pub struct AttributeData {
    pub contracts: Vec<Type>,
}

pub fn parse_attributes(attr: TokenStream) -> SynResult<AttributeData> {
    let mut data = AttributeData::default();
    if attr.is_empty() {
        return Ok(data);
    }

    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("satisfies") {
            let content;
            parenthesized!(content in meta.input);
            let contracts = Punctuated::<Type, Comma>::parse_terminated(&content)?;
            data.contracts.extend(contracts);
            Ok(())
        } else {
            Err(meta.error("expects `satisfies(...)` listing the contracts of the type"))
        }
    });
    parser.parse(attr)?;
    Ok(data)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifetimeData {
    Singleton,
    Transient,
    Lazy,
}

impl LifetimeData {
    fn from_ident(ident: &str) -> Option<Self> {
        match ident {
            "singleton" => Some(Self::Singleton),
            "transient" => Some(Self::Transient),
            "lazy" => Some(Self::Lazy),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct DependencyData {
    pub lifetime: Option<LifetimeData>,
    pub alias: Option<Type>,
}

pub fn is_dependency_attribute(attr: &Attribute) -> bool {
    attr.path().is_ident("dependency")
}

pub fn is_injection_attribute(attr: &Attribute) -> bool {
    attr.path().is_ident("injection")
}

pub fn parse_dependency_attribute(attr: &Attribute) -> SynResult<DependencyData> {
    let mut data = DependencyData::default();
    if let Meta::Path(_) = &attr.meta {
        return Ok(data);
    }

    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("alias") {
            if data.alias.is_some() {
                return Err(meta.error("only one alias is allowed"));
            }
            data.alias = Some(meta.value()?.parse()?);
            return Ok(());
        }

        let lifetime = meta
            .path
            .get_ident()
            .and_then(|ident| LifetimeData::from_ident(&ident.to_string()));
        match lifetime {
            Some(_) if data.lifetime.is_some() => Err(meta.error("only one lifetime is allowed")),
            Some(lifetime) => {
                data.lifetime = Some(lifetime);
                Ok(())
            }
            None => Err(meta.error(
                "expects `singleton`, `transient`, `lazy` or `alias = Type`",
            )),
        }
    })?;
    Ok(data)
}

#[derive(Debug)]
pub enum OverrideData {
    Type(Type),
    Name(LitStr),
}

#[derive(Debug, Default)]
pub struct InjectionData {
    pub override_type: Option<OverrideData>,
    pub lifetime: Option<LifetimeData>,
}

enum InjectionItem {
    Override(OverrideData),
    Lifetime(LifetimeData),
}

impl Parse for InjectionItem {
    fn parse(input: ParseStream) -> SynResult<Self> {
        if input.peek(LitStr) {
            return input.parse().map(|name| Self::Override(OverrideData::Name(name)));
        }

        let ty: Type = input.parse()?;
        if let Type::Path(path) = &ty {
            let lifetime = path
                .path
                .get_ident()
                .and_then(|ident| LifetimeData::from_ident(&ident.to_string()));
            if let Some(lifetime) = lifetime {
                return Ok(Self::Lifetime(lifetime));
            }
        }
        Ok(Self::Override(OverrideData::Type(ty)))
    }
}

pub fn parse_injection_attributes(attrs: &[Attribute]) -> SynResult<InjectionData> {
    let mut data = InjectionData::default();
    let mut seen = false;

    for attr in attrs.iter().filter(|attr| is_injection_attribute(attr)) {
        if seen {
            return Err(SynError::new(
                attr.span(),
                "only one `#[injection(...)]` is allowed on a parameter",
            ));
        }
        seen = true;

        let Meta::List(list) = &attr.meta else {
            return Err(SynError::new(
                attr.span(),
                "expects `#[injection(...)]` to receive an override type or a lifetime",
            ));
        };
        let items = Punctuated::<InjectionItem, Comma>::parse_terminated.parse2(list.tokens.clone())?;
        for item in items {
            match item {
                InjectionItem::Override(_) if data.override_type.is_some() => {
                    return Err(SynError::new(list.span(), "only one override type is allowed"));
                }
                InjectionItem::Override(override_type) => data.override_type = Some(override_type),
                InjectionItem::Lifetime(_) if data.lifetime.is_some() => {
                    return Err(SynError::new(list.span(), "only one lifetime is allowed"));
                }
                InjectionItem::Lifetime(lifetime) => data.lifetime = Some(lifetime),
            }
        }
    }

    Ok(data)
}
