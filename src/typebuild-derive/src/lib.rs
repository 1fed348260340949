mod attrs;
mod impls;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use syn::Result as SynResult;

/// Implements `Injectable` for the self type of an `impl` block.
///
/// Every associated function annotated with `#[dependency]` becomes a
/// constructor, in declaration order:
///
/// ```ignore
/// #[injectable(satisfies(dyn Repository))]
/// impl SqlRepository {
///     #[dependency(singleton)]
///     fn new(pool: Arc<Pool>, #[injection(transient)] clock: Arc<Clock>) -> Self {
///         // ...
///     }
/// }
/// ```
///
/// `#[dependency(...)]` takes one of `singleton`, `transient` or `lazy` and an
/// optional `alias = Type`. A constructor aliased to a trait object
/// `dyn Trait` produces an `Arc<dyn Trait>`, to be injected as a
/// `Contract<dyn Trait>`. `#[injection(...)]` on a parameter takes an
/// override type (or its name as a string literal) and a lifetime.
#[proc_macro_attribute]
pub fn injectable(attr: TokenStream, item: TokenStream) -> TokenStream {
    match injectable_impl(attr, item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

fn injectable_impl(attr: TokenStream, item: TokenStream) -> SynResult<TokenStream2> {
    let attr_data = attrs::parse_attributes(attr)?;
    let expanded = impls::expand_implementation(item, attr_data)?;
    Ok(expanded)
}
