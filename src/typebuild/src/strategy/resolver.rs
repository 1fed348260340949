use std::sync::Arc;

use crate::descriptor::{Catalog, TypeDescriptor};
use crate::strategy::TypeResolver;

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTypeResolver;

impl DefaultTypeResolver {
    pub fn new() -> Self {
        Self
    }
}

impl TypeResolver for DefaultTypeResolver {
    fn get_type(&self, catalog: &Catalog, name: &str) -> Option<Arc<TypeDescriptor>> {
        catalog.get(name)
    }
}

#[cfg(test)]
mod tests {
    use crate::descriptor::TypeKind;

    use super::*;

    #[test]
    fn default_type_resolver_get_type_succeeds() {
        let mut catalog = Catalog::new();
        catalog.declare(TypeDescriptor::named("app::A", TypeKind::Class));
        let resolver = DefaultTypeResolver::new();

        assert_eq!(
            resolver.get_type(&catalog, "app::A").map(|d| d.name().to_string()),
            Some("app::A".to_string())
        );
        assert!(resolver.get_type(&catalog, "app::B").is_none());
    }
}
