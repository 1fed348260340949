use crate::descriptor::{TypeDescriptor, TypeKind};
use crate::strategy::TypeFilter;

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTypeFilter;

impl DefaultTypeFilter {
    pub fn new() -> Self {
        Self
    }
}

impl TypeFilter for DefaultTypeFilter {
    fn can_register(&self, descriptor: &TypeDescriptor) -> bool {
        descriptor.kind() == TypeKind::Class
            && (!descriptor.constructors().is_empty() || descriptor.default_activator().is_some())
    }

    fn can_register_parameter(&self, descriptor: &TypeDescriptor) -> bool {
        matches!(descriptor.kind(), TypeKind::Class | TypeKind::Value)
    }

    fn is_assignable(&self, candidate: &TypeDescriptor, required: &TypeDescriptor) -> bool {
        candidate.name() == required.name() || candidate.satisfies_contract(required.name())
    }
}

#[cfg(test)]
mod tests {
    use crate::descriptor::ConstructorDescriptor;

    use super::*;

    struct Sql;

    fn sql() -> TypeDescriptor {
        TypeDescriptor::named("app::Sql", TypeKind::Class)
            .constructor(ConstructorDescriptor::new(|_| Ok(Sql)))
            .satisfies("app::Repo")
    }

    #[test]
    fn default_type_filter_can_register_succeeds() {
        let filter = DefaultTypeFilter::new();

        assert!(filter.can_register(&sql()));
        assert!(!filter.can_register(&TypeDescriptor::named("app::Empty", TypeKind::Class)));
        assert!(!filter.can_register(&TypeDescriptor::contract("app::Repo")));
        assert!(!filter.can_register(&TypeDescriptor::value::<i32>()));
    }

    #[test]
    fn default_type_filter_can_register_parameter_excludes_handles() {
        let filter = DefaultTypeFilter::new();

        assert!(filter.can_register_parameter(&sql()));
        assert!(filter.can_register_parameter(&TypeDescriptor::value::<i32>()));
        assert!(!filter.can_register_parameter(&TypeDescriptor::opaque::<usize>()));
        assert!(!filter.can_register_parameter(&TypeDescriptor::contract("app::Repo")));
    }

    #[test]
    fn default_type_filter_is_assignable_succeeds() {
        let filter = DefaultTypeFilter::new();
        let repo = TypeDescriptor::contract("app::Repo");
        let other = TypeDescriptor::contract("app::Other");

        assert!(filter.is_assignable(&sql(), &repo));
        assert!(filter.is_assignable(&sql(), &sql()));
        assert!(!filter.is_assignable(&sql(), &other));
        assert!(!filter.is_assignable(&repo, &sql()));
    }
}
