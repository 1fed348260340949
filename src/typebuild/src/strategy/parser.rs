use crate::builder::registry::{NodeId, RuntimeType};
use crate::strategy::TypeParser;

/// Matches candidates by structural equality of their signatures.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTypeParser;

impl DefaultTypeParser {
    pub fn new() -> Self {
        Self
    }
}

impl TypeParser for DefaultTypeParser {
    fn find<'a>(
        &self,
        signature: &str,
        parameters: &[String],
        candidates: &[&'a RuntimeType],
    ) -> Option<NodeId> {
        candidates
            .iter()
            .find(|candidate| {
                let key = candidate.signature();
                key.base() == signature && key.parameters() == parameters
            })
            .map(|candidate| candidate.node())
    }

    fn find_all<'a>(
        &self,
        signature: &str,
        parameters: &[String],
        candidates: &[&'a RuntimeType],
    ) -> Vec<NodeId> {
        candidates
            .iter()
            .filter(|candidate| {
                let key = candidate.signature();
                key.base() == signature && (parameters.is_empty() || key.parameters() == parameters)
            })
            .map(|candidate| candidate.node())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::registry::Registry;
    use crate::signature::{format_signature_with_parameters, Signature};

    use super::*;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.upsert(RuntimeType::parameter(Signature::new("app::A"), None));
        registry.upsert(RuntimeType::parameter(
            format_signature_with_parameters("app::B", &["app::A".to_string()]),
            None,
        ));
        registry.upsert(RuntimeType::parameter(
            format_signature_with_parameters("app::B", &["i32".to_string()]),
            None,
        ));
        registry
    }

    #[test]
    fn default_type_parser_find_succeeds() {
        let registry = registry();
        let candidates: Vec<_> = registry.nodes().collect();
        let parser = DefaultTypeParser::new();

        let found = parser.find("app::B", &["i32".to_string()], &candidates);
        assert_eq!(
            found.map(|id| registry.node(id).signature().as_str()),
            Some("app::B(i32)")
        );
        assert!(parser.find("app::B", &[], &candidates).is_none());
        assert!(parser.find("app::A", &[], &candidates).is_some());
        assert!(parser.find("app::C", &[], &candidates).is_none());
    }

    #[test]
    fn default_type_parser_find_all_succeeds() {
        let registry = registry();
        let candidates: Vec<_> = registry.nodes().collect();
        let parser = DefaultTypeParser::new();

        assert_eq!(parser.find_all("app::B", &[], &candidates).len(), 2);
        assert_eq!(parser.find_all("app::B", &["app::A".to_string()], &candidates).len(), 1);
        assert!(parser.find_all("app::B", &["bool".to_string()], &candidates).is_empty());
        assert!(parser.find_all("app::B(app::A)", &[], &candidates).is_empty());
    }
}
