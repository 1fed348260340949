use crate::signature::Signature;
use crate::util::any::{Downcast, Object};

/// Renders `name(p1,p2,...)`, or just `name` when there are no parameters.
pub fn format_signature_with_parameters(name: &str, parameters: &[String]) -> Signature {
    let full = if parameters.is_empty() {
        name.to_string()
    } else {
        format!("{name}({})", parameters.join(","))
    };
    Signature::from_parts(full, name.to_string(), parameters.to_vec())
}

/// Returns the concrete type names of the given arguments, in order.
pub fn format_parameter_signatures(args: &[Object]) -> Vec<String> {
    args.iter()
        .map(|arg| arg.concrete_type_name().to_string())
        .collect()
}

/// Strips the module path and generic arguments from a type name, so that
/// `app::repo::Lazy<app::A>` becomes `Lazy`.
pub fn bare_name(type_name: &str) -> &str {
    let head = type_name
        .find('<')
        .map_or(type_name, |pos| &type_name[..pos]);
    head.rsplit("::").next().unwrap_or(head)
}
