//! Module registry
//!
//! The host enumerates modules through this registry and dispatches them
//! through the [`Module`] trait.

pub mod domain_level;

use crate::module::Module;

pub use domain_level::DomainLevel;

/// Fresh instances of every module shipped by this crate
pub fn all_modules() -> Vec<Box<dyn Module>> {
    vec![Box::new(DomainLevel::new())]
}

/// Look up a module by its exact name
pub fn find_module(name: &str) -> Option<Box<dyn Module>> {
    all_modules().into_iter().find(|m| m.info().name == name)
}

/// Modules valid for a protocol
pub fn modules_for_protocol(protocol: &str) -> Vec<Box<dyn Module>> {
    all_modules()
        .into_iter()
        .filter(|m| m.info().supports(protocol))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_module() {
        let module = find_module("domain-level").unwrap();
        assert_eq!(module.info().name, "domain-level");
        assert!(find_module("Domain-Level").is_none());
        assert!(find_module("nonexistent").is_none());
    }

    #[test]
    fn test_modules_for_protocol() {
        let names: Vec<&str> = modules_for_protocol("ldap")
            .iter()
            .map(|m| m.info().name)
            .collect();
        assert_eq!(names, vec!["domain-level"]);
        assert!(modules_for_protocol("smb").is_empty());
    }

    #[test]
    fn test_module_names_are_unique() {
        let mut names: Vec<&str> = all_modules().iter().map(|m| m.info().name).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
