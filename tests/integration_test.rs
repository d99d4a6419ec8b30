//! Integration tests for the domain-level module
//!
//! Drives the module the way a host would: through the registry, with a
//! scripted directory connection and a recording context.

use ad_domain_level::{
    find_module, modules_for_protocol, DirectoryConnection, DirectoryError, Entry, LogLevel,
    ModuleOptions, RecordingContext, Result, SearchItem,
};

struct ScriptedDirectory {
    items: Vec<SearchItem>,
    searches: usize,
}

impl ScriptedDirectory {
    fn new(items: Vec<SearchItem>) -> Self {
        Self { items, searches: 0 }
    }
}

impl DirectoryConnection for ScriptedDirectory {
    fn search(&mut self, filter: &str, attributes: &[&str]) -> Result<Vec<SearchItem>> {
        assert_eq!(filter, "(objectClass=domain)");
        assert_eq!(attributes, ["msDS-Behavior-Version"]);
        self.searches += 1;
        Ok(self.items.clone())
    }
}

struct UnreachableDirectory;

impl DirectoryConnection for UnreachableDirectory {
    fn search(&mut self, _filter: &str, _attributes: &[&str]) -> Result<Vec<SearchItem>> {
        Err(DirectoryError::Timeout("LDAP operation timed out".to_string()))
    }
}

fn domain_object(version: &str) -> SearchItem {
    Entry::new("DC=corp,DC=example,DC=com")
        .with_attr("msDS-Behavior-Version", [version])
        .into()
}

fn run_domain_level(items: Vec<SearchItem>) -> RecordingContext {
    let ctx = RecordingContext::new();
    let mut module = find_module("domain-level").expect("domain-level is registered");
    module.options(&ctx, &ModuleOptions::new());

    let mut directory = ScriptedDirectory::new(items);
    module.on_login(&ctx, &mut directory).expect("search succeeds");
    assert_eq!(directory.searches, 1);
    ctx
}

#[cfg(test)]
mod descriptor_tests {
    use super::*;

    #[test]
    fn test_capability_descriptor() {
        let module = find_module("domain-level").unwrap();
        let info = module.info();

        assert_eq!(info.name, "domain-level");
        assert_eq!(
            info.description,
            "Retrieve the functional domain level using the msDS-Behavior-Version attribute."
        );
        assert_eq!(info.supported_protocols, &["ldap"]);
        assert!(info.opsec_safe);
        assert!(!info.multiple_hosts);
    }

    #[test]
    fn test_registered_for_ldap_only() {
        assert_eq!(modules_for_protocol("ldap").len(), 1);
        assert_eq!(modules_for_protocol("LDAP").len(), 1);
        assert!(modules_for_protocol("smb").is_empty());
    }
}

#[cfg(test)]
mod on_login_tests {
    use super::*;

    #[test]
    fn test_full_run_output() {
        let ctx = run_domain_level(vec![domain_object("7")]);
        let records = ctx.records();

        let visible: Vec<(LogLevel, &str)> = records
            .iter()
            .filter(|r| r.level != LogLevel::Debug)
            .map(|r| (r.level, r.message.as_str()))
            .collect();

        assert_eq!(
            visible,
            vec![
                (LogLevel::Info, "Using search filter: (objectClass=domain)"),
                (LogLevel::Info, "Attributes to retrieve: [\"msDS-Behavior-Version\"]"),
                (LogLevel::Success, "msDS-Behavior-Version (Unformatted): 7"),
                (
                    LogLevel::Highlight,
                    "Domain Functional Level (msDS-Behavior-Version): DS_BEHAVIOR_WIN2016"
                ),
            ]
        );
        assert!(ctx
            .messages(LogLevel::Debug)
            .contains(&"Total records returned 1".to_string()));
    }

    #[test]
    fn test_domain_object_without_attribute() {
        let entry = Entry::new("DC=corp,DC=example,DC=com").with_attr("name", ["corp"]);
        let ctx = run_domain_level(vec![entry.into()]);

        assert_eq!(
            ctx.messages(LogLevel::Error),
            vec!["Failed to retrieve msDS-Behavior-Version.".to_string()]
        );
        assert!(ctx.messages(LogLevel::Highlight).is_empty());
    }

    #[test]
    fn test_binary_value_is_skipped_and_recovered() {
        let binary: SearchItem = Entry::new("DC=odd,DC=example,DC=com")
            .with_attr("msDS-Behavior-Version", [vec![0xffu8, 0xfe]])
            .into();
        let ctx = run_domain_level(vec![
            binary,
            SearchItem::Referral(vec!["ldap://dc2.example.com/DC=example,DC=com".to_string()]),
            domain_object("2"),
        ]);

        assert_eq!(
            ctx.messages(LogLevel::Highlight),
            vec!["Domain Functional Level (msDS-Behavior-Version): DS_BEHAVIOR_WIN2003".to_string()]
        );
        assert!(ctx
            .messages(LogLevel::Debug)
            .iter()
            .any(|m| m.contains("binary value")));
    }

    #[test]
    fn test_last_domain_object_wins() {
        let ctx = run_domain_level(vec![domain_object("3"), domain_object("5")]);
        assert_eq!(
            ctx.messages(LogLevel::Success),
            vec!["msDS-Behavior-Version (Unformatted): 5".to_string()]
        );
    }

    #[test]
    fn test_connection_failure_propagates() {
        let ctx = RecordingContext::new();
        let module = find_module("domain-level").unwrap();

        let result = module.on_login(&ctx, &mut UnreachableDirectory);
        assert!(matches!(result, Err(DirectoryError::Timeout(_))));
        assert!(ctx.messages(LogLevel::Error).is_empty());
        assert_eq!(ctx.messages(LogLevel::Info).len(), 2);
    }
}
