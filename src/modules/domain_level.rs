//! Domain Functional Level Module
//!
//! Reads `msDS-Behavior-Version` from the domain object and reports the
//! matching functional level constant.

use crate::context::ModuleContext;
use crate::directory::{DirectoryConnection, Entry, SearchItem};
use crate::errors::{MalformedEntry, Result};
use crate::module::{Module, ModuleInfo};
use crate::options::ModuleOptions;

pub const BEHAVIOR_VERSION_ATTR: &str = "msDS-Behavior-Version";
pub const DOMAIN_FILTER: &str = "(objectClass=domain)";

pub static INFO: ModuleInfo = ModuleInfo {
    name: "domain-level",
    description: "Retrieve the functional domain level using the msDS-Behavior-Version attribute.",
    supported_protocols: &["ldap"],
    opsec_safe: true,
    multiple_hosts: false,
};

/// Domain functional level, keyed by `msDS-Behavior-Version` (MS-ADTS 6.1.4.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionalLevel {
    Win2000,
    Win2003WithMixedDomains,
    Win2003,
    Win2008,
    Win2008R2,
    Win2012,
    Win2012R2,
    Win2016,
}

impl FunctionalLevel {
    pub const ALL: [FunctionalLevel; 8] = [
        FunctionalLevel::Win2000,
        FunctionalLevel::Win2003WithMixedDomains,
        FunctionalLevel::Win2003,
        FunctionalLevel::Win2008,
        FunctionalLevel::Win2008R2,
        FunctionalLevel::Win2012,
        FunctionalLevel::Win2012R2,
        FunctionalLevel::Win2016,
    ];

    /// Exact match on the raw attribute value; no trimming or numeric parsing.
    pub fn from_behavior_version(s: &str) -> Option<Self> {
        match s {
            "0" => Some(FunctionalLevel::Win2000),
            "1" => Some(FunctionalLevel::Win2003WithMixedDomains),
            "2" => Some(FunctionalLevel::Win2003),
            "3" => Some(FunctionalLevel::Win2008),
            "4" => Some(FunctionalLevel::Win2008R2),
            "5" => Some(FunctionalLevel::Win2012),
            "6" => Some(FunctionalLevel::Win2012R2),
            "7" => Some(FunctionalLevel::Win2016),
            _ => None,
        }
    }

    pub fn behavior_version(&self) -> &'static str {
        match self {
            FunctionalLevel::Win2000 => "0",
            FunctionalLevel::Win2003WithMixedDomains => "1",
            FunctionalLevel::Win2003 => "2",
            FunctionalLevel::Win2008 => "3",
            FunctionalLevel::Win2008R2 => "4",
            FunctionalLevel::Win2012 => "5",
            FunctionalLevel::Win2012R2 => "6",
            FunctionalLevel::Win2016 => "7",
        }
    }

    pub fn constant_name(&self) -> &'static str {
        match self {
            FunctionalLevel::Win2000 => "DS_BEHAVIOR_WIN2000",
            FunctionalLevel::Win2003WithMixedDomains => "DS_BEHAVIOR_WIN2003_WITH_MIXED_DOMAINS",
            FunctionalLevel::Win2003 => "DS_BEHAVIOR_WIN2003",
            FunctionalLevel::Win2008 => "DS_BEHAVIOR_WIN2008",
            FunctionalLevel::Win2008R2 => "DS_BEHAVIOR_WIN2008R2",
            FunctionalLevel::Win2012 => "DS_BEHAVIOR_WIN2012",
            FunctionalLevel::Win2012R2 => "DS_BEHAVIOR_WIN2012R2",
            FunctionalLevel::Win2016 => "DS_BEHAVIOR_WIN2016",
        }
    }
}

/// Constant name for a known behavior version, the input itself otherwise.
pub fn translate(behavior_version: &str) -> String {
    FunctionalLevel::from_behavior_version(behavior_version)
        .map(|level| level.constant_name().to_string())
        .unwrap_or_else(|| behavior_version.to_string())
}

/// Behavior version carried by one entry.
///
/// `Ok(None)` when the entry lacks the attribute.
pub fn extract_version(entry: &Entry) -> std::result::Result<Option<String>, MalformedEntry> {
    Ok(entry.first_text(BEHAVIOR_VERSION_ATTR)?.map(str::to_string))
}

/// Like [`extract_version`], folding malformed entries into `None`.
pub fn try_extract_version(entry: &Entry) -> Option<String> {
    extract_version(entry).ok().flatten()
}

#[derive(Debug, Default)]
pub struct DomainLevel;

impl DomainLevel {
    pub fn new() -> Self {
        Self
    }

    /// Walk the search response; the last entry carrying a value wins.
    fn find_version(&self, context: &dyn ModuleContext, items: &[SearchItem]) -> Option<String> {
        let mut version = None;
        for item in items {
            let Some(entry) = item.as_entry() else {
                continue;
            };
            match extract_version(entry) {
                Ok(Some(v)) => version = Some(v),
                Ok(None) => {}
                Err(e) => {
                    context.debug(&format!("Exception: {} (entry {})", e, entry.dn));
                    context.debug(&format!("Skipping item, cannot process due to error {}", e));
                }
            }
        }
        version
    }
}

impl Module for DomainLevel {
    fn info(&self) -> &'static ModuleInfo {
        &INFO
    }

    fn options(&mut self, context: &dyn ModuleContext, options: &ModuleOptions) {
        for key in options.keys() {
            context.debug(&format!("Ignoring unrecognized option {}", key));
        }
    }

    fn on_login(
        &self,
        context: &dyn ModuleContext,
        connection: &mut dyn DirectoryConnection,
    ) -> Result<()> {
        let attributes = [BEHAVIOR_VERSION_ATTR];

        context.info(&format!("Using search filter: {}", DOMAIN_FILTER));
        context.info(&format!("Attributes to retrieve: {:?}", attributes));

        let items = connection.search(DOMAIN_FILTER, &attributes)?;

        let version = if items.is_empty() {
            None
        } else {
            context.debug(&format!("Total records returned {}", items.len()));
            self.find_version(context, &items)
        };

        match version {
            Some(raw) => {
                context.success(&format!("{} (Unformatted): {}", BEHAVIOR_VERSION_ATTR, raw));
                context.highlight(&format!(
                    "Domain Functional Level ({}): {}",
                    BEHAVIOR_VERSION_ATTR,
                    translate(&raw)
                ));
            }
            None => context.error(&format!("Failed to retrieve {}.", BEHAVIOR_VERSION_ATTR)),
        }

        Ok(())
    }
}
