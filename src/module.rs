//! Module contract
//!
//! Every probe exposes a static capability descriptor plus two lifecycle
//! hooks. The host reads the descriptor, calls `options` once after loading
//! and `on_login` once per authenticated session.

use serde::Serialize;

use crate::context::ModuleContext;
use crate::directory::DirectoryConnection;
use crate::errors::Result;
use crate::options::ModuleOptions;

/// Static capability descriptor of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    /// Identifier the host selects the module by
    pub name: &'static str,
    pub description: &'static str,
    /// Protocols the module is valid for, e.g. `["ldap"]`
    pub supported_protocols: &'static [&'static str],
    /// Activity is unlikely to trigger defensive alerting
    pub opsec_safe: bool,
    /// Run once across all targets instead of once per session
    pub multiple_hosts: bool,
}

impl ModuleInfo {
    pub fn supports(&self, protocol: &str) -> bool {
        self.supported_protocols
            .iter()
            .any(|p| p.eq_ignore_ascii_case(protocol))
    }
}

pub trait Module: Send + Sync {
    fn info(&self) -> &'static ModuleInfo;

    /// Configuration hook. Must accept an empty bundle.
    fn options(&mut self, context: &dyn ModuleContext, options: &ModuleOptions);

    /// Post-authentication callback.
    ///
    /// Connection failures propagate; every other outcome is reported through
    /// `context`.
    fn on_login(
        &self,
        context: &dyn ModuleContext,
        connection: &mut dyn DirectoryConnection,
    ) -> Result<()>;
}
