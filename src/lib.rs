//! Active Directory domain functional level module
//!
//! A post-authentication LDAP module: the host authenticates a session, then
//! hands the module a logging context and the live connection. The module
//! reads `msDS-Behavior-Version` from the domain object and reports the
//! functional level it encodes.

pub mod context;
pub mod directory;
pub mod errors;
pub mod ldap_session;
pub mod module;
pub mod modules;
pub mod options;

pub use context::{init_logging, LogLevel, LogRecord, ModuleContext, RecordingContext, TracingContext};
pub use directory::{AttributeValue, DirectoryConnection, Entry, SearchItem};
pub use errors::{ConfigError, DirectoryError, MalformedEntry, Result};
pub use ldap_session::{LdapSession, LdapSessionConfig, SearchScope};
pub use module::{Module, ModuleInfo};
pub use modules::domain_level::{translate, try_extract_version, FunctionalLevel};
pub use modules::{all_modules, find_module, modules_for_protocol, DomainLevel};
pub use options::ModuleOptions;
