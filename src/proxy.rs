// src/proxy.rs

//! Delegated security contexts ("user proxies") handed to executors.
//!
//! The coordinator only decides *which* delegation path applies and which
//! servers to use; talking to MyProxy / VOMS is up to the executor that
//! receives the [`UserProxy`].

use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::config::ProxySection;
use crate::errors::{GaswError, Result};

/// Credentials a user supplies with a submission.
#[derive(Clone, Default)]
pub struct GridUserCredentials {
    pub login: Option<String>,
    pub password: Option<String>,
    /// Distinguished name, used by command-line delegation.
    pub dn: Option<String>,
}

impl GridUserCredentials {
    pub fn with_login_password(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: Some(login.into()),
            password: Some(password.into()),
            dn: None,
        }
    }

    pub fn with_dn(dn: impl Into<String>) -> Self {
        Self {
            dn: Some(dn.into()),
            ..Self::default()
        }
    }

    /// Both login and password present and non-empty.
    pub fn has_login_password(&self) -> bool {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        filled(&self.login) && filled(&self.password)
    }
}

impl fmt::Debug for GridUserCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridUserCredentials")
            .field("login", &self.login)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("dn", &self.dn)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MyproxyServer {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VomsServer {
    /// Virtual organisation name.
    pub name: String,
    pub host: String,
    pub port: u16,
}

/// How the delegated proxy is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delegation {
    /// Login/password through the MyProxy API.
    Programmatic,
    /// User DN through the command-line tools.
    CommandLine,
}

impl Delegation {
    pub fn for_credentials(credentials: &GridUserCredentials) -> Self {
        if credentials.has_login_password() {
            Delegation::Programmatic
        } else {
            Delegation::CommandLine
        }
    }
}

/// Delegated security context attached to an executor before submission.
#[derive(Debug, Clone)]
pub struct UserProxy {
    pub delegation: Delegation,
    pub credentials: GridUserCredentials,
    pub myproxy: MyproxyServer,
    pub voms: VomsServer,
    pub lifetime: Duration,
}

/// Process-wide proxy defaults, initialised once with the coordinator.
#[derive(Debug, Clone)]
pub struct ProxyConfiguration {
    myproxy: MyproxyServer,
    voms: VomsServer,
    lifetime: Duration,
}

impl ProxyConfiguration {
    pub fn init(section: &ProxySection) -> Result<Self> {
        if section.myproxy_host.trim().is_empty() || section.voms_host.trim().is_empty() {
            return Err(GaswError::Configuration(
                "[proxy] server hosts must not be empty".to_string(),
            ));
        }

        let cfg = Self {
            myproxy: MyproxyServer {
                host: section.myproxy_host.clone(),
                port: section.myproxy_port,
            },
            voms: VomsServer {
                name: section.voms_name.clone(),
                host: section.voms_host.clone(),
                port: section.voms_port,
            },
            lifetime: Duration::from_secs(u64::from(section.lifetime_hours) * 3600),
        };
        debug!(myproxy = %cfg.myproxy.host, voms = %cfg.voms.name, "proxy configuration initialised");
        Ok(cfg)
    }

    /// Build the proxy for `credentials`, falling back to the configured
    /// servers for any that are not given.
    pub fn delegate(
        &self,
        credentials: GridUserCredentials,
        myproxy: Option<MyproxyServer>,
        voms: Option<VomsServer>,
    ) -> UserProxy {
        let delegation = Delegation::for_credentials(&credentials);
        UserProxy {
            delegation,
            credentials,
            myproxy: myproxy.unwrap_or_else(|| self.myproxy.clone()),
            voms: voms.unwrap_or_else(|| self.voms.clone()),
            lifetime: self.lifetime,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_and_password_select_programmatic_path() {
        let creds = GridUserCredentials::with_login_password("alice", "secret");
        assert_eq!(Delegation::for_credentials(&creds), Delegation::Programmatic);
    }

    #[test]
    fn missing_or_empty_fields_select_command_line_path() {
        let no_password = GridUserCredentials {
            login: Some("alice".to_string()),
            ..GridUserCredentials::default()
        };
        let empty_login = GridUserCredentials::with_login_password("", "secret");
        let dn_only = GridUserCredentials::with_dn("/O=GRID/CN=alice");

        for creds in [no_password, empty_login, dn_only] {
            assert_eq!(Delegation::for_credentials(&creds), Delegation::CommandLine);
        }
    }

    #[test]
    fn delegate_falls_back_to_configured_servers() {
        let cfg = ProxyConfiguration::init(&ProxySection::default()).unwrap();
        let explicit = MyproxyServer {
            host: "other.example".to_string(),
            port: 1,
        };

        let proxy = cfg.delegate(GridUserCredentials::default(), Some(explicit.clone()), None);

        assert_eq!(proxy.myproxy, explicit);
        assert_eq!(proxy.voms.name, "biomed");
        assert_eq!(proxy.lifetime, Duration::from_secs(12 * 3600));
    }

    #[test]
    fn debug_output_hides_password() {
        let creds = GridUserCredentials::with_login_password("alice", "secret");
        let printed = format!("{creds:?}");
        assert!(!printed.contains("secret"));
        assert!(printed.contains("alice"));
    }
}
