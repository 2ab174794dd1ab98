use crate::cli::ConnectionArgs;
use anyhow::{Context, Result, bail};
use pingdom::{Credentials, HttpBackend};
use reconciler::{Reconciler, Settings};

/// Validated connection settings
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub api_base: String,
    pub tag: String,
}

impl Config {
    /// Validate flags and environment.
    ///
    /// All three credentials are required; the username doubles as the
    /// email of the user every check notifies.
    pub fn from_args(args: &ConnectionArgs) -> Result<Self> {
        let mut missing = Vec::new();
        if args.username.trim().is_empty() {
            missing.push("PINGDOM_USERNAME");
        }
        if args.password.is_empty() {
            missing.push("PINGDOM_PASSWORD");
        }
        if args.appkey.trim().is_empty() {
            missing.push("PINGDOM_APPKEY");
        }
        if !missing.is_empty() {
            bail!("missing Pingdom credentials: {}", missing.join(", "));
        }
        if args.tag.trim().is_empty() {
            bail!("ownership tag must not be empty");
        }

        Ok(Self {
            credentials: Credentials::new(args.username.trim(), &args.password, args.appkey.trim()),
            api_base: args.api_base.clone(),
            tag: args.tag.clone(),
        })
    }

    pub fn settings(&self) -> Settings {
        Settings::new(self.credentials.username.clone()).tag(self.tag.clone())
    }

    /// Build the client and rebuild the view of what we own.
    pub fn connect(&self) -> Result<Reconciler> {
        let backend = HttpBackend::with_api_base(self.credentials.clone(), &self.api_base);
        log::debug!("using Pingdom API at {}", backend.api_base());
        Reconciler::new(Box::new(backend), self.settings())
            .context("unable to create pingdom client")
    }
}
