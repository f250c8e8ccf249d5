use super::*;

use anyhow::bail;

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct General {
    #[serde(default = "listen")]
    listen: String,

    // prefix for every exposed metric name
    #[serde(default = "namespace")]
    namespace: String,

    // where sysfs is mounted, for running inside a container
    #[serde(default = "sysfs")]
    sysfs: String,

    // upper bound on how long a single collector may take during a scrape
    #[serde(default = "timeout")]
    timeout: String,

    #[serde(default = "channel_capacity")]
    channel_capacity: usize,
}

impl Default for General {
    fn default() -> Self {
        Self {
            listen: listen(),
            namespace: namespace(),
            sysfs: sysfs(),
            timeout: timeout(),
            channel_capacity: channel_capacity(),
        }
    }
}

impl General {
    pub fn check(&self) -> anyhow::Result<()> {
        if let Err(e) = self.timeout.parse::<humantime::Duration>() {
            bail!("timeout couldn't be parsed: {e}");
        }

        if self.channel_capacity == 0 {
            bail!("channel_capacity must be greater than zero");
        }

        if !self.namespace.is_empty() && !crate::metrics::is_valid_name(&self.namespace) {
            bail!("namespace is not a valid metric name: {}", self.namespace);
        }

        self.listen()?;

        Ok(())
    }

    pub fn listen(&self) -> anyhow::Result<SocketAddr> {
        self.listen
            .to_socket_addrs()
            .with_context(|| format!("bad listen address: {}", self.listen))?
            .next()
            .with_context(|| format!("could not resolve socket addr: {}", self.listen))
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn sysfs(&self) -> PathBuf {
        PathBuf::from(&self.sysfs)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
            .parse::<humantime::Duration>()
            .map(Into::into)
            .unwrap_or(Duration::from_secs(5))
    }

    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }
}
