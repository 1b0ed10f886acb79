//! YAML configuration of a simulated ring.
use std::collections::HashSet;
use std::fs;
use std::io;
use std::time::Duration;

use chord_core::consts::DEFAULT_RING_BITS;
use chord_core::consts::DEFAULT_RPC_RETRIES;
use chord_core::consts::DEFAULT_RPC_TIMEOUT_MS;
use chord_core::consts::MAX_RING_BITS;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;
use crate::util::ensure_parent_dir;
use crate::util::expand_home;

pub const DEFAULT_CONFIG_PATH: &str = "~/.chord/config.yaml";
pub const DEFAULT_STABILIZE_INTERVAL: u64 = 0;
pub const DEFAULT_NODES: [u64; 5] = [1, 356, 700, 128, 910];
pub const DEFAULT_KEYS: [u64; 4] = [0, 42, 357, 1023];

/// Random delay of every delivery on the in-memory transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct DelayConfig {
    pub min_ms: u64,
    pub max_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    pub ring_bits: u8,
    pub rpc_timeout_ms: u64,
    #[serde(default)]
    pub rpc_retries: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_delay: Option<DelayConfig>,
    /// Seconds between two rounds of the periodic stabilizer, 0 disables it.
    #[serde(default)]
    pub stabilize_interval: u64,
    /// Node identifiers, joined in this order.
    pub nodes: Vec<u64>,
    /// When there is no `keys` in the YAML file, nothing is stored.
    #[serde(default)]
    pub keys: Vec<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ring_bits: DEFAULT_RING_BITS,
            rpc_timeout_ms: DEFAULT_RPC_TIMEOUT_MS,
            rpc_retries: DEFAULT_RPC_RETRIES,
            transport_delay: None,
            stabilize_interval: DEFAULT_STABILIZE_INTERVAL,
            nodes: DEFAULT_NODES.to_vec(),
            keys: DEFAULT_KEYS.to_vec(),
        }
    }
}

impl Config {
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_millis(self.rpc_timeout_ms)
    }

    pub fn stabilize_interval(&self) -> Option<Duration> {
        (self.stabilize_interval > 0).then(|| Duration::from_secs(self.stabilize_interval))
    }

    /// Reject a config the ring could never be built from.
    pub fn validate(&self) -> Result<()> {
        if self.ring_bits == 0 || self.ring_bits > MAX_RING_BITS {
            return Err(Error::InvalidConfig(format!(
                "ring_bits must be in 1..={}, got {}",
                MAX_RING_BITS, self.ring_bits
            )));
        }
        if self.nodes.is_empty() {
            return Err(Error::InvalidConfig("no node to join".to_string()));
        }
        let size = 1u64 << self.ring_bits;
        if let Some(id) = self.nodes.iter().chain(self.keys.iter()).find(|x| **x >= size) {
            return Err(Error::InvalidConfig(format!(
                "identifier {} out of ring of size {}",
                id, size
            )));
        }
        let mut seen = HashSet::new();
        if let Some(id) = self.nodes.iter().find(|id| !seen.insert(**id)) {
            return Err(Error::InvalidConfig(format!("node {} listed twice", id)));
        }
        if let Some(delay) = self.transport_delay {
            if delay.min_ms > delay.max_ms {
                return Err(Error::InvalidConfig(format!(
                    "transport delay {}ms > {}ms",
                    delay.min_ms, delay.max_ms
                )));
            }
        }
        Ok(())
    }

    pub fn write_fs<P>(&self, path: P) -> Result<String>
    where P: AsRef<std::path::Path> {
        let path = expand_home(path)?;
        ensure_parent_dir(&path)?;
        let f =
            fs::File::create(path.as_path()).map_err(|e| Error::CreateFileError(e.to_string()))?;
        let f_writer = io::BufWriter::new(f);
        serde_yaml::to_writer(f_writer, self).map_err(|_| Error::EncodeError)?;
        Ok(path.to_string_lossy().to_string())
    }

    pub fn read_fs<P>(path: P) -> Result<Config>
    where P: AsRef<std::path::Path> {
        let path = expand_home(path)?;
        tracing::debug!("Read config from: {:?}", path);
        let f = fs::File::open(path).map_err(|e| Error::OpenFileError(e.to_string()))?;
        let f_rdr = io::BufReader::new(f);
        let config: Config = serde_yaml::from_reader(f_rdr)?;
        config.validate()?;
        Ok(config)
    }
}
