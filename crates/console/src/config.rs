#![forbid(unsafe_code)]

use crate::record_store::CorruptPolicy;
use crate::verifier::DEFAULT_CPF_ENDPOINT;
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;
use vc_core::validate::UnavailablePolicy;

pub const DEFAULT_STORAGE_DIR: &str = ".vetclinic";

/// Runtime settings. Every flag falls back to an environment variable.
#[derive(Args, Clone, Debug)]
pub struct ConsoleConfig {
    /// Directory holding `vetclinic.db`.
    #[arg(long, env = "VC_STORAGE_DIR", default_value = DEFAULT_STORAGE_DIR)]
    pub storage_dir: PathBuf,

    /// Base URL of the CPF lookup service; the id is appended as a path segment.
    #[arg(long, env = "VC_CPF_ENDPOINT", default_value = DEFAULT_CPF_ENDPOINT)]
    pub cpf_endpoint: String,

    #[arg(long, env = "VC_CPF_TIMEOUT_MS", default_value_t = 10_000)]
    pub cpf_timeout_ms: u64,

    /// `fail-closed` rejects a CPF the service could not confirm; `fail-open` accepts it.
    #[arg(long, env = "VC_CPF_POLICY", default_value = "fail-closed", value_parser = parse_policy)]
    pub cpf_policy: UnavailablePolicy,

    /// Skip the CPF service entirely (every lookup is inconclusive).
    #[arg(long, env = "VC_OFFLINE")]
    pub offline: bool,

    /// Load undecodable collections as empty instead of failing.
    #[arg(long, env = "VC_START_EMPTY_ON_CORRUPT")]
    pub start_empty_on_corrupt: bool,

    #[arg(long, env = "VC_LOG_JSON")]
    pub log_json: bool,
}

impl ConsoleConfig {
    pub fn for_storage_dir(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
            cpf_endpoint: DEFAULT_CPF_ENDPOINT.to_string(),
            cpf_timeout_ms: 10_000,
            cpf_policy: UnavailablePolicy::default(),
            offline: false,
            start_empty_on_corrupt: false,
            log_json: false,
        }
    }

    pub fn cpf_timeout(&self) -> Duration {
        Duration::from_millis(self.cpf_timeout_ms)
    }

    pub fn corrupt_policy(&self) -> CorruptPolicy {
        if self.start_empty_on_corrupt {
            CorruptPolicy::StartEmpty
        } else {
            CorruptPolicy::Fail
        }
    }
}

fn parse_policy(raw: &str) -> Result<UnavailablePolicy, String> {
    UnavailablePolicy::parse(raw)
        .ok_or_else(|| format!("unknown policy `{raw}` (expected fail-closed or fail-open)"))
}
