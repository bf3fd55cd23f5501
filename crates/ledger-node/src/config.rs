//! Driver configuration from environment variables.

use ledger_core::LedgerConfig;
use std::env;
use std::str::FromStr;
use tracing::warn;

/// Record tampered with when none is configured
pub const DEFAULT_ATTACK_TARGET: u64 = 2;

/// Runtime configuration for the demonstration node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Ledger parameters
    pub ledger: LedgerConfig,
    /// Whether to run the tampering demonstration
    pub simulate_attack: bool,
    /// Index of the record to tamper with
    pub attack_target: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            ledger: LedgerConfig::default(),
            simulate_attack: true,
            attack_target: DEFAULT_ATTACK_TARGET,
        }
    }
}

fn parse_or_warn<T: FromStr>(key: &str, raw: &str) -> Option<T> {
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = raw, "Ignoring unparseable value, keeping default");
            None
        }
    }
}

impl NodeConfig {
    /// Load from the process environment
    ///
    /// - `LEDGER_DIFFICULTY`: leading hex zeros per digest (default 2)
    /// - `LEDGER_GENESIS_PAYLOAD`: genesis payload (default "Genesis Block")
    /// - `LEDGER_MAX_ATTEMPTS`: sealing attempt ceiling (default scales with difficulty)
    /// - `LEDGER_SIMULATE_ATTACK`: run the tampering demo (default true)
    /// - `LEDGER_ATTACK_TARGET`: record to tamper with (default 2)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`NodeConfig::from_env`] with a custom variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup("LEDGER_DIFFICULTY") {
            match parse_or_warn::<u32>("LEDGER_DIFFICULTY", &raw) {
                Some(0) => warn!("LEDGER_DIFFICULTY must be at least 1, keeping default"),
                Some(difficulty) => config.ledger.difficulty = difficulty,
                None => {}
            }
        }

        if let Some(payload) = lookup("LEDGER_GENESIS_PAYLOAD") {
            if payload.is_empty() {
                warn!("LEDGER_GENESIS_PAYLOAD is empty, keeping default");
            } else {
                config.ledger.genesis_payload = payload;
            }
        }

        if let Some(raw) = lookup("LEDGER_MAX_ATTEMPTS") {
            match parse_or_warn::<u64>("LEDGER_MAX_ATTEMPTS", &raw) {
                Some(0) => warn!("LEDGER_MAX_ATTEMPTS must be at least 1, keeping default"),
                Some(max_attempts) => config.ledger.max_attempts = Some(max_attempts),
                None => {}
            }
        }

        if let Some(raw) = lookup("LEDGER_SIMULATE_ATTACK") {
            config.simulate_attack = !(raw.eq_ignore_ascii_case("false") || raw == "0");
        }

        if let Some(raw) = lookup("LEDGER_ATTACK_TARGET") {
            if let Some(target) = parse_or_warn("LEDGER_ATTACK_TARGET", &raw) {
                config.attack_target = target;
            }
        }

        config
    }
}
