use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::errors::ContractError;

pub const ADMIN: Symbol = symbol_short!("ADMIN");
pub const INITIALIZED: Symbol = symbol_short!("INIT");
pub const CONFIG: Symbol = symbol_short!("CONFIG");

pub const DEFAULT_EXPIRY_HOURS: u32 = 24;
/// No cap unless an admin sets one.
pub const MAX_EXPIRY_HOURS: u32 = u32::MAX;
pub const MAX_DOCUMENT_SIZE: u64 = 10 * 1024 * 1024; // 10 MiB

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

/// Runtime configuration held in instance storage
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Used when `update_access` is called without (or with zero) expiry hours.
    pub default_expiry_hours: u32,
    /// Largest accepted expiry window. Uncapped by default.
    pub max_expiry_hours: u32,
    /// Upper bound on document size in bytes.
    pub max_document_size: u64,
    /// Fail `update_access` with `NoPendingRequest` instead of recording a no-op.
    pub strict_access_updates: bool,
    pub content_store: Option<Address>,
    pub ledger: Option<Address>,
}

impl Config {
    pub fn default_config() -> Self {
        Config {
            default_expiry_hours: DEFAULT_EXPIRY_HOURS,
            max_expiry_hours: MAX_EXPIRY_HOURS,
            max_document_size: MAX_DOCUMENT_SIZE,
            strict_access_updates: false,
            content_store: None,
            ledger: None,
        }
    }

    pub fn validate(&self) -> Result<(), ContractError> {
        if self.max_expiry_hours == 0
            || self.default_expiry_hours == 0
            || self.default_expiry_hours > self.max_expiry_hours
            || self.max_document_size == 0
        {
            return Err(ContractError::InvalidInput);
        }
        Ok(())
    }

    /// Resolves the requested expiry window; `None` and `0` fall back to the default.
    pub fn expiry_hours(&self, requested: Option<u32>) -> Result<u32, ContractError> {
        let hours = match requested {
            Some(h) if h > 0 => h,
            _ => self.default_expiry_hours,
        };
        if hours > self.max_expiry_hours {
            return Err(ContractError::InvalidExpiry);
        }
        Ok(hours)
    }
}

fn extend_ttl_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&INITIALIZED)
}

pub fn init(env: &Env, admin: &Address) {
    env.storage().instance().set(&ADMIN, admin);
    env.storage().instance().set(&CONFIG, &Config::default_config());
    env.storage().instance().set(&INITIALIZED, &true);
    extend_ttl_instance(env);
}

pub fn get_admin(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&ADMIN)
        .ok_or(ContractError::NotInitialized)
}

pub fn get_config(env: &Env) -> Result<Config, ContractError> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(ContractError::NotInitialized)
}

pub fn set_config(env: &Env, config: &Config) -> Result<(), ContractError> {
    config.validate()?;
    env.storage().instance().set(&CONFIG, config);
    extend_ttl_instance(env);
    Ok(())
}
