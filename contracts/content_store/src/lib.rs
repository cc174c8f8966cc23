#![no_std]
//! Content-addressed document store.
//!
//! Bytes are keyed by the lowercase hex SHA-256 of their content, so the
//! reference handed back by `put` is also an integrity check on `get`.

use health_common::ContentStore;
use soroban_sdk::{contract, contractimpl, contracttype, symbol_short, Bytes, Env, String, Symbol};

const CONTENT: Symbol = symbol_short!("CONTENT");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Event published when new content is stored.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContentStoredEvent {
    pub cid: String,
    pub size: u32,
    pub timestamp: u64,
}

fn extend_ttl_content_key(env: &Env, key: &(Symbol, String)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Hex-encodes the SHA-256 digest of `content`.
pub fn content_id(env: &Env, content: &Bytes) -> String {
    let digest = env.crypto().sha256(content).to_array();
    let mut buf = [0u8; 64];
    for (i, b) in digest.iter().enumerate() {
        buf[i * 2] = HEX[(b >> 4) as usize];
        buf[i * 2 + 1] = HEX[(b & 0x0f) as usize];
    }
    String::from_bytes(env, &buf)
}

#[contract]
pub struct ContentStoreContract;

#[contractimpl]
impl ContentStore for ContentStoreContract {
    fn put(env: Env, content: Bytes) -> String {
        let cid = content_id(&env, &content);
        let key = (CONTENT, cid.clone());

        if !env.storage().persistent().has(&key) {
            env.storage().persistent().set(&key, &content);
            env.events().publish(
                (symbol_short!("PUT"), cid.clone()),
                ContentStoredEvent {
                    cid: cid.clone(),
                    size: content.len(),
                    timestamp: env.ledger().timestamp(),
                },
            );
        }
        extend_ttl_content_key(&env, &key);

        cid
    }

    fn get(env: Env, cid: String) -> Option<Bytes> {
        env.storage().persistent().get(&(CONTENT, cid))
    }
}
