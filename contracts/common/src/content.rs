use soroban_sdk::{contractclient, Bytes, Env, String};

/// Content-addressed blob storage for uploaded documents.
///
/// `put` returns the reference under which the bytes can be fetched again.
/// Implementations must return the same reference for the same bytes.
#[contractclient(name = "ContentStoreClient")]
pub trait ContentStore {
    /// Stores `content` and returns its content reference.
    fn put(env: Env, content: Bytes) -> String;

    /// Returns the bytes stored under `cid`, or `None` if unknown.
    fn get(env: Env, cid: String) -> Option<Bytes>;
}
