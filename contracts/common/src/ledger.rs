use soroban_sdk::{contractclient, contracttype, Address, BytesN, Env, String, Symbol, Vec};

/// One patient-record update as submitted to the external ledger.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerUpdate {
    pub patient_id: u64,
    /// Short tag of the audited action, e.g. `ACC_REQ`.
    pub update_type: Symbol,
    /// SHA-256 of the XDR-encoded audit entry being anchored.
    pub digest: BytesN<32>,
    /// `None` when the update was performed by the system.
    pub updated_by: Option<Address>,
    pub timestamp: u64,
}

/// Transaction interface of the record ledger.
///
/// `submit` writes an update and returns the ledger's transaction id;
/// `evaluate` is a read-only query for every update anchored for a patient.
#[contractclient(name = "LedgerClient")]
pub trait Ledger {
    fn submit(env: Env, update: LedgerUpdate) -> String;

    fn evaluate(env: Env, patient_id: u64) -> Vec<LedgerUpdate>;
}
