use crate::types::{AccessStatus, AuditAction};
use soroban_sdk::{symbol_short, Address, Env, String};

/// Event published when the contract is initialized.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub timestamp: u64,
}

/// Event published when the admin replaces the configuration.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigUpdatedEvent {
    pub admin: Address,
    pub default_expiry_hours: u32,
    pub strict_access_updates: bool,
    pub timestamp: u64,
}

/// Event published when a new patient is registered.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatientCreatedEvent {
    pub patient_id: u64,
    pub owner: Address,
    pub timestamp: u64,
}

/// Event published when a document is attached to a patient.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DocumentUploadedEvent {
    pub patient_id: u64,
    pub document_id: u64,
    pub name: String,
    pub cid: String,
    pub size: u64,
    pub timestamp: u64,
}

/// Event published when a doctor asks for access to a document.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessRequestedEvent {
    pub patient_id: u64,
    pub document_id: u64,
    pub doctor: Address,
    pub timestamp: u64,
}

/// Event published when a pending request is approved or rejected.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessDecidedEvent {
    pub patient_id: u64,
    pub document_id: u64,
    pub doctor: Address,
    pub status: AccessStatus,
    pub expires_at: Option<u64>,
    pub matched: bool,
    pub timestamp: u64,
}

/// Event published when an audit entry has been anchored on the record ledger.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuditAnchoredEvent {
    pub patient_id: u64,
    pub action: AuditAction,
    pub ledger_tx: String,
    pub timestamp: u64,
}

pub fn publish_initialized(env: &Env, admin: Address) {
    let topics = (symbol_short!("INIT"),);
    let data = InitializedEvent {
        admin,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_config_updated(
    env: &Env,
    admin: Address,
    default_expiry_hours: u32,
    strict_access_updates: bool,
) {
    let topics = (symbol_short!("CFG_SET"), admin.clone());
    let data = ConfigUpdatedEvent {
        admin,
        default_expiry_hours,
        strict_access_updates,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

/// Publishes an event when a new patient is registered.
pub fn publish_patient_created(env: &Env, patient_id: u64, owner: Address) {
    let topics = (symbol_short!("PAT_NEW"), patient_id);
    let data = PatientCreatedEvent {
        patient_id,
        owner,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

/// Publishes an event when a document is uploaded.
/// This event includes the content reference so indexers can locate the bytes.
pub fn publish_document_uploaded(
    env: &Env,
    patient_id: u64,
    document_id: u64,
    name: String,
    cid: String,
    size: u64,
) {
    let topics = (symbol_short!("DOC_UP"), patient_id, document_id);
    let data = DocumentUploadedEvent {
        patient_id,
        document_id,
        name,
        cid,
        size,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_access_requested(env: &Env, patient_id: u64, document_id: u64, doctor: Address) {
    let topics = (symbol_short!("ACC_REQ"), patient_id, doctor.clone());
    let data = AccessRequestedEvent {
        patient_id,
        document_id,
        doctor,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

/// Publishes an event when an access request is decided.
/// `matched` is false when no pending request existed and nothing changed.
pub fn publish_access_decided(
    env: &Env,
    patient_id: u64,
    document_id: u64,
    doctor: Address,
    status: AccessStatus,
    expires_at: Option<u64>,
    matched: bool,
) {
    let topics = (symbol_short!("ACC_DEC"), patient_id, doctor.clone());
    let data = AccessDecidedEvent {
        patient_id,
        document_id,
        doctor,
        status,
        expires_at,
        matched,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_audit_anchored(env: &Env, patient_id: u64, action: AuditAction, ledger_tx: String) {
    let topics = (symbol_short!("ANCHOR"), patient_id);
    let data = AuditAnchoredEvent {
        patient_id,
        action,
        ledger_tx,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}
