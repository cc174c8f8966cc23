use health_common::{LedgerClient, LedgerUpdate};
use soroban_sdk::{symbol_short, xdr::ToXdr, Address, BytesN, Env, String, Symbol};

use crate::config::Config;
use crate::events;
use crate::store;
use crate::types::{Actor, AuditAction, AuditDetails, AuditEntry, Patient};

/// Short tag of an action as used in ledger updates.
pub fn action_tag(action: AuditAction) -> Symbol {
    match action {
        AuditAction::PatientCreated => symbol_short!("PAT_NEW"),
        AuditAction::DocumentUploaded => symbol_short!("DOC_UP"),
        AuditAction::DocumentAccessRequested => symbol_short!("ACC_REQ"),
        AuditAction::DocumentAccessApproved => symbol_short!("ACC_APR"),
        AuditAction::DocumentAccessRejected => symbol_short!("ACC_REJ"),
    }
}

pub fn new_entry(env: &Env, action: AuditAction, actor: Actor, details: AuditDetails) -> AuditEntry {
    AuditEntry {
        timestamp: env.ledger().timestamp(),
        action,
        actor,
        details,
        ledger_tx: None,
    }
}

/// Appends one entry to the patient's audit log, anchoring it on the record
/// ledger first when one is configured. The entry gets the next sequence
/// number; existing entries are never touched.
pub fn append(
    env: &Env,
    config: &Config,
    patient: &mut Patient,
    action: AuditAction,
    actor: Actor,
    details: AuditDetails,
) {
    let mut entry = new_entry(env, action, actor, details);
    if let Some(ledger) = &config.ledger {
        entry.ledger_tx = Some(anchor(env, ledger, patient.id, &entry));
    }
    let seq = patient.audit_count.saturating_add(1);
    store::put_audit(env, patient.id, seq, &entry);
    patient.audit_count = seq;
}

/// SHA-256 over the XDR encoding of the entry.
pub fn digest(env: &Env, entry: &AuditEntry) -> BytesN<32> {
    env.crypto().sha256(&entry.clone().to_xdr(env)).into()
}

fn anchor(env: &Env, ledger: &Address, patient_id: u64, entry: &AuditEntry) -> String {
    let updated_by = match &entry.actor {
        Actor::System => None,
        Actor::Account(account) => Some(account.clone()),
    };
    let update = LedgerUpdate {
        patient_id,
        update_type: action_tag(entry.action),
        digest: digest(env, entry),
        updated_by,
        timestamp: entry.timestamp,
    };

    let ledger_tx = LedgerClient::new(env, ledger).submit(&update);
    events::publish_audit_anchored(env, patient_id, entry.action, ledger_tx.clone());
    ledger_tx
}
