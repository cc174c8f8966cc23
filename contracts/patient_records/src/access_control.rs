//! Access control service: load, mutate through the state machine, audit,
//! save. Each call is one versioned read-modify-write of a single patient.

use soroban_sdk::{Address, Env, String, Vec};

use crate::access::{self, Decision};
use crate::audit;
use crate::config;
use crate::errors::ContractError;
use crate::events;
use crate::store;
use crate::types::{
    AccessRequestView, AccessStatus, Actor, AuditAction, AuditDetails, Patient,
};

/// The patient's owner and the contract admin may act on a patient's records.
pub fn require_owner_or_admin(
    env: &Env,
    caller: &Address,
    patient: &Patient,
) -> Result<(), ContractError> {
    if *caller == patient.owner || *caller == config::get_admin(env)? {
        return Ok(());
    }
    Err(ContractError::Unauthorized)
}

pub fn request_access(
    env: &Env,
    doctor: Address,
    patient_id: u64,
    document_id: u64,
    notes: Option<String>,
) -> Result<Patient, ContractError> {
    let config = config::get_config(env)?;
    let mut patient = store::load(env, patient_id)?;
    let now = env.ledger().timestamp();

    let document = store::load_document(env, patient_id, document_id)?;
    access::request(env, &mut patient, &document, &doctor, notes, now)?;

    let mut details = AuditDetails::empty();
    details.document_id = Some(document_id);
    details.document_name = Some(document.name);
    audit::append(
        env,
        &config,
        &mut patient,
        AuditAction::DocumentAccessRequested,
        Actor::Account(doctor.clone()),
        details,
    );

    patient.updated_at = now;
    store::save(env, &mut patient)?;

    events::publish_access_requested(env, patient_id, document_id, doctor);

    Ok(patient)
}

pub fn update_access(
    env: &Env,
    caller: &Address,
    patient_id: u64,
    document_id: u64,
    doctor: Address,
    status: AccessStatus,
    expires_in_hours: Option<u32>,
) -> Result<Patient, ContractError> {
    if status == AccessStatus::Pending {
        return Err(ContractError::InvalidStatus);
    }

    let config = config::get_config(env)?;
    let hours = config.expiry_hours(expires_in_hours)?;
    let mut patient = store::load(env, patient_id)?;
    require_owner_or_admin(env, caller, &patient)?;
    let now = env.ledger().timestamp();

    let decision = access::decide(env, &patient, document_id, &doctor, status, hours, now)?;
    let (matched, expires_at) = match decision {
        Decision::Applied { expires_at } => (true, expires_at),
        Decision::NoPending => (false, None),
    };
    if !matched && config.strict_access_updates {
        return Err(ContractError::NoPendingRequest);
    }

    let action = if status == AccessStatus::Approved {
        AuditAction::DocumentAccessApproved
    } else {
        AuditAction::DocumentAccessRejected
    };
    let mut details = AuditDetails::empty();
    details.document_id = Some(document_id);
    details.doctor = Some(doctor.clone());
    if status == AccessStatus::Approved {
        details.expires_in_hours = Some(hours);
    }
    details.matched = Some(matched);
    audit::append(env, &config, &mut patient, action, Actor::System, details);

    patient.updated_at = now;
    store::save(env, &mut patient)?;

    events::publish_access_decided(
        env,
        patient_id,
        document_id,
        doctor,
        status,
        expires_at,
        matched,
    );

    Ok(patient)
}

pub fn list_access_requests(
    env: &Env,
    patient_id: u64,
    offset: u64,
    limit: u32,
) -> Result<Vec<AccessRequestView>, ContractError> {
    let patient = store::load(env, patient_id)?;
    access::page(env, &patient, offset, limit)
}

/// False for unknown patients and documents.
pub fn has_document_access(
    env: &Env,
    patient_id: u64,
    document_id: u64,
    doctor: &Address,
) -> Result<bool, ContractError> {
    if store::find_by_id(env, patient_id)?.is_none() {
        return Ok(false);
    }
    Ok(access::is_access_active(
        env,
        patient_id,
        document_id,
        doctor,
        env.ledger().timestamp(),
    ))
}
