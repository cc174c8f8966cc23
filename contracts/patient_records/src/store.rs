//! Record store.
//!
//! A patient is a small header under `DataKey::Patient(id)`. Everything that
//! grows with use gets its own entry, numbered from 1 per patient:
//! documents under `Document(patient, id)`, access requests under
//! `Request(patient, seq)` and audit entries under `Audit(patient, seq)`.
//! The header keeps the counters and the optimistic-concurrency version.
//! Registration identities are indexed by national id and by phone.
//! Patient ids are dense (`1..=count`).

use core::ops::RangeInclusive;

use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol, Vec};

use crate::errors::ContractError;
use crate::types::{AccessRequest, AuditEntry, Document, Patient, SCHEMA_VERSION};

const PATIENT_COUNTER: Symbol = symbol_short!("PAT_CTR");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

/// Largest page any list read returns.
pub const MAX_PAGE_SIZE: u32 = 50;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Patient(u64),
    NationalId(String),
    Phone(String),
    /// (patient, document id)
    Document(u64, u64),
    /// (patient, request seq)
    Request(u64, u64),
    /// (patient, document id, doctor) -> seq of the pending request
    Pending(u64, u64, Address),
    /// (patient, document id, doctor) -> latest approved `expires_at`
    Grant(u64, u64, Address),
    /// (patient, audit seq)
    Audit(u64, u64),
}

/// Extends the time-to-live (TTL) for a record store key.
fn extend_ttl_key(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn write<V>(env: &Env, key: &DataKey, value: &V)
where
    V: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
{
    env.storage().persistent().set(key, value);
    extend_ttl_key(env, key);
}

/// Sequence numbers `offset + 1 ..= offset + limit`, clamped to `count` and
/// to `MAX_PAGE_SIZE`. Empty once `offset >= count`.
pub fn page_range(count: u64, offset: u64, limit: u32) -> RangeInclusive<u64> {
    let limit = u64::from(limit.min(MAX_PAGE_SIZE));
    let first = offset.saturating_add(1);
    let last = offset.saturating_add(limit).min(count);
    first..=last
}

// ======================== Patients ========================

pub fn patient_count(env: &Env) -> u64 {
    env.storage().instance().get(&PATIENT_COUNTER).unwrap_or(0)
}

/// Reserves the next patient id.
pub fn next_patient_id(env: &Env) -> u64 {
    let id = patient_count(env).saturating_add(1);
    env.storage().instance().set(&PATIENT_COUNTER, &id);
    id
}

fn check_schema(patient: Patient) -> Result<Patient, ContractError> {
    if patient.schema_version > SCHEMA_VERSION {
        return Err(ContractError::UnsupportedSchema);
    }
    Ok(patient)
}

pub fn find_by_id(env: &Env, id: u64) -> Result<Option<Patient>, ContractError> {
    env.storage()
        .persistent()
        .get::<_, Patient>(&DataKey::Patient(id))
        .map(check_schema)
        .transpose()
}

pub fn load(env: &Env, id: u64) -> Result<Patient, ContractError> {
    find_by_id(env, id)?.ok_or(ContractError::PatientNotFound)
}

/// Both the national id and the phone number must belong to the same patient.
pub fn find_by_identifier(
    env: &Env,
    national_id: &String,
    phone: &String,
) -> Result<Option<Patient>, ContractError> {
    let id: Option<u64> = env
        .storage()
        .persistent()
        .get(&DataKey::NationalId(national_id.clone()));
    let Some(id) = id else {
        return Ok(None);
    };
    // An index entry pointing at nothing means the store is inconsistent.
    let patient = find_by_id(env, id)?.ok_or(ContractError::StorageUnavailable)?;
    if patient.personal_info.phone == *phone {
        Ok(Some(patient))
    } else {
        Ok(None)
    }
}

/// True if either identifier is already registered to some patient.
pub fn identity_taken(env: &Env, national_id: &String, phone: &String) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::NationalId(national_id.clone()))
        || env
            .storage()
            .persistent()
            .has(&DataKey::Phone(phone.clone()))
}

pub fn index_identity(env: &Env, patient: &Patient) {
    let national_key = DataKey::NationalId(patient.personal_info.national_id.clone());
    write(env, &national_key, &patient.id);

    let phone_key = DataKey::Phone(patient.personal_info.phone.clone());
    write(env, &phone_key, &patient.id);
}

/// Version of the stored header, 0 if there is none.
pub fn stored_version(env: &Env, id: u64) -> u32 {
    env.storage()
        .persistent()
        .get::<_, Patient>(&DataKey::Patient(id))
        .map_or(0, |stored| stored.version)
}

/// Writes the header if it was loaded at the currently stored version, then
/// bumps `patient.version`. A stale copy fails with `VersionConflict`.
pub fn save(env: &Env, patient: &mut Patient) -> Result<(), ContractError> {
    let current = stored_version(env, patient.id);
    if current != patient.version {
        return Err(ContractError::VersionConflict);
    }

    patient.version = current
        .checked_add(1)
        .ok_or(ContractError::StorageUnavailable)?;
    patient.schema_version = SCHEMA_VERSION;

    write(env, &DataKey::Patient(patient.id), &*patient);
    Ok(())
}

/// One page of patients in id order.
pub fn load_page(env: &Env, offset: u64, limit: u32) -> Result<Vec<Patient>, ContractError> {
    let mut patients = Vec::new(env);
    for id in page_range(patient_count(env), offset, limit) {
        let patient = find_by_id(env, id)?.ok_or(ContractError::StorageUnavailable)?;
        patients.push_back(patient);
    }
    Ok(patients)
}

/// Every patient header in id order. An empty store yields an empty list.
/// Round-trip counterpart of [`save_all`].
#[cfg(test)]
pub fn load_all(env: &Env) -> Result<Vec<Patient>, ContractError> {
    let mut patients = Vec::new(env);
    for id in 1..=patient_count(env) {
        let patient = find_by_id(env, id)?.ok_or(ContractError::StorageUnavailable)?;
        patients.push_back(patient);
    }
    Ok(patients)
}

/// Saves every header of the collection. Records identical to what is
/// stored are left untouched, so `save_all(load_all())` changes nothing.
/// Any failure aborts the invocation and with it every write made so far.
#[cfg(test)]
pub fn save_all(env: &Env, patients: &Vec<Patient>) -> Result<Vec<Patient>, ContractError> {
    let mut saved = Vec::new(env);
    for mut patient in patients.iter() {
        let existing = find_by_id(env, patient.id)?;
        if existing.as_ref() == Some(&patient) {
            saved.push_back(patient);
            continue;
        }

        if existing.is_none() {
            // New records must extend the dense id range.
            if patient.id != patient_count(env).saturating_add(1) {
                return Err(ContractError::InvalidInput);
            }
            env.storage().instance().set(&PATIENT_COUNTER, &patient.id);
            index_identity(env, &patient);
        }
        save(env, &mut patient)?;
        saved.push_back(patient);
    }
    Ok(saved)
}

// ======================== Documents ========================

pub fn put_document(env: &Env, patient_id: u64, document: &Document) {
    write(env, &DataKey::Document(patient_id, document.id), document);
}

pub fn load_document(env: &Env, patient_id: u64, document_id: u64) -> Result<Document, ContractError> {
    env.storage()
        .persistent()
        .get(&DataKey::Document(patient_id, document_id))
        .ok_or(ContractError::DocumentNotFound)
}

pub fn document_page(
    env: &Env,
    patient: &Patient,
    offset: u64,
    limit: u32,
) -> Result<Vec<Document>, ContractError> {
    let mut documents = Vec::new(env);
    for id in page_range(patient.document_count, offset, limit) {
        let document = load_document(env, patient.id, id)
            .map_err(|_| ContractError::StorageUnavailable)?;
        documents.push_back(document);
    }
    Ok(documents)
}

// ======================== Access requests ========================

pub fn put_request(env: &Env, patient_id: u64, seq: u64, request: &AccessRequest) {
    write(env, &DataKey::Request(patient_id, seq), request);
}

/// A sequence number below the header's counter with no entry means the
/// store is inconsistent.
pub fn load_request(env: &Env, patient_id: u64, seq: u64) -> Result<AccessRequest, ContractError> {
    env.storage()
        .persistent()
        .get(&DataKey::Request(patient_id, seq))
        .ok_or(ContractError::StorageUnavailable)
}

pub fn pending_request(env: &Env, patient_id: u64, document_id: u64, doctor: &Address) -> Option<u64> {
    env.storage()
        .persistent()
        .get(&DataKey::Pending(patient_id, document_id, doctor.clone()))
}

pub fn set_pending(env: &Env, patient_id: u64, document_id: u64, doctor: &Address, seq: u64) {
    write(
        env,
        &DataKey::Pending(patient_id, document_id, doctor.clone()),
        &seq,
    );
}

pub fn clear_pending(env: &Env, patient_id: u64, document_id: u64, doctor: &Address) {
    env.storage()
        .persistent()
        .remove(&DataKey::Pending(patient_id, document_id, doctor.clone()));
}

pub fn grant_expiry(env: &Env, patient_id: u64, document_id: u64, doctor: &Address) -> Option<u64> {
    env.storage()
        .persistent()
        .get(&DataKey::Grant(patient_id, document_id, doctor.clone()))
}

pub fn set_grant_expiry(
    env: &Env,
    patient_id: u64,
    document_id: u64,
    doctor: &Address,
    expires_at: u64,
) {
    write(
        env,
        &DataKey::Grant(patient_id, document_id, doctor.clone()),
        &expires_at,
    );
}

// ======================== Audit ========================

pub fn put_audit(env: &Env, patient_id: u64, seq: u64, entry: &AuditEntry) {
    write(env, &DataKey::Audit(patient_id, seq), entry);
}

pub fn audit_page(
    env: &Env,
    patient: &Patient,
    offset: u64,
    limit: u32,
) -> Result<Vec<AuditEntry>, ContractError> {
    let mut entries = Vec::new(env);
    for seq in page_range(patient.audit_count, offset, limit) {
        let entry = env
            .storage()
            .persistent()
            .get(&DataKey::Audit(patient.id, seq))
            .ok_or(ContractError::StorageUnavailable)?;
        entries.push_back(entry);
    }
    Ok(entries)
}
