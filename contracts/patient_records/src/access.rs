//! Access request state machine.
//!
//! ```text
//!         request
//!  (none) ───────► Pending ──decide(Approved)──► Approved (terminal, expires_at set)
//!                     └──────decide(Rejected)──► Rejected (terminal)
//! ```
//!
//! Requests are kept per patient in creation order under
//! `Request(patient, seq)`. Two side indexes keep every check a single read:
//! `Pending(patient, document, doctor)` points at the one open request, and
//! `Grant(patient, document, doctor)` holds the latest approved expiry.
//! Auditing and saving the header are the caller's job.

use soroban_sdk::{Address, Env, String, Vec};

use crate::errors::ContractError;
use crate::store;
use crate::types::{AccessRequest, AccessRequestView, AccessStatus, Document, Patient};

const SECONDS_PER_HOUR: u64 = 3600;

/// Outcome of a decision on a document's ledger
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Decision {
    /// A pending request was moved to the requested status.
    Applied { expires_at: Option<u64> },
    /// The doctor had no pending request; nothing changed.
    NoPending,
}

pub fn has_pending(env: &Env, patient_id: u64, document_id: u64, doctor: &Address) -> bool {
    store::pending_request(env, patient_id, document_id, doctor).is_some()
}

pub fn expiry(now: u64, hours: u32) -> u64 {
    now.saturating_add(u64::from(hours).saturating_mul(SECONDS_PER_HOUR))
}

/// Opens a new pending request and bumps `patient.request_count`. Terminal
/// requests by the same doctor do not block; only a pending one does.
pub fn request(
    env: &Env,
    patient: &mut Patient,
    document: &Document,
    doctor: &Address,
    notes: Option<String>,
    now: u64,
) -> Result<AccessRequest, ContractError> {
    if has_pending(env, patient.id, document.id, doctor) {
        return Err(ContractError::AccessRequestPending);
    }

    let seq = patient
        .request_count
        .checked_add(1)
        .ok_or(ContractError::StorageUnavailable)?;
    let request = AccessRequest {
        document_id: document.id,
        doctor: doctor.clone(),
        status: AccessStatus::Pending,
        requested_at: now,
        expires_at: None,
        notes,
    };
    store::put_request(env, patient.id, seq, &request);
    store::set_pending(env, patient.id, document.id, doctor, seq);
    patient.request_count = seq;

    Ok(request)
}

/// Moves the doctor's pending request on `document_id` to `status`.
pub fn decide(
    env: &Env,
    patient: &Patient,
    document_id: u64,
    doctor: &Address,
    status: AccessStatus,
    expires_in_hours: u32,
    now: u64,
) -> Result<Decision, ContractError> {
    if status == AccessStatus::Pending {
        return Err(ContractError::InvalidStatus);
    }
    store::load_document(env, patient.id, document_id)?;

    let Some(seq) = store::pending_request(env, patient.id, document_id, doctor) else {
        return Ok(Decision::NoPending);
    };

    let expires_at = match status {
        AccessStatus::Approved => Some(expiry(now, expires_in_hours)),
        _ => None,
    };

    let mut request = store::load_request(env, patient.id, seq)?;
    request.status = status;
    request.expires_at = expires_at;
    store::put_request(env, patient.id, seq, &request);
    store::clear_pending(env, patient.id, document_id, doctor);

    if let Some(expires_at) = expires_at {
        let current = store::grant_expiry(env, patient.id, document_id, doctor);
        if current.map_or(true, |exp| exp < expires_at) {
            store::set_grant_expiry(env, patient.id, document_id, doctor, expires_at);
        }
    }

    Ok(Decision::Applied { expires_at })
}

/// An approved, unexpired request grants access. Expiry is checked here, at
/// the point of use; nothing ever demotes the stored request.
pub fn is_access_active(
    env: &Env,
    patient_id: u64,
    document_id: u64,
    doctor: &Address,
    now: u64,
) -> bool {
    store::grant_expiry(env, patient_id, document_id, doctor).map_or(false, |exp| exp > now)
}

/// One page of the patient's requests across all documents, oldest first.
/// Requests made at the same timestamp keep creation order.
pub fn page(
    env: &Env,
    patient: &Patient,
    offset: u64,
    limit: u32,
) -> Result<Vec<AccessRequestView>, ContractError> {
    let mut views = Vec::new(env);
    for seq in store::page_range(patient.request_count, offset, limit) {
        let req = store::load_request(env, patient.id, seq)?;
        let document = store::load_document(env, patient.id, req.document_id)
            .map_err(|_| ContractError::StorageUnavailable)?;
        views.push_back(AccessRequestView {
            document_id: req.document_id,
            document_name: document.name,
            doctor: req.doctor,
            status: req.status,
            requested_at: req.requested_at,
            expires_at: req.expires_at,
            notes: req.notes,
        });
    }
    Ok(views)
}
