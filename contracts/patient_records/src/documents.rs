use health_common::ContentStoreClient;
use soroban_sdk::{Address, Bytes, Env, String, Vec};

use crate::access;
use crate::access_control::require_owner_or_admin;
use crate::audit;
use crate::config;
use crate::errors::ContractError;
use crate::events;
use crate::store;
use crate::types::{
    Actor, AuditAction, AuditDetails, Document, DocumentInput, DocumentUpload, Patient,
};
use crate::validation::{self, DEFAULT_DOCUMENT_TYPE};

/// Attaches a document whose bytes are already stored under `input.cid`.
pub fn add_document(
    env: &Env,
    caller: &Address,
    patient_id: u64,
    input: DocumentInput,
) -> Result<Patient, ContractError> {
    let config = config::get_config(env)?;
    let mut patient = store::load(env, patient_id)?;
    require_owner_or_admin(env, caller, &patient)?;
    validation::validate_document(&input, config.max_document_size)?;

    let now = env.ledger().timestamp();
    let doc_type = if input.doc_type.len() == 0 {
        String::from_str(env, DEFAULT_DOCUMENT_TYPE)
    } else {
        input.doc_type
    };
    let document = Document {
        id: patient
            .document_count
            .checked_add(1)
            .ok_or(ContractError::StorageUnavailable)?,
        name: input.name,
        doc_type,
        size: input.size,
        cid: input.cid,
        uploaded_at: now,
    };
    store::put_document(env, patient_id, &document);
    patient.document_count = document.id;

    let mut details = AuditDetails::empty();
    details.document_id = Some(document.id);
    details.document_name = Some(document.name.clone());
    audit::append(
        env,
        &config,
        &mut patient,
        AuditAction::DocumentUploaded,
        Actor::System,
        details,
    );

    patient.updated_at = now;
    store::save(env, &mut patient)?;

    events::publish_document_uploaded(
        env,
        patient_id,
        document.id,
        document.name,
        document.cid,
        document.size,
    );

    Ok(patient)
}

/// Validates the file, stores its bytes in the content store and attaches
/// the resulting reference to the patient. Returns the new document.
pub fn upload_document(
    env: &Env,
    caller: &Address,
    patient_id: u64,
    upload: DocumentUpload,
) -> Result<Document, ContractError> {
    let config = config::get_config(env)?;
    validation::validate_title(&upload.title)?;
    validation::validate_mime_type(env, &upload.mime_type)?;
    let size = u64::from(upload.content.len());
    validation::validate_size(size, config.max_document_size)?;

    let content_store = config
        .content_store
        .ok_or(ContractError::ContentStoreNotConfigured)?;
    let patient = store::load(env, patient_id)?;
    require_owner_or_admin(env, caller, &patient)?;

    let cid = ContentStoreClient::new(env, &content_store).put(&upload.content);

    let input = DocumentInput {
        name: upload.title,
        doc_type: upload.doc_type,
        size,
        cid,
    };
    let patient = add_document(env, caller, patient_id, input)?;
    store::load_document(env, patient_id, patient.document_count)
}

pub fn get_document(env: &Env, patient_id: u64, document_id: u64) -> Result<Document, ContractError> {
    store::load(env, patient_id)?;
    store::load_document(env, patient_id, document_id)
}

/// One page of the patient's documents in id order.
pub fn list_documents(
    env: &Env,
    patient_id: u64,
    offset: u64,
    limit: u32,
) -> Result<Vec<Document>, ContractError> {
    let patient = store::load(env, patient_id)?;
    store::document_page(env, &patient, offset, limit)
}

/// Owner, admin, or a doctor holding an approved and unexpired request may
/// read the bytes.
pub fn get_document_content(
    env: &Env,
    caller: &Address,
    patient_id: u64,
    document_id: u64,
) -> Result<Bytes, ContractError> {
    let config = config::get_config(env)?;
    let patient = store::load(env, patient_id)?;
    let document = store::load_document(env, patient_id, document_id)?;

    let allowed = require_owner_or_admin(env, caller, &patient).is_ok()
        || access::is_access_active(
            env,
            patient_id,
            document_id,
            caller,
            env.ledger().timestamp(),
        );
    if !allowed {
        return Err(ContractError::AccessDenied);
    }

    let content_store = config
        .content_store
        .ok_or(ContractError::ContentStoreNotConfigured)?;
    ContentStoreClient::new(env, &content_store)
        .get(&document.cid)
        .ok_or(ContractError::ContentNotFound)
}
