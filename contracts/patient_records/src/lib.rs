#![no_std]
//! Patient document registry with per-doctor access requests and an
//! append-only audit trail.
//!
//! Patients own documents; doctors request access to a single document;
//! the patient (or the admin) approves with an expiry window or rejects.
//! Every state change is appended to the patient's audit log and, when a
//! record ledger is configured, anchored there.

pub mod access;
pub mod access_control;
pub mod audit;
pub mod config;
pub mod documents;
pub mod errors;
pub mod events;
pub mod registry;
pub mod store;
pub mod types;
pub mod validation;

use health_common::{LedgerClient, LedgerUpdate};
use soroban_sdk::{contract, contractimpl, symbol_short, Address, Bytes, Env, String, Vec};

pub use config::Config;
pub use store::MAX_PAGE_SIZE;
pub use errors::{log_error, ContractError, ErrorCategory, ErrorSeverity};
pub use types::{
    AccessRequest, AccessRequestView, AccessStatus, Actor, AuditAction, AuditDetails, AuditEntry,
    Document, DocumentInput, DocumentUpload, Gender, MedicalInfo, OnboardResult, Patient,
    PersonalInfo, Surgery, SCHEMA_VERSION,
};

#[contract]
pub struct PatientRecordsContract;

#[contractimpl]
impl PatientRecordsContract {
    /// Initialize the contract with an admin address and the default configuration
    pub fn initialize(env: Env, admin: Address) -> Result<(), ContractError> {
        if config::is_initialized(&env) {
            return Err(log_error(
                &env,
                symbol_short!("INIT"),
                ContractError::AlreadyInitialized,
            ));
        }

        admin.require_auth();

        config::init(&env, &admin);
        events::publish_initialized(&env, admin);

        Ok(())
    }

    /// Get the admin address
    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        config::get_admin(&env)
    }

    /// Check if the contract is initialized
    pub fn is_initialized(env: Env) -> bool {
        config::is_initialized(&env)
    }

    /// Current runtime configuration.
    pub fn get_config(env: Env) -> Result<Config, ContractError> {
        config::get_config(&env)
    }

    /// Replace the runtime configuration. Admin only.
    pub fn set_config(env: Env, caller: Address, new_config: Config) -> Result<(), ContractError> {
        caller.require_auth();

        let admin = config::get_admin(&env)?;
        if caller != admin {
            return Err(log_error(
                &env,
                symbol_short!("SET_CFG"),
                ContractError::Unauthorized,
            ));
        }

        config::set_config(&env, &new_config)
            .map_err(|e| log_error(&env, symbol_short!("SET_CFG"), e))?;
        events::publish_config_updated(
            &env,
            admin,
            new_config.default_expiry_hours,
            new_config.strict_access_updates,
        );

        Ok(())
    }

    // ======================== Registration ========================

    /// Register a new patient and return its id.
    /// Fails with `PatientAlreadyExists` if the national id or phone is taken.
    pub fn create_patient(
        env: Env,
        owner: Address,
        personal_info: PersonalInfo,
        medical_info: MedicalInfo,
    ) -> Result<u64, ContractError> {
        owner.require_auth();
        registry::create(&env, owner, personal_info, medical_info)
            .map(|patient| patient.id)
            .map_err(|e| log_error(&env, symbol_short!("CREATE"), e))
    }

    /// Idempotent onboarding: returns the existing patient for the same
    /// (national id, phone) identity instead of failing.
    pub fn onboard_patient(
        env: Env,
        owner: Address,
        personal_info: PersonalInfo,
        medical_info: MedicalInfo,
    ) -> Result<OnboardResult, ContractError> {
        owner.require_auth();
        registry::onboard(&env, owner, personal_info, medical_info)
            .map_err(|e| log_error(&env, symbol_short!("ONBOARD"), e))
    }

    /// Patient header: identity, medical history and collection counters.
    pub fn get_patient(env: Env, patient_id: u64) -> Result<Patient, ContractError> {
        store::load(&env, patient_id).map_err(|e| log_error(&env, symbol_short!("GET_PAT"), e))
    }

    /// Look up a patient by national id and phone; both must match.
    pub fn find_patient(
        env: Env,
        national_id: String,
        phone: String,
    ) -> Result<Patient, ContractError> {
        store::find_by_identifier(&env, &national_id, &phone)
            .and_then(|found| found.ok_or(ContractError::PatientNotFound))
            .map_err(|e| log_error(&env, symbol_short!("FIND_PAT"), e))
    }

    /// Up to `limit` patients in id order, skipping the first `offset`.
    pub fn list_patients(env: Env, offset: u64, limit: u32) -> Result<Vec<Patient>, ContractError> {
        store::load_page(&env, offset, limit)
            .map_err(|e| log_error(&env, symbol_short!("LIST_PAT"), e))
    }

    /// Number of registered patients.
    pub fn patient_count(env: Env) -> u64 {
        store::patient_count(&env)
    }

    // ======================== Documents ========================

    /// Attach a document whose bytes are already stored under `input.cid`.
    pub fn add_document(
        env: Env,
        caller: Address,
        patient_id: u64,
        input: DocumentInput,
    ) -> Result<Patient, ContractError> {
        caller.require_auth();
        documents::add_document(&env, &caller, patient_id, input)
            .map_err(|e| log_error(&env, symbol_short!("ADD_DOC"), e))
    }

    /// Validate a file, put its bytes in the content store and attach it.
    pub fn upload_document(
        env: Env,
        caller: Address,
        patient_id: u64,
        upload: DocumentUpload,
    ) -> Result<Document, ContractError> {
        caller.require_auth();
        documents::upload_document(&env, &caller, patient_id, upload)
            .map_err(|e| log_error(&env, symbol_short!("UPLOAD"), e))
    }

    /// A single document's metadata.
    pub fn get_document(env: Env, patient_id: u64, document_id: u64) -> Result<Document, ContractError> {
        documents::get_document(&env, patient_id, document_id)
            .map_err(|e| log_error(&env, symbol_short!("GET_DOC"), e))
    }

    /// Up to `limit` of the patient's documents in id order, skipping the first `offset`.
    pub fn list_documents(
        env: Env,
        patient_id: u64,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Document>, ContractError> {
        documents::list_documents(&env, patient_id, offset, limit)
            .map_err(|e| log_error(&env, symbol_short!("LIST_DOC"), e))
    }

    /// Fetch a document's bytes from the content store.
    pub fn get_document_content(
        env: Env,
        caller: Address,
        patient_id: u64,
        document_id: u64,
    ) -> Result<Bytes, ContractError> {
        caller.require_auth();
        documents::get_document_content(&env, &caller, patient_id, document_id)
            .map_err(|e| log_error(&env, symbol_short!("CONTENT"), e))
    }

    // ======================== Access requests ========================

    /// A doctor asks for access to one document. Only one pending request
    /// per doctor and document may exist.
    pub fn request_access(
        env: Env,
        doctor: Address,
        patient_id: u64,
        document_id: u64,
        notes: Option<String>,
    ) -> Result<Patient, ContractError> {
        doctor.require_auth();
        access_control::request_access(&env, doctor, patient_id, document_id, notes)
            .map_err(|e| log_error(&env, symbol_short!("REQ_ACC"), e))
    }

    /// Approve or reject the doctor's pending request. `expires_in_hours`
    /// of `None` or `0` uses the configured default.
    pub fn update_access(
        env: Env,
        caller: Address,
        patient_id: u64,
        document_id: u64,
        doctor: Address,
        status: AccessStatus,
        expires_in_hours: Option<u32>,
    ) -> Result<Patient, ContractError> {
        caller.require_auth();
        access_control::update_access(
            &env,
            &caller,
            patient_id,
            document_id,
            doctor,
            status,
            expires_in_hours,
        )
        .map_err(|e| log_error(&env, symbol_short!("UPD_ACC"), e))
    }

    /// Access requests across all of the patient's documents, oldest first.
    /// Pages like `list_documents`.
    pub fn list_access_requests(
        env: Env,
        patient_id: u64,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<AccessRequestView>, ContractError> {
        access_control::list_access_requests(&env, patient_id, offset, limit)
            .map_err(|e| log_error(&env, symbol_short!("LIST_ACC"), e))
    }

    /// True while the doctor holds an approved, unexpired request on the document.
    pub fn has_document_access(
        env: Env,
        patient_id: u64,
        document_id: u64,
        doctor: Address,
    ) -> Result<bool, ContractError> {
        access_control::has_document_access(&env, patient_id, document_id, &doctor)
    }

    // ======================== Audit ========================

    /// The patient's audit entries in append order. Pages like `list_documents`.
    pub fn get_audit_log(
        env: Env,
        patient_id: u64,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<AuditEntry>, ContractError> {
        store::load(&env, patient_id)
            .and_then(|patient| store::audit_page(&env, &patient, offset, limit))
            .map_err(|e| log_error(&env, symbol_short!("AUDIT"), e))
    }

    /// Updates anchored on the record ledger for this patient.
    pub fn get_ledger_history(
        env: Env,
        patient_id: u64,
    ) -> Result<Vec<LedgerUpdate>, ContractError> {
        let ledger = config::get_config(&env)
            .and_then(|config| {
                store::load(&env, patient_id)?;
                config.ledger.ok_or(ContractError::LedgerNotConfigured)
            })
            .map_err(|e| log_error(&env, symbol_short!("HISTORY"), e))?;
        Ok(LedgerClient::new(&env, &ledger).evaluate(&patient_id))
    }

    /// Contract version
    pub fn version() -> u32 {
        1
    }
}

#[cfg(test)]
mod test_access;
