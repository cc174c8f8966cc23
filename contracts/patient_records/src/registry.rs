use soroban_sdk::{Address, Env};

use crate::audit;
use crate::config;
use crate::errors::ContractError;
use crate::events;
use crate::store;
use crate::types::{
    Actor, AuditAction, AuditDetails, MedicalInfo, OnboardResult, Patient, PersonalInfo,
    SCHEMA_VERSION,
};
use crate::validation;

/// Registers a new patient. A national id or phone number that is already
/// registered is refused.
pub fn create(
    env: &Env,
    owner: Address,
    personal_info: PersonalInfo,
    medical_info: MedicalInfo,
) -> Result<Patient, ContractError> {
    let config = config::get_config(env)?;
    validation::validate_personal_info(&personal_info)?;

    if store::identity_taken(env, &personal_info.national_id, &personal_info.phone) {
        return Err(ContractError::PatientAlreadyExists);
    }

    let now = env.ledger().timestamp();
    let mut patient = Patient {
        id: store::next_patient_id(env),
        owner: owner.clone(),
        personal_info,
        medical_info,
        document_count: 0,
        request_count: 0,
        audit_count: 0,
        created_at: now,
        updated_at: now,
        schema_version: SCHEMA_VERSION,
        version: 0,
    };

    audit::append(
        env,
        &config,
        &mut patient,
        AuditAction::PatientCreated,
        Actor::System,
        AuditDetails::empty(),
    );

    store::index_identity(env, &patient);
    store::save(env, &mut patient)?;

    events::publish_patient_created(env, patient.id, owner);

    Ok(patient)
}

/// Returns the already registered patient for this (national id, phone)
/// identity, or registers a new one.
pub fn onboard(
    env: &Env,
    owner: Address,
    personal_info: PersonalInfo,
    medical_info: MedicalInfo,
) -> Result<OnboardResult, ContractError> {
    validation::validate_personal_info(&personal_info)?;

    if let Some(existing) =
        store::find_by_identifier(env, &personal_info.national_id, &personal_info.phone)?
    {
        return Ok(OnboardResult {
            patient_id: existing.id,
            is_new: false,
        });
    }

    let patient = create(env, owner, personal_info, medical_info)?;
    Ok(OnboardResult {
        patient_id: patient.id,
        is_new: true,
    })
}
