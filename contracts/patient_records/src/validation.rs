use soroban_sdk::{Env, String};

use crate::errors::ContractError;
use crate::types::{DocumentInput, PersonalInfo};

/// MIME types accepted by `upload_document`.
pub const ALLOWED_FILE_TYPES: [&str; 8] = [
    "application/pdf",
    "image/jpeg",
    "image/png",
    "image/gif",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

pub const DEFAULT_DOCUMENT_TYPE: &str = "general";

fn require(field: &String) -> Result<(), ContractError> {
    if field.len() == 0 {
        return Err(ContractError::MissingField);
    }
    Ok(())
}

/// Every onboarding field is required.
pub fn validate_personal_info(info: &PersonalInfo) -> Result<(), ContractError> {
    require(&info.full_name)?;
    require(&info.date_of_birth)?;
    require(&info.blood_group)?;
    require(&info.national_id)?;
    require(&info.phone)?;
    require(&info.email)?;
    require(&info.address)?;
    require(&info.emergency_contact)?;
    Ok(())
}

pub fn validate_document(input: &DocumentInput, max_size: u64) -> Result<(), ContractError> {
    require(&input.name)?;
    require(&input.cid)?;
    validate_size(input.size, max_size)
}

pub fn validate_size(size: u64, max_size: u64) -> Result<(), ContractError> {
    if size > max_size {
        return Err(ContractError::FileTooLarge);
    }
    Ok(())
}

pub fn validate_title(title: &String) -> Result<(), ContractError> {
    require(title)
}

pub fn validate_mime_type(env: &Env, mime_type: &String) -> Result<(), ContractError> {
    if ALLOWED_FILE_TYPES
        .iter()
        .any(|allowed| *mime_type == String::from_str(env, allowed))
    {
        Ok(())
    } else {
        Err(ContractError::InvalidFileType)
    }
}
