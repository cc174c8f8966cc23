use soroban_sdk::{contracterror, contracttype, log, Env, Symbol};

/// Error categories, one per failure kind a caller has to handle differently
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorCategory {
    /// Validation errors: missing fields, bad status, bad file type or size
    Validation = 1,
    /// Authorization errors: caller may not act on this patient or document
    Authorization = 2,
    /// Not found errors: patient, document or pending request lookup failures
    NotFound = 3,
    /// Conflict errors: duplicate registration, duplicate pending request, stale version
    Conflict = 4,
    /// Storage errors: the record store cannot be read consistently
    Storage = 5,
    /// System errors: contract lifecycle and collaborator wiring
    System = 6,
}

impl ErrorCategory {
    /// HTTP status a transport layer reports for this category.
    pub fn status_code(&self) -> u32 {
        match self {
            ErrorCategory::Validation => 400,
            ErrorCategory::Authorization => 401,
            ErrorCategory::NotFound => 404,
            ErrorCategory::Conflict => 409,
            ErrorCategory::Storage | ErrorCategory::System => 500,
        }
    }
}

/// Error severity levels indicating the impact and urgency of errors
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorSeverity {
    Low = 1,
    Medium = 2,
    High = 3,
    Critical = 4,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    PatientNotFound = 4,
    DocumentNotFound = 5,
    InvalidInput = 6,
    MissingField = 7,
    InvalidStatus = 8,
    InvalidFileType = 9,
    FileTooLarge = 10,
    InvalidExpiry = 11,
    PatientAlreadyExists = 12,
    AccessRequestPending = 13,
    NoPendingRequest = 14,
    VersionConflict = 15,
    StorageUnavailable = 16,
    UnsupportedSchema = 17,
    ContentStoreNotConfigured = 18,
    ContentNotFound = 19,
    AccessDenied = 20,
    LedgerNotConfigured = 21,
}

impl ContractError {
    /// Returns the error category for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ContractError::InvalidInput
            | ContractError::MissingField
            | ContractError::InvalidStatus
            | ContractError::InvalidFileType
            | ContractError::FileTooLarge
            | ContractError::InvalidExpiry => ErrorCategory::Validation,
            ContractError::Unauthorized | ContractError::AccessDenied => {
                ErrorCategory::Authorization
            }
            ContractError::PatientNotFound
            | ContractError::DocumentNotFound
            | ContractError::NoPendingRequest
            | ContractError::ContentNotFound => ErrorCategory::NotFound,
            ContractError::PatientAlreadyExists
            | ContractError::AccessRequestPending
            | ContractError::VersionConflict => ErrorCategory::Conflict,
            ContractError::StorageUnavailable | ContractError::UnsupportedSchema => {
                ErrorCategory::Storage
            }
            ContractError::NotInitialized
            | ContractError::AlreadyInitialized
            | ContractError::ContentStoreNotConfigured
            | ContractError::LedgerNotConfigured => ErrorCategory::System,
        }
    }

    /// Returns the severity level for this error.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::NotFound => ErrorSeverity::Low,
            ErrorCategory::Authorization | ErrorCategory::Conflict => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// Every failure is terminal for the invocation that raised it; a
    /// `VersionConflict` is resolved by reloading, not by replaying.
    pub fn retryable(&self) -> bool {
        false
    }

    /// Returns a human-readable error message for this error.
    pub fn message(&self) -> &'static str {
        match self {
            ContractError::NotInitialized => "Contract has not been initialized",
            ContractError::AlreadyInitialized => "Contract is already initialized",
            ContractError::Unauthorized => "Caller is not authorized for this operation",
            ContractError::PatientNotFound => "Patient not found",
            ContractError::DocumentNotFound => "Document not found",
            ContractError::InvalidInput => "Invalid input parameters provided",
            ContractError::MissingField => "A required field is missing",
            ContractError::InvalidStatus => "Status must be either approved or rejected",
            ContractError::InvalidFileType => {
                "Invalid file type. Only documents, PDFs, and images are allowed"
            }
            ContractError::FileTooLarge => "File size exceeds the configured limit",
            ContractError::InvalidExpiry => "Expiry hours exceed the configured maximum",
            ContractError::PatientAlreadyExists => {
                "Patient with same national id or phone number already exists"
            }
            ContractError::AccessRequestPending => "Access request already pending",
            ContractError::NoPendingRequest => "No pending access request for this doctor",
            ContractError::VersionConflict => "Patient record was modified concurrently",
            ContractError::StorageUnavailable => "Record store is unavailable",
            ContractError::UnsupportedSchema => "Stored record uses an unsupported schema",
            ContractError::ContentStoreNotConfigured => "No content store is configured",
            ContractError::ContentNotFound => "Document content not found in content store",
            ContractError::AccessDenied => "Access denied to the requested document",
            ContractError::LedgerNotConfigured => "No record ledger is configured",
        }
    }
}

/// Writes a diagnostic log line for a failed operation and hands the error
/// back so call sites can `return Err(log_error(..))`.
pub fn log_error(env: &Env, operation: Symbol, error: ContractError) -> ContractError {
    log!(
        env,
        "operation failed",
        operation,
        error as u32,
        error.category() as u32
    );
    error
}
