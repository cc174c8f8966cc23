use soroban_sdk::{contracttype, Address, Bytes, String, Vec};

/// Schema version written on every saved patient record.
pub const SCHEMA_VERSION: u32 = 1;

/// Patient gender as captured at onboarding
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Identifying and contact details. No behaviour beyond validation at
/// registration; `national_id` and `phone` form the registration identity.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PersonalInfo {
    pub full_name: String,
    pub date_of_birth: String,
    pub gender: Gender,
    pub blood_group: String,
    pub national_id: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub emergency_contact: String,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Surgery {
    pub name: String,
    pub date: String,
    pub notes: Option<String>,
}

/// Free-form medical history lists
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MedicalInfo {
    pub allergies: Vec<String>,
    pub current_medications: Vec<String>,
    pub chronic_conditions: Vec<String>,
    pub surgeries: Vec<Surgery>,
}

/// State of a doctor's claim on a document
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AccessStatus {
    /// Awaiting a decision from the patient
    Pending,
    /// Granted until `expires_at`
    Approved,
    /// Refused
    Rejected,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessRequest {
    pub document_id: u64,
    pub doctor: Address,
    pub status: AccessStatus,
    pub requested_at: u64,
    /// Set only once the request is approved.
    pub expires_at: Option<u64>,
    pub notes: Option<String>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Document {
    pub id: u64,
    pub name: String,
    pub doc_type: String,
    pub size: u64,
    pub cid: String,
    pub uploaded_at: u64,
}

/// Audited action tags
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AuditAction {
    PatientCreated,
    DocumentUploaded,
    DocumentAccessRequested,
    DocumentAccessApproved,
    DocumentAccessRejected,
}

/// Who performed an audited action
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Actor {
    System,
    Account(Address),
}

/// Action-specific metadata. Only the keys relevant to the action are set.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuditDetails {
    pub document_id: Option<u64>,
    pub document_name: Option<String>,
    pub doctor: Option<Address>,
    pub expires_in_hours: Option<u32>,
    /// For access decisions: whether a pending request was found.
    pub matched: Option<bool>,
}

impl AuditDetails {
    pub fn empty() -> Self {
        AuditDetails {
            document_id: None,
            document_name: None,
            doctor: None,
            expires_in_hours: None,
            matched: None,
        }
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuditEntry {
    pub timestamp: u64,
    pub action: AuditAction,
    pub actor: Actor,
    pub details: AuditDetails,
    /// Transaction id from the record ledger, when anchoring is configured.
    pub ledger_tx: Option<String>,
}

/// Patient header as persisted by the record store.
///
/// Documents, access requests and audit entries live under their own keys,
/// numbered `1..=count`; the header only carries the counters.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Patient {
    pub id: u64,
    pub owner: Address,
    pub personal_info: PersonalInfo,
    pub medical_info: MedicalInfo,
    pub document_count: u64,
    pub request_count: u64,
    pub audit_count: u64,
    pub created_at: u64,
    pub updated_at: u64,
    pub schema_version: u32,
    /// Optimistic-concurrency counter, bumped by every save.
    pub version: u32,
}

/// Metadata for a document whose bytes are already stored elsewhere
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DocumentInput {
    pub name: String,
    pub doc_type: String,
    pub size: u64,
    pub cid: String,
}

/// A file upload: bytes go to the content store, metadata to the patient
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DocumentUpload {
    pub title: String,
    pub doc_type: String,
    pub mime_type: String,
    pub content: Bytes,
}

/// One row of `list_access_requests`
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessRequestView {
    pub document_id: u64,
    pub document_name: String,
    pub doctor: Address,
    pub status: AccessStatus,
    pub requested_at: u64,
    pub expires_at: Option<u64>,
    pub notes: Option<String>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OnboardResult {
    pub patient_id: u64,
    pub is_new: bool,
}
