#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]

use super::access::{self, Decision};
use super::*;
use soroban_sdk::testutils::Address as _;
use soroban_sdk::Env;

const NOW: u64 = 1_700_000_000;

fn document(env: &Env, id: u64, name: &str) -> Document {
    Document {
        id,
        name: String::from_str(env, name),
        doc_type: String::from_str(env, "lab"),
        size: 2048,
        cid: String::from_str(env, "bafkreigh2akiscaildc"),
        uploaded_at: NOW,
    }
}

/// Registers the contract and stores a patient header plus `names` as its
/// documents. Everything after this must run inside `env.as_contract`.
fn setup(names: &[&str]) -> (Env, Address, Patient) {
    let env = Env::default();
    let contract_id = env.register(PatientRecordsContract, ());

    let patient = Patient {
        id: 1,
        owner: Address::generate(&env),
        personal_info: PersonalInfo {
            full_name: String::from_str(&env, "Asha Rao"),
            date_of_birth: String::from_str(&env, "1990-04-12"),
            gender: Gender::Female,
            blood_group: String::from_str(&env, "O+"),
            national_id: String::from_str(&env, "123412341234"),
            phone: String::from_str(&env, "9876543210"),
            email: String::from_str(&env, "asha@example.com"),
            address: String::from_str(&env, "Bengaluru"),
            emergency_contact: String::from_str(&env, "Ravi"),
        },
        medical_info: MedicalInfo {
            allergies: Vec::new(&env),
            current_medications: Vec::new(&env),
            chronic_conditions: Vec::new(&env),
            surgeries: Vec::new(&env),
        },
        document_count: names.len() as u64,
        request_count: 0,
        audit_count: 0,
        created_at: NOW,
        updated_at: NOW,
        schema_version: SCHEMA_VERSION,
        version: 0,
    };

    env.as_contract(&contract_id, || {
        for (i, name) in names.iter().enumerate() {
            store::put_document(&env, patient.id, &document(&env, i as u64 + 1, name));
        }
    });

    (env, contract_id, patient)
}

fn doc(env: &Env, patient: &Patient, id: u64) -> Document {
    store::load_document(env, patient.id, id).unwrap()
}

fn all_requests(env: &Env, patient: &Patient) -> Vec<AccessRequestView> {
    access::page(env, patient, 0, MAX_PAGE_SIZE).unwrap()
}

#[test]
fn test_request_creates_pending_entry() {
    let (env, contract_id, mut patient) = setup(&["Blood Test"]);
    let doctor = Address::generate(&env);
    let notes = Some(String::from_str(&env, "follow-up"));

    env.as_contract(&contract_id, || {
        let document = doc(&env, &patient, 1);
        let req = access::request(&env, &mut patient, &document, &doctor, notes.clone(), NOW)
            .unwrap();

        assert_eq!(req.document_id, 1);
        assert_eq!(req.doctor, doctor);
        assert_eq!(req.status, AccessStatus::Pending);
        assert_eq!(req.requested_at, NOW);
        assert_eq!(req.expires_at, None);
        assert_eq!(req.notes, notes);

        assert_eq!(patient.request_count, 1);
        assert_eq!(store::load_request(&env, patient.id, 1).unwrap(), req);
        assert!(access::has_pending(&env, patient.id, 1, &doctor));
    });
}

#[test]
fn test_second_pending_request_conflicts() {
    let (env, contract_id, mut patient) = setup(&["Blood Test"]);
    let doctor = Address::generate(&env);

    env.as_contract(&contract_id, || {
        let document = doc(&env, &patient, 1);
        access::request(&env, &mut patient, &document, &doctor, None, NOW).unwrap();
        let result = access::request(&env, &mut patient, &document, &doctor, None, NOW + 5);

        assert_eq!(result, Err(ContractError::AccessRequestPending));
        assert_eq!(patient.request_count, 1);
    });
}

#[test]
fn test_pending_is_scoped_to_doctor_and_document() {
    let (env, contract_id, mut patient) = setup(&["Blood Test", "X-Ray"]);
    let doctor = Address::generate(&env);
    let other = Address::generate(&env);

    env.as_contract(&contract_id, || {
        let blood = doc(&env, &patient, 1);
        let xray = doc(&env, &patient, 2);
        access::request(&env, &mut patient, &blood, &doctor, None, NOW).unwrap();
        access::request(&env, &mut patient, &blood, &other, None, NOW).unwrap();
        access::request(&env, &mut patient, &xray, &doctor, None, NOW).unwrap();

        assert_eq!(patient.request_count, 3);
        let views = all_requests(&env, &patient);
        assert_eq!(views.iter().filter(|v| v.document_id == 1).count(), 2);
        assert_eq!(views.iter().filter(|v| v.document_id == 2).count(), 1);
    });
}

#[test]
fn test_decide_unknown_document() {
    let (env, contract_id, patient) = setup(&["Blood Test"]);
    let doctor = Address::generate(&env);

    env.as_contract(&contract_id, || {
        assert_eq!(
            access::decide(&env, &patient, 9, &doctor, AccessStatus::Approved, 24, NOW),
            Err(ContractError::DocumentNotFound)
        );
        assert_eq!(
            store::load_document(&env, patient.id, 9),
            Err(ContractError::DocumentNotFound)
        );
    });
}

#[test]
fn test_approve_sets_expiry() {
    let (env, contract_id, mut patient) = setup(&["Blood Test"]);
    let doctor = Address::generate(&env);

    env.as_contract(&contract_id, || {
        let document = doc(&env, &patient, 1);
        access::request(&env, &mut patient, &document, &doctor, None, NOW).unwrap();

        let decision = access::decide(
            &env,
            &patient,
            1,
            &doctor,
            AccessStatus::Approved,
            48,
            NOW + 60,
        )
        .unwrap();

        let expected = NOW + 60 + 48 * 3600;
        assert_eq!(
            decision,
            Decision::Applied {
                expires_at: Some(expected)
            }
        );
        let req = store::load_request(&env, patient.id, 1).unwrap();
        assert_eq!(req.status, AccessStatus::Approved);
        assert_eq!(req.expires_at, Some(expected));
        assert_eq!(req.requested_at, NOW);
        assert!(!access::has_pending(&env, patient.id, 1, &doctor));
    });
}

#[test]
fn test_reject_leaves_expiry_unset() {
    let (env, contract_id, mut patient) = setup(&["Blood Test"]);
    let doctor = Address::generate(&env);

    env.as_contract(&contract_id, || {
        let document = doc(&env, &patient, 1);
        access::request(&env, &mut patient, &document, &doctor, None, NOW).unwrap();

        let decision =
            access::decide(&env, &patient, 1, &doctor, AccessStatus::Rejected, 24, NOW).unwrap();

        assert_eq!(decision, Decision::Applied { expires_at: None });
        let req = store::load_request(&env, patient.id, 1).unwrap();
        assert_eq!(req.status, AccessStatus::Rejected);
        assert_eq!(req.expires_at, None);
        assert_eq!(store::grant_expiry(&env, patient.id, 1, &doctor), None);
    });
}

#[test]
fn test_decide_pending_status_is_invalid() {
    let (env, contract_id, mut patient) = setup(&["Blood Test"]);
    let doctor = Address::generate(&env);

    env.as_contract(&contract_id, || {
        let document = doc(&env, &patient, 1);
        access::request(&env, &mut patient, &document, &doctor, None, NOW).unwrap();

        assert_eq!(
            access::decide(&env, &patient, 1, &doctor, AccessStatus::Pending, 24, NOW),
            Err(ContractError::InvalidStatus)
        );
        assert!(access::has_pending(&env, patient.id, 1, &doctor));
    });
}

#[test]
fn test_decide_without_pending_is_noop() {
    let (env, contract_id, patient) = setup(&["Blood Test"]);
    let doctor = Address::generate(&env);

    env.as_contract(&contract_id, || {
        let decision =
            access::decide(&env, &patient, 1, &doctor, AccessStatus::Approved, 24, NOW).unwrap();

        assert_eq!(decision, Decision::NoPending);
        assert_eq!(store::grant_expiry(&env, patient.id, 1, &doctor), None);
        assert!(all_requests(&env, &patient).is_empty());
    });
}

#[test]
fn test_terminal_states_are_not_revisited() {
    let (env, contract_id, mut patient) = setup(&["Blood Test"]);
    let doctor = Address::generate(&env);

    env.as_contract(&contract_id, || {
        let document = doc(&env, &patient, 1);
        access::request(&env, &mut patient, &document, &doctor, None, NOW).unwrap();
        access::decide(&env, &patient, 1, &doctor, AccessStatus::Approved, 24, NOW).unwrap();

        let decision = access::decide(
            &env,
            &patient,
            1,
            &doctor,
            AccessStatus::Rejected,
            24,
            NOW + 10,
        )
        .unwrap();

        assert_eq!(decision, Decision::NoPending);
        let req = store::load_request(&env, patient.id, 1).unwrap();
        assert_eq!(req.status, AccessStatus::Approved);
        assert_eq!(req.expires_at, Some(NOW + 24 * 3600));
    });
}

#[test]
fn test_new_request_after_terminal_appends_entry() {
    let (env, contract_id, mut patient) = setup(&["Blood Test"]);
    let doctor = Address::generate(&env);

    env.as_contract(&contract_id, || {
        let document = doc(&env, &patient, 1);
        access::request(&env, &mut patient, &document, &doctor, None, NOW).unwrap();
        access::decide(&env, &patient, 1, &doctor, AccessStatus::Rejected, 24, NOW).unwrap();

        access::request(&env, &mut patient, &document, &doctor, None, NOW + 100).unwrap();

        let views = all_requests(&env, &patient);
        assert_eq!(views.len(), 2);
        assert_eq!(views.get(0).unwrap().status, AccessStatus::Rejected);
        assert_eq!(views.get(1).unwrap().status, AccessStatus::Pending);
    });
}

#[test]
fn test_access_expires_passively() {
    let (env, contract_id, mut patient) = setup(&["Blood Test"]);
    let doctor = Address::generate(&env);

    env.as_contract(&contract_id, || {
        let document = doc(&env, &patient, 1);
        access::request(&env, &mut patient, &document, &doctor, None, NOW).unwrap();
        access::decide(&env, &patient, 1, &doctor, AccessStatus::Approved, 1, NOW).unwrap();

        assert!(access::is_access_active(&env, patient.id, 1, &doctor, NOW + 3599));
        assert!(!access::is_access_active(&env, patient.id, 1, &doctor, NOW + 3600));
        assert_eq!(
            store::load_request(&env, patient.id, 1).unwrap().status,
            AccessStatus::Approved
        );
    });
}

#[test]
fn test_shorter_approval_keeps_longer_grant() {
    let (env, contract_id, mut patient) = setup(&["Blood Test"]);
    let doctor = Address::generate(&env);

    env.as_contract(&contract_id, || {
        let document = doc(&env, &patient, 1);
        access::request(&env, &mut patient, &document, &doctor, None, NOW).unwrap();
        access::decide(&env, &patient, 1, &doctor, AccessStatus::Approved, 48, NOW).unwrap();
        access::request(&env, &mut patient, &document, &doctor, None, NOW + 10).unwrap();
        access::decide(&env, &patient, 1, &doctor, AccessStatus::Approved, 1, NOW + 10).unwrap();

        assert_eq!(
            store::grant_expiry(&env, patient.id, 1, &doctor),
            Some(NOW + 48 * 3600)
        );
        assert!(access::is_access_active(&env, patient.id, 1, &doctor, NOW + 7200));
    });
}

#[test]
fn test_pending_and_rejected_grant_nothing() {
    let (env, contract_id, mut patient) = setup(&["Blood Test", "X-Ray"]);
    let doctor = Address::generate(&env);

    env.as_contract(&contract_id, || {
        let blood = doc(&env, &patient, 1);
        let xray = doc(&env, &patient, 2);
        access::request(&env, &mut patient, &blood, &doctor, None, NOW).unwrap();
        access::request(&env, &mut patient, &xray, &doctor, None, NOW).unwrap();
        access::decide(&env, &patient, 2, &doctor, AccessStatus::Rejected, 24, NOW).unwrap();

        assert!(!access::is_access_active(&env, patient.id, 1, &doctor, NOW));
        assert!(!access::is_access_active(&env, patient.id, 2, &doctor, NOW));
    });
}

#[test]
fn test_page_keeps_creation_order_across_documents() {
    let (env, contract_id, mut patient) = setup(&["Blood Test", "X-Ray"]);
    let a = Address::generate(&env);
    let b = Address::generate(&env);

    env.as_contract(&contract_id, || {
        let blood = doc(&env, &patient, 1);
        let xray = doc(&env, &patient, 2);
        access::request(&env, &mut patient, &blood, &b, None, NOW).unwrap();
        access::request(&env, &mut patient, &xray, &a, None, NOW).unwrap();
        access::request(&env, &mut patient, &blood, &a, None, NOW + 20).unwrap();

        let views = all_requests(&env, &patient);
        assert_eq!(views.len(), 3);

        let first = views.get(0).unwrap();
        assert_eq!(first.document_id, 1);
        assert_eq!(first.doctor, b);
        let second = views.get(1).unwrap();
        assert_eq!(second.document_id, 2);
        assert_eq!(second.document_name, String::from_str(&env, "X-Ray"));
        let third = views.get(2).unwrap();
        assert_eq!(third.requested_at, NOW + 20);
        assert_eq!(third.document_name, String::from_str(&env, "Blood Test"));

        let tail = access::page(&env, &patient, 2, 10).unwrap();
        assert_eq!(tail.len(), 1);
        assert_eq!(tail.get(0).unwrap(), third);
    });
}
