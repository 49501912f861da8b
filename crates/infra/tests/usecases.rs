//! Usecase tests against the in-memory adapters.
//!
//! Verifies:
//! - Owner scope: another user's rows behave as missing
//! - Identity numbers are unique per owner, not globally
//! - PATCH keeps absent fields and re-checks changed keys and references
//! - Departments with employees cannot be deleted
//! - Signup, login and profile rules

use std::sync::Arc;

use chrono::Utc;
use proptest::prelude::*;

use workforce_auth::{BcryptHasher, Hs256TokenService, Principal, TokenService};
use workforce_core::{AppError, DepartmentId, ErrorKind, Page, UserId};
use workforce_directory::{
    Credentials, Department, DepartmentFilter, DepartmentPatch, DepartmentService, Employee, EmployeeFilter,
    EmployeePatch, EmployeeService, FileService, IdentityNumber, NewDepartment, NewEmployee, ResourceStore,
    UserPatch, UserService,
};
use workforce_infra::{InMemoryBlobStore, InMemoryDirectory};

const SECRET: &[u8] = b"usecase-secret";

struct Harness {
    departments: DepartmentService,
    employees: EmployeeService,
    users: UserService,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryDirectory::new());
    let department_store: Arc<dyn ResourceStore<Department>> = store.clone();
    let employee_store: Arc<dyn ResourceStore<Employee>> = store.clone();

    Harness {
        departments: DepartmentService::new(department_store.clone()),
        employees: EmployeeService::new(employee_store).with_departments(department_store),
        users: UserService::new(
            store,
            Arc::new(BcryptHasher::with_cost(4)),
            Arc::new(Hs256TokenService::new(SECRET)),
        ),
    }
}

fn principal(id: i64) -> Principal {
    Principal::new(UserId::new(id), format!("user{id}@x.com"))
}

fn new_employee(identity_number: &str, department_id: DepartmentId) -> NewEmployee {
    NewEmployee::try_new(
        identity_number,
        "Alice Doe",
        "female",
        &department_id.to_string(),
        "https://cdn.example.com/alice.png",
    )
    .unwrap()
}

async fn department(h: &Harness, owner: &Principal, name: &str) -> Department {
    h.departments
        .create(owner, NewDepartment::try_new(name).unwrap())
        .await
        .unwrap()
}

fn kind(err: AppError) -> ErrorKind {
    err.kind()
}

#[tokio::test]
async fn rows_of_another_owner_behave_as_missing() {
    let h = harness();
    let (u1, u2) = (principal(1), principal(2));
    let dept = department(&h, &u1, "Engineering").await;
    let emp = h.employees.create(&u1, new_employee("ID-12345", dept.id)).await.unwrap();

    let patch = DepartmentPatch::try_new(Some("Hijacked")).unwrap();
    assert_eq!(kind(h.departments.update(&u2, &dept.id, patch).await.unwrap_err()), ErrorKind::NotFound);
    assert_eq!(kind(h.departments.delete(&u2, &dept.id).await.unwrap_err()), ErrorKind::NotFound);
    assert_eq!(
        kind(h.employees.update(&u2, &emp.identity_number, EmployeePatch::default()).await.unwrap_err()),
        ErrorKind::NotFound
    );
    assert_eq!(kind(h.employees.delete(&u2, &emp.identity_number).await.unwrap_err()), ErrorKind::NotFound);

    assert!(h.departments.list(&u2, DepartmentFilter::default(), Page::default()).await.unwrap().is_empty());
    assert!(h.employees.list(&u2, EmployeeFilter::default(), Page::default()).await.unwrap().is_empty());
    assert_eq!(h.departments.list(&u1, DepartmentFilter::default(), Page::default()).await.unwrap(), vec![dept]);
}

#[tokio::test]
async fn identity_number_is_unique_per_owner() {
    let h = harness();
    let (u1, u2) = (principal(1), principal(2));
    let d1 = department(&h, &u1, "Engineering").await;
    let d2 = department(&h, &u2, "Engineering").await;

    h.employees.create(&u1, new_employee("ID-12345", d1.id)).await.unwrap();
    let err = h.employees.create(&u1, new_employee("ID-12345", d1.id)).await.unwrap_err();
    assert_eq!(err, AppError::conflict("identity number already exists"));

    h.employees.create(&u2, new_employee("ID-12345", d2.id)).await.unwrap();
}

#[tokio::test]
async fn employee_needs_a_department_of_the_same_owner() {
    let h = harness();
    let (u1, u2) = (principal(1), principal(2));
    let foreign = department(&h, &u2, "Research").await;

    let err = h.employees.create(&u1, new_employee("ID-12345", foreign.id)).await.unwrap_err();
    assert_eq!(err, AppError::not_found("department id for this user not found"));

    let err = h.employees.create(&u1, new_employee("ID-12345", DepartmentId::new(999))).await.unwrap_err();
    assert_eq!(kind(err), ErrorKind::NotFound);
}

#[tokio::test]
async fn patch_rechecks_changed_key_and_reference() {
    let h = harness();
    let (u1, u2) = (principal(1), principal(2));
    let dept = department(&h, &u1, "Engineering").await;
    let foreign = department(&h, &u2, "Research").await;
    h.employees.create(&u1, new_employee("ID-11111", dept.id)).await.unwrap();
    h.employees.create(&u1, new_employee("ID-22222", dept.id)).await.unwrap();
    let key = IdentityNumber::new("ID-22222");

    let clash = EmployeePatch::try_new(Some("ID-11111"), None, None, None, None).unwrap();
    assert_eq!(kind(h.employees.update(&u1, &key, clash).await.unwrap_err()), ErrorKind::Conflict);

    let same = EmployeePatch::try_new(Some("ID-22222"), Some("Bob Stone"), None, None, None).unwrap();
    let updated = h.employees.update(&u1, &key, same).await.unwrap();
    assert_eq!(updated.name, "Bob Stone");

    let moved = EmployeePatch::try_new(None, None, None, Some(&foreign.id.to_string()), None).unwrap();
    assert_eq!(kind(h.employees.update(&u1, &key, moved).await.unwrap_err()), ErrorKind::NotFound);

    let renamed = EmployeePatch::try_new(Some("ID-33333"), None, None, None, None).unwrap();
    let updated = h.employees.update(&u1, &key, renamed).await.unwrap();
    assert_eq!(updated.identity_number, IdentityNumber::new("ID-33333"));
    assert_eq!(updated.name, "Bob Stone");
    assert_eq!(kind(h.employees.delete(&u1, &key).await.unwrap_err()), ErrorKind::NotFound);
}

#[tokio::test]
async fn department_with_employees_cannot_be_deleted() {
    let h = harness();
    let u1 = principal(1);
    let dept = department(&h, &u1, "Engineering").await;
    let emp = h.employees.create(&u1, new_employee("ID-12345", dept.id)).await.unwrap();

    let err = h.departments.delete(&u1, &dept.id).await.unwrap_err();
    assert_eq!(err, AppError::conflict("still containing employee"));

    h.employees.delete(&u1, &emp.identity_number).await.unwrap();
    h.departments.delete(&u1, &dept.id).await.unwrap();
    assert_eq!(kind(h.departments.delete(&u1, &dept.id).await.unwrap_err()), ErrorKind::NotFound);
}

#[tokio::test]
async fn listing_filters_and_paginates() {
    let h = harness();
    let u1 = principal(1);
    let eng = department(&h, &u1, "Engineering").await;
    let ops = department(&h, &u1, "Operations").await;
    h.employees.create(&u1, new_employee("ID-10001", eng.id)).await.unwrap();
    h.employees.create(&u1, new_employee("ID-10002", ops.id)).await.unwrap();
    h.employees.create(&u1, new_employee("XX-10003", eng.id)).await.unwrap();

    let by_dept = EmployeeFilter::from_query(None, None, None, Some(&eng.id.to_string()));
    assert_eq!(h.employees.list(&u1, by_dept, Page::default()).await.unwrap().len(), 2);

    let by_prefix = EmployeeFilter::from_query(Some("id-"), None, None, None);
    assert_eq!(h.employees.list(&u1, by_prefix, Page::default()).await.unwrap().len(), 2);

    let bad_gender = EmployeeFilter::from_query(None, None, Some("robot"), None);
    assert!(h.employees.list(&u1, bad_gender, Page::default()).await.unwrap().is_empty());

    let page = Page::from_raw(Some("2"), Some("1"));
    let listed = h.employees.list(&u1, EmployeeFilter::default(), page).await.unwrap();
    let keys: Vec<&str> = listed.iter().map(|e| e.identity_number.as_str()).collect();
    assert_eq!(keys, vec!["ID-10002", "XX-10003"]);

    let by_name = DepartmentFilter { name: Some("era".into()) };
    assert_eq!(h.departments.list(&u1, by_name, Page::default()).await.unwrap(), vec![ops]);
}

#[tokio::test]
async fn signup_then_login_issues_verifiable_tokens() {
    let h = harness();
    let session = h
        .users
        .authenticate(Credentials::try_new("a@x.com", "pw123456", "create").unwrap())
        .await
        .unwrap();
    assert!(session.created);

    let principal = Hs256TokenService::new(SECRET).verify(&session.token, Utc::now()).unwrap();
    assert_eq!(principal.email, "a@x.com");

    let login = h
        .users
        .authenticate(Credentials::try_new("a@x.com", "pw123456", "login").unwrap())
        .await
        .unwrap();
    assert!(!login.created);
    assert_eq!(login.email, "a@x.com");
}

#[tokio::test]
async fn authentication_failures_use_the_expected_kinds() {
    let h = harness();
    h.users
        .authenticate(Credentials::try_new("a@x.com", "pw123456", "create").unwrap())
        .await
        .unwrap();

    let dup = h
        .users
        .authenticate(Credentials::try_new("a@x.com", "pw654321", "create").unwrap())
        .await
        .unwrap_err();
    assert_eq!(dup, AppError::conflict("email is exist"));

    let wrong = h
        .users
        .authenticate(Credentials::try_new("a@x.com", "pw000000", "login").unwrap())
        .await
        .unwrap_err();
    assert_eq!(wrong, AppError::bad_request("password is wrong"));

    let unknown = h
        .users
        .authenticate(Credentials::try_new("b@x.com", "pw123456", "login").unwrap())
        .await
        .unwrap_err();
    assert_eq!(unknown, AppError::not_found("User not found"));
}

#[tokio::test]
async fn profile_patch_merges_and_guards_email() {
    let h = harness();
    let a = h
        .users
        .authenticate(Credentials::try_new("a@x.com", "pw123456", "create").unwrap())
        .await
        .unwrap();
    h.users
        .authenticate(Credentials::try_new("b@x.com", "pw123456", "create").unwrap())
        .await
        .unwrap();
    let me = Hs256TokenService::new(SECRET).verify(&a.token, Utc::now()).unwrap();

    let patch = UserPatch::try_new(None, Some("Alice"), None, Some("Acme Corp"), None).unwrap();
    let updated = h.users.update_profile(&me, patch).await.unwrap();
    assert_eq!(updated.name.as_deref(), Some("Alice"));
    assert_eq!(updated.company_name.as_deref(), Some("Acme Corp"));

    let keep = UserPatch::try_new(Some("a@x.com"), Some(""), None, None, None).unwrap();
    let unchanged = h.users.update_profile(&me, keep).await.unwrap();
    assert_eq!(unchanged, updated);

    let taken = UserPatch::try_new(Some("b@x.com"), None, None, None, None).unwrap();
    assert_eq!(
        h.users.update_profile(&me, taken).await.unwrap_err(),
        AppError::conflict("email is exist")
    );

    let ghost = principal(999);
    assert_eq!(kind(h.users.profile(&ghost).await.unwrap_err()), ErrorKind::NotFound);
}

#[tokio::test]
async fn uploads_are_size_and_type_checked() {
    let blobs = Arc::new(InMemoryBlobStore::new("http://localhost:8080/uploads"));
    let files = FileService::new(blobs.clone());

    let png = b"\x89PNG\r\n\x1a\n0000".to_vec();
    let uri = files.upload(png).await.unwrap();
    assert!(uri.starts_with("http://localhost:8080/uploads/") && uri.ends_with(".png"));
    assert_eq!(blobs.len(), 1);

    let gif = b"GIF89a....".to_vec();
    assert_eq!(files.upload(gif).await.unwrap_err(), AppError::bad_request("file is invalid"));

    let mut huge = vec![0xFF, 0xD8, 0xFF];
    huge.resize(100 * 1024 + 1, 0);
    assert_eq!(files.upload(huge).await.unwrap_err(), AppError::bad_request("file is invalid"));
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 32,
        ..ProptestConfig::default()
    })]

    /// Applying the same department patch twice ends in the same stored state.
    #[test]
    fn department_patch_is_idempotent(name in proptest::option::of("[a-zA-Z ]{4,20}")) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let h = harness();
            let owner = principal(1);
            let dept = department(&h, &owner, "Engineering").await;

            let patch = DepartmentPatch::try_new(name.as_deref()).unwrap();
            let once = h.departments.update(&owner, &dept.id, patch.clone()).await.unwrap();
            let twice = h.departments.update(&owner, &dept.id, patch).await.unwrap();

            assert_eq!(&once, &twice);
            match name {
                Some(n) => assert_eq!(once.name, n),
                None => assert_eq!(once.name, "Engineering"),
            }
        });
    }
}
