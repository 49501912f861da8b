//! `workforce-directory` — users, departments and employees.
//!
//! Entities, payload validation, storage ports and the usecases that guard
//! every mutation with ownership, uniqueness and referential checks. No HTTP
//! and no concrete storage here; adapters live in `workforce-infra`.

pub mod department;
pub mod employee;
pub mod ports;
pub mod resource;
pub mod service;
pub mod upload;
pub mod user;
pub mod user_service;
pub mod validate;

pub use department::{Department, DepartmentFilter, DepartmentPatch, NewDepartment};
pub use employee::{Employee, EmployeeFilter, EmployeePatch, Gender, IdentityNumber, NewEmployee};
pub use ports::{BlobStore, ResourceStore, StoreError, StoreResult, UserStore};
pub use resource::{Resource, ResourceKind};
pub use service::{DepartmentService, EmployeeService, ResourceService};
pub use upload::{FileService, ImageType, MAX_UPLOAD_BYTES};
pub use user::{AuthAction, Credentials, User, UserPatch};
pub use user_service::{Session, UserService};
