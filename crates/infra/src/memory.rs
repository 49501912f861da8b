//! In-memory directory store for tests and local development.
//!
//! Tables sit behind `RwLock`s. Uniqueness and same-owner reference rules are
//! enforced while the write lock is held, so this adapter rejects the same
//! writes the Postgres schema does. When two tables are locked together the
//! employees lock is always taken first.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use workforce_core::{DepartmentId, Page, UserId};
use workforce_directory::{
    Department, DepartmentFilter, Employee, EmployeeFilter, IdentityNumber, NewDepartment, NewEmployee,
    Resource, ResourceStore, StoreError, StoreResult, User, UserStore,
};

const EMAIL_TAKEN: &str = "email is exist";

#[derive(Debug)]
struct Sequenced<K: Ord, V> {
    rows: BTreeMap<K, V>,
    last_id: i64,
}

impl<K: Ord, V> Default for Sequenced<K, V> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<K: Ord, V> Sequenced<K, V> {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    users: RwLock<Sequenced<UserId, User>>,
    departments: RwLock<Sequenced<DepartmentId, Department>>,
    // Insertion order doubles as id order.
    employees: RwLock<Vec<Employee>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

fn read<T>(lock: &RwLock<T>) -> StoreResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> StoreResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))
}

fn paginate<T>(rows: impl Iterator<Item = T>, page: Page) -> Vec<T> {
    let (offset, limit) = page.bounds();
    rows.skip(offset).take(limit).collect()
}

fn owns_department(departments: &Sequenced<DepartmentId, Department>, owner: UserId, id: DepartmentId) -> bool {
    departments.rows.get(&id).is_some_and(|d| d.owner == owner)
}

fn position(employees: &[Employee], owner: UserId, key: &IdentityNumber) -> Option<usize> {
    employees
        .iter()
        .position(|e| e.owner == owner && e.identity_number == *key)
}

#[async_trait]
impl ResourceStore<Department> for InMemoryDirectory {
    async fn exists(&self, owner: UserId, key: &DepartmentId) -> StoreResult<bool> {
        Ok(owns_department(&*read(&self.departments)?, owner, *key))
    }

    async fn find(&self, owner: UserId, key: &DepartmentId) -> StoreResult<Option<Department>> {
        let departments = read(&self.departments)?;
        Ok(departments.rows.get(key).filter(|d| d.owner == owner).cloned())
    }

    async fn create(&self, owner: UserId, draft: NewDepartment) -> StoreResult<Department> {
        let mut departments = write(&self.departments)?;
        let id = DepartmentId::new(departments.next_id());
        let department = Department {
            id,
            name: draft.name,
            owner,
        };
        departments.rows.insert(id, department.clone());
        Ok(department)
    }

    async fn update(&self, owner: UserId, key: &DepartmentId, merged: Department) -> StoreResult<Department> {
        let mut departments = write(&self.departments)?;
        if !owns_department(&departments, owner, *key) {
            return Err(StoreError::NotFound(Department::KIND.not_found().to_string()));
        }
        let department = Department {
            id: *key,
            owner,
            ..merged
        };
        departments.rows.insert(*key, department.clone());
        Ok(department)
    }

    async fn delete(&self, owner: UserId, key: &DepartmentId) -> StoreResult<()> {
        let employees = read(&self.employees)?;
        let mut departments = write(&self.departments)?;

        if !owns_department(&departments, owner, *key) {
            return Err(StoreError::NotFound(Department::KIND.not_found().to_string()));
        }
        if employees.iter().any(|e| e.owner == owner && e.department_id == *key) {
            return Err(StoreError::Conflict(Department::KIND.still_referenced().to_string()));
        }
        departments.rows.remove(key);
        Ok(())
    }

    async fn list(&self, owner: UserId, filter: &DepartmentFilter, page: Page) -> StoreResult<Vec<Department>> {
        let departments = read(&self.departments)?;
        let rows = departments
            .rows
            .values()
            .filter(|d| d.owner == owner && filter.matches(d))
            .cloned();
        Ok(paginate(rows, page))
    }

    async fn exists_referencing(&self, owner: UserId, key: &DepartmentId) -> StoreResult<bool> {
        let employees = read(&self.employees)?;
        Ok(employees.iter().any(|e| e.owner == owner && e.department_id == *key))
    }
}

#[async_trait]
impl ResourceStore<Employee> for InMemoryDirectory {
    async fn exists(&self, owner: UserId, key: &IdentityNumber) -> StoreResult<bool> {
        Ok(position(&read(&self.employees)?, owner, key).is_some())
    }

    async fn find(&self, owner: UserId, key: &IdentityNumber) -> StoreResult<Option<Employee>> {
        let employees = read(&self.employees)?;
        Ok(position(&employees, owner, key).map(|i| employees[i].clone()))
    }

    async fn create(&self, owner: UserId, draft: NewEmployee) -> StoreResult<Employee> {
        let mut employees = write(&self.employees)?;
        let departments = read(&self.departments)?;

        if position(&employees, owner, &draft.identity_number).is_some() {
            return Err(StoreError::Conflict(Employee::KIND.duplicate().to_string()));
        }
        if !owns_department(&departments, owner, draft.department_id) {
            return Err(StoreError::NotFound(Employee::KIND.reference_missing().to_string()));
        }

        let employee = Employee {
            identity_number: draft.identity_number,
            name: draft.name,
            gender: draft.gender,
            department_id: draft.department_id,
            image_uri: draft.image_uri,
            owner,
        };
        employees.push(employee.clone());
        Ok(employee)
    }

    async fn update(&self, owner: UserId, key: &IdentityNumber, merged: Employee) -> StoreResult<Employee> {
        let mut employees = write(&self.employees)?;
        let departments = read(&self.departments)?;

        let index = position(&employees, owner, key)
            .ok_or_else(|| StoreError::NotFound(Employee::KIND.not_found().to_string()))?;
        if merged.identity_number != *key && position(&employees, owner, &merged.identity_number).is_some() {
            return Err(StoreError::Conflict(Employee::KIND.duplicate().to_string()));
        }
        if !owns_department(&departments, owner, merged.department_id) {
            return Err(StoreError::NotFound(Employee::KIND.reference_missing().to_string()));
        }

        let employee = Employee { owner, ..merged };
        employees[index] = employee.clone();
        Ok(employee)
    }

    async fn delete(&self, owner: UserId, key: &IdentityNumber) -> StoreResult<()> {
        let mut employees = write(&self.employees)?;
        let index = position(&employees, owner, key)
            .ok_or_else(|| StoreError::NotFound(Employee::KIND.not_found().to_string()))?;
        employees.remove(index);
        Ok(())
    }

    async fn list(&self, owner: UserId, filter: &EmployeeFilter, page: Page) -> StoreResult<Vec<Employee>> {
        let employees = read(&self.employees)?;
        let rows = employees
            .iter()
            .filter(|e| e.owner == owner && filter.matches(e))
            .cloned();
        Ok(paginate(rows, page))
    }

    async fn exists_referencing(&self, _owner: UserId, _key: &IdentityNumber) -> StoreResult<bool> {
        Ok(false)
    }
}

#[async_trait]
impl UserStore for InMemoryDirectory {
    async fn create(&self, email: &str, password_digest: &str) -> StoreResult<User> {
        let mut users = write(&self.users)?;
        if users.rows.values().any(|u| u.email == email) {
            return Err(StoreError::Conflict(EMAIL_TAKEN.to_string()));
        }
        let user = User::new(UserId::new(users.next_id()), email, password_digest);
        users.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(read(&self.users)?.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(read(&self.users)?.rows.values().find(|u| u.email == email).cloned())
    }

    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        Ok(read(&self.users)?.rows.values().any(|u| u.email == email))
    }

    async fn update(&self, merged: User) -> StoreResult<User> {
        let mut users = write(&self.users)?;
        if !users.rows.contains_key(&merged.id) {
            return Err(StoreError::NotFound("User not found".to_string()));
        }
        if users.rows.values().any(|u| u.id != merged.id && u.email == merged.email) {
            return Err(StoreError::Conflict(EMAIL_TAKEN.to_string()));
        }
        users.rows.insert(merged.id, merged.clone());
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workforce_directory::Gender;

    fn draft(id: &str, department_id: DepartmentId) -> NewEmployee {
        NewEmployee {
            identity_number: IdentityNumber::new(id),
            name: "Alice Doe".to_string(),
            gender: Gender::Female,
            department_id,
            image_uri: "https://cdn.example.com/a.png".to_string(),
        }
    }

    #[tokio::test]
    async fn employee_uniqueness_is_enforced_in_the_store() {
        let store = InMemoryDirectory::new();
        let owner = UserId::new(1);
        let dept = ResourceStore::<Department>::create(&store, owner, NewDepartment { name: "Engineering".into() })
            .await
            .unwrap();

        ResourceStore::<Employee>::create(&store, owner, draft("ID-12345", dept.id))
            .await
            .unwrap();
        let err = ResourceStore::<Employee>::create(&store, owner, draft("ID-12345", dept.id))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn foreign_department_is_rejected_in_the_store() {
        let store = InMemoryDirectory::new();
        let dept = ResourceStore::<Department>::create(&store, UserId::new(1), NewDepartment { name: "Engineering".into() })
            .await
            .unwrap();

        let err = ResourceStore::<Employee>::create(&store, UserId::new(2), draft("ID-12345", dept.id))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn department_ids_are_sequential_and_listed_in_order() {
        let store = InMemoryDirectory::new();
        let owner = UserId::new(1);
        for name in ["Engineering", "Research", "Marketing"] {
            ResourceStore::<Department>::create(&store, owner, NewDepartment { name: name.into() })
                .await
                .unwrap();
        }

        let listed = ResourceStore::<Department>::list(&store, owner, &DepartmentFilter::default(), Page::new(2, 1))
            .await
            .unwrap();
        let ids: Vec<i64> = listed.iter().map(|d| d.id.get()).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[tokio::test]
    async fn department_existence_is_owner_scoped() {
        let store = InMemoryDirectory::new();
        let dept = ResourceStore::<Department>::create(&store, UserId::new(1), NewDepartment { name: "Engineering".into() })
            .await
            .unwrap();

        assert!(ResourceStore::<Department>::exists(&store, UserId::new(1), &dept.id).await.unwrap());
        assert!(!ResourceStore::<Department>::exists(&store, UserId::new(2), &dept.id).await.unwrap());
        assert!(!ResourceStore::<Department>::exists(&store, UserId::new(1), &DepartmentId::new(99)).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_in_the_store() {
        let store = InMemoryDirectory::new();
        UserStore::create(&store, "a@x.com", "digest").await.unwrap();
        let err = UserStore::create(&store, "a@x.com", "digest").await.unwrap_err();
        assert_eq!(err, StoreError::Conflict(EMAIL_TAKEN.to_string()));
    }
}
