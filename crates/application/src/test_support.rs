//! In-memory doubles for the ports, shared by the use case tests.
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shortpress_domain::{Category, CategoryId, User, UserId, Variable, VariableId};

use crate::ports::{
    CategoryDeletion, CategoryRepository, Clock, NewUser, NewVariable, Page, RepositoryError,
    UserRepository, VariableRepository,
};

pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn epoch() -> Self {
        Self(DateTime::from_timestamp(1_700_000_000, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Default)]
struct State {
    users: Vec<User>,
    categories: Vec<Category>,
    variables: Vec<Variable>,
    next_id: u64,
}

impl State {
    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MockStore {
    state: Mutex<State>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user(&self, username: &str, is_admin: bool) -> User {
        UserRepository::create(
            self,
            NewUser {
                username: username.to_string(),
                is_admin,
            },
        )
        .await
        .unwrap()
    }

    pub async fn variable(&self, owner: UserId, identifier: &str, value: &str) -> Variable {
        VariableRepository::create(
            self,
            NewVariable {
                owner_id: owner,
                identifier: identifier.to_string(),
                name: identifier.to_string(),
                value: value.to_string(),
                category_id: None,
                parent_variable_id: None,
                created_at: FixedClock::epoch().0,
            },
        )
        .await
        .unwrap()
    }

    pub fn variable_count(&self) -> usize {
        self.state.lock().expect("Lock poisoned").variables.len()
    }
}

#[async_trait]
impl UserRepository for MockStore {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut state = self.state.lock().expect("Lock poisoned");
        if state.users.iter().any(|u| u.username == user.username) {
            return Err(RepositoryError::Conflict("username taken".into()));
        }
        let id = UserId(state.next());
        let mut stored = User::new(id, user.username);
        stored.is_admin = user.is_admin;
        state.users.push(stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let state = self.state.lock().expect("Lock poisoned");
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let state = self.state.lock().expect("Lock poisoned");
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    async fn has_admin(&self) -> Result<bool, RepositoryError> {
        let state = self.state.lock().expect("Lock poisoned");
        Ok(state.users.iter().any(|u| u.is_admin))
    }
}

#[async_trait]
impl CategoryRepository for MockStore {
    async fn create(&self, name: &str, owner_id: UserId) -> Result<Category, RepositoryError> {
        let mut state = self.state.lock().expect("Lock poisoned");
        if state
            .categories
            .iter()
            .any(|c| c.owner_id == owner_id && c.name == name)
        {
            return Err(RepositoryError::Conflict("category name taken".into()));
        }
        let id = CategoryId(state.next());
        let category = Category::new(id, name, owner_id).unwrap();
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let state = self.state.lock().expect("Lock poisoned");
        Ok(state.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn list(
        &self,
        owner_id: Option<UserId>,
        page: Page,
    ) -> Result<Vec<Category>, RepositoryError> {
        let state = self.state.lock().expect("Lock poisoned");
        Ok(page.apply(
            state
                .categories
                .iter()
                .filter(|c| owner_id.is_none_or(|o| c.owner_id == o))
                .cloned(),
        ))
    }

    async fn update(&self, category: &Category) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("Lock poisoned");
        let slot = state
            .categories
            .iter_mut()
            .find(|c| c.id == category.id)
            .ok_or_else(|| RepositoryError::NotFound("category".into()))?;
        *slot = category.clone();
        Ok(())
    }

    async fn delete(&self, id: CategoryId, mode: CategoryDeletion) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("Lock poisoned");
        if !state.categories.iter().any(|c| c.id == id) {
            return Err(RepositoryError::NotFound("category".into()));
        }
        match mode {
            CategoryDeletion::Cascade => state.variables.retain(|v| v.category_id != Some(id)),
            CategoryDeletion::Reassign(target) => {
                for v in state.variables.iter_mut().filter(|v| v.category_id == Some(id)) {
                    v.category_id = Some(target);
                }
            }
        }
        state.categories.retain(|c| c.id != id);
        Ok(())
    }

    async fn delete_by_owner(&self, owner_id: UserId) -> Result<usize, RepositoryError> {
        let mut state = self.state.lock().expect("Lock poisoned");
        let doomed: Vec<CategoryId> = state
            .categories
            .iter()
            .filter(|c| c.owner_id == owner_id)
            .map(|c| c.id)
            .collect();
        state
            .variables
            .retain(|v| v.category_id.is_none_or(|c| !doomed.contains(&c)));
        state.categories.retain(|c| c.owner_id != owner_id);
        Ok(doomed.len())
    }
}

#[async_trait]
impl VariableRepository for MockStore {
    async fn create(&self, variable: NewVariable) -> Result<Variable, RepositoryError> {
        let mut state = self.state.lock().expect("Lock poisoned");
        if state
            .variables
            .iter()
            .any(|v| v.owner_id == variable.owner_id && v.identifier == variable.identifier)
        {
            return Err(RepositoryError::Conflict("identifier taken".into()));
        }
        let id = VariableId(state.next());
        let stored = Variable {
            id,
            identifier: variable.identifier,
            name: variable.name,
            value: variable.value,
            category_id: variable.category_id,
            parent_variable_id: variable.parent_variable_id,
            owner_id: variable.owner_id,
            created_at: variable.created_at,
            updated_at: variable.created_at,
        };
        state.variables.push(stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: VariableId) -> Result<Option<Variable>, RepositoryError> {
        let state = self.state.lock().expect("Lock poisoned");
        Ok(state.variables.iter().find(|v| v.id == id).cloned())
    }

    async fn find_by_identifier(
        &self,
        owner_id: UserId,
        identifier: &str,
    ) -> Result<Option<Variable>, RepositoryError> {
        let state = self.state.lock().expect("Lock poisoned");
        Ok(state
            .variables
            .iter()
            .find(|v| v.owner_id == owner_id && v.identifier == identifier)
            .cloned())
    }

    async fn list(
        &self,
        owner_id: Option<UserId>,
        page: Page,
    ) -> Result<Vec<Variable>, RepositoryError> {
        let state = self.state.lock().expect("Lock poisoned");
        Ok(page.apply(
            state
                .variables
                .iter()
                .filter(|v| owner_id.is_none_or(|o| v.owner_id == o))
                .cloned(),
        ))
    }

    async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Variable>, RepositoryError> {
        VariableRepository::list(self, Some(owner_id), Page::new(0, usize::MAX)).await
    }

    async fn update(&self, variable: &Variable) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("Lock poisoned");
        let slot = state
            .variables
            .iter_mut()
            .find(|v| v.id == variable.id)
            .ok_or_else(|| RepositoryError::NotFound("variable".into()))?;
        *slot = variable.clone();
        Ok(())
    }

    async fn delete(&self, id: VariableId) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("Lock poisoned");
        let before = state.variables.len();
        state.variables.retain(|v| v.id != id);
        if state.variables.len() == before {
            return Err(RepositoryError::NotFound("variable".into()));
        }
        for v in &mut state.variables {
            if v.parent_variable_id == Some(id) {
                v.parent_variable_id = None;
            }
        }
        Ok(())
    }

    async fn delete_by_owner(&self, owner_id: UserId) -> Result<usize, RepositoryError> {
        let mut state = self.state.lock().expect("Lock poisoned");
        let before = state.variables.len();
        state.variables.retain(|v| v.owner_id != owner_id);
        Ok(before - state.variables.len())
    }
}
