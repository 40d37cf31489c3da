//! In-memory store implementing every repository port.
//!
//! All records live in one [`State`] behind a `tokio` lock, so operations
//! that touch categories and variables together (cascading deletes,
//! reassignment, clearing parent links) are applied in a single step.
//!
//! When opened with a data file, the store loads a JSON snapshot at
//! startup and rewrites it after every mutation:
//!
//! ```text
//! {
//!   "next_id": 12,
//!   "users": [...],
//!   "categories": [...],
//!   "variables": [...]
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shortpress_application::ports::{
    CategoryDeletion, CategoryRepository, FileSystem, NewUser, NewVariable, Page,
    RepositoryError, UserRepository, VariableRepository,
};
use shortpress_domain::{Category, CategoryId, User, UserId, Variable, VariableId};
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

/// On-disk form of the store.
#[derive(Debug, Default, Deserialize)]
struct Snapshot {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    variables: Vec<Variable>,
}

/// Borrowed view of [`State`] written out as a [`Snapshot`].
#[derive(Serialize)]
struct SnapshotView<'a> {
    next_id: u64,
    users: Vec<&'a User>,
    categories: Vec<&'a Category>,
    variables: Vec<&'a Variable>,
}

#[derive(Debug, Clone, Default)]
struct State {
    next_id: u64,
    users: BTreeMap<UserId, User>,
    categories: BTreeMap<CategoryId, Category>,
    variables: BTreeMap<VariableId, Variable>,
}

impl State {
    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn from_snapshot(snapshot: Snapshot) -> Self {
        let highest = snapshot
            .users
            .iter()
            .map(|u| u.id.get())
            .chain(snapshot.categories.iter().map(|c| c.id.get()))
            .chain(snapshot.variables.iter().map(|v| v.id.get()))
            .max()
            .unwrap_or(0);

        Self {
            next_id: snapshot.next_id.max(highest),
            users: snapshot.users.into_iter().map(|u| (u.id, u)).collect(),
            categories: snapshot.categories.into_iter().map(|c| (c.id, c)).collect(),
            variables: snapshot.variables.into_iter().map(|v| (v.id, v)).collect(),
        }
    }

    fn view(&self) -> SnapshotView<'_> {
        SnapshotView {
            next_id: self.next_id,
            users: self.users.values().collect(),
            categories: self.categories.values().collect(),
            variables: self.variables.values().collect(),
        }
    }

    fn category_name_taken(
        &self,
        owner_id: UserId,
        name: &str,
        except: Option<CategoryId>,
    ) -> bool {
        self.categories
            .values()
            .any(|c| c.owner_id == owner_id && c.name == name && Some(c.id) != except)
    }

    fn identifier_taken(
        &self,
        owner_id: UserId,
        identifier: &str,
        except: Option<VariableId>,
    ) -> bool {
        self.variables
            .values()
            .any(|v| v.owner_id == owner_id && v.identifier == identifier && Some(v.id) != except)
    }

    /// Checks the category and parent links of a variable about to be
    /// written. `variable_id` is `None` for a variable not yet stored.
    fn check_links(
        &self,
        variable_id: Option<VariableId>,
        owner_id: UserId,
        category_id: Option<CategoryId>,
        parent_id: Option<VariableId>,
    ) -> Result<(), RepositoryError> {
        if let Some(category_id) = category_id {
            let category = self
                .categories
                .get(&category_id)
                .ok_or_else(|| RepositoryError::NotFound(format!("category {category_id}")))?;
            if category.owner_id != owner_id {
                return Err(RepositoryError::Invalid(
                    "category belongs to another owner".into(),
                ));
            }
        }

        let Some(parent_id) = parent_id else {
            return Ok(());
        };
        let parent = self
            .variables
            .get(&parent_id)
            .ok_or_else(|| RepositoryError::NotFound(format!("variable {parent_id}")))?;
        if parent.owner_id != owner_id {
            return Err(RepositoryError::Invalid(
                "parent variable belongs to another owner".into(),
            ));
        }

        let Some(variable_id) = variable_id else {
            return Ok(());
        };
        let mut seen = BTreeSet::new();
        let mut cursor = Some(parent_id);
        while let Some(current) = cursor {
            if current == variable_id {
                return Err(RepositoryError::Invalid(format!(
                    "variable {variable_id} cannot be its own ancestor"
                )));
            }
            if !seen.insert(current) {
                break;
            }
            cursor = self.variables.get(&current).and_then(|v| v.parent_variable_id);
        }
        Ok(())
    }

    /// Removes the matching variables and detaches any survivors that
    /// pointed at them. Returns the number removed.
    fn remove_variables(&mut self, doomed: impl Fn(&Variable) -> bool) -> usize {
        let removed: Vec<VariableId> = self
            .variables
            .values()
            .filter(|v| doomed(v))
            .map(|v| v.id)
            .collect();
        for id in &removed {
            self.variables.remove(id);
        }
        for variable in self.variables.values_mut() {
            if variable
                .parent_variable_id
                .is_some_and(|parent| removed.contains(&parent))
            {
                variable.parent_variable_id = None;
            }
        }
        removed.len()
    }
}

fn storage_error(error: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Storage(error.to_string())
}

/// Repository adapter holding all users, categories, and variables in memory.
#[derive(Debug)]
pub struct InMemoryStore<F> {
    state: RwLock<State>,
    fs: F,
    data_file: Option<PathBuf>,
}

impl<F: FileSystem> InMemoryStore<F> {
    /// Creates an empty store that is never written to disk.
    #[must_use]
    pub fn new(fs: F) -> Self {
        Self {
            state: RwLock::new(State::default()),
            fs,
            data_file: None,
        }
    }

    /// Opens a store backed by a JSON snapshot, loading it if it exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if an existing snapshot cannot be
    /// read or parsed.
    pub async fn open(fs: F, data_file: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let data_file = data_file.into();
        let state = if fs.exists(&data_file).await {
            let bytes = fs.read_file(&data_file).await.map_err(storage_error)?;
            let snapshot: Snapshot = from_json_bytes(&bytes).map_err(storage_error)?;
            let state = State::from_snapshot(snapshot);
            info!(
                path = %data_file.display(),
                users = state.users.len(),
                categories = state.categories.len(),
                variables = state.variables.len(),
                "loaded store snapshot"
            );
            state
        } else {
            info!(path = %data_file.display(), "no snapshot found, starting empty");
            State::default()
        };

        Ok(Self {
            state: RwLock::new(state),
            fs,
            data_file: Some(data_file),
        })
    }

    /// Returns the snapshot path, if the store is persistent.
    #[must_use]
    pub fn data_file(&self) -> Option<&Path> {
        self.data_file.as_deref()
    }

    async fn write_snapshot(&self, path: &Path, state: &State) -> Result<(), RepositoryError> {
        let bytes = to_json_stable_bytes(&state.view()).map_err(storage_error)?;
        self.fs.write_file(path, &bytes).await.map_err(|e| {
            error!(path = %path.display(), error = %e, "failed to write store snapshot");
            storage_error(e)
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "store snapshot written");
        Ok(())
    }

    /// Applies `change` under the write lock, then persists.
    ///
    /// `change` must validate before it mutates. If the snapshot cannot be
    /// written the in-memory state is rolled back.
    async fn mutate<T: Send>(
        &self,
        change: impl FnOnce(&mut State) -> Result<T, RepositoryError> + Send,
    ) -> Result<T, RepositoryError> {
        let mut state = self.state.write().await;
        let Some(path) = self.data_file.as_deref() else {
            return change(&mut state);
        };

        let previous = state.clone();
        let output = change(&mut state)?;
        if let Err(e) = self.write_snapshot(path, &state).await {
            *state = previous;
            return Err(e);
        }
        Ok(output)
    }
}

#[async_trait]
impl<F: FileSystem> UserRepository for InMemoryStore<F> {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        self.mutate(|state| {
            if state.users.values().any(|u| u.username == user.username) {
                return Err(RepositoryError::Conflict(format!(
                    "username '{}' already registered",
                    user.username
                )));
            }
            let id = UserId(state.next());
            let mut stored = User::new(id, user.username);
            stored.is_admin = user.is_admin;
            state.users.insert(id, stored.clone());
            Ok(stored)
        })
        .await
    }

    async fn get(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn has_admin(&self) -> Result<bool, RepositoryError> {
        Ok(self.state.read().await.users.values().any(|u| u.is_admin))
    }
}

#[async_trait]
impl<F: FileSystem> CategoryRepository for InMemoryStore<F> {
    async fn create(&self, name: &str, owner_id: UserId) -> Result<Category, RepositoryError> {
        self.mutate(|state| {
            if state.category_name_taken(owner_id, name, None) {
                return Err(RepositoryError::Conflict(format!(
                    "category '{name}' already exists"
                )));
            }
            let category = Category {
                id: CategoryId(state.next()),
                name: name.to_string(),
                owner_id,
            };
            state.categories.insert(category.id, category.clone());
            Ok(category)
        })
        .await
    }

    async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        Ok(self.state.read().await.categories.get(&id).cloned())
    }

    async fn list(
        &self,
        owner_id: Option<UserId>,
        page: Page,
    ) -> Result<Vec<Category>, RepositoryError> {
        let state = self.state.read().await;
        Ok(page.apply(
            state
                .categories
                .values()
                .filter(|c| owner_id.is_none_or(|owner| c.owner_id == owner))
                .cloned(),
        ))
    }

    async fn update(&self, category: &Category) -> Result<(), RepositoryError> {
        let category = category.clone();
        self.mutate(move |state| {
            if !state.categories.contains_key(&category.id) {
                return Err(RepositoryError::NotFound(format!("category {}", category.id)));
            }
            if state.category_name_taken(category.owner_id, &category.name, Some(category.id)) {
                return Err(RepositoryError::Conflict(format!(
                    "category '{}' already exists",
                    category.name
                )));
            }
            state.categories.insert(category.id, category);
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: CategoryId, mode: CategoryDeletion) -> Result<(), RepositoryError> {
        self.mutate(|state| {
            if !state.categories.contains_key(&id) {
                return Err(RepositoryError::NotFound(format!("category {id}")));
            }
            match mode {
                CategoryDeletion::Cascade => {
                    let removed = state.remove_variables(|v| v.category_id == Some(id));
                    debug!(category_id = %id, removed, "cascaded category variables");
                }
                CategoryDeletion::Reassign(target) => {
                    if !state.categories.contains_key(&target) {
                        return Err(RepositoryError::NotFound(format!("category {target}")));
                    }
                    for variable in state.variables.values_mut() {
                        if variable.category_id == Some(id) {
                            variable.category_id = Some(target);
                        }
                    }
                }
            }
            state.categories.remove(&id);
            Ok(())
        })
        .await
    }

    async fn delete_by_owner(&self, owner_id: UserId) -> Result<usize, RepositoryError> {
        self.mutate(|state| {
            let doomed: Vec<CategoryId> = state
                .categories
                .values()
                .filter(|c| c.owner_id == owner_id)
                .map(|c| c.id)
                .collect();
            state.remove_variables(|v| v.category_id.is_some_and(|c| doomed.contains(&c)));
            for id in &doomed {
                state.categories.remove(id);
            }
            Ok(doomed.len())
        })
        .await
    }
}

#[async_trait]
impl<F: FileSystem> VariableRepository for InMemoryStore<F> {
    async fn create(&self, variable: NewVariable) -> Result<Variable, RepositoryError> {
        self.mutate(|state| {
            if state.identifier_taken(variable.owner_id, &variable.identifier, None) {
                return Err(RepositoryError::Conflict(format!(
                    "identifier '{}' already exists",
                    variable.identifier
                )));
            }
            state.check_links(
                None,
                variable.owner_id,
                variable.category_id,
                variable.parent_variable_id,
            )?;
            let stored = Variable {
                id: VariableId(state.next()),
                identifier: variable.identifier,
                name: variable.name,
                value: variable.value,
                category_id: variable.category_id,
                parent_variable_id: variable.parent_variable_id,
                owner_id: variable.owner_id,
                created_at: variable.created_at,
                updated_at: variable.created_at,
            };
            state.variables.insert(stored.id, stored.clone());
            Ok(stored)
        })
        .await
    }

    async fn get(&self, id: VariableId) -> Result<Option<Variable>, RepositoryError> {
        Ok(self.state.read().await.variables.get(&id).cloned())
    }

    async fn find_by_identifier(
        &self,
        owner_id: UserId,
        identifier: &str,
    ) -> Result<Option<Variable>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .variables
            .values()
            .find(|v| v.owner_id == owner_id && v.identifier == identifier)
            .cloned())
    }

    async fn list(
        &self,
        owner_id: Option<UserId>,
        page: Page,
    ) -> Result<Vec<Variable>, RepositoryError> {
        let state = self.state.read().await;
        Ok(page.apply(
            state
                .variables
                .values()
                .filter(|v| owner_id.is_none_or(|owner| v.owner_id == owner))
                .cloned(),
        ))
    }

    async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Variable>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .variables
            .values()
            .filter(|v| v.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn update(&self, variable: &Variable) -> Result<(), RepositoryError> {
        let variable = variable.clone();
        self.mutate(move |state| {
            if !state.variables.contains_key(&variable.id) {
                return Err(RepositoryError::NotFound(format!("variable {}", variable.id)));
            }
            if state.identifier_taken(variable.owner_id, &variable.identifier, Some(variable.id)) {
                return Err(RepositoryError::Conflict(format!(
                    "identifier '{}' already exists",
                    variable.identifier
                )));
            }
            state.check_links(
                Some(variable.id),
                variable.owner_id,
                variable.category_id,
                variable.parent_variable_id,
            )?;
            state.variables.insert(variable.id, variable);
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: VariableId) -> Result<(), RepositoryError> {
        self.mutate(|state| {
            if !state.variables.contains_key(&id) {
                return Err(RepositoryError::NotFound(format!("variable {id}")));
            }
            state.remove_variables(|v| v.id == id);
            Ok(())
        })
        .await
    }

    async fn delete_by_owner(&self, owner_id: UserId) -> Result<usize, RepositoryError> {
        self.mutate(|state| Ok(state.remove_variables(|v| v.owner_id == owner_id)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::TokioFileSystem;
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;
    use shortpress_application::ports::FileSystemError;

    fn epoch() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp")
    }

    fn new_variable(owner_id: UserId, identifier: &str, value: &str) -> NewVariable {
        NewVariable {
            owner_id,
            identifier: identifier.to_string(),
            name: identifier.to_string(),
            value: value.to_string(),
            category_id: None,
            parent_variable_id: None,
            created_at: epoch(),
        }
    }

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            is_admin: false,
        }
    }

    async fn seeded() -> (InMemoryStore<TokioFileSystem>, User) {
        let store = InMemoryStore::new(TokioFileSystem::new());
        let alice = UserRepository::create(&store, new_user("alice"))
            .await
            .expect("Should create user");
        (store, alice)
    }

    #[tokio::test]
    async fn test_ids_are_assigned_from_one() {
        let (store, alice) = seeded().await;
        let category = CategoryRepository::create(&store, "net", alice.id)
            .await
            .expect("Should create category");

        assert_eq!(alice.id, UserId(1));
        assert_eq!(category.id, CategoryId(2));
    }

    #[tokio::test]
    async fn test_usernames_are_unique() {
        let (store, _) = seeded().await;
        let again = UserRepository::create(&store, new_user("alice")).await;
        assert!(matches!(again, Err(RepositoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_identifier_unique_per_owner_only() {
        let (store, alice) = seeded().await;
        let bob = UserRepository::create(&store, new_user("bob")).await.expect("ok");

        VariableRepository::create(&store, new_variable(alice.id, "host", "a"))
            .await
            .expect("ok");
        let clash = VariableRepository::create(&store, new_variable(alice.id, "host", "b")).await;
        assert!(matches!(clash, Err(RepositoryError::Conflict(_))));

        let other = VariableRepository::create(&store, new_variable(bob.id, "host", "c")).await;
        assert!(other.is_ok());
        let found = store
            .find_by_identifier(bob.id, "host")
            .await
            .expect("ok")
            .expect("Should exist");
        assert_eq!(found.value, "c");
    }

    #[tokio::test]
    async fn test_category_rename_conflict() {
        let (store, alice) = seeded().await;
        CategoryRepository::create(&store, "a", alice.id).await.expect("ok");
        let mut second = CategoryRepository::create(&store, "b", alice.id).await.expect("ok");

        second.name = "a".to_string();
        let result = CategoryRepository::update(&store, &second).await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_cascade_delete_detaches_surviving_children() {
        let (store, alice) = seeded().await;
        let category = CategoryRepository::create(&store, "c", alice.id).await.expect("ok");

        let mut in_category = new_variable(alice.id, "parent", "");
        in_category.category_id = Some(category.id);
        let parent = VariableRepository::create(&store, in_category).await.expect("ok");

        let mut child = new_variable(alice.id, "child", "");
        child.parent_variable_id = Some(parent.id);
        let child = VariableRepository::create(&store, child).await.expect("ok");

        CategoryRepository::delete(&store, category.id, CategoryDeletion::Cascade)
            .await
            .expect("Should delete");

        assert!(VariableRepository::get(&store, parent.id).await.expect("ok").is_none());
        let survivor = VariableRepository::require(&store, child.id).await.expect("ok");
        assert_eq!(survivor.parent_variable_id, None);
        assert!(CategoryRepository::get(&store, category.id).await.expect("ok").is_none());
    }

    #[tokio::test]
    async fn test_reassign_moves_variables() {
        let (store, alice) = seeded().await;
        let from = CategoryRepository::create(&store, "from", alice.id).await.expect("ok");
        let to = CategoryRepository::create(&store, "to", alice.id).await.expect("ok");
        let mut input = new_variable(alice.id, "x", "1");
        input.category_id = Some(from.id);
        let variable = VariableRepository::create(&store, input).await.expect("ok");

        CategoryRepository::delete(&store, from.id, CategoryDeletion::Reassign(to.id))
            .await
            .expect("Should delete");

        let moved = VariableRepository::require(&store, variable.id).await.expect("ok");
        assert_eq!(moved.category_id, Some(to.id));
    }

    #[tokio::test]
    async fn test_reassign_to_missing_target_changes_nothing() {
        let (store, alice) = seeded().await;
        let from = CategoryRepository::create(&store, "from", alice.id).await.expect("ok");

        let result =
            CategoryRepository::delete(&store, from.id, CategoryDeletion::Reassign(CategoryId(99)))
                .await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
        assert!(CategoryRepository::get(&store, from.id).await.expect("ok").is_some());
    }

    #[tokio::test]
    async fn test_update_rejects_parent_cycle_under_lock() {
        let (store, alice) = seeded().await;
        let a =
            VariableRepository::create(&store, new_variable(alice.id, "a", "")).await.expect("ok");
        let mut b = new_variable(alice.id, "b", "");
        b.parent_variable_id = Some(a.id);
        let b = VariableRepository::create(&store, b).await.expect("ok");
        let mut c = new_variable(alice.id, "c", "");
        c.parent_variable_id = Some(b.id);
        let c = VariableRepository::create(&store, c).await.expect("ok");

        let mut looped = a.clone();
        looped.parent_variable_id = Some(c.id);
        let result = VariableRepository::update(&store, &looped).await;
        assert!(matches!(result, Err(RepositoryError::Invalid(_))));

        let mut own_parent = a.clone();
        own_parent.parent_variable_id = Some(a.id);
        let result = VariableRepository::update(&store, &own_parent).await;
        assert!(matches!(result, Err(RepositoryError::Invalid(_))));

        let stored = VariableRepository::require(&store, a.id).await.expect("ok");
        assert_eq!(stored.parent_variable_id, None);
    }

    #[tokio::test]
    async fn test_write_rejects_foreign_links() {
        let (store, alice) = seeded().await;
        let bob = UserRepository::create(&store, new_user("bob")).await.expect("ok");
        let bobs_category = CategoryRepository::create(&store, "c", bob.id).await.expect("ok");
        let bobs_variable =
            VariableRepository::create(&store, new_variable(bob.id, "x", "")).await.expect("ok");

        let mut input = new_variable(alice.id, "a", "");
        input.category_id = Some(bobs_category.id);
        let result = VariableRepository::create(&store, input).await;
        assert!(matches!(result, Err(RepositoryError::Invalid(_))));

        let mine =
            VariableRepository::create(&store, new_variable(alice.id, "a", "")).await.expect("ok");
        let mut updated = mine.clone();
        updated.parent_variable_id = Some(bobs_variable.id);
        let result = VariableRepository::update(&store, &updated).await;
        assert!(matches!(result, Err(RepositoryError::Invalid(_))));
        let stored = VariableRepository::list_by_owner(&store, alice.id).await.expect("ok");
        assert_eq!(stored, vec![mine]);
    }

    #[tokio::test]
    async fn test_write_rejects_deleted_category() {
        let (store, alice) = seeded().await;
        let category = CategoryRepository::create(&store, "gone", alice.id).await.expect("ok");
        CategoryRepository::delete(&store, category.id, CategoryDeletion::Cascade)
            .await
            .expect("Should delete");

        let mut input = new_variable(alice.id, "a", "");
        input.category_id = Some(category.id);
        let result = VariableRepository::create(&store, input).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));

        let mut orphan = new_variable(alice.id, "b", "");
        orphan.parent_variable_id = Some(VariableId(99));
        let result = VariableRepository::create(&store, orphan).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_by_owner_counts() {
        let (store, alice) = seeded().await;
        let bob = UserRepository::create(&store, new_user("bob")).await.expect("ok");
        VariableRepository::create(&store, new_variable(alice.id, "a", "")).await.expect("ok");
        VariableRepository::create(&store, new_variable(alice.id, "b", "")).await.expect("ok");
        VariableRepository::create(&store, new_variable(bob.id, "a", "")).await.expect("ok");

        let removed = VariableRepository::delete_by_owner(&store, alice.id).await.expect("ok");
        assert_eq!(removed, 2);
        assert_eq!(store.list_by_owner(bob.id).await.expect("ok").len(), 1);
    }

    #[tokio::test]
    async fn test_list_is_paged_in_id_order() {
        let (store, alice) = seeded().await;
        for identifier in ["a", "b", "c", "d"] {
            VariableRepository::create(&store, new_variable(alice.id, identifier, ""))
                .await
                .expect("ok");
        }

        let page = VariableRepository::list(&store, Some(alice.id), Page::new(1, 2))
            .await
            .expect("ok");
        let identifiers: Vec<_> = page.iter().map(|v| v.identifier.as_str()).collect();
        assert_eq!(identifiers, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_snapshot_survives_reopen() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let path = dir.path().join("store.json");

        let store = InMemoryStore::open(TokioFileSystem::new(), &path)
            .await
            .expect("Should open");
        let alice = UserRepository::create(&store, new_user("alice")).await.expect("ok");
        let variable = VariableRepository::create(&store, new_variable(alice.id, "host", "h"))
            .await
            .expect("ok");
        drop(store);

        let reopened = InMemoryStore::open(TokioFileSystem::new(), &path)
            .await
            .expect("Should reopen");
        assert_eq!(reopened.data_file(), Some(path.as_path()));
        let restored = VariableRepository::require(&reopened, variable.id)
            .await
            .expect("Should exist");
        assert_eq!(restored, variable);

        let bob = UserRepository::create(&reopened, new_user("bob")).await.expect("ok");
        assert_eq!(bob.id, UserId(3));
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_storage_error() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{ not json").expect("Should write");

        let result = InMemoryStore::open(TokioFileSystem::new(), &path).await;
        assert!(matches!(result, Err(RepositoryError::Storage(_))));
    }

    #[derive(Debug)]
    struct ReadOnlyFileSystem;

    impl FileSystem for ReadOnlyFileSystem {
        async fn read_file(&self, path: &Path) -> Result<Vec<u8>, FileSystemError> {
            Err(FileSystemError::NotFound(path.to_path_buf()))
        }

        async fn write_file(&self, path: &Path, _contents: &[u8]) -> Result<(), FileSystemError> {
            Err(FileSystemError::PermissionDenied(path.to_path_buf()))
        }

        async fn exists(&self, _path: &Path) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_failed_write_rolls_back() {
        let store = InMemoryStore::open(ReadOnlyFileSystem, "/readonly/store.json")
            .await
            .expect("Should open");

        let result = UserRepository::create(&store, new_user("alice")).await;
        assert!(matches!(result, Err(RepositoryError::Storage(_))));
        assert!(store.find_by_username("alice").await.expect("ok").is_none());
    }
}
