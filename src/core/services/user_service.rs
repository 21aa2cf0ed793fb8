use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::{
    core::{
        errors::{CoreError, CoreResult},
        views::UserView,
    },
    domain::{Role, User},
    storage::{StoreError, UserStore, USER},
};

use super::validation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserInput {
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Dashboard accounts and their roles. Credentials are managed elsewhere.
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Emails are compared case-insensitively and stay reserved until the user is
    /// purged.
    pub fn create(&self, input: NewUserInput) -> CoreResult<UserView> {
        let name = validation::require_text(&input.name, "name")?;
        let email = validation::email(&input.email)?;
        if self.store.find_user_by_email(&email)?.is_some() {
            return Err(duplicate_email(&email));
        }
        let user = self
            .store
            .create_user(User::new(name, email.clone(), input.role))
            .map_err(|err| match err {
                StoreError::Conflict(_) => duplicate_email(&email),
                other => other.into(),
            })?;
        info!(id = %user.id, role = %user.role, "user created");
        Ok(UserView::from(&user))
    }

    pub fn change_role(&self, id: Uuid, role: Role) -> CoreResult<UserView> {
        let id = validation::require_id(id, "user id")?;
        let user = self.store.update_user_role(id, role)?;
        info!(%id, %role, "user role changed");
        Ok(UserView::from(&user))
    }

    pub fn list(&self, include_deleted: bool) -> CoreResult<Vec<UserView>> {
        Ok(self
            .store
            .list_users(include_deleted)?
            .iter()
            .map(UserView::from)
            .collect())
    }

    pub fn remove(&self, id: Uuid) -> CoreResult<UserView> {
        let id = validation::require_id(id, "user id")?;
        let user = self.store.soft_delete_user(id)?;
        info!(%id, "user removed");
        Ok(UserView::from(&user))
    }

    pub fn restore(&self, id: Uuid) -> CoreResult<UserView> {
        let id = validation::require_id(id, "user id")?;
        let user = self.store.restore_user(id)?;
        info!(%id, "user restored");
        Ok(UserView::from(&user))
    }

    pub fn purge(&self, id: Uuid) -> CoreResult<()> {
        let id = validation::require_id(id, "user id")?;
        if self.store.find_user(id)?.is_none() {
            return Err(CoreError::RecordNotFound {
                entity: USER,
                key: id.to_string(),
            });
        }
        self.store.hard_delete_user(id)?;
        info!(%id, "user purged");
        Ok(())
    }
}

fn duplicate_email(email: &str) -> CoreError {
    CoreError::DuplicateRecord(format!("a user with email `{email}` already exists"))
}
