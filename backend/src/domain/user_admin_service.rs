//! Admin-only account management.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::Page;
use tracing::info;

use super::authorization::{ADMIN_ROLES, ensure_role};
use super::ports::{CredentialHasher, NewAccount, UserAdminService, UserRepository, UserUpdate};
use super::repository_errors::user_store;
use super::{Error, Principal, User, UserAccount, UserId, UserListQuery};

/// Concrete implementation of [`UserAdminService`].
#[derive(Clone)]
pub struct UserAdminServiceImpl {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHasher>,
    clock: Arc<dyn Clock>,
}

impl UserAdminServiceImpl {
    /// Create a service over the given ports.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn CredentialHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            clock,
        }
    }

    async fn account(&self, id: &UserId) -> Result<UserAccount, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(user_store)?
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: &UserId) -> Error {
    Error::not_found(format!("no user with the id of {id}"))
}

#[async_trait]
impl UserAdminService for UserAdminServiceImpl {
    async fn list(&self, principal: &Principal, query: UserListQuery) -> Result<Page<User>, Error> {
        ensure_role(principal, ADMIN_ROLES)?;
        self.users.list(&query).await.map_err(user_store)
    }

    async fn get(&self, principal: &Principal, id: UserId) -> Result<User, Error> {
        ensure_role(principal, ADMIN_ROLES)?;
        Ok(self.account(&id).await?.user)
    }

    async fn create(&self, principal: &Principal, account: NewAccount) -> Result<User, Error> {
        ensure_role(principal, ADMIN_ROLES)?;
        let password_hash = self
            .hasher
            .hash(account.password.expose())
            .map_err(|error| Error::internal(error.to_string()))?;
        let stored = UserAccount {
            user: User {
                id: UserId::random(),
                name: account.name,
                email: account.email,
                role: account.role,
                created_at: self.clock.utc(),
            },
            password_hash,
            reset: None,
        };
        self.users.insert(&stored).await.map_err(user_store)?;
        info!(user_id = %stored.user.id, admin_id = %principal.id, "account created by admin");
        Ok(stored.user)
    }

    async fn update(
        &self,
        principal: &Principal,
        id: UserId,
        update: UserUpdate,
    ) -> Result<User, Error> {
        ensure_role(principal, ADMIN_ROLES)?;
        let mut account = self.account(&id).await?;
        if let Some(name) = update.name {
            account.user.name = name;
        }
        if let Some(email) = update.email {
            account.user.email = email;
        }
        if let Some(role) = update.role {
            account.user.role = role;
        }
        if !self.users.update(&account).await.map_err(user_store)? {
            return Err(not_found(&id));
        }
        Ok(account.user)
    }

    async fn delete(&self, principal: &Principal, id: UserId) -> Result<(), Error> {
        ensure_role(principal, ADMIN_ROLES)?;
        if !self.users.delete(&id).await.map_err(user_store)? {
            return Err(not_found(&id));
        }
        info!(user_id = %id, admin_id = %principal.id, "account deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockCredentialHasher, MockUserRepository};
    use crate::domain::{EmailAddress, ErrorCode, Password, PasswordHash, Role, UserName};
    use crate::test_support::{MutableClock, fixture_timestamp};
    use rstest::rstest;

    fn admin() -> Principal {
        Principal {
            id: UserId::random(),
            role: Role::Admin,
        }
    }

    fn service(users: MockUserRepository, hasher: MockCredentialHasher) -> UserAdminServiceImpl {
        UserAdminServiceImpl::new(
            Arc::new(users),
            Arc::new(hasher),
            Arc::new(MutableClock::at_fixture()),
        )
    }

    fn stored() -> UserAccount {
        UserAccount {
            user: User {
                id: UserId::random(),
                name: UserName::new("Grace Hopper").expect("valid name"),
                email: EmailAddress::new("grace@example.com").expect("valid email"),
                role: Role::User,
                created_at: fixture_timestamp(),
            },
            password_hash: PasswordHash::new("digest"),
            reset: None,
        }
    }

    #[rstest]
    #[case(Role::User)]
    #[case(Role::Publisher)]
    #[tokio::test]
    async fn non_admins_are_forbidden(#[case] role: Role) {
        let mut users = MockUserRepository::new();
        users.expect_list().never();
        let principal = Principal {
            id: UserId::random(),
            role,
        };

        let error = service(users, MockCredentialHasher::new())
            .list(&principal, UserListQuery::default())
            .await
            .expect_err("admin only");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn create_assigns_any_role() {
        let mut hasher = MockCredentialHasher::new();
        hasher
            .expect_hash()
            .return_once(|_| Ok(PasswordHash::new("digest")));
        let mut users = MockUserRepository::new();
        users
            .expect_insert()
            .withf(|account| account.user.role == Role::Admin)
            .times(1)
            .return_once(|_| Ok(()));

        let account = NewAccount {
            name: UserName::new("Root").expect("valid"),
            email: EmailAddress::new("root@example.com").expect("valid"),
            password: Password::new("123456").expect("valid"),
            role: Role::Admin,
        };
        let user = service(users, hasher)
            .create(&admin(), account)
            .await
            .expect("created");
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.created_at, fixture_timestamp());
    }

    #[rstest]
    #[tokio::test]
    async fn update_changes_role() {
        let existing = stored();
        let id = existing.user.id;
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(existing)));
        users
            .expect_update()
            .withf(|account| account.user.role == Role::Publisher)
            .return_once(|_| Ok(true));

        let update = UserUpdate {
            role: Some(Role::Publisher),
            ..UserUpdate::default()
        };
        let user = service(users, MockCredentialHasher::new())
            .update(&admin(), id, update)
            .await
            .expect("updated");
        assert_eq!(user.role, Role::Publisher);
        assert_eq!(user.name.as_ref(), "Grace Hopper");
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_missing_account_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_delete().return_once(|_| Ok(false));

        let error = service(users, MockCredentialHasher::new())
            .delete(&admin(), UserId::random())
            .await
            .expect_err("missing");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
