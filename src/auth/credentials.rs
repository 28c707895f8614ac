//! Account creation and password checks on top of a [`UserStore`].

use crate::auth::password::{hash_password, verify_password as verify_hash};
use crate::error::AppError;
use crate::models::{NewUser, User};
use crate::store::UserStore;

/// Hashes the password and stores the account. Fails with `Conflict` on a duplicate email.
pub async fn create_user(
    store: &dyn UserStore,
    name: &str,
    email: &str,
    password: &str,
    cost: u32,
) -> Result<User, AppError> {
    if store.find_user_by_email(email).await?.is_some() {
        return Err(AppError::Conflict("User already exists".into()));
    }

    let password_hash = hash_password(password, cost)?;
    store
        .insert_user(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
        })
        .await
}

pub fn verify_password(user: &User, password: &str) -> Result<bool, AppError> {
    verify_hash(password, &user.password_hash)
}

/// Looks the account up and checks the password. Unknown email and wrong password
/// produce the same error.
pub async fn authenticate(
    store: &dyn UserStore,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let invalid = || AppError::Unauthorized("Invalid credentials".into());
    let user = store.find_user_by_email(email).await?.ok_or_else(invalid)?;
    if verify_password(&user, password)? {
        Ok(user)
    } else {
        Err(invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[actix_rt::test]
    async fn test_password_is_stored_hashed() {
        let store = MemoryStore::new();
        let user = create_user(&store, "Ann", "ann@x.com", "secret1", 4)
            .await
            .unwrap();
        assert_ne!(user.password_hash, "secret1");
        assert!(verify_password(&user, "secret1").unwrap());
        assert!(!verify_password(&user, "secret2").unwrap());
    }

    #[actix_rt::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        create_user(&store, "Ann", "ann@x.com", "secret1", 4)
            .await
            .unwrap();
        let again = create_user(&store, "Ann Again", "ann@x.com", "secret9", 4).await;
        assert!(matches!(again, Err(AppError::Conflict(_))));
        assert_eq!(store.user_count().await, 1);
    }

    #[actix_rt::test]
    async fn test_authenticate() {
        let store = MemoryStore::new();
        let created = create_user(&store, "Ann", "ann@x.com", "secret1", 4)
            .await
            .unwrap();

        let user = authenticate(&store, "ann@x.com", "secret1").await.unwrap();
        assert_eq!(user.id, created.id);

        assert!(matches!(
            authenticate(&store, "ann@x.com", "wrong!").await,
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            authenticate(&store, "nobody@x.com", "secret1").await,
            Err(AppError::Unauthorized(_))
        ));
    }
}
