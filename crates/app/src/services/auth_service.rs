//! Auth service: login, logout and bearer-token resolution.

use gymhub_domain::error::GymHubError;
use gymhub_domain::form::Form;
use gymhub_domain::time::now;
use gymhub_domain::user::{AccessToken, Credentials, NewUser, User};

use crate::credentials::{
    generate_secret, hash_password_blocking, hash_secret, verify_password_blocking,
};
use crate::ports::{TokenRepository, UserRepository};

/// Application service issuing and checking opaque bearer tokens.
pub struct AuthService<U, T> {
    users: U,
    tokens: T,
}

impl<U: UserRepository, T: TokenRepository> AuthService<U, T> {
    pub fn new(users: U, tokens: T) -> Self {
        Self { users, tokens }
    }

    /// Exchange an email and password for a new `"{id}|{secret}"` token.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::Validation`] when the form is incomplete,
    /// [`GymHubError::Unauthorized`] when the credentials do not match, or a
    /// storage error from the repositories.
    #[tracing::instrument(skip(self, form))]
    pub async fn login(&self, form: &Form) -> Result<String, GymHubError> {
        let credentials = Credentials::from_form(form)?;
        let Some(user) = self.users.find_by_email(&credentials.email).await? else {
            tracing::info!(email = %credentials.email, "login for unknown email");
            return Err(GymHubError::Unauthorized);
        };
        let matches =
            verify_password_blocking(credentials.password, user.password_hash.clone()).await?;
        if !matches {
            tracing::info!(user_id = %user.id, "login with wrong password");
            return Err(GymHubError::Unauthorized);
        }

        let secret = generate_secret();
        let token = self
            .tokens
            .create(user.id, AccessToken::DEFAULT_NAME, &hash_secret(&secret))
            .await?;
        tracing::info!(user_id = %user.id, token_id = %token.id, "access token issued");
        Ok(format!("{}|{secret}", token.id))
    }

    /// Resolve a presented bearer token to its user.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::Unauthorized`] for unknown or revoked tokens,
    /// or a storage error from the repositories.
    pub async fn authenticate(&self, presented: &str) -> Result<User, GymHubError> {
        let (id, secret) = AccessToken::split(presented);
        let token = self
            .tokens
            .find_by_hash(&hash_secret(secret))
            .await?
            .ok_or(GymHubError::Unauthorized)?;
        if id.is_some_and(|id| id != token.id) {
            return Err(GymHubError::Unauthorized);
        }

        self.tokens.touch(token.id, now()).await?;
        self.users
            .get_by_id(token.user_id)
            .await?
            .ok_or(GymHubError::Unauthorized)
    }

    /// Revoke every token of `user`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn logout(&self, user: &User) -> Result<u64, GymHubError> {
        let revoked = self.tokens.delete_for_user(user.id).await?;
        tracing::info!(revoked, "access tokens revoked");
        Ok(revoked)
    }

    /// Create the user unless one with `email` already exists.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::Credentials`] when hashing fails, or a storage
    /// error propagated from the repository.
    #[tracing::instrument(skip(self, password))]
    pub async fn ensure_user(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<User, GymHubError> {
        if let Some(existing) = self.users.find_by_email(email).await? {
            return Ok(existing);
        }
        let user = self
            .users
            .create(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash: hash_password_blocking(password.to_string()).await?,
            })
            .await?;
        tracing::info!(user_id = %user.id, "user created");
        Ok(user)
    }
}
