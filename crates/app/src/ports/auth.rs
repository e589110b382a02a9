//! Credential ports: users and their bearer tokens.

use std::future::Future;

use gymhub_domain::error::GymHubError;
use gymhub_domain::id::{TokenId, UserId};
use gymhub_domain::time::Timestamp;
use gymhub_domain::user::{AccessToken, NewUser, User};

/// Repository for [`User`]s.
pub trait UserRepository {
    fn create(&self, user: NewUser) -> impl Future<Output = Result<User, GymHubError>> + Send;

    fn get_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, GymHubError>> + Send;

    /// Look a user up by exact e-mail address.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, GymHubError>> + Send;
}

/// Repository for issued [`AccessToken`]s.
pub trait TokenRepository {
    /// Store a new token for `user_id`.
    fn create(
        &self,
        user_id: UserId,
        name: &str,
        token_hash: &str,
    ) -> impl Future<Output = Result<AccessToken, GymHubError>> + Send;

    /// Find the token whose secret hashes to `token_hash`.
    fn find_by_hash(
        &self,
        token_hash: &str,
    ) -> impl Future<Output = Result<Option<AccessToken>, GymHubError>> + Send;

    /// Record that the token was just used.
    fn touch(
        &self,
        id: TokenId,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), GymHubError>> + Send;

    /// Revoke every token of `user_id`, returning how many were removed.
    fn delete_for_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<u64, GymHubError>> + Send;
}
