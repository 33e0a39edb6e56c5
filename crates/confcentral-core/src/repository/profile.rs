//! Profile repository trait definition, including registrations and the
//! session wishlist.

use std::collections::HashMap;

use confcentral_types::conference::ConferenceId;
use confcentral_types::error::RepositoryError;
use confcentral_types::profile::Profile;
use confcentral_types::session::SessionId;

/// Repository trait for profile persistence.
pub trait ProfileRepository: Send + Sync {
    /// Get a profile with its registrations and wishlist.
    fn get(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Profile>, RepositoryError>> + Send;

    /// Insert or update the scalar fields of a profile (display name, email,
    /// tee-shirt size). Registrations and wishlist entries are not touched.
    fn save(
        &self,
        profile: &Profile,
    ) -> impl std::future::Future<Output = Result<Profile, RepositoryError>> + Send;

    /// Display names for the given user ids. Users without a profile are absent.
    fn display_names(
        &self,
        user_ids: &[String],
    ) -> impl std::future::Future<Output = Result<HashMap<String, String>, RepositoryError>> + Send;

    /// Atomically register a user for a conference and take one seat.
    ///
    /// Fails with `Conflict` if the user is already registered or no seats
    /// are left, and with `NotFound` if the conference does not exist.
    fn register(
        &self,
        user_id: &str,
        conference_id: &ConferenceId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Atomically unregister a user and give the seat back.
    ///
    /// Returns `false` if the user was not registered.
    fn unregister(
        &self,
        user_id: &str,
        conference_id: &ConferenceId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Append a session to the user's wishlist. Fails with `Conflict` if it
    /// is already there.
    fn add_to_wishlist(
        &self,
        user_id: &str,
        session_id: &SessionId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Remove a session from the wishlist. Returns whether it was present.
    fn remove_from_wishlist(
        &self,
        user_id: &str,
        session_id: &SessionId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
