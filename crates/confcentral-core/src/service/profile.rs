//! Profile and wishlist service.

use confcentral_types::error::{ProfileError, RepositoryError};
use confcentral_types::profile::{Caller, Profile, UpdateProfileRequest};
use confcentral_types::session::{Session, SessionId};
use tracing::info;

use crate::repository::profile::ProfileRepository;
use crate::repository::session::SessionRepository;

/// Load the caller's profile, creating it on first sight.
///
/// New profiles take the caller's nickname as display name and their email
/// as main email.
pub async fn ensure_profile<P: ProfileRepository>(
    profiles: &P,
    caller: &Caller,
) -> Result<Profile, RepositoryError> {
    if let Some(profile) = profiles.get(&caller.user_id).await? {
        return Ok(profile);
    }

    let profile = Profile::new(&caller.user_id, &caller.nickname, &caller.email);
    let profile = profiles.save(&profile).await?;
    info!(user_id = %caller.user_id, "profile created");
    Ok(profile)
}

fn storage_err(e: RepositoryError) -> ProfileError {
    ProfileError::StorageError(e.to_string())
}

/// Service for the caller's own profile and session wishlist.
pub struct ProfileService<P: ProfileRepository, S: SessionRepository> {
    profiles: P,
    sessions: S,
}

impl<P: ProfileRepository, S: SessionRepository> ProfileService<P, S> {
    pub fn new(profiles: P, sessions: S) -> Self {
        Self { profiles, sessions }
    }

    /// Return the caller's profile, creating a default one if needed.
    pub async fn get_profile(&self, caller: &Caller) -> Result<Profile, ProfileError> {
        ensure_profile(&self.profiles, caller)
            .await
            .map_err(storage_err)
    }

    /// Update the user-modifiable fields of the caller's profile.
    pub async fn save_profile(
        &self,
        caller: &Caller,
        request: UpdateProfileRequest,
    ) -> Result<Profile, ProfileError> {
        let mut profile = ensure_profile(&self.profiles, caller)
            .await
            .map_err(storage_err)?;

        if let Some(name) = request.display_name {
            let name = name.trim();
            if name.is_empty() {
                return Err(ProfileError::InvalidArgument(
                    "display name cannot be empty".to_string(),
                ));
            }
            profile.display_name = name.to_string();
        }
        if let Some(size) = request.tee_shirt_size {
            profile.tee_shirt_size = size;
        }

        let saved = self.profiles.save(&profile).await.map_err(storage_err)?;
        info!(user_id = %caller.user_id, "profile updated");
        Ok(saved)
    }

    /// Add a session to the caller's wishlist.
    pub async fn add_to_wishlist(
        &self,
        caller: &Caller,
        session_key: &str,
    ) -> Result<(), ProfileError> {
        let session_id = self.resolve_session(session_key).await?;
        ensure_profile(&self.profiles, caller)
            .await
            .map_err(storage_err)?;

        self.profiles
            .add_to_wishlist(&caller.user_id, &session_id)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => ProfileError::Conflict(
                    "You already have this session in your wishlist".to_string(),
                ),
                // The session was deleted after it was resolved.
                RepositoryError::NotFound => {
                    ProfileError::SessionNotFound(session_key.to_string())
                }
                other => storage_err(other),
            })?;

        info!(user_id = %caller.user_id, session_id = %session_id, "session added to wishlist");
        Ok(())
    }

    /// Remove a session from the caller's wishlist. Returns whether it was
    /// present.
    pub async fn remove_from_wishlist(
        &self,
        caller: &Caller,
        session_key: &str,
    ) -> Result<bool, ProfileError> {
        let session_id: SessionId = session_key
            .parse()
            .map_err(|_| ProfileError::SessionNotFound(session_key.to_string()))?;

        let removed = self
            .profiles
            .remove_from_wishlist(&caller.user_id, &session_id)
            .await
            .map_err(storage_err)?;
        if removed {
            info!(user_id = %caller.user_id, session_id = %session_id, "session removed from wishlist");
        }
        Ok(removed)
    }

    /// Sessions on the caller's wishlist, in the order they were added.
    pub async fn wishlist_sessions(&self, caller: &Caller) -> Result<Vec<Session>, ProfileError> {
        let profile = ensure_profile(&self.profiles, caller)
            .await
            .map_err(storage_err)?;
        self.sessions
            .get_many(&profile.session_wishlist)
            .await
            .map_err(storage_err)
    }

    async fn resolve_session(&self, session_key: &str) -> Result<SessionId, ProfileError> {
        let not_found = || ProfileError::SessionNotFound(session_key.to_string());
        let id: SessionId = session_key.parse().map_err(|_| not_found())?;
        match self.sessions.get_by_id(&id).await.map_err(storage_err)? {
            Some(_) => Ok(id),
            None => Err(not_found()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryProfiles, MemorySessions, caller, sample_session};
    use confcentral_types::conference::ConferenceId;
    use confcentral_types::profile::TeeShirtSize;
    use confcentral_types::session::SessionType;

    fn service() -> (ProfileService<MemoryProfiles, MemorySessions>, MemorySessions) {
        let sessions = MemorySessions::default();
        (
            ProfileService::new(MemoryProfiles::default(), sessions.clone()),
            sessions,
        )
    }

    #[tokio::test]
    async fn test_profile_created_on_first_access() {
        let (svc, _) = service();
        let profile = svc.get_profile(&caller("ann@example.com")).await.unwrap();
        assert_eq!(profile.user_id, "ann@example.com");
        assert_eq!(profile.display_name, "ann");
        assert_eq!(profile.tee_shirt_size, TeeShirtSize::NotSpecified);
    }

    #[tokio::test]
    async fn test_save_profile_updates_fields() {
        let (svc, _) = service();
        let who = caller("ann@example.com");
        let profile = svc
            .save_profile(
                &who,
                UpdateProfileRequest {
                    display_name: Some("  Ann  ".to_string()),
                    tee_shirt_size: Some(TeeShirtSize::LW),
                },
            )
            .await
            .unwrap();
        assert_eq!(profile.display_name, "Ann");
        assert_eq!(profile.tee_shirt_size, TeeShirtSize::LW);

        let err = svc
            .save_profile(
                &who,
                UpdateProfileRequest {
                    display_name: Some(" ".to_string()),
                    tee_shirt_size: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ProfileError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_wishlist_add_remove() {
        let (svc, sessions) = service();
        let who = caller("ann@example.com");
        let session = sessions.insert(sample_session(
            ConferenceId::new(),
            "Intro",
            SessionType::Lecture,
            "10:00",
            60,
        ));
        let key = session.id.to_string();

        svc.add_to_wishlist(&who, &key).await.unwrap();
        let err = svc.add_to_wishlist(&who, &key).await.unwrap_err();
        assert!(matches!(err, ProfileError::Conflict(_)));

        let listed = svc.wishlist_sessions(&who).await.unwrap();
        assert_eq!(listed, vec![session]);

        assert!(svc.remove_from_wishlist(&who, &key).await.unwrap());
        assert!(!svc.remove_from_wishlist(&who, &key).await.unwrap());
        assert!(svc.wishlist_sessions(&who).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wishlist_unknown_session() {
        let (svc, _) = service();
        let who = caller("ann@example.com");

        let err = svc
            .add_to_wishlist(&who, &SessionId::new().to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ProfileError::SessionNotFound(_)));

        let err = svc.add_to_wishlist(&who, "not-a-key").await.unwrap_err();
        assert!(matches!(err, ProfileError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn test_wishlist_session_deleted_before_insert() {
        let visible = MemorySessions::default();
        let svc = ProfileService::new(
            MemoryProfiles::with_sessions(MemorySessions::default()),
            visible.clone(),
        );
        let session = visible.insert(sample_session(
            ConferenceId::new(),
            "Intro",
            SessionType::Lecture,
            "10:00",
            60,
        ));
        let who = caller("ann@example.com");

        let err = svc
            .add_to_wishlist(&who, &session.id.to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ProfileError::SessionNotFound(_)));
        assert!(svc.wishlist_sessions(&who).await.unwrap().is_empty());
    }
}
