//! Speaker service.

use confcentral_types::error::{RepositoryError, SpeakerError};
use confcentral_types::speaker::{CreateSpeakerRequest, Speaker, normalize_email, validate_email};
use tracing::info;

use crate::repository::speaker::SpeakerRepository;

fn storage_err(e: RepositoryError) -> SpeakerError {
    SpeakerError::StorageError(e.to_string())
}

/// Service for the speaker directory. Speakers are referenced by sessions
/// but never owned by them.
pub struct SpeakerService<K: SpeakerRepository> {
    speakers: K,
}

impl<K: SpeakerRepository> SpeakerService<K> {
    pub fn new(speakers: K) -> Self {
        Self { speakers }
    }

    pub async fn create_speaker(&self, request: CreateSpeakerRequest) -> Result<Speaker, SpeakerError> {
        let email = normalize_email(&request.email);
        validate_email(&email).map_err(SpeakerError::InvalidArgument)?;

        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(SpeakerError::InvalidArgument(
                "speaker name cannot be empty".to_string(),
            ));
        }

        let speaker = Speaker {
            email,
            name,
            biography: request.biography.filter(|b| !b.trim().is_empty()),
            company: request.company.filter(|c| !c.trim().is_empty()),
        };

        let speaker = self.speakers.create(&speaker).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => SpeakerError::AlreadyExists(speaker.email.clone()),
            other => storage_err(other),
        })?;
        info!(email = %speaker.email, "speaker created");
        Ok(speaker)
    }

    pub async fn get_speaker(&self, email: &str) -> Result<Speaker, SpeakerError> {
        let email = normalize_email(email);
        self.speakers
            .get(&email)
            .await
            .map_err(storage_err)?
            .ok_or(SpeakerError::NotFound(email))
    }

    pub async fn list_speakers(&self) -> Result<Vec<Speaker>, SpeakerError> {
        self.speakers.list().await.map_err(storage_err)
    }

    /// Delete a speaker. Sessions keep their references.
    pub async fn delete_speaker(&self, email: &str) -> Result<(), SpeakerError> {
        let email = normalize_email(email);
        self.speakers.delete(&email).await.map_err(|e| match e {
            RepositoryError::NotFound => SpeakerError::NotFound(email.clone()),
            other => storage_err(other),
        })?;
        info!(email = %email, "speaker deleted");
        Ok(())
    }
}
