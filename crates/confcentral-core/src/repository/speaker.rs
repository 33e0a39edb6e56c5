//! Speaker repository trait definition.

use confcentral_types::error::RepositoryError;
use confcentral_types::speaker::Speaker;

/// Repository trait for speaker persistence. Speakers are keyed by
/// normalized email.
pub trait SpeakerRepository: Send + Sync {
    /// Create a new speaker. Fails with `Conflict` if the email is taken.
    fn create(
        &self,
        speaker: &Speaker,
    ) -> impl std::future::Future<Output = Result<Speaker, RepositoryError>> + Send;

    /// Get a speaker by email.
    fn get(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<Speaker>, RepositoryError>> + Send;

    /// Get the speakers whose emails are listed. Unknown emails are skipped.
    fn get_many(
        &self,
        emails: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<Speaker>, RepositoryError>> + Send;

    /// All speakers, ordered by name.
    fn list(&self) -> impl std::future::Future<Output = Result<Vec<Speaker>, RepositoryError>> + Send;

    /// Delete a speaker. Sessions referencing it are left untouched.
    fn delete(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
