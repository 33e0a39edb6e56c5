//! Conference repository trait definition.

use confcentral_types::conference::{Conference, ConferenceField, ConferenceId, Operator};
use confcentral_types::error::RepositoryError;

/// Right-hand side of a conference filter, typed after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
}

/// A validated conference filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConferenceFilter {
    pub field: ConferenceField,
    pub operator: Operator,
    pub value: FilterValue,
}

/// Store-executable conference query.
///
/// All filters are combined with AND. Inequality operators only ever target
/// `inequality_field`; results are ordered by that field (when present) and
/// then by conference name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConferenceQuery {
    pub filters: Vec<ConferenceFilter>,
    pub inequality_field: Option<ConferenceField>,
}

/// Repository trait for conference persistence.
///
/// Implementations live in confcentral-infra (e.g., SqliteConferenceRepository).
pub trait ConferenceRepository: Send + Sync {
    /// Create a new conference. Returns the created conference.
    fn create(
        &self,
        conference: &Conference,
    ) -> impl std::future::Future<Output = Result<Conference, RepositoryError>> + Send;

    /// Get a conference by its key.
    fn get_by_id(
        &self,
        id: &ConferenceId,
    ) -> impl std::future::Future<Output = Result<Option<Conference>, RepositoryError>> + Send;

    /// Get several conferences at once. Unknown keys are skipped; the result
    /// follows the order of `ids`.
    fn get_many(
        &self,
        ids: &[ConferenceId],
    ) -> impl std::future::Future<Output = Result<Vec<Conference>, RepositoryError>> + Send;

    /// Overwrite an existing conference. Returns the updated conference.
    fn update(
        &self,
        conference: &Conference,
    ) -> impl std::future::Future<Output = Result<Conference, RepositoryError>> + Send;

    /// Delete a conference together with everything it owns.
    fn delete(
        &self,
        id: &ConferenceId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Conferences organised by `user_id`, ordered by name.
    fn list_by_organizer(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Conference>, RepositoryError>> + Send;

    /// Run a validated conference query.
    fn query(
        &self,
        query: &ConferenceQuery,
    ) -> impl std::future::Future<Output = Result<Vec<Conference>, RepositoryError>> + Send;

    /// Conferences with `0 < seats_available <= max_seats`, ordered by name.
    fn list_nearly_sold_out(
        &self,
        max_seats: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Conference>, RepositoryError>> + Send;
}
