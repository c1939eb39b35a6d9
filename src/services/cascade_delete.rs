use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::deadline::StoreError;
use crate::core::metrics;
use crate::core::state::AppState;
use crate::repositories;

#[derive(Debug, Error)]
pub(crate) enum CascadeError {
    #[error("assessment not found or permission denied")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub(crate) struct ChainLink {
    pub(crate) id: String,
    pub(crate) next_phase_id: Option<String>,
}

/// Owner-scoped catalog access needed to walk and delete a chain.
#[async_trait]
pub(crate) trait ChainStore: Send + Sync {
    async fn find_owned(&self, id: &str, owner_id: &str) -> Result<Option<ChainLink>, StoreError>;
    async fn delete_owned(&self, id: &str, owner_id: &str) -> Result<u64, StoreError>;
}

pub(crate) struct PgChainStore<'a> {
    state: &'a AppState,
}

impl<'a> PgChainStore<'a> {
    pub(crate) fn new(state: &'a AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl ChainStore for PgChainStore<'_> {
    async fn find_owned(&self, id: &str, owner_id: &str) -> Result<Option<ChainLink>, StoreError> {
        let assessment = self
            .state
            .deadlines()
            .read(
                "assessments.find_owned",
                repositories::assessments::find_owned(self.state.db(), id, owner_id),
            )
            .await?;

        Ok(assessment.map(|assessment| ChainLink {
            id: assessment.id,
            next_phase_id: assessment.next_phase_id,
        }))
    }

    async fn delete_owned(&self, id: &str, owner_id: &str) -> Result<u64, StoreError> {
        self.state
            .deadlines()
            .write(
                "assessments.delete_owned",
                repositories::assessments::delete_owned(self.state.db(), id, owner_id),
            )
            .await
    }
}

/// Deletes `start_id` and every phase reachable from it that the owner also owns.
///
/// There is no transaction: a failure after the first deletion stops the walk
/// and the partial count is returned as success. A failure before anything was
/// deleted is reported as an error.
pub(crate) async fn delete_chain<S>(
    store: &S,
    owner_id: &str,
    start_id: &str,
) -> Result<u64, CascadeError>
where
    S: ChainStore + ?Sized,
{
    let mut deleted: u64 = 0;
    let mut visited = HashSet::new();
    let mut current = Some(start_id.to_string());

    while let Some(id) = current.take() {
        if !visited.insert(id.clone()) {
            tracing::warn!(assessment_id = %id, "Phase chain loops back on itself; stopping");
            break;
        }

        let link = match store.find_owned(&id, owner_id).await {
            Ok(Some(link)) => link,
            Ok(None) if deleted == 0 => return Err(CascadeError::NotFound),
            Ok(None) => break,
            Err(err) if deleted == 0 => return Err(err.into()),
            Err(err) => {
                stop_partial(&id, deleted, &err);
                break;
            }
        };

        match store.delete_owned(&link.id, owner_id).await {
            Ok(0) if deleted == 0 => return Err(CascadeError::NotFound),
            Ok(0) => break,
            Ok(_) => deleted += 1,
            Err(err) if deleted == 0 => return Err(err.into()),
            Err(err) => {
                stop_partial(&id, deleted, &err);
                break;
            }
        }

        current = link.next_phase_id;
    }

    metrics::record_chain_deleted(deleted);
    tracing::info!(
        start_id,
        owner_id,
        deleted_count = deleted,
        action = "chain_deleted",
        "Deleted assessment chain"
    );

    Ok(deleted)
}

/// Deletes one phase without following its link. Neighbours keep their pointers.
pub(crate) async fn delete_single<S>(store: &S, owner_id: &str, id: &str) -> Result<u64, CascadeError>
where
    S: ChainStore + ?Sized,
{
    match store.delete_owned(id, owner_id).await? {
        0 => Err(CascadeError::NotFound),
        deleted => {
            metrics::record_chain_deleted(deleted);
            tracing::info!(
                assessment_id = id,
                owner_id,
                action = "phase_deleted",
                "Deleted single assessment phase"
            );
            Ok(deleted)
        }
    }
}

fn stop_partial(id: &str, deleted: u64, err: &StoreError) {
    tracing::warn!(
        assessment_id = %id,
        deleted_count = deleted,
        error = %err,
        action = "chain_delete_stopped",
        "Cascade delete stopped part way; returning partial count"
    );
}
