//! Index provisioning.
//!
//! Ensures the destination index exists and the `latest` alias points at it
//! before any record is written. Safe to run repeatedly.

use tracing::{debug, info, instrument};

use crate::naming::IndexNaming;
use harvest_repository::{IndexStore, StoreError};

/// Create the destination index and repoint its alias.
///
/// An index that already exists is not an error, nor is an alias that is not
/// bound anywhere yet. The alias is removed from every index before being
/// bound to the new one; concurrent provisioners are not coordinated and the
/// last one to bind wins.
///
/// # Returns
///
/// * `Ok(())` - If the index exists and the alias (if any) points at it
/// * `Err(StoreError)` - If any store request fails for another reason
#[instrument(skip_all, fields(index = %naming.index_name()))]
pub async fn ensure_index(store: &dyn IndexStore, naming: &IndexNaming) -> Result<(), StoreError> {
    match store.create_index(naming.index_name()).await {
        Ok(()) => info!("Created index"),
        Err(StoreError::IndexAlreadyExists(_)) => debug!("Index already exists"),
        Err(e) => return Err(e),
    }

    let Some(alias) = naming.alias() else {
        return Ok(());
    };

    match store.delete_alias(alias).await {
        Ok(()) | Err(StoreError::NotFound(_)) => {}
        Err(e) => return Err(e),
    }
    store.put_alias(naming.index_name(), alias).await?;

    info!(alias = %alias, "Alias points at index");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::{CollectorSettings, DatePattern};
    use crate::testing::{Call, MockStore};
    use chrono::{TimeZone, Utc};

    fn monthly_naming(month: u32) -> IndexNaming {
        let settings =
            CollectorSettings::default().with_date_pattern(DatePattern::new("%Y-%m").unwrap());
        let timestamp = Utc.with_ymd_and_hms(2019, month, 15, 9, 0, 0).unwrap();
        IndexNaming::resolve("tests.ATestCollector", &settings, &timestamp)
    }

    #[tokio::test]
    async fn test_creates_index_without_alias() {
        let store = MockStore::new();
        let naming = IndexNaming::resolve(
            "tests.ATestCollector",
            &CollectorSettings::default(),
            &Utc::now(),
        );

        ensure_index(&store, &naming).await.unwrap();

        assert_eq!(
            store.calls().await,
            vec![Call::CreateIndex("tests.atestcollector".to_string())]
        );
    }

    #[tokio::test]
    async fn test_existing_index_is_not_an_error() {
        let store = MockStore::new().with_index("tests.atestcollector-2019-01");

        ensure_index(&store, &monthly_naming(1)).await.unwrap();

        assert_eq!(
            store.alias_target("tests.atestcollector-latest").await,
            Some("tests.atestcollector-2019-01".to_string())
        );
    }

    #[tokio::test]
    async fn test_repoints_alias_to_new_bucket() {
        let store = MockStore::new()
            .with_index("tests.atestcollector-2019-01")
            .with_alias("tests.atestcollector-latest", "tests.atestcollector-2019-01");

        ensure_index(&store, &monthly_naming(2)).await.unwrap();

        assert!(store.has_index("tests.atestcollector-2019-02").await);
        assert_eq!(
            store.alias_target("tests.atestcollector-latest").await,
            Some("tests.atestcollector-2019-02".to_string())
        );
        assert_eq!(
            store.calls().await,
            vec![
                Call::CreateIndex("tests.atestcollector-2019-02".to_string()),
                Call::DeleteAlias("tests.atestcollector-latest".to_string()),
                Call::PutAlias {
                    index: "tests.atestcollector-2019-02".to_string(),
                    alias: "tests.atestcollector-latest".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_is_idempotent() {
        let store = MockStore::new();
        let naming = monthly_naming(1);

        ensure_index(&store, &naming).await.unwrap();
        ensure_index(&store, &naming).await.unwrap();

        assert_eq!(
            store.alias_target("tests.atestcollector-latest").await,
            Some("tests.atestcollector-2019-01".to_string())
        );
    }

    #[tokio::test]
    async fn test_create_failure_propagates() {
        let store =
            MockStore::new().with_create_error(StoreError::api(403, "cluster_block_exception"));

        let result = ensure_index(&store, &monthly_naming(1)).await;

        assert!(matches!(result, Err(StoreError::ApiError { status: 403, .. })));
        assert_eq!(store.calls().await.len(), 1);
    }
}
