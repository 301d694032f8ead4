use apiserver::orchestration::ClusterCredentials;
use apiserver::{build_manager, BootstrapError, FailureKind};
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

use crate::support::{sqlite_config, FakeBuckets, OutageConnector, BUCKET};

#[tokio::test]
async fn existing_bucket_is_accepted() {
    let buckets = FakeBuckets::with_existing(BUCKET);

    let manager = build_manager()
        .with_connector(OutageConnector::healthy())
        .with_bucket_api(buckets.clone())
        .with_cluster_credentials(ClusterCredentials::default())
        .build(&sqlite_config())
        .await
        .expect("existing bucket is not an error");

    assert_eq!(buckets.create_calls(), 1);
    assert!(manager.object_store().bucket_exists().await.expect("exists"));
    manager.close().await.expect("close");
}

#[tokio::test]
async fn provisioning_twice_succeeds() {
    let buckets = FakeBuckets::empty();

    for _ in 0..2 {
        let manager = build_manager()
            .with_connector(OutageConnector::healthy())
            .with_bucket_api(buckets.clone())
            .with_cluster_credentials(ClusterCredentials::default())
            .build(&sqlite_config())
            .await
            .expect("bootstrap");
        manager.close().await.expect("close");
    }

    assert_eq!(buckets.create_calls(), 2);
}

#[tokio::test]
async fn failed_provisioning_closes_database() {
    let connector = OutageConnector::healthy();

    let err = build_manager()
        .with_connector(connector.clone())
        .with_bucket_api(FakeBuckets::read_only())
        .with_cluster_credentials(ClusterCredentials::default())
        .build(&sqlite_config())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), FailureKind::Provisioning);
    assert!(matches!(err, BootstrapError::ObjectStore { .. }), "{err}");

    let db = connector.last_opened().expect("database was opened");
    let res = db
        .execute(Statement::from_string(DatabaseBackend::Sqlite, "SELECT 1"))
        .await;
    assert!(res.is_err(), "database handle should be closed");
}

#[tokio::test]
async fn invalid_namespace_fails_after_database_and_closes_it() {
    let connector = OutageConnector::healthy();
    let config = sqlite_config().with(apiserver::config::keys::POD_NAMESPACE, "Not_A_Label");

    let err = build_manager()
        .with_connector(connector.clone())
        .with_bucket_api(FakeBuckets::empty())
        .with_cluster_credentials(ClusterCredentials::default())
        .build(&config)
        .await
        .unwrap_err();

    assert_eq!(err.code(), "ORCHESTRATION_CLIENT_ERROR");
    let db = connector.last_opened().expect("database was opened");
    let res = db
        .execute(Statement::from_string(DatabaseBackend::Sqlite, "SELECT 1"))
        .await;
    assert!(res.is_err(), "database handle should be closed");
}
