use apiserver::config::keys;
use apiserver::{build_manager, FailureKind};

use crate::support::config::mysql_config;
use crate::support::{sqlite_config, FakeBuckets, OutageConnector};

#[tokio::test]
async fn unsupported_driver_fails_before_connecting() {
    let connector = OutageConnector::healthy();
    let config = sqlite_config().with(keys::DB_DRIVER_NAME, "postgres");

    let err = build_manager()
        .with_connector(connector.clone())
        .with_bucket_api(FakeBuckets::empty())
        .build(&config)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), FailureKind::Config);
    assert!(err.to_string().contains("Driver postgres is not supported"), "{err}");
    assert_eq!(connector.calls(), 0);
}

#[tokio::test]
async fn missing_key_is_named() {
    let connector = OutageConnector::healthy();
    let buckets = FakeBuckets::empty();
    let mut config = sqlite_config();
    config.remove(keys::OBJECT_STORE_BUCKET);

    let err = build_manager()
        .with_connector(connector.clone())
        .with_bucket_api(buckets.clone())
        .build(&config)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), FailureKind::Config);
    assert_eq!(err.code(), "CONFIG_ERROR");
    assert!(err.to_string().contains(keys::OBJECT_STORE_BUCKET), "{err}");
    assert_eq!(connector.calls(), 0);
    assert_eq!(buckets.create_calls(), 0);
}

#[tokio::test]
async fn malformed_timeout_is_config_error() {
    let config = sqlite_config().with(keys::INIT_CONNECTION_TIMEOUT, "ten seconds");

    let err = build_manager().build(&config).await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::Config);
    assert!(err.to_string().contains(keys::INIT_CONNECTION_TIMEOUT), "{err}");
}

#[tokio::test]
async fn unusable_mysql_host_fails_before_connecting() {
    for host in ["my host", "db/primary"] {
        let connector = OutageConnector::healthy();
        let config = mysql_config()
            .with(keys::MYSQL_SERVICE_HOST, host)
            .with(keys::DB_PASSWORD, "hunter2");

        let err = build_manager()
            .with_connector(connector.clone())
            .with_bucket_api(FakeBuckets::empty())
            .build(&config)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FailureKind::Config, "{host}: {err}");
        assert!(!err.to_string().contains("hunter2"), "{err}");
        assert_eq!(connector.calls(), 0);
    }
}
