use std::time::{Duration, Instant};

use apiserver::orchestration::ClusterCredentials;
use apiserver::{build_manager, BootstrapError, FailureKind};
use db_infra::BackoffPolicy;

use crate::support::config::mysql_config;
use crate::support::{sqlite_config, FakeBuckets, OutageConnector, BUCKET};

fn startup_policy() -> BackoffPolicy {
    BackoffPolicy::with_max_elapsed(Duration::from_secs(10))
        .initial_delay(Duration::from_millis(500))
        .multiplier(1.5)
}

#[tokio::test]
async fn database_reachable_after_two_seconds() {
    let connector = OutageConnector::for_duration(Duration::from_secs(2));
    let started = Instant::now();

    let manager = build_manager()
        .with_connector(connector.clone())
        .with_bucket_api(FakeBuckets::empty())
        .with_cluster_credentials(ClusterCredentials::default())
        .with_backoff(startup_policy())
        .build(&sqlite_config())
        .await
        .expect("bootstrap should survive a short outage");

    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(2), "finished before the outage ended");
    assert!(elapsed < Duration::from_secs(10), "took {elapsed:?}");
    assert!(connector.calls() > 1, "connection was never retried");

    assert_eq!(manager.object_store().bucket(), BUCKET);
    assert_eq!(manager.job_store().count_jobs().await.expect("count"), 0);
    assert!(manager.run_store().get_run("missing").await.expect("get").is_none());
    manager.close().await.expect("close");
}

#[tokio::test(start_paused = true)]
async fn database_never_reachable_exhausts_budget() {
    let connector = OutageConnector::never_reachable();

    let err = build_manager()
        .with_connector(connector.clone())
        .with_bucket_api(FakeBuckets::empty())
        .with_cluster_credentials(ClusterCredentials::default())
        .with_backoff(startup_policy())
        .build(&mysql_config())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), FailureKind::RetryExhausted, "{err}");
    assert_eq!(err.code(), "DB_UNAVAILABLE");
    assert!(matches!(err, BootstrapError::DbUnavailable { .. }));
    assert!(connector.calls() > 1);
    assert!(connector.last_opened().is_none());
}

#[tokio::test(start_paused = true)]
async fn default_budget_comes_from_init_connection_timeout() {
    let connector = OutageConnector::never_reachable();
    let config = sqlite_config().with(apiserver::config::keys::INIT_CONNECTION_TIMEOUT, "3s");
    let started = tokio::time::Instant::now();

    let err = build_manager()
        .with_connector(connector.clone())
        .with_bucket_api(FakeBuckets::empty())
        .with_cluster_credentials(ClusterCredentials::default())
        .build(&config)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), FailureKind::RetryExhausted);
    let waited = started.elapsed();
    assert!(waited >= Duration::from_secs(3), "gave up after {waited:?}");
    assert!(waited < Duration::from_secs(4), "overran budget: {waited:?}");
}
