use std::sync::Arc;

use apiserver::orchestration::ClusterCredentials;
use apiserver::util::{FixedClock, SequentialIdGenerator};
use apiserver::{build_manager, ClientManager};
use sea_orm::ConnectionTrait;

use crate::support::{sqlite_config, FakeBuckets, OutageConnector, NAMESPACE};

const NOW: i64 = 1_700_000_000;

async fn ready_manager() -> ClientManager {
    build_manager()
        .with_connector(OutageConnector::healthy())
        .with_bucket_api(FakeBuckets::empty())
        .with_cluster_credentials(ClusterCredentials::new(Some("token".into()), None))
        .with_clock(Arc::new(FixedClock::at_unix_seconds(NOW)))
        .with_id_generator(Arc::new(SequentialIdGenerator::new()))
        .build(&sqlite_config())
        .await
        .expect("bootstrap")
}

#[tokio::test]
async fn stores_share_clock_and_ids() {
    let manager = ready_manager().await;

    let experiment = manager
        .experiment_store()
        .create_experiment("default", "Default experiment")
        .await
        .expect("create experiment");
    assert_eq!(experiment.uuid, "00000000-0000-0000-0000-000000000001");
    assert_eq!(experiment.created_at_in_sec, NOW);

    let pipeline = manager
        .pipeline_store()
        .create_pipeline("iris", "", None)
        .await
        .expect("create pipeline");
    assert_eq!(pipeline.uuid, "00000000-0000-0000-0000-000000000002");

    let found = manager
        .pipeline_store()
        .find_by_name("iris")
        .await
        .expect("find");
    assert_eq!(found, Some(pipeline));

    assert_eq!(manager.clock().now_unix_seconds(), NOW);
    manager.close().await.expect("close");
}

#[tokio::test]
async fn orchestration_clients_target_namespace() {
    let manager = ready_manager().await;

    assert_eq!(manager.workflow().namespace(), NAMESPACE);
    assert!(manager
        .scheduled_workflow()
        .collection_url()
        .ends_with("/namespaces/kubeflow/scheduledworkflows"));
    manager.close().await.expect("close");
}

#[tokio::test]
async fn metrics_follow_their_run() {
    let manager = ready_manager().await;
    let runs = manager.run_store();

    let orphan = runs.report_metric("no-run", "node", "accuracy", 0.9, "PERCENTAGE").await;
    assert!(orphan.is_err(), "metric without run was stored");

    manager
        .db()
        .execute_unprepared("INSERT INTO run_details (\"UUID\") VALUES ('run-1')")
        .await
        .expect("seed run");
    runs.report_metric("run-1", "node", "accuracy", 0.9, "PERCENTAGE")
        .await
        .expect("metric");

    let archived = runs.archive_run("run-1").await.expect("archive").expect("run");
    assert_eq!(archived.finished_at_in_sec, NOW);
    assert_eq!(runs.list_metrics("run-1").await.expect("list").len(), 1);

    manager
        .db()
        .execute_unprepared("DELETE FROM run_details WHERE \"UUID\" = 'run-1'")
        .await
        .expect("delete run");
    assert!(runs.list_metrics("run-1").await.expect("list").is_empty());

    assert!(manager
        .resource_reference_store()
        .references_of("run-1", "Run")
        .await
        .expect("refs")
        .is_empty());
    manager.close().await.expect("close");
}
