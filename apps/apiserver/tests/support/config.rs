use apiserver::config::keys;
use apiserver::MapConfig;

pub const BUCKET: &str = "mlpipeline";
pub const NAMESPACE: &str = "kubeflow";

/// Complete configuration for an in-memory SQLite deployment.
pub fn sqlite_config() -> MapConfig {
    MapConfig::new()
        .with(keys::DB_DRIVER_NAME, "sqlite")
        .with(keys::DB_SQLITE_PATH, ":memory:")
        .with(keys::INIT_CONNECTION_TIMEOUT, "10s")
        .with(keys::MINIO_SERVICE_HOST, "minio-service")
        .with(keys::MINIO_SERVICE_PORT, "9000")
        .with(keys::OBJECT_STORE_ACCESS_KEY, "minio")
        .with(keys::OBJECT_STORE_SECRET_KEY, "minio123")
        .with(keys::OBJECT_STORE_BUCKET, BUCKET)
        .with(keys::POD_NAMESPACE, NAMESPACE)
        .with(keys::KUBERNETES_SERVICE_HOST, "10.96.0.1")
        .with(keys::KUBERNETES_SERVICE_PORT, "443")
        .with(keys::SERVICE_ACCOUNT_DIR, "/nonexistent/serviceaccount")
}

/// Same deployment against a MySQL server.
pub fn mysql_config() -> MapConfig {
    let mut config = sqlite_config();
    config.remove(keys::DB_SQLITE_PATH);
    config
        .with(keys::DB_DRIVER_NAME, "mysql")
        .with(keys::MYSQL_SERVICE_HOST, "mysql")
        .with(keys::MYSQL_SERVICE_PORT, "3306")
}
