//! Throwaway MongoDB databases for tests.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use mongodb::{Client, Database};

/// Connection string of the MongoDB server to run database tests against.
/// Database tests are skipped when it is unset.
pub const TEST_DB_URI_VAR: &str = "VOTECHAIN_TEST_DB_URI";

static NEXT_DB: AtomicUsize = AtomicUsize::new(0);

/// Run `test` against a fresh, empty database and drop it afterwards.
pub async fn with_test_db<F, Fut>(test: F)
where
    F: FnOnce(Database) -> Fut,
    Fut: Future<Output = ()>,
{
    log4rs_test_utils::test_logging::init_logging_once_for(["votechain_backend"], None, None);

    let Ok(uri) = std::env::var(TEST_DB_URI_VAR) else {
        warn!("{TEST_DB_URI_VAR} is not set, skipping database test");
        return;
    };
    let client = Client::with_uri_str(uri).await.unwrap();
    let name = format!(
        "votechain_test_{}_{}",
        std::process::id(),
        NEXT_DB.fetch_add(1, Ordering::Relaxed)
    );
    let db = client.database(&name);

    test(db.clone()).await;

    db.drop(None).await.unwrap();
}
