use chrono::Duration;
use mongodb::Client as MongoClient;
use rocket::futures::TryFutureExt;
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::clock::SystemClock;
use crate::model::{
    eligibility::{CredentialBook, CredentialTable},
    mongodb::{
        ensure_election_id_counter_exists, ensure_indexes_exist, Coll, MongoCredentials,
        MongoStore,
    },
    registry::ElectionRegistry,
    store::MemoryStore,
};

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Deserialize)]
pub struct Config {
    // non-secrets
    auth_ttl: u32,
    // secrets
    jwt_secret: String,
}

impl Config {
    pub fn new(auth_ttl: u32, jwt_secret: impl Into<String>) -> Self {
        Self {
            auth_ttl,
            jwt_secret: jwt_secret.into(),
        }
    }

    /// Valid lifetime of auth token cookies in seconds.
    pub fn auth_ttl(&self) -> Duration {
        Duration::seconds(self.auth_ttl.into())
    }

    /// Secret key used to sign JWTs.
    pub fn jwt_secret(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}

/// A fairing that loads the application config and puts it in managed state.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        // Manage the state.
        rocket = rocket.manage(config);
        Ok(rocket)
    }
}

/// Configuration for election storage and eligibility.
#[derive(Deserialize)]
struct StorageConfig {
    // secrets
    db_uri: Option<String>,
    /// Credentials to answer eligibility from when no database is configured.
    #[serde(default)]
    credentials: CredentialTable,
}

/// A fairing that sets up election storage and places an
/// [`ElectionRegistry`] into managed state.
///
/// With a `db_uri`, elections and credentials live in MongoDB. Without one,
/// everything is kept in memory and lost on shutdown.
pub struct StorageFairing;

#[rocket::async_trait]
impl Fairing for StorageFairing {
    fn info(&self) -> Info {
        Info {
            name: "Election storage",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<StorageConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load storage config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        let Some(db_uri) = config.db_uri else {
            warn!("No `db_uri` configured, elections will be kept in memory only");
            let credentials = CredentialBook::from_table(&config.credentials);
            let registry = ElectionRegistry::new(MemoryStore::default(), credentials, SystemClock);
            return Ok(rocket.manage(registry));
        };

        info!("Loaded database config, connecting...");
        // Construct the connection.
        let client = match MongoClient::with_uri_str(db_uri).await {
            Ok(client) => client,
            Err(e) => {
                error!("Failed to connect to database: {e}");
                return Err(rocket);
            }
        };
        let db = client.database(DATABASE_NAME);

        // Ensure the required indexes and the global election ID counter exist.
        let counters = Coll::from_db(&db);
        if let Err(e) = ensure_indexes_exist(&db)
            .err_into()
            .and_then(|_| ensure_election_id_counter_exists(&counters))
            .await
        {
            error!("Failed to connect to database: {e}");
            return Err(rocket);
        }
        info!("...database connection online!");

        let registry = ElectionRegistry::new(
            MongoStore::from_db(&db),
            MongoCredentials::from_db(&db),
            SystemClock,
        );

        // Manage the state.
        Ok(rocket.manage(registry))
    }
}

/// Name of the database holding all collections.
const DATABASE_NAME: &str = "votechain";
