#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{Build, Rocket};

use config::{ConfigFairing, StorageFairing};
use logging::LoggerFairing;
use model::registry::ElectionRegistry;

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

pub use config::Config;

/// Build the server from `Rocket.toml` and `ROCKET_*` environment variables.
pub fn build() -> Rocket<Build> {
    mount(rocket::build()).attach(StorageFairing)
}

/// Build a server around an already constructed registry.
pub fn rocket_for_registry(rocket: Rocket<Build>, registry: ElectionRegistry) -> Rocket<Build> {
    mount(rocket).manage(registry)
}

fn mount(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .mount("/", api::routes())
        .attach(ConfigFairing)
        .attach(LoggerFairing)
}

/// A server for tests: fixed secrets and Rocket's own logging silenced.
#[cfg(test)]
pub(crate) fn test_rocket(registry: ElectionRegistry) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("jwt_secret", "test secret"))
        .merge(("auth_ttl", 3600))
        .merge(("log_level", "off"));
    rocket_for_registry(rocket::custom(figment), registry)
}
