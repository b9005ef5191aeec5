#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{Build, Rocket};

use crate::config::{ConfigFairing, StoreFairing};
use crate::logging::LoggerFairing;
use crate::model::store::BallotStore;

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

/// Build the server: configuration and store come from the Rocket figment.
pub fn build() -> Rocket<Build> {
    rocket::build()
        .attach(ConfigFairing)
        .attach(StoreFairing)
        .attach(LoggerFairing)
        .mount("/", api::routes())
}

/// Build a server around an existing store, bypassing configuration.
pub fn rocket_for_store(store: BallotStore) -> Rocket<Build> {
    rocket::build()
        .manage(store)
        .attach(LoggerFairing)
        .mount("/", api::routes())
}
