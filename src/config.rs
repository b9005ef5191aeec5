use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::{rngs::StdRng, SeedableRng};
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::model::{
    catalog::{Catalog, CatalogError},
    store::BallotStore,
};

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    seed_votes: u32,
    #[serde(default)]
    catalog_path: Option<PathBuf>,
}

impl Config {
    /// Number of random historical votes to record at startup.
    /// Configured via `SEED_VOTES`.
    pub fn seed_votes(&self) -> u32 {
        self.seed_votes
    }

    /// JSON candidate roster; the built-in roster is used when unset.
    /// Configured via `CATALOG_PATH`.
    pub fn catalog_path(&self) -> Option<&Path> {
        self.catalog_path.as_deref()
    }

    /// Load the configured catalog.
    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        match self.catalog_path() {
            Some(path) => Catalog::from_json_file(path),
            None => Ok(Catalog::builtin()),
        }
    }
}

/// A fairing that loads the application config and puts it in managed state.
/// This could easily be achieved using `AdHoc::config`, but is written out
/// explicitly for symmetry with [`StoreFairing`] and control over error messages.
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
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        rocket = rocket.manage(config);
        Ok(rocket)
    }
}

/// A fairing that loads the candidate catalog, builds the ballot store,
/// seeds it if configured to, and places the store into managed state.
/// Must be attached after [`ConfigFairing`].
pub struct StoreFairing;

#[rocket::async_trait]
impl Fairing for StoreFairing {
    fn info(&self) -> Info {
        Info {
            name: "Ballot store",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        let config = match rocket.state::<Config>() {
            Some(config) => config.clone(),
            None => {
                error!("Application config missing, is the config fairing attached?");
                return Err(rocket);
            }
        };

        let catalog = match config.load_catalog() {
            Ok(catalog) => catalog,
            Err(e) => {
                error!("Failed to load candidate catalog: {e}");
                return Err(rocket);
            }
        };
        info!("Loaded catalog of {} candidates", catalog.len());

        let store = BallotStore::new(Arc::new(catalog));
        if config.seed_votes() > 0 {
            let mut rng = StdRng::from_entropy();
            store.seed(config.seed_votes(), &mut rng).await;
        }

        rocket = rocket.manage(store);
        Ok(rocket)
    }
}
