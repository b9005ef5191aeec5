use log::{error, info, LevelFilter};
use thiserror::Error;

/// Failures that stop the server from starting or keep it from running.
#[derive(Debug, Error)]
enum Error {
    #[error("Server failed: {0}")]
    Rocket(#[from] rocket::Error),
}

async fn serve() -> Result<(), Error> {
    let server = urna_backend::build().ignite().await?;
    info!("Catalog and ballot store ready");
    // From here on our own fairing reports requests; Rocket's chatter is noise.
    log4rs_dynamic_filters::DynamicLevelFilter::set("rocket", LevelFilter::Off);
    let _ = server.launch().await?;
    Ok(())
}

#[rocket::main]
async fn main() {
    if let Err(err) = log4rs::init_file("log4rs.yaml", log4rs_dynamic_filters::default_deserializers()) {
        eprintln!("Cannot read log4rs.yaml: {err}");
        std::process::exit(1)
    }

    if let Err(err) = serve().await {
        error!("{err}");
        std::process::exit(1)
    }
}
