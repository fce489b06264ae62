use std::fs;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::Env;
use crate::config::LogConfig;

/// Install the global tracing subscriber for the given profile.
///
/// `local` logs human-readable lines to stdout at debug level. `prod` appends
/// JSON lines to `log.file` at info level. `RUST_LOG` overrides either filter.
pub fn init(env: Env, log: &LogConfig) -> anyhow::Result<()> {
    match env {
        Env::Local => tracing_subscriber::registry()
            .with(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "sso=debug,auth=debug,sqlx=warn".into()),
            )
            .with(tracing_subscriber::fmt::layer())
            .try_init()?,
        Env::Prod => {
            let path = Path::new(&log.file);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;

            tracing_subscriber::registry()
                .with(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| "sso=info,auth=info,sqlx=warn".into()),
                )
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(Mutex::new(file)),
                )
                .try_init()?
        }
    }

    Ok(())
}
