// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "TALLYBOOK_LOG";

fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs a stderr subscriber.
///
/// `TALLYBOOK_LOG` wins over `RUST_LOG`; without either, `-v` flags raise the
/// level from `tallybook=warn`. Calling twice is harmless.
pub fn init(verbosity: u8) -> anyhow::Result<()> {
    let default_filter = format!("tallybook={}", level_for(verbosity));
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .try_init();
    if installed.is_ok() {
        tracing::debug!(filter = %default_filter, "logging initialized");
    }
    Ok(())
}
