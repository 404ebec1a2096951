// Copyright 2025 the Imperium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared setup for the runnable demos.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Command line shared by every demo.
#[derive(Parser, Debug)]
#[command(about = "Imperium cluster demo")]
pub struct DemoArgs {
    /// Log level, or any `EnvFilter` directive such as `imperium_cluster=trace`
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

/// Install a `tracing` subscriber for a demo.
///
/// `RUST_LOG` wins when set; otherwise `args.log_level` is used.
pub fn init_logging(args: &DemoArgs) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}
