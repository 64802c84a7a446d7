//! h5pack - build and packaging driver for the HDF5 libraries
//!
//! Downloads an upstream HDF5 release, drives its autotools build into a
//! staging prefix, and assembles a relocatable package layout.

mod cli;
mod error;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use clap::Parser;
use h5pack_builder::{BuildContext, Builder};
use h5pack_config::Config;
use h5pack_net::NetClient;
use h5pack_types::{Os, PackageInfo, Recipe, Settings};
use std::process;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    // Initialize tracing with JSON awareness
    init_tracing(json_mode, cli.global.debug);

    // Run the application and handle errors
    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        if !json_mode {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting h5pack v{}", env!("CARGO_PKG_VERSION"));
    let json_mode = cli.global.json;

    // Load configuration with proper precedence:
    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;

    // 2. Merge environment variables
    config.merge_env().map_err(|e| match e {
        h5pack_errors::Error::Config(c) => CliError::Config(c),
        other => CliError::Build(other),
    })?;

    match cli.command {
        Commands::Build {
            version,
            options,
            build_type,
            os,
            arch,
            jobs,
            work_dir,
            output,
            url_template,
            sha256,
        } => {
            // 3. Apply CLI flags (highest precedence)
            if let Some(jobs) = jobs {
                config.build.jobs = jobs;
            }
            if let Some(dir) = work_dir {
                config.paths.work_path = Some(dir);
            }
            if let Some(dir) = output {
                config.paths.package_path = Some(dir);
            }
            if let Some(template) = url_template {
                config.source.url_template = template;
            }
            if let Some(hash) = sha256 {
                config.source.sha256 = Some(hash);
            }

            let version = h5pack_types::version::parse_loose(&version)
                .map_err(h5pack_errors::Error::from)?;
            let mut settings = Settings::host().with_build_type(build_type);
            if let Some(os) = os {
                settings.os = os;
            }
            if let Some(arch) = arch {
                settings.arch = arch;
            }
            let recipe = Recipe::hdf5(version, options.to_options(), settings);

            let net = NetClient::new((&config.network).into())?;
            let ctx = BuildContext::new(recipe, config);
            let package_info = Builder::new(net).build(&ctx).await?;

            render_package_info(&package_info, json_mode)?;
        }
        Commands::Info { options } => {
            let options = options.to_options();
            options.validate()?;
            let package_info = PackageInfo::new(options, Os::current());
            render_package_info(&package_info, json_mode)?;
        }
    }

    info!("Command completed successfully");
    Ok(())
}

/// Print the exported package metadata
fn render_package_info(info: &PackageInfo, json: bool) -> Result<(), CliError> {
    if json {
        let rendered = serde_json::to_string_pretty(info).map_err(std::io::Error::other)?;
        println!("{rendered}");
    } else {
        println!("libs: {}", info.libs.join(", "));
        if info.defines.is_empty() {
            println!("defines: (none)");
        } else {
            println!("defines: {}", info.defines.join(", "));
        }
    }
    Ok(())
}

/// Initialize the tracing subscriber
fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug_enabled_flag {
            tracing_subscriber::EnvFilter::new("info,h5pack=debug,h5pack_builder=debug")
        } else {
            tracing_subscriber::EnvFilter::new("warn")
        }
    });

    if json_mode && !debug_enabled {
        // JSON mode: suppress console logging to avoid contaminating output
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else if json_mode {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    }
}
