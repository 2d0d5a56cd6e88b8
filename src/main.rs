//! Vellum CLI entrypoint.
//!
//! Thin drivers over the orchestration core: per-stack configuration and
//! deployment snapshot import/export.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use vellum_stack::cli::{Cli, Commands, ConfigCommands, OutputFormatter, StackCommands};
use vellum_stack::config::{load_stack_config, save_stack_config};
use vellum_stack::error::{DeploymentError, Result, SnapshotError, VellumError};
use vellum_stack::stack::{
    deserialize_untyped, prepare_import, serialize_deployment, Deployment, LocalSnapshotStore,
    SnapshotStore, UntypedDeployment,
};

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let formatter = OutputFormatter::new(cli.output);

    match cli.command {
        Commands::Config { command } => cmd_config(&cli.stack, command, &formatter),
        Commands::Stack { command } => cmd_stack(&cli.stack, command, &formatter).await,
    }
}

/// Directory the per-stack files live in.
fn project_dir() -> Result<PathBuf> {
    std::env::current_dir()
        .map_err(|e| VellumError::internal(format!("Cannot determine current directory: {e}")))
}

/// Handles `vellum config ...`.
fn cmd_config(stack: &str, command: ConfigCommands, formatter: &OutputFormatter) -> Result<()> {
    let dir = project_dir()?;
    let mut config = load_stack_config(&dir, stack)?;

    match command {
        ConfigCommands::Ls => {
            // Enumeration is always in deterministic key order.
            print!("{}", formatter.format_config(&config));
        }
        ConfigCommands::Get { key } => {
            let value = config.get(&key)?;
            println!("{value}");
        }
        ConfigCommands::Set { key, value } => {
            config.set(key.as_str(), value);
            save_stack_config(&dir, &config)?;
            debug!("Set configuration key '{key}' on stack '{stack}'");
        }
        ConfigCommands::Rm { key } => {
            // Removing a missing key is a no-op; the file is saved either
            // way so re-applying the same removal stays idempotent.
            let removed = config.delete(&key);
            save_stack_config(&dir, &config)?;
            if removed {
                debug!("Removed configuration key '{key}' from stack '{stack}'");
            }
        }
    }

    Ok(())
}

/// Handles `vellum stack ...`.
async fn cmd_stack(stack: &str, command: StackCommands, formatter: &OutputFormatter) -> Result<()> {
    let store = LocalSnapshotStore::new()?;

    match command {
        StackCommands::Init { force } => cmd_stack_init(&store, stack, force, formatter).await,
        StackCommands::Import { file, force } => {
            cmd_stack_import(&store, stack, file.as_deref(), force, formatter).await
        }
        StackCommands::Export { file } => cmd_stack_export(&store, stack, file.as_deref()).await,
    }
}

/// Creates an empty deployment snapshot for the stack.
async fn cmd_stack_init(
    store: &LocalSnapshotStore,
    stack: &str,
    force: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    if !force && store.exists(stack).await? {
        eprintln!("A snapshot already exists for stack '{stack}'. Use --force to overwrite.");
        return Ok(());
    }

    let deployment = Deployment::new(Vec::new())?;
    let untyped = serialize_deployment(&deployment)?;
    store.save(stack, &untyped).await?;

    println!("{}", formatter.format_success(&format!("Initialized stack '{stack}'")));
    Ok(())
}

/// Imports a deployment from a file or standard in into the stack.
async fn cmd_stack_import(
    store: &LocalSnapshotStore,
    stack: &str,
    file: Option<&Path>,
    force: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    // Read the raw envelope. Decoding into the raw envelope first means
    // fields written by newer tools are not lost on the round trip.
    let content = match file {
        Some(path) => {
            info!("Importing deployment from: {}", path.display());
            std::fs::read_to_string(path)?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let untyped: UntypedDeployment =
        serde_json::from_str(&content).map_err(|e| DeploymentError::Malformed {
            message: e.to_string(),
        })?;

    // Now decode the payload into a typed deployment so its contents can be
    // checked against the target stack before anything is persisted.
    let deployment = deserialize_untyped(&untyped)?;

    if !deployment.verify_magic() {
        eprintln!(
            "{}",
            formatter.format_warning(
                "deployment manifest digest does not match its resources; the snapshot may have been edited"
            )
        );
    }

    let (deployment, warnings) = prepare_import(deployment, stack, force)?;
    for warning in &warnings {
        eprintln!("{}", formatter.format_warning(warning));
    }

    let untyped = serialize_deployment(&deployment)?;
    store.save(stack, &untyped).await?;

    println!("Import successful.");
    Ok(())
}

/// Exports the stack's deployment to a file or standard out.
async fn cmd_stack_export(
    store: &LocalSnapshotStore,
    stack: &str,
    file: Option<&Path>,
) -> Result<()> {
    let untyped = store
        .load(stack)
        .await?
        .ok_or_else(|| SnapshotError::NotFound {
            stack: stack.to_string(),
        })?;

    let content = serde_json::to_string_pretty(&untyped)
        .map_err(|e| SnapshotError::serialization(e.to_string()))?;

    match file {
        Some(path) => {
            std::fs::write(path, content)?;
            info!("Exported deployment for stack '{stack}' to: {}", path.display());
        }
        None => println!("{content}"),
    }

    Ok(())
}
