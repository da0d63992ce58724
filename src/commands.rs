//! Command execution for the sumvalve CLI.
//!
//! Each subcommand follows the same read-mutate-write flow around the
//! checksums file: load (absent file means an empty store), apply the
//! operation, save. `pipe` instead wires the checksum engine into a
//! [`CacheCopier`] guarding stdin→stdout.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::cli::{AddArgs, Cli, Commands, InitArgs, ListArgs, PipeArgs, RemoveArgs, ValidateArgs};
use crate::error::ExitCode;
use crate::hashing::ChecksumEngine;
use crate::logging;
use crate::names;
use crate::sums::{KnownSums, StoreError};
use crate::transfer::{CacheCopier, CopyError, FileCache};

/// Run the parsed CLI to completion and report the exit code.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Init(args) => init(&args),
        Commands::Add(args) => add(&args),
        Commands::Remove(args) => remove(&args),
        Commands::List(args) => list(&args),
        Commands::Validate(args) => validate(&args),
        Commands::Pipe(args) => pipe(&args),
    }
}

fn init(args: &InitArgs) -> Result<ExitCode> {
    let exists = args
        .checksums
        .try_exists()
        .with_context(|| format!("failed to check {}", args.checksums.display()))?;
    if exists {
        bail!("{} already exists", args.checksums.display());
    }
    KnownSums::new(ChecksumEngine::with_default_algorithms()).save(&args.checksums)?;
    log::info!("created {}", args.checksums.display());
    Ok(ExitCode::Success)
}

fn add(args: &AddArgs) -> Result<ExitCode> {
    let store = KnownSums::load(&args.checksums, ChecksumEngine::with_default_algorithms())?;
    let algorithm = names::normalize(&args.algorithm);
    let name = record_name(args.name.as_deref(), &args.file)?;

    let mut file = fs::File::open(&args.file)
        .with_context(|| format!("failed to open {}", args.file.display()))?;
    let checksum = store.engine().checksum_reader(&algorithm, &mut file)?;
    log::debug!("{algorithm} checksum of {name} is {}", hex::encode(&checksum));

    store.add_precalculated(&name, &algorithm, checksum)?;
    store.save(&args.checksums)?;
    log::info!("recorded the {algorithm} checksum of {name}");
    Ok(ExitCode::Success)
}

fn remove(args: &RemoveArgs) -> Result<ExitCode> {
    let store = KnownSums::load(&args.checksums, ChecksumEngine::with_default_algorithms())?;
    let algorithm = args.algorithm.as_deref().map(names::normalize);
    let removed = store.remove(&args.name, algorithm.as_deref());
    store.save(&args.checksums)?;
    log::info!("removed {removed} checksum(s) named {}", args.name);
    Ok(ExitCode::Success)
}

fn list(args: &ListArgs) -> Result<ExitCode> {
    let store = KnownSums::load(&args.checksums, ChecksumEngine::with_default_algorithms())?;
    for sum in store.records() {
        println!("{}  {}  {}", sum.name, sum.algorithm, hex::encode(&sum.checksum));
    }
    Ok(ExitCode::Success)
}

fn validate(args: &ValidateArgs) -> Result<ExitCode> {
    let store = KnownSums::load(&args.checksums, ChecksumEngine::with_default_algorithms())?;
    let algorithm = args.algorithm.as_deref().map(names::normalize);
    let name = record_name(args.name.as_deref(), &args.file)?;

    let matching = store.matching(&name, algorithm.as_deref());
    if matching.is_empty() {
        return Err(StoreError::NoMatchingSums { name }.into());
    }

    let data =
        fs::read(&args.file).with_context(|| format!("failed to read {}", args.file.display()))?;
    if store.validate(&name, algorithm.as_deref(), &data)? {
        log::info!("{} matches the recorded checksums for {name}", args.file.display());
        return Ok(ExitCode::Success);
    }

    // A mismatch is an expected outcome: report which digests were
    // attempted and keep the dedicated exit status.
    for sum in &matching {
        match store.engine().checksum(&sum.algorithm, &data) {
            Ok(got) if got == sum.checksum => {}
            Ok(got) => eprintln!(
                "{}: {} checksum {} did not match the recorded {}",
                args.file.display(),
                sum.algorithm,
                hex::encode(&got),
                hex::encode(&sum.checksum),
            ),
            Err(err) => eprintln!(
                "{}: could not compute the {} checksum: {err}",
                args.file.display(),
                sum.algorithm,
            ),
        }
    }
    Ok(ExitCode::ChecksumMismatch)
}

fn pipe(args: &PipeArgs) -> Result<ExitCode> {
    let expected = hex::decode(&args.checksum).context("checksum must be a hex value")?;
    let algorithm = names::normalize(&args.algorithm);
    let engine = ChecksumEngine::with_default_algorithms();

    let stdin = io::stdin();
    if stdin.is_terminal() {
        bail!("nothing piped to stdin");
    }

    let mut copier = CacheCopier::new().with_validator(|reader: &mut dyn Read| {
        match engine.checksum_reader(&algorithm, reader) {
            Ok(sum) if sum == expected => (true, None),
            Ok(sum) => (
                false,
                Some(format!(
                    "the {algorithm} checksum {} did not match the expected {}",
                    hex::encode(&sum),
                    hex::encode(&expected),
                )),
            ),
            Err(err) => (
                false,
                Some(format!("failed to compute the {algorithm} checksum: {err}")),
            ),
        }
    });
    if args.file_cache {
        copier = copier.with_cache(Box::new(
            FileCache::new().context("failed to create the file cache")?,
        ));
    }

    let mut stdout = io::stdout().lock();
    match copier.copy(&mut stdout, &mut stdin.lock()) {
        Ok(written) => {
            log::debug!("forwarded {written} bytes to stdout");
            Ok(ExitCode::Success)
        }
        Err(CopyError::ValidationFailed { message }) => {
            eprintln!(
                "{}",
                message.unwrap_or_else(|| format!(
                    "input did not match the {algorithm} checksum {}",
                    hex::encode(&expected),
                )),
            );
            Ok(ExitCode::ChecksumMismatch)
        }
        Err(err) => Err(err.into()),
    }
}

fn record_name(name: Option<&str>, file: &Path) -> Result<String> {
    match name {
        Some(name) => Ok(name.to_string()),
        None => file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .with_context(|| format!("{} has no file name", file.display())),
    }
}
