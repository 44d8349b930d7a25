//! Subcommand implementations

use anyhow::{bail, Context, Result};
use integrity_telemetry::{component_span, log_digest_event};
use serde::Serialize;
use serde_json::{json, Value};
use sha_infinity::domain::parse_digests;
use sha_infinity::{
    Digest, DocumentVerification, EngineConfig, IntegrityApi, IntegrityService, Sha256Backend, SystemClock,
};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::output;

type Service = IntegrityService<Sha256Backend, SystemClock>;

const COMPONENT: &str = "hash-verify";

/// Run `cli`, writing results to `out`.
///
/// Returns `false` when a verification or proof-of-work search failed;
/// the binary maps that to exit status 1.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<bool> {
    let mut config = EngineConfig::from_env();
    if let Command::Pow {
        max_attempts: Some(max_attempts),
        ..
    } = &cli.command
    {
        config = config.with_pow_max_attempts(*max_attempts);
    }
    let service = IntegrityService::sha256(config).context("invalid engine configuration")?;
    let _span = component_span!("hash_verify", component = COMPONENT, command = cli.command.name()).entered();

    match &cli.command {
        Command::Verify { file } => verify(&service, file, cli.json, out),
        Command::Create { file, depth, write } => create(&service, file, *depth, *write, cli.json, out),
        Command::Chain {
            data,
            depth,
            no_salt,
            no_depth_binding,
        } => chain(&service, data, *depth, *no_salt, *no_depth_binding, cli.json, out),
        Command::Merkle { hashes, depth } => merkle(&service, hashes, *depth, cli.json, out),
        Command::Pow {
            data,
            difficulty,
            depth,
            ..
        } => pow(&service, data, *difficulty, *depth, cli.json, out),
        Command::Link {
            previous,
            data,
            depth,
        } => link(&service, previous, data, *depth, cli.json, out),
    }
}

/// Load a JSON state file
pub fn load_state(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).with_context(|| format!("state file not found: {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn print_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn verify<W: Write>(service: &Service, file: &Path, as_json: bool, out: &mut W) -> Result<bool> {
    let state = load_state(file)?;
    debug!(file = %file.display(), "verifying state file");

    match service.verify_document(&state)? {
        DocumentVerification::Checked { record, report } => {
            log_digest_event!(
                debug,
                COMPONENT,
                "state file checked",
                report.computed_sha256,
                file = %file.display(),
                valid = report.valid
            );
            if as_json {
                print_json(
                    out,
                    &json!({
                        "file": file.display().to_string(),
                        "status": if report.valid { "verified" } else { "failed" },
                        "report": report,
                    }),
                )?;
            } else {
                output::header(out, "SHA-Infinity Hash Verification", file)?;
                output::report(out, &record, &report)?;
            }
            Ok(report.valid)
        }
        DocumentVerification::Unsealed(record) => {
            if as_json {
                print_json(
                    out,
                    &json!({
                        "file": file.display().to_string(),
                        "status": "unsealed",
                        "record": record,
                    }),
                )?;
            } else {
                output::header(out, "SHA-Infinity Hash Verification", file)?;
                output::fresh_record(out, &record)?;
            }
            Ok(true)
        }
    }
}

fn create<W: Write>(
    service: &Service,
    file: &Path,
    depth: Option<u32>,
    write: bool,
    as_json: bool,
    out: &mut W,
) -> Result<bool> {
    let state = load_state(file)?;
    let (sealed, record) = service.seal_document(&state, depth)?;

    if write {
        let text = serde_json::to_string_pretty(&sealed)?;
        fs::write(file, text + "\n").with_context(|| format!("failed to write {}", file.display()))?;
        log_digest_event!(
            info,
            COMPONENT,
            "integrity record embedded",
            record.chained_digest,
            file = %file.display(),
            depth = record.chain_depth
        );
    }

    if as_json {
        print_json(out, &record)?;
    } else {
        output::record_digests(out, &record)?;
        if write {
            writeln!(out, "\nRecord written to {}", file.display())?;
        }
    }
    Ok(true)
}

fn chain<W: Write>(
    service: &Service,
    data: &str,
    depth: Option<u32>,
    no_salt: bool,
    no_depth_binding: bool,
    as_json: bool,
    out: &mut W,
) -> Result<bool> {
    let mut config = service.config().chain_at(depth);
    if no_salt {
        config = config.without_salt();
    }
    if no_depth_binding {
        config = config.with_depth_binding(false);
    }

    let digest = service.chain_hash(data.as_bytes(), &config)?;
    if as_json {
        print_json(out, &json!({"hash": digest, "depth": config.depth}))?;
    } else {
        output::digest(out, &digest)?;
    }
    Ok(true)
}

fn merkle<W: Write>(
    service: &Service,
    hashes: &[String],
    depth: Option<u32>,
    as_json: bool,
    out: &mut W,
) -> Result<bool> {
    let leaves = parse_digests(hashes)?;
    let root = service.merkle_root(&leaves, depth)?;

    if as_json {
        print_json(out, &json!({"root": root, "leaves": leaves.len()}))?;
    } else {
        output::digest(out, &root)?;
    }
    Ok(true)
}

fn pow<W: Write>(
    service: &Service,
    data: &str,
    difficulty: Option<usize>,
    depth: Option<u32>,
    as_json: bool,
    out: &mut W,
) -> Result<bool> {
    let result = service.proof_of_work(data.as_bytes(), difficulty, depth)?;
    let difficulty = difficulty.unwrap_or(sha_infinity::config::DEFAULT_POW_DIFFICULTY);

    if as_json {
        print_json(out, &result)?;
    } else {
        output::proof_of_work(out, &result, difficulty)?;
    }
    Ok(result.verified)
}

fn link<W: Write>(
    service: &Service,
    previous: &str,
    data: &str,
    depth: Option<u32>,
    as_json: bool,
    out: &mut W,
) -> Result<bool> {
    let Ok(previous) = previous.parse::<Digest>() else {
        bail!("previous link is not a 64-character hex digest: {:?}", previous);
    };
    let link = service.chain_link(&previous, data.as_bytes(), depth)?;

    if as_json {
        print_json(out, &link)?;
    } else {
        output::link(out, &link)?;
    }
    Ok(true)
}
