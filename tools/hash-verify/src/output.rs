//! Text rendering for terminal output

use sha_infinity::{ChainLink, Digest, IntegrityRecord, ProofOfWorkResult, VerificationReport};
use std::io::{self, Write};
use std::path::Path;

const RULE_WIDTH: usize = 60;
const PREVIEW_LEN: usize = 32;

fn rule<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

fn preview(hex: &str) -> String {
    if hex.len() > PREVIEW_LEN {
        format!("{}...", &hex[..PREVIEW_LEN])
    } else {
        hex.to_string()
    }
}

fn status(valid: bool) -> &'static str {
    if valid {
        "VALID"
    } else {
        "INVALID"
    }
}

pub fn header<W: Write>(out: &mut W, title: &str, path: &Path) -> io::Result<()> {
    rule(out)?;
    writeln!(out, "  {}", title)?;
    writeln!(out, "  {}", path.display())?;
    rule(out)
}

pub fn report<W: Write>(out: &mut W, record: &IntegrityRecord, report: &VerificationReport) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "SHA-256:")?;
    writeln!(out, "  Expected: {}", preview(&record.plain_digest.to_hex()))?;
    writeln!(out, "  Computed: {}", preview(&report.computed_sha256.to_hex()))?;
    writeln!(out, "  Status:   {}", status(report.sha256_valid))?;

    writeln!(out)?;
    writeln!(out, "SHA-Infinity (depth: {}):", record.chain_depth)?;
    writeln!(out, "  Expected: {}", preview(&record.chained_digest.to_hex()))?;
    match &report.computed_sha_infinity {
        Some(digest) => writeln!(out, "  Computed: {}", preview(&digest.to_hex()))?,
        None => writeln!(out, "  Computed: (not computed)")?,
    }
    writeln!(out, "  Status:   {}", status(report.sha_infinity_valid))?;

    writeln!(out)?;
    writeln!(out, "Recorded: {}", record.created_at.to_rfc3339())?;
    if let Some(reason) = &report.reason {
        writeln!(out, "Reason:   {}", reason)?;
    }

    writeln!(out)?;
    rule(out)?;
    if report.valid {
        writeln!(out, "  INTEGRITY VERIFIED")?;
        writeln!(out, "  State is authentic and unmodified")?;
    } else {
        writeln!(out, "  INTEGRITY CHECK FAILED")?;
        writeln!(out, "  State may have been modified or corrupted")?;
    }
    rule(out)
}

pub fn fresh_record<W: Write>(out: &mut W, record: &IntegrityRecord) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "No integrity record found in state; computed fresh hashes.")?;
    record_digests(out, record)?;
    writeln!(out)?;
    rule(out)?;
    writeln!(out, "  No existing integrity to verify against")?;
    rule(out)
}

pub fn record_digests<W: Write>(out: &mut W, record: &IntegrityRecord) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "[SHA-256]")?;
    writeln!(out, "  Hash: {}", record.plain_digest)?;
    writeln!(out)?;
    writeln!(out, "[SHA-Infinity] (depth: {})", record.chain_depth)?;
    writeln!(out, "  Hash: {}", record.chained_digest)
}

pub fn digest<W: Write>(out: &mut W, digest: &Digest) -> io::Result<()> {
    writeln!(out, "{}", digest)
}

pub fn proof_of_work<W: Write>(out: &mut W, result: &ProofOfWorkResult, difficulty: usize) -> io::Result<()> {
    if result.verified {
        writeln!(out, "Found nonce {} after {} attempts", result.nonce, result.attempts)?;
    } else {
        writeln!(
            out,
            "No nonce with difficulty {} within {} attempts",
            difficulty, result.attempts
        )?;
    }
    writeln!(out, "  Hash: {}", result.hash)
}

pub fn link<W: Write>(out: &mut W, link: &ChainLink) -> io::Result<()> {
    writeln!(out, "{}", link.hash)?;
    writeln!(out, "  Previous:  {}", link.previous)?;
    writeln!(out, "  Timestamp: {}", sha_infinity::domain::link_timestamp(&link.timestamp))
}
