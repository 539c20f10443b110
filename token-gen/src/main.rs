use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result, bail};
use bearer_gate::services::auth::TokenSigner;
use clap::Parser;
use serde_json::{Map, Value};

/// Mint an RS256 bearer token accepted by the gate.
///
/// - `iat` and `exp` (= iat + ttl) are always set
/// - Extra claims come from repeated `--claim key=value`; values that parse as
///   JSON are kept as JSON, anything else becomes a string
#[derive(Parser, Debug)]
#[command(name = "token-gen", version, about)]
struct Args {
    /// Path to the RSA private key in PEM (PKCS#1 or PKCS#8)
    #[arg(long, value_name = "FILE")]
    key: PathBuf,

    /// Issuer claim (iss)
    #[arg(long)]
    iss: Option<String>,

    /// Subject claim (sub); becomes x-api-client-id downstream
    #[arg(long)]
    sub: String,

    /// Token lifetime in seconds
    #[arg(long, default_value_t = 3600)]
    ttl_secs: u64,

    /// Additional claim, repeatable
    #[arg(long = "claim", value_name = "KEY=VALUE", value_parser = parse_claim)]
    claims: Vec<(String, Value)>,
}

fn parse_claim(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {raw:?}"))?;
    if key.is_empty() {
        return Err(format!("empty claim name in {raw:?}"));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn build_claims(args: &Args) -> Result<Map<String, Value>> {
    let mut claims = Map::new();
    for (key, value) in &args.claims {
        if matches!(key.as_str(), "iss" | "sub" | "iat" | "exp") {
            bail!("claim {key:?} is set by its own flag or by the signer");
        }
        claims.insert(key.clone(), value.clone());
    }

    if let Some(iss) = &args.iss {
        claims.insert("iss".to_string(), Value::String(iss.clone()));
    }
    claims.insert("sub".to_string(), Value::String(args.sub.clone()));
    Ok(claims)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let pem = fs::read_to_string(&args.key)
        .with_context(|| format!("reading private key {}", args.key.display()))?;
    let signer = TokenSigner::new(&pem)?;

    let claims = build_claims(&args)?;
    let token = signer.sign(&claims, Duration::from_secs(args.ttl_secs))?;

    println!("{token}");
    Ok(())
}
