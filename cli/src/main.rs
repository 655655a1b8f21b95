use adpolicy_sdk_core::{adtime, crypto};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "adpolicy", about = "AD password policy and legacy hash toolbox", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the legacy LM and NT verifier hashes of a password
    Hash {
        password: String,

        /// Emit a JSON object instead of plain lines
        #[arg(long)]
        json: bool,

        /// Print upper-case hex
        #[arg(long)]
        upper: bool,
    },
    /// Convert between AD interval time and Unix epoch milliseconds
    Time {
        #[command(subcommand)]
        direction: TimeCommand,
    },
}

#[derive(Subcommand)]
enum TimeCommand {
    /// AD 100ns-tick value to epoch milliseconds
    ToEpoch { ad_value: i64 },
    /// Epoch milliseconds to AD 100ns-tick value
    ToAd { epoch_millis: i64 },
}

fn main() -> Result<()> {
    match Cli::parse().command {
        Command::Hash {
            password,
            json,
            upper,
        } => hash(&password, json, upper),
        Command::Time { direction } => {
            match direction {
                TimeCommand::ToEpoch { ad_value } => {
                    println!("{}", adtime::to_epoch_millis(ad_value));
                }
                TimeCommand::ToAd { epoch_millis } => {
                    println!("{}", adtime::to_ad_value(epoch_millis));
                }
            }
            Ok(())
        }
    }
}

fn hash(password: &str, json: bool, upper: bool) -> Result<()> {
    let nt = if upper {
        crypto::nt_hash_hex_upper(password)
    } else {
        crypto::nt_hash_hex_lower(password)
    }
    .context("NT hash computation failed")?;

    // Non-ASCII passwords have no LM form; report the NT hash alone
    let lm = if upper {
        crypto::lm_hash_hex_upper(password)
    } else {
        crypto::lm_hash_hex_lower(password)
    }
    .ok();

    if json {
        let out = serde_json::json!({ "lm": lm, "nt": nt });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        match lm {
            Some(lm) => println!("lm: {lm}"),
            None => eprintln!("lm: not computable (password is not ASCII)"),
        }
        println!("nt: {nt}");
    }
    Ok(())
}
