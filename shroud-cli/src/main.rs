//! Shroud CLI
//!
//! Command-line interface for ERC-5564 stealth announcements and the
//! ERC-6538 stealth meta-address registry.

use alloy::primitives::{Address, Bytes};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shroud_announcer::{AnnounceParams, AnnouncerClient};
use shroud_core::types::{parse_stealth_address, SchemeId, StealthMetaAddress, TransactionReceipt, ViewTag};
use shroud_core::ChainConfig;
use shroud_registry::{RegisterKeysParams, RegistryClient, StealthMetaAddressQuery};
use shroud_rpc::config::env_vars;
use shroud_rpc::{connect, RpcConfig, RpcReader, RpcWriter};

/// Shroud - stealth address announcements and meta-address registry
#[derive(Parser)]
#[command(name = "shroud")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    chain: ChainArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ChainArgs {
    /// Ethereum RPC URL
    #[arg(long, global = true, env = "SHROUD_RPC_URL")]
    rpc_url: Option<String>,

    /// Private key of the signing account (hex)
    #[arg(long, global = true, env = "SHROUD_PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    /// Announcer contract address
    #[arg(long, global = true, env = "SHROUD_ANNOUNCER_ADDRESS")]
    announcer: Option<String>,

    /// Registry contract address
    #[arg(long, global = true, env = "SHROUD_REGISTRY_ADDRESS")]
    registry: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register your stealth meta-address in the registry
    Register {
        /// Meta-address (hex or st:<chain>:0x...)
        meta_address: StealthMetaAddress,
        /// Scheme id
        #[arg(long, default_value_t = 1)]
        scheme_id: u64,
    },

    /// Look up a receiver's stealth meta-address
    Resolve {
        /// Receiver address
        receiver: Address,
        /// Scheme id
        #[arg(long, default_value_t = 1)]
        scheme_id: u64,
    },

    /// Announce a payment to a stealth address
    Announce {
        /// Stealth address that was paid
        #[arg(long, value_parser = parse_address)]
        stealth_address: Address,
        /// Ephemeral public key (hex)
        #[arg(long)]
        ephemeral_key: Bytes,
        /// View tag (0-255)
        #[arg(long, value_parser = parse_view_tag)]
        view_tag: ViewTag,
        /// Scheme id
        #[arg(long, default_value_t = 1)]
        scheme_id: u64,
    },

    /// List recent announcements as JSON
    Announcements {
        /// First block (defaults to 100,000 blocks before the head)
        #[arg(long, requires = "to_block")]
        from_block: Option<u64>,
        /// Last block
        #[arg(long, requires = "from_block")]
        to_block: Option<u64>,
    },
}

fn parse_address(s: &str) -> std::result::Result<Address, String> {
    parse_stealth_address(s).map_err(|e| e.to_string())
}

fn parse_view_tag(s: &str) -> std::result::Result<ViewTag, String> {
    let value: u64 = s.parse().map_err(|e| format!("{e}"))?;
    ViewTag::try_from(value).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing, so clap's env fallbacks see .env values.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "shroud=debug,info"
    } else {
        "shroud=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let chain = connect_chain(&cli.chain)?;

    match cli.command {
        Commands::Register { meta_address, scheme_id } => cmd_register(chain, meta_address, scheme_id).await,
        Commands::Resolve { receiver, scheme_id } => cmd_resolve(chain, receiver, scheme_id).await,
        Commands::Announce {
            stealth_address,
            ephemeral_key,
            view_tag,
            scheme_id,
        } => cmd_announce(chain, stealth_address, ephemeral_key, view_tag, scheme_id).await,
        Commands::Announcements { from_block, to_block } => {
            cmd_announcements(chain, from_block.zip(to_block)).await
        }
    }
}

/// Builds the chain configuration from flags, env, and `.env`.
fn connect_chain(args: &ChainArgs) -> Result<ChainConfig<RpcReader, RpcWriter>> {
    let config = RpcConfig::from_lookup(|name| match name {
        env_vars::SHROUD_RPC_URL => args.rpc_url.clone(),
        env_vars::SHROUD_PRIVATE_KEY => args.private_key.clone(),
        env_vars::SHROUD_ANNOUNCER_ADDRESS => args.announcer.clone(),
        env_vars::SHROUD_REGISTRY_ADDRESS => args.registry.clone(),
        other => std::env::var(other).ok(),
    })
    .context("Invalid configuration")?;

    connect(&config).context("Failed to set up chain client")
}

fn print_receipt(receipt: &TransactionReceipt) -> Result<()> {
    if receipt.is_success() {
        println!("{} {}", "✅ Confirmed:".green().bold(), receipt.transaction_hash);
    } else {
        println!("{} {}", "❌ Reverted:".red().bold(), receipt.transaction_hash);
    }
    if let Some(block) = receipt.block_number {
        println!("   {} {}", "Block:".dimmed(), block);
    }
    println!("   {} {}", "Gas used:".dimmed(), receipt.gas_used);
    println!("{}", serde_json::to_string_pretty(receipt)?);
    Ok(())
}

/// Register a meta-address
async fn cmd_register(
    chain: ChainConfig<RpcReader, RpcWriter>,
    meta_address: StealthMetaAddress,
    scheme_id: u64,
) -> Result<()> {
    println!("{} {}", "📝 Registering:".cyan().bold(), meta_address);

    let receipt = RegistryClient::new(chain)
        .register_keys(RegisterKeysParams {
            scheme_id: SchemeId(scheme_id),
            stealth_meta_address: meta_address,
        })
        .await
        .context("Failed to register keys")?;

    print_receipt(&receipt)
}

/// Resolve a receiver's meta-address
async fn cmd_resolve(chain: ChainConfig<RpcReader, RpcWriter>, receiver: Address, scheme_id: u64) -> Result<()> {
    println!("{} {}", "🔍 Resolving:".cyan().bold(), receiver);

    let meta = RegistryClient::new(chain)
        .get_stealth_meta_address_of(StealthMetaAddressQuery {
            scheme_id: SchemeId(scheme_id),
            receiver,
        })
        .await
        .context("Failed to read registry")?;

    match meta {
        Some(meta) => {
            println!("\n{}", "✅ Registered meta-address:".green().bold());
            println!("   {}", meta.to_hex());
            println!("   {} {}", "URI:".dimmed(), meta.to_uri("eth"));
        }
        None => println!("\n{}", "No meta-address registered for this scheme.".yellow()),
    }

    Ok(())
}

/// Publish an announcement
async fn cmd_announce(
    chain: ChainConfig<RpcReader, RpcWriter>,
    stealth_address: Address,
    ephemeral_key: Bytes,
    view_tag: ViewTag,
    scheme_id: u64,
) -> Result<()> {
    println!("{} {}", "📣 Announcing:".cyan().bold(), stealth_address);
    println!("   {} {}", "View tag:".dimmed(), view_tag);

    let receipt = AnnouncerClient::new(chain)
        .announce_stealth_address(AnnounceParams {
            scheme_id: SchemeId(scheme_id),
            stealth_address,
            ephemeral_public_key: ephemeral_key,
            view_tag,
        })
        .await
        .context("Failed to announce")?;

    print_receipt(&receipt)
}

/// Print announcements as JSON
async fn cmd_announcements(chain: ChainConfig<RpcReader, RpcWriter>, range: Option<(u64, u64)>) -> Result<()> {
    let announcer = AnnouncerClient::new(chain);

    let announcements = match range {
        Some((from_block, to_block)) => announcer.retrieve_announcements_between(from_block, to_block).await,
        None => announcer.retrieve_announcements().await,
    }
    .context("Failed to retrieve announcements")?;

    eprintln!("{} {}", "📋 Announcements:".cyan().bold(), announcements.len());
    println!("{}", serde_json::to_string_pretty(&announcements)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_view_tag() {
        assert_eq!(parse_view_tag("255").unwrap(), ViewTag(0xff));
        assert_eq!(parse_view_tag("0").unwrap(), ViewTag(0));
        assert!(parse_view_tag("256").is_err());
        assert!(parse_view_tag("-1").is_err());
    }

    #[test]
    fn test_parse_announce() {
        let cli = Cli::try_parse_from([
            "shroud",
            "announce",
            "--stealth-address",
            "0x00000000000000000000000000000000000000aa",
            "--ephemeral-key",
            "0x02aabb",
            "--view-tag",
            "7",
        ])
        .unwrap();

        match cli.command {
            Commands::Announce {
                stealth_address,
                ephemeral_key,
                view_tag,
                scheme_id,
            } => {
                assert_eq!(stealth_address, Address::with_last_byte(0xaa));
                assert_eq!(ephemeral_key.to_vec(), vec![0x02, 0xaa, 0xbb]);
                assert_eq!(view_tag, ViewTag(7));
                assert_eq!(scheme_id, 1);
            }
            _ => panic!("expected announce"),
        }
    }

    #[test]
    fn test_announcements_range_requires_both_bounds() {
        assert!(Cli::try_parse_from(["shroud", "announcements", "--from-block", "10"]).is_err());
        assert!(Cli::try_parse_from(["shroud", "announcements", "--from-block", "10", "--to-block", "20"]).is_ok());
    }

    #[test]
    fn test_register_accepts_uri() {
        let cli = Cli::try_parse_from(["shroud", "register", "st:eth:0x02aabb"]).unwrap();
        match cli.command {
            Commands::Register { meta_address, .. } => assert_eq!(meta_address.as_bytes(), &[0x02, 0xaa, 0xbb]),
            _ => panic!("expected register"),
        }
    }
}
