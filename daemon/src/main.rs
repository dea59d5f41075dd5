//! Covenant command line: replays block files against an in-memory chain.

use anyhow::{bail, Context};
use clap::Parser;
use covenant_chain::{Block, Chain, ChainConfig, ChainMetrics};
use covenant_crypto::{derive_role_keypair, generate_keypair, keypair_from_private};
use covenant_nullables::NullStore;
use covenant_transactions::{SignedTransaction, Transaction};
use covenant_types::{AccountName, AuthorityTier, KeyPair, PrivateKey};
use covenant_utils::{format_duration, init_logging, LogFormat, StatsCounter};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "covenant", about = "Covenant governance chain tools")]
struct Cli {
    /// Path to a TOML chain configuration. Defaults describe a testnet.
    #[arg(long, env = "COVENANT_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log level override: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "COVENANT_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Log output format override: "human" or "json".
    #[arg(long, env = "COVENANT_LOG_FORMAT", global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Apply a JSON array of blocks from genesis, printing events as JSON lines.
    Replay {
        /// JSON file holding the blocks in order.
        #[arg(long)]
        blocks: PathBuf,

        /// Write Prometheus metrics here after the replay.
        #[arg(long)]
        metrics_out: Option<PathBuf>,
    },
    /// Replay, check every state invariant and print the state hash.
    Verify {
        #[arg(long)]
        blocks: PathBuf,
    },
    /// Print the default configuration as TOML.
    InitConfig,
    /// Generate a key pair and print it as hex.
    ///
    /// With `--secret` and `--account`, derive the account's owner, active
    /// and posting keys instead. The same inputs always give the same keys.
    Keygen {
        #[arg(long, env = "COVENANT_KEY_SECRET", requires = "account")]
        secret: Option<String>,

        #[arg(long, requires = "secret")]
        account: Option<AccountName>,
    },
    /// Sign an unsigned transaction (JSON) and print the signed form.
    Sign {
        #[arg(long)]
        tx: PathBuf,

        /// Hex private keys to sign with. Repeat for several signers.
        #[arg(long = "key", env = "COVENANT_SIGNING_KEYS", value_delimiter = ',', required = true)]
        keys: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let format = cli.log_format.unwrap_or(config.log_format);
    init_logging(format, level).context("failed to initialise logging")?;

    match cli.command {
        Command::Replay {
            blocks,
            metrics_out,
        } => {
            let blocks = load_blocks(&blocks)?;
            let metrics = ChainMetrics::new().context("failed to register metrics")?;
            let chain = start_chain(&config)?.with_metrics(metrics);
            let chain = replay(chain, &blocks, true)?;
            if let (Some(path), Some(metrics)) = (metrics_out, chain.metrics()) {
                let text = metrics.encode().context("failed to encode metrics")?;
                std::fs::write(&path, text)
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
        }
        Command::Verify { blocks } => {
            let blocks = load_blocks(&blocks)?;
            let chain = start_chain(&config)?.with_invariant_checks(true);
            let chain = replay(chain, &blocks, false)?;
            chain
                .validate_invariants()
                .context("state invariants violated")?;
            let snapshot = chain.snapshot().context("failed to capture state")?;
            println!("{} {}", snapshot.head_block_number(), snapshot.hash_hex());
        }
        Command::InitConfig => {
            print!("{}", ChainConfig::default().to_toml_string()?);
        }
        Command::Keygen { secret, account } => match (secret, account) {
            (Some(secret), Some(account)) => {
                for tier in [AuthorityTier::Owner, AuthorityTier::Active, AuthorityTier::Posting] {
                    let kp = derive_role_keypair(secret.as_bytes(), &account, tier);
                    let tier = tier.to_string();
                    println!("{tier:<7} public  {}", hex::encode(kp.public.0));
                    println!("{tier:<7} private {}", hex::encode(&kp.private.0));
                }
            }
            _ => {
                let kp = generate_keypair();
                println!("public  {}", hex::encode(kp.public.0));
                println!("private {}", hex::encode(&kp.private.0));
            }
        },
        Command::Sign { tx, keys } => {
            let content = std::fs::read_to_string(&tx)
                .with_context(|| format!("failed to read {}", tx.display()))?;
            let unsigned: Transaction = serde_json::from_str(&content)
                .with_context(|| format!("failed to parse transaction {}", tx.display()))?;
            let keys = keys
                .iter()
                .map(|k| parse_private_key(k))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let refs: Vec<&KeyPair> = keys.iter().collect();
            let signed = SignedTransaction::sign(unsigned, &config.chain_id()?, &refs)?;
            println!("{}", serde_json::to_string_pretty(&signed)?);
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ChainConfig> {
    match path {
        Some(path) => ChainConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(ChainConfig::default()),
    }
}

fn load_blocks(path: &Path) -> anyhow::Result<Vec<Block>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

fn start_chain(config: &ChainConfig) -> anyhow::Result<Chain<NullStore>> {
    let chain = Chain::from_genesis(NullStore::new(), config).context("genesis failed")?;
    tracing::info!(
        network = %config.network,
        accounts = config.genesis.accounts.len(),
        "chain started"
    );
    Ok(chain)
}

fn replay(
    mut chain: Chain<NullStore>,
    blocks: &[Block],
    print_events: bool,
) -> anyhow::Result<Chain<NullStore>> {
    let stats = StatsCounter::new(&["blocks", "transactions", "events"]);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for block in blocks {
        let events = chain
            .apply_block(block)
            .with_context(|| format!("block {} rejected", block.number))?;
        stats.increment("blocks");
        stats.add("transactions", block.transactions.len() as u64);
        stats.add("events", events.len() as u64);
        if print_events {
            for event in &events {
                serde_json::to_writer(&mut out, event)?;
                writeln!(out)?;
            }
        }
    }
    let span = match (blocks.first(), blocks.last()) {
        (Some(first), Some(last)) => first.timestamp.elapsed_since(last.timestamp),
        _ => 0,
    };
    tracing::info!(
        summary = %stats.summary(),
        chain_time = %format_duration(span),
        "replay finished"
    );
    Ok(chain)
}

fn parse_private_key(s: &str) -> anyhow::Result<KeyPair> {
    let bytes = hex::decode(s.trim()).context("private key is not hex")?;
    let Ok(bytes) = <[u8; 32]>::try_from(bytes.as_slice()) else {
        bail!("private key must be 32 bytes, got {}", bytes.len());
    };
    Ok(keypair_from_private(PrivateKey(bytes)))
}
