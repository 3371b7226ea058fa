// Entry point for the ledger CLI. The ledger itself lives in memory for the
// lifetime of the process; `session` is a line-oriented stand-in for the
// HTTP transport and `demo` shows one mining round end to end.
use clap::Parser;
use log::{error, info, LevelFilter};
use pow_ledger::{ApiHandler, Blockchain, ChainSnapshot, Command, Config, Opt};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process;
use std::sync::Arc;

const DEMO_PARTIES: [&str; 3] = ["alice", "bob", "carol"];

fn main() {
    // Info by default, RUST_LOG still wins
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let opt = Opt::parse();

    if let Err(e) = run_command(opt.command) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run_command(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Session { config, load, save } => {
            let config = match config {
                Some(path) => Config::load(path)?,
                None => Config::new()?,
            };
            let ledger = match load {
                Some(path) => {
                    let bytes = fs::read(&path)?;
                    Blockchain::restore(ChainSnapshot::from_bytes(&bytes)?, &config)?
                }
                None => Blockchain::new(&config)?,
            };
            let handler = ApiHandler::new(Arc::new(ledger));
            info!(
                "Session ready with {} blocks; reading requests from stdin",
                handler.ledger().len()
            );

            let stdin = io::stdin();
            let mut stdout = io::stdout().lock();
            for line in stdin.lock().lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                writeln!(stdout, "{}", handler.handle_json(&line))?;
                stdout.flush()?;
            }

            if let Some(path) = save {
                save_snapshot(handler.ledger(), &path)?;
            }
        }
        Command::Demo {
            difficulty,
            transactions,
            miner,
            reward,
        } => {
            let mut config = Config::with_difficulty(difficulty);
            config.mining.block_reward = reward;
            let ledger = Blockchain::new(&config)?;

            for n in 0..transactions as usize {
                let sender = DEMO_PARTIES[n % DEMO_PARTIES.len()];
                let recipient = DEMO_PARTIES[(n + 1) % DEMO_PARTIES.len()];
                ledger.submit_transaction(sender, recipient, (n + 1) as f64)?;
            }

            let block = match miner.as_deref() {
                Some(miner) => ledger.mine_block_for(miner)?,
                None => ledger.mine_block()?,
            };
            println!("Mined block {} with nonce {}", block.index(), block.nonce());
            println!("{}", serde_json::to_string_pretty(&ledger.chain())?);
            println!("Chain valid: {}", ledger.is_valid());
        }
    }
    Ok(())
}

fn save_snapshot(ledger: &Blockchain, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = ledger.snapshot().to_bytes()?;
    fs::write(path, bytes)?;
    info!("Saved {} blocks to {}", ledger.len(), path.display());
    Ok(())
}
