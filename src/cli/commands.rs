use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "pow-ledger", about = "In-memory proof-of-work ledger")]
pub struct Opt {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(
        name = "session",
        about = "Serve JSON requests from stdin, one per line, answering on stdout"
    )]
    Session {
        #[arg(long, help = "TOML configuration file")]
        config: Option<PathBuf>,
        #[arg(long, help = "Start from a snapshot file instead of a fresh genesis")]
        load: Option<PathBuf>,
        #[arg(long, help = "Write a snapshot file when the session ends")]
        save: Option<PathBuf>,
    },
    #[command(name = "demo", about = "Submit sample transfers, mine them and print the chain")]
    Demo {
        #[arg(long, default_value_t = 2, help = "Leading hex zeros required")]
        difficulty: u32,
        #[arg(long, default_value_t = 3, help = "Transfers to submit before mining")]
        transactions: u32,
        #[arg(long, help = "Mine on behalf of this party (pays the block reward)")]
        miner: Option<String>,
        #[arg(long, help = "Block reward paid to the miner")]
        reward: Option<f64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session() {
        let opt = Opt::try_parse_from([
            "pow-ledger",
            "session",
            "--config",
            "ledger.toml",
            "--save",
            "out.bin",
        ])
        .unwrap();
        match opt.command {
            Command::Session { config, load, save } => {
                assert_eq!(config, Some(PathBuf::from("ledger.toml")));
                assert_eq!(load, None);
                assert_eq!(save, Some(PathBuf::from("out.bin")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_demo_defaults() {
        let opt = Opt::try_parse_from(["pow-ledger", "demo"]).unwrap();
        match opt.command {
            Command::Demo {
                difficulty,
                transactions,
                miner,
                reward,
            } => {
                assert_eq!(difficulty, 2);
                assert_eq!(transactions, 3);
                assert_eq!(miner, None);
                assert_eq!(reward, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
