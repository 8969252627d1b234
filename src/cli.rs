use crate::key::keys::Pair;
use crate::key::store::FileStore;

use anyhow::Result;
use clap::Parser;

/// Generate the long-term keypair (randbeacon_id.private, randbeacon_id.public) for this node
#[derive(Debug, Parser, Clone)]
pub struct KeyGenConfig {
    /// Folder to keep the beacon cryptographic material, with absolute path.
    #[arg(long, default_value_t = FileStore::beacon_home())]
    pub folder: String,
    /// Indicates the id of the beacon instance the keypair belongs to.
    #[arg(long, default_value = "default")]
    pub id: String,
}

#[derive(Debug, Parser)]
#[command(name = "randbeacon")]
#[command(about = "PVSS random beacon node tooling", long_about = None)]
pub struct Cli {
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    commands: Cmd,
}

#[derive(Debug, Parser)]
pub enum Cmd {
    GenerateKeypair(KeyGenConfig),
}

impl Cli {
    pub fn run(self) -> Result<()> {
        // Logs are disabled in tests by default.
        #[cfg(not(test))]
        crate::log::setup_tracing(self.verbose);

        match self.commands {
            Cmd::GenerateKeypair(config) => keygen_cmd(&config)?,
        }

        Ok(())
    }
}

fn keygen_cmd(config: &KeyGenConfig) -> Result<()> {
    println!("Generating private / public key pair");
    let pair = Pair::generate()?;
    let store = FileStore::set(&config.folder, &config.id);
    store.save_pair(&pair)?;
    println!(
        "Generated keys at: {}\n{}",
        store.key_folder().display(),
        pair
    );

    Ok(())
}
