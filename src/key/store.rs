//! On-disk home of a node's long-lived keypair.

use super::keys::Pair;
use super::toml::{decode_pair, encode_private, encode_public, KeyTomlError};

use std::path::{Path, PathBuf};

const DEFAULT_FOLDER: &str = ".randbeacon";
const KEY_FOLDER: &str = "key";
const PRIVATE_ID_FILE: &str = "randbeacon_id.private";
const PUBLIC_ID_FILE: &str = "randbeacon_id.public";

#[derive(thiserror::Error, Debug)]
pub enum FileStoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Toml(#[from] KeyTomlError),
    #[error("keypair already present in {0}, remove it before generating a new one")]
    AlreadyExists(PathBuf),
}

#[derive(Debug, Clone)]
pub struct FileStore {
    key_folder: PathBuf,
    private_key_file: PathBuf,
    public_key_file: PathBuf,
}

impl FileStore {
    pub fn set(base_folder: &str, beacon_id: &str) -> Self {
        let key_folder = PathBuf::from(base_folder).join(beacon_id).join(KEY_FOLDER);
        let private_key_file = key_folder.join(PRIVATE_ID_FILE);
        let public_key_file = key_folder.join(PUBLIC_ID_FILE);
        Self {
            key_folder,
            private_key_file,
            public_key_file,
        }
    }

    /// Refuses to clobber an existing pair.
    pub fn save_pair(&self, pair: &Pair) -> Result<(), FileStoreError> {
        if self.private_key_file.exists() {
            return Err(FileStoreError::AlreadyExists(self.key_folder.clone()));
        }
        std::fs::create_dir_all(&self.key_folder)?;
        std::fs::write(&self.private_key_file, encode_private(pair))?;
        std::fs::write(&self.public_key_file, encode_public(pair))?;
        Ok(())
    }

    pub fn load_pair(&self) -> Result<Pair, FileStoreError> {
        let private_doc = read_to_string(&self.private_key_file)?;
        let public_doc = read_to_string(&self.public_key_file)?;
        Ok(decode_pair(&private_doc, &public_doc)?)
    }

    pub fn key_folder(&self) -> &Path {
        &self.key_folder
    }

    pub fn beacon_home() -> String {
        match home::home_dir() {
            Some(path) => path.join(DEFAULT_FOLDER).display().to_string(),
            None => panic!("couldn't get home directory"),
        }
    }
}

fn read_to_string(p: &Path) -> Result<String, std::io::Error> {
    std::fs::read_to_string(p)
        .map_err(|e| std::io::Error::new(e.kind(), format!("reading {}: {e}", p.display())))
}
