use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;

use super::{Arguments, Config};
use crate::prelude::*;
use crate::store::Store;

/// Type alias for an atomically-refcounted instance of [`InnerContext`].
pub type Context = Arc<InnerContext>;

/// Inner representation of global program context.
#[derive(Debug)]
pub struct InnerContext {
    pub args: Arguments,
    pub config: Config,
    pub store: Store,
}

impl InnerContext {
    pub fn init() -> Result<Context> {
        let args = Arguments::parse();

        let (config, root) = match &args.config {
            Some(path) => (Config::from_path(path)?, parent_dir(path)),
            None => match try_locate_config(&env::current_dir()?) {
                Some(path) => (Config::from_path(&path)?, parent_dir(&path)),
                None => {
                    warn!("No {CONFIG_FILENAME} found, falling back to the default configuration.");
                    (Config::default(), env::current_dir()?)
                }
            },
        };

        let store = Store::open(root.join(&config.data_dir))?;
        debug!("Using data directory {:?}.", store.root());

        Ok(Arc::new(InnerContext { args, config, store }))
    }

    /// Builds a context around an existing configuration and store, bypassing argument parsing.
    #[cfg(test)]
    pub fn with_store(config: Config, store: Store) -> Context {
        let args = Arguments::parse_from(["mdpreview", "serve"]);
        Arc::new(InnerContext { args, config, store })
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn try_locate_config(start: &Path) -> Option<PathBuf> {
    let mut path: PathBuf = start.into();
    let target = Path::new(CONFIG_FILENAME);

    loop {
        path.push(target);

        if path.is_file() {
            break Some(path);
        }

        if !(path.pop() && path.pop()) {
            break None;
        }
    }
}
