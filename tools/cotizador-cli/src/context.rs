//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use cotizador_cache::{Cache, FileBackend};
use cotizador_commerce::{catalog::Catalog, quote::QuoteStore};

use crate::config::{CliConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        Self::load_in(cwd, config_path, output)
    }

    fn load_in(cwd: PathBuf, config_path: Option<&str>, output: Output) -> Result<Self> {
        let (config, config_path) = match config_path {
            Some(path) => {
                let path = resolve(&cwd, path);
                (CliConfig::load(&path)?, Some(path))
            }
            // Try to find config in current directory or parent directories
            None => match find_config(&cwd) {
                Some(path) => (CliConfig::load(&path)?, Some(path)),
                None => (CliConfig::default(), None),
            },
        };

        if let Some(ref path) = config_path {
            tracing::debug!(path = %path.display(), "loaded config");
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Directory holding persisted state. Relative paths are taken from the
    /// config file's directory, or the working directory without one.
    pub fn storage_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.storage.dir)
    }

    /// Open and hydrate the quote cart.
    pub fn open_store(&self) -> Result<QuoteStore<FileBackend>> {
        let dir = self.storage_dir();
        let backend = FileBackend::open(&dir)
            .with_context(|| format!("Failed to open quote storage: {}", dir.display()))?;
        let mut store = QuoteStore::with_key(Cache::new(backend), self.config.storage.key.clone());
        store.hydrate();
        Ok(store)
    }

    /// Load the configured catalog, or the built-in one.
    pub fn load_catalog(&self) -> Result<Catalog> {
        match self.config.catalog.path {
            Some(ref path) => {
                let path = self.resolve_path(path);
                let json = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
                Catalog::from_json(&json)
                    .with_context(|| format!("Failed to load catalog: {}", path.display()))
            }
            None => Ok(Catalog::builtin()),
        }
    }

    /// Resolve a path relative to the config file's directory, falling back
    /// to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let base = self
            .config_path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or(self.cwd.as_path());
        resolve(base, path)
    }
}

fn resolve(base: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Find config file in directory tree.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_FILE_NAMES {
            let config_path = current.join(name);
            if config_path.is_file() {
                return Some(config_path);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cotizador_commerce::ProductId;
    use tempfile::TempDir;

    fn quiet() -> Output {
        Output::new(false, true)
    }

    #[test]
    fn test_find_config_walks_up() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("planta").join("molino");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.path().join(".cotizador.toml"), "").unwrap();

        let found = find_config(&nested).unwrap();
        assert_eq!(found, root.path().join(".cotizador.toml"));
    }

    #[test]
    fn test_defaults_without_config() {
        let root = TempDir::new().unwrap();
        let ctx = Context::load_in(root.path().to_path_buf(), None, quiet()).unwrap();

        assert!(ctx.config_path.is_none());
        assert_eq!(ctx.config.storage.key, "cotizador-quote");
        assert_eq!(ctx.storage_dir(), root.path().join(".cotizador"));
    }

    #[test]
    fn test_storage_relative_to_config_file() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("sub");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            root.path().join("cotizador.toml"),
            "[storage]\ndir = \"estado\"\n",
        )
        .unwrap();

        let ctx = Context::load_in(nested, None, quiet()).unwrap();
        assert_eq!(ctx.storage_dir(), root.path().join("estado"));
    }

    #[test]
    fn test_store_persists_between_contexts() {
        let root = TempDir::new().unwrap();
        std::fs::write(root.path().join("cotizador.toml"), "").unwrap();

        let ctx = Context::load_in(root.path().to_path_buf(), None, quiet()).unwrap();
        let catalog = ctx.load_catalog().unwrap();
        let mut store = ctx.open_store().unwrap();
        store.add_item(&catalog.products()[0], 3);

        let ctx = Context::load_in(root.path().to_path_buf(), None, quiet()).unwrap();
        let store = ctx.open_store().unwrap();
        assert_eq!(store.get(ProductId::new(1)).unwrap().quantity, 3);
        assert!(root.path().join(".cotizador").join("cotizador-quote.json").is_file());
    }

    #[test]
    fn test_custom_catalog_path() {
        let root = TempDir::new().unwrap();
        std::fs::write(
            root.path().join("cotizador.toml"),
            "[catalog]\npath = \"parts.json\"\n",
        )
        .unwrap();
        std::fs::write(
            root.path().join("parts.json"),
            r#"{"categories": [], "products": [{"id": 1, "sku": "X-1", "name": "X", "categoryId": 1}]}"#,
        )
        .unwrap();

        let ctx = Context::load_in(root.path().to_path_buf(), None, quiet()).unwrap();
        assert_eq!(ctx.load_catalog().unwrap().products().len(), 1);
    }
}
