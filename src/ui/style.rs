//! Shared UI configuration and the style switcher / wrapper built on it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleOption {
    pub name: &'static str,
    pub label: &'static str,
}

pub static STYLES: [StyleOption; 2] = [
    StyleOption { name: "new-york", label: "New York" },
    StyleOption { name: "default", label: "Default" },
];

pub const DEFAULT_STYLE: &str = "new-york";

pub fn find_style(name: &str) -> Option<&'static StyleOption> {
    STYLES.iter().find(|style| style.name == name)
}

/// Persisted UI configuration. Keys other than `style` are kept as-is so that
/// a style change never drops them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    pub style: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            style: DEFAULT_STYLE.to_string(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error("Unknown style: {0}")]
    UnknownStyle(String),

    #[error("Failed to access UI config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed UI config: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Single owner of the UI configuration. Readers subscribe for changes;
/// writers go through [`ConfigStore::update`].
#[derive(Debug)]
pub struct ConfigStore {
    tx: watch::Sender<UiConfig>,
    path: Option<PathBuf>,
}

impl ConfigStore {
    pub fn in_memory(initial: UiConfig) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx, path: None }
    }

    /// Load from `path`, or start from defaults if the file does not exist.
    /// Subsequent updates are written back to the same file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConfigStoreError> {
        let path = path.as_ref().to_path_buf();
        let initial = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => UiConfig::default(),
            Err(e) => return Err(e.into()),
        };

        let (tx, _) = watch::channel(initial);
        Ok(Self { tx, path: Some(path) })
    }

    pub fn get(&self) -> UiConfig {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UiConfig> {
        self.tx.subscribe()
    }

    /// Apply `f` to a copy, persist it, then publish it to subscribers.
    /// A failed write leaves the current value untouched.
    pub fn update(&self, f: impl FnOnce(&mut UiConfig)) -> Result<UiConfig, ConfigStoreError> {
        let mut candidate = self.get();
        f(&mut candidate);

        if let Some(path) = &self.path {
            std::fs::write(path, serde_json::to_string_pretty(&candidate)?)?;
            tracing::debug!("Persisted UI config to {}", path.display());
        }

        self.tx.send_replace(candidate.clone());
        Ok(candidate)
    }
}

/// Two-option selector writing into the shared configuration.
#[derive(Debug, Clone, Copy)]
pub struct StyleSwitcher<'a> {
    store: &'a ConfigStore,
}

impl<'a> StyleSwitcher<'a> {
    pub fn new(store: &'a ConfigStore) -> Self {
        Self { store }
    }

    pub fn options(&self) -> &'static [StyleOption] {
        &STYLES
    }

    pub fn selected(&self) -> String {
        self.store.get().style
    }

    pub fn select(&self, name: &str) -> Result<UiConfig, ConfigStoreError> {
        let style = find_style(name).ok_or_else(|| ConfigStoreError::UnknownStyle(name.to_string()))?;
        self.store.update(|config| config.style = style.name.to_string())
    }
}

/// Shows its children only for a matching style, or always when unnamed.
#[derive(Debug, Clone, Default)]
pub struct StyleWrapper {
    style_name: Option<String>,
}

impl StyleWrapper {
    pub fn new(style_name: Option<impl Into<String>>) -> Self {
        Self {
            style_name: style_name.map(Into::into),
        }
    }

    pub fn is_visible(&self, config: &UiConfig) -> bool {
        match self.style_name.as_deref() {
            None | Some("") => true,
            Some(name) => config.style == name,
        }
    }

    pub fn render<T>(&self, config: &UiConfig, children: T) -> Option<T> {
        self.is_visible(config).then_some(children)
    }
}
