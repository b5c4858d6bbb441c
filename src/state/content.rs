//! Content loading.
//!
//! States pull their assets through a [`ContentManager`] during the
//! content phase. The crate ships an in-memory implementation; real hosts
//! plug in their own loader.

use std::collections::HashMap;
use std::rc::Rc;

/// Raw asset bytes, shared between every state that loads them.
pub type Asset = Rc<[u8]>;

/// Asset-loading service handed to `load_content`.
pub trait ContentManager {
    /// Load an asset by name.
    fn load(&mut self, name: &str) -> Result<Asset, ContentError>;

    /// Check whether an asset is available without loading it.
    fn contains(&self, name: &str) -> bool;
}

/// Content errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    NotFound(String),
    Invalid { name: String, reason: String },
}

impl std::fmt::Display for ContentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(name) => write!(f, "Asset not found: {}", name),
            Self::Invalid { name, reason } => write!(f, "Invalid asset {}: {}", name, reason),
        }
    }
}

impl std::error::Error for ContentError {}

/// In-memory content store.
#[derive(Debug, Default)]
pub struct MemoryContent {
    assets: HashMap<String, Asset>,

    /// Successful loads
    loads: usize,
}

impl MemoryContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset, replacing any previous one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        let bytes: Vec<u8> = bytes.into();
        self.assets.insert(name.into(), Rc::from(bytes));
    }

    /// Number of successful loads served so far.
    pub fn loads(&self) -> usize {
        self.loads
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl ContentManager for MemoryContent {
    fn load(&mut self, name: &str) -> Result<Asset, ContentError> {
        let asset = self
            .assets
            .get(name)
            .cloned()
            .ok_or_else(|| ContentError::NotFound(name.to_string()))?;
        self.loads += 1;
        Ok(asset)
    }

    fn contains(&self, name: &str) -> bool {
        self.assets.contains_key(name)
    }
}
