//! # Image Identity Cache
//!
//! Printers that can store graphics get every distinct bitmap uploaded once
//! per label and recalled by name wherever it is drawn.
//!
//! ## Keys
//!
//! ```text
//! "{sector}::{element id}::{document id}"
//! ```
//!
//! The rotation sector is part of the key because the same image drawn at a
//! different orientation is a different device bitmap.
//!
//! ## Variable Names
//!
//! The first 8 uppercase hex digits of the MD5 of the key, plus an optional
//! backend suffix (FingerPrint stores files, so it appends `.PCX`).
//!
//! ## Missing Images
//!
//! When the upload closure yields `None` (no pixels for the node) the
//! outcome is cached as `None` too: nothing is uploaded, and every later
//! lookup of the same key also yields `None`, so callers skip the recall.

use md5::{Digest, Md5};
use std::collections::HashMap;

use super::container::{Container, Segment};
use crate::error::Result;
use crate::geometry::RotationSector;

/// Length of a generated variable name, without suffix.
pub const VARIABLE_NAME_LEN: usize = 8;

/// Pass-scoped map from image identity to device variable name.
#[derive(Debug, Clone, Default)]
pub struct ImageCache {
    suffix: &'static str,
    names: HashMap<String, Option<String>>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache whose variable names end with `suffix`.
    pub fn with_suffix(suffix: &'static str) -> Self {
        Self {
            suffix,
            names: HashMap::new(),
        }
    }

    pub fn key(sector: RotationSector, element_id: &str, document_id: &str) -> String {
        format!("{}::{}::{}", sector, element_id, document_id)
    }

    /// Stable short name for a key.
    pub fn variable_name(&self, key: &str) -> String {
        let digest = Md5::digest(key.as_bytes());
        let mut name = hex::encode_upper(digest);
        name.truncate(VARIABLE_NAME_LEN);
        name.push_str(self.suffix);
        name
    }

    /// Resolve `key` to a variable name, uploading on first sight.
    ///
    /// On a miss `upload` is called with the fresh name. The segments it
    /// returns are appended to the container header and the name is cached;
    /// `None` caches the miss. Errors from `upload` propagate and cache
    /// nothing.
    pub fn resolve<F>(&mut self, key: &str, container: &mut Container, upload: F) -> Result<Option<String>>
    where
        F: FnOnce(&str) -> Result<Option<Vec<Segment>>>,
    {
        if let Some(cached) = self.names.get(key) {
            log::debug!("image cache hit: {} -> {:?}", key, cached);
            return Ok(cached.clone());
        }

        let name = self.variable_name(key);
        let resolved = match upload(&name)? {
            Some(segments) => {
                log::debug!("image cache miss: uploading {} as {}", key, name);
                container.header.extend(segments);
                Some(name)
            }
            None => {
                log::debug!("image cache miss: no pixels for {}", key);
                None
            }
        };
        self.names.insert(key.to_string(), resolved.clone());
        Ok(resolved)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
