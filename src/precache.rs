// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Versioned offline asset cache
//!
//! A manifest names a cache version and the assets it must hold. Installing
//! fetches every asset and commits them together; a single failure commits
//! nothing. Lookups are cache-first across all cache versions, and activation
//! drops every version that is not whitelisted.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CACHE_NAME: &str = "editor-3d-v3";

const DEFAULT_URLS: &[&str] = &[
    "./",
    "./twopointoh.html",
    "./manifest.json",
    "./twopointoh.png",
    "./Fundo.jpg",
    "./xray.js",
    "./scanner.js",
    "./criador.js",
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.0.0-beta3/css/all.min.css",
    "https://cdn.tailwindcss.com",
    "https://cdnjs.cloudflare.com/ajax/libs/three.js/r128/three.min.js",
    "https://cdn.jsdelivr.net/npm/three@0.128.0/examples/js/controls/OrbitControls.js",
    "https://cdn.jsdelivr.net/npm/three@0.128.0/examples/js/controls/TransformControls.js",
    "https://cdn.jsdelivr.net/npm/dxf-parser@1.1.2/dist/dxf-parser.min.js",
    "https://cdn.jsdelivr.net/npm/three@0.128.0/examples/js/loaders/GLTFLoader.js",
    "https://cdn.jsdelivr.net/npm/three@0.128.0/examples/js/loaders/OBJLoader.js",
    "https://cdn.jsdelivr.net/npm/three@0.128.0/examples/js/loaders/MTLLoader.js",
    "https://cdn.jsdelivr.net/npm/three@0.128.0/examples/js/loaders/STLLoader.js",
    "https://cdn.jsdelivr.net/npm/three@0.128.0/examples/js/loaders/ColladaLoader.js",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrecacheManifest {
    pub cache_name: String,
    pub urls: Vec<String>,
}

impl Default for PrecacheManifest {
    fn default() -> Self {
        Self {
            cache_name: DEFAULT_CACHE_NAME.to_string(),
            urls: DEFAULT_URLS.iter().map(|url| url.to_string()).collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PrecacheError {
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
}

/// Network access used to fill the cache
pub trait Fetcher {
    fn fetch(&mut self, url: &str) -> Result<Vec<u8>, PrecacheError>;
}

impl<F> Fetcher for F
where
    F: FnMut(&str) -> Result<Vec<u8>, PrecacheError>,
{
    fn fetch(&mut self, url: &str) -> Result<Vec<u8>, PrecacheError> {
        self(url)
    }
}

/// Where a response came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Cache,
    Network,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub body: Vec<u8>,
    pub source: ResponseSource,
}

/// Named caches, each mapping URLs to bodies
#[derive(Debug, Clone, Default)]
pub struct CacheStorage {
    caches: AHashMap<String, AHashMap<String, Vec<u8>>>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch every asset of the manifest and store them under its cache
    /// name. On failure nothing is stored.
    pub fn install<F: Fetcher + ?Sized>(
        &mut self,
        manifest: &PrecacheManifest,
        fetcher: &mut F,
    ) -> Result<usize, PrecacheError> {
        let mut entries = AHashMap::with_capacity(manifest.urls.len());
        for url in &manifest.urls {
            match fetcher.fetch(url) {
                Ok(body) => {
                    entries.insert(url.clone(), body);
                }
                Err(err) => {
                    tracing::warn!("Precache of '{}' failed: {}", manifest.cache_name, err);
                    return Err(err);
                }
            }
        }

        let count = entries.len();
        self.caches
            .entry(manifest.cache_name.clone())
            .or_default()
            .extend(entries);
        tracing::info!("Cache '{}' opened with {} assets", manifest.cache_name, count);
        Ok(count)
    }

    /// First cached copy in any cache
    pub fn lookup(&self, url: &str) -> Option<&[u8]> {
        self.caches
            .values()
            .find_map(|cache| cache.get(url))
            .map(Vec::as_slice)
    }

    /// Cache-first: serve a cached copy, otherwise go to the network.
    /// Network responses are not added to the cache.
    pub fn respond<F: Fetcher + ?Sized>(
        &self,
        url: &str,
        fetcher: &mut F,
    ) -> Result<CachedResponse, PrecacheError> {
        if let Some(body) = self.lookup(url) {
            return Ok(CachedResponse {
                body: body.to_vec(),
                source: ResponseSource::Cache,
            });
        }
        Ok(CachedResponse {
            body: fetcher.fetch(url)?,
            source: ResponseSource::Network,
        })
    }

    /// Delete every cache not named in `whitelist`; returns the deleted names
    pub fn activate(&mut self, whitelist: &[&str]) -> Vec<String> {
        let mut stale: Vec<String> = self
            .caches
            .keys()
            .filter(|name| !whitelist.contains(&name.as_str()))
            .cloned()
            .collect();
        stale.sort();
        for name in &stale {
            self.caches.remove(name);
            tracing::info!("Deleted stale cache '{}'", name);
        }
        stale
    }

    pub fn cache_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.caches.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn contains(&self, cache_name: &str, url: &str) -> bool {
        self.caches
            .get(cache_name)
            .map(|cache| cache.contains_key(url))
            .unwrap_or(false)
    }
}
