//! Ambient state threaded through every semantic query.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tokio_util::sync::CancellationToken;

use super::base_module::{BASE_URI, BaseModule};
use crate::ast::{Document, Node};
use crate::error::{Error, Result};

/// Default bound on nested type inference before giving up with `unknown`.
pub const DEFAULT_MAX_DEPTH: u32 = 32;

/// Query context: the base module, a snapshot of the known modules, and the
/// cancellation token of the request being served.
///
/// Cloning is cheap; all state is shared.
#[derive(Clone)]
pub struct Context {
    base: Arc<BaseModule>,
    modules: Arc<FxHashMap<String, Arc<Document>>>,
    cancel: CancellationToken,
    max_depth: u32,
}

impl Context {
    pub fn new(base: Arc<BaseModule>) -> Self {
        Self {
            base,
            modules: Arc::default(),
            cancel: CancellationToken::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Replace the module snapshot.
    pub fn with_modules(mut self, modules: Arc<FxHashMap<String, Arc<Document>>>) -> Self {
        self.modules = modules;
        self
    }

    /// Add one document to the module snapshot.
    pub fn with_document(mut self, document: Arc<Document>) -> Self {
        Arc::make_mut(&mut self.modules).insert(document.uri().to_string(), document);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn base(&self) -> &BaseModule {
        &self.base
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn check_cancelled(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }

    pub fn document(&self, uri: &str) -> Option<&Arc<Document>> {
        self.modules.get(uri)
    }

    pub fn documents(&self) -> impl Iterator<Item = &Arc<Document>> {
        self.modules.values()
    }

    /// Root node of the module `uri` refers to when imported from `from`.
    pub fn resolve_import(&self, from: &Document, uri: &str) -> Option<Node> {
        if uri == BASE_URI {
            return Some(self.base.module());
        }
        let target = join_uri(from.uri(), uri);
        self.modules.get(&target).map(|doc| doc.root())
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("modules", &self.modules.len())
            .field("cancelled", &self.is_cancelled())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

/// Resolve `reference` against the uri of the importing document.
///
/// Uris with a scheme are returned as is. Relative references replace the
/// last path segment of `base`, with `.` and `..` segments normalized.
pub fn join_uri(base: &str, reference: &str) -> String {
    if has_scheme(reference) {
        return reference.to_string();
    }
    let (prefix, path) = split_authority(base);
    let mut segments: Vec<&str> = if reference.starts_with('/') {
        Vec::new()
    } else {
        let mut dir: Vec<&str> = path.split('/').collect();
        dir.pop();
        dir
    };
    for segment in reference.split('/') {
        match segment {
            "." => {}
            ".." => {
                if segments.len() > 1 {
                    segments.pop();
                }
            }
            "" if !segments.is_empty() => {}
            other => segments.push(other),
        }
    }
    let mut joined = segments.join("/");
    if !joined.starts_with('/') && path.starts_with('/') {
        joined.insert(0, '/');
    }
    format!("{prefix}{joined}")
}

fn has_scheme(uri: &str) -> bool {
    match uri.find(':') {
        Some(idx) => {
            idx > 1
                && uri[..idx]
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Split `scheme://authority` from the path of a uri
fn split_authority(uri: &str) -> (&str, &str) {
    if let Some(rest_idx) = uri.find("://") {
        let after = rest_idx + 3;
        let path_start = uri[after..].find('/').map_or(uri.len(), |i| after + i);
        (&uri[..path_start], &uri[path_start..])
    } else if let Some(idx) = uri.find(':').filter(|_| has_scheme(uri)) {
        (&uri[..=idx], &uri[idx + 1..])
    } else {
        ("", uri)
    }
}
