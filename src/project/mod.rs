//! Project management: open documents, versions and cancellation.
//!
//! A [`Project`] owns the documents a client has open. Every edit rebuilds
//! the document wholesale and cancels the token handed out for the version it
//! replaces, so queries still running against stale text stop early.
//! [`Project::context_for`] hands out a [`Context`] snapshot for one request.

mod config;
mod loader;
mod logger;

pub use config::{AnalyzerToggles, Config};
pub use loader::{file_uri, load_directory};
pub use logger::{ClientLogger, LogSink, MessageType, TracingSink};

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::RwLock;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::ast::Document;
use crate::base::FileId;
use crate::error::{Error, Result};
use crate::hir::{AnalysisReport, BaseModule, Context, DiagnosticsRunner};

struct OpenDocument {
    document: Arc<Document>,
    cancel: CancellationToken,
}

#[derive(Default)]
struct Documents {
    open: FxHashMap<String, OpenDocument>,
    /// Module snapshot shared with every context handed out
    modules: Arc<FxHashMap<String, Arc<Document>>>,
    file_ids: FxHashMap<String, FileId>,
}

/// The set of open documents plus the shared base module.
///
/// All methods take `&self`; a project can be shared between request
/// handlers.
pub struct Project {
    config: Config,
    base: Arc<BaseModule>,
    runner: DiagnosticsRunner,
    documents: RwLock<Documents>,
    next_file: AtomicU32,
    logger: ClientLogger,
}

impl Project {
    /// A project using the bundled base module.
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self::with_base(config, Arc::new(BaseModule::new()?)))
    }

    pub fn with_base(config: Config, base: Arc<BaseModule>) -> Self {
        let logger = ClientLogger::new(Arc::new(TracingSink), config.verbose, "project");
        Self {
            runner: config.runner(),
            config,
            base,
            documents: RwLock::default(),
            next_file: AtomicU32::new(FileId::BASE.raw() + 1),
            logger,
        }
    }

    /// Send client log messages to `sink` instead of `tracing`.
    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.logger = ClientLogger::new(sink, self.config.verbose, "project");
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn base(&self) -> &Arc<BaseModule> {
        &self.base
    }

    /// Open a document. Opening an uri that is already open replaces it.
    pub fn open(&self, uri: &str, version: i32, text: impl Into<String>) -> Arc<Document> {
        self.update(uri, version, text)
    }

    /// Replace the text of `uri`, cancelling requests against the old version.
    ///
    /// An update older than the open version is ignored and the open document
    /// returned.
    pub fn update(&self, uri: &str, version: i32, text: impl Into<String>) -> Arc<Document> {
        let mut docs = self.documents.write();
        if let Some(current) = docs.open.get(uri).filter(|c| c.document.version() > version) {
            self.logger.warn(format_args!(
                "ignoring stale update of {uri} (version {version}, open {})",
                current.document.version()
            ));
            return current.document.clone();
        }

        let file = *docs
            .file_ids
            .entry(uri.to_string())
            .or_insert_with(|| FileId::new(self.next_file.fetch_add(1, Ordering::Relaxed)));
        let document = Document::new(file, uri, version, text);
        let entry = OpenDocument {
            document: document.clone(),
            cancel: CancellationToken::new(),
        };
        if let Some(previous) = docs.open.insert(uri.to_string(), entry) {
            trace!(uri, version = previous.document.version(), "cancelling superseded version");
            previous.cancel.cancel();
        }
        Arc::make_mut(&mut docs.modules).insert(uri.to_string(), document.clone());

        debug!(uri, version, errors = document.errors().len(), "document updated");
        self.logger.log(format_args!("updated {uri} to version {version}"));
        document
    }

    /// Close `uri`. Returns whether it was open.
    pub fn close(&self, uri: &str) -> bool {
        let mut docs = self.documents.write();
        let Some(entry) = docs.open.remove(uri) else {
            return false;
        };
        entry.cancel.cancel();
        Arc::make_mut(&mut docs.modules).remove(uri);
        debug!(uri, "document closed");
        true
    }

    pub fn document(&self, uri: &str) -> Option<Arc<Document>> {
        self.documents.read().open.get(uri).map(|e| e.document.clone())
    }

    /// Uris of all open documents, sorted.
    pub fn uris(&self) -> Vec<String> {
        let mut uris: Vec<_> = self.documents.read().open.keys().cloned().collect();
        uris.sort();
        uris
    }

    pub fn len(&self) -> usize {
        self.documents.read().open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Context for a request against the current version of `uri`.
    ///
    /// The context is cancelled as soon as `uri` is updated or closed.
    pub fn context_for(&self, uri: &str) -> Result<Context> {
        self.snapshot(uri).map(|(_, ctx)| ctx)
    }

    /// The open version of `uri` together with a context for it
    fn snapshot(&self, uri: &str) -> Result<(Arc<Document>, Context)> {
        let docs = self.documents.read();
        let entry = docs
            .open
            .get(uri)
            .ok_or_else(|| Error::UnknownDocument(uri.to_string()))?;
        let ctx = Context::new(self.base.clone())
            .with_modules(docs.modules.clone())
            .with_cancellation(entry.cancel.child_token())
            .with_max_depth(self.config.max_inference_depth);
        Ok((entry.document.clone(), ctx))
    }

    /// Run the configured analyzers over `uri`.
    pub fn analyze(&self, uri: &str) -> Result<AnalysisReport> {
        let (document, ctx) = self.snapshot(uri)?;
        let report = self.runner.run(&document.root(), &ctx)?;
        for error in &report.internal_errors {
            self.logger.error(format_args!("{uri}: {error}"));
        }
        Ok(report)
    }

    /// Analyze every open document in parallel. Results are sorted by uri.
    pub fn analyze_all(&self) -> Vec<(String, Result<AnalysisReport>)> {
        let uris = self.uris();
        uris.into_par_iter()
            .map(|uri| {
                let report = self.analyze(&uri);
                (uri, report)
            })
            .collect()
    }
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("config", &self.config)
            .field("documents", &self.len())
            .finish()
    }
}
