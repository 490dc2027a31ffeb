//! The generation pass.
//!
//! One call per compilation: resolve the well-known symbols, classify every
//! call-site (checking the host's cancellation token between sites), group
//! and emit. Guard failures skip their call-site; an unresolvable well-known
//! symbol degrades the whole pass to "feature unavailable" so the host can
//! keep compiling without binding features.

use rustc_hash::FxHashMap;
use rxwire_binder::{Compilation, SymbolCatalog};
use rxwire_checker::{ClassifiedInvocation, classify};
use rxwire_common::{CancellationToken, Outcome};
use rxwire_emitter::{EmitSummary, Emitter, OutputSink};
use rxwire_syntax::InvocationSite;
use tracing::{Level, debug, span, warn};

/// How a generation pass ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GenerationStatus {
    /// Ran to completion; all files are in the sink.
    Completed,
    /// The host cancelled the pass; nothing was emitted.
    Cancelled,
    /// The compilation lacks a required well-known symbol; observation
    /// features are unavailable, nothing was emitted, and that is not an
    /// error.
    FeatureUnavailable,
}

/// Aggregate result of one generation pass.
#[derive(Debug)]
pub struct GenerationSummary {
    pub status: GenerationStatus,
    /// Call-sites that produced a descriptor.
    pub classified: usize,
    /// Silent skips, counted per reason for tooling; no diagnostics are
    /// emitted for these.
    pub skipped: FxHashMap<&'static str, usize>,
    pub emit: EmitSummary,
}

impl GenerationSummary {
    fn with_status(status: GenerationStatus) -> Self {
        GenerationSummary {
            status,
            classified: 0,
            skipped: FxHashMap::default(),
            emit: EmitSummary::default(),
        }
    }

    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }
}

/// Run one generation pass over a compilation's call-sites.
pub fn run_generation(
    compilation: &Compilation,
    sites: &[InvocationSite],
    catalog: &SymbolCatalog,
    sink: &mut dyn OutputSink,
    token: &CancellationToken,
) -> GenerationSummary {
    let pass_span = span!(Level::DEBUG, "generation", compilation = compilation.id().0);
    let _enter = pass_span.enter();

    let well_known = match catalog.resolve(compilation) {
        Ok(well_known) => well_known,
        Err(error) => {
            warn!(%error, "observation features unavailable for this compilation");
            return GenerationSummary::with_status(GenerationStatus::FeatureUnavailable);
        }
    };

    let mut summary = GenerationSummary::with_status(GenerationStatus::Completed);
    let mut classified: Vec<ClassifiedInvocation> = Vec::new();

    for site in sites {
        // Cooperative cancellation between independent call-sites only.
        if token.is_cancelled() {
            debug!("pass cancelled by host");
            return GenerationSummary::with_status(GenerationStatus::Cancelled);
        }
        match classify(site, compilation, &well_known) {
            Outcome::Accepted(invocation) => classified.push(invocation),
            Outcome::Rejected(reason) => {
                *summary.skipped.entry(reason.as_str()).or_insert(0) += 1;
            }
        }
    }

    summary.classified = classified.len();
    summary.emit = Emitter::new(compilation, &well_known).emit_all(&classified, sink);
    debug!(
        classified = summary.classified,
        skipped = summary.skipped_total(),
        files = summary.emit.files,
        "pass complete"
    );
    summary
}
