/*!
 * Annotation engine facade.
 *
 * The engine is the single entry point for collaborators (CLI, HTTP layer,
 * UI). It segments the document, then annotates paragraphs concurrently:
 * each paragraph is matched and assembled privately, and the finished
 * paragraphs are put back in document order before the result is returned.
 */

use anyhow::Result;
use futures::stream::{self, StreamExt};
use log::{debug, error, info};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use crate::annotation::assembler::{Assembler, LookupStats};
use crate::annotation::catalog::IdiomCatalog;
use crate::annotation::document::{AnnotatedDocument, Paragraph};
use crate::annotation::matcher::find_spans;
use crate::annotation::segmenter::segment;
use crate::app_config::{CatalogConfig, Config};
use crate::errors::AnnotationError;
use crate::providers::{self, CachedLexicon, LexiconEntry, LexiconProvider};

/// Engine tuning options
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Maximum paragraphs annotated at once
    pub max_concurrent_paragraphs: usize,

    /// Look up each distinct unit once per `annotate` call
    pub cache_lookups: bool,

    /// Entry used for tokens whose lookup failed
    pub placeholder: LexiconEntry,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_concurrent_paragraphs: 8,
            cache_lookups: true,
            placeholder: LexiconEntry::new("?", "?"),
        }
    }
}

impl EngineOptions {
    /// Options derived from the application configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_concurrent_paragraphs: config.max_concurrent_paragraphs(),
            cache_lookups: config.engine.cache_lookups,
            placeholder: LexiconEntry::new(
                config.engine.placeholder_pinyin.clone(),
                config.engine.placeholder_translation.clone(),
            ),
        }
    }
}

/// Annotation engine
#[derive(Debug, Clone)]
pub struct AnnotationEngine {
    lexicon: Arc<dyn LexiconProvider>,
    catalog: Arc<IdiomCatalog>,
    assembler: Assembler,
    options: EngineOptions,
}

impl AnnotationEngine {
    /// Create an engine around an injected provider and catalog
    pub fn new(lexicon: Arc<dyn LexiconProvider>, catalog: IdiomCatalog, options: EngineOptions) -> Self {
        Self {
            lexicon,
            catalog: Arc::new(catalog),
            assembler: Assembler::new(options.placeholder.clone()),
            options,
        }
    }

    /// Build the provider, catalog and options described by a configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let lexicon = providers::from_config(&config.lexicon)?;
        let catalog = Self::load_catalog(&config.catalog)?;

        info!(
            "Annotation engine ready: {} provider, {} idioms",
            config.lexicon.provider.display_name(),
            catalog.len()
        );

        Ok(Self::new(lexicon, catalog, EngineOptions::from_config(config)))
    }

    /// Catalog file (or the bundled one) plus the configured extra idioms
    pub fn load_catalog(config: &CatalogConfig) -> Result<IdiomCatalog, AnnotationError> {
        let mut catalog = match &config.path {
            Some(path) => IdiomCatalog::from_file(std::path::Path::new(path))?,
            None => IdiomCatalog::builtin(),
        };
        catalog.extend(&config.extra_idioms)?;
        Ok(catalog)
    }

    /// Make sure the provider answers before any text is sent to it
    pub async fn check_provider(&self) -> Result<(), AnnotationError> {
        info!("Testing connection to the {} lexicon provider", self.lexicon.name());
        self.lexicon.test_connection().await.map_err(|e| {
            error!("Lexicon provider connection test failed: {}", e);
            AnnotationError::from(e)
        })
    }

    pub fn catalog(&self) -> &IdiomCatalog {
        &self.catalog
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// The injected provider
    pub fn lexicon(&self) -> &Arc<dyn LexiconProvider> {
        &self.lexicon
    }

    /// Annotate a whole document.
    ///
    /// Blank input yields an empty paragraph list. Failed lookups degrade
    /// single tokens to the placeholder; the call itself only fails when
    /// every lookup failed because the provider could not be reached.
    pub async fn annotate(&self, raw: &str) -> Result<AnnotatedDocument, AnnotationError> {
        let start_time = Instant::now();
        let paragraphs = segment(raw);

        if paragraphs.is_empty() {
            debug!("No paragraphs to annotate");
            return Ok(AnnotatedDocument {
                original: raw.to_string(),
                paragraphs: Vec::new(),
            });
        }

        // Per-call cache: nothing survives into the next call
        let cached;
        let lexicon: &dyn LexiconProvider = if self.options.cache_lookups {
            cached = CachedLexicon::new(Arc::clone(&self.lexicon));
            &cached
        } else {
            self.lexicon.as_ref()
        };

        let (paragraphs, stats) = self.annotate_segments(paragraphs, lexicon).await;
        Self::check_stats(&stats)?;

        info!(
            "Annotated {} paragraph(s) in {:?} ({} lookups, {} failed)",
            paragraphs.len(),
            start_time.elapsed(),
            stats.lookups,
            stats.failures
        );

        Ok(AnnotatedDocument {
            original: raw.to_string(),
            paragraphs,
        })
    }

    /// Annotate a document unless `cancel` completes first.
    ///
    /// On cancellation the in-flight lookups are dropped and no partial
    /// result is returned.
    pub async fn annotate_with_cancel<F>(&self, raw: &str, cancel: F) -> Result<AnnotatedDocument, AnnotationError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            result = self.annotate(raw) => result,
            _ = cancel => {
                info!("Annotation cancelled");
                Err(AnnotationError::Cancelled)
            }
        }
    }

    /// Annotate a single, already segmented paragraph.
    pub async fn annotate_paragraph(&self, text: &str) -> Result<Paragraph, AnnotationError> {
        let spans = find_spans(text, &self.catalog);
        let assembled = self.assembler.assemble(text, &spans, self.lexicon.as_ref()).await;
        Self::check_stats(&assembled.stats)?;

        Ok(Paragraph {
            text: text.to_string(),
            tokens: assembled.tokens,
        })
    }

    async fn annotate_segments(
        &self,
        paragraphs: Vec<String>,
        lexicon: &dyn LexiconProvider,
    ) -> (Vec<Paragraph>, LookupStats) {
        let total = paragraphs.len();

        let mut results = stream::iter(paragraphs.into_iter().enumerate())
            .map(|(index, text)| async move {
                let spans = find_spans(&text, &self.catalog);
                let assembled = self.assembler.assemble(&text, &spans, lexicon).await;

                debug!(
                    "Paragraph {}/{}: {} tokens, {} idiom(s)",
                    index + 1,
                    total,
                    assembled.tokens.len(),
                    spans.len()
                );

                let paragraph = Paragraph {
                    text,
                    tokens: assembled.tokens,
                };
                (index, paragraph, assembled.stats)
            })
            .buffer_unordered(self.options.max_concurrent_paragraphs.max(1))
            .collect::<Vec<_>>()
            .await;

        // Completion order is arbitrary; restore document order
        results.sort_by_key(|(index, _, _)| *index);

        let mut stats = LookupStats::default();
        let paragraphs = results
            .into_iter()
            .map(|(_, paragraph, paragraph_stats)| {
                stats.merge(&paragraph_stats);
                paragraph
            })
            .collect();

        (paragraphs, stats)
    }

    fn check_stats(stats: &LookupStats) -> Result<(), AnnotationError> {
        if stats.provider_unavailable() {
            let message = stats.first_error.clone().unwrap_or_default();
            error!("Lexicon provider unavailable: {}", message);
            return Err(AnnotationError::ProviderUnavailable {
                failures: stats.failures,
                message,
            });
        }
        Ok(())
    }
}
