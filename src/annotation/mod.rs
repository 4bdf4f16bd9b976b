/*!
 * Annotation engine.
 *
 * This module contains the core pipeline that turns raw Chinese text into
 * annotated paragraphs. It is split into several submodules:
 *
 * - `segmenter`: Paragraph splitting
 * - `catalog`: Ordered idiom catalog
 * - `matcher`: Idiom detection with leftmost-longest overlap resolution
 * - `assembler`: Ordered token assembly with per-token lookup fallback
 * - `engine`: Facade orchestrating the pipeline for a full document
 * - `document`: Output model
 * - `concurrency`: Provider-specific concurrency defaults
 */

// Re-export main types for easier usage
pub use self::assembler::{AssembledParagraph, Assembler, LookupStats};
pub use self::catalog::IdiomCatalog;
pub use self::document::{
    AnnotatedDocument, DocumentStats, IdiomGroup, IdiomGroupView, IdiomPosition, IdiomSpan, Paragraph, Token,
};
pub use self::engine::{AnnotationEngine, EngineOptions};
pub use self::matcher::find_spans;
pub use self::segmenter::segment;

// Submodules
pub mod assembler;
pub mod catalog;
pub mod concurrency;
pub mod document;
pub mod engine;
pub mod matcher;
pub mod segmenter;
