/*!
 * # hanzi-annotator
 *
 * A Rust library that annotates Chinese text for language learners.
 *
 * ## Features
 *
 * - Split raw text into paragraphs
 * - Detect chengyu (four-character idioms) with deterministic
 *   leftmost-longest overlap resolution
 * - Attach pinyin and a gloss to every character through a pluggable
 *   lexicon provider:
 *   - In-memory JSON dictionary
 *   - Ollama (local LLM)
 * - Annotate paragraphs concurrently while keeping document order
 * - Degrade gracefully: a failed lookup only affects its own token
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `annotation`: The annotation engine:
 *   - `annotation::segmenter`: Paragraph splitting
 *   - `annotation::matcher`: Idiom matching
 *   - `annotation::assembler`: Token assembly
 *   - `annotation::engine`: The `AnnotationEngine` facade
 * - `providers`: Lexicon provider implementations:
 *   - `providers::table`: Dictionary table
 *   - `providers::ollama`: Ollama API client
 *   - `providers::mock`: Scripted provider for tests
 *   - `providers::cached`: Lookup cache decorator
 * - `app_config`: Configuration management
 * - `errors`: Custom error types for the library
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod annotation;
pub mod app_config;
pub mod errors;
pub mod providers;

// Re-export main types for easier usage
pub use annotation::{AnnotatedDocument, AnnotationEngine, EngineOptions, IdiomCatalog, Paragraph, Token};
pub use app_config::Config;
pub use errors::{AnnotationError, AppError, CatalogError, ProviderError};
pub use providers::{LexiconEntry, LexiconProvider};
