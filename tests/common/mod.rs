/*!
 * Common test utilities for the hanzi-annotator test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use hanzi_annotator::annotation::{AnnotationEngine, EngineOptions, IdiomCatalog};
use hanzi_annotator::providers::LexiconProvider;

// Re-export the mock providers module
pub mod mock_providers;

/// Route library logs through env_logger when RUST_LOG is set
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Builds an engine with default options around the given provider and idioms
pub fn engine_with<P>(provider: P, idioms: &[&str]) -> AnnotationEngine
where
    P: LexiconProvider + 'static,
{
    init_logging();
    let catalog = IdiomCatalog::new(idioms.iter().copied()).expect("valid test catalog");
    AnnotationEngine::new(Arc::new(provider), catalog, EngineOptions::default())
}
