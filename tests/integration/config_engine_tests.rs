/*!
 * Tests for building the engine from configuration
 */

use hanzi_annotator::annotation::AnnotationEngine;
use hanzi_annotator::app_config::{Config, LexiconProviderKind};
use hanzi_annotator::errors::AnnotationError;

use crate::common;

const DICTIONARY: &str = r#"{
    "井": { "pinyin": "jǐng", "translation": "well" },
    "底": { "pinyin": "dǐ", "translation": "bottom" },
    "之": { "pinyin": "zhī", "translation": "of" },
    "蛙": { "pinyin": "wā", "translation": "frog" }
}"#;

#[tokio::test]
async fn test_engineFromConfig_withDictionaryAndCatalogFiles_shouldUseBoth() {
    common::init_logging();
    let dir = common::create_temp_dir().unwrap();
    let dictionary = common::create_test_file(dir.path(), "lexicon.json", DICTIONARY).unwrap();
    let catalog = common::create_test_file(dir.path(), "idioms.txt", "# frogs\n井底之蛙\n").unwrap();

    let mut config = Config::default();
    config.lexicon.dictionary_path = Some(dictionary.to_string_lossy().into_owned());
    config.catalog.path = Some(catalog.to_string_lossy().into_owned());

    let engine = AnnotationEngine::from_config(&config).unwrap();
    assert_eq!(engine.catalog().len(), 1);

    let document = engine.annotate("井底之蛙").await.unwrap();
    let tokens = &document.paragraphs[0].tokens;
    assert_eq!(tokens[3].pinyin, "wā");
    assert!(tokens.iter().all(|t| t.is_idiom() && !t.fallback));
}

#[tokio::test]
async fn test_engineFromConfig_withExtraIdioms_shouldAppendToCatalog() {
    let mut config = Config::default();
    config.lexicon.provider = LexiconProviderKind::Mock;
    config.catalog.extra_idioms = vec!["人山人海".to_string()];

    let engine = AnnotationEngine::from_config(&config).unwrap();
    assert!(engine.catalog().contains("人山人海"));
    assert!(engine.catalog().contains("一心一意"));

    let document = engine.annotate("到处人山人海").await.unwrap();
    assert_eq!(document.paragraphs[0].idiom_count(), 1);
}

#[test]
fn test_engineFromConfig_withBlankExtraIdiom_shouldFail() {
    let mut config = Config::default();
    config.catalog.extra_idioms = vec!["  ".to_string()];

    let error = AnnotationEngine::from_config(&config).unwrap_err();
    assert!(matches!(
        error.downcast_ref::<AnnotationError>(),
        Some(AnnotationError::Catalog(_))
    ));
}

#[test]
fn test_engineFromConfig_shouldCarryEngineSettings() {
    let mut config = Config::default();
    config.engine.cache_lookups = false;
    config.engine.placeholder_pinyin = "-".to_string();

    let engine = AnnotationEngine::from_config(&config).unwrap();
    assert!(!engine.options().cache_lookups);
    assert_eq!(engine.options().placeholder.pinyin, "-");
    assert_eq!(engine.options().max_concurrent_paragraphs, 16);
}

#[tokio::test]
async fn test_engineFromConfig_withCustomPlaceholder_shouldUseItForMissingEntries() {
    let dir = common::create_temp_dir().unwrap();
    let dictionary = common::create_test_file(dir.path(), "lexicon.json", "{}").unwrap();

    let mut config = Config::default();
    config.lexicon.dictionary_path = Some(dictionary.to_string_lossy().into_owned());
    config.engine.placeholder_translation = "(unknown)".to_string();

    let engine = AnnotationEngine::from_config(&config).unwrap();
    let document = engine.annotate("蛙").await.unwrap();
    assert_eq!(document.paragraphs[0].tokens[0].translation, "(unknown)");
}
