/*!
 * Tests for lookup failures, concurrency and cancellation
 */

use std::sync::Arc;
use std::time::Duration;

use hanzi_annotator::annotation::{AnnotationEngine, EngineOptions, IdiomCatalog};
use hanzi_annotator::errors::AnnotationError;
use hanzi_annotator::providers::{MockLexicon, TableLexicon};

use crate::common::engine_with;
use crate::common::mock_providers::DelayedLexicon;

#[tokio::test]
async fn test_annotate_withOneFailingCharacter_shouldOnlyDegradeThatCharacter() {
    let engine = engine_with(MockLexicon::fail_on(["意"]), &["一心一意"]);
    let document = engine.annotate("一心一意\n意").await.unwrap();

    let first = &document.paragraphs[0].tokens;
    assert!(first[3].fallback);
    assert_eq!(first[3].pinyin, "?");
    assert_eq!(first[3].translation, "?");
    // Still grouped with its idiom
    assert_eq!(first[3].idiom_group.as_ref().unwrap().idiom, "一心一意");
    assert!(first[..3].iter().all(|t| !t.fallback));

    assert!(document.paragraphs[1].tokens[0].fallback);
    assert_eq!(document.stats().fallbacks, 2);
}

#[tokio::test]
async fn test_annotate_withUnreachableProvider_shouldReturnProviderUnavailable() {
    let engine = engine_with(MockLexicon::unreachable(), &["一心一意"]);
    let result = engine.annotate("一心一意\n人不是人").await;

    match result {
        Err(AnnotationError::ProviderUnavailable { failures, message }) => {
            assert_eq!(failures, 6);
            assert!(message.contains("connection refused"));
        }
        other => panic!("Expected ProviderUnavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_annotate_withServerErrors_shouldReturnProviderUnavailable() {
    let engine = engine_with(MockLexicon::failing(), &[]);
    let result = engine.annotate("人").await;
    assert!(matches!(result, Err(AnnotationError::ProviderUnavailable { failures: 1, .. })));
}

#[tokio::test]
async fn test_annotate_withOnlyUnparseableReplies_shouldReturnProviderUnavailable() {
    let engine = engine_with(MockLexicon::unparseable(), &[]);
    let result = engine.annotate("人不是人\n你好").await;

    match result {
        Err(AnnotationError::ProviderUnavailable { failures, message }) => {
            assert_eq!(failures, 5);
            assert!(message.contains("Failed to parse"));
        }
        other => panic!("Expected ProviderUnavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_annotate_withEmptyDictionary_shouldFallBackWithoutError() {
    let engine = engine_with(TableLexicon::default(), &[]);
    let document = engine.annotate("龘靐").await.unwrap();

    assert!(document.paragraphs[0].tokens.iter().all(|t| t.fallback));
    assert_eq!(document.paragraphs[0].reconstructed_text(), "龘靐");
}

#[tokio::test]
async fn test_annotate_withIntermittentProvider_shouldStillSucceed() {
    let engine = engine_with(MockLexicon::intermittent(2), &[]);
    let document = engine.annotate("一二三四").await.unwrap();

    let fallbacks = document.paragraphs[0].tokens.iter().filter(|t| t.fallback).count();
    assert_eq!(fallbacks, 2);
}

#[tokio::test]
async fn test_annotate_withParagraphsFinishingOutOfOrder_shouldKeepDocumentOrder() {
    let lexicon = DelayedLexicon::new(&[("甲", 80), ("乙", 40), ("丙", 0)]);
    let engine = AnnotationEngine::new(
        Arc::new(lexicon),
        IdiomCatalog::default(),
        EngineOptions {
            max_concurrent_paragraphs: 3,
            ..EngineOptions::default()
        },
    );

    let document = engine.annotate("甲\n乙\n丙").await.unwrap();

    let texts: Vec<&str> = document.paragraphs.iter().map(|p| p.text.as_str()).collect();
    assert_eq!(texts, vec!["甲", "乙", "丙"]);
}

#[tokio::test]
async fn test_annotate_withSequentialLimit_shouldProduceSameDocument() {
    let raw = "甲乙\n丙\n甲";
    let sequential = AnnotationEngine::new(
        Arc::new(DelayedLexicon::new(&[("甲", 5)])),
        IdiomCatalog::default(),
        EngineOptions {
            max_concurrent_paragraphs: 1,
            ..EngineOptions::default()
        },
    );
    let concurrent = engine_with(DelayedLexicon::new(&[("甲", 5)]), &[]);

    assert_eq!(
        sequential.annotate(raw).await.unwrap(),
        concurrent.annotate(raw).await.unwrap()
    );
}

#[tokio::test]
async fn test_annotateWithCancel_shouldStopSlowLookups() {
    let engine = engine_with(MockLexicon::slow_on(["慢"], 10_000), &[]);

    let result = engine
        .annotate_with_cancel("快\n慢", tokio::time::sleep(Duration::from_millis(20)))
        .await;

    assert!(matches!(result, Err(AnnotationError::Cancelled)));
}

#[tokio::test]
async fn test_annotateWithCancel_whenNeverCancelled_shouldReturnDocument() {
    let engine = engine_with(MockLexicon::working(), &[]);
    let document = engine
        .annotate_with_cancel("人", std::future::pending::<()>())
        .await
        .unwrap();
    assert_eq!(document.paragraphs.len(), 1);
}
