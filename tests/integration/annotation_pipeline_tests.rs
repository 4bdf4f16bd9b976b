/*!
 * End-to-end tests of the annotation pipeline
 */

use hanzi_annotator::annotation::IdiomPosition;
use hanzi_annotator::providers::{MockLexicon, TableLexicon};

use crate::common::engine_with;
use crate::common::mock_providers::RecordingLexicon;

#[tokio::test]
async fn test_annotate_tokensShouldReconstructEveryParagraph() {
    let engine = engine_with(MockLexicon::working(), &["一心一意", "画蛇添足"]);
    let raw = "他一心一意地学习。\r\n\r\n不要画蛇添足！\n  最后一段，ok?  ";

    let document = engine.annotate(raw).await.unwrap();

    assert_eq!(document.original, raw);
    assert_eq!(document.paragraphs.len(), 3);
    for paragraph in &document.paragraphs {
        assert_eq!(paragraph.reconstructed_text(), paragraph.text);
        assert_eq!(paragraph.tokens.len(), paragraph.text.chars().count());
    }
    assert_eq!(document.paragraphs[2].text, "最后一段，ok?");
}

#[tokio::test]
async fn test_annotate_withAdjacentIdioms_shouldProduceTwoGroupsAndNoPlainTokens() {
    let engine = engine_with(MockLexicon::working(), &["一心一意", "不可思议"]);
    let document = engine.annotate("一心一意不可思议").await.unwrap();

    let paragraph = &document.paragraphs[0];
    assert!(paragraph.tokens.iter().all(|t| t.is_idiom()));

    let groups = paragraph.idiom_groups();
    assert_eq!(groups.len(), 2);
    assert_eq!((groups[0].idiom, groups[0].start), ("一心一意", 0));
    assert_eq!((groups[1].idiom, groups[1].start), ("不可思议", 4));
    assert_ne!(groups[0].id, groups[1].id);
}

#[tokio::test]
async fn test_annotate_withOverlappingIdioms_shouldGroupOnlyTheLeftmost() {
    let engine = engine_with(MockLexicon::working(), &["一心一意", "心一意不"]);
    let document = engine.annotate("一心一意不").await.unwrap();

    let paragraph = &document.paragraphs[0];
    let groups = paragraph.idiom_groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].idiom, "一心一意");
    assert!(!paragraph.tokens[4].is_idiom());
}

#[tokio::test]
async fn test_annotate_idiomGroupShouldMarkPositions() {
    let engine = engine_with(MockLexicon::working(), &["守株待兔"]);
    let document = engine.annotate("别守株待兔").await.unwrap();

    let positions: Vec<Option<IdiomPosition>> = document.paragraphs[0]
        .tokens
        .iter()
        .map(|t| t.idiom_group.as_ref().map(|g| g.position))
        .collect();
    assert_eq!(
        positions,
        vec![
            None,
            Some(IdiomPosition::First),
            Some(IdiomPosition::Middle),
            Some(IdiomPosition::Middle),
            Some(IdiomPosition::Last),
        ]
    );
}

#[tokio::test]
async fn test_annotate_withRepeatedCharacters_shouldKeepOrderAndEntries() {
    let table = TableLexicon::from_triples([
        ("人", "rén", "person"),
        ("不", "bù", "not"),
        ("是", "shì", "to be"),
    ]);
    let engine = engine_with(table, &[]);
    let document = engine.annotate("人不是人").await.unwrap();

    let pinyin: Vec<&str> = document.paragraphs[0].tokens.iter().map(|t| t.pinyin.as_str()).collect();
    assert_eq!(pinyin, vec!["rén", "bù", "shì", "rén"]);
}

#[tokio::test]
async fn test_annotate_calledTwice_shouldReturnEqualDocuments() {
    let engine = engine_with(MockLexicon::working(), &["马马虎虎"]);
    let raw = "他做事马马虎虎。\n马马虎虎！";

    let first = engine.annotate(raw).await.unwrap();
    let second = engine.annotate(raw).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_annotate_withBlankInput_shouldNotCallProvider() {
    let lexicon = MockLexicon::working();
    let engine = engine_with(lexicon.clone(), &[]);

    for raw in ["", "   ", "\n\r\n\t \n"] {
        let document = engine.annotate(raw).await.unwrap();
        assert!(document.paragraphs.is_empty());
        assert_eq!(document.original, raw);
    }
    assert_eq!(lexicon.request_count(), 0);
}

#[tokio::test]
async fn test_annotate_withSingleLookupProvider_shouldAnnotateEveryCharacter() {
    let lexicon = RecordingLexicon::new();
    let engine = engine_with(lexicon.clone(), &["对牛弹琴"]);

    let document = engine.annotate("对牛弹琴，牛").await.unwrap();

    let tokens = &document.paragraphs[0].tokens;
    assert_eq!(tokens[1].pinyin, "pin-牛");
    assert_eq!(tokens[5].translation, "def-牛");
    // Repeated characters reach the provider once per call
    assert_eq!(lexicon.seen().iter().filter(|u| u.as_str() == "牛").count(), 1);
}

#[tokio::test]
async fn test_annotate_jsonShouldUseRendererFieldNames() {
    let engine = engine_with(MockLexicon::working(), &["一心一意"]);
    let document = engine.annotate("一心一意好").await.unwrap();

    let json = serde_json::to_value(&document).unwrap();
    let tokens = &json["paragraphs"][0]["tokens"];

    assert_eq!(json["original"], "一心一意好");
    assert_eq!(tokens[0]["text"], "一");
    assert_eq!(tokens[0]["idiomGroup"]["idiom"], "一心一意");
    assert_eq!(tokens[0]["idiomGroup"]["position"], "first");
    assert!(tokens[4].get("idiomGroup").is_none());
    assert!(tokens[4].get("fallback").is_none());
}

#[tokio::test]
async fn test_annotate_stats_shouldCountIdiomsAndTokens() {
    let engine = engine_with(MockLexicon::working(), &["入乡随俗", "亡羊补牢"]);
    let document = engine.annotate("入乡随俗\n亡羊补牢，入乡随俗").await.unwrap();

    let stats = document.stats();
    assert_eq!(stats.paragraphs, 2);
    assert_eq!(stats.tokens, 13);
    assert_eq!(stats.idioms, 3);
    assert_eq!(stats.idiom_tokens, 12);
    assert_eq!(stats.fallbacks, 0);
}
