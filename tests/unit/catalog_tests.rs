/*!
 * Tests for idiom catalog loading
 */

use hanzi_annotator::annotation::IdiomCatalog;
use hanzi_annotator::errors::CatalogError;

use crate::common;

#[test]
fn test_catalog_fromFile_shouldKeepFileOrder() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        dir.path(),
        "idioms.txt",
        "# test catalog\n不可思议\n一心一意\n\n不可思议\n",
    )
    .unwrap();

    let catalog = IdiomCatalog::from_file(&path).unwrap();
    assert_eq!(catalog.iter().collect::<Vec<_>>(), vec!["不可思议", "一心一意"]);
}

#[test]
fn test_catalog_fromFile_withMissingFile_shouldReturnIoError() {
    let dir = common::create_temp_dir().unwrap();
    let result = IdiomCatalog::from_file(&dir.path().join("missing.txt"));
    assert!(matches!(result, Err(CatalogError::Io(_))));
}

#[test]
fn test_catalog_entries_shouldExposeCharacters() {
    let catalog = IdiomCatalog::new(["画蛇添足"]).unwrap();
    assert_eq!(catalog.entries()[0].chars, vec!['画', '蛇', '添', '足']);
}

#[test]
fn test_catalog_builtin_shouldNotBeEmpty() {
    let catalog = IdiomCatalog::builtin();
    assert!(!catalog.is_empty());
    assert!(catalog.iter().all(|idiom| idiom.chars().count() == 4));
}
