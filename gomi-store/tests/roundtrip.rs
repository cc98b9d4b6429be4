//! End-to-end snapshot round trip through the service facade.

use std::sync::Arc;

use gomi_core::days::Weekday;
use gomi_core::error::CatalogError;
use gomi_core::model::{CategoryPatch, NewCategory};
use gomi_core::seed::default_snapshot;
use gomi_store::{CatalogStore, GomiService, ImportPolicy, SearchOutcome};

fn service() -> GomiService {
    GomiService::new(Arc::new(CatalogStore::open_in_memory().unwrap()))
}

#[test]
fn seed_export_import_reproduces_catalog() {
    let source = service();
    source
        .import(&default_snapshot(), ImportPolicy::ReplaceAll)
        .unwrap();

    let doc = source.export().unwrap();
    let text = doc.to_json_string().unwrap();

    let copy = service();
    let report = copy.import_json(&text, ImportPolicy::ReplaceAll).unwrap();

    assert_eq!(report.imported_categories, 4);
    assert_eq!(report.total_categories, 4);
    assert_eq!(report.total_garbage_types, 10);

    let source_names: Vec<String> = source
        .categories()
        .unwrap()
        .into_iter()
        .map(|category| category.name)
        .collect();
    let copy_names: Vec<String> = copy
        .categories()
        .unwrap()
        .into_iter()
        .map(|category| category.name)
        .collect();
    assert_eq!(source_names, copy_names);
}

#[test]
fn schedule_and_search_work_through_the_facade() {
    let service = service();
    service
        .import(&default_snapshot(), ImportPolicy::ReplaceAll)
        .unwrap();

    // 可燃ゴミ is seeded in the legacy single-literal form and must still
    // resolve for its day.
    let monday = service.by_day(Some(Weekday::Monday)).unwrap();
    assert_eq!(monday.len(), 1);
    assert_eq!(monday[0].name, "可燃ゴミ");

    match service.find_by_name("ペットボトル").unwrap() {
        SearchOutcome::Found(hits) => {
            assert_eq!(hits[0].category.name, "資源ゴミ");
        }
        SearchOutcome::NotFound => panic!("seeded item must be findable"),
    }
}

#[test]
fn crud_flow_keeps_invariants() {
    let service = service();
    let created = service
        .create_category(&NewCategory {
            name: "ビン・カン".to_owned(),
            days: vec![Weekday::Wednesday],
            method: "コンテナへ".to_owned(),
            special_days: Vec::new(),
            notion: None,
            types: vec!["ビン".to_owned(), "カン".to_owned()],
        })
        .unwrap();

    let patch = CategoryPatch {
        days: Some(vec![Weekday::Wednesday, Weekday::Saturday]),
        types: Some(vec!["ビン".to_owned()]),
        ..CategoryPatch::default()
    };
    let updated = service.update_category(created.id, &patch).unwrap();
    assert_eq!(updated.days, vec![Weekday::Wednesday, Weekday::Saturday]);
    assert_eq!(updated.types.len(), 1);

    service.delete_category(created.id).unwrap();
    assert!(matches!(
        service.category(created.id).unwrap_err(),
        CatalogError::NotFound(_)
    ));
    assert!(matches!(
        service.find_by_name("ビン").unwrap(),
        SearchOutcome::NotFound
    ));
}

#[test]
fn malformed_document_text_is_rejected() {
    let service = service();
    let err = service
        .import_json("{\"metadata\": {}}", ImportPolicy::MergeSkipExisting)
        .unwrap_err();
    assert!(matches!(err, CatalogError::MalformedDocument(_)));
    assert_eq!(service.categories().unwrap().len(), 0);
}
