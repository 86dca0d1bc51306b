use super::*;
use std::io::Write;

fn write_catalog(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    file.write_all(json.as_bytes()).expect("write catalog");
    file.flush().expect("flush catalog");
    file
}

mod item_tests {
    use super::*;

    #[test]
    fn test_catalog_id_accepts_strings_and_integers() {
        let ids: Vec<CatalogId> = serde_json::from_str(r#"["film-1", 42, -7]"#).unwrap();
        assert_eq!(ids[0].as_str(), "film-1");
        assert_eq!(ids[1].as_str(), "42");
        assert_eq!(ids[2].as_str(), "-7");
    }

    #[test]
    fn test_catalog_id_serializes_as_plain_string() {
        let id = CatalogId::from(17u64);
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""17""#);
    }

    #[test]
    fn test_has_usable_description() {
        assert!(CatalogItem::new("1", "A", "space", "PG").has_usable_description());
        assert!(!CatalogItem::new("2", "B", " \t\n", "PG").has_usable_description());
        assert!(!CatalogItem::new("3", "C", "", "PG").has_usable_description());
    }

    #[test]
    fn test_filter_usable_drops_blank_and_missing_descriptions() {
        let rows: Vec<CatalogRow> = serde_json::from_str(
            r#"[
                {"id": 1, "title": "A", "description": "a space adventure", "category": "PG"},
                {"id": 2, "title": "B", "description": null, "category": "R"},
                {"id": 3, "title": "C", "description": "   ", "category": "R"},
                {"id": 4, "title": "D", "category": "G"},
                {"id": 5, "title": "E", "description": "a romance", "category": "G"}
            ]"#,
        )
        .unwrap();

        let items = filter_usable(rows);
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "E"]);
    }

    #[test]
    fn test_filter_usable_keeps_first_duplicate_id() {
        let rows: Vec<CatalogRow> = serde_json::from_str(
            r#"[
                {"id": 1, "title": "First", "description": "one"},
                {"id": "1", "title": "Second", "description": "two"}
            ]"#,
        )
        .unwrap();

        let items = filter_usable(rows);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "First");
        assert_eq!(items[0].category, "");
    }

    #[test]
    fn test_row_accepts_rating_alias() {
        let rows: Vec<CatalogRow> = serde_json::from_str(
            r#"[{"id": 9, "title": "Z", "description": "zzz", "rating": "NC-17"}]"#,
        )
        .unwrap();
        assert_eq!(filter_usable(rows)[0].category, "NC-17");
    }

    #[test]
    fn test_catalog_stats() {
        let items = vec![
            CatalogItem::new("1", "A", "a", "PG"),
            CatalogItem::new("2", "B", "b", "R"),
            CatalogItem::new("3", "C", "c", "PG"),
        ];
        let stats = CatalogStats::from_items(&items);
        assert_eq!(stats.total_items, 3);
        assert_eq!(stats.distinct_categories, 2);

        let empty = CatalogStats::from_items(&[]);
        assert_eq!(empty.total_items, 0);
        assert_eq!(empty.distinct_categories, 0);
    }
}

mod json_loader_tests {
    use super::*;

    #[test]
    fn test_json_loader_reads_and_filters() {
        let file = write_catalog(
            r#"[
                {"id": 1, "title": "ACADEMY DINOSAUR", "description": "An epic drama of a feminist", "rating": "PG"},
                {"id": 2, "title": "ACE GOLDFINGER", "description": "", "rating": "G"}
            ]"#,
        );

        let loader = JsonCatalogLoader::new(file.path());
        let items = loader.load().expect("catalog should load");

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id.as_str(), "1");
        assert_eq!(items[0].category, "PG");
    }

    #[test]
    fn test_json_loader_missing_file() {
        let loader = JsonCatalogLoader::new("/definitely/not/here/catalog.json");
        let err = loader.load().unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
        assert_eq!(loader.revision(), Some(JsonCatalogLoader::MISSING_REVISION));
    }

    #[test]
    fn test_json_loader_malformed_file() {
        let file = write_catalog("{ not json");
        let loader = JsonCatalogLoader::new(file.path());
        let err = loader.load().unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn test_json_loader_revision_is_stable_and_tracks_length() {
        let mut file = write_catalog(r#"[{"id": 1, "title": "A", "description": "a"}]"#);
        let loader = JsonCatalogLoader::new(file.path());

        let first = loader.revision().expect("revision for existing file");
        assert_eq!(loader.revision(), Some(first));

        file.write_all(b" ").unwrap();
        file.flush().unwrap();
        assert_ne!(loader.revision(), Some(first));
    }

    #[test]
    fn test_json_loader_describe() {
        let loader = JsonCatalogLoader::new("data/catalog.json");
        assert_eq!(loader.describe(), "json:data/catalog.json");
        assert_eq!(loader.path(), std::path::Path::new("data/catalog.json"));
    }
}

mod in_memory_tests {
    use super::*;

    #[test]
    fn test_replace_bumps_revision_and_counts_loads() {
        let loader = InMemoryCatalogLoader::new(vec![CatalogItem::new("1", "A", "a", "PG")]);
        let rev = loader.revision();

        assert_eq!(loader.load().unwrap().len(), 1);
        assert_eq!(loader.load_count(), 1);

        loader.replace(vec![]);
        assert_ne!(loader.revision(), rev);
        assert!(loader.load().unwrap().is_empty());
        assert_eq!(loader.load_count(), 2);
    }

    #[test]
    fn test_failing_source() {
        let loader = InMemoryCatalogLoader::empty();
        loader.set_failing(true);
        assert!(matches!(
            loader.load(),
            Err(CatalogError::SourceUnavailable { .. })
        ));
        loader.set_failing(false);
        assert!(loader.load().is_ok());
    }
}
