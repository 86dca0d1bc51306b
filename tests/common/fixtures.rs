//! Test fixtures for integration tests.

use std::io::Write;
use std::path::PathBuf;

use cinematch::CatalogItem;
use tempfile::TempDir;

/// A handful of rental-store films with distinct themes.
pub fn sample_films() -> Vec<CatalogItem> {
    vec![
        CatalogItem::new(
            1u64,
            "ACADEMY DINOSAUR",
            "A Epic Drama of a Feminist And a Mad Scientist who must Battle a Teacher in The Canadian Rockies",
            "PG",
        ),
        CatalogItem::new(
            2u64,
            "ALIEN CENTER",
            "A Brilliant Drama of a Cat And a Mad Scientist who must Battle a Feminist in A MySQL Convention",
            "NC-17",
        ),
        CatalogItem::new(
            3u64,
            "GALAXY SWEETHEARTS",
            "A Emotional Reflection of a Womanizer And a Pioneer who must Face a Squirrel in Berlin",
            "R",
        ),
        CatalogItem::new(
            4u64,
            "SPACE ODYSSEY",
            "Astronauts and aliens drift through deep space aboard a silent starship",
            "PG-13",
        ),
        CatalogItem::new(
            5u64,
            "SHARK OCEAN",
            "A Boring Story of a Shark And a Lumberjack who must Sink a Submarine in The Ocean",
            "G",
        ),
    ]
}

/// Raw JSON rows in the export format, including rows the loader must skip.
pub fn sample_catalog_json() -> serde_json::Value {
    serde_json::json!([
        {"id": 1, "title": "ACADEMY DINOSAUR", "description": "A Epic Drama of a Feminist And a Mad Scientist", "rating": "PG"},
        {"id": 2, "title": "ALIEN CENTER", "description": "Aliens invade a space station", "rating": "NC-17"},
        {"id": 3, "title": "BLANK REEL", "description": "   ", "rating": "G"},
        {"id": 4, "title": "NULL REEL", "description": null, "rating": "G"},
        {"id": "tt-5", "title": "SHARK OCEAN", "description": "A shark sinks a submarine in the ocean", "category": "R"}
    ])
}

/// A temporary catalog file; the directory lives as long as the fixture.
pub struct CatalogFile {
    _dir: TempDir,
    pub path: PathBuf,
}

impl CatalogFile {
    pub fn new(rows: &serde_json::Value) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("catalog.json");
        let file = Self { _dir: dir, path };
        file.write(rows);
        file
    }

    /// Rewrites the file in place.
    pub fn write(&self, rows: &serde_json::Value) {
        let mut f = std::fs::File::create(&self.path).expect("Failed to create catalog file");
        f.write_all(rows.to_string().as_bytes())
            .expect("Failed to write catalog file");
    }
}
