//! Test helpers for laying out submissions and concept lists on disk.

use super::*;
use std::fs;
use tempfile::TempDir;

const METADATA: &str = r#"{
    "language": {"glottocode": "daak1235", "name": "Daakaka"},
    "authors": ["Kilu von Prince"],
    "date_published": "2017"
}"#;

const ENTRIES: &str = "ID,headword,part-of-speech\n1,dog,n\n2,hound,n\n";

const SENSES: &str = "ID,entry ID,description\ns1,1,dog ; domestic dog\ns2,2,hunting dog\n";

const CONCEPTS: &str = "ID,GLOSS,DEFINITION\n2009,DOG,domesticated canine\n";

/// A temporary tree holding `submissions/`, `concepts/` and a database path.
pub(super) struct LoadTree {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl LoadTree {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        fs::create_dir_all(root.join("submissions")).expect("create submissions dir");
        Self { _dir: dir, root }
    }

    pub(super) fn submissions_dir(&self) -> Utf8PathBuf {
        self.root.join("submissions")
    }

    pub(super) fn concepts_dir(&self) -> Utf8PathBuf {
        self.root.join("concepts")
    }

    pub(super) fn database(&self) -> Utf8PathBuf {
        self.root.join("out").join("dictionaria.sqlite")
    }

    pub(super) fn write_concepts(&self) {
        let dir = self.concepts_dir();
        fs::create_dir_all(&dir).expect("create concepts dir");
        fs::write(dir.join("concepts.csv"), CONCEPTS).expect("write concepts");
    }

    pub(super) fn write_submission(&self, id: &str) {
        self.write_files(
            id,
            &[
                ("md.json", METADATA),
                ("entries.csv", ENTRIES),
                ("senses.csv", SENSES),
            ],
        );
    }

    /// A submission whose sense table is missing.
    pub(super) fn write_broken_submission(&self, id: &str) {
        self.write_files(id, &[("md.json", METADATA), ("entries.csv", ENTRIES)]);
    }

    fn write_files(&self, id: &str, files: &[(&str, &str)]) {
        let dir = self.submissions_dir().join(id);
        fs::create_dir_all(&dir).expect("create submission dir");
        for (name, contents) in files {
            fs::write(dir.join(name), contents).expect("write submission file");
        }
    }

    pub(super) fn config(&self) -> LoadConfig {
        LoadConfig {
            submissions_dir: self.submissions_dir(),
            concepts_dir: Some(self.concepts_dir()),
            database: self.database(),
            only: None,
        }
    }
}
