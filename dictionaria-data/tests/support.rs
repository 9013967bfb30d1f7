//! Shared fixtures for behavioural tests.
#![allow(dead_code)]

use std::{fs, path::PathBuf};

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

pub const METADATA: &str = r#"{
    "language": {"glottocode": "daak1235", "name": "Daakaka"},
    "authors": ["Kilu von Prince"],
    "date_published": "2017"
}"#;

pub const SENSES: &str = "ID,entry ID,description,example ID\n\
s1,1,dog,Abc.34\n\
s2,2,hunting dog,\n";

pub const CORPUS: &str = "\\utterance_id Abc.034\n\
\\utterance A beiko.\n\
\\gramm_units a beiko\n\
\\rp_gloss DET child\n\
\\ft The child.\n";

/// Entry table with a dog entry associated with `target` through `header`.
pub fn entries(header: &str, target: &str) -> String {
    format!("ID,headword,part-of-speech,{header}\n1,dog,n,{target}\n2,hound,n,\n")
}

pub fn feature_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/features")
        .join(name)
}

/// Assert that the scenario titles of a feature file appear in `expected`
/// order, so `index = N` attributes stay aligned.
pub fn assert_scenario_order(feature: &str, expected: &[&str]) {
    let path = feature_path(feature);
    let contents = fs::read_to_string(&path).unwrap_or_else(|err| {
        panic!("failed to read feature file {path:?}: {err}");
    });
    let titles: Vec<&str> = contents
        .lines()
        .filter_map(|line| line.trim().strip_prefix("Scenario: "))
        .collect();
    assert_eq!(
        titles, expected,
        "scenario order changed in {feature}; update the scenario indices"
    );
}

/// Temporary directory of submissions.
pub struct Workspace {
    _guard: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let guard = TempDir::new().expect("create workspace");
        let root = Utf8PathBuf::from_path_buf(guard.path().to_path_buf()).expect("utf-8 tempdir");
        Self {
            _guard: guard,
            root,
        }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn write(&self, relative: &str, contents: &str) -> Utf8PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directories");
        }
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    /// Write a complete submission under `<root>/submissions/<id>`.
    pub fn write_submission(&self, id: &str, entries: &str) -> Utf8PathBuf {
        let base = format!("submissions/{id}");
        self.write(&format!("{base}/md.json"), METADATA);
        self.write(&format!("{base}/entries.csv"), entries);
        self.write(&format!("{base}/senses.csv"), SENSES);
        self.write(&format!("{base}/corpus/abc.eaf.sfm"), CORPUS);
        self.root.join(base)
    }
}
