//! On-disk submission fixtures shared by unit and behaviour tests.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

pub const DAAKAKA_MD: &str = r#"{
    "language": {"glottocode": "daak1235", "name": "Daakaka"},
    "authors": ["Kilu von Prince"],
    "date_published": "2017",
    "properties": {"custom_fields": ["dialect"], "labels": {"dialect": "Dialect"}}
}"#;

pub const DOG_ENTRIES: &str = "ID,headword,part-of-speech,dialect,associated lemma\n\
1,dog,n,north,2\n\
2,hound,n,,\n";

pub const DOG_SENSES: &str = "ID,entry ID,description,example ID\n\
s1,1,dog ; domestic dog,Bei.1\n\
s2,2,hunting dog,\n";

pub const BEIKO_CORPUS: &str = "\\utterance_id Bei.001\n\
\\utterance A beiko.\n\
\\gramm_units a beiko\n\
\\rp_gloss DET child\n\
\\ft The child.\n";

/// Temporary directory holding submissions.
pub struct SubmissionsRoot {
    _guard: TempDir,
    path: Utf8PathBuf,
}

impl SubmissionsRoot {
    pub fn new() -> Self {
        let guard = TempDir::new().expect("create submissions root");
        let path = Utf8PathBuf::from_path_buf(guard.path().to_path_buf()).expect("utf-8 tempdir");
        Self {
            _guard: guard,
            path,
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Write `files` (relative path, contents) under `<root>/<id>`.
    pub fn write(&self, id: &str, files: &[(&str, &str)]) -> Utf8PathBuf {
        let dir = self.path.join(id);
        for (name, contents) in files {
            let path = dir.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("create submission dirs");
            }
            fs::write(&path, contents).expect("write submission file");
        }
        dir
    }

    /// A complete submission with two entries, two senses and a corpus.
    pub fn write_dog_submission(&self, id: &str) -> Utf8PathBuf {
        self.write(
            id,
            &[
                ("md.json", DAAKAKA_MD),
                ("entries.csv", DOG_ENTRIES),
                ("senses.csv", DOG_SENSES),
                ("corpus/beiko.eaf.sfm", BEIKO_CORPUS),
            ],
        )
    }
}
