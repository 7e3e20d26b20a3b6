use std::fs;
use std::path::{Path, PathBuf};

use factor_tagger::{BatchDriver, BatchError, RunConfig, Settings, build_tagger};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn english(settings: Settings) -> RunConfig {
    Settings {
        language: Some("english".into()),
        ..settings
    }
    .resolve()
    .expect("valid settings")
}

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[test]
fn factor_batch_writes_full_and_pos_trees() {
    let src = tempfile::tempdir().expect("temp dir");
    let out = tempfile::tempdir().expect("temp dir");
    write(src.path(), "a/x.txt", "Hello world.\n");
    let all = out.path().join("all");
    let pos = out.path().join("pos");

    let config = english(Settings {
        factor_list: Some("surface pos".into()),
        ..Settings::default()
    });
    let tagger = build_tagger(&config).unwrap();
    let report = BatchDriver::new(tagger.as_ref())
        .run(src.path(), &all, Some(&pos))
        .unwrap();

    assert_eq!(
        fs::read_to_string(all.join("a/x.txt")).unwrap(),
        "Hello|NNP world|NN .|.\n"
    );
    assert_eq!(fs::read_to_string(pos.join("a/x.txt")).unwrap(), "NNP NN .\n");
    assert_eq!(report.files_tagged, 1);
    assert_eq!(report.words, 3);
}

#[test]
fn tree_batch_ignores_pos_target() {
    let src = tempfile::tempdir().expect("temp dir");
    let out = tempfile::tempdir().expect("temp dir");
    write(src.path(), "doc.txt", "Go now. Stop.\n");
    let all = out.path().join("all");
    let pos = out.path().join("pos");

    let config = english(Settings {
        tagger_type: Some("tree".into()),
        ..Settings::default()
    });
    let tagger = build_tagger(&config).unwrap();
    BatchDriver::new(tagger.as_ref())
        .run(src.path(), &all, Some(&pos))
        .unwrap();

    let parsed = fs::read_to_string(all.join("doc.txt")).unwrap();
    assert_eq!(parsed.lines().count(), 1);
    assert!(parsed.starts_with("(MULTIS (S "));
    assert!(!pos.exists());
}

#[test]
fn eof_marker_closes_each_file() {
    let src = tempfile::tempdir().expect("temp dir");
    let out = tempfile::tempdir().expect("temp dir");
    write(src.path(), "one.txt", "dogs bark\ncats\n");
    write(src.path(), "two.txt", "");

    let config = english(Settings {
        eof_mark: Some(true),
        factor_list: Some("lemma".into()),
        ..Settings::default()
    });
    let tagger = build_tagger(&config).unwrap();
    BatchDriver::new(tagger.as_ref())
        .run(src.path(), out.path(), None)
        .unwrap();

    assert_eq!(
        fs::read_to_string(out.path().join("one.txt")).unwrap(),
        "dog bark\ncat\n__EOF__\n"
    );
    assert_eq!(
        fs::read_to_string(out.path().join("two.txt")).unwrap(),
        "__EOF__\n"
    );
}

#[test]
fn non_directory_target_stops_the_run() {
    let src = tempfile::tempdir().expect("temp dir");
    let out = tempfile::tempdir().expect("temp dir");
    write(src.path(), "x.txt", "hi\n");
    let target = out.path().join("taken");
    fs::write(&target, "a file").unwrap();

    let config = english(Settings::default());
    let tagger = build_tagger(&config).unwrap();
    let err = BatchDriver::new(tagger.as_ref())
        .run(src.path(), &target, None)
        .unwrap_err();
    assert!(matches!(err, BatchError::TargetNotDirectory(_)));
}

#[test]
fn model_files_drive_normalization() {
    let src = tempfile::tempdir().expect("temp dir");
    let out = tempfile::tempdir().expect("temp dir");
    write(src.path(), "in.txt", "Cats runs better .\n");

    let config = english(Settings {
        normalize_nouns: Some(true),
        normalize_verbs: Some(true),
        normalize_comparatives: Some(true),
        pos_model: Some(fixture("pos_model.tsv")),
        adj_form_dictionary: Some(fixture("adj_forms.tsv")),
        ..Settings::default()
    });
    let tagger = build_tagger(&config).unwrap();
    BatchDriver::new(tagger.as_ref())
        .run(src.path(), out.path(), None)
        .unwrap();

    assert_eq!(
        fs::read_to_string(out.path().join("in.txt")).unwrap(),
        "Cats|cat|NN runs|run|VB better|good|JJR .|.|.\n"
    );
}

#[test]
fn grammar_model_and_stems_in_trees() {
    let src = tempfile::tempdir().expect("temp dir");
    let out = tempfile::tempdir().expect("temp dir");
    write(src.path(), "in.txt", "cats runs better\n");

    let config = english(Settings {
        tagger_type: Some("tree".into()),
        normalize_nouns: Some(true),
        normalize_verbs: Some(true),
        normalize_comparatives: Some(true),
        tree_stem: Some(true),
        pos_model: Some(fixture("pos_model.tsv")),
        adj_form_dictionary: Some(fixture("adj_forms.tsv")),
        grammar_model: Some(fixture("grammar.tsv")),
        ..Settings::default()
    });
    let tagger = build_tagger(&config).unwrap();
    BatchDriver::new(tagger.as_ref())
        .run(src.path(), out.path(), None)
        .unwrap();

    assert_eq!(
        fs::read_to_string(out.path().join("in.txt")).unwrap(),
        "(S (NP (NN cat)) (VP (VB run)) (ADJP (JJR good)))\n"
    );
}
