//! Projects loaded from a directory tree.

use std::fs;
use std::sync::Arc;
use std::thread;

use pklsem::Error;
use pklsem::project::{Config, Project, file_uri, load_directory};
use tempfile::TempDir;

use crate::helpers::source_fixtures::{ANNOTATIONS, SERVER_LIB, SERVER_MAIN};

fn server_tree() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("lib")).unwrap();
    fs::write(dir.path().join("lib/server.pkl"), SERVER_LIB).unwrap();
    fs::write(dir.path().join("main.pkl"), SERVER_MAIN).unwrap();
    fs::write(dir.path().join("annotations.pkl"), ANNOTATIONS).unwrap();
    fs::write(dir.path().join("README.md"), "# not a module").unwrap();
    dir
}

#[test]
fn test_loaded_modules_resolve_each_other() {
    let dir = server_tree();
    let project = Project::new(Config::default()).unwrap();
    let uris = load_directory(&project, dir.path()).unwrap();
    assert_eq!(uris.len(), 3);

    let root = dir.path().canonicalize().unwrap();
    let main_uri = file_uri(&root.join("main.pkl"));
    let main = project.document(&main_uri).expect("main.pkl is open");
    assert_eq!(main.version(), 0);

    let ctx = project.context_for(&main_uri).unwrap();
    let lib = ctx
        .resolve_import(&main, "lib/server.pkl")
        .expect("relative import resolves");
    assert_eq!(lib.document().uri(), file_uri(&root.join("lib/server.pkl")));
}

#[test]
fn test_analyze_all_loaded_modules() {
    let dir = server_tree();
    let project = Project::new(Config::default()).unwrap();
    load_directory(&project, dir.path()).unwrap();

    let results = project.analyze_all();
    assert_eq!(results.len(), 3);
    for (uri, report) in &results {
        let report = report.as_ref().unwrap();
        if uri.ends_with("/annotations.pkl") {
            assert_eq!(report.keys(), ["typeIsAbstract", "notAnnotation", "cannotFindType"]);
        } else {
            assert!(report.diagnostics.is_empty(), "{uri}: {:?}", report.keys());
        }
    }
}

#[test]
fn test_concurrent_updates_and_queries() {
    let project = Arc::new(Project::new(Config::default()).unwrap());
    project.open("file:///a.pkl", 0, "x = 0\n");

    let writer = {
        let project = project.clone();
        thread::spawn(move || {
            for version in 1..50 {
                project.update("file:///a.pkl", version, format!("x = {version}\n"));
            }
        })
    };
    for _ in 0..50 {
        match project.analyze("file:///a.pkl") {
            Ok(report) => assert!(report.diagnostics.is_empty()),
            Err(Error::Cancelled) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    writer.join().unwrap();

    assert_eq!(project.document("file:///a.pkl").unwrap().version(), 49);
    assert_eq!(project.document("file:///a.pkl").unwrap().text(), "x = 49\n");
}
