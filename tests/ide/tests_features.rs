//! IDE features over a multi-document project.

use pklsem::TextSize;
use pklsem::ast::NodeKind;
use pklsem::ide::{CompletionKind, completions, goto_definition, hover};
use pklsem::project::{Config, Project};

use crate::helpers::pkl_helpers::CARET;
use crate::helpers::source_fixtures::{PERSON_MODULE, SERVER_LIB, SERVER_MAIN};

const LIB_URI: &str = "file:///p/lib/server.pkl";
const MAIN_URI: &str = "file:///p/main.pkl";

fn server_project() -> Project {
    let project = Project::new(Config::default()).expect("bundled base module loads");
    project.open(LIB_URI, 1, SERVER_LIB);
    project.open(MAIN_URI, 1, SERVER_MAIN);
    project
}

/// Offset just inside the `nth` occurrence of `needle` in the open text of `uri`.
fn offset_of(project: &Project, uri: &str, needle: &str, nth: usize) -> TextSize {
    let doc = project.document(uri).expect("document is open");
    let index = doc
        .text()
        .match_indices(needle)
        .nth(nth)
        .map(|(i, _)| i + 1)
        .unwrap_or_else(|| panic!("no occurrence {nth} of {needle:?}"));
    TextSize::from(index as u32)
}

#[test]
fn test_goto_across_documents() {
    let project = server_project();
    let main = project.document(MAIN_URI).unwrap();
    let ctx = project.context_for(MAIN_URI).unwrap();

    let at_port = offset_of(&project, MAIN_URI, ".port", 0);
    let result = goto_definition(&main, at_port, &ctx);
    let target = result.targets.first().expect("port has a definition");
    assert_eq!(&*target.uri, LIB_URI);
    assert_eq!(target.kind, NodeKind::ClassProperty);
    assert_eq!(target.name.as_deref(), Some("port"));

    let at_uri = offset_of(&project, MAIN_URI, "lib/server", 0);
    let result = goto_definition(&main, at_uri, &ctx);
    let target = result.targets.first().expect("import opens the module");
    assert_eq!(&*target.uri, LIB_URI);
    assert_eq!(target.kind, NodeKind::Module);
}

#[test]
fn test_goto_after_close_finds_nothing() {
    let project = server_project();
    project.close(LIB_URI);
    let main = project.document(MAIN_URI).unwrap();
    let ctx = project.context_for(MAIN_URI).unwrap();

    let at_port = offset_of(&project, MAIN_URI, ".port", 0);
    assert!(goto_definition(&main, at_port, &ctx).is_empty());
}

#[test]
fn test_hover_across_documents() {
    let project = server_project();
    let main = project.document(MAIN_URI).unwrap();
    let ctx = project.context_for(MAIN_URI).unwrap();

    let at_default = offset_of(&project, MAIN_URI, "default", 0);
    let result = hover(&main, at_default, &ctx).expect("default has hover");
    assert!(result.contents.contains("default: Endpoint"), "{}", result.contents);
}

#[test]
fn test_hover_shows_doc_comment() {
    let project = Project::new(Config::default()).unwrap();
    let doc = project.open("file:///person.pkl", 1, PERSON_MODULE);
    let ctx = project.context_for("file:///person.pkl").unwrap();

    let at_class = offset_of(&project, "file:///person.pkl", "Person {", 0);
    let result = hover(&doc, at_class, &ctx).expect("class has hover");
    assert!(result.contents.starts_with("```pkl\nclass Person"), "{}", result.contents);
    assert!(result.contents.contains("A person in the directory"));
}

#[test]
fn test_member_completion_on_imported_value() {
    let project = server_project();
    let source = format!("import \"lib/server.pkl\"\nx = server.default.{CARET}\n");
    let offset = source.find(CARET).unwrap();
    let doc = project.update(MAIN_URI, 2, source.replacen(CARET, "", 1));
    let ctx = project.context_for(MAIN_URI).unwrap();

    let items = completions(&doc, TextSize::from(offset as u32), &ctx);
    let host = items.iter().find(|i| &*i.label == "host").expect("host offered");
    assert_eq!(host.kind, CompletionKind::Property);
    assert_eq!(host.detail.as_deref(), Some("String"));
    assert!(items.iter().any(|i| &*i.label == "port"));
}

#[test]
fn test_module_completion_hides_local_members() {
    let project = server_project();
    let source = format!("import \"lib/server.pkl\"\nx = server.{CARET}\n");
    let offset = source.find(CARET).unwrap();
    let doc = project.update(MAIN_URI, 2, source.replacen(CARET, "", 1));
    let ctx = project.context_for(MAIN_URI).unwrap();

    let items = completions(&doc, TextSize::from(offset as u32), &ctx);
    let labels: Vec<_> = items.iter().map(|i| &*i.label).collect();
    assert!(labels.contains(&"default"), "{labels:?}");
    assert!(!labels.contains(&"secret"), "{labels:?}");
}
