//! Configuration and graph documents read from disk.

use std::path::Path;

use akh_prose::config::{load_graph, ProseConfig};
use akh_prose::error::{ConfigError, GrammarError, ProseError};
use akh_prose::graph::NodeId;
use akh_prose::planner::ContentPlanner;

const CONFIG: &str = r#"
[planner]
summary_threshold = 2

[[property]]
name = "hasAuthor"
inverse = "authorOf"

[[class]]
name = "Person"
person = true
name_property = "name"

[[class]]
name = "Paper"
name_property = "name"

[[template]]
kind = "transitive"
property = "hasAuthor"
verb = "write"
subject = "target"
tense = "past"

[[template]]
kind = "attribute"
property = "title"
noun = "title"

[[template]]
kind = "tree"
property = "venue"

[template.root]
cat = "smain"

[[template.root.children]]
cat = "np"
role = "subject"
slot = "source"

[[template.root.children]]
cat = "verb"
role = "head"
word = "appear"
morph = { tense = "past" }

[[template.root.children]]
cat = "pp"
role = "pp_modifier"

[[template.root.children.children]]
cat = "prep"
role = "head"
word = "in"

[[template.root.children.children]]
cat = "np"
role = "object"
slot = "target"
"#;

const GRAPH: &str = r#"{
  "root": 1,
  "nodes": [
    { "id": 1, "class": "Paper" },
    { "id": 2, "class": "Person" },
    { "id": 3, "class": "string", "value": { "type": "text", "value": "Ada" } },
    { "id": 4, "class": "string", "value": { "type": "text", "value": "P1" } },
    { "id": 5, "class": "string", "value": { "type": "text", "value": "Notes" } }
  ],
  "edges": [
    { "source": 1, "target": 2, "property": "hasAuthor" },
    { "source": 2, "target": 3, "property": "name" },
    { "source": 1, "target": 4, "property": "name" },
    { "source": 1, "target": 5, "property": "venue" }
  ]
}"#;

fn write(dir: &Path, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

#[test]
fn files_on_disk_drive_a_plan() {
    let dir = tempfile::TempDir::new().unwrap();
    let config_path = write(dir.path(), "prose.toml", CONFIG);
    let graph_path = write(dir.path(), "graph.json", GRAPH);

    let config = ProseConfig::load(&config_path).unwrap();
    assert_eq!(config.planner.summary_threshold, 2);
    assert_eq!(config.templates.len(), 3);
    let (plan_config, ontology, lexicon) = config.into_parts().unwrap();

    let (graph, root) = load_graph(&graph_path).unwrap();
    assert_eq!(root, NodeId::new(1));
    assert_eq!(graph.node_count(), 5);

    let planner = ContentPlanner::new(&ontology, &lexicon, plan_config);
    let plan = planner.plan(&graph, root.unwrap()).unwrap();
    assert_eq!(plan.preview(), "P1\nAda wrote P1. It appeared in \"Notes\".");
}

#[test]
fn missing_config_file_reports_its_path() {
    let dir = tempfile::TempDir::new().unwrap();
    let missing = dir.path().join("absent.toml");
    let err = ProseConfig::load(&missing).unwrap_err();
    match err {
        ProseError::Config(ConfigError::Read { path, .. }) => {
            assert!(path.ends_with("absent.toml"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn zero_node_id_is_rejected() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write(dir.path(), "bad.json", r#"{ "nodes": [ { "id": 0, "class": "Paper" } ] }"#);
    let err = load_graph(&path).unwrap_err();
    assert!(matches!(err, ProseError::Config(ConfigError::GraphDocument { .. })));
}

#[test]
fn edges_to_unknown_nodes_are_graph_errors() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "dangling.json",
        r#"{ "nodes": [ { "id": 1, "class": "Paper" } ],
             "edges": [ { "source": 1, "target": 9, "property": "cites" } ] }"#,
    );
    let err = load_graph(&path).unwrap_err();
    assert!(matches!(err, ProseError::Graph(_)));
}

#[test]
fn template_without_slots_is_rejected() {
    let text = r#"
        [[template]]
        kind = "tree"
        property = "odd"

        [template.root]
        cat = "smain"

        [[template.root.children]]
        cat = "verb"
        role = "head"
        word = "exist"
    "#;
    let err = ProseConfig::from_toml_str(text, "inline")
        .unwrap()
        .into_parts()
        .unwrap_err();
    assert!(matches!(
        err,
        ProseError::Grammar(GrammarError::InvalidTemplate { .. })
    ));
}
