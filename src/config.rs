//! Configuration: planner tuning, ontology and lexicon in one TOML file.
//!
//! ```toml
//! [planner]
//! summary_threshold = 4
//! full_disclosure = false
//!
//! [[property]]
//! name = "firstAuthor"
//! generalizes = ["hasAuthor"]
//!
//! [[class]]
//! name = "Person"
//! person = true
//! name_property = "name"
//!
//! [[template]]
//! kind = "transitive"
//! property = "hasAuthor"
//! verb = "write"
//! subject = "target"
//! tense = "past"
//! ```
//!
//! Semantic graphs are read separately, as JSON [`GraphDocument`]s.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ProseResult};
use crate::grammar::{TemplateDecl, TemplateLexicon};
use crate::graph::{GraphDocument, NodeId, SemanticGraph};
use crate::ontology::{ClassDecl, OntologyDocument, PropertyDecl, StaticOntology};

/// Tuning knobs for one planning request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Realize every sibling instead of summarizing long lists.
    #[serde(default)]
    pub full_disclosure: bool,
    /// More sibling edges than this collapse into a summary ("5 cities").
    #[serde(default = "default_summary_threshold")]
    pub summary_threshold: usize,
    /// Score weight of a gapped copula.
    #[serde(default = "default_copula_gap_weight")]
    pub copula_gap_weight: f32,
    /// Combinations scoring below this are discarded.
    #[serde(default = "default_min_score")]
    pub min_score: f32,
    /// Upper bound on clauses merged into one combination.
    #[serde(default = "default_max_conjuncts")]
    pub max_conjuncts: usize,
    /// The reader; never referred to by pronoun.
    #[serde(default)]
    pub user: Option<NodeId>,
}

fn default_summary_threshold() -> usize {
    4
}
fn default_copula_gap_weight() -> f32 {
    0.4
}
fn default_min_score() -> f32 {
    1.0
}
fn default_max_conjuncts() -> usize {
    3
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            full_disclosure: false,
            summary_threshold: default_summary_threshold(),
            copula_gap_weight: default_copula_gap_weight(),
            min_score: default_min_score(),
            max_conjuncts: default_max_conjuncts(),
            user: None,
        }
    }
}

/// Everything a configuration file declares.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProseConfig {
    #[serde(default)]
    pub planner: PlanConfig,
    #[serde(default, rename = "property")]
    pub properties: Vec<PropertyDecl>,
    #[serde(default, rename = "class")]
    pub classes: Vec<ClassDecl>,
    #[serde(default, rename = "template")]
    pub templates: Vec<TemplateDecl>,
}

impl ProseConfig {
    /// Parse configuration text; `origin` names the source in errors.
    pub fn from_toml_str(text: &str, origin: &str) -> ProseResult<Self> {
        toml::from_str(text).map_err(|e| {
            ConfigError::Parse {
                path: origin.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> ProseResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text, &path.display().to_string())
    }

    /// Split into planner settings, ontology and validated lexicon.
    pub fn into_parts(self) -> ProseResult<(PlanConfig, StaticOntology, TemplateLexicon)> {
        let ontology = StaticOntology::from_document(OntologyDocument {
            properties: self.properties,
            classes: self.classes,
        });
        let lexicon = TemplateLexicon::from_decls(self.templates)?;
        Ok((self.planner, ontology, lexicon))
    }
}

/// Read a JSON graph document and build the graph.
///
/// Returns the document's default root alongside the graph.
pub fn load_graph(path: &Path) -> ProseResult<(SemanticGraph, Option<NodeId>)> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let doc: GraphDocument =
        serde_json::from_str(&text).map_err(|e| ConfigError::GraphDocument {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    let root = doc.root;
    let graph = SemanticGraph::from_document(doc)?;
    Ok((graph, root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProseError;
    use crate::grammar::Lexicon;
    use crate::ontology::Ontology;

    #[test]
    fn defaults_match_documented_values() {
        let c = PlanConfig::default();
        assert_eq!(c.summary_threshold, 4);
        assert_eq!(c.max_conjuncts, 3);
        assert!((c.copula_gap_weight - 0.4).abs() < f32::EPSILON);
        assert!(!c.full_disclosure);
    }

    #[test]
    fn partial_planner_section_keeps_defaults() {
        let cfg = ProseConfig::from_toml_str("[planner]\nfull_disclosure = true\nuser = 7\n", "inline")
            .unwrap();
        assert!(cfg.planner.full_disclosure);
        assert_eq!(cfg.planner.summary_threshold, 4);
        assert_eq!(cfg.planner.user, NodeId::new(7));
    }

    #[test]
    fn empty_config_is_valid() {
        let cfg = ProseConfig::from_toml_str("", "inline").unwrap();
        let (plan, _, lexicon) = cfg.into_parts().unwrap();
        assert_eq!(plan, PlanConfig::default());
        assert!(lexicon.is_empty());
    }

    #[test]
    fn sections_feed_ontology_and_lexicon() {
        let src = r#"
            [[property]]
            name = "firstAuthor"
            generalizes = ["hasAuthor"]

            [[class]]
            name = "Person"
            person = true

            [[template]]
            kind = "transitive"
            property = "hasAuthor"
            verb = "write"
            subject = "target"
        "#;
        let (_, ontology, lexicon) = ProseConfig::from_toml_str(src, "inline")
            .unwrap()
            .into_parts()
            .unwrap();
        assert_eq!(ontology.super_properties("firstAuthor"), vec!["hasAuthor".to_string()]);
        assert!(ontology.is_person_class("Person"));
        assert!(lexicon.lookup("hasAuthor").is_some());
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let err = ProseConfig::from_toml_str("[planner\n", "broken.toml").unwrap_err();
        assert!(matches!(err, ProseError::Config(ConfigError::Parse { .. })));
    }
}
