//! Read-only ontology metadata: property hierarchy, inverses and class facts.
//!
//! The planner consults an [`Ontology`] but never mutates it. [`StaticOntology`]
//! is the bundled implementation: it is built once from an
//! [`OntologyDocument`] (usually the `[[property]]` and `[[class]]` tables of
//! the configuration file) and caches the transitive closure of the
//! `generalizes` relation, in the manner of Cyc's `genlPreds`.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::grammar::morpho;

/// Ontology metadata consulted by the segmenter and lexicalizer.
pub trait Ontology {
    /// All properties more general than `property`, nearest first.
    fn super_properties(&self, property: &str) -> Vec<String>;

    /// All properties more specific than `property`, nearest first.
    fn sub_properties(&self, property: &str) -> Vec<String>;

    /// The inverse property, if declared.
    fn inverse_of(&self, property: &str) -> Option<String>;

    /// Whether instances of `class` are people (relative pronoun "who").
    fn is_person_class(&self, class: &str) -> bool;

    /// The common noun used for instances of `class` ("research group").
    fn class_noun(&self, class: &str) -> String {
        morpho::humanize_class(class)
    }

    /// The property holding a display name for instances of `class`.
    fn name_property(&self, class: &str) -> Option<String>;

    /// The submenu grouping of `property` when shown on an instance of `class`.
    fn submenu(&self, property: &str, class: &str) -> Option<String>;
}

/// Declaration of one property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyDecl {
    pub name: String,
    /// Direct super-properties (`name` generalizes to each of these).
    #[serde(default)]
    pub generalizes: Vec<String>,
    #[serde(default)]
    pub inverse: Option<String>,
    #[serde(default)]
    pub submenu: Option<String>,
}

impl PropertyDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn generalizes(mut self, general: impl Into<String>) -> Self {
        self.generalizes.push(general.into());
        self
    }

    pub fn inverse(mut self, inverse: impl Into<String>) -> Self {
        self.inverse = Some(inverse.into());
        self
    }

    pub fn submenu(mut self, submenu: impl Into<String>) -> Self {
        self.submenu = Some(submenu.into());
        self
    }
}

/// Declaration of one class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    #[serde(default)]
    pub person: bool,
    /// Override for the common noun.
    #[serde(default)]
    pub noun: Option<String>,
    #[serde(default)]
    pub name_property: Option<String>,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn person(mut self) -> Self {
        self.person = true;
        self
    }

    pub fn noun(mut self, noun: impl Into<String>) -> Self {
        self.noun = Some(noun.into());
        self
    }

    pub fn name_property(mut self, property: impl Into<String>) -> Self {
        self.name_property = Some(property.into());
        self
    }
}

/// Serializable ontology description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OntologyDocument {
    #[serde(default, rename = "property")]
    pub properties: Vec<PropertyDecl>,
    #[serde(default, rename = "class")]
    pub classes: Vec<ClassDecl>,
}

impl OntologyDocument {
    pub fn property(mut self, decl: PropertyDecl) -> Self {
        self.properties.push(decl);
        self
    }

    pub fn class(mut self, decl: ClassDecl) -> Self {
        self.classes.push(decl);
        self
    }
}

/// Ontology built from static declarations.
///
/// `generalizations[P]` holds every property more general than P and
/// `specializations[P]` every property more specific, both in breadth-first
/// (nearest first) order.
#[derive(Debug, Clone, Default)]
pub struct StaticOntology {
    generalizations: BTreeMap<String, Vec<String>>,
    specializations: BTreeMap<String, Vec<String>>,
    inverses: BTreeMap<String, String>,
    submenus: BTreeMap<String, String>,
    classes: BTreeMap<String, ClassDecl>,
}

impl StaticOntology {
    /// An ontology with no declarations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the hierarchy closure and lookup tables.
    pub fn from_document(doc: OntologyDocument) -> Self {
        let mut parents_of: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut children_of: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut inverses = BTreeMap::new();
        let mut submenus = BTreeMap::new();

        for decl in &doc.properties {
            for general in &decl.generalizes {
                parents_of
                    .entry(decl.name.clone())
                    .or_default()
                    .push(general.clone());
                children_of
                    .entry(general.clone())
                    .or_default()
                    .push(decl.name.clone());
            }
            if let Some(inverse) = &decl.inverse {
                inverses.insert(decl.name.clone(), inverse.clone());
                inverses.insert(inverse.clone(), decl.name.clone()); // symmetric
            }
            if let Some(submenu) = &decl.submenu {
                submenus.insert(decl.name.clone(), submenu.clone());
            }
        }

        let all_props: BTreeSet<&String> = parents_of.keys().chain(children_of.keys()).collect();
        let mut generalizations = BTreeMap::new();
        let mut specializations = BTreeMap::new();
        for &prop in &all_props {
            let gens = closure(prop, &parents_of);
            if !gens.is_empty() {
                generalizations.insert(prop.clone(), gens);
            }
            let specs = closure(prop, &children_of);
            if !specs.is_empty() {
                specializations.insert(prop.clone(), specs);
            }
        }

        let classes = doc
            .classes
            .into_iter()
            .map(|c| (c.name.clone(), c))
            .collect();

        Self {
            generalizations,
            specializations,
            inverses,
            submenus,
            classes,
        }
    }
}

/// Breadth-first transitive closure over an adjacency map, nearest first.
fn closure(start: &str, adjacency: &BTreeMap<String, Vec<String>>) -> Vec<String> {
    let mut out = Vec::new();
    let mut visited = BTreeSet::new();
    let mut queue = VecDeque::new();
    visited.insert(start.to_string());
    queue.push_back(start.to_string());
    while let Some(current) = queue.pop_front() {
        if let Some(next) = adjacency.get(&current) {
            for n in next {
                if visited.insert(n.clone()) {
                    out.push(n.clone());
                    queue.push_back(n.clone());
                }
            }
        }
    }
    out
}

impl Ontology for StaticOntology {
    fn super_properties(&self, property: &str) -> Vec<String> {
        self.generalizations
            .get(property)
            .cloned()
            .unwrap_or_default()
    }

    fn sub_properties(&self, property: &str) -> Vec<String> {
        self.specializations
            .get(property)
            .cloned()
            .unwrap_or_default()
    }

    fn inverse_of(&self, property: &str) -> Option<String> {
        self.inverses.get(property).cloned()
    }

    fn is_person_class(&self, class: &str) -> bool {
        self.classes.get(class).is_some_and(|c| c.person)
    }

    fn class_noun(&self, class: &str) -> String {
        self.classes
            .get(class)
            .and_then(|c| c.noun.clone())
            .unwrap_or_else(|| morpho::humanize_class(class))
    }

    fn name_property(&self, class: &str) -> Option<String> {
        self.classes.get(class).and_then(|c| c.name_property.clone())
    }

    fn submenu(&self, property: &str, _class: &str) -> Option<String> {
        self.submenus.get(property).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> StaticOntology {
        // firstAuthor → hasAuthor → hasContributor
        StaticOntology::from_document(
            OntologyDocument::default()
                .property(PropertyDecl::new("firstAuthor").generalizes("hasAuthor"))
                .property(
                    PropertyDecl::new("hasAuthor")
                        .generalizes("hasContributor")
                        .inverse("authorOf")
                        .submenu("people"),
                )
                .class(ClassDecl::new("Person").person().name_property("name"))
                .class(ClassDecl::new("Country").noun("nation")),
        )
    }

    #[test]
    fn generalizations_nearest_first() {
        let o = chain();
        assert_eq!(
            o.super_properties("firstAuthor"),
            vec!["hasAuthor".to_string(), "hasContributor".to_string()]
        );
        assert!(o.super_properties("hasContributor").is_empty());
    }

    #[test]
    fn specializations_are_transitive() {
        let o = chain();
        let specs = o.sub_properties("hasContributor");
        assert_eq!(specs.len(), 2);
        assert!(specs.contains(&"firstAuthor".to_string()));
    }

    #[test]
    fn inverses_are_symmetric() {
        let o = chain();
        assert_eq!(o.inverse_of("hasAuthor").as_deref(), Some("authorOf"));
        assert_eq!(o.inverse_of("authorOf").as_deref(), Some("hasAuthor"));
        assert_eq!(o.inverse_of("title"), None);
    }

    #[test]
    fn class_metadata() {
        let o = chain();
        assert!(o.is_person_class("Person"));
        assert!(!o.is_person_class("Country"));
        assert_eq!(o.class_noun("Country"), "nation");
        assert_eq!(o.class_noun("ResearchGroup"), "research group");
        assert_eq!(o.name_property("Person").as_deref(), Some("name"));
        assert_eq!(o.submenu("hasAuthor", "Paper").as_deref(), Some("people"));
    }

    #[test]
    fn cyclic_declarations_terminate() {
        let o = StaticOntology::from_document(
            OntologyDocument::default()
                .property(PropertyDecl::new("a").generalizes("b"))
                .property(PropertyDecl::new("b").generalizes("a")),
        );
        assert_eq!(o.super_properties("a"), vec!["b".to_string()]);
    }
}
