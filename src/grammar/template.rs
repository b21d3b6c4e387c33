//! Lexical templates: elementary dependency trees keyed by property.
//!
//! A [`Template`] is a small clause with open SOURCE and TARGET slots. The
//! lexicalizer instantiates it into a fresh [`DependencyTree`] and fills the
//! slots with the edge's endpoints.
//!
//! Templates are usually declared in the `[[template]]` tables of the
//! configuration file:
//!
//! ```toml
//! [[template]]
//! kind = "transitive"
//! property = "hasAuthor"
//! verb = "write"
//! subject = "target"
//! tense = "past"
//!
//! [[template]]
//! kind = "attribute"
//! property = "title"
//! noun = "title"
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::cat::{Cat, Role, Slot};
use super::error::{GrammarError, GrammarResult};
use super::tree::{DependencyTree, Morph, NodeKind, Tense, TreeId};

/// Source of lexical templates.
pub trait Lexicon {
    /// The template for `property`, if one is declared.
    fn lookup(&self, property: &str) -> Option<&Template>;
}

/// One node of a template tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateNode {
    pub cat: Cat,
    /// Role relative to the parent; ignored on the root.
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub word: Option<String>,
    #[serde(default)]
    pub slot: Option<Slot>,
    #[serde(default)]
    pub morph: Morph,
    #[serde(default)]
    pub children: Vec<TemplateNode>,
}

impl TemplateNode {
    fn phrase(cat: Cat) -> Self {
        Self {
            cat,
            role: None,
            word: None,
            slot: None,
            morph: Morph::default(),
            children: Vec::new(),
        }
    }

    fn word(cat: Cat, role: Role, word: &str) -> Self {
        Self {
            role: Some(role),
            word: Some(word.to_string()),
            ..Self::phrase(cat)
        }
    }

    fn slot(role: Role, slot: Slot) -> Self {
        Self {
            role: Some(role),
            slot: Some(slot),
            ..Self::phrase(Cat::Np)
        }
    }

    fn with(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    fn child(mut self, child: TemplateNode) -> Self {
        self.children.push(child);
        self
    }

    fn slots(&self, out: &mut Vec<Slot>) {
        if let Some(slot) = self.slot {
            out.push(slot);
        }
        for child in &self.children {
            child.slots(out);
        }
    }
}

/// Elementary tree for one property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub property: String,
    /// The tree is phrased from the inverse property's point of view, so the
    /// slots are swapped when filling.
    #[serde(default)]
    pub inverse: bool,
    pub root: TemplateNode,
}

impl Template {
    /// `SUBJECT verb OBJECT`, with `subject` naming the slot in subject position.
    ///
    /// `Template::transitive("hasAuthor", "write", Slot::Target)` reads
    /// "<author> writes <paper>".
    pub fn transitive(property: impl Into<String>, verb: &str, subject: Slot) -> Self {
        let root = TemplateNode::phrase(Cat::Smain)
            .child(TemplateNode::slot(Role::Subject, subject))
            .child(TemplateNode::word(Cat::Verb, Role::Head, verb))
            .child(TemplateNode::slot(Role::Object, subject.opposite()));
        Self {
            property: property.into(),
            inverse: false,
            root,
        }
    }

    /// `SOURCE verb prep TARGET` ("<person> works at <institute>").
    pub fn prepositional(property: impl Into<String>, verb: &str, prep: &str) -> Self {
        let pp = TemplateNode::phrase(Cat::Pp)
            .with(Role::PpModifier)
            .child(TemplateNode::word(Cat::Prep, Role::Head, prep))
            .child(TemplateNode::slot(Role::Object, Slot::Target));
        let root = TemplateNode::phrase(Cat::Smain)
            .child(TemplateNode::slot(Role::Subject, Slot::Source))
            .child(TemplateNode::word(Cat::Verb, Role::Head, verb))
            .child(pp);
        Self {
            property: property.into(),
            inverse: false,
            root,
        }
    }

    /// `SOURCE's noun is TARGET` ("the paper's title is 'On Graphs'").
    pub fn attribute(property: impl Into<String>, noun: &str) -> Self {
        let mut owner = TemplateNode::slot(Role::Det, Slot::Source);
        owner.morph.genitive = true;
        let subject = TemplateNode::phrase(Cat::Np)
            .with(Role::Subject)
            .child(owner)
            .child(TemplateNode::word(Cat::Noun, Role::Head, noun));
        let root = TemplateNode::phrase(Cat::Smain)
            .child(subject)
            .child(TemplateNode::word(Cat::Verb, Role::Head, "be"))
            .child(TemplateNode::slot(Role::Complement, Slot::Target));
        Self {
            property: property.into(),
            inverse: false,
            root,
        }
    }

    /// `SOURCE is adjective`, for boolean-valued properties ("the paper is peer-reviewed").
    pub fn predicate(property: impl Into<String>, adjective: &str) -> Self {
        let root = TemplateNode::phrase(Cat::Smain)
            .child(TemplateNode::slot(Role::Subject, Slot::Source))
            .child(TemplateNode::word(Cat::Verb, Role::Head, "be"))
            .child(TemplateNode::word(Cat::Adjective, Role::Predicate, adjective));
        Self {
            property: property.into(),
            inverse: false,
            root,
        }
    }

    /// Set the tense of the clause verb.
    pub fn with_tense(mut self, tense: Tense) -> Self {
        if let Some(verb) = self
            .root
            .children
            .iter_mut()
            .find(|c| c.role == Some(Role::Head) && c.cat == Cat::Verb)
        {
            verb.morph.tense = tense;
        }
        self
    }

    /// Mark the template as phrased for the inverse direction.
    pub fn inverted(mut self) -> Self {
        self.inverse = true;
        self
    }

    /// Check slot counts and clause shape.
    pub fn validate(&self) -> GrammarResult<()> {
        let invalid = |message: &str| GrammarError::InvalidTemplate {
            property: self.property.clone(),
            message: message.to_string(),
        };
        let mut slots = Vec::new();
        self.root.slots(&mut slots);
        if slots.is_empty() {
            return Err(invalid("template has no open slot"));
        }
        for slot in [Slot::Source, Slot::Target] {
            if slots.iter().filter(|&&s| s == slot).count() > 1 {
                return Err(invalid(&format!("more than one {slot:?} slot")));
            }
        }
        if slots.contains(&Slot::Predicate) {
            return Err(invalid("PREDICATE is not a fillable slot"));
        }
        if !self.root.cat.is_clause() {
            return Err(invalid("root must be a clause"));
        }
        let heads: Vec<_> = self
            .root
            .children
            .iter()
            .filter(|c| c.role == Some(Role::Head))
            .collect();
        match heads.as_slice() {
            [verb] if verb.cat == Cat::Verb && verb.word.is_some() => Ok(()),
            _ => Err(invalid("clause needs exactly one HEAD verb with a word")),
        }
    }

    /// Build a fresh tree; the clause verb is marked as the inserted predicate.
    pub fn instantiate(&self) -> DependencyTree {
        let mut tree = DependencyTree::new(NodeKind::Phrase {
            cat: self.root.cat,
        });
        let root = tree.root();
        tree.node_mut(root).morph = self.root.morph.clone();
        for child in &self.root.children {
            build(&mut tree, root, child);
        }
        if let Some(verb) = tree.main_verb() {
            tree.node_mut(verb).inserted = Some(Slot::Predicate);
        }
        tree
    }
}

fn build(tree: &mut DependencyTree, parent: TreeId, node: &TemplateNode) {
    let kind = match (&node.slot, &node.word) {
        (Some(slot), _) => NodeKind::Slot { slot: *slot },
        (None, Some(word)) => NodeKind::Leaf {
            cat: node.cat,
            word: word.clone(),
        },
        (None, None) => NodeKind::Phrase { cat: node.cat },
    };
    let id = tree.add_child(parent, node.role.unwrap_or(Role::Modifier), kind);
    tree.node_mut(id).morph = node.morph.clone();
    for child in &node.children {
        build(tree, id, child);
    }
}

fn default_subject() -> Slot {
    Slot::Source
}

/// Declarative form of a template, as written in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TemplateDecl {
    Transitive {
        property: String,
        verb: String,
        #[serde(default = "default_subject")]
        subject: Slot,
        #[serde(default)]
        tense: Tense,
        #[serde(default)]
        inverse: bool,
    },
    Prepositional {
        property: String,
        verb: String,
        prep: String,
        #[serde(default)]
        tense: Tense,
        #[serde(default)]
        inverse: bool,
    },
    Attribute {
        property: String,
        noun: String,
        #[serde(default)]
        tense: Tense,
        #[serde(default)]
        inverse: bool,
    },
    Predicate {
        property: String,
        adjective: String,
        #[serde(default)]
        tense: Tense,
    },
    /// A hand-written tree.
    Tree {
        property: String,
        root: TemplateNode,
        #[serde(default)]
        inverse: bool,
    },
}

impl TemplateDecl {
    /// Build and validate the template.
    pub fn into_template(self) -> GrammarResult<Template> {
        let (template, inverse) = match self {
            TemplateDecl::Transitive {
                property,
                verb,
                subject,
                tense,
                inverse,
            } => (
                Template::transitive(property, &verb, subject).with_tense(tense),
                inverse,
            ),
            TemplateDecl::Prepositional {
                property,
                verb,
                prep,
                tense,
                inverse,
            } => (
                Template::prepositional(property, &verb, &prep).with_tense(tense),
                inverse,
            ),
            TemplateDecl::Attribute {
                property,
                noun,
                tense,
                inverse,
            } => (Template::attribute(property, &noun).with_tense(tense), inverse),
            TemplateDecl::Predicate {
                property,
                adjective,
                tense,
            } => (
                Template::predicate(property, &adjective).with_tense(tense),
                false,
            ),
            TemplateDecl::Tree {
                property,
                root,
                inverse,
            } => (
                Template {
                    property,
                    inverse: false,
                    root,
                },
                inverse,
            ),
        };
        let template = if inverse { template.inverted() } else { template };
        template.validate()?;
        Ok(template)
    }
}

/// In-memory lexicon keyed by property name.
#[derive(Debug, Clone, Default)]
pub struct TemplateLexicon {
    templates: BTreeMap<String, Template>,
}

impl TemplateLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and register a template, replacing any previous one for the property.
    pub fn insert(&mut self, template: Template) -> GrammarResult<()> {
        template.validate()?;
        self.templates.insert(template.property.clone(), template);
        Ok(())
    }

    /// Build a lexicon from configuration declarations.
    pub fn from_decls(decls: impl IntoIterator<Item = TemplateDecl>) -> GrammarResult<Self> {
        let mut lexicon = Self::new();
        for decl in decls {
            lexicon.insert(decl.into_template()?)?;
        }
        Ok(lexicon)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Registered property names, sorted.
    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }
}

impl Lexicon for TemplateLexicon {
    fn lookup(&self, property: &str) -> Option<&Template> {
        self.templates.get(property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitive_places_slots() {
        let t = Template::transitive("hasAuthor", "write", Slot::Target).instantiate();
        let subj = t.child(t.root(), Role::Subject).unwrap();
        let obj = t.child(t.root(), Role::Object).unwrap();
        assert_eq!(t.node(subj).kind, NodeKind::Slot { slot: Slot::Target });
        assert_eq!(t.node(obj).kind, NodeKind::Slot { slot: Slot::Source });
        let verb = t.main_verb().unwrap();
        assert_eq!(t.node(verb).word(), Some("write"));
        assert_eq!(t.node(verb).inserted, Some(Slot::Predicate));
    }

    #[test]
    fn attribute_owner_is_genitive() {
        let t = Template::attribute("title", "title").instantiate();
        let owner = t.find_slot(Slot::Source).unwrap();
        assert!(t.node(owner).morph.genitive);
        assert_eq!(t.role_of(owner), Some(Role::Det));
        assert!(t.is_copula(t.main_verb().unwrap()));
    }

    #[test]
    fn tense_reaches_verb() {
        let t = Template::transitive("p", "write", Slot::Source)
            .with_tense(Tense::Past)
            .instantiate();
        let verb = t.main_verb().unwrap();
        assert_eq!(t.node(verb).morph.tense, Tense::Past);
    }

    #[test]
    fn validation_rejects_duplicate_slots() {
        let mut t = Template::transitive("p", "write", Slot::Source);
        t.root.children[2].slot = Some(Slot::Source);
        assert!(matches!(
            t.validate(),
            Err(GrammarError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn validation_rejects_slotless_tree() {
        let decl = TemplateDecl::Tree {
            property: "p".into(),
            root: TemplateNode::phrase(Cat::Smain)
                .child(TemplateNode::word(Cat::Verb, Role::Head, "rain")),
            inverse: false,
        };
        assert!(decl.into_template().is_err());
    }

    #[test]
    fn decls_from_toml() {
        #[derive(Deserialize)]
        struct File {
            template: Vec<TemplateDecl>,
        }
        let src = r#"
            [[template]]
            kind = "transitive"
            property = "hasAuthor"
            verb = "write"
            subject = "target"
            tense = "past"

            [[template]]
            kind = "predicate"
            property = "peerReviewed"
            adjective = "peer-reviewed"

            [[template]]
            kind = "prepositional"
            property = "worksAt"
            verb = "work"
            prep = "at"
            inverse = true
        "#;
        let file: File = toml::from_str(src).unwrap();
        let lexicon = TemplateLexicon::from_decls(file.template).unwrap();
        assert_eq!(lexicon.len(), 3);
        assert!(lexicon.lookup("worksAt").unwrap().inverse);
        assert!(!lexicon.lookup("hasAuthor").unwrap().inverse);
        assert!(lexicon.lookup("cites").is_none());
    }
}
