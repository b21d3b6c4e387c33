//! Syntactic categories, dependency roles and template slots.
//!
//! Each [`Cat`] labels a dependency-tree node; each [`Role`] labels the edge
//! from a node to its parent. Categories guide clause transformations and the
//! preview linearizer; roles drive aggregation.

use serde::{Deserialize, Serialize};

/// Syntactic category of a dependency-tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cat {
    /// Main clause.
    Smain,
    /// Subordinate clause (relative clauses).
    Ssub,
    /// Noun phrase.
    Np,
    Verb,
    /// Prepositional phrase.
    Pp,
    Noun,
    Adjective,
    Det,
    Prep,
    Pronoun,
    /// A proper name or datatype value.
    Name,
    /// Coordination of conjuncts.
    Conjunction,
    /// The coordinating word ("and", ",").
    Conjunctor,
}

impl Cat {
    /// Whether this category heads a clause.
    pub fn is_clause(self) -> bool {
        matches!(self, Cat::Smain | Cat::Ssub)
    }

    /// Whether this category is a single word.
    pub fn is_word(self) -> bool {
        matches!(
            self,
            Cat::Verb
                | Cat::Noun
                | Cat::Adjective
                | Cat::Det
                | Cat::Prep
                | Cat::Pronoun
                | Cat::Name
                | Cat::Conjunctor
        )
    }
}

impl std::fmt::Display for Cat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Cat::Smain => "SMAIN",
            Cat::Ssub => "SSUB",
            Cat::Np => "NP",
            Cat::Verb => "VERB",
            Cat::Pp => "PP",
            Cat::Noun => "NOUN",
            Cat::Adjective => "ADJECTIVE",
            Cat::Det => "DET",
            Cat::Prep => "PREP",
            Cat::Pronoun => "PRONOUN",
            Cat::Name => "NAME",
            Cat::Conjunction => "CONJUNCTION",
            Cat::Conjunctor => "CONJUNCTOR",
        };
        f.write_str(s)
    }
}

/// Dependency role of a node relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Subject,
    Object,
    Complement,
    Head,
    Modifier,
    PpModifier,
    Det,
    Conjunct,
    Conjunctor,
    Predicate,
}

impl Role {
    /// Roles tested for ellipsis, in priority order: gapping first, then
    /// conjunction reduction, then right-node-raising and modifiers.
    pub const AGGREGATION_ORDER: [Role; 6] = [
        Role::Head,
        Role::Subject,
        Role::Object,
        Role::Complement,
        Role::Modifier,
        Role::PpModifier,
    ];
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Subject => "SUBJECT",
            Role::Object => "OBJECT",
            Role::Complement => "COMPLEMENT",
            Role::Head => "HEAD",
            Role::Modifier => "MODIFIER",
            Role::PpModifier => "PPMODIFIER",
            Role::Det => "DET",
            Role::Conjunct => "CONJUNCT",
            Role::Conjunctor => "CONJUNCTOR",
            Role::Predicate => "PREDICATE",
        };
        f.write_str(s)
    }
}

/// Open position in a template, and the "inserted-as" marker of the node
/// that filled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// Receives the edge's source entity.
    Source,
    /// Receives the edge's target entity or value.
    Target,
    /// Marks the predicate word a template contributes.
    Predicate,
}

impl Slot {
    /// The slot on the other end of an edge.
    pub fn opposite(self) -> Slot {
        match self {
            Slot::Source => Slot::Target,
            Slot::Target => Slot::Source,
            Slot::Predicate => Slot::Predicate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clause_categories() {
        assert!(Cat::Smain.is_clause());
        assert!(Cat::Ssub.is_clause());
        assert!(!Cat::Np.is_clause());
    }

    #[test]
    fn word_categories() {
        assert!(Cat::Verb.is_word());
        assert!(Cat::Conjunctor.is_word());
        assert!(!Cat::Conjunction.is_word());
        assert!(!Cat::Pp.is_word());
    }

    #[test]
    fn gapping_has_priority() {
        assert_eq!(Role::AGGREGATION_ORDER[0], Role::Head);
        assert_eq!(Role::AGGREGATION_ORDER[5], Role::PpModifier);
    }

    #[test]
    fn slot_opposites() {
        assert_eq!(Slot::Source.opposite(), Slot::Target);
        assert_eq!(Slot::Target.opposite(), Slot::Source);
    }

    #[test]
    fn toml_names() {
        #[derive(Deserialize)]
        struct Probe {
            role: Role,
            cat: Cat,
        }
        let p: Probe = toml::from_str("role = \"pp_modifier\"\ncat = \"smain\"").unwrap();
        assert_eq!(p.role, Role::PpModifier);
        assert_eq!(p.cat, Cat::Smain);
    }
}
