//! Clause transformations on dependency trees.
//!
//! Every transformation returns `true` when it changed the tree and is a
//! silent no-op on structurally inapplicable input.

use crate::graph::NodeId;

use super::cat::{Cat, Role};
use super::tree::{DependencyTree, NodeKind, RefForm, RelativePronoun};

/// Toggle passive voice. Needs both a SUBJECT and an OBJECT.
pub fn to_passive(tree: &mut DependencyTree) -> bool {
    let root = tree.root();
    if tree.child(root, Role::Subject).is_none() || tree.child(root, Role::Object).is_none() {
        return false;
    }
    let Some(verb) = tree.main_verb() else {
        return false;
    };
    let morph = &mut tree.node_mut(verb).morph;
    morph.passive = !morph.passive;
    true
}

/// Toggle negation of the clause verb.
pub fn to_negated(tree: &mut DependencyTree) -> bool {
    let Some(verb) = tree.main_verb() else {
        return false;
    };
    let morph = &mut tree.node_mut(verb).morph;
    morph.negated = !morph.negated;
    true
}

/// Turn the clause into a relative clause on `topic`.
///
/// The clause becomes subordinate and the topic's first reference becomes a
/// relative pronoun. The constituent holding the pronoun is then rearranged
/// so that it can be fronted:
///
/// - copular COMPLEMENT: subject and complement swap;
/// - other COMPLEMENT: relabelled MODIFIER;
/// - PPMODIFIER of the clause: promoted to a fronted MODIFIER;
/// - OBJECT with a SUBJECT present: the clause goes passive, "have" reads "include";
/// - SUBJECT: the clause reads active, so the pronoun is never its own agent.
pub fn to_relative_clause(tree: &mut DependencyTree, topic: NodeId) -> bool {
    let Some(mention) = tree.find_reference(topic) else {
        return false;
    };
    let root = tree.root();
    if !matches!(tree.node(root).kind, NodeKind::Phrase { .. }) || !tree.node(root).cat().is_clause()
    {
        return false;
    }
    tree.node_mut(root).kind = NodeKind::Phrase { cat: Cat::Ssub };

    if let Some(reference) = tree.node_mut(mention).reference_mut() {
        let pronoun = if reference.person {
            RelativePronoun::Who
        } else {
            RelativePronoun::Which
        };
        reference.form = Some(RefForm::Relative(pronoun));
    }

    // The pronoun stands for the whole noun phrase it heads.
    if let Some(parent) = tree.parent(mention) {
        let heads_np = parent != root
            && tree.node(parent).cat() == Cat::Np
            && matches!(tree.role_of(mention), Some(Role::Head | Role::Modifier));
        if heads_np {
            let anchor = tree.node(parent).anchor.clone();
            tree.replace(parent, mention);
            if tree.node(mention).anchor.is_none() {
                tree.node_mut(mention).anchor = anchor;
            }
        }
    }

    let Some(branch) = tree.clause_branch(mention) else {
        return true;
    };
    let copular = tree.main_verb().is_some_and(|v| tree.is_copula(v));
    match tree.role_of(branch) {
        Some(Role::Complement) if copular => {
            if let Some(subject) = tree.child(root, Role::Subject) {
                tree.set_role(subject, Role::Complement);
            }
            tree.set_role(branch, Role::Subject);
        }
        Some(Role::Complement) => tree.set_role(branch, Role::Modifier),
        Some(Role::PpModifier) => {
            tree.set_role(branch, Role::Modifier);
            tree.move_to_front(branch);
        }
        Some(Role::Object) if tree.child(root, Role::Subject).is_some() => {
            if let Some(verb) = tree.main_verb() {
                let node = tree.node_mut(verb);
                node.morph.passive = true;
                if let NodeKind::Leaf { word, .. } = &mut node.kind {
                    if word == "have" {
                        *word = "include".into();
                    }
                }
            }
        }
        Some(Role::Subject) => {
            if let Some(verb) = tree.main_verb() {
                tree.node_mut(verb).morph.passive = false;
            }
        }
        _ => {}
    }
    true
}

/// Plural agreement for a clause attached to a plural mention of `topic`.
///
/// The verb goes plural. With a copula, when the topic sits inside a PP that is
/// part of the subject ("the title of which"), the subject's head noun follows.
pub fn to_plural(tree: &mut DependencyTree, topic: NodeId) -> bool {
    let Some(verb) = tree.main_verb() else {
        return false;
    };
    tree.node_mut(verb).morph.plural = true;
    if !tree.is_copula(verb) {
        return true;
    }
    let root = tree.root();
    let Some(subject) = tree.child(root, Role::Subject) else {
        return true;
    };
    let in_subject_pp = tree.find_reference(topic).is_some_and(|mention| {
        let ancestors = tree.ancestors(mention);
        ancestors.contains(&subject) && ancestors.iter().any(|&a| tree.node(a).cat() == Cat::Pp)
    });
    if in_subject_pp {
        tree.node_mut(subject).morph.plural = true;
        if let Some(head) = tree.child(subject, Role::Head) {
            tree.node_mut(head).morph.plural = true;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::cat::Slot;
    use crate::grammar::template::Template;
    use crate::grammar::tree::Reference;

    fn id(n: u64) -> NodeId {
        NodeId::new(n).unwrap()
    }

    fn reference(class: &str, person: bool) -> NodeKind {
        NodeKind::Reference(Reference {
            class: class.into(),
            noun: class.to_lowercase(),
            name: None,
            person,
            topic: false,
            ordinal: 0,
            form: None,
        })
    }

    /// "X wrote Y" with X = node 1 (person), Y = node 2 (paper).
    fn wrote(verb: &str) -> DependencyTree {
        let mut t = Template::transitive("hasAuthor", verb, Slot::Target).instantiate();
        t.fill_slot(Slot::Target, reference("Person", true), Some(id(1)));
        t.fill_slot(Slot::Source, reference("Paper", false), Some(id(2)));
        t
    }

    fn form(t: &DependencyTree, node: NodeId) -> Option<RefForm> {
        let m = t.find_reference(node).unwrap();
        t.node(m).reference().unwrap().form
    }

    #[test]
    fn passive_needs_subject_and_object() {
        let mut t = wrote("write");
        assert!(to_passive(&mut t));
        assert!(t.is_passive(t.root()));
        assert!(to_passive(&mut t));
        assert!(!t.is_passive(t.root()));

        let mut pred = Template::predicate("peerReviewed", "peer-reviewed").instantiate();
        assert!(!to_passive(&mut pred));
    }

    #[test]
    fn negation_toggles() {
        let mut t = wrote("write");
        to_negated(&mut t);
        let verb = t.main_verb().unwrap();
        assert!(t.node(verb).morph.negated);
    }

    #[test]
    fn relativize_on_object_passivizes() {
        let mut t = wrote("write");
        assert!(to_relative_clause(&mut t, id(2)));
        assert_eq!(t.node(t.root()).cat(), Cat::Ssub);
        assert!(t.is_passive(t.root()));
        assert_eq!(form(&t, id(2)), Some(RefForm::Relative(RelativePronoun::Which)));
    }

    #[test]
    fn relativize_on_subject_keeps_voice() {
        let mut t = wrote("write");
        assert!(to_relative_clause(&mut t, id(1)));
        assert!(!t.is_passive(t.root()));
        assert_eq!(form(&t, id(1)), Some(RefForm::Relative(RelativePronoun::Who)));
    }

    #[test]
    fn relativize_on_passive_subject_reads_active() {
        // Trees built from an inverse property arrive passive.
        let mut t = wrote("write");
        to_passive(&mut t);
        assert!(to_relative_clause(&mut t, id(1)));
        assert!(!t.is_passive(t.root()));
        assert_eq!(form(&t, id(1)), Some(RefForm::Relative(RelativePronoun::Who)));
    }

    #[test]
    fn have_becomes_include() {
        let mut t = wrote("have");
        to_relative_clause(&mut t, id(2));
        assert_eq!(t.node(t.main_verb().unwrap()).word(), Some("include"));
    }

    #[test]
    fn copular_complement_swaps_with_subject() {
        let mut t = Template::attribute("capital", "capital").instantiate();
        t.fill_slot(Slot::Source, reference("Country", false), Some(id(1)));
        t.fill_slot(Slot::Target, reference("City", false), Some(id(2)));
        to_relative_clause(&mut t, id(2));
        let subject = t.child(t.root(), Role::Subject).unwrap();
        assert_eq!(t.node(subject).sem, Some(id(2)));
        let complement = t.child(t.root(), Role::Complement).unwrap();
        assert_eq!(t.node(complement).cat(), Cat::Np);
    }

    #[test]
    fn pp_modifier_is_fronted() {
        let mut t = Template::prepositional("worksAt", "work", "at").instantiate();
        t.fill_slot(Slot::Source, reference("Person", true), Some(id(1)));
        t.fill_slot(Slot::Target, reference("Institute", false), Some(id(2)));
        to_relative_clause(&mut t, id(2));
        let first = t.children(t.root())[0];
        assert_eq!(first.role, Role::Modifier);
        assert_eq!(t.node(first.child).cat(), Cat::Pp);
    }

    #[test]
    fn noun_phrase_substitution_keeps_anchor() {
        use crate::grammar::tree::Anchor;
        let mut t = wrote("write");
        let obj = t.child(t.root(), Role::Object).unwrap();
        // Wrap the object reference in an NP carrying an anchor.
        let np = t.add(NodeKind::Phrase { cat: Cat::Np });
        t.node_mut(np).anchor = Some(Anchor::Browse { node: id(2) });
        t.replace(obj, np);
        t.attach(np, Role::Head, obj);

        to_relative_clause(&mut t, id(2));
        let mention = t.find_reference(id(2)).unwrap();
        assert_eq!(t.parent(mention), Some(t.root()));
        assert_eq!(t.node(mention).anchor, Some(Anchor::Browse { node: id(2) }));
    }

    #[test]
    fn relativize_unknown_topic_is_noop() {
        let mut t = wrote("write");
        assert!(!to_relative_clause(&mut t, id(9)));
        assert_eq!(t.node(t.root()).cat(), Cat::Smain);
    }

    #[test]
    fn plural_reaches_subject_through_pp() {
        // SUBJECT NP{HEAD title, MODIFIER PP{HEAD of, OBJECT topic}} is T
        let mut t = DependencyTree::clause();
        let root = t.root();
        let subject = t.add_child(root, Role::Subject, NodeKind::Phrase { cat: Cat::Np });
        let noun = t.add_child(
            subject,
            Role::Head,
            NodeKind::Leaf {
                cat: Cat::Noun,
                word: "title".into(),
            },
        );
        let pp = t.add_child(subject, Role::Modifier, NodeKind::Phrase { cat: Cat::Pp });
        t.add_child(
            pp,
            Role::Head,
            NodeKind::Leaf {
                cat: Cat::Prep,
                word: "of".into(),
            },
        );
        let topic = t.add_child(pp, Role::Object, reference("Paper", false));
        t.node_mut(topic).sem = Some(id(2));
        t.add_child(
            root,
            Role::Head,
            NodeKind::Leaf {
                cat: Cat::Verb,
                word: "be".into(),
            },
        );

        assert!(to_plural(&mut t, id(2)));
        assert!(t.node(t.main_verb().unwrap()).morph.plural);
        assert!(t.node(noun).morph.plural);
    }
}
