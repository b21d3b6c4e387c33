//! Diagnostic preview: a naive English reading of a finished tree.
//!
//! This is not a realizer. It ignores word-order subtleties, agreement
//! beyond the morphology flags already on the tree, and article choice. It
//! exists so that plans can be eyeballed from the CLI and asserted on in
//! tests.

use super::cat::{Cat, Role};
use super::morpho;
use super::tree::{DependencyTree, Morph, NodeKind, RefForm, Reference, Tense, TreeId};

/// Read a whole tree as one capitalized sentence with a full stop.
pub fn sentence(tree: &DependencyTree) -> String {
    let text = phrase(tree, tree.root());
    format!("{}.", morpho::capitalize(text.trim()))
}

/// Read the subtree rooted at `id`; elided material reads as nothing.
pub fn phrase(tree: &DependencyTree, id: TreeId) -> String {
    let node = tree.node(id);
    if node.elided {
        return String::new();
    }
    match &node.kind {
        NodeKind::Leaf { cat, word } => leaf(*cat, word, &node.morph),
        NodeKind::Reference(r) => reference(r, &node.morph),
        NodeKind::Slot { .. } => String::new(),
        NodeKind::Phrase { cat } => match cat {
            Cat::Smain | Cat::Ssub => clause(tree, id),
            Cat::Conjunction => conjunction(tree, id),
            _ => constituent(tree, id),
        },
    }
}

fn leaf(cat: Cat, word: &str, morph: &Morph) -> String {
    match cat {
        Cat::Noun if morph.plural => morpho::pluralize(word),
        Cat::Name if morph.quoted => format!("\"{word}\""),
        _ => word.to_string(),
    }
}

fn reference(r: &Reference, morph: &Morph) -> String {
    let genitive = morph.genitive;
    let possessive = |s: String| if genitive { format!("{s}'s") } else { s };
    match r.form {
        Some(RefForm::Relative(pronoun)) => {
            if genitive {
                "whose".into()
            } else {
                pronoun.word().into()
            }
        }
        Some(RefForm::Pronoun) => match (r.person, genitive) {
            (true, false) => "they".into(),
            (true, true) => "their".into(),
            (false, false) => "it".into(),
            (false, true) => "its".into(),
        },
        Some(RefForm::Ordinal(n)) => {
            possessive(format!("the {} {}", morpho::ordinal_word(n), r.noun))
        }
        Some(RefForm::Full) | None => match &r.name {
            Some(name) => possessive(name.clone()),
            None => possessive(format!("the {}", r.noun)),
        },
    }
}

/// Determiner, head, then everything else in order.
fn constituent(tree: &DependencyTree, id: TreeId) -> String {
    let deps = tree.ordered_children(id);
    let mut parts = Vec::new();
    for role in [Role::Det, Role::Head] {
        parts.extend(
            deps.iter()
                .filter(|d| d.role == role)
                .map(|d| phrase(tree, d.child)),
        );
    }
    parts.extend(
        deps.iter()
            .filter(|d| !matches!(d.role, Role::Det | Role::Head))
            .map(|d| phrase(tree, d.child)),
    );
    join_words(parts)
}

fn conjunction(tree: &DependencyTree, id: TreeId) -> String {
    let deps = tree.ordered_children(id);
    let items: Vec<String> = deps
        .iter()
        .filter(|d| d.role == Role::Conjunct)
        .map(|d| phrase(tree, d.child))
        .filter(|s| !s.is_empty())
        .collect();
    let conjunctor = deps
        .iter()
        .find(|d| d.role == Role::Conjunctor)
        .and_then(|d| tree.node(d.child).word())
        .unwrap_or("and");
    morpho::join_list(&items, conjunctor)
}

fn clause(tree: &DependencyTree, id: TreeId) -> String {
    let deps = tree.ordered_children(id);
    let verb = tree.verb_of(id);
    let passive = verb.is_some_and(|v| tree.node(v).morph.passive);

    let of = |role: Role| -> Vec<TreeId> {
        deps.iter()
            .filter(|d| d.role == role)
            .map(|d| d.child)
            .collect()
    };
    // A passive with no OBJECT already has its agent in a "by" phrase.
    let (surface_subject, agent) = if passive && !of(Role::Object).is_empty() {
        (of(Role::Object), of(Role::Subject))
    } else {
        (of(Role::Subject), Vec::new())
    };

    // Modifiers placed before the subject or verb are fronted.
    let first_core = deps
        .iter()
        .position(|d| matches!(d.role, Role::Subject | Role::Head | Role::Object));
    let (front, back): (Vec<_>, Vec<_>) = deps
        .iter()
        .enumerate()
        .filter(|(_, d)| d.role == Role::Modifier)
        .partition(|(i, _)| first_core.is_some_and(|c| *i < c));

    let mut parts: Vec<(TreeId, String)> = Vec::new();
    let push = |ids: &[TreeId], parts: &mut Vec<(TreeId, String)>| {
        for &c in ids {
            parts.push((c, phrase(tree, c)));
        }
    };
    push(&front.iter().map(|(_, d)| d.child).collect::<Vec<_>>(), &mut parts);
    push(&surface_subject, &mut parts);
    if let Some(v) = verb {
        let they = surface_subject.iter().any(|&s| reads_they(tree, s));
        parts.push((v, verb_group(tree, v, they)));
    }
    if !passive {
        push(&of(Role::Object), &mut parts);
    }
    push(&of(Role::Predicate), &mut parts);
    push(&of(Role::Complement), &mut parts);
    for &a in &agent {
        let text = phrase(tree, a);
        if !text.is_empty() {
            parts.push((a, format!("by {text}")));
        }
    }
    push(&of(Role::PpModifier), &mut parts);
    push(&back.iter().map(|(_, d)| d.child).collect::<Vec<_>>(), &mut parts);

    // A relative clause opens with the constituent holding its pronoun.
    if tree.node(id).cat() == Cat::Ssub {
        if let Some(pos) = parts.iter().position(|(c, _)| holds_relative(tree, *c)) {
            let part = parts.remove(pos);
            parts.insert(0, part);
        }
    }
    join_words(parts.into_iter().map(|(_, s)| s).collect())
}

fn verb_group(tree: &DependencyTree, verb: TreeId, they: bool) -> String {
    let node = tree.node(verb);
    if node.elided {
        return String::new();
    }
    let lemma = node.word().unwrap_or_default();
    let m = &node.morph;
    let plural = m.plural || they;
    let mut out = if m.passive {
        let aux = morpho::inflect("be", m.tense, plural);
        let not = if m.negated { " not" } else { "" };
        format!("{aux}{not} {}", morpho::participle(lemma))
    } else if m.negated && lemma == "be" {
        format!("{} not", morpho::inflect("be", m.tense, plural))
    } else if m.negated {
        let aux = match m.tense {
            Tense::Past => "did".to_string(),
            Tense::Present => morpho::inflect("do", Tense::Present, plural),
        };
        format!("{aux} not {lemma}")
    } else {
        morpho::inflect(lemma, m.tense, plural)
    };
    if let Some(particle) = &m.particle {
        out.push(' ');
        out.push_str(particle);
    }
    out
}

fn reads_they(tree: &DependencyTree, id: TreeId) -> bool {
    tree.node(id)
        .reference()
        .is_some_and(|r| r.person && r.form == Some(RefForm::Pronoun))
}

fn holds_relative(tree: &DependencyTree, id: TreeId) -> bool {
    tree.preorder_from(id).into_iter().any(|n| {
        tree.node(n)
            .reference()
            .is_some_and(|r| matches!(r.form, Some(RefForm::Relative(_))))
    })
}

fn join_words(parts: Vec<String>) -> String {
    parts
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::cat::Slot;
    use crate::grammar::template::Template;
    use crate::grammar::transform;
    use crate::graph::NodeId;

    fn id(n: u64) -> NodeId {
        NodeId::new(n).unwrap()
    }

    fn named(class: &str, name: &str, person: bool) -> NodeKind {
        NodeKind::Reference(Reference {
            class: class.into(),
            noun: class.to_lowercase(),
            name: Some(name.into()),
            person,
            topic: false,
            ordinal: 0,
            form: Some(RefForm::Full),
        })
    }

    fn wrote() -> DependencyTree {
        let mut t = Template::transitive("hasAuthor", "write", Slot::Target)
            .with_tense(Tense::Past)
            .instantiate();
        t.fill_slot(Slot::Target, named("Person", "Ada", true), Some(id(1)));
        t.fill_slot(Slot::Source, named("Paper", "Paper1", false), Some(id(2)));
        t
    }

    #[test]
    fn active_clause() {
        assert_eq!(sentence(&wrote()), "Ada wrote Paper1.");
    }

    #[test]
    fn passive_clause() {
        let mut t = wrote();
        transform::to_passive(&mut t);
        assert_eq!(sentence(&t), "Paper1 was written by Ada.");
    }

    #[test]
    fn negated_clause() {
        let mut t = wrote();
        transform::to_negated(&mut t);
        assert_eq!(sentence(&t), "Ada did not write Paper1.");
    }

    #[test]
    fn relative_clauses_front_the_pronoun() {
        let mut on_paper = wrote();
        transform::to_relative_clause(&mut on_paper, id(2));
        assert_eq!(
            phrase(&on_paper, on_paper.root()),
            "which was written by Ada"
        );

        let mut on_author = wrote();
        transform::to_relative_clause(&mut on_author, id(1));
        assert_eq!(phrase(&on_author, on_author.root()), "who wrote Paper1");
    }

    #[test]
    fn attribute_with_genitive_owner() {
        let mut t = Template::attribute("title", "title").instantiate();
        t.fill_slot(Slot::Source, named("Paper", "Paper1", false), Some(id(2)));
        let value = NodeKind::Leaf {
            cat: Cat::Name,
            word: "On Graphs".into(),
        };
        let filled = t.fill_slot(Slot::Target, value, None).unwrap();
        t.node_mut(filled).morph.quoted = true;
        assert_eq!(sentence(&t), "Paper1's title is \"On Graphs\".");
    }

    #[test]
    fn pronoun_and_ordinal_forms() {
        let r = Reference {
            class: "Person".into(),
            noun: "author".into(),
            name: None,
            person: true,
            topic: false,
            ordinal: 2,
            form: Some(RefForm::Ordinal(2)),
        };
        assert_eq!(reference(&r, &Morph::default()), "the second author");
        let pronoun = Reference {
            form: Some(RefForm::Pronoun),
            ..r
        };
        assert_eq!(reference(&pronoun, &Morph::default()), "they");
    }

    #[test]
    fn elided_material_is_silent() {
        let mut t = wrote();
        let verb = t.main_verb().unwrap();
        t.node_mut(verb).elided = true;
        assert_eq!(phrase(&t, t.root()), "Ada Paper1");
    }
}
