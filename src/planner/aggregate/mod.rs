//! Syntactic aggregation: merging a paragraph's clauses by ellipsis.
//!
//! The search tests every pair of clauses for identical constituents per
//! role, in priority order: HEAD (gapping), SUBJECT and OBJECT (conjunction
//! reduction), COMPLEMENT (right-node raising), then MODIFIER and
//! PPMODIFIER. Matches are scored, extended to triples where a third clause
//! agrees on every planned role, and selected greedily by score. Selected
//! combinations become coordinated clauses with the shared material elided.

pub mod identity;

use std::collections::BTreeSet;

use crate::config::PlanConfig;
use crate::grammar::{Cat, DependencyTree, NodeKind, Role, TreeId};

use super::PlanContext;
use identity::role_match;

/// Elidable nodes of one role, one list per tree of the combination.
#[derive(Debug, Clone, PartialEq)]
pub struct Elision {
    pub role: Role,
    pub nodes: Vec<Vec<TreeId>>,
}

/// A candidate merge of two or three clauses.
#[derive(Debug, Clone, PartialEq)]
pub struct Combination {
    pub id: u32,
    /// Indices into the paragraph's tree list, ascending.
    pub trees: Vec<usize>,
    pub elisions: Vec<Elision>,
    pub score: f32,
}

/// Ellipsis search and materialization over one paragraph.
pub struct Aggregator<'c> {
    config: &'c PlanConfig,
}

impl<'c> Aggregator<'c> {
    pub fn new(config: &'c PlanConfig) -> Self {
        Self { config }
    }

    /// Merge what can be merged; the result keeps every input clause exactly once.
    pub fn aggregate(&self, trees: Vec<DependencyTree>, ctx: &mut PlanContext) -> Vec<DependencyTree> {
        if trees.len() <= 1 {
            return trees;
        }
        let candidates = self.search(&trees, ctx);
        let selected = select(candidates);

        let mut consumed = BTreeSet::new();
        let mut merged = Vec::new();
        for combo in &selected {
            if combo.trees.iter().any(|t| consumed.contains(t)) {
                tracing::warn!(combination = combo.id, "combination reuses a merged clause, skipped");
                continue;
            }
            consumed.extend(combo.trees.iter().copied());
            tracing::debug!(
                combination = combo.id,
                trees = ?combo.trees,
                score = combo.score,
                "applying combination"
            );
            merged.push((combo.trees[0], self.materialize(&trees, combo)));
            ctx.stats.combinations_applied += 1;
        }
        merged.sort_by_key(|(first, _)| *first);

        let unmerged: Vec<DependencyTree> = trees
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !consumed.contains(i))
            .map(|(_, t)| t)
            .collect();
        interleave(merged.into_iter().map(|(_, t)| t).collect(), unmerged)
    }

    /// All combinations scoring at least the configured minimum, pairs
    /// followed directly by their triple extensions.
    pub fn search(&self, trees: &[DependencyTree], ctx: &mut PlanContext) -> Vec<Combination> {
        let mut out = Vec::new();
        for i in 0..trees.len() {
            for j in i + 1..trees.len() {
                ctx.stats.combinations_considered += 1;
                let Some((elisions, score)) = self.score_pair(&trees[i], &trees[j]) else {
                    continue;
                };
                if score < self.config.min_score {
                    continue;
                }
                tracing::debug!(i, j, score, "pair combination");
                let pair = Combination {
                    id: ctx.next_combination_id(),
                    trees: vec![i, j],
                    elisions,
                    score,
                };
                let triples = if self.config.max_conjuncts >= 3 {
                    self.extend(&pair, trees, ctx)
                } else {
                    Vec::new()
                };
                out.push(pair);
                out.extend(triples);
            }
        }
        out
    }

    fn score_pair(&self, a: &DependencyTree, b: &DependencyTree) -> Option<(Vec<Elision>, f32)> {
        let mut elisions = Vec::new();
        let mut score = 0.0;
        for role in Role::AGGREGATION_ORDER {
            let Some(m) = role_match(a, b, role) else {
                continue;
            };
            let weight = if role == Role::Head && a.main_verb().is_some_and(|v| a.is_copula(v)) {
                self.config.copula_gap_weight
            } else {
                1.0
            };
            score += m.slots() as f32 * weight;
            elisions.push(Elision {
                role,
                nodes: vec![m.left, m.right],
            });
        }
        (!elisions.is_empty()).then_some((elisions, score))
    }

    /// Triples: a later clause agreeing with the first clause on every planned role.
    fn extend(
        &self,
        pair: &Combination,
        trees: &[DependencyTree],
        ctx: &mut PlanContext,
    ) -> Vec<Combination> {
        let (i, j) = (pair.trees[0], pair.trees[1]);
        let mut out = Vec::new();
        for k in j + 1..trees.len() {
            let mut elisions = pair.elisions.clone();
            let agrees = elisions.iter_mut().all(|el| {
                match role_match(&trees[i], &trees[k], el.role) {
                    Some(m) if m.left == el.nodes[0] => {
                        el.nodes.push(m.right);
                        true
                    }
                    _ => false,
                }
            });
            if agrees {
                out.push(Combination {
                    id: ctx.next_combination_id(),
                    trees: vec![i, j, k],
                    elisions,
                    score: pair.score * 2.0,
                });
            }
        }
        out
    }

    /// Build the merged tree for a combination.
    pub fn materialize(&self, trees: &[DependencyTree], combo: &Combination) -> DependencyTree {
        let mut clones: Vec<DependencyTree> = combo.trees.iter().map(|&t| trees[t].clone()).collect();
        let realizes: Vec<_> = {
            let mut all: Vec<_> = clones.iter().flat_map(|t| t.realizes.iter().copied()).collect();
            all.sort();
            all.dedup();
            all
        };

        if let Some(mut collapsed) = collapse(&clones, combo) {
            collapsed.realizes = realizes;
            return collapsed;
        }

        let passive = clones[0].is_passive(clones[0].root());
        let actor = if passive { Role::Object } else { Role::Subject };
        let last = clones.len() - 1;
        for el in &combo.elisions {
            for (k, nodes) in el.nodes.iter().enumerate() {
                let elide = if el.role == Role::Head || el.role == actor {
                    k > 0
                } else {
                    k < last
                };
                if elide {
                    for &n in nodes {
                        clones[k].node_mut(n).elided = true;
                    }
                }
            }
        }

        let mut out = DependencyTree::new(NodeKind::Phrase {
            cat: Cat::Conjunction,
        });
        let root = out.root();
        for (k, clause) in clones.iter().enumerate() {
            let id = out.graft_under(root, Role::Conjunct, clause, clause.root());
            out.node_mut(id).order = k as u32 + 1;
        }
        let word = if only_trailing_material(&clones[1]) { "," } else { "and" };
        out.add_child(
            root,
            Role::Conjunctor,
            NodeKind::Leaf {
                cat: Cat::Conjunctor,
                word: word.into(),
            },
        );
        out.realizes = realizes;
        out
    }
}

/// Stable sort by score, then first claim wins.
pub fn select(mut candidates: Vec<Combination>) -> Vec<Combination> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    let mut claimed = BTreeSet::new();
    let mut out = Vec::new();
    for combo in candidates {
        if combo.trees.iter().any(|t| claimed.contains(t)) {
            continue;
        }
        claimed.extend(combo.trees.iter().copied());
        out.push(combo);
    }
    out
}

/// Alternate merged and unmerged clauses, merged first.
fn interleave(merged: Vec<DependencyTree>, unmerged: Vec<DependencyTree>) -> Vec<DependencyTree> {
    let mut out = Vec::with_capacity(merged.len() + unmerged.len());
    let mut m = merged.into_iter();
    let mut u = unmerged.into_iter();
    loop {
        match (m.next(), u.next()) {
            (None, None) => break,
            (a, b) => out.extend(a.into_iter().chain(b)),
        }
    }
    out
}

/// Collapse clauses that differ in exactly one single-constituent role into
/// one clause coordinating that role ("Ada and Bob wrote the paper").
fn collapse(clones: &[DependencyTree], combo: &Combination) -> Option<DependencyTree> {
    let matched: BTreeSet<Role> = combo.elisions.iter().map(|e| e.role).collect();
    let mut differing: Option<Role> = None;
    let mut pieces = Vec::with_capacity(clones.len());
    for clause in clones {
        let root = clause.root();
        if !clause.node(root).cat().is_clause() {
            return None;
        }
        let rest: Vec<_> = clause
            .children(root)
            .iter()
            .filter(|d| !matched.contains(&d.role))
            .collect();
        match rest.as_slice() {
            [] => pieces.push(None),
            [one] => {
                if differing.is_some_and(|r| r != one.role) {
                    return None;
                }
                differing = Some(one.role);
                pieces.push(Some(one.child));
            }
            _ => return None,
        }
    }
    let role = differing?;
    if pieces.iter().any(Option::is_none) {
        return None;
    }

    let mut base = clones[0].clone();
    let target = base.child(base.root(), role)?;
    for (clause, piece) in clones.iter().zip(&pieces).skip(1) {
        let piece = (*piece)?;
        let live = target_of(&base, role, target);
        let current = base.ensure_conjunction(live);
        if clause.is_conjunction(piece) {
            for dep in clause.ordered_children(piece) {
                if dep.role == Role::Conjunct {
                    base.graft_conjunct(current, clause, dep.child);
                }
            }
        } else {
            base.graft_conjunct(current, clause, piece);
        }
    }
    Some(base)
}

/// The live node filling `role` of the base clause (it moves when wrapped).
fn target_of(base: &DependencyTree, role: Role, fallback: TreeId) -> TreeId {
    base.child(base.root(), role).unwrap_or(fallback)
}

/// Whether the surviving material of a clause is only trailing modifiers (or
/// a passive clause's agent), which reads better after a comma.
fn only_trailing_material(clause: &DependencyTree) -> bool {
    let root = clause.root();
    let agent_in_subject = clause.is_passive(root) && clause.child(root, Role::Object).is_some();
    let survivors: Vec<Role> = clause
        .children(root)
        .iter()
        .filter(|d| !clause.node(d.child).elided)
        .map(|d| d.role)
        .collect();
    !survivors.is_empty()
        && survivors
            .iter()
            .all(|r| *r == Role::PpModifier || (agent_in_subject && *r == Role::Subject))
}

/// Number agreement over every clause of a finished sentence.
///
/// - a coordinated actor makes the verb plural;
/// - a copula with a coordinated complement and a single subject noun phrase
///   pluralizes the subject and the verb;
/// - a plural copula pluralizes a noun-phrase complement.
pub fn number_agreement(tree: &mut DependencyTree) {
    let root = tree.root();
    if tree.is_conjunction(root) {
        for conjunct in tree.children_with(root, Role::Conjunct) {
            if tree.node(conjunct).cat().is_clause() {
                agree_clause(tree, conjunct);
            }
        }
    } else if tree.node(root).cat().is_clause() {
        agree_clause(tree, root);
    }
}

fn agree_clause(tree: &mut DependencyTree, clause: TreeId) {
    let Some(verb) = tree.verb_of(clause) else {
        return;
    };
    let passive = tree.node(verb).morph.passive;
    let actor = tree.child(clause, if passive { Role::Object } else { Role::Subject });
    if actor.is_some_and(|a| tree.is_conjunction(a)) {
        tree.node_mut(verb).morph.plural = true;
    }
    if !tree.is_copula(verb) {
        return;
    }
    let complement = tree.child(clause, Role::Complement);
    let subjects = tree.children_with(clause, Role::Subject);
    if let (Some(comp), [subject]) = (complement, subjects.as_slice()) {
        let subject = *subject;
        let single_np = tree.node(subject).cat() == Cat::Np && !tree.is_conjunction(subject);
        if tree.is_conjunction(comp) && single_np {
            pluralize_np(tree, subject);
            tree.node_mut(verb).morph.plural = true;
        }
    }
    if tree.node(verb).morph.plural {
        if let Some(comp) = complement {
            if tree.node(comp).cat() == Cat::Np && !tree.is_conjunction(comp) {
                pluralize_np(tree, comp);
            }
        }
    }
}

fn pluralize_np(tree: &mut DependencyTree, np: TreeId) {
    tree.node_mut(np).morph.plural = true;
    if let Some(head) = tree.child(np, Role::Head) {
        if tree.node(head).cat() == Cat::Noun {
            tree.node_mut(head).morph.plural = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{preview, RefForm, Reference, Slot, Template, Tense};
    use crate::graph::NodeId;

    fn id(n: u64) -> NodeId {
        NodeId::new(n).unwrap()
    }

    fn named(name: &str, person: bool) -> NodeKind {
        NodeKind::Reference(Reference {
            class: if person { "Person" } else { "Paper" }.into(),
            noun: if person { "person" } else { "paper" }.into(),
            name: Some(name.into()),
            person,
            topic: false,
            ordinal: 0,
            form: Some(RefForm::Full),
        })
    }

    fn wrote(author: (u64, &str), paper: (u64, &str)) -> DependencyTree {
        let mut t = Template::transitive("hasAuthor", "write", Slot::Target)
            .with_tense(Tense::Past)
            .instantiate();
        t.fill_slot(Slot::Target, named(author.1, true), Some(id(author.0)));
        t.fill_slot(Slot::Source, named(paper.1, false), Some(id(paper.0)));
        t
    }

    fn title(paper: (u64, &str), value: &str) -> DependencyTree {
        let mut t = Template::attribute("title", "title").instantiate();
        t.fill_slot(Slot::Source, named(paper.1, false), Some(id(paper.0)));
        t.fill_slot(
            Slot::Target,
            NodeKind::Leaf {
                cat: Cat::Name,
                word: value.into(),
            },
            None,
        );
        t
    }

    fn name(word: &str) -> NodeKind {
        NodeKind::Leaf {
            cat: Cat::Name,
            word: word.into(),
        }
    }

    fn add_pp(t: &mut DependencyTree, prep: &str, object: NodeKind, sem: Option<NodeId>) {
        let root = t.root();
        let pp = t.add_child(root, Role::PpModifier, NodeKind::Phrase { cat: Cat::Pp });
        t.add_child(
            pp,
            Role::Head,
            NodeKind::Leaf {
                cat: Cat::Prep,
                word: prep.into(),
            },
        );
        let np = t.add_child(pp, Role::Object, object);
        t.node_mut(np).sem = sem;
    }

    fn works_at(person: (u64, &str), place: &str) -> DependencyTree {
        let mut t = Template::prepositional("worksAt", "work", "at").instantiate();
        t.fill_slot(Slot::Source, named(person.1, true), Some(id(person.0)));
        t.fill_slot(Slot::Target, name(place), None);
        t
    }

    /// "`patient` was thanked by `agent`", with the agent in a "by" phrase.
    fn thanked_by(patient: (u64, &str), agent: (u64, &str)) -> DependencyTree {
        let mut t = DependencyTree::clause();
        let root = t.root();
        let subject = t.add_child(root, Role::Subject, named(patient.1, true));
        t.node_mut(subject).sem = Some(id(patient.0));
        let verb = t.add_child(
            root,
            Role::Head,
            NodeKind::Leaf {
                cat: Cat::Verb,
                word: "thank".into(),
            },
        );
        t.node_mut(verb).morph.passive = true;
        t.node_mut(verb).morph.tense = Tense::Past;
        add_pp(&mut t, "by", named(agent.1, true), Some(id(agent.0)));
        t
    }

    fn thanked(agent: (u64, &str), patient: (u64, &str)) -> DependencyTree {
        let mut t = Template::transitive("thanks", "thank", Slot::Source)
            .with_tense(Tense::Past)
            .instantiate();
        t.fill_slot(Slot::Source, named(agent.1, true), Some(id(agent.0)));
        t.fill_slot(Slot::Target, named(patient.1, true), Some(id(patient.0)));
        t
    }

    fn conjunctor(t: &DependencyTree) -> Option<&str> {
        let c = t.child(t.root(), Role::Conjunctor)?;
        t.node(c).word()
    }

    /// Every elided node has a visible equivalent in another conjunct.
    fn assert_elisions_witnessed(t: &DependencyTree) {
        let conjuncts = t.children_with(t.root(), Role::Conjunct);
        for &c in &conjuncts {
            for n in t.preorder_from(c).into_iter().filter(|&n| t.node(n).elided) {
                let seen = conjuncts.iter().filter(|&&o| o != c).any(|&o| {
                    t.preorder_from(o)
                        .into_iter()
                        .any(|m| !t.is_elided(m) && identity::equivalent(t, n, t, m))
                });
                assert!(seen, "elided node {} has no visible twin", n.index());
            }
        }
    }

    fn run(trees: Vec<DependencyTree>) -> Vec<DependencyTree> {
        let config = PlanConfig::default();
        let mut ctx = PlanContext::new();
        let mut out = Aggregator::new(&config).aggregate(trees, &mut ctx);
        out.iter_mut().for_each(number_agreement);
        out
    }

    const ADA: (u64, &str) = (1, "Ada");
    const BOB: (u64, &str) = (2, "Bob");
    const CY: (u64, &str) = (3, "Cy");
    const P1: (u64, &str) = (10, "P1");
    const P2: (u64, &str) = (11, "P2");

    #[test]
    fn shared_object_collapses_into_coordinated_subject() {
        let out = run(vec![wrote(ADA, P1), wrote(BOB, P1)]);
        assert_eq!(out.len(), 1);
        let t = &out[0];
        let subject = t.child(t.root(), Role::Subject).unwrap();
        assert!(t.is_conjunction(subject));
        assert!(t.node(t.main_verb().unwrap()).morph.plural);
        assert_eq!(preview::sentence(t), "Ada and Bob wrote P1.");
        assert!(t.validate().is_ok());
    }

    #[test]
    fn shared_subject_collapses_into_coordinated_object() {
        let out = run(vec![wrote(ADA, P1), wrote(ADA, P2)]);
        assert_eq!(preview::sentence(&out[0]), "Ada wrote P1 and P2.");
        assert!(!out[0].node(out[0].main_verb().unwrap()).morph.plural);
    }

    #[test]
    fn three_clauses_merge_into_one() {
        let out = run(vec![wrote(ADA, P1), wrote(BOB, P1), wrote(CY, P1)]);
        assert_eq!(out.len(), 1);
        assert_eq!(preview::sentence(&out[0]), "Ada, Bob, and Cy wrote P1.");
    }

    #[test]
    fn unrelated_clauses_stay_apart() {
        let out = run(vec![wrote(ADA, P1), title(P2, "X")]);
        assert_eq!(out.len(), 2);
        assert_eq!(preview::sentence(&out[0]), "Ada wrote P1.");
    }

    #[test]
    fn copula_gapping_alone_is_not_enough() {
        let config = PlanConfig::default();
        let mut ctx = PlanContext::new();
        let a = title(P1, "X");
        let b = title(P2, "Y");
        let combos = Aggregator::new(&config).search(&[a, b], &mut ctx);
        // HEAD (0.4) plus the "title" noun phrases differing in owner: no match.
        assert!(combos.is_empty());
    }

    #[test]
    fn triple_scores_double_the_pair() {
        let config = PlanConfig::default();
        let mut ctx = PlanContext::new();
        let trees = vec![wrote(ADA, P1), wrote(BOB, P1), wrote(CY, P1)];
        let combos = Aggregator::new(&config).search(&trees, &mut ctx);
        let pair = combos.iter().find(|c| c.trees == vec![0, 1]).unwrap();
        let triple = combos.iter().find(|c| c.trees == vec![0, 1, 2]).unwrap();
        assert!(triple.score >= pair.score);
        assert_eq!(triple.score, pair.score * 2.0);
        // Triples follow their pair directly.
        let at = combos.iter().position(|c| c.trees == vec![0, 1]).unwrap();
        assert_eq!(combos[at + 1].trees, vec![0, 1, 2]);
    }

    #[test]
    fn conjunct_cap_disables_triples() {
        let config = PlanConfig {
            max_conjuncts: 2,
            ..PlanConfig::default()
        };
        let mut ctx = PlanContext::new();
        let trees = vec![wrote(ADA, P1), wrote(BOB, P1), wrote(CY, P1)];
        let combos = Aggregator::new(&config).search(&trees, &mut ctx);
        assert!(combos.iter().all(|c| c.trees.len() == 2));
    }

    #[test]
    fn gapping_keeps_verb_in_first_clause_only() {
        // Same verb, different subject and object: "Ada wrote P1 and Bob P2".
        let config = PlanConfig {
            min_score: 1.0,
            ..PlanConfig::default()
        };
        let trees = vec![wrote(ADA, P1), wrote(BOB, P2)];
        let mut ctx = PlanContext::new();
        let agg = Aggregator::new(&config);
        let combos = agg.search(&trees, &mut ctx);
        assert_eq!(combos.len(), 1);
        let merged = agg.materialize(&trees, &combos[0]);
        assert_eq!(preview::sentence(&merged), "Ada wrote P1 and Bob P2.");
        let conjuncts = merged.children_with(merged.root(), Role::Conjunct);
        let second_verb = merged.verb_of(conjuncts[1]).unwrap();
        assert!(merged.node(second_verb).elided);
        let first_verb = merged.verb_of(conjuncts[0]).unwrap();
        assert!(!merged.node(first_verb).elided);
    }

    #[test]
    fn trailing_pp_material_takes_a_comma() {
        // Shared subject and verb; the second clause keeps only its PPs.
        let a = works_at(ADA, "MIT");
        let mut b = works_at(ADA, "Bell Labs");
        add_pp(&mut b, "in", name("1950"), None);
        let trees = vec![a, b];

        let config = PlanConfig::default();
        let agg = Aggregator::new(&config);
        let combos = agg.search(&trees, &mut PlanContext::new());
        assert_eq!(combos.len(), 1);
        let merged = agg.materialize(&trees, &combos[0]);
        assert_eq!(conjunctor(&merged), Some(","));
        assert_elisions_witnessed(&merged);
        assert_eq!(
            preview::sentence(&merged),
            "Ada works at MIT, at Bell Labs in 1950."
        );
    }

    #[test]
    fn remaining_verb_keeps_and() {
        let trees = vec![wrote(ADA, P1), works_at(ADA, "MIT")];
        let config = PlanConfig::default();
        let agg = Aggregator::new(&config);
        let combos = agg.search(&trees, &mut PlanContext::new());
        assert_eq!(combos.len(), 1);
        let merged = agg.materialize(&trees, &combos[0]);
        assert_eq!(conjunctor(&merged), Some("and"));
        assert_eq!(preview::sentence(&merged), "Ada wrote P1 and works at MIT.");
    }

    #[test]
    fn active_object_merges_with_passive_by_phrase() {
        let config = PlanConfig::default();
        let agg = Aggregator::new(&config);
        for trees in [
            vec![thanked(ADA, BOB), thanked_by(CY, BOB)],
            vec![thanked_by(CY, BOB), thanked(ADA, BOB)],
        ] {
            let combos = agg.search(&trees, &mut PlanContext::new());
            assert_eq!(combos.len(), 1);
            assert_eq!(combos[0].elisions.len(), 1);
            assert_eq!(combos[0].elisions[0].role, Role::Object);
            let merged = agg.materialize(&trees, &combos[0]);
            assert!(merged.is_conjunction(merged.root()));
            assert_eq!(conjunctor(&merged), Some("and"));
            assert_elisions_witnessed(&merged);
            // Bob is told once, in the "by" phrase.
            let visible_bob = merged
                .references()
                .into_iter()
                .filter(|&r| merged.node(r).sem == Some(id(BOB.0)) && !merged.is_elided(r))
                .count();
            assert_eq!(visible_bob, 1);
        }
        let trees = vec![thanked(ADA, BOB), thanked_by(CY, BOB)];
        let combos = agg.search(&trees, &mut PlanContext::new());
        let merged = agg.materialize(&trees, &combos[0]);
        assert_eq!(preview::sentence(&merged), "Ada thanked and Cy was thanked by Bob.");
    }

    #[test]
    fn selection_is_greedy_by_score() {
        let mk = |trees: Vec<usize>, score: f32, id: u32| Combination {
            id,
            trees,
            elisions: Vec::new(),
            score,
        };
        let chosen = select(vec![mk(vec![0, 1], 2.0, 0), mk(vec![1, 2], 3.0, 1), mk(vec![2, 3], 3.0, 2)]);
        let ids: Vec<u32> = chosen.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1]);
        let chosen = select(vec![mk(vec![0, 1], 2.0, 0), mk(vec![2, 3], 2.0, 1)]);
        let ids: Vec<u32> = chosen.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn merged_and_unmerged_alternate() {
        let out = run(vec![
            title(P2, "X"),
            wrote(ADA, P1),
            title((12, "P3"), "Y"),
            wrote(BOB, P1),
        ]);
        let text: Vec<String> = out.iter().map(preview::sentence).collect();
        assert_eq!(
            text,
            vec![
                "Ada and Bob wrote P1.".to_string(),
                "P2's title is X.".to_string(),
                "P3's title is Y.".to_string(),
            ]
        );
    }

    #[test]
    fn coordinated_complement_pluralizes_subject() {
        let mut t = title(P1, "X");
        let comp = t.child(t.root(), Role::Complement).unwrap();
        t.append_conjunct(
            comp,
            NodeKind::Leaf {
                cat: Cat::Name,
                word: "Y".into(),
            },
            None,
            2,
        );
        number_agreement(&mut t);
        assert_eq!(preview::sentence(&t), "P1's titles are X and Y.");
    }
}
