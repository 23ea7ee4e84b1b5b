//! Backward-chaining Horn clause resolution.
//!
//! Goals are proved depth first and left to right; clauses are tried in the
//! order they were asserted. Variables of a clause are renamed apart every
//! time the clause is used.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use super::{Atom, Clause, Term};
use crate::QueryError;

/// One answer to a query: goal variable name -> value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Binding(BTreeMap<String, String>);

impl Binding {
    /// Create an empty binding (the answer to a ground goal).
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value bound to a variable.
    pub fn get(&self, variable: &str) -> Option<&str> {
        self.0.get(variable).map(String::as_str)
    }

    /// Iterate over `(variable, value)` pairs in variable order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for Binding {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Variable -> term assignments built up during a proof.
#[derive(Debug, Clone, Default)]
struct Substitution {
    bindings: HashMap<String, Term>,
}

impl Substitution {
    /// Follow variable links until reaching a constant or a free variable.
    fn walk<'t>(&'t self, term: &'t Term) -> &'t Term {
        let mut current = term;
        while let Term::Variable(name) = current {
            match self.bindings.get(name) {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    fn unify(&mut self, left: &Term, right: &Term) -> bool {
        let left = self.walk(left).clone();
        let right = self.walk(right).clone();

        match (&left, &right) {
            (Term::Constant(a), Term::Constant(b)) => a == b,
            (Term::Variable(a), Term::Variable(b)) if a == b => true,
            (Term::Variable(name), other) | (other, Term::Variable(name)) => {
                self.bindings.insert(name.clone(), other.clone());
                true
            }
        }
    }

    fn unify_atoms(&mut self, left: &Atom, right: &Atom) -> bool {
        left.predicate == right.predicate
            && left.args.len() == right.args.len()
            && left
                .args
                .iter()
                .zip(&right.args)
                .all(|(l, r)| self.unify(l, r))
    }
}

/// A goal waiting to be proved, with the number of rule expansions that
/// led to it.
#[derive(Debug, Clone)]
struct Pending {
    atom: Atom,
    depth: usize,
}

/// A point in the search with clauses still left to try for its first goal.
#[derive(Debug)]
struct Choice {
    goals: Vec<Pending>,
    subst: Substitution,
    next_clause: usize,
}

/// Resolution engine over a borrowed clause sequence.
pub(crate) struct Resolver<'a> {
    clauses: &'a [Clause],
    max_depth: usize,
    max_solutions: usize,
    fresh: usize,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(clauses: &'a [Clause], max_depth: usize, max_solutions: usize) -> Self {
        Self {
            clauses,
            max_depth,
            max_solutions,
            fresh: 0,
        }
    }

    /// Find every binding of the goal's named variables, one per proof.
    pub(crate) fn solve(&mut self, goal: &Atom) -> Result<Vec<Binding>, QueryError> {
        // Each `_` in the goal is its own variable
        let query = Atom {
            predicate: goal.predicate.clone(),
            args: goal
                .args
                .iter()
                .map(|arg| {
                    if arg.is_anonymous() {
                        self.fresh_variable("_")
                    } else {
                        arg.clone()
                    }
                })
                .collect(),
        };

        let start = Choice {
            goals: vec![Pending {
                atom: query,
                depth: 0,
            }],
            subst: Substitution::default(),
            next_clause: 0,
        };
        let (solutions, pruned) = self.prove(start);

        if pruned && solutions.is_empty() {
            return Err(QueryError::DepthLimitExceeded {
                limit: self.max_depth,
            });
        }

        let variables: Vec<&str> = goal.variables().filter(|v| !v.starts_with('_')).collect();
        let bindings: Vec<Binding> = solutions
            .iter()
            .map(|subst| {
                variables
                    .iter()
                    .map(|var| {
                        let value = match subst.walk(&Term::variable(*var)) {
                            Term::Constant(value) => value.clone(),
                            Term::Variable(_) => "_".to_string(),
                        };
                        (var.to_string(), value)
                    })
                    .collect()
            })
            .collect();

        debug!(goal = %goal, solutions = bindings.len(), pruned, "resolved goal");
        Ok(bindings)
    }

    /// Depth-first search over an explicit stack of choice points.
    ///
    /// Returns the solutions found and whether any branch was cut off by the
    /// depth limit. A cut branch fails on its own; sibling branches and
    /// earlier solutions are unaffected.
    fn prove(&mut self, start: Choice) -> (Vec<Substitution>, bool) {
        let clauses = self.clauses;
        let mut solutions = Vec::new();
        let mut pruned = false;
        let mut stack = vec![start];

        while let Some(choice) = stack.last_mut() {
            if solutions.len() >= self.max_solutions {
                debug!(limit = self.max_solutions, "solution limit reached");
                break;
            }

            let Some(first) = choice.goals.first() else {
                solutions.push(choice.subst.clone());
                stack.pop();
                continue;
            };

            let mut child = None;
            while let Some(clause) = clauses.get(choice.next_clause) {
                choice.next_clause += 1;
                if clause.head.predicate != first.atom.predicate
                    || clause.head.arity() != first.atom.arity()
                {
                    continue;
                }

                let (head, body) = self.rename(clause);
                let mut next = choice.subst.clone();
                if !next.unify_atoms(&head, &first.atom) {
                    continue;
                }

                let depth = if body.is_empty() {
                    first.depth
                } else {
                    first.depth + 1
                };
                if depth > self.max_depth {
                    debug!(goal = %first.atom, limit = self.max_depth, "pruning branch at depth limit");
                    pruned = true;
                    continue;
                }

                let mut goals: Vec<Pending> = body
                    .into_iter()
                    .map(|atom| Pending { atom, depth })
                    .collect();
                goals.extend_from_slice(&choice.goals[1..]);

                child = Some(Choice {
                    goals,
                    subst: next,
                    next_clause: 0,
                });
                break;
            }

            match child {
                Some(child) => stack.push(child),
                None => {
                    stack.pop();
                }
            }
        }

        if pruned {
            warn!(
                limit = self.max_depth,
                solutions = solutions.len(),
                "resolution depth limit reached, deeper branches pruned"
            );
        }
        (solutions, pruned)
    }

    /// Copy a clause with all of its variables renamed apart.
    fn rename(&mut self, clause: &Clause) -> (Atom, Vec<Atom>) {
        self.fresh += 1;
        let suffix = self.fresh;
        let mut anonymous = 0usize;

        let mut rename_atom = |atom: &Atom| Atom {
            predicate: atom.predicate.clone(),
            args: atom
                .args
                .iter()
                .map(|arg| match arg {
                    Term::Variable(name) if name == "_" => {
                        anonymous += 1;
                        Term::Variable(format!("_#{}_{}", suffix, anonymous))
                    }
                    Term::Variable(name) => Term::Variable(format!("{}#{}", name, suffix)),
                    constant => constant.clone(),
                })
                .collect(),
        };

        let head = rename_atom(&clause.head);
        let body = clause.body.iter().map(&mut rename_atom).collect();
        (head, body)
    }

    fn fresh_variable(&mut self, base: &str) -> Term {
        self.fresh += 1;
        Term::Variable(format!("{}#{}", base, self.fresh))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn clauses(texts: &[&str]) -> Vec<Clause> {
        texts.iter().map(|t| Clause::parse(t).unwrap()).collect()
    }

    fn solve(kb: &[Clause], goal: &str) -> Result<Vec<Binding>, QueryError> {
        Resolver::new(kb, 64, 1024).solve(&Atom::parse(goal).unwrap())
    }

    fn values(bindings: &[Binding], var: &str) -> Vec<String> {
        bindings
            .iter()
            .filter_map(|b| b.get(var).map(str::to_string))
            .collect()
    }

    #[test]
    fn test_ground_fact() {
        let kb = clauses(&["human(socrates)."]);

        let result = solve(&kb, "human(socrates)").unwrap();
        assert_eq!(result, vec![Binding::new()]);
        assert!(solve(&kb, "human(zeus)").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_predicate_has_no_solutions() {
        let kb = clauses(&["human(socrates)."]);
        assert!(solve(&kb, "philosopher(socrates)").unwrap().is_empty());
        // Arity is part of the predicate identity
        assert!(solve(&kb, "human(socrates, plato)").unwrap().is_empty());
    }

    #[test]
    fn test_rule_chaining() {
        let kb = clauses(&["human(socrates).", "mortal(X) :- human(X)."]);

        assert_eq!(solve(&kb, "mortal(socrates)").unwrap().len(), 1);
        assert_eq!(values(&solve(&kb, "mortal(Y)").unwrap(), "Y"), vec!["socrates"]);
    }

    #[test]
    fn test_enumeration_in_assertion_order() {
        let kb = clauses(&["human(socrates).", "human(plato).", "human(aristotle)."]);

        let result = solve(&kb, "human(X)").unwrap();
        assert_eq!(values(&result, "X"), vec!["socrates", "plato", "aristotle"]);
    }

    #[test]
    fn test_duplicate_proofs_are_kept() {
        let kb = clauses(&["human(plato).", "human(plato)."]);
        assert_eq!(solve(&kb, "human(plato)").unwrap().len(), 2);
    }

    #[test]
    fn test_conjunction_with_anonymous_variable() {
        let kb = clauses(&[
            "human(socrates).",
            "human(plato).",
            "human(aristotle).",
            "teacher(socrates, plato).",
            "teacher(plato, aristotle).",
            "philosopher(X) :- human(X), teacher(X, _).",
        ]);

        let result = solve(&kb, "philosopher(X)").unwrap();
        assert_eq!(values(&result, "X"), vec!["socrates", "plato"]);
        assert!(solve(&kb, "philosopher(aristotle)").unwrap().is_empty());
    }

    #[test]
    fn test_argument_swap_rule() {
        let kb = clauses(&[
            "teacher(socrates, plato).",
            "teacher(plato, aristotle).",
            "student(X, Y) :- teacher(Y, X).",
        ]);

        let result = solve(&kb, "student(S, plato)").unwrap();
        assert_eq!(values(&result, "S"), vec!["aristotle"]);

        let all = solve(&kb, "student(A, B)").unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].get("A"), Some("plato"));
        assert_eq!(all[0].get("B"), Some("socrates"));
    }

    #[test]
    fn test_shared_variable_names_do_not_clash() {
        let kb = clauses(&[
            "parent(a, b).",
            "parent(b, c).",
            "grandparent(X, Z) :- parent(X, Y), parent(Y, Z).",
        ]);

        // The goal reuses the rule's variable names
        let result = solve(&kb, "grandparent(Z, X)").unwrap();
        assert_eq!(values(&result, "Z"), vec!["a"]);
        assert_eq!(values(&result, "X"), vec!["c"]);
    }

    #[test]
    fn test_recursive_rules_terminate() {
        let kb = clauses(&[
            "parent(a, b).",
            "parent(b, c).",
            "parent(c, d).",
            "ancestor(X, Y) :- parent(X, Y).",
            "ancestor(X, Y) :- parent(X, Z), ancestor(Z, Y).",
        ]);

        let result = solve(&kb, "ancestor(a, W)").unwrap();
        assert_eq!(values(&result, "W"), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_left_recursion_hits_depth_limit() {
        let kb = clauses(&["loop(X) :- loop(X)."]);

        let result = Resolver::new(&kb, 16, 1024).solve(&Atom::parse("loop(a)").unwrap());
        assert_eq!(result, Err(QueryError::DepthLimitExceeded { limit: 16 }));
    }

    #[test]
    fn test_symmetric_rule_keeps_found_proofs() {
        let kb = clauses(&["friend(a, b).", "friend(X, Y) :- friend(Y, X)."]);

        // The fact itself, then one more proof per double swap within depth 4
        let result = Resolver::new(&kb, 4, 1024)
            .solve(&Atom::parse("friend(a, b)").unwrap())
            .unwrap();
        assert_eq!(result, vec![Binding::new(); 3]);

        let swapped = Resolver::new(&kb, 4, 1024)
            .solve(&Atom::parse("friend(b, a)").unwrap())
            .unwrap();
        assert!(!swapped.is_empty());

        let unrelated = Resolver::new(&kb, 4, 1024).solve(&Atom::parse("friend(a, c)").unwrap());
        assert_eq!(unrelated, Err(QueryError::DepthLimitExceeded { limit: 4 }));
    }

    #[test]
    fn test_depth_limit_prunes_only_deep_branches() {
        let kb = clauses(&[
            "parent(a, b).",
            "parent(b, c).",
            "parent(c, d).",
            "ancestor(X, Y) :- parent(X, Y).",
            "ancestor(X, Y) :- parent(X, Z), ancestor(Z, Y).",
        ]);

        let result = Resolver::new(&kb, 2, 1024)
            .solve(&Atom::parse("ancestor(a, W)").unwrap())
            .unwrap();
        assert_eq!(values(&result, "W"), vec!["b", "c"]);
    }

    #[test]
    fn test_deep_search_runs_on_a_small_stack() {
        let handle = std::thread::Builder::new()
            .stack_size(64 * 1024)
            .spawn(|| {
                let kb = clauses(&["loop(X) :- loop(X)."]);
                Resolver::new(&kb, 2_000, 1024).solve(&Atom::parse("loop(a)").unwrap())
            })
            .unwrap();

        assert_eq!(
            handle.join().unwrap(),
            Err(QueryError::DepthLimitExceeded { limit: 2_000 })
        );
    }

    #[test]
    fn test_solution_limit() {
        let kb = clauses(&["n(a).", "n(b).", "n(c).", "n(d)."]);

        let result = Resolver::new(&kb, 64, 2).solve(&Atom::parse("n(X)").unwrap()).unwrap();
        assert_eq!(values(&result, "X"), vec!["a", "b"]);
    }

    #[test]
    fn test_unbound_variable_in_answer() {
        let kb = clauses(&["likes(X, wine)."]);

        let result = solve(&kb, "likes(Who, wine)").unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].get("Who"), Some("_"));
    }
}
