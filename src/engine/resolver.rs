//! Stable topological sort over any graph whose nodes can name themselves
//!
//! Nodes implement ResolvableNode, and a DependencyFetcher looks up the
//! direct dependencies of a node.  Every node comes out after all of its
//! dependencies, exactly once.

use std::collections::HashMap;
use std::error;
use std::fmt;

pub trait ResolvableNode: Clone + fmt::Debug {
    fn node_id(&self) -> &str;
}

pub trait DependencyFetcher<T: ResolvableNode> {
    type Error: From<CircularDependencyError>;

    fn get_node_dependencies(&self, node: &T) -> Result<Vec<T>, Self::Error>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircularDependencyError {
    /// Ids of the nodes still being visited when the cycle closed, outermost first
    pub chain: Vec<String>,
    pub node_id: String,
}

impl fmt::Display for CircularDependencyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Dependency cycle through {}: {} -> {}", self.node_id, self.chain.join(" -> "), self.node_id)
    }
}

impl error::Error for CircularDependencyError {}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Open,
    Done,
}

/// Orders everything reachable from `roots`.  Roots are taken in the order
/// given and each node's dependencies in the order the fetcher returns them, so
/// the same input always yields the same output.
pub fn resolve<T, L>(roots: &[T], fetcher: &L) -> Result<Vec<T>, L::Error>
where
    T: ResolvableNode,
    L: DependencyFetcher<T>,
{
    let mut marks: HashMap<String, Mark> = HashMap::new();
    let mut ordered = Vec::new();

    for root in roots {
        // (node, dependencies already pushed)
        let mut stack = vec![(root.clone(), false)];

        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                marks.insert(node.node_id().to_string(), Mark::Done);
                ordered.push(node);
                continue;
            }

            match marks.get(node.node_id()) {
                Some(Mark::Done) => continue,
                Some(Mark::Open) => return Err(cycle(&stack, node.node_id()).into()),
                None => (),
            }

            marks.insert(node.node_id().to_string(), Mark::Open);
            let dependencies = fetcher.get_node_dependencies(&node)?;
            stack.push((node, true));

            for dep in dependencies.into_iter().rev() {
                match marks.get(dep.node_id()) {
                    Some(Mark::Done) => (),
                    Some(Mark::Open) => return Err(cycle(&stack, dep.node_id()).into()),
                    None => stack.push((dep, false)),
                }
            }
        }
    }

    Ok(ordered)
}

fn cycle<T: ResolvableNode>(stack: &[(T, bool)], node_id: &str) -> CircularDependencyError {
    CircularDependencyError {
        chain: stack.iter()
            .filter(|(_, expanded)| *expanded)
            .map(|(node, _)| node.node_id().to_string())
            .collect(),
        node_id: node_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Named(&'static str);

    impl ResolvableNode for Named {
        fn node_id(&self) -> &str {
            self.0
        }
    }

    #[derive(Debug, PartialEq)]
    enum TestError {
        Cycle(CircularDependencyError),
        Unknown(&'static str),
    }

    impl From<CircularDependencyError> for TestError {
        fn from(e: CircularDependencyError) -> Self {
            TestError::Cycle(e)
        }
    }

    /// Adjacency list keyed by node name
    struct Edges(Vec<(&'static str, Vec<&'static str>)>);

    impl DependencyFetcher<Named> for Edges {
        type Error = TestError;

        fn get_node_dependencies(&self, node: &Named) -> Result<Vec<Named>, TestError> {
            match self.0.iter().find(|(name, _)| *name == node.0) {
                Some((_, deps)) => Ok(deps.iter().map(|d| Named(*d)).collect()),
                None => Err(TestError::Unknown(node.0)),
            }
        }
    }

    fn order(edges: &Edges, roots: &[&'static str]) -> Result<Vec<&'static str>, TestError> {
        let roots: Vec<Named> = roots.iter().map(|r| Named(*r)).collect();
        Ok(resolve(&roots, edges)?.into_iter().map(|n| n.0).collect())
    }

    #[test]
    fn test_chain() {
        let edges = Edges(vec![
            ("pkg", vec!["src"]),
            ("res", vec!["pkg"]),
            ("src", vec![]),
        ]);

        assert_eq!(order(&edges, &["res"]).unwrap(), vec!["src", "pkg", "res"]);
    }

    #[test]
    fn test_shared_dependency_emitted_once() {
        let edges = Edges(vec![
            ("a", vec!["b", "c"]),
            ("b", vec!["d"]),
            ("c", vec!["d"]),
            ("d", vec![]),
        ]);

        assert_eq!(order(&edges, &["a"]).unwrap(), vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn test_transitive_dependency_first() {
        let edges = Edges(vec![
            ("a", vec!["b", "c"]),
            ("b", vec!["c", "d"]),
            ("c", vec!["d"]),
            ("d", vec![]),
        ]);

        assert_eq!(order(&edges, &["a"]).unwrap(), vec!["d", "c", "b", "a"]);
    }

    #[test]
    fn test_roots_keep_their_order() {
        let edges = Edges(vec![
            ("src", vec![]),
            ("pkg1", vec!["src"]),
            ("res", vec!["pkg1"]),
            ("pkg2", vec!["src"]),
            ("setting", vec![]),
        ]);

        let ordered = order(&edges, &["res", "pkg2", "setting", "pkg1", "src"]).unwrap();
        assert_eq!(ordered, vec!["src", "pkg1", "res", "pkg2", "setting"]);
    }

    #[test]
    fn test_cycle() {
        let edges = Edges(vec![
            ("a", vec!["b"]),
            ("b", vec!["c"]),
            ("c", vec!["a"]),
        ]);

        match order(&edges, &["a"]) {
            Err(TestError::Cycle(e)) => {
                assert_eq!(e.node_id, "a");
                assert_eq!(e.chain, vec!["a", "b", "c"]);
            },
            other => panic!("expected a cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_self_dependency() {
        let edges = Edges(vec![("a", vec!["a"])]);
        assert!(matches!(order(&edges, &["a"]), Err(TestError::Cycle(_))));
    }

    #[test]
    fn test_fetcher_error_propagates() {
        let edges = Edges(vec![("a", vec!["ghost"])]);
        assert_eq!(order(&edges, &["a"]), Err(TestError::Unknown("ghost")));
    }
}
