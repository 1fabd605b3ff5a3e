//! Graph builder. Nodes are registered by id and wired with plain edges or with a router
//! that picks the successor from the state; [`START`] and [`END`] mark entry and exit.
//!
//! Each node gets at most one way out: a single edge or a router. Whatever a node returns
//! becomes the whole state for the next step.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use crate::graph::compile_error::CompilationError;
use crate::graph::compiled::CompiledStateGraph;
use crate::graph::conditional::{ConditionalRouter, ConditionalRouterFn, NextEntry};
use crate::graph::node::Node;
use crate::memory::Checkpointer;

/// Pseudo-node the first edge leaves from.
pub const START: &str = "__start__";

/// Pseudo-node that finishes a run when reached.
pub const END: &str = "__end__";

/// Mutable description of a graph over state `S`; [`compile`](Self::compile) checks it and
/// freezes it into a [`CompiledStateGraph`].
pub struct StateGraph<S> {
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    edges: Vec<(String, String)>,
    conditional_edges: HashMap<String, ConditionalRouter<S>>,
}

impl<S> Default for StateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: Vec::new(),
            conditional_edges: HashMap::new(),
        }
    }

    /// Registers `node` under `id`. A later call with the same id wins.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node<S>>) -> &mut Self {
        self.nodes.insert(id.into(), node);
        self
    }

    /// Wires `from_id` to `to_id` unconditionally.
    pub fn add_edge(&mut self, from_id: impl Into<String>, to_id: impl Into<String>) -> &mut Self {
        self.edges.push((from_id.into(), to_id.into()));
        self
    }

    /// Lets `path` choose what runs after `source`. Its result names a node (or END)
    /// directly, or, with `path_map`, is a key translated through the map; keys missing
    /// from the map are used as node ids.
    pub fn add_conditional_edges(
        &mut self,
        source: impl Into<String>,
        path: ConditionalRouterFn<S>,
        path_map: Option<HashMap<String, String>>,
    ) -> &mut Self {
        self.conditional_edges
            .insert(source.into(), ConditionalRouter::new(path, path_map));
        self
    }

    /// Checks the wiring and returns a runnable graph without persistence.
    pub fn compile(self) -> Result<CompiledStateGraph<S>, CompilationError> {
        self.compile_internal(None)
    }

    /// Like [`compile`](Self::compile), but runs that carry a `thread_id` store their final
    /// state in `checkpointer`.
    pub fn compile_with_checkpointer(
        self,
        checkpointer: Arc<dyn Checkpointer<S>>,
    ) -> Result<CompiledStateGraph<S>, CompilationError> {
        self.compile_internal(Some(checkpointer))
    }

    fn is_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Every edge endpoint and path-map target must be a node (or START/END).
    fn check_targets(&self) -> Result<(), CompilationError> {
        let unknown = self.edges.iter().find_map(|(from, to)| {
            if from != START && !self.is_node(from) {
                Some(from)
            } else if to != END && !self.is_node(to) {
                Some(to)
            } else {
                None
            }
        });
        if let Some(id) = unknown {
            return Err(CompilationError::NodeNotFound(id.clone()));
        }
        for (source, router) in &self.conditional_edges {
            if !self.is_node(source) {
                return Err(CompilationError::NodeNotFound(source.clone()));
            }
            let targets = router.path_map.iter().flat_map(|m| m.values());
            if let Some(bad) = targets.into_iter().find(|t| *t != END && !self.is_node(t)) {
                return Err(CompilationError::InvalidConditionalPathMap(bad.clone()));
            }
        }
        Ok(())
    }

    /// The single node reached from START.
    fn entry(&self) -> Result<String, CompilationError> {
        let mut targets = self.edges.iter().filter(|(f, _)| f == START).map(|(_, t)| t);
        match (targets.next(), targets.next()) {
            (None, _) => Err(CompilationError::MissingStart),
            (Some(_), Some(_)) => Err(CompilationError::InvalidChain(
                "multiple edges from START (branch)".into(),
            )),
            (Some(first), None) => Ok(first.clone()),
        }
    }

    /// Some edge reaches END. A router without a path map may return END at run time.
    fn reaches_end(&self) -> bool {
        self.edges.iter().any(|(_, t)| t == END)
            || self.conditional_edges.values().any(|r| match &r.path_map {
                None => true,
                Some(map) => map.values().any(|v| v == END),
            })
    }

    fn compile_internal(
        self,
        checkpointer: Option<Arc<dyn Checkpointer<S>>>,
    ) -> Result<CompiledStateGraph<S>, CompilationError> {
        self.check_targets()?;
        let first = self.entry()?;
        if !self.reaches_end() {
            return Err(CompilationError::MissingEnd);
        }

        let mut next_map: HashMap<String, NextEntry<S>> = HashMap::new();
        for (from, to) in self.edges.iter().filter(|(f, _)| f != START) {
            if self.conditional_edges.contains_key(from) {
                return Err(CompilationError::NodeHasBothEdgeAndConditional(from.clone()));
            }
            let previous = next_map.insert(from.clone(), NextEntry::Unconditional(to.clone()));
            if previous.is_some() {
                return Err(CompilationError::InvalidChain("duplicate from (branch)".into()));
            }
        }

        // Without routers a chain that never reaches END would loop forever.
        if self.conditional_edges.is_empty() {
            let mut seen = HashSet::from([first.clone()]);
            let mut current = &first;
            while let Some(NextEntry::Unconditional(next)) = next_map.get(current) {
                if next == END {
                    break;
                }
                if !seen.insert(next.clone()) {
                    return Err(CompilationError::InvalidChain("cycle detected".into()));
                }
                current = next;
            }
        }

        next_map.extend(
            self.conditional_edges
                .into_iter()
                .map(|(source, router)| (source, NextEntry::Conditional(router))),
        );

        Ok(CompiledStateGraph {
            nodes: self.nodes,
            first_node_id: first,
            next_map,
            checkpointer,
        })
    }
}
