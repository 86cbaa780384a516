use std::{collections::BTreeMap, sync::Arc};

use crate::procedure::ContractProcedure;

/// A node of the contract tree.
///
/// Children are shared through `Arc`, handing out a subtree never copies it.
#[derive(Clone, Debug)]
pub enum ContractNode {
    Procedure(Arc<ContractProcedure>),
    Router(ContractRouter),
}

impl ContractNode {
    #[must_use]
    pub fn as_procedure(&self) -> Option<&Arc<ContractProcedure>> {
        match self {
            ContractNode::Procedure(procedure) => Some(procedure),
            ContractNode::Router(_) => None,
        }
    }

    #[must_use]
    pub fn as_router(&self) -> Option<&ContractRouter> {
        match self {
            ContractNode::Procedure(_) => None,
            ContractNode::Router(router) => Some(router),
        }
    }

    #[must_use]
    pub fn is_procedure(&self) -> bool {
        matches!(self, ContractNode::Procedure(_))
    }
}

impl From<ContractProcedure> for ContractNode {
    fn from(value: ContractProcedure) -> Self {
        ContractNode::Procedure(Arc::new(value))
    }
}

impl From<ContractRouter> for ContractNode {
    fn from(value: ContractRouter) -> Self {
        ContractNode::Router(value)
    }
}

/// An interior node of the contract tree mapping keys to child nodes.
#[derive(Clone, Debug, Default)]
pub struct ContractRouter {
    entries: BTreeMap<String, Arc<ContractNode>>,
}

impl ContractRouter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn procedure(mut self, key: impl Into<String>, procedure: ContractProcedure) -> Self {
        self.insert(key, procedure);
        self
    }

    #[must_use]
    pub fn router(mut self, key: impl Into<String>, router: ContractRouter) -> Self {
        self.insert(key, router);
        self
    }

    /// Inserts or replaces the child at `key`.
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<ContractNode>) {
        self.entries.insert(key.into(), Arc::new(node.into()));
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Arc<ContractNode>> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
