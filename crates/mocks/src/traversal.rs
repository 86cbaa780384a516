use core::fmt;
use std::sync::Arc;

use ewe_contract::{ContractNode, ContractProcedure};
use ewe_routing::HttpHandler;

use crate::{
    codec::Codecs,
    compiler::{compile_handler, resolve_route, ResolvedRoute},
    mock::{MockError, MockResponse, MockResult},
    settings::MockSettings,
    typed::TypedProcedureMock,
};

#[derive(Debug)]
struct Shared {
    base_url: String,
    codecs: Codecs,
}

/// The root of a mock tree; see [`MockNode`].
pub type MockUtilities = MockNode;

/// Wraps `contract` so that each of its procedures can produce a mock
/// handler served under `base_url`.
pub fn create_mock_utilities(
    contract: impl Into<ContractNode>,
    base_url: impl Into<String>,
) -> MockUtilities {
    MockNode::new(contract, base_url)
}

/// A position in the mock tree, mirroring the contract node at the same
/// structural path.
///
/// Children are only wrapped when accessed, so building the root is cheap
/// whatever the size of the contract.
#[derive(Clone, Debug)]
pub enum MockNode {
    Procedure(ProcedureMock),
    Router(RouterMocks),
}

impl MockNode {
    pub fn new(contract: impl Into<ContractNode>, base_url: impl Into<String>) -> Self {
        Self::with_codecs(contract, base_url, Codecs::default())
    }

    pub fn with_settings(contract: impl Into<ContractNode>, settings: &MockSettings) -> Self {
        Self::with_codecs(contract, settings.base_url.clone(), settings.codecs())
    }

    pub fn with_codecs(
        contract: impl Into<ContractNode>,
        base_url: impl Into<String>,
        codecs: Codecs,
    ) -> Self {
        let shared = Arc::new(Shared {
            base_url: base_url.into(),
            codecs,
        });
        Self::from_parts(shared, Arc::new(contract.into()), Vec::new())
    }

    fn from_parts(shared: Arc<Shared>, node: Arc<ContractNode>, path: Vec<String>) -> Self {
        match node.as_ref() {
            ContractNode::Procedure(procedure) => MockNode::Procedure(ProcedureMock {
                shared,
                procedure: procedure.clone(),
                path,
            }),
            ContractNode::Router(_) => MockNode::Router(RouterMocks { shared, node, path }),
        }
    }

    #[must_use]
    pub fn path(&self) -> &[String] {
        match self {
            MockNode::Procedure(procedure) => procedure.path(),
            MockNode::Router(router) => router.path(),
        }
    }

    /// The child at `key`. Procedures have no children.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<MockNode> {
        match self {
            MockNode::Procedure(_) => None,
            MockNode::Router(router) => router.get(key),
        }
    }

    /// Follows `keys` one level at a time.
    #[must_use]
    pub fn at(&self, keys: &[&str]) -> Option<MockNode> {
        keys.iter()
            .try_fold(self.clone(), |node, key| node.get(key))
    }

    #[must_use]
    pub fn router(&self, key: &str) -> Option<RouterMocks> {
        self.get(key).and_then(MockNode::into_router)
    }

    #[must_use]
    pub fn procedure(&self, key: &str) -> Option<ProcedureMock> {
        self.get(key).and_then(MockNode::into_procedure)
    }

    #[must_use]
    pub fn as_procedure(&self) -> Option<&ProcedureMock> {
        match self {
            MockNode::Procedure(procedure) => Some(procedure),
            MockNode::Router(_) => None,
        }
    }

    #[must_use]
    pub fn as_router(&self) -> Option<&RouterMocks> {
        match self {
            MockNode::Procedure(_) => None,
            MockNode::Router(router) => Some(router),
        }
    }

    #[must_use]
    pub fn into_procedure(self) -> Option<ProcedureMock> {
        match self {
            MockNode::Procedure(procedure) => Some(procedure),
            MockNode::Router(_) => None,
        }
    }

    #[must_use]
    pub fn into_router(self) -> Option<RouterMocks> {
        match self {
            MockNode::Procedure(_) => None,
            MockNode::Router(router) => Some(router),
        }
    }

    /// Builds the handler when this node is a procedure, which is how a
    /// contract made of a single procedure is mocked.
    ///
    /// # Errors
    ///
    /// `MockError::NotAProcedure` when this node is a router.
    pub fn handler(&self, mock: impl Into<MockResponse>) -> MockResult<HttpHandler> {
        match self {
            MockNode::Procedure(procedure) => Ok(procedure.handler(mock)),
            MockNode::Router(router) => Err(MockError::NotAProcedure {
                path: router.path.clone(),
            }),
        }
    }
}

/// A contract router wrapped for mocking.
#[derive(Clone)]
pub struct RouterMocks {
    shared: Arc<Shared>,
    node: Arc<ContractNode>,
    path: Vec<String>,
}

impl fmt::Debug for RouterMocks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterMocks")
            .field("path", &self.path)
            .field("keys", &self.keys())
            .finish_non_exhaustive()
    }
}

impl RouterMocks {
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// The router's direct children, in key order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.node
            .as_router()
            .map(|router| router.keys().map(String::from).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<MockNode> {
        let child = self.node.as_router()?.get(key)?;

        let mut path = self.path.clone();
        path.push(String::from(key));
        Some(MockNode::from_parts(self.shared.clone(), child.clone(), path))
    }

    #[must_use]
    pub fn at(&self, keys: &[&str]) -> Option<MockNode> {
        let (first, rest) = keys.split_first()?;
        self.get(first)?.at(rest)
    }

    #[must_use]
    pub fn router(&self, key: &str) -> Option<RouterMocks> {
        self.get(key).and_then(MockNode::into_router)
    }

    #[must_use]
    pub fn procedure(&self, key: &str) -> Option<ProcedureMock> {
        self.get(key).and_then(MockNode::into_procedure)
    }
}

/// A contract procedure wrapped for mocking; `handler` turns it into a
/// runtime handler.
#[derive(Clone)]
pub struct ProcedureMock {
    shared: Arc<Shared>,
    procedure: Arc<ContractProcedure>,
    path: Vec<String>,
}

impl fmt::Debug for ProcedureMock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcedureMock")
            .field("path", &self.path)
            .field("procedure", &self.procedure)
            .finish_non_exhaustive()
    }
}

impl ProcedureMock {
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    #[must_use]
    pub fn contract(&self) -> &ContractProcedure {
        &self.procedure
    }

    /// Where the handler would be served, without building it.
    #[must_use]
    pub fn route(&self) -> ResolvedRoute {
        resolve_route(&self.procedure, &self.path, &self.shared.base_url)
    }

    /// Compiles a handler answering every matching request with `mock`.
    /// Each call builds a new handler; installing it is up to the caller.
    pub fn handler(&self, mock: impl Into<MockResponse>) -> HttpHandler {
        compile_handler(
            &self.route(),
            self.path.clone(),
            self.shared.codecs.clone(),
            mock.into(),
        )
    }

    /// Same procedure, with mock functions taking `I` and returning `O`.
    #[must_use]
    pub fn typed<I, O>(&self) -> TypedProcedureMock<I, O> {
        TypedProcedureMock::new(self.clone())
    }
}
