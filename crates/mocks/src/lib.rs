//! Mock HTTP handlers compiled straight from a contract tree.
//!
//! Wrap a contract with [`create_mock_utilities`], walk it down to a
//! procedure and call `handler` with the response it should give. The
//! result is an [`ewe_routing::HttpHandler`] answering at the procedure's
//! method and url (its declared path, or its position in the tree, joined
//! onto the base url), ready to be installed into an
//! [`ewe_routing::Interceptor`].
//!
//! ```
//! use ewe_contract::{procedure, ContractRouter};
//! use ewe_contract_mocks::{create_mock_utilities, MockResponse};
//! use ewe_routing::{Interceptor, Method};
//! use serde_json::json;
//!
//! let contract = ContractRouter::new()
//!     .procedure("users", procedure().with_method("GET").with_path("/users/{id}"));
//!
//! let mocks = create_mock_utilities(contract, "http://localhost:3000/api");
//! let users = mocks.procedure("users").unwrap();
//! let handler = users.handler(MockResponse::from_fn(|ctx| {
//!     Ok(json!({ "id": ctx.param("id").and_then(|id| id.as_str()) }))
//! }));
//!
//! assert_eq!(handler.method(), &Method::GET);
//! assert_eq!(
//!     handler.pattern().source(),
//!     "http://localhost:3000/api/users/:id"
//! );
//!
//! let interceptor = Interceptor::new([handler]);
//! assert_eq!(interceptor.list_handlers().unwrap().len(), 1);
//! ```

pub mod codec;
pub mod compiler;
pub mod mock;
pub mod path;
pub mod settings;
pub mod traversal;
pub mod typed;

pub use codec::{BodyDecoder, BracketNotation, Codecs, DecodeError, QueryDecoder, RelaxedLiteral};
pub use compiler::{resolve_method, resolve_route, ResolvedRoute, RECOGNIZED_METHODS};
pub use mock::{MockError, MockResponse, MockResult, ProcedureContext, Reply};
pub use path::{derive_template, translate_path};
pub use settings::{MockSettings, SettingsError, SettingsResult};
pub use traversal::{create_mock_utilities, MockNode, MockUtilities, ProcedureMock, RouterMocks};
pub use typed::{MockOutput, TypedContext, TypedProcedureMock};
