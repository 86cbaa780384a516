//! Contract tree model.
//!
//! A contract is a tree whose leaves are [`ContractProcedure`]s and whose
//! interior nodes are [`ContractRouter`]s keyed by name. Each procedure
//! carries its HTTP [`Route`] (method and path template, both optional) and
//! opaque [`Schema`] handles for its input and output types.
//!
//! ```
//! use ewe_contract::{procedure, ContractRouter};
//!
//! let contract = ContractRouter::new()
//!     .procedure("greet", procedure().with_path("/greet").with_output::<String>())
//!     .router(
//!         "user",
//!         ContractRouter::new().procedure("get", procedure().with_path("/user/{id}")),
//!     );
//!
//! assert_eq!(contract.len(), 2);
//! ```

pub mod procedure;
pub mod route;
pub mod router;
pub mod schema;

pub use procedure::{procedure, ContractProcedure};
pub use route::Route;
pub use router::{ContractNode, ContractRouter};
pub use schema::Schema;
