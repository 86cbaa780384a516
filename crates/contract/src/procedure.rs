use crate::{route::Route, schema::Schema};

/// A leaf of the contract tree: a single remotely invocable operation.
#[derive(Clone, Debug, Default)]
pub struct ContractProcedure {
    route: Route,
    input: Schema,
    output: Schema,
}

/// Starts a procedure definition with an empty route and unspecified schemas.
#[must_use]
pub fn procedure() -> ContractProcedure {
    ContractProcedure::default()
}

impl ContractProcedure {
    #[must_use]
    pub fn new(route: Route) -> Self {
        Self {
            route,
            input: Schema::unspecified(),
            output: Schema::unspecified(),
        }
    }

    #[must_use]
    pub fn with_route(mut self, route: Route) -> Self {
        self.route = route;
        self
    }

    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.route.method = Some(method.into());
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.route.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_input<T: 'static>(mut self) -> Self {
        self.input = Schema::of::<T>();
        self
    }

    #[must_use]
    pub fn with_output<T: 'static>(mut self) -> Self {
        self.output = Schema::of::<T>();
        self
    }

    #[must_use]
    pub fn route(&self) -> &Route {
        &self.route
    }

    #[must_use]
    pub fn method(&self) -> Option<&str> {
        self.route.method.as_deref()
    }

    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.route.path.as_deref()
    }

    #[must_use]
    pub fn input(&self) -> Schema {
        self.input
    }

    #[must_use]
    pub fn output(&self) -> Schema {
        self.output
    }
}
