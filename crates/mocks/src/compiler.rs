use core::fmt;

use ewe_contract::ContractProcedure;
use ewe_routing::{HandlerError, HttpHandler, Method, Params, Request, Response, join_url};

use crate::{
    codec::Codecs,
    mock::{MockResponse, MockResult, ProcedureContext},
    path::{derive_template, translate_path},
};

/// Methods a contract may declare. Anything else is served as POST.
pub const RECOGNIZED_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
    Method::HEAD,
];

/// Where and how a procedure is served once compiled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedRoute {
    /// The method the handler answers to.
    pub method: Method,

    /// The declared or derived path template, still in `{name}` syntax.
    pub template: String,

    /// The template translated into the runtime's `:name` syntax.
    pub pattern: String,

    /// The pattern joined onto the base url; what the handler matches.
    pub url: String,
}

impl fmt::Display for ResolvedRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// Resolves a declared method name, falling back to POST.
#[must_use]
pub fn resolve_method(declared: Option<&str>) -> Method {
    let Some(name) = declared else {
        return Method::POST;
    };

    match RECOGNIZED_METHODS.iter().find(|method| method.as_str() == name) {
        Some(method) => method.clone(),
        None => {
            ewe_trace::warn!(
                declared = name,
                "unrecognized procedure method, serving it as POST"
            );
            Method::POST
        }
    }
}

#[must_use]
pub fn resolve_route(
    procedure: &ContractProcedure,
    path: &[String],
    base_url: &str,
) -> ResolvedRoute {
    let method = resolve_method(procedure.method());
    let template = match procedure.path() {
        Some(declared) => String::from(declared),
        None => derive_template(path),
    };
    let pattern = translate_path(&template);
    let url = join_url(base_url, &pattern);

    ResolvedRoute {
        method,
        template,
        pattern,
        url,
    }
}

/// Builds the runtime handler answering `route` with `mock`.
pub(crate) fn compile_handler(
    route: &ResolvedRoute,
    path: Vec<String>,
    codecs: Codecs,
    mock: MockResponse,
) -> HttpHandler {
    ewe_trace::debug!(route = %route, path = ?path, "compiling mock handler");

    let reads_query = route.method == Method::GET;
    HttpHandler::new(route.method.clone(), &route.url, move |request, params| {
        let path = path.clone();
        let codecs = codecs.clone();
        let mock = mock.clone();
        async move {
            answer(request, params, path, &codecs, &mock, reads_query)
                .await
                .map_err(|err| {
                    ewe_trace::error!("mock handler failed: {}", err);
                    HandlerError::new(err)
                })
        }
    })
}

async fn answer(
    request: Request,
    params: Params,
    path: Vec<String>,
    codecs: &Codecs,
    mock: &MockResponse,
    reads_query: bool,
) -> MockResult<Response> {
    let input = if reads_query {
        codecs.decode_query(request.query().unwrap_or_default())?
    } else {
        codecs.decode_body(&request.text_lossy())?
    };

    ewe_trace::debug!(
        method = %request.method(),
        url = %request.url(),
        "mock handler answering"
    );

    let context = ProcedureContext {
        request,
        path,
        params,
        input,
    };
    mock.evaluate(context).await?.into_response()
}
