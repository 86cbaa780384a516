use ewe_contract::{procedure, ContractRouter};
use ewe_contract_mocks::{MockNode, MockOutput, MockResponse, MockSettings};
use ewe_routing::{Interceptor, Method, Request, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Deserialize)]
struct Filter {
    limit: String,
}

#[derive(Serialize)]
struct Listing {
    group: String,
    files: Vec<String>,
    limit: String,
}

fn contract() -> ContractRouter {
    ContractRouter::new()
        .router(
            "files",
            ContractRouter::new()
                .procedure(
                    "list",
                    procedure()
                        .with_method("GET")
                        .with_path("/files/{group}/{+rest}")
                        .with_input::<Filter>()
                        .with_output::<Listing>(),
                )
                .procedure("touch", procedure().with_method("options")),
        )
        .procedure(
            "report",
            procedure().with_method("GET").with_path("/files/{id}.json"),
        )
        .procedure("versioned", procedure().with_method("GET").with_path("/v{ver}/x"))
        .router(
            "group",
            ContractRouter::new().procedure("leaf", procedure().with_method("GET")),
        )
}

fn mocks() -> MockNode {
    let settings = MockSettings::from_toml_str(r#"base_url = "http://localhost:3000/api""#).unwrap();
    MockNode::with_settings(contract(), &settings)
}

#[tokio::test]
async fn path_params_and_catch_all_reach_the_mock() {
    let list = mocks().at(&["files", "list"]).and_then(MockNode::into_procedure).unwrap();
    let handler = list.typed::<Filter, Listing>().handler_fn(|ctx| {
        let group = ctx.params["group"].as_str().unwrap_or_default().to_string();
        let files = ctx.params["rest"].as_slice().unwrap_or_default().to_vec();
        Ok(MockOutput::Value(Listing {
            group,
            files,
            limit: ctx.input.limit,
        }))
    });
    let interceptor = Interceptor::new([handler]);

    let request = Request::get("http://localhost:3000/api/files/docs/a/b/c.txt?limit=10").unwrap();
    let response = interceptor.dispatch(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json_body::<Value>().unwrap(),
        json!({"group": "docs", "files": ["a", "b", "c.txt"], "limit": "10"})
    );

    let request = Request::get("http://localhost:3000/api/files/docs?limit=10").unwrap();
    assert!(interceptor.dispatch(request).await.is_err());
}

#[tokio::test]
async fn structural_path_is_the_default_url() {
    let leaf = mocks().at(&["group", "leaf"]).and_then(MockNode::into_procedure).unwrap();
    let interceptor = Interceptor::new([leaf.handler(MockResponse::from_fn(|ctx| Ok(ctx.input)))]);

    let request = Request::get("http://localhost:3000/api/group/leaf?name=world").unwrap();
    let response = interceptor.dispatch(request).await.unwrap();
    assert_eq!(response.json_body::<Value>().unwrap(), json!({"name": "world"}));
}

#[tokio::test]
async fn unrecognized_method_is_served_as_post() {
    let touch = mocks().at(&["files", "touch"]).and_then(MockNode::into_procedure).unwrap();
    assert_eq!(touch.route().method, Method::POST);

    let interceptor = Interceptor::new([touch.handler(json!({"touched": true}))]);
    let request = Request::post("http://localhost:3000/api/files/touch", "").unwrap();
    let response = interceptor.dispatch(request).await.unwrap();
    assert_eq!(response.json_body::<Value>().unwrap(), json!({"touched": true}));

    let request = Request::build(Method::OPTIONS, "http://localhost:3000/api/files/touch", "").unwrap();
    assert!(interceptor.dispatch(request).await.is_err());
}

#[tokio::test]
async fn params_with_literal_text_around_them_are_captured() {
    let echo_params = || MockResponse::from_fn(|ctx| Ok(json!(ctx.params)));
    let report = mocks().procedure("report").unwrap();
    let versioned = mocks().procedure("versioned").unwrap();
    assert_eq!(report.route().url, "http://localhost:3000/api/files/:id.json");

    let interceptor = Interceptor::new([
        report.handler(echo_params()),
        versioned.handler(echo_params()),
    ]);

    let request = Request::get("http://localhost:3000/api/files/report.json").unwrap();
    let response = interceptor.dispatch(request).await.unwrap();
    assert_eq!(response.json_body::<Value>().unwrap(), json!({"id": "report"}));

    let request = Request::get("http://localhost:3000/api/v2/x").unwrap();
    let response = interceptor.dispatch(request).await.unwrap();
    assert_eq!(response.json_body::<Value>().unwrap(), json!({"ver": "2"}));
}
