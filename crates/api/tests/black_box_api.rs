use foodtrace_infra::LedgerConfig;
use reqwest::StatusCode;
use serde_json::json;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = foodtrace_api::app::build_app(LedgerConfig::default());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    async fn invoke(
        &self,
        client: &reqwest::Client,
        function: &str,
        args: &[&str],
    ) -> (StatusCode, serde_json::Value) {
        let res = client
            .post(format!("{}/invoke", self.base_url))
            .json(&json!({ "function": function, "args": args }))
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn listing_lifecycle_over_http() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for (function, args) in [
        ("init", vec!["1"]),
        ("init_product", vec!["P1", "10", "NZ"]),
        ("init_product", vec!["P2", "4", "NZ"]),
        ("init_user", vec!["S1", "supplier", "NZ", "ORG1"]),
        ("init_user", vec!["I1", "importer"]),
        ("init_user", vec!["retailer1", "retailer"]),
        ("init_regulator", vec!["R1", "NZ"]),
        ("update_exempted_list", vec!["R1", "org", "ORG1"]),
        ("init_product_listing", vec!["L1", "S1", "P1", "P2"]),
        ("transfer_product_listing", vec!["L1", "I1"]),
        ("check_products", vec!["L1", "R1"]),
    ] {
        let (status, body) = srv.invoke(&client, function, &args).await;
        assert_eq!(status, StatusCode::OK, "{function}: {body}");
        assert_eq!(body["payload"], serde_json::Value::Null);
    }

    let listing: serde_json::Value = client
        .get(format!("{}/listings/L1", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listing["status"], "HAZARDANALYSISCHECKREQ");
    assert_eq!(listing["ownertype"], "Importer");

    // Flagged listings cannot move on until the follow-up check.
    let (status, body) = srv
        .invoke(&client, "transfer_product_listing", &["L1", "retailer1"])
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_state");

    let (status, _) = srv.invoke(&client, "check_products", &["L1", "R1"]).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = srv
        .invoke(&client, "transfer_product_listing", &["L1", "retailer1"])
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = srv.invoke(&client, "read_everything", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"]["retailers"][0]["products"], json!(["P1", "P2"]));
    assert_eq!(body["payload"]["retailers"][0]["type"], "retailer");
    assert_eq!(body["payload"]["listingcontracts"][0]["ownertype"], "Retailer");

    // Listing history by id, and by explicit namespace.
    for path in ["history/L1", "history/productlistingcontract/L1"] {
        let res = client
            .get(format!("{}/{path}", srv.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "{path}");
        let history: serde_json::Value = res.json().await.unwrap();
        let last = history.as_array().unwrap().last().unwrap().clone();
        assert_eq!(last["value"]["ownertype"], "Retailer", "{path}");
    }

    let res = client
        .get(format!("{}/history/warehouse/L1", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn failures_carry_code_and_message() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = srv.invoke(&client, "mint_money", &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "unknown_function");
    assert_eq!(
        body["message"],
        "Received unknown invoke function name - 'mint_money'"
    );

    let (status, body) = srv.invoke(&client, "check_products", &["L1", ""]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Argument 1 must be a non-empty string");

    let (status, body) = srv.invoke(&client, "read", &["missing"]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let res = client
        .post(format!("{}/query", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Unknown supported call - Query()");
}

#[tokio::test]
async fn raw_reads_and_history() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    srv.invoke(&client, "init", &[]).await;
    let (status, body) = srv.invoke(&client, "read", &["food_reg_ui"]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"], "4.0.1");

    srv.invoke(&client, "write", &["note", "first"]).await;
    srv.invoke(&client, "write", &["note", "second"]).await;

    let history: serde_json::Value = client
        .get(format!("{}/history/note", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let values: Vec<&str> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["value"].as_str().unwrap())
        .collect();
    assert_eq!(values, vec!["first", "second"]);
}
