use axum::http::StatusCode;
use axum_test::TestServer;
use submarine_payreq::testing::InvoiceFixture;
use submarine_payreq::{bech32, Currency};
use submarine_web::{build_router, AppState, WebConfig};

fn server_with(config: WebConfig) -> TestServer {
    let state = AppState::from_config(config).unwrap();
    TestServer::new(build_router(state)).unwrap()
}

fn server() -> TestServer {
    server_with(WebConfig::default())
}

fn testnet_invoice() -> String {
    InvoiceFixture::new(Currency::BTC_TESTNET)
        .amount("2500u")
        .description("1 cup coffee")
        .encode()
}

#[tokio::test]
async fn health_reports_healthy() {
    let response = server().get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["swap_expiry_hours"], 72);
    assert_eq!(body["currencies"].as_array().map(|c| c.len()), Some(Currency::ALL.len()));
}

#[tokio::test]
async fn home_and_unknown_paths() {
    let server = server();
    server.get("/").await.assert_status_ok();

    let response = server.get("/nope").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.text(), "Not Found");
}

#[tokio::test]
async fn swap_form_page_binds_validation() {
    let response = server().get("/swap").await;
    response.assert_status_ok();

    let page = response.text();
    assert!(page.contains(r#"class="validate-form""#));
    assert!(page.contains(r#"name="deposit""#));
    assert!(page.contains(&format!("<option>{}</option>", submarine_form::DEPOSIT_PLACEHOLDER)));
    assert!(page.contains(r#"value="tltc""#));
}

#[tokio::test]
async fn validate_accepts_matching_networks() {
    let invoice = testnet_invoice();
    let response = server()
        .post("/ajaxvalidateform")
        .form(&[("deposit", "tltc"), ("invoice", invoice.as_str())])
        .await;

    response.assert_status_ok();
    assert_eq!(response.text(), "");
}

#[tokio::test]
async fn validate_reports_network_mismatch() {
    let invoice = testnet_invoice();
    let response = server()
        .post("/ajaxvalidateform")
        .form(&[("deposit", "bc"), ("invoice", invoice.as_str())])
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.text(),
        "Both deposit and invoice currencies must be on same network"
    );
}

#[tokio::test]
async fn validate_reports_deposit_after_invoice() {
    let server = server();
    let invoice = testnet_invoice();

    let response = server
        .post("/ajaxvalidateform")
        .form(&[("deposit", submarine_form::DEPOSIT_PLACEHOLDER), ("invoice", invoice.as_str())])
        .await;
    assert_eq!(response.text(), "Deposit currency is not supported");

    let response = server
        .post("/ajaxvalidateform")
        .form(&[("deposit", "doge"), ("invoice", "lnbc1qqqqqqqqqq")])
        .await;
    assert_eq!(response.text(), "Problem decoding invoice");

    let response = server
        .post("/ajaxvalidateform")
        .form(&[("deposit", "bc")])
        .await;
    assert_eq!(response.text(), "Lightning invoice is required");
}

#[tokio::test]
async fn swap_returns_deposit_address() {
    let invoice = testnet_invoice();
    let response = server()
        .post("/swap")
        .form(&[("deposit", "tltc"), ("invoice", invoice.as_str())])
        .await;

    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("deposit script:\na9"));
    assert!(body.contains("deposit address:\nQ"));
    assert!(body.contains("deposit amount:\n2500000 (Litecoin Testnet)"));
}

#[tokio::test]
async fn swap_rejects_invalid_fields() {
    let response = server()
        .post("/swap")
        .form(&[("deposit", "xyz"), ("invoice", "")])
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.text(),
        "deposit: Deposit currency is not supported\ninvoice: Lightning invoice is required\n"
    );
}

#[tokio::test]
async fn swap_rejects_unsigned_invoice() {
    let (hrp, mut data) = bech32::decode(&testnet_invoice()).unwrap();
    let sig_start = data.len() - 104;
    data[sig_start..].fill(0);
    let forged = bech32::encode(&hrp, &data);

    let response = server()
        .post("/swap")
        .form(&[("deposit", "tltc"), ("invoice", forged.as_str())])
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.text(), "invoice: Problem decoding invoice\n");
}

#[tokio::test]
async fn refund_requires_positive_id() {
    let server = server();

    server
        .get("/refund")
        .add_query_param("id", "0")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get("/refund")
        .add_query_param("id", "abc")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server.get("/refund").await.assert_status(StatusCode::NOT_FOUND);

    let response = server.get("/refund").add_query_param("id", "3").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "Nothing to see on the refund page yet!");
}

#[tokio::test]
async fn static_files_are_served() {
    let config = WebConfig {
        static_dir: env!("CARGO_MANIFEST_DIR").into(),
        ..WebConfig::default()
    };
    let response = server_with(config).get("/static/Cargo.toml").await;
    response.assert_status_ok();
    assert!(response.text().contains("submarine-web"));
}

#[test]
fn bad_keys_are_rejected() {
    let config = WebConfig {
        broker_pubkey: "00".into(),
        ..WebConfig::default()
    };
    assert!(AppState::from_config(config).is_err());
}
