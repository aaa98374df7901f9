//! HTTP behaviour of the Lingvanex client against a mocked service.

use lingvatrans_core::config::{ApiToken, ProxyConfig, TranslatorConfig};
use lingvatrans_core::translate::{
    LingvanexTranslator, ServiceError, TranslateError, Translator, AUTO,
};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn translator_for(server: &MockServer) -> LingvanexTranslator {
    let config = TranslatorConfig::default()
        .with_base_url(&server.uri())
        .expect("mock server uri is a valid base url")
        .with_token(ApiToken::new("test-token").expect("valid token"));
    LingvanexTranslator::new(config).expect("client builds")
}

async fn last_body(server: &MockServer) -> String {
    let requests = server.received_requests().await.expect("recording enabled");
    let request = requests.last().expect("at least one request");
    String::from_utf8(request.body.clone()).expect("utf-8 body")
}

#[tokio::test]
async fn translate_sends_form_and_parses_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_string_contains("to=fr_FR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "err": null,
            "result": "Bonjour",
            "from": "en_GB"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let translator = translator_for(&server);
    let result = translator
        .translate("Hello", "fr", AUTO)
        .await
        .expect("translation succeeds");

    assert_eq!(result.text, "Bonjour");
    assert_eq!(result.dest, "fr");
    assert_eq!(result.src, "en_GB");
    assert_eq!(result.origin, "Hello");

    let body = last_body(&server).await;
    assert!(body.contains("text=Hello"), "body was {body}");
    assert!(!body.contains("from="), "auto source must not be sent: {body}");
}

#[tokio::test]
async fn translate_sends_explicit_source() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "err": null,
            "result": "Hallo Welt"
        })))
        .mount(&server)
        .await;

    let translator = translator_for(&server);
    let result = translator
        .translate("Hello world", "german", "en")
        .await
        .expect("translation succeeds");

    assert_eq!(result.dest, "german");
    assert_eq!(result.src, "en");
    let body = last_body(&server).await;
    assert!(body.contains("from=en_US"), "body was {body}");
    assert!(body.contains("to=de_DE"), "body was {body}");
}

#[tokio::test]
async fn detect_returns_french_for_french_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .and(query_param("platform", "dp"))
        .and(body_string_contains("to=en_US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "err": null,
            "result": "Hello world",
            "sourceLanguage": "fr_FR",
            "score": 0.98
        })))
        .expect(1)
        .mount(&server)
        .await;

    let translator = translator_for(&server);
    let detected = translator
        .detect("Bonjour le monde")
        .await
        .expect("detection succeeds");

    assert_eq!(detected.lang, "fr_FR");
    assert_eq!(detected.alpha1(), Some("fr"));
    assert_eq!(detected.confidence, Some(0.98));
}

#[tokio::test]
async fn error_status_is_service_error_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let translator = translator_for(&server);
    let err = translator
        .translate("Hello", "fr", AUTO)
        .await
        .expect_err("503 must fail");

    match err {
        TranslateError::Service(ServiceError::Status { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
        .mount(&server)
        .await;

    let translator = translator_for(&server);
    let err = translator
        .detect("Bonjour")
        .await
        .expect_err("malformed body must fail");

    assert!(err.is_service());
    match err {
        TranslateError::Service(ServiceError::InvalidResponse { body, .. }) => {
            assert_eq!(body, "not valid json");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn err_field_is_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "err": "Invalid token",
            "result": null
        })))
        .mount(&server)
        .await;

    let translator = translator_for(&server);
    let err = translator
        .translate("Hello", "fr", AUTO)
        .await
        .expect_err("api error must fail");

    match err {
        TranslateError::Service(ServiceError::Api { message }) => {
            assert_eq!(message, "Invalid token");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let config = TranslatorConfig::default()
        .with_base_url(&format!("http://127.0.0.1:{port}"))
        .expect("valid base url");
    let translator = LingvanexTranslator::new(config).expect("client builds");

    let err = translator
        .translate("Hello", "fr", AUTO)
        .await
        .expect_err("nothing is listening");

    assert!(err.is_network(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn invalid_input_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let translator = translator_for(&server);
    assert!(matches!(
        translator.translate("", "fr", AUTO).await,
        Err(TranslateError::EmptyText)
    ));
    assert!(matches!(
        translator.translate("Hello", "xx", AUTO).await,
        Err(TranslateError::UnknownLanguage(_))
    ));
}

#[tokio::test]
async fn close_twice_issues_no_request_and_blocks_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let translator = translator_for(&server);
    translator.close().await;
    translator.close().await;
    assert!(translator.is_closed().await);

    assert!(matches!(
        translator.translate("Hello", "fr", AUTO).await,
        Err(TranslateError::Closed)
    ));
    assert!(matches!(
        translator.detect("Hello").await,
        Err(TranslateError::Closed)
    ));
    assert!(matches!(
        translator.get_languages().await,
        Err(TranslateError::Closed)
    ));
}

#[tokio::test]
async fn reopen_and_set_proxy_restore_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "Hola" })))
        .expect(2)
        .mount(&server)
        .await;

    let translator = translator_for(&server);

    translator.close().await;
    translator.reopen().await.expect("reopen");
    assert!(!translator.is_closed().await);
    let result = translator.translate("Hello", "es", AUTO).await.expect("translates");
    assert_eq!(result.text, "Hola");

    translator.close().await;
    translator.set_proxy(None).await.expect("direct session");
    let result = translator.translate("Hello", "es", AUTO).await.expect("translates");
    assert_eq!(result.text, "Hola");
}

#[tokio::test]
async fn http_proxy_receives_request_with_basic_auth() {
    let proxy_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .and(header("proxy-authorization", "Basic dTpw"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "Ciao" })))
        .expect(2)
        .mount(&proxy_server)
        .await;

    // Only reachable through the proxy.
    let config = TranslatorConfig::default()
        .with_base_url("http://lingvanex.invalid/b1/api/v3")
        .expect("valid base url");
    let proxy = ProxyConfig::new(&proxy_server.uri())
        .expect("valid proxy")
        .with_auth("u", "p");

    let translator =
        LingvanexTranslator::new(config.clone().with_proxy(Some(proxy.clone()))).expect("builds");
    let result = translator.translate("Hello", "it", AUTO).await.expect("proxied");
    assert_eq!(result.text, "Ciao");

    let translator = LingvanexTranslator::new(config).expect("builds");
    translator.set_proxy(Some(proxy)).await.expect("proxied session");
    let result = translator.translate("Hello", "it", AUTO).await.expect("proxied");
    assert_eq!(result.text, "Ciao");
}

#[tokio::test]
async fn get_languages_rejects_non_list_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getLanguages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "err": null,
            "result": "not a list"
        })))
        .mount(&server)
        .await;

    let translator = translator_for(&server);
    match translator.get_languages().await {
        Err(TranslateError::Service(ServiceError::InvalidResponse { body, .. })) => {
            assert_eq!(body, "\"not a list\"");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn get_languages_lists_service_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getLanguages"))
        .and(query_param("platform", "api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "err": null,
            "result": [
                { "full_code": "fr_FR", "code_alpha_1": "fr", "englishName": "French", "codeName": "French" },
                { "full_code": "de_DE", "code_alpha_1": "de", "englishName": "German", "codeName": "German" }
            ]
        })))
        .mount(&server)
        .await;

    let translator = translator_for(&server);
    let languages = translator.get_languages().await.expect("listing succeeds");

    assert_eq!(languages.len(), 2);
    assert_eq!(languages[0].full_code, "fr_FR");
    assert_eq!(languages[1].english_name, "German");
}

#[tokio::test]
async fn concurrent_calls_share_one_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "ok",
            "from": "en_US"
        })))
        .expect(8)
        .mount(&server)
        .await;

    let translator = translator_for(&server);
    let texts: Vec<String> = (0..8).map(|i| format!("text {i}")).collect();
    let calls = texts
        .iter()
        .map(|text| Translator::translate(&translator, text, "fr", AUTO));
    let results = futures::future::join_all(calls).await;

    for (result, text) in results.into_iter().zip(&texts) {
        let result = result.expect("translation succeeds");
        assert_eq!(&result.origin, text);
        assert_eq!(result.text, "ok");
    }
}
