//! Integration tests for `ApiClient` using wiremock.

use std::borrow::Cow;
use std::time::Duration;

use assert2::{check, let_assert};
use courier::prelude::*;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct User {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

fn config() -> ClientConfig {
    ClientConfig::builder()
        .timeout(Duration::from_secs(2))
        .build()
}

async fn call<R>(client: &ApiClient, endpoint: &EndpointSpec) -> courier::Result<SuccessResult<R>>
where
    R: serde::de::DeserializeOwned + Send + 'static,
{
    let (tx, rx) = tokio::sync::oneshot::channel();
    client.request(endpoint, move |result: courier::Result<SuccessResult<R>>| {
        let _ = tx.send(result);
    });
    rx.await.expect("completion dropped")
}

#[tokio::test]
async fn test_get_merges_url_defaults() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .and(query_param("a", "2"))
        .and(query_param("b", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(User {
            id: 1,
            name: "Alice".to_string(),
        }))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ClientConfig::builder()
        .default_parameters(
            DefaultParameters::new().with_url(Parameters::from([("a", "2"), ("b", "3")])),
        )
        .build();
    let client = ApiClient::new(config).expect("client");
    let endpoint = EndpointSpec::new(Method::Get, "users/1", Environment::new(mock_server.uri()))
        .url_parameter("a", "1");

    let result = call::<User>(&client, &endpoint).await.expect("success");

    check!(result.status() == 200);
    check!(result.value().name == "Alice");
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(serde_json::json!({"name": "Bob", "client": "courier"})))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("Location", "/users/42")
                .set_body_json(User {
                    id: 42,
                    name: "Bob".to_string(),
                }),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ClientConfig::builder()
        .default_parameters(
            DefaultParameters::new().with_body(Parameters::from([("client", "courier")])),
        )
        .build();
    let client = ApiClient::new(config).expect("client");
    let endpoint = EndpointSpec::new(Method::Post, "users", Environment::new(mock_server.uri()))
        .body_parameter("name", "Bob");

    let result: SuccessResult<User> = client.fetch(&endpoint).await.expect("success");

    check!(result.status() == 201);
    check!(result.header("location") == Some("/users/42"));
    check!(result.into_value().id == 42);
}

#[tokio::test]
async fn test_error_status_carries_body_and_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/404"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"message": "no such user"})),
        )
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(config()).expect("client");
    let endpoint = EndpointSpec::new(Method::Get, "users/404", Environment::new(mock_server.uri()));

    let err = call::<User>(&client, &endpoint).await.expect_err("404");

    check!(err.status() == Some(404));
    check!(!err.is_retryable());
    check!(err.request() == Some(&endpoint));
    let_assert!(Some(Ok(payload)) = err.decode_body::<ApiError>());
    check!(payload.message == "no such user");
}

#[tokio::test]
async fn test_empty_error_body_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(config()).expect("client");
    let endpoint =
        EndpointSpec::new(Method::Delete, "users/1", Environment::new(mock_server.uri()));

    let err = call::<User>(&client, &endpoint).await.expect_err("503");

    check!(err.status() == Some(503));
    check!(err.body().is_none());
    check!(err.is_retryable());
}

#[tokio::test]
async fn test_unexpected_shape_is_decoding_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "one"})))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(config()).expect("client");
    let endpoint = EndpointSpec::new(Method::Get, "users/1", Environment::new(mock_server.uri()));

    let err = call::<User>(&client, &endpoint).await.expect_err("decoding");

    let_assert!(Error::DecodingFailed { path, .. } = err);
    check!(path == "id");
}

#[tokio::test]
async fn test_timeout_is_custom() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let config = ClientConfig::builder()
        .timeout(Duration::from_millis(100))
        .build();
    let client = ApiClient::new(config).expect("client");
    let endpoint = EndpointSpec::new(Method::Get, "slow", Environment::new(mock_server.uri()));

    let err = call::<User>(&client, &endpoint).await.expect_err("timeout");

    let_assert!(Error::Custom(message) = &err);
    check!(message.contains("timeout"));
    check!(err.is_retryable());
}

#[tokio::test]
async fn test_connection_error_is_custom() {
    let client = ApiClient::new(config()).expect("client");
    let endpoint = EndpointSpec::new(Method::Get, "ping", Environment::new("http://127.0.0.1:1"));

    let err = call::<User>(&client, &endpoint).await.expect_err("connection");

    check!(matches!(err, Error::Custom(_)));
}

#[tokio::test]
async fn test_invalid_base_url_completes_inline() {
    let client = ApiClient::new(config()).expect("client");
    let endpoint = EndpointSpec::new(Method::Get, "forecast", Environment::new("not a url"));

    let (tx, rx) = std::sync::mpsc::channel();
    client.request(&endpoint, move |result: courier::Result<SuccessResult<User>>| {
        tx.send(result).expect("send");
    });

    // Already delivered before `request` returned
    let err = rx.try_recv().expect("inline completion").expect_err("invalid");
    check!(err.is_invalid_base_url());
    check!(matches!(err, Error::InvalidRequest(_)));
}

#[tokio::test]
async fn test_logging_does_not_change_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(User {
            id: 7,
            name: "Grace".to_string(),
        }))
        .mount(&mock_server)
        .await;

    let config = ClientConfig::builder().log_requests(true).build();
    let client = ApiClient::new(config).expect("client");
    let endpoint = EndpointSpec::new(Method::Get, "users/7", Environment::new(mock_server.uri()));

    let user: SuccessResult<User> = client.fetch(&endpoint).await.expect("success");

    check!(user.value().id == 7);
}

// ============================================================================
// Custom endpoint type
// ============================================================================

#[derive(Debug, Deserialize)]
struct Forecast {
    name: String,
    main: Main,
}

#[derive(Debug, Deserialize)]
struct Main {
    temp: f64,
}

enum WeatherEndpoint {
    CurrentByCity { base_url: String, city: &'static str },
}

impl Endpoint for WeatherEndpoint {
    fn path(&self) -> Cow<'_, str> {
        match self {
            Self::CurrentByCity { .. } => Cow::Borrowed("weather"),
        }
    }

    fn method(&self) -> Method {
        Method::Get
    }

    fn headers(&self) -> Option<Headers> {
        Some(Headers::from([("Accept".to_string(), "application/json".to_string())]))
    }

    fn url_parameters(&self) -> Option<Parameters> {
        match self {
            Self::CurrentByCity { city, .. } => Some(Parameters::from([("q", *city)])),
        }
    }

    fn environment(&self) -> Environment {
        match self {
            Self::CurrentByCity { base_url, .. } => Environment::new(base_url.clone()),
        }
    }
}

#[tokio::test]
async fn test_custom_endpoint_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Istanbul"))
        .and(query_param("appid", "secret"))
        .and(query_param("units", "metric"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Istanbul",
            "main": { "temp": 18.5 }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ClientConfig::builder()
        .default_parameters(DefaultParameters::new().with_url(Parameters::from([
            ("appid", "secret"),
            ("units", "metric"),
        ])))
        .build();
    let client = ApiClient::new(config).expect("client");
    let endpoint = WeatherEndpoint::CurrentByCity {
        base_url: format!("{}/data/2.5", mock_server.uri()),
        city: "Istanbul",
    };

    let forecast: SuccessResult<Forecast> = client.fetch(&endpoint).await.expect("forecast");

    check!(forecast.value().name == "Istanbul");
    check!((forecast.value().main.temp - 18.5).abs() < f64::EPSILON);
}
