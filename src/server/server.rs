use bytes::Bytes;
use chrono::{Datelike, NaiveDateTime};
use http_body_util::{BodyExt, Full, Limited};
use hyper::{
    body::{Body, Incoming},
    header::{HeaderValue, CONTENT_TYPE},
    service::Service,
    Method, Request, Response, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};
use url_escape::decode;

use std::{collections::HashMap, future::Future, pin::Pin, sync::Arc};

use crate::{
    forms::{
        contact::{ContactForm, ContactValidator},
        signup::{SignupForm, SignupValidator},
    },
    store::engine::StoreStatusEngine,
    timing::clock::Clock,
    ISO_FORMAT,
};

use super::myresponse::HoursResponse;

const ISO_FORMAT_MINUTES: &str = "%Y-%m-%dT%H:%M";
/// Form bodies are tiny; anything bigger is refused outright.
const MAX_BODY_BYTES: usize = 16 * 1024;

type ServerResult = Result<Response<Full<Bytes>>, hyper::Error>;

/// The endpoints the server answers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Route {
    Status,
    Hours,
    Contact,
    Signup,
}

impl Route {
    /// `None` for anything that should be a 404.
    fn resolve(method: &Method, path: &str) -> Option<Self> {
        match (method, path) {
            (&Method::GET, "/api/status") => Some(Self::Status),
            (&Method::GET, "/api/hours") => Some(Self::Hours),
            (&Method::POST, "/api/contact") => Some(Self::Contact),
            (&Method::POST, "/api/signup") => Some(Self::Signup),
            _ => None,
        }
    }
}

/// The Server
///
/// Handles every API endpoint. The status logic itself lives in `StoreStatusEngine`, this struct
/// only parses requests and shapes responses.
///
/// It implements hyper's `Service` trait and is cloned into each connection's task. Cloning is
/// cheap since everything inside is behind an `Arc` and nothing is ever mutated.
#[derive(Clone)]
pub struct Server {
    engine: Arc<StoreStatusEngine>,
    clock: Arc<dyn Clock>,
    contact: Arc<ContactValidator>,
    signup: Arc<SignupValidator>,
}

impl Server {
    pub fn setup(engine: Arc<StoreStatusEngine>, clock: Arc<dyn Clock>) -> Self {
        Self {
            engine,
            clock,
            contact: Arc::new(ContactValidator::new()),
            signup: Arc::new(SignupValidator::new()),
        }
    }

    /// Parses the query parameters and returns a `hashmap` of key pair values
    /// Returns `None` if the parameters are malformed
    fn parse_params(text: &str) -> Option<HashMap<String, String>> {
        let mut map: HashMap<String, String> = HashMap::new();
        for pairs in text.split('&') {
            let mut iterator = pairs.split('=');
            map.insert(
                iterator.next()?.to_string(),
                decode(iterator.next()?).to_string(),
            );
        }
        Some(map)
    }

    /// Accepts `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DDTHH:MM`.
    fn parse_instant(text: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(text, ISO_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(text, ISO_FORMAT_MINUTES))
            .ok()
    }

    /// The /api/status API endpoint.
    ///
    /// Without parameters this is the status right now. An `at` parameter evaluates any other
    /// local instant instead, which is handy for checking holidays ahead of time.
    fn status(&self, query: Option<&str>) -> ServerResult {
        let Some(query) = query.filter(|query| !query.is_empty()) else {
            return Self::ok_data(self.engine.status_now(self.clock.as_ref()));
        };

        let Some(map) = Self::parse_params(query) else {
            return Self::bad_request("Malformed Parameters.");
        };

        match map.get("at") {
            None => Self::ok_data(self.engine.status_now(self.clock.as_ref())),
            Some(at) => match Self::parse_instant(at) {
                Some(at) => Self::ok_data(self.engine.compute_status(at)),
                None => Self::bad_request("Malformed Date"),
            },
        }
    }

    /// The /api/hours API endpoint.
    fn hours(&self) -> ServerResult {
        let now = self.clock.now();
        let config = self.engine.config();
        let result = HoursResponse::new(
            config.timezone().name().to_string(),
            self.engine.compute_status(now),
            config.schedule().timeline(now.weekday()),
            config.holidays().upcoming(now.date()).cloned().collect(),
        );
        Self::ok_data(result)
    }

    /// The /api/contact API endpoint. Always answers with the full per-field report.
    fn contact(&self, body: &[u8]) -> ServerResult {
        match Self::parse_body::<ContactForm>(body) {
            Ok(form) => Self::ok_data(self.contact.validate(&form)),
            Err(err) => Self::bad_request(&err),
        }
    }

    /// The /api/signup API endpoint.
    fn signup(&self, body: &[u8]) -> ServerResult {
        match Self::parse_body::<SignupForm>(body) {
            Ok(form) => Self::ok_data(self.signup.validate(&form)),
            Err(err) => Self::bad_request(&err),
        }
    }

    fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, String> {
        serde_json::from_slice(body).map_err(|err| format!("Malformed Body. {}", err))
    }

    async fn read_body<B>(body: B) -> Result<Bytes, String>
    where
        B: Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        match Limited::new(body, MAX_BODY_BYTES).collect().await {
            Ok(collected) => Ok(collected.to_bytes()),
            Err(err) => Err(format!("Could not read body. {}", err)),
        }
    }

    fn respond(status: StatusCode, body: Bytes) -> ServerResult {
        let mut res = Response::new(Full::new(body));
        *res.status_mut() = status;
        res.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(res)
    }

    fn error_body(message: &str) -> Bytes {
        Bytes::from(serde_json::json!({ "error": message }).to_string())
    }

    /// Return a 200 OK response with the data provided.
    fn ok_data<T: Serialize>(body: T) -> ServerResult {
        match serde_json::to_vec(&body) {
            Ok(data) => Self::respond(StatusCode::OK, Bytes::from(data)),
            Err(err) => {
                error!(%err, "could not serialize response");
                Self::server_error(&err.to_string())
            }
        }
    }

    /// Return a 500 Internal Server Error response with the message provided.
    fn server_error(message: &str) -> ServerResult {
        Self::respond(StatusCode::INTERNAL_SERVER_ERROR, Self::error_body(message))
    }

    /// Return a 404 Not Found response with the message provided.
    fn not_found(message: &str) -> ServerResult {
        Self::respond(StatusCode::NOT_FOUND, Self::error_body(message))
    }

    /// Return a 400 Bad Request response with the message provided.
    fn bad_request(message: &str) -> ServerResult {
        Self::respond(StatusCode::BAD_REQUEST, Self::error_body(message))
    }
}

impl Service<Request<Incoming>> for Server {
    type Response = Response<Full<Bytes>>;
    type Error = hyper::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let server = self.clone();
        Box::pin(async move {
            let method = req.method().clone();
            let path = req.uri().path().to_string();
            debug!(%method, %path, "request");

            match Route::resolve(&method, &path) {
                Some(Route::Status) => server.status(req.uri().query()),
                Some(Route::Hours) => server.hours(),
                Some(Route::Contact) => match Server::read_body(req.into_body()).await {
                    Ok(body) => server.contact(&body),
                    Err(err) => Server::bad_request(&err),
                },
                Some(Route::Signup) => match Server::read_body(req.into_body()).await {
                    Ok(body) => server.signup(&body),
                    Err(err) => Server::bad_request(&err),
                },
                None => Server::not_found("Not Found"),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::{store::config::fixtures, timing::clock::FixedClock};

    fn server(now: &str) -> Server {
        Server::setup(
            Arc::new(StoreStatusEngine::new(fixtures::restaurant())),
            Arc::new(FixedClock(now.parse().unwrap())),
        )
    }

    async fn body_json(res: Response<Full<Bytes>>) -> Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn parses_params() {
        let map = Server::parse_params("at=2024-05-01T10%3A00&x=1").unwrap();
        assert_eq!(map.get("at").unwrap(), "2024-05-01T10:00");
        assert_eq!(map.get("x").unwrap(), "1");
        assert!(Server::parse_params("at").is_none());
    }

    #[test]
    fn parses_instants_with_or_without_seconds() {
        let expected: NaiveDateTime = "2024-05-01T10:00:00".parse().unwrap();
        assert_eq!(Server::parse_instant("2024-05-01T10:00:00"), Some(expected));
        assert_eq!(Server::parse_instant("2024-05-01T10:00"), Some(expected));
        assert_eq!(Server::parse_instant("yesterday"), None);
    }

    #[tokio::test]
    async fn status_uses_the_clock() {
        let res = server("2024-06-03T15:30:00").status(None).unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(
            body_json(res).await,
            json!({ "state": "Open", "detail": "Open until 23:00" })
        );
    }

    #[tokio::test]
    async fn status_at_another_instant() {
        let res = server("2024-06-03T15:30:00")
            .status(Some("at=2024-05-01T10%3A00%3A00"))
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            body_json(res).await,
            json!({ "state": "Closed", "detail": "Holiday: Labor Day" })
        );
    }

    #[tokio::test]
    async fn status_rejects_bad_dates() {
        let res = server("2024-06-03T15:30:00")
            .status(Some("at=tomorrow"))
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await, json!({ "error": "Malformed Date" }));

        let res = server("2024-06-03T15:30:00").status(Some("at")).unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn hours_lists_week_and_upcoming_holidays() {
        let res = server("2024-04-15T12:00:00").hours().unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;

        assert_eq!(body["timezone"], "Europe/London");
        assert_eq!(
            body["status"],
            json!({ "state": "Closed", "detail": "Opens tomorrow at 14:00" })
        );
        let week = body["week"].as_array().unwrap();
        assert_eq!(week.len(), 7);
        assert_eq!(week[0], json!({ "day": "Sunday", "day_index": 0, "hours": null, "current": false }));
        assert_eq!(
            week[1],
            json!({
                "day": "Monday",
                "day_index": 1,
                "hours": { "open": "14:00", "close": "23:00" },
                "current": true
            })
        );
        assert_eq!(
            body["holidays"],
            json!([{ "date": "2024-05-01", "name": "Labor Day", "hours": "Closed" }])
        );
    }

    #[tokio::test]
    async fn contact_reports_each_field() {
        let body = json!({
            "name": "Ada",
            "email": "ada@example",
            "message": "Hello"
        })
        .to_string();
        let res = server("2024-06-03T15:30:00").contact(body.as_bytes()).unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["valid"], false);
        assert_eq!(body["name"]["valid"], true);
        assert_eq!(
            body["email"],
            json!({ "valid": false, "message": "Please enter a valid email address" })
        );
        assert_eq!(body["remainingCharacters"], 495);
        assert_eq!(body["counter"], "normal");
    }

    #[tokio::test]
    async fn signup_reports_strength() {
        let body = json!({ "password": "Secret123", "confirmPassword": "Secret123" }).to_string();
        let res = server("2024-06-03T15:30:00").signup(body.as_bytes()).unwrap();
        let body = body_json(res).await;
        assert_eq!(body["valid"], true);
        assert_eq!(body["strength"], 80);
        assert_eq!(body["level"], "strong");
        assert_eq!(body["checks"]["hasSpecialChar"], false);
    }

    #[tokio::test]
    async fn malformed_form_bodies_are_bad_requests() {
        let server = server("2024-06-03T15:30:00");
        let res = server.contact(b"{ nope").unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let res = server.signup(b"42").unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn routes_by_method_and_path() {
        assert_eq!(Route::resolve(&Method::GET, "/api/status"), Some(Route::Status));
        assert_eq!(Route::resolve(&Method::GET, "/api/hours"), Some(Route::Hours));
        assert_eq!(Route::resolve(&Method::POST, "/api/contact"), Some(Route::Contact));
        assert_eq!(Route::resolve(&Method::POST, "/api/signup"), Some(Route::Signup));

        assert_eq!(Route::resolve(&Method::POST, "/api/status"), None);
        assert_eq!(Route::resolve(&Method::GET, "/api/contact"), None);
        assert_eq!(Route::resolve(&Method::GET, "/api/status/"), None);
        assert_eq!(Route::resolve(&Method::GET, "/"), None);
    }

    #[tokio::test]
    async fn not_found_is_json() {
        let res = Server::not_found("Not Found").unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            res.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(body_json(res).await, json!({ "error": "Not Found" }));
    }

    #[tokio::test]
    async fn body_size_is_limited() {
        let body = Server::read_body(Full::new(Bytes::from(vec![b' '; MAX_BODY_BYTES])))
            .await
            .unwrap();
        assert_eq!(body.len(), MAX_BODY_BYTES);

        let err = Server::read_body(Full::new(Bytes::from(vec![b' '; MAX_BODY_BYTES + 1])))
            .await
            .unwrap_err();
        assert!(err.starts_with("Could not read body."));
    }
}
