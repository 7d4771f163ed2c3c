//! In-memory transport answering from canned routes, plus a `cpih01` fixture.
#![allow(dead_code)]

use ons_rs::{ApiError, Client, ClientConfig, HttpResponse, Transport};
use std::cell::RefCell;

pub const BASE: &str = "http://stub.test/v1";
pub const VERSION: &str = "http://stub.test/v1/datasets/cpih01/editions/time-series/versions/6";

struct Route {
    url: String,
    query: Vec<(String, String)>,
    response: Result<HttpResponse, String>,
}

/// Routes match on URL plus every query pair the route names; the most specific match wins.
/// Unknown URLs answer 404.
#[derive(Default)]
pub struct StubTransport {
    routes: Vec<Route>,
    pub calls: RefCell<Vec<(String, Vec<(String, String)>)>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url: &str, status: u16, body: &str) -> Self {
        self.routes.push(Route {
            url: url.into(),
            query: vec![],
            response: Ok(HttpResponse::new(status, body)),
        });
        self
    }

    pub fn route_query(mut self, url: &str, query: &[(&str, &str)], status: u16, body: &str) -> Self {
        self.routes.push(Route {
            url: url.into(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            response: Ok(HttpResponse::new(status, body)),
        });
        self
    }

    pub fn fail(mut self, url: &str, reason: &str) -> Self {
        self.routes.push(Route {
            url: url.into(),
            query: vec![],
            response: Err(reason.into()),
        });
        self
    }

    pub fn calls_to(&self, url: &str) -> Vec<Vec<(String, String)>> {
        self.calls
            .borrow()
            .iter()
            .filter(|(u, _)| u == url)
            .map(|(_, q)| q.clone())
            .collect()
    }
}

impl Transport for StubTransport {
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<HttpResponse, ApiError> {
        self.calls
            .borrow_mut()
            .push((url.to_string(), query.to_vec()));
        let hit = self
            .routes
            .iter()
            .filter(|r| r.url == url && r.query.iter().all(|p| query.contains(p)))
            .max_by_key(|r| r.query.len());
        match hit {
            Some(Route {
                response: Ok(resp), ..
            }) => Ok(resp.clone()),
            Some(Route {
                response: Err(reason),
                ..
            }) => Err(ApiError::Transport {
                url: url.to_string(),
                reason: reason.clone(),
            }),
            None => Ok(HttpResponse::new(404, "not found\n")),
        }
    }
}

pub fn client(stub: &StubTransport) -> Client<&StubTransport> {
    Client::with_transport(ClientConfig::default().with_base_url(BASE), stub)
}

pub fn page(items: &str, count: u32, offset: u32, total: u32) -> String {
    format!(
        r#"{{"items":[{items}],"count":{count},"offset":{offset},"limit":20,"total_count":{total}}}"#
    )
}

pub fn editions_body() -> String {
    page(
        &format!(
            r#"{{"edition":"time-series","links":{{"latest_version":{{"href":"{VERSION}","id":"6"}}}}}}"#
        ),
        1,
        0,
        1,
    )
}

pub const OBSERVATIONS: &str = r#"{
  "dimensions": {"geography": {"option": {"id": "K02000001"}}},
  "limit": 10000,
  "observations": [
    {"dimensions": {"Time": {"href": "http://stub.test/codes/time/Jan-20", "id": "Jan-20", "label": "Jan-20"}}, "observation": "108.2"},
    {"dimensions": {"Time": {"href": "http://stub.test/codes/time/Feb-20", "id": "Feb-20", "label": "Feb-20"}}, "observation": "108.6",
     "metadata": {"observation_status": "provisional"}},
    {"dimensions": {"Time": {"href": "http://stub.test/codes/time/Mar-20", "id": "Mar-20", "label": "Mar-20"}}, "observation": "108.6"}
  ],
  "offset": 0,
  "total_observations": 3,
  "unit_of_measure": "Index: 2015=100"
}"#;

/// `cpih01` with dimensions geography {K02000001, E92000001} and time {*}.
pub fn cpih01() -> StubTransport {
    StubTransport::new()
        .route(&format!("{BASE}/datasets/cpih01/editions"), 200, &editions_body())
        .route(
            &format!("{VERSION}/dimensions"),
            200,
            &page(
                r#"{"name":"geography","label":"Geography","links":{"options":{"href":"x","id":"geography"}}},
                   {"name":"time","label":"Time","links":{"options":{"href":"x","id":"time"}}}"#,
                2,
                0,
                2,
            ),
        )
        .route(
            &format!("{VERSION}/dimensions/geography/options"),
            200,
            &page(
                r#"{"dimension":"geography","option":"K02000001","label":"United Kingdom"},
                   {"dimension":"geography","option":"E92000001","label":"England"}"#,
                2,
                0,
                2,
            ),
        )
        .route(
            &format!("{VERSION}/dimensions/time/options"),
            200,
            &page(r#"{"dimension":"time","option":"*"}"#, 1, 0, 1),
        )
        .route(
            &format!("{VERSION}/observations"),
            400,
            "incorrect selection of query parameters: missing query parameters for the following dimensions: [time]\n",
        )
        .route_query(
            &format!("{VERSION}/observations"),
            &[("geography", "K02000001"), ("time", "*")],
            200,
            OBSERVATIONS,
        )
}
