// ABOUTME: In-process request builder for axum routers using tower's oneshot
// ABOUTME: Supports cookies, form and JSON bodies, and decodes responses for assertions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code, clippy::must_use_candidate, clippy::missing_panics_doc)]

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tower::ServiceExt;

/// Request under construction
pub struct AxumTestRequest {
    method: Method,
    uri: String,
    headers: Vec<(String, String)>,
    cookies: Vec<String>,
    body: Body,
}

impl AxumTestRequest {
    fn new(method: Method, uri: &str) -> Self {
        Self {
            method,
            uri: uri.to_owned(),
            headers: Vec::new(),
            cookies: Vec::new(),
            body: Body::empty(),
        }
    }

    pub fn get(uri: &str) -> Self {
        Self::new(Method::GET, uri)
    }

    pub fn post(uri: &str) -> Self {
        Self::new(Method::POST, uri)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Add a `name=value` cookie
    pub fn cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.push(format!("{name}={value}"));
        self
    }

    /// Send the session cookie, when there is one
    pub fn session(self, token: Option<&str>) -> Self {
        match token {
            Some(token) => self.cookie("session", token),
            None => self,
        }
    }

    /// URL-encoded form body
    pub fn form<T: Serialize>(mut self, form: &T) -> Self {
        let encoded = serde_urlencoded::to_string(form).unwrap();
        self.headers.push((
            header::CONTENT_TYPE.as_str().to_owned(),
            "application/x-www-form-urlencoded".to_owned(),
        ));
        self.body = Body::from(encoded);
        self
    }

    /// JSON body
    pub fn json<T: Serialize>(mut self, value: &T) -> Self {
        self.headers.push((
            header::CONTENT_TYPE.as_str().to_owned(),
            "application/json".to_owned(),
        ));
        self.body = Body::from(serde_json::to_vec(value).unwrap());
        self
    }

    pub async fn send(self, router: Router) -> AxumTestResponse {
        let mut builder = Request::builder().method(self.method).uri(&self.uri);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !self.cookies.is_empty() {
            builder = builder.header(header::COOKIE, self.cookies.join("; "));
        }
        let request = builder.body(self.body).unwrap();

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        AxumTestResponse {
            status,
            headers,
            body: body.to_vec(),
        }
    }
}

/// Collected response
pub struct AxumTestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl AxumTestResponse {
    pub const fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    }

    /// Redirect target
    pub fn location(&self) -> Option<String> {
        self.header(header::LOCATION.as_str())
    }

    /// Value of a cookie set by the response, empty when it was cleared
    pub fn set_cookie(&self, name: &str) -> Option<String> {
        let prefix = format!("{name}=");
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|cookie| {
                cookie
                    .strip_prefix(&prefix)
                    .map(|rest| rest.split(';').next().unwrap_or_default().to_owned())
            })
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }

    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "response body is not the expected JSON ({e}): {}",
                self.text()
            )
        })
    }
}
