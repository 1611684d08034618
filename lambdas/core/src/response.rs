//! Response builders for API Gateway proxy integrations.

use lambda_http::{
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    Body, Error, Response,
};
use serde::Serialize;

pub fn html(status: StatusCode, body: String) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/html")
        .body(Body::from(body))?)
}

pub fn text(status: StatusCode, body: String) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain")
        .body(Body::from(body))?)
}

pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(body)?))?)
}

pub fn empty(status: StatusCode) -> Result<Response<Body>, Error> {
    Ok(Response::builder().status(status).body(Body::Empty)?)
}

pub fn with_cors(mut resp: Response<Body>, allowed_methods: &'static str) -> Response<Body> {
    let headers = resp.headers_mut();
    headers.insert("access-control-allow-origin", HeaderValue::from_static("*"));
    headers.insert("access-control-allow-headers", HeaderValue::from_static("*"));
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static(allowed_methods),
    );
    resp
}
