//! Server side of the execute call.
//!
//! Service implementations report failures through a [`ServerRpcController`]
//! and always run their `done` callback; [`call_execute`] polls the
//! controller afterwards and turns the outcome into the transport result.

use std::io;

use hyper::{Body, Method, Request, Response, StatusCode};
use tracing::warn;

use super::controller::{Fault, RpcController, ServerRpcController};
use crate::error::ServiceError;
use crate::protocol::{ExceptionResponse, ExecuteRequest, ExecuteResponse};
use crate::transport::EXECUTE_PATH;

/// Exception class used when a handler fails with a message only.
pub const SERVICE_EXCEPTION_CLASS: &str = "ServiceException";

pub trait ExecuteService: Send + Sync {
    fn execute(
        &self,
        controller: &mut ServerRpcController,
        request: ExecuteRequest,
        done: &mut dyn FnMut(Option<ExecuteResponse>),
    );
}

/// Invoke `service` and collect either its response or the failure it
/// recorded on the controller.
pub fn call_execute<S>(
    service: &S,
    request: ExecuteRequest,
) -> Result<ExecuteResponse, ServiceError>
where
    S: ExecuteService + ?Sized,
{
    let mut controller = ServerRpcController::new();
    let mut response = None;
    service.execute(&mut controller, request, &mut |r: Option<ExecuteResponse>| {
        response = r
    });

    if controller.failed() {
        return Err(fault_to_service_error(&controller));
    }
    response.ok_or_else(|| ServiceError::Remote {
        exception_class: SERVICE_EXCEPTION_CLASS.to_string(),
        message: "service returned no response".to_string(),
    })
}

fn fault_to_service_error(controller: &ServerRpcController) -> ServiceError {
    let message = controller.error_text().unwrap_or_default();
    let exception_class = match controller.fault() {
        Fault::Exception(e) => io_exception_class(e),
        _ => SERVICE_EXCEPTION_CLASS.to_string(),
    };
    ServiceError::Remote {
        exception_class,
        message,
    }
}

fn io_exception_class(error: &io::Error) -> String {
    format!("{:?}", error.kind())
}

/// Serve one HTTP request against `service`.
///
/// Successful calls answer 200 with an [`ExecuteResponse`] body; failures
/// answer 500 with an [`ExceptionResponse`] body.
pub async fn handle_http<S>(service: &S, request: Request<Body>) -> Response<Body>
where
    S: ExecuteService + ?Sized,
{
    if request.method() != Method::POST || request.uri().path() != EXECUTE_PATH {
        return plain_response(StatusCode::NOT_FOUND, "not found");
    }

    let bytes = match hyper::body::to_bytes(request.into_body()).await {
        Ok(bytes) => bytes,
        Err(e) => return plain_response(StatusCode::BAD_REQUEST, &e.to_string()),
    };
    let execute_request: ExecuteRequest = match serde_json::from_slice(&bytes) {
        Ok(req) => req,
        Err(e) => return plain_response(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    let (status, body) = match call_execute(service, execute_request) {
        Ok(response) => (StatusCode::OK, serde_json::to_vec(&response)),
        Err(err) => {
            warn!(error = %err, "execute call failed");
            let exception = match err {
                ServiceError::Remote {
                    exception_class,
                    message,
                } => ExceptionResponse {
                    exception_class,
                    message,
                },
                ServiceError::Transport(message) => ExceptionResponse {
                    exception_class: SERVICE_EXCEPTION_CLASS.to_string(),
                    message,
                },
            };
            (StatusCode::INTERNAL_SERVER_ERROR, serde_json::to_vec(&exception))
        }
    };

    match body {
        Ok(body) => Response::builder()
            .status(status)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap_or_else(|_| {
                plain_response(StatusCode::INTERNAL_SERVER_ERROR, "encoding failed")
            }),
        Err(e) => plain_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

fn plain_response(status: StatusCode, msg: &str) -> Response<Body> {
    let mut response = Response::new(Body::from(msg.to_string()));
    *response.status_mut() = status;
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoService;

    impl ExecuteService for EchoService {
        fn execute(
            &self,
            controller: &mut ServerRpcController,
            request: ExecuteRequest,
            done: &mut dyn FnMut(Option<ExecuteResponse>),
        ) {
            match request {
                ExecuteRequest::Statement { statement, .. } if statement == "FAIL" => {
                    controller.set_failed_on(io::Error::new(
                        io::ErrorKind::NotFound,
                        "table missing",
                    ));
                    done(None);
                }
                ExecuteRequest::Statement { statement, .. } if statement == "REJECT" => {
                    controller.set_failed("statement rejected".to_string());
                    done(None);
                }
                ExecuteRequest::Statement { statement, .. } => {
                    done(Some(ExecuteResponse::new("S1", json!({ "echo": statement }))));
                }
                _ => done(Some(ExecuteResponse::new("", json!(null)))),
            }
        }
    }

    fn statement(sql: &str) -> ExecuteRequest {
        ExecuteRequest::statement(sql, Default::default(), 10, None)
    }

    #[test]
    fn successful_call_returns_response() {
        let response = call_execute(&EchoService, statement("SELECT 1")).unwrap();
        assert_eq!(response.session_id, "S1");
        assert_eq!(response.payload, json!({ "echo": "SELECT 1" }));
    }

    #[test]
    fn exception_is_reported_with_its_kind() {
        let err = call_execute(&EchoService, statement("FAIL")).unwrap_err();
        assert_eq!(
            err,
            ServiceError::Remote {
                exception_class: "NotFound".to_string(),
                message: "table missing".to_string(),
            }
        );
    }

    #[test]
    fn message_failure_is_reported_as_service_exception() {
        let err = call_execute(&EchoService, statement("REJECT")).unwrap_err();
        assert_eq!(
            err,
            ServiceError::Remote {
                exception_class: SERVICE_EXCEPTION_CLASS.to_string(),
                message: "statement rejected".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn http_handler_rejects_unknown_paths() {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/status")
            .body(Body::empty())
            .unwrap();
        let response = handle_http(&EchoService, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
