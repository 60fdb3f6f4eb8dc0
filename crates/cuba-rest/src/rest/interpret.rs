//! Turns raw responses into typed values or classified errors.

use cuba_core::{Error, ErrorKind, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::trace;

use super::request::RawResponse;

/// Decode a successful response into `T`, or classify the failure.
///
/// `refresh_grant` tells the classifier whether the request was a refresh
/// grant, which decides how `invalid_grant` is reported.
pub fn interpret<T: DeserializeOwned>(response: &RawResponse, refresh_grant: bool) -> Result<T> {
    if response.is_success() {
        decode(response)
    } else {
        Err(classify_response(response, refresh_grant))
    }
}

fn decode<T: DeserializeOwned>(response: &RawResponse) -> Result<T> {
    let body = if response.body.trim().is_empty() {
        "null"
    } else {
        response.body.as_str()
    };

    serde_json::from_str(body).map_err(|e| {
        Error::new(
            ErrorKind::Deserialization,
            format!("response does not match the expected data structure: {e}"),
        )
        .with_status(response.status)
        .with_source(e)
    })
}

/// Classify a non-2xx response.
pub fn classify_response(response: &RawResponse, refresh_grant: bool) -> Error {
    let status = response.status;
    trace!(status, "classifying error response");

    match serde_json::from_str::<Value>(&response.body) {
        Ok(Value::Object(fields)) => classify_error(status, &fields, &response.body, refresh_grant),
        // A 404 that is not a JSON object is a missing page, not an API error
        _ if status == 404 => {
            let message = if response.body.trim().is_empty() {
                "resource not found"
            } else {
                response.body.as_str()
            };
            Error::new(ErrorKind::NotFound, message).with_status(status)
        }
        Ok(_) => Error::new(ErrorKind::Deserialization, "error response is not a JSON object")
            .with_status(status),
        Err(e) => Error::new(ErrorKind::Deserialization, "response can not be parsed as JSON")
            .with_status(status)
            .with_source(e),
    }
}

/// Map an HTTP status and parsed error object to an [`Error`].
///
/// Only string values are considered; other values count as absent.
/// `raw_body` is the fallback message.
pub fn classify_error(
    status: u16,
    fields: &Map<String, Value>,
    raw_body: &str,
    refresh_grant: bool,
) -> Error {
    let error = field(fields, "error");
    let details = || field(fields, "details").unwrap_or(raw_body);
    let description = || field(fields, "error_description").unwrap_or(raw_body);

    let (kind, message) = if status == 404 {
        match error {
            Some("MetaClass not found") => (ErrorKind::MetaclassNotFound, details()),
            Some("Entity not found") => (ErrorKind::EntityNotFound, details()),
            _ => (ErrorKind::Unclassified, details()),
        }
    } else {
        match error {
            Some("invalid_grant") if refresh_grant => {
                (ErrorKind::RefreshTokenExpired, description())
            }
            Some("invalid_grant") | Some("unauthorized") => {
                (ErrorKind::AccessRejected, description())
            }
            Some("invalid_token") => (ErrorKind::AccessTokenExpired, description()),
            Some("View not found") => (ErrorKind::ViewNotFound, details()),
            _ => (ErrorKind::Unclassified, raw_body),
        }
    };

    Error::new(kind, message).with_status(status)
}

fn field<'a>(fields: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    fields.get(name).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn classify(status: u16, body: Value, refresh_grant: bool) -> Error {
        let body = body.to_string();
        classify_response(&RawResponse::new(status, body), refresh_grant)
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Produce {
        id: String,
        brief: String,
    }

    #[test]
    fn decodes_success_body() {
        let response = RawResponse::new(
            200,
            r#"[{"id": "60885987-1b61-4247-94c7-dff348347f93", "brief": "Apples"}]"#,
        );
        let items: Vec<Produce> = interpret(&response, false).unwrap();
        assert_eq!(items[0].brief, "Apples");
    }

    #[test]
    fn empty_success_body_is_null() {
        let response = RawResponse::new(204, "");
        interpret::<()>(&response, false).unwrap();
        assert_eq!(interpret::<Option<Produce>>(&response, false).unwrap(), None);
    }

    #[test]
    fn shape_mismatch_is_deserialization_error() {
        let response = RawResponse::new(200, r#"{"id": 5}"#);
        let err = interpret::<Produce>(&response, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Deserialization);
        assert_eq!(err.status(), Some(200));
    }

    #[test]
    fn metaclass_not_found() {
        let err = classify(
            404,
            json!({"error": "MetaClass not found", "details": "MetaClass std$Nope not found"}),
            false,
        );
        assert_eq!(err.kind(), ErrorKind::MetaclassNotFound);
        assert_eq!(err.message(), "MetaClass std$Nope not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn entity_not_found_falls_back_to_body() {
        let err = classify(404, json!({"error": "Entity not found"}), false);
        assert_eq!(err.kind(), ErrorKind::EntityNotFound);
        assert!(err.message().contains("Entity not found"));
    }

    #[test]
    fn unknown_json_404_is_unclassified() {
        let err = classify(404, json!({"error": "Something else", "details": "hm"}), false);
        assert_eq!(err.kind(), ErrorKind::Unclassified);
        assert_eq!(err.message(), "hm");
    }

    #[test]
    fn html_404_is_not_found() {
        let response = RawResponse::new(404, "<html><body>Not Found</body></html>");
        let err = classify_response(&response, false);
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.status(), Some(404));

        let empty = classify_response(&RawResponse::new(404, ""), false);
        assert_eq!(empty.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn invalid_grant_depends_on_grant_type() {
        let body = json!({"error": "invalid_grant", "error_description": "Bad credentials"});

        let refresh = classify(400, body.clone(), true);
        assert_eq!(refresh.kind(), ErrorKind::RefreshTokenExpired);
        assert_eq!(refresh.message(), "Bad credentials");

        let password = classify(400, body, false);
        assert_eq!(password.kind(), ErrorKind::AccessRejected);
    }

    #[test]
    fn access_errors() {
        let unauthorized = classify(401, json!({"error": "unauthorized"}), false);
        assert_eq!(unauthorized.kind(), ErrorKind::AccessRejected);

        let expired = classify(
            401,
            json!({"error": "invalid_token", "error_description": "Invalid access token: x"}),
            false,
        );
        assert_eq!(expired.kind(), ErrorKind::AccessTokenExpired);
        assert_eq!(expired.message(), "Invalid access token: x");
    }

    #[test]
    fn view_not_found() {
        let err = classify(
            400,
            json!({"error": "View not found", "details": "View std$Produce/nope not found"}),
            false,
        );
        assert_eq!(err.kind(), ErrorKind::ViewNotFound);
        assert_eq!(err.message(), "View std$Produce/nope not found");
    }

    #[test]
    fn unknown_error_keeps_raw_body() {
        let body = json!({"error": "server_error", "error_description": "boom"});
        let err = classify(500, body.clone(), false);
        assert_eq!(err.kind(), ErrorKind::Unclassified);
        assert_eq!(err.message(), body.to_string());

        let absent = classify(500, json!({"message": "no error field"}), false);
        assert_eq!(absent.kind(), ErrorKind::Unclassified);
    }

    #[test]
    fn non_string_values_are_ignored() {
        let err = classify(401, json!({"error": 42, "error_description": "x"}), false);
        assert_eq!(err.kind(), ErrorKind::Unclassified);

        let err = classify(
            401,
            json!({"error": "invalid_token", "error_description": {"nested": true}}),
            false,
        );
        assert_eq!(err.kind(), ErrorKind::AccessTokenExpired);
        assert!(err.message().contains("nested"));
    }

    #[test]
    fn non_json_error_is_deserialization() {
        let err = classify_response(&RawResponse::new(500, "Internal Server Error"), false);
        assert_eq!(err.kind(), ErrorKind::Deserialization);
        assert_eq!(err.status(), Some(500));

        let err = classify_response(&RawResponse::new(400, "[1, 2]"), false);
        assert_eq!(err.kind(), ErrorKind::Deserialization);
    }
}
