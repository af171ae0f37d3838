//! Printable documents HTTP API.

use axum::{
    extract::Path,
    response::{IntoResponse, Response},
    Extension,
};
use http::{header, HeaderMap, HeaderValue, StatusCode};
use serde::Deserialize;
use service::{query::document, Query as _};
use tracing as log;
use uuid::Uuid;
use xxhash_rust::xxh3::xxh3_64;

use crate::Service;

/// Kind of a printable document.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Rent agreement of a `Contract`.
    Contract,

    /// Invoice of a `Contract`.
    Invoice,

    /// Receipt of a `Payment`.
    Receipt,
}

/// Printable documents handler, serving `GET /print/{kind}/{id}`.
///
/// Responds with an A4 HTML page tagged by its content hash, so the browser
/// revalidates it with `If-None-Match`.
#[tracing::instrument(skip_all, fields(id = %id, kind = ?kind))]
pub async fn print(
    Extension(service): Extension<Service>,
    Path((kind, id)): Path<(Kind, String)>,
    headers: HeaderMap,
) -> Response {
    let Ok(id) = id.parse::<Uuid>() else {
        return (StatusCode::BAD_REQUEST, "invalid document ID")
            .into_response();
    };

    let rendered = match kind {
        Kind::Contract => {
            service
                .execute(document::Agreement {
                    contract_id: id.into(),
                })
                .await
        }
        Kind::Invoice => {
            service
                .execute(document::Invoice {
                    contract_id: id.into(),
                })
                .await
        }
        Kind::Receipt => {
            service
                .execute(document::Receipt {
                    payment_id: id.into(),
                })
                .await
        }
    };
    let html = match rendered {
        Ok(Some(html)) => html,
        Ok(None) => {
            return (StatusCode::NOT_FOUND, "document not found")
                .into_response();
        }
        Err(e) => {
            log::error!("failed to render `{kind:?}` document: {e}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let etag = etag(&html);
    if is_fresh(&headers, &etag) {
        return (StatusCode::NOT_MODIFIED, [(header::ETAG, etag)])
            .into_response();
    }

    (
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/html; charset=utf-8"),
            ),
            (header::ETAG, etag),
        ],
        html,
    )
        .into_response()
}

/// Calculates a strong [ETag] of the provided document.
///
/// [ETag]: https://developer.mozilla.org/en-US/docs/Web/HTTP/Headers/ETag
fn etag(html: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("\"{:016x}\"", xxh3_64(html.as_bytes())))
        .unwrap_or_else(|_| unreachable!("hex digits are valid header value"))
}

/// Checks whether the client already has the document with the provided
/// `etag`.
fn is_fresh(headers: &HeaderMap, etag: &HeaderValue) -> bool {
    let Ok(etag) = etag.to_str() else {
        return false;
    };
    headers
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|t| t.trim().trim_start_matches("W/"))
        .any(|t| t == "*" || t == etag)
}

#[cfg(test)]
mod spec {
    use http::{header, HeaderMap, HeaderValue};

    use super::{etag, is_fresh};

    #[test]
    fn etag_depends_on_content() {
        let a = etag("<p>a</p>");

        assert_eq!(a, etag("<p>a</p>"));
        assert_ne!(a, etag("<p>b</p>"));

        let a = a.to_str().unwrap();
        assert_eq!(a.len(), 18);
        assert!(a.starts_with('"') && a.ends_with('"'));
    }

    #[test]
    fn matches_if_none_match() {
        let tag = etag("<p>a</p>");
        let mut headers = HeaderMap::new();
        assert!(!is_fresh(&headers, &tag));

        _ = headers.insert(
            header::IF_NONE_MATCH,
            HeaderValue::from_static("\"0000000000000000\""),
        );
        assert!(!is_fresh(&headers, &tag));

        let list =
            format!("\"0000000000000000\", W/{}", tag.to_str().unwrap());
        _ = headers.insert(
            header::IF_NONE_MATCH,
            HeaderValue::from_str(&list).unwrap(),
        );
        assert!(is_fresh(&headers, &tag));

        _ = headers
            .insert(header::IF_NONE_MATCH, HeaderValue::from_static("*"));
        assert!(is_fresh(&headers, &tag));
    }
}
