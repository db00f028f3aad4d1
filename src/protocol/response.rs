//! Response decoding: status + custom headers + body → [`ConversionResult`].
//!
//! The service returns the PDF as the raw body and everything else in
//! headers. All four headers are mandatory on a 200; a missing or unparsable
//! one is a contract breach by the service and is reported as
//! [`RedocError::MalformedResponse`] rather than defaulted.

use crate::error::RedocError;
use crate::output::ConversionResult;
use crate::protocol::transport::TransportResponse;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use std::fmt::Display;
use std::str::FromStr;
use tracing::warn;

pub const TRANSACTION_ID_HEADER: &str = "X-redoc-Transaction-Id";
pub const TOTAL_PAGES_HEADER: &str = "X-redoc-pdf-Total-Pages";
pub const TOTAL_TIME_HEADER: &str = "x-redoc-process-total-time";
pub const METADATA_HEADER: &str = "X-redoc-xml-Metadata";

/// Standard alphabet; trailing `=` padding is optional.
const METADATA_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode a raw response.
///
/// # Errors
/// - [`RedocError::ConversionFailed`] for any status other than 200
/// - [`RedocError::MalformedResponse`] for a missing or invalid header
pub fn decode_response(response: TransportResponse) -> Result<ConversionResult, RedocError> {
    if response.status != 200 {
        warn!("Conversion service returned HTTP {}", response.status);
        return Err(RedocError::ConversionFailed {
            status: response.status,
        });
    }

    let transaction_id = required(&response, TRANSACTION_ID_HEADER)?.to_string();
    let total_pages: u32 = parse_number(&response, TOTAL_PAGES_HEADER)?;
    let total_time_ms: u64 = parse_number(&response, TOTAL_TIME_HEADER)?;
    let metadata = decode_metadata(required(&response, METADATA_HEADER)?)?;

    Ok(ConversionResult::new(
        response.body,
        transaction_id,
        total_pages,
        total_time_ms,
        metadata,
    ))
}

fn required<'a>(response: &'a TransportResponse, header: &'static str) -> Result<&'a str, RedocError> {
    response
        .header(header)
        .ok_or_else(|| RedocError::malformed(header, "is missing"))
}

fn parse_number<T>(response: &TransportResponse, header: &'static str) -> Result<T, RedocError>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = required(response, header)?;
    raw.trim()
        .parse()
        .map_err(|e| RedocError::malformed(header, format!("is not a non-negative integer ({raw:?}): {e}")))
}

/// Base64 → UTF-8 → JSON.
fn decode_metadata(raw: &str) -> Result<serde_json::Value, RedocError> {
    let bytes = METADATA_ENGINE
        .decode(raw.trim())
        .map_err(|e| RedocError::malformed(METADATA_HEADER, format!("is not valid base64: {e}")))?;
    let text = String::from_utf8(bytes)
        .map_err(|e| RedocError::malformed(METADATA_HEADER, format!("is not UTF-8: {e}")))?;
    serde_json::from_str(&text)
        .map_err(|e| RedocError::malformed(METADATA_HEADER, format!("is not valid JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use serde_json::json;

    fn ok_response() -> TransportResponse {
        TransportResponse::new(200, b"%PDF-1.7 body".to_vec())
            .with_header(TRANSACTION_ID_HEADER, "tx-123")
            .with_header(TOTAL_PAGES_HEADER, "2")
            .with_header(TOTAL_TIME_HEADER, "840")
            .with_header(METADATA_HEADER, STANDARD.encode(r#"{"a":1}"#))
    }

    #[test]
    fn decodes_full_response() {
        let result = decode_response(ok_response()).unwrap();
        assert_eq!(result.payload(), b"%PDF-1.7 body");
        assert_eq!(result.transaction_id(), "tx-123");
        assert_eq!(result.total_pages(), 2);
        assert_eq!(result.total_time_ms(), 840);
        assert_eq!(result.metadata(), &json!({"a": 1}));
    }

    #[test]
    fn non_200_fails_with_status() {
        let err = decode_response(TransportResponse::new(404, b"not found".to_vec())).unwrap_err();
        assert!(matches!(err, RedocError::ConversionFailed { status: 404 }));
    }

    #[test]
    fn other_2xx_is_not_success() {
        let mut resp = ok_response();
        resp.status = 202;
        assert!(matches!(
            decode_response(resp).unwrap_err(),
            RedocError::ConversionFailed { status: 202 }
        ));
    }

    #[test]
    fn each_header_is_required() {
        for header in [
            TRANSACTION_ID_HEADER,
            TOTAL_PAGES_HEADER,
            TOTAL_TIME_HEADER,
            METADATA_HEADER,
        ] {
            let mut resp = TransportResponse::new(200, b"%PDF".to_vec());
            for (name, value) in [
                (TRANSACTION_ID_HEADER, "tx".to_string()),
                (TOTAL_PAGES_HEADER, "1".to_string()),
                (TOTAL_TIME_HEADER, "5".to_string()),
                (METADATA_HEADER, STANDARD.encode("{}")),
            ] {
                if name != header {
                    resp.insert_header(name, value);
                }
            }
            match decode_response(resp).unwrap_err() {
                RedocError::MalformedResponse { header: h, .. } => assert_eq!(h, header),
                other => panic!("expected MalformedResponse for {header}, got {other:?}"),
            }
        }
    }

    #[test]
    fn negative_page_count_is_malformed() {
        let resp = ok_response().with_header(TOTAL_PAGES_HEADER, "-1");
        assert!(matches!(
            decode_response(resp).unwrap_err(),
            RedocError::MalformedResponse { header: TOTAL_PAGES_HEADER, .. }
        ));
    }

    #[test]
    fn bad_base64_is_malformed() {
        let resp = ok_response().with_header(METADATA_HEADER, "%%%not base64");
        assert!(matches!(
            decode_response(resp).unwrap_err(),
            RedocError::MalformedResponse { header: METADATA_HEADER, .. }
        ));
    }

    #[test]
    fn unpadded_metadata_is_accepted() {
        let resp = ok_response().with_header(METADATA_HEADER, "eyJhIjoxMn0");
        assert_eq!(decode_response(resp).unwrap().metadata(), &json!({"a": 12}));
    }

    #[test]
    fn base64_of_non_json_is_malformed() {
        let resp = ok_response().with_header(METADATA_HEADER, STANDARD.encode("not json"));
        let err = decode_response(resp).unwrap_err();
        assert!(err.to_string().contains("JSON"), "got: {err}");
    }

    #[test]
    fn padded_integer_headers_are_accepted() {
        let resp = ok_response().with_header(TOTAL_TIME_HEADER, " 12 ");
        assert_eq!(decode_response(resp).unwrap().total_time_ms(), 12);
    }
}
