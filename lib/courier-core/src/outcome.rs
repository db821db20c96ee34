//! Classification of transport outcomes.

use serde::de::DeserializeOwned;

use crate::{EndpointSpec, Error, Response, Result, SuccessResult, TransportError, from_json};

/// Map a transport outcome to the caller-facing result.
///
/// - transport failure → [`Error::Custom`] with the transport diagnostic,
/// - status in `200..300` → decode the body as `T`, or
///   [`Error::DecodingFailed`],
/// - any other status → [`Error::InvalidStatusCode`] carrying the raw body
///   (`None` when empty) and `request`.
pub fn resolve<T: DeserializeOwned>(
    outcome: std::result::Result<Response, TransportError>,
    request: &EndpointSpec,
) -> Result<SuccessResult<T>> {
    let response = outcome?;

    if !response.is_success() {
        let (status, _, body) = response.into_parts();
        return Err(Error::InvalidStatusCode {
            status,
            body: (!body.is_empty()).then_some(body),
            request: Box::new(request.clone()),
        });
    }

    let value = from_json(response.body())?;
    let (status, headers, _) = response.into_parts();
    Ok(SuccessResult::new(value, status, headers))
}
