//! Header allow-lists for both directions of the relay.

use axum::http::{
    header::{
        ACCEPT, ACCEPT_LANGUAGE, ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, RANGE,
    },
    HeaderMap, HeaderName,
};

/// Client headers that may reach the origin.
pub const REQUEST_ALLOW_LIST: [HeaderName; 3] = [RANGE, ACCEPT, ACCEPT_LANGUAGE];

/// Origin headers that may reach the client.
pub const RESPONSE_ALLOW_LIST: [HeaderName; 4] =
    [CONTENT_TYPE, CONTENT_LENGTH, CONTENT_RANGE, ACCEPT_RANGES];

/// Build the origin request headers: relay defaults, overridden by any
/// allow-listed header the client sent.
pub fn outbound_headers(inbound: &HeaderMap, defaults: &HeaderMap) -> HeaderMap {
    let mut headers = defaults.clone();
    for name in &REQUEST_ALLOW_LIST {
        copy_header(inbound, &mut headers, name);
    }
    headers
}

/// Select the origin response headers relayed to the client.
pub fn relayed_headers(origin: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for name in &RESPONSE_ALLOW_LIST {
        copy_header(origin, &mut headers, name);
    }
    headers
}

fn copy_header(from: &HeaderMap, to: &mut HeaderMap, name: &HeaderName) {
    let mut values = from.get_all(name).iter();
    let Some(first) = values.next() else {
        return;
    };
    to.insert(name.clone(), first.clone());
    for value in values {
        to.append(name.clone(), value.clone());
    }
}
