/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Authentication middleware for the configuration API.
//!
//! Requests carry the process's `SESSION_SECRET` either as
//! `Authorization: Bearer <secret>` or as the bare header value.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};
use tvrelay_utils::logging::prelude::*;

/// The admin secret, kept only as a SHA-256 digest.
#[derive(Clone)]
pub struct AdminSecret {
    digest: [u8; 32],
}

impl AdminSecret {
    pub fn new(secret: &str) -> Self {
        AdminSecret {
            digest: Sha256::digest(secret.as_bytes()).into(),
        }
    }

    /// Compares digests so the comparison time does not depend on the
    /// candidate's length or on where it first differs.
    pub fn verify(&self, candidate: &str) -> bool {
        let candidate: [u8; 32] = Sha256::digest(candidate.as_bytes()).into();
        self.digest
            .iter()
            .zip(candidate.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }

    /// Short hex prefix of the digest, safe to log.
    pub fn fingerprint(&self) -> String {
        hex::encode(&self.digest[..4])
    }
}

impl std::fmt::Debug for AdminSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AdminSecret({})", self.fingerprint())
    }
}

/// Extracts the token from an Authorization header value.
fn bearer_token(value: &str) -> &str {
    let value = value.trim();
    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => token.trim(),
        _ => value,
    }
}

/// Middleware function for authenticating configuration API requests.
pub async fn auth_middleware(
    State(secret): State<AdminSecret>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = match request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
    {
        Some(value) => bearer_token(value),
        None => {
            warn!("Authorization header missing or invalid");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    if token.is_empty() || !secret.verify(token) {
        warn!("Authentication failed for {}", request.uri().path());
        return Err(StatusCode::UNAUTHORIZED);
    }

    debug!("Authentication successful");
    Ok(next.run(request).await)
}
