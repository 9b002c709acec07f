use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use shared_models::auth::{AuthContext, JwtClaims};

type HmacSha256 = Hmac<Sha256>;

/// Validate an HS256 token and extract the `{id, role, hospitalId?}` claims
/// into a request-scoped [`AuthContext`].
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<AuthContext, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid token format".to_string());
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let signature = match URL_SAFE_NO_PAD.decode(signature_b64) {
        Ok(sig) => sig,
        Err(e) => {
            debug!("Failed to decode signature: {}", e);
            return Err("Invalid signature encoding".to_string());
        }
    };

    let signing_input = format!("{}.{}", header_b64, claims_b64);

    let mut mac = match HmacSha256::new_from_slice(jwt_secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return Err("Failed to create HMAC".to_string()),
    };

    mac.update(signing_input.as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err("Invalid token signature".to_string());
    }

    let claims_json = match URL_SAFE_NO_PAD.decode(claims_b64) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(json_str) => json_str,
            Err(_) => return Err("Invalid claims encoding".to_string()),
        },
        Err(_) => return Err("Invalid claims encoding".to_string()),
    };

    let claims: JwtClaims = match serde_json::from_str(&claims_json) {
        Ok(c) => c,
        Err(e) => {
            debug!("Failed to parse claims: {}", e);
            return Err("Invalid claims format".to_string());
        }
    };

    if let Some(exp) = claims.exp {
        let now = chrono::Utc::now().timestamp() as u64;
        if exp < now {
            debug!("Token expired at {} (now: {})", exp, now);
            return Err("Token expired".to_string());
        }
    }

    let ctx = AuthContext::from_claims(claims);
    debug!("Token validated successfully for subject: {}", ctx.subject_id);
    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{JwtTestUtils, TestUser};
    use shared_models::auth::Role;

    const SECRET: &str = "test-secret-key-for-jwt-validation-must-be-long-enough";

    #[test]
    fn valid_token_yields_auth_context() {
        let user = TestUser::hospital_admin("7c9e6679-7425-40de-944b-e07fc1f90ae7");
        let token = JwtTestUtils::create_test_token(&user, SECRET, None);

        let ctx = validate_token(&token, SECRET).unwrap();

        assert_eq!(ctx.subject_id, user.id);
        assert_eq!(ctx.role, Role::HospitalAdmin);
        assert_eq!(
            ctx.hospital_id.as_deref(),
            Some("7c9e6679-7425-40de-944b-e07fc1f90ae7")
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let user = TestUser::doctor();
        let token = JwtTestUtils::create_expired_token(&user, SECRET);

        let err = validate_token(&token, SECRET).unwrap_err();
        assert_eq!(err, "Token expired");
    }

    #[test]
    fn wrong_signature_is_rejected() {
        let user = TestUser::doctor();
        let token = JwtTestUtils::create_invalid_signature_token(&user);

        let err = validate_token(&token, SECRET).unwrap_err();
        assert_eq!(err, "Invalid token signature");
    }

    #[test]
    fn malformed_token_is_rejected() {
        let err = validate_token("not-a-jwt", SECRET).unwrap_err();
        assert_eq!(err, "Invalid token format");
    }

    #[test]
    fn empty_secret_is_rejected() {
        let user = TestUser::patient();
        let token = JwtTestUtils::create_test_token(&user, SECRET, None);

        assert!(validate_token(&token, "").is_err());
    }
}
