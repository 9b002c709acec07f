use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

/// Claims carried by the identity service's tokens: `{id, role, hospitalId?}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub id: String,
    pub role: Role,
    #[serde(rename = "hospitalId", default)]
    pub hospital_id: Option<String>,
    #[serde(default)]
    pub exp: Option<u64>,
    #[serde(default)]
    pub iat: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    HospitalAdmin,
    Doctor,
    Nurse,
    Patient,
    Staff,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::SuperAdmin => write!(f, "SUPER_ADMIN"),
            Role::HospitalAdmin => write!(f, "HOSPITAL_ADMIN"),
            Role::Doctor => write!(f, "DOCTOR"),
            Role::Nurse => write!(f, "NURSE"),
            Role::Patient => write!(f, "PATIENT"),
            Role::Staff => write!(f, "STAFF"),
        }
    }
}

/// Request-scoped identity, decoded once by the auth middleware and passed
/// explicitly into every coordinator call. No ambient identity state exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    pub subject_id: String,
    pub role: Role,
    pub hospital_id: Option<String>,
}

impl AuthContext {
    pub fn from_claims(claims: JwtClaims) -> Self {
        Self {
            subject_id: claims.id,
            role: claims.role,
            hospital_id: claims.hospital_id,
        }
    }
}
