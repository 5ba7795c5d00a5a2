use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use uuid::Uuid;

// -- JWT Claims --

/// JWT claims issued by `/auth/*` and checked by the REST middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub exp: usize,
}

impl Claims {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

// -- Employers --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateEmployerRequest {
    pub name: String,
    pub hourly_rate: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateEmployerRequest {
    pub name: Option<String>,
    pub hourly_rate: Option<f64>,
}

// -- Shifts --

/// Times arrive as strings (ISO-8601 or close to it) and are parsed at
/// the handler.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateShiftRequest {
    pub employer_id: String,
    pub start_time: String,
    pub end_time: String,
    pub tips: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateShiftRequest {
    pub employer_id: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub tips: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftQuery {
    #[serde(default, deserialize_with = "non_blank")]
    pub employer_id: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub include_totals: bool,
}

// -- Adjustments --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateAdjustmentRequest {
    pub date: String,
    pub amount: f64,
    pub employer_id: Option<String>,
    pub shift_id: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateAdjustmentRequest {
    pub date: Option<String>,
    pub amount: Option<f64>,
    pub employer_id: Option<String>,
    pub shift_id: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentQuery {
    #[serde(default, deserialize_with = "non_blank")]
    pub employer_id: Option<String>,
    #[serde(default, deserialize_with = "non_blank")]
    pub shift_id: Option<String>,
}

// -- Query string helpers --

/// `?employerId=` with nothing after it means no filter.
fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

/// Lenient boolean: `true`/`1` are on, `false`/`0`/empty are off.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" | "" => Ok(false),
        other => Err(D::Error::custom(format!(
            "expected true, false, 1 or 0, got {other:?}"
        ))),
    }
}
