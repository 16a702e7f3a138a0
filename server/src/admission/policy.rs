/// Origin the local dev client runs on; always admitted.
pub const DEV_CLIENT_ORIGIN: &str = "http://localhost:5173";

/// Outcome of evaluating a request origin against the allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allow,
    Reject,
}

/// Allow-list of origins permitted to make cross-origin requests.
/// Built once at startup from the static dev origin plus the configured
/// client origin; immutable afterwards.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    allowed: Vec<String>,
}

impl OriginPolicy {
    pub fn new(client_origin: Option<&str>) -> Self {
        let mut allowed = vec![DEV_CLIENT_ORIGIN.to_string()];
        if let Some(origin) = client_origin {
            allowed.push(origin.to_string());
        }
        Self { allowed }
    }

    /// Decide whether a request origin is admitted.
    ///
    /// A request without an Origin header is trusted: same-origin browser
    /// requests and non-browser clients (mobile apps, server-to-server
    /// calls) do not send one. Browsers always send Origin on cross-origin
    /// requests, so the allow-list still gates those.
    pub fn evaluate(&self, origin: Option<&str>) -> Admission {
        match origin {
            None => Admission::Allow,
            Some(origin) if self.allowed.iter().any(|a| a == origin) => Admission::Allow,
            Some(_) => Admission::Reject,
        }
    }

    /// Origins currently admitted.
    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed
    }
}
