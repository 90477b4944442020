use serde::{Deserialize, Serialize};

/// Uniform response envelope. `warnings` carries non-blocking advisories
/// (over-capacity bookings, ledger/flag divergence) alongside a successful
/// result; it is omitted from the JSON when empty.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            warnings: Vec::new(),
        }
    }

    pub fn success_with_warnings(data: T, warnings: Vec<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            warnings,
        }
    }

    pub fn success_with_message(data: Option<T>, message: &str) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.to_string()),
            warnings: Vec::new(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: &str) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.to_string()),
            warnings: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_warnings_are_omitted_from_json() {
        let json = serde_json::to_string(&ApiResponse::success(1)).unwrap();
        assert!(!json.contains("warnings"));

        let json = serde_json::to_string(&ApiResponse::success_with_warnings(
            1,
            vec!["careful".to_string()],
        ))
        .unwrap();
        assert!(json.contains("warnings"));
    }
}
