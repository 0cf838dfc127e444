//! JSON output support for machine-readable CLI output.
//!
//! Structured errors and results for automation and CI pipelines.

use serde::Serialize;
use stackcraft_core::Error as CoreError;
use std::sync::atomic::{AtomicBool, Ordering};

static JSON_OUTPUT: AtomicBool = AtomicBool::new(false);

pub fn enable() {
    JSON_OUTPUT.store(true, Ordering::Relaxed);
}

pub fn disable() {
    JSON_OUTPUT.store(false, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    JSON_OUTPUT.load(Ordering::Relaxed)
}

#[derive(Debug, Serialize)]
pub struct JsonError {
    pub code: String,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,
}

#[derive(Debug, Default, Serialize)]
pub struct ErrorContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unknown_packages: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shadowed_packages: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct JsonResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonError>,
}

impl JsonError {
    #[must_use]
    pub fn from_core_error(err: &CoreError) -> Self {
        let code = err.code();
        Self {
            code: code.as_str().to_string(),
            title: code.title().to_string(),
            message: err.to_string(),
            suggestions: err.suggestions().to_vec(),
            context: extract_context(err),
        }
    }

    #[must_use]
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<CoreError>() {
            Some(core_err) => Self::from_core_error(core_err),
            None => Self {
                code: "E0000".to_string(),
                title: "Unknown error".to_string(),
                message: err.to_string(),
                suggestions: vec![],
                context: None,
            },
        }
    }

    pub fn print(&self) {
        if let Ok(json) = sonic_rs::to_string_pretty(self) {
            eprintln!("{json}");
        }
    }
}

impl<T: Serialize> JsonResult<T> {
    #[must_use]
    pub fn success(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    #[must_use]
    pub fn failure(err: &anyhow::Error) -> Self {
        Self { success: false, data: None, error: Some(JsonError::from_anyhow(err)) }
    }

    pub fn print(&self) {
        if let Ok(json) = sonic_rs::to_string_pretty(self) {
            if self.success {
                println!("{json}");
            } else {
                eprintln!("{json}");
            }
        }
    }
}

fn extract_context(err: &CoreError) -> Option<ErrorContext> {
    match err {
        CoreError::SnapshotNotFound { name, .. } => Some(ErrorContext {
            snapshot: Some(name.to_string()),
            ..Default::default()
        }),
        CoreError::UnknownPackages { stack_yaml_path, unknown, shadowed, .. } => Some(ErrorContext {
            path: stack_yaml_path.as_ref().map(|p| p.display().to_string()),
            unknown_packages: unknown.iter().map(|p| p.name.to_string()).collect(),
            shadowed_packages: shadowed.iter().map(|p| p.name.to_string()).collect(),
            ..Default::default()
        }),
        CoreError::Io { path, .. } => {
            Some(ErrorContext { path: Some(path.display().to_string()), ..Default::default() })
        }
        CoreError::Network { url, .. } => Some(ErrorContext { url: url.clone(), ..Default::default() }),
        _ => None,
    }
}

pub fn print_error(err: &anyhow::Error) {
    if is_enabled() {
        JsonError::from_anyhow(err).print();
    } else if let Some(core_err) = err.downcast_ref::<CoreError>() {
        eprintln!("{}", core_err.display_with_suggestions());
    } else {
        super::error(&err.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackcraft_core::SnapName;

    #[test]
    fn test_json_error_from_core() {
        let err = CoreError::snapshot_not_found(SnapName::Lts { major: 20, minor: 14 });
        let json_err = JsonError::from_core_error(&err);
        assert_eq!(json_err.title, "Snapshot not found");
        assert!(json_err.message.contains("lts-20.14"));
        assert!(!json_err.suggestions.is_empty());
    }

    #[test]
    fn test_json_result_success() {
        let result = JsonResult::success(42);
        assert!(result.success);
        assert_eq!(result.data, Some(42));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_json_mode_toggle() {
        disable();
        assert!(!is_enabled());
        enable();
        assert!(is_enabled());
        disable();
    }
}
