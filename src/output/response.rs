//! CLI response formatting and output.
//!
//! Provides the JSON envelope, printing, and exit code mapping.

use relabel::{Error, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

#[derive(Debug, Serialize)]
pub struct CliError {
    pub code: String,
    pub message: String,
}

impl<T: Serialize> CliResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl CliResponse<()> {
    pub fn from_error(err: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(CliError {
                code: err.code().to_string(),
                message: err.to_string(),
            }),
        }
    }
}

fn print_json<T: Serialize>(response: &CliResponse<T>) {
    match serde_json::to_string_pretty(response) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Failed to serialize response: {e}"),
    }
}

/// Print a command result as a JSON envelope and return the exit code.
pub fn respond<T: Serialize>(result: Result<(T, i32)>) -> i32 {
    match result {
        Ok((data, code)) => {
            print_json(&CliResponse::success(data));
            code
        }
        Err(err) => {
            print_json(&CliResponse::from_error(&err));
            1
        }
    }
}
