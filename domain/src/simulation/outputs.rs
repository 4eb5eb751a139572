//! Category-specific synthesis of tool outputs and failure context.

use crate::tool::{ToolCapability, ToolCategory, ToolErrorSpec, ToolFailure};
use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::{Value, json};

/// Error templates for tools that declare no errors of their own.
pub const GENERIC_ERRORS: &[(&str, &str)] = &[
    ("EXECUTION_ERROR", "Tool execution failed unexpectedly"),
    ("TIMEOUT", "Operation timed out"),
    ("INVALID_INPUT", "Invalid input parameters"),
    ("RESOURCE_UNAVAILABLE", "Required resource is temporarily unavailable"),
];

/// Synthesize a plausible output for a successful execution.
pub fn synthesize_output<R: Rng + ?Sized>(
    category: ToolCategory,
    tool_name: &str,
    rng: &mut R,
) -> Value {
    match category {
        ToolCategory::File => file_output(tool_name, rng),
        ToolCategory::Data => data_output(rng),
        ToolCategory::Network => network_output(tool_name, rng),
        ToolCategory::Compute => compute_output(rng),
        ToolCategory::Integration => integration_output(rng),
        ToolCategory::Utility => utility_output(tool_name, rng),
        ToolCategory::Generic => generic_output(tool_name),
    }
}

fn file_output<R: Rng + ?Sized>(tool_name: &str, rng: &mut R) -> Value {
    let format = ["csv", "json", "txt"].choose(rng).copied().unwrap_or("txt");
    json!({
        "file_path": format!("/data/{}_output.{}", tool_name, format),
        "size_bytes": rng.gen_range(1_024..1_048_576u64),
        "lines": rng.gen_range(10..10_000u32),
        "format": format,
    })
}

fn data_output<R: Rng + ?Sized>(rng: &mut R) -> Value {
    let processed = rng.gen_range(100..10_000u32);
    let valid = rng.gen_range(processed / 2..=processed);
    json!({
        "records_processed": processed,
        "records_valid": valid,
        "schema_version": "1.0",
        "transformations_applied": rng.gen_range(1..=5u32),
    })
}

fn network_output<R: Rng + ?Sized>(tool_name: &str, rng: &mut R) -> Value {
    json!({
        "status_code": 200,
        "endpoint": format!("https://api.example.com/{}", tool_name),
        "response_time_ms": rng.gen_range(50..2_000u32),
        "bytes_received": rng.gen_range(512..65_536u32),
    })
}

fn compute_output<R: Rng + ?Sized>(rng: &mut R) -> Value {
    let result = (rng.gen_range(0.0..100.0f64) * 100.0).round() / 100.0;
    json!({
        "result": result,
        "iterations": rng.gen_range(1..1_000u32),
        "converged": true,
    })
}

fn integration_output<R: Rng + ?Sized>(rng: &mut R) -> Value {
    json!({
        "records_synced": rng.gen_range(1..500u32),
        "target_system": "external",
        "transaction_id": format!("txn-{:08x}", rng.r#gen::<u32>()),
    })
}

fn utility_output<R: Rng + ?Sized>(tool_name: &str, rng: &mut R) -> Value {
    json!({
        "status": "ok",
        "operation": tool_name,
        "items_affected": rng.gen_range(1..100u32),
    })
}

fn generic_output(tool_name: &str) -> Value {
    json!({
        "status": "completed",
        "tool": tool_name,
        "result": "Operation completed successfully",
    })
}

/// Pick a failure for `capability`.
///
/// The tool's declared errors are used whenever it has any; the generic
/// templates are only a fallback.
pub fn synthesize_failure<R: Rng + ?Sized>(capability: &ToolCapability, rng: &mut R) -> ToolFailure {
    let spec = match capability.errors.choose(rng) {
        Some(spec) => spec.clone(),
        None => {
            let (code, description) = GENERIC_ERRORS
                .choose(rng)
                .copied()
                .unwrap_or(GENERIC_ERRORS[0]);
            ToolErrorSpec::new(code, description)
        }
    };
    let mut failure = ToolFailure::new(spec.code, spec.description);
    if let Some(suffix) = context_suffix(capability, &failure, rng) {
        failure.description.push_str(&suffix);
    }
    failure
}

fn context_suffix<R: Rng + ?Sized>(
    capability: &ToolCapability,
    failure: &ToolFailure,
    rng: &mut R,
) -> Option<String> {
    if failure.is_timeout() {
        return Some(format!(" (after {}s)", rng.gen_range(10..=60u32)));
    }
    match capability.kind() {
        ToolCategory::Network => {
            let status = [500u16, 502, 503].choose(rng).copied().unwrap_or(500);
            Some(format!(" (endpoint returned HTTP {})", status))
        }
        ToolCategory::File => Some(format!(" (path: /data/{})", capability.name)),
        ToolCategory::Data => Some(format!(" (at record {})", rng.gen_range(1..10_000u32))),
        ToolCategory::Integration => Some(" (remote system: external)".to_string()),
        ToolCategory::Compute | ToolCategory::Utility | ToolCategory::Generic => None,
    }
}
