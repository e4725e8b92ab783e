//! Human-readable error descriptions and structured JSON error formatting.

use gate_core::error::{BuildError, GateError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(BuildError::InvalidConfig(msg)) = err.downcast_ref::<BuildError>() {
        return format!(
            "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun `gatesim self-check`."
        );
    }

    if let Some(ge) = err.downcast_ref::<GateError>() {
        return match ge {
            GateError::Config(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: A missing file, a TOML syntax error, or values that break the threshold/travel ordering.\nHow to fix: Edit the config file, then rerun `gatesim self-check`."
            ),
            GateError::Scenario(msg) => format!(
                "What happened: The scenario could not be loaded ({msg}).\nLikely causes: Wrong headers, an unknown action, or a missing value.\nHow to fix: Use headers 'at_s,action,value' and actions open|close|obstacle1|obstacle2|toggle1|toggle2|force_delta|reset."
            ),
            GateError::Plant(msg) => format!(
                "What happened: The plant model rejected its parameters ({msg}).\nLikely causes: Inconsistent [travel] or [drive] values.\nHow to fix: Check travel thresholds and full_travel_s in the config."
            ),
            GateError::QueueClosed => "What happened: The operator input queue closed unexpectedly.\nLikely causes: The simulation loop exited while input was still being read.\nHow to fix: Re-run with --log-level=debug for more detail.".to_string(),
        };
    }

    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();
    if lower.contains("--dt") || lower.contains("--duration") {
        return format!("What happened: {msg}.\nHow to fix: Pass a positive --dt and a non-negative --duration.");
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 config, 4 scenario, 1 anything else.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<BuildError>().is_some() {
        return 3;
    }
    match err.downcast_ref::<GateError>() {
        Some(GateError::Config(_) | GateError::Plant(_)) => 3,
        Some(GateError::Scenario(_)) => 4,
        _ => 1,
    }
}

fn reason_name(err: &eyre::Report) -> &'static str {
    if err.downcast_ref::<BuildError>().is_some() {
        return "InvalidConfig";
    }
    match err.downcast_ref::<GateError>() {
        Some(GateError::Config(_)) => "InvalidConfig",
        Some(GateError::Scenario(_)) => "InvalidScenario",
        Some(GateError::Plant(_)) => "InvalidPlant",
        Some(GateError::QueueClosed) => "QueueClosed",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;
    json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}
