use serde_json::Value;

use crate::error::AppError;

/// Pull the generated text out of a provider envelope.
///
/// Providers disagree about where the payload lives, so the known shapes are
/// probed in fixed precedence, first present-and-non-empty wins:
///
/// 1. `choices[0].message.content` (chat completion)
/// 2. `choices[0].text` (plain completion)
/// 3. top-level `content`
/// 4. top-level `result`
///
/// An envelope with an explicit `error` field fails before any probing. All
/// failures carry the full raw payload for diagnostic display.
pub fn payload_text(envelope: &Value) -> Result<String, AppError> {
    if envelope.get("error").is_some() {
        return Err(AppError::Generation {
            raw: envelope.clone(),
        });
    }

    let probes: [fn(&Value) -> Option<&str>; 4] = [
        |v| v.get("choices")?.get(0)?.get("message")?.get("content")?.as_str(),
        |v| v.get("choices")?.get(0)?.get("text")?.as_str(),
        |v| v.get("content")?.as_str(),
        |v| v.get("result")?.as_str(),
    ];

    for probe in probes {
        if let Some(text) = probe(envelope) {
            if !text.is_empty() {
                return Ok(text.to_string());
            }
        }
    }

    Err(AppError::Generation {
        raw: envelope.clone(),
    })
}
