use serde_json::Value;

use crate::error::AppError;
use crate::models::CourseDraft;

/// Parse generated text as a course batch.
///
/// The text must be a JSON array of course objects. Validation is
/// all-or-nothing: one bad element rejects the whole batch, so a preview
/// never mixes trustworthy and untrustworthy rows. Element order is
/// preserved.
pub fn candidates_from_text(raw: &str) -> Result<Vec<CourseDraft>, AppError> {
    let trimmed = strip_code_fence(raw);

    let parsed: Value = serde_json::from_str(trimmed).map_err(|e| AppError::MalformedOutput {
        reason: format!("generated output is not valid JSON: {}", e),
        raw: raw.to_string(),
    })?;

    candidates_from_value(&parsed).map_err(|e| match e {
        // Re-attach the original text so the caller sees what the provider
        // actually sent, not the fence-stripped intermediate.
        AppError::MalformedOutput { reason, .. } => AppError::MalformedOutput {
            reason,
            raw: raw.to_string(),
        },
        other => other,
    })
}

/// Validate an already-structured payload, for the envelope variant where
/// the provider hands back a JSON array directly.
pub fn candidates_from_value(payload: &Value) -> Result<Vec<CourseDraft>, AppError> {
    let items = payload.as_array().ok_or_else(|| AppError::MalformedOutput {
        reason: "generated output is not a JSON array".to_string(),
        raw: payload.to_string(),
    })?;

    let mut drafts = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let draft = validate_element(item).map_err(|reason| AppError::MalformedOutput {
            reason: format!("candidate {}: {}", index, reason),
            raw: payload.to_string(),
        })?;
        drafts.push(draft);
    }

    Ok(drafts)
}

/// Coerce one array element into a draft. Any `id` field is ignored: identity
/// is assigned by the store, never by the provider.
fn validate_element(item: &Value) -> Result<CourseDraft, String> {
    let obj = item.as_object().ok_or("not a JSON object")?;

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .ok_or("missing or non-string 'name'")?;
    if name.trim().is_empty() {
        return Err("'name' must not be empty".to_string());
    }

    let description = match obj.get("description") {
        Some(v) => v.as_str().ok_or("non-string 'description'")?.to_string(),
        None => String::new(),
    };

    let price = obj
        .get("price")
        .and_then(Value::as_f64)
        .ok_or("missing or non-numeric 'price'")?;
    if price < 0.0 {
        return Err("'price' must not be negative".to_string());
    }

    let in_stock = obj
        .get("inStock")
        .and_then(Value::as_bool)
        .ok_or("missing or non-boolean 'inStock'")?;

    Ok(CourseDraft {
        name: name.to_string(),
        description,
        price,
        in_stock,
    })
}

/// Drop a single surrounding markdown code fence, with or without a language
/// tag. Providers add one even when told not to.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(rest) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Skip the language tag on the opening fence line, if any.
    match rest.split_once('\n') {
        Some((first_line, body)) if !first_line.trim().is_empty() => body.trim(),
        _ => rest.trim(),
    }
}
