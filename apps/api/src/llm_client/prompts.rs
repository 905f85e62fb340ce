// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Appended to every system prompt.
pub const JSON_ONLY_INSTRUCTION: &str = "Return ONLY a valid JSON object matching the exact \
    format specified, with no additional text or explanation. \
    Do NOT use markdown code fences.";

/// Builds a system prompt from a role description plus the JSON-only rule.
pub fn json_system_prompt(role: &str) -> String {
    format!("{role} {JSON_ONLY_INSTRUCTION}")
}

/// Substitutes `{key}` placeholders in one pass. Substituted values are never
/// rescanned, so a job description containing `{resume_json}` stays literal.
/// Braces that do not name a key (JSON shape examples) are left untouched.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut filled = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        filled.push_str(&rest[..start]);
        let tail = &rest[start..];
        let placeholder = values.iter().find(|(key, _)| {
            tail[1..]
                .strip_prefix(key)
                .is_some_and(|after| after.starts_with('}'))
        });
        match placeholder {
            Some((key, value)) => {
                filled.push_str(value);
                rest = &tail[key.len() + 2..];
            }
            None => {
                filled.push('{');
                rest = &tail[1..];
            }
        }
    }
    filled.push_str(rest);
    filled
}
