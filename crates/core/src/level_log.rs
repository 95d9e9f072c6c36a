//! Level-log rules.

/// Maximum number of self-discussions per level log.
pub const MAX_SELF_DISCUSSIONS: usize = 50;

/// Validate a list of `(question, answer)` pairs.
///
/// Both sides of every pair must contain text.
pub fn validate_self_discussions<Q, A>(pairs: &[(Q, A)]) -> Result<(), String>
where
    Q: AsRef<str>,
    A: AsRef<str>,
{
    if pairs.len() > MAX_SELF_DISCUSSIONS {
        return Err(format!(
            "A level log holds at most {MAX_SELF_DISCUSSIONS} self-discussions"
        ));
    }
    for (i, (question, answer)) in pairs.iter().enumerate() {
        if question.as_ref().trim().is_empty() {
            return Err(format!("Self-discussion {} has an empty question", i + 1));
        }
        if answer.as_ref().trim().is_empty() {
            return Err(format!("Self-discussion {} has an empty answer", i + 1));
        }
    }
    Ok(())
}
