//! Fixed texts sent to, or substituted for, the model.

/// Instruction turn prepended to every model call.
///
/// The upstream API in this integration has no system role, so the persona is
/// sent as the first `user` turn.
pub const PERSONA_PROMPT: &str = "You are an AI chat bot that is designed to provide helpful advice and break downs of complex documents. Please respond without any style except for paragraph spaces.";

/// Reply returned with HTTP 200 when the model answered but the response
/// carried no candidate text.
pub const UNPROCESSABLE_REPLY: &str = "I couldn't process that request.";

/// Wraps extracted document text so the model can tell it apart from a typed
/// question.
///
/// # Example
/// ```
/// use lightyear::llm::prompts::document_turn;
///
/// assert_eq!(
///     document_turn("Lease term: 12 months"),
///     "Uploaded Document: Lease term: 12 months"
/// );
/// ```
pub fn document_turn(text: &str) -> String {
    format!("Uploaded Document: {text}")
}
