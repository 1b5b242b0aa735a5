//! System prompt for the tool-calling conversation.

use chrono::Utc;

/// Fixed apology used when nothing presentable can be produced.
pub const APOLOGY: &str =
    "I'm sorry, I'm having trouble with that right now. Could you try again in a moment?";

/// Build the capability prompt for one utterance.
///
/// The tool schemas travel separately in the request; this prompt sets the
/// voice register and the ground rules for when to call tools.
pub fn capability_prompt() -> String {
    format!(
        "You are a personal assistant speaking with the user on a phone call. \
         Today's date is {}.\n\n\
         You can check the user's calendar, schedule events, read their \
         email, list upcoming bills, and deliver their daily briefing using \
         the available tools. Call a tool whenever the user asks about that \
         data; never invent calendar entries, emails, or bills. Only create \
         an event when the user explicitly asks to schedule something.\n\n\
         Replies are spoken aloud: keep them short and conversational, with \
         no lists, markdown, or headers. If a tool reports an error, tell \
         the user plainly that you couldn't get that information and move \
         on; never read error details aloud.",
        Utc::now().date_naive()
    )
}
