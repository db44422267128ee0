//! Prompt composition.
//!
//! [`compose`] is pure: the same goals and message always produce the same
//! bytes.

use crate::goals::Goal;

const PREAMBLE: &str = "\
You are a compassionate mental health support chatbot. Your role is to:

1. Provide emotional support and validation
2. Listen empathetically without judgment
3. Offer gentle guidance and coping strategies
4. Encourage professional help when appropriate
5. Maintain a warm, caring tone";

/// Sentence introducing the user's goal list.
pub const GOALS_LEAD_IN: &str = "The user has selected these mental health goals to work on:";

/// Sentence asking the model to tailor its answer to the goal list.
pub const GOALS_TAILORING: &str = "Please tailor your responses to help them with these specific goals, \
offering relevant advice and encouragement related to their chosen areas of focus.";

/// Guideline that must be present in every prompt.
pub const CRISIS_GUIDELINE: &str =
    "- If someone mentions self-harm or suicide, immediately encourage them to seek crisis support";

const GUIDELINES: [&str; 6] = [
    "- Never provide medical advice or diagnosis",
    "- Always encourage seeking professional help for serious concerns",
    "- Use supportive, non-judgmental language",
    "- Validate the person's feelings",
    "- Suggest healthy coping mechanisms",
    "- Keep responses conversational and not overly clinical",
];

const CLOSING: &str = "Respond to the following message with empathy and support:";

/// Prefix placed before the verbatim user message.
pub const USER_MESSAGE_PREFIX: &str = "User message: ";

/// Opening line shown by chat clients before the first exchange.
pub const GREETING: &str = "Hello! I'm here to listen and support you. How are you feeling today? \
Remember, this is a safe space where you can share whatever is on your mind.";

/// Canned openers offered to users who do not know where to start.
pub const QUICK_RESPONSES: [&str; 4] = [
    "I'm feeling anxious",
    "I need someone to talk to",
    "I'm having a hard day",
    "I want to feel better",
];

/// Build the full prompt sent upstream.
pub fn compose(goals: &[Goal], message: &str) -> String {
    let mut prompt = String::with_capacity(1024 + message.len());
    prompt.push_str(PREAMBLE);

    if !goals.is_empty() {
        prompt.push_str("\n\n");
        prompt.push_str(GOALS_LEAD_IN);
        for goal in goals {
            prompt.push_str("\n- ");
            prompt.push_str(&goal.name);
            prompt.push_str(": ");
            prompt.push_str(&goal.description);
        }
        prompt.push_str("\n\n");
        prompt.push_str(GOALS_TAILORING);
    }

    prompt.push_str("\n\nImportant guidelines:");
    for line in GUIDELINES.iter().chain(std::iter::once(&CRISIS_GUIDELINE)) {
        prompt.push('\n');
        prompt.push_str(line);
    }

    prompt.push_str("\n\n");
    prompt.push_str(CLOSING);
    prompt.push_str("\n\n");
    prompt.push_str(USER_MESSAGE_PREFIX);
    prompt.push_str(message);
    prompt
}
