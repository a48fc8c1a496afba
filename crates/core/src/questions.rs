//! Guided mission-and-vision questions answered after validation.

/// Number of answers required before a domain can be selected.
pub const REQUIRED_ANSWER_COUNT: usize = 5;

/// The guided questions, asked in order.
pub const GUIDED_QUESTIONS: [&str; REQUIRED_ANSWER_COUNT] = [
    "What is the ultimate mission of your project? What is the core 'why' behind it?",
    "What does a successful future look like in 5 years? Paint a picture of your vision.",
    "Describe your Ideal Customer Profile (ICP) in detail. Who are they, what are their pain \
     points, and what do they value?",
    "What is your unique positioning in the market? How are you different from competitors?",
    "What is the single most important message you want your brand to convey?",
];

/// The next question to ask given how many answers are already recorded.
pub fn next_question(answered: usize) -> Option<&'static str> {
    GUIDED_QUESTIONS.get(answered).copied()
}
