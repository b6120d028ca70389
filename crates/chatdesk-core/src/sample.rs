//! A canned conversation for previewing the client without an agent.
//!
//! Display-only: it is never written into a real transcript.

use std::sync::OnceLock;

use crate::state::{ChatMessage, ChatRole};

fn message(
    id: &str,
    role: ChatRole,
    content: &str,
    suggested_questions: &[&str],
    sources: &[&str],
) -> ChatMessage {
    ChatMessage {
        id: id.to_string(),
        role,
        content: content.to_string(),
        suggested_questions: suggested_questions.iter().map(|s| s.to_string()).collect(),
        sources: sources.iter().map(|s| s.to_string()).collect(),
        is_error: false,
    }
}

pub fn sample_transcript() -> &'static [ChatMessage] {
    static SAMPLE: OnceLock<Vec<ChatMessage>> = OnceLock::new();
    SAMPLE.get_or_init(|| {
        vec![
            message("sample-1", ChatRole::User, "How does Burnlab work?", &[], &[]),
            message(
                "sample-2",
                ChatRole::Assistant,
                "**Burnlab** is an advanced analytics platform designed to help businesses understand customer behavior and optimize their digital experiences.\n\n\
### Key Features:\n\
- **Real-time Analytics** - Track user interactions as they happen\n\
- **Heatmap Visualization** - See where users click, scroll, and engage\n\
- **Session Recording** - Replay user sessions for deeper insights\n\
- **A/B Testing** - Run experiments to optimize conversion rates\n\n\
Burnlab integrates seamlessly with your existing tech stack and provides actionable insights within minutes of setup.\n\n\
[Learn more about Burnlab](https://burnlab.com/features)\n\n\
Would you like to [Book a Demo](https://burnlab.com/demo) to see it in action?",
                &[
                    "What integrations does Burnlab support?",
                    "How much does Burnlab cost?",
                    "Can I try Burnlab for free?",
                ],
                &["https://burnlab.com/features", "https://burnlab.com/docs"],
            ),
            message("sample-3", ChatRole::User, "What are the pricing plans?", &[], &[]),
            message(
                "sample-4",
                ChatRole::Assistant,
                "### Burnlab Pricing Plans\n\n\
Burnlab offers flexible pricing to suit teams of all sizes:\n\n\
1. **Starter** - $29/month\n   - Up to 10,000 sessions/month\n   - Basic analytics & heatmaps\n   - Email support\n\n\
2. **Professional** - $99/month\n   - Up to 100,000 sessions/month\n   - Advanced analytics, A/B testing\n   - Priority support\n\n\
3. **Enterprise** - Custom pricing\n   - Unlimited sessions\n   - Custom integrations & API access\n   - Dedicated account manager\n\n\
All plans include a **14-day free trial** with no credit card required.\n\n\
[Start your free trial](https://burnlab.com/signup) or [Contact Sales](https://burnlab.com/contact) for enterprise pricing.",
                &[
                    "Is there a free trial?",
                    "What payment methods do you accept?",
                    "Can I switch plans anytime?",
                ],
                &["https://burnlab.com/pricing"],
            ),
        ]
    })
}

/// Chips shown alongside the sample transcript.
pub fn sample_chips() -> &'static [String] {
    static CHIPS: OnceLock<Vec<String>> = OnceLock::new();
    CHIPS.get_or_init(|| {
        [
            "What integrations does Burnlab support?",
            "How much does Burnlab cost?",
            "Can I try Burnlab for free?",
        ]
        .iter()
        .map(|chip| chip.to_string())
        .collect()
    })
}
