use crate::domain::Assistant;

/// The assistants every deployment starts with, in display order.
pub fn builtin_assistants() -> Vec<Assistant> {
    vec![
        Assistant::builtin(
            "bms-chatgpt",
            "OmniChat",
            "Ask questions, explore new ideas, create content, and experiment with new models.",
            "💬",
            "bg-pink-100 text-pink-600",
        ),
        Assistant::builtin(
            "it-support",
            "IT Support",
            "Get help with common IT problems like email, devices, passwords, and more.",
            "🔧",
            "bg-red-100 text-red-600",
        ),
        Assistant::builtin(
            "hr-support",
            "HR Support",
            "Find answers to your HR questions, from benefits to company policies and more.",
            "🧑‍🤝‍🧑",
            "bg-green-100 text-green-600",
        ),
        Assistant::builtin(
            "advance-policies-assistant",
            "Advance Policies Assistant",
            "Get answers and summaries for your policy-related questions.",
            "📋",
            "bg-purple-100 text-purple-600",
        ),
        Assistant::builtin(
            "redact-assistant",
            "Redact Assistant",
            "Efficiently identify and redact sensitive information from documents.",
            "✂️",
            "bg-yellow-100 text-yellow-600",
        ),
        Assistant::builtin(
            "adept-assistant",
            "ADEPT Assistant",
            "Simplify and accelerate your data entry and processing tasks.",
            "⚡",
            "bg-blue-100 text-blue-600",
        ),
        Assistant::builtin(
            "rfp-assistant",
            "RFP Assistant",
            "Streamline your Request for Proposal (RFP) response process.",
            "✍️",
            "bg-indigo-100 text-indigo-600",
        ),
        Assistant::builtin(
            "resume-assistant",
            "Resume Assistant",
            "Craft compelling resumes tailored to specific job opportunities.",
            "📄",
            "bg-teal-100 text-teal-600",
        ),
    ]
}
