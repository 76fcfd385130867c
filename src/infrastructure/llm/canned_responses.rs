/// Keyword-triggered reply sets for one assistant. The first rule whose
/// keywords appear in the message wins; `general` covers everything else.
struct ReplyBook {
    assistant: &'static str,
    rules: &'static [(&'static [&'static str], &'static [&'static str])],
    general: &'static [&'static str],
}

const IT_PASSWORD: &[&str] = &[
    "I can help with password problems. First, try the self-service reset portal with your employee ID and registered email. If the portal rejects you, your account may be locked after too many attempts; IT can unlock it at ext. 4357.\n\nReminder: passwords need at least 12 characters mixing upper and lower case, digits and symbols, and they expire every 90 days.",
    "Login trouble is usually quick to fix:\n\n1. Check that Caps Lock is off\n2. Confirm the username format (firstname.lastname)\n3. Clear cached credentials by restarting your machine\n4. Try a private browser window\n\nIf you still see an error, send the exact message text to help@company.com and we'll take it from there.",
];

const IT_PRINTER: &[&str] = &[
    "Let's get the printer working.\n\n**Basics:** confirm power, cables and paper, and look for an error on the printer display.\n\n**On your PC:** restart the Print Spooler service (Win+R, `services.msc`), clear stuck jobs from the queue, then reinstall the driver from the vendor site.\n\n**Network printers:** check whether colleagues can print and whether the printer's IP address changed.\n\nTell me the printer model and any error text if this doesn't help.",
    "A quick way to reset a misbehaving printer on Windows:\n\n1. Settings > Devices > Printers & scanners\n2. Remove the printer\n3. Restart your computer\n4. Add the printer again and set it as default\n\nIs it not printing at all, printing blank pages, or showing an error?",
];

const IT_GENERAL: &[&str] = &[
    "Hi! I handle IT support: passwords and lockouts, printers and hardware, software installs, network and VPN issues, email sync and security software.\n\nTo speed things up, tell me what's happening, the exact error text, when it started, and what you've already tried.",
    "Welcome to IT Support. Describe the problem along with your operating system, any error messages and recent changes to your machine, and I'll walk you through a fix.\n\nFor outages blocking business operations, call the emergency line at ext. 911.",
];

const HR_TIME_OFF: &[&str] = &[
    "Here's how PTO works:\n\n- Submit requests in the HR portal at least 2 weeks ahead (4 weeks for extended leave)\n- Your manager approves every request\n- Accrual: 15 days/year for 0-2 years of service, 20 days for 3-5, 25 days for 6+\n- Up to 40 hours roll over; anything above is forfeited on December 31st\n\nSick leave is tracked separately. Your balance is on the employee dashboard.",
    "We offer several kinds of leave: PTO for vacation and personal days, sick leave, unpaid personal leave, FMLA after one year, and up to 5 days of bereavement leave.\n\nRegular PTO needs 2 weeks' notice; 5 or more consecutive days need 30 days' notice. Would you like help checking your balance?",
];

const HR_BENEFITS: &[&str] = &[
    "Our benefits at a glance:\n\n**Medical:** PPO, HMO, or a high-deductible plan paired with an HSA\n**Other coverage:** dental, vision, life and disability insurance\n**Retirement:** 401(k) with a company match\n**Extras:** FSAs, the Employee Assistance Program, tuition reimbursement and wellness discounts\n\nOpen enrollment runs November 1-15; qualifying life events allow changes outside that window.",
    "The company pays 80% of medical premiums, the full basic dental plan, and 75% of vision. Basic life insurance at 1x salary is free.\n\nNew employees have 30 days to enroll. Book a benefits consultation at benefits@company.com or ext. 2469. Which benefit should we look at in detail?",
];

const HR_GENERAL: &[&str] = &[
    "Welcome to HR Support! I can help with benefits and compensation, time off and leave, company policies, career development, workplace concerns, and payroll or personal-record updates.\n\nSensitive matters can always be handled in a private meeting. What can I help with?",
    "Hi! I'm your HR assistant. Common requests include insurance enrollment, PTO balances, policy questions, training opportunities and accommodation requests.\n\nYou can also reach HR at hr@company.com or ext. 2468.",
];

const CODING_INCIDENT: &[&str] = &[
    "Here's a starting point for a business rule that sets incident priority from impact and urgency:\n\n```javascript\nfunction setIncidentPriority(incident) {\n  const matrix = {\n    high:   { high: 1, medium: 2, low: 3 },\n    medium: { high: 2, medium: 3, low: 4 },\n    low:    { high: 3, medium: 4, low: 5 },\n  };\n  incident.priority = matrix[incident.impact][incident.urgency];\n}\n```\n\nRun it before insert and before update so the priority tracks changes to either field.",
    "An impact/urgency matrix keeps incident priorities consistent. Decide which conditions make something critical (outage, security breach, VIP caller), map the rest through the matrix, and log every automatic change so analysts can audit it.\n\nWant me to adapt this to your platform's rule syntax?",
];

const CODING_GENERAL_CODE: &[&str] = &[
    "Happy to help with code! I work across JavaScript/TypeScript, Python, Java, C#, Go and SQL, and can write new functions, review existing ones, track down bugs or suggest tests.\n\nPaste the code or describe what it should do.",
    "Let's build it. Tell me the language, the inputs and outputs you expect, and any constraints such as performance or libraries you must use, and I'll draft an implementation with tests.",
];

const CODING_GENERAL: &[&str] = &[
    "Hello! I'm your Coding Assistant. I can write and review code, explain algorithms, design APIs and databases, and help debug failing builds.\n\nWhat are you working on?",
    "Welcome! Share a snippet, an error message, or a feature idea and I'll help you move it forward, from frontend frameworks to backend services and data work.",
];

const BOOKS: &[ReplyBook] = &[
    ReplyBook {
        assistant: "IT Support",
        rules: &[
            (&["password", "login"], IT_PASSWORD),
            (&["printer", "print"], IT_PRINTER),
        ],
        general: IT_GENERAL,
    },
    ReplyBook {
        assistant: "HR Support",
        rules: &[
            (&["pto", "vacation", "time off"], HR_TIME_OFF),
            (&["benefits", "insurance"], HR_BENEFITS),
        ],
        general: HR_GENERAL,
    },
    ReplyBook {
        assistant: "Coding Assistant",
        rules: &[
            (&["business rule", "incident", "urgent"], CODING_INCIDENT),
            (&["code", "function", "programming"], CODING_GENERAL_CODE),
        ],
        general: CODING_GENERAL,
    },
];

/// Candidate replies for a message sent to the named assistant.
pub fn candidate_replies(assistant_name: &str, message: &str) -> Vec<String> {
    let message = message.to_lowercase();

    match BOOKS.iter().find(|book| book.assistant == assistant_name) {
        Some(book) => {
            let replies = book
                .rules
                .iter()
                .find(|(keywords, _)| keywords.iter().any(|k| message.contains(k)))
                .map(|(_, replies)| *replies)
                .unwrap_or(book.general);
            replies.iter().map(|r| r.to_string()).collect()
        }
        None => generic_replies(assistant_name),
    }
}

fn generic_replies(assistant_name: &str) -> Vec<String> {
    vec![
        format!(
            "Hello! I'm {}. I can analyze problems, explain options and help you plan next steps. Give me as much context as you can and I'll tailor the answer to it.",
            assistant_name
        ),
        format!(
            "Welcome! As {}, I'm here to work through your question with you. What would you like to start with?",
            assistant_name
        ),
    ]
}
