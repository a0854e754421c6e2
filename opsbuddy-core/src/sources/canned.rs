use async_trait::async_trait;
use tracing::debug;

use crate::error::OpsBuddyResult;
use crate::models::Reply;
use crate::sources::traits::ResponseSource;

pub const GENERIC_RESPONSES: [&str; 10] = [
    "Hello! How can I assist you today?",
    "That's an interesting question. Let me think about that for a moment.",
    "I understand what you're asking. Here's what I know about that topic.",
    "Thanks for sharing that with me. Is there anything specific you'd like to know?",
    "I'm designed to be helpful, harmless, and honest in my responses.",
    "That's a great point. I hadn't considered that perspective before.",
    "Let me provide some more details that might be helpful.",
    "I appreciate your patience as I process that request.",
    "Is there anything else you'd like to discuss?",
    "That's all the information I have on this topic at the moment.",
];

struct AnalysisBucket {
    name: &'static str,
    keywords: &'static [&'static str],
    text: &'static str,
}

const BUCKETS: &[AnalysisBucket] = &[
    AnalysisBucket {
        name: "greeting",
        keywords: &["hello", "hi", "hey", "morning", "afternoon", "evening"],
        text: "Hello! How can I assist you today? You can ask about an incident ID (for example INC0010001), search incidents by keyword, or ask for a status summary.",
    },
    AnalysisBucket {
        name: "network",
        keywords: &[
            "network", "latency", "timeout", "timeouts", "dns", "vpn", "packet", "switch",
            "firewall", "connectivity",
        ],
        text: "This looks network related. Check recent changes to switches, firewalls and load balancers, compare latency on both sides of the path, and confirm DNS resolution from the affected hosts. If several services time out at once, look for a shared upstream dependency such as a core switch or VPN concentrator.",
    },
    AnalysisBucket {
        name: "database",
        keywords: &[
            "database", "db", "sql", "query", "queries", "deadlock", "replication", "replica",
            "postgres", "mysql",
        ],
        text: "This points at the database tier. Look at active sessions and blocking locks first, then replication lag and slow-query logs. A recent schema change or a batch job competing for the same tables is a common cause of deadlocks and stale reads.",
    },
    AnalysisBucket {
        name: "resource",
        keywords: &[
            "cpu", "memory", "disk", "oom", "heap", "storage", "leak", "load", "capacity",
        ],
        text: "This sounds like resource pressure. Compare CPU, memory and disk usage against the last healthy baseline, check for OOM kills or full volumes, and see whether usage grows steadily (a leak) or spikes with traffic (capacity).",
    },
    AnalysisBucket {
        name: "deployment",
        keywords: &[
            "deploy", "deploys", "deployed", "deployment", "release", "rollback", "rollout",
            "upgrade", "change",
        ],
        text: "Symptoms that start right after a change usually trace back to it. Correlate the incident start time with the deployment log, diff the configuration that shipped, and consider rolling back while the root cause is investigated.",
    },
    AnalysisBucket {
        name: "authentication",
        keywords: &[
            "login", "sso", "saml", "password", "certificate", "cert", "auth", "token", "tls",
            "expired",
        ],
        text: "This looks like an authentication or certificate problem. Check certificate expiry dates and recent rotations, confirm the identity provider metadata is current, and verify clock skew between the services exchanging tokens.",
    },
];

/// Offline responder: keyword buckets first, then the generic response table.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedResponder;

impl CannedResponder {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, text: &str) -> Reply {
        let words: Vec<String> = text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();

        for bucket in BUCKETS {
            if words.iter().any(|w| bucket.keywords.contains(&w.as_str())) {
                debug!(bucket = bucket.name, "Canned analysis bucket matched");
                return Reply::info(bucket.text);
            }
        }

        Reply::info(GENERIC_RESPONSES[generic_index(text)])
    }
}

// Stable pick so the same question always gets the same answer.
fn generic_index(text: &str) -> usize {
    let sum: usize = text.trim().bytes().map(usize::from).sum();
    sum % GENERIC_RESPONSES.len()
}

#[async_trait]
impl ResponseSource for CannedResponder {
    fn source_name(&self) -> &str {
        "canned"
    }

    fn is_remote(&self) -> bool {
        false
    }

    async fn respond(&self, text: &str) -> OpsBuddyResult<Reply> {
        Ok(self.analyze(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    #[test]
    fn test_bucket_matching() {
        let canned = CannedResponder::new();
        assert!(canned
            .analyze("Why are we seeing network timeouts?")
            .content
            .contains("network related"));
        assert!(canned
            .analyze("deadlock in the billing DB")
            .content
            .contains("database tier"));
        assert!(canned
            .analyze("pods keep getting OOM killed")
            .content
            .contains("resource pressure"));
        assert!(canned
            .analyze("hi there")
            .content
            .starts_with("Hello! How can I assist you today?"));
    }

    #[test]
    fn test_buckets_match_whole_words_only() {
        // "this" contains "hi" but must not hit the greeting bucket
        let reply = CannedResponder::new().analyze("explain this");
        assert!(GENERIC_RESPONSES.contains(&reply.content.as_str()));
    }

    #[test]
    fn test_generic_response_is_deterministic() {
        let canned = CannedResponder::new();
        let a = canned.analyze("what should I do next");
        let b = canned.analyze("what should I do next");
        assert_eq!(a, b);
        assert_eq!(a.severity, Severity::Info);
        assert!(GENERIC_RESPONSES.contains(&a.content.as_str()));
    }

    #[test]
    fn test_canned_is_local_source() {
        let canned = CannedResponder::new();
        assert!(!canned.is_remote());
        assert_eq!(canned.source_name(), "canned");
        let reply = tokio_test::block_on(canned.respond("hey")).unwrap();
        assert_eq!(reply, canned.analyze("hey"));
    }
}
