/// Default page size for lead listing requests.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Request-tracker key for the lead listing category (fresh fetch and
/// fetch-more share it so a fresh fetch supersedes an in-flight fetch-more).
pub const LEADS_REQUEST_KEY: &str = "leads";

/// Request-tracker key for configuration requests.
pub const CONFIG_REQUEST_KEY: &str = "config";

/// Request-tracker key prefix for per-lead update requests.
pub const UPDATE_LEAD_KEY_PREFIX: &str = "update_lead_";

/// Request-tracker key prefix for single-lead retrievals.
pub const LEAD_KEY_PREFIX: &str = "lead_";

/// Request-tracker key prefix for per-slot viewing mutations.
pub const SLOT_KEY_PREFIX: &str = "slot_";

/// Request-tracker key prefix for per-lead decision submissions.
pub const DECISION_KEY_PREFIX: &str = "decision_";
