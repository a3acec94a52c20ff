//! Read-only agent and admin dashboards over seeded lead and agent records.

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Active,
    Inactive,
}

impl RecordStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordStatus::Active => "active",
            RecordStatus::Inactive => "inactive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsurerStatus {
    Enforced,
    Pending,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub id: String,
    pub policy_number: String,
    pub start_date: String,
    pub proposal_number: String,
    pub proposer: String,
    pub insurer: String,
    pub product: String,
    pub premium: u64,
    pub base_premium: u64,
    pub gst: u64,
    pub sum_insured: u64,
    pub expiry_date: String,
    pub tenure: String,
    pub insurer_status: InsurerStatus,
    pub insurer_remarks: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub covering_loan: String,
    pub funding_loan: String,
    pub customer_name: String,
    pub branch: String,
    pub covering_loan_amount: u64,
    pub total_premium: u64,
    pub policies: Vec<Policy>,
    pub status: RecordStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub leads_handled: u32,
    pub policies_issued: u32,
    pub conversion_rate: u32,
    pub branch: String,
    pub status: RecordStatus,
}

/// Search + branch + status filter for the lead table. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadFilter {
    pub search: String,
    pub branch: Option<String>,
    pub status: Option<String>,
}

impl LeadFilter {
    /// Builds a filter from raw query values. `"all"` or an empty value
    /// disables a criterion; an unknown status matches nothing.
    pub fn from_query(search: Option<&str>, branch: Option<&str>, status: Option<&str>) -> Self {
        let wanted = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
                .map(str::to_string)
        };
        Self {
            search: search.unwrap_or_default().to_string(),
            branch: wanted(branch),
            status: wanted(status).map(|s| s.to_ascii_lowercase()),
        }
    }

    pub fn matches(&self, lead: &Lead) -> bool {
        let term = self.search.to_lowercase();
        let matches_search = term.is_empty()
            || lead.id.to_lowercase().contains(&term)
            || lead.customer_name.to_lowercase().contains(&term)
            || lead.covering_loan.to_lowercase().contains(&term);
        let matches_branch = self.branch.as_deref().is_none_or(|b| lead.branch == b);
        let matches_status = self
            .status
            .as_deref()
            .is_none_or(|s| lead.status.as_str() == s);

        matches_search && matches_branch && matches_status
    }
}

pub fn filter_leads<'a>(leads: &'a [Lead], filter: &LeadFilter) -> Vec<&'a Lead> {
    leads.iter().filter(|lead| filter.matches(lead)).collect()
}

/// Distinct branches in first-seen order
pub fn branches(leads: &[Lead]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for lead in leads {
        if !seen.contains(&lead.branch) {
            seen.push(lead.branch.clone());
        }
    }
    seen
}

/// Headline numbers for the admin dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentStats {
    pub total_agents: usize,
    pub active_leads: usize,
    pub policies_issued: usize,
    pub total_premium: u64,
}

impl AgentStats {
    pub fn compute(agents: &[Agent], leads: &[Lead]) -> Self {
        Self {
            total_agents: agents.len(),
            active_leads: leads.len(),
            policies_issued: leads.iter().map(|l| l.policies.len()).sum(),
            total_premium: leads.iter().map(|l| l.total_premium).sum(),
        }
    }
}

pub fn find_policy<'a>(leads: &'a [Lead], policy_id: &str) -> Option<(&'a Lead, &'a Policy)> {
    leads.iter().find_map(|lead| {
        lead.policies
            .iter()
            .find(|p| p.id == policy_id)
            .map(|policy| (lead, policy))
    })
}

#[allow(clippy::too_many_arguments)]
fn policy(
    id: &str,
    policy_number: &str,
    start_date: &str,
    proposal_number: &str,
    insurer: &str,
    product: &str,
    amounts: (u64, u64, u64, u64),
    expiry_date: &str,
) -> Policy {
    let (premium, base_premium, gst, sum_insured) = amounts;
    Policy {
        id: id.to_string(),
        policy_number: policy_number.to_string(),
        start_date: start_date.to_string(),
        proposal_number: proposal_number.to_string(),
        proposer: "Jaikirat Singh".to_string(),
        insurer: insurer.to_string(),
        product: product.to_string(),
        premium,
        base_premium,
        gst,
        sum_insured,
        expiry_date: expiry_date.to_string(),
        tenure: "1 Year".to_string(),
        insurer_status: InsurerStatus::Enforced,
        insurer_remarks: "Active".to_string(),
        email: "xxxxxx@xxxxx.com".to_string(),
    }
}

static LEADS: LazyLock<Vec<Lead>> = LazyLock::new(|| {
    vec![
        Lead {
            id: "RSXY12345".to_string(),
            covering_loan: "LAN1779498".to_string(),
            funding_loan: "IBD00000053258".to_string(),
            customer_name: "Shyam Pushkaran".to_string(),
            branch: "Koramangala".to_string(),
            covering_loan_amount: 4_000_000,
            total_premium: 34_800,
            status: RecordStatus::Active,
            policies: vec![
                policy(
                    "POL1",
                    "C195XXXXX",
                    "30 Aug 2022",
                    "759475983",
                    "Digit General Insurance",
                    "Bharat Griha Rai",
                    (38_499, 32_627, 5_872, 5_000_000),
                    "29 Aug 2023",
                ),
                policy(
                    "POL2",
                    "C195YYYYY",
                    "30 Aug 2022",
                    "759475984",
                    "ICICI Prudential",
                    "Super Protect Ci",
                    (28_500, 24_150, 4_350, 2_500_000),
                    "29 Aug 2023",
                ),
            ],
        },
        Lead {
            id: "RSXY12346".to_string(),
            covering_loan: "LAN1779499".to_string(),
            funding_loan: "IBD00000053821".to_string(),
            customer_name: "Nivedita Pushkaran".to_string(),
            branch: "Koramangala".to_string(),
            covering_loan_amount: 3_500_000,
            total_premium: 28_900,
            status: RecordStatus::Active,
            policies: vec![policy(
                "POL3",
                "C195ZZZZZ",
                "15 Sep 2022",
                "759475985",
                "Bajaj General Insurance",
                "Health Guard",
                (28_900, 24_525, 4_425, 3_000_000),
                "14 Sep 2023",
            )],
        },
    ]
});

fn agent(
    id: &str,
    name: &str,
    email: &str,
    phone: &str,
    (leads_handled, policies_issued, conversion_rate): (u32, u32, u32),
    branch: &str,
) -> Agent {
    Agent {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        leads_handled,
        policies_issued,
        conversion_rate,
        branch: branch.to_string(),
        status: RecordStatus::Active,
    }
}

static AGENTS: LazyLock<Vec<Agent>> = LazyLock::new(|| {
    vec![
        agent(
            "AG001",
            "Jaikirat Singh",
            "jaikirat@company.com",
            "+91 98765 43210",
            (156, 89, 57),
            "Koramangala",
        ),
        agent(
            "AG002",
            "Priya Sharma",
            "priya@company.com",
            "+91 97654 32109",
            (142, 78, 55),
            "Whitefield",
        ),
        agent(
            "AG003",
            "Amit Kumar",
            "amit@company.com",
            "+91 96543 21098",
            (128, 62, 48),
            "MG Road",
        ),
    ]
});

pub fn seeded_leads() -> &'static [Lead] {
    &LEADS
}

pub fn seeded_agents() -> &'static [Agent] {
    &AGENTS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(leads: &[&Lead]) -> Vec<String> {
        leads.iter().map(|l| l.id.clone()).collect()
    }

    #[test]
    fn surname_search_finds_both_pushkarans() {
        let filter = LeadFilter::from_query(Some("Pushkaran"), Some("all"), Some("all"));
        let hits = filter_leads(seeded_leads(), &filter);
        assert_eq!(ids(&hits), vec!["RSXY12345", "RSXY12346"]);
    }

    #[test]
    fn search_is_case_insensitive_over_id_name_and_loan() {
        let by_loan = LeadFilter::from_query(Some("lan1779499"), None, None);
        assert_eq!(ids(&filter_leads(seeded_leads(), &by_loan)), vec!["RSXY12346"]);

        let by_id = LeadFilter::from_query(Some("rsxy12345"), None, None);
        assert_eq!(ids(&filter_leads(seeded_leads(), &by_id)), vec!["RSXY12345"]);
    }

    #[test]
    fn branch_and_status_narrow_results() {
        let other_branch = LeadFilter::from_query(None, Some("Whitefield"), Some("all"));
        assert!(filter_leads(seeded_leads(), &other_branch).is_empty());

        let inactive = LeadFilter::from_query(None, Some("Koramangala"), Some("inactive"));
        assert!(filter_leads(seeded_leads(), &inactive).is_empty());

        let active = LeadFilter::from_query(Some(""), Some("Koramangala"), Some("active"));
        assert_eq!(filter_leads(seeded_leads(), &active).len(), 2);
    }

    #[test]
    fn branches_are_distinct() {
        assert_eq!(branches(seeded_leads()), vec!["Koramangala".to_string()]);
    }

    #[test]
    fn stats_sum_the_seed_data() {
        let stats = AgentStats::compute(seeded_agents(), seeded_leads());
        assert_eq!(
            stats,
            AgentStats {
                total_agents: 3,
                active_leads: 2,
                policies_issued: 3,
                total_premium: 63_700,
            }
        );
    }

    #[test]
    fn policies_are_found_with_their_lead() {
        let (lead, policy) = find_policy(seeded_leads(), "POL3").unwrap();
        assert_eq!(lead.customer_name, "Nivedita Pushkaran");
        assert_eq!(policy.product, "Health Guard");
        assert!(find_policy(seeded_leads(), "POL9").is_none());
    }
}
