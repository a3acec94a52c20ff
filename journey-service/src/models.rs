use journey_flow::{
    Consents, ExecutionResult, ExecutionStatus, InsuranceProduct, JourneySession, JourneyState,
    ProductType, Step,
    catalog::products_by_category,
    dashboard::{Lead, Policy},
    storage::CustomerLink,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepView {
    pub index: u8,
    pub name: String,
    pub description: String,
}

impl From<Step> for StepView {
    fn from(step: Step) -> Self {
        Self {
            index: step.index(),
            name: step.name().to_string(),
            description: step.description().to_string(),
        }
    }
}

/// Everything a client needs to render the current screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: String,
    pub step: StepView,
    pub allowed_transitions: Vec<StepView>,
    pub total_premium: f64,
    pub customer_link: CustomerLink,
    pub customer_link_url: Option<String>,
    pub consents: Consents,
    pub state: JourneyState,
}

impl SessionView {
    pub fn new(session: JourneySession, allowed: Vec<Step>) -> Self {
        let customer_link_url = session
            .state
            .los_id
            .is_some()
            .then(|| session.customer_link_url());
        Self {
            session_id: session.id,
            step: session.state.current_step.into(),
            allowed_transitions: allowed.into_iter().map(StepView::from).collect(),
            total_premium: session.state.total_premium(),
            customer_link: session.customer_link,
            customer_link_url,
            consents: session.consents,
            state: session.state,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub response: Option<String>,
    pub status: String,
    pub session: SessionView,
}

impl ActionResponse {
    pub fn new(result: ExecutionResult, session: SessionView) -> Self {
        let status = match result.status {
            ExecutionStatus::WaitingForInput => "waiting_for_input",
            ExecutionStatus::Completed => "completed",
        };
        Self {
            response: result.response,
            status: status.to_string(),
            session,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JumpRequest {
    pub step: u8,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryView {
    pub product_type: ProductType,
    pub label: String,
    pub products: Vec<InsuranceProduct>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub total: usize,
    pub categories: Vec<CategoryView>,
}

impl CatalogResponse {
    pub fn new(products: &[&InsuranceProduct]) -> Self {
        let categories = products_by_category(products)
            .into_iter()
            .map(|(kind, items)| CategoryView {
                product_type: kind,
                label: kind.label().to_string(),
                products: items.into_iter().cloned().collect(),
            })
            .collect();
        Self {
            total: products.len(),
            categories,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadsQuery {
    pub search: Option<String>,
    pub branch: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadsResponse {
    pub leads: Vec<Lead>,
    /// "Showing N of M" counters for the table footer
    pub showing: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyResponse {
    pub lead_id: String,
    pub customer_name: String,
    pub covering_loan: String,
    pub policy: Policy,
}
