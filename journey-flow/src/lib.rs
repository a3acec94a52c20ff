pub mod action;
pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod graph;
pub mod pricing;
pub mod proposal;
pub mod runner;
pub mod screen;
pub mod screens;
pub mod settings;
pub mod state;
pub mod step;
pub mod storage;
pub mod workflow;

// Re-export commonly used types
pub use action::{Consents, JourneyAction, LinkChannel};
pub use catalog::{InsuranceProduct, ProductType};
pub use error::{JourneyError, Result};
pub use graph::{ExecutionResult, ExecutionStatus, JourneyGraph, JourneyGraphBuilder};
pub use pricing::{PremiumBasis, SelectedProduct};
pub use runner::JourneyRunner;
pub use screen::{NextAction, Screen, ScreenResult};
pub use settings::JourneySettings;
pub use state::{InsuranceProposal, JourneyState, LoanApplication};
pub use step::Step;
pub use storage::{InMemorySessionStorage, JourneySession, SessionStorage};
pub use workflow::build_journey_graph;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn runner() -> JourneyRunner {
        let graph = Arc::new(build_journey_graph(JourneySettings::instant()));
        let storage: Arc<dyn SessionStorage> = Arc::new(InMemorySessionStorage::new());
        JourneyRunner::new(graph, storage)
    }

    async fn act(runner: &JourneyRunner, id: &str, action: JourneyAction) -> ExecutionResult {
        runner.run(id, action).await.unwrap().0
    }

    async fn submit_application(runner: &JourneyRunner, id: &str) {
        let result = act(
            runner,
            id,
            JourneyAction::SubmitLoanApplication {
                application: LoanApplication {
                    full_name: Some("Test".to_string()),
                    ..Default::default()
                },
            },
        )
        .await;
        assert_eq!(result.step, Step::LoanConfirmation);
    }

    #[tokio::test]
    async fn full_journey_with_products() {
        let runner = runner();
        let id = runner.start().await.unwrap().id;

        submit_application(&runner, &id).await;
        act(&runner, &id, JourneyAction::AddProducts).await;
        act(
            &runner,
            &id,
            JourneyAction::SelectProduct {
                product_id: "bajaj-swasthyacare-supreme".to_string(),
            },
        )
        .await;
        act(
            &runner,
            &id,
            JourneyAction::SelectProduct {
                product_id: "gpa".to_string(),
            },
        )
        .await;
        act(&runner, &id, JourneyAction::Proceed).await;
        act(
            &runner,
            &id,
            JourneyAction::SubmitProposal {
                proposal: InsuranceProposal::default(),
            },
        )
        .await;
        act(
            &runner,
            &id,
            JourneyAction::SendLink {
                channels: vec![LinkChannel::Sms, LinkChannel::Sms, LinkChannel::Email],
            },
        )
        .await;
        act(&runner, &id, JourneyAction::Proceed).await;
        act(
            &runner,
            &id,
            JourneyAction::Confirm {
                consents: Consents::all(),
            },
        )
        .await;
        let result = act(
            &runner,
            &id,
            JourneyAction::VerifyOtp {
                otp: "123456".to_string(),
            },
        )
        .await;

        assert_eq!(result.step, Step::Success);
        assert_eq!(result.status, ExecutionStatus::Completed);

        let session = runner.load(&id).await.unwrap();
        assert!(session.state.otp_verified);
        assert!(session.state.policy_number.is_some());
        assert_eq!(session.state.wants_insurance, Some(true));
        assert_eq!(session.state.selected_insurance_products.len(), 2);
        assert_eq!(
            session.customer_link.channels,
            vec![LinkChannel::Sms, LinkChannel::Email]
        );
        assert_eq!(session.state.loan_application.full_name.as_deref(), Some("Test"));
    }

    #[tokio::test]
    async fn jumping_from_success_to_step_one_starts_fresh() {
        let runner = runner();
        let id = runner.start().await.unwrap().id;
        submit_application(&runner, &id).await;
        for action in [
            JourneyAction::AddProducts,
            JourneyAction::Proceed,
            JourneyAction::SubmitProposal {
                proposal: InsuranceProposal::default(),
            },
            JourneyAction::SendLink {
                channels: vec![LinkChannel::Email],
            },
            JourneyAction::Proceed,
            JourneyAction::Confirm {
                consents: Consents::all(),
            },
            JourneyAction::VerifyOtp {
                otp: "123456".to_string(),
            },
        ] {
            act(&runner, &id, action).await;
        }
        assert_eq!(runner.load(&id).await.unwrap().state.current_step, Step::Success);

        let session = runner.jump(&id, 1).await.unwrap();
        assert_eq!(session.state, JourneyState::default());
        assert!(!session.customer_link.sent);
        assert!(!session.consents.all_given());

        submit_application(&runner, &id).await;
        act(&runner, &id, JourneyAction::AddProducts).await;
        act(&runner, &id, JourneyAction::Proceed).await;
        act(
            &runner,
            &id,
            JourneyAction::SubmitProposal {
                proposal: InsuranceProposal::default(),
            },
        )
        .await;
        for step in [6, 7, 8] {
            assert!(matches!(
                runner.jump(&id, step).await.unwrap_err(),
                JourneyError::IllegalTransition { .. }
            ));
        }
        let session = runner.load(&id).await.unwrap();
        assert_eq!(session.state.current_step, Step::SendCustomerLink);
        assert!(session.state.policy_number.is_none());
    }

    #[tokio::test]
    async fn start_new_from_success_resets() {
        let runner = runner();
        let id = runner.start().await.unwrap().id;
        submit_application(&runner, &id).await;
        act(&runner, &id, JourneyAction::SkipProducts).await;

        let result = act(&runner, &id, JourneyAction::StartNew).await;
        assert_eq!(result.step, Step::LoanApplication);
        let session = runner.load(&id).await.unwrap();
        assert!(session.state.los_id.is_none());
        assert_eq!(session.state.wants_insurance, None);
    }

    #[tokio::test]
    async fn skipping_products_goes_straight_to_success() {
        let runner = runner();
        let id = runner.start().await.unwrap().id;

        submit_application(&runner, &id).await;
        let result = act(&runner, &id, JourneyAction::SkipProducts).await;

        assert_eq!(result.step, Step::Success);
        let session = runner.load(&id).await.unwrap();
        assert_eq!(session.state.wants_insurance, Some(false));
        assert!(session.state.selected_insurance_products.is_empty());
        assert!(session.state.policy_number.is_none());
    }

    #[tokio::test]
    async fn proceeding_without_sending_the_link_is_rejected() {
        let runner = runner();
        let id = runner.start().await.unwrap().id;
        submit_application(&runner, &id).await;
        act(&runner, &id, JourneyAction::AddProducts).await;
        act(&runner, &id, JourneyAction::Proceed).await;
        act(
            &runner,
            &id,
            JourneyAction::SubmitProposal {
                proposal: InsuranceProposal::default(),
            },
        )
        .await;

        let empty = act(&runner, &id, JourneyAction::SendLink { channels: vec![] }).await;
        assert_eq!(empty.step, Step::SendCustomerLink);

        let err = runner.run(&id, JourneyAction::Proceed).await.unwrap_err();
        assert!(matches!(
            err,
            JourneyError::IllegalTransition {
                from: Step::SendCustomerLink,
                to: Step::CustomerConfirmation
            }
        ));
        let session = runner.load(&id).await.unwrap();
        assert_eq!(session.state.current_step, Step::SendCustomerLink);
        assert!(!session.customer_link.sent);
    }

    #[tokio::test]
    async fn consents_and_otp_format_gate_the_end() {
        let runner = runner();
        let id = runner.start().await.unwrap().id;
        submit_application(&runner, &id).await;
        act(&runner, &id, JourneyAction::AddProducts).await;
        act(&runner, &id, JourneyAction::Proceed).await;
        act(
            &runner,
            &id,
            JourneyAction::SubmitProposal {
                proposal: InsuranceProposal::default(),
            },
        )
        .await;
        act(
            &runner,
            &id,
            JourneyAction::SendLink {
                channels: vec![LinkChannel::Whatsapp],
            },
        )
        .await;
        act(&runner, &id, JourneyAction::Proceed).await;

        let partial = Consents {
            agreed_to_terms: true,
            ..Consents::default()
        };
        let result = act(&runner, &id, JourneyAction::Confirm { consents: partial }).await;
        assert_eq!(result.step, Step::CustomerConfirmation);

        act(
            &runner,
            &id,
            JourneyAction::Confirm {
                consents: Consents::all(),
            },
        )
        .await;

        for bad in ["12345", "1234567", "12a456", ""] {
            let result = act(
                &runner,
                &id,
                JourneyAction::VerifyOtp {
                    otp: bad.to_string(),
                },
            )
            .await;
            assert_eq!(result.step, Step::OtpVerification, "accepted {bad:?}");
        }
        assert!(!runner.load(&id).await.unwrap().state.otp_verified);
    }

    #[tokio::test]
    async fn illegal_jumps_are_rejected() {
        let runner = runner();
        let id = runner.start().await.unwrap().id;

        assert!(matches!(
            runner.jump(&id, 7).await.unwrap_err(),
            JourneyError::IllegalTransition { .. }
        ));
        assert!(matches!(
            runner.jump(&id, 9).await.unwrap_err(),
            JourneyError::InvalidStep(9)
        ));
        assert!(matches!(
            runner.run(&id, JourneyAction::SkipProducts).await.unwrap_err(),
            JourneyError::UnsupportedAction { .. }
        ));

        let session = runner.jump(&id, 2).await.unwrap();
        assert_eq!(session.state.current_step, Step::LoanConfirmation);
    }

    #[tokio::test]
    async fn reset_works_from_any_step() {
        let runner = runner();
        let id = runner.start().await.unwrap().id;
        submit_application(&runner, &id).await;
        act(&runner, &id, JourneyAction::AddProducts).await;
        act(
            &runner,
            &id,
            JourneyAction::SelectProduct {
                product_id: "hdc-emi".to_string(),
            },
        )
        .await;

        let session = runner.reset(&id).await.unwrap();
        assert_eq!(session.id, id);
        assert_eq!(session.state, JourneyState::default());
        assert_eq!(session.consents, Consents::default());
        assert!(!session.customer_link.sent);
    }

    #[tokio::test]
    async fn unknown_session_is_reported() {
        let runner = runner();
        assert!(matches!(
            runner.run("nope", JourneyAction::Proceed).await.unwrap_err(),
            JourneyError::SessionNotFound(_)
        ));
    }
}
