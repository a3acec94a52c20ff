use clap::Parser;
use journey_flow::{
    Consents, ExecutionResult, InMemorySessionStorage, InsuranceProposal, JourneyAction,
    JourneyRunner, JourneySettings, LinkChannel, LoanApplication, PremiumBasis, SessionStorage,
    build_journey_graph, pricing::format_inr,
};
use std::sync::Arc;
use tracing::info;

/// Walks one application through every screen and prints what each step did
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Applicant name submitted on the first screen
    #[arg(long, default_value = "Rahul Sharma")]
    name: String,

    /// Catalog ids to select on the product screen
    #[arg(long, value_delimiter = ',', default_value = "bajaj-swasthyacare-supreme,gpa")]
    products: Vec<String>,

    /// Decline the add-on products and finish right after the loan summary
    #[arg(long)]
    skip_products: bool,

    /// Price selections by sum insured instead of the flat catalog amount
    #[arg(long)]
    scaled: bool,

    /// Keep the simulated link and OTP delays
    #[arg(long)]
    realtime: bool,
}

fn print_step(label: &str, result: &ExecutionResult) {
    println!(
        "{label:<22} -> {}{}",
        result.step,
        result
            .response
            .as_deref()
            .map(|r| format!(" | {r}"))
            .unwrap_or_default()
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "journey_flow=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut settings = if args.realtime {
        JourneySettings::default()
    } else {
        JourneySettings::instant()
    };
    if args.scaled {
        settings.premium_basis = PremiumBasis::ScaledBySumInsured;
    }

    let storage: Arc<dyn SessionStorage> = Arc::new(InMemorySessionStorage::new());
    let runner = JourneyRunner::new(Arc::new(build_journey_graph(settings)), storage);
    let session = runner.start().await?;
    let id = session.id.clone();
    info!(session_id = %id, "Walkthrough started");

    let mut steps: Vec<(&str, JourneyAction)> = vec![(
        "submit application",
        JourneyAction::SubmitLoanApplication {
            application: LoanApplication {
                full_name: Some(args.name.clone()),
                ..Default::default()
            },
        },
    )];

    if args.skip_products {
        steps.push(("skip products", JourneyAction::SkipProducts));
    } else {
        steps.push(("add products", JourneyAction::AddProducts));
        for product_id in &args.products {
            steps.push((
                "select product",
                JourneyAction::SelectProduct {
                    product_id: product_id.clone(),
                },
            ));
        }
        steps.extend([
            ("continue to proposal", JourneyAction::Proceed),
            (
                "submit proposal",
                JourneyAction::SubmitProposal {
                    proposal: InsuranceProposal::default(),
                },
            ),
            (
                "send link",
                JourneyAction::SendLink {
                    channels: vec![LinkChannel::Sms, LinkChannel::Email],
                },
            ),
            ("open confirmation", JourneyAction::Proceed),
            (
                "customer confirms",
                JourneyAction::Confirm {
                    consents: Consents::all(),
                },
            ),
            (
                "verify otp",
                JourneyAction::VerifyOtp {
                    otp: "123456".to_string(),
                },
            ),
        ]);
    }
    steps.push(("summary", JourneyAction::Proceed));

    for (label, action) in steps {
        let (result, _) = runner.run(&id, action).await?;
        print_step(label, &result);
    }

    let session = runner.load(&id).await?;
    println!();
    println!("LOS id:        {}", session.state.los_id.as_deref().unwrap_or("-"));
    println!("Policy number: {}", session.state.policy_number.as_deref().unwrap_or("-"));
    for selected in &session.state.selected_insurance_products {
        println!(
            "  {:<32} {:>12}  premium ₹{} (GST ₹{})",
            selected.product.product_name,
            selected.selected_sum_insured,
            format_inr(selected.calculated_premium),
            format_inr(selected.gst)
        );
    }
    println!("Total premium: ₹{}", format_inr(session.state.total_premium()));

    Ok(())
}
