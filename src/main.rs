use dotenvy::dotenv;
use samaride::{
    config::{self, AppConfig},
    core::{RideComposer, RideFilter, TopUpForm},
    entities::SenderRole,
    errors::Result,
    services::{
        InMemoryRideService, LocalPaymentService, SimulatedTransport,
        SimulatedVerificationService,
    },
    session::{ChatSession, RideSession, VerificationSession, WalletSession},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; SAMARIDE_CONFIG may come from there
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = config::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    run_demo(&app_config).await
}

/// Walks through one rider session: search, publish a ride, chat, verify and top up.
async fn run_demo(app_config: &AppConfig) -> Result<()> {
    let seed = &app_config.seed;
    let retry = app_config.retry;
    let rider = Arc::new(Mutex::new(seed.rider()?));

    // Rides
    let ride_service = Arc::new(InMemoryRideService::new(seed.build_catalog()?));
    let mut rides =
        RideSession::open(ride_service, RideComposer::new(app_config.pricing), retry).await?;
    for filter in RideFilter::ALL {
        let listed = rides.set_filter(filter).await?;
        let order: Vec<&str> = listed.iter().map(|ride| ride.id.as_str()).collect();
        info!(filter = filter.label(), ?order, "Rides listed");
    }
    rides.set_filter(RideFilter::All).await?;

    if let Some(driver) = seed.drivers.first() {
        let composer = rides.composer_mut();
        composer.draft_mut().origin = "Petaling Jaya".to_string();
        composer.draft_mut().destination = "Putrajaya".to_string();
        composer.draft_mut().date = chrono::Utc::now().format("%Y-%m-%d").to_string();
        composer.draft_mut().time = "08:15".to_string();
        composer.add_seat();
        composer.suggest_price();
        match rides.create_ride(driver).await {
            Ok(ride) => info!(ride_id = %ride.id, price = ride.price_per_seat, "Ride published"),
            Err(e) => warn!("Could not publish ride: {}", e),
        }
    }

    // Chat on the first listed ride
    let listed = rides.results();
    if let Some(ride) = listed.first() {
        let transport = Arc::new(SimulatedTransport::new(
            app_config.simulation.chat_reply_delay(),
            app_config.simulation.chat_reply.clone(),
        ));
        let mut chat = ChatSession::open(
            seed.build_conversation(&ride.id)?,
            SenderRole::Rider,
            transport,
            retry,
        )
        .await?;
        chat.send("Hi! I'll be waiting at the main entrance.").await?;
        tokio::time::sleep(app_config.simulation.chat_reply_delay() * 2).await;
        for message in chat.messages().await {
            info!(
                sender = %message.sender,
                time = %message.time_label(),
                "{}",
                message.body
            );
        }
    }

    // Identity verification
    let verifier = Arc::new(SimulatedVerificationService::new(
        app_config.simulation.verification_delay(),
        app_config.simulation.verification_outcome(),
    ));
    let mut verification =
        VerificationSession::new(verifier, retry).with_profile(Arc::clone(&rider));
    verification.capture("camera://selfie-1").await?;
    while verification.is_pending() {
        tokio::time::sleep(std::time::Duration::from_millis(250)).await;
    }
    match verification.continue_onboarding().await {
        Ok(()) => info!("Identity verified"),
        Err(e) => warn!("Verification did not pass: {}", e),
    }

    // Wallet
    let owner_id = rider.lock().await.id.clone();
    let payments = Arc::new(LocalPaymentService::new(
        seed.build_ledger(&owner_id, &app_config.currency)?,
    ));
    let mut wallet = WalletSession::connect(
        &owner_id,
        &app_config.currency,
        TopUpForm::new(app_config.quick_top_up_amounts.clone()),
        seed.payment_selection(),
        payments,
        retry,
    )
    .await?;
    info!(balance = %wallet.ledger().balance_label(), "Wallet loaded");
    if let Some(amount) = wallet.form().quick_amounts().get(2).copied() {
        wallet.quick_amount(amount);
        wallet.top_up().await?;
    }
    for transaction in wallet.account().recent_transactions(5) {
        info!(
            "{} {}",
            transaction.description,
            transaction.amount_label(&app_config.currency)
        );
    }
    info!(balance = %wallet.ledger().balance_label(), "Demo finished");
    Ok(())
}
