//! Database seeder for Coffer development and testing.
//!
//! Seeds three users, one organization with the built-in roles assigned, and
//! a funded wallet. Goes through the same services the server uses, so the
//! policy table is populated too. Running it twice is a no-op.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;

use coffer_core::CoreContext;
use coffer_core::accounts::Principal;
use coffer_core::workflow::WalletDraft;
use coffer_shared::auth::RegisterRequest;
use coffer_shared::config::WorkflowConfig;

/// Password shared by every seeded user.
const SEED_PASSWORD: &str = "coffer-dev-password";
const OWNER_EMAIL: &str = "owner@coffer.dev";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = coffer_db::connect(&database_url).await?;
    let core = CoreContext::initialize(coffer_db::stores(&db), WorkflowConfig::default()).await?;

    if core
        .accounts
        .authenticate(coffer_shared::auth::LoginRequest {
            email: OWNER_EMAIL.to_string(),
            password: SEED_PASSWORD.to_string(),
        })
        .await
        .is_ok()
    {
        println!("  Seed data already present, skipping...");
        return Ok(());
    }

    println!("Seeding users...");
    let owner = seed_user(&core, "owner", "Olive", "Owner").await?;
    let reviewer = seed_user(&core, "reviewer", "Rene", "Reviewer").await?;
    let member = seed_user(&core, "member", "Mara", "Member").await?;

    println!("Seeding organization...");
    let org = core
        .organizations
        .create_organization(owner.id, "Coffer Demo")
        .await?;
    core.organizations
        .grant_role(owner.id, org.id, reviewer.id, "reviewer")
        .await?;
    core.organizations
        .grant_role(owner.id, org.id, member.id, "member")
        .await?;

    println!("Seeding wallet...");
    let wallet = core
        .workflow
        .create_wallet(
            &owner,
            org.id,
            &WalletDraft {
                name: Some("Operating".to_string()),
                balance: Some("1000.00".to_string()),
            },
        )
        .await?;

    println!("Seeding complete!");
    println!("  organization: {}", org.id);
    println!("  wallet:       {}", wallet.id);
    println!("  login with {OWNER_EMAIL} / {SEED_PASSWORD}");
    Ok(())
}

async fn seed_user(
    core: &CoreContext,
    username: &str,
    first_name: &str,
    last_name: &str,
) -> anyhow::Result<Principal> {
    let principal = core
        .accounts
        .register(RegisterRequest {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: format!("{username}@coffer.dev"),
            password: SEED_PASSWORD.to_string(),
            username: Some(username.to_string()),
        })
        .await?;
    println!("  {username} ({})", principal.id);
    Ok(principal)
}
