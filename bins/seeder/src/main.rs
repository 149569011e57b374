//! Database seeder for Tresor development and testing.
//!
//! Seeds a demo agent and two demo customers with validated current
//! accounts and an opening deposit each.
//!
//! Usage: cargo run --bin seeder

use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use std::str::FromStr;

use tresor_db::entities::sea_orm_active_enums::{AccountKind, UserRole};
use tresor_db::entities::users;
use tresor_db::repositories::{AccountRepository, OperationRepository, UserRepository};

const DEMO_PASSWORD: &str = "demo-password";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = tresor_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding demo agent...");
    seed_user(&db, "agent@tresor.dev", "Demo Agent", UserRole::Agent, None).await;

    println!("Seeding demo customers...");
    seed_user(
        &db,
        "alice@tresor.dev",
        "Alice Martin",
        UserRole::Customer,
        Some("1000.00"),
    )
    .await;
    seed_user(
        &db,
        "bob@tresor.dev",
        "Bob Dupont",
        UserRole::Customer,
        Some("250.00"),
    )
    .await;

    println!("Seeding complete!");
}

/// Seeds one user; customers also get a current account and, when an
/// opening balance is given, an applied deposit.
async fn seed_user(
    db: &DatabaseConnection,
    email: &str,
    full_name: &str,
    role: UserRole,
    opening_balance: Option<&str>,
) {
    let user_repo = UserRepository::new(db.clone());

    if let Ok(Some(_)) = user_repo.find_by_email(email).await {
        println!("  {email} already exists, skipping...");
        return;
    }

    let user: users::Model = match user_repo
        .create(email, DEMO_PASSWORD, full_name, role)
        .await
    {
        Ok(u) => u,
        Err(e) => {
            eprintln!("Failed to insert {email}: {e}");
            return;
        }
    };
    println!("  Created user: {email}");

    if user.role == UserRole::Agent {
        return;
    }

    let account_repo = AccountRepository::new(db.clone());
    let account = match account_repo.open_account(&user, AccountKind::Current).await {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Failed to open account for {email}: {e}");
            return;
        }
    };
    println!("  Opened account {} for {email}", account.reference);

    let Some(balance) = opening_balance else {
        return;
    };
    let amount = Decimal::from_str(balance).expect("opening balance must be a valid decimal");

    let operation_repo = OperationRepository::new(db.clone());
    match operation_repo.create_deposit(account.id, user.id, amount).await {
        Ok(_) => println!("  Deposited {balance} into {}", account.reference),
        Err(e) => eprintln!("Failed to deposit into {}: {e}", account.reference),
    }
}
