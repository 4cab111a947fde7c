//! Database seeder for Tenderbid development and testing.
//!
//! Seeds demo employees, two organizations and their responsible employees.
//! Running it twice is a no-op.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use sea_orm::DatabaseConnection;

use tenderbid_db::entities::sea_orm_active_enums::OrganizationType;
use tenderbid_db::{EmployeeRepository, NewEmployee, NewOrganization, OrganizationRepository};
use tenderbid_shared::AppConfig;

/// Demo employees: (username, first name, last name).
const EMPLOYEES: &[(&str, &str, &str)] = &[
    ("user1", "Ivan", "Petrov"),
    ("user2", "Anna", "Smirnova"),
    ("user3", "Oleg", "Kuznetsov"),
    ("user4", "Maria", "Volkova"),
    ("user5", "Pavel", "Sokolov"),
];

/// Demo organizations with the usernames responsible for them.
const ORGANIZATIONS: &[(&str, OrganizationType, &[&str])] = &[
    ("Northern Roads LLC", OrganizationType::Llc, &["user1", "user2"]),
    ("Harbor Supply JSC", OrganizationType::Jsc, &["user3"]),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;

    println!("Connecting to database...");
    let db = tenderbid_db::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    let employees = EmployeeRepository::new(db.clone());
    if employees.find_by_username(EMPLOYEES[0].0).await?.is_some() {
        println!("Demo data already present, skipping.");
        return Ok(());
    }

    println!("Seeding employees...");
    seed_employees(&employees).await?;

    println!("Seeding organizations...");
    seed_organizations(&db, &employees).await?;

    println!("Seeding complete!");
    Ok(())
}

async fn seed_employees(employees: &EmployeeRepository) -> anyhow::Result<()> {
    for (username, first_name, last_name) in EMPLOYEES {
        employees
            .create(NewEmployee {
                username: (*username).to_string(),
                first_name: Some((*first_name).to_string()),
                last_name: Some((*last_name).to_string()),
            })
            .await
            .with_context(|| format!("failed to create employee {username}"))?;
        println!("  {username}");
    }
    Ok(())
}

async fn seed_organizations(
    db: &DatabaseConnection,
    employees: &EmployeeRepository,
) -> anyhow::Result<()> {
    let organizations = OrganizationRepository::new(db.clone());

    for (name, kind, responsible) in ORGANIZATIONS {
        let org = organizations
            .create(NewOrganization {
                name: (*name).to_string(),
                description: Some(format!("Demo organization {name}")),
                kind: Some(*kind),
            })
            .await
            .with_context(|| format!("failed to create organization {name}"))?;

        for username in *responsible {
            let employee = employees
                .find_by_username(username)
                .await?
                .with_context(|| format!("employee {username} was not seeded"))?;
            organizations.add_responsible(org.id, employee.id).await?;
        }
        println!("  {name} ({} responsible)", responsible.len());
    }
    Ok(())
}
