//! Database seeding.
//!
//! Generation runs in parallel with rayon; insertion uses multi-row
//! `INSERT ... VALUES` statements inside transactions. All seeded accounts
//! share [`SEED_PASSWORD`], hashed once at a low bcrypt cost.

mod marketplace;
mod models;
mod resources;
mod users;

use bcrypt::hash;
use sqlx::PgPool;
use std::time::Instant;

pub use marketplace::EngagementSummary;
pub use models::{
    EngagementLimits, SEED_EMAIL_DOMAIN, SEED_PASSWORD, SeedConfig, SeededUser, UserCounts,
};

/// Builds `($1, $2), ($3, $4), ...` for `rows` rows of `cols` parameters.
pub(crate) fn values_clause(rows: usize, cols: usize) -> String {
    (0..rows)
        .map(|row| {
            let params: Vec<String> = (1..=cols)
                .map(|col| format!("${}", row * cols + col))
                .collect();
            format!("({})", params.join(", "))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Seeds accounts, offers, options, missions with their courses, payments
/// and reports, then resources.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> anyhow::Result<()> {
    let start_time = Instant::now();

    println!("🌱 Starting database seeding...");
    println!(
        "   - Users: {} admins, {} enseignants, {} familles",
        config.users.admins, config.users.enseignants, config.users.familles
    );
    println!(
        "   - Offers: {}, resources: {}",
        config.offers, config.resources
    );

    // Cost 4 keeps seeding fast; every seeded account shares the same password
    let password_hash = hash(SEED_PASSWORD, 4)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    let users = users::seed_users(db, &config, &password_hash).await?;
    let addresses = users::seed_addresses(db, &users).await?;
    let offers = marketplace::seed_offers(db, config.offers, &users).await?;
    let options = marketplace::seed_options(db, &offers, &users).await?;
    let engagements =
        marketplace::seed_engagements(db, &users, &addresses, &config.engagements).await?;
    let (resources, shares) = resources::seed_resources(db, config.resources, &users).await?;

    println!(
        "\n✅ Seeding complete in {:?}: {} users, {} addresses, {} offers, {} options, {} missions, {} courses, {} payments, {} reports, {} resources ({} shares)",
        start_time.elapsed(),
        users.len(),
        addresses.len(),
        offers.len(),
        options,
        engagements.missions,
        engagements.courses,
        engagements.payments,
        engagements.reports,
        resources,
        shares
    );
    println!("   All seeded accounts use the password \"{}\"", SEED_PASSWORD);

    Ok(())
}

/// Hard-deletes every row owned by or linked to a seeded account.
pub async fn clear_all(db: &PgPool) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded data...");

    let pattern = format!("%@{}", SEED_EMAIL_DOMAIN);
    let mut tx = db.begin().await?;

    // Children first, so foreign keys hold at every step
    let statements = [
        "DELETE FROM user_resources WHERE user_id IN (SELECT id FROM seeded)
            OR resource_id IN (SELECT id FROM resources WHERE managed_by_id IN (SELECT id FROM seeded))",
        "DELETE FROM resources WHERE managed_by_id IN (SELECT id FROM seeded)",
        "DELETE FROM payments WHERE user_id IN (SELECT id FROM seeded)
            OR course_id IN (SELECT id FROM courses WHERE famille_id IN (SELECT id FROM seeded) OR enseignant_id IN (SELECT id FROM seeded))",
        "DELETE FROM reports WHERE enseignant_id IN (SELECT id FROM seeded)
            OR validated_by_id IN (SELECT id FROM seeded)
            OR mission_id IN (SELECT id FROM missions WHERE famille_id IN (SELECT id FROM seeded) OR enseignant_id IN (SELECT id FROM seeded))",
        "DELETE FROM courses WHERE famille_id IN (SELECT id FROM seeded) OR enseignant_id IN (SELECT id FROM seeded)
            OR address_id IN (SELECT id FROM addresses WHERE user_id IN (SELECT id FROM seeded))",
        "DELETE FROM missions WHERE famille_id IN (SELECT id FROM seeded) OR enseignant_id IN (SELECT id FROM seeded)",
        "DELETE FROM options WHERE famille_id IN (SELECT id FROM seeded) OR enseignant_id IN (SELECT id FROM seeded)
            OR offer_id IN (SELECT id FROM offers WHERE created_by_id IN (SELECT id FROM seeded))",
        "DELETE FROM enseignant_offers WHERE enseignant_id IN (SELECT id FROM seeded)
            OR offer_id IN (SELECT id FROM offers WHERE created_by_id IN (SELECT id FROM seeded))",
        "DELETE FROM offers WHERE created_by_id IN (SELECT id FROM seeded)",
        "DELETE FROM addresses WHERE user_id IN (SELECT id FROM seeded)",
        "DELETE FROM familles WHERE user_id IN (SELECT id FROM seeded)",
        "DELETE FROM enseignants WHERE user_id IN (SELECT id FROM seeded)",
        "DELETE FROM administrators WHERE user_id IN (SELECT id FROM seeded)",
        "DELETE FROM users WHERE id IN (SELECT id FROM seeded)",
    ];

    let mut deleted_users = 0;
    for statement in statements {
        let query = format!(
            "WITH seeded AS (SELECT id FROM users WHERE email LIKE $1) {}",
            statement
        );
        deleted_users = sqlx::query(&query)
            .bind(&pattern)
            .execute(&mut *tx)
            .await?
            .rows_affected();
    }

    tx.commit().await?;

    println!(
        "   ✓ Deleted {} seeded users and their data in {:?}",
        deleted_users,
        start_time.elapsed()
    );

    Ok(deleted_users)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_clause() {
        assert_eq!(values_clause(1, 2), "($1, $2)");
        assert_eq!(values_clause(2, 3), "($1, $2, $3), ($4, $5, $6)");
        assert_eq!(values_clause(0, 3), "");
    }
}
