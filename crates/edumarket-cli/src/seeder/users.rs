//! User seeding functionality.
//!
//! Generates accounts for every role, their role profiles and one address
//! per family or teacher.

use edumarket_models::UserRole;
use fake::Fake;
use fake::faker::address::en::{CityName, CountryName, PostCode, StreetName};
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::PhoneNumber;
use rand::Rng;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::models::{AddressSeed, SEED_EMAIL_DOMAIN, SeedConfig, SeededUser, UserSeed};
use super::values_clause;

const SPECIALIZATIONS: &[&str] = &[
    "Mathematics",
    "Physics",
    "Chemistry",
    "French",
    "English",
    "History",
    "Biology",
    "Computer Science",
];

const QUALIFICATIONS: &[&str] = &[
    "Bachelor's degree",
    "Master's degree",
    "Teaching certificate",
    "PhD",
];

/// Generates accounts for all three roles in parallel.
pub fn generate_users(config: &SeedConfig) -> Vec<UserSeed> {
    let groups = [
        (UserRole::Administrator, config.users.admins),
        (UserRole::Enseignant, config.users.enseignants),
        (UserRole::Famille, config.users.familles),
    ];

    groups
        .into_iter()
        .flat_map(|(role, count)| {
            (0..count)
                .into_par_iter()
                .map(move |idx| generate_user(role, idx))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn generate_user(role: UserRole, idx: usize) -> UserSeed {
    let mut rng = rand::thread_rng();
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();
    let slug = slugify(&first_name);

    let mut username = format!("{}.{}{}", slug, role.as_str(), idx);
    username.truncate(50);

    let email = format!(
        "{}.{}+{}{}@{}",
        slug,
        slugify(&last_name),
        role.as_str(),
        idx,
        SEED_EMAIL_DOMAIN
    );

    let (family_name, specialization, qualifications) = match role {
        UserRole::Famille => (last_name, String::new(), String::new()),
        UserRole::Enseignant => (
            String::new(),
            SPECIALIZATIONS[rng.gen_range(0..SPECIALIZATIONS.len())].to_string(),
            QUALIFICATIONS[rng.gen_range(0..QUALIFICATIONS.len())].to_string(),
        ),
        UserRole::Administrator => (String::new(), String::new(), String::new()),
    };

    UserSeed {
        username,
        email,
        phone_number: rng.gen_bool(0.8).then(|| PhoneNumber().fake()),
        role,
        family_name,
        specialization,
        qualifications,
    }
}

fn slugify(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// Seeds accounts with their profiles.
pub async fn seed_users(
    db: &PgPool,
    config: &SeedConfig,
    password_hash: &str,
) -> anyhow::Result<Vec<SeededUser>> {
    let start_time = Instant::now();
    println!(
        "👥 Seeding {} users ({} admins, {} enseignants, {} familles)...",
        config.total_users(),
        config.users.admins,
        config.users.enseignants,
        config.users.familles
    );

    let users = generate_users(config);

    let mut tx = db.begin().await?;

    // 5 params per user
    const BATCH_SIZE: usize = 1000;

    let mut seeded = Vec::with_capacity(users.len());
    for chunk in users.chunks(BATCH_SIZE) {
        let ids = insert_users_chunk(&mut tx, chunk, password_hash).await?;
        seeded.extend(ids.into_iter().zip(chunk).map(|(id, user)| SeededUser {
            id,
            role: user.role,
        }));
        insert_profiles_chunk(&mut tx, chunk, &seeded[seeded.len() - chunk.len()..]).await?;
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} users in {:?}",
        seeded.len(),
        start_time.elapsed()
    );

    Ok(seeded)
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
    password_hash: &str,
) -> anyhow::Result<Vec<i64>> {
    if users.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!(
        "INSERT INTO users (username, email, password, phone_number, role) VALUES {} RETURNING id",
        values_clause(users.len(), 5)
    );

    let mut q = sqlx::query_scalar(&query);
    for user in users {
        q = q
            .bind(&user.username)
            .bind(&user.email)
            .bind(password_hash)
            .bind(&user.phone_number)
            .bind(user.role);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

async fn insert_profiles_chunk(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
    seeded: &[SeededUser],
) -> anyhow::Result<()> {
    let rows: Vec<(&UserSeed, i64)> = users.iter().zip(seeded.iter().map(|s| s.id)).collect();

    let familles: Vec<_> = rows
        .iter()
        .filter(|(u, _)| u.role == UserRole::Famille)
        .collect();
    if !familles.is_empty() {
        let query = format!(
            "INSERT INTO familles (user_id, family_name) VALUES {}",
            values_clause(familles.len(), 2)
        );
        let mut q = sqlx::query(&query);
        for (user, id) in familles {
            q = q.bind(*id).bind(&user.family_name);
        }
        q.execute(&mut **tx).await?;
    }

    let enseignants: Vec<_> = rows
        .iter()
        .filter(|(u, _)| u.role == UserRole::Enseignant)
        .collect();
    if !enseignants.is_empty() {
        let query = format!(
            "INSERT INTO enseignants (user_id, specialization, qualifications) VALUES {}",
            values_clause(enseignants.len(), 3)
        );
        let mut q = sqlx::query(&query);
        for (user, id) in enseignants {
            q = q
                .bind(*id)
                .bind(&user.specialization)
                .bind(&user.qualifications);
        }
        q.execute(&mut **tx).await?;
    }

    let admins: Vec<i64> = rows
        .iter()
        .filter(|(u, _)| u.role == UserRole::Administrator)
        .map(|(_, id)| *id)
        .collect();
    if !admins.is_empty() {
        sqlx::query("INSERT INTO administrators (user_id) SELECT * FROM UNNEST($1::BIGINT[])")
            .bind(&admins)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}

/// Generates one address per family and teacher.
pub fn generate_addresses(users: &[SeededUser]) -> Vec<AddressSeed> {
    users
        .par_iter()
        .filter(|u| u.role != UserRole::Administrator)
        .map(|u| {
            let mut rng = rand::thread_rng();
            AddressSeed {
                street: format!("{} {}", rng.gen_range(1..200), StreetName().fake::<String>()),
                city: CityName().fake(),
                postal_code: PostCode().fake(),
                country: CountryName().fake(),
                latitude: rng.gen_range(-90.0..90.0),
                longitude: rng.gen_range(-180.0..180.0),
                user_id: u.id,
            }
        })
        .collect()
}

/// Seeds addresses and returns `(user_id, address_id)` pairs.
pub async fn seed_addresses(
    db: &PgPool,
    users: &[SeededUser],
) -> anyhow::Result<Vec<(i64, i64)>> {
    let start_time = Instant::now();
    let addresses = generate_addresses(users);
    println!("🏠 Seeding {} addresses...", addresses.len());

    let mut tx = db.begin().await?;
    let mut pairs = Vec::with_capacity(addresses.len());

    const BATCH_SIZE: usize = 1000;

    for chunk in addresses.chunks(BATCH_SIZE) {
        let query = format!(
            "INSERT INTO addresses (street, city, postal_code, country, latitude, longitude, user_id) VALUES {} RETURNING id",
            values_clause(chunk.len(), 7)
        );
        let mut q = sqlx::query_scalar::<_, i64>(&query);
        for a in chunk {
            q = q
                .bind(&a.street)
                .bind(&a.city)
                .bind(&a.postal_code)
                .bind(&a.country)
                .bind(a.latitude)
                .bind(a.longitude)
                .bind(a.user_id);
        }
        let ids = q.fetch_all(&mut *tx).await?;
        pairs.extend(chunk.iter().map(|a| a.user_id).zip(ids));
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} addresses in {:?}",
        pairs.len(),
        start_time.elapsed()
    );

    Ok(pairs)
}
