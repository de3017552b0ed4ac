//! Offer, option and engagement seeding.
//!
//! Missions link a family to a teacher. Courses copy both parties from their
//! mission, and a share of them carries a completed payment.

use chrono::{DateTime, Duration, Utc};
use edumarket_models::UserRole;
use edumarket_models::courses::CourseStatus;
use edumarket_models::missions::MissionStatus;
use edumarket_models::offers::OfferStatus;
use edumarket_models::options::{EXPIRING_WINDOW_HOURS, OptionStatus};
use edumarket_models::payments::{PaymentStatus, PaymentType};
use edumarket_models::reports::ReportStatus;
use fake::Fake;
use fake::faker::lorem::en::{Paragraph, Sentence};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use sqlx::PgPool;
use std::collections::HashMap;
use std::time::Instant;

use super::models::{
    CourseSeed, EngagementLimits, MissionSeed, OfferSeed, OptionSeed, SeededMission, SeededUser,
};
use super::values_clause;

const SUBJECTS: &[&str] = &[
    "Mathematics",
    "Physics",
    "French",
    "English",
    "History",
    "Biology",
];

/// Option rows per statement, 7 binds each.
const OPTION_BATCH: usize = 1000;

const LEVELS: &[&str] = &["Primary", "Middle school", "High school", "University"];

fn ids_with_role(users: &[SeededUser], role: UserRole) -> Vec<i64> {
    users
        .iter()
        .filter(|u| u.role == role)
        .map(|u| u.id)
        .collect()
}

pub fn generate_offers(count: usize, admin_ids: &[i64]) -> Vec<OfferSeed> {
    if admin_ids.is_empty() {
        return Vec::new();
    }

    (0..count)
        .into_par_iter()
        .map(|_| {
            let mut rng = rand::thread_rng();
            let status = match rng.gen_range(0..10) {
                0..=1 => OfferStatus::Draft,
                2..=6 => OfferStatus::Open,
                7..=8 => OfferStatus::Closed,
                _ => OfferStatus::Filled,
            };
            let subject = SUBJECTS[rng.gen_range(0..SUBJECTS.len())];
            let level = LEVELS[rng.gen_range(0..LEVELS.len())];

            OfferSeed {
                title: format!("{} tutor wanted ({})", subject, level),
                description: Paragraph(1..3).fake(),
                hourly_rate: rng.gen_range(15..60) as f64,
                publication_date: (status != OfferStatus::Draft)
                    .then(|| Utc::now() - Duration::days(rng.gen_range(1..60))),
                status,
                requirements: Sentence(4..10).fake(),
                subject: subject.to_string(),
                level: level.to_string(),
                created_by_id: admin_ids[rng.gen_range(0..admin_ids.len())],
            }
        })
        .collect()
}

/// Seeds offers and returns `(offer_id, status)` pairs.
pub async fn seed_offers(
    db: &PgPool,
    count: usize,
    users: &[SeededUser],
) -> anyhow::Result<Vec<(i64, OfferStatus)>> {
    let start_time = Instant::now();
    let offers = generate_offers(count, &ids_with_role(users, UserRole::Administrator));
    println!("📢 Seeding {} offers...", offers.len());

    if offers.is_empty() {
        return Ok(Vec::new());
    }

    // 9 params per offer
    const BATCH_SIZE: usize = 1000;

    let mut ids = Vec::with_capacity(offers.len());
    for chunk in offers.chunks(BATCH_SIZE) {
        let query = format!(
            "INSERT INTO offers (title, description, hourly_rate, publication_date, status, requirements, subject, level, created_by_id) VALUES {} RETURNING id",
            values_clause(chunk.len(), 9)
        );
        let mut q = sqlx::query_scalar::<_, i64>(&query);
        for o in chunk {
            q = q
                .bind(&o.title)
                .bind(&o.description)
                .bind(o.hourly_rate)
                .bind(o.publication_date)
                .bind(o.status)
                .bind(&o.requirements)
                .bind(&o.subject)
                .bind(&o.level)
                .bind(o.created_by_id);
        }
        ids.extend(q.fetch_all(db).await?);
    }

    println!(
        "   ✓ Inserted {} offers in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids.into_iter().zip(offers.iter().map(|o| o.status)).collect())
}

/// Up to three options on each open offer, with random parties.
pub fn generate_options(
    offers: &[(i64, OfferStatus)],
    enseignants: &[i64],
    familles: &[i64],
    now: DateTime<Utc>,
) -> Vec<OptionSeed> {
    let mut rng = StdRng::from_entropy();
    let mut rows = Vec::new();
    for &(offer_id, _) in offers.iter().filter(|(_, s)| *s == OfferStatus::Open) {
        for _ in 0..rng.gen_range(0..=3) {
            let (Some(&enseignant_id), Some(&famille_id)) =
                (enseignants.choose(&mut rng), familles.choose(&mut rng))
            else {
                continue;
            };
            let status = if rng.gen_bool(0.8) {
                OptionStatus::Active
            } else {
                OptionStatus::Accepted
            };
            rows.push(OptionSeed {
                offer_id,
                enseignant_id,
                famille_id,
                status,
                expiration_date: now
                    + Duration::hours(rng.gen_range(1..(EXPIRING_WINDOW_HOURS * 3))),
            });
        }
    }
    rows
}

/// Seeds options on open offers. The teacher holding an option is also
/// recorded as an applicant.
pub async fn seed_options(
    db: &PgPool,
    offers: &[(i64, OfferStatus)],
    users: &[SeededUser],
) -> anyhow::Result<usize> {
    let start_time = Instant::now();
    let now = Utc::now();
    let rows = generate_options(
        offers,
        &ids_with_role(users, UserRole::Enseignant),
        &ids_with_role(users, UserRole::Famille),
        now,
    );

    println!("⏳ Seeding {} options...", rows.len());
    if rows.is_empty() {
        return Ok(0);
    }

    let mut tx = db.begin().await?;

    for chunk in rows.chunks(OPTION_BATCH) {
        let query = format!(
            "INSERT INTO options (creation_date, expiration_date, status, description, enseignant_id, famille_id, offer_id) VALUES {}",
            values_clause(chunk.len(), 7)
        );
        let mut q = sqlx::query(&query);
        for row in chunk {
            q = q
                .bind(now)
                .bind(row.expiration_date)
                .bind(row.status)
                .bind("Seeded reservation")
                .bind(row.enseignant_id)
                .bind(row.famille_id)
                .bind(row.offer_id);
        }
        q.execute(&mut *tx).await?;

        let query = format!(
            "INSERT INTO enseignant_offers (enseignant_id, offer_id) VALUES {} ON CONFLICT DO NOTHING",
            values_clause(chunk.len(), 2)
        );
        let mut q = sqlx::query(&query);
        for row in chunk {
            q = q.bind(row.enseignant_id).bind(row.offer_id);
        }
        q.execute(&mut *tx).await?;
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} options in {:?}",
        rows.len(),
        start_time.elapsed()
    );

    Ok(rows.len())
}

pub fn generate_missions(
    familles: &[i64],
    enseignants: &[i64],
    limits: &EngagementLimits,
) -> Vec<MissionSeed> {
    if enseignants.is_empty() {
        return Vec::new();
    }

    familles
        .par_iter()
        .flat_map_iter(|&famille_id| {
            let mut rng = rand::thread_rng();
            let count = rng.gen_range(0..=limits.max_missions_per_famille);
            (0..count)
                .map(|_| {
                    let mut rng = rand::thread_rng();
                    let start_date = Utc::now() - Duration::days(rng.gen_range(7..180));
                    let status = match rng.gen_range(0..10) {
                        0..=5 => MissionStatus::Active,
                        6..=7 => MissionStatus::Completed,
                        8 => MissionStatus::Paused,
                        _ => MissionStatus::Stopped,
                    };
                    let end_date = matches!(
                        status,
                        MissionStatus::Completed | MissionStatus::Stopped
                    )
                    .then(|| start_date + Duration::days(rng.gen_range(7..90)));

                    MissionSeed {
                        start_date,
                        end_date,
                        status,
                        description: Sentence(5..12).fake(),
                        famille_id,
                        enseignant_id: enseignants[rng.gen_range(0..enseignants.len())],
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub fn generate_courses(
    missions: &[SeededMission],
    addresses: &HashMap<i64, i64>,
    limits: &EngagementLimits,
) -> Vec<CourseSeed> {
    missions
        .par_iter()
        .flat_map_iter(|mission| {
            let mut rng = rand::thread_rng();
            let count = rng.gen_range(1..=limits.max_courses_per_mission.max(1));
            (0..count)
                .map(|week| {
                    let scheduled_time = mission.start_date + Duration::weeks(week as i64);
                    let status = if scheduled_time < Utc::now() {
                        CourseStatus::Completed
                    } else {
                        CourseStatus::Scheduled
                    };
                    let address_id = addresses.get(&mission.famille_id).copied();

                    CourseSeed {
                        scheduled_time,
                        duration: [60, 90, 120][week % 3],
                        location: if address_id.is_some() {
                            "Family home".to_string()
                        } else {
                            "Online".to_string()
                        },
                        status,
                        famille_id: mission.famille_id,
                        enseignant_id: mission.enseignant_id,
                        mission_id: mission.id,
                        address_id,
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

#[derive(Debug, Default)]
pub struct EngagementSummary {
    pub missions: usize,
    pub courses: usize,
    pub payments: usize,
    pub reports: usize,
}

/// Seeds missions, their courses, payments for a share of the courses and
/// reports by the mission's teacher.
pub async fn seed_engagements(
    db: &PgPool,
    users: &[SeededUser],
    addresses: &[(i64, i64)],
    limits: &EngagementLimits,
) -> anyhow::Result<EngagementSummary> {
    let start_time = Instant::now();
    let familles = ids_with_role(users, UserRole::Famille);
    let enseignants = ids_with_role(users, UserRole::Enseignant);
    let addresses: HashMap<i64, i64> = addresses.iter().copied().collect();

    let missions = generate_missions(&familles, &enseignants, limits);
    println!("🤝 Seeding {} missions with courses...", missions.len());

    let mut summary = EngagementSummary::default();
    if missions.is_empty() {
        return Ok(summary);
    }

    let mut tx = db.begin().await?;

    let mut seeded = Vec::with_capacity(missions.len());
    const MISSION_BATCH: usize = 1000;
    for chunk in missions.chunks(MISSION_BATCH) {
        let query = format!(
            "INSERT INTO missions (start_date, end_date, status, description, famille_id, enseignant_id) VALUES {} RETURNING id",
            values_clause(chunk.len(), 6)
        );
        let mut q = sqlx::query_scalar::<_, i64>(&query);
        for m in chunk {
            q = q
                .bind(m.start_date)
                .bind(m.end_date)
                .bind(m.status)
                .bind(&m.description)
                .bind(m.famille_id)
                .bind(m.enseignant_id);
        }
        let ids = q.fetch_all(&mut *tx).await?;
        seeded.extend(ids.into_iter().zip(chunk).map(|(id, m)| SeededMission {
            id,
            famille_id: m.famille_id,
            enseignant_id: m.enseignant_id,
            start_date: m.start_date,
        }));
    }
    summary.missions = seeded.len();

    let courses = generate_courses(&seeded, &addresses, limits);

    // 8 params per course
    const COURSE_BATCH: usize = 800;
    let mut paid = Vec::new();
    let mut rng = StdRng::from_entropy();
    for chunk in courses.chunks(COURSE_BATCH) {
        let query = format!(
            "INSERT INTO courses (scheduled_time, duration, location, status, famille_id, enseignant_id, mission_id, address_id) VALUES {} RETURNING id",
            values_clause(chunk.len(), 8)
        );
        let mut q = sqlx::query_scalar::<_, i64>(&query);
        for c in chunk {
            q = q
                .bind(c.scheduled_time)
                .bind(c.duration)
                .bind(&c.location)
                .bind(c.status)
                .bind(c.famille_id)
                .bind(c.enseignant_id)
                .bind(c.mission_id)
                .bind(c.address_id);
        }
        let ids = q.fetch_all(&mut *tx).await?;
        summary.courses += ids.len();

        for (id, course) in ids.into_iter().zip(chunk) {
            if rng.gen_bool(limits.paid_course_ratio) {
                let amount = (course.duration as f64 / 60.0) * rng.gen_range(15..60) as f64;
                paid.push((id, course.famille_id, amount, course.scheduled_time));
            }
        }
    }

    const PAYMENT_BATCH: usize = 1000;
    for chunk in paid.chunks(PAYMENT_BATCH) {
        let query = format!(
            "INSERT INTO payments (amount, payment_date, status, type, description, user_id, course_id) VALUES {}",
            values_clause(chunk.len(), 7)
        );
        let mut q = sqlx::query(&query);
        for (course_id, famille_id, amount, date) in chunk {
            q = q
                .bind(*amount)
                .bind(*date)
                .bind(PaymentStatus::Completed)
                .bind(PaymentType::Course)
                .bind("Course payment")
                .bind(*famille_id)
                .bind(*course_id);
        }
        q.execute(&mut *tx).await?;
    }
    summary.payments = paid.len();

    let mut reports = Vec::new();
    for mission in &seeded {
        for _ in 0..rng.gen_range(0..=2) {
            let status = if rng.gen_bool(0.5) {
                ReportStatus::Submitted
            } else {
                ReportStatus::Validated
            };
            reports.push((mission, status, Paragraph(1..3).fake::<String>()));
        }
    }

    for chunk in reports.chunks(PAYMENT_BATCH) {
        let query = format!(
            "INSERT INTO reports (submission_date, content, status, enseignant_id, mission_id) VALUES {}",
            values_clause(chunk.len(), 5)
        );
        let mut q = sqlx::query(&query);
        for (mission, status, content) in chunk {
            q = q
                .bind(mission.start_date + Duration::days(7))
                .bind(content)
                .bind(*status)
                .bind(mission.enseignant_id)
                .bind(mission.id);
        }
        q.execute(&mut *tx).await?;
    }
    summary.reports = reports.len();

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} missions, {} courses, {} payments and {} reports in {:?}",
        summary.missions,
        summary.courses,
        summary.payments,
        summary.reports,
        start_time.elapsed()
    );

    Ok(summary)
}
