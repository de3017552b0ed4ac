use edumarket_models::UserRole;
use edumarket_models::resources::ResourceType;
use fake::Fake;
use fake::faker::lorem::en::{Sentence, Word};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use sqlx::PgPool;
use std::time::Instant;

use super::models::{ResourceSeed, SeededUser};
use super::values_clause;

const TYPES: &[(ResourceType, &str, &str)] = &[
    (ResourceType::Document, "pdf", "application/pdf"),
    (ResourceType::Video, "mp4", "video/mp4"),
    (ResourceType::Audio, "mp3", "audio/mpeg"),
    (ResourceType::Image, "png", "image/png"),
];

/// Resources are managed by administrators and teachers.
pub fn generate_resources(count: usize, managers: &[i64]) -> Vec<ResourceSeed> {
    if managers.is_empty() {
        return Vec::new();
    }

    (0..count)
        .into_par_iter()
        .map(|idx| {
            let mut rng = rand::thread_rng();
            let slug: String = Word().fake();
            let managed_by_id = managers[rng.gen_range(0..managers.len())];

            // one in five is a plain link
            if rng.gen_range(0..5) == 0 {
                return ResourceSeed {
                    title: Sentence(2..5).fake(),
                    resource_type: ResourceType::Link,
                    url: format!("https://learn.edumarket.test/{}/{}", slug, idx),
                    description: Sentence(6..14).fake(),
                    file_size: None,
                    mime_type: None,
                    is_public: rng.gen_bool(0.5),
                    managed_by_id,
                };
            }

            let (resource_type, ext, mime) = TYPES[rng.gen_range(0..TYPES.len())];
            ResourceSeed {
                title: Sentence(2..5).fake(),
                resource_type,
                url: format!("https://files.edumarket.test/{}-{}.{}", slug, idx, ext),
                description: Sentence(6..14).fake(),
                file_size: Some(rng.gen_range(10_000..50_000_000)),
                mime_type: Some(mime.to_string()),
                is_public: rng.gen_bool(0.5),
                managed_by_id,
            }
        })
        .collect()
}

/// Seeds resources and shares each private one with up to three users.
pub async fn seed_resources(
    db: &PgPool,
    count: usize,
    users: &[SeededUser],
) -> anyhow::Result<(usize, usize)> {
    let start_time = Instant::now();
    let managers: Vec<i64> = users
        .iter()
        .filter(|u| u.role != UserRole::Famille)
        .map(|u| u.id)
        .collect();
    let resources = generate_resources(count, &managers);
    println!("📚 Seeding {} resources...", resources.len());

    if resources.is_empty() {
        return Ok((0, 0));
    }

    let mut tx = db.begin().await?;

    // 8 params per resource
    const BATCH_SIZE: usize = 1000;

    let mut ids = Vec::with_capacity(resources.len());
    for chunk in resources.chunks(BATCH_SIZE) {
        let query = format!(
            "INSERT INTO resources (title, type, url, description, file_size, mime_type, is_public, managed_by_id) VALUES {} RETURNING id",
            values_clause(chunk.len(), 8)
        );
        let mut q = sqlx::query_scalar::<_, i64>(&query);
        for r in chunk {
            q = q
                .bind(&r.title)
                .bind(r.resource_type)
                .bind(&r.url)
                .bind(&r.description)
                .bind(r.file_size)
                .bind(&r.mime_type)
                .bind(r.is_public)
                .bind(r.managed_by_id);
        }
        ids.extend(q.fetch_all(&mut *tx).await?);
    }

    let user_ids: Vec<i64> = users.iter().map(|u| u.id).collect();
    let mut rng = StdRng::from_entropy();
    let mut shares = Vec::new();
    for (id, resource) in ids.iter().zip(&resources) {
        if resource.is_public {
            continue;
        }
        let picks = rng.gen_range(0..=3);
        for &user_id in user_ids.choose_multiple(&mut rng, picks) {
            shares.push((*id, user_id));
        }
    }

    for chunk in shares.chunks(BATCH_SIZE * 4) {
        let query = format!(
            "INSERT INTO user_resources (resource_id, user_id) VALUES {} ON CONFLICT DO NOTHING",
            values_clause(chunk.len(), 2)
        );
        let mut q = sqlx::query(&query);
        for (resource_id, user_id) in chunk {
            q = q.bind(*resource_id).bind(*user_id);
        }
        q.execute(&mut *tx).await?;
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} resources and {} shares in {:?}",
        ids.len(),
        shares.len(),
        start_time.elapsed()
    );

    Ok((ids.len(), shares.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_resources() {
        assert!(generate_resources(3, &[]).is_empty());

        let resources = generate_resources(40, &[1, 2]);
        assert_eq!(resources.len(), 40);
        for resource in resources {
            assert!([1, 2].contains(&resource.managed_by_id));
            assert!(resource.url.starts_with("https://"));
            assert_eq!(
                resource.mime_type.is_none(),
                resource.resource_type == ResourceType::Link
            );
        }
    }
}
