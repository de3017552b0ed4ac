use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use edumarket_cli::seeder::{self, EngagementLimits, SeedConfig, UserCounts};
use edumarket_db::{DbConfig, PgPool, init_db_pool};
use edumarket_models::UserRole;

#[derive(Parser)]
#[command(name = "edumarket-cli")]
#[command(about = "Edumarket CLI - Administrative tools for Edumarket", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new administrator account
    CreateAdmin {
        /// Username
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,
    },
    /// Seed the database with fake accounts, offers, missions, courses and resources
    Seed {
        /// Number of administrators
        #[arg(long, default_value = "2")]
        admins: usize,

        /// Number of teachers
        #[arg(long, default_value = "50")]
        enseignants: usize,

        /// Number of families
        #[arg(long, default_value = "200")]
        familles: usize,

        /// Number of offers
        #[arg(long, default_value = "30")]
        offers: usize,

        /// Maximum number of missions per family
        #[arg(long, default_value = "3")]
        max_missions: usize,

        /// Maximum number of courses per mission
        #[arg(long, default_value = "15")]
        max_courses: usize,

        /// Number of resources
        #[arg(long, default_value = "100")]
        resources: usize,
    },
    /// Clear all seeded data (keeps accounts created by hand)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let pool = match connect().await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("❌ Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::CreateAdmin {
            username,
            email,
            password,
            phone,
        } => handle_create_admin(&pool, username, email, password, phone).await,
        Commands::Seed {
            admins,
            enseignants,
            familles,
            offers,
            max_missions,
            max_courses,
            resources,
        } => {
            let config = SeedConfig::default()
                .with_users(UserCounts {
                    admins,
                    enseignants,
                    familles,
                })
                .with_offers(offers)
                .with_engagements(EngagementLimits {
                    max_missions_per_famille: max_missions,
                    max_courses_per_mission: max_courses,
                    ..Default::default()
                })
                .with_resources(resources);
            handle_seed(&pool, config).await
        }
        Commands::ClearSeed => handle_clear_seed(&pool).await,
    }

    pool.close().await;
}

async fn connect() -> anyhow::Result<PgPool> {
    let config = DbConfig::from_env()
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    Ok(init_db_pool(&config).await?)
}

fn prompt(value: Option<String>, label: &str) -> Result<String, dialoguer::Error> {
    match value {
        Some(v) => Ok(v),
        None => Input::new().with_prompt(label).interact_text(),
    }
}

async fn handle_create_admin(
    pool: &PgPool,
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
    phone: Option<String>,
) {
    let answers = (|| -> Result<_, dialoguer::Error> {
        let username = prompt(username, "Username")?;
        let email = prompt(email, "Email address")?;
        let password = match password {
            Some(p) => p,
            None => Password::new()
                .with_prompt("Password")
                .with_confirmation("Confirm password", "Passwords don't match")
                .interact()?,
        };
        Ok((username, email, password))
    })();

    let (username, email, password) = match answers {
        Ok(answers) => answers,
        Err(e) => {
            eprintln!("\n❌ Failed to read input: {}", e);
            std::process::exit(1);
        }
    };

    match create_admin(pool, &username, &email, &password, phone.as_deref()).await {
        Ok(id) => {
            println!("\n✅ Administrator created successfully!");
            println!("   ID: {}", id);
            println!("   Username: {}", username);
            println!("   Email: {}", email);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating administrator: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed(pool: &PgPool, config: SeedConfig) {
    if let Err(e) = seeder::seed_all(pool, config).await {
        eprintln!("\n❌ Error seeding database: {}", e);
        std::process::exit(1);
    }
}

async fn handle_clear_seed(pool: &PgPool) {
    if let Err(e) = seeder::clear_all(pool).await {
        eprintln!("\n❌ Error clearing seeded data: {}", e);
        std::process::exit(1);
    }
}

/// Inserts an administrator account and its profile in one transaction.
async fn create_admin(
    db: &PgPool,
    username: &str,
    email: &str,
    password: &str,
    phone: Option<&str>,
) -> anyhow::Result<i64> {
    if username.trim().len() < 3 {
        anyhow::bail!("Username must be at least 3 characters");
    }
    if !email.contains('@') {
        anyhow::bail!("Invalid email address");
    }
    if password.len() < 8 {
        anyhow::bail!("Password must be at least 8 characters");
    }

    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM users WHERE (email = $1 OR username = $2) AND deleted_at IS NULL)",
    )
    .bind(email)
    .bind(username)
    .fetch_one(db)
    .await?;

    if taken {
        anyhow::bail!("A user with this email or username already exists");
    }

    let password_hash = edumarket_core::hash_password(password)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e.error))?;

    let mut tx = db.begin().await?;

    let user_id: i64 = sqlx::query_scalar(
        "INSERT INTO users (username, email, password, phone_number, role)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(username)
    .bind(email)
    .bind(&password_hash)
    .bind(phone)
    .bind(UserRole::Administrator)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO administrators (user_id) VALUES ($1)")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(user_id)
}
