use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use trivia_api::db::queries::categories::{get_all_categories, import_categories};
use trivia_api::db::queries::questions::{get_all_questions, import_questions};
use trivia_api::db::{establish_connection, run_migrations, Category, Question};
use trivia_api::telemetry::init_tracing;

const CATEGORIES_FILE: &str = "categories.csv";
const QUESTIONS_FILE: &str = "questions.csv";

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Database URL, e.g. sqlite:trivia.db
    database_url: String,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending migrations
    Migrate,
    /// Import categories.csv and questions.csv from a directory
    Import { path: PathBuf },
    /// Export categories.csv and questions.csv into a directory
    Export { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info")?;
    let cli = Cli::parse();
    let pool = establish_connection(&cli.database_url, 1)
        .await
        .context("Cannot connect to DB")?;
    run_migrations(&pool).await?;
    match cli.command {
        Commands::Migrate => tracing::info!("Migrations applied"),
        Commands::Export { path } => export_data(&pool, &path).await.context("Cannot export")?,
        Commands::Import { path } => import_data(&pool, &path).await.context("Cannot import")?,
    }
    Ok(())
}

fn write_to(path: PathBuf, data: Vec<impl Serialize>) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(&path)
        .with_context(|| format!("Cannot create {}", path.display()))?;
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

fn read_from<T: DeserializeOwned>(path: PathBuf) -> anyhow::Result<Vec<T>> {
    let mut rdr = csv::Reader::from_path(&path)
        .with_context(|| format!("Cannot open {}", path.display()))?;
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        let record: T = record?;
        out.push(record);
    }
    Ok(out)
}

async fn export_data(pool: &SqlitePool, path: &Path) -> anyhow::Result<()> {
    let categories = get_all_categories(pool).await?;
    let questions = get_all_questions(pool).await?;
    if !path.exists() {
        std::fs::create_dir_all(path)?
    }
    tracing::info!(
        "Exporting {} categories and {} questions to {}",
        categories.len(),
        questions.len(),
        path.display()
    );
    write_to(path.join(CATEGORIES_FILE), categories)?;
    write_to(path.join(QUESTIONS_FILE), questions)?;
    Ok(())
}

async fn import_data(pool: &SqlitePool, path: &Path) -> anyhow::Result<()> {
    let categories: Vec<Category> = read_from(path.join(CATEGORIES_FILE))?;
    let questions: Vec<Question> = read_from(path.join(QUESTIONS_FILE))?;
    tracing::info!(
        "Importing {} categories and {} questions from {}",
        categories.len(),
        questions.len(),
        path.display()
    );
    // questions reference categories, so categories go first
    import_categories(pool, categories).await?;
    import_questions(pool, questions).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test]
    async fn export_then_import_reproduces_data(pool: SqlitePool) {
        import_categories(
            &pool,
            vec![Category {
                id: 1,
                kind: "Science".to_owned(),
            }],
        )
        .await
        .unwrap();
        import_questions(
            &pool,
            vec![Question {
                id: 5,
                question: "What is H2O, commonly?".to_owned(),
                answer: "Water".to_owned(),
                category: 1,
                difficulty: 1,
            }],
        )
        .await
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        export_data(&pool, dir.path()).await.unwrap();

        let fresh = establish_connection("sqlite::memory:", 1).await.unwrap();
        run_migrations(&fresh).await.unwrap();
        import_data(&fresh, dir.path()).await.unwrap();

        assert_eq!(
            get_all_categories(&fresh).await.unwrap(),
            get_all_categories(&pool).await.unwrap()
        );
        assert_eq!(
            get_all_questions(&fresh).await.unwrap(),
            get_all_questions(&pool).await.unwrap()
        );
    }

    #[test]
    fn sample_data_parses() {
        let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let categories: Vec<Category> = read_from(data.join(CATEGORIES_FILE)).unwrap();
        let questions: Vec<Question> = read_from(data.join(QUESTIONS_FILE)).unwrap();
        assert_eq!(categories.len(), 6);
        assert!(questions
            .iter()
            .all(|q| categories.iter().any(|c| c.id == q.category)));
    }
}
