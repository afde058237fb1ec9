//! SQLite repository round trips against a temporary database file.

#![cfg(feature = "sqlite-repo")]

mod support;

use demand_forecast::db::factory::{RepositoryFactory, RepositoryType};
use demand_forecast::db::repository::{ProfileRepository, SalesRepository};
use demand_forecast::db::{services, SqliteConfig, SqliteRepository};
use demand_forecast::models::{HyperparameterProfile, ModelFamily, Observation};
use rand::rngs::StdRng;
use rand::SeedableRng;
use support::{constant_history, date};

fn temp_repository() -> (tempfile::TempDir, SqliteRepository) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sales_data.db");
    let repo = SqliteRepository::new(SqliteConfig::with_path(path.to_string_lossy())).unwrap();
    (dir, repo)
}

#[tokio::test]
async fn test_fresh_database_is_empty_with_default_profile() {
    let (_dir, repo) = temp_repository();
    assert!(repo.health_check().await.unwrap());
    assert_eq!(repo.count_observations().await.unwrap(), 0);
    assert!(repo.load_history().await.unwrap().is_empty());
    assert_eq!(
        repo.load_active_profile().await.unwrap(),
        HyperparameterProfile::default()
    );
}

#[tokio::test]
async fn test_save_history_replaces_and_orders_rows() {
    let (_dir, repo) = temp_repository();
    repo.save_history(&constant_history(date(2023, 1, 1), 20, 1.0))
        .await
        .unwrap();

    let rows = vec![
        Observation::new(date(2024, 1, 3), 1200.0),
        Observation::new(date(2024, 1, 1), 1000.0).with_features("holiday"),
        Observation::new(date(2024, 1, 2), 1100.5),
    ];
    assert_eq!(repo.save_history(&rows).await.unwrap(), 3);

    let loaded = repo.load_history().await.unwrap();
    assert_eq!(loaded.len(), 3);
    assert_eq!(loaded[0].date, date(2024, 1, 1));
    assert_eq!(loaded[0].features.as_deref(), Some("holiday"));
    assert_eq!(loaded[1].sales, 1100.5);
    assert_eq!(loaded[2].date, date(2024, 1, 3));
}

#[tokio::test]
async fn test_large_history_survives_chunked_insert() {
    let (_dir, repo) = temp_repository();
    let rows = constant_history(date(2020, 1, 1), 1200, 950.0);
    assert_eq!(repo.save_history(&rows).await.unwrap(), 1200);
    assert_eq!(repo.count_observations().await.unwrap(), 1200);
}

#[tokio::test]
async fn test_second_profile_save_replaces_first() {
    let (_dir, repo) = temp_repository();
    let first = HyperparameterProfile {
        model_family: ModelFamily::Gru,
        hidden_layers: 3,
        hidden_units: 128,
        epochs: 100,
        batch_size: 32,
        auto_selected: true,
    };
    repo.save_profile(&first).await.unwrap();
    assert_eq!(repo.load_active_profile().await.unwrap(), first);

    let second = HyperparameterProfile {
        model_family: ModelFamily::Transformer,
        auto_selected: false,
        ..first.clone()
    };
    repo.save_profile(&second).await.unwrap();
    assert_eq!(repo.load_active_profile().await.unwrap(), second);
}

#[tokio::test]
async fn test_data_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = SqliteConfig::with_path(dir.path().join("persist.db").to_string_lossy());

    {
        let repo = SqliteRepository::new(config.clone()).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let seeded = services::seed_sample_data_if_empty(&repo, date(2024, 6, 30), 365, &mut rng)
            .await
            .unwrap();
        assert_eq!(seeded, 365);
        services::auto_select_profile(&repo).await.unwrap();
    }

    let repo = RepositoryFactory::create(RepositoryType::Sqlite, Some(&config))
        .await
        .unwrap();
    assert_eq!(repo.count_observations().await.unwrap(), 365);
    let profile = repo.load_active_profile().await.unwrap();
    assert_eq!(profile.model_family, ModelFamily::Gru);
    assert!(profile.auto_selected);
}

#[tokio::test]
async fn test_in_memory_database() {
    let repo = SqliteRepository::new(SqliteConfig::with_path(":memory:")).unwrap();
    repo.save_history(&constant_history(date(2024, 1, 1), 10, 3.0))
        .await
        .unwrap();
    assert_eq!(repo.count_observations().await.unwrap(), 10);
    assert_eq!(repo.get_pool_stats().max_size, 1);
}
