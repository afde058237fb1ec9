#[cfg(test)]
mod tests {
    use crate::db::repositories::LocalRepository;
    use crate::db::services;
    use crate::db::repository::{ProfileRepository, SalesRepository};
    use crate::models::{HyperparameterProfile, ModelFamily, Observation};
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn history(days: usize) -> Vec<Observation> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..days)
            .map(|i| Observation::new(start + chrono::Duration::days(i as i64), 100.0))
            .collect()
    }

    #[tokio::test]
    async fn test_seed_only_when_empty() {
        let repo = LocalRepository::new();
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let seeded = services::seed_sample_data_if_empty(&repo, end, 365, &mut rng)
            .await
            .unwrap();
        assert_eq!(seeded, 365);

        let again = services::seed_sample_data_if_empty(&repo, end, 365, &mut rng)
            .await
            .unwrap();
        assert_eq!(again, 0);
        assert_eq!(repo.observation_count(), 365);
    }

    #[tokio::test]
    async fn test_replace_sales_history() {
        let repo = LocalRepository::with_history(history(10));
        let written = services::replace_sales_history(&repo, &history(3))
            .await
            .unwrap();
        assert_eq!(written, 3);
        assert_eq!(services::get_sales_history(&repo).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_auto_select_profile_persists_selection() {
        let repo = LocalRepository::with_history(history(100));
        let profile = services::auto_select_profile(&repo).await.unwrap();

        assert!(profile.auto_selected);
        assert_eq!(profile.model_family, ModelFamily::Lstm);
        assert_eq!(profile.hidden_layers, 2);
        assert_eq!(profile.batch_size, 16);
        assert_eq!(repo.load_active_profile().await.unwrap(), profile);
    }

    #[tokio::test]
    async fn test_manual_training_profile_does_not_persist_overrides() {
        let repo = LocalRepository::with_history(history(10));
        let profile = services::resolve_training_profile(&repo, false, Some(5), Some(8))
            .await
            .unwrap();

        assert_eq!(profile.epochs, 5);
        assert_eq!(profile.batch_size, 8);
        assert_eq!(
            repo.load_active_profile().await.unwrap(),
            HyperparameterProfile::default()
        );
    }

    #[tokio::test]
    async fn test_auto_training_profile_ignores_overrides() {
        let repo = LocalRepository::with_history(history(250));
        let profile = services::resolve_training_profile(&repo, true, Some(5), Some(8))
            .await
            .unwrap();

        assert_eq!(profile.model_family, ModelFamily::Gru);
        assert_eq!(profile.epochs, 100);
        assert_eq!(profile.batch_size, 32);
        assert!(repo.has_saved_profile());
    }

    #[tokio::test]
    async fn test_health_check_reflects_repository_state() {
        let repo = LocalRepository::new();
        assert!(services::health_check(&repo).await.unwrap());
        repo.set_healthy(false);
        assert!(!services::health_check(&repo).await.unwrap());
        assert!(repo.count_observations().await.is_err());
    }
}
