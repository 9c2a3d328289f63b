use chrono::Duration;

use kana_core::model::{CharacterId, MasteryState, PracticeMode, PracticeSettings};
use kana_core::time::fixed_now;
use services::{AppServices, Clock};
use storage::json::{PROGRESS_FILE, STATISTICS_FILE};

async fn open(dir: &std::path::Path, clock: Clock) -> AppServices {
    AppServices::open(dir, clock, PracticeSettings::standard())
        .await
        .unwrap()
}

#[tokio::test]
async fn progress_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Clock::fixed(fixed_now());
    let ka = CharacterId::new(6);

    {
        let app = open(dir.path(), clock).await;
        let store = app.progress();
        for _ in 0..5 {
            store.record_attempt(ka, true).await;
        }
        store.record_attempt(CharacterId::new(1), false).await;
    }

    assert!(dir.path().join(PROGRESS_FILE).exists());
    assert!(dir.path().join(STATISTICS_FILE).exists());

    let app = open(dir.path(), clock).await;
    let record = app.progress().get(ka).await;
    assert_eq!(record.correct_attempts, 5);
    assert_eq!(record.consecutive_correct, 5);
    assert_eq!(record.mastery, MasteryState::Mastered);

    let stats = app.get_statistics().await;
    assert_eq!(stats.total_characters, 46);
    assert_eq!(stats.studied_characters, 2);
    assert_eq!(stats.mastered_characters, 1);
    assert_eq!(stats.current_streak, 2);
}

#[tokio::test]
async fn session_totals_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Clock::fixed(fixed_now());

    {
        let app = open(dir.path(), clock).await;
        let practice = app.practice();
        let mut session = practice
            .start_session(PracticeMode::Recognition, Some(1))
            .await
            .unwrap();
        practice.check_answer(&mut session, "nope").await.unwrap();
        practice.end_session(&mut session).await.unwrap();
    }

    let app = open(dir.path(), clock).await;
    let stats = app.get_statistics().await;
    assert_eq!(stats.total_practice_sessions, 1);
    assert_eq!(stats.studied_characters, 1);
    assert_eq!(stats.mastered_characters, 0);
}

#[tokio::test]
async fn mastered_characters_return_after_a_week() {
    let dir = tempfile::tempdir().unwrap();
    let ka = CharacterId::new(6);

    {
        let app = open(dir.path(), Clock::fixed(fixed_now())).await;
        for _ in 0..5 {
            app.progress().record_attempt(ka, true).await;
        }
        assert!(app.progress().list_needing_practice().await.is_empty());
    }

    let later = Clock::fixed(fixed_now() + Duration::days(8));
    let app = open(dir.path(), later).await;
    let due = app.progress().list_needing_practice().await;
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].character_id, ka);
    assert_eq!(due[0].mastery, MasteryState::Mastered);
}

#[tokio::test]
async fn corrupt_progress_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(PROGRESS_FILE), "{ not json").unwrap();

    let app = open(dir.path(), Clock::fixed(fixed_now())).await;
    assert!(app.progress().list_all().await.is_empty());

    let record = app.progress().record_attempt(CharacterId::new(2), true).await;
    assert_eq!(record.total_attempts, 1);

    let reopened = open(dir.path(), Clock::fixed(fixed_now())).await;
    assert_eq!(reopened.progress().list_all().await.len(), 1);
}
