use pmoconfig::{ConfigEventType, Config, FolderCategory};
use tempfile::TempDir;

fn setup() -> (TempDir, TempDir, Config) {
    let config_dir = tempfile::tempdir().unwrap();
    let media_dir = tempfile::tempdir().unwrap();
    let config = Config::load_config(config_dir.path().to_str().unwrap()).unwrap();
    (config_dir, media_dir, config)
}

#[test]
fn test_add_folder_persists_and_validates() {
    let (config_dir, media_dir, config) = setup();
    let path = media_dir.path().to_str().unwrap();

    let node = config
        .add_folder(FolderCategory::Video, "  Movies ", path)
        .unwrap();
    assert_eq!(node.label, "Movies");
    assert_eq!(config.get_folders(FolderCategory::Video), vec![node.clone()]);
    assert!(config.get_folders(FolderCategory::Audio).is_empty());

    // Doublons de label ou de chemin refusés
    assert!(config.add_folder(FolderCategory::Video, "Movies", "/tmp").is_err());
    assert!(config.add_folder(FolderCategory::Video, "Other", path).is_err());
    // Le même chemin reste autorisé dans une autre catégorie
    assert!(config.add_folder(FolderCategory::Audio, "Movies", path).is_ok());

    // Chemins invalides
    assert!(config
        .add_folder(FolderCategory::Picture, "Nope", "/definitely/not/here")
        .is_err());
    assert!(config.add_folder(FolderCategory::Picture, "", path).is_err());
    assert!(config
        .add_folder(FolderCategory::Podcast, "Feed", "ftp://example.com/feed")
        .is_err());

    let reloaded = Config::load_config(config_dir.path().to_str().unwrap()).unwrap();
    assert_eq!(reloaded.get_folder(FolderCategory::Video, &node.id), Some(node));
}

#[test]
fn test_edit_folder_reports_unchanged() {
    let (_config_dir, media_dir, config) = setup();
    let path = media_dir.path().to_str().unwrap();
    let node = config
        .add_folder(FolderCategory::Podcast, "News", "http://example.com/rss")
        .unwrap();

    let unchanged = config
        .edit_folder(FolderCategory::Podcast, &node.id, "News", "http://example.com/rss")
        .unwrap();
    assert!(unchanged.is_none());

    let edited = config
        .edit_folder(FolderCategory::Podcast, &node.id, "Daily news", "https://example.com/rss")
        .unwrap()
        .unwrap();
    assert_eq!(edited.id, node.id);
    assert_eq!(edited.label, "Daily news");

    assert!(config
        .edit_folder(FolderCategory::Video, "missing", "x", path)
        .is_err());
}

#[test]
fn test_remove_folder() {
    let (_config_dir, media_dir, config) = setup();
    let node = config
        .add_folder(FolderCategory::Audio, "Music", media_dir.path().to_str().unwrap())
        .unwrap();

    let removed = config.remove_folder(FolderCategory::Audio, &node.id).unwrap();
    assert_eq!(removed, node);
    assert!(config.get_folders(FolderCategory::Audio).is_empty());
    assert!(config.remove_folder(FolderCategory::Audio, &node.id).is_err());
}

#[tokio::test]
async fn test_subscribers_receive_events_in_order() {
    let (_config_dir, media_dir, config) = setup();
    let mut rx = config.subscribe();
    let dropped = config.subscribe();
    drop(dropped);

    let path = media_dir.path().to_str().unwrap();
    let node = config.add_folder(FolderCategory::Video, "Movies", path).unwrap();
    config
        .edit_folder(FolderCategory::Video, &node.id, "Films", path)
        .unwrap();
    config.remove_folder(FolderCategory::Video, &node.id).unwrap();

    let kinds: Vec<_> = [
        rx.recv().await.unwrap(),
        rx.recv().await.unwrap(),
        rx.recv().await.unwrap(),
    ]
    .into_iter()
    .map(|e| {
        assert_eq!(e.category, FolderCategory::Video);
        assert_eq!(e.node.id, node.id);
        e.event_type
    })
    .collect();

    assert_eq!(
        kinds,
        vec![
            ConfigEventType::Add,
            ConfigEventType::Update,
            ConfigEventType::Delete
        ]
    );
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_concurrent_adds_are_all_kept() {
    let (config_dir, media_dir, config) = setup();
    let mut events = config.subscribe();
    let dirs: Vec<String> = (0..64)
        .map(|i| {
            let dir = media_dir.path().join(format!("disc{:02}", i));
            std::fs::create_dir(&dir).unwrap();
            dir.to_str().unwrap().to_string()
        })
        .collect();

    let added = std::thread::scope(|scope| {
        let workers: Vec<_> = dirs
            .iter()
            .enumerate()
            .map(|(i, dir)| {
                let config = &config;
                scope.spawn(move || config.add_folder(FolderCategory::Audio, &format!("Disc {}", i), dir))
            })
            .collect();
        workers
            .into_iter()
            .map(|worker| worker.join())
            .filter(|result| matches!(result, Ok(Ok(_))))
            .count()
    });
    assert_eq!(added, 64);

    let stored = config.get_folders(FolderCategory::Audio);
    assert_eq!(stored.len(), 64);
    let mut received = 0;
    while let Ok(event) = events.try_recv() {
        assert_eq!(event.event_type, ConfigEventType::Add);
        received += 1;
    }
    assert_eq!(received, 64);

    let reloaded = Config::load_config(config_dir.path().to_str().unwrap()).unwrap();
    assert_eq!(reloaded.get_folders(FolderCategory::Audio), stored);
}
