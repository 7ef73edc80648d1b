use geocluster_types::point::{PointRecord, Status};
use geocluster_worker::{OptionOverrides, WorkerConfig, WorkerError, WorkerHandle};
use std::sync::Arc;

fn markers() -> Vec<PointRecord> {
    let mut markers = vec![
        PointRecord::new("nyc-1", -73.9857, 40.7484, Status::Visited),
        PointRecord::new("nyc-2", -73.9856, 40.7485, Status::Visited),
        PointRecord::new("nyc-3", -73.9858, 40.7483, Status::BucketList),
    ];
    markers.extend((0..50).map(|i| {
        PointRecord::new(
            format!("west-{i}"),
            -120.0 + (i % 10) as f64 * 0.3,
            36.0 + (i / 10) as f64 * 0.3,
            if i % 2 == 0 {
                Status::BucketList
            } else {
                Status::Unvisited
            },
        )
    }));
    markers
}

#[tokio::test]
async fn test_queries_before_init_are_empty() {
    let worker = WorkerHandle::spawn(&WorkerConfig::default());

    assert!(worker.clusters(5.0, None).await.unwrap().is_empty());
    assert_eq!(worker.expansion_zoom(1234).await.unwrap(), 16);
    assert!(worker.children(1234).await.unwrap().is_empty());
    assert!(worker.leaves(1234, 10, 0).await.unwrap().is_empty());
    assert_eq!(worker.stats().await.unwrap().point_count, 0);
}

#[tokio::test]
async fn test_init_and_query() {
    let _ = tracing_subscriber::fmt::try_init();
    let worker = WorkerHandle::spawn(&WorkerConfig::default());
    worker
        .init(markers(), OptionOverrides::default())
        .await
        .unwrap();

    let stats = worker.stats().await.unwrap();
    assert_eq!(stats.point_count, 53);
    assert_eq!(stats.features_per_zoom.len(), 17);

    let top = worker.clusters(0.0, None).await.unwrap();
    let total: usize = top.iter().map(|f| f.point_count()).sum();
    assert_eq!(total, 53);

    let all = worker.clusters(16.0, None).await.unwrap();
    assert_eq!(all.len(), 53);

    let cluster = top.iter().find(|f| f.is_cluster()).unwrap();
    let id = cluster.cluster_id().unwrap();
    let zoom = worker.expansion_zoom(id).await.unwrap();
    assert!(zoom <= 16);

    let children = worker.children(id).await.unwrap();
    let child_total: usize = children.iter().map(|f| f.point_count()).sum();
    assert_eq!(child_total, cluster.point_count());

    let page = worker.leaves(id, 2, 0).await.unwrap();
    assert_eq!(page.len(), 2.min(cluster.point_count()));
    assert!(page.iter().all(|f| !f.is_cluster()));
}

#[tokio::test]
async fn test_rejected_init_keeps_previous_index() {
    let worker = WorkerHandle::spawn(&WorkerConfig::default());
    worker
        .init(markers(), OptionOverrides::default())
        .await
        .unwrap();

    let result = worker
        .init(
            markers(),
            OptionOverrides {
                min_points: Some(0),
                ..OptionOverrides::default()
            },
        )
        .await;
    assert!(matches!(result, Err(WorkerError::Rejected(_))));

    let result = worker
        .init(
            vec![PointRecord::new("bad", 500.0, 0.0, Status::Visited)],
            OptionOverrides::default(),
        )
        .await;
    assert!(matches!(result, Err(WorkerError::Rejected(_))));

    assert_eq!(worker.stats().await.unwrap().point_count, 53);
}

#[tokio::test]
async fn test_reinit_replaces_index() {
    let worker = WorkerHandle::spawn(&WorkerConfig::default());
    worker
        .init(markers(), OptionOverrides::default())
        .await
        .unwrap();
    worker
        .init(
            vec![PointRecord::new("solo", 0.0, 0.0, Status::Visited)],
            OptionOverrides {
                max_zoom: Some(10),
                ..OptionOverrides::default()
            },
        )
        .await
        .unwrap();

    let stats = worker.stats().await.unwrap();
    assert_eq!(stats.point_count, 1);
    assert_eq!(stats.max_zoom, 10);

    let features = worker.clusters(3.0, None).await.unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0].as_point().unwrap().id, "solo");
}

#[tokio::test]
async fn test_concurrent_requests_are_correlated() {
    let worker = Arc::new(WorkerHandle::spawn(&WorkerConfig::default()));
    worker
        .init(markers(), OptionOverrides::default())
        .await
        .unwrap();

    let expected: Vec<usize> = {
        let mut counts = Vec::new();
        for zoom in 0..=16 {
            counts.push(worker.clusters(f64::from(zoom), None).await.unwrap().len());
        }
        counts
    };

    let tasks: Vec<_> = (0..=16)
        .map(|zoom| {
            let worker = Arc::clone(&worker);
            tokio::spawn(async move { worker.clusters(f64::from(zoom), None).await })
        })
        .collect();

    for (zoom, task) in tasks.into_iter().enumerate() {
        let features = task.await.unwrap().unwrap();
        assert_eq!(features.len(), expected[zoom], "zoom {zoom}");
    }
}

#[tokio::test]
async fn test_config_defaults_apply_to_init() {
    let config = WorkerConfig::default().with_options(
        geocluster::ClusterOptions::default()
            .with_max_zoom(8)
            .with_min_points(3),
    );
    let worker = WorkerHandle::spawn(&config);
    worker
        .init(markers(), OptionOverrides::default())
        .await
        .unwrap();

    let stats = worker.stats().await.unwrap();
    assert_eq!(stats.max_zoom, 8);
    assert_eq!(stats.features_per_zoom.len(), 9);
}

#[tokio::test]
async fn test_worker_from_config_file() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "queue_capacity = 4\n\n[options]\nmaxZoom = 12\nradius = 40.0").unwrap();

    let config = WorkerConfig::load(file.path()).unwrap();
    assert_eq!(config.queue_capacity, 4);

    let worker = WorkerHandle::spawn(&config);
    worker
        .init(markers(), OptionOverrides::default())
        .await
        .unwrap();
    assert_eq!(worker.stats().await.unwrap().max_zoom, 12);
    assert_eq!(worker.expansion_zoom(0).await.unwrap(), 12);
}
