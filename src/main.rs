use rusty_room_booking::{
    adapters::memory::InMemoryRoomRepository,
    adapters::mock::NotificationService as MockNotificationService,
    adapters::postgres::PostgresRoomRepository,
    adapters::system::SystemClock,
    api::{handlers::AppState, router::create_router},
    application::booking::ServiceDependencies,
    domain::{Room, RoomId},
    ports::RoomRepository,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// `id=name` pairs separated by commas, e.g. `room1=Room A,room2=Room B`
const DEFAULT_ROOMS: &str = "room1=Room A,room2=Room B";

/// Parse seed rooms, keeping the first entry for each id
fn parse_seed_rooms(seed: &str) -> Vec<Room> {
    let mut seen = HashSet::new();
    seed.split(',')
        .filter_map(|entry| {
            let (id, name) = entry.split_once('=').unwrap_or((entry, entry));
            match RoomId::new(id.trim()) {
                Ok(room_id) if !seen.insert(room_id.clone()) => {
                    tracing::warn!("Ignoring duplicate room id: {}", room_id);
                    None
                }
                Ok(room_id) => Some(Room::new(room_id, name.trim())),
                Err(_) => {
                    tracing::warn!("Ignoring invalid room entry: {:?}", entry);
                    None
                }
            }
        })
        .collect()
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rusty_room_booking=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let seed_rooms =
        parse_seed_rooms(&std::env::var("ROOMS").unwrap_or_else(|_| DEFAULT_ROOMS.into()));

    // DATABASE_URLがあればPostgreSQL、なければインメモリ
    let room_repository: Arc<dyn RoomRepository> = match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            tracing::info!("Database URL: {}", database_url);

            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(5)
                .connect(&database_url)
                .await
                .expect("Failed to connect to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .expect("Failed to run migrations");

            let repository = PostgresRoomRepository::new(pool);
            for room in &seed_rooms {
                let existing = repository
                    .find_by_id(room.id())
                    .await
                    .expect("Failed to look up seed room");
                if existing.is_none() {
                    repository
                        .save(room)
                        .await
                        .expect("Failed to save seed room");
                }
            }
            Arc::new(repository)
        }
        Err(_) => {
            tracing::info!("DATABASE_URL not set, using in-memory room repository");
            Arc::new(InMemoryRoomRepository::with_rooms(seed_rooms))
        }
    };

    let service_deps = ServiceDependencies {
        clock: Arc::new(SystemClock),
        room_repository,
        notification_service: Arc::new(MockNotificationService::new()),
    };

    // Create application state
    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state);

    // Server configuration
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
