//! Common test utilities: temporary SQLite storage, in-memory stores with
//! failure injection, and metadata fetcher doubles.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tempfile::TempDir;
use uuid::Uuid;

use shortleak::config::{DatabaseConfig, StaticConfig};
use shortleak::errors::{Result, ShortleakError};
use shortleak::services::{MetadataFetcher, PageMetadata};
use shortleak::storage::{
    EventAction, EventStore, Link, LinkStore, SeaOrmStorage, StorageFactory, User, UserStore,
    VisitEvent, VisitStats,
};

/// Fresh SQLite database in a temp dir; keep the `TempDir` alive for the test
pub async fn sqlite_storage() -> (Arc<SeaOrmStorage>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("shortleak_test.db");
    let config = DatabaseConfig {
        database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
        ..DatabaseConfig::default()
    };
    let storage = StorageFactory::create(&config)
        .await
        .expect("Failed to create storage");
    (storage, temp_dir)
}

pub fn test_config() -> StaticConfig {
    let mut config = StaticConfig::default();
    config.auth.jwt_secret = "integration-test-secret-0123456789".to_string();
    config.metadata.enabled = false;
    config
}

pub fn test_user(email: &str) -> User {
    User {
        id: Uuid::new_v4(),
        fullname: "Test User".to_string(),
        email: email.to_string(),
        password_hash: "not-a-real-hash".to_string(),
        active: true,
        created_at: Utc::now(),
    }
}

/// Insert a user directly so links can reference it
pub async fn seed_user(users: &dyn UserStore, email: &str) -> User {
    let user = test_user(email);
    let event = VisitEvent::new(user.id, EventAction::Register, None);
    users
        .insert_user_with_event(&user, &event)
        .await
        .expect("Failed to seed user");
    user
}

/// In-memory implementation of all three stores
///
/// Knobs:
/// - `always_taken`: every `token_exists` answers true
/// - `commit_token_conflicts`: the next N inserts fail with `DuplicateToken`
/// - `fail_events`: `append_event` fails with a database error
#[derive(Default)]
pub struct MemoryStore {
    pub links: Mutex<Vec<Link>>,
    pub users: Mutex<Vec<User>>,
    pub events: Mutex<Vec<VisitEvent>>,
    pub always_taken: AtomicBool,
    pub commit_token_conflicts: AtomicUsize,
    pub fail_events: AtomicBool,
    pub token_exists_calls: AtomicUsize,
    pub insert_calls: AtomicUsize,
    pub lookup_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_link(&self, link: Link) {
        self.links.lock().unwrap().push(link);
    }

    pub fn link_count(&self) -> usize {
        self.links.lock().unwrap().len()
    }

    pub fn events_of(&self, action: EventAction) -> Vec<VisitEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.action == action)
            .cloned()
            .collect()
    }

    pub fn total_calls(&self) -> usize {
        self.token_exists_calls.load(Ordering::SeqCst)
            + self.insert_calls.load(Ordering::SeqCst)
            + self.lookup_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LinkStore for MemoryStore {
    async fn find_link_by_url(&self, url: &str) -> Result<Option<Link>> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.url == url)
            .cloned())
    }

    async fn find_link_by_token(&self, short_token: &str) -> Result<Option<Link>> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.short_token == short_token)
            .cloned())
    }

    async fn token_exists(&self, short_token: &str) -> Result<bool> {
        self.token_exists_calls.fetch_add(1, Ordering::SeqCst);
        if self.always_taken.load(Ordering::SeqCst) {
            return Ok(true);
        }
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .any(|l| l.short_token == short_token))
    }

    async fn insert_link_with_event(&self, link: &Link, event: &VisitEvent) -> Result<()> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);

        let pending = self.commit_token_conflicts.load(Ordering::SeqCst);
        if pending > 0 {
            self.commit_token_conflicts
                .store(pending - 1, Ordering::SeqCst);
            return Err(ShortleakError::duplicate_token("links.short_token"));
        }

        let mut links = self.links.lock().unwrap();
        if links.iter().any(|l| l.url == link.url) {
            return Err(ShortleakError::duplicate_url("links.url"));
        }
        if links.iter().any(|l| l.short_token == link.short_token) {
            return Err(ShortleakError::duplicate_token("links.short_token"));
        }
        links.push(link.clone());
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn list_links_by_owner(&self, owner_id: Uuid) -> Result<Vec<Link>> {
        let mut links: Vec<Link> = self
            .links
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.owner_id == owner_id)
            .cloned()
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(links)
    }

    async fn delete_link(&self, short_token: &str) -> Result<bool> {
        let mut links = self.links.lock().unwrap();
        let before = links.len();
        links.retain(|l| l.short_token != short_token);
        Ok(links.len() != before)
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn append_event(&self, event: &VisitEvent) -> Result<()> {
        if self.fail_events.load(Ordering::SeqCst) {
            return Err(ShortleakError::database_operation("event store unavailable"));
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn visit_stats(&self, short_token: &str) -> Result<VisitStats> {
        let events = self.events.lock().unwrap();
        let visits: Vec<&VisitEvent> = events
            .iter()
            .filter(|e| e.action == EventAction::VisitLink && e.short_token() == Some(short_token))
            .collect();
        let mut actors: Vec<Uuid> = visits.iter().map(|e| e.actor_id).collect();
        actors.sort();
        actors.dedup();
        Ok(VisitStats {
            total_visits: visits.len() as u64,
            unique_visitors: actors.len() as u64,
        })
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn insert_user_with_event(&self, user: &User, event: &VisitEvent) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(ShortleakError::already_exists("User already exists"));
        }
        users.push(user.clone());
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Fetcher returning fixed metadata and counting calls
#[derive(Default)]
pub struct StaticFetcher {
    pub metadata: PageMetadata,
    pub calls: AtomicUsize,
}

#[async_trait]
impl MetadataFetcher for StaticFetcher {
    async fn fetch(&self, _url: &str) -> Result<PageMetadata> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.metadata.clone())
    }
}

/// Fetcher that always fails, like an unreachable destination
pub struct FailingFetcher;

#[async_trait]
impl MetadataFetcher for FailingFetcher {
    async fn fetch(&self, url: &str) -> Result<PageMetadata> {
        Err(ShortleakError::metadata_fetch(format!(
            "connection refused: {}",
            url
        )))
    }
}
