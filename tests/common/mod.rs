#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use siwe_profile_api::app::{router, AppState};
use siwe_profile_api::auth::{CookieSessionStore, SessionKeys};
use siwe_profile_api::config::AppConfig;
use siwe_profile_api::database::{DatabaseError, ProfileStore, ProfileUpdate, UserDirectory, UserRecord};

pub const SECRET: &str = "integration-test-session-secret-0123456789";

pub type Rows = Arc<Mutex<Vec<UserRecord>>>;

pub fn user(address: &str) -> UserRecord {
    let created = Utc::now() - Duration::days(30);
    UserRecord {
        id: Uuid::new_v4(),
        address: address.to_string(),
        display_name: None,
        bio: Some("original bio".to_string()),
        location: None,
        avatar_url: None,
        header_url: None,
        created_at: created,
        updated_at: created,
    }
}

/// In-memory stand-in for the user-tier lookup.
pub struct MemoryUsers {
    rows: Rows,
    pub lookups: AtomicUsize,
    pub fail: bool,
}

#[async_trait]
impl UserDirectory for MemoryUsers {
    async fn find_user_by_address(&self, address: &str) -> Result<Option<Uuid>, DatabaseError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut));
        }

        let rows = self.rows.lock().unwrap();
        let matches: Vec<Uuid> = rows
            .iter()
            .filter(|row| row.address.eq_ignore_ascii_case(address))
            .map(|row| row.id)
            .collect();

        match matches.as_slice() {
            [] => Ok(None),
            [id] => Ok(Some(*id)),
            _ => Err(DatabaseError::AmbiguousAddress(address.to_string())),
        }
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        if self.fail {
            return Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBehavior {
    Apply,
    NoRow,
    Fail,
    Panic,
}

/// In-memory stand-in for the service-tier writer. Records every update set.
pub struct MemoryProfiles {
    rows: Rows,
    pub received: Mutex<Vec<(Uuid, Value)>>,
    pub behavior: StoreBehavior,
}

impl MemoryProfiles {
    pub fn received(&self) -> Vec<(Uuid, Value)> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfiles {
    async fn update_user(&self, id: Uuid, update: &ProfileUpdate) -> Result<Option<UserRecord>, DatabaseError> {
        self.received.lock().unwrap().push((id, update.to_json()));

        match self.behavior {
            StoreBehavior::Fail => return Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut)),
            StoreBehavior::NoRow => return Ok(None),
            StoreBehavior::Panic => panic!("profile store exploded"),
            StoreBehavior::Apply => {}
        }

        let values = update.text_values()?;
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|row| row.id == id) else {
            return Ok(None);
        };

        for (field, value) in values {
            let slot = match field.column() {
                "display_name" => &mut row.display_name,
                "bio" => &mut row.bio,
                "location" => &mut row.location,
                "avatar_url" => &mut row.avatar_url,
                _ => &mut row.header_url,
            };
            *slot = value;
        }
        row.updated_at = update.updated_at();

        Ok(Some(row.clone()))
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

pub struct Harness {
    pub app: Router,
    pub rows: Rows,
    pub users: Arc<MemoryUsers>,
    pub profiles: Arc<MemoryProfiles>,
    pub sessions: CookieSessionStore,
}

impl Harness {
    pub fn new(rows: Vec<UserRecord>) -> Self {
        Self::with_behavior(rows, false, StoreBehavior::Apply)
    }

    pub fn with_behavior(rows: Vec<UserRecord>, lookup_fails: bool, behavior: StoreBehavior) -> Self {
        let rows: Rows = Arc::new(Mutex::new(rows));
        let users = Arc::new(MemoryUsers {
            rows: rows.clone(),
            lookups: AtomicUsize::new(0),
            fail: lookup_fails,
        });
        let profiles = Arc::new(MemoryProfiles {
            rows: rows.clone(),
            received: Mutex::new(Vec::new()),
            behavior,
        });

        let config = AppConfig::development();
        let keys = SessionKeys::from_secret(SECRET, 1).expect("test secret is long enough");
        let sessions = CookieSessionStore::new(config.session.cookie_name.clone(), keys);

        let state = AppState::new(Arc::new(sessions.clone()), users.clone(), profiles.clone());

        Self {
            app: router(state, &config),
            rows,
            users,
            profiles,
            sessions,
        }
    }

    pub fn row(&self, id: Uuid) -> Option<UserRecord> {
        self.rows.lock().unwrap().iter().find(|row| row.id == id).cloned()
    }

    pub fn cookie_for(&self, address: &str) -> String {
        let token = self.sessions.keys().issue(address, 1).expect("issue session");
        format!("{}={}", self.sessions.cookie_name(), token)
    }

    pub fn lookups(&self) -> usize {
        self.users.lookups.load(Ordering::SeqCst)
    }

    pub async fn send(&self, method: Method, uri: &str, cookie: Option<&str>, body: &str) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder.body(Body::from(body.to_string()))?;

        let response = self.app.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, json))
    }

    pub async fn patch_profile(&self, cookie: Option<&str>, body: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::PATCH, "/api/profile", cookie, body).await
    }
}
