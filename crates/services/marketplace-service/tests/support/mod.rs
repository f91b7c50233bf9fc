//! Shared fixtures for the integration tests.
//!
//! Every test gets its own in-memory SQLite database with migrations
//! applied, so tests never share rows.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

use domain::{
    ChildMode, ContactDetails, CreateCategory, CreateClient, CreateProvider, CreateService,
    Pricing,
};
use marketplace_lib::config::MarketplaceConfig;
use marketplace_lib::service::{Claims, ServiceContainer, Services};
use marketplace_lib::{AppState, Database};

pub const SECRET: &str = "integration-test-secret-with-32-plus-chars";

/// Configuration pointing at a private in-memory database
pub fn test_config() -> MarketplaceConfig {
    MarketplaceConfig::from_lookup(|key| {
        let value = match key {
            "DATABASE_URL" => "sqlite::memory:",
            "DATABASE_MAX_CONNECTIONS" => "1",
            "DATABASE_MIN_CONNECTIONS" => "1",
            "JWT_SECRET" => SECRET,
            "COUNTER_SYNC_ATTEMPTS" => "1",
            "COUNTER_SYNC_BACKOFF_MS" => "0",
            _ => return None,
        };
        Some(value.to_string())
    })
    .expect("test configuration is valid")
}

pub async fn database() -> Database {
    Database::connect(&test_config().database)
        .await
        .expect("in-memory database with migrations")
}

/// Fully wired services over a fresh database
pub async fn services() -> Services {
    let db = database().await;
    Services::from_connection(db.get_connection(), &test_config())
}

/// Router state over a fresh database
pub async fn app_state() -> AppState {
    let db = Arc::new(database().await);
    AppState::from_config(db, &test_config())
}

/// Sign a token the way the identity provider would
pub fn token_for(user_id: &str) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        email: Some(format!("{}@example.com", user_id)),
        name: None,
        picture: None,
        exp: now + 3600,
        iat: now,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("token signs")
}

pub fn new_category(name: &str) -> CreateCategory {
    CreateCategory {
        name: name.to_string(),
        description: None,
        icon: None,
        child_mode: Some(ChildMode::Referenced),
    }
}

pub fn new_service(title: &str, category_id: Uuid) -> CreateService {
    CreateService {
        title: title.to_string(),
        description: format!("{} at your door", title),
        long_description: None,
        category_id,
        icon: None,
        pricing: Pricing {
            base_price: 50.0,
            currency: "USD".to_string(),
            percentage_charge: None,
            additional_fees: vec![],
            notes: None,
        },
        locations: vec!["Lagos".to_string()],
        tags: vec![],
        is_active: None,
        popular: None,
    }
}

pub fn contact() -> ContactDetails {
    ContactDetails {
        email: Some("someone@example.com".to_string()),
        phone: Some("+2348000000000".to_string()),
        address: None,
    }
}

pub fn new_provider(name: &str) -> CreateProvider {
    CreateProvider {
        name: name.to_string(),
        contact: contact(),
        witnesses: vec![],
    }
}

pub fn new_client(name: &str) -> CreateClient {
    CreateClient {
        name: name.to_string(),
        contact: contact(),
        location: Some("Lagos".to_string()),
        id_type: None,
        id_number: None,
    }
}

/// A referenced category holding one freshly created service
pub async fn category_with_service(services: &Services) -> (Uuid, Uuid) {
    let category = services
        .categories()
        .create_category(new_category("Cleaning"))
        .await
        .expect("category");
    let service = services
        .catalog()
        .create_service(new_service("Deep cleaning", category.id))
        .await
        .expect("service");
    (category.id, service.id)
}
