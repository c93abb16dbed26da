// TestDependencies - mock implementations for testing
//
// Provides recording mocks that can be injected into ServerDeps for tests.

use anyhow::{bail, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use super::{
    BaseMagicLinkSender, BaseObjectStore, BasePaymentGateway, CheckoutRequest, CheckoutSession,
    CheckoutSessionDetails, ServerDeps, StoredObject,
};
use crate::domains::auth::JwtService;

// =============================================================================
// Mock Object Store
// =============================================================================

pub struct MockObjectStore {
    objects: Arc<Mutex<HashMap<(String, String), Vec<u8>>>>,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Check if an object is currently stored
    pub fn contains(&self, bucket: &str, path: &str) -> bool {
        self.objects
            .lock()
            .unwrap()
            .contains_key(&(bucket.to_string(), path.to_string()))
    }

    /// All stored paths in a bucket
    pub fn paths(&self, bucket: &str) -> Vec<String> {
        let mut paths: Vec<String> = self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, p)| p.clone())
            .collect();
        paths.sort();
        paths
    }
}

impl Default for MockObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseObjectStore for MockObjectStore {
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<StoredObject> {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), path.to_string()), bytes);
        Ok(StoredObject {
            bucket: bucket.to_string(),
            path: path.to_string(),
            url: self.public_url(bucket, path),
        })
    }

    async fn delete(&self, bucket: &str, path: &str) -> Result<()> {
        self.objects
            .lock()
            .unwrap()
            .remove(&(bucket.to_string(), path.to_string()));
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("http://storage.test/{}/{}", bucket, path)
    }
}

// =============================================================================
// Mock Payment Gateway
// =============================================================================

pub struct MockPaymentGateway {
    customers: Arc<Mutex<Vec<(String, String)>>>,
    checkout_calls: Arc<Mutex<Vec<CheckoutRequest>>>,
    sessions: Arc<Mutex<HashMap<String, CheckoutSessionDetails>>>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self {
            customers: Arc::new(Mutex::new(Vec::new())),
            checkout_calls: Arc::new(Mutex::new(Vec::new())),
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Register a session that `retrieve_checkout_session` will return
    pub fn with_session(self, details: CheckoutSessionDetails) -> Self {
        self.sessions
            .lock()
            .unwrap()
            .insert(details.id.clone(), details);
        self
    }

    pub fn add_session(&self, details: CheckoutSessionDetails) {
        self.sessions
            .lock()
            .unwrap()
            .insert(details.id.clone(), details);
    }

    /// (email, user_id) pairs of created customers
    pub fn customers(&self) -> Vec<(String, String)> {
        self.customers.lock().unwrap().clone()
    }

    pub fn checkout_calls(&self) -> Vec<CheckoutRequest> {
        self.checkout_calls.lock().unwrap().clone()
    }
}

impl Default for MockPaymentGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BasePaymentGateway for MockPaymentGateway {
    async fn create_customer(&self, email: &str, user_id: &str) -> Result<String> {
        let mut customers = self.customers.lock().unwrap();
        customers.push((email.to_string(), user_id.to_string()));
        // Unique across tests sharing one database
        Ok(format!("cus_test_{}", Uuid::new_v4().simple()))
    }

    async fn create_checkout_session(&self, request: CheckoutRequest) -> Result<CheckoutSession> {
        let mut calls = self.checkout_calls.lock().unwrap();
        calls.push(request);
        let id = format!("cs_test_{}", Uuid::new_v4().simple());
        Ok(CheckoutSession {
            url: format!("https://checkout.test/pay/{}", id),
            id,
        })
    }

    async fn retrieve_checkout_session(&self, session_id: &str) -> Result<CheckoutSessionDetails> {
        match self.sessions.lock().unwrap().get(session_id) {
            Some(details) => Ok(details.clone()),
            None => bail!("No such checkout session: {}", session_id),
        }
    }
}

// =============================================================================
// Mock Magic Link Sender
// =============================================================================

pub struct MockMagicLinkSender {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    fail: bool,
}

impl MockMagicLinkSender {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    /// A sender whose every delivery fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// (email, link) pairs in send order
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Most recent link sent to an email
    pub fn last_link_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to.eq_ignore_ascii_case(email))
            .map(|(_, link)| link.clone())
    }
}

impl Default for MockMagicLinkSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseMagicLinkSender for MockMagicLinkSender {
    async fn send_magic_link(&self, email: &str, link: &str) -> Result<()> {
        if self.fail {
            bail!("Mock mail delivery failed for {}", email);
        }
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), link.to_string()));
        Ok(())
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub object_store: Arc<MockObjectStore>,
    pub payment_gateway: Arc<MockPaymentGateway>,
    pub magic_links: Arc<MockMagicLinkSender>,
    pub profile_timeout: Duration,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            object_store: Arc::new(MockObjectStore::new()),
            payment_gateway: Arc::new(MockPaymentGateway::new()),
            magic_links: Arc::new(MockMagicLinkSender::new()),
            profile_timeout: Duration::from_secs(5),
        }
    }

    /// Set a mock payment gateway
    pub fn mock_payments(mut self, gateway: MockPaymentGateway) -> Self {
        self.payment_gateway = Arc::new(gateway);
        self
    }

    /// Set a mock magic-link sender
    pub fn mock_magic_links(mut self, sender: MockMagicLinkSender) -> Self {
        self.magic_links = Arc::new(sender);
        self
    }

    /// Override the session bootstrap timeout
    pub fn profile_timeout(mut self, timeout: Duration) -> Self {
        self.profile_timeout = timeout;
        self
    }

    /// Build ServerDeps wired to these mocks
    pub fn into_server_deps(self, db_pool: PgPool, jwt_service: Arc<JwtService>) -> ServerDeps {
        ServerDeps::new(
            db_pool,
            jwt_service,
            self.object_store,
            Some(self.payment_gateway),
            self.magic_links,
            "http://app.test".to_string(),
            self.profile_timeout,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
