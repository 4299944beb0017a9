//! # Intake Form Forwarding
//!
//! Best-effort copy of each intake submission to an external
//! form-collection endpoint. Runs in a detached task; the checkout
//! redirect never waits on it and never sees its failures.

use chrono::{DateTime, Utc};
use funnel_core::{format_birth_data_for_shopify, Attribute, BirthData};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Bookkeeping keys; posted form fields with these names are dropped
const RESERVED_KEYS: [&str; 4] = ["submission_id", "submitted_at", "plan", "attributes"];

/// Intake form data plus bookkeeping fields
#[derive(Debug, Clone, Serialize)]
pub struct IntakeSubmission {
    pub submission_id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub plan: String,
    /// Birth data as attached to the checkout
    pub attributes: Vec<Attribute>,
    /// Raw form fields, forwarded as posted minus the reserved keys
    #[serde(flatten)]
    pub form: Map<String, Value>,
}

impl IntakeSubmission {
    pub fn new(plan: impl Into<String>, mut form: Map<String, Value>) -> Self {
        let birth_data: BirthData =
            serde_json::from_value(Value::Object(form.clone())).unwrap_or_default();
        form.retain(|key, _| !RESERVED_KEYS.contains(&key.as_str()));

        Self {
            submission_id: Uuid::new_v4(),
            submitted_at: Utc::now(),
            plan: plan.into(),
            attributes: format_birth_data_for_shopify(&birth_data),
            form,
        }
    }
}

/// Fire-and-forget poster for intake submissions
#[derive(Clone)]
pub struct FormForwarder {
    client: reqwest::Client,
    url: Option<String>,
}

impl FormForwarder {
    pub fn new(client: reqwest::Client, url: Option<String>) -> Self {
        Self { client, url }
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }

    /// Spawn the forward and return immediately.
    ///
    /// Returns the task handle (callers normally drop it), or `None` when
    /// forwarding is disabled.
    pub fn forward(&self, submission: IntakeSubmission) -> Option<JoinHandle<()>> {
        let Some(url) = self.url.clone() else {
            debug!(
                submission_id = %submission.submission_id,
                "Form forwarding disabled, skipping"
            );
            return None;
        };
        let client = self.client.clone();

        Some(tokio::spawn(async move {
            let submission_id = submission.submission_id;
            match client.post(&url).json(&submission).send().await {
                Ok(resp) if resp.status().is_success() => {
                    info!(%submission_id, status = %resp.status(), "Intake form forwarded");
                }
                Ok(resp) => {
                    let status = resp.status();
                    let body = resp.text().await.unwrap_or_default();
                    warn!(%submission_id, %status, body = %body, "Form endpoint rejected intake form");
                }
                Err(e) => {
                    warn!(%submission_id, error = %e, "Failed to forward intake form");
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn form() -> Map<String, Value> {
        match json!({ "fullName": "Ada Lovelace", "email": "ada@example.com", "uncertainTime": true }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_submission_flattens_form_and_formats_attributes() {
        let submission = IntakeSubmission::new("full", form());
        let value = serde_json::to_value(&submission).unwrap();

        assert_eq!(value["fullName"], "Ada Lovelace");
        assert_eq!(value["plan"], "full");
        assert_eq!(value["attributes"][0]["value"], "Ada Lovelace");
        assert_eq!(value["attributes"][6]["value"], "true");
        assert!(value["submission_id"].is_string());
    }

    #[test]
    fn test_submission_keeps_valid_fields_next_to_mistyped_ones() {
        let mut form = form();
        form.insert("fullName".to_string(), json!(12));
        form.insert("birthDate".to_string(), json!("1815-12-10"));
        form.insert("birthCity".to_string(), json!("London"));

        let submission = IntakeSubmission::new("mini", form);
        assert_eq!(submission.attributes[0].value, "");
        assert_eq!(submission.attributes[1].value, "1815-12-10");
        assert_eq!(submission.attributes[3].value, "London");
        assert_eq!(submission.attributes[6].value, "true");
    }

    #[test]
    fn test_submission_drops_reserved_form_keys() {
        let mut form = form();
        form.insert("plan".to_string(), json!("deluxe"));
        form.insert("attributes".to_string(), json!("spoofed"));
        form.insert("submission_id".to_string(), json!("fixed"));

        let submission = IntakeSubmission::new("full", form);
        assert!(submission.form.keys().all(|k| !RESERVED_KEYS.contains(&k.as_str())));

        let encoded = serde_json::to_string(&submission).unwrap();
        assert_eq!(encoded.matches("\"plan\"").count(), 1);
        assert_eq!(encoded.matches("\"attributes\"").count(), 1);

        let value: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value["plan"], "full");
        assert!(value["attributes"].is_array());
        assert_ne!(value["submission_id"], "fixed");
    }

    #[tokio::test]
    async fn test_disabled_forwarder() {
        let forwarder = FormForwarder::new(reqwest::Client::new(), None);
        assert!(!forwarder.is_enabled());
        assert!(forwarder.forward(IntakeSubmission::new("full", form())).is_none());
    }

    #[tokio::test]
    async fn test_forward_posts_submission() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/f/intake"))
            .and(body_partial_json(json!({ "plan": "full", "email": "ada@example.com" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let forwarder = FormForwarder::new(
            reqwest::Client::new(),
            Some(format!("{}/f/intake", server.uri())),
        );
        let handle = forwarder
            .forward(IntakeSubmission::new("full", form()))
            .unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_forward_failure_is_swallowed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let forwarder = FormForwarder::new(reqwest::Client::new(), Some(server.uri()));
        let handle = forwarder
            .forward(IntakeSubmission::new("mini", form()))
            .unwrap();
        assert!(handle.await.is_ok());

        let unreachable = FormForwarder::new(
            reqwest::Client::new(),
            Some("http://127.0.0.1:1/f".to_string()),
        );
        let handle = unreachable
            .forward(IntakeSubmission::new("mini", form()))
            .unwrap();
        assert!(handle.await.is_ok());
    }
}
