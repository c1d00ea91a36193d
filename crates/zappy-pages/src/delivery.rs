//! Backend delivery of contact submissions
//!
//! A valid submission is copied to the Zappy backend as JSON:
//!
//! ```text
//! POST <endpoint>
//! Content-Type: application/json
//!
//! {"websiteId": "...", "name": "...", "email": "...",
//!  "subject": "...", "message": "...", "phone": "..." | null}
//! ```
//!
//! The backend answers `{"success": true}` or
//! `{"success": false, "error": "..."}`. Anything else, including a non-2xx
//! status, is a [`DeliveryError`].

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use zappy_conf::DeliverySettings;

/// Errors of the asynchronous delivery channel.
///
/// None of these reach the user; they are logged by the coordinator.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
	#[error("Transport error: {0}")]
	Transport(String),
	#[error("Backend responded with HTTP {status}")]
	Status { status: u16 },
	#[error("Malformed response body: {0}")]
	MalformedBody(String),
	#[error("Backend rejected submission: {reason}")]
	Rejected { reason: String },
}

impl DeliveryError {
	/// Whether the backend answered well-formed but refused the submission.
	pub fn is_rejection(&self) -> bool {
		matches!(self, DeliveryError::Rejected { .. })
	}
}

/// Request body sent to the delivery endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
	pub website_id: String,
	pub name: String,
	pub email: String,
	pub subject: String,
	pub message: String,
	pub phone: Option<String>,
}

impl ContactPayload {
	/// Builds the payload from trimmed field values keyed by field name.
	///
	/// Missing `name`, `email` and `message` become empty strings. A missing
	/// or empty `subject` falls back to the configured default, and a missing
	/// or empty `phone` becomes `null`.
	///
	/// # Examples
	///
	/// ```
	/// use indexmap::IndexMap;
	/// use zappy_conf::DeliverySettings;
	/// use zappy_pages::ContactPayload;
	///
	/// let mut values = IndexMap::new();
	/// values.insert("name".to_string(), "Jo".to_string());
	/// values.insert("phone".to_string(), String::new());
	///
	/// let payload = ContactPayload::from_values(&values, &DeliverySettings::default());
	/// assert_eq!(payload.subject, "Contact Form Submission");
	/// assert_eq!(payload.phone, None);
	/// ```
	pub fn from_values(values: &IndexMap<String, String>, settings: &DeliverySettings) -> Self {
		let get = |key: &str| values.get(key).map(|v| v.trim()).unwrap_or_default();
		let non_empty = |key: &str| Some(get(key)).filter(|v| !v.is_empty());

		Self {
			website_id: settings.website_id.clone(),
			name: get("name").to_string(),
			email: get("email").to_string(),
			subject: non_empty("subject")
				.unwrap_or(settings.default_subject.as_str())
				.to_string(),
			message: get("message").to_string(),
			phone: non_empty("phone").map(str::to_string),
		}
	}
}

/// Response body of the delivery endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryResponse {
	pub success: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

/// Raw HTTP response as seen by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
	pub status: u16,
	pub body: String,
}

impl TransportResponse {
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self {
			status,
			body: body.into(),
		}
	}

	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Sends a JSON payload to an endpoint.
///
/// Futures are `!Send`: the browser runs everything on one thread.
#[async_trait(?Send)]
pub trait DeliveryTransport {
	async fn post_json(
		&self,
		endpoint: &str,
		payload: &ContactPayload,
	) -> Result<TransportResponse, DeliveryError>;
}

/// [`DeliveryTransport`] over `reqwest` (fetch-backed on wasm32).
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
	client: reqwest::Client,
}

impl ReqwestTransport {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_client(client: reqwest::Client) -> Self {
		Self { client }
	}
}

#[async_trait(?Send)]
impl DeliveryTransport for ReqwestTransport {
	async fn post_json(
		&self,
		endpoint: &str,
		payload: &ContactPayload,
	) -> Result<TransportResponse, DeliveryError> {
		let response = self
			.client
			.post(endpoint)
			.json(payload)
			.send()
			.await
			.map_err(|e| DeliveryError::Transport(e.to_string()))?;

		let status = response.status().as_u16();
		let body = response
			.text()
			.await
			.map_err(|e| DeliveryError::Transport(e.to_string()))?;

		Ok(TransportResponse { status, body })
	}
}

/// Maps a raw response to the backend's verdict.
pub fn interpret(response: &TransportResponse) -> Result<DeliveryResponse, DeliveryError> {
	if !response.is_success() {
		return Err(DeliveryError::Status {
			status: response.status,
		});
	}

	let parsed: DeliveryResponse = serde_json::from_str(&response.body)
		.map_err(|e| DeliveryError::MalformedBody(e.to_string()))?;

	if !parsed.success {
		return Err(DeliveryError::Rejected {
			reason: parsed
				.error
				.clone()
				.unwrap_or_else(|| "no reason given".to_string()),
		});
	}
	Ok(parsed)
}

/// Posts `payload` once and interprets the answer. No retry.
pub async fn deliver<T: DeliveryTransport + ?Sized>(
	transport: &T,
	endpoint: &str,
	payload: &ContactPayload,
) -> Result<DeliveryResponse, DeliveryError> {
	let response = transport.post_json(endpoint, payload).await?;
	interpret(&response)
}
