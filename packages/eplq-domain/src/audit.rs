use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditLevel {
	Info,
	Warning,
	Error,
	Success,
}
impl AuditLevel {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Info => "INFO",
			Self::Warning => "WARNING",
			Self::Error => "ERROR",
			Self::Success => "SUCCESS",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
	pub action: String,
	pub level: AuditLevel,
	pub actor: Option<String>,
	pub metadata: Map<String, Value>,
}
impl AuditEvent {
	pub fn new(action: impl Into<String>, level: AuditLevel) -> Self {
		Self { action: action.into(), level, actor: None, metadata: Map::new() }
	}

	pub fn info(action: impl Into<String>) -> Self {
		Self::new(action, AuditLevel::Info)
	}

	pub fn warning(action: impl Into<String>) -> Self {
		Self::new(action, AuditLevel::Warning)
	}

	pub fn error(action: impl Into<String>) -> Self {
		Self::new(action, AuditLevel::Error)
	}

	pub fn success(action: impl Into<String>) -> Self {
		Self::new(action, AuditLevel::Success)
	}

	pub fn actor(mut self, actor: impl Into<String>) -> Self {
		self.actor = Some(actor.into());

		self
	}

	pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
		self.metadata.insert(key.to_string(), value.into());

		self
	}
}

/// Best-effort observer for audit events.
///
/// `emit` returns whether the event was accepted. Callers ignore the result: a failing sink must
/// never change the outcome of the operation that produced the event.
pub trait AuditSink
where
	Self: Send + Sync,
{
	fn emit(&self, event: AuditEvent) -> bool;
}

pub struct NoopAudit;
impl AuditSink for NoopAudit {
	fn emit(&self, _event: AuditEvent) -> bool {
		true
	}
}

/// Writes audit events into the tracing pipeline under the `audit` target.
pub struct TracingAudit;
impl AuditSink for TracingAudit {
	fn emit(&self, event: AuditEvent) -> bool {
		let actor = event.actor.as_deref().unwrap_or("anonymous");
		let metadata = Value::Object(event.metadata);
		let audit_level = event.level.as_str();

		match event.level {
			AuditLevel::Error => {
				tracing::error!(target: "audit", audit_level, actor, %metadata, "{}", event.action)
			},
			AuditLevel::Warning => {
				tracing::warn!(target: "audit", audit_level, actor, %metadata, "{}", event.action)
			},
			AuditLevel::Info | AuditLevel::Success => {
				tracing::info!(target: "audit", audit_level, actor, %metadata, "{}", event.action)
			},
		}

		true
	}
}
