use std::sync::Arc;

use tokio::sync::mpsc::{self, Receiver, Sender};

use eplq_domain::audit::{AuditEvent, AuditSink};

/// Hands events to a bounded queue without waiting.
///
/// `emit` returns `false` when the queue is full or the receiver is gone; the event is dropped.
#[derive(Clone)]
pub struct ChannelAudit {
	tx: Sender<AuditEvent>,
}
impl ChannelAudit {
	pub fn new(capacity: usize) -> (Self, Receiver<AuditEvent>) {
		let (tx, rx) = mpsc::channel(capacity.max(1));

		(Self { tx }, rx)
	}
}
impl AuditSink for ChannelAudit {
	fn emit(&self, event: AuditEvent) -> bool {
		self.tx.try_send(event).is_ok()
	}
}

/// Forwards queued events to `sink` until every sender is dropped.
pub async fn drain(mut rx: Receiver<AuditEvent>, sink: Arc<dyn AuditSink>) -> usize {
	let mut forwarded = 0;

	while let Some(event) = rx.recv().await {
		if sink.emit(event) {
			forwarded += 1;
		}
	}

	forwarded
}
