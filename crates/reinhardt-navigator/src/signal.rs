//! Synchronous signal dispatch for navigation notifications.
//!
//! Receivers are plain closures invoked in connection order on the thread
//! that sends. The navigator is single-threaded, so receivers may capture
//! `Rc` state.

/// Handle identifying a connected receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReceiverId(u64);

type ReceiverFn<T> = Box<dyn FnMut(&T)>;

/// A signal that dispatches events of type `T` to connected receivers.
pub struct Signal<T> {
	receivers: Vec<(ReceiverId, ReceiverFn<T>)>,
	next_id: u64,
}

impl<T> Default for Signal<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> std::fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Signal")
			.field("receivers", &self.receivers.len())
			.finish()
	}
}

impl<T> Signal<T> {
	/// Creates a signal with no receivers.
	pub fn new() -> Self {
		Self {
			receivers: Vec::new(),
			next_id: 0,
		}
	}

	/// Connects a receiver and returns its handle.
	pub fn connect<F>(&mut self, receiver: F) -> ReceiverId
	where
		F: FnMut(&T) + 'static,
	{
		let id = ReceiverId(self.next_id);
		self.next_id += 1;
		self.receivers.push((id, Box::new(receiver)));
		id
	}

	/// Disconnects a receiver. Returns `false` if it was not connected.
	pub fn disconnect(&mut self, id: ReceiverId) -> bool {
		let before = self.receivers.len();
		self.receivers.retain(|(receiver_id, _)| *receiver_id != id);
		self.receivers.len() != before
	}

	/// Sends an event to every receiver in connection order.
	pub fn send(&mut self, event: &T) {
		for (_, receiver) in &mut self.receivers {
			receiver(event);
		}
	}

	/// Returns the number of connected receivers.
	pub fn receiver_count(&self) -> usize {
		self.receivers.len()
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use rstest::rstest;

	use super::*;

	#[rstest]
	fn test_send_in_connection_order() {
		let log = Rc::new(RefCell::new(Vec::new()));
		let mut signal = Signal::<u32>::new();

		let first = Rc::clone(&log);
		signal.connect(move |v| first.borrow_mut().push(("first", *v)));
		let second = Rc::clone(&log);
		signal.connect(move |v| second.borrow_mut().push(("second", *v)));

		signal.send(&7);

		assert_eq!(*log.borrow(), vec![("first", 7), ("second", 7)]);
	}

	#[rstest]
	fn test_disconnect() {
		let count = Rc::new(RefCell::new(0));
		let mut signal = Signal::<()>::new();
		let counter = Rc::clone(&count);
		let id = signal.connect(move |_| *counter.borrow_mut() += 1);

		assert!(signal.disconnect(id));
		assert!(!signal.disconnect(id));
		signal.send(&());

		assert_eq!(*count.borrow(), 0);
		assert_eq!(signal.receiver_count(), 0);
	}
}
