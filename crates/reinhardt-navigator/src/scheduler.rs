//! Deferred task queue.
//!
//! Models the host's microtask queue: work scheduled during a synchronous
//! navigation call runs only when the host flushes the queue, after the call
//! has returned. Tasks run strictly FIFO, tasks scheduled while flushing run
//! in the same flush, and nothing is debounced or cancelled.

use std::collections::VecDeque;

/// A deferred unit of work over a context `C`.
pub type Task<C> = Box<dyn FnOnce(&mut C)>;

/// FIFO queue of deferred tasks.
pub struct TaskQueue<C> {
	tasks: VecDeque<Task<C>>,
}

impl<C> Default for TaskQueue<C> {
	fn default() -> Self {
		Self::new()
	}
}

impl<C> std::fmt::Debug for TaskQueue<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TaskQueue")
			.field("pending", &self.tasks.len())
			.finish()
	}
}

impl<C> TaskQueue<C> {
	/// Creates an empty queue.
	pub fn new() -> Self {
		Self {
			tasks: VecDeque::new(),
		}
	}

	/// Schedules a task after all currently queued ones.
	pub fn schedule<F>(&mut self, task: F)
	where
		F: FnOnce(&mut C) + 'static,
	{
		self.tasks.push_back(Box::new(task));
	}

	/// Takes the oldest queued task.
	pub fn pop(&mut self) -> Option<Task<C>> {
		self.tasks.pop_front()
	}

	/// Returns the number of queued tasks.
	pub fn len(&self) -> usize {
		self.tasks.len()
	}

	/// Returns whether no task is queued.
	pub fn is_empty(&self) -> bool {
		self.tasks.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	fn test_fifo_order() {
		let mut queue = TaskQueue::<Vec<u32>>::new();
		queue.schedule(|log| log.push(1));
		queue.schedule(|log| log.push(2));

		let mut log = Vec::new();
		while let Some(task) = queue.pop() {
			task(&mut log);
		}

		assert_eq!(log, vec![1, 2]);
		assert!(queue.is_empty());
	}

	#[rstest]
	fn test_repeated_triggers_are_not_debounced() {
		let mut queue = TaskQueue::<u32>::new();
		for _ in 0..3 {
			queue.schedule(|count| *count += 1);
		}
		assert_eq!(queue.len(), 3);
	}
}
