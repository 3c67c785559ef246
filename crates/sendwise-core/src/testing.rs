use crate::command::{Command, CommandInner};
use crate::component::Component;

/// A headless harness that drives a [`Component`] in plain `#[test]`
/// functions.
///
/// Every message produced by [`update`](Component::update) is recorded in
/// [`emitted`](TestHarness::emitted) and queued; call
/// [`drain_messages`](TestHarness::drain_messages) to feed the queue back into
/// the component, the way an owner would loop notifications.
///
/// # Example
///
/// ```rust,ignore
/// use sendwise_core::testing::TestHarness;
///
/// let mut harness = TestHarness::new(store);
/// harness.send(Message::NextStep);
/// assert_eq!(harness.component().current_step(), 2);
/// assert!(harness.emitted().iter().any(|m| matches!(m, Message::StepChanged { .. })));
/// ```
pub struct TestHarness<C: Component>
where
    C::Message: Clone,
{
    component: C,
    pending_messages: Vec<C::Message>,
    emitted: Vec<C::Message>,
}

impl<C: Component> TestHarness<C>
where
    C::Message: Clone,
{
    /// Wrap an already constructed component.
    pub fn new(component: C) -> Self {
        Self {
            component,
            pending_messages: Vec::new(),
            emitted: Vec::new(),
        }
    }

    /// Send a message, triggering a single update cycle.
    pub fn send(&mut self, msg: C::Message) {
        let cmd = self.component.update(msg);
        self.collect(cmd);
    }

    /// Feed every queued message back into the component until no new
    /// messages are produced.
    pub fn drain_messages(&mut self) {
        while !self.pending_messages.is_empty() {
            let messages: Vec<_> = self.pending_messages.drain(..).collect();
            for msg in messages {
                let cmd = self.component.update(msg);
                self.collect(cmd);
            }
        }
    }

    /// Every message emitted so far, oldest first.
    pub fn emitted(&self) -> &[C::Message] {
        &self.emitted
    }

    /// Take the emitted messages, leaving the log empty.
    pub fn take_emitted(&mut self) -> Vec<C::Message> {
        std::mem::take(&mut self.emitted)
    }

    /// Get a shared reference to the component for assertions.
    pub fn component(&self) -> &C {
        &self.component
    }

    /// Get a mutable reference to the component for direct test setup.
    pub fn component_mut(&mut self) -> &mut C {
        &mut self.component
    }

    /// Unwrap the harness.
    pub fn into_inner(self) -> C {
        self.component
    }

    fn collect(&mut self, cmd: Command<C::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Message(msg) => {
                self.emitted.push(msg.clone());
                self.pending_messages.push(msg);
            }
            CommandInner::Batch(cmds) | CommandInner::Sequence(cmds) => {
                for cmd in cmds {
                    self.collect(cmd);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        count: i64,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum CounterMsg {
        Increment,
        Reset,
        Changed(i64),
    }

    impl Component for Counter {
        type Message = CounterMsg;

        fn update(&mut self, msg: CounterMsg) -> Command<CounterMsg> {
            match msg {
                CounterMsg::Increment => self.count += 1,
                CounterMsg::Reset => self.count = 0,
                CounterMsg::Changed(_) => return Command::none(),
            }
            Command::message(CounterMsg::Changed(self.count))
        }
    }

    #[test]
    fn send_updates_component() {
        let mut harness = TestHarness::new(Counter { count: 0 });
        harness.send(CounterMsg::Increment);
        harness.send(CounterMsg::Increment);
        assert_eq!(harness.component().count, 2);
    }

    #[test]
    fn emitted_records_notifications() {
        let mut harness = TestHarness::new(Counter { count: 5 });
        harness.send(CounterMsg::Increment);
        harness.send(CounterMsg::Reset);
        assert_eq!(
            harness.emitted(),
            &[CounterMsg::Changed(6), CounterMsg::Changed(0)]
        );
    }

    #[test]
    fn drain_feeds_notifications_back() {
        let mut harness = TestHarness::new(Counter { count: 0 });
        harness.send(CounterMsg::Increment);
        harness.drain_messages();
        // Changed is a no-op, so nothing new is emitted.
        assert_eq!(harness.take_emitted(), vec![CounterMsg::Changed(1)]);
        assert!(harness.emitted().is_empty());
        assert_eq!(harness.into_inner().count, 1);
    }
}
